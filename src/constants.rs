// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;

// Session cookie names, shared by delivery and logout
pub const ACCESS_TOKEN_COOKIE: &str = "AccessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "RefreshToken";

// Token lifetime defaults
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: u64 = 15;
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: u64 = 7;

// Upper bound on any token accepted from a request
pub const MAX_TOKEN_LENGTH: usize = 1000;

// Minimum wall-clock time for a login attempt, successful or not
pub const MIN_AUTH_RESPONSE_MILLIS: u64 = 100;
