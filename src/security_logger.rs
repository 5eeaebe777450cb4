//! Security-focused logging module to track authentication events

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { email: Option<String>, reason: String },
    AuthenticationSuccess { user_id: String },
    TokenValidationFailed { reason: String },

    // Registration events
    RegistrationRejected { email: String, reason: String },
    RegistrationSuccess { user_id: String },

    // System security
    ConfigurationError { component: String, error: String },
}

/// Security event with timestamp
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    events: Arc<RwLock<Vec<TimestampedEvent>>>,
    event_counts: Arc<RwLock<HashMap<String, usize>>>,
    max_events: usize,
    alert_thresholds: HashMap<String, usize>,
}

impl SecurityLogger {
    /// Create a new security logger
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        // Authentication
        alert_thresholds.insert("auth_failed".to_string(), 5);
        alert_thresholds.insert("token_validation_failed".to_string(), 10);

        // Registration
        alert_thresholds.insert("registration_rejected".to_string(), 10);

        // System security
        alert_thresholds.insert("config_error".to_string(), 1);

        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            event_counts: Arc::new(RwLock::new(HashMap::new())),
            max_events: 10000,
            alert_thresholds,
        }
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let event_key = self.get_event_key(&event);
        let timestamped_event = TimestampedEvent {
            event: event.clone(),
            timestamp: Instant::now(),
        };

        // Add to events list
        {
            let mut events = self.events.write().await;
            events.push(timestamped_event);

            // Limit memory usage
            if events.len() > self.max_events {
                let events_to_remove = events.len() - self.max_events;
                events.drain(0..events_to_remove);
            }
        }

        // Update counters and check for alerts
        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(event_key.clone()).or_insert(0);
            *count += 1;

            // Check if alert threshold reached
            if let Some(&threshold) = self.alert_thresholds.get(&event_key) {
                if *count >= threshold {
                    self.trigger_alert(&event_key, *count, &event).await;
                    *count = 0; // Reset counter after alert
                }
            }
        }

        // Log the event
        match event {
            SecurityEvent::AuthenticationFailed { email, reason } => {
                log::warn!("SECURITY: Authentication failed - Email: {:?}, Reason: {}", email, reason);
            }
            SecurityEvent::AuthenticationSuccess { user_id } => {
                log::info!("SECURITY: Authentication success - User: {}", user_id);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::warn!("SECURITY: Token validation failed - Reason: {}", reason);
            }
            SecurityEvent::RegistrationRejected { email, reason } => {
                log::warn!("SECURITY: Registration rejected - Email: {}, Reason: {}", email, reason);
            }
            SecurityEvent::RegistrationSuccess { user_id } => {
                log::info!("SECURITY: Registration success - User: {}", user_id);
            }
            SecurityEvent::ConfigurationError { component, error } => {
                log::error!("SECURITY: Configuration error - Component: {}, Error: {}", component, error);
            }
        }
    }

    /// Get event key for tracking
    fn get_event_key(&self, event: &SecurityEvent) -> String {
        match event {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed".to_string(),
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success".to_string(),
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed".to_string(),
            SecurityEvent::RegistrationRejected { .. } => "registration_rejected".to_string(),
            SecurityEvent::RegistrationSuccess { .. } => "registration_success".to_string(),
            SecurityEvent::ConfigurationError { .. } => "config_error".to_string(),
        }
    }

    /// Trigger security alert
    async fn trigger_alert(&self, event_type: &str, count: usize, sample_event: &SecurityEvent) {
        log::error!("SECURITY ALERT: {} events of type '{}' detected", count, event_type);
        log::error!("Sample event: {:?}", sample_event);

        // Additional alerting actions can be implemented here:
        // Email/SMS notifications, SIEM integration, automated responses
    }

    /// Get recent security events
    pub async fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let events = self.events.read().await;
        let cutoff = Instant::now() - duration;

        events
            .iter()
            .filter(|event| event.timestamp > cutoff)
            .map(|event| event.event.clone())
            .collect()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<String, usize> {
        let counts = self.event_counts.read().await;
        counts.clone()
    }

    /// Clean up old events
    pub async fn cleanup_old_events(&self, max_age: Duration) {
        let mut events = self.events.write().await;
        let cutoff = Instant::now() - max_age;

        events.retain(|event| event.timestamp > cutoff);
    }

    /// Start periodic cleanup task
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300)); // Every 5 minutes
            loop {
                interval.tick().await;
                self.cleanup_old_events(Duration::from_secs(3600 * 24)).await; // Keep 24 hours
            }
        });
    }
}

/// Global security logger instance - thread-safe singleton
static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger
pub fn init_security_logger() {
    SECURITY_LOGGER.get_or_init(|| {
        let logger = Arc::new(SecurityLogger::new());
        logger.clone().start_cleanup_task();
        logger
    });
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger
pub async fn log_security_event(event: SecurityEvent) {
    if let Some(logger) = get_security_logger() {
        logger.log_event(event).await;
    }
}
