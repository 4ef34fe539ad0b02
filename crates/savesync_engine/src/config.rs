//! Configuration for a sync session.

use crate::error::{SyncError, SyncResult};
use std::time::Duration;
use zeroize::Zeroizing;

/// Minimum length of key and IV material in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Configuration for one save session.
///
/// Key and IV material is held in zeroizing buffers and never printed.
#[derive(Clone)]
pub struct SessionConfig {
    /// User identity. Sent encrypted, never in clear.
    pub user_id: String,
    /// Application version sent with every save.
    pub version: String,
    key: Zeroizing<Vec<u8>>,
    iv: Zeroizing<Vec<u8>>,
    /// Endpoint answering load requests.
    pub load_url: String,
    /// Endpoint answering save requests.
    pub save_url: String,
    /// Save automatically when a getter stores its default.
    pub save_on_get_default: bool,
    /// Save automatically when a setter changes a value.
    pub save_on_change_value: bool,
    /// Upper bound on one request round trip.
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    /// Creates a session configuration with auto-save disabled and no timeout.
    pub fn new(
        user_id: impl Into<String>,
        version: impl Into<String>,
        key: impl AsRef<[u8]>,
        iv: impl AsRef<[u8]>,
        load_url: impl Into<String>,
        save_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            version: version.into(),
            key: Zeroizing::new(key.as_ref().to_vec()),
            iv: Zeroizing::new(iv.as_ref().to_vec()),
            load_url: load_url.into(),
            save_url: save_url.into(),
            save_on_get_default: false,
            save_on_change_value: false,
            timeout: None,
        }
    }

    /// Sets whether materializing a default triggers a save.
    pub fn with_save_on_get_default(mut self, enabled: bool) -> Self {
        self.save_on_get_default = enabled;
        self
    }

    /// Sets whether changing a value triggers a save.
    pub fn with_save_on_change_value(mut self, enabled: bool) -> Self {
        self.save_on_change_value = enabled;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Raw key material.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Raw IV material.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Checks the configuration before a session accepts it.
    pub fn validate(&self) -> SyncResult<()> {
        if self.user_id.is_empty() {
            return Err(SyncError::config("user id is empty"));
        }
        if self.version.is_empty() {
            return Err(SyncError::config("version is empty"));
        }
        if self.key.len() < MIN_SECRET_LEN {
            return Err(SyncError::config(format!(
                "key must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.key.len()
            )));
        }
        if self.iv.len() < MIN_SECRET_LEN {
            return Err(SyncError::config(format!(
                "iv must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.iv.len()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_id", &self.user_id)
            .field("version", &self.version)
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .field("load_url", &self.load_url)
            .field("save_url", &self.save_url)
            .field("save_on_get_default", &self.save_on_get_default)
            .field("save_on_change_value", &self.save_on_change_value)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::new(
            "test001",
            "0.0.1",
            "1a2b3c4d5e6f7g8h",
            "#this_is_not_key",
            "http://localhost/load_userdata.php",
            "http://localhost/save_userdata.php",
        )
    }

    #[test]
    fn session_config_builder() {
        let config = config()
            .with_save_on_get_default(true)
            .with_save_on_change_value(true)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.user_id, "test001");
        assert_eq!(config.key(), b"1a2b3c4d5e6f7g8h");
        assert!(config.save_on_get_default);
        assert!(config.save_on_change_value);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_are_conservative() {
        let config = config();
        assert!(!config.save_on_get_default);
        assert!(!config.save_on_change_value);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn validation_failures() {
        let mut bad = config();
        bad.user_id.clear();
        assert!(matches!(bad.validate(), Err(SyncError::Config(_))));

        let mut bad = config();
        bad.version.clear();
        assert!(matches!(bad.validate(), Err(SyncError::Config(_))));

        let short_key = SessionConfig::new("u", "v", "short", "#this_is_not_key", "", "");
        assert!(matches!(short_key.validate(), Err(SyncError::Config(_))));

        let short_iv = SessionConfig::new("u", "v", "1a2b3c4d5e6f7g8h", "iv", "", "");
        assert!(matches!(short_iv.validate(), Err(SyncError::Config(_))));

        let long_key = SessionConfig::new("u", "v", "1a2b3c4d5e6f7g8h-and-more", "#this_is_not_key", "", "");
        assert!(long_key.validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("1a2b3c4d"));
        assert!(!debug.contains("this_is_not_key"));
    }
}
