//! Server configuration.

/// Configuration for the save server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path answering load requests.
    pub load_path: String,
    /// Path answering save requests.
    pub save_path: String,
    /// Refuse saves whose sequence number is not above the stored one.
    pub reject_stale_sn: bool,
    /// Largest accepted `save_data` token, in bytes.
    pub max_save_bytes: usize,
}

impl ServerConfig {
    /// Creates a configuration for the given endpoint paths.
    pub fn new(load_path: impl Into<String>, save_path: impl Into<String>) -> Self {
        Self {
            load_path: load_path.into(),
            save_path: save_path.into(),
            reject_stale_sn: true,
            max_save_bytes: 1024 * 1024,
        }
    }

    /// Sets whether stale sequence numbers are refused.
    pub fn with_reject_stale_sn(mut self, enabled: bool) -> Self {
        self.reject_stale_sn = enabled;
        self
    }

    /// Sets the largest accepted `save_data` token.
    pub fn with_max_save_bytes(mut self, bytes: usize) -> Self {
        self.max_save_bytes = bytes;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("/load_userdata.php", "/save_userdata.php")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.load_path, "/load_userdata.php");
        assert_eq!(config.save_path, "/save_userdata.php");
        assert!(config.reject_stale_sn);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("/l", "/s")
            .with_reject_stale_sn(false)
            .with_max_save_bytes(64);

        assert_eq!(config.load_path, "/l");
        assert!(!config.reject_stale_sn);
        assert_eq!(config.max_save_bytes, 64);
    }
}
