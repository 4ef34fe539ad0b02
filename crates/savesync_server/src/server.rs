//! Main save server.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::RequestHandler;
use crate::records::{SaveRecord, SaveRecords};
use savesync_engine::{HttpResponse, LoopbackServer};
use std::sync::Arc;

/// The save server.
///
/// Keeps the last accepted save of every user in memory and answers the
/// load/save exchange. Saves refused for a stale sequence number or size
/// answer 200 with the reason as body, as the protocol expects.
///
/// # Example
///
/// ```
/// use savesync_server::{SaveServer, ServerConfig};
///
/// let server = SaveServer::new(ServerConfig::default());
/// let response = server.route("/load_userdata.php", b"user_id=abc");
/// assert_eq!(response.body, b"NULL");
/// ```
pub struct SaveServer {
    handler: RequestHandler,
    records: Arc<SaveRecords>,
}

impl SaveServer {
    /// Creates a new save server.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_records(config, Arc::new(SaveRecords::new()))
    }

    /// Creates a save server over existing records.
    pub fn with_records(config: ServerConfig, records: Arc<SaveRecords>) -> Self {
        let handler = RequestHandler::new(config, Arc::clone(&records));
        Self { handler, records }
    }

    /// Answers a POST to `path`.
    pub fn route(&self, path: &str, body: &[u8]) -> HttpResponse {
        let config = self.handler.config();
        let body = String::from_utf8_lossy(body);

        let result = if path == config.load_path {
            self.handler.handle_load(&body).map(|r| r.encode())
        } else if path == config.save_path {
            self.handler.handle_save(&body).map(|r| r.encode())
        } else {
            Err(ServerError::UnknownPath(path.to_string()))
        };

        match result {
            Ok(text) => HttpResponse::ok(text),
            Err(e) => {
                tracing::warn!(path, error = %e, "request refused");
                HttpResponse::new(e.status(), e.to_string())
            }
        }
    }

    /// Returns the stored save for `user_token`.
    pub fn record(&self, user_token: &str) -> Option<SaveRecord> {
        self.records.get(user_token)
    }

    /// Returns the number of users with a save.
    pub fn user_count(&self) -> usize {
        self.records.len()
    }
}

impl LoopbackServer for SaveServer {
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<HttpResponse, String> {
        Ok(self.route(path, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savesync_protocol::LoadResponse;

    #[test]
    fn routes_by_path() {
        let server = SaveServer::new(ServerConfig::default());

        let response = server.route(
            "/save_userdata.php",
            b"user_id=u&sn=1&version=v&save_data=QQ==",
        );
        assert_eq!(response, HttpResponse::ok("Done"));
        assert_eq!(server.user_count(), 1);
        assert_eq!(server.record("u").unwrap().version, "v");

        let response = server.route("/load_userdata.php", b"user_id=u");
        assert!(response.is_success());
        assert_eq!(
            LoadResponse::decode(&response.body).unwrap(),
            LoadResponse::Found {
                sn: 1,
                save_data: "QQ==".into()
            }
        );
    }

    #[test]
    fn refusals_map_to_statuses() {
        let server = SaveServer::new(ServerConfig::default());

        assert_eq!(server.route("/elsewhere", b"").status, 404);
        assert_eq!(server.route("/load_userdata.php", b"junk").status, 400);

        server.route("/save_userdata.php", b"user_id=u&sn=2&version=v&save_data=QQ==");
        let stale = server.route("/save_userdata.php", b"user_id=u&sn=2&version=v&save_data=Qg==");
        assert_eq!(stale.status, 200);
        assert!(String::from_utf8(stale.body).unwrap().starts_with("stale sn"));
    }

    #[test]
    fn loopback_never_fails_at_transport_level() {
        let server = SaveServer::new(ServerConfig::default());
        let response = server.handle_post("/nope", b"").unwrap();
        assert_eq!(response.status, 404);
    }
}
