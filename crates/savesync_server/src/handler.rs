//! Request handlers for the load and save endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::records::{SaveRecord, SaveRecords};
use savesync_protocol::{LoadRequest, LoadResponse, SaveRequest, SaveResponse};
use std::sync::Arc;

/// Handler for save requests.
pub struct RequestHandler {
    config: ServerConfig,
    records: Arc<SaveRecords>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(config: ServerConfig, records: Arc<SaveRecords>) -> Self {
        Self { config, records }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handles a load request body.
    pub fn handle_load(&self, body: &str) -> ServerResult<LoadResponse> {
        let request = LoadRequest::decode(body)?;
        let response = match self.records.get(&request.user_token) {
            Some(record) => LoadResponse::Found {
                sn: record.sn,
                save_data: record.save_data,
            },
            None => LoadResponse::Empty,
        };
        tracing::debug!(found = !matches!(response, LoadResponse::Empty), "load handled");
        Ok(response)
    }

    /// Handles a save request body.
    pub fn handle_save(&self, body: &str) -> ServerResult<SaveResponse> {
        let request = SaveRequest::decode(body)?;

        if request.save_data.len() > self.config.max_save_bytes {
            return Err(ServerError::PayloadTooLarge {
                size: request.save_data.len(),
                limit: self.config.max_save_bytes,
            });
        }

        let sn = request.sn;
        let record = SaveRecord {
            sn,
            version: request.version,
            save_data: request.save_data,
        };
        let reject_stale = self.config.reject_stale_sn;
        self.records.put_if(&request.user_token, record, |current| {
            match current {
                Some(current) if reject_stale && sn <= current.sn => {
                    Err(ServerError::StaleSequence {
                        stored: current.sn,
                        received: sn,
                    })
                }
                _ => Ok(()),
            }
        })?;

        tracing::debug!(sn, "save accepted");
        Ok(SaveResponse::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> RequestHandler {
        RequestHandler::new(ServerConfig::default(), Arc::new(SaveRecords::new()))
    }

    fn save_body(user: &str, sn: u64, data: &str) -> String {
        SaveRequest {
            user_token: user.into(),
            sn,
            version: "0.0.1".into(),
            save_data: data.into(),
        }
        .encode()
    }

    #[test]
    fn unknown_user_loads_null() {
        let handler = handler();
        let response = handler.handle_load(&LoadRequest::new("abc").encode()).unwrap();
        assert_eq!(response, LoadResponse::Empty);
    }

    #[test]
    fn save_then_load() {
        let handler = handler();
        assert_eq!(
            handler.handle_save(&save_body("a+b", 1, "x+y=")).unwrap(),
            SaveResponse::Done
        );
        let response = handler.handle_load(&LoadRequest::new("a+b").encode()).unwrap();
        assert_eq!(
            response,
            LoadResponse::Found {
                sn: 1,
                save_data: "x+y=".into()
            }
        );
    }

    #[test]
    fn stale_sequence_rejected() {
        let handler = handler();
        handler.handle_save(&save_body("u", 3, "A")).unwrap();
        assert_eq!(
            handler.handle_save(&save_body("u", 3, "B")),
            Err(ServerError::StaleSequence {
                stored: 3,
                received: 3
            })
        );
        assert!(handler.handle_save(&save_body("u", 4, "C")).is_ok());
    }

    #[test]
    fn stale_check_can_be_disabled() {
        let handler = RequestHandler::new(
            ServerConfig::default().with_reject_stale_sn(false),
            Arc::new(SaveRecords::new()),
        );
        handler.handle_save(&save_body("u", 5, "A")).unwrap();
        assert!(handler.handle_save(&save_body("u", 1, "B")).is_ok());
    }

    #[test]
    fn oversized_payload_rejected() {
        let handler = RequestHandler::new(
            ServerConfig::default().with_max_save_bytes(4),
            Arc::new(SaveRecords::new()),
        );
        assert!(matches!(
            handler.handle_save(&save_body("u", 1, "ABCDEFGH")),
            Err(ServerError::PayloadTooLarge { size: 8, limit: 4 })
        ));
    }

    #[test]
    fn malformed_bodies() {
        let handler = handler();
        assert!(matches!(
            handler.handle_load("nothing"),
            Err(ServerError::InvalidRequest(_))
        ));
        assert!(matches!(
            handler.handle_save("user_id=u&sn=1"),
            Err(ServerError::InvalidRequest(_))
        ));
    }
}
