//! CLI command implementations.

pub mod fetch;
pub mod push;
pub mod token;

use crate::RemoteArgs;
use savesync_engine::{ReqwestClient, SessionConfig, SyncSession};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Builds a runtime and an initialized session for a remote command.
pub fn connect(remote: &RemoteArgs) -> Result<(Runtime, SyncSession), Box<dyn std::error::Error>> {
    let runtime = Runtime::new()?;
    let timeout = Duration::from_secs(remote.timeout);
    let client = ReqwestClient::new(runtime.handle().clone(), timeout)?;
    let session = SyncSession::new(client, runtime.handle().clone());

    let config = SessionConfig::new(
        remote.user.as_str(),
        remote.app_version.as_str(),
        remote.secrets.key.as_bytes(),
        remote.secrets.iv.as_bytes(),
        remote.load_url.as_str(),
        remote.save_url.as_str(),
    )
    .with_timeout(timeout);
    session.init(config)?;

    Ok((runtime, session))
}
