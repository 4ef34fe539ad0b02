//! Session state machine.
//!
//! Everything here runs under the session lock and never blocks. The
//! session decides *what* to send here and performs the I/O elsewhere.

use crate::config::SessionConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::HttpResponse;
use savesync_codec::{Codec, CodecError};
use savesync_protocol::{LoadRequest, LoadResponse, SaveRequest, SaveResponse};
use savesync_store::{SaveStore, SaveValue, Touch};
use std::time::Duration;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not initialized; every operation is a no-op.
    Uninitialized,
    /// Initialized with no request in flight.
    Ready,
    /// A load request is in flight.
    Loading,
    /// A save request is in flight.
    Saving,
}

impl SessionState {
    /// Returns true once the session has been initialized.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, SessionState::Uninitialized)
    }

    /// Returns true while a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Saving)
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Sequence number after the load.
    pub sn: u64,
    /// False when the server had no save yet.
    pub existed: bool,
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Sequence number the server accepted.
    pub sn: u64,
}

/// A request ready to be sent.
#[derive(Debug)]
pub(crate) struct Outbound {
    pub url: String,
    pub body: Vec<u8>,
    pub epoch: u64,
    pub timeout: Option<Duration>,
}

/// Settings fixed by a successful init.
struct Active {
    config: SessionConfig,
    codec: Codec,
    user_token: String,
}

/// Mutable session state, guarded by the session lock.
pub(crate) struct Shared {
    state: SessionState,
    active: Option<Active>,
    store: SaveStore,
    sn: u64,
    epoch: u64,
    save_queued: bool,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            active: None,
            store: SaveStore::new(),
            sn: 0,
            epoch: 0,
            save_queued: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn sn(&self) -> u64 {
        self.sn
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.active.as_ref().map(|active| &active.config)
    }

    pub fn init(&mut self, config: SessionConfig) -> SyncResult<()> {
        if self.state.is_initialized() {
            return Err(SyncError::config("session already initialized"));
        }
        config.validate()?;

        let codec = Codec::from_material(config.key(), config.iv())
            .map_err(|e| SyncError::config(e.to_string()))?;
        let user_token = codec.encode(config.user_id.as_bytes());

        tracing::info!(
            version = %config.version,
            load_url = %config.load_url,
            save_url = %config.save_url,
            "save session initialized"
        );

        self.active = Some(Active {
            config,
            codec,
            user_token,
        });
        self.store.reset();
        self.sn = 0;
        self.save_queued = false;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Returns to the uninitialized state. In-flight requests become stale.
    pub fn release(&mut self) {
        if !self.state.is_initialized() {
            return;
        }
        if self.state.is_busy() {
            tracing::debug!(state = ?self.state, "releasing with a request in flight");
        }

        self.epoch = self.epoch.wrapping_add(1);
        self.active = None;
        self.store.reset();
        self.sn = 0;
        self.save_queued = false;
        self.state = SessionState::Uninitialized;
        tracing::info!("save session released");
    }

    pub fn set_save_on_get_default(&mut self, enabled: bool) {
        if let Some(active) = self.active.as_mut() {
            active.config.save_on_get_default = enabled;
        }
    }

    pub fn set_save_on_change_value(&mut self, enabled: bool) {
        if let Some(active) = self.active.as_mut() {
            active.config.save_on_change_value = enabled;
        }
    }

    /// Fails with `NotInitialized` or `Busy` unless a request may start.
    pub fn ensure_idle(&self) -> SyncResult<()> {
        match self.state {
            SessionState::Uninitialized => Err(SyncError::NotInitialized),
            SessionState::Loading | SessionState::Saving => Err(SyncError::Busy),
            SessionState::Ready => Ok(()),
        }
    }

    pub fn begin_load(&mut self) -> SyncResult<Outbound> {
        self.ensure_idle()?;
        let active = self.active.as_ref().ok_or(SyncError::NotInitialized)?;

        let body = LoadRequest::new(active.user_token.as_str()).encode();
        let outbound = Outbound {
            url: active.config.load_url.clone(),
            body: body.into_bytes(),
            epoch: self.epoch,
            timeout: active.config.timeout,
        };
        self.state = SessionState::Loading;

        tracing::debug!(url = %outbound.url, "dispatching load");
        Ok(outbound)
    }

    /// Prepares a save request.
    ///
    /// A document that cannot be serialized, or a sequence number already at
    /// `u64::MAX`, fails before the sequence number moves or any request is
    /// built.
    pub fn begin_save(&mut self) -> SyncResult<Outbound> {
        self.ensure_idle()?;
        let active = self.active.as_ref().ok_or(SyncError::NotInitialized)?;

        let document = self.store.serialize().map_err(|e| {
            tracing::warn!(error = %e, "save skipped, document not serializable");
            SyncError::Document(e.to_string())
        })?;

        let next = self.sn.checked_add(1).ok_or_else(|| {
            tracing::warn!(sn = self.sn, "save skipped, sequence number exhausted");
            SyncError::Protocol("sequence number exhausted".into())
        })?;
        let request = SaveRequest {
            user_token: active.user_token.clone(),
            sn: next,
            version: active.config.version.clone(),
            save_data: active.codec.encode(document.as_bytes()),
        };
        let outbound = Outbound {
            url: active.config.save_url.clone(),
            body: request.encode().into_bytes(),
            epoch: self.epoch,
            timeout: active.config.timeout,
        };
        self.sn = next;
        self.state = SessionState::Saving;

        tracing::debug!(
            url = %outbound.url,
            sn = self.sn,
            bytes = outbound.body.len(),
            "dispatching save"
        );
        Ok(outbound)
    }

    pub fn finish_load(
        &mut self,
        epoch: u64,
        response: Result<HttpResponse, SyncError>,
    ) -> SyncResult<LoadOutcome> {
        if epoch != self.epoch {
            return Err(SyncError::Cancelled);
        }
        self.state = SessionState::Ready;

        let result = self.apply_load(response);
        match &result {
            Ok(outcome) => tracing::debug!(sn = outcome.sn, existed = outcome.existed, "load complete"),
            Err(e) => tracing::warn!(error = %e, "load failed"),
        }
        result
    }

    fn apply_load(&mut self, response: Result<HttpResponse, SyncError>) -> SyncResult<LoadOutcome> {
        let response = response?;
        if !response.is_success() {
            return Err(SyncError::http_status(response.status));
        }
        let active = self.active.as_ref().ok_or(SyncError::Cancelled)?;

        let decoded =
            LoadResponse::decode(&response.body).map_err(|e| SyncError::Protocol(e.to_string()))?;
        match decoded {
            LoadResponse::Empty => {
                self.store.clear();
                self.sn = 0;
                Ok(LoadOutcome {
                    sn: 0,
                    existed: false,
                })
            }
            LoadResponse::Found { sn, save_data } => {
                let text = active.codec.decode_text(&save_data).map_err(|e| match e {
                    CodecError::InvalidBase64 { .. } => SyncError::Protocol(e.to_string()),
                    _ => SyncError::Document(e.to_string()),
                })?;
                self.store
                    .load_from(&text)
                    .map_err(|e| SyncError::Document(e.to_string()))?;
                self.sn = sn;
                Ok(LoadOutcome { sn, existed: true })
            }
        }
    }

    pub fn finish_save(
        &mut self,
        epoch: u64,
        response: Result<HttpResponse, SyncError>,
    ) -> SyncResult<SaveOutcome> {
        if epoch != self.epoch {
            return Err(SyncError::Cancelled);
        }
        self.state = SessionState::Ready;

        let result = response.and_then(|response| {
            if !response.is_success() {
                return Err(SyncError::http_status(response.status));
            }
            match SaveResponse::decode(&response.body) {
                SaveResponse::Done => Ok(SaveOutcome { sn: self.sn }),
                SaveResponse::Rejected(reason) => Err(SyncError::ServerRejected(reason)),
            }
        });
        match &result {
            Ok(outcome) => tracing::debug!(sn = outcome.sn, "save complete"),
            Err(e) => tracing::warn!(sn = self.sn, error = %e, "save failed"),
        }
        result
    }

    /// Reads through the store and applies the get-default policy.
    pub fn get<T: SaveValue>(&mut self, key: &str, default: T) -> (T, Option<SyncResult<Outbound>>) {
        if !self.state.is_initialized() {
            return (default, None);
        }
        let (value, touch) = self.store.get(key, default);
        (value, self.auto_save(touch))
    }

    /// Writes through the store and applies the change policy.
    pub fn set<T: SaveValue>(&mut self, key: &str, value: T) -> Option<SyncResult<Outbound>> {
        if !self.state.is_initialized() {
            return None;
        }
        let touch = self.store.set(key, value);
        self.auto_save(touch)
    }

    pub fn remove(&mut self, key: &str) -> Option<SyncResult<Outbound>> {
        if !self.state.is_initialized() {
            return None;
        }
        let touch = self.store.remove(key);
        self.auto_save(touch)
    }

    /// Replaces the document from local text without a network round trip.
    pub fn load_text(&mut self, text: &str) -> SyncResult<()> {
        self.ensure_idle()?;
        self.store
            .load_from(text)
            .map_err(|e| SyncError::Document(e.to_string()))
    }

    /// Decides whether `touch` starts a save now, queues one, or does nothing.
    fn auto_save(&mut self, touch: Touch) -> Option<SyncResult<Outbound>> {
        let config = self.config()?;
        let wanted = match touch {
            Touch::Unchanged => false,
            Touch::DefaultPersisted => config.save_on_get_default,
            Touch::ValueChanged => config.save_on_change_value,
        };
        if !wanted {
            return None;
        }

        if self.state.is_busy() {
            tracing::debug!("request in flight, auto-save queued");
            self.save_queued = true;
            return None;
        }
        Some(self.begin_save())
    }

    /// Starts the queued auto-save, if any, once the session is idle.
    pub fn take_queued_save(&mut self) -> Option<SyncResult<Outbound>> {
        if !self.save_queued || self.state != SessionState::Ready {
            return None;
        }
        self.save_queued = false;
        Some(self.begin_save())
    }
}
