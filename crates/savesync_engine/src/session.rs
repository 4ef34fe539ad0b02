//! The save session.

use crate::config::SessionConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, HttpResponse};
use crate::state::{LoadOutcome, Outbound, SaveOutcome, SessionState, Shared};
use crate::ticket::{SyncTicket, TicketSender};
use parking_lot::Mutex;
use savesync_store::SaveValue;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Callback invoked once per completed load.
pub type LoadCallback = Arc<dyn Fn(&SyncResult<LoadOutcome>) + Send + Sync>;

/// Callback invoked once per completed save.
pub type SaveCallback = Arc<dyn Fn(&SyncResult<SaveOutcome>) + Send + Sync>;

struct Inner {
    client: Arc<dyn HttpClient>,
    runtime: Handle,
    shared: Mutex<Shared>,
    on_load: Mutex<Option<LoadCallback>>,
    on_save: Mutex<Option<SaveCallback>>,
}

/// Synchronizes one save document with a remote endpoint.
///
/// The handle is cheap to clone; clones share the same session. Requests
/// run on the given Tokio runtime and at most one is in flight at a time.
///
/// Accessors never fail. Before [`init`](Self::init), and before the first
/// load completes, getters return their default and setters do nothing.
///
/// # Example
///
/// ```rust,no_run
/// use savesync_engine::{MockClient, SessionConfig, SyncSession};
///
/// # async fn run() -> savesync_engine::SyncResult<()> {
/// let client = MockClient::new();
/// client.push_ok("NULL");
///
/// let session = SyncSession::new(client, tokio::runtime::Handle::current());
/// session.init(SessionConfig::new(
///     "player-1",
///     "1.0",
///     "1a2b3c4d5e6f7g8h",
///     "#this_is_not_key",
///     "https://saves.example.com/load",
///     "https://saves.example.com/save",
/// ))?;
///
/// session.load()?.await?;
/// let coins = session.get_int("coins", 0);
/// # let _ = coins;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncSession {
    inner: Arc<Inner>,
}

impl SyncSession {
    /// Creates an uninitialized session sending requests through `client`.
    pub fn new(client: impl HttpClient + 'static, runtime: Handle) -> Self {
        Self::with_shared_client(Arc::new(client), runtime)
    }

    /// Creates an uninitialized session over an already shared client.
    pub fn with_shared_client(client: Arc<dyn HttpClient>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                runtime,
                shared: Mutex::new(Shared::new()),
                on_load: Mutex::new(None),
                on_save: Mutex::new(None),
            }),
        }
    }

    /// Applies `config`. Fails if already initialized or `config` is invalid.
    pub fn init(&self, config: SessionConfig) -> SyncResult<()> {
        self.inner.shared.lock().init(config)
    }

    /// Returns to the uninitialized state.
    ///
    /// A request still in flight completes with [`SyncError::Cancelled`] and
    /// does not touch the session.
    pub fn release(&self) {
        self.inner.shared.lock().release();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.shared.lock().state()
    }

    /// Returns true once initialized.
    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    /// Current sequence number.
    pub fn sequence_number(&self) -> u64 {
        self.inner.shared.lock().sn()
    }

    /// Registers the load completion callback, replacing any previous one.
    pub fn set_load_callback(
        &self,
        callback: impl Fn(&SyncResult<LoadOutcome>) + Send + Sync + 'static,
    ) {
        let callback: LoadCallback = Arc::new(callback);
        *self.inner.on_load.lock() = Some(callback);
    }

    /// Registers the save completion callback, replacing any previous one.
    pub fn set_save_callback(
        &self,
        callback: impl Fn(&SyncResult<SaveOutcome>) + Send + Sync + 'static,
    ) {
        let callback: SaveCallback = Arc::new(callback);
        *self.inner.on_save.lock() = Some(callback);
    }

    /// Enables or disables saving when a getter stores its default.
    pub fn set_save_on_get_default(&self, enabled: bool) {
        self.inner.shared.lock().set_save_on_get_default(enabled);
    }

    /// Enables or disables saving when a setter changes a value.
    pub fn set_save_on_change_value(&self, enabled: bool) {
        self.inner.shared.lock().set_save_on_change_value(enabled);
    }

    /// Fetches the stored save and replaces the local document.
    ///
    /// Fails synchronously with `NotInitialized` or `Busy`; every other
    /// failure arrives through the ticket and the load callback.
    pub fn load(&self) -> SyncResult<SyncTicket<LoadOutcome>> {
        let outbound = self.inner.shared.lock().begin_load()?;
        let (sender, ticket) = SyncTicket::channel();
        self.dispatch_load(outbound, sender);
        Ok(ticket)
    }

    /// Sends the local document with the next sequence number.
    ///
    /// Fails synchronously with `NotInitialized` or `Busy`. A document that
    /// cannot be serialized is reported through the ticket and callback
    /// without sending anything.
    pub fn save(&self) -> SyncResult<SyncTicket<SaveOutcome>> {
        let start = {
            let mut shared = self.inner.shared.lock();
            shared.ensure_idle()?;
            shared.begin_save()
        };
        Ok(self.start_save(start))
    }

    /// Replaces the local document from JSON text, without a request.
    ///
    /// Empty text loads an empty document.
    pub fn load_from_text(&self, text: &str) -> SyncResult<()> {
        self.inner.shared.lock().load_text(text)
    }

    /// Renders the local document as compact JSON.
    pub fn document_json(&self) -> SyncResult<String> {
        let shared = self.inner.shared.lock();
        if !shared.state().is_initialized() {
            return Err(SyncError::NotInitialized);
        }
        shared
            .store()
            .serialize()
            .map_err(|e| SyncError::Document(e.to_string()))
    }

    /// Reads a bool.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default)
    }

    /// Reads a 32-bit integer.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key, default)
    }

    /// Reads a single-precision float.
    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key, default)
    }

    /// Reads a double.
    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get(key, default)
    }

    /// Reads a string.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key, default.to_string())
    }

    /// Reads a byte blob.
    pub fn get_bytes(&self, key: &str, default: &[u8]) -> Vec<u8> {
        self.get(key, default.to_vec())
    }

    /// Writes a bool.
    pub fn set_bool(&self, key: &str, value: bool) {
        self.set(key, value);
    }

    /// Writes a 32-bit integer.
    pub fn set_int(&self, key: &str, value: i32) {
        self.set(key, value);
    }

    /// Writes a single-precision float.
    pub fn set_float(&self, key: &str, value: f32) {
        self.set(key, value);
    }

    /// Writes a double.
    pub fn set_double(&self, key: &str, value: f64) {
        self.set(key, value);
    }

    /// Writes a string.
    pub fn set_string(&self, key: &str, value: &str) {
        self.set(key, value.to_string());
    }

    /// Writes a byte blob.
    pub fn set_bytes(&self, key: &str, value: &[u8]) {
        self.set(key, value.to_vec());
    }

    /// Deletes a key. Counts as a value change for auto-save.
    pub fn remove(&self, key: &str) {
        let start = self.inner.shared.lock().remove(key);
        self.start_auto_save(start);
    }

    /// Reads any [`SaveValue`] type.
    pub fn get<T: SaveValue>(&self, key: &str, default: T) -> T {
        let (value, start) = self.inner.shared.lock().get(key, default);
        self.start_auto_save(start);
        value
    }

    /// Writes any [`SaveValue`] type.
    pub fn set<T: SaveValue>(&self, key: &str, value: T) {
        let start = self.inner.shared.lock().set(key, value);
        self.start_auto_save(start);
    }

    fn start_auto_save(&self, start: Option<SyncResult<Outbound>>) {
        if let Some(start) = start {
            // Nobody awaits an automatic save; the save callback reports it.
            let _ticket = self.start_save(start);
        }
    }

    fn start_save(&self, start: SyncResult<Outbound>) -> SyncTicket<SaveOutcome> {
        let (sender, ticket) = SyncTicket::channel();
        match start {
            Ok(outbound) => self.dispatch_save(outbound, sender),
            Err(e) => self.deliver_save(Err(e), sender),
        }
        ticket
    }

    fn dispatch_load(&self, outbound: Outbound, sender: TicketSender<LoadOutcome>) {
        let session = self.clone();
        self.inner.runtime.spawn(async move {
            let epoch = outbound.epoch;
            let response = session.transmit(outbound).await;
            let (result, queued) = {
                let mut shared = session.inner.shared.lock();
                let result = shared.finish_load(epoch, response);
                (result, shared.take_queued_save())
            };
            session.start_auto_save(queued);
            session.deliver_load(result, sender);
        });
    }

    fn dispatch_save(&self, outbound: Outbound, sender: TicketSender<SaveOutcome>) {
        let session = self.clone();
        self.inner.runtime.spawn(async move {
            let epoch = outbound.epoch;
            let response = session.transmit(outbound).await;
            let (result, queued) = {
                let mut shared = session.inner.shared.lock();
                let result = shared.finish_save(epoch, response);
                (result, shared.take_queued_save())
            };
            session.start_auto_save(queued);
            session.deliver_save(result, sender);
        });
    }

    /// Runs the blocking POST on the blocking pool, bounded by the timeout.
    async fn transmit(&self, outbound: Outbound) -> Result<HttpResponse, SyncError> {
        let client = Arc::clone(&self.inner.client);
        let Outbound {
            url, body, timeout, ..
        } = outbound;
        let call = tokio::task::spawn_blocking(move || client.post(&url, body));

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(SyncError::transport(format!(
                        "timed out after {} ms",
                        limit.as_millis()
                    )))
                }
            },
            None => call.await,
        };

        match joined {
            Ok(result) => result.map_err(SyncError::transport),
            Err(e) => Err(SyncError::transport(format!("transport worker failed: {e}"))),
        }
    }

    fn deliver_load(&self, result: SyncResult<LoadOutcome>, sender: TicketSender<LoadOutcome>) {
        let callback = self.inner.on_load.lock().clone();
        if let Some(callback) = callback {
            callback(&result);
        }
        let _ = sender.send(result);
    }

    fn deliver_save(&self, result: SyncResult<SaveOutcome>, sender: TicketSender<SaveOutcome>) {
        let callback = self.inner.on_save.lock().clone();
        if let Some(callback) = callback {
            callback(&result);
        }
        let _ = sender.send(result);
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.inner.shared.lock();
        f.debug_struct("SyncSession")
            .field("state", &shared.state())
            .field("sn", &shared.sn())
            .finish_non_exhaustive()
    }
}
