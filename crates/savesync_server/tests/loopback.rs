//! End-to-end tests: sessions talking to the reference server in process.

use savesync_codec::Codec;
use savesync_engine::{LoopbackClient, SessionConfig, SyncError, SyncSession};
use savesync_server::{SaveServer, ServerConfig};
use std::sync::Arc;
use tokio::runtime::Handle;

const KEY: &str = "1a2b3c4d5e6f7g8h";
const IV: &str = "#this_is_not_key";

fn config(user_id: &str) -> SessionConfig {
    SessionConfig::new(
        user_id,
        "0.0.1",
        KEY,
        IV,
        "http://127.0.0.1/load_userdata.php",
        "http://127.0.0.1/save_userdata.php",
    )
}

fn connect(server: &Arc<SaveServer>, user_id: &str) -> SyncSession {
    let session = SyncSession::new(LoopbackClient::new(Arc::clone(server)), Handle::current());
    session.init(config(user_id)).unwrap();
    session
}

#[tokio::test(flavor = "multi_thread")]
async fn save_is_visible_to_next_session() {
    let server = Arc::new(SaveServer::new(ServerConfig::default()));

    let first = connect(&server, "test001");
    let loaded = first.load().unwrap().await.unwrap();
    assert!(!loaded.existed);

    first.set_int("Int", 42);
    first.set_double("Double", 2.5);
    first.set_bool("Bool", true);
    first.set_string("String", "hello");
    first.set_bytes("Bytes", &[0, 1, 2, 250]);
    first.save().unwrap().await.unwrap();
    assert_eq!(server.user_count(), 1);

    let second = connect(&server, "test001");
    let loaded = second.load().unwrap().await.unwrap();
    assert_eq!(loaded.sn, 1);
    assert!(loaded.existed);
    assert_eq!(second.get_int("Int", 0), 42);
    assert_eq!(second.get_double("Double", 0.0), 2.5);
    assert!(second.get_bool("Bool", false));
    assert_eq!(second.get_string("String", ""), "hello");
    assert_eq!(second.get_bytes("Bytes", &[]), vec![0, 1, 2, 250]);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_only_sees_ciphertext() {
    let server = Arc::new(SaveServer::new(ServerConfig::default()));
    let session = connect(&server, "player-7");
    session.load().unwrap().await.unwrap();
    session.set_string("secret", "treasure");
    session.save().unwrap().await.unwrap();

    let codec = Codec::from_material(KEY.as_bytes(), IV.as_bytes()).unwrap();
    let token = codec.encode(b"player-7");
    let record = server.record(&token).unwrap();
    assert!(!record.save_data.contains("treasure"));
    assert_eq!(
        codec.decode_text(&record.save_data).unwrap(),
        r#"{"secret":"treasure"}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn users_are_isolated() {
    let server = Arc::new(SaveServer::new(ServerConfig::default()));

    let alice = connect(&server, "alice");
    alice.load().unwrap().await.unwrap();
    alice.set_int("coins", 10);
    alice.save().unwrap().await.unwrap();

    let bob = connect(&server, "bob");
    let loaded = bob.load().unwrap().await.unwrap();
    assert!(!loaded.existed);
    assert_eq!(bob.get_int("coins", 0), 0);
    assert_eq!(server.user_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_writer_is_rejected() {
    let server = Arc::new(SaveServer::new(ServerConfig::default()));

    let phone = connect(&server, "u1");
    let tablet = connect(&server, "u1");
    phone.load().unwrap().await.unwrap();
    tablet.load().unwrap().await.unwrap();

    phone.set_int("level", 2);
    assert_eq!(phone.save().unwrap().await.unwrap().sn, 1);

    tablet.set_int("level", 5);
    let err = tablet.save().unwrap().await.unwrap_err();
    assert!(matches!(err, SyncError::ServerRejected(ref reason) if reason.starts_with("stale sn")));

    // Reloading picks up the accepted save and the next save goes through.
    tablet.load().unwrap().await.unwrap();
    assert_eq!(tablet.get_int("level", 0), 2);
    tablet.set_int("level", 5);
    assert_eq!(tablet.save().unwrap().await.unwrap().sn, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_path_is_a_transport_error() {
    let server = Arc::new(SaveServer::new(ServerConfig::new("/other/load", "/other/save")));
    let session = connect(&server, "u1");

    let err = session.load().unwrap().await.unwrap_err();
    assert!(matches!(err, SyncError::Transport { status: Some(404), .. }));
}
