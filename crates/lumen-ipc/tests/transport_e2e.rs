//! End-to-end transport tests against a fake daemon on a real datagram
//! socket.

use std::time::{Duration, Instant};

use lumen_ipc::{
    proto::{CommandCode, ReplyStatus, Request},
    testing,
    transport::{IpcSession, TransportError},
};
use tempfile::TempDir;

/// Unique runtime dir + socket path per test so parallel tests never collide.
fn scratch_socket(test_name: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(format!("lumen-shell-{test_name}.sock"));
    (dir, path)
}

#[tokio::test]
async fn roundtrip_delivers_request_and_reply() {
    let (_dir, path) = scratch_socket("roundtrip");
    let daemon = testing::serve_once(&path, ReplyStatus::Ok);

    let session = IpcSession::connect(path).expect("connect");
    let request = Request::volume_set(0.42).unwrap();
    let reply = session.roundtrip(&request).await.expect("roundtrip");

    assert_eq!(reply.status, ReplyStatus::Ok);
    let seen = daemon.join().expect("daemon thread");
    assert_eq!(seen, request);
}

#[tokio::test]
async fn daemon_error_status_comes_back_verbatim() {
    let (_dir, path) = scratch_socket("rejected");
    let daemon = testing::serve_once(&path, ReplyStatus::Failed);

    let session = IpcSession::connect(path).expect("connect");
    let request = Request::bare(CommandCode::ThemeDark).unwrap();
    let reply = session.roundtrip(&request).await.expect("roundtrip");

    assert_eq!(reply.status, ReplyStatus::Failed);
    assert_eq!(daemon.join().unwrap(), request);
}

#[tokio::test]
async fn missing_socket_fails_before_any_network_activity() {
    let (_dir, path) = scratch_socket("missing");
    // nothing bound the path
    let err = IpcSession::connect(path).unwrap_err();
    assert!(matches!(err, TransportError::SocketMissing { .. }));
}

#[tokio::test]
async fn regular_file_is_not_a_socket() {
    let (_dir, path) = scratch_socket("notasocket");
    std::fs::write(&path, b"definitely not a socket").unwrap();
    let err = IpcSession::connect(path).unwrap_err();
    assert!(matches!(err, TransportError::NotASocket { .. }));
}

#[tokio::test]
async fn silent_daemon_times_out_within_bound() {
    let (_dir, path) = scratch_socket("timeout");
    let _mute = testing::bind_mute(&path);

    let limit = Duration::from_millis(300);
    let session = IpcSession::connect(path)
        .expect("connect")
        .with_reply_timeout(limit);

    let started = Instant::now();
    let err = session
        .roundtrip(&Request::bare(CommandCode::ActivitiesToggle).unwrap())
        .await
        .unwrap_err();
    let waited = started.elapsed();

    assert!(matches!(err, TransportError::Timeout { .. }));
    assert!(waited >= limit, "returned before the timeout bound");
    assert!(waited < Duration::from_secs(3), "timeout not bounded: {waited:?}");
}

#[tokio::test]
async fn concurrent_sessions_get_their_own_replies() {
    // two invocations against two daemons at once; client-private return
    // addresses mean neither can steal the other's reply
    let (_dir_a, path_a) = scratch_socket("concurrent-a");
    let (_dir_b, path_b) = scratch_socket("concurrent-b");
    let daemon_a = testing::serve_once(&path_a, ReplyStatus::Ok);
    let daemon_b = testing::serve_once(&path_b, ReplyStatus::Failed);

    let session_a = IpcSession::connect(path_a).unwrap();
    let session_b = IpcSession::connect(path_b).unwrap();
    let req_a = Request::bare(CommandCode::VolumeUp).unwrap();
    let req_b = Request::bare(CommandCode::VolumeDown).unwrap();

    let (reply_a, reply_b) =
        tokio::join!(session_a.roundtrip(&req_a), session_b.roundtrip(&req_b));

    assert_eq!(reply_a.unwrap().status, ReplyStatus::Ok);
    assert_eq!(reply_b.unwrap().status, ReplyStatus::Failed);
    assert_eq!(daemon_a.join().unwrap(), req_a);
    assert_eq!(daemon_b.join().unwrap(), req_b);
}
