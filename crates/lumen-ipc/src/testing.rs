//! Test-support fakes for the daemon side of the protocol.
//!
//! The real daemon is a separate project; tests here only need something
//! that owns the well-known socket path and speaks the wire format. Plain
//! blocking std sockets on a thread keep these helpers independent of the
//! client's async runtime.

use std::{
    os::unix::net::UnixDatagram,
    path::Path,
    thread::JoinHandle,
    time::Duration,
};

use crate::proto::{MAX_WIRE_LEN, Reply, ReplyStatus, Request};

/// Guard for a read timeout generous enough that a lost datagram fails a
/// test instead of wedging the whole suite.
const ACCEPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bind `path` and answer exactly one request with `status`.
///
/// Joins to the decoded request so tests can assert what actually crossed
/// the wire.
///
/// # Panics
/// Panics (failing the test) on socket errors or a malformed request.
#[must_use]
pub fn serve_once(path: &Path, status: ReplyStatus) -> JoinHandle<Request> {
    let socket = UnixDatagram::bind(path).expect("bind fake daemon socket");
    socket
        .set_read_timeout(Some(ACCEPT_TIMEOUT))
        .expect("set read timeout");
    std::thread::spawn(move || {
        let mut buf = [0u8; 2 * MAX_WIRE_LEN];
        let (n, sender) = socket.recv_from(&mut buf).expect("receive request");
        let request = Request::decode(&buf[..n]).expect("well-formed request");
        socket
            .send_to_addr(&Reply::new(status).encode(), &sender)
            .expect("send reply");
        request
    })
}

/// Bind `path` but never reply. The returned socket keeps the endpoint
/// alive; dropping it closes the path's receive queue.
///
/// # Panics
/// Panics on bind failure.
#[must_use]
pub fn bind_mute(path: &Path) -> UnixDatagram {
    UnixDatagram::bind(path).expect("bind mute daemon socket")
}
