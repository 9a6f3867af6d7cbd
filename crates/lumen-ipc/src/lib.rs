pub mod command_tree;
pub mod proto;

// datagram IPC is linux-only for now: the client return address lives in the
// abstract socket namespace, which other unixes don't have
#[cfg(target_os = "linux")]
pub mod transport;

#[cfg(target_os = "linux")]
pub mod testing;
