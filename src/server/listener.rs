//! Listener setup
//!
//! Binds the TCP listener through socket2 so `SO_REUSEADDR` can be set
//! before the bind; a dev server is restarted constantly and must not
//! trip over sockets lingering in TIME_WAIT.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a non-blocking listener on `addr`.
///
/// Any error here (port taken, permission denied, bad address family) is
/// fatal to startup; callers report it and exit before the banner prints.
pub fn bind(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Allow rebinding a port still in TIME_WAIT from the previous run
    socket.set_reuse_address(true)?;

    // Tokio requires the socket in non-blocking mode
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
