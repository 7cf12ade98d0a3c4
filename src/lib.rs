//! Platform socket layer.
//!
//! Upper layers talk to [`Socket`]; each platform network stack provides an
//! implementation ([`PosixSocket`] on unix) and [`socket()`] hands out the
//! one the build targets.

pub mod socket;
mod addr;
mod config;
mod error;

pub use self::error::{Result, SocketError, errno};
pub use self::addr::{Domain, SockAddr, SocketAddrV4, SocketAddrV6, format_sockaddr};
pub use self::config::SocketConfig;
pub use self::socket::{Protocol, Shutdown, SockType, Socket, socket, socket_with_config,
					   get_int_option, set_int_option, set_keepalive, set_linger,
					   set_recv_buffer_size, set_reuse_addr, set_send_buffer_size,
					   set_tcp_nodelay, take_error};
#[cfg(unix)]
pub use self::socket::PosixSocket;
