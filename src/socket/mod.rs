mod options;
#[cfg(unix)]
mod posix;

pub use self::options::{get_int_option, set_int_option, set_keepalive, set_linger,
						set_recv_buffer_size, set_reuse_addr, set_send_buffer_size,
						set_tcp_nodelay, take_error};
#[cfg(unix)]
pub use self::posix::PosixSocket;

use crate::addr::{Domain, SockAddr, format_sockaddr};
use crate::config::SocketConfig;
use crate::error::Result;

/// The operations upper layers (web server, API server) need from a socket.
///
/// One implementation per platform network stack. Each method hands its
/// arguments to the stack and relays what comes back; nothing is retried,
/// buffered or reinterpreted.
pub trait Socket: Send + std::fmt::Debug {
	/// Accepts a pending connection, returning it with the peer's address.
	///
	/// The returned socket owns the new handle.
	fn accept(&self) -> Result<(Box<dyn Socket>, SockAddr)>;

	fn bind(&self, addr: &SockAddr) -> Result<()>;

	/// Releases the handle. Only the first call reaches the OS; later calls
	/// fail with `EBADF`.
	fn close(&mut self) -> Result<()>;

	fn connect(&self, addr: &SockAddr) -> Result<()>;

	/// Connects by host name.
	///
	/// Not implemented: always returns `Ok(())` without connecting.
	fn connect_host(&self, address: &str) -> Result<()>;

	fn shutdown(&self, how: Shutdown) -> Result<()>;

	/// Address of the connected peer (`getpeername`).
	fn peer_addr(&self) -> Result<SockAddr>;

	/// Peer IP as text, or an empty string if it can't be determined.
	fn peer_addr_string(&self) -> String {
		match self.peer_addr() {
			Ok(addr) => format_sockaddr(addr.as_storage()),
			Err(_) => String::new(),
		}
	}

	/// Address this socket is bound to (`getsockname`).
	fn local_addr(&self) -> Result<SockAddr>;

	/// Local IP as text, or an empty string if it can't be determined.
	fn local_addr_string(&self) -> String {
		match self.local_addr() {
			Ok(addr) => format_sockaddr(addr.as_storage()),
			Err(_) => String::new(),
		}
	}

	/// Reads an option into `value`, returning the length the OS wrote.
	fn getsockopt(&self, level: libc::c_int, name: libc::c_int, value: &mut [u8]) -> Result<usize>;

	fn setsockopt(&self, level: libc::c_int, name: libc::c_int, value: &[u8]) -> Result<()>;

	fn listen(&self, backlog: i32) -> Result<()>;

	fn read(&self, buf: &mut [u8]) -> Result<usize>;

	fn write(&self, buf: &[u8]) -> Result<usize>;

	/// Switches the socket to non-blocking mode.
	///
	/// Unless the socket was created with
	/// [`SocketConfig::honor_blocking_flag`], `blocking` is ignored and the
	/// socket always ends up non-blocking.
	fn set_blocking(&self, blocking: bool) -> Result<()>;
}

/// Socket type (`SOCK_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SockType(libc::c_int);

impl SockType {
	/// Reliable, ordered byte stream (TCP-like).
	pub const STREAM: SockType = SockType(libc::SOCK_STREAM);
	/// Unreliable packets with boundaries (UDP-like).
	pub const DATAGRAM: SockType = SockType(libc::SOCK_DGRAM);

	#[inline]
	pub fn raw(self) -> libc::c_int {
		self.0
	}
}

impl From<libc::c_int> for SockType {
	fn from(raw: libc::c_int) -> Self {
		SockType(raw)
	}
}

/// Protocol number (`IPPROTO_*`); `DEFAULT` lets the OS pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protocol(libc::c_int);

impl Protocol {
	pub const DEFAULT: Protocol = Protocol(0);
	pub const TCP: Protocol = Protocol(libc::IPPROTO_TCP);
	pub const UDP: Protocol = Protocol(libc::IPPROTO_UDP);

	#[inline]
	pub fn raw(self) -> libc::c_int {
		self.0
	}
}

impl From<libc::c_int> for Protocol {
	fn from(raw: libc::c_int) -> Self {
		Protocol(raw)
	}
}

/// Which half of a connection `shutdown` closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
	Read,      // SHUT_RD
	Write,     // SHUT_WR
	ReadWrite, // SHUT_RDWR
}

impl Shutdown {
	#[inline]
	pub fn raw(self) -> libc::c_int {
		match self {
			Shutdown::Read => libc::SHUT_RD,
			Shutdown::Write => libc::SHUT_WR,
			Shutdown::ReadWrite => libc::SHUT_RDWR,
		}
	}
}

/// Creates a socket for the platform's network stack.
#[cfg(unix)]
pub fn socket(domain: Domain, ty: SockType, protocol: Protocol) -> Result<Box<dyn Socket>> {
	socket_with_config(domain, ty, protocol, SocketConfig::default())
}

/// Like [`socket`], with explicit configuration.
#[cfg(unix)]
pub fn socket_with_config(
	domain: Domain,
	ty: SockType,
	protocol: Protocol,
	config: SocketConfig,
) -> Result<Box<dyn Socket>> {
	Ok(Box::new(PosixSocket::new(domain, ty, protocol, config)?))
}

/*
Backends are picked at build time: PosixSocket behind cfg(unix). A
constrained network stack would be another `impl Socket` behind its own
cfg, and socket_with_config would box that instead. Callers only ever
see Box<dyn Socket>.
*/
