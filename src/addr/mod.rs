//! Address families and socket address storage.
//!
//! - `Domain` — the family passed to `socket()`
//! - `SockAddr` — family-tagged `sockaddr_storage`, what the syscalls read and fill
//! - `SocketAddrV4` / `SocketAddrV6` — typed views of an IPv4 / IPv6 address
//! - `format_sockaddr` — storage to text

mod format;
mod ipv4;
mod ipv6;
pub use self::format::format_sockaddr;
pub use self::ipv4::SocketAddrV4;
pub use self::ipv6::SocketAddrV6;

use std::mem::size_of;

/// Address family of a socket (`AF_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Domain(libc::c_int);

impl Domain {
	/// Internet Protocol version 4 (`AF_INET`).
	pub const IPV4: Domain = Domain(libc::AF_INET);
	/// Internet Protocol version 6 (`AF_INET6`).
	pub const IPV6: Domain = Domain(libc::AF_INET6);
	/// Unix domain sockets (`AF_UNIX`).
	pub const UNIX: Domain = Domain(libc::AF_UNIX);

	/// Returns the libc constant for this address family.
	#[inline]
	pub fn raw(self) -> libc::c_int {
		self.0
	}
}

impl From<libc::c_int> for Domain {
	fn from(raw: libc::c_int) -> Self {
		Domain(raw)
	}
}

/// A generic socket address: `sockaddr_storage` plus the length the OS reported.
///
/// Large enough for any family; the `ss_family` tag says which one it holds.
#[derive(Clone, Copy)]
pub struct SockAddr {
	storage: libc::sockaddr_storage,
	len: libc::socklen_t,
}

impl SockAddr {
	/// An all-zero address with the full storage length, ready to be filled by the OS.
	pub fn zeroed() -> Self {
		Self {
			storage: unsafe { std::mem::zeroed() },
			len: size_of::<libc::sockaddr_storage>() as libc::socklen_t,
		}
	}

	/// Wraps storage filled in elsewhere. `len` is clamped to the storage size.
	pub fn from_storage(storage: libc::sockaddr_storage, len: libc::socklen_t) -> Self {
		let max = size_of::<libc::sockaddr_storage>() as libc::socklen_t;
		Self { storage, len: len.min(max) }
	}

	/// Returns the family tag (`AF_INET`, `AF_INET6`, ...).
	#[inline]
	pub fn family(&self) -> libc::sa_family_t {
		self.storage.ss_family
	}

	/// Returns the meaningful length of the address.
	#[inline]
	pub fn len(&self) -> libc::socklen_t {
		self.len
	}

	#[inline]
	pub fn as_storage(&self) -> &libc::sockaddr_storage {
		&self.storage
	}

	#[inline]
	pub fn as_ptr(&self) -> *const libc::sockaddr {
		&self.storage as *const _ as *const libc::sockaddr
	}

	/// Pointer and length slot for syscalls that write an address back
	/// (`accept`, `getpeername`, `getsockname`).
	pub(crate) fn as_out_parts(&mut self) -> (*mut libc::sockaddr, *mut libc::socklen_t) {
		(&mut self.storage as *mut _ as *mut libc::sockaddr, &mut self.len)
	}

	/// Decodes an IPv4 address, if that is what this holds.
	pub fn as_v4(&self) -> Option<SocketAddrV4> {
		if self.family() as libc::c_int != libc::AF_INET
			|| (self.len as usize) < size_of::<libc::sockaddr_in>()
		{
			return None;
		}
		let raw = unsafe { &*(self.as_ptr() as *const libc::sockaddr_in) };
		Some(SocketAddrV4::from_raw(raw))
	}

	/// Decodes an IPv6 address, if that is what this holds.
	pub fn as_v6(&self) -> Option<SocketAddrV6> {
		if self.family() as libc::c_int != libc::AF_INET6
			|| (self.len as usize) < size_of::<libc::sockaddr_in6>()
		{
			return None;
		}
		let raw = unsafe { &*(self.as_ptr() as *const libc::sockaddr_in6) };
		Some(SocketAddrV6::from_raw(raw))
	}

	/// Port number for IPv4/IPv6 addresses.
	pub fn port(&self) -> Option<u16> {
		self.as_v4()
			.map(|a| a.port())
			.or_else(|| self.as_v6().map(|a| a.port()))
	}

	/// Textual IP address, or an empty string for anything that isn't IPv4/IPv6.
	pub fn to_string_lossy(&self) -> String {
		format_sockaddr(&self.storage)
	}

	/// Copies a concrete `sockaddr_*` into fresh storage.
	fn from_raw<T>(raw: T) -> Self {
		debug_assert!(size_of::<T>() <= size_of::<libc::sockaddr_storage>());
		let mut out = Self::zeroed();
		unsafe {
			std::ptr::write(&mut out.storage as *mut _ as *mut T, raw);
		}
		out.len = size_of::<T>() as libc::socklen_t;
		out
	}
}

impl From<SocketAddrV4> for SockAddr {
	fn from(addr: SocketAddrV4) -> Self {
		Self::from_raw(addr.to_raw())
	}
}

impl From<SocketAddrV6> for SockAddr {
	fn from(addr: SocketAddrV6) -> Self {
		Self::from_raw(addr.to_raw())
	}
}

impl From<std::net::SocketAddr> for SockAddr {
	fn from(addr: std::net::SocketAddr) -> Self {
		match addr {
			std::net::SocketAddr::V4(a) => SocketAddrV4::new(a.ip().octets(), a.port()).into(),
			std::net::SocketAddr::V6(a) => {
				SocketAddrV6::with_scope(a.ip().octets(), a.port(), a.scope_id()).into()
			}
		}
	}
}

impl std::fmt::Display for SockAddr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match (self.as_v4(), self.as_v6()) {
			(Some(a), _) => write!(f, "{}:{}", self.to_string_lossy(), a.port()),
			(_, Some(a)) => write!(f, "[{}]:{}", self.to_string_lossy(), a.port()),
			_ => write!(f, "<family {}>", self.family()),
		}
	}
}

// sockaddr_storage only implements Debug with libc's extra_traits feature.
impl std::fmt::Debug for SockAddr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SockAddr")
			.field("family", &self.family())
			.field("len", &self.len)
			.field("addr", &format_args!("{}", self))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn v4_conversion_sets_family_and_length() {
		let addr = SockAddr::from(SocketAddrV4::new([10, 0, 0, 7], 6053));
		assert_eq!(addr.family() as libc::c_int, libc::AF_INET);
		assert_eq!(addr.len() as usize, size_of::<libc::sockaddr_in>());
		assert_eq!(addr.as_v4(), Some(SocketAddrV4::new([10, 0, 0, 7], 6053)));
		assert_eq!(addr.as_v6(), None);
		assert_eq!(addr.to_string(), "10.0.0.7:6053");
	}

	#[test]
	fn v6_keeps_scope_id() {
		let mut ip = [0u8; 16];
		ip[0] = 0xfe;
		ip[1] = 0x80;
		ip[15] = 1;
		let addr = SockAddr::from(SocketAddrV6::with_scope(ip, 80, 3));
		let back = addr.as_v6().unwrap();
		assert_eq!(back.scope_id(), 3);
		assert_eq!(addr.port(), Some(80));
		assert_eq!(addr.to_string(), "[fe80::1]:80");
	}

	#[test]
	fn std_socket_addr_converts() {
		let std_addr: std::net::SocketAddr = "192.168.4.1:80".parse().unwrap();
		let addr = SockAddr::from(std_addr);
		assert_eq!(addr.as_v4(), Some(SocketAddrV4::from((192, 168, 4, 1), 80)));
	}

	#[test]
	fn short_length_refuses_decode() {
		let addr = SockAddr::from(SocketAddrV4::new([1, 2, 3, 4], 1));
		let truncated = SockAddr::from_storage(*addr.as_storage(), 4);
		assert_eq!(truncated.as_v4(), None);
		assert_eq!(truncated.port(), None);
	}

	#[test]
	fn zeroed_is_unspecified_family_with_full_length() {
		let addr = SockAddr::zeroed();
		assert_eq!(addr.family() as libc::c_int, libc::AF_UNSPEC);
		assert_eq!(addr.len() as usize, size_of::<libc::sockaddr_storage>());
		assert_eq!(addr.to_string_lossy(), "");
	}
}
