/// IPv4 socket address (IP + port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketAddrV4 {
	ip: [u8; 4],
	port: u16,
}

impl SocketAddrV4 {
	/// Creates a new IPv4 address.
	pub fn new(ip: [u8; 4], port: u16) -> Self {
		Self { ip, port }
	}

	/// Creates from an IP tuple and port.
	/// Example: `SocketAddrV4::from((192, 168, 1, 1), 8080)`
	pub fn from(ip: (u8, u8, u8, u8), port: u16) -> Self {
		Self {
			ip: [ip.0, ip.1, ip.2, ip.3],
			port,
		}
	}

	/// `0.0.0.0:port`, the usual bind address for a server.
	pub fn any(port: u16) -> Self {
		Self::new([0; 4], port)
	}

	/// `127.0.0.1:port`.
	pub fn localhost(port: u16) -> Self {
		Self::new([127, 0, 0, 1], port)
	}

	/// Returns the IP bytes.
	pub fn ip(&self) -> [u8; 4] {
		self.ip
	}

	/// Returns the port.
	pub fn port(&self) -> u16 {
		self.port
	}

	pub(crate) fn from_raw(raw: &libc::sockaddr_in) -> Self {
		Self {
			ip: raw.sin_addr.s_addr.to_ne_bytes(),
			port: u16::from_be(raw.sin_port),
		}
	}

	/// Converts to the raw sockaddr_in for syscalls.
	pub(crate) fn to_raw(&self) -> libc::sockaddr_in {
		// s_addr is already network order, so the bytes go in unchanged
		let mut raw: libc::sockaddr_in = unsafe { std::mem::zeroed() };
		raw.sin_family = libc::AF_INET as libc::sa_family_t;
		raw.sin_port = self.port.to_be();
		raw.sin_addr = libc::in_addr { s_addr: u32::from_ne_bytes(self.ip) };
		raw
	}
}

/*
sockaddr_in on the wire side of the syscall:
  - sin_family: AF_INET
  - sin_port:   big-endian port
  - sin_addr:   4 address bytes, network order
  - sin_zero:   padding, left zeroed
*/
