use std::net::{Ipv4Addr, Ipv6Addr};

/// Formats the IP part of a socket address as text.
///
/// IPv4 becomes dotted-decimal (`192.168.1.10`), IPv6 colon-hex (`fe80::1`,
/// `::ffff:192.0.2.1` for v4-mapped). Any other family gives an empty string.
pub fn format_sockaddr(storage: &libc::sockaddr_storage) -> String {
	match storage.ss_family as libc::c_int {
		libc::AF_INET => {
			let addr = unsafe { &*(storage as *const _ as *const libc::sockaddr_in) };
			// s_addr is network order, so its in-memory bytes are the octets
			Ipv4Addr::from(addr.sin_addr.s_addr.to_ne_bytes()).to_string()
		}
		libc::AF_INET6 => {
			let addr = unsafe { &*(storage as *const _ as *const libc::sockaddr_in6) };
			Ipv6Addr::from(addr.sin6_addr.s6_addr).to_string()
		}
		_ => String::new(),
	}
}
