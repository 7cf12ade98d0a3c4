use std::net::{Ipv4Addr, Ipv6Addr};

use socklane::{SockAddr, SocketAddrV4, SocketAddrV6, format_sockaddr};

#[test]
fn ipv4_text_parses_back_to_the_same_bytes() {
	let samples: [[u8; 4]; 7] = [
		[0, 0, 0, 0],
		[127, 0, 0, 1],
		[192, 168, 4, 1],
		[10, 255, 0, 9],
		[172, 16, 254, 3],
		[224, 0, 0, 251],
		[255, 255, 255, 255],
	];

	for ip in samples {
		let addr = SockAddr::from(SocketAddrV4::new(ip, 6053));
		let text = format_sockaddr(addr.as_storage());
		assert_eq!(text, Ipv4Addr::from(ip).to_string());

		let parsed: Ipv4Addr = text.parse().unwrap();
		assert_eq!(parsed.octets(), ip, "{text}");
	}
}

#[test]
fn ipv6_text_parses_back_to_the_same_bytes() {
	let samples = [
		"::",
		"::1",
		"fe80::1",
		"2001:db8::ff00:42:8329",
		"2001:db8:85a3:8d3:1319:8a2e:370:7348",
		"::ffff:192.0.2.128",
		"ff02::fb",
	];

	for sample in samples {
		let ip: Ipv6Addr = sample.parse().unwrap();
		let addr = SockAddr::from(SocketAddrV6::new(ip.octets(), 80));
		let text = format_sockaddr(addr.as_storage());
		assert_eq!(text, sample);

		let parsed: Ipv6Addr = text.parse().unwrap();
		assert_eq!(parsed.octets(), ip.octets(), "{text}");
	}
}

#[test]
fn unsupported_families_format_as_empty() {
	for family in [libc::AF_UNSPEC, libc::AF_UNIX, libc::AF_PACKET] {
		let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
		storage.ss_family = family as libc::sa_family_t;
		assert_eq!(format_sockaddr(&storage), "", "family {family}");
	}
}

#[test]
fn port_is_not_part_of_the_formatted_address() {
	let addr = SockAddr::from(SocketAddrV4::localhost(8080));
	assert_eq!(addr.to_string_lossy(), "127.0.0.1");
	assert_eq!(addr.port(), Some(8080));
	assert_eq!(addr.to_string(), "127.0.0.1:8080");
}

#[test]
fn std_addresses_convert() {
	let addr = SockAddr::from("[2001:db8::1]:443".parse::<std::net::SocketAddr>().unwrap());
	assert_eq!(addr.family() as libc::c_int, libc::AF_INET6);
	assert_eq!(addr.to_string_lossy(), "2001:db8::1");
	assert_eq!(addr.port(), Some(443));
}
