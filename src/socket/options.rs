use std::mem::size_of;

use crate::error::Result;
use super::Socket;

/// Sets an `int`-valued option.
pub fn set_int_option<S: Socket + ?Sized>(
	socket: &S,
	level: libc::c_int,
	name: libc::c_int,
	value: libc::c_int,
) -> Result<()> {
	socket.setsockopt(level, name, &value.to_ne_bytes())
}

/// Reads an `int`-valued option.
pub fn get_int_option<S: Socket + ?Sized>(
	socket: &S,
	level: libc::c_int,
	name: libc::c_int,
) -> Result<libc::c_int> {
	let mut buf = [0u8; size_of::<libc::c_int>()];
	socket.getsockopt(level, name, &mut buf)?;
	Ok(libc::c_int::from_ne_bytes(buf))
}

/// Sets SO_REUSEADDR on a socket.
///
/// Allows binding to an address that's in TIME_WAIT state.
/// Essential for server restarts.
pub fn set_reuse_addr<S: Socket + ?Sized>(socket: &S, enable: bool) -> Result<()> {
	set_int_option(socket, libc::SOL_SOCKET, libc::SO_REUSEADDR, enable as libc::c_int)
}

/// Sets TCP_NODELAY on a socket.
///
/// Disables Nagle's algorithm, so small API frames go out immediately.
pub fn set_tcp_nodelay<S: Socket + ?Sized>(socket: &S, enable: bool) -> Result<()> {
	set_int_option(socket, libc::IPPROTO_TCP, libc::TCP_NODELAY, enable as libc::c_int)
}

/// Enables TCP keep-alive (SO_KEEPALIVE).
pub fn set_keepalive<S: Socket + ?Sized>(socket: &S, enable: bool) -> Result<()> {
	set_int_option(socket, libc::SOL_SOCKET, libc::SO_KEEPALIVE, enable as libc::c_int)
}

/// Sets receive buffer size (SO_RCVBUF).
///
/// Kernel typically doubles this value internally.
pub fn set_recv_buffer_size<S: Socket + ?Sized>(socket: &S, size: usize) -> Result<()> {
	set_int_option(socket, libc::SOL_SOCKET, libc::SO_RCVBUF, size as libc::c_int)
}

/// Sets send buffer size (SO_SNDBUF).
pub fn set_send_buffer_size<S: Socket + ?Sized>(socket: &S, size: usize) -> Result<()> {
	set_int_option(socket, libc::SOL_SOCKET, libc::SO_SNDBUF, size as libc::c_int)
}

/// Sets socket linger behavior (SO_LINGER).
///
/// - `None` — close returns immediately, kernel sends remaining data in background
/// - `Some(0)` — hard reset (RST), unsent data discarded
/// - `Some(n)` — close blocks up to n seconds waiting for data to send
pub fn set_linger<S: Socket + ?Sized>(socket: &S, linger: Option<u32>) -> Result<()> {
	let val = match linger {
		None => libc::linger { l_onoff: 0, l_linger: 0 },
		Some(seconds) => libc::linger {
			l_onoff: 1,
			l_linger: seconds as libc::c_int,
		},
	};
	let bytes = unsafe {
		std::slice::from_raw_parts(&val as *const _ as *const u8, size_of::<libc::linger>())
	};
	socket.setsockopt(libc::SOL_SOCKET, libc::SO_LINGER, bytes)
}

/// Reads and clears the pending socket error (SO_ERROR).
///
/// `None` means no error is pending. After a non-blocking connect becomes
/// writable, this is where its outcome shows up.
pub fn take_error<S: Socket + ?Sized>(socket: &S) -> Result<Option<i32>> {
	let err = get_int_option(socket, libc::SOL_SOCKET, libc::SO_ERROR)?;
	Ok((err != 0).then_some(err))
}
