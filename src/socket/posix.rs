use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use crate::addr::{Domain, SockAddr};
use crate::config::SocketConfig;
use crate::error::{Result, SocketError, errno};
use super::{Protocol, Shutdown, SockType, Socket};

/// A socket backed by a POSIX file descriptor.
///
/// Owns the descriptor exclusively. It is released exactly once: by
/// [`Socket::close`], or on drop if close was never called.
#[derive(Debug)]
pub struct PosixSocket {
	/// `None` once closed.
	fd: Option<OwnedFd>,
	config: SocketConfig,
}

impl PosixSocket {
	/// Calls `socket()` and wraps the new descriptor.
	///
	/// With `config.cloexec` the descriptor is created with `SOCK_CLOEXEC`.
	pub fn new(domain: Domain, ty: SockType, protocol: Protocol, config: SocketConfig) -> Result<Self> {
		let mut raw_ty = ty.raw();
		if config.cloexec {
			raw_ty |= libc::SOCK_CLOEXEC;
		}

		let fd = unsafe { libc::socket(domain.raw(), raw_ty, protocol.raw()) };
		if fd == -1 {
			let errno = errno();
			tracing::trace!(domain = domain.raw(), ty = ty.raw(), errno, "socket() failed");
			return Err(SocketError::Create { errno });
		}
		tracing::trace!(fd, domain = domain.raw(), ty = ty.raw(), "socket created");

		let fd = unsafe { OwnedFd::from_raw_fd(fd) };
		Ok(Self::from_fd(fd, config))
	}

	/// Wraps a descriptor that is already open. Takes ownership of it.
	pub fn from_fd(fd: OwnedFd, config: SocketConfig) -> Self {
		Self { fd: Some(fd), config }
	}

	/// Returns the raw file descriptor, or -1 once closed.
	///
	/// Used for syscalls; a closed socket makes them fail with `EBADF`.
	#[inline]
	fn raw_fd(&self) -> libc::c_int {
		self.fd.as_ref().map_or(-1, |fd| fd.as_raw_fd())
	}

	#[inline]
	pub fn is_closed(&self) -> bool {
		self.fd.is_none()
	}

	/// Reports whether `O_NONBLOCK` is currently set.
	pub fn is_nonblocking(&self) -> Result<bool> {
		let flags = unsafe { libc::fcntl(self.raw_fd(), libc::F_GETFL) };
		if flags == -1 {
			return Err(SocketError::Fcntl { errno: errno(), cmd: "F_GETFL" });
		}
		Ok(flags & libc::O_NONBLOCK != 0)
	}

	/// getpeername / getsockname share everything but the call itself.
	fn query_addr(
		&self,
		call: unsafe extern "C" fn(libc::c_int, *mut libc::sockaddr, *mut libc::socklen_t) -> libc::c_int,
		to_error: fn(i32) -> SocketError,
	) -> Result<SockAddr> {
		let mut addr = SockAddr::zeroed();
		let (ptr, len) = addr.as_out_parts();
		let result = unsafe { call(self.raw_fd(), ptr, len) };
		if result == -1 {
			return Err(to_error(errno()));
		}
		Ok(addr)
	}
}

impl Socket for PosixSocket {
	fn accept(&self) -> Result<(Box<dyn Socket>, SockAddr)> {
		let mut addr = SockAddr::zeroed();
		let (ptr, len) = addr.as_out_parts();
		let flags = if self.config.cloexec { libc::SOCK_CLOEXEC } else { 0 };

		let fd = unsafe { libc::accept4(self.raw_fd(), ptr, len, flags) };
		if fd == -1 {
			let errno = errno();
			tracing::trace!(fd = self.raw_fd(), errno, "accept() failed");
			return Err(SocketError::Accept { errno });
		}
		tracing::trace!(listener = self.raw_fd(), fd, peer = %addr, "connection accepted");

		// The accepted descriptor gets its own owner; the listener keeps its own.
		let fd = unsafe { OwnedFd::from_raw_fd(fd) };
		Ok((Box::new(PosixSocket::from_fd(fd, self.config)), addr))
	}

	fn bind(&self, addr: &SockAddr) -> Result<()> {
		let result = unsafe { libc::bind(self.raw_fd(), addr.as_ptr(), addr.len()) };
		if result == -1 {
			return Err(SocketError::Bind { errno: errno(), addr: addr.to_string() });
		}
		Ok(())
	}

	fn close(&mut self) -> Result<()> {
		let Some(fd) = self.fd.take() else {
			return Err(SocketError::Close { errno: libc::EBADF });
		};
		let raw = fd.into_raw_fd();
		let result = unsafe { libc::close(raw) };
		if result == -1 {
			// The descriptor is gone either way; Linux never leaves it open after close().
			let errno = errno();
			tracing::trace!(fd = raw, errno, "close() failed");
			return Err(SocketError::Close { errno });
		}
		tracing::trace!(fd = raw, "socket closed");
		Ok(())
	}

	fn connect(&self, addr: &SockAddr) -> Result<()> {
		let result = unsafe { libc::connect(self.raw_fd(), addr.as_ptr(), addr.len()) };
		if result == -1 {
			return Err(SocketError::Connect { errno: errno(), addr: addr.to_string() });
		}
		Ok(())
	}

	fn connect_host(&self, address: &str) -> Result<()> {
		// TODO: resolve `address` and connect to the first reachable result.
		tracing::debug!(fd = self.raw_fd(), address, "connect by host name is not implemented");
		Ok(())
	}

	fn shutdown(&self, how: Shutdown) -> Result<()> {
		let result = unsafe { libc::shutdown(self.raw_fd(), how.raw()) };
		if result == -1 {
			return Err(SocketError::Shutdown { errno: errno() });
		}
		Ok(())
	}

	fn peer_addr(&self) -> Result<SockAddr> {
		self.query_addr(libc::getpeername, |errno| SocketError::PeerName { errno })
	}

	fn local_addr(&self) -> Result<SockAddr> {
		self.query_addr(libc::getsockname, |errno| SocketError::SockName { errno })
	}

	fn getsockopt(&self, level: libc::c_int, name: libc::c_int, value: &mut [u8]) -> Result<usize> {
		let mut len = value.len() as libc::socklen_t;
		let result = unsafe {
			libc::getsockopt(
				self.raw_fd(),
				level,
				name,
				value.as_mut_ptr() as *mut libc::c_void,
				&mut len,
			)
		};
		if result == -1 {
			return Err(SocketError::GetOption { errno: errno(), option: option_name(level, name) });
		}
		Ok(len as usize)
	}

	fn setsockopt(&self, level: libc::c_int, name: libc::c_int, value: &[u8]) -> Result<()> {
		let result = unsafe {
			libc::setsockopt(
				self.raw_fd(),
				level,
				name,
				value.as_ptr() as *const libc::c_void,
				value.len() as libc::socklen_t,
			)
		};
		if result == -1 {
			return Err(SocketError::SetOption { errno: errno(), option: option_name(level, name) });
		}
		Ok(())
	}

	fn listen(&self, backlog: i32) -> Result<()> {
		let result = unsafe { libc::listen(self.raw_fd(), backlog) };
		if result == -1 {
			return Err(SocketError::Listen { errno: errno(), backlog });
		}
		Ok(())
	}

	fn read(&self, buf: &mut [u8]) -> Result<usize> {
		let n = unsafe {
			libc::read(
				self.raw_fd(),
				buf.as_mut_ptr() as *mut libc::c_void,
				buf.len(),
			)
		};

		if n == -1 {
			Err(SocketError::Read { errno: errno() })
		} else {
			Ok(n as usize)
		}
	}

	fn write(&self, buf: &[u8]) -> Result<usize> {
		let n = unsafe {
			libc::write(
				self.raw_fd(),
				buf.as_ptr() as *const libc::c_void,
				buf.len(),
			)
		};

		if n == -1 {
			Err(SocketError::Write { errno: errno() })
		} else {
			Ok(n as usize)
		}
	}

	fn set_blocking(&self, blocking: bool) -> Result<()> {
		let flags = unsafe { libc::fcntl(self.raw_fd(), libc::F_GETFL) };
		if flags == -1 {
			return Err(SocketError::Fcntl { errno: errno(), cmd: "F_GETFL" });
		}

		let new_flags = if blocking && self.config.honor_blocking_flag {
			flags & !libc::O_NONBLOCK
		} else {
			if blocking {
				tracing::debug!(fd = self.raw_fd(), "blocking mode requested, socket left non-blocking");
			}
			flags | libc::O_NONBLOCK
		};

		let result = unsafe { libc::fcntl(self.raw_fd(), libc::F_SETFL, new_flags) };
		if result == -1 {
			return Err(SocketError::Fcntl { errno: errno(), cmd: "F_SETFL" });
		}
		Ok(())
	}
}

/// Name of a well-known option for error messages.
fn option_name(level: libc::c_int, name: libc::c_int) -> &'static str {
	match (level, name) {
		(libc::SOL_SOCKET, libc::SO_REUSEADDR) => "SO_REUSEADDR",
		(libc::SOL_SOCKET, libc::SO_KEEPALIVE) => "SO_KEEPALIVE",
		(libc::SOL_SOCKET, libc::SO_RCVBUF) => "SO_RCVBUF",
		(libc::SOL_SOCKET, libc::SO_SNDBUF) => "SO_SNDBUF",
		(libc::SOL_SOCKET, libc::SO_LINGER) => "SO_LINGER",
		(libc::SOL_SOCKET, libc::SO_ERROR) => "SO_ERROR",
		(libc::IPPROTO_TCP, libc::TCP_NODELAY) => "TCP_NODELAY",
		_ => "socket option",
	}
}

impl AsRawFd for PosixSocket {
	fn as_raw_fd(&self) -> RawFd {
		self.raw_fd()
	}
}

impl IntoRawFd for PosixSocket {
	fn into_raw_fd(mut self) -> RawFd {
		self.fd.take().map_or(-1, IntoRawFd::into_raw_fd)
	}
}

impl std::io::Read for PosixSocket {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		Socket::read(self, buf).map_err(Into::into)
	}
}

impl std::io::Write for PosixSocket {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		Socket::write(self, buf).map_err(Into::into)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(()) // nothing buffered at this level
	}
}
