/// Errors returned by socket operations.
///
/// Every syscall variant keeps the raw `errno` reported by the OS, so callers
/// that used to inspect the numeric code can still do so via [`SocketError::errno`].
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    #[error("socket() failed: {}", errno_to_str(*.errno))]
    Create { errno: i32 },

    #[error("bind({addr}) failed: {}", errno_to_str(*.errno))]
    Bind { errno: i32, addr: String },

    #[error("listen(backlog={backlog}) failed: {}", errno_to_str(*.errno))]
    Listen { errno: i32, backlog: i32 },

    #[error("connect({addr}) failed: {}", errno_to_str(*.errno))]
    Connect { errno: i32, addr: String },

    #[error("accept() failed: {}", errno_to_str(*.errno))]
    Accept { errno: i32 },

    #[error("shutdown() failed: {}", errno_to_str(*.errno))]
    Shutdown { errno: i32 },

    #[error("read() failed: {}", errno_to_str(*.errno))]
    Read { errno: i32 },

    #[error("write() failed: {}", errno_to_str(*.errno))]
    Write { errno: i32 },

    #[error("close() failed: {}", errno_to_str(*.errno))]
    Close { errno: i32 },

    #[error("getpeername() failed: {}", errno_to_str(*.errno))]
    PeerName { errno: i32 },

    #[error("getsockname() failed: {}", errno_to_str(*.errno))]
    SockName { errno: i32 },

    #[error("fcntl({cmd}) failed: {}", errno_to_str(*.errno))]
    Fcntl { errno: i32, cmd: &'static str },

    #[error("setsockopt({option}) failed: {}", errno_to_str(*.errno))]
    SetOption { errno: i32, option: &'static str },

    #[error("getsockopt({option}) failed: {}", errno_to_str(*.errno))]
    GetOption { errno: i32, option: &'static str },
}

impl SocketError {
    /// Returns the raw OS error code behind this error.
    pub fn errno(&self) -> i32 {
        match self {
            SocketError::Create { errno }
            | SocketError::Bind { errno, .. }
            | SocketError::Listen { errno, .. }
            | SocketError::Connect { errno, .. }
            | SocketError::Accept { errno }
            | SocketError::Shutdown { errno }
            | SocketError::Read { errno }
            | SocketError::Write { errno }
            | SocketError::Close { errno }
            | SocketError::PeerName { errno }
            | SocketError::SockName { errno }
            | SocketError::Fcntl { errno, .. }
            | SocketError::SetOption { errno, .. }
            | SocketError::GetOption { errno, .. } => *errno,
        }
    }

    /// True when the call failed only because a non-blocking socket had nothing to do.
    pub fn is_would_block(&self) -> bool {
        let errno = self.errno();
        errno == libc::EAGAIN || errno == libc::EWOULDBLOCK
    }

    /// Returns the `std::io::ErrorKind` matching the OS code.
    pub fn kind(&self) -> std::io::ErrorKind {
        errno_to_kind(self.errno())
    }
}

pub type Result<T> = std::result::Result<T, SocketError>;

/// Returns current errno value.
#[inline]
pub fn errno() -> i32 {
    unsafe { *libc::__errno_location() }
}

/// Converts errno to human-readable string.
fn errno_to_str(errno: i32) -> String {
    match errno {
        libc::EACCES => "permission denied".into(),
        libc::EADDRINUSE => "address already in use".into(),
        libc::EADDRNOTAVAIL => "address not available".into(),
        libc::EAFNOSUPPORT => "address family not supported".into(),
        libc::EAGAIN => "resource temporarily unavailable".into(),
        libc::EBADF => "bad file descriptor".into(),
        libc::ECONNREFUSED => "connection refused".into(),
        libc::ECONNRESET => "connection reset by peer".into(),
        libc::EINPROGRESS => "operation in progress".into(),
        libc::EINTR => "interrupted by signal".into(),
        libc::EINVAL => "invalid argument".into(),
        libc::EMFILE => "too many open files".into(),
        libc::ENETUNREACH => "network unreachable".into(),
        libc::ENOBUFS => "no buffer space available".into(),
        libc::ENOPROTOOPT => "protocol not available".into(),
        libc::ENOTCONN => "not connected".into(),
        libc::ENOTSOCK => "not a socket".into(),
        libc::EOPNOTSUPP => "operation not supported".into(),
        libc::EPIPE => "broken pipe".into(),
        libc::ETIMEDOUT => "connection timed out".into(),
        _ => format!("errno {}", errno),
    }
}

/// Maps errno to std::io::ErrorKind.
fn errno_to_kind(errno: i32) -> std::io::ErrorKind {
    match errno {
        libc::EACCES | libc::EPERM => std::io::ErrorKind::PermissionDenied,
        libc::EADDRINUSE => std::io::ErrorKind::AddrInUse,
        libc::EADDRNOTAVAIL => std::io::ErrorKind::AddrNotAvailable,
        libc::EAGAIN => std::io::ErrorKind::WouldBlock,
        libc::ECONNREFUSED => std::io::ErrorKind::ConnectionRefused,
        libc::ECONNRESET => std::io::ErrorKind::ConnectionReset,
        libc::EINTR => std::io::ErrorKind::Interrupted,
        libc::EINVAL => std::io::ErrorKind::InvalidInput,
        libc::ENOTCONN => std::io::ErrorKind::NotConnected,
        libc::EPIPE => std::io::ErrorKind::BrokenPipe,
        libc::ETIMEDOUT => std::io::ErrorKind::TimedOut,
        _ => std::io::ErrorKind::Other,
    }
}

impl From<SocketError> for std::io::Error {
    fn from(err: SocketError) -> Self {
        std::io::Error::new(err.kind(), err)
    }
}
