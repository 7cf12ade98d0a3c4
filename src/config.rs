/// Per-socket behaviour switches, copied into every socket `accept` produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocketConfig {
	/// Create and accept descriptors with `SOCK_CLOEXEC` (default: true).
	pub cloexec: bool,
	/// Let `set_blocking(true)` clear `O_NONBLOCK` (default: false).
	///
	/// Off, `set_blocking` makes the socket non-blocking whatever it is
	/// asked for, which is what existing callers were written against.
	pub honor_blocking_flag: bool,
}

impl Default for SocketConfig {
	fn default() -> Self {
		Self {
			cloexec: true,
			honor_blocking_flag: false,
		}
	}
}

impl SocketConfig {
	/// Default configuration with `honor_blocking_flag` turned on.
	pub fn honoring_blocking_flag() -> Self {
		Self {
			honor_blocking_flag: true,
			..Self::default()
		}
	}
}
