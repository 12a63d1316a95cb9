//! Error type shared by every kernel-facing operation.

use std::io;

use thiserror::Error;

/// Result alias for socket-option operations.
pub type Result<T> = std::result::Result<T, SockoptError>;

/// Failure of a telemetry read or directive write.
///
/// Kernel-side failures carry the option name and the captured OS error
/// (`ENOPROTOOPT` on kernels without the mptcp.org fork options, `EBADF` for a
/// dead handle, and so on). No operation retries internally; retry policy
/// belongs to the caller.
#[derive(Debug, Error)]
pub enum SockoptError {
    /// `getsockopt` at `SOL_TCP` reported failure.
    #[error("getsockopt {opt} failed: {source}")]
    Get {
        opt: &'static str,
        source: io::Error,
    },
    /// `setsockopt` at `SOL_TCP` reported failure.
    #[error("setsockopt {opt} failed: {source}")]
    Set {
        opt: &'static str,
        source: io::Error,
    },
    /// More segment budgets supplied than any record in the ABI can carry.
    /// Rejected before any kernel call.
    #[error("{supplied} segment budgets exceed the subflow capacity {capacity}")]
    CapacityExceeded { supplied: usize, capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_option_name() {
        let err = SockoptError::Get {
            opt: "MPTCP_INFO",
            source: io::Error::from_raw_os_error(libc::ENOPROTOOPT),
        };
        let msg = err.to_string();
        assert!(msg.contains("getsockopt MPTCP_INFO"));
    }

    #[test]
    fn capacity_error_reports_both_sides() {
        let err = SockoptError::CapacityExceeded {
            supplied: 40,
            capacity: 32,
        };
        assert_eq!(
            err.to_string(),
            "40 segment budgets exceed the subflow capacity 32"
        );
    }
}
