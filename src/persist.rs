//! Connection priming: keep master-subflow state alive across subflow churn.

use std::os::fd::BorrowedFd;
use std::os::raw::c_int;

use crate::abi::{MPTCP_INFO, MPTCP_INFO_FLAG_SAVE_MASTER};
use crate::error::Result;
use crate::sockopt;

/// Flags the connection so the kernel retains master-subflow bookkeeping for
/// its whole lifetime.
///
/// Must run once per connection, before the first telemetry read that relies
/// on persisted master-subflow identity. Idempotent: repeat calls are safe
/// and change nothing after the first.
///
/// # Errors
///
/// Returns [`SockoptError::Set`](crate::SockoptError::Set) when the kernel
/// rejects the flag (handle closed, missing fork support).
pub fn persist_state(fd: BorrowedFd<'_>) -> Result<()> {
    let val: c_int = MPTCP_INFO_FLAG_SAVE_MASTER;
    // SAFETY: with an int-sized payload, MPTCP_INFO is the flags form of the
    // option; `val` is a plain c_int on the stack.
    unsafe { sockopt::set_tcp_opt(fd, MPTCP_INFO, "MPTCP_INFO", &val) }
}
