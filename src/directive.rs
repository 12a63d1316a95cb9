//! Directive writes: per-subflow segment budgets for the kernel scheduler.

use std::os::fd::BorrowedFd;

use crate::abi::{MptcpSchedInfo, MPTCP_SCHED_INFO, SUBFLOW_CAPACITY};
use crate::error::{Result, SockoptError};
use crate::sockopt;
use crate::trace::debug;

/// Pushes one segment budget per subflow to the kernel scheduler.
///
/// `budgets[i]` bounds how many data segments the scheduler may assign to
/// subflow slot `i` (same slot order as
/// [`subflow_telemetry`](crate::subflow_telemetry) within one read cycle) in
/// the next scheduling interval. The directive's declared count equals
/// `budgets.len()`; entries beyond it are not transmitted. An empty slice is
/// a valid zero-length directive.
///
/// The directive's per-subflow quota is kernel-maintained bookkeeping: the
/// record hands the kernel a valid zeroed array for it, and no caller input
/// flows there.
///
/// Takes effect on future scheduling decisions only; segments already in
/// flight are unaffected.
///
/// # Errors
///
/// [`SockoptError::CapacityExceeded`] when `budgets` is longer than
/// [`SUBFLOW_CAPACITY`] (rejected before any kernel call), or
/// [`SockoptError::Set`] when the kernel rejects the directive.
pub fn set_segment_budgets(fd: BorrowedFd<'_>, budgets: &[u8]) -> Result<()> {
    if budgets.len() > SUBFLOW_CAPACITY {
        return Err(SockoptError::CapacityExceeded {
            supplied: budgets.len(),
            capacity: SUBFLOW_CAPACITY,
        });
    }

    let mut quota = [0u8; SUBFLOW_CAPACITY];
    let mut segments = [0u8; SUBFLOW_CAPACITY];
    segments[..budgets.len()].copy_from_slice(budgets);

    let directive = MptcpSchedInfo {
        len: budgets.len() as u8,
        quota: quota.as_mut_ptr(),
        num_segments: segments.as_mut_ptr(),
    };

    // SAFETY: both pointers target capacity-sized stack arrays that outlive
    // the call, and `len` never exceeds their length.
    unsafe { sockopt::set_tcp_opt(fd, MPTCP_SCHED_INFO, "MPTCP_SCHED_INFO", &directive)? };

    debug!("scheduling directive set for {} subflows", budgets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_budget_slice_is_rejected_before_the_kernel_call() {
        // One entry past capacity. The fd is never touched for this path, so
        // a plain loopback socket is enough.
        let budgets = [1u8; SUBFLOW_CAPACITY + 1];
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let stream = std::net::TcpStream::connect(listener.local_addr().unwrap()).unwrap();

        let err = set_segment_budgets(std::os::fd::AsFd::as_fd(&stream), &budgets).unwrap_err();
        assert!(matches!(
            err,
            SockoptError::CapacityExceeded {
                supplied,
                capacity: SUBFLOW_CAPACITY,
            } if supplied == SUBFLOW_CAPACITY + 1
        ));
    }
}
