//! The syscall seam: raw `getsockopt`/`setsockopt` at `SOL_TCP`.
//!
//! The MPTCP options carry caller-defined nested records (with embedded
//! pointers and region lengths), which no typed socket-option API covers, so
//! this module goes through `libc` directly. It is the only module in the
//! crate that issues syscalls; everything above it works with plain values.

use std::io;
use std::mem::size_of;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::os::raw::{c_int, c_void};

use crate::error::{Result, SockoptError};
use crate::trace::trace;

/// Issues `getsockopt(fd, SOL_TCP, opt_name)` into `val`.
///
/// # Safety
///
/// `T` must be the exact `#[repr(C)]` record the kernel expects for
/// `opt_name`. If `T` embeds pointers (the MPTCP info envelope does), the
/// caller must ensure each one targets a live buffer of the declared length
/// for the duration of the call.
pub(crate) unsafe fn get_tcp_opt<T>(
    fd: BorrowedFd<'_>,
    opt_name: c_int,
    opt: &'static str,
    val: &mut T,
) -> Result<()> {
    let mut len = size_of::<T>() as libc::socklen_t;
    let rc = unsafe {
        libc::getsockopt(
            fd.as_raw_fd(),
            libc::SOL_TCP,
            opt_name,
            (val as *mut T).cast::<c_void>(),
            &mut len,
        )
    };
    if rc != 0 {
        return Err(SockoptError::Get {
            opt,
            source: io::Error::last_os_error(),
        });
    }
    trace!("getsockopt {} ok ({} bytes)", opt, len);
    Ok(())
}

/// Issues `setsockopt(fd, SOL_TCP, opt_name)` from `val`.
///
/// # Safety
///
/// Same contract as [`get_tcp_opt`]: `T` must match the kernel's expected
/// record for `opt_name`, and any embedded pointers must target live buffers
/// for the duration of the call.
pub(crate) unsafe fn set_tcp_opt<T>(
    fd: BorrowedFd<'_>,
    opt_name: c_int,
    opt: &'static str,
    val: &T,
) -> Result<()> {
    let rc = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            libc::SOL_TCP,
            opt_name,
            (val as *const T).cast::<c_void>(),
            size_of::<T>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(SockoptError::Set {
            opt,
            source: io::Error::last_os_error(),
        });
    }
    trace!("setsockopt {} ok ({} bytes)", opt, size_of::<T>());
    Ok(())
}
