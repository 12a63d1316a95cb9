//! Handle wrapper tying the four operations to one caller-owned socket.

use std::os::fd::{AsFd, BorrowedFd};

use crate::directive::set_segment_budgets;
use crate::error::Result;
use crate::persist::persist_state;
use crate::telemetry::{meta_telemetry, subflow_telemetry, MetaTelemetry, SubflowTelemetry};

/// An established multipath connection, viewed through its socket handle.
///
/// Wraps anything that exposes a socket fd (`std::net::TcpStream`, a
/// `BorrowedFd`, an fd handed over by a host-runtime binding) and offers the
/// control-plane operations as methods. The wrapper never closes the fd;
/// ownership and lifetime stay with the caller, and the fd must remain a
/// valid, open connection for every call.
///
/// Calls are independent, synchronous, and unserialized: concurrent use of
/// the same underlying fd from several policy loops needs caller-side mutual
/// exclusion.
#[derive(Debug)]
pub struct MptcpConn<F: AsFd> {
    inner: F,
}

impl<F: AsFd> MptcpConn<F> {
    /// Wraps a caller-owned socket handle.
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    /// Returns the wrapped handle, dropping the wrapper.
    pub fn into_inner(self) -> F {
        self.inner
    }

    /// See [`persist_state`].
    ///
    /// # Errors
    ///
    /// Propagates the kernel rejection, if any.
    pub fn persist_state(&self) -> Result<()> {
        persist_state(self.inner.as_fd())
    }

    /// See [`meta_telemetry`].
    ///
    /// # Errors
    ///
    /// Propagates the kernel rejection, if any.
    pub fn meta_telemetry(&self) -> Result<MetaTelemetry> {
        meta_telemetry(self.inner.as_fd())
    }

    /// See [`subflow_telemetry`].
    ///
    /// # Errors
    ///
    /// Propagates the kernel rejection, if any.
    pub fn subflow_telemetry(&self) -> Result<Vec<SubflowTelemetry>> {
        subflow_telemetry(self.inner.as_fd())
    }

    /// See [`set_segment_budgets`].
    ///
    /// # Errors
    ///
    /// Propagates the capacity check or kernel rejection, if any.
    pub fn set_segment_budgets(&self, budgets: &[u8]) -> Result<()> {
        set_segment_budgets(self.inner.as_fd(), budgets)
    }
}

impl<F: AsFd> AsFd for MptcpConn<F> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.as_fd()
    }
}
