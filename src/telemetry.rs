//! Telemetry reads: connection-wide counters and per-subflow snapshots.
//!
//! Both operations issue the same `getsockopt(SOL_TCP, MPTCP_INFO)` call with
//! a freshly built envelope and differ only in which fields they project. The
//! envelope and its backing buffers are stack-scoped: allocated immediately
//! before the call, length fields set from `size_of` every time (never reused),
//! discarded once the projection is copied out.

use std::mem::{self, size_of};
use std::os::fd::BorrowedFd;

use crate::abi::{
    MptcpInfo, MptcpMetaInfo, MptcpSubInfo, TcpInfo, MPTCP_INFO, SUBFLOW_CAPACITY, TCP_ESTABLISHED,
};
use crate::error::Result;
use crate::sockopt;
use crate::trace::debug;

/// Aggregate counters for the whole multipath connection.
///
/// An independent snapshot; reading again produces a fresh copy, never an
/// update of a previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaTelemetry {
    /// Segments sent and not yet acknowledged, connection-wide.
    pub unacked: u32,
    /// Segments retransmitted, connection-wide.
    pub retransmits: u32,
}

/// Snapshot of one established subflow.
///
/// Ordering is stable within a single read, but slot `i` carries no identity
/// across reads — the kernel may reorder or reassign subflow slots between
/// calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubflowTelemetry {
    /// Total segments transmitted on this subflow.
    pub segs_out: u32,
    /// Smoothed round-trip time estimate, in microseconds.
    pub rtt: u32,
    /// Congestion window, in segments.
    pub snd_cwnd: u32,
}

/// What one `MPTCP_INFO` call leaves behind, copied out of the envelope's
/// backing buffers.
struct InfoSnapshot {
    meta: MptcpMetaInfo,
    subflows: [TcpInfo; SUBFLOW_CAPACITY],
}

/// Builds a zeroed envelope over fresh stack buffers and asks the kernel to
/// populate it.
fn read_info(fd: BorrowedFd<'_>) -> Result<InfoSnapshot> {
    // All four records are plain-old-data in the kernel ABI; all-zero is a
    // valid (empty) value for each.
    let mut meta: MptcpMetaInfo = unsafe { mem::zeroed() };
    let mut initial: TcpInfo = unsafe { mem::zeroed() };
    let mut subflows: [TcpInfo; SUBFLOW_CAPACITY] = unsafe { mem::zeroed() };
    let mut sub_info: [MptcpSubInfo; SUBFLOW_CAPACITY] = unsafe { mem::zeroed() };

    let mut envelope = MptcpInfo {
        tcp_info_len: size_of::<TcpInfo>() as u32,
        sub_len: size_of::<[TcpInfo; SUBFLOW_CAPACITY]>() as u32,
        meta_len: size_of::<MptcpMetaInfo>() as u32,
        sub_info_len: size_of::<MptcpSubInfo>() as u32,
        total_sub_info_len: size_of::<[MptcpSubInfo; SUBFLOW_CAPACITY]>() as u32,
        meta_info: &mut meta,
        initial: &mut initial,
        subflows: subflows.as_mut_ptr(),
        subflow_info: sub_info.as_mut_ptr(),
    };

    // SAFETY: every pointer in the envelope targets a live stack buffer whose
    // declared length equals its actual byte size, and all buffers outlive
    // the call.
    unsafe { sockopt::get_tcp_opt(fd, MPTCP_INFO, "MPTCP_INFO", &mut envelope)? };

    Ok(InfoSnapshot { meta, subflows })
}

/// Reads the connection-wide unacked and retransmit counters.
///
/// # Errors
///
/// Returns [`SockoptError::Get`](crate::SockoptError::Get) when the kernel
/// rejects the call (handle not multipath-capable, handle closed, missing
/// fork support).
pub fn meta_telemetry(fd: BorrowedFd<'_>) -> Result<MetaTelemetry> {
    let snapshot = read_info(fd)?;
    let meta = MetaTelemetry {
        unacked: snapshot.meta.mptcpi_unacked,
        retransmits: u32::from(snapshot.meta.mptcpi_retransmits),
    };
    debug!(
        "meta telemetry: unacked={} retransmits={}",
        meta.unacked, meta.retransmits
    );
    Ok(meta)
}

/// Reads the per-subflow snapshots for every currently established subflow.
///
/// Returns the established prefix of the kernel's fixed-capacity subflow
/// array, in kernel slot order. An empty result means zero established
/// subflows and is success, not an error.
///
/// # Errors
///
/// Returns [`SockoptError::Get`](crate::SockoptError::Get) when the kernel
/// rejects the call.
pub fn subflow_telemetry(fd: BorrowedFd<'_>) -> Result<Vec<SubflowTelemetry>> {
    let snapshot = read_info(fd)?;
    let subflows = established_prefix(&snapshot.subflows);
    debug!("subflow telemetry: {} established", subflows.len());
    Ok(subflows)
}

/// Projects the established prefix out of a kernel-populated subflow array.
///
/// The kernel marks live slots with `TCP_ESTABLISHED` and is permitted to
/// leave everything from the first non-established slot onward uninitialized,
/// so the scan must stop there and never look past it.
fn established_prefix(subflows: &[TcpInfo]) -> Vec<SubflowTelemetry> {
    subflows
        .iter()
        .take_while(|slot| slot.tcpi_state == TCP_ESTABLISHED)
        .map(|slot| SubflowTelemetry {
            segs_out: slot.tcpi_segs_out,
            rtt: slot.tcpi_rtt,
            snd_cwnd: slot.tcpi_snd_cwnd,
        })
        .collect()
}
