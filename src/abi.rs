//! Kernel ABI records for the MPTCP telemetry and scheduling socket options.
//!
//! Every type in this module is a `#[repr(C)]` mirror of a record declared in
//! the mptcp.org v0.95 kernel headers (linux 4.19 base, `include/uapi/linux/tcp.h`
//! plus the scheduling-info patch). The kernel reads and writes these through
//! `getsockopt`/`setsockopt` at `SOL_TCP`, so field order, widths, and padding
//! must match the kernel's compiler-produced layout exactly — a mismatch is not
//! detectable at runtime and silently corrupts the exchange.
//!
//! This module is layout only: no syscalls, no projection logic. The tests at
//! the bottom pin sizes and the offsets of every field the rest of the crate
//! reads, so an edit that drifts from the pinned kernel version fails the test
//! suite instead of producing garbage telemetry.
//!
//! Rebasing onto a different kernel version is a one-module change: update the
//! declarations and option numbers here, nothing else.

use std::os::raw::c_int;

/// Maximum number of subflows any record in this ABI can describe.
///
/// Shared by the telemetry envelope and the outbound directive; the kernel
/// never enumerates past it. Fixed at build time.
pub const SUBFLOW_CAPACITY: usize = 32;

/// `getsockopt`/`setsockopt` option number for the MPTCP info envelope.
///
/// As `setsockopt` with an `int` payload, the same option number carries the
/// connection flags (see [`MPTCP_INFO_FLAG_SAVE_MASTER`]).
pub const MPTCP_INFO: c_int = 45;

/// `setsockopt` option number for the outbound scheduling directive.
///
/// Added by the user-controlled scheduler patch on top of mptcp.org v0.95.
pub const MPTCP_SCHED_INFO: c_int = 46;

/// Flag instructing the kernel to retain master-subflow bookkeeping for the
/// lifetime of the connection.
pub const MPTCP_INFO_FLAG_SAVE_MASTER: c_int = 0x01;

/// `tcpi_state` value for an established subflow (`TCP_ESTABLISHED`).
///
/// The first subflow slot whose state is anything else terminates the valid
/// prefix of the telemetry array; slots past it are kernel-uninitialized.
pub const TCP_ESTABLISHED: u8 = 1;

/// Per-subflow TCP telemetry (`struct tcp_info`, linux 4.19).
///
/// The kernel fills one of these per subflow slot, plus one for the initial
/// (master) subflow. Only a handful of fields are projected by this crate, but
/// the full declaration is required: the kernel copies `tcp_info_len` bytes per
/// slot, so a short struct would shear every slot after the first.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TcpInfo {
    pub tcpi_state: u8,
    pub tcpi_ca_state: u8,
    pub tcpi_retransmits: u8,
    pub tcpi_probes: u8,
    pub tcpi_backoff: u8,
    pub tcpi_options: u8,
    /// `snd_wscale : 4, rcv_wscale : 4` in the kernel declaration.
    pub tcpi_wscale: u8,
    /// `delivery_rate_app_limited : 1` in the kernel declaration.
    pub tcpi_delivery_rate_app_limited: u8,

    pub tcpi_rto: u32,
    pub tcpi_ato: u32,
    pub tcpi_snd_mss: u32,
    pub tcpi_rcv_mss: u32,

    pub tcpi_unacked: u32,
    pub tcpi_sacked: u32,
    pub tcpi_lost: u32,
    pub tcpi_retrans: u32,
    pub tcpi_fackets: u32,

    /* Times. */
    pub tcpi_last_data_sent: u32,
    pub tcpi_last_ack_sent: u32,
    pub tcpi_last_data_recv: u32,
    pub tcpi_last_ack_recv: u32,

    /* Metrics. */
    pub tcpi_pmtu: u32,
    pub tcpi_rcv_ssthresh: u32,
    pub tcpi_rtt: u32,
    pub tcpi_rttvar: u32,
    pub tcpi_snd_ssthresh: u32,
    pub tcpi_snd_cwnd: u32,
    pub tcpi_advmss: u32,
    pub tcpi_reordering: u32,

    pub tcpi_rcv_rtt: u32,
    pub tcpi_rcv_space: u32,

    pub tcpi_total_retrans: u32,

    pub tcpi_pacing_rate: u64,
    pub tcpi_max_pacing_rate: u64,
    pub tcpi_bytes_acked: u64,
    pub tcpi_bytes_received: u64,
    pub tcpi_segs_out: u32,
    pub tcpi_segs_in: u32,

    pub tcpi_notsent_bytes: u32,
    pub tcpi_min_rtt: u32,
    pub tcpi_data_segs_in: u32,
    pub tcpi_data_segs_out: u32,

    pub tcpi_delivery_rate: u64,

    pub tcpi_busy_time: u64,
    pub tcpi_rwnd_limited: u64,
    pub tcpi_sndbuf_limited: u64,

    pub tcpi_delivered: u32,
    pub tcpi_delivered_ce: u32,

    pub tcpi_bytes_sent: u64,
    pub tcpi_bytes_retrans: u64,
    pub tcpi_dsack_dups: u32,
    pub tcpi_reord_seen: u32,
}

/// Connection-wide MPTCP counters (`struct mptcp_meta_info`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MptcpMetaInfo {
    pub mptcpi_state: u8,
    pub mptcpi_retransmits: u8,
    pub mptcpi_probes: u8,
    pub mptcpi_backoff: u8,

    pub mptcpi_rto: u32,
    pub mptcpi_unacked: u32,

    /* Times. */
    pub mptcpi_last_data_sent: u32,
    pub mptcpi_last_data_recv: u32,
    pub mptcpi_last_ack_recv: u32,

    pub mptcpi_total_retrans: u32,

    pub mptcpi_bytes_acked: u64,
    pub mptcpi_bytes_received: u64,
}

/// Either address family of a subflow endpoint, as the kernel declares it
/// (an anonymous `sockaddr`/`sockaddr_in`/`sockaddr_in6` union).
///
/// Sized and aligned by `sockaddr_in6`; the `sockaddr` view is covered by the
/// `v4` variant's leading `sa_family_t`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union SubflowAddr {
    pub v4: libc::sockaddr_in,
    pub v6: libc::sockaddr_in6,
}

/// Per-subflow endpoint addresses (`struct mptcp_sub_info`).
///
/// Populated by the kernel alongside the `tcp_info` slots. Nothing in this
/// crate projects it, but the envelope must declare and provide the region or
/// the kernel rejects the call.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct MptcpSubInfo {
    pub src: SubflowAddr,
    pub dst: SubflowAddr,
}

/// Composite telemetry envelope (`struct mptcp_info`).
///
/// Caller-built descriptor handed to `getsockopt(SOL_TCP, MPTCP_INFO)`: the
/// five length fields declare the exact byte sizes of the regions behind the
/// four pointers, and the kernel populates those regions in one call. Every
/// pointer must target a live buffer of exactly the declared size for the
/// duration of the call.
#[repr(C)]
#[derive(Debug)]
pub struct MptcpInfo {
    /// Byte length of each `tcp_info` slot behind `subflows` (and `initial`).
    pub tcp_info_len: u32,
    /// Total byte length of the `subflows` region.
    pub sub_len: u32,
    /// Byte length of the region behind `meta_info`.
    pub meta_len: u32,
    /// Byte length of each `mptcp_sub_info` slot behind `subflow_info`.
    pub sub_info_len: u32,
    /// Total byte length of the `subflow_info` region.
    pub total_sub_info_len: u32,

    pub meta_info: *mut MptcpMetaInfo,
    pub initial: *mut TcpInfo,
    pub subflows: *mut TcpInfo,
    pub subflow_info: *mut MptcpSubInfo,
}

/// Outbound scheduling directive (`struct mptcp_sched_info`).
///
/// Handed to `setsockopt(SOL_TCP, MPTCP_SCHED_INFO)`. `len` declares how many
/// leading entries of the two arrays are meaningful; the kernel reads segment
/// budgets from `num_segments` and maintains `quota` itself, but both pointers
/// must target valid capacity-sized arrays.
#[repr(C)]
#[derive(Debug)]
pub struct MptcpSchedInfo {
    pub len: u8,
    pub quota: *mut u8,
    pub num_segments: *mut u8,
}
