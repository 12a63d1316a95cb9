//! Control-plane bridge to the mptcp.org fork kernel's MPTCP scheduler.
//!
//! A user-space multipath scheduling policy drives the kernel through three
//! socket-option operations on an established MPTCP connection:
//!
//! - [`persist_state`] — one-shot priming so master-subflow bookkeeping
//!   survives subflow churn (run it before the first telemetry read);
//! - [`meta_telemetry`] / [`subflow_telemetry`] — snapshot reads of
//!   connection-wide counters and per-subflow (segments-out, RTT, congestion
//!   window) triples via `getsockopt(SOL_TCP, MPTCP_INFO)`;
//! - [`set_segment_budgets`] — per-subflow segment budgets for the kernel
//!   scheduler via `setsockopt(SOL_TCP, MPTCP_SCHED_INFO)`.
//!
//! The policy itself (how budgets are computed from telemetry) lives outside
//! this crate; so does the socket's lifecycle. Operations borrow the fd and
//! never close it.
//!
//! The kernel ABI records behind these calls are pinned, field for field, in
//! [`abi`]; everything else is projection and error handling. Linux only, and
//! the options themselves exist only on mptcp.org fork kernels — on stock
//! kernels every operation surfaces a [`SockoptError`] with `ENOPROTOOPT`.
//!
//! # Example
//!
//! ```no_run
//! use std::net::TcpStream;
//! use mpsched::MptcpConn;
//!
//! # fn main() -> mpsched::Result<()> {
//! let sock = TcpStream::connect("10.0.0.1:5201").expect("connect");
//! let conn = MptcpConn::new(sock);
//! conn.persist_state()?;
//!
//! loop {
//!     let subflows = conn.subflow_telemetry()?;
//!     // ... policy decides a budget per subflow ...
//!     let budgets: Vec<u8> = subflows.iter().map(|_| 8).collect();
//!     conn.set_segment_budgets(&budgets)?;
//! }
//! # }
//! ```

pub mod abi;
mod conn;
mod directive;
mod error;
mod persist;
mod sockopt;
mod telemetry;
mod trace;

pub use conn::MptcpConn;
pub use directive::set_segment_budgets;
pub use error::{Result, SockoptError};
pub use persist::persist_state;
pub use telemetry::{meta_telemetry, subflow_telemetry, MetaTelemetry, SubflowTelemetry};
pub use trace::init_tracing;
