//! Interactive explorer for Prometheus exposition endpoints.
//!
//! The `prom` module holds the parsing and query core; `cli`, `logging`, and
//! `interactive` are the thin shells around it.

pub mod cli;
pub mod interactive;
pub mod logging;
pub mod prom;
