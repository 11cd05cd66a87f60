//! The multi-table lobby and its HTTP/WebSocket front door. Ambient glue,
//! not rule logic: everything a `Casino` touches is either bookkeeping
//! (which seats are open) or message routing (channel <-> WebSocket frame).
//! The engine itself never depends on this module.
mod casino;
mod server;

pub use casino::{Casino, TableSummary};
pub use server::Server;
