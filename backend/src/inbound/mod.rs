//! Inbound adapters that translate external requests into driving-port
//! calls while keeping framework details at the edge.
//!
//! - [`http`]: REST endpoints and health probes.
//! - [`ws`]: the WebSocket protocol with per-session outbound queues.

pub mod http;
pub mod ws;
