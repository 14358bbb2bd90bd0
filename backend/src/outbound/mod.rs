//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local player storage behind the `UserStore` port.
//!
//! Adapters translate between the port contract and their backing structure
//! and contain no gacha rules.

pub mod memory;
