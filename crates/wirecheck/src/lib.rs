//! Self-validating payloads for request/response and pub/sub messaging.
//!
//! Payload types opt in to validation by implementing
//! [`rpc::Validate`] and returning themselves from
//! [`rpc::Payload::validator`]. Wrapping a client, handler or subscriber
//! with the matching [`validator`] factory then rejects invalid payloads
//! before they reach the transport or application code.
//!
//! # Crate Structure
//!
//! - [`rpc`]: Payload contract, envelopes and client/server traits
//! - [`validator`]: Validation wrappers and error mapping (behind `validator` feature)

/// Re-export rpc types.
pub mod rpc {
    pub use wirecheck_rpc::*;
}

/// Re-export validator types (requires `validator` feature).
#[cfg(feature = "validator")]
pub mod validator {
    pub use wirecheck_validator::*;
}
