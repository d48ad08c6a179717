//! Client, server and payload contracts for request/response and pub/sub messaging.
//!
//! This is the narrow seam between application payloads, the messaging
//! runtime and any middleware wrapped around it:
//! - [`Payload`] and [`Validate`]: the opt-in self-check contract for bodies
//! - [`Request`], [`Message`], [`Context`]: what flows through a call
//! - [`Client`], [`CallFunc`], [`Handler`], [`Subscriber`]: the call shapes
//! - [`Wrapper`]: how middleware attaches to any of them
//!
//! Transport, codecs and service discovery live elsewhere. Everything in
//! `wirecheck` builds on the types provided here.

pub mod client;
pub mod context;
pub mod error;
pub mod message;
pub mod payload;
pub mod server;
pub mod wrapper;

pub use client::{call_fn, CallFn, CallFunc, CallOptions, Client, PublishOptions, Stream};
pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use message::{Message, MessageInfo, Request, RequestInfo};
pub use payload::{Payload, Validate, ValidationError};
pub use server::{handler_fn, subscriber_fn, Handler, HandlerFn, Subscriber, SubscriberFn};
pub use wrapper::Wrapper;
