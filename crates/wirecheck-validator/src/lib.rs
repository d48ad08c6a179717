//! Payload self-validation wrappers for RPC clients, handlers and subscribers.
//!
//! Payloads that expose a [`Validate`](wirecheck_rpc::Validate) check through
//! [`Payload::validator`](wirecheck_rpc::Payload::validator) are checked at
//! every boundary they cross:
//!
//! | wrapper | checks |
//! |---|---|
//! | [`new_client_wrapper`] | call request + reply, stream request, published message |
//! | [`new_client_call_wrapper`] | request + reply of each call attempt |
//! | [`new_server_handler_wrapper`] | incoming request + outgoing reply |
//! | [`new_server_subscriber_wrapper`] | delivered message |
//!
//! A failed check replaces the outcome with an error built by the matching
//! [`Options`] strategy. Bad input maps to `400 Bad Request`, a bad reply from
//! an otherwise successful call maps to `502 Bad Gateway`. Payloads without
//! a validator pass through untouched.

pub mod capability;
pub mod client;
mod guard;
pub mod options;
pub mod server;

#[cfg(test)]
mod testing;

pub use capability::{check, Stage};
pub use client::{
    new_client_call_wrapper, new_client_wrapper, CallWrapper, ClientWrapper, ValidatingCall,
    ValidatingClient,
};
pub use options::{MessageErrorFn, Options, Override, RequestErrorFn};
pub use server::{
    new_server_handler_wrapper, new_server_subscriber_wrapper, HandlerWrapper, SubscriberWrapper,
    ValidatingHandler, ValidatingSubscriber,
};
