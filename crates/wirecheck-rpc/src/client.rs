use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;
use crate::message::{Message, Request, RequestInfo};
use crate::payload::Payload;

/// Per-call options resolved by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    /// Explicit node addresses; empty means resolve through discovery.
    pub address: Vec<String>,
    /// Timeout for each attempt.
    pub request_timeout: Duration,
    /// Attempts after the first one fails.
    pub retries: u32,
    /// Overrides the request's content type when set.
    pub content_type: Option<String>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            address: Vec::new(),
            request_timeout: Duration::from_secs(5),
            retries: 1,
            content_type: None,
        }
    }
}

/// Per-publish options resolved by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Publish the encoded payload without an envelope.
    pub body_only: bool,
    /// Broker exchange to publish through, if not the default.
    pub exchange: Option<String>,
}

/// An open bidirectional stream of encoded frames.
pub trait Stream {
    /// The request that opened this stream.
    fn info(&self) -> &RequestInfo;

    fn send(&mut self, frame: Bytes) -> Result<()>;

    fn recv(&mut self) -> Result<Bytes>;

    fn close(&mut self) -> Result<()>;
}

/// Outbound side of the runtime: unary calls, streams and publishes.
pub trait Client {
    type Stream: Stream;

    /// Make a unary call, decoding the reply into `rsp`.
    fn call<Req, Rsp>(
        &self,
        ctx: &Context,
        req: &Request<Req>,
        rsp: &mut Rsp,
        opts: &CallOptions,
    ) -> Result<()>
    where
        Req: Payload + Serialize,
        Rsp: Payload + DeserializeOwned;

    /// Open a stream, sending `req` as the first frame.
    fn stream<Req>(&self, ctx: &Context, req: &Request<Req>, opts: &CallOptions) -> Result<Self::Stream>
    where
        Req: Payload + Serialize;

    /// Fire-and-forget publish to `msg.topic()`.
    fn publish<P>(&self, ctx: &Context, msg: &Message<P>, opts: &PublishOptions) -> Result<()>
    where
        P: Payload + Serialize;
}

/// A single call attempt against a resolved node address.
///
/// Runtimes that support per-attempt middleware route every unary call
/// through one of these.
pub trait CallFunc<Req, Rsp> {
    fn call(
        &self,
        ctx: &Context,
        addr: &str,
        req: &Request<Req>,
        rsp: &mut Rsp,
        opts: &CallOptions,
    ) -> Result<()>;
}

/// [`CallFunc`] backed by a closure. See [`call_fn`].
#[derive(Clone)]
pub struct CallFn<F> {
    f: F,
}

/// Wrap a closure as a [`CallFunc`].
pub fn call_fn<Req, Rsp, F>(f: F) -> CallFn<F>
where
    F: Fn(&Context, &str, &Request<Req>, &mut Rsp, &CallOptions) -> Result<()>,
{
    CallFn { f }
}

impl<Req, Rsp, F> CallFunc<Req, Rsp> for CallFn<F>
where
    F: Fn(&Context, &str, &Request<Req>, &mut Rsp, &CallOptions) -> Result<()>,
{
    fn call(
        &self,
        ctx: &Context,
        addr: &str,
        req: &Request<Req>,
        rsp: &mut Rsp,
        opts: &CallOptions,
    ) -> Result<()> {
        (self.f)(ctx, addr, req, rsp, opts)
    }
}
