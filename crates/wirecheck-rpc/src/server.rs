use crate::context::Context;
use crate::error::Result;
use crate::message::{Message, Request};

/// Serves one request/response endpoint.
pub trait Handler<Req, Rsp> {
    /// Handle `req`, writing the reply into `rsp`.
    fn handle(&self, ctx: &Context, req: &Request<Req>, rsp: &mut Rsp) -> Result<()>;
}

/// Consumes messages delivered on a subscribed topic.
pub trait Subscriber<P> {
    fn handle(&self, ctx: &Context, msg: &Message<P>) -> Result<()>;
}

/// [`Handler`] backed by a closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Handler`].
pub fn handler_fn<Req, Rsp, F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Context, &Request<Req>, &mut Rsp) -> Result<()>,
{
    HandlerFn { f }
}

impl<Req, Rsp, F> Handler<Req, Rsp> for HandlerFn<F>
where
    F: Fn(&Context, &Request<Req>, &mut Rsp) -> Result<()>,
{
    fn handle(&self, ctx: &Context, req: &Request<Req>, rsp: &mut Rsp) -> Result<()> {
        (self.f)(ctx, req, rsp)
    }
}

/// [`Subscriber`] backed by a closure. See [`subscriber_fn`].
#[derive(Clone)]
pub struct SubscriberFn<F> {
    f: F,
}

/// Wrap a closure as a [`Subscriber`].
pub fn subscriber_fn<P, F>(f: F) -> SubscriberFn<F>
where
    F: Fn(&Context, &Message<P>) -> Result<()>,
{
    SubscriberFn { f }
}

impl<P, F> Subscriber<P> for SubscriberFn<F>
where
    F: Fn(&Context, &Message<P>) -> Result<()>,
{
    fn handle(&self, ctx: &Context, msg: &Message<P>) -> Result<()> {
        (self.f)(ctx, msg)
    }
}
