use std::sync::Arc;

use wirecheck_rpc::{Context, Handler, Message, Payload, Request, Result, Subscriber, Wrapper};

use crate::capability::Stage;
use crate::guard::{guard_message, guard_unary, Side};
use crate::options::{Options, Override};

/// Wraps request handlers so bodies and replies are validated.
#[derive(Debug, Clone, Default)]
pub struct HandlerWrapper {
    options: Arc<Options>,
}

/// Build a [`HandlerWrapper`] from default error mappings plus `overrides`.
pub fn new_server_handler_wrapper<I>(overrides: I) -> HandlerWrapper
where
    I: IntoIterator<Item = Override>,
{
    HandlerWrapper::with_options(Options::new(overrides))
}

impl HandlerWrapper {
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<H> Wrapper<H> for HandlerWrapper {
    type Output = ValidatingHandler<H>;

    fn wrap(&self, inner: H) -> ValidatingHandler<H> {
        ValidatingHandler {
            inner,
            options: Arc::clone(&self.options),
        }
    }
}

/// A [`Handler`] that rejects invalid requests before the wrapped handler
/// runs and invalid replies after it succeeds.
#[derive(Debug, Clone)]
pub struct ValidatingHandler<H> {
    inner: H,
    options: Arc<Options>,
}

impl<H> ValidatingHandler<H> {
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<Req, Rsp, H> Handler<Req, Rsp> for ValidatingHandler<H>
where
    Req: Payload,
    Rsp: Payload,
    H: Handler<Req, Rsp>,
{
    fn handle(&self, ctx: &Context, req: &Request<Req>, rsp: &mut Rsp) -> Result<()> {
        guard_unary(
            Side::Server,
            self.options.server_error_fn(),
            req,
            rsp,
            |rsp| self.inner.handle(ctx, req, rsp),
        )
    }
}

/// Wraps subscribers so delivered payloads are validated.
#[derive(Debug, Clone, Default)]
pub struct SubscriberWrapper {
    options: Arc<Options>,
}

/// Build a [`SubscriberWrapper`] from default error mappings plus `overrides`.
pub fn new_server_subscriber_wrapper<I>(overrides: I) -> SubscriberWrapper
where
    I: IntoIterator<Item = Override>,
{
    SubscriberWrapper::with_options(Options::new(overrides))
}

impl SubscriberWrapper {
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<S> Wrapper<S> for SubscriberWrapper {
    type Output = ValidatingSubscriber<S>;

    fn wrap(&self, inner: S) -> ValidatingSubscriber<S> {
        ValidatingSubscriber {
            inner,
            options: Arc::clone(&self.options),
        }
    }
}

/// A [`Subscriber`] that drops invalid messages before dispatch.
#[derive(Debug, Clone)]
pub struct ValidatingSubscriber<S> {
    inner: S,
    options: Arc<Options>,
}

impl<S> ValidatingSubscriber<S> {
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<P, S> Subscriber<P> for ValidatingSubscriber<S>
where
    P: Payload,
    S: Subscriber<P>,
{
    fn handle(&self, ctx: &Context, msg: &Message<P>) -> Result<()> {
        guard_message(Stage::Subscribe, self.options.subscribe_error_fn(), msg)?;
        self.inner.handle(ctx, msg)
    }
}
