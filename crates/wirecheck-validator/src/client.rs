use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wirecheck_rpc::{
    CallFunc, CallOptions, Client, Context, Message, Payload, PublishOptions, Request, Result,
    Wrapper,
};

use crate::capability::Stage;
use crate::guard::{guard_message, guard_request, guard_unary, Side};
use crate::options::{Options, Override};

/// Wraps whole clients so every call, stream and publish is validated.
#[derive(Debug, Clone, Default)]
pub struct ClientWrapper {
    options: Arc<Options>,
}

/// Build a [`ClientWrapper`] from default error mappings plus `overrides`.
pub fn new_client_wrapper<I>(overrides: I) -> ClientWrapper
where
    I: IntoIterator<Item = Override>,
{
    ClientWrapper::with_options(Options::new(overrides))
}

impl ClientWrapper {
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<C: Client> Wrapper<C> for ClientWrapper {
    type Output = ValidatingClient<C>;

    fn wrap(&self, inner: C) -> ValidatingClient<C> {
        ValidatingClient {
            inner,
            options: Arc::clone(&self.options),
        }
    }
}

/// A [`Client`] that validates payloads around the wrapped client.
#[derive(Debug, Clone)]
pub struct ValidatingClient<C> {
    inner: C,
    options: Arc<Options>,
}

impl<C> ValidatingClient<C> {
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Client> Client for ValidatingClient<C> {
    type Stream = C::Stream;

    fn call<Req, Rsp>(
        &self,
        ctx: &Context,
        req: &Request<Req>,
        rsp: &mut Rsp,
        opts: &CallOptions,
    ) -> Result<()>
    where
        Req: Payload + Serialize,
        Rsp: Payload + DeserializeOwned,
    {
        guard_unary(
            Side::Client,
            self.options.client_error_fn(),
            req,
            rsp,
            |rsp| self.inner.call(ctx, req, rsp, opts),
        )
    }

    fn stream<Req>(&self, ctx: &Context, req: &Request<Req>, opts: &CallOptions) -> Result<C::Stream>
    where
        Req: Payload + Serialize,
    {
        // A stream has no single reply to check; only the opening request is.
        guard_request(Side::Client, self.options.client_error_fn(), req)?;
        self.inner.stream(ctx, req, opts)
    }

    fn publish<P>(&self, ctx: &Context, msg: &Message<P>, opts: &PublishOptions) -> Result<()>
    where
        P: Payload + Serialize,
    {
        guard_message(Stage::Publish, self.options.publish_error_fn(), msg)?;
        self.inner.publish(ctx, msg, opts)
    }
}

/// Wraps per-attempt call functions for runtimes with call-level middleware.
#[derive(Debug, Clone, Default)]
pub struct CallWrapper {
    options: Arc<Options>,
}

/// Build a [`CallWrapper`] from default error mappings plus `overrides`.
pub fn new_client_call_wrapper<I>(overrides: I) -> CallWrapper
where
    I: IntoIterator<Item = Override>,
{
    CallWrapper::with_options(Options::new(overrides))
}

impl CallWrapper {
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<F> Wrapper<F> for CallWrapper {
    type Output = ValidatingCall<F>;

    fn wrap(&self, inner: F) -> ValidatingCall<F> {
        ValidatingCall {
            inner,
            options: Arc::clone(&self.options),
        }
    }
}

/// A [`CallFunc`] that validates the request and reply of each attempt.
#[derive(Debug, Clone)]
pub struct ValidatingCall<F> {
    inner: F,
    options: Arc<Options>,
}

impl<Req, Rsp, F> CallFunc<Req, Rsp> for ValidatingCall<F>
where
    Req: Payload,
    Rsp: Payload,
    F: CallFunc<Req, Rsp>,
{
    fn call(
        &self,
        ctx: &Context,
        addr: &str,
        req: &Request<Req>,
        rsp: &mut Rsp,
        opts: &CallOptions,
    ) -> Result<()> {
        guard_unary(
            Side::Client,
            self.options.client_error_fn(),
            req,
            rsp,
            |rsp| self.inner.call(ctx, addr, req, rsp, opts),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use bytes::Bytes;
    use wirecheck_rpc::error::{BAD_GATEWAY, BAD_REQUEST, TIMEOUT};
    use wirecheck_rpc::{call_fn, Error, Stream};

    use super::*;
    use crate::testing::{Hello, Plain, RecordingClient};

    fn ctx() -> Context {
        Context::background()
    }

    #[test]
    fn call_rejects_invalid_request_without_calling() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying("world"));
        let req = Request::new("helloworld", "Greeter.Hello", Hello::new(""));
        let mut rsp = Hello::default();

        let err = client
            .call(&ctx(), &req, &mut rsp, &CallOptions::default())
            .expect_err("empty name should be rejected");
        assert_eq!(err.code, BAD_REQUEST);
        assert_eq!(err.id, "helloworld");
        assert_eq!(err.detail, "name: is empty");
        assert_eq!(client.inner().calls.get(), 0);
        assert_eq!(rsp, Hello::default());
    }

    #[test]
    fn call_rejects_invalid_response_as_bad_gateway() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying(""));
        let req = Request::new("helloworld", "Greeter.Hello", Hello::new("test"));
        let mut rsp = Hello::new("placeholder");

        let err = client
            .call(&ctx(), &req, &mut rsp, &CallOptions::default())
            .expect_err("empty reply should be rejected");
        assert_eq!(err.code, BAD_GATEWAY);
        assert_eq!(err.id, "helloworld");
        assert_eq!(client.inner().calls.get(), 1);
        // The decoded reply is left where the caller can see it.
        assert_eq!(rsp, Hello::new(""));
    }

    #[test]
    fn call_passes_valid_payloads_through() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying("world"));
        let req = Request::new("helloworld", "Greeter.Hello", Hello::new("test"));
        let mut rsp = Hello::default();

        client
            .call(&ctx(), &req, &mut rsp, &CallOptions::default())
            .expect("valid call should succeed");
        assert_eq!(rsp, Hello::new("world"));
        assert_eq!(client.inner().calls.get(), 1);
    }

    #[test]
    fn call_without_capability_is_untouched() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying(""));
        let req = Request::new("helloworld", "Greeter.Hello", Plain::default());
        let mut rsp = Plain::default();

        client
            .call(&ctx(), &req, &mut rsp, &CallOptions::default())
            .expect("payloads without validators should pass");
        assert_eq!(client.inner().calls.get(), 1);
    }

    #[test]
    fn call_error_skips_response_check() {
        let upstream = Error::timeout("helloworld", "deadline exceeded");
        let client = new_client_wrapper([]).wrap(RecordingClient::failing(upstream.clone()));
        let req = Request::new("helloworld", "Greeter.Hello", Hello::new("test"));
        // Would fail validation if it were checked.
        let mut rsp = Hello::default();

        let err = client
            .call(&ctx(), &req, &mut rsp, &CallOptions::default())
            .expect_err("upstream error should propagate");
        assert_eq!(err, upstream);
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn stream_checks_request_only() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying(""));

        let bad = Request::new("chat", "Chat.Stream", Hello::new("")).streaming();
        let err = client
            .stream(&ctx(), &bad, &CallOptions::default())
            .expect_err("invalid stream request should be rejected");
        assert_eq!(err.code, BAD_REQUEST);
        assert_eq!(err.id, "chat");
        assert_eq!(client.inner().streams.get(), 0);

        let good = Request::new("chat", "Chat.Stream", Hello::new("hi")).streaming();
        let mut stream = client
            .stream(&ctx(), &good, &CallOptions::default())
            .expect("valid stream request should open");
        assert_eq!(client.inner().streams.get(), 1);
        assert_eq!(stream.info().endpoint, "Chat.Stream");

        let first = stream.recv().expect("first frame should be the request");
        assert_eq!(first.as_ref(), br#"{"name":"hi"}"#);
        stream
            .send(Bytes::from_static(b"ping"))
            .expect("send should succeed");
        assert_eq!(stream.recv().expect("echo").as_ref(), b"ping");
        stream.close().expect("close should succeed");
        assert!(stream.closed);
    }

    #[test]
    fn publish_rejects_invalid_payload_by_topic() {
        let client = new_client_wrapper([]).wrap(RecordingClient::replying("x"));

        let err = client
            .publish(
                &ctx(),
                &Message::new("greetings", Hello::new("")),
                &PublishOptions::default(),
            )
            .expect_err("invalid message should not be published");
        assert_eq!(err.code, BAD_REQUEST);
        assert_eq!(err.id, "greetings");
        assert_eq!(client.inner().publishes.get(), 0);

        client
            .publish(
                &ctx(),
                &Message::new("greetings", Hello::new("test")),
                &PublishOptions::default(),
            )
            .expect("valid message should publish");
        assert_eq!(client.inner().publishes.get(), 1);
    }

    #[test]
    fn client_override_changes_call_mapping_only() {
        let wrapper = new_client_wrapper([Override::client_error(|info, _, rsp, err| {
            let code = if rsp.is_some() { 599 } else { 499 };
            Error::new(format!("{}/{}", info.service, info.endpoint), code, err)
        })]);
        let client = wrapper.wrap(RecordingClient::replying(""));

        let req = Request::new("helloworld", "Greeter.Hello", Hello::new(""));
        let err = client
            .call(&ctx(), &req, &mut Hello::default(), &CallOptions::default())
            .expect_err("request should be rejected");
        assert_eq!(err.code, 499);
        assert_eq!(err.id, "helloworld/Greeter.Hello");

        let req = Request::new("helloworld", "Greeter.Hello", Hello::new("test"));
        let err = client
            .call(&ctx(), &req, &mut Hello::default(), &CallOptions::default())
            .expect_err("reply should be rejected");
        assert_eq!(err.code, 599);

        let err = client
            .publish(
                &ctx(),
                &Message::new("greetings", Hello::new("")),
                &PublishOptions::default(),
            )
            .expect_err("publish keeps default mapping");
        assert_eq!(err.code, BAD_REQUEST);
        assert_eq!(err.id, "greetings");
    }

    #[test]
    fn client_override_sees_rejected_request_and_reply() {
        let wrapper = new_client_wrapper([
            Override::client_error(|info, req, rsp, err| {
                let asked = req.downcast_ref::<Hello>().map_or("?", |req| req.name.as_str());
                let got = rsp
                    .and_then(|rsp| rsp.downcast_ref::<Hello>())
                    .map_or("-", |rsp| rsp.name.as_str());
                Error::new(&info.service, 422, format!("asked {asked:?}, got {got:?}: {err}"))
            }),
            Override::publish_error(|info, msg, err| {
                let name = msg.downcast_ref::<Hello>().map_or("?", |msg| msg.name.as_str());
                Error::new(&info.topic, 422, format!("event {name:?}: {err}"))
            }),
        ]);
        let client = wrapper.wrap(RecordingClient::replying(""));

        let req = Request::new("helloworld", "Greeter.Hello", Hello::new(""));
        let err = client
            .call(&ctx(), &req, &mut Hello::default(), &CallOptions::default())
            .expect_err("request should be rejected");
        assert_eq!(err.detail, r#"asked "", got "-": name: is empty"#);

        let req = Request::new("helloworld", "Greeter.Hello", Hello::new("test"));
        let err = client
            .call(&ctx(), &req, &mut Hello::new("stale"), &CallOptions::default())
            .expect_err("reply should be rejected");
        assert_eq!(err.detail, r#"asked "test", got "": name: is empty"#);

        let err = client
            .publish(
                &ctx(),
                &Message::new("greetings", Hello::new("")),
                &PublishOptions::default(),
            )
            .expect_err("publish should be rejected");
        assert_eq!(err.detail, r#"event "": name: is empty"#);
        assert_eq!(client.inner().publishes.get(), 0);
    }

    #[test]
    fn wrapper_shares_options_between_clients() {
        let wrapper = new_client_wrapper([]);
        let first = wrapper.wrap(RecordingClient::replying("a"));
        let second = wrapper.wrap(RecordingClient::replying("b"));
        assert!(Arc::ptr_eq(&first.options, &second.options));
        assert_eq!(first.into_inner().calls.get(), 0);
    }

    #[test]
    fn call_wrapper_guards_each_attempt() {
        let attempts = Cell::new(0);
        let call = new_client_call_wrapper([]).wrap(call_fn(
            |_: &Context, addr: &str, req: &Request<Hello>, rsp: &mut Hello, _: &CallOptions| {
                attempts.set(attempts.get() + 1);
                rsp.name = if addr == "bad-node" {
                    String::new()
                } else {
                    req.body().name.clone()
                };
                Ok(())
            },
        ));

        let opts = CallOptions::default();
        let mut rsp = Hello::default();

        let err = call
            .call(&ctx(), "node-1", &Request::new("svc", "Svc.Do", Hello::new("")), &mut rsp, &opts)
            .expect_err("invalid request should be rejected");
        assert_eq!(err.code, BAD_REQUEST);
        assert_eq!(attempts.get(), 0);

        let req = Request::new("svc", "Svc.Do", Hello::new("test"));
        call.call(&ctx(), "node-1", &req, &mut rsp, &opts)
            .expect("valid attempt should succeed");
        assert_eq!(rsp.name, "test");

        let err = call
            .call(&ctx(), "bad-node", &req, &mut rsp, &opts)
            .expect_err("invalid reply should be rejected");
        assert_eq!(err.code, BAD_GATEWAY);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn call_wrapper_passes_attempt_errors_through() {
        let call = new_client_call_wrapper([]).wrap(call_fn(
            |_: &Context, _: &str, req: &Request<Hello>, _: &mut Hello, _: &CallOptions| {
                Err(Error::internal_server_error(req.service(), "node down"))
            },
        ));

        let err = call
            .call(
                &ctx(),
                "node-1",
                &Request::new("svc", "Svc.Do", Hello::new("test")),
                &mut Hello::default(),
                &CallOptions::default(),
            )
            .expect_err("attempt error should propagate");
        assert_eq!(err.detail, "node down");
    }
}
