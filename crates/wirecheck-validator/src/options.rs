use std::fmt;
use std::sync::Arc;

use wirecheck_rpc::{Error, MessageInfo, Payload, RequestInfo, ValidationError};

/// Maps a failed request or response check to the error returned in its place.
///
/// Arguments are the request addressing, the request body, the offending
/// response (`None` when the request itself failed) and the failure.
pub type RequestErrorFn = Arc<
    dyn Fn(&RequestInfo, &dyn Payload, Option<&dyn Payload>, &ValidationError) -> Error
        + Send
        + Sync,
>;

/// Maps a failed publish or subscribe check to the error returned in its place.
///
/// Receives the rejected message payload alongside its topic.
pub type MessageErrorFn =
    Arc<dyn Fn(&MessageInfo, &dyn Payload, &ValidationError) -> Error + Send + Sync>;

/// Default client mapping: a present response means the far side replied
/// with bad data (`502`), otherwise the caller sent bad data (`400`).
pub fn default_client_error(
    info: &RequestInfo,
    _req: &dyn Payload,
    rsp: Option<&dyn Payload>,
    err: &ValidationError,
) -> Error {
    match rsp {
        Some(_) => Error::bad_gateway(&info.service, err),
        None => Error::bad_request(&info.service, err),
    }
}

/// Default server mapping, same split as [`default_client_error`].
pub fn default_server_error(
    info: &RequestInfo,
    _req: &dyn Payload,
    rsp: Option<&dyn Payload>,
    err: &ValidationError,
) -> Error {
    match rsp {
        Some(_) => Error::bad_gateway(&info.service, err),
        None => Error::bad_request(&info.service, err),
    }
}

/// Default publish mapping: bad request attributed to the topic.
pub fn default_publish_error(
    info: &MessageInfo,
    _msg: &dyn Payload,
    err: &ValidationError,
) -> Error {
    Error::bad_request(&info.topic, err)
}

/// Default subscribe mapping: bad request attributed to the topic.
pub fn default_subscribe_error(
    info: &MessageInfo,
    _msg: &dyn Payload,
    err: &ValidationError,
) -> Error {
    Error::bad_request(&info.topic, err)
}

/// Replaces exactly one error-mapping slot of [`Options`].
#[derive(Clone)]
pub enum Override {
    ClientError(RequestErrorFn),
    ServerError(RequestErrorFn),
    PublishError(MessageErrorFn),
    SubscribeError(MessageErrorFn),
}

impl Override {
    pub fn client_error<F>(f: F) -> Self
    where
        F: Fn(&RequestInfo, &dyn Payload, Option<&dyn Payload>, &ValidationError) -> Error
            + Send
            + Sync
            + 'static,
    {
        Self::ClientError(Arc::new(f))
    }

    pub fn server_error<F>(f: F) -> Self
    where
        F: Fn(&RequestInfo, &dyn Payload, Option<&dyn Payload>, &ValidationError) -> Error
            + Send
            + Sync
            + 'static,
    {
        Self::ServerError(Arc::new(f))
    }

    pub fn publish_error<F>(f: F) -> Self
    where
        F: Fn(&MessageInfo, &dyn Payload, &ValidationError) -> Error + Send + Sync + 'static,
    {
        Self::PublishError(Arc::new(f))
    }

    pub fn subscribe_error<F>(f: F) -> Self
    where
        F: Fn(&MessageInfo, &dyn Payload, &ValidationError) -> Error + Send + Sync + 'static,
    {
        Self::SubscribeError(Arc::new(f))
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = match self {
            Self::ClientError(_) => "ClientError",
            Self::ServerError(_) => "ServerError",
            Self::PublishError(_) => "PublishError",
            Self::SubscribeError(_) => "SubscribeError",
        };
        f.debug_tuple(slot).field(&format_args!("<fn>")).finish()
    }
}

#[derive(Clone)]
struct Slot<F> {
    f: F,
    custom: bool,
}

impl<F> Slot<F> {
    fn builtin(f: F) -> Self {
        Self { f, custom: false }
    }

    fn custom(f: F) -> Self {
        Self { f, custom: true }
    }

    fn describe(&self) -> &'static str {
        if self.custom {
            "<custom>"
        } else {
            "<default>"
        }
    }
}

/// Error-mapping strategies used by every validating wrapper.
///
/// Built once from defaults plus overrides and never mutated afterwards;
/// wrappers share it read-only across all calls.
#[derive(Clone)]
pub struct Options {
    client_error: Slot<RequestErrorFn>,
    server_error: Slot<RequestErrorFn>,
    publish_error: Slot<MessageErrorFn>,
    subscribe_error: Slot<MessageErrorFn>,
}

impl Options {
    /// Build from defaults, applying `overrides` in order.
    ///
    /// When a slot is overridden more than once, the last override wins.
    pub fn new<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = Override>,
    {
        overrides
            .into_iter()
            .fold(Self::default(), |options, o| options.with_override(o))
    }

    /// Replace one slot.
    pub fn with_override(mut self, o: Override) -> Self {
        match o {
            Override::ClientError(f) => self.client_error = Slot::custom(f),
            Override::ServerError(f) => self.server_error = Slot::custom(f),
            Override::PublishError(f) => self.publish_error = Slot::custom(f),
            Override::SubscribeError(f) => self.subscribe_error = Slot::custom(f),
        }
        self
    }

    pub fn with_client_error_fn<F>(self, f: F) -> Self
    where
        F: Fn(&RequestInfo, &dyn Payload, Option<&dyn Payload>, &ValidationError) -> Error
            + Send
            + Sync
            + 'static,
    {
        self.with_override(Override::client_error(f))
    }

    pub fn with_server_error_fn<F>(self, f: F) -> Self
    where
        F: Fn(&RequestInfo, &dyn Payload, Option<&dyn Payload>, &ValidationError) -> Error
            + Send
            + Sync
            + 'static,
    {
        self.with_override(Override::server_error(f))
    }

    pub fn with_publish_error_fn<F>(self, f: F) -> Self
    where
        F: Fn(&MessageInfo, &dyn Payload, &ValidationError) -> Error + Send + Sync + 'static,
    {
        self.with_override(Override::publish_error(f))
    }

    pub fn with_subscribe_error_fn<F>(self, f: F) -> Self
    where
        F: Fn(&MessageInfo, &dyn Payload, &ValidationError) -> Error + Send + Sync + 'static,
    {
        self.with_override(Override::subscribe_error(f))
    }

    pub fn client_error_fn(&self) -> &RequestErrorFn {
        &self.client_error.f
    }

    pub fn server_error_fn(&self) -> &RequestErrorFn {
        &self.server_error.f
    }

    pub fn publish_error_fn(&self) -> &MessageErrorFn {
        &self.publish_error.f
    }

    pub fn subscribe_error_fn(&self) -> &MessageErrorFn {
        &self.subscribe_error.f
    }
}

impl Default for Options {
    fn default() -> Self {
        let client: RequestErrorFn = Arc::new(default_client_error);
        let server: RequestErrorFn = Arc::new(default_server_error);
        let publish: MessageErrorFn = Arc::new(default_publish_error);
        let subscribe: MessageErrorFn = Arc::new(default_subscribe_error);
        Self {
            client_error: Slot::builtin(client),
            server_error: Slot::builtin(server),
            publish_error: Slot::builtin(publish),
            subscribe_error: Slot::builtin(subscribe),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("client_error", &format_args!("{}", self.client_error.describe()))
            .field("server_error", &format_args!("{}", self.server_error.describe()))
            .field("publish_error", &format_args!("{}", self.publish_error.describe()))
            .field("subscribe_error", &format_args!("{}", self.subscribe_error.describe()))
            .finish()
    }
}
