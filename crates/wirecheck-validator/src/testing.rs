//! Payloads and recording collaborators shared by the unit tests.

use std::cell::Cell;
use std::collections::VecDeque;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wirecheck_rpc::{
    CallOptions, Client, Context, Error, Message, Payload, PublishOptions, Request, RequestInfo,
    Result, Stream, Validate, ValidationError,
};

/// Validatable payload: rejects an empty name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hello {
    pub name: String,
}

impl Hello {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Validate for Hello {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::field("name", "is empty"));
        }
        Ok(())
    }
}

impl Payload for Hello {
    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

/// Same shape as [`Hello`] but without the capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plain {
    pub name: String,
}

impl Payload for Plain {}

/// Client that counts every call and decodes a canned reply.
pub struct RecordingClient {
    pub calls: Cell<usize>,
    pub streams: Cell<usize>,
    pub publishes: Cell<usize>,
    reply: serde_json::Value,
    failure: Option<Error>,
}

impl RecordingClient {
    pub fn replying(name: &str) -> Self {
        Self {
            calls: Cell::new(0),
            streams: Cell::new(0),
            publishes: Cell::new(0),
            reply: serde_json::json!({ "name": name }),
            failure: None,
        }
    }

    pub fn failing(err: Error) -> Self {
        Self {
            failure: Some(err),
            ..Self::replying("unused")
        }
    }
}

impl Client for RecordingClient {
    type Stream = EchoStream;

    fn call<Req, Rsp>(
        &self,
        _ctx: &Context,
        req: &Request<Req>,
        rsp: &mut Rsp,
        _opts: &CallOptions,
    ) -> Result<()>
    where
        Req: Payload + Serialize,
        Rsp: Payload + DeserializeOwned,
    {
        self.calls.set(self.calls.get() + 1);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        *rsp = serde_json::from_value(self.reply.clone())
            .map_err(|err| Error::internal_server_error(req.service(), err))?;
        Ok(())
    }

    fn stream<Req>(
        &self,
        _ctx: &Context,
        req: &Request<Req>,
        _opts: &CallOptions,
    ) -> Result<EchoStream>
    where
        Req: Payload + Serialize,
    {
        self.streams.set(self.streams.get() + 1);
        let first = serde_json::to_vec(req.body())
            .map_err(|err| Error::internal_server_error(req.service(), err))?;
        Ok(EchoStream {
            info: req.info().clone(),
            frames: VecDeque::from([Bytes::from(first)]),
            closed: false,
        })
    }

    fn publish<P>(&self, _ctx: &Context, _msg: &Message<P>, _opts: &PublishOptions) -> Result<()>
    where
        P: Payload + Serialize,
    {
        self.publishes.set(self.publishes.get() + 1);
        Ok(())
    }
}

/// Stream that hands back whatever was sent on it.
#[derive(Debug)]
pub struct EchoStream {
    info: RequestInfo,
    frames: VecDeque<Bytes>,
    pub closed: bool,
}

impl Stream for EchoStream {
    fn info(&self) -> &RequestInfo {
        &self.info
    }

    fn send(&mut self, frame: Bytes) -> Result<()> {
        self.frames.push_back(frame);
        Ok(())
    }

    fn recv(&mut self) -> Result<Bytes> {
        self.frames
            .pop_front()
            .ok_or_else(|| Error::internal_server_error(&self.info.service, "stream drained"))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
