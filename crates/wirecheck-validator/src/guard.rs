use wirecheck_rpc::{Message, Payload, Request, Result};

use crate::capability::{inspect, Stage};
use crate::options::{MessageErrorFn, RequestErrorFn};

/// Which end of a unary exchange is being guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Client,
    Server,
}

impl Side {
    fn request_stage(self) -> Stage {
        match self {
            Self::Client => Stage::ClientRequest,
            Self::Server => Stage::ServerRequest,
        }
    }

    fn response_stage(self) -> Stage {
        match self {
            Self::Client => Stage::ClientResponse,
            Self::Server => Stage::ServerResponse,
        }
    }
}

/// Check the request body only. A failure is mapped with no response.
pub(crate) fn guard_request<Req: Payload>(
    side: Side,
    map: &RequestErrorFn,
    req: &Request<Req>,
) -> Result<()> {
    inspect(side.request_stage(), req.service(), req.body())
        .map_err(|err| map(req.info(), req.body(), None, &err))
}

/// Guard a unary exchange around `next`.
///
/// `next` is skipped when the request fails. Its own error is returned
/// untouched and the response is only checked after it succeeds. A rejected
/// response stays in `rsp`.
pub(crate) fn guard_unary<Req, Rsp, F>(
    side: Side,
    map: &RequestErrorFn,
    req: &Request<Req>,
    rsp: &mut Rsp,
    next: F,
) -> Result<()>
where
    Req: Payload,
    Rsp: Payload,
    F: FnOnce(&mut Rsp) -> Result<()>,
{
    guard_request(side, map, req)?;
    next(&mut *rsp)?;

    let rsp: &Rsp = rsp;
    inspect(side.response_stage(), req.service(), rsp)
        .map_err(|err| map(req.info(), req.body(), Some(rsp as &dyn Payload), &err))
}

/// Check a message payload before it is published or delivered.
pub(crate) fn guard_message<P: Payload>(
    stage: Stage,
    map: &MessageErrorFn,
    msg: &Message<P>,
) -> Result<()> {
    inspect(stage, msg.topic(), msg.payload())
        .map_err(|err| map(msg.info(), msg.payload(), &err))
}
