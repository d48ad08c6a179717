use std::fmt;

use tracing::{debug, trace};
use wirecheck_rpc::{Payload, ValidationError};

/// Where in a call a payload is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Outgoing request body, before the call or stream is opened.
    ClientRequest,
    /// Reply decoded from a successful call.
    ClientResponse,
    /// Outgoing message, before it reaches the broker.
    Publish,
    /// Incoming request body, before the handler runs.
    ServerRequest,
    /// Reply written by a successful handler.
    ServerResponse,
    /// Incoming message, before the subscriber runs.
    Subscribe,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientRequest => "client_request",
            Self::ClientResponse => "client_response",
            Self::Publish => "publish",
            Self::ServerRequest => "server_request",
            Self::ServerResponse => "server_response",
            Self::Subscribe => "subscribe",
        }
    }

    /// Returns true for stages that check a reply rather than an input.
    pub fn is_response(self) -> bool {
        matches!(self, Self::ClientResponse | Self::ServerResponse)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the payload's self-check if it has one.
///
/// Payloads without a validator pass silently.
pub fn check<P: Payload + ?Sized>(payload: &P) -> Result<(), ValidationError> {
    match payload.validator() {
        Some(validator) => validator.validate(),
        None => Ok(()),
    }
}

/// [`check`] with a log line naming the stage and the service or topic.
pub(crate) fn inspect<P: Payload + ?Sized>(
    stage: Stage,
    id: &str,
    payload: &P,
) -> Result<(), ValidationError> {
    match check(payload) {
        Ok(()) => {
            trace!(%stage, id, response = stage.is_response(), "payload accepted");
            Ok(())
        }
        Err(err) => {
            debug!(
                %stage,
                id,
                response = stage.is_response(),
                field = err.field_name(),
                error = %err,
                "payload failed validation"
            );
            Err(err)
        }
    }
}
