//! In-process greeter with validation on both ends of every call.
//!
//! Run with:
//!   cargo run --example greeter
//!
//! Rejections are logged at debug level on stderr.

use serde::{Deserialize, Serialize};
use wirecheck::rpc::{
    call_fn, handler_fn, subscriber_fn, CallFunc, CallOptions, Context, Handler, Message, Payload,
    Request, Subscriber, Validate, ValidationError, Wrapper,
};
use wirecheck::validator::{
    new_client_call_wrapper, new_server_handler_wrapper, new_server_subscriber_wrapper,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Hello {
    name: String,
}

impl Validate for Hello {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be blank"));
        }
        Ok(())
    }
}

impl Payload for Hello {
    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .init();

    let handler = new_server_handler_wrapper([]).wrap(handler_fn(
        |_: &Context, req: &Request<Hello>, rsp: &mut Hello| {
            rsp.name = format!("hello {}", req.body().name);
            Ok(())
        },
    ));

    // Every attempt goes straight to the local handler.
    let call = new_client_call_wrapper([]).wrap(call_fn(
        move |ctx: &Context, _: &str, req: &Request<Hello>, rsp: &mut Hello, _: &CallOptions| {
            handler.handle(ctx, req, rsp)
        },
    ));

    let ctx = Context::background();
    let opts = CallOptions::default();

    let mut reply = Hello::default();
    let req = Request::new("greeter", "Greeter.Hello", Hello { name: "world".into() });
    call.call(&ctx, "local", &req, &mut reply, &opts)?;
    eprintln!("reply: {}", reply.name);

    let req = Request::new("greeter", "Greeter.Hello", Hello { name: " ".into() });
    if let Err(err) = call.call(&ctx, "local", &req, &mut reply, &opts) {
        eprintln!("rejected: {}", err.to_json());
    }

    let subscriber = new_server_subscriber_wrapper([]).wrap(subscriber_fn(
        |_: &Context, msg: &Message<Hello>| {
            eprintln!("event for {}", msg.payload().name);
            Ok(())
        },
    ));
    for name in ["alice", ""] {
        let msg = Message::new("greetings", Hello { name: name.into() });
        if let Err(err) = subscriber.handle(&ctx, &msg) {
            eprintln!("dropped: {err}");
        }
    }

    Ok(())
}
