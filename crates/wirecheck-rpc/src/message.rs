/// Addressing for a request, shared by client and server sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Target service name.
    pub service: String,
    /// Method name as registered by the service.
    pub method: String,
    /// Fully qualified endpoint, e.g. `Greeter.Hello`.
    pub endpoint: String,
    /// Content type the body is encoded with.
    pub content_type: String,
    /// True if the request opens a stream.
    pub stream: bool,
}

/// A request envelope: addressing plus the decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<B> {
    info: RequestInfo,
    body: B,
}

impl<B> Request<B> {
    /// Create a unary request. `endpoint` is `Service.Method`.
    pub fn new(service: impl Into<String>, endpoint: impl Into<String>, body: B) -> Self {
        let endpoint = endpoint.into();
        let method = endpoint
            .rsplit_once('.')
            .map(|(_, method)| method.to_string())
            .unwrap_or_else(|| endpoint.clone());
        Self {
            info: RequestInfo {
                service: service.into(),
                method,
                endpoint,
                content_type: "application/json".to_string(),
                stream: false,
            },
            body,
        }
    }

    /// Build from explicit addressing.
    pub fn from_parts(info: RequestInfo, body: B) -> Self {
        Self { info, body }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.info.content_type = content_type.into();
        self
    }

    /// Mark the request as opening a stream.
    pub fn streaming(mut self) -> Self {
        self.info.stream = true;
        self
    }

    pub fn info(&self) -> &RequestInfo {
        &self.info
    }

    pub fn service(&self) -> &str {
        &self.info.service
    }

    pub fn method(&self) -> &str {
        &self.info.method
    }

    pub fn endpoint(&self) -> &str {
        &self.info.endpoint
    }

    pub fn content_type(&self) -> &str {
        &self.info.content_type
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn into_body(self) -> B {
        self.body
    }
}

/// Addressing for a published or delivered message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageInfo {
    /// Topic the message is published to.
    pub topic: String,
    /// Content type the payload is encoded with.
    pub content_type: String,
}

/// A pub/sub envelope: topic plus the decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<P> {
    info: MessageInfo,
    payload: P,
}

impl<P> Message<P> {
    pub fn new(topic: impl Into<String>, payload: P) -> Self {
        Self {
            info: MessageInfo {
                topic: topic.into(),
                content_type: "application/json".to_string(),
            },
            payload,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.info.content_type = content_type.into();
        self
    }

    pub fn info(&self) -> &MessageInfo {
        &self.info
    }

    pub fn topic(&self) -> &str {
        &self.info.topic
    }

    pub fn content_type(&self) -> &str {
        &self.info.content_type
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}
