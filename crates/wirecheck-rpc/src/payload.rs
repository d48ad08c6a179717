use std::any::Any;

use bytes::Bytes;

/// A parameterless self-check exposed by a payload.
///
/// Implementations must be idempotent and free of side effects: middleware
/// may call `validate` zero or one time per call stage and never retries it.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A body, response or message carried by the framework.
///
/// Payloads opt in to validation by returning themselves from
/// [`Payload::validator`]:
///
/// ```
/// use wirecheck_rpc::{Payload, Validate, ValidationError};
///
/// struct Hello {
///     name: String,
/// }
///
/// impl Validate for Hello {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.name.is_empty() {
///             return Err(ValidationError::field("name", "must not be empty"));
///         }
///         Ok(())
///     }
/// }
///
/// impl Payload for Hello {
///     fn validator(&self) -> Option<&dyn Validate> {
///         Some(self)
///     }
/// }
///
/// assert!(Hello { name: String::new() }.validator().is_some());
/// ```
///
/// # Opting in
///
/// Implementing [`Validate`] alone does nothing. The default
/// [`Payload::validator`] returns `None`, so an empty `impl Payload for T {}`
/// turns the check off even when `T: Validate`:
///
/// ```
/// use wirecheck_rpc::{Payload, Validate, ValidationError};
///
/// struct Silent;
///
/// impl Validate for Silent {
///     fn validate(&self) -> Result<(), ValidationError> {
///         Err(ValidationError::new("never seen"))
///     }
/// }
///
/// impl Payload for Silent {}
///
/// assert!(Silent.validator().is_none());
/// ```
///
/// Payloads are `'static` so error mappings can recover the concrete type
/// with `downcast_ref` on `dyn Payload`.
pub trait Payload: Any {
    /// The payload's self-check, or `None` if it has none.
    ///
    /// Override this to return `Some(self)` for any type that implements
    /// [`Validate`].
    fn validator(&self) -> Option<&dyn Validate> {
        None
    }
}

impl dyn Payload {
    /// The concrete payload, if it is a `T`.
    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    pub fn is<T: Payload>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl Payload for () {}
impl Payload for String {}
impl Payload for Vec<u8> {}
impl Payload for Bytes {}
impl Payload for serde_json::Value {}

impl<T: Payload + ?Sized> Payload for Box<T> {
    fn validator(&self) -> Option<&dyn Validate> {
        (**self).validator()
    }
}

/// Why a payload rejected itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A reason attributed to one field.
    #[error("{field}: {reason}")]
    Field { field: String, reason: String },

    /// A reason about the payload as a whole.
    #[error("{0}")]
    Message(String),
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self::Message(reason.into())
    }

    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, if the failure names one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Field { field, .. } => Some(field),
            Self::Message(_) => None,
        }
    }
}

impl From<String> for ValidationError {
    fn from(reason: String) -> Self {
        Self::Message(reason)
    }
}

impl From<&str> for ValidationError {
    fn from(reason: &str) -> Self {
        Self::Message(reason.to_string())
    }
}
