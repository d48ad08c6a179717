/// Middleware attachment point.
///
/// A wrapper takes the next stage (a [`Client`](crate::Client), a
/// [`CallFunc`](crate::CallFunc), a [`Handler`](crate::Handler) or a
/// [`Subscriber`](crate::Subscriber)) and returns a value of the same shape
/// that runs its own logic around it. Runtimes apply wrappers in
/// registration order, so the last one applied runs first.
pub trait Wrapper<T> {
    type Output;

    fn wrap(&self, inner: T) -> Self::Output;
}
