//! Request decoration contracts that let session state flow into outgoing API calls.

// self
use crate::http::HeaderSet;

/// Adds or removes headers on an outbound request right before it is sent.
///
/// Decorators run in registration order and later decorators win on conflicts. They
/// see the headers only, so implementations stay independent of the HTTP client type.
pub trait RequestDecorator
where
	Self: Send + Sync,
{
	/// Mutates the headers of the request about to be sent.
	fn decorate(&self, headers: &mut HeaderSet);
}
impl<F> RequestDecorator for F
where
	F: Fn(&mut HeaderSet) + Send + Sync,
{
	fn decorate(&self, headers: &mut HeaderSet) {
		self(headers)
	}
}
