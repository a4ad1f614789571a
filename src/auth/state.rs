//! Per-attempt CSRF `state` values.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

/// Number of characters in every generated state value.
pub const STATE_LEN: usize = 30;

/// Random value that binds one authorization request to its callback.
///
/// A fresh value is drawn from the thread-local CSPRNG for every sign-in attempt and is never
/// derived from configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationState(String);
impl AuthorizationState {
	/// Generates a new alphanumeric state of [`STATE_LEN`] characters.
	pub fn generate() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect())
	}

	/// Returns the raw state string sent to the provider.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Exact comparison against the `state` echoed back by the provider.
	pub fn matches(&self, returned: Option<&str>) -> bool {
		returned == Some(self.0.as_str())
	}
}
impl Debug for AuthorizationState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthorizationState").field(&self.0).finish()
	}
}
impl Display for AuthorizationState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
#[cfg(test)]
impl From<&str> for AuthorizationState {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
