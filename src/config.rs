//! Client configuration consumed by [`AuthSession`](crate::flows::AuthSession).
//!
//! The crate never reads the process environment; hosts build a [`SessionConfig`] in code or
//! deserialize one from whatever source they own.

// self
use crate::{_prelude::*, auth::ScopeSet, broker::RedirectUriOptions, error::ConfigError};

/// Scopes requested when the host does not override them.
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "user:read:email", "user:read:follows"];

/// `response_type` value for the implicit grant.
pub const RESPONSE_TYPE: &str = "token";

/// Static client settings for one identity provider registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
	/// OAuth 2.0 client identifier; also sent as the `Client-Id` header.
	pub client_id: String,
	/// Scopes requested on every sign-in.
	#[serde(default = "default_scopes")]
	pub scopes: ScopeSet,
	/// Forces the provider to re-prompt even when the user already consented.
	#[serde(default = "default_force_verify")]
	pub force_verify: bool,
	/// Options handed to the broker when building the redirect URI.
	#[serde(default)]
	pub redirect: RedirectUriOptions,
}
impl SessionConfig {
	/// Creates a configuration with the default scopes and `force_verify` enabled.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			scopes: default_scopes(),
			force_verify: default_force_verify(),
			redirect: RedirectUriOptions::default(),
		}
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = ScopeSet::new(scopes)?;

		Ok(self)
	}

	/// Overrides the `force_verify` flag.
	pub fn with_force_verify(mut self, force_verify: bool) -> Self {
		self.force_verify = force_verify;

		self
	}

	/// Overrides the redirect URI options.
	pub fn with_redirect(mut self, redirect: RedirectUriOptions) -> Self {
		self.redirect = redirect;

		self
	}
}

fn default_scopes() -> ScopeSet {
	match ScopeSet::new(DEFAULT_SCOPES) {
		Ok(scopes) => scopes,
		Err(e) => unreachable!("default scopes must validate: {e}"),
	}
}

fn default_force_verify() -> bool {
	true
}
