//! Redirect broker contract.
//!
//! A [`RedirectBroker`] owns the interactive part of the implicit grant: it builds the
//! redirect URI the provider will call back, opens the authorization URL in a user agent,
//! waits for the redirect (or for the user to give up), closes the surface, and reports a
//! single terminal [`CallbackResult`]. The session never observes intermediate states.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::AccessToken, error::BrokerError};

/// OAuth error code sent when the user declines consent.
pub const ACCESS_DENIED: &str = "access_denied";

/// Boxed future returned by [`RedirectBroker::open`].
pub type BrokerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BrokerError>> + 'a + Send>>;

/// User-agent capability that drives the interactive authorization step.
pub trait RedirectBroker
where
	Self: Send + Sync,
{
	/// Builds the redirect URI registered with the provider.
	///
	/// When [`RedirectUriOptions::use_proxy`] is set, implementations return the hosted proxy
	/// URI that forwards to the application instead of a direct deep link.
	fn redirect_uri(&self, options: &RedirectUriOptions) -> Result<String, BrokerError>;

	/// Opens `authorization_url` and resolves once the interaction reaches a terminal state.
	///
	/// The future resolves exactly once. Cancellation is the user's dismissal of the surface,
	/// reported as [`CallbackResult::Cancelled`].
	fn open<'a>(&'a self, authorization_url: &'a Url) -> BrokerFuture<'a, CallbackResult>;

	/// Revokes `token` at `revocation_endpoint` on behalf of `client_id`.
	///
	/// Returns `None` by default, in which case the session sends the standard
	/// `client_id` + `token` form POST itself. Brokers that must revoke through their own
	/// channel return the future doing so. Failures are logged by sign-out and never surfaced.
	fn revoke<'a>(
		&'a self,
		token: &'a AccessToken,
		client_id: &'a str,
		revocation_endpoint: &'a Url,
	) -> Option<BrokerFuture<'a, ()>> {
		let _ = (token, client_id, revocation_endpoint);

		None
	}
}

/// Options for [`RedirectBroker::redirect_uri`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectUriOptions {
	/// Route the redirect through the provider-facing proxy when deep links are unavailable.
	pub use_proxy: bool,
	/// Custom URI scheme for direct deep links.
	pub scheme: Option<String>,
	/// Path appended to the redirect URI.
	pub path: Option<String>,
}
impl Default for RedirectUriOptions {
	fn default() -> Self {
		Self { use_proxy: true, scheme: None, path: None }
	}
}

/// Terminal outcome of one broker interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackResult {
	/// The provider redirected back; parameters are attached.
	Success(CallbackParams),
	/// The user dismissed the interactive surface.
	Cancelled,
	/// The broker gave up without a redirect (e.g. the surface was locked or crashed).
	Failed {
		/// Broker-supplied reason, if any.
		message: Option<String>,
	},
}

/// Parameters carried by a provider redirect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// `access_token` issued by the implicit grant.
	pub access_token: Option<AccessToken>,
	/// `state` echoed back by the provider.
	pub state: Option<String>,
	/// OAuth `error` code.
	pub error: Option<String>,
	/// OAuth `error_description`.
	pub error_description: Option<String>,
	/// Space-delimited scopes actually granted.
	pub scope: Option<String>,
}
impl CallbackParams {
	/// Extracts callback parameters from a redirect URL.
	///
	/// Implicit-grant providers place results in the fragment; error redirects often use the
	/// query instead. Both are read and fragment values win on conflicts.
	pub fn from_redirect_url(url: &Url) -> Self {
		let mut params = Self::default();

		for raw in [url.query(), url.fragment()].into_iter().flatten() {
			for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
				let value = value.into_owned();

				match key.as_ref() {
					"access_token" => params.access_token = Some(AccessToken::new(value)),
					"state" => params.state = Some(value),
					"error" => params.error = Some(value),
					"error_description" => params.error_description = Some(value),
					"scope" => params.scope = Some(value),
					_ => {},
				}
			}
		}

		params
	}

	/// Returns true when the user declined the authorization request.
	pub fn is_access_denied(&self) -> bool {
		self.error.as_deref() == Some(ACCESS_DENIED)
	}
}
