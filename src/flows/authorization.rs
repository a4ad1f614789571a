//! Implicit-grant authorization requests.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationState, ScopeSet},
	config::{RESPONSE_TYPE, SessionConfig},
	provider::ProviderDescriptor,
};

/// One sign-in attempt's request: fresh `state` plus the URL the broker opens.
///
/// Lives only for the duration of a single [`AuthSession::sign_in`](crate::flows::AuthSession::sign_in)
/// call and is never reused.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// CSRF value that must round-trip through the provider.
	pub state: AuthorizationState,
	/// Redirect URI obtained from the broker.
	pub redirect_uri: Url,
	/// Requested scopes.
	pub scopes: ScopeSet,
	/// Whether `force_verify=true` was requested.
	pub force_verify: bool,
	/// Fully-formed authorization URL.
	pub authorization_url: Url,
}
impl AuthorizationRequest {
	/// Builds a request with a newly generated state.
	pub fn new(descriptor: &ProviderDescriptor, config: &SessionConfig, redirect_uri: Url) -> Self {
		Self::with_state(descriptor, config, redirect_uri, AuthorizationState::generate())
	}

	pub(crate) fn with_state(
		descriptor: &ProviderDescriptor,
		config: &SessionConfig,
		redirect_uri: Url,
		state: AuthorizationState,
	) -> Self {
		let force_verify = config.force_verify && descriptor.quirks.supports_force_verify;
		let authorization_url = build_authorization_url(
			descriptor,
			&config.client_id,
			&redirect_uri,
			&config.scopes,
			force_verify,
			&state,
		);

		Self {
			state,
			redirect_uri,
			scopes: config.scopes.clone(),
			force_verify,
			authorization_url,
		}
	}

	/// Validates the `state` returned with the callback using exact equality.
	pub fn validate_state(&self, returned_state: Option<&str>) -> Result<()> {
		if self.state.matches(returned_state) { Ok(()) } else { Err(Error::InvalidState) }
	}
}

/// Joins scopes with the provider's delimiter.
fn format_scope(scope: &ScopeSet, delimiter: char) -> Option<String> {
	if scope.is_empty() {
		return None;
	}
	if delimiter == ' ' {
		return Some(scope.normalized());
	}

	let mut buf = String::new();

	for (idx, value) in scope.iter().enumerate() {
		if idx > 0 {
			buf.push(delimiter);
		}

		buf.push_str(value);
	}

	Some(buf)
}

// Values are percent-encoded by hand so spaces become `%20`; form encoding would emit `+`,
// which providers do not accept inside `scope`.
fn build_authorization_url(
	descriptor: &ProviderDescriptor,
	client_id: &str,
	redirect_uri: &Url,
	scope: &ScopeSet,
	force_verify: bool,
	state: &AuthorizationState,
) -> Url {
	let mut pairs = vec![
		("client_id", client_id.to_owned()),
		("redirect_uri", redirect_uri.to_string()),
		("response_type", RESPONSE_TYPE.to_owned()),
	];

	if let Some(scope_value) = format_scope(scope, descriptor.quirks.scope_delimiter) {
		pairs.push(("scope", scope_value));
	}
	if force_verify {
		pairs.push(("force_verify", "true".to_owned()));
	}

	pairs.push(("state", state.as_str().to_owned()));

	let mut url = descriptor.endpoints.authorization.clone();
	let mut query = url.query().map(str::to_owned).unwrap_or_default();

	for (key, value) in pairs {
		if !query.is_empty() {
			query.push('&');
		}

		query.push_str(key);
		query.push('=');
		query.push_str(&urlencoding::encode(&value));
	}

	url.set_query(Some(&query));

	url
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;
	use crate::provider::ProviderQuirks;

	const STATE: &str = "abcdefghijklmnopqrstuvwxyz0123";

	fn request(descriptor: &ProviderDescriptor, config: &SessionConfig) -> AuthorizationRequest {
		AuthorizationRequest::with_state(
			descriptor,
			config,
			Url::parse("https://auth.expo.io/@me/app").expect("Redirect fixture should parse."),
			AuthorizationState::from(STATE),
		)
	}

	#[test]
	fn twitch_url_matches_expected_layout() {
		let request = request(&ProviderDescriptor::twitch(), &SessionConfig::new("client-1"));

		assert_eq!(
			request.authorization_url.as_str(),
			"https://id.twitch.tv/oauth2/authorize?client_id=client-1\
			&redirect_uri=https%3A%2F%2Fauth.expo.io%2F%40me%2Fapp\
			&response_type=token\
			&scope=openid%20user%3Aread%3Aemail%20user%3Aread%3Afollows\
			&force_verify=true\
			&state=abcdefghijklmnopqrstuvwxyz0123"
		);
		assert!(request.force_verify);
		assert!(!request.authorization_url.as_str().contains('+'));
	}

	#[test]
	fn query_pairs_decode_back_to_inputs() {
		let request = request(&ProviderDescriptor::twitch(), &SessionConfig::new("client-1"));
		let pairs: HashMap<_, _> = request.authorization_url.query_pairs().into_owned().collect();

		assert_eq!(pairs.get("redirect_uri").map(String::as_str), Some("https://auth.expo.io/@me/app"));
		assert_eq!(
			pairs.get("scope").map(String::as_str),
			Some("openid user:read:email user:read:follows")
		);
		assert_eq!(pairs.get("state").map(String::as_str), Some(STATE));
	}

	#[test]
	fn optional_parameters_follow_config_and_quirks() {
		let mut descriptor = ProviderDescriptor::twitch();

		descriptor.quirks = ProviderQuirks { scope_delimiter: ',', supports_force_verify: false };

		let config = SessionConfig::new("client-1")
			.with_scopes(["b", "a"])
			.expect("Scopes fixture should validate.");
		let request = request(&descriptor, &config);
		let query = request.authorization_url.query().expect("Query should be present.");

		assert!(query.contains("&scope=a%2Cb&"));
		assert!(!query.contains("force_verify"));
		assert!(!request.force_verify);

		let config = SessionConfig::new("client-1")
			.with_scopes(Vec::<String>::new())
			.expect("Empty scopes should validate.");

		assert!(!request_query(&ProviderDescriptor::twitch(), &config).contains("scope="));
	}

	#[test]
	fn state_validation_is_exact() {
		let request = request(&ProviderDescriptor::twitch(), &SessionConfig::new("client-1"));

		assert!(request.validate_state(Some(STATE)).is_ok());
		assert!(matches!(request.validate_state(Some("WRONG")), Err(Error::InvalidState)));
		assert!(matches!(request.validate_state(None), Err(Error::InvalidState)));
	}

	#[test]
	fn fresh_requests_use_fresh_states() {
		let descriptor = ProviderDescriptor::twitch();
		let config = SessionConfig::new("client-1");
		let redirect = Url::parse("myapp://redirect").expect("Redirect fixture should parse.");
		let first = AuthorizationRequest::new(&descriptor, &config, redirect.clone());
		let second = AuthorizationRequest::new(&descriptor, &config, redirect);

		assert_eq!(first.state.as_str().len(), 30);
		assert_ne!(first.state, second.state);
	}

	fn request_query(descriptor: &ProviderDescriptor, config: &SessionConfig) -> String {
		request(descriptor, config).authorization_url.query().unwrap_or_default().to_owned()
	}
}
