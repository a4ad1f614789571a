//! Session-level error types shared across flows, the API client, and broker integrations.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
///
/// Every variant leaves the session in the state it had before the failing call.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Redirect broker integration failed before yielding a callback.
	#[error(transparent)]
	Broker(#[from] BrokerError),

	/// Callback `state` does not match the value generated for the attempt.
	#[error("Authorization state mismatch.")]
	InvalidState,
	/// Provider reported an authorization error other than `access_denied`.
	#[error("Provider returned an authorization error: {code}.")]
	Authorization {
		/// Provider-supplied `error` value.
		code: String,
		/// Provider-supplied `error_description` value.
		description: Option<String>,
	},
	/// Successful callback did not carry an access token.
	#[error("Authorization callback is missing the access token.")]
	MissingAccessToken,
	/// Authenticated profile request failed after a token was received.
	#[error("Failed to fetch the user profile.")]
	ProfileFetchFailed {
		/// Underlying API failure.
		#[source]
		source: ApiError,
	},
	/// Remote token revocation failed. Logged by sign-out, never returned from it.
	#[error("Failed to revoke the access token.")]
	RevocationFailed {
		/// Underlying API failure.
		#[source]
		source: ApiError,
	},
	/// Another sign-in attempt is still waiting on the redirect broker.
	#[error("A sign-in attempt is already in progress.")]
	SignInInProgress,
	/// The session was signed out while this sign-in was suspended.
	#[error("Session changed while the sign-in was in flight.")]
	Superseded,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Redirect URI produced by the broker cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Provider descriptor failed validation.
	#[error("Provider descriptor is invalid.")]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised by a [`RedirectBroker`](crate::broker::RedirectBroker) implementation.
#[derive(Debug, ThisError)]
pub enum BrokerError {
	/// The interactive user agent could not be launched.
	#[error("User agent could not be opened: {message}.")]
	Launch {
		/// Broker-supplied message.
		message: String,
	},
	/// Broker-specific failure with an underlying cause.
	#[error("Redirect broker failed.")]
	Other {
		/// Broker-specific error.
		#[source]
		source: BoxError,
	},
}
impl BrokerError {
	/// Wraps a broker-specific error.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}

/// Failures raised by [`ApiClient`](crate::api::ApiClient) calls.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// Transport failed before an HTTP response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a non-success HTTP status.
	#[error("Provider responded with HTTP {status}: {body_preview}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Leading slice of the response body.
		body_preview: String,
	},
	/// Response body is not the expected JSON shape.
	#[error("Provider returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Response parsed but its content is unusable.
	#[error("Provider returned an unexpected payload: {message}.")]
	UnexpectedPayload {
		/// What was wrong with the payload.
		message: String,
	},
	/// Request path cannot be joined onto the API base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn profile_failure_keeps_api_cause() {
		let err = Error::ProfileFetchFailed {
			source: ApiError::Status { status: 401, body_preview: "invalid token".into() },
		};
		let source = StdError::source(&err).expect("Profile failures should expose their cause.");

		assert!(source.to_string().contains("401"));
		assert_eq!(err.to_string(), "Failed to fetch the user profile.");
	}

	#[test]
	fn transport_error_is_transparent_inside_api_error() {
		let io = std::io::Error::other("socket closed");
		let err = ApiError::from(TransportError::from(io));

		assert!(matches!(err, ApiError::Transport(TransportError::Io(_))));
		assert_eq!(err.to_string(), "I/O error occurred while calling the provider.");
	}
}
