//! Session flows: initialization, implicit-grant sign-in, and sign-out.

pub mod authorization;

mod sign_in;
mod sign_out;

pub use authorization::*;
pub use sign_in::*;

// self
use crate::{
	_prelude::*,
	api::ApiClient,
	auth::{AccessToken, UserProfile},
	broker::RedirectBroker,
	config::SessionConfig,
	http::ApiHttpClient,
	provider::ProviderDescriptor,
	session::{Session, SessionHeaders, SessionObserver, SessionSnapshot, SubscriptionId},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient, provider::ProviderDescriptorBuilder};

/// Request timeout of the transport built by [`AuthSession::try_new`].
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Coordinates the implicit-grant login/logout protocol for one provider registration.
///
/// An application creates one `AuthSession` at startup (typically behind an `Arc`), calls
/// [`AuthSession::initialize`] once, and hands the read surface ([`AuthSession::snapshot`],
/// [`AuthSession::subscribe`]) plus [`AuthSession::sign_in`] / [`AuthSession::sign_out`] to its
/// UI layer. The session owns the [`ApiClient`] it decorates, so authenticated calls made through
/// [`AuthSession::api`] always carry the current credentials.
pub struct AuthSession {
	/// Static client settings.
	pub config: SessionConfig,
	/// Provider descriptor that defines endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	broker: Arc<dyn RedirectBroker>,
	api: ApiClient,
	session: Arc<Session>,
	teardown: AsyncMutex<()>,
}
impl AuthSession {
	/// Creates a session that reuses the caller-provided transport.
	pub fn with_http_client(
		config: SessionConfig,
		descriptor: ProviderDescriptor,
		broker: Arc<dyn RedirectBroker>,
		http_client: Arc<dyn ApiHttpClient>,
	) -> Self {
		let session = Arc::new(Session::default());
		let api = ApiClient::new(http_client, descriptor.endpoints.api_base.clone())
			.with_decorator(Arc::new(SessionHeaders(session.clone())));

		Self { config, descriptor, broker, api, session, teardown: AsyncMutex::new(()) }
	}

	/// One-time setup: starts sending the client identifier as `Client-Id` on every API call.
	///
	/// The header is independent of sign-in state and is never removed by sign-out. Calling
	/// this more than once is harmless.
	pub fn initialize(&self) {
		self.session.install_client_id(&self.config.client_id);
	}

	/// API client whose requests carry the session's headers.
	pub fn api(&self) -> &ApiClient {
		&self.api
	}

	/// Read-only view for UI layers.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.session.snapshot()
	}

	/// Signed-in user, if any.
	pub fn user(&self) -> Option<UserProfile> {
		self.session.user()
	}

	/// Current bearer token, if any.
	pub fn access_token(&self) -> Option<AccessToken> {
		self.session.access_token()
	}

	/// Whether a sign-in is running.
	pub fn is_logging_in(&self) -> bool {
		self.session.snapshot().is_logging_in
	}

	/// Whether a sign-out is running.
	pub fn is_logging_out(&self) -> bool {
		self.session.snapshot().is_logging_out
	}

	/// Registers an observer called with a fresh snapshot after every state change.
	pub fn subscribe(
		&self,
		observer: impl Fn(&SessionSnapshot) + Send + Sync + 'static,
	) -> SubscriptionId {
		let observer: SessionObserver = Arc::new(observer);

		self.session.subscribe(observer)
	}

	/// Removes an observer.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.session.unsubscribe(id)
	}
}
#[cfg(feature = "reqwest")]
impl AuthSession {
	/// Creates a session backed by a default reqwest transport.
	pub fn new(
		config: SessionConfig,
		descriptor: ProviderDescriptor,
		broker: Arc<dyn RedirectBroker>,
	) -> Self {
		Self::with_http_client(config, descriptor, broker, Arc::new(ReqwestHttpClient::default()))
	}

	/// Validates `descriptor` and builds a reqwest transport bounded by
	/// [`DEFAULT_HTTP_TIMEOUT`].
	pub fn try_new(
		config: SessionConfig,
		descriptor: ProviderDescriptorBuilder,
		broker: Arc<dyn RedirectBroker>,
	) -> Result<Self, ConfigError> {
		let descriptor = descriptor.build()?;
		let client = ReqwestClient::builder().timeout(DEFAULT_HTTP_TIMEOUT).build()?;

		Ok(Self::with_http_client(
			config,
			descriptor,
			broker,
			Arc::new(ReqwestHttpClient::with_client(client)),
		))
	}
}
impl Debug for AuthSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthSession")
			.field("descriptor", &self.descriptor.name)
			.field("client_id", &self.config.client_id)
			.field("session", &self.session)
			.finish()
	}
}
