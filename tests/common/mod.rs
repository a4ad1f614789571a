//! Doubles shared by the session integration tests.

#![allow(dead_code)]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use parking_lot::Mutex;
use tokio::sync::Notify;
// self
use implicit_session::{
	auth::AccessToken,
	broker::{BrokerFuture, CallbackParams, CallbackResult, RedirectBroker, RedirectUriOptions},
	config::SessionConfig,
	error::{BrokerError, TransportError},
	flows::AuthSession,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture},
	provider::ProviderDescriptor,
	url::Url,
};

pub const CLIENT_ID: &str = "client-1";
pub const REDIRECT_URI: &str = "https://auth.expo.io/@me/app";
pub const USERS_PATH: &str = "/helix/users";
pub const REVOKE_PATH: &str = "/oauth2/revoke";
pub const USERS_BODY: &str = r#"{"data":[{"id":"42","login":"foo","display_name":"foo","email":"f@x.com","profile_image_url":"http://x/y.png"}]}"#;

/// Ordered log shared between doubles and observers.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// What [`ScriptedBroker::open`] answers with.
#[derive(Clone, Debug)]
pub enum Reply {
	/// Redirect carrying the request's own state and this token.
	Grant(&'static str),
	/// Redirect carrying these parameters; a missing state is filled from the request.
	Params(CallbackParams),
	/// Terminal result returned verbatim.
	Result(CallbackResult),
	/// Broker failure.
	Launch(&'static str),
}

/// Token, client id and endpoint handed to [`ScriptedBroker::revoke`].
pub type RevocationCall = (String, String, Url);

/// Broker that answers from a script and can hold `open` until released.
pub struct ScriptedBroker {
	reply: Mutex<Reply>,
	gate: Option<Arc<Notify>>,
	opened: Arc<Notify>,
	urls: Mutex<Vec<Url>>,
	revocation: Mutex<Option<Result<(), &'static str>>>,
	revocations: Mutex<Vec<RevocationCall>>,
}
impl ScriptedBroker {
	pub fn new(reply: Reply) -> Arc<Self> {
		Arc::new(Self::build(reply, None))
	}

	/// Like [`ScriptedBroker::new`] but `open` waits for `gate` before answering.
	pub fn gated(reply: Reply, gate: Arc<Notify>) -> Arc<Self> {
		Arc::new(Self::build(reply, Some(gate)))
	}

	fn build(reply: Reply, gate: Option<Arc<Notify>>) -> Self {
		Self {
			reply: Mutex::new(reply),
			gate,
			opened: Arc::new(Notify::new()),
			urls: Mutex::new(Vec::new()),
			revocation: Mutex::new(None),
			revocations: Mutex::new(Vec::new()),
		}
	}

	/// `Some` makes the broker revoke tokens itself with the given result.
	pub fn set_revocation(&self, revocation: Option<Result<(), &'static str>>) {
		*self.revocation.lock() = revocation;
	}

	pub fn revocations(&self) -> Vec<RevocationCall> {
		self.revocations.lock().clone()
	}

	pub fn set_reply(&self, reply: Reply) {
		*self.reply.lock() = reply;
	}

	/// Resolves once `open` has been entered.
	pub async fn wait_opened(&self) {
		self.opened.notified().await;
	}

	pub fn opened_urls(&self) -> Vec<Url> {
		self.urls.lock().clone()
	}

	pub fn last_state(&self) -> Option<String> {
		self.urls.lock().last().and_then(state_of)
	}
}
impl RedirectBroker for ScriptedBroker {
	fn redirect_uri(&self, _: &RedirectUriOptions) -> Result<String, BrokerError> {
		Ok(REDIRECT_URI.into())
	}

	fn open<'a>(&'a self, authorization_url: &'a Url) -> BrokerFuture<'a, CallbackResult> {
		Box::pin(async move {
			self.urls.lock().push(authorization_url.clone());
			self.opened.notify_one();

			if let Some(gate) = &self.gate {
				gate.notified().await;
			}

			let state = state_of(authorization_url);
			let reply = self.reply.lock().clone();

			match reply {
				Reply::Grant(token) => Ok(CallbackResult::Success(CallbackParams {
					access_token: Some(AccessToken::new(token)),
					state,
					..Default::default()
				})),
				Reply::Params(mut params) => {
					if params.state.is_none() {
						params.state = state;
					}

					Ok(CallbackResult::Success(params))
				},
				Reply::Result(result) => Ok(result),
				Reply::Launch(message) => Err(BrokerError::Launch { message: message.into() }),
			}
		})
	}

	fn revoke<'a>(
		&'a self,
		token: &'a AccessToken,
		client_id: &'a str,
		revocation_endpoint: &'a Url,
	) -> Option<BrokerFuture<'a, ()>> {
		let result = (*self.revocation.lock())?;

		self.revocations.lock().push((
			token.expose().to_owned(),
			client_id.to_owned(),
			revocation_endpoint.clone(),
		));

		Some(Box::pin(async move {
			result.map_err(|message| BrokerError::Launch { message: message.into() })
		}))
	}
}

pub fn state_of(url: &Url) -> Option<String> {
	url.query_pairs().find(|(key, _)| key == "state").map(|(_, value)| value.into_owned())
}

/// Transport double that answers by path and records every request.
#[derive(Default)]
pub struct RecordingHttp {
	routes: Mutex<HashMap<String, Option<(u16, String)>>>,
	requests: Mutex<Vec<ApiRequest>>,
	journal: Journal,
}
impl RecordingHttp {
	pub fn new() -> Arc<Self> {
		let http = Self::default();

		http.route(USERS_PATH, 200, USERS_BODY);
		http.route(REVOKE_PATH, 200, "");

		Arc::new(http)
	}

	pub fn route(&self, path: &str, status: u16, body: &str) {
		self.routes.lock().insert(path.into(), Some((status, body.into())));
	}

	/// Makes requests to `path` fail at the transport level.
	pub fn fail(&self, path: &str) {
		self.routes.lock().insert(path.into(), None);
	}

	pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
		self.requests.lock().iter().filter(|request| request.url.path() == path).cloned().collect()
	}

	pub fn journal(&self) -> Journal {
		self.journal.clone()
	}
}
impl ApiHttpClient for RecordingHttp {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse> {
		let path = request.url.path().to_owned();
		let route = self.routes.lock().get(&path).cloned().unwrap_or(Some((404, String::new())));

		self.journal.lock().push(format!("http {path}"));
		self.requests.lock().push(request);

		Box::pin(async move {
			match route {
				Some((status, body)) => Ok(ApiResponse { status, body: body.into_bytes() }),
				None => Err(TransportError::from(std::io::Error::other("connection reset"))),
			}
		})
	}
}

/// Initialized Twitch session wired to the doubles.
pub fn session(broker: &Arc<ScriptedBroker>, http: &Arc<RecordingHttp>) -> AuthSession {
	let session = AuthSession::with_http_client(
		SessionConfig::new(CLIENT_ID),
		ProviderDescriptor::twitch(),
		broker.clone(),
		http.clone(),
	);

	session.initialize();

	session
}
