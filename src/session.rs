//! Session state, read snapshots, observers, and the header decorator derived from them.
//!
//! All writes go through one [`RwLock`] and are never held across an `.await`, so every
//! observer and every outgoing request sees either no credentials or a complete
//! user + token pair. Each teardown bumps an epoch; sign-ins that started under an older
//! epoch cannot commit. Observer delivery is serialized, so every observer receives
//! snapshots in `revision` order even when mutations race on different threads.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use parking_lot::ReentrantMutex;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, UserProfile},
	ext::RequestDecorator,
	http::HeaderSet,
};

/// Header carrying the OAuth client identifier on every API call.
pub const CLIENT_ID_HEADER: &str = "Client-Id";
/// Header carrying the bearer credential while signed in.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Callback invoked with a fresh [`SessionSnapshot`] after every state change.
pub type SessionObserver = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Handle returned by [`Session::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// User and token installed together by a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Signed-in user.
	pub user: UserProfile,
	/// Bearer token returned by the implicit grant.
	pub access_token: AccessToken,
	/// Commit instant.
	pub signed_in_at: OffsetDateTime,
}

/// Read-only view exposed to UI layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
	/// Signed-in user, if any.
	pub user: Option<UserProfile>,
	/// A sign-in attempt is running.
	pub is_logging_in: bool,
	/// A sign-out is running.
	pub is_logging_out: bool,
	/// Monotonic change counter; later snapshots carry larger values.
	pub revision: u64,
}

#[derive(Debug, Default)]
struct SessionState {
	credentials: Option<Credentials>,
	login_in_flight: bool,
	logout_in_flight: bool,
	client_id: Option<String>,
	epoch: u64,
	revision: u64,
}
impl SessionState {
	fn snapshot(&self) -> SessionSnapshot {
		SessionSnapshot {
			user: self.credentials.as_ref().map(|c| c.user.clone()),
			is_logging_in: self.login_in_flight,
			is_logging_out: self.logout_in_flight,
			revision: self.revision,
		}
	}
}

/// Process-wide authentication state owned by an [`AuthSession`](crate::flows::AuthSession).
#[derive(Default)]
pub struct Session {
	state: RwLock<SessionState>,
	// Spans the write and every observer call; reentrant for mutations made inside an observer.
	delivery: ReentrantMutex<()>,
	observers: Mutex<Vec<(SubscriptionId, SessionObserver)>>,
	next_subscription: AtomicU64,
}
impl Session {
	/// Current read-only view.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.state.read().snapshot()
	}

	/// Signed-in user, if any.
	pub fn user(&self) -> Option<UserProfile> {
		self.state.read().credentials.as_ref().map(|c| c.user.clone())
	}

	/// Current bearer token, if any.
	pub fn access_token(&self) -> Option<AccessToken> {
		self.state.read().credentials.as_ref().map(|c| c.access_token.clone())
	}

	/// Current user + token pair, if any.
	pub fn credentials(&self) -> Option<Credentials> {
		self.state.read().credentials.clone()
	}

	/// Registers an observer. It is not called for the current state.
	pub fn subscribe(&self, observer: SessionObserver) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));

		self.observers.lock().push((id, observer));

		id
	}

	/// Removes an observer; returns false when the id is unknown.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut observers = self.observers.lock();
		let before = observers.len();

		observers.retain(|(candidate, _)| *candidate != id);

		observers.len() != before
	}

	pub(crate) fn install_client_id(&self, client_id: &str) {
		self.mutate(|state| {
			state.client_id = Some(client_id.to_owned());
		});
	}

	/// Marks a sign-in as running; the returned guard clears the flag when dropped.
	pub(crate) fn begin_sign_in(&self) -> Result<FlightGuard<'_>> {
		let mut epoch = None;

		self.mutate(|state| {
			if !state.login_in_flight {
				state.login_in_flight = true;
				epoch = Some(state.epoch);
			}
		});

		epoch
			.map(|epoch| FlightGuard { session: self, kind: Flight::SignIn, epoch })
			.ok_or(Error::SignInInProgress)
	}

	/// Marks a sign-out as running; the returned guard clears the flag when dropped.
	pub(crate) fn begin_sign_out(&self) -> FlightGuard<'_> {
		let mut epoch = 0;

		self.mutate(|state| {
			state.logout_in_flight = true;
			epoch = state.epoch;
		});

		FlightGuard { session: self, kind: Flight::SignOut, epoch }
	}

	/// Installs user and token in one step unless a teardown happened since `epoch`.
	pub(crate) fn commit(
		&self,
		epoch: u64,
		user: UserProfile,
		access_token: AccessToken,
	) -> Result<()> {
		let mut committed = false;

		self.mutate(|state| {
			if state.epoch == epoch {
				state.credentials =
					Some(Credentials { user, access_token, signed_in_at: OffsetDateTime::now_utc() });
				committed = true;
			}
		});

		if committed { Ok(()) } else { Err(Error::Superseded) }
	}

	/// Drops the credentials, invalidates in-flight sign-ins, and returns what was held.
	pub(crate) fn clear(&self) -> Option<Credentials> {
		let mut taken = None;

		self.mutate(|state| {
			taken = state.credentials.take();
			state.epoch += 1;
		});

		taken
	}

	fn end_flight(&self, kind: Flight) {
		self.mutate(|state| match kind {
			Flight::SignIn => state.login_in_flight = false,
			Flight::SignOut => state.logout_in_flight = false,
		});
	}

	fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
		let _delivery = self.delivery.lock();
		let snapshot = {
			let mut state = self.state.write();

			f(&mut state);

			state.revision += 1;

			state.snapshot()
		};

		self.notify(&snapshot);
	}

	fn notify(&self, snapshot: &SessionSnapshot) {
		let observers =
			self.observers.lock().iter().map(|(_, observer)| observer.clone()).collect::<Vec<_>>();

		for observer in observers {
			observer(snapshot);
		}
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("snapshot", &self.snapshot())
			.field("observers", &self.observers.lock().len())
			.finish()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flight {
	SignIn,
	SignOut,
}

/// RAII guard that resets an in-flight flag on every exit path, including future drops.
pub(crate) struct FlightGuard<'a> {
	session: &'a Session,
	kind: Flight,
	epoch: u64,
}
impl FlightGuard<'_> {
	/// Session epoch observed when the flight started.
	pub(crate) fn epoch(&self) -> u64 {
		self.epoch
	}
}
impl Drop for FlightGuard<'_> {
	fn drop(&mut self) {
		self.session.end_flight(self.kind);
	}
}

/// [`RequestDecorator`] deriving `Client-Id` and `Authorization` from session state.
///
/// `Client-Id` is sent once [`AuthSession::initialize`](crate::flows::AuthSession::initialize)
/// ran and survives sign-out; `Authorization` is present exactly while credentials are held.
#[derive(Clone, Debug)]
pub struct SessionHeaders(pub Arc<Session>);
impl RequestDecorator for SessionHeaders {
	fn decorate(&self, headers: &mut HeaderSet) {
		let state = self.0.state.read();

		if let Some(client_id) = &state.client_id {
			headers.insert(CLIENT_ID_HEADER, client_id.clone());
		}

		match &state.credentials {
			Some(credentials) => headers.insert(AUTHORIZATION_HEADER, credentials.access_token.bearer()),
			None => {
				headers.remove(AUTHORIZATION_HEADER);
			},
		}
	}
}
