//! Implicit-grant sign-in.
//!
//! [`AuthSession::sign_in`] generates a fresh state, builds the authorization URL, suspends on
//! the redirect broker, checks the echoed state before the token is used, fetches the user
//! profile with the candidate token as a call-scoped bearer, and only then commits user and
//! token together. Any failure leaves the session exactly as it was.

// self
use crate::{
	_prelude::*,
	auth::UserProfile,
	broker::CallbackResult,
	error::ConfigError,
	ext::RequestDecorator,
	flows::{AuthSession, AuthorizationRequest},
	http::HeaderSet,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::AUTHORIZATION_HEADER,
};

/// Non-error results of [`AuthSession::sign_in`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInOutcome {
	/// User and token are now installed.
	SignedIn(UserProfile),
	/// The user dismissed the interactive surface.
	Cancelled,
	/// The user declined consent (`access_denied`).
	Denied {
		/// Provider-supplied description.
		description: Option<String>,
	},
	/// The broker ended without a redirect.
	Dismissed {
		/// Broker-supplied reason.
		message: Option<String>,
	},
}
impl SignInOutcome {
	/// Returns true when the session is now signed in.
	pub fn is_signed_in(&self) -> bool {
		matches!(self, Self::SignedIn(_))
	}
}

impl AuthSession {
	/// Runs the interactive implicit-grant sign-in.
	///
	/// Cancellation, `access_denied`, and broker-side aborts resolve to `Ok` without touching
	/// the session. A second call while one is suspended fails with
	/// [`Error::SignInInProgress`]; a sign-out during the suspension makes this call fail with
	/// [`Error::Superseded`].
	pub async fn sign_in(&self) -> Result<SignInOutcome> {
		const KIND: FlowKind = FlowKind::SignIn;

		let span = FlowSpan::new(KIND, "sign_in");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run_sign_in()).await;

		match &result {
			Ok(SignInOutcome::SignedIn(_)) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Ok(outcome) => {
				obs::report_outcome(KIND, outcome_label(outcome));
				obs::record_flow_outcome(KIND, FlowOutcome::Cancelled);
			},
			Err(e) => {
				obs::report_failure(KIND, e);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn run_sign_in(&self) -> Result<SignInOutcome> {
		let flight = self.session.begin_sign_in()?;
		let redirect_uri = self.broker.redirect_uri(&self.config.redirect)?;
		let redirect_uri =
			Url::parse(&redirect_uri).map_err(|source| ConfigError::InvalidRedirect { source })?;
		let request = AuthorizationRequest::new(&self.descriptor, &self.config, redirect_uri);
		let params = match self.broker.open(&request.authorization_url).await? {
			CallbackResult::Success(params) => params,
			CallbackResult::Cancelled => return Ok(SignInOutcome::Cancelled),
			CallbackResult::Failed { message } => return Ok(SignInOutcome::Dismissed { message }),
		};

		if params.is_access_denied() {
			return Ok(SignInOutcome::Denied { description: params.error_description });
		}

		request.validate_state(params.state.as_deref())?;

		if let Some(code) = params.error {
			return Err(Error::Authorization { code, description: params.error_description });
		}

		let token = params.access_token.ok_or(Error::MissingAccessToken)?;
		let bearer = token.bearer();
		let candidate =
			move |headers: &mut HeaderSet| headers.insert(AUTHORIZATION_HEADER, bearer.clone());
		let response = self
			.api
			.get_with(&self.descriptor.user_profile_path, Some(&candidate as &dyn RequestDecorator))
			.await
			.map_err(|source| Error::ProfileFetchFailed { source })?;
		let user = UserProfile::from_users_response(&response.body)
			.map_err(|source| Error::ProfileFetchFailed { source })?;

		self.session.commit(flight.epoch(), user.clone(), token)?;

		Ok(SignInOutcome::SignedIn(user))
	}
}

fn outcome_label(outcome: &SignInOutcome) -> &'static str {
	match outcome {
		SignInOutcome::SignedIn(_) => "signed_in",
		SignInOutcome::Cancelled => "cancelled",
		SignInOutcome::Denied { .. } => "denied",
		SignInOutcome::Dismissed { .. } => "dismissed",
	}
}
