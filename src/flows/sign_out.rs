//! Sign-out: local teardown first, then best-effort remote revocation.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::AuthSession,
	http::ApiRequest,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl AuthSession {
	/// Signs out. Never fails.
	///
	/// User and token are dropped (and the `Authorization` header with them) before the
	/// revocation call starts, so a slow or failing provider cannot keep the session alive.
	/// Revocation errors are logged and discarded. Calling this with no session still resets
	/// the flags and invalidates any sign-in that is waiting on the broker. Concurrent calls
	/// run one after another.
	pub async fn sign_out(&self) {
		const KIND: FlowKind = FlowKind::SignOut;

		let span = FlowSpan::new(KIND, "sign_out");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		span.instrument(async {
			let _serial = self.teardown.lock().await;
			let _flight = self.session.begin_sign_out();

			if let Some(credentials) = self.session.clear() {
				self.revoke_best_effort(&credentials.access_token).await;
			}
		})
		.await;

		obs::record_flow_outcome(KIND, FlowOutcome::Success);
	}

	async fn revoke_best_effort(&self, token: &AccessToken) {
		const KIND: FlowKind = FlowKind::Revocation;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		match self.revoke(token).await {
			Ok(()) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				obs::report_failure(KIND, &e);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}
	}

	async fn revoke(&self, token: &AccessToken) -> Result<()> {
		let endpoint = &self.descriptor.endpoints.revocation;

		if let Some(revocation) = self.broker.revoke(token, &self.config.client_id, endpoint) {
			return revocation.await.map_err(Error::from);
		}

		let request = ApiRequest::post_form(
			endpoint.clone(),
			&[("client_id", self.config.client_id.as_str()), ("token", token.expose())],
		);

		self.api
			.send_plain(request)
			.await
			.map(|_| ())
			.map_err(|source| Error::RevocationFailed { source })
	}
}
