//! Signs in to Twitch from a terminal: open the printed URL in a browser, then paste the URL the
//! browser was redirected to.
//!
//! ```sh
//! TWITCH_CLIENT_ID=... [TWITCH_SCOPES="openid user:read:email"] cargo run --example terminal_sign_in
//! ```

// std
use std::{env, io, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use implicit_session::{
	broker::{BrokerFuture, CallbackParams, CallbackResult, RedirectBroker, RedirectUriOptions},
	config::SessionConfig,
	error::BrokerError,
	flows::{AuthSession, SignInOutcome},
	provider::ProviderDescriptor,
	url::Url,
};

const REDIRECT_URI: &str = "http://localhost:3000/callback";

/// Prints the authorization URL and reads the redirect back from stdin.
struct TerminalBroker;
impl RedirectBroker for TerminalBroker {
	fn redirect_uri(&self, _: &RedirectUriOptions) -> Result<String, BrokerError> {
		Ok(REDIRECT_URI.into())
	}

	fn open<'a>(&'a self, authorization_url: &'a Url) -> BrokerFuture<'a, CallbackResult> {
		println!("Open {authorization_url} and paste the redirected URL (empty line cancels):");

		Box::pin(async move {
			let line = tokio::task::spawn_blocking(|| {
				let mut line = String::new();

				io::stdin().read_line(&mut line).map(|_| line)
			})
			.await
			.map_err(BrokerError::other)?
			.map_err(BrokerError::other)?;
			let line = line.trim();

			if line.is_empty() {
				return Ok(CallbackResult::Cancelled);
			}

			match Url::parse(line) {
				Ok(url) => Ok(CallbackResult::Success(CallbackParams::from_redirect_url(&url))),
				Err(e) => Ok(CallbackResult::Failed { message: Some(e.to_string()) }),
			}
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut config = SessionConfig::new(env::var("TWITCH_CLIENT_ID")?);

	if let Ok(raw) = env::var("TWITCH_SCOPES") {
		config.scopes = raw.parse()?;
	}

	let session = AuthSession::new(
		config,
		ProviderDescriptor::twitch(),
		Arc::new(TerminalBroker),
	);

	session.initialize();
	session.subscribe(|snapshot| {
		println!(
			"[rev {}] logging_in={} logging_out={} user={:?}",
			snapshot.revision,
			snapshot.is_logging_in,
			snapshot.is_logging_out,
			snapshot.user.as_ref().map(|user| user.display_name.as_str())
		);
	});

	match session.sign_in().await? {
		SignInOutcome::SignedIn(user) => {
			println!("Signed in as {} <{}> (id {}).", user.display_name, user.email, user.id);

			session.sign_out().await;

			println!("Signed out; the token was revoked on a best-effort basis.");
		},
		other => println!("Sign-in ended without a session: {other:?}."),
	}

	Ok(())
}
