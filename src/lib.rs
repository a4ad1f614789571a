//! OAuth 2.0 implicit-grant sign-in sessions: CSRF-checked callbacks, user-profile exchange,
//! and per-request bearer decoration for identity providers such as Twitch.
//!
//! [`flows::AuthSession`] drives the protocol. It asks a [`broker::RedirectBroker`] to open the
//! authorization URL, validates the returned `state`, fetches the user profile with the returned
//! token, and commits user + token together. Outgoing API calls made through
//! [`api::ApiClient`] receive `Client-Id` and `Authorization` headers from the session on every
//! request instead of from mutable client defaults.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod broker;
pub mod config;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod session;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
