//! Provider descriptor data structures shared by all flows.
//!
//! A descriptor pins the fixed identity-provider endpoints (authorization, revocation, API
//! base, and the user-profile resource) so flows never take URLs per call.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Profile path used when a descriptor does not name one.
pub const DEFAULT_USER_PROFILE_PATH: &str = "users";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the user agent is sent to.
	pub authorization: Url,
	/// Token revocation endpoint used during sign-out.
	pub revocation: Url,
	/// Base URL for authenticated API calls; always ends with `/`.
	pub api_base: Url,
}

/// Immutable provider descriptor consumed by flows.
///
/// Deserialization goes through [`ProviderDescriptorBuilder`], so loaded descriptors obey the
/// same endpoint rules and `api_base` normalization as built ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
	/// Human-readable provider name used in logs.
	pub name: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// API path (relative to [`ProviderEndpoints::api_base`]) returning the current user.
	pub user_profile_path: String,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided name.
	pub fn builder(name: impl Into<String>) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(name)
	}

	/// Descriptor for Twitch's identity service and Helix API.
	pub fn twitch() -> Self {
		fn fixed(raw: &str) -> Url {
			match Url::parse(raw) {
				Ok(url) => url,
				Err(e) => unreachable!("static Twitch endpoint `{raw}` must parse: {e}"),
			}
		}

		Self {
			name: "twitch".into(),
			endpoints: ProviderEndpoints {
				authorization: fixed("https://id.twitch.tv/oauth2/authorize"),
				revocation: fixed("https://id.twitch.tv/oauth2/revoke"),
				api_base: fixed("https://api.twitch.tv/helix/"),
			},
			user_profile_path: DEFAULT_USER_PROFILE_PATH.into(),
			quirks: ProviderQuirks::default(),
		}
	}
}

impl<'de> Deserialize<'de> for ProviderDescriptor {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct Raw {
			name: String,
			endpoints: ProviderEndpoints,
			#[serde(default = "default_user_profile_path")]
			user_profile_path: String,
			#[serde(default)]
			quirks: ProviderQuirks,
		}

		let raw = Raw::deserialize(deserializer)?;

		ProviderDescriptor::builder(raw.name)
			.authorization_endpoint(raw.endpoints.authorization)
			.revocation_endpoint(raw.endpoints.revocation)
			.api_base(raw.endpoints.api_base)
			.user_profile_path(raw.user_profile_path)
			.quirks(raw.quirks)
			.build()
			.map_err(DeError::custom)
	}
}

fn default_user_profile_path() -> String {
	DEFAULT_USER_PROFILE_PATH.into()
}
