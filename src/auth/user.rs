//! Identity-provider user profiles and their wire representation.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{_prelude::*, error::ApiError};

/// Immutable snapshot of the signed-in user's identity.
///
/// Only produced by a successful profile exchange; every field is always populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Provider-assigned numeric user identifier.
	pub id: u64,
	/// Public display name.
	pub display_name: String,
	/// Verified e-mail address.
	pub email: String,
	/// Avatar URL.
	pub profile_image_url: String,
}
impl UserProfile {
	/// Maps the first entry of a `{"data": [...]}` users response into a profile.
	pub fn from_users_response(body: &[u8]) -> Result<Self, ApiError> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let envelope: UsersEnvelope = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ApiError::Parse { source })?;
		let user = envelope.data.into_iter().next().ok_or_else(|| ApiError::UnexpectedPayload {
			message: "users response contains no entries".into(),
		})?;

		Ok(Self::from_wire(user))
	}

	fn from_wire(value: WireUser) -> Self {
		Self {
			id: value.id,
			display_name: value.display_name,
			email: value.email,
			profile_image_url: value.profile_image_url,
		}
	}
}

#[derive(Deserialize)]
struct UsersEnvelope {
	data: Vec<WireUser>,
}

#[derive(Deserialize)]
struct WireUser {
	#[serde(deserialize_with = "deserialize_numeric_id")]
	id: u64,
	display_name: String,
	email: String,
	profile_image_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
	Number(u64),
	Text(String),
}

fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	match WireId::deserialize(deserializer)? {
		WireId::Number(id) => Ok(id),
		WireId::Text(raw) => raw
			.trim()
			.parse()
			.map_err(|_| DeError::custom(format!("user id `{raw}` is not a non-negative integer"))),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn maps_first_user_and_coerces_string_id() {
		let body = br#"{"data":[
			{"id":"42","login":"foo","display_name":"foo","email":"f@x.com","profile_image_url":"http://x/y.png"},
			{"id":"43","display_name":"bar","email":"b@x.com","profile_image_url":"http://x/z.png"}
		]}"#;
		let user = UserProfile::from_users_response(body).expect("Users response should map.");

		assert_eq!(
			user,
			UserProfile {
				id: 42,
				display_name: "foo".into(),
				email: "f@x.com".into(),
				profile_image_url: "http://x/y.png".into(),
			}
		);
	}

	#[test]
	fn accepts_numeric_ids() {
		let body = br#"{"data":[{"id":7,"display_name":"n","email":"n@x.com","profile_image_url":"u"}]}"#;

		assert_eq!(UserProfile::from_users_response(body).expect("Numeric id should map.").id, 7);
	}

	#[test]
	fn empty_data_is_unexpected() {
		let err = UserProfile::from_users_response(br#"{"data":[]}"#)
			.expect_err("Empty users list must be rejected.");

		assert!(matches!(err, ApiError::UnexpectedPayload { .. }));
	}

	#[test]
	fn malformed_fields_report_their_path() {
		let body = br#"{"data":[{"id":"abc","display_name":"n","email":"n@x.com","profile_image_url":"u"}]}"#;
		let err = UserProfile::from_users_response(body).expect_err("Non-numeric ids must fail.");

		match err {
			ApiError::Parse { source } => assert_eq!(source.path().to_string(), "data[0].id"),
			other => panic!("Unexpected error: {other:?}."),
		}

		let missing = br#"{"data":[{"id":"1","display_name":"n","profile_image_url":"u"}]}"#;

		assert!(matches!(
			UserProfile::from_users_response(missing),
			Err(ApiError::Parse { .. })
		));
	}
}
