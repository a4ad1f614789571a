// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how authorization URLs are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Character used to join scopes when constructing `scope` parameters.
	pub scope_delimiter: char,
	/// Whether the provider understands the `force_verify` parameter.
	pub supports_force_verify: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { scope_delimiter: ' ', supports_force_verify: true }
	}
}
