//! Auth-domain values: scopes, secrets, CSRF state, and user profiles.

pub mod scope;
pub mod secret;
pub mod state;
pub mod user;

pub use scope::*;
pub use secret::*;
pub use state::*;
pub use user::*;
