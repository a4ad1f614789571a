//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering HTTPS-only
//! endpoints (loopback hosts excepted), the user-profile resource, and provider quirks
//! (scope delimiter, `force_verify` support).

pub mod descriptor;

pub use descriptor::*;
