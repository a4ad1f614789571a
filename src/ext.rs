//! Public extension contracts.
//!
//! [`RequestDecorator`] is the seam between session state and outgoing API calls: the
//! [`ApiClient`](crate::api::ApiClient) runs every registered decorator per request instead of
//! keeping mutable default headers.

pub mod request_decorator;

pub use request_decorator::*;
