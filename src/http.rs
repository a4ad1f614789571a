//! Transport primitives for provider API calls.
//!
//! The module exposes [`ApiHttpClient`] over crate-owned request/response types
//! ([`ApiRequest`], [`ApiResponse`], [`HeaderSet`]) so downstream crates can plug in any
//! HTTP stack. The reqwest-backed [`ReqwestHttpClient`] ships behind the default `reqwest`
//! feature.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports used for profile lookups and token revocation.
///
/// Implementations must send exactly the headers present on the request; header
/// decoration happens before the request reaches the transport.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and resolves with the raw response, whatever its status.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse>;
}

/// Case-insensitive header map; names are stored lowercased.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);
impl HeaderSet {
	/// Inserts or replaces a header.
	pub fn insert(&mut self, name: &str, value: impl Into<String>) {
		self.0.insert(name.to_ascii_lowercase(), value.into());
	}

	/// Removes a header, returning its previous value.
	pub fn remove(&mut self, name: &str) -> Option<String> {
		self.0.remove(&name.to_ascii_lowercase())
	}

	/// Returns a header value.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns true when the header is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(&name.to_ascii_lowercase())
	}

	/// Iterates `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// Number of headers.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no headers are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for HeaderSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut map = f.debug_map();

		for (name, value) in self.iter() {
			if name == "authorization" {
				map.entry(&name, &"<redacted>");
			} else {
				map.entry(&name, &value);
			}
		}

		map.finish()
	}
}

/// HTTP methods the session issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
}

/// Outgoing request handed to an [`ApiHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// Request method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Headers to send verbatim.
	pub headers: HeaderSet,
	/// Pre-encoded request body.
	pub body: Option<String>,
}
impl ApiRequest {
	/// Builds a bodyless `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, headers: HeaderSet::default(), body: None }
	}

	/// Builds a `POST` with an `application/x-www-form-urlencoded` body.
	pub fn post_form(url: Url, form: &[(&str, &str)]) -> Self {
		let body = form
			.iter()
			.map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
			.collect::<Vec<_>>()
			.join("&");
		let mut headers = HeaderSet::default();

		headers.insert("content-type", "application/x-www-form-urlencoded");

		Self { method: Method::Post, url, headers, body: Some(body) }
	}
}

/// Raw response returned by an [`ApiHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	const PREVIEW_LEN: usize = 256;

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Lossy UTF-8 prefix of the body for diagnostics.
	pub fn body_preview(&self) -> String {
		let text = String::from_utf8_lossy(&self.body);

		text.chars().take(Self::PREVIEW_LEN).collect()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body } = request;
			let mut builder = match method {
				Method::Get => client.get(url),
				Method::Post => client.post(url),
			};

			for (name, value) in headers.iter() {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
