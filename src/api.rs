//! Provider API client with per-request header decoration.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::ApiError,
	ext::RequestDecorator,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HeaderSet},
};

/// HTTP client bound to the provider's API base URL.
///
/// The client holds no mutable header state. Each call starts from an empty
/// [`HeaderSet`], runs the registered [`RequestDecorator`]s in order, then an optional
/// call-scoped decorator, and only then hands the request to the transport.
#[derive(Clone)]
pub struct ApiClient {
	http: Arc<dyn ApiHttpClient>,
	base: Url,
	decorators: Vec<Arc<dyn RequestDecorator>>,
}
impl ApiClient {
	/// Creates a client that resolves relative paths against `base`.
	pub fn new(http: Arc<dyn ApiHttpClient>, base: Url) -> Self {
		Self { http, base, decorators: Vec::new() }
	}

	/// Appends a decorator applied to every decorated request.
	pub fn with_decorator(mut self, decorator: Arc<dyn RequestDecorator>) -> Self {
		self.decorators.push(decorator);

		self
	}

	/// API base URL.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Resolves a path (with or without a leading `/`) against the API base.
	pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
		self.base
			.join(path.trim_start_matches('/'))
			.map_err(|source| ApiError::InvalidPath { path: path.to_owned(), source })
	}

	/// Headers a decorated request would carry right now.
	pub fn current_headers(&self) -> HeaderSet {
		let mut headers = HeaderSet::default();

		self.decorate(&mut headers, None);

		headers
	}

	/// Issues a decorated `GET` and fails on non-2xx statuses.
	pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
		self.get_with(path, None).await
	}

	/// Issues a decorated `GET` and deserializes the JSON body.
	pub async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
	where
		T: DeserializeOwned,
	{
		let response = self.get(path).await?;
		let mut de = serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| ApiError::Parse { source })
	}

	/// Issues a decorated `GET` with an extra decorator applied after the registered ones.
	pub(crate) async fn get_with(
		&self,
		path: &str,
		call_scoped: Option<&dyn RequestDecorator>,
	) -> Result<ApiResponse, ApiError> {
		let mut request = ApiRequest::get(self.resolve(path)?);

		self.decorate(&mut request.headers, call_scoped);

		self.dispatch(request).await
	}

	/// Sends a request exactly as given, without decoration, and fails on non-2xx statuses.
	pub async fn send_plain(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
		self.dispatch(request).await
	}

	fn decorate(&self, headers: &mut HeaderSet, call_scoped: Option<&dyn RequestDecorator>) {
		for decorator in &self.decorators {
			decorator.decorate(headers);
		}
		if let Some(decorator) = call_scoped {
			decorator.decorate(headers);
		}
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
		let response = self.http.execute(request).await?;

		if response.is_success() {
			Ok(response)
		} else {
			Err(ApiError::Status { status: response.status, body_preview: response.body_preview() })
		}
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base", &self.base.as_str())
			.field("decorators", &self.decorators.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::TransportError, http::HttpFuture};

	#[derive(Default)]
	struct Recorder {
		requests: Mutex<Vec<ApiRequest>>,
		status: u16,
		body: &'static str,
	}
	impl ApiHttpClient for Recorder {
		fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse> {
			self.requests.lock().push(request);

			let response = ApiResponse { status: self.status, body: self.body.as_bytes().to_vec() };

			Box::pin(async move { Ok::<_, TransportError>(response) })
		}
	}

	fn base() -> Url {
		Url::parse("https://api.example.com/helix/").expect("Base URL fixture should parse.")
	}

	#[tokio::test]
	async fn decorators_run_in_order_and_call_scoped_wins() {
		let recorder = Arc::new(Recorder { status: 200, body: "{}", ..Default::default() });
		let client = ApiClient::new(recorder.clone() as Arc<dyn ApiHttpClient>, base())
			.with_decorator(Arc::new(|h: &mut HeaderSet| h.insert("Client-Id", "abc")))
			.with_decorator(Arc::new(|h: &mut HeaderSet| h.insert("Authorization", "Bearer old")));
		let scoped = |h: &mut HeaderSet| h.insert("Authorization", "Bearer new");

		client
			.get_with("/users", Some(&scoped as &dyn RequestDecorator))
			.await
			.expect("Decorated GET should succeed.");

		let requests = recorder.requests.lock();

		assert_eq!(requests[0].url.as_str(), "https://api.example.com/helix/users");
		assert_eq!(requests[0].headers.get("client-id"), Some("abc"));
		assert_eq!(requests[0].headers.get("authorization"), Some("Bearer new"));
	}

	#[tokio::test]
	async fn non_success_status_is_reported_with_preview() {
		let recorder =
			Arc::new(Recorder { status: 401, body: "{\"message\":\"bad\"}", ..Default::default() });
		let client = ApiClient::new(recorder, base());
		let err = client.get("users").await.expect_err("401 responses should fail.");

		match err {
			ApiError::Status { status, body_preview } => {
				assert_eq!(status, 401);
				assert!(body_preview.contains("bad"));
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[tokio::test]
	async fn get_json_reports_parse_paths() {
		#[derive(Debug, Deserialize)]
		struct Payload {
			#[allow(dead_code)]
			total: u32,
		}

		let recorder =
			Arc::new(Recorder { status: 200, body: "{\"total\":\"x\"}", ..Default::default() });
		let client = ApiClient::new(recorder, base());
		let err = client.get_json::<Payload>("follows").await.expect_err("Bad JSON should fail.");

		assert!(matches!(err, ApiError::Parse { .. }));
		assert!(client.current_headers().is_empty());
	}
}
