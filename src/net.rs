//! Thin `fetch` wrapper shared by the graph and corpus loaders.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response};

/// A network failure or non-success response, described for the status line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct FetchError(String);

impl FetchError {
	pub fn new(detail: impl Into<String>) -> Self {
		Self(detail.into())
	}
}

fn js_detail(value: JsValue) -> FetchError {
	FetchError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// GET a document as text, bypassing the HTTP cache. A non-2xx status is an
/// error like any other; callers decide whether to fall through.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_cache(RequestCache::NoStore);

	let request = Request::new_with_str_and_init(url, &opts).map_err(js_detail)?;
	let window = web_sys::window().ok_or_else(|| FetchError::new("no window"))?;
	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_detail)?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| FetchError::new(format!("{url}: not a fetch response")))?;

	if !response.ok() {
		return Err(FetchError::new(format!(
			"{url}: status {}",
			response.status()
		)));
	}

	let text = JsFuture::from(response.text().map_err(js_detail)?)
		.await
		.map_err(js_detail)?;
	text.as_string()
		.ok_or_else(|| FetchError::new(format!("{url}: body is not text")))
}
