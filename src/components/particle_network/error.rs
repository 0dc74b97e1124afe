use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while attaching the network to the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
	/// No global `window` (not running in a browser).
	#[error("no window available")]
	NoWindow,
	/// The canvas would not hand out a 2D context.
	#[error("canvas has no 2d context")]
	NoContext,
	/// A tunable is out of range; names the field.
	#[error("invalid network config: {0}")]
	InvalidConfig(&'static str),
	/// A DOM call threw.
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for NetworkError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
