use thiserror::Error;

/// Failures the canvas recovers from locally.
///
/// None of these reach the host: callers log them and fall back to leaving
/// the node set or gesture untouched.
#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("record has no id")]
	MissingId,
	#[error("record {id} has invalid size {size}")]
	InvalidSize { id: String, size: f64 },
	#[error("duplicate node id {0}")]
	DuplicateId(String),
	#[error("drop payload is empty")]
	EmptyDropPayload,
	#[error("drop payload could not be parsed: {0}")]
	DropPayload(#[from] serde_json::Error),
	#[error("no node with id {0}")]
	UnknownNode(String),
	#[error("dom: {0}")]
	Dom(String),
}

impl From<wasm_bindgen::JsValue> for CanvasError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		CanvasError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
