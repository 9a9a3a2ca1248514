/// Default base URL for runner transport requests.
pub const DEFAULT_RUNNER_BASE_URL: &str = "http://127.0.0.1:5000";

/// Normalize a base URL for the runner service.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_RUNNER_BASE_URL`]
/// 2) surrounding whitespace and trailing slashes are stripped
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_RUNNER_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Endpoint that begins a remote execution.
pub fn start_url(base: &str) -> String {
    format!("{}/start", normalize_base_url(base))
}

/// Endpoint that forwards one chunk of interactive input.
pub fn input_url(base: &str) -> String {
    format!("{}/input", normalize_base_url(base))
}

/// Event-stream endpoint scoped to one execution id.
///
/// The id is opaque and assigned by the remote side, so it is
/// percent-encoded rather than trusted to be URL-safe.
pub fn stream_url(base: &str, execution_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(execution_id.as_bytes()).collect();
    format!("{}/stream?id={encoded}", normalize_base_url(base))
}
