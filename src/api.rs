// src/api.rs
//! Client for the "get user data" endpoint.
//!
//! ```text
//! POST {api_url}?access_token=<token>
//! user_id=<id>&fetch=<field,field,...>      (or all_users=1)
//! ```
//!
//! A reply counts as success only when HTTP says 200 *and* the body's
//! `api_status` is 200. A body that is JSON but not an object is passed on;
//! the normalizer reports it as `InvalidPayloadShape`.

use serde_json::Value;

use crate::{
    config::options::ClientOptions,
    core::net,
    error::FetchError,
    normalize::{self, NormalizedField},
    progress::Progress,
    request::FetchRequest,
};

/// Everything one successful fetch produced.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub payload: Value,
    pub fields: Vec<NormalizedField>,
}

impl FetchOutcome {
    /// Requested fields with no entry in the payload.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.request
            .fields()
            .iter()
            .filter(|f| !self.fields.iter().any(|nf| nf.name == **f))
            .map(String::as_str)
            .collect()
    }
}

/// Issue the request and return the raw, checked payload.
pub fn fetch_payload(
    opts: &ClientOptions,
    request: &FetchRequest,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Value, FetchError> {
    logf!("Fetch: Begin target={} fields={:?}", request.target(), request.fields());

    let client = net::build_client(opts)?;
    let query = [("access_token", request.token())];
    let form = request.form_pairs();

    let resp = net::post_form(&client, opts, &query, &form, progress.as_deref_mut())?;
    let status = resp.status().as_u16();
    if status != 200 {
        loge!("Fetch: HTTP status {status}");
        return Err(FetchError::Status(status));
    }

    let body = resp.bytes()?;
    let payload: Value = serde_json::from_slice(&body)?;
    check_api_status(&payload)?;

    logf!("Fetch: OK bytes={}", body.len());
    Ok(payload)
}

/// Fetch, then normalize the requested fields.
pub fn fetch(
    opts: &ClientOptions,
    request: &FetchRequest,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<FetchOutcome, FetchError> {
    let payload = fetch_payload(opts, request, progress.as_deref_mut())?;
    let fields = normalize::normalize(&payload, request.fields())?;

    if let Some(p) = progress.as_deref_mut() {
        p.log("Data fetched successfully!");
        p.finish();
    }

    Ok(FetchOutcome { request: request.clone(), payload, fields })
}

/// Object payloads must carry `api_status == 200` (number or numeric string).
pub fn check_api_status(payload: &Value) -> Result<(), FetchError> {
    let Value::Object(map) = payload else {
        return Ok(());
    };

    let ok = match map.get("api_status") {
        Some(Value::Number(n)) => n.as_u64() == Some(200),
        Some(Value::String(s)) => s.trim() == "200",
        _ => false,
    };
    if ok {
        return Ok(());
    }

    let message = match map.get("error_message") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | None => s!("Unknown error"),
        Some(other) => other.to_string(),
    };
    loge!("Fetch: API error: {message}");
    Err(FetchError::Api { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_as_number_or_string() {
        assert!(check_api_status(&json!({"api_status": 200})).is_ok());
        assert!(check_api_status(&json!({"api_status": "200"})).is_ok());
    }

    #[test]
    fn api_error_carries_message() {
        let err = check_api_status(&json!({"api_status": 400, "error_message": "bad token"})).unwrap_err();
        assert!(matches!(err, FetchError::Api { ref message } if message == "bad token"));
    }

    #[test]
    fn missing_status_is_unknown_error() {
        let err = check_api_status(&json!({"followers": []})).unwrap_err();
        assert!(matches!(err, FetchError::Api { ref message } if message == "Unknown error"));
    }

    #[test]
    fn non_object_passes_through() {
        assert!(check_api_status(&json!([1, 2])).is_ok());
        assert!(check_api_status(&json!("x")).is_ok());
    }
}
