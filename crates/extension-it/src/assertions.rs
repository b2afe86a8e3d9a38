//! Assertion helpers over host responses.

use crate::error::{ErrorKind, HarnessError, HarnessResult};
use crate::response::Response;
use crate::status::RestStatus;
use serde_json::{Map, Value};
use std::future::Future;

pub fn rest_status(response: &Response) -> Option<RestStatus> {
    RestStatus::from_code(response.status_code())
}

/// Fails with an assertion error unless `response` carries `expected`.
pub fn assert_status(response: &Response, expected: RestStatus) -> HarnessResult<()> {
    match rest_status(response) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(HarnessError::assertion(format!(
            "expected status {expected} but got {}",
            actual.map_or_else(|| response.status_code().to_string(), |s| s.to_string())
        ))),
    }
}

pub fn entity_as_map(response: &Response) -> HarnessResult<Map<String, Value>> {
    match response.json_value()? {
        Value::Object(map) => Ok(map),
        other => Err(HarnessError::from_parse_error(
            format!("expected a JSON object, found {other}"),
            "response body as map",
        )),
    }
}

pub fn assert_eq_value<T>(expected: T, actual: T, what: &str) -> HarnessResult<()>
where
    T: PartialEq + std::fmt::Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "{what}: expected {expected:?} but got {actual:?}"
        )))
    }
}

/// Awaits `call` and checks it failed with `kind` and a message containing `message`.
///
/// A call that completes fails the assertion. Any other error is returned unchanged.
pub async fn assert_fail_with<T, F>(kind: ErrorKind, message: &str, call: F) -> HarnessResult<()>
where
    F: Future<Output = HarnessResult<T>>,
{
    match call.await {
        Ok(_) => Err(HarnessError::assertion(format!(
            "expected {kind} containing \"{message}\" but the call completed"
        ))),
        Err(e) if e.kind() == kind && e.to_string().contains(message) => Ok(()),
        Err(e) => Err(e),
    }
}
