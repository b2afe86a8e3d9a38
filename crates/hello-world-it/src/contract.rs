//! The hello-world HTTP contract, one [`TestCase`] per route behaviour.

use crate::routes::{GOODBYE_URI, HELLO_BASE_URI, hello_name_uri};
use extension_it::{
    ErrorKind, HarnessConfig, HarnessError, HarnessResult, Method, ReadinessConfig, RestClient,
    RestStatus, TestCase, assert_fail_with, assert_status, make_request, to_http_entity,
};
use log::debug;
use serde::{Deserialize, Serialize};

pub const NO_CONTENT_MESSAGE: &str = "No content included with POST request";
pub const NO_ADJECTIVE_MESSAGE: &str = "No adjective included with POST request";

/// Reply to a successful POST on the hello route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjectivesResponse {
    pub world_adjectives: Vec<String>,
}

/// Harness defaults for the hello-world extension: readiness is probed on the hello route.
pub fn default_config() -> HarnessConfig {
    HarnessConfig {
        readiness: ReadinessConfig {
            probe_endpoint: Some(HELLO_BASE_URI.to_string()),
            ..ReadinessConfig::default()
        },
        ..HarnessConfig::default()
    }
}

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new("get_rest_hello_action", get_rest_hello_action),
        TestCase::new("post_rest_hello_action", post_rest_hello_action),
        TestCase::new("post_no_adjective", post_no_adjective),
        TestCase::new("post_invalid_content", post_invalid_content),
        TestCase::new("put_rest_hello_action", put_rest_hello_action),
        TestCase::new("delete_rest_hello_action", delete_rest_hello_action),
    ]
}

pub async fn get_rest_hello_action(client: RestClient) -> HarnessResult<()> {
    let response = make_request(&client, Method::Get, HELLO_BASE_URI, None, None).await?;
    assert_status(&response, RestStatus::Ok)
    // TODO: assert the body reads "Hello World!" once the host's reply format is confirmed
}

pub async fn post_rest_hello_action(client: RestClient) -> HarnessResult<()> {
    let adjectives = post_adjective(&client, "test").await?;
    match adjectives.world_adjectives.first() {
        Some(first) if first == "test" => Ok(()),
        other => Err(HarnessError::assertion(format!(
            "expected worldAdjectives[0] to be \"test\" but got {other:?}"
        ))),
    }
}

pub async fn post_no_adjective(client: RestClient) -> HarnessResult<()> {
    assert_fail_with(
        ErrorKind::ErrorResponse,
        NO_CONTENT_MESSAGE,
        make_request(&client, Method::Post, HELLO_BASE_URI, None, None),
    )
    .await
}

pub async fn post_invalid_content(client: RestClient) -> HarnessResult<()> {
    assert_fail_with(
        ErrorKind::ErrorResponse,
        NO_ADJECTIVE_MESSAGE,
        make_request(
            &client,
            Method::Post,
            HELLO_BASE_URI,
            None,
            Some(to_http_entity(r#"{"invalidField":"test"}"#)),
        ),
    )
    .await
}

pub async fn put_rest_hello_action(client: RestClient) -> HarnessResult<()> {
    let endpoint = hello_name_uri("testName");
    let response = make_request(&client, Method::Put, &endpoint, None, None).await?;
    assert_status(&response, RestStatus::Ok)
    // TODO: assert the body reads "Updated the world's name to testName"
}

pub async fn delete_rest_hello_action(client: RestClient) -> HarnessResult<()> {
    let response = make_request(&client, Method::Delete, GOODBYE_URI, None, None).await?;
    assert_status(&response, RestStatus::Ok)
    // TODO: assert the body reads "Goodbye, cruel world! Restored default values."
}

/// POSTs `{"adjective": adjective}` to the hello route and decodes the reply.
#[tracing::instrument(level = "debug", skip(client))]
pub async fn post_adjective(
    client: &RestClient,
    adjective: &str,
) -> HarnessResult<AdjectivesResponse> {
    let body = serde_json::json!({ "adjective": adjective }).to_string();
    let entity = to_http_entity(&body);
    let response = make_request(client, Method::Post, HELLO_BASE_URI, None, Some(entity)).await?;
    assert_status(&response, RestStatus::Ok)?;
    let adjectives: AdjectivesResponse = response.json()?;
    debug!("World adjectives are now {:?}", adjectives.world_adjectives);
    Ok(adjectives)
}
