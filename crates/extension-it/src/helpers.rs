//! Request helpers shared by contract cases.

use crate::client::RestClient;
use crate::error::HarnessResult;
use crate::request::{Entity, Method, Request};
use crate::response::Response;

/// Sends `method endpoint` with optional ordered query parameters and body.
pub async fn make_request(
    client: &RestClient,
    method: Method,
    endpoint: &str,
    params: Option<&[(&str, &str)]>,
    entity: Option<Entity>,
) -> HarnessResult<Response> {
    let mut request = Request::new(method, endpoint);
    if let Some(params) = params {
        for (key, value) in params {
            request.add_parameter(*key, *value);
        }
    }
    if let Some(entity) = entity {
        request.set_entity(entity);
    }
    client.perform_request(&request).await
}

pub fn to_http_entity(json: &str) -> Entity {
    Entity::json(json)
}
