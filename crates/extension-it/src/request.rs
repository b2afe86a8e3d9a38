//! Request model sent through [`crate::client::RestClient`].

use std::fmt;

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub content: String,
    pub content_type: String,
}

impl Entity {
    pub fn new(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    pub fn json(content: impl Into<String>) -> Self {
        Self::new(content, APPLICATION_JSON)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    endpoint: String,
    parameters: Vec<(String, String)>,
    entity: Option<Entity>,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            parameters: Vec::new(),
            entity: None,
        }
    }

    /// Appends a query parameter; parameters are sent in insertion order.
    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((key.into(), value.into()));
    }

    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }
}
