//! Registration record announced to the host's administrative endpoint.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};

pub const EXTENSION_INIT_URI: &str = "/_extensions/initialize/";
pub const INITIALIZE_ACKNOWLEDGEMENT: &str = "A request to initialize an extension has been sent.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionRegistration {
    pub name: String,
    pub unique_id: String,
    pub host_address: String,
    pub port: String,
    pub version: String,
    #[serde(rename = "opensearchVersion")]
    pub host_version: String,
    pub minimum_compatible_version: String,
}

impl Default for ExtensionRegistration {
    fn default() -> Self {
        Self {
            name: "hello-world".to_string(),
            unique_id: "hello-world".to_string(),
            host_address: "127.0.0.1".to_string(),
            port: "4500".to_string(),
            version: "1.0".to_string(),
            host_version: "2.9.0".to_string(),
            minimum_compatible_version: "2.9.0".to_string(),
        }
    }
}

impl ExtensionRegistration {
    pub fn to_json(&self) -> HarnessResult<String> {
        serde_json::to_string(self)
            .map_err(|e| HarnessError::from_parse_error(e, "registration encoding"))
    }
}
