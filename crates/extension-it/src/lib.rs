//! Contract-test harness for extensions registered with a search-engine host.
//!
//! The harness registers an extension through the host's administrative
//! endpoint exactly once per [`TestDriver`], waits for the host to expose the
//! extension's routes, then runs a list of [`TestCase`]s sequentially.

pub mod assertions;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod helpers;
pub mod initializer;
pub mod readiness;
pub mod registration;
pub mod request;
pub mod response;
pub mod status;
pub mod telemetry;

pub use assertions::{assert_fail_with, assert_status, entity_as_map, rest_status};
pub use client::RestClient;
pub use config::{ConfigLoader, HarnessConfig, HostConfig, ReadinessConfig};
pub use driver::{CaseOutcome, CaseStatus, SuiteReport, TestCase, TestDriver};
pub use error::{ErrorKind, HarnessError, HarnessResult};
pub use helpers::{make_request, to_http_entity};
pub use initializer::{ExtensionInitializer, InitLatch, InitState};
pub use readiness::Readiness;
pub use registration::ExtensionRegistration;
pub use request::{Entity, Method, Request};
pub use response::Response;
pub use status::RestStatus;

// Re-export logging macros for consistent usage across the crate
pub use log::{debug, error, info, trace, warn};
