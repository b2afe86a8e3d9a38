//! One-shot extension registration guarded by an [`InitLatch`].

use crate::assertions::{assert_eq_value, assert_status, entity_as_map};
use crate::client::RestClient;
use crate::error::{HarnessError, HarnessResult};
use crate::helpers::{make_request, to_http_entity};
use crate::readiness::Readiness;
use crate::registration::{EXTENSION_INIT_URI, ExtensionRegistration, INITIALIZE_ACKNOWLEDGEMENT};
use crate::request::Method;
use crate::status::RestStatus;
use log::{debug, info};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

/// Flag that flips from unset to set at most once.
///
/// Racing callers of [`InitLatch::run_once`] wait for the first one; a failed
/// attempt leaves the latch unset so a later caller may retry.
#[derive(Debug, Default)]
pub struct InitLatch {
    cell: OnceCell<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Initialized,
    AlreadyInitialized,
}

impl InitLatch {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn run_once<F, Fut>(&self, init: F) -> HarnessResult<InitState>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HarnessResult<()>>,
    {
        let ran = AtomicBool::new(false);
        self.cell
            .get_or_try_init(|| {
                ran.store(true, Ordering::Relaxed);
                init()
            })
            .await?;

        if ran.load(Ordering::Relaxed) {
            Ok(InitState::Initialized)
        } else {
            Ok(InitState::AlreadyInitialized)
        }
    }
}

pub struct ExtensionInitializer {
    registration: ExtensionRegistration,
    readiness: Readiness,
    latch: InitLatch,
}

impl ExtensionInitializer {
    pub fn new(registration: ExtensionRegistration, readiness: Readiness) -> Self {
        Self {
            registration,
            readiness,
            latch: InitLatch::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.latch.is_set()
    }

    pub fn registration(&self) -> &ExtensionRegistration {
        &self.registration
    }

    /// Registers the extension unless an earlier call already did.
    pub async fn ensure_initialized(&self, client: &RestClient) -> HarnessResult<InitState> {
        let state = self
            .latch
            .run_once(|| async {
                register(client, &self.registration).await?;
                self.readiness.wait(client).await
            })
            .await?;
        if state == InitState::AlreadyInitialized {
            debug!(
                "Extension '{}' already initialized, skipping registration",
                self.registration.unique_id
            );
        }
        Ok(state)
    }
}

/// Sends the registration and checks the host acknowledged it.
pub async fn register(
    client: &RestClient,
    registration: &ExtensionRegistration,
) -> HarnessResult<()> {
    info!(
        "Registering extension '{}' with host at {}",
        registration.unique_id,
        client.base_url()
    );
    let body = registration.to_json()?;
    let response = make_request(
        client,
        Method::Post,
        EXTENSION_INIT_URI,
        None,
        Some(to_http_entity(&body)),
    )
    .await?;

    assert_status(&response, RestStatus::Accepted)?;
    let response_map = entity_as_map(&response)?;
    let acknowledgement = match response_map.get("success") {
        Some(Value::String(message)) => message.as_str(),
        other => {
            return Err(HarnessError::assertion(format!(
                "initialization reply has no textual 'success' entry: {other:?}"
            )));
        }
    };
    assert_eq_value(
        INITIALIZE_ACKNOWLEDGEMENT,
        acknowledgement,
        "initialization acknowledgement",
    )
}
