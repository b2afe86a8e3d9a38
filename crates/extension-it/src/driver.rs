//! Sequential test driver with a suite-scoped initializer.

use crate::client::RestClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::initializer::ExtensionInitializer;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use log::{error, info};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

type CaseFn = Box<dyn Fn(RestClient) -> BoxFuture<'static, HarnessResult<()>> + Send + Sync>;

/// A named contract check run against the host.
pub struct TestCase {
    name: String,
    run: CaseFn,
}

impl TestCase {
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(RestClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HarnessResult<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(move |client| run(client).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub status: CaseStatus,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            let millis = outcome.elapsed.as_millis();
            match &outcome.status {
                CaseStatus::Passed => writeln!(f, "PASS {} ({millis}ms)", outcome.name)?,
                CaseStatus::Failed(message) => {
                    writeln!(f, "FAIL {} ({millis}ms): {message}", outcome.name)?
                }
            }
        }
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

/// Runs cases one after another, registering the extension before the first.
pub struct TestDriver {
    client: RestClient,
    initializer: ExtensionInitializer,
    case_timeout: Option<Duration>,
    filter: Option<String>,
}

impl TestDriver {
    pub fn new(client: RestClient, initializer: ExtensionInitializer) -> Self {
        Self {
            client,
            initializer,
            case_timeout: None,
            filter: None,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let client = RestClient::new(&config.host)?;
        let initializer = ExtensionInitializer::new(
            config.registration.clone(),
            config.readiness.to_readiness(),
        );
        Ok(Self::new(client, initializer).with_case_timeout(config.case_timeout()))
    }

    pub fn with_case_timeout(mut self, case_timeout: Option<Duration>) -> Self {
        self.case_timeout = case_timeout;
        self
    }

    /// Only cases whose name contains `filter` are run.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn initializer(&self) -> &ExtensionInitializer {
        &self.initializer
    }

    /// Runs the selected cases. An initialization failure aborts the whole suite.
    pub async fn run(&self, cases: &[TestCase]) -> HarnessResult<SuiteReport> {
        let mut report = SuiteReport::default();

        for case in cases.iter().filter(|c| self.is_selected(c)) {
            if let Err(e) = self.initializer.ensure_initialized(&self.client).await {
                error!("Extension initialization failed before '{}': {e}", case.name);
                return Err(e);
            }
            report.outcomes.push(self.run_case(case).await);
        }

        info!("Suite finished: {} passed, {} failed", report.passed(), report.failed());
        Ok(report)
    }

    fn is_selected(&self, case: &TestCase) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| case.name.contains(filter))
    }

    async fn run_case(&self, case: &TestCase) -> CaseOutcome {
        info!("Running {}", case.name);
        let started = Instant::now();
        let future = AssertUnwindSafe((case.run)(self.client.clone())).catch_unwind();

        let result = match self.case_timeout {
            Some(limit) => match tokio::time::timeout(limit, future).await {
                Ok(result) => result,
                Err(_) => Ok(Err(HarnessError::Timeout {
                    context: format!("case '{}'", case.name),
                    waited: limit,
                })),
            },
            None => future.await,
        };

        let status = match result {
            Ok(Ok(())) => CaseStatus::Passed,
            Ok(Err(e)) => CaseStatus::Failed(e.to_string()),
            Err(payload) => CaseStatus::Failed(format!("panicked: {}", panic_message(&*payload))),
        };
        if let CaseStatus::Failed(message) = &status {
            error!("{} failed: {message}", case.name);
        }

        CaseOutcome {
            name: case.name.clone(),
            status,
            elapsed: started.elapsed(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
