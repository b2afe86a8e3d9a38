use super::test_utilities::{ECHO_URI, PROBE_URI, StubBehaviour, StubHost};
use axum::http::StatusCode;
use extension_it::{
    CaseStatus, ErrorKind, ExtensionInitializer, ExtensionRegistration, HarnessConfig,
    HarnessError, Method, Readiness, ReadinessConfig, RestStatus, TestCase, TestDriver,
    assert_status, make_request,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use test_log::test;

fn driver_for(host: &StubHost) -> TestDriver {
    let initializer = ExtensionInitializer::new(
        ExtensionRegistration::default(),
        Readiness::Probe {
            endpoint: PROBE_URI.to_string(),
            interval: Duration::from_millis(20),
            timeout: Duration::from_secs(5),
        },
    );
    TestDriver::new(host.client(), initializer)
}

fn echo_case(name: &str) -> TestCase {
    TestCase::new(name, |client| async move {
        let response = make_request(&client, Method::Get, ECHO_URI, None, None).await?;
        assert_status(&response, RestStatus::Ok)
    })
}

#[test(tokio::test)]
async fn test_failures_are_isolated() {
    let host = StubHost::start().await.expect("Failed to start stub host");
    let driver = driver_for(&host);
    let cases = vec![
        echo_case("first_passes"),
        TestCase::new("assertion_fails", |_client| async {
            Err(HarnessError::assertion("expected \"test\" but got \"other\""))
        }),
        TestCase::new("panics", |_client| async {
            let adjectives: Vec<String> = Vec::new();
            assert_eq!(adjectives[0], "test");
            Ok(())
        }),
        echo_case("last_passes"),
    ];

    let report = driver.run(&cases).await.unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 2);
    assert!(report.outcome("first_passes").unwrap().passed());
    assert!(report.outcome("last_passes").unwrap().passed());
    match &report.outcome("panics").unwrap().status {
        CaseStatus::Failed(message) => assert!(message.contains("index out of bounds")),
        CaseStatus::Passed => panic!("panicking case reported as passed"),
    }
    assert_eq!(host.init_calls(), 1);
}

#[test(tokio::test)]
async fn test_initialization_failure_aborts_suite() {
    let host = StubHost::start_with(StubBehaviour {
        init_status: StatusCode::SERVICE_UNAVAILABLE,
        ..StubBehaviour::default()
    })
    .await
    .expect("Failed to start stub host");
    let driver = driver_for(&host);
    let executed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&executed);
    let cases = vec![TestCase::new("never_runs", move |_client| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })];

    let error = driver.run(&cases).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ErrorResponse);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
    assert!(!driver.initializer().is_initialized());
}

#[test(tokio::test)]
async fn test_slow_case_times_out() {
    let host = StubHost::start().await.expect("Failed to start stub host");
    let driver = driver_for(&host).with_case_timeout(Some(Duration::from_millis(50)));
    let cases = vec![
        TestCase::new("sleeps", |_client| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }),
        echo_case("after_timeout"),
    ];

    let report = driver.run(&cases).await.unwrap();

    match &report.outcome("sleeps").unwrap().status {
        CaseStatus::Failed(message) => {
            assert!(message.contains("Timed out after 50ms waiting for case 'sleeps'"))
        }
        CaseStatus::Passed => panic!("slow case reported as passed"),
    }
    assert!(report.outcome("after_timeout").unwrap().passed());
}

#[test(tokio::test)]
async fn test_filter_selects_cases() {
    let host = StubHost::start().await.expect("Failed to start stub host");
    let driver = driver_for(&host).with_filter(Some("hello".to_string()));
    let cases = vec![echo_case("get_hello"), echo_case("delete_goodbye")];

    let report = driver.run(&cases).await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].name, "get_hello");
}

#[test(tokio::test)]
async fn test_no_selected_cases_skips_initialization() {
    let host = StubHost::start().await.expect("Failed to start stub host");
    let driver = driver_for(&host).with_filter(Some("nothing matches".to_string()));

    let report = driver.run(&[echo_case("get_hello")]).await.unwrap();

    assert!(report.outcomes.is_empty());
    assert!(report.is_success());
    assert_eq!(host.init_calls(), 0);
}

#[test(tokio::test)]
async fn test_driver_from_config() {
    let host = StubHost::start().await.expect("Failed to start stub host");
    let config = HarnessConfig {
        host: host.host_config(),
        readiness: ReadinessConfig {
            probe_endpoint: Some(PROBE_URI.to_string()),
            interval_ms: 20,
            timeout_ms: 2_000,
            settle_ms: 0,
        },
        case_timeout_ms: Some(2_000),
        ..HarnessConfig::default()
    };
    let driver = TestDriver::from_config(&config).unwrap();

    let report = driver.run(&[echo_case("get_echo")]).await.unwrap();

    assert!(report.is_success());
    assert_eq!(host.init_calls(), 1);
    assert_eq!(host.probe_calls(), 1);
    assert_eq!(driver.client().base_url(), config.host.base_url());
}
