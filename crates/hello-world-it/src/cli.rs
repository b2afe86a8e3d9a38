//! Command-line interface for running the contract against a live host

use crate::contract::{cases, default_config};
use clap::Parser;
use extension_it::{ConfigLoader, HarnessConfig, HarnessResult, SuiteReport, TestDriver};
use log::info;
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hello-world-it")]
#[command(about = "Contract tests for the hello-world extension")]
#[command(version)]
pub struct Cli {
    /// JSON or YAML harness configuration, layered over the hello-world defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Run only cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub readiness_timeout_ms: Option<u64>,
    /// Sleep this long after registration instead of probing the hello route
    #[arg(long)]
    pub settle_ms: Option<u64>,
    #[arg(long)]
    pub case_timeout_ms: Option<u64>,
}

impl Cli {
    /// Resolves the effective config: defaults, then file, then environment, then flags.
    pub fn resolve_config(&self) -> HarnessResult<HarnessConfig> {
        self.resolve_config_with(|key| env::var(key).ok())
    }

    fn resolve_config_with<F>(&self, lookup: F) -> HarnessResult<HarnessConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::from_path_over(path, &default_config())?,
            None => default_config(),
        };
        config.apply_overrides(lookup)?;

        if let Some(host) = &self.host {
            config.host.address = host.clone();
        }
        if let Some(port) = self.port {
            config.host.port = port;
        }
        if let Some(timeout_ms) = self.readiness_timeout_ms {
            config.readiness.timeout_ms = timeout_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.readiness.probe_endpoint = None;
            config.readiness.settle_ms = settle_ms;
        }
        if let Some(case_timeout_ms) = self.case_timeout_ms {
            config.case_timeout_ms = Some(case_timeout_ms);
        }
        Ok(config)
    }
}

pub async fn run(cli: &Cli) -> HarnessResult<SuiteReport> {
    let config = cli.resolve_config()?;
    info!("Running hello-world contract against {}", config.host.base_url());
    let driver = TestDriver::from_config(&config)?.with_filter(cli.filter.clone());
    driver.run(&cases()).await
}
