//! Readiness probes and their aggregation into a single health report.
//!
//! Status rule: `healthy` when every probe is ok, `degraded` when any probe
//! reports an error, `unhealthy` when a probe could not complete at all.

pub mod probes;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, join_all};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::Config;
use crate::error::AdventError;
use crate::supabase::SupabaseClient;

pub use probes::{SecretProbe, SupabaseProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    fn from_result(result: Result<(), AdventError>, started: Instant) -> Self {
        let latency_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => Self {
                status: ProbeStatus::Ok,
                latency_ms,
                error: None,
            },
            Err(e) => Self {
                status: ProbeStatus::Error,
                latency_ms,
                error: Some(e.to_string()),
            },
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            status: ProbeStatus::Error,
            latency_ms: 0,
            error: Some(reason),
        }
    }
}

/// One readiness check against an external dependency or a required setting.
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self) -> BoxFuture<'_, Result<(), AdventError>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub checks: BTreeMap<String, ProbeReport>,
}

impl HealthReport {
    pub fn is_serving(&self) -> bool {
        self.status != HealthStatus::Unhealthy
    }
}

/// Outcome of running one probe task.
pub enum ProbeOutcome {
    Completed(ProbeReport),
    /// The probe task died before producing a report.
    Aborted(String),
}

pub fn aggregate(outcomes: &[ProbeOutcome]) -> HealthStatus {
    let mut status = HealthStatus::Healthy;
    for outcome in outcomes {
        match outcome {
            ProbeOutcome::Aborted(_) => return HealthStatus::Unhealthy,
            ProbeOutcome::Completed(report) if report.status == ProbeStatus::Error => {
                status = HealthStatus::Degraded;
            }
            ProbeOutcome::Completed(_) => {}
        }
    }
    status
}

#[derive(Clone)]
pub struct HealthChecker {
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl HealthChecker {
    pub fn new(probes: Vec<Arc<dyn HealthProbe>>) -> Self {
        Self { probes }
    }

    /// Database, auth and storage probes plus the two required-secret checks.
    pub fn from_config(cfg: &Config, supabase: Option<SupabaseClient>) -> Self {
        let supabase = supabase.map(Arc::new);
        let probes: Vec<Arc<dyn HealthProbe>> = vec![
            Arc::new(SupabaseProbe::database(supabase.clone())),
            Arc::new(SupabaseProbe::auth(supabase.clone())),
            Arc::new(SupabaseProbe::storage(supabase)),
            Arc::new(SecretProbe::new(
                "service_role_key",
                "SUPABASE_SERVICE_ROLE_KEY",
                cfg.supabase_service_role_key.clone(),
            )),
            Arc::new(SecretProbe::new(
                "stripe_secret_key",
                "STRIPE_SECRET_KEY",
                cfg.stripe_secret_key.clone(),
            )),
        ];
        Self::new(probes)
    }

    /// Run every probe concurrently and aggregate the results.
    pub async fn run(&self) -> HealthReport {
        let handles = self.probes.iter().cloned().map(|probe| {
            tokio::spawn(async move {
                let started = Instant::now();
                let result = probe.check().await;
                ProbeReport::from_result(result, started)
            })
        });
        let joined = join_all(handles).await;

        let outcomes: Vec<ProbeOutcome> = joined
            .into_iter()
            .zip(self.probes.iter())
            .map(|(res, probe)| match res {
                Ok(report) => {
                    if let Some(e) = report.error.as_deref() {
                        warn!(probe = probe.name(), error = e, "health probe failed");
                    }
                    ProbeOutcome::Completed(report)
                }
                Err(join_err) => {
                    error!(probe = probe.name(), error = %join_err, "health probe aborted");
                    ProbeOutcome::Aborted(join_err.to_string())
                }
            })
            .collect();

        let status = aggregate(&outcomes);
        let checks = self
            .probes
            .iter()
            .zip(outcomes)
            .map(|(probe, outcome)| {
                let report = match outcome {
                    ProbeOutcome::Completed(report) => report,
                    ProbeOutcome::Aborted(reason) => ProbeReport::failed(reason),
                };
                (probe.name().to_string(), report)
            })
            .collect();

        HealthReport {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks,
        }
    }
}
