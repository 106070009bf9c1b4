use std::sync::Arc;

use chrono::{DateTime, Utc};
use prometheus::{proto::MetricFamily, IntCounterVec, Opts, Registry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::diagnostics::{has_errors, Diagnostic};
use crate::provider::Provider;
use crate::{Error, Result};

/// The lifecycle calls a resource answers.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Validate,
    Create,
    Update,
    Read,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Validate => "validate",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Read => "read",
            Operation::Delete => "delete",
        }
    }
}

/// Request body for an operation. Any of `config`, `plan` or `state` names the value.
#[derive(Deserialize, Debug)]
pub struct OperationRequest {
    #[serde(alias = "config", alias = "plan", alias = "state")]
    pub value: Value,
}

#[derive(Serialize, Debug, Default)]
pub struct OperationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Data owned by the Manager
#[derive(Clone)]
pub struct Manager {
    provider: Arc<Provider>,
    /// Diagnostics populated by every operation
    diagnostics: Arc<RwLock<Diagnostics>>,
    metrics: Metrics,
}

impl Manager {
    pub fn new(provider: Provider) -> Result<Self> {
        Ok(Self {
            provider: Arc::new(provider),
            diagnostics: Arc::new(RwLock::new(Diagnostics::new())),
            metrics: Metrics::new()?,
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Runs one lifecycle call against the named resource.
    ///
    /// Only an unknown resource type is an `Err`; everything else, including
    /// invalid configuration, comes back as diagnostics in the response.
    #[instrument(skip(self, value))]
    pub async fn execute(
        &self,
        type_name: &str,
        operation: Operation,
        value: Value,
    ) -> Result<OperationResponse> {
        let resource = self.provider.resource(type_name)?;
        {
            let mut diagnostics = self.diagnostics.write().await;
            diagnostics.last_event = Utc::now();
            diagnostics.operations += 1;
        }
        self.metrics
            .operations
            .with_label_values(&[type_name, operation.as_str()])
            .inc();

        let outcome = match operation {
            Operation::Validate => {
                let diagnostics = resource.validate_config(&value);
                if has_errors(&diagnostics) {
                    Err(Error::InvalidConfiguration(diagnostics))
                } else {
                    Ok(OperationResponse { state: None, diagnostics })
                }
            }
            Operation::Create => resource.create(value).map(OperationResponse::with_state),
            Operation::Update => resource.update(value).map(OperationResponse::with_state),
            Operation::Read => Ok(OperationResponse::with_state(resource.read(value))),
            Operation::Delete => {
                resource.delete(value);
                Ok(OperationResponse::default())
            }
        };

        Ok(outcome.unwrap_or_else(|error| {
            warn!(%error, "{} failed", operation.as_str());
            self.metrics
                .failures
                .with_label_values(&[type_name, operation.as_str()])
                .inc();
            OperationResponse {
                state: None,
                diagnostics: error.diagnostics(),
            }
        }))
    }

    pub fn metrics(&self) -> Vec<MetricFamily> {
        self.metrics.registry.gather()
    }

    pub async fn diagnostics(&self) -> Diagnostics {
        self.diagnostics.read().await.clone()
    }
}

impl OperationResponse {
    fn with_state(state: Value) -> Self {
        Self {
            state: Some(state),
            diagnostics: Vec::new(),
        }
    }
}

/// Prometheus Metrics to be exposed on /metrics
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub operations: IntCounterVec,
    pub failures: IntCounterVec,
}

impl Metrics {
    fn new() -> Result<Self> {
        let registry = Registry::new();
        let operations = IntCounterVec::new(
            Opts::new("manifest_operations_total", "resource operations handled"),
            &["resource", "operation"],
        )
        .map_err(Error::MetricsError)?;
        let failures = IntCounterVec::new(
            Opts::new(
                "manifest_operation_failures_total",
                "resource operations that returned errors",
            ),
            &["resource", "operation"],
        )
        .map_err(Error::MetricsError)?;
        registry
            .register(Box::new(operations.clone()))
            .map_err(Error::MetricsError)?;
        registry
            .register(Box::new(failures.clone()))
            .map_err(Error::MetricsError)?;
        Ok(Self {
            registry,
            operations,
            failures,
        })
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct Diagnostics {
    pub last_event: DateTime<Utc>,
    pub operations: u64,
}

impl Diagnostics {
    fn new() -> Self {
        Self {
            last_event: Utc::now(),
            operations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> Manager {
        Manager::new(Provider::default()).unwrap()
    }

    fn plan() -> Value {
        json!({
            "metadata": { "name": "selfsigned" },
            "spec": { "self_signed": {} }
        })
    }

    #[tokio::test]
    async fn create_returns_state_with_manifest() {
        let response = manager()
            .execute("k8s_cert_manager_io_cluster_issuer_v1", Operation::Create, plan())
            .await
            .unwrap();
        assert!(response.diagnostics.is_empty());
        let state = response.state.unwrap();
        assert_eq!(state["kind"], "ClusterIssuer");
        assert!(state["yaml"].as_str().unwrap().contains("selfSigned: {}"));
    }

    #[tokio::test]
    async fn invalid_configuration_becomes_diagnostics() {
        let manager = manager();
        let response = manager
            .execute(
                "k8s_cert_manager_io_cluster_issuer_v1",
                Operation::Create,
                json!({ "spec": {} }),
            )
            .await
            .unwrap();
        assert!(response.state.is_none());
        assert!(has_errors(&response.diagnostics));

        let failures = manager
            .metrics
            .failures
            .with_label_values(&["k8s_cert_manager_io_cluster_issuer_v1", "create"])
            .get();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn validate_rejects_computed_attributes_in_config() {
        let mut config = plan();
        config["yaml"] = json!("kind: Other");
        let response = manager()
            .execute("k8s_cert_manager_io_cluster_issuer_v1", Operation::Validate, config)
            .await
            .unwrap();
        assert!(has_errors(&response.diagnostics));
    }

    #[tokio::test]
    async fn read_and_delete_change_nothing() {
        let manager = manager();
        let state = json!({ "id": "1", "metadata": { "name": "x" } });
        let response = manager
            .execute("k8s_cert_manager_io_cluster_issuer_v1", Operation::Read, state.clone())
            .await
            .unwrap();
        assert_eq!(response.state, Some(state.clone()));

        let response = manager
            .execute("k8s_cert_manager_io_cluster_issuer_v1", Operation::Delete, state)
            .await
            .unwrap();
        assert!(response.state.is_none());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn unknown_resources_are_errors() {
        let result = manager().execute("k8s_nothing_v1", Operation::Read, Value::Null).await;
        assert!(matches!(result, Err(Error::UnknownResourceType(_))));
    }

    #[tokio::test]
    async fn operations_are_counted() {
        let manager = manager();
        for _ in 0..2 {
            manager
                .execute("k8s_cert_manager_io_cluster_issuer_v1", Operation::Read, json!({}))
                .await
                .unwrap();
        }
        assert_eq!(manager.diagnostics().await.operations, 2);
        let names: Vec<_> = manager.metrics().iter().map(|f| f.get_name().to_string()).collect();
        assert!(names.contains(&"manifest_operations_total".to_string()));
    }
}
