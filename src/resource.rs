//! The resource lifecycle.
//!
//! Every modelled kind shares one implementation: the configuration is
//! validated against the kind's schema, decoded into the typed custom
//! resource and rendered as YAML. Nothing is sent to a cluster, so reading
//! and deleting never touch anything outside the state they are handed.

use chrono::Utc;
use kube::core::ObjectMeta;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, info};

use crate::diagnostics::{has_errors, Diagnostic};
use crate::metadata::{self, Metadata};
use crate::schema::{Attribute, Schema};
use crate::{Error, Result};

pub trait Resource: Send + Sync {
    /// Full type name of the resource, e.g. `k8s_acme_cert_manager_io_challenge_v1`.
    fn metadata(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        self.schema().validate_config(config)
    }

    fn create(&self, plan: Value) -> Result<Value>;

    /// Always a full replacement of the previous state.
    fn update(&self, plan: Value) -> Result<Value>;

    /// There is no remote object to refresh from; the state is returned as is.
    fn read(&self, state: Value) -> Value {
        state
    }

    /// There is no remote object to remove; dropping the state is enough.
    fn delete(&self, _state: Value) {}
}

/// A custom resource kind that can be rendered as a manifest.
pub trait ManifestKind: kube::Resource<DynamicType = ()> + Serialize + Send + Sync + 'static {
    type Spec: DeserializeOwned;

    /// Appended to the provider type name to form the resource type name.
    const TYPE_NAME_SUFFIX: &'static str;
    const NAMESPACED: bool;
    const DESCRIPTION: &'static str;

    fn spec_schema() -> Attribute;

    fn from_parts(metadata: ObjectMeta, spec: Self::Spec) -> Self;
}

pub struct ManifestResource<K> {
    kind: PhantomData<fn() -> K>,
}

impl<K: ManifestKind> ManifestResource<K> {
    pub fn new() -> Self {
        Self { kind: PhantomData }
    }

    /// Decodes a plan into the typed kind and renders it as YAML.
    pub fn render(&self, plan: &Value) -> Result<String> {
        let metadata: Metadata =
            serde_json::from_value(plan.get("metadata").cloned().unwrap_or(Value::Null))
                .map_err(Error::DecodeError)?;
        let spec = K::spec_schema().to_manifest(plan.get("spec").unwrap_or(&Value::Null));
        let spec: K::Spec = serde_json::from_value(spec).map_err(Error::DecodeError)?;

        let object = K::from_parts(metadata.into(), spec);
        serde_yaml::to_string(&object).map_err(Error::SerializationError)
    }

    fn apply(&self, plan: Value) -> Result<Value> {
        let diagnostics = self.schema().validate(&plan);
        if has_errors(&diagnostics) {
            return Err(Error::InvalidConfiguration(diagnostics));
        }

        let yaml = self.render(&plan)?;
        let Value::Object(mut state) = plan else {
            return Err(Error::InvalidConfiguration(diagnostics));
        };
        state.insert("id".into(), Utc::now().timestamp().to_string().into());
        state.insert("api_version".into(), K::api_version(&()).into_owned().into());
        state.insert("kind".into(), K::kind(&()).into_owned().into());
        state.insert("yaml".into(), yaml.into());
        Ok(Value::Object(state))
    }
}

impl<K: ManifestKind> Default for ManifestResource<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ManifestKind> Resource for ManifestResource<K> {
    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_{}", K::TYPE_NAME_SUFFIX)
    }

    fn schema(&self) -> Schema {
        Schema::new(
            K::DESCRIPTION,
            [
                (
                    "id",
                    Attribute::string()
                        .computed()
                        .description("The timestamp of the last change to this resource."),
                ),
                (
                    "api_version",
                    Attribute::string()
                        .computed()
                        .description("The API group of the requested resource."),
                ),
                (
                    "kind",
                    Attribute::string()
                        .computed()
                        .description("The type of the requested resource."),
                ),
                (
                    "yaml",
                    Attribute::string()
                        .computed()
                        .description("The generated manifest in YAML format."),
                ),
                ("metadata", metadata::schema(K::NAMESPACED)),
                ("spec", K::spec_schema()),
            ],
        )
    }

    fn create(&self, plan: Value) -> Result<Value> {
        let state = self.apply(plan)?;
        info!(kind = %K::kind(&()), name = %state["metadata"]["name"], "created manifest");
        Ok(state)
    }

    fn update(&self, plan: Value) -> Result<Value> {
        let state = self.apply(plan)?;
        info!(kind = %K::kind(&()), name = %state["metadata"]["name"], "updated manifest");
        Ok(state)
    }

    fn read(&self, state: Value) -> Value {
        debug!(kind = %K::kind(&()), "read is a no-op");
        state
    }

    fn delete(&self, _state: Value) {
        debug!(kind = %K::kind(&()), "delete is a no-op");
    }
}
