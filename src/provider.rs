use serde::Serialize;
use std::collections::BTreeMap;

use crate::crds;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::{Error, Result};

pub static DEFAULT_TYPE_NAME: &str = "k8s";

/// Schemas of every resource, keyed by resource type name.
#[derive(Serialize, Debug, Clone)]
pub struct ProviderSchema {
    pub provider_type_name: String,
    pub resource_schemas: BTreeMap<String, Schema>,
}

pub struct Provider {
    type_name: String,
    resources: BTreeMap<String, Box<dyn Resource>>,
}

impl Provider {
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let resources = crds::resources()
            .into_iter()
            .map(|resource| (resource.metadata(&type_name), resource))
            .collect();
        Self {
            type_name,
            resources,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_names(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|resource| &**resource)
            .ok_or_else(|| Error::UnknownResourceType(type_name.to_string()))
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider_type_name: self.type_name.clone(),
            resource_schemas: self
                .resources
                .iter()
                .map(|(name, resource)| (name.clone(), resource.schema()))
                .collect(),
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_NAME)
    }
}
