use kube::core::ObjectMeta;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

/// The `metadata` block every resource carries.
#[derive(Deserialize, Debug, Default, PartialEq, Clone)]
pub struct Metadata {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub annotations: Option<BTreeMap<String, String>>,
}

impl From<Metadata> for ObjectMeta {
    fn from(metadata: Metadata) -> Self {
        ObjectMeta {
            name: Some(metadata.name),
            namespace: metadata.namespace,
            labels: metadata.labels,
            annotations: metadata.annotations,
            ..Default::default()
        }
    }
}

/// Schema of the `metadata` block. Cluster-scoped kinds have no namespace.
pub fn schema(namespaced: bool) -> Attribute {
    let mut attributes = vec![
        (
            "name",
            Attribute::string()
                .required()
                .description("Unique name of this object within its namespace. Must be a DNS subdomain.")
                .validator(Validator::Name),
        ),
        (
            "labels",
            Attribute::map_of(AttributeKind::String)
                .optional()
                .description("Map of string keys and values that can be used to organize and categorize objects.")
                .validator(Validator::Labels),
        ),
        (
            "annotations",
            Attribute::map_of(AttributeKind::String)
                .optional()
                .description("Unstructured key value map stored with a resource that may be set by external tools to store and retrieve arbitrary metadata.")
                .validator(Validator::Annotations),
        ),
    ];
    if namespaced {
        attributes.push((
            "namespace",
            Attribute::string()
                .required()
                .description("Namespace the object lives in. Must be a DNS label.")
                .validator(Validator::Namespace),
        ));
    }
    Attribute::single_nested(attributes)
        .required()
        .description("Data that helps uniquely identify the object, including a name string and an optional namespace.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_into_object_meta() {
        let metadata: Metadata = serde_json::from_value(json!({
            "name": "web",
            "namespace": "default",
            "labels": { "app": "web" },
            "annotations": null
        }))
        .unwrap();
        let meta = ObjectMeta::from(metadata);
        assert_eq!(meta.name.as_deref(), Some("web"));
        assert_eq!(meta.namespace.as_deref(), Some("default"));
        assert_eq!(meta.labels.unwrap()["app"], "web");
        assert!(meta.annotations.is_none());
        assert!(meta.uid.is_none());
    }

    #[test]
    fn namespace_only_for_namespaced_kinds() {
        let AttributeKind::SingleNested(namespaced) = schema(true).kind else {
            panic!("metadata is a nested attribute");
        };
        assert!(namespaced["namespace"].required);

        let AttributeKind::SingleNested(cluster) = schema(false).kind else {
            panic!("metadata is a nested attribute");
        };
        assert!(!cluster.contains_key("namespace"));
        assert!(cluster["name"].required);
        assert!(cluster["labels"].optional);
    }
}
