use std::collections::BTreeMap;

use k8s_manifest_provider::crds::{Certificate, Challenge, CheCluster, ClusterIssuer, ServiceMonitor};
use k8s_manifest_provider::diagnostics::{has_errors, AttributePath};
use k8s_manifest_provider::resource::{ManifestKind, ManifestResource, Resource};
use k8s_manifest_provider::schema::{Attribute, AttributeKind};
use k8s_manifest_provider::validators::Validator;
use kube::Resource as _;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// Strings tried in order until every validator on the attribute accepts one.
const STRING_CANDIDATES: [&str; 3] = ["example", "30s", "<username>-example"];

fn string_value(validators: &[Validator]) -> Value {
    for validator in validators {
        if let Validator::OneOf { values } = validator {
            return json!(values[0]);
        }
    }
    let path = AttributePath::root().attribute("value");
    let accepted = STRING_CANDIDATES
        .iter()
        .find(|candidate| {
            validators
                .iter()
                .all(|v| v.validate(&path, &json!(candidate)).is_empty())
        })
        .expect("no candidate string satisfies the validators");
    json!(accepted)
}

fn populated(kind: &AttributeKind, validators: &[Validator]) -> Value {
    match kind {
        AttributeKind::String => string_value(validators),
        AttributeKind::Int64 => json!(1),
        AttributeKind::Float64 => json!(1.5),
        AttributeKind::Bool => json!(true),
        AttributeKind::IntOrString => json!("8080"),
        AttributeKind::Dynamic => json!({ "key": "value" }),
        AttributeKind::List(element) => {
            let each: Vec<Validator> = validators
                .iter()
                .flat_map(|v| match v {
                    Validator::Each { validators } => validators.clone(),
                    _ => Vec::new(),
                })
                .collect();
            json!([populated(element, &each)])
        }
        AttributeKind::Map(element) => json!({ "example": populated(element, &[]) }),
        AttributeKind::SingleNested(attributes) => populated_object(attributes),
        AttributeKind::ListNested(attributes) => json!([populated_object(attributes)]),
        AttributeKind::MapNested(attributes) => {
            json!({ "example": populated_object(attributes) })
        }
    }
}

fn populated_object(attributes: &BTreeMap<String, Attribute>) -> Value {
    attributes
        .iter()
        .filter(|(_, attribute)| !attribute.computed || attribute.optional)
        .map(|(name, attribute)| {
            let value = populated(&attribute.kind, &attribute.validators);
            (name.clone(), value)
        })
        .collect::<Map<_, _>>()
        .into()
}

fn leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(leaves).sum(),
        Value::Array(items) => items.iter().map(leaves).sum(),
        Value::Null => 0,
        _ => 1,
    }
}

/// Sets every attribute of the kind, renders it and decodes the YAML back.
fn assert_round_trip<K: ManifestKind + DeserializeOwned>() {
    let resource = ManifestResource::<K>::new();
    let plan = populated_object(&resource.schema().attributes);

    let diagnostics = resource.validate_config(&plan);
    assert!(!has_errors(&diagnostics), "{diagnostics:?}");

    let state = resource.create(plan.clone()).unwrap();
    let decoded: K = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    let rendered = serde_json::to_value(&decoded).unwrap();

    assert_eq!(rendered["apiVersion"], json!(K::api_version(&())));
    assert_eq!(rendered["kind"], json!(K::kind(&())));
    assert_eq!(leaves(&rendered["metadata"]), leaves(&plan["metadata"]));
    assert_eq!(leaves(&rendered["spec"]), leaves(&plan["spec"]));
}

#[test]
fn challenge_round_trips_every_attribute() {
    assert_round_trip::<Challenge>();
}

#[test]
fn certificate_round_trips_every_attribute() {
    assert_round_trip::<Certificate>();
}

#[test]
fn cluster_issuer_round_trips_every_attribute() {
    assert_round_trip::<ClusterIssuer>();
}

#[test]
fn service_monitor_round_trips_every_attribute() {
    assert_round_trip::<ServiceMonitor>();
}

#[test]
fn che_cluster_round_trips_every_attribute() {
    assert_round_trip::<CheCluster>();
}
