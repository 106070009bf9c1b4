mod common;

use k8s_manifest_provider::crds::challenge::{Challenge, ChallengeType};
use k8s_manifest_provider::provider::Provider;
use k8s_manifest_provider::Error;
use serde_json::{json, Value};

const TYPE_NAME: &str = "k8s_acme_cert_manager_io_challenge_v1";

fn plan() -> Value {
    json!({
        "metadata": { "name": "example-challenge", "namespace": "default" },
        "spec": {
            "authorization_url": "https://acme.example.com/authz/1",
            "dns_name": "example.com",
            "issuer_ref": { "name": "letsencrypt", "kind": "ClusterIssuer" },
            "key": "abc",
            "solver": {
                "http01": { "ingress": { "class": "nginx" } }
            },
            "token": "tok",
            "type": "HTTP-01",
            "url": "https://acme.example.com/chall/1",
            "wildcard": null
        }
    })
}

#[test]
fn create_renders_challenge_manifest() {
    let (state, manifest) = common::create(TYPE_NAME, plan());

    assert_eq!(state["api_version"], "acme.cert-manager.io/v1");
    assert_eq!(state["kind"], "Challenge");
    assert!(state["id"].as_str().unwrap().parse::<i64>().is_ok());

    assert_eq!(manifest["apiVersion"], "acme.cert-manager.io/v1");
    assert_eq!(manifest["kind"], "Challenge");
    assert_eq!(manifest["metadata"], json!({ "name": "example-challenge", "namespace": "default" }));
    assert_eq!(manifest["spec"]["authorizationURL"], "https://acme.example.com/authz/1");
    assert_eq!(manifest["spec"]["dnsName"], "example.com");
    assert_eq!(manifest["spec"]["issuerRef"], json!({ "name": "letsencrypt", "kind": "ClusterIssuer" }));
    assert_eq!(manifest["spec"]["solver"], json!({ "http01": { "ingress": { "class": "nginx" } } }));
    assert!(manifest["spec"].get("wildcard").is_none());
}

#[test]
fn rendered_yaml_decodes_into_the_kind() {
    let (state, _) = common::create(TYPE_NAME, plan());
    let challenge: Challenge = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    assert_eq!(challenge.spec.r#type, ChallengeType::Http01);
    assert_eq!(challenge.metadata.namespace.as_deref(), Some("default"));
}

#[test]
fn computed_values_in_plan_are_overwritten() {
    let mut plan = plan();
    plan["api_version"] = json!("v0");
    plan["kind"] = json!("Something");
    let (state, manifest) = common::create(TYPE_NAME, plan);
    assert_eq!(state["api_version"], "acme.cert-manager.io/v1");
    assert_eq!(state["kind"], "Challenge");
    assert_eq!(manifest["kind"], "Challenge");
}

#[test]
fn namespace_is_required() {
    let mut plan = plan();
    plan["metadata"] = json!({ "name": "example-challenge" });
    let result = Provider::default().resource(TYPE_NAME).unwrap().create(plan);
    match result {
        Err(Error::InvalidConfiguration(diagnostics)) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].attribute.as_deref(), Some("metadata.namespace"));
        }
        other => panic!("expected invalid configuration, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unknown_challenge_types_are_rejected() {
    let mut plan = plan();
    plan["spec"]["type"] = json!("TLS-ALPN-01");
    let result = Provider::default().resource(TYPE_NAME).unwrap().create(plan);
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn update_replaces_the_manifest() {
    let resource = Provider::default();
    let resource = resource.resource(TYPE_NAME).unwrap();
    let first = resource.create(plan()).unwrap();

    let mut changed = plan();
    changed["spec"]["token"] = json!("other");
    let second = resource.update(changed).unwrap();

    assert_ne!(first["yaml"], second["yaml"]);
    assert!(second["yaml"].as_str().unwrap().contains("token: other"));
}

#[test]
fn read_and_delete_are_no_ops() {
    let provider = Provider::default();
    let resource = provider.resource(TYPE_NAME).unwrap();
    let state = resource.create(plan()).unwrap();
    assert_eq!(resource.read(state.clone()), state);
    resource.delete(state);
}
