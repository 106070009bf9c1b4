mod common;

use k8s_manifest_provider::crds::certificate::{Certificate, PrivateKeyAlgorithm};
use k8s_manifest_provider::provider::Provider;
use k8s_manifest_provider::Error;
use serde_json::{json, Value};

const TYPE_NAME: &str = "k8s_cert_manager_io_certificate_v1";

fn plan() -> Value {
    json!({
        "metadata": {
            "name": "example-com",
            "namespace": "web",
            "labels": { "app.kubernetes.io/name": "web" }
        },
        "spec": {
            "secret_name": "example-com-tls",
            "issuer_ref": { "name": "letsencrypt", "kind": "ClusterIssuer", "group": "cert-manager.io" },
            "dns_names": ["example.com", "www.example.com"],
            "is_ca": false,
            "duration": "2160h",
            "usages": ["server auth", "digital signature"],
            "private_key": { "algorithm": "ECDSA", "size": 256, "rotation_policy": "Always" }
        }
    })
}

#[test]
fn create_renders_certificate_manifest() {
    let (state, manifest) = common::create(TYPE_NAME, plan());

    assert_eq!(state["api_version"], "cert-manager.io/v1");
    assert_eq!(state["kind"], "Certificate");
    assert_eq!(manifest["apiVersion"], "cert-manager.io/v1");
    assert_eq!(manifest["metadata"]["labels"], json!({ "app.kubernetes.io/name": "web" }));
    assert_eq!(manifest["spec"]["secretName"], "example-com-tls");
    assert_eq!(manifest["spec"]["isCA"], false);
    assert_eq!(manifest["spec"]["dnsNames"], json!(["example.com", "www.example.com"]));
    assert_eq!(
        manifest["spec"]["privateKey"],
        json!({ "algorithm": "ECDSA", "rotationPolicy": "Always", "size": 256 })
    );
    assert!(manifest["spec"].get("commonName").is_none());
    assert!(manifest["spec"].get("keystores").is_none());
}

#[test]
fn rendered_yaml_decodes_into_the_kind() {
    let (state, _) = common::create(TYPE_NAME, plan());
    let certificate: Certificate = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    let private_key = certificate.spec.private_key.unwrap();
    assert_eq!(private_key.algorithm, Some(PrivateKeyAlgorithm::Ecdsa));
    assert_eq!(certificate.spec.issuer_ref.kind.as_deref(), Some("ClusterIssuer"));
}

#[test]
fn keystores_render_password_references() {
    let mut plan = plan();
    plan["spec"]["keystores"] = json!({
        "pkcs12": { "create": true, "password_secret_ref": { "name": "keystore", "key": "password" } }
    });
    let (_, manifest) = common::create(TYPE_NAME, plan);
    assert_eq!(
        manifest["spec"]["keystores"],
        json!({ "pkcs12": { "create": true, "passwordSecretRef": { "name": "keystore", "key": "password" } } })
    );
}

#[test]
fn unknown_key_usages_are_reported_per_element() {
    let mut plan = plan();
    plan["spec"]["usages"] = json!(["server auth", "teleport"]);
    let result = Provider::default().resource(TYPE_NAME).unwrap().create(plan);
    match result {
        Err(Error::InvalidConfiguration(diagnostics)) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.usages[1]"));
        }
        other => panic!("expected invalid configuration, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn invalid_label_keys_are_rejected() {
    let mut plan = plan();
    plan["metadata"]["labels"] = json!({ "-bad-": "web" });
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert!(diagnostics.iter().any(|d| d.attribute.as_deref() == Some("metadata.labels[\"-bad-\"]")));
}

#[test]
fn secret_name_is_required() {
    let mut plan = plan();
    plan["spec"]["secret_name"] = Value::Null;
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].summary, "Missing Configuration for Required Attribute");
}

#[test]
fn key_sizes_beyond_i32_fail_validation_at_the_attribute() {
    let mut plan = plan();
    plan["spec"]["private_key"]["size"] = json!(3_000_000_000i64);
    let resource = Provider::default();
    let resource = resource.resource(TYPE_NAME).unwrap();

    let diagnostics = resource.validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.private_key.size"));

    match resource.create(plan) {
        Err(Error::InvalidConfiguration(diagnostics)) => {
            assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.private_key.size"));
        }
        other => panic!("expected invalid configuration, got {:?}", other.map(|_| ())),
    }
}
