mod common;

use k8s_manifest_provider::crds::cluster_issuer::ClusterIssuer;
use k8s_manifest_provider::provider::Provider;
use serde_json::{json, Value};

const TYPE_NAME: &str = "k8s_cert_manager_io_cluster_issuer_v1";

fn plan() -> Value {
    json!({
        "metadata": { "name": "letsencrypt" },
        "spec": {
            "acme": {
                "server": "https://acme-v02.api.letsencrypt.org/directory",
                "email": "ops@example.com",
                "private_key_secret_ref": { "name": "letsencrypt-account" },
                "skip_tls_verify": false,
                "solvers": [
                    {
                        "selector": { "dns_zones": ["example.com"] },
                        "dns01": {
                            "route53": {
                                "region": "eu-central-1",
                                "hosted_zone_id": "Z123",
                                "access_key_id": "AKIA"
                            }
                        }
                    },
                    { "http01": { "ingress": { "ingress_class_name": "nginx" } } }
                ]
            }
        }
    })
}

#[test]
fn create_renders_cluster_scoped_manifest() {
    let (state, manifest) = common::create(TYPE_NAME, plan());

    assert_eq!(state["api_version"], "cert-manager.io/v1");
    assert_eq!(state["kind"], "ClusterIssuer");
    assert_eq!(manifest["metadata"], json!({ "name": "letsencrypt" }));

    let acme = &manifest["spec"]["acme"];
    assert_eq!(acme["skipTLSVerify"], false);
    assert_eq!(acme["privateKeySecretRef"], json!({ "name": "letsencrypt-account" }));
    assert_eq!(
        acme["solvers"][0]["dns01"]["route53"],
        json!({ "region": "eu-central-1", "hostedZoneID": "Z123", "accessKeyID": "AKIA" })
    );
    assert_eq!(acme["solvers"][0]["selector"], json!({ "dnsZones": ["example.com"] }));
    assert_eq!(acme["solvers"][1]["http01"]["ingress"], json!({ "ingressClassName": "nginx" }));
    assert!(manifest["spec"].get("ca").is_none());
}

#[test]
fn rendered_yaml_decodes_into_the_kind() {
    let (state, _) = common::create(TYPE_NAME, plan());
    let issuer: ClusterIssuer = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    let acme = issuer.spec.acme.unwrap();
    assert_eq!(acme.solvers.unwrap().len(), 2);
    assert_eq!(issuer.metadata.namespace, None);
}

#[test]
fn namespace_is_not_accepted() {
    let mut plan = plan();
    plan["metadata"]["namespace"] = json!("default");
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].summary, "Unsupported Argument");
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("metadata.namespace"));
}

#[test]
fn self_signed_issuer_renders_an_empty_block() {
    let (state, manifest) = common::create(
        TYPE_NAME,
        json!({ "metadata": { "name": "selfsigned" }, "spec": { "self_signed": {} } }),
    );
    assert_eq!(manifest["spec"], json!({ "selfSigned": {} }));
    assert!(state["yaml"].as_str().unwrap().contains("selfSigned: {}"));
}

#[test]
fn vault_requires_auth() {
    let plan = json!({
        "metadata": { "name": "vault" },
        "spec": { "vault": { "server": "https://vault.example.com:8200", "path": "pki/sign/example" } }
    });
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.vault.auth"));
}
