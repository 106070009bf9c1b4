mod common;

use k8s_manifest_provider::crds::service_monitor::ServiceMonitor;
use k8s_manifest_provider::provider::Provider;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde_json::{json, Value};

const TYPE_NAME: &str = "k8s_monitoring_coreos_com_service_monitor_v1";

fn plan() -> Value {
    json!({
        "metadata": { "name": "web", "namespace": "monitoring" },
        "spec": {
            "endpoints": [
                {
                    "port": "metrics",
                    "interval": "30s",
                    "scrape_timeout": "10s",
                    "scheme": "https",
                    "relabelings": [
                        { "source_labels": ["__meta_kubernetes_pod_name"], "target_label": "pod", "action": "replace" }
                    ]
                },
                { "target_port": "9090" },
                { "target_port": "web-metrics" }
            ],
            "selector": { "match_labels": { "app": "web" } },
            "namespace_selector": { "any": true }
        }
    })
}

#[test]
fn create_renders_service_monitor_manifest() {
    let (state, manifest) = common::create(TYPE_NAME, plan());

    assert_eq!(state["api_version"], "monitoring.coreos.com/v1");
    assert_eq!(state["kind"], "ServiceMonitor");
    assert_eq!(manifest["spec"]["selector"], json!({ "matchLabels": { "app": "web" } }));
    assert_eq!(manifest["spec"]["namespaceSelector"], json!({ "any": true }));

    let endpoint = &manifest["spec"]["endpoints"][0];
    assert_eq!(endpoint["scrapeTimeout"], "10s");
    assert_eq!(
        endpoint["relabelings"],
        json!([{ "sourceLabels": ["__meta_kubernetes_pod_name"], "targetLabel": "pod", "action": "replace" }])
    );
}

#[test]
fn target_ports_render_as_int_or_string() {
    let (state, manifest) = common::create(TYPE_NAME, plan());
    assert_eq!(manifest["spec"]["endpoints"][1]["targetPort"], json!(9090));
    assert_eq!(manifest["spec"]["endpoints"][2]["targetPort"], json!("web-metrics"));

    let monitor: ServiceMonitor = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    assert_eq!(monitor.spec.endpoints[1].target_port, Some(IntOrString::Int(9090)));
    assert_eq!(
        monitor.spec.endpoints[2].target_port,
        Some(IntOrString::String("web-metrics".into()))
    );
}

#[test]
fn durations_are_validated() {
    let mut plan = plan();
    plan["spec"]["endpoints"][0]["interval"] = json!("thirty seconds");
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.endpoints[0].interval"));
}

#[test]
fn source_labels_must_be_label_names() {
    let mut plan = plan();
    plan["spec"]["endpoints"][0]["relabelings"][0]["source_labels"] = json!(["ok", "not-ok"]);
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].attribute.as_deref(),
        Some("spec.endpoints[0].relabelings[0].source_labels[1]")
    );
}

#[test]
fn endpoints_and_selector_are_required() {
    let plan = json!({ "metadata": { "name": "web", "namespace": "monitoring" }, "spec": {} });
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    let paths: Vec<_> = diagnostics.iter().filter_map(|d| d.attribute.as_deref()).collect();
    assert_eq!(paths, vec!["spec.endpoints", "spec.selector"]);
}

#[test]
fn sample_limits_beyond_i64_are_type_errors() {
    let mut plan = plan();
    plan["spec"]["sample_limit"] = json!(u64::MAX);
    let diagnostics = Provider::default()
        .resource(TYPE_NAME)
        .unwrap()
        .validate_config(&plan);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].summary, "Incorrect attribute value type");
    assert_eq!(diagnostics[0].attribute.as_deref(), Some("spec.sample_limit"));
}
