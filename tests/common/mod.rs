use k8s_manifest_provider::provider::Provider;
use serde_json::Value;

/// Runs Create for `type_name` and returns the state and the parsed manifest.
pub fn create(type_name: &str, plan: Value) -> (Value, Value) {
    let provider = Provider::default();
    let state = provider.resource(type_name).unwrap().create(plan).unwrap();
    let manifest = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
    (state, manifest)
}
