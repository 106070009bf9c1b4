use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::core::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resource::ManifestKind;
use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

const DURATION_PATTERN: &str =
    r"^(0|(([0-9]+)y)?(([0-9]+)w)?(([0-9]+)d)?(([0-9]+)h)?(([0-9]+)m)?(([0-9]+)s)?(([0-9]+)ms)?)$";
const LABEL_NAME_PATTERN: &str = r"^[a-zA-Z_][a-zA-Z0-9_]*$";

const RELABEL_ACTIONS: [&str; 22] = [
    "replace",
    "Replace",
    "keep",
    "Keep",
    "drop",
    "Drop",
    "hashmod",
    "HashMod",
    "labelmap",
    "LabelMap",
    "labeldrop",
    "LabelDrop",
    "labelkeep",
    "LabelKeep",
    "lowercase",
    "Lowercase",
    "uppercase",
    "Uppercase",
    "keepequal",
    "KeepEqual",
    "dropequal",
    "DropEqual",
];

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[kube(
    group = "monitoring.coreos.com",
    version = "v1",
    kind = "ServiceMonitor",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct ServiceMonitorSpec {
    pub endpoints: Vec<Endpoint>,
    pub selector: LabelSelector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<NamespaceSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_target_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_metadata: Option<AttachMetadata>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_timestamps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_http2: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relabelings: Option<Vec<RelabelConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_relabelings: Option<Vec<RelabelConfig>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TlsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure_skip_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelabelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamespaceSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_names: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttachMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<bool>,
}

fn duration(description: &str) -> Attribute {
    Attribute::string()
        .optional()
        .description(description)
        .validator(Validator::regex_matches(
            DURATION_PATTERN,
            "must be a Prometheus duration such as 30s or 1m30s",
        ))
}

fn relabelings(description: &str) -> Attribute {
    Attribute::list_nested([
        (
            "action",
            Attribute::string()
                .optional()
                .description("Action to perform based on the regex matching. Default: 'Replace'.")
                .validator(Validator::one_of(RELABEL_ACTIONS)),
        ),
        (
            "modulus",
            Attribute::int64()
                .optional()
                .description("Modulus to take of the hash of the source label values. Only applicable when the action is 'HashMod'."),
        ),
        (
            "regex",
            Attribute::string()
                .optional()
                .description("Regular expression against which the extracted value is matched."),
        ),
        (
            "replacement",
            Attribute::string()
                .optional()
                .description("Replacement value against which a Replace action is performed if the regular expression matches."),
        ),
        (
            "separator",
            Attribute::string()
                .optional()
                .description("Separator is the string between concatenated SourceLabels."),
        ),
        (
            "source_labels",
            Attribute::list_of(AttributeKind::String)
                .optional()
                .description("The source labels select values from existing labels. Their content is concatenated using the configured Separator and matched against the configured regular expression.")
                .validator(Validator::each(Validator::regex_matches(
                    LABEL_NAME_PATTERN,
                    "must be a valid Prometheus label name",
                ))),
        ),
        (
            "target_label",
            Attribute::string()
                .optional()
                .description("Label to which the resulting string is written in a replacement."),
        ),
    ])
    .optional()
    .description(description)
}

impl ManifestKind for ServiceMonitor {
    type Spec = ServiceMonitorSpec;

    const TYPE_NAME_SUFFIX: &'static str = "monitoring_coreos_com_service_monitor_v1";
    const NAMESPACED: bool = true;
    const DESCRIPTION: &'static str = "ServiceMonitor defines monitoring for a set of services.";

    fn spec_schema() -> Attribute {
        Attribute::single_nested([
            (
                "endpoints",
                Attribute::list_nested([
                    (
                        "port",
                        Attribute::string()
                            .optional()
                            .description("Name of the Service port which this endpoint refers to. It takes precedence over 'targetPort'."),
                    ),
                    (
                        "target_port",
                        Attribute::int_or_string()
                            .optional()
                            .description("Name or number of the target port of the 'Pod' object behind the Service. The port must be specified with the container's port property."),
                    ),
                    (
                        "path",
                        Attribute::string()
                            .optional()
                            .description("HTTP path from which to scrape for metrics. If empty, Prometheus uses the default value (e.g. '/metrics')."),
                    ),
                    (
                        "scheme",
                        Attribute::string()
                            .optional()
                            .description("HTTP scheme to use for scraping. 'http' and 'https' are the expected values.")
                            .validator(Validator::one_of(["http", "https"])),
                    ),
                    (
                        "params",
                        Attribute::map_of(AttributeKind::List(Box::new(AttributeKind::String)))
                            .optional()
                            .description("params define optional HTTP URL parameters."),
                    ),
                    (
                        "interval",
                        duration("Interval at which Prometheus scrapes the metrics from the target. If empty, Prometheus uses the global scrape interval."),
                    ),
                    (
                        "scrape_timeout",
                        duration("Timeout after which Prometheus considers the scrape to be failed. If empty, Prometheus uses the global scrape timeout unless it is less than the target's scrape interval value in which the latter is used."),
                    ),
                    (
                        "honor_labels",
                        Attribute::bool()
                            .optional()
                            .description("When true, 'honorLabels' preserves the metric's labels when they collide with the target's labels."),
                    ),
                    (
                        "honor_timestamps",
                        Attribute::bool()
                            .optional()
                            .description("Controls whether Prometheus preserves the timestamps when exposed by the target."),
                    ),
                    (
                        "follow_redirects",
                        Attribute::bool()
                            .optional()
                            .description("Configures whether the scrape requests follow HTTP 3xx redirects."),
                    ),
                    (
                        "enable_http2",
                        Attribute::bool()
                            .optional()
                            .description("Whether to enable HTTP2."),
                    ),
                    (
                        "bearer_token_file",
                        Attribute::string()
                            .optional()
                            .description("File to read bearer token for scraping the target. Deprecated: use 'authorization' instead."),
                    ),
                    (
                        "tls_config",
                        Attribute::single_nested([
                            (
                                "ca_file",
                                Attribute::string()
                                    .optional()
                                    .description("Path to the CA cert in the Prometheus container to use for the targets."),
                            ),
                            (
                                "cert_file",
                                Attribute::string()
                                    .optional()
                                    .description("Path to the client cert file in the Prometheus container for the targets."),
                            ),
                            (
                                "key_file",
                                Attribute::string()
                                    .optional()
                                    .description("Path to the client key file in the Prometheus container for the targets."),
                            ),
                            (
                                "insecure_skip_verify",
                                Attribute::bool()
                                    .optional()
                                    .description("Disable target certificate validation."),
                            ),
                            (
                                "server_name",
                                Attribute::string()
                                    .optional()
                                    .description("Used to verify the hostname for the targets."),
                            ),
                        ])
                        .optional()
                        .description("TLS configuration to use when scraping the target."),
                    ),
                    (
                        "relabelings",
                        relabelings("relabelings configures the relabeling rules to apply to the samples before ingestion."),
                    ),
                    (
                        "metric_relabelings",
                        relabelings("metricRelabelings configures the relabeling rules to apply to the samples before ingestion."),
                    ),
                ])
                .required()
                .description("List of endpoints part of this ServiceMonitor."),
            ),
            (
                "selector",
                Attribute::single_nested([
                    (
                        "match_expressions",
                        Attribute::list_nested([
                            (
                                "key",
                                Attribute::string()
                                    .required()
                                    .description("key is the label key that the selector applies to."),
                            ),
                            (
                                "operator",
                                Attribute::string()
                                    .required()
                                    .description("operator represents a key's relationship to a set of values. Valid operators are In, NotIn, Exists and DoesNotExist.")
                                    .validator(Validator::one_of([
                                        "In", "NotIn", "Exists", "DoesNotExist",
                                    ])),
                            ),
                            (
                                "values",
                                Attribute::list_of(AttributeKind::String)
                                    .optional()
                                    .description("values is an array of string values. If the operator is In or NotIn, the values array must be non-empty."),
                            ),
                        ])
                        .optional()
                        .description("matchExpressions is a list of label selector requirements. The requirements are ANDed."),
                    ),
                    (
                        "match_labels",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("matchLabels is a map of {key,value} pairs.")
                            .validator(Validator::Labels),
                    ),
                ])
                .required()
                .description("Label selector to select the Kubernetes 'Endpoints' objects."),
            ),
            (
                "namespace_selector",
                Attribute::single_nested([
                    (
                        "any",
                        Attribute::bool()
                            .optional()
                            .description("Boolean describing whether all namespaces are selected in contrast to a list restricting them."),
                    ),
                    (
                        "match_names",
                        Attribute::list_of(AttributeKind::String)
                            .optional()
                            .description("List of namespace names to select from.")
                            .validator(Validator::each(Validator::Namespace)),
                    ),
                ])
                .optional()
                .description("Selector to select which namespaces the Kubernetes 'Endpoints' objects are discovered from."),
            ),
            (
                "job_label",
                Attribute::string()
                    .optional()
                    .description("The label to use to retrieve the job name from. It determines the 'job' label's value by looking up the label's value from the Service."),
            ),
            (
                "target_labels",
                Attribute::list_of(AttributeKind::String)
                    .optional()
                    .description("Transfers labels from the Kubernetes 'Service' onto the created metrics."),
            ),
            (
                "pod_target_labels",
                Attribute::list_of(AttributeKind::String)
                    .optional()
                    .description("Transfers labels on the Kubernetes 'Pod' onto the created metrics."),
            ),
            (
                "sample_limit",
                Attribute::int64()
                    .optional()
                    .description("Per-scrape limit on number of scraped samples that will be accepted.")
                    .validator(Validator::AtLeast { min: 0 }),
            ),
            (
                "attach_metadata",
                Attribute::single_nested([(
                    "node",
                    Attribute::bool()
                        .optional()
                        .description("When set to true, Prometheus must have the 'get' permission on the 'Nodes' objects."),
                )])
                .optional()
                .description("Defines additional metadata which is added to the discovered targets."),
            ),
        ])
        .required()
    }

    fn from_parts(metadata: ObjectMeta, spec: ServiceMonitorSpec) -> Self {
        Self { metadata, spec }
    }
}
