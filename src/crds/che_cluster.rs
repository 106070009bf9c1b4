use k8s_openapi::api::core::v1::Toleration;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::core::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::resource::ManifestKind;
use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[kube(
    group = "org.eclipse.che",
    version = "v2",
    kind = "CheCluster",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct CheClusterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry: Option<ContainerRegistry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_environments: Option<DevEnvironments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_services: Option<GitServices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networking: Option<Networking>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Components {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub che_server: Option<CheServer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Dashboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_workspace: Option<DevWorkspace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_puller: Option<ImagePuller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ServerMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_registry: Option<PluginRegistry>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_properties: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Deployment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<Container>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Container {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvVar {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ResourceList>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<IntOrString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<IntOrString>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PodSecurityContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fs_group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Dashboard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_message: Option<HeaderMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeaderMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevWorkspace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_limit: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagePuller {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    /// Passed through to the KubernetesImagePuller resource untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginRegistry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_internal_registry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_plugin_registries: Option<Vec<ExternalPluginRegistry>>,
    #[serde(rename = "openVSXURL", skip_serializing_if = "Option::is_none")]
    pub open_vsx_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExternalPluginRegistry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerRegistry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_secret_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevEnvironments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<DefaultNamespace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_container_build_capabilities: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_running_workspaces_per_user: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_workspaces_per_user: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_of_inactivity_before_idling: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_of_run_before_idling: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<WorkspaceStorage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefaultNamespace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_provision: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceStorage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_user_strategy_pvc_config: Option<PvcConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_workspace_strategy_pvc_config: Option<PvcConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pvc_strategy: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PvcConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitServices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitbucket: Option<Vec<GitService>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<Vec<GitHubService>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<Vec<GitService>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub secret_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GitHubService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_subdomain_isolation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub secret_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Networking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_secret_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Gateway>,
    #[serde(rename = "identityProviderURL", skip_serializing_if = "Option::is_none")]
    pub identity_provider_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_auth_client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_auth_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_auth_secret: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Gateway {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
}

fn deployment_schema(description: &str) -> Attribute {
    let resources = || {
        Attribute::single_nested([
            (
                "cpu",
                Attribute::int_or_string()
                    .optional()
                    .description("CPU, in cores. (500m = .5 cores)"),
            ),
            (
                "memory",
                Attribute::int_or_string()
                    .optional()
                    .description("Memory, in bytes. (500Gi = 500GiB = 500 * 1024 * 1024 * 1024)"),
            ),
        ])
        .optional()
    };

    Attribute::single_nested([
        (
            "containers",
            Attribute::list_nested([
                (
                    "env",
                    Attribute::list_nested([
                        (
                            "name",
                            Attribute::string()
                                .required()
                                .description("Name of the environment variable."),
                        ),
                        (
                            "value",
                            Attribute::string()
                                .optional()
                                .description("Value of the environment variable."),
                        ),
                    ])
                    .optional()
                    .description("List of environment variables to set in the container."),
                ),
                (
                    "image",
                    Attribute::string()
                        .optional()
                        .description("Container image. Omit it or leave it empty to use the default container image provided by the Operator."),
                ),
                (
                    "image_pull_policy",
                    Attribute::string()
                        .optional()
                        .description("Image pull policy. Default value is 'Always' for 'nightly', 'next' or 'latest' images, and 'IfNotPresent' in other cases.")
                        .validator(Validator::one_of(["Always", "IfNotPresent", "Never"])),
                ),
                (
                    "name",
                    Attribute::string()
                        .optional()
                        .description("Container name."),
                ),
                (
                    "resources",
                    Attribute::single_nested([
                        (
                            "limits",
                            resources()
                                .description("Describes the maximum amount of compute resources allowed."),
                        ),
                        (
                            "request",
                            resources()
                                .description("Describes the minimum amount of compute resources required."),
                        ),
                    ])
                    .optional()
                    .description("Compute resources required by this container."),
                ),
            ])
            .optional()
            .description("List of containers belonging to the pod."),
        ),
        (
            "security_context",
            Attribute::single_nested([
                (
                    "fs_group",
                    Attribute::int64()
                        .optional()
                        .description("A special supplemental group that applies to all containers in a pod."),
                ),
                (
                    "run_as_user",
                    Attribute::int64()
                        .optional()
                        .description("The UID to run the entrypoint of the container process."),
                ),
            ])
            .optional()
            .description("Security options the pod should run with."),
        ),
    ])
    .optional()
    .description(description)
}

fn pvc_config(description: &str) -> Attribute {
    Attribute::single_nested([
        (
            "claim_size",
            Attribute::string()
                .optional()
                .description("Persistent Volume Claim size. To update the claim size, the storage class that provisions it must support resizing."),
        ),
        (
            "storage_class",
            Attribute::string()
                .optional()
                .description("Storage class for the Persistent Volume Claim. When omitted or left blank, a default storage class is used."),
        ),
    ])
    .optional()
    .description(description)
}

fn git_service(description: &str) -> Attribute {
    Attribute::list_nested([
        (
            "endpoint",
            Attribute::string()
                .optional()
                .description("Git server endpoint."),
        ),
        (
            "secret_name",
            Attribute::string()
                .required()
                .description("Kubernetes secret, that contains Base64-encoded OAuth application id and secret, that stored in 'id' and 'secret' keys respectively."),
        ),
    ])
    .optional()
    .description(description)
}

impl ManifestKind for CheCluster {
    type Spec = CheClusterSpec;

    const TYPE_NAME_SUFFIX: &'static str = "org_eclipse_che_che_cluster_v2";
    const NAMESPACED: bool = true;
    const DESCRIPTION: &'static str =
        "The 'CheCluster' custom resource allows defining and managing Eclipse Che server installation.";

    fn spec_schema() -> Attribute {
        Attribute::single_nested([
            (
                "components",
                Attribute::single_nested([
                    (
                        "che_server",
                        Attribute::single_nested([
                            (
                                "cluster_roles",
                                Attribute::list_of(AttributeKind::String)
                                    .optional()
                                    .description("Additional ClusterRoles assigned to Che ServiceAccount."),
                            ),
                            (
                                "debug",
                                Attribute::bool()
                                    .optional()
                                    .description("Enables the debug mode for Che server."),
                            ),
                            ("deployment", deployment_schema("Deployment override options.")),
                            (
                                "extra_properties",
                                Attribute::map_of(AttributeKind::String)
                                    .optional()
                                    .description("A map of additional environment variables applied in the generated 'che' ConfigMap to be used by the Che server."),
                            ),
                            (
                                "log_level",
                                Attribute::string()
                                    .optional()
                                    .description("The log level for the Che server: 'INFO' or 'DEBUG'."),
                            ),
                        ])
                        .optional()
                        .description("General configuration settings related to the Che server."),
                    ),
                    (
                        "dashboard",
                        Attribute::single_nested([
                            (
                                "header_message",
                                Attribute::single_nested([
                                    (
                                        "show",
                                        Attribute::bool()
                                            .optional()
                                            .description("Instructs dashboard to show the message."),
                                    ),
                                    (
                                        "text",
                                        Attribute::string()
                                            .optional()
                                            .description("Warning message displayed on the user dashboard."),
                                    ),
                                ])
                                .optional()
                                .description("Dashboard header message."),
                            ),
                            (
                                "log_level",
                                Attribute::string()
                                    .optional()
                                    .description("The log level for the Dashboard.")
                                    .validator(Validator::one_of([
                                        "DEBUG", "INFO", "WARN", "ERROR", "FATAL", "TRACE", "SILENT",
                                    ])),
                            ),
                        ])
                        .optional()
                        .description("Configuration settings related to the dashboard used by the Che installation."),
                    ),
                    (
                        "dev_workspace",
                        Attribute::single_nested([(
                            "running_limit",
                            Attribute::string()
                                .optional()
                                .description("Deprecated in favor of 'maxNumberOfRunningWorkspacesPerUser'.")
                                .deprecated("Use 'dev_environments.max_number_of_running_workspaces_per_user' instead."),
                        )])
                        .optional()
                        .description("DevWorkspace Operator configuration."),
                    ),
                    (
                        "image_puller",
                        Attribute::single_nested([
                            (
                                "enable",
                                Attribute::bool()
                                    .optional()
                                    .description("Install and configure the community supported Kubernetes Image Puller Operator."),
                            ),
                            (
                                "spec",
                                Attribute::dynamic()
                                    .optional()
                                    .description("A Kubernetes Image Puller spec to configure the image puller in the CheCluster."),
                            ),
                        ])
                        .optional()
                        .description("Kubernetes Image Puller configuration."),
                    ),
                    (
                        "metrics",
                        Attribute::single_nested([(
                            "enable",
                            Attribute::bool()
                                .optional()
                                .description("Enables 'metrics' for the Che server endpoint."),
                        )])
                        .optional()
                        .description("Che server metrics configuration."),
                    ),
                    (
                        "plugin_registry",
                        Attribute::single_nested([
                            (
                                "disable_internal_registry",
                                Attribute::bool()
                                    .optional()
                                    .description("Disables internal plugin registry."),
                            ),
                            (
                                "external_plugin_registries",
                                Attribute::list_nested([(
                                    "url",
                                    Attribute::string()
                                        .optional()
                                        .description("Public URL of the plugin registry."),
                                )])
                                .optional()
                                .description("External plugin registries."),
                            ),
                            (
                                "open_vsx_url",
                                Attribute::string()
                                    .optional()
                                    .manifest_key("openVSXURL")
                                    .description("Open VSX registry URL. If omitted an embedded instance will be used."),
                            ),
                        ])
                        .optional()
                        .description("Configuration settings related to the plugin registry used by the Che installation."),
                    ),
                ])
                .optional()
                .description("Che components configuration."),
            ),
            (
                "container_registry",
                Attribute::single_nested([
                    (
                        "credentials_secret_name",
                        Attribute::string()
                            .optional()
                            .description("The name of the Kubernetes secret that contains the credentials to access the container registry."),
                    ),
                    (
                        "hostname",
                        Attribute::string()
                            .optional()
                            .description("An optional hostname or URL of an alternative container registry to pull images from."),
                    ),
                    (
                        "organization",
                        Attribute::string()
                            .optional()
                            .description("An optional repository name of an alternative registry to pull images from."),
                    ),
                ])
                .optional()
                .description("Configuration of an alternative registry that stores Che images."),
            ),
            (
                "dev_environments",
                Attribute::single_nested([
                    (
                        "default_editor",
                        Attribute::string()
                            .optional()
                            .description("The default editor to workspace create with. It could be a plugin ID or a URI."),
                    ),
                    (
                        "default_namespace",
                        Attribute::single_nested([
                            (
                                "auto_provision",
                                Attribute::bool()
                                    .optional()
                                    .description("Indicates if is allowed to automatically create a user namespace."),
                            ),
                            (
                                "template",
                                Attribute::string()
                                    .optional()
                                    .description("If you don't create the user namespaces in advance, this field defines the Kubernetes namespace created when you start your first workspace. You can use '<username>' and '<userid>' placeholders.")
                                    .validator(Validator::regex_matches(
                                        r"^.*<username>.*$|^.*<userid>.*$",
                                        "must contain a <username> or <userid> placeholder",
                                    )),
                            ),
                        ])
                        .optional()
                        .description("User's default namespace."),
                    ),
                    (
                        "disable_container_build_capabilities",
                        Attribute::bool()
                            .optional()
                            .description("Disables the container build capabilities."),
                    ),
                    (
                        "max_number_of_running_workspaces_per_user",
                        Attribute::int64()
                            .optional()
                            .description("The maximum number of running workspaces per user. The value, -1, allows users to run an unlimited number of workspaces.")
                            .validator(Validator::AtLeast { min: -1 }),
                    ),
                    (
                        "max_number_of_workspaces_per_user",
                        Attribute::int64()
                            .optional()
                            .description("Total number of workspaces, both stopped and running, that a user can keep. The value, -1, allows users to keep an unlimited number of workspaces.")
                            .validator(Validator::AtLeast { min: -1 }),
                    ),
                    (
                        "node_selector",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("The node selector limits the nodes that can run the workspace pods."),
                    ),
                    (
                        "seconds_of_inactivity_before_idling",
                        Attribute::int32()
                            .optional()
                            .description("Idle timeout for workspaces in seconds. This timeout is the duration after which a workspace will be idled if there is no activity."),
                    ),
                    (
                        "seconds_of_run_before_idling",
                        Attribute::int32()
                            .optional()
                            .description("Run timeout for workspaces in seconds. This timeout is the maximum duration a workspace runs."),
                    ),
                    (
                        "storage",
                        Attribute::single_nested([
                            (
                                "per_user_strategy_pvc_config",
                                pvc_config("PVC settings when using the 'per-user' PVC strategy."),
                            ),
                            (
                                "per_workspace_strategy_pvc_config",
                                pvc_config("PVC settings when using the 'per-workspace' PVC strategy."),
                            ),
                            (
                                "pvc_strategy",
                                Attribute::string()
                                    .optional()
                                    .description("Persistent volume claim strategy for the Che server.")
                                    .validator(Validator::one_of([
                                        "common", "per-user", "per-workspace",
                                    ])),
                            ),
                        ])
                        .optional()
                        .description("Workspaces persistent storage."),
                    ),
                    (
                        "tolerations",
                        Attribute::list_nested([
                            (
                                "effect",
                                Attribute::string()
                                    .optional()
                                    .description("Effect indicates the taint effect to match. Empty means match all taint effects.")
                                    .validator(Validator::one_of([
                                        "NoSchedule", "PreferNoSchedule", "NoExecute",
                                    ])),
                            ),
                            (
                                "key",
                                Attribute::string()
                                    .optional()
                                    .description("Key is the taint key that the toleration applies to."),
                            ),
                            (
                                "operator",
                                Attribute::string()
                                    .optional()
                                    .description("Operator represents a key's relationship to the value.")
                                    .validator(Validator::one_of(["Exists", "Equal"])),
                            ),
                            (
                                "toleration_seconds",
                                Attribute::int64()
                                    .optional()
                                    .description("TolerationSeconds represents the period of time the toleration tolerates the taint."),
                            ),
                            (
                                "value",
                                Attribute::string()
                                    .optional()
                                    .description("Value is the taint value the toleration matches to."),
                            ),
                        ])
                        .optional()
                        .description("The pod tolerations of the workspace pods limit where the workspace pods can run."),
                    ),
                ])
                .optional()
                .description("Development environment default configuration options."),
            ),
            (
                "git_services",
                Attribute::single_nested([
                    (
                        "bitbucket",
                        git_service("Enables users to work with repositories hosted on Bitbucket (bitbucket.org or self-hosted)."),
                    ),
                    (
                        "github",
                        Attribute::list_nested([
                            (
                                "disable_subdomain_isolation",
                                Attribute::bool()
                                    .optional()
                                    .description("Disables subdomain isolation."),
                            ),
                            (
                                "endpoint",
                                Attribute::string()
                                    .optional()
                                    .description("GitHub server endpoint URL."),
                            ),
                            (
                                "secret_name",
                                Attribute::string()
                                    .required()
                                    .description("Kubernetes secret, that contains Base64-encoded GitHub OAuth Client id and GitHub OAuth Client secret."),
                            ),
                        ])
                        .optional()
                        .description("Enables users to work with repositories hosted on GitHub (github.com or GitHub Enterprise)."),
                    ),
                    (
                        "gitlab",
                        git_service("Enables users to work with repositories hosted on GitLab (gitlab.com or self-hosted)."),
                    ),
                ])
                .optional()
                .description("A configuration that allows users to work with remote Git repositories."),
            ),
            (
                "networking",
                Attribute::single_nested([
                    (
                        "annotations",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("Defines annotations which will be set for an Ingress (a route for OpenShift platform).")
                            .validator(Validator::Annotations),
                    ),
                    (
                        "auth",
                        Attribute::single_nested([
                            (
                                "gateway",
                                Attribute::single_nested([
                                    (
                                        "config_labels",
                                        Attribute::map_of(AttributeKind::String)
                                            .optional()
                                            .description("Gateway configuration labels.")
                                            .validator(Validator::Labels),
                                    ),
                                    (
                                        "deployment",
                                        deployment_schema("Deployment override options."),
                                    ),
                                ])
                                .optional()
                                .description("Gateway settings."),
                            ),
                            (
                                "identity_provider_url",
                                Attribute::string()
                                    .optional()
                                    .manifest_key("identityProviderURL")
                                    .description("Public URL of the Identity Provider server."),
                            ),
                            (
                                "o_auth_client_name",
                                Attribute::string()
                                    .optional()
                                    .description("Name of the OpenShift 'OAuthClient' resource used to set up identity federation on the OpenShift side."),
                            ),
                            (
                                "o_auth_scope",
                                Attribute::string()
                                    .optional()
                                    .description("Access Token Scope. This field is specific to Che installations made for Kubernetes only and ignored for OpenShift."),
                            ),
                            (
                                "o_auth_secret",
                                Attribute::string()
                                    .optional()
                                    .sensitive()
                                    .description("Name of the secret set in the OpenShift 'OAuthClient' resource used to set up identity federation on the OpenShift side."),
                            ),
                        ])
                        .optional()
                        .description("Authentication settings."),
                    ),
                    (
                        "domain",
                        Attribute::string()
                            .optional()
                            .description("For an OpenShift cluster, the Operator uses the domain to generate a hostname for the route."),
                    ),
                    (
                        "hostname",
                        Attribute::string()
                            .optional()
                            .description("The public hostname of the installed Che server."),
                    ),
                    (
                        "ingress_class_name",
                        Attribute::string()
                            .optional()
                            .description("IngressClassName is the name of an IngressClass cluster resource."),
                    ),
                    (
                        "labels",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("Defines labels which will be set for an Ingress (a route for OpenShift platform).")
                            .validator(Validator::Labels),
                    ),
                    (
                        "tls_secret_name",
                        Attribute::string()
                            .optional()
                            .description("The name of the secret used to set up Ingress TLS termination."),
                    ),
                ])
                .optional()
                .description("Networking, Che authentication, and TLS configuration."),
            ),
        ])
        .required()
    }

    fn from_parts(metadata: ObjectMeta, spec: CheClusterSpec) -> Self {
        Self { metadata, spec }
    }
}
