use kube::core::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::crds::cert_manager::{
    secret_key_selector_schema, solver_attributes, AcmeChallengeSolver, SecretKeySelector,
};
use crate::resource::ManifestKind;
use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

/// Cluster-scoped issuer. Only the issuer types listed below are modelled.
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[kube(
    group = "cert-manager.io",
    version = "v1",
    kind = "ClusterIssuer",
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct ClusterIssuerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acme: Option<AcmeIssuer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaIssuer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<SelfSignedIssuer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultIssuer>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcmeIssuer {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub private_key_secret_ref: SecretKeySelector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
    #[serde(rename = "skipTLSVerify", skip_serializing_if = "Option::is_none")]
    pub skip_tls_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_account_key_generation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_duration_feature: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solvers: Option<Vec<AcmeChallengeSolver>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaIssuer {
    pub secret_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp_servers: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelfSignedIssuer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultIssuer {
    pub server: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub auth: VaultAuth,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultAuth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret_ref: Option<SecretKeySelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_role: Option<VaultAppRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<VaultKubernetesAuth>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultAppRole {
    pub path: String,
    pub role_id: String,
    pub secret_ref: SecretKeySelector,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultKubernetesAuth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,
}

fn crl_distribution_points() -> Attribute {
    Attribute::list_of(AttributeKind::String)
        .optional()
        .description("The CRL distribution points is an X.509 v3 certificate extension which identifies the location of the CRL from which the revocation of this certificate can be checked.")
}

impl ManifestKind for ClusterIssuer {
    type Spec = ClusterIssuerSpec;

    const TYPE_NAME_SUFFIX: &'static str = "cert_manager_io_cluster_issuer_v1";
    const NAMESPACED: bool = false;
    const DESCRIPTION: &'static str =
        "A ClusterIssuer represents a certificate issuing authority which can be referenced as part of 'issuerRef' fields. It is similar to an Issuer, however it is cluster-scoped and therefore can be referenced by resources that exist in *any* namespace, not just the same namespace as the referent.";

    fn spec_schema() -> Attribute {
        Attribute::single_nested([
            (
                "acme",
                Attribute::single_nested([
                    (
                        "server",
                        Attribute::string()
                            .required()
                            .description("Server is the URL used to access the ACME server's 'directory' endpoint."),
                    ),
                    (
                        "email",
                        Attribute::string()
                            .optional()
                            .description("Email is the email address to be associated with the ACME account."),
                    ),
                    (
                        "private_key_secret_ref",
                        secret_key_selector_schema("PrivateKey is the name of a Kubernetes Secret resource that will be used to store the automatically generated ACME account private key.")
                            .required(),
                    ),
                    (
                        "ca_bundle",
                        Attribute::string()
                            .optional()
                            .description("Base64-encoded bundle of PEM CAs which can be used to validate the certificate chain presented by the ACME server."),
                    ),
                    (
                        "skip_tls_verify",
                        Attribute::bool()
                            .optional()
                            .manifest_key("skipTLSVerify")
                            .description("INSECURE: Enables or disables validation of the ACME server TLS certificate."),
                    ),
                    (
                        "preferred_chain",
                        Attribute::string()
                            .optional()
                            .description("PreferredChain is the chain to use if the ACME server outputs multiple.")
                            .validator(Validator::LengthBetween { min: 0, max: 64 }),
                    ),
                    (
                        "disable_account_key_generation",
                        Attribute::bool()
                            .optional()
                            .description("Enables or disables generating a new ACME account key."),
                    ),
                    (
                        "enable_duration_feature",
                        Attribute::bool()
                            .optional()
                            .description("Enables requesting a Not After date on certificates that matches the duration of the certificate."),
                    ),
                    (
                        "solvers",
                        Attribute::list_nested(solver_attributes())
                            .optional()
                            .description("Solvers is a list of challenge solvers that will be used to solve ACME challenges for the matching domains."),
                    ),
                ])
                .optional()
                .description("ACME configures this issuer to communicate with a RFC8555 (ACME) server to obtain signed x509 certificates."),
            ),
            (
                "ca",
                Attribute::single_nested([
                    (
                        "secret_name",
                        Attribute::string()
                            .required()
                            .description("SecretName is the name of the secret used to sign Certificates issued by this Issuer."),
                    ),
                    ("crl_distribution_points", crl_distribution_points()),
                    (
                        "ocsp_servers",
                        Attribute::list_of(AttributeKind::String)
                            .optional()
                            .description("The OCSP server list is an X.509 v3 extension that defines a list of URLs of OCSP responders."),
                    ),
                ])
                .optional()
                .description("CA configures this issuer to sign certificates using a signing CA keypair stored in a Secret resource."),
            ),
            (
                "self_signed",
                Attribute::single_nested([("crl_distribution_points", crl_distribution_points())])
                    .optional()
                    .description("SelfSigned configures this issuer to 'self sign' certificates using the private key used to create the CertificateRequest object."),
            ),
            (
                "vault",
                Attribute::single_nested([
                    (
                        "server",
                        Attribute::string()
                            .required()
                            .description("Server is the connection address for the Vault server, e.g: 'https://vault.example.com:8200'."),
                    ),
                    (
                        "path",
                        Attribute::string()
                            .required()
                            .description("Path is the mount path of the Vault PKI backend's 'sign' endpoint, e.g: 'my_pki_mount/sign/my-role-name'."),
                    ),
                    (
                        "ca_bundle",
                        Attribute::string()
                            .optional()
                            .description("Base64-encoded bundle of PEM CAs which will be used to validate the certificate chain presented by Vault."),
                    ),
                    (
                        "namespace",
                        Attribute::string()
                            .optional()
                            .description("Name of the vault namespace. Namespaces is a set of features within Vault Enterprise."),
                    ),
                    (
                        "auth",
                        Attribute::single_nested([
                            (
                                "token_secret_ref",
                                secret_key_selector_schema("TokenSecretRef authenticates with Vault by presenting a token."),
                            ),
                            (
                                "app_role",
                                Attribute::single_nested([
                                    (
                                        "path",
                                        Attribute::string()
                                            .required()
                                            .description("Path where the App Role authentication backend is mounted in Vault, e.g: 'approle'."),
                                    ),
                                    (
                                        "role_id",
                                        Attribute::string()
                                            .required()
                                            .description("RoleID configured in the App Role authentication backend when setting up the authentication backend in Vault."),
                                    ),
                                    (
                                        "secret_ref",
                                        secret_key_selector_schema("Reference to a key in a Secret that contains the App Role secret used to authenticate with Vault.")
                                            .required(),
                                    ),
                                ])
                                .optional()
                                .description("AppRole authenticates with Vault using the App Role auth mechanism."),
                            ),
                            (
                                "kubernetes",
                                Attribute::single_nested([
                                    (
                                        "mount_path",
                                        Attribute::string()
                                            .optional()
                                            .description("The Vault mountPath here is the mount path to use when authenticating with Vault."),
                                    ),
                                    (
                                        "role",
                                        Attribute::string()
                                            .required()
                                            .description("A required field containing the Vault Role to assume."),
                                    ),
                                    (
                                        "secret_ref",
                                        secret_key_selector_schema("The required Secret field containing a Kubernetes ServiceAccount JWT used for authenticating with Vault."),
                                    ),
                                ])
                                .optional()
                                .description("Kubernetes authenticates with Vault by passing the ServiceAccount token stored in the named Secret resource to the Vault server."),
                            ),
                        ])
                        .required()
                        .description("Auth configures how cert-manager authenticates with the Vault server."),
                    ),
                ])
                .optional()
                .description("Vault configures this issuer to sign certificates using a HashiCorp Vault PKI backend."),
            ),
        ])
        .required()
    }

    fn from_parts(metadata: ObjectMeta, spec: ClusterIssuerSpec) -> Self {
        Self { metadata, spec }
    }
}
