use kube::core::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crds::cert_manager::{
    issuer_ref_schema, secret_key_selector_schema, IssuerReference, SecretKeySelector,
};
use crate::resource::ManifestKind;
use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

const KEY_USAGES: [&str; 23] = [
    "signing",
    "digital signature",
    "content commitment",
    "key encipherment",
    "key agreement",
    "data encipherment",
    "cert sign",
    "crl sign",
    "encipher only",
    "decipher only",
    "any",
    "server auth",
    "client auth",
    "code signing",
    "email protection",
    "s/mime",
    "ipsec end system",
    "ipsec tunnel",
    "ipsec user",
    "timestamping",
    "ocsp signing",
    "microsoft sgc",
    "netscape sgc",
];

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[kube(
    group = "cert-manager.io",
    version = "v1",
    kind = "Certificate",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct CertificateSpec {
    pub secret_name: String,
    pub issuer_ref: IssuerReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<String>>,
    #[serde(rename = "isCA", skip_serializing_if = "Option::is_none")]
    pub is_ca: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<CertificatePrivateKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_template: Option<SecretTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<X509Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_history_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode_usages_in_request: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystores: Option<Keystores>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CertificatePrivateKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<PrivateKeyAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<PrivateKeyEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_policy: Option<RotationPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrivateKeyAlgorithm {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "ECDSA")]
    Ecdsa,
    Ed25519,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrivateKeyEncoding {
    #[serde(rename = "PKCS1")]
    Pkcs1,
    #[serde(rename = "PKCS8")]
    Pkcs8,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RotationPolicy {
    Never,
    Always,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct X509Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizational_units: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provinces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_addresses: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Keystores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jks: Option<Keystore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkcs12: Option<Keystore>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Keystore {
    pub create: bool,
    pub password_secret_ref: SecretKeySelector,
}

fn string_list(description: &str) -> Attribute {
    Attribute::list_of(AttributeKind::String)
        .optional()
        .description(description)
}

fn keystore_schema(format: &str) -> Attribute {
    Attribute::single_nested([
        (
            "create",
            Attribute::bool().required().description(format!(
                "Create enables {format} keystore creation for the Certificate. If true, a file will be created in the same Secret as the certificate."
            )),
        ),
        (
            "password_secret_ref",
            secret_key_selector_schema("A reference to a key in a Secret resource containing the password used to encrypt the keystore.")
                .required(),
        ),
    ])
    .optional()
    .description(format!(
        "{format} configures options for storing a {format} keystore in the spec.secretName Secret resource."
    ))
}

impl ManifestKind for Certificate {
    type Spec = CertificateSpec;

    const TYPE_NAME_SUFFIX: &'static str = "cert_manager_io_certificate_v1";
    const NAMESPACED: bool = true;
    const DESCRIPTION: &'static str =
        "A Certificate resource should be created to ensure an up to date and signed X.509 certificate is stored in the Kubernetes Secret resource named in 'spec.secretName'.";

    fn spec_schema() -> Attribute {
        Attribute::single_nested([
            (
                "secret_name",
                Attribute::string()
                    .required()
                    .description("Name of the Secret resource that will be automatically created and managed by this Certificate resource."),
            ),
            (
                "issuer_ref",
                issuer_ref_schema("Reference to the issuer responsible for issuing the certificate."),
            ),
            (
                "common_name",
                Attribute::string()
                    .optional()
                    .description("Requested common name X509 certificate subject attribute.")
                    .validator(Validator::LengthBetween { min: 1, max: 64 }),
            ),
            ("dns_names", string_list("Requested DNS subject alternative names.")),
            (
                "duration",
                Attribute::string()
                    .optional()
                    .description("Requested 'duration' (i.e. lifetime) of the Certificate, e.g. '2160h'."),
            ),
            (
                "renew_before",
                Attribute::string()
                    .optional()
                    .description("How long before the currently issued certificate's expiry cert-manager should renew the certificate."),
            ),
            ("ip_addresses", string_list("Requested IP address subject alternative names.")),
            ("uris", string_list("Requested URI subject alternative names.")),
            ("email_addresses", string_list("Requested email subject alternative names.")),
            (
                "is_ca",
                Attribute::bool()
                    .optional()
                    .manifest_key("isCA")
                    .description("Requested basic constraints isCA value. The isCA value is used to set the 'isCA' field on the created CertificateRequest resources."),
            ),
            (
                "usages",
                string_list("Requested key usages and extended key usages.")
                    .validator(Validator::each(Validator::one_of(KEY_USAGES))),
            ),
            (
                "private_key",
                Attribute::single_nested([
                    (
                        "algorithm",
                        Attribute::string()
                            .optional()
                            .description("Algorithm is the private key algorithm of the corresponding private key for this certificate.")
                            .validator(Validator::one_of(["RSA", "ECDSA", "Ed25519"])),
                    ),
                    (
                        "encoding",
                        Attribute::string()
                            .optional()
                            .description("The private key cryptography standards (PKCS) encoding for this certificate's private key to be encoded in.")
                            .validator(Validator::one_of(["PKCS1", "PKCS8"])),
                    ),
                    (
                        "rotation_policy",
                        Attribute::string()
                            .optional()
                            .description("RotationPolicy controls how private keys should be regenerated when a re-issuance is being processed.")
                            .validator(Validator::one_of(["Never", "Always"])),
                    ),
                    (
                        "size",
                        Attribute::int32()
                            .optional()
                            .description("Size is the key bit size of the corresponding private key for this certificate."),
                    ),
                ])
                .optional()
                .description("Private key options. These include the key algorithm and size, the used encoding and the rotation policy."),
            ),
            (
                "secret_template",
                Attribute::single_nested([
                    (
                        "annotations",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("Annotations is a key value map to be copied to the target Kubernetes Secret.")
                            .validator(Validator::Annotations),
                    ),
                    (
                        "labels",
                        Attribute::map_of(AttributeKind::String)
                            .optional()
                            .description("Labels is a key value map to be copied to the target Kubernetes Secret.")
                            .validator(Validator::Labels),
                    ),
                ])
                .optional()
                .description("Defines annotations and labels to be copied to the Certificate's Secret."),
            ),
            (
                "subject",
                Attribute::single_nested([
                    ("countries", string_list("Countries to be used on the Certificate.")),
                    ("localities", string_list("Cities to be used on the Certificate.")),
                    (
                        "organizational_units",
                        string_list("Organizational Units to be used on the Certificate."),
                    ),
                    ("organizations", string_list("Organizations to be used on the Certificate.")),
                    ("postal_codes", string_list("Postal codes to be used on the Certificate.")),
                    ("provinces", string_list("State/Provinces to be used on the Certificate.")),
                    (
                        "serial_number",
                        Attribute::string()
                            .optional()
                            .description("Serial number to be used on the Certificate."),
                    ),
                    (
                        "street_addresses",
                        string_list("Street addresses to be used on the Certificate."),
                    ),
                ])
                .optional()
                .description("Requested set of X509 certificate subject attributes."),
            ),
            (
                "literal_subject",
                Attribute::string()
                    .optional()
                    .description("Requested X.509 certificate subject, represented using the LDAP 'String Representation of a Distinguished Name'. Mutually exclusive with 'subject'."),
            ),
            (
                "revision_history_limit",
                Attribute::int32()
                    .optional()
                    .description("The maximum number of CertificateRequest revisions that are maintained in the Certificate's history.")
                    .validator(Validator::AtLeast { min: 1 }),
            ),
            (
                "encode_usages_in_request",
                Attribute::bool()
                    .optional()
                    .description("Whether the KeyUsage and ExtKeyUsage extensions should be set in the encoded CSR."),
            ),
            (
                "keystores",
                Attribute::single_nested([
                    ("jks", keystore_schema("JKS")),
                    ("pkcs12", keystore_schema("PKCS12")),
                ])
                .optional()
                .description("Additional keystore output formats to be stored in the Certificate's Secret."),
            ),
        ])
        .required()
    }

    fn from_parts(metadata: ObjectMeta, spec: CertificateSpec) -> Self {
        Self { metadata, spec }
    }
}
