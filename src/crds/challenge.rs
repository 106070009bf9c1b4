use kube::core::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::crds::cert_manager::{
    issuer_ref_schema, solver_attributes, AcmeChallengeSolver, IssuerReference,
};
use crate::resource::ManifestKind;
use crate::schema::Attribute;
use crate::validators::Validator;

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[kube(
    group = "acme.cert-manager.io",
    version = "v1",
    kind = "Challenge",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct ChallengeSpec {
    /// The URL to the ACME Authorization resource that this challenge is a part of.
    #[serde(rename = "authorizationURL")]
    pub authorization_url: String,
    pub dns_name: String,
    pub issuer_ref: IssuerReference,
    /// The ACME challenge key for this challenge.
    pub key: String,
    pub solver: AcmeChallengeSolver,
    pub token: String,
    pub r#type: ChallengeType,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChallengeType {
    #[serde(rename = "HTTP-01")]
    Http01,
    #[serde(rename = "DNS-01")]
    Dns01,
}

impl ManifestKind for Challenge {
    type Spec = ChallengeSpec;

    const TYPE_NAME_SUFFIX: &'static str = "acme_cert_manager_io_challenge_v1";
    const NAMESPACED: bool = true;
    const DESCRIPTION: &'static str =
        "Challenge is a type to represent a Challenge request with an ACME server";

    fn spec_schema() -> Attribute {
        Attribute::single_nested([
            (
                "authorization_url",
                Attribute::string()
                    .required()
                    .manifest_key("authorizationURL")
                    .description("The URL to the ACME Authorization resource that this challenge is a part of."),
            ),
            (
                "dns_name",
                Attribute::string()
                    .required()
                    .description("dnsName is the identifier that this challenge is for, e.g. example.com. If the requested DNSName is a 'wildcard', this field MUST be set to the non-wildcard domain, e.g. for '*.example.com', it must be 'example.com'."),
            ),
            (
                "issuer_ref",
                issuer_ref_schema("References a properly configured ACME-type Issuer which should be used to create this Challenge. If the Issuer does not exist, processing will be retried. If the Issuer is not an 'ACME' Issuer, an error will be returned and the Challenge will be marked as failed."),
            ),
            (
                "key",
                Attribute::string()
                    .required()
                    .description("The ACME challenge key for this challenge. For HTTP01 challenges, this is the value that must be responded with to complete the HTTP01 challenge. For DNS01 challenges, this is the base64 encoded SHA256 sum of the key."),
            ),
            (
                "solver",
                Attribute::single_nested(solver_attributes())
                    .required()
                    .description("Contains the domain solving configuration that should be used to solve this challenge resource."),
            ),
            (
                "token",
                Attribute::string()
                    .required()
                    .description("The ACME challenge token for this challenge. This is the raw value returned from the ACME server."),
            ),
            (
                "type",
                Attribute::string()
                    .required()
                    .description("The type of ACME challenge this resource represents. One of 'HTTP-01' or 'DNS-01'.")
                    .validator(Validator::one_of(["HTTP-01", "DNS-01"])),
            ),
            (
                "url",
                Attribute::string()
                    .required()
                    .description("The URL of the ACME Challenge resource for this challenge. This can be used to lookup details about the status of this challenge."),
            ),
            (
                "wildcard",
                Attribute::bool()
                    .optional()
                    .description("wildcard will be true if this challenge is for a wildcard identifier, for example '*.example.com'."),
            ),
        ])
        .required()
    }

    fn from_parts(metadata: ObjectMeta, spec: ChallengeSpec) -> Self {
        Self { metadata, spec }
    }
}
