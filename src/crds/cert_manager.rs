//! Types shared by the cert-manager kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::schema::{Attribute, AttributeKind};
use crate::validators::Validator;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IssuerReference {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretKeySelector {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcmeChallengeSolver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<CertificateDnsNameSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns01: Option<AcmeChallengeSolverDns01>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http01: Option<AcmeChallengeSolverHttp01>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CertificateDnsNameSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcmeChallengeSolverDns01 {
    #[serde(rename = "acmeDNS", skip_serializing_if = "Option::is_none")]
    pub acme_dns: Option<AcmeDns>,
    #[serde(rename = "cloudDNS", skip_serializing_if = "Option::is_none")]
    pub cloud_dns: Option<CloudDns>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudflare: Option<Cloudflare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname_strategy: Option<CnameStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digitalocean: Option<DigitalOcean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfc2136: Option<Rfc2136>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route53: Option<Route53>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<Webhook>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CnameStrategy {
    None,
    Follow,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcmeDns {
    pub account_secret_ref: SecretKeySelector,
    pub host: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CloudDns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_zone_name: Option<String>,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_secret_ref: Option<SecretKeySelector>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Cloudflare {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_secret_ref: Option<SecretKeySelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token_secret_ref: Option<SecretKeySelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalOcean {
    pub token_secret_ref: SecretKeySelector,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rfc2136 {
    pub nameserver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsig_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsig_key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsig_secret_secret_ref: Option<SecretKeySelector>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Route53 {
    #[serde(rename = "accessKeyID", skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(rename = "accessKeyIDSecretRef", skip_serializing_if = "Option::is_none")]
    pub access_key_id_secret_ref: Option<SecretKeySelector>,
    #[serde(rename = "hostedZoneID", skip_serializing_if = "Option::is_none")]
    pub hosted_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key_secret_ref: Option<SecretKeySelector>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Webhook {
    /// Free-form solver configuration, passed to the webhook as is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub group_name: String,
    pub solver_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcmeChallengeSolverHttp01 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Http01Ingress>,
    #[serde(rename = "gatewayHTTPRoute", skip_serializing_if = "Option::is_none")]
    pub gateway_http_route: Option<Http01GatewayHttpRoute>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Http01Ingress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Http01GatewayHttpRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_refs: Option<Vec<ParentReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParentReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

pub fn issuer_ref_schema(description: &str) -> Attribute {
    Attribute::single_nested([
        (
            "name",
            Attribute::string()
                .required()
                .description("Name of the resource being referred to."),
        ),
        (
            "kind",
            Attribute::string()
                .optional()
                .description("Kind of the resource being referred to."),
        ),
        (
            "group",
            Attribute::string()
                .optional()
                .description("Group of the resource being referred to."),
        ),
    ])
    .required()
    .description(description)
}

pub fn secret_key_selector_schema(description: &str) -> Attribute {
    Attribute::single_nested([
        (
            "name",
            Attribute::string()
                .required()
                .description("Name of the resource being referred to."),
        ),
        (
            "key",
            Attribute::string().optional().description(
                "The key of the entry in the Secret resource's 'data' field to be used. Some instances of this field may be defaulted, in others it may be required.",
            ),
        ),
    ])
    .optional()
    .description(description)
}

fn required_secret_key_selector_schema(description: &str) -> Attribute {
    secret_key_selector_schema(description).required()
}

fn service_type_schema() -> Attribute {
    Attribute::string()
        .optional()
        .description("Optional service type for Kubernetes solver service. Supported values are NodePort or ClusterIP. If unset, defaults to NodePort.")
        .validator(Validator::one_of(["NodePort", "ClusterIP"]))
}

/// Attributes of an ACME challenge solver, shared by challenges and issuers.
pub fn solver_attributes() -> Vec<(&'static str, Attribute)> {
    vec![
        (
            "selector",
            Attribute::single_nested([
                (
                    "dns_names",
                    Attribute::list_of(AttributeKind::String)
                        .optional()
                        .description("List of DNSNames that this solver will be used to solve. If specified and a match is found, a dnsNames selector will take precedence over a dnsZones selector."),
                ),
                (
                    "dns_zones",
                    Attribute::list_of(AttributeKind::String)
                        .optional()
                        .description("List of DNSZones that this solver will be used to solve. The most specific DNS zone match specified here will take precedence over other DNS zone matches."),
                ),
                (
                    "match_labels",
                    Attribute::map_of(AttributeKind::String)
                        .optional()
                        .description("A label selector that is used to refine the set of certificate's that this challenge solver will apply to."),
                ),
            ])
            .optional()
            .description("Selector selects a set of DNSNames on the Certificate resource that should be solved using this challenge solver. If not specified, the solver will be treated as the 'default' solver with the lowest priority."),
        ),
        ("dns01", dns01_schema()),
        ("http01", http01_schema()),
    ]
}

fn dns01_schema() -> Attribute {
    Attribute::single_nested([
        (
            "acme_dns",
            Attribute::single_nested([
                (
                    "account_secret_ref",
                    required_secret_key_selector_schema("A reference to a specific 'key' within a Secret resource."),
                ),
                ("host", Attribute::string().required()),
            ])
            .optional()
            .manifest_key("acmeDNS")
            .description("Use the 'ACME DNS' (https://github.com/joohoi/acme-dns) API to manage DNS01 challenge records."),
        ),
        (
            "cloud_dns",
            Attribute::single_nested([
                (
                    "hosted_zone_name",
                    Attribute::string()
                        .optional()
                        .description("HostedZoneName is an optional field that tells cert-manager in which Cloud DNS zone the challenge record has to be created."),
                ),
                ("project", Attribute::string().required()),
                (
                    "service_account_secret_ref",
                    secret_key_selector_schema("A reference to a specific 'key' within a Secret resource."),
                ),
            ])
            .optional()
            .manifest_key("cloudDNS")
            .description("Use the Google Cloud DNS API to manage DNS01 challenge records."),
        ),
        (
            "cloudflare",
            Attribute::single_nested([
                (
                    "api_key_secret_ref",
                    secret_key_selector_schema("API key to use to authenticate with Cloudflare. Note: using an API token to authenticate is now the recommended method as it allows greater control of permissions."),
                ),
                (
                    "api_token_secret_ref",
                    secret_key_selector_schema("API token used to authenticate with Cloudflare."),
                ),
                (
                    "email",
                    Attribute::string()
                        .optional()
                        .description("Email of the account, only required when using API key based authentication."),
                ),
            ])
            .optional()
            .description("Use the Cloudflare API to manage DNS01 challenge records."),
        ),
        (
            "cname_strategy",
            Attribute::string()
                .optional()
                .description("CNAMEStrategy configures how the DNS01 provider should handle CNAME records when found in DNS zones.")
                .validator(Validator::one_of(["None", "Follow"])),
        ),
        (
            "digitalocean",
            Attribute::single_nested([(
                "token_secret_ref",
                required_secret_key_selector_schema("A reference to a specific 'key' within a Secret resource."),
            )])
            .optional()
            .description("Use the DigitalOcean DNS API to manage DNS01 challenge records."),
        ),
        (
            "rfc2136",
            Attribute::single_nested([
                (
                    "nameserver",
                    Attribute::string()
                        .required()
                        .description("The IP address or hostname of an authoritative DNS server supporting RFC2136 in the form host:port. If the host is an IPv6 address it must be enclosed in square brackets (e.g [2001:db8::1]); port is optional."),
                ),
                (
                    "tsig_algorithm",
                    Attribute::string()
                        .optional()
                        .description("The TSIG Algorithm configured in the DNS supporting RFC2136. Used only when tsigSecretSecretRef and tsigKeyName are defined.")
                        .validator(Validator::one_of([
                            "HMACMD5",
                            "HMACSHA1",
                            "HMACSHA256",
                            "HMACSHA512",
                        ])),
                ),
                (
                    "tsig_key_name",
                    Attribute::string()
                        .optional()
                        .description("The TSIG Key name configured in the DNS. If tsigSecretSecretRef is defined, this field is required."),
                ),
                (
                    "tsig_secret_secret_ref",
                    secret_key_selector_schema("The name of the secret containing the TSIG value. If tsigKeyName is defined, this field is required."),
                ),
            ])
            .optional()
            .description("Use RFC2136 ('Dynamic Updates in the Domain Name System') (https://datatracker.ietf.org/doc/rfc2136/) to manage DNS01 challenge records."),
        ),
        (
            "route53",
            Attribute::single_nested([
                (
                    "access_key_id",
                    Attribute::string()
                        .optional()
                        .manifest_key("accessKeyID")
                        .description("The AccessKeyID is used for authentication. Cannot be set when SecretAccessKeyID is set."),
                ),
                (
                    "access_key_id_secret_ref",
                    secret_key_selector_schema("The SecretAccessKey is used for authentication. If set, pull the AWS access key ID from a key within a Kubernetes Secret.")
                        .manifest_key("accessKeyIDSecretRef"),
                ),
                (
                    "hosted_zone_id",
                    Attribute::string()
                        .optional()
                        .manifest_key("hostedZoneID")
                        .description("If set, the provider will manage only this zone in Route53 and will not do a lookup using the route53:ListHostedZonesByName api call."),
                ),
                (
                    "region",
                    Attribute::string()
                        .optional()
                        .description("Override the AWS region. Route53 is a global service and does not have regional endpoints but the region specified here will be used for authentication."),
                ),
                (
                    "role",
                    Attribute::string()
                        .optional()
                        .description("Role is a Role ARN which the Route53 provider will assume using either the explicit credentials AccessKeyID/SecretAccessKey or the inferred credentials from environment variables, shared credentials file or AWS Instance metadata."),
                ),
                (
                    "secret_access_key_secret_ref",
                    secret_key_selector_schema("The SecretAccessKey is used for authentication. If neither the Access Key nor Key ID are set, we fall-back to using env vars, shared credentials file or AWS Instance metadata."),
                ),
            ])
            .optional()
            .description("Use the AWS Route53 API to manage DNS01 challenge records."),
        ),
        (
            "webhook",
            Attribute::single_nested([
                (
                    "config",
                    Attribute::dynamic()
                        .optional()
                        .description("Additional configuration that should be passed to the webhook apiserver when challenges are processed."),
                ),
                (
                    "group_name",
                    Attribute::string()
                        .required()
                        .description("The API group name that should be used when POSTing ChallengePayload resources to the webhook apiserver."),
                ),
                (
                    "solver_name",
                    Attribute::string()
                        .required()
                        .description("The name of the solver to use, as defined in the webhook provider implementation."),
                ),
            ])
            .optional()
            .description("Configure an external webhook based DNS01 challenge solver to manage DNS01 challenge records."),
        ),
    ])
    .optional()
    .description("Configures cert-manager to attempt to complete authorizations by performing the DNS01 challenge flow.")
}

fn http01_schema() -> Attribute {
    Attribute::single_nested([
        (
            "ingress",
            Attribute::single_nested([
                (
                    "class",
                    Attribute::string()
                        .optional()
                        .description("This field configures the annotation 'kubernetes.io/ingress.class' when creating Ingress resources to solve ACME challenges. Only one of 'class', 'name' or 'ingressClassName' may be specified."),
                ),
                (
                    "ingress_class_name",
                    Attribute::string()
                        .optional()
                        .description("This field configures the field 'ingressClassName' on the created Ingress resources used to solve ACME challenges."),
                ),
                (
                    "name",
                    Attribute::string()
                        .optional()
                        .description("The name of the ingress resource that should have ACME challenge solving routes inserted into it in order to solve HTTP01 challenges."),
                ),
                ("service_type", service_type_schema()),
            ])
            .optional()
            .description("The ingress based HTTP01 challenge solver will solve challenges by creating or modifying Ingress resources in order to route requests for '/.well-known/acme-challenge/XYZ' to 'challenge solver' pods."),
        ),
        (
            "gateway_http_route",
            Attribute::single_nested([
                (
                    "labels",
                    Attribute::map_of(AttributeKind::String)
                        .optional()
                        .description("Custom labels that will be applied to HTTPRoutes created by cert-manager while solving HTTP-01 challenges."),
                ),
                (
                    "parent_refs",
                    Attribute::list_nested([
                        ("group", Attribute::string().optional()),
                        ("kind", Attribute::string().optional()),
                        ("name", Attribute::string().required()),
                        ("namespace", Attribute::string().optional()),
                        (
                            "port",
                            Attribute::int64()
                                .optional()
                                .validator(Validator::AtLeast { min: 1 })
                                .validator(Validator::AtMost { max: 65535 }),
                        ),
                        ("section_name", Attribute::string().optional()),
                    ])
                    .optional()
                    .description("When solving an HTTP-01 challenge, cert-manager creates an HTTPRoute. cert-manager needs to know which parentRefs should be used when creating the HTTPRoute."),
                ),
                ("service_type", service_type_schema()),
            ])
            .optional()
            .manifest_key("gatewayHTTPRoute")
            .description("The Gateway API is a sig-network community API that models service networking in Kubernetes. The gatewayHTTPRoute solver will create HTTPRoutes with the specified labels in the same namespace as the challenge."),
        ),
    ])
    .optional()
    .description("Configures cert-manager to attempt to complete authorizations by performing the HTTP01 challenge flow.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn solver_schema_converts_into_typed_solver() {
        let attribute = Attribute::single_nested(solver_attributes());
        let manifest = attribute.to_manifest(&json!({
            "selector": { "dns_zones": ["example.com"], "dns_names": null, "match_labels": null },
            "dns01": {
                "route53": {
                    "access_key_id": "AKIA",
                    "access_key_id_secret_ref": null,
                    "hosted_zone_id": "Z123",
                    "region": "eu-central-1",
                    "role": null,
                    "secret_access_key_secret_ref": { "name": "aws", "key": "secret" }
                },
                "cname_strategy": "Follow",
                "webhook": { "group_name": "acme.example.com", "solver_name": "example", "config": { "apiKey": 1 } }
            },
            "http01": null
        }));
        let solver: AcmeChallengeSolver = serde_json::from_value(manifest.clone()).unwrap();

        let route53 = solver.dns01.as_ref().unwrap().route53.as_ref().unwrap();
        assert_eq!(route53.access_key_id.as_deref(), Some("AKIA"));
        assert_eq!(route53.hosted_zone_id.as_deref(), Some("Z123"));
        assert_eq!(
            solver.dns01.as_ref().unwrap().cname_strategy,
            Some(CnameStrategy::Follow)
        );
        assert_eq!(manifest["dns01"]["route53"]["hostedZoneID"], json!("Z123"));
        assert_eq!(manifest["dns01"]["webhook"]["config"], json!({ "apiKey": 1 }));

        let back = serde_json::to_value(&solver).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn gateway_route_keeps_its_acronym() {
        let attribute = Attribute::single_nested(solver_attributes());
        let manifest = attribute.to_manifest(&json!({
            "http01": {
                "gateway_http_route": {
                    "parent_refs": [{ "name": "gateway", "section_name": "https", "port": 443 }],
                    "service_type": "ClusterIP"
                }
            }
        }));
        assert_eq!(
            manifest,
            json!({
                "http01": {
                    "gatewayHTTPRoute": {
                        "parentRefs": [{ "name": "gateway", "sectionName": "https", "port": 443 }],
                        "serviceType": "ClusterIP"
                    }
                }
            })
        );
        let solver: AcmeChallengeSolver = serde_json::from_value(manifest).unwrap();
        let route = solver.http01.unwrap().gateway_http_route.unwrap();
        assert_eq!(route.parent_refs.unwrap()[0].port, Some(443));
    }
}
