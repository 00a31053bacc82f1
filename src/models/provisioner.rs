use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::proto_enum::{self, ProtoEnum};
use super::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ProvisionerType {
    #[default]
    Noop,
    Jwk,
    Oidc,
    Gcp,
    Aws,
    Azure,
    Acme,
    X5c,
    K8sSa,
    SshPop,
    Scep,
    Nebula,
    /// A type number introduced by a newer CA.
    Unrecognized(i32),
    /// A type name introduced by a newer CA. Encoded back by name.
    UnrecognizedName(String),
}

impl ProtoEnum for ProvisionerType {
    const TYPE_NAME: &'static str = "provisioner type";

    fn name(&self) -> Option<&str> {
        let name = match self {
            ProvisionerType::Noop => "NOOP",
            ProvisionerType::Jwk => "JWK",
            ProvisionerType::Oidc => "OIDC",
            ProvisionerType::Gcp => "GCP",
            ProvisionerType::Aws => "AWS",
            ProvisionerType::Azure => "AZURE",
            ProvisionerType::Acme => "ACME",
            ProvisionerType::X5c => "X5C",
            ProvisionerType::K8sSa => "K8SSA",
            ProvisionerType::SshPop => "SSHPOP",
            ProvisionerType::Scep => "SCEP",
            ProvisionerType::Nebula => "NEBULA",
            ProvisionerType::Unrecognized(_) => return None,
            ProvisionerType::UnrecognizedName(name) => name.as_str(),
        };
        Some(name)
    }

    fn number(&self) -> Option<i32> {
        let number = match self {
            ProvisionerType::Noop => 0,
            ProvisionerType::Jwk => 1,
            ProvisionerType::Oidc => 2,
            ProvisionerType::Gcp => 3,
            ProvisionerType::Aws => 4,
            ProvisionerType::Azure => 5,
            ProvisionerType::Acme => 6,
            ProvisionerType::X5c => 7,
            ProvisionerType::K8sSa => 8,
            ProvisionerType::SshPop => 9,
            ProvisionerType::Scep => 10,
            ProvisionerType::Nebula => 11,
            ProvisionerType::Unrecognized(number) => *number,
            ProvisionerType::UnrecognizedName(_) => return None,
        };
        Some(number)
    }

    fn from_name(name: &str) -> Self {
        match name {
            "NOOP" => ProvisionerType::Noop,
            "JWK" => ProvisionerType::Jwk,
            "OIDC" => ProvisionerType::Oidc,
            "GCP" => ProvisionerType::Gcp,
            "AWS" => ProvisionerType::Aws,
            "AZURE" => ProvisionerType::Azure,
            "ACME" => ProvisionerType::Acme,
            "X5C" => ProvisionerType::X5c,
            "K8SSA" => ProvisionerType::K8sSa,
            "SSHPOP" => ProvisionerType::SshPop,
            "SCEP" => ProvisionerType::Scep,
            "NEBULA" => ProvisionerType::Nebula,
            other => ProvisionerType::UnrecognizedName(other.to_string()),
        }
    }

    fn from_number(number: i32) -> Self {
        match number {
            0 => ProvisionerType::Noop,
            1 => ProvisionerType::Jwk,
            2 => ProvisionerType::Oidc,
            3 => ProvisionerType::Gcp,
            4 => ProvisionerType::Aws,
            5 => ProvisionerType::Azure,
            6 => ProvisionerType::Acme,
            7 => ProvisionerType::X5c,
            8 => ProvisionerType::K8sSa,
            9 => ProvisionerType::SshPop,
            10 => ProvisionerType::Scep,
            11 => ProvisionerType::Nebula,
            other => ProvisionerType::Unrecognized(other),
        }
    }
}

impl fmt::Display for ProvisionerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.number()) {
            (Some(name), _) => f.write_str(name),
            (None, Some(number)) => write!(f, "{number}"),
            (None, None) => Ok(()),
        }
    }
}

/// A provisioner record. Type specific configuration, claims and templates
/// are carried as opaque JSON and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provisioner {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, alias = "authority_id", skip_serializing_if = "String::is_empty")]
    pub authority_id: String,
    #[serde(
        rename = "type",
        default,
        serialize_with = "proto_enum::serialize_name",
        deserialize_with = "proto_enum::deserialize"
    )]
    pub provisioner_type: ProvisionerType,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<Value>,
    #[serde(default, alias = "x509_template", skip_serializing_if = "Option::is_none")]
    pub x509_template: Option<Value>,
    #[serde(default, alias = "ssh_template", skip_serializing_if = "Option::is_none")]
    pub ssh_template: Option<Value>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, alias = "deleted_at", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl Provisioner {
    pub fn new(name: impl Into<String>, provisioner_type: ProvisionerType) -> Self {
        Self {
            name: name.into(),
            provisioner_type,
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_claims(mut self, claims: Value) -> Self {
        self.claims = Some(claims);
        self
    }
}
