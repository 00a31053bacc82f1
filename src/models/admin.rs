use serde::{Deserialize, Serialize};
use std::fmt;

use super::proto_enum::{self, ProtoEnum};
use super::Timestamp;

/// Privilege level of an admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdminType {
    #[default]
    Unknown,
    Admin,
    SuperAdmin,
}

impl ProtoEnum for AdminType {
    const TYPE_NAME: &'static str = "admin type";

    fn name(&self) -> Option<&str> {
        Some(match self {
            AdminType::Unknown => "UNKNOWN",
            AdminType::Admin => "ADMIN",
            AdminType::SuperAdmin => "SUPER_ADMIN",
        })
    }

    fn number(&self) -> Option<i32> {
        Some(match self {
            AdminType::Unknown => 0,
            AdminType::Admin => 1,
            AdminType::SuperAdmin => 2,
        })
    }

    /// Names from a newer CA read as `Unknown`, like unknown numbers.
    fn from_name(name: &str) -> Self {
        match name {
            "ADMIN" => AdminType::Admin,
            "SUPER_ADMIN" => AdminType::SuperAdmin,
            _ => AdminType::Unknown,
        }
    }

    fn from_number(number: i32) -> Self {
        match number {
            1 => AdminType::Admin,
            2 => AdminType::SuperAdmin,
            _ => AdminType::Unknown,
        }
    }
}

impl fmt::Display for AdminType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("UNKNOWN"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, alias = "authority_id", skip_serializing_if = "String::is_empty")]
    pub authority_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, alias = "provisioner_id", skip_serializing_if = "String::is_empty")]
    pub provisioner_id: String,
    #[serde(
        rename = "type",
        default,
        serialize_with = "proto_enum::serialize_name",
        deserialize_with = "proto_enum::deserialize"
    )]
    pub admin_type: AdminType,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, alias = "deleted_at", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl Admin {
    pub fn is_super_admin(&self) -> bool {
        self.admin_type == AdminType::SuperAdmin
    }
}

/// Body of `POST /admin/admins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub subject: String,
    /// Name of the provisioner the admin authenticates through.
    pub provisioner: String,
    #[serde(
        rename = "type",
        default,
        serialize_with = "proto_enum::serialize_number",
        deserialize_with = "proto_enum::deserialize"
    )]
    pub admin_type: AdminType,
}

impl CreateAdminRequest {
    pub fn new(
        subject: impl Into<String>,
        provisioner: impl Into<String>,
        admin_type: AdminType,
    ) -> Self {
        Self {
            subject: subject.into(),
            provisioner: provisioner.into(),
            admin_type,
        }
    }
}

/// Body of `PATCH /admin/admins/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    #[serde(
        rename = "type",
        default,
        serialize_with = "proto_enum::serialize_number",
        deserialize_with = "proto_enum::deserialize"
    )]
    pub admin_type: AdminType,
}

impl UpdateAdminRequest {
    pub fn new(admin_type: AdminType) -> Self {
        Self { admin_type }
    }
}
