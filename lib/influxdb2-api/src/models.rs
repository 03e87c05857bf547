//! Request and response bodies of the user, secret and setup endpoints.
//!
//! Field names follow the server's JSON (`orgID`, `userID`, `oauthID` keep
//! their capitalization). Optional fields are omitted when serializing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Label attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning organization ID.
    #[serde(rename = "orgID", skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Label name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key/value pairs associated with this label. Keys are removed by
    /// sending an update with an empty value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, String>>,
}

/// Whether a user account may log in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Enabled account.
    #[default]
    Active,
    /// Disabled account.
    Inactive,
}

/// A user, as sent when creating or updating one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ID of the user in an external OAuth provider.
    #[serde(rename = "oauthID", skip_serializing_if = "Option::is_none")]
    pub oauth_id: Option<String>,
    /// User name.
    pub name: String,
    /// Account status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl User {
    /// A new user with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Links of a [`UserResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponseLinks {
    /// URL of this user.
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_: Option<String>,
}

/// A user, as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ID of the user in an external OAuth provider.
    #[serde(rename = "oauthID", skip_serializing_if = "Option::is_none")]
    pub oauth_id: Option<String>,
    /// User name.
    pub name: String,
    /// Account status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Related URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<UserResponseLinks>,
}

/// Pagination links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// This page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// A page of users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Users {
    /// Pagination links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Users of this page.
    #[serde(default)]
    pub users: Vec<UserResponse>,
}

/// New password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetBody {
    /// The password.
    pub password: String,
}

/// Secret keys of an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeys {
    /// Secret keys.
    #[serde(default)]
    pub secrets: Vec<String>,
}

/// Links of a [`SecretKeysResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeysResponseLinks {
    /// URL of the secrets.
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_: Option<String>,
    /// URL of the organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

/// Secret keys of an organization, with links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeysResponse {
    /// Secret keys.
    #[serde(default)]
    pub secrets: Vec<String>,
    /// Related URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<SecretKeysResponseLinks>,
}

/// Whether initial setup is still allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsOnboarding {
    /// `true` when the instance has not been set up yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
}

/// Initial user, organization and bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    /// Name of the first user.
    pub username: String,
    /// Password of the first user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Name of the first organization.
    pub org: String,
    /// Name of the first bucket.
    pub bucket: String,
    /// Retention of the first bucket, in seconds. `0` keeps data forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_period_seconds: Option<i64>,
    /// Operator token to create instead of a generated one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// An organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Organization name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Retention rule of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRule {
    /// Rule type, `expire`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Seconds to keep data. `0` is infinite.
    pub every_seconds: i64,
    /// Shard group duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_group_duration_seconds: Option<i64>,
}

/// A bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Bucket ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `user` or `system`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Bucket name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning organization ID.
    #[serde(rename = "orgID", skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Retention policy name (1.x compatibility).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rp: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Retention rules.
    #[serde(default)]
    pub retention_rules: Vec<RetentionRule>,
    /// Labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

/// An API token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// Token ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `active` or `inactive`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Organization ID the token is scoped to.
    #[serde(rename = "orgID", skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Token value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// ID of the owning user.
    #[serde(rename = "userID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Name of the owning user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Name of the organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update time (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Resources created by the initial setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingResponse {
    /// First user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    /// First organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<Organization>,
    /// First bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    /// Operator token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Authorization>,
}
