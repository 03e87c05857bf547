//! `/orgs/{orgID}/secrets`.

use std::collections::HashMap;

use super::ZAP_TRACE_SPAN;
use crate::models::{SecretKeys, SecretKeysResponse};
use crate::{
    ApiConfig, ApiRequest, Method, NoContent, PathTemplate, RequestDescriptor, Result, Structured,
};

const SECRETS: PathTemplate = PathTemplate::new("/orgs/{orgID}/secrets");
const SECRET: PathTemplate = PathTemplate::new("/orgs/{orgID}/secrets/{secretID}");
const SECRETS_DELETE: PathTemplate = PathTemplate::new("/orgs/{orgID}/secrets/delete");

/// Organization secret endpoints.
#[derive(Debug, Clone)]
pub struct SecretsApi {
    config: ApiConfig,
}

impl SecretsApi {
    /// Create the group over a configuration.
    #[must_use]
    pub const fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// `DELETE /orgs/{orgID}/secrets/{secretID}`.
    pub fn delete_orgs_id_secrets_id_request(
        &self,
        org_id: &str,
        secret_id: &str,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let url = self
            .config
            .api_url(&SECRET.expand([("orgID", org_id), ("secretID", secret_id)]));
        let descriptor = RequestDescriptor::builder(Method::Delete, url)
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// Delete one secret of an organization.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn delete_orgs_id_secrets_id(
        &self,
        org_id: &str,
        secret_id: &str,
        zap_trace_span: Option<&str>,
    ) -> Result<()> {
        self.delete_orgs_id_secrets_id_request(org_id, secret_id, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }

    /// `GET /orgs/{orgID}/secrets`.
    pub fn get_orgs_id_secrets_request(
        &self,
        org_id: &str,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<SecretKeysResponse>> {
        let url = self.config.api_url(&SECRETS.expand([("orgID", org_id)]));
        let descriptor = RequestDescriptor::builder(Method::Get, url)
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// List the secret keys of an organization. Values are never returned.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_orgs_id_secrets(
        &self,
        org_id: &str,
        zap_trace_span: Option<&str>,
    ) -> Result<SecretKeysResponse> {
        self.get_orgs_id_secrets_request(org_id, zap_trace_span)
            .send_value()
            .await
    }

    /// `PATCH /orgs/{orgID}/secrets`.
    pub fn patch_orgs_id_secrets_request(
        &self,
        org_id: &str,
        secrets: &HashMap<String, String>,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let url = self.config.api_url(&SECRETS.expand([("orgID", org_id)]));
        let descriptor = RequestDescriptor::builder(Method::Patch, url)
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(secrets)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Add or update secrets of an organization.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn patch_orgs_id_secrets(
        &self,
        org_id: &str,
        secrets: &HashMap<String, String>,
        zap_trace_span: Option<&str>,
    ) -> Result<()> {
        self.patch_orgs_id_secrets_request(org_id, secrets, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }

    /// `POST /orgs/{orgID}/secrets/delete`.
    ///
    /// Deprecated on the server side in favor of
    /// [`SecretsApi::delete_orgs_id_secrets_id_request`].
    pub fn post_orgs_id_secrets_request(
        &self,
        org_id: &str,
        keys: &SecretKeys,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let url = self
            .config
            .api_url(&SECRETS_DELETE.expand([("orgID", org_id)]));
        let descriptor = RequestDescriptor::builder(Method::Post, url)
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(keys)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Delete several secrets of an organization.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn post_orgs_id_secrets(
        &self,
        org_id: &str,
        keys: &SecretKeys,
        zap_trace_span: Option<&str>,
    ) -> Result<()> {
        self.post_orgs_id_secrets_request(org_id, keys, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }
}
