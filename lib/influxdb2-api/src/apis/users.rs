//! `/users`, `/me` and `/flags`.

use std::collections::HashMap;

use super::ZAP_TRACE_SPAN;
use crate::models::{PasswordResetBody, User, UserResponse, Users};
use crate::{
    ApiConfig, ApiRequest, Method, NoContent, PathTemplate, RequestDescriptor, Result, Structured,
};

const USER: PathTemplate = PathTemplate::new("/users/{userID}");
const USER_PASSWORD: PathTemplate = PathTemplate::new("/users/{userID}/password");

/// Optional filters of `GET /users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersQuery {
    offset: Option<u32>,
    limit: Option<u32>,
    after: Option<String>,
    name: Option<String>,
    id: Option<String>,
}

impl UsersQuery {
    /// Number of users to skip.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Page size, 1 to 100.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resource ID to seek from. Excludes that ID from the results.
    #[must_use]
    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.after = Some(id.into());
        self
    }

    /// Only the user with this name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only the user with this ID.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// User endpoints.
#[derive(Debug, Clone)]
pub struct UsersApi {
    config: ApiConfig,
}

impl UsersApi {
    /// Create the group over a configuration.
    #[must_use]
    pub const fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn user_url(&self, user_id: &str) -> String {
        self.config.api_url(&USER.expand([("userID", user_id)]))
    }

    /// `DELETE /users/{userID}`.
    pub fn delete_users_id_request(
        &self,
        user_id: &str,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let descriptor = RequestDescriptor::builder(Method::Delete, self.user_url(user_id))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn delete_users_id(&self, user_id: &str, zap_trace_span: Option<&str>) -> Result<()> {
        self.delete_users_id_request(user_id, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }

    /// `GET /flags`.
    pub fn get_flags_request(
        &self,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<HashMap<String, String>>> {
        let descriptor = RequestDescriptor::builder(Method::Get, self.config.api_url("/flags"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// Feature flags of the current user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_flags(&self, zap_trace_span: Option<&str>) -> Result<HashMap<String, String>> {
        self.get_flags_request(zap_trace_span).send_value().await
    }

    /// `GET /me`.
    pub fn get_me_request(
        &self,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<UserResponse>> {
        let descriptor = RequestDescriptor::builder(Method::Get, self.config.api_url("/me"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// The current user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_me(&self, zap_trace_span: Option<&str>) -> Result<UserResponse> {
        self.get_me_request(zap_trace_span).send_value().await
    }

    /// `GET /users`.
    pub fn get_users_request(
        &self,
        query: UsersQuery,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<Users>> {
        let descriptor = RequestDescriptor::builder(Method::Get, self.config.api_url("/users"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .query_opt("offset", query.offset)
            .query_opt("limit", query.limit)
            .query_opt("after", query.after)
            .query_opt("name", query.name)
            .query_opt("id", query.id)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// List users.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_users(
        &self,
        query: UsersQuery,
        zap_trace_span: Option<&str>,
    ) -> Result<Users> {
        self.get_users_request(query, zap_trace_span)
            .send_value()
            .await
    }

    /// `GET /users/{userID}`.
    pub fn get_users_id_request(
        &self,
        user_id: &str,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<UserResponse>> {
        let descriptor = RequestDescriptor::builder(Method::Get, self.user_url(user_id))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// Retrieve a user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_users_id(
        &self,
        user_id: &str,
        zap_trace_span: Option<&str>,
    ) -> Result<UserResponse> {
        self.get_users_id_request(user_id, zap_trace_span)
            .send_value()
            .await
    }

    /// `PATCH /users/{userID}`.
    pub fn patch_users_id_request(
        &self,
        user_id: &str,
        user: &User,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<UserResponse>> {
        let descriptor = RequestDescriptor::builder(Method::Patch, self.user_url(user_id))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(user)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Update a user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn patch_users_id(
        &self,
        user_id: &str,
        user: &User,
        zap_trace_span: Option<&str>,
    ) -> Result<UserResponse> {
        self.patch_users_id_request(user_id, user, zap_trace_span)
            .send_value()
            .await
    }

    /// `POST /users`.
    pub fn post_users_request(
        &self,
        user: &User,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<UserResponse>> {
        let descriptor = RequestDescriptor::builder(Method::Post, self.config.api_url("/users"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(user)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn post_users(
        &self,
        user: &User,
        zap_trace_span: Option<&str>,
    ) -> Result<UserResponse> {
        self.post_users_request(user, zap_trace_span)
            .send_value()
            .await
    }

    /// `POST /users/{userID}/password`.
    pub fn post_users_id_password_request(
        &self,
        user_id: &str,
        body: &PasswordResetBody,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let url = self
            .config
            .api_url(&USER_PASSWORD.expand([("userID", user_id)]));
        let descriptor = RequestDescriptor::builder(Method::Post, url)
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(body)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Set a user's password.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn post_users_id_password(
        &self,
        user_id: &str,
        body: &PasswordResetBody,
        zap_trace_span: Option<&str>,
    ) -> Result<()> {
        self.post_users_id_password_request(user_id, body, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }

    /// `PUT /me/password`.
    pub fn put_me_password_request(
        &self,
        body: &PasswordResetBody,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<NoContent> {
        let descriptor =
            RequestDescriptor::builder(Method::Put, self.config.api_url("/me/password"))
                .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
                .json(body)
                .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Set the current user's password.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn put_me_password(
        &self,
        body: &PasswordResetBody,
        zap_trace_span: Option<&str>,
    ) -> Result<()> {
        self.put_me_password_request(body, zap_trace_span)
            .send()
            .await
            .map(|_| ())
    }
}
