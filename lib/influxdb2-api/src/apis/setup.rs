//! `/setup`.

use super::ZAP_TRACE_SPAN;
use crate::models::{IsOnboarding, OnboardingRequest, OnboardingResponse};
use crate::{ApiConfig, ApiRequest, Method, RequestDescriptor, Result, Structured};

/// Initial setup endpoints.
#[derive(Debug, Clone)]
pub struct SetupApi {
    config: ApiConfig,
}

impl SetupApi {
    /// Create the group over a configuration.
    #[must_use]
    pub const fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// `GET /setup`.
    pub fn get_setup_request(
        &self,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<IsOnboarding>> {
        let descriptor = RequestDescriptor::builder(Method::Get, self.config.api_url("/setup"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .build();
        ApiRequest::new(self.config.clone(), descriptor)
    }

    /// Whether the instance still allows initial setup.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn get_setup(&self, zap_trace_span: Option<&str>) -> Result<IsOnboarding> {
        self.get_setup_request(zap_trace_span).send_value().await
    }

    /// `POST /setup`.
    pub fn post_setup_request(
        &self,
        request: &OnboardingRequest,
        zap_trace_span: Option<&str>,
    ) -> ApiRequest<Structured<OnboardingResponse>> {
        let descriptor = RequestDescriptor::builder(Method::Post, self.config.api_url("/setup"))
            .header_opt(ZAP_TRACE_SPAN, zap_trace_span)
            .json(request)
            .map(|b| b.build());
        ApiRequest::try_new(self.config.clone(), descriptor)
    }

    /// Create the first user, organization and bucket.
    ///
    /// # Errors
    ///
    /// Returns the request's error.
    pub async fn post_setup(
        &self,
        request: &OnboardingRequest,
        zap_trace_span: Option<&str>,
    ) -> Result<OnboardingResponse> {
        self.post_setup_request(request, zap_trace_span)
            .send_value()
            .await
    }
}
