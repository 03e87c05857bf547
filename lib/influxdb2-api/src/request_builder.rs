//! Request builder: runs one API call from descriptor to completion.
//!
//! An [`ApiRequest`] is typed by the [`Shape`] of its successful result. It
//! encodes the descriptor, sends it through the configured transport,
//! consults the retry hook after each attempt and finally classifies the
//! outcome with [`process_response`].
//!
//! The result is delivered exactly once, either to a completion closure run
//! on a tokio runtime ([`ApiRequest::execute`]) or by awaiting
//! [`ApiRequest::send`].

use std::future::Future;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use bytes::Bytes;
use influxdb2_api_core::{
    BoxFuture, Cause, FormPartContentType, ParameterEncoder, ResponseContext, ResultShape,
    Structured, process_response,
};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::retry::{RetryDecision, RetryHook};
use crate::{
    ApiConfig, Envelope, Error, RawResponse, RequestDescriptor, Result, Shape, TransportError,
};

/// Live counters of a running request.
///
/// Handed to the [`ApiRequest::on_progress`] callback when the request
/// starts; clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct Progress(Arc<ProgressState>);

#[derive(Debug, Default)]
struct ProgressState {
    attempts: AtomicU32,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    finished: AtomicBool,
}

impl Progress {
    /// Number of transport calls started.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.0.attempts.load(Ordering::Acquire)
    }

    /// Request body bytes handed to the transport, over all attempts.
    #[must_use]
    pub fn bytes_sent(&self) -> u64 {
        self.0.bytes_sent.load(Ordering::Acquire)
    }

    /// Response body bytes received, over all attempts.
    #[must_use]
    pub fn bytes_received(&self) -> u64 {
        self.0.bytes_received.load(Ordering::Acquire)
    }

    /// Returns `true` once the result is known.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.0.finished.load(Ordering::Acquire)
    }

    fn record_attempt(&self, body: Option<&Bytes>) {
        self.0.attempts.fetch_add(1, Ordering::AcqRel);
        self.0
            .bytes_sent
            .fetch_add(body.map_or(0, |b| b.len() as u64), Ordering::AcqRel);
    }

    fn record_response(&self, data: Option<&Bytes>) {
        self.0
            .bytes_received
            .fetch_add(data.map_or(0, |b| b.len() as u64), Ordering::AcqRel);
    }

    fn finish(&self) {
        self.0.finished.store(true, Ordering::Release);
    }
}

type ProgressCallback = Box<dyn FnOnce(Progress) + Send>;

/// One API call, ready to run.
///
/// ```ignore
/// use influxdb2_api::prelude::*;
///
/// let users = InfluxDb2Api::new(config).users();
/// let me = users
///     .get_me_request(None)
///     .retry(RetryPolicy::new(2))
///     .send_value()
///     .await?;
/// ```
#[must_use = "requests do nothing until executed or sent"]
pub struct ApiRequest<S: Shape> {
    config: ApiConfig,
    descriptor: Result<RequestDescriptor>,
    retry: Option<Arc<dyn RetryHook>>,
    on_progress: Option<ProgressCallback>,
    content_type_for_form_part: Option<Arc<FormPartContentType>>,
    cancel: Option<BoxFuture<'static, ()>>,
    _shape: PhantomData<fn() -> S>,
}

impl<S: Shape> std::fmt::Debug for ApiRequest<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("shape", &S::KIND)
            .field("descriptor", &self.descriptor)
            .field("retry", &self.retry.is_some())
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Shape> ApiRequest<S> {
    /// Create a request from a descriptor.
    pub fn new(config: ApiConfig, descriptor: RequestDescriptor) -> Self {
        Self::try_new(config, Ok(descriptor))
    }

    /// Create a request whose descriptor may have failed to build.
    ///
    /// A failed descriptor is reported through the normal completion path.
    pub fn try_new(config: ApiConfig, descriptor: Result<RequestDescriptor>) -> Self {
        Self {
            config,
            descriptor,
            retry: None,
            on_progress: None,
            content_type_for_form_part: None,
            cancel: None,
            _shape: PhantomData,
        }
    }

    /// Shape tag of the successful result.
    #[must_use]
    pub const fn shape(&self) -> ResultShape {
        S::KIND
    }

    /// The descriptor, unless building it failed.
    #[must_use]
    pub fn descriptor(&self) -> Option<&RequestDescriptor> {
        self.descriptor.as_ref().ok()
    }

    /// Install a retry hook. Without one, every request is sent once.
    pub fn retry(mut self, hook: impl RetryHook) -> Self {
        self.retry = Some(Arc::new(hook));
        self
    }

    /// Receive a [`Progress`] handle when the request starts.
    pub fn on_progress(mut self, callback: impl FnOnce(Progress) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Override the content type of multipart file parts.
    ///
    /// Returning `None` falls back to the extension lookup.
    pub fn content_type_for_form_part(
        mut self,
        hook: impl Fn(&Path) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.content_type_for_form_part = Some(Arc::new(hook));
        self
    }

    /// Cancel the request when `signal` completes.
    ///
    /// Cancellation during a transport call or a retry delay completes the
    /// request with a transport-level [`TransportError::Cancelled`] error.
    pub fn cancel_on(mut self, signal: impl Future<Output = ()> + Send + 'static) -> Self {
        self.cancel = Some(Box::pin(signal));
        self
    }

    /// Run the request on a runtime and hand the result to `completion`.
    ///
    /// The request runs on `dispatch`, or on the configured runtime when
    /// `None`. `completion` is called exactly once, from the spawned task,
    /// never from this call. It is dropped without being called only if the
    /// runtime shuts down first.
    pub fn execute<F>(self, dispatch: Option<&Handle>, completion: F)
    where
        F: FnOnce(Result<Envelope<S::Output>>) + Send + 'static,
    {
        let handle = dispatch.unwrap_or_else(|| self.config.dispatch()).clone();
        handle.spawn(async move { completion(self.run().await) });
    }

    /// Run the request and await its result.
    ///
    /// # Errors
    ///
    /// Returns the request's [`Error`]; a runtime shut down before
    /// completion is reported as [`TransportError::Cancelled`].
    pub async fn send(self) -> Result<Envelope<S::Output>> {
        let (tx, rx) = oneshot::channel();
        self.execute(None, move |result| {
            let _ = tx.send(result);
        });
        rx.await
            .unwrap_or_else(|_| Err(Error::transport(TransportError::Cancelled)))
    }

    /// Run the request and return only the body.
    ///
    /// # Errors
    ///
    /// See [`ApiRequest::send`].
    pub async fn send_body(self) -> Result<Option<S::Output>> {
        self.send().await.map(Envelope::into_body)
    }

    async fn run(self) -> Result<Envelope<S::Output>> {
        let progress = Progress::default();
        if let Some(callback) = self.on_progress {
            callback(progress.clone());
        }

        let result = match self.descriptor {
            Ok(descriptor) => {
                let attempts = Attempts {
                    config: &self.config,
                    descriptor: &descriptor,
                    retry: self.retry.as_deref(),
                    content_type_for_form_part: self.content_type_for_form_part.as_deref(),
                    progress: &progress,
                };
                attempts.run::<S>(self.cancel).await
            }
            Err(err) => Err(err),
        };
        progress.finish();

        match &result {
            Ok(envelope) => debug!(status = envelope.status(), "request completed"),
            Err(err) => debug!(code = err.code(), error = %err, "request failed"),
        }
        result
    }
}

impl<T> ApiRequest<Structured<T>>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    /// Run the request and return the decoded body.
    ///
    /// # Errors
    ///
    /// See [`ApiRequest::send`].
    pub async fn send_value(self) -> Result<T> {
        let (head, body) = self.send().await?.split();
        body.ok_or_else(|| {
            Error::new(i32::from(head.status()), Cause::EmptyData).with_headers(head.into_parts().1)
        })
    }
}

/// Borrowed state of the attempt loop.
struct Attempts<'a> {
    config: &'a ApiConfig,
    descriptor: &'a RequestDescriptor,
    retry: Option<&'a dyn RetryHook>,
    content_type_for_form_part: Option<&'a FormPartContentType>,
    progress: &'a Progress,
}

impl Attempts<'_> {
    async fn run<S: Shape>(
        &self,
        cancel: Option<BoxFuture<'static, ()>>,
    ) -> Result<Envelope<S::Output>> {
        let mut cancel = cancel.unwrap_or_else(|| Box::pin(std::future::pending()));
        let mut encoder = ParameterEncoder::new(self.config.headers());
        if let Some(hook) = self.content_type_for_form_part {
            encoder = encoder.with_form_part_content_type(hook);
        }

        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            let request = encoder.encode(self.descriptor)?;
            let url = request.url().clone();

            self.progress.record_attempt(request.body());
            debug!(
                method = %self.descriptor.method(),
                %url,
                attempt,
                strategy = ?self.descriptor.strategy(),
                "sending request"
            );

            let raw = tokio::select! {
                raw = self.config.transport().send(request) => raw,
                () = &mut cancel => RawResponse::failed(TransportError::Cancelled),
            };
            self.progress.record_response(raw.data());

            let decision = match (self.retry, raw.error()) {
                (_, Some(TransportError::Cancelled)) | (None, _) => RetryDecision::Stop,
                (Some(hook), _) => hook.decide(attempt, &raw),
            };

            if let RetryDecision::Retry(delay) = decision {
                let (status, error) = (raw.status(), raw.error());
                warn!(attempt, ?delay, ?status, ?error, "retrying request");
                tokio::select! {
                    () = tokio::time::sleep(delay) => continue,
                    () = &mut cancel => return Err(Error::transport(TransportError::Cancelled)),
                }
            }

            let ctx = ResponseContext {
                url: &url,
                download_dir: self.config.download_dir(),
            };
            return process_response::<S>(raw, &ctx);
        }
    }
}
