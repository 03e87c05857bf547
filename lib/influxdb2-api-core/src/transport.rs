//! The seam between the request pipeline and the network.

use bytes::Bytes;
pub use futures_core::future::BoxFuture;

use crate::{RawResponse, Request};

/// Sends one wire request and reports whatever came back.
///
/// Implementations never fail the future: failures are reported inside the
/// [`RawResponse`]. Each call is one network attempt; retrying is the
/// caller's business.
pub trait Transport: Send + Sync + 'static {
    /// Send a request.
    fn send(&self, request: Request<Bytes>) -> BoxFuture<'static, RawResponse>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: Request<Bytes>) -> BoxFuture<'static, RawResponse> {
        (**self).send(request)
    }
}
