//! The seam between the dispatcher and a provider.

use crate::{GenerationRequest, RawResponse, Result};
use std::sync::Arc;

/// Sends one request to the provider described by `request.config`.
///
/// Implementations perform exactly one network round trip per call;
/// retries, timeouts and fallback belong to the dispatcher. The HTTP
/// implementation lives in `learnkit-model`; tests swap in fakes.
pub trait Transport: Send + Sync {
    /// Send the request and return the raw reply.
    fn send(&self, request: &GenerationRequest)
    -> impl Future<Output = Result<RawResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<RawResponse>> + Send {
        (**self).send(request)
    }
}
