//! Handler trait.

use async_trait::async_trait;
use vox_request::Event;
use vox_response::ResponseBuilder;

/// Produces a response for a routed event.
///
/// `None` means the handler produced no response builder, which the
/// pipeline rejects as an invalid response.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle `event`.
    async fn handle(&self, event: &Event) -> Option<ResponseBuilder>;
}

/// [`RequestHandler`] wrapping a synchronous closure.
pub struct FnHandler<F>(F);

/// Wrap a closure as a [`RequestHandler`].
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Event) -> Option<ResponseBuilder> + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<F> RequestHandler for FnHandler<F>
where
    F: Fn(&Event) -> Option<ResponseBuilder> + Send + Sync,
{
    async fn handle(&self, event: &Event) -> Option<ResponseBuilder> {
        (self.0)(event)
    }
}
