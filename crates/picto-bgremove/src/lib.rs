#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;
mod request;
mod server;
mod types;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use picto_core::ImageRef;

pub use error::{BgRemoveError, Result};
pub use provider::BackgroundRemover;
pub use request::ExtractRemoval;
pub use server::{BgRemoveServerBuilder, Server};
pub use types::{BackgroundColor, InvalidColor, RemovalRequest};

/// Build the background-removal server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &picto_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        BgRemoveServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize background removal server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for background removal
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/images/remove-background", post(remove_background))
}

/// Handle background removal requests
///
/// Inline results are streamed back with the provider's content type; a
/// provider that hands out a URL gets the client redirected there.
async fn remove_background(
    State(server): State<Arc<Server>>,
    ExtractRemoval(request): ExtractRemoval,
) -> Result<Response> {
    tracing::debug!(
        filename = %request.filename,
        bytes = request.image.len(),
        "background removal handler called"
    );

    let image = server.remove_background(request).await?;

    tracing::debug!("Background removal complete");

    Ok(match image {
        ImageRef::Inline { content_type, data } => {
            ([(http::header::CONTENT_TYPE, content_type)], data).into_response()
        }
        ImageRef::Url(url) => Redirect::to(&url).into_response(),
    })
}
