#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

pub use error::{ImageGenError, Result};
pub use provider::ImageGenProvider;
pub use server::{ImageGenServerBuilder, Server};
pub use types::{GenerateRequest, GenerateResponse};

/// Build the text-to-image server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &picto_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ImageGenServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize image generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/images/generate", post(generate))
}

/// A body that is not JSON carries no prompt; malformed JSON keeps axum's detail
fn payload_error(rejection: &JsonRejection) -> ImageGenError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ImageGenError::Validation("Prompt is required".to_string()),
        other => ImageGenError::Validation(other.body_text()),
    }
}

/// Handle image generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|e| payload_error(&e))?;
    let prompt = request.prompt.unwrap_or_default();

    tracing::debug!(prompt_len = prompt.len(), "image generation handler called");

    let image = server.generate(&prompt).await?;

    tracing::debug!("Image generation complete");

    Ok(Json(GenerateResponse { url: image.to_src() }))
}
