#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod model;
mod store;
mod upload;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{Result, StoreError};
pub use model::ImageRecord;
pub use store::{ImageStore, memory::MemoryImageStore, sqlite::SqliteImageStore};
pub use upload::{ExtractUpload, Server, UploadedFile};

/// Open the configured database and build the upload server on top of it
///
/// Returns the concrete `SQLite` store alongside the server so callers can
/// close the pool on shutdown.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated
pub async fn build_server(
    config: &picto_config::Config,
) -> anyhow::Result<(Arc<Server>, SqliteImageStore)> {
    let store = SqliteImageStore::connect(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize image store: {e}"))?;

    let server = Arc::new(Server::new(
        Arc::new(store.clone()),
        config.storage.placeholder_url.clone(),
    ));

    Ok((server, store))
}

/// Create the endpoint router for uploads
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/images/upload", post(upload))
}

/// Handle image uploads
async fn upload(State(server): State<Arc<Server>>, ExtractUpload(file): ExtractUpload) -> Result<Json<ImageRecord>> {
    tracing::debug!(filename = %file.filename, "image upload handler called");

    let record = server.upload(file).await?;

    Ok(Json(record))
}
