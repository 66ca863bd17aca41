mod cors;
mod health;

use std::net::SocketAddr;

use axum::{Router, extract::DefaultBodyLimit};
use picto_config::Config;
use picto_store::SqliteImageStore;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    store: SqliteImageStore,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be built or the image
    /// store cannot be opened
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let imagegen_state = picto_imagegen::build_server(&config)?;
        let bgremove_state = picto_bgremove::build_server(&config)?;
        let (upload_state, store) = picto_store::build_server(&config).await?;

        if imagegen_state.provider_name().is_none() && bgremove_state.provider_name().is_none() {
            tracing::warn!("no image provider configured; only uploads are available");
        }

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(picto_imagegen::endpoint_router().with_state(imagegen_state));
        app = app.merge(picto_bgremove::endpoint_router().with_state(bgremove_state));
        app = app.merge(picto_store::endpoint_router().with_state(upload_state));

        // Applies to multipart uploads as well as JSON bodies
        app = app.layer(DefaultBodyLimit::max(config.server.body_limit));

        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
            store,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered, then closes the
    /// image store.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        self.store.close().await;

        Ok(())
    }
}
