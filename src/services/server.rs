use anyhow::Result;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::api::BrawlStarsClient;
use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::{AppConfig, Emotes};
use crate::database;
use crate::services::community::CommunityService;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::open_database(&self.config.storage.database_path)?;
        let emotes = Emotes::load(&self.config.storage.emotes_path)?;

        let source = match BrawlStarsClient::new(&self.config.api) {
            Ok(client) => Some(Mutex::new(client)),
            Err(e) => {
                warn!("Adding players is disabled: {e:#}");
                None
            }
        };

        let state = Arc::new(AppState {
            communities: CommunityService::new(pool, self.config.stats.clone()),
            config: self.config.clone(),
            emotes,
            source,
        });

        let app = create_router(state).layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
