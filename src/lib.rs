pub mod charts;
pub mod clients;
pub mod config;
pub mod helpers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use clients::MetricsClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<MetricsClient>,
    pub config: Arc<config::Config>,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let client = Arc::new(MetricsClient::new(config.backend.base_url.clone()));
        Self {
            client,
            config: Arc::new(config),
        }
    }
}
