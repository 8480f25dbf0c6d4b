use std::sync::Arc;

use crate::config::ServerConfig;
use crate::resolver::CatalogResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<CatalogResolver>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let resolver = CatalogResolver::new(config.upstream.clone())?;
        Ok(Self {
            resolver: Arc::new(resolver),
        })
    }
}
