use std::sync::Arc;

use crate::{config::Config, core::store::AnyStore};

#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub store: Option<Arc<AnyStore>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: None,
        }
    }
}
