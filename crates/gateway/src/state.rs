use std::{sync::Arc, time::Instant};

use crate::services::GatewayServices;

/// Shared, immutable gateway state handed to every handler.
pub struct GatewayState {
    pub version: String,
    pub services: GatewayServices,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(services: GatewayServices) -> Arc<Self> {
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            services,
            started_at: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
