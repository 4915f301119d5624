//! One transport and one logger shared by all managers.
//!
//! # Design
//! `ContentClient` holds no per-call state. Each accessor hands out a fresh
//! manager over the shared transport, so managers are cheap to create and
//! never need to be stored by the caller.

use std::sync::Arc;

use crate::analytics::AnalyticsManager;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::homepage::HomepageManager;
use crate::logger::{self, SharedLogger};
use crate::moodboard::MoodboardManager;
use crate::transport::{Transport, UreqTransport};

pub struct ContentClient<T> {
    transport: Arc<T>,
    logger: SharedLogger,
}

impl ContentClient<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }

    /// Build from `RUNWAY_API_URL` / `RUNWAY_API_TIMEOUT_SECS`.
    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::from_config(&ClientConfig::from_env()?))
    }
}

impl<T: Transport> ContentClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            logger: logger::null(),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn analytics(&self) -> AnalyticsManager<Arc<T>> {
        AnalyticsManager::new(Arc::clone(&self.transport)).with_logger(Arc::clone(&self.logger))
    }

    pub fn homepages(&self) -> HomepageManager<Arc<T>> {
        HomepageManager::new(Arc::clone(&self.transport)).with_logger(Arc::clone(&self.logger))
    }

    pub fn moodboards(&self) -> MoodboardManager<Arc<T>> {
        MoodboardManager::new(Arc::clone(&self.transport)).with_logger(Arc::clone(&self.logger))
    }
}
