use std::sync::Arc;

use tokio::sync::Mutex;

use crate::feed::transport::{FeedTransport, WsTransport};
use crate::feed::FeedController;
use crate::models::feed::FeedStats;
use crate::render_engine::RenderEngine;
use crate::settings::Settings;

/// Wires one feed controller into the render engine.
pub struct FeedManager {
    inner: Arc<Mutex<Option<FeedController>>>,
}

impl Default for FeedManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the feed described by `settings`: live when a credential is
    /// configured, simulated otherwise.
    pub async fn start(&self, settings: &Settings, engine: RenderEngine) -> Result<(), String> {
        let transport = settings
            .endpoint_url()
            .map(|url| Arc::new(WsTransport::new(url)) as Arc<dyn FeedTransport>);
        self.start_with_transport(transport, engine).await
    }

    pub async fn start_with_transport(
        &self,
        transport: Option<Arc<dyn FeedTransport>>,
        engine: RenderEngine,
    ) -> Result<(), String> {
        let mut guard = self.inner.lock().await;
        if guard.is_some() {
            return Err("feed already running".into());
        }

        let mut controller = FeedController::new(transport, move |event| {
            engine.push_event(event);
        });
        controller.start();

        *guard = Some(controller);
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), String> {
        let mut guard = self.inner.lock().await;
        if let Some(mut controller) = guard.take() {
            controller.stop();
        }
        Ok(())
    }

    pub async fn stats(&self) -> Option<FeedStats> {
        let guard = self.inner.lock().await;
        guard.as_ref().map(|c| c.stats())
    }
}
