//! Timer-driven refresh of the published map.
//!
//! A single task calls [`Pipeline::run_cycle`] on a fixed period and swaps
//! the result into [`LatestMap`]. Cycles never overlap: a slow cycle pushes
//! the next tick back instead of queueing another one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::map::{MapConfig, MapDocument};
use crate::pipeline::{Pipeline, TransitSource};

/// Thread-safe holder of the most recent map document.
#[derive(Clone)]
pub struct LatestMap {
    inner: Arc<RwLock<Arc<MapDocument>>>,
}

impl LatestMap {
    /// Start with a "waiting for the first refresh" placeholder.
    pub fn pending(config: &MapConfig) -> Self {
        Self::new(MapDocument::pending(config))
    }

    pub fn new(document: MapDocument) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(document))),
        }
    }

    /// The current document.
    pub async fn get(&self) -> Arc<MapDocument> {
        self.inner.read().await.clone()
    }

    /// Replace the current document.
    pub async fn publish(&self, document: MapDocument) {
        *self.inner.write().await = Arc::new(document);
    }
}

/// Run one cycle and publish its document.
pub async fn refresh_once<S: TransitSource + Sync>(pipeline: &Pipeline<S>, latest: &LatestMap) {
    let document = pipeline.run_cycle().await;
    debug!(
        markers = document.marker_count(),
        failed = document.is_error(),
        "publishing map document"
    );
    latest.publish(document).await;
}

/// Spawn the refresh task. The first cycle runs immediately.
pub fn spawn_refresh_loop<S>(
    pipeline: Arc<Pipeline<S>>,
    latest: LatestMap,
    period: Duration,
) -> JoinHandle<()>
where
    S: TransitSource + Send + Sync + 'static,
{
    info!(period_secs = period.as_secs(), "starting map refresh loop");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            refresh_once(&pipeline, &latest).await;
        }
    })
}
