//! One refresh cycle: fetch, join, render.
//!
//! [`Pipeline::run_cycle`] is the single entry point the refresh loop calls.
//! It always returns a displayable document: failures anywhere in the cycle
//! are collapsed into an error document here and nowhere else.

use std::future::Future;

use futures::future::try_join;
use tracing::{info, warn};

use crate::domain::{DEFAULT_NAME_LOCALE, join};
use crate::map::{MapConfig, MapDocument, RenderError, render, render_error};
use crate::tdx::{AuthError, FetchError, LiveTrainRecord, Resource, StationRecord};

/// Source of live train and station data.
///
/// This abstraction allows the pipeline to be tested with mock data.
pub trait TransitSource {
    /// Current live board entries.
    fn fetch_live_trains(
        &self,
    ) -> impl Future<Output = Result<Vec<LiveTrainRecord>, FetchError>> + Send;

    /// The station directory.
    fn fetch_stations(&self) -> impl Future<Output = Result<Vec<StationRecord>, FetchError>> + Send;
}

/// Anything that can go wrong during a cycle.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("authentication failed: {0}")]
    Auth(#[source] AuthError),

    #[error("{0}")]
    Fetch(#[source] FetchError),

    #[error("{0}")]
    Render(#[from] RenderError),
}

impl CycleError {
    /// The TDX resource whose fetch failed, if the failure was a fetch.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            CycleError::Fetch(e) => e.resource(),
            CycleError::Auth(_) | CycleError::Render(_) => None,
        }
    }
}

impl From<FetchError> for CycleError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Auth(auth) => CycleError::Auth(auth),
            other => CycleError::Fetch(other),
        }
    }
}

/// The fetch → join → render pipeline.
///
/// Holds no state between cycles; the only thing that survives a cycle is
/// the bearer token cached inside the source's credential manager.
pub struct Pipeline<S> {
    source: S,
    map: MapConfig,
    name_locales: Vec<String>,
}

impl<S: TransitSource + Sync> Pipeline<S> {
    pub fn new(source: S, map: MapConfig) -> Self {
        Self {
            source,
            map,
            name_locales: vec![DEFAULT_NAME_LOCALE.to_string()],
        }
    }

    /// Set the station name locales, most preferred first.
    pub fn with_name_locales(mut self, locales: Vec<String>) -> Self {
        if !locales.is_empty() {
            self.name_locales = locales;
        }
        self
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.map
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one cycle, reporting failures to the caller.
    ///
    /// Both fetches run concurrently; if either fails the cycle fails.
    pub async fn try_cycle(&self) -> Result<MapDocument, CycleError> {
        let (live, stations) = try_join(
            self.source.fetch_live_trains(),
            self.source.fetch_stations(),
        )
        .await?;

        let records = join(&live, &stations, self.name_locales.as_slice());
        let document = render(&records, &self.map)?;

        info!(
            trains = live.len(),
            stations = stations.len(),
            markers = document.marker_count(),
            "map refreshed"
        );

        Ok(document)
    }

    /// Run one cycle. Never fails: errors become an error document.
    pub async fn run_cycle(&self) -> MapDocument {
        match self.try_cycle().await {
            Ok(document) => document,
            Err(e) => {
                match e.resource() {
                    Some(resource) => warn!(error = %e, %resource, "map refresh failed"),
                    None => warn!(error = %e, "map refresh failed"),
                }
                render_error(&e.to_string(), &self.map)
            }
        }
    }
}
