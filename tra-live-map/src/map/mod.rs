//! Map rendering.
//!
//! Projects joined records into Leaflet markers, clustered with
//! Leaflet.markercluster, and serializes everything into one self-contained
//! HTML document per refresh cycle.

mod config;
mod error;
mod render;
pub mod templates;

pub use config::MapConfig;
pub use error::RenderError;
pub use render::{DelayStatus, MapDocument, MarkerView, render, render_error};
