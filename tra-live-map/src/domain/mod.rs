//! Domain logic for the live train map.
//!
//! Turns the raw TDX records into flat, join-ready values. Everything in
//! here is pure: no I/O, no shared state.

mod join;
mod location;

pub use join::{JoinedRecord, join};
pub use location::{
    DEFAULT_NAME_LOCALE, coordinate, is_latitude, is_longitude, latitude, localized_name,
    longitude,
};
