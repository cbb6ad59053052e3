//! Delivery-zone geofencing for marketplace catalogs.
//!
//! Turns free-text address searches into include/exclude delivery regions:
//! geocode the query, keep the dominant polygon ring, persist the region for
//! a catalog and compute where the map should look.

pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod services;
pub mod utils;

pub use error::RegionError;
