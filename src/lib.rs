pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, GeocoderSettings, RunConfig};

pub use adapters::google::GoogleGeocoder;
pub use crate::core::{
    converter::RowConverter,
    etl::{EtlEngine, RunSummary},
    pipeline::FacilityPipeline,
};
pub use domain::model::{ConversionStats, DayHours, Facility, GeocodeResult, Record};
pub use utils::error::{EtlError, Result};
