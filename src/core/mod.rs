pub mod converter;
pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Facility, Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, GeoLocation, Geocoder, Pipeline, Storage};
pub use crate::utils::error::Result;
