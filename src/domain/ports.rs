use crate::domain::model::{Facility, GeocodeResult, Record, TransformResult};
use crate::utils::error::Result;
use crate::utils::logger::GEOCODING_TARGET;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn pretty_output(&self) -> bool;
}

/// Best-match location for a free-text address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub place_id: String,
    pub lat: f64,
    pub lng: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Single lookup, first candidate only.
    async fn geocode(&self, query: &str) -> Result<GeoLocation>;

    /// Never fails: any lookup error is logged and yields an all-null result.
    async fn resolve(
        &self,
        address: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
        zip: Option<&str>,
    ) -> GeocodeResult {
        let query = format!(
            "{}, {}, {} {}",
            address.unwrap_or_default(),
            city.unwrap_or_default(),
            state.unwrap_or_default(),
            zip.unwrap_or_default()
        );

        match self.geocode(&query).await {
            Ok(location) => {
                tracing::debug!("📍 Geocoded '{}' -> {}", query, location.place_id);
                GeocodeResult {
                    place_id: Some(location.place_id),
                    lat: Some(location.lat),
                    lng: Some(location.lng),
                }
            }
            Err(e) => {
                tracing::warn!(target: GEOCODING_TARGET, "⚠️ Failed geocoding {}: {}", query, e);
                GeocodeResult::default()
            }
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, facilities: Vec<Facility>) -> Result<String>;
}
