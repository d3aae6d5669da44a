use crate::config::GeocoderSettings;
use crate::core::{GeoLocation, Geocoder};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Google Maps Geocoding API client.
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    place_id: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, settings: &GeocoderSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.into(),
            region: settings.region.clone(),
        })
    }

    fn request_url(&self, query: &str) -> Result<Url> {
        let mut params = vec![("address", query), ("key", self.api_key.as_str())];
        if let Some(region) = &self.region {
            params.push(("region", region.as_str()));
        }

        Url::parse_with_params(&self.endpoint, &params).map_err(|e| {
            EtlError::InvalidConfigValueError {
                field: "geocoder.endpoint".to_string(),
                value: self.endpoint.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeoLocation> {
        let url = self.request_url(query)?;

        tracing::debug!("📡 Geocoding request for: {}", query);
        // Request URLs carry the API key, so they are stripped from transport errors.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url())?;
        let body: GeocodeResponse = response.json().await.map_err(|e| e.without_url())?;

        if body.status != "OK" {
            let message = match body.error_message {
                Some(detail) => format!("status {}: {}", body.status, detail),
                None => format!("status {}", body.status),
            };
            return Err(EtlError::GeocodingError {
                query: query.to_string(),
                message,
            });
        }

        let candidate = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| EtlError::GeocodingError {
                query: query.to_string(),
                message: "no results".to_string(),
            })?;

        Ok(GeoLocation {
            place_id: candidate.place_id,
            lat: candidate.geometry.location.lat,
            lng: candidate.geometry.location.lng,
        })
    }
}
