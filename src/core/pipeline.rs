use crate::core::converter::RowConverter;
use crate::core::{ConfigProvider, Facility, Geocoder, Pipeline, Record, Storage, TransformResult};
use crate::utils::error::Result;

/// Parses CSV bytes into header-keyed records.
///
/// Invalid UTF-8 sequences are replaced instead of failing the row. Rows whose
/// field count differs from the header are rejected by the reader.
pub fn parse_csv(data: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();

    let mut records = Vec::new();
    for result in reader.byte_records() {
        let row = result?;
        let data = headers
            .iter()
            .cloned()
            .zip(row.iter().map(|v| String::from_utf8_lossy(v).into_owned()))
            .collect();
        records.push(Record { data });
    }

    Ok(records)
}

pub struct FacilityPipeline<S: Storage, C: ConfigProvider, G: Geocoder> {
    storage: S,
    config: C,
    geocoder: G,
}

impl<S: Storage, C: ConfigProvider, G: Geocoder> FacilityPipeline<S, C, G> {
    pub fn new(storage: S, config: C, geocoder: G) -> Self {
        Self {
            storage,
            config,
            geocoder,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: Geocoder> Pipeline for FacilityPipeline<S, C, G> {
    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading facilities from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        parse_csv(&data)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        let mut converter = RowConverter::new(&self.geocoder);
        let mut facilities = Vec::new();

        // One row at a time; each geocoding call completes before the next row starts.
        for (index, record) in data.iter().enumerate() {
            tracing::debug!("Converting row {}/{}", index + 1, data.len());
            if let Some(facility) = converter.convert(record).await? {
                facilities.push(facility);
            }
        }

        Ok(TransformResult {
            facilities,
            stats: converter.into_stats(),
        })
    }

    async fn load(&self, facilities: Vec<Facility>) -> Result<String> {
        let output_path = self.config.output_path().to_string();

        let json = if self.config.pretty_output() {
            serde_json::to_vec_pretty(&facilities)?
        } else {
            serde_json::to_vec(&facilities)?
        };

        tracing::debug!("Writing {} bytes to {}", json.len(), output_path);
        self.storage.write_file(&output_path, &json).await?;

        Ok(output_path)
    }
}
