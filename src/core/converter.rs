use crate::core::{Facility, Geocoder, Record};
use crate::domain::model::{ConversionStats, DayHours, Visibility, Weekday};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;

const YES_VALUES: [&str; 3] = ["yes", "true", "1"];
const NO_VALUES: [&str; 3] = ["no", "false", "0"];
const NULL_VALUES: [&str; 2] = ["null", ""];

/// Classifies the `display` column. A missing column counts as empty.
pub fn resolve_visibility(record: &Record) -> Result<Visibility> {
    let display = record.get("display").unwrap_or_default().to_lowercase();

    if YES_VALUES.contains(&display.as_str()) {
        Ok(Visibility::Visible)
    } else if NO_VALUES.contains(&display.as_str()) {
        Ok(Visibility::Hidden)
    } else if NULL_VALUES.contains(&display.as_str()) {
        Ok(Visibility::Unknown)
    } else {
        Err(EtlError::InvalidValue {
            field: "display".to_string(),
            value: display,
        })
    }
}

/// Builds the weekly schedule. Every `<day>_start`/`<day>_end` column is required.
pub fn hours_of_operation(record: &Record) -> Result<BTreeMap<String, DayHours>> {
    let mut hours = BTreeMap::new();

    for day in Weekday::ALL {
        let start = required(record, &day.start_column())?;
        let end = required(record, &day.end_column())?;
        hours.insert(day.abbreviation().to_string(), DayHours::new(start, end));
    }

    Ok(hours)
}

fn required<'a>(record: &'a Record, field: &str) -> Result<&'a str> {
    record.get(field).ok_or_else(|| EtlError::MissingField {
        field: field.to_string(),
    })
}

/// Converts CSV rows into facilities, one geocoding call per visible row.
pub struct RowConverter<'a, G: Geocoder + ?Sized> {
    geocoder: &'a G,
    stats: ConversionStats,
}

impl<'a, G: Geocoder + ?Sized> RowConverter<'a, G> {
    pub fn new(geocoder: &'a G) -> Self {
        Self {
            geocoder,
            stats: ConversionStats::default(),
        }
    }

    /// `Ok(None)` for rows that are hidden or have no visibility set.
    pub async fn convert(&mut self, record: &Record) -> Result<Option<Facility>> {
        self.stats.rows_read += 1;

        let visibility = resolve_visibility(record)?;
        match visibility {
            Visibility::Visible => {}
            Visibility::Hidden => {
                self.stats.hidden += 1;
                return Ok(None);
            }
            Visibility::Unknown => {
                self.stats.unknown_visibility += 1;
                return Ok(None);
            }
        }

        let hours_of_operation = hours_of_operation(record)?;

        let address = record.optional("address");
        let city = record.optional("city");
        let state = record.optional("state");
        let zip = record.optional("zip");

        let geo = self
            .geocoder
            .resolve(
                address.as_deref(),
                city.as_deref(),
                state.as_deref(),
                zip.as_deref(),
            )
            .await;
        if !geo.is_resolved() {
            self.stats.geocode_failures += 1;
        }
        self.stats.visible += 1;

        Ok(Some(Facility {
            facility_id: record.optional("facility_id"),
            facility_name: record.optional("facility_name"),
            phone: record.optional("phone"),
            address,
            city,
            state,
            zip,
            // A display note takes precedence over a pre-filled metadata column.
            facility_metadata: record
                .optional("facility_display_note")
                .or_else(|| record.optional("facility_metadata")),
            visible: visibility.as_flag(),
            hours_of_operation,
            place_id: geo.place_id,
            lat: geo.lat,
            lng: geo.lng,
        }))
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn into_stats(self) -> ConversionStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoLocation;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table and records every query it receives.
    struct TableGeocoder {
        known: HashMap<String, GeoLocation>,
        queries: Mutex<Vec<String>>,
    }

    impl TableGeocoder {
        fn new(entries: &[(&str, &str, f64, f64)]) -> Self {
            Self {
                known: entries
                    .iter()
                    .map(|(q, id, lat, lng)| {
                        (
                            q.to_string(),
                            GeoLocation {
                                place_id: id.to_string(),
                                lat: *lat,
                                lng: *lng,
                            },
                        )
                    })
                    .collect(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn geocode(&self, query: &str) -> Result<GeoLocation> {
            self.queries.lock().unwrap().push(query.to_string());
            self.known
                .get(query)
                .cloned()
                .ok_or_else(|| EtlError::GeocodingError {
                    query: query.to_string(),
                    message: "no results".to_string(),
                })
        }
    }

    fn facility_row(display: &str) -> Record {
        let mut record: Record = [
            ("facility_id", "F-1"),
            ("display", display),
            ("facility_display_note", "65 and over only"),
            ("facility_name", "Civic Center"),
            ("phone", "555-0100"),
            ("address", "1 Main St"),
            ("city", "Springfield"),
            ("state", "IL"),
            ("zip", "62701"),
        ]
        .into_iter()
        .collect();
        for day in Weekday::ALL {
            record.data.insert(day.start_column(), String::new());
            record.data.insert(day.end_column(), String::new());
        }
        record
            .data
            .insert("monday_start".to_string(), "9:00".to_string());
        record
            .data
            .insert("monday_end".to_string(), "17:00".to_string());
        record
    }

    fn springfield() -> TableGeocoder {
        TableGeocoder::new(&[("1 Main St, Springfield, IL 62701", "ChIJspring", 39.8, -89.65)])
    }

    #[test]
    fn test_visibility_vocabulary() {
        for value in ["yes", "YES", "True", "1"] {
            let record: Record = [("display", value)].into_iter().collect();
            assert_eq!(resolve_visibility(&record).unwrap(), Visibility::Visible, "{}", value);
        }
        for value in ["no", "False", "0"] {
            let record: Record = [("display", value)].into_iter().collect();
            assert_eq!(resolve_visibility(&record).unwrap(), Visibility::Hidden, "{}", value);
        }
        for value in ["null", "NULL", ""] {
            let record: Record = [("display", value)].into_iter().collect();
            assert_eq!(resolve_visibility(&record).unwrap(), Visibility::Unknown, "{}", value);
        }
        assert_eq!(
            resolve_visibility(&Record::default()).unwrap(),
            Visibility::Unknown
        );
    }

    #[test]
    fn test_unknown_display_value_is_rejected() {
        let record: Record = [("display", "Maybe")].into_iter().collect();
        match resolve_visibility(&record) {
            Err(EtlError::InvalidValue { field, value }) => {
                assert_eq!(field, "display");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_visible_row_is_fully_populated() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);

        let facility = converter
            .convert(&facility_row("Yes"))
            .await
            .unwrap()
            .expect("visible row");

        assert_eq!(facility.facility_id.as_deref(), Some("F-1"));
        assert_eq!(facility.facility_name.as_deref(), Some("Civic Center"));
        assert_eq!(facility.phone.as_deref(), Some("555-0100"));
        assert_eq!(facility.facility_metadata.as_deref(), Some("65 and over only"));
        assert_eq!(facility.visible, Some(true));
        assert_eq!(facility.place_id.as_deref(), Some("ChIJspring"));
        assert_eq!(facility.lat, Some(39.8));
        assert_eq!(facility.lng, Some(-89.65));

        assert_eq!(facility.hours_of_operation.len(), 7);
        assert_eq!(
            facility.hours_of_operation["mon"],
            DayHours {
                status: 1,
                start: Some("9:00".to_string()),
                end: Some("17:00".to_string()),
            }
        );
        assert_eq!(
            facility.hours_of_operation["sat"],
            DayHours {
                status: 0,
                start: None,
                end: None,
            }
        );
        assert_eq!(converter.stats().visible, 1);
        assert_eq!(converter.stats().geocode_failures, 0);
    }

    #[tokio::test]
    async fn test_hidden_rows_skip_geocoding() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);

        assert!(converter.convert(&facility_row("0")).await.unwrap().is_none());
        assert!(converter.convert(&facility_row("null")).await.unwrap().is_none());

        let mut no_display = facility_row("");
        no_display.data.remove("display");
        assert!(converter.convert(&no_display).await.unwrap().is_none());

        assert!(geocoder.queries().is_empty());
        let stats = converter.into_stats();
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.hidden, 1);
        assert_eq!(stats.unknown_visibility, 2);
    }

    #[tokio::test]
    async fn test_hidden_row_without_hours_columns_is_not_an_error() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);
        let record: Record = [("display", "false")].into_iter().collect();

        assert!(converter.convert(&record).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_optional_column_yields_null() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);
        let mut record = facility_row("1");
        record.data.remove("phone");
        record.data.remove("facility_display_note");

        let facility = converter.convert(&record).await.unwrap().unwrap();
        assert_eq!(facility.phone, None);
        assert_eq!(facility.facility_metadata, None);
    }

    #[tokio::test]
    async fn test_metadata_column_used_without_display_note() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);
        let mut record = facility_row("yes");
        record.data.remove("facility_display_note");
        record
            .data
            .insert("facility_metadata".to_string(), "Drive-thru only".to_string());

        let facility = converter.convert(&record).await.unwrap().unwrap();
        assert_eq!(facility.facility_metadata.as_deref(), Some("Drive-thru only"));
    }

    #[tokio::test]
    async fn test_display_note_overrides_metadata_column() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);
        let mut record = facility_row("yes");
        record
            .data
            .insert("facility_metadata".to_string(), "Drive-thru only".to_string());

        let facility = converter.convert(&record).await.unwrap().unwrap();
        assert_eq!(facility.facility_metadata.as_deref(), Some("65 and over only"));
    }

    #[tokio::test]
    async fn test_missing_hours_column_is_fatal() {
        let geocoder = springfield();
        let mut converter = RowConverter::new(&geocoder);
        let mut record = facility_row("true");
        record.data.remove("tuesday_end");

        match converter.convert(&record).await {
            Err(EtlError::MissingField { field }) => assert_eq!(field, "tuesday_end"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(geocoder.queries().is_empty());
    }

    #[tokio::test]
    async fn test_geocoding_failure_keeps_row_with_nulls() {
        let geocoder = TableGeocoder::new(&[]);
        let mut converter = RowConverter::new(&geocoder);

        let facility = converter
            .convert(&facility_row("yes"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(facility.place_id, None);
        assert_eq!(facility.lat, None);
        assert_eq!(facility.lng, None);
        assert_eq!(converter.stats().geocode_failures, 1);
    }

    #[tokio::test]
    async fn test_query_string_format() {
        let geocoder = TableGeocoder::new(&[]);
        let mut converter = RowConverter::new(&geocoder);
        let mut record = facility_row("yes");
        record.data.remove("zip");

        converter.convert(&record).await.unwrap();
        converter.convert(&facility_row("yes")).await.unwrap();

        assert_eq!(
            geocoder.queries(),
            vec![
                "1 Main St, Springfield, IL ".to_string(),
                "1 Main St, Springfield, IL 62701".to_string(),
            ]
        );
    }
}
