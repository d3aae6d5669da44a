use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.data.get(field).map(String::as_str)
    }

    /// Copy of the column value, or `None` when the column is absent.
    pub fn optional(&self, field: &str) -> Option<String> {
        self.data.get(field).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Unknown,
}

impl Visibility {
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Visibility::Visible => Some(true),
            Visibility::Hidden => Some(false),
            Visibility::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Week order used for the hours columns, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn start_column(self) -> String {
        format!("{}_start", self.name())
    }

    pub fn end_column(self) -> String {
        format!("{}_end", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHours {
    pub status: u8,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DayHours {
    pub fn new(start: &str, end: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let start = non_empty(start);
        let end = non_empty(end);
        Self {
            status: u8::from(start.is_some() || end.is_some()),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeResult {
    pub place_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl GeocodeResult {
    pub fn is_resolved(&self) -> bool {
        self.place_id.is_some() && self.lat.is_some() && self.lng.is_some()
    }
}

/// A facility as published to the search tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    pub facility_id: Option<String>,
    pub facility_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub facility_metadata: Option<String>,
    pub visible: Option<bool>,
    pub hours_of_operation: BTreeMap<String, DayHours>,
    pub place_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub rows_read: usize,
    pub visible: usize,
    pub hidden: usize,
    pub unknown_visibility: usize,
    pub geocode_failures: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub facilities: Vec<Facility>,
    pub stats: ConversionStats,
}
