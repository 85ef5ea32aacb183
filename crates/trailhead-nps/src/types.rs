//! Domain types for the NPS API client.

use serde::Deserialize;

/// NPS API endpoints ingested into the warehouse, each with its REST path
/// and destination table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Parks,
    Amenities,
    AmenitiesParks,
    Tours,
    ThingsToDo,
    Events,
}

impl Endpoint {
    /// Every ingestable endpoint, in load order. Parks first: downstream
    /// pipelines key off the park list.
    pub const ALL: &'static [Endpoint] = &[
        Endpoint::Parks,
        Endpoint::Amenities,
        Endpoint::AmenitiesParks,
        Endpoint::Tours,
        Endpoint::ThingsToDo,
        Endpoint::Events,
    ];

    /// REST path relative to the API base, without a leading slash.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Parks => "parks",
            Endpoint::Amenities => "amenities",
            Endpoint::AmenitiesParks => "amenities/parksplaces",
            Endpoint::Tours => "tours",
            Endpoint::ThingsToDo => "thingstodo",
            Endpoint::Events => "events",
        }
    }

    /// Destination warehouse table for this endpoint's raw records.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Endpoint::Parks => "nps_parks",
            Endpoint::Amenities => "nps_amenities",
            Endpoint::AmenitiesParks => "nps_amenities_parks",
            Endpoint::Tours => "nps_tours",
            Endpoint::ThingsToDo => "nps_things_to_do",
            Endpoint::Events => "nps_events",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Endpoint::Parks => "parks",
            Endpoint::Amenities => "amenities",
            Endpoint::AmenitiesParks => "amenities-parks",
            Endpoint::Tours => "tours",
            Endpoint::ThingsToDo => "thingstodo",
            Endpoint::Events => "events",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parks" => Ok(Endpoint::Parks),
            "amenities" => Ok(Endpoint::Amenities),
            "amenities-parks" => Ok(Endpoint::AmenitiesParks),
            "tours" => Ok(Endpoint::Tours),
            "thingstodo" => Ok(Endpoint::ThingsToDo),
            "events" => Ok(Endpoint::Events),
            other => Err(format!(
                "unknown endpoint '{other}' (expected one of: parks, amenities, \
                 amenities-parks, tours, thingstodo, events)"
            )),
        }
    }
}

/// One page of the NPS API response envelope. Only `data` is consumed; the
/// envelope's `total`/`limit`/`start` fields are strings upstream and are
/// not needed to drive pagination.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPage {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// A park row extracted from the parks endpoint, with the raw payload kept
/// alongside the typed columns the pipeline queries.
#[derive(Debug, Clone)]
pub struct ParkRecord {
    pub park_code: String,
    pub park_name: String,
    pub park_url: Option<String>,
    pub states: Option<String>,
    pub designation: Option<String>,
    pub raw: serde_json::Value,
}

impl ParkRecord {
    /// Build a `ParkRecord` from one parks-endpoint item. Returns `None`
    /// when the item has no usable `parkCode` or `fullName`.
    pub(crate) fn from_item(item: serde_json::Value) -> Option<Self> {
        let park_code = non_empty_str(&item, "parkCode")?;
        let park_name = non_empty_str(&item, "fullName")?;
        Some(Self {
            park_code,
            park_name,
            park_url: non_empty_str(&item, "url"),
            states: non_empty_str(&item, "states"),
            designation: non_empty_str(&item, "designation"),
            raw: item,
        })
    }
}

fn non_empty_str(item: &serde_json::Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
