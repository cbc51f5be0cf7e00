//! Domain entities and the per-kind cache mapping contract.
//!
//! Each cacheable entity kind implements [`StationRecord`], which tells the
//! store how to key, locate, and serialize an entity. This replaces per-kind
//! cache-entry handler classes with a single trait the generic store is
//! parameterized over.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Entity kinds the cache knows about.
///
/// The stable string name is used as the `kind` column in both the station
/// table and the explored-region table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    BikeStation,
    BusStation,
    SubwayStation,
    LineIcon,
    BusRoute,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BikeStation => "bike-station",
            Self::BusStation => "bus-station",
            Self::SubwayStation => "subway-station",
            Self::LineIcon => "line-icon",
            Self::BusRoute => "bus-route",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping contract between a domain entity and its cache row.
///
/// `id` must be unique within the kind and non-empty. `coords` returns None
/// for kinds that are not spatially queryable (routes, icons); those rows
/// never match an area query.
pub trait StationRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn coords(&self) -> Option<Coordinates>;
}

/// A self-service bike hire station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeStation {
    pub id: String,
    pub name: String,
    pub latitude: i32,
    pub longitude: i32,
    pub available_bikes: u16,
    pub available_slots: u16,
    pub active: bool,
}

impl StationRecord for BikeStation {
    const KIND: EntityKind = EntityKind::BikeStation;

    fn id(&self) -> &str {
        &self.id
    }

    fn coords(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude, self.longitude))
    }
}

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStation {
    pub id: String,
    pub name: String,
    pub latitude: i32,
    pub longitude: i32,
    /// Wheelchair accessible boarding.
    pub accessible: bool,
}

impl StationRecord for BusStation {
    const KIND: EntityKind = EntityKind::BusStation;

    fn id(&self) -> &str {
        &self.id
    }

    fn coords(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude, self.longitude))
    }
}

/// A subway station with its platform layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubwayStation {
    pub id: String,
    pub name: String,
    pub latitude: i32,
    pub longitude: i32,
    /// Floor the platforms sit on, relative to street level.
    pub floors: i8,
    pub has_platform_direction_1: bool,
    pub has_platform_direction_2: bool,
}

impl StationRecord for SubwayStation {
    const KIND: EntityKind = EntityKind::SubwayStation;

    fn id(&self) -> &str {
        &self.id
    }

    fn coords(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude, self.longitude))
    }
}

/// A bus route. Not spatially queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusRoute {
    pub id: String,
    pub short_name: String,
    pub long_name: String,
    pub agency_id: String,
}

impl StationRecord for BusRoute {
    const KIND: EntityKind = EntityKind::BusRoute;

    fn id(&self) -> &str {
        &self.id
    }

    fn coords(&self) -> Option<Coordinates> {
        None
    }
}

/// The icon resource associated with a transit line. Not spatially queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineIcon {
    pub line_id: String,
    pub icon_url: String,
}

impl StationRecord for LineIcon {
    const KIND: EntityKind = EntityKind::LineIcon;

    fn id(&self) -> &str {
        &self.line_id
    }

    fn coords(&self) -> Option<Coordinates> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_distinct() {
        let kinds = [
            EntityKind::BikeStation,
            EntityKind::BusStation,
            EntityKind::SubwayStation,
            EntityKind::LineIcon,
            EntityKind::BusRoute,
        ];
        for a in kinds {
            for b in kinds {
                if a != b {
                    assert_ne!(a.as_str(), b.as_str());
                }
            }
        }
    }

    #[test]
    fn test_spatial_kinds_expose_coords() {
        let bike = BikeStation {
            id: "1".into(),
            name: "République".into(),
            latitude: 48_110_000,
            longitude: -1_678_000,
            available_bikes: 4,
            available_slots: 12,
            active: true,
        };
        assert_eq!(bike.coords(), Some(Coordinates::new(48_110_000, -1_678_000)));

        let route =
            BusRoute { id: "0064".into(), short_name: "64".into(), long_name: "64 Sud".into(), agency_id: "1".into() };
        assert!(route.coords().is_none());
    }
}
