//! Bike-share feed response types and normalization.

use ridecache_core::model::BikeStation;
use serde::Deserialize;

/// Full feed response: the upstream returns every station at once.
#[derive(Debug, Clone, Deserialize)]
pub struct BikeFeed {
    pub stations: Vec<BikeStationDto>,
}

/// One station as the feed describes it. Coordinates arrive as degrees
/// and are converted to micro-degrees on normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct BikeStationDto {
    pub number: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "bikesavailable")]
    pub bikes_available: u16,
    #[serde(rename = "slotsavailable")]
    pub slots_available: u16,
    /// 1 = in service.
    #[serde(default = "default_state")]
    pub state: u8,
}

fn default_state() -> u8 {
    1
}

/// Degrees to fixed-point micro-degrees.
pub(crate) fn micro_degrees(degrees: f64) -> i32 {
    (degrees * 1_000_000.0).round() as i32
}

impl From<BikeStationDto> for BikeStation {
    fn from(dto: BikeStationDto) -> Self {
        Self {
            id: dto.number,
            name: dto.name,
            latitude: micro_degrees(dto.latitude),
            longitude: micro_degrees(dto.longitude),
            available_bikes: dto.bikes_available,
            available_slots: dto.slots_available,
            active: dto.state == 1,
        }
    }
}
