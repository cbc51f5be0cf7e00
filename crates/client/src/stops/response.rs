//! Stops-for-location API response types and normalization.

use ridecache_core::model::BusStation;
use serde::Deserialize;

use crate::error::ClientError;

/// Standard response envelope: every endpoint wraps its payload in a
/// status code/text pair, with HTTP 200 even for some upstream failures.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub text: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, mapping a failure envelope to a protocol error.
    pub fn into_data(self) -> Result<T, ClientError> {
        if self.code != 200 {
            return Err(ClientError::Protocol(format!("upstream code {}: {}", self.code, self.text)));
        }
        self.data
            .ok_or_else(|| ClientError::Protocol("success envelope without data".to_string()))
    }
}

/// One stop as the API describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "wheelchairBoarding", default)]
    pub wheelchair_boarding: Option<String>,
}

/// List payload of the stops-for-area endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StopList {
    pub stops: Vec<StopDto>,
}

impl From<StopDto> for BusStation {
    fn from(dto: StopDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            latitude: crate::bike::response::micro_degrees(dto.lat),
            longitude: crate::bike::response::micro_degrees(dto.lon),
            accessible: dto.wheelchair_boarding.as_deref() == Some("ACCESSIBLE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let json = r#"{
            "code": 200,
            "text": "OK",
            "data": {
                "stops": [
                    {"id": "1_75520", "name": "République", "lat": 48.109982, "lon": -1.679090,
                     "wheelchairBoarding": "ACCESSIBLE"}
                ]
            }
        }"#;

        let envelope: Envelope<StopList> = serde_json::from_str(json).unwrap();
        let list = envelope.into_data().unwrap();
        assert_eq!(list.stops.len(), 1);

        let stop = BusStation::from(list.stops[0].clone());
        assert_eq!(stop.id, "1_75520");
        assert_eq!(stop.latitude, 48_109_982);
        assert!(stop.accessible);
    }

    #[test]
    fn test_envelope_failure_maps_to_protocol_error() {
        let json = r#"{"code": 500, "text": "internal error", "data": null}"#;
        let envelope: Envelope<StopList> = serde_json::from_str(json).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn test_missing_wheelchair_field_means_not_accessible() {
        let json = r#"{"id": "2_100", "name": "Gares", "lat": 48.1, "lon": -1.67}"#;
        let dto: StopDto = serde_json::from_str(json).unwrap();
        let stop = BusStation::from(dto);
        assert!(!stop.accessible);
    }
}
