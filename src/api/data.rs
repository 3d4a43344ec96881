use serde::Deserialize;

/// The type used for flight identifiers by the logbook server.
pub type FlightId = i64;

/// The account this client is acting as
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub is_admin: bool,
}

/// An airport as stored by the logbook server, keyed by ICAO code
#[derive(Debug, Clone, Deserialize)]
pub struct Airport {
    pub icao: String,
    pub iata: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    /// IANA timezone name, used by the server to localize times
    pub timezone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// An airline as stored by the logbook server, keyed by ICAO code
#[derive(Debug, Clone, Deserialize)]
pub struct Airline {
    pub icao: String,
    pub iata: Option<String>,
    pub name: String,
}

/// The creation endpoint returns one id for a single-traveler submission
/// and an array (in submission order) when several travelers are covered.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlightIds {
    One(FlightId),
    Many(Vec<FlightId>),
}

impl FlightIds {
    pub fn into_vec(self) -> Vec<FlightId> {
        match self {
            FlightIds::One(id) => vec![id],
            FlightIds::Many(ids) => ids,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flight_ids_forms() {
        let single: FlightIds = serde_json::from_str("42").unwrap();
        assert_eq!(single.into_vec(), vec![42]);

        let many: FlightIds = serde_json::from_str("[5, 9]").unwrap();
        assert_eq!(many.into_vec(), vec![5, 9]);
    }
}
