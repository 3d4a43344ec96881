use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::api::{Airline, Airport, ApiError, LogbookApi};
use crate::form::FlightDraft;

const ADSBDB_BASE: &str = "https://api.adsbdb.com/v0";

lazy_static! {
    static ref CALLSIGN_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9]{3,8}$").expect("callsign regex compiles");
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("'{0}' does not look like a callsign")]
    InvalidCallsign(String),

    /// adsbdb has no route on file for the callsign
    #[error("Unknown callsign")]
    UnknownCallsign,

    #[error("Failed to fetch route: {0}")]
    FetchError(String),

    #[error("Failed to parse route: {0}")]
    ParseError(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Deserialize)]
struct CallsignReply {
    response: CallsignResponse,
}

/// adsbdb answers misses with a plain string in place of the route object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CallsignResponse {
    Found { flightroute: FlightRoute },
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct FlightRoute {
    airline: Option<RouteAirline>,
    origin: RouteAirport,
    destination: RouteAirport,
}

#[derive(Debug, Deserialize)]
struct RouteAirline {
    icao: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteAirport {
    icao_code: String,
}

/// The resolved records a successful lookup pre-fills the draft with
#[derive(Debug, Clone)]
pub struct RoutePrefill {
    pub origin: Airport,
    pub destination: Airport,
    pub airline: Option<Airline>,
}

impl RoutePrefill {
    pub fn apply(&self, draft: &mut FlightDraft) {
        draft.origin = Some(self.origin.icao.clone());
        draft.destination = Some(self.destination.icao.clone());

        if let Some(airline) = &self.airline {
            draft.airline = Some(airline.icao.clone());
        }
    }
}

/// Returns true if the given string matches the pattern of a callsign
pub fn is_callsign(query: &str) -> bool {
    CALLSIGN_REGEX.is_match(query)
}

/// Looks up a flight number on adsbdb and resolves the route's ICAO codes to
/// full logbook records. Best effort: the caller decides whether a failure
/// is worth surfacing.
pub async fn prefill_from_callsign(
    callsign: &str,
    api: &dyn LogbookApi,
) -> Result<RoutePrefill, LookupError> {
    let route = fetch_route(callsign).await?;

    let origin = api.airport(&route.origin.icao_code).await?;
    let destination = api.airport(&route.destination.icao_code).await?;

    let airline = match route.airline.and_then(|a| a.icao) {
        Some(icao) => Some(api.airline(&icao).await?),
        None => None,
    };

    Ok(RoutePrefill {
        origin,
        destination,
        airline,
    })
}

async fn fetch_route(callsign: &str) -> Result<FlightRoute, LookupError> {
    if !is_callsign(callsign) {
        return Err(LookupError::InvalidCallsign(callsign.to_string()));
    }

    let url = format!("{}/callsign/{}", ADSBDB_BASE, callsign);
    let client = Client::new();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LookupError::FetchError(e.to_string()))?;

    let status = response.status();
    if status.as_u16() == 404 {
        return Err(LookupError::UnknownCallsign);
    }

    if !status.is_success() {
        return Err(LookupError::FetchError(format!(
            "adsbdb answered with status {status}"
        )));
    }

    let reply: CallsignReply = response
        .json()
        .await
        .map_err(|e| LookupError::ParseError(e.to_string()))?;

    match reply.response {
        CallsignResponse::Found { flightroute } => Ok(flightroute),
        CallsignResponse::Unknown(_) => Err(LookupError::UnknownCallsign),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_callsign_testing() {
        assert!(is_callsign("BAW123"));
        assert!(is_callsign("dlh4ck"));
        assert!(is_callsign("UAL1"));

        assert!(!is_callsign(""));
        assert!(!is_callsign("BA"));
        assert!(!is_callsign("BAW 123"));
        assert!(!is_callsign("LONGERTHANEIGHT"));
    }

    #[test]
    fn test_route_parsing() {
        let body = r#"{
            "response": {
                "flightroute": {
                    "callsign": "BAW633",
                    "airline": { "name": "British Airways", "icao": "BAW", "iata": "BA" },
                    "origin": { "icao_code": "EGLL", "iata_code": "LHR", "name": "Heathrow" },
                    "destination": { "icao_code": "LGAV", "iata_code": "ATH", "name": "Athens" }
                }
            }
        }"#;

        let reply: CallsignReply = serde_json::from_str(body).unwrap();
        let route = match reply.response {
            CallsignResponse::Found { flightroute } => flightroute,
            CallsignResponse::Unknown(_) => panic!("route should parse"),
        };

        assert_eq!(route.origin.icao_code, "EGLL");
        assert_eq!(route.destination.icao_code, "LGAV");
        assert_eq!(route.airline.unwrap().icao.as_deref(), Some("BAW"));
    }

    #[test]
    fn test_unknown_callsign_parsing() {
        let body = r#"{ "response": "unknown callsign" }"#;

        let reply: CallsignReply = serde_json::from_str(body).unwrap();
        assert!(matches!(reply.response, CallsignResponse::Unknown(_)));
    }

    #[test]
    fn test_prefill_application() {
        let prefill = RoutePrefill {
            origin: Airport {
                icao: "EGLL".to_string(),
                iata: Some("LHR".to_string()),
                name: "Heathrow".to_string(),
                city: Some("London".to_string()),
                country: Some("GB".to_string()),
                timezone: Some("Europe/London".to_string()),
                latitude: 51.4706,
                longitude: -0.461941,
            },
            destination: Airport {
                icao: "LGAV".to_string(),
                iata: Some("ATH".to_string()),
                name: "Eleftherios Venizelos".to_string(),
                city: Some("Athens".to_string()),
                country: Some("GR".to_string()),
                timezone: Some("Europe/Athens".to_string()),
                latitude: 37.9364,
                longitude: 23.9445,
            },
            airline: Some(Airline {
                icao: "BAW".to_string(),
                iata: Some("BA".to_string()),
                name: "British Airways".to_string(),
            }),
        };

        let mut draft = FlightDraft::default();
        prefill.apply(&mut draft);

        assert_eq!(draft.origin.as_deref(), Some("EGLL"));
        assert_eq!(draft.destination.as_deref(), Some("LGAV"));
        assert_eq!(draft.airline.as_deref(), Some("BAW"));
    }
}
