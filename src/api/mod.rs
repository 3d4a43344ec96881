use async_trait::async_trait;
use thiserror::Error;

use crate::form::FlightPayload;

mod data;
pub use data::*;

mod http;
pub use http::*;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Failed to reach the logbook server: {0}")]
    Transport(String),

    /// The response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A resource in the logbook doesn't exist
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },

    #[error("Not authorized")]
    Unauthorized,

    #[error("{0}")]
    Other(String),
}

/// Represents a type that can talk to a flight logbook backend
#[async_trait]
pub trait LogbookApi {
    /// Returns the account the client is authenticated as
    async fn me(&self) -> Result<UserRecord>;

    /// Returns every known username. Only admins may call this.
    async fn usernames(&self) -> Result<Vec<String>>;

    async fn airport(&self, icao: &str) -> Result<Airport>;

    async fn airline(&self, icao: &str) -> Result<Airline>;

    /// Creates one flight per traveler in the payload, returning the new ids
    /// in submission order. `local_airport_time` is the caller's configured
    /// timezone-display preference, passed through as a query parameter.
    async fn create_flights(
        &self,
        payload: &FlightPayload,
        local_airport_time: bool,
    ) -> Result<FlightIds>;
}
