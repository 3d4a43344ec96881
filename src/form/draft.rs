use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::api::FlightId;

/// Raised when a preference flag carries a value outside its option list
#[derive(Debug, Error)]
#[error("Unrecognized value: {0}")]
pub struct InvalidOption(pub String);

macro_rules! options {
    ($name:ident, $list:ident, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        /// Every value accepted for this attribute, in display order
        pub const $list: &[$name] = &[$($name::$variant,)+];

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidOption;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(InvalidOption(other.to_string())),
                }
            }
        }
    };
}

options!(SeatType, SEAT_TYPES, {
    Aisle => "aisle",
    Middle => "middle",
    Window => "window",
});

options!(AircraftSide, AIRCRAFT_SIDES, {
    Left => "left",
    Right => "right",
    Center => "center",
});

options!(TicketClass, TICKET_CLASSES, {
    Private => "private",
    First => "first",
    Business => "business",
    EconomyPlus => "economy+",
    Economy => "economy",
});

options!(FlightPurpose, FLIGHT_PURPOSES, {
    Leisure => "leisure",
    Business => "business",
    Crew => "crew",
    Other => "other",
});

/// The shared trip attributes of one form session. Every traveler covered by
/// the submission gets these; they only live as long as the session.
#[derive(Debug, Clone, Default)]
pub struct FlightDraft {
    /// ICAO code of the departure airport
    pub origin: Option<String>,
    /// ICAO code of the arrival airport
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    /// Local wall-clock time in HH:MM form, interpreted by the server
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    /// Only set when the flight lands on a different calendar day
    pub arrival_date: Option<NaiveDate>,
    /// ICAO code of the operating airline
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub airplane: Option<String>,
    pub tail_number: Option<String>,
    /// Id of an already-logged flight this one connects with
    pub connection: Option<FlightId>,
}
