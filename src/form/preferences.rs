use std::collections::HashMap;

use super::{AircraftSide, FlightPurpose, FormError, SeatType, TicketClass};

/// The longest note the logbook accepts, matching the input's limit
pub const MAX_NOTE_LENGTH: usize = 150;

/// One traveler's flight-specific attributes. Everything is optional; unset
/// attributes are omitted from the payload entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TravelerPreference {
    pub seat: Option<SeatType>,
    pub aircraft_side: Option<AircraftSide>,
    pub ticket_class: Option<TicketClass>,
    pub purpose: Option<FlightPurpose>,
    pub notes: Option<String>,
}

/// Which attribute of a [TravelerPreference] an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    Seat,
    AircraftSide,
    TicketClass,
    Purpose,
    Notes,
}

/// Preference entries keyed by username.
///
/// Entries are created when a traveler is first selected and kept around
/// when they are deselected, so reselecting restores what was entered.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    entries: HashMap<String, TravelerPreference>,
}

impl PreferenceStore {
    /// Ensures an entry exists for the username. If one has to be created it
    /// starts as a copy of the template, which callers pick per the seeding
    /// rules of the selection flow.
    pub fn seed(&mut self, username: &str, template: Option<&TravelerPreference>) {
        if !self.entries.contains_key(username) {
            self.entries.insert(
                username.to_string(),
                template.cloned().unwrap_or_default(),
            );
        }
    }

    pub fn get(&self, username: &str) -> Option<&TravelerPreference> {
        self.entries.get(username)
    }

    /// Updates exactly one attribute of one traveler's entry. An empty value
    /// unsets the attribute so it is omitted from payloads rather than sent
    /// as an empty string.
    pub fn set_field(
        &mut self,
        username: &str,
        field: PreferenceField,
        value: &str,
    ) -> Result<(), FormError> {
        let entry = self.entries.entry(username.to_string()).or_default();

        if value.is_empty() {
            match field {
                PreferenceField::Seat => entry.seat = None,
                PreferenceField::AircraftSide => entry.aircraft_side = None,
                PreferenceField::TicketClass => entry.ticket_class = None,
                PreferenceField::Purpose => entry.purpose = None,
                PreferenceField::Notes => entry.notes = None,
            }

            return Ok(());
        }

        match field {
            PreferenceField::Seat => entry.seat = Some(value.parse()?),
            PreferenceField::AircraftSide => entry.aircraft_side = Some(value.parse()?),
            PreferenceField::TicketClass => entry.ticket_class = Some(value.parse()?),
            PreferenceField::Purpose => entry.purpose = Some(value.parse()?),
            PreferenceField::Notes => {
                if value.chars().count() > MAX_NOTE_LENGTH {
                    return Err(FormError::NotesTooLong {
                        username: username.to_string(),
                    });
                }

                entry.notes = Some(value.to_string())
            }
        }

        Ok(())
    }
}
