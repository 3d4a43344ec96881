use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiError, FlightId, FlightIds, LogbookApi};
use crate::session::Session;

mod draft;
pub use draft::*;

mod preferences;
pub use preferences::*;

mod selection;
pub use selection::*;

#[derive(Debug, Error)]
pub enum FormError {
    /// The previous submission has not come back yet
    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Notes for {username} are longer than 150 characters")]
    NotesTooLong { username: String },

    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw form fields as entered, keyed by field name.
///
/// Shared fields live in the draft; this only carries the per-traveler
/// namespaced values, which override the preference store at submit time.
#[derive(Debug, Clone, Default)]
pub struct RawFormData {
    values: HashMap<String, String>,
}

impl RawFormData {
    /// The form field name carrying a note for one specific traveler
    pub fn note_key(username: &str) -> String {
        format!("{username}:notes")
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    /// Enters a note for one traveler. The namespaced field carries the
    /// same length limit as the stored preference it overrides.
    pub fn set_note(&mut self, username: &str, note: &str) -> Result<(), FormError> {
        if note.chars().count() > MAX_NOTE_LENGTH {
            return Err(FormError::NotesTooLong {
                username: username.to_string(),
            });
        }

        self.insert(Self::note_key(username), note.to_string());
        Ok(())
    }

    /// The note typed for this traveler, if any. Empty values count as
    /// absent, like everywhere else in the form.
    pub fn note_for(&self, username: &str) -> Option<&str> {
        self.values
            .get(&Self::note_key(username))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// One traveler's slice of the creation payload
#[derive(Debug, Clone, Serialize)]
pub struct TravelerRecord {
    /// Only admins submit on behalf of named users; everyone else relies on
    /// the server resolving their own identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<SeatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_side: Option<AircraftSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_class: Option<TicketClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<FlightPurpose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The body posted to the flight-creation endpoint: the shared trip fields
/// once, plus one record per selected traveler in selection order
#[derive(Debug, Clone, Serialize)]
pub struct FlightPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airplane: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<FlightId>,
    pub users: Vec<TravelerRecord>,
}

/// The outcome of a completed submission, used to build the follow-up link
#[derive(Debug, Clone)]
pub struct Submission {
    ids: Vec<FlightId>,
    submitter_position: Option<usize>,
}

impl Submission {
    pub fn ids(&self) -> &[FlightId] {
        &self.ids
    }

    /// The detail view to navigate to afterwards. The submitter's position
    /// in the selection picks their id out of the returned collection,
    /// falling back to the first id when they weren't part of it.
    pub fn navigation_target(&self) -> Option<String> {
        let id = self
            .submitter_position
            .and_then(|position| self.ids.get(position))
            .or_else(|| self.ids.first())?;

        Some(format!("/flights?id={id}"))
    }
}

/// One "log a new flight" session: the shared draft, the travelers it
/// covers, and their stored preferences
pub struct NewFlightForm {
    session: Session,
    pub draft: FlightDraft,
    selection: Selection,
    preferences: PreferenceStore,
    submitting: bool,
}

impl NewFlightForm {
    /// Starts a fresh form covering only the session's own user
    pub fn new(session: Session) -> Self {
        let mut preferences = PreferenceStore::default();
        preferences.seed(&session.user().username, None);

        let selection = Selection::new(&session.user().username);

        Self {
            session,
            draft: FlightDraft::default(),
            selection,
            preferences,
            submitting: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Adds or removes a traveler. Only admins may cover anyone besides
    /// themselves, and only users the session knows about; the last
    /// remaining traveler can never be removed. Newly added travelers
    /// without an entry get one seeded from the current user's (or the
    /// first selected traveler's) preferences.
    pub fn toggle_user(&mut self, username: &str) -> bool {
        let current = self.session.user().username.clone();

        if username != current
            && (!self.session.user().is_admin || !self.session.in_roster(username))
        {
            return self.selection.contains(username);
        }

        let selected = self.selection.toggle(username);

        if selected {
            let template = self.seed_template(username, &current);
            self.preferences.seed(username, template.as_ref());
        }

        selected
    }

    /// Updates one attribute of one traveler's preferences
    pub fn set_per_user_field(
        &mut self,
        username: &str,
        field: PreferenceField,
        value: &str,
    ) -> Result<(), FormError> {
        self.preferences.set_field(username, field, value)
    }

    /// Builds the creation payload from the draft, the selection, and the
    /// preference store. Notes in the raw form data win over stored notes.
    pub fn assemble(&self, raw: &RawFormData) -> FlightPayload {
        let is_admin = self.session.user().is_admin;

        let users = self
            .selection
            .iter()
            .map(|username| {
                let preference = self.preferences.get(username).cloned().unwrap_or_default();

                let notes = raw
                    .note_for(username)
                    .map(str::to_string)
                    .or(preference.notes);

                TravelerRecord {
                    username: is_admin.then(|| username.to_string()),
                    seat: preference.seat,
                    aircraft_side: preference.aircraft_side,
                    ticket_class: preference.ticket_class,
                    purpose: preference.purpose,
                    notes,
                }
            })
            .collect();

        FlightPayload {
            origin: self.draft.origin.clone(),
            destination: self.draft.destination.clone(),
            date: self.draft.date,
            departure_time: self.draft.departure_time.clone(),
            arrival_time: self.draft.arrival_time.clone(),
            arrival_date: self.draft.arrival_date,
            airline: self.draft.airline.clone(),
            flight_number: self.draft.flight_number.clone(),
            airplane: self.draft.airplane.clone(),
            tail_number: self.draft.tail_number.clone(),
            connection: self.draft.connection,
            users,
        }
    }

    /// Marks the form as submitting and returns the payload to post.
    /// Fails while a previous submission is still in flight, or when a raw
    /// note override exceeds the note length limit.
    pub fn begin_submission(&mut self, raw: &RawFormData) -> Result<FlightPayload, FormError> {
        if self.submitting {
            return Err(FormError::SubmissionInFlight);
        }

        let too_long = self.selection.iter().find(|username| {
            raw.note_for(username)
                .map(|note| note.chars().count() > MAX_NOTE_LENGTH)
                .unwrap_or(false)
        });

        if let Some(username) = too_long {
            return Err(FormError::NotesTooLong {
                username: username.to_string(),
            });
        }

        self.submitting = true;
        Ok(self.assemble(raw))
    }

    /// Records the ids the server handed back and re-enables submission
    pub fn complete_submission(&mut self, ids: FlightIds) -> Submission {
        self.submitting = false;

        Submission {
            ids: ids.into_vec(),
            submitter_position: self.selection.position(&self.session.user().username),
        }
    }

    /// Re-enables submission after a failed attempt
    pub fn abort_submission(&mut self) {
        self.submitting = false;
    }

    /// Posts the assembled payload and resolves the follow-up target
    pub async fn submit(
        &mut self,
        api: &dyn LogbookApi,
        raw: &RawFormData,
        local_airport_time: bool,
    ) -> Result<Submission, FormError> {
        let payload = self.begin_submission(raw)?;

        let ids = match api.create_flights(&payload, local_airport_time).await {
            Ok(ids) => ids,
            Err(e) => {
                self.abort_submission();
                return Err(e.into());
            }
        };

        Ok(self.complete_submission(ids))
    }

    fn seed_template(&self, added: &str, current: &str) -> Option<TravelerPreference> {
        if added != current && self.selection.contains(current) {
            return self.preferences.get(current).cloned();
        }

        let first = self.selection.first();
        if first != added {
            return self.preferences.get(first).cloned();
        }

        None
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::{Airline, Airport, Result as ApiResult, UserRecord};

    fn admin_session() -> Session {
        Session::new(
            UserRecord {
                username: "bob".to_string(),
                is_admin: true,
            },
            vec!["alice".to_string(), "carol".to_string()],
        )
    }

    fn plain_session(username: &str) -> Session {
        Session::new(
            UserRecord {
                username: username.to_string(),
                is_admin: false,
            },
            Vec::new(),
        )
    }

    /// Answers `create_flights` with a fixed response and records the payload
    struct ScriptedApi {
        response: FlightIds,
        seen: Mutex<Vec<FlightPayload>>,
    }

    impl ScriptedApi {
        fn returning(response: FlightIds) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LogbookApi for ScriptedApi {
        async fn me(&self) -> ApiResult<UserRecord> {
            unreachable!("not used by form tests")
        }

        async fn usernames(&self) -> ApiResult<Vec<String>> {
            unreachable!("not used by form tests")
        }

        async fn airport(&self, _icao: &str) -> ApiResult<Airport> {
            unreachable!("not used by form tests")
        }

        async fn airline(&self, _icao: &str) -> ApiResult<Airline> {
            unreachable!("not used by form tests")
        }

        async fn create_flights(
            &self,
            payload: &FlightPayload,
            _local_airport_time: bool,
        ) -> ApiResult<FlightIds> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_every_selected_user_has_an_entry() {
        let mut form = NewFlightForm::new(admin_session());
        form.toggle_user("alice");
        form.toggle_user("carol");

        for username in form.selection().iter().collect::<Vec<_>>() {
            assert!(form.preferences().get(username).is_some());
        }
    }

    #[test]
    fn test_seeding_copies_current_user() {
        let mut form = NewFlightForm::new(admin_session());
        form.set_per_user_field("bob", PreferenceField::Seat, "window")
            .unwrap();

        form.toggle_user("alice");

        assert_eq!(
            form.preferences().get("alice").unwrap().seat,
            Some(SeatType::Window)
        );
    }

    #[test]
    fn test_non_admin_cannot_change_selection() {
        let mut form = NewFlightForm::new(plain_session("alice"));

        assert!(!form.toggle_user("bob"));
        assert_eq!(form.selection().len(), 1);
        assert!(form.selection().contains("alice"));
    }

    #[test]
    fn test_admin_cannot_select_unknown_users() {
        let mut form = NewFlightForm::new(admin_session());

        assert!(!form.toggle_user("mallory"));
        assert_eq!(form.selection().len(), 1);
        assert!(form.preferences().get("mallory").is_none());
    }

    #[test]
    fn test_one_record_per_traveler_in_order() {
        let mut form = NewFlightForm::new(admin_session());
        form.toggle_user("alice");
        form.toggle_user("carol");

        let payload = form.assemble(&RawFormData::default());
        let usernames: Vec<_> = payload
            .users
            .iter()
            .map(|u| u.username.clone().unwrap())
            .collect();

        assert_eq!(usernames, vec!["bob", "alice", "carol"]);
    }

    #[test]
    fn test_non_admin_payload_has_no_usernames() {
        let mut form = NewFlightForm::new(plain_session("alice"));
        form.set_per_user_field("alice", PreferenceField::Seat, "aisle")
            .unwrap();

        let payload = form.assemble(&RawFormData::default());

        assert_eq!(payload.users.len(), 1);
        assert_eq!(payload.users[0].username, None);

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["users"][0].get("username").is_none());
    }

    #[test]
    fn test_raw_note_overrides_stored_note() {
        let mut form = NewFlightForm::new(admin_session());
        form.toggle_user("alice");

        form.set_per_user_field("alice", PreferenceField::Notes, "stored note")
            .unwrap();

        let mut raw = RawFormData::default();
        raw.set_note("alice", "typed note").unwrap();

        let payload = form.assemble(&raw);
        let alice = payload
            .users
            .iter()
            .find(|u| u.username.as_deref() == Some("alice"))
            .unwrap();

        assert_eq!(alice.notes.as_deref(), Some("typed note"));

        // Everyone else keeps their stored notes
        let bob = payload
            .users
            .iter()
            .find(|u| u.username.as_deref() == Some("bob"))
            .unwrap();
        assert_eq!(bob.notes, None);
    }

    #[test]
    fn test_raw_note_respects_length_limit() {
        let mut form = NewFlightForm::new(admin_session());
        form.toggle_user("alice");

        let long = "a".repeat(MAX_NOTE_LENGTH + 50);

        // The namespaced field refuses the note at edit time
        let mut raw = RawFormData::default();
        assert!(matches!(
            raw.set_note("alice", &long),
            Err(FormError::NotesTooLong { .. })
        ));

        // A value smuggled past it under the namespaced key still cannot
        // reach the payload
        raw.insert(RawFormData::note_key("alice"), long);
        assert!(matches!(
            form.begin_submission(&raw),
            Err(FormError::NotesTooLong { .. })
        ));

        // The failed attempt must not leave the form stuck submitting
        assert!(form.begin_submission(&RawFormData::default()).is_ok());
    }

    #[test]
    fn test_duplicate_submission_is_refused() {
        let mut form = NewFlightForm::new(plain_session("alice"));
        let raw = RawFormData::default();

        form.begin_submission(&raw).unwrap();
        assert!(matches!(
            form.begin_submission(&raw),
            Err(FormError::SubmissionInFlight)
        ));

        // A failed attempt re-enables submission
        form.abort_submission();
        assert!(form.begin_submission(&raw).is_ok());
    }

    #[tokio::test]
    async fn test_navigation_uses_submitter_position() {
        let mut form = NewFlightForm::new(admin_session());
        form.toggle_user("alice");

        // Selection is ["bob", "alice"]; move bob behind alice
        form.toggle_user("bob");
        form.toggle_user("bob");
        assert_eq!(
            form.selection().iter().collect::<Vec<_>>(),
            vec!["alice", "bob"]
        );

        let api = ScriptedApi::returning(FlightIds::Many(vec![5, 9]));
        let submission = form.submit(&api, &RawFormData::default(), true).await.unwrap();

        assert_eq!(submission.navigation_target().as_deref(), Some("/flights?id=9"));
    }

    #[test]
    fn test_navigation_defaults_to_first_id() {
        let submission = Submission {
            ids: vec![5, 9],
            submitter_position: None,
        };

        assert_eq!(submission.navigation_target().as_deref(), Some("/flights?id=5"));
    }

    #[tokio::test]
    async fn test_single_submission_navigates_to_returned_id() {
        let mut form = NewFlightForm::new(plain_session("alice"));

        let api = ScriptedApi::returning(FlightIds::One(42));
        let submission = form.submit(&api, &RawFormData::default(), false).await.unwrap();

        assert_eq!(
            submission.navigation_target().as_deref(),
            Some("/flights?id=42")
        );

        let seen = api.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].users.len(), 1);
    }
}
