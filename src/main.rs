use chrono::NaiveDate;
use clap::Parser;
use log::{error, info, warn};
use thiserror::Error;

use contrail::{
    logging, prefill_from_callsign, AircraftSide, ApiError, Config, DisplaySettings, FlightId,
    FlightPurpose, FormError, HttpApi, LookupError, NewFlightForm, PreferenceField, RawFormData,
    SeatType, Session, TicketClass,
};

/// Log a flight to your logbook
#[derive(Debug, Parser)]
#[command(name = "contrail", version)]
struct Cli {
    /// ICAO code of the departure airport
    #[arg(long)]
    origin: Option<String>,

    /// ICAO code of the arrival airport
    #[arg(long)]
    destination: Option<String>,

    /// Date of the flight (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Departure time (HH:MM, local to the origin)
    #[arg(long)]
    departure_time: Option<String>,

    /// Arrival time (HH:MM, local to the destination)
    #[arg(long)]
    arrival_time: Option<String>,

    /// Arrival date, when the flight lands on a different day
    #[arg(long)]
    arrival_date: Option<NaiveDate>,

    /// ICAO code of the operating airline
    #[arg(long)]
    airline: Option<String>,

    #[arg(long)]
    flight_number: Option<String>,

    /// Aircraft model, free form
    #[arg(long)]
    airplane: Option<String>,

    #[arg(long)]
    tail_number: Option<String>,

    /// Id of an already-logged flight this one connects with
    #[arg(long)]
    connection: Option<FlightId>,

    /// Fill origin, destination and airline from the flight number via adsbdb
    #[arg(long)]
    fetch: bool,

    /// Your seat: aisle, middle or window
    #[arg(long)]
    seat: Option<SeatType>,

    /// Your side of the aircraft: left, right or center
    #[arg(long)]
    side: Option<AircraftSide>,

    /// Your ticket class: private, first, business, economy+ or economy
    #[arg(long = "class")]
    ticket_class: Option<TicketClass>,

    /// Why you flew: leisure, business, crew or other
    #[arg(long)]
    purpose: Option<FlightPurpose>,

    /// Free-form notes, up to 150 characters
    #[arg(long)]
    notes: Option<String>,

    /// Also log this flight for another user (admins only, repeatable)
    #[arg(long = "for", value_name = "USER")]
    travelers: Vec<String>,

    /// Override one traveler's note, as USER=NOTE (repeatable)
    #[arg(long = "note-for", value_name = "USER=NOTE")]
    note_overrides: Vec<String>,
}

#[derive(Debug, Error)]
enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    Usage(String),
}

impl ClientError {
    fn hint(&self) -> String {
        match self {
            ClientError::Api(_) => {
                "Check that CONTRAIL_API_URL points at a running logbook server and that CONTRAIL_TOKEN is valid.".to_string()
            }
            ClientError::Form(_) => "Adjust the offending flag and try again.".to_string(),
            ClientError::Lookup(_) => {
                "The adsbdb lookup is best effort. Pass --origin, --destination and --airline by hand instead.".to_string()
            }
            ClientError::Usage(_) => "Run with --help to see the expected flags.".to_string(),
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    let cli = Cli::parse();
    let config = Config::from_env();

    match run(cli, &config).await {
        Ok(target) => {
            info!("Flight logged. View it at {target}");
        }
        Err(error) => {
            error!("{}", error);
            error!("Hint: {}", error.hint());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: &Config) -> Result<String, ClientError> {
    let settings = DisplaySettings::load(&config.settings_path);
    let api = HttpApi::new(&config.api_url, config.token.clone());

    let session = Session::load(&api).await?;
    info!(
        "Logged in as {}{}",
        session.user().username,
        if session.user().is_admin { " (admin)" } else { "" }
    );

    let mut form = NewFlightForm::new(session);

    form.draft.origin = cli.origin;
    form.draft.destination = cli.destination;
    form.draft.date = cli.date;
    form.draft.departure_time = cli.departure_time;
    form.draft.arrival_time = cli.arrival_time;
    form.draft.arrival_date = cli.arrival_date;
    form.draft.airline = cli.airline;
    form.draft.flight_number = cli.flight_number;
    form.draft.airplane = cli.airplane;
    form.draft.tail_number = cli.tail_number;
    form.draft.connection = cli.connection;

    if cli.fetch {
        let flight_number = form.draft.flight_number.clone().ok_or_else(|| {
            ClientError::Usage("--fetch needs --flight-number to look up".to_string())
        })?;

        // Best effort, a miss leaves the draft as entered
        match prefill_from_callsign(&flight_number, &api).await {
            Ok(prefill) => {
                info!(
                    "Route for {}: {} to {}",
                    flight_number, prefill.origin.icao, prefill.destination.icao
                );
                prefill.apply(&mut form.draft);
            }
            Err(e) => warn!("Route lookup for {flight_number} failed: {e}"),
        }
    }

    let current = form.session().user().username.clone();

    if let Some(seat) = cli.seat {
        form.set_per_user_field(&current, PreferenceField::Seat, seat.as_str())?;
    }
    if let Some(side) = cli.side {
        form.set_per_user_field(&current, PreferenceField::AircraftSide, side.as_str())?;
    }
    if let Some(class) = cli.ticket_class {
        form.set_per_user_field(&current, PreferenceField::TicketClass, class.as_str())?;
    }
    if let Some(purpose) = cli.purpose {
        form.set_per_user_field(&current, PreferenceField::Purpose, purpose.as_str())?;
    }
    if let Some(notes) = &cli.notes {
        form.set_per_user_field(&current, PreferenceField::Notes, notes)?;
    }

    if !cli.travelers.is_empty() && !form.session().user().is_admin {
        return Err(ClientError::Usage(
            "Only admins may log flights for other users".to_string(),
        ));
    }

    for username in &cli.travelers {
        let current = &form.session().user().username;

        if username != current && !form.session().in_roster(username) {
            return Err(ClientError::Usage(format!(
                "Unknown user {username}, only known users can be selected"
            )));
        }

        form.toggle_user(username);
    }

    let mut raw = RawFormData::default();
    for pair in &cli.note_overrides {
        let (username, note) = pair.split_once('=').ok_or_else(|| {
            ClientError::Usage(format!("--note-for expects USER=NOTE, got '{pair}'"))
        })?;

        raw.set_note(username, note)?;
    }

    let submission = form
        .submit(&api, &raw, settings.local_airport_time)
        .await?;

    submission
        .navigation_target()
        .ok_or_else(|| ApiError::Parse("server returned no flight ids".to_string()).into())
}
