//! Client for a self-hosted flight logbook: one run models one "new flight"
//! form session, from loading the session to navigating to the created
//! flight.

mod api;
mod config;
mod form;
pub mod logging;
mod lookup;
mod session;
mod settings;

pub use api::*;
pub use config::*;
pub use form::*;
pub use lookup::*;
pub use session::*;
pub use settings::*;
