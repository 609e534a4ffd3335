//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    recommendation::{AgentClient, AgentSettings, RequestSequencer},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The client for the savings recommendation agent.
    pub agent_client: AgentClient,

    /// Shared by every recommendation request so that late answers to older
    /// requests can be dropped.
    pub request_sequencer: Arc<RequestSequencer>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the HTTP
    /// client for the agent cannot be created.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        agent_settings: AgentSettings,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
            agent_client: AgentClient::new(agent_settings)?,
            request_sequencer: Arc::new(RequestSequencer::new()),
        })
    }
}
