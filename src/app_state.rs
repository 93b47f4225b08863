//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The email address identifying the demo user that all data belongs to.
    pub demo_user_email: String,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, demo_user_email: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            demo_user_email: demo_user_email.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
