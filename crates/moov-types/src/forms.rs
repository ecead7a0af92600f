//! Form bodies posted by the HTML pages.
//!
//! Numeric fields are kept as strings so the handlers can answer bad input
//! with a rendered page instead of a bare extractor rejection.

use serde::Deserialize;

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// -- Venues --

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

// -- Events --

#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    pub event_name: String,
    pub ticket_quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct HostEventForm {
    pub event_name: String,
    pub venue: String,
    pub date_time: String,
    pub ticket_price: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct SendMessageForm {
    pub receiver_id: String,
    pub content: String,
}
