//! Database row types. These map directly to SQLite rows.

use moov_types::{Price, UserType};

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub user_type: UserType,
    pub interests: String,
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub user_type: UserType,
    pub interests: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueRow {
    pub name: String,
    pub kind: String,
    /// Extra CSV columns in file order.
    pub details: Vec<(String, String)>,
}

pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub venue: String,
    pub date_time: String,
    pub ticket_price: Price,
    pub available_tickets: i64,
}

pub struct NewEvent<'a> {
    pub name: &'a str,
    pub venue: &'a str,
    pub date_time: &'a str,
    pub ticket_price: Price,
}

/// Outcome of a successful ticket purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub event_id: i64,
    pub event_name: String,
    pub quantity: i64,
    pub unit_price: Price,
    pub total_price: Price,
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub receiver_id: i64,
    pub receiver_name: String,
    pub content: String,
}
