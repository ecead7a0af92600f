use moov_types::{INITIAL_TICKET_ALLOCATION, Price};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, TransactionBehavior, params};
use tracing::{debug, warn};

use crate::models::{
    EventRow, MessageRow, NewEvent, NewUser, PurchaseReceipt, UserRow, VenueRow,
};
use crate::{Database, Error, Result};

impl Database {
    // -- Users --

    /// Inserts a user and returns its id. A taken name or email leaves the
    /// existing row untouched and yields [`Error::Duplicate`].
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (name, email, password, user_type, interests)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.name,
                    user.email,
                    user.password_hash,
                    user.user_type.as_str(),
                    user.interests
                ],
            )
            .map_err(Error::from_user_insert)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Inserts a user unless the name or email already exists.
    /// Returns whether a row was added.
    pub fn seed_user(&self, user: &NewUser<'_>) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let added = conn.execute(
                "INSERT OR IGNORE INTO users (name, email, password, user_type, interests)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.name,
                    user.email,
                    user.password_hash,
                    user.user_type.as_str(),
                    user.interests
                ],
            )?;
            Ok(added == 1)
        })
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "name", name))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Venues --

    /// Replaces the whole venue table in one transaction.
    pub fn replace_venues(&self, venues: &[VenueRow]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM venues", [])?;
            {
                let mut stmt =
                    tx.prepare("INSERT INTO venues (name, type, details) VALUES (?1, ?2, ?3)")?;
                for venue in venues {
                    let details = serde_json::to_string(&venue.details)?;
                    stmt.execute(params![venue.name, venue.kind, details])?;
                }
            }
            tx.commit()?;
            Ok(venues.len())
        })
    }

    pub fn list_venue_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM venues ORDER BY id")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    pub fn all_venues(&self) -> Result<Vec<VenueRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name, type, details FROM venues ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(name, kind, details)| {
                    Ok(VenueRow {
                        name,
                        kind,
                        details: serde_json::from_str(&details)?,
                    })
                })
                .collect()
        })
    }

    // -- Events --

    /// Hosts a new event with the standard ticket allocation.
    pub fn create_event(&self, event: &NewEvent<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO events (name, venue, date_time, ticket_price, available_tickets)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.name,
                    event.venue,
                    event.date_time,
                    event.ticket_price.cents(),
                    INITIAL_TICKET_ALLOCATION
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(event_id = id, name = event.name, "event created");
            Ok(id)
        })
    }

    pub fn get_event_by_name(&self, name: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| query_first_event_by_name(conn, name))
    }

    /// Takes `quantity` tickets from the oldest event named `event_name`.
    ///
    /// The lookup and the conditional decrement share one immediate
    /// transaction on the writer, so concurrent buyers can never drive the
    /// count below zero. Rejections leave the row unchanged.
    pub fn purchase_tickets(&self, event_name: &str, quantity: i64) -> Result<PurchaseReceipt> {
        if quantity < 1 {
            return Err(Error::InvalidQuantity(quantity));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let event = query_first_event_by_name(&tx, event_name)?.ok_or(Error::NotFound)?;
            if quantity > event.available_tickets {
                return Err(Error::InsufficientInventory {
                    requested: quantity,
                    available: event.available_tickets,
                });
            }

            let total_price = event
                .ticket_price
                .checked_mul(quantity)
                .ok_or(Error::InvalidQuantity(quantity))?;

            let changed = tx.execute(
                "UPDATE events SET available_tickets = available_tickets - ?1
                 WHERE id = ?2 AND available_tickets >= ?1",
                params![quantity, event.id],
            )?;
            if changed == 0 {
                let available: i64 = tx.query_row(
                    "SELECT available_tickets FROM events WHERE id = ?1",
                    [event.id],
                    |row| row.get(0),
                )?;
                return Err(Error::InsufficientInventory {
                    requested: quantity,
                    available,
                });
            }
            tx.commit()?;

            Ok(PurchaseReceipt {
                event_id: event.id,
                event_name: event.name,
                quantity,
                unit_price: event.ticket_price,
                total_price,
                remaining: event.available_tickets - quantity,
            })
        })
    }

    // -- Messages --

    pub fn insert_message(&self, sender_id: i64, receiver_id: i64, content: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, receiver_id, content) VALUES (?1, ?2, ?3)",
                params![sender_id, receiver_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Every message the user sent or received, oldest first.
    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "m.sender_id = ?1 OR m.receiver_id = ?1",
                user_id,
            )
        })
    }

    /// Messages addressed to the user, oldest first.
    pub fn inbox(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, "m.receiver_id = ?1", user_id))
    }
}

fn query_user(conn: &Connection, column: &str, value: impl ToSql) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, name, email, password, user_type, interests FROM users WHERE {column} = ?1"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(params![value], |row| {
            Ok((
                UserRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    password: row.get(3)?,
                    user_type: Default::default(),
                    interests: row.get(5)?,
                },
                row.get::<_, String>(4)?,
            ))
        })
        .optional()?;

    Ok(row.map(|(mut user, user_type)| {
        user.user_type = user_type.parse().unwrap_or_else(|e| {
            warn!("Corrupt user_type on user {}: {}", user.id, e);
            Default::default()
        });
        user
    }))
}

fn query_first_event_by_name(conn: &Connection, name: &str) -> Result<Option<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, venue, date_time, ticket_price, available_tickets
         FROM events WHERE name = ?1 ORDER BY id LIMIT 1",
    )?;

    let row = stmt.query_row([name], event_from_row).optional()?;
    Ok(row)
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        name: row.get(1)?,
        venue: row.get(2)?,
        date_time: row.get(3)?,
        ticket_price: Price::from_cents(row.get(4)?),
        available_tickets: row.get(5)?,
    })
}

fn query_messages(conn: &Connection, filter: &str, user_id: i64) -> Result<Vec<MessageRow>> {
    // LEFT JOIN so messages to unknown user ids still show up
    let sql = format!(
        "SELECT m.id, m.sender_id, s.name, m.receiver_id, r.name, m.content
         FROM messages m
         LEFT JOIN users s ON m.sender_id = s.id
         LEFT JOIN users r ON m.receiver_id = r.id
         WHERE {filter}
         ORDER BY m.id"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([user_id], |row| {
            let sender_id: i64 = row.get(1)?;
            let receiver_id: i64 = row.get(3)?;
            Ok(MessageRow {
                id: row.get(0)?,
                sender_id,
                sender_name: row
                    .get::<_, Option<String>>(2)?
                    .unwrap_or_else(|| format!("User {sender_id}")),
                receiver_id,
                receiver_name: row
                    .get::<_, Option<String>>(4)?
                    .unwrap_or_else(|| format!("User {receiver_id}")),
                content: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
