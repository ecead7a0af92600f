use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        let tx = conn.transaction()?;
        tx.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                user_type   TEXT NOT NULL DEFAULT 'Attendee'
                            CHECK (user_type IN ('Attendee', 'Host')),
                interests   TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE venues (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                type        TEXT NOT NULL,
                details     TEXT NOT NULL DEFAULT '[]'
            );

            -- venue is matched by name only, no foreign key
            CREATE TABLE events (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                name                TEXT NOT NULL,
                venue               TEXT NOT NULL,
                date_time           TEXT NOT NULL,
                ticket_price        INTEGER NOT NULL CHECK (ticket_price >= 0),
                available_tickets   INTEGER NOT NULL
                                    CHECK (available_tickets BETWEEN 0 AND 100)
            );

            CREATE INDEX idx_events_name ON events(name, id);

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id   INTEGER NOT NULL,
                receiver_id INTEGER NOT NULL,
                content     TEXT NOT NULL
            );

            CREATE INDEX idx_messages_sender ON messages(sender_id, id);
            CREATE INDEX idx_messages_receiver ON messages(receiver_id, id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
        tx.commit()?;
    }

    info!("Database migrations complete");
    Ok(())
}
