use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS public_messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sender      TEXT NOT NULL,
            recipient   TEXT NOT NULL DEFAULT '',
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- member_low <= member_high: the canonical pair, whichever way the
        -- message went.
        CREATE TABLE IF NOT EXISTS private_messages (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            sender       TEXT NOT NULL,
            recipient    TEXT NOT NULL,
            member_low   TEXT NOT NULL,
            member_high  TEXT NOT NULL,
            content      TEXT NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK (member_low <= member_high)
        );

        CREATE INDEX IF NOT EXISTS idx_private_pair
            ON private_messages(member_low, member_high, id);

        CREATE INDEX IF NOT EXISTS idx_private_high
            ON private_messages(member_high);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
