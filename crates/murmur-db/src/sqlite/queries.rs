use rusqlite::{Connection, OptionalExtension, Result, params};

use murmur_types::models::Message;

use super::models::{MessageRow, UserRow};
use crate::pair::PairKey;

// -- Users --

pub fn user_exists(conn: &Connection, username: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM users WHERE username = ?1", [username], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_user(conn: &Connection, username: &str, password: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        (username, password),
    )?;
    Ok(())
}

pub fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT username, password FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

// -- Public chat --

pub fn insert_public_message(conn: &Connection, message: &Message) -> Result<()> {
    conn.execute(
        "INSERT INTO public_messages (sender, recipient, content) VALUES (?1, ?2, ?3)",
        (&message.sender, &message.recipient, &message.content),
    )?;
    Ok(())
}

pub fn count_public_messages(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM public_messages", [], |row| row.get(0))
}

pub fn query_public_messages(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT sender, recipient, content FROM public_messages
         ORDER BY id
         LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt
        .query_map(params![limit, offset], |row| {
            Ok(MessageRow {
                sender: row.get(0)?,
                recipient: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(rows)
}

// -- Private chats --

pub fn insert_private_message(conn: &Connection, key: &PairKey, message: &Message) -> Result<()> {
    conn.execute(
        "INSERT INTO private_messages (sender, recipient, member_low, member_high, content)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            message.sender,
            message.recipient,
            key.low(),
            key.high(),
            message.content
        ],
    )?;
    Ok(())
}

pub fn count_private_messages(conn: &Connection, key: &PairKey) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM private_messages WHERE member_low = ?1 AND member_high = ?2",
        params![key.low(), key.high()],
        |row| row.get(0),
    )
}

pub fn query_private_messages(
    conn: &Connection,
    key: &PairKey,
    limit: i64,
    offset: i64,
) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT sender, recipient, content FROM private_messages
         WHERE member_low = ?1 AND member_high = ?2
         ORDER BY id
         LIMIT ?3 OFFSET ?4",
    )?;

    let rows = stmt
        .query_map(params![key.low(), key.high(), limit, offset], |row| {
            Ok(MessageRow {
                sender: row.get(0)?,
                recipient: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(rows)
}

/// Distinct conversation partners of `user`, ascending in byte order.
pub fn query_correspondents(conn: &Connection, user: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT CASE WHEN member_low = ?1 THEN member_high ELSE member_low END AS other
         FROM private_messages
         WHERE member_low = ?1 OR member_high = ?1
         ORDER BY other",
    )?;

    let users = stmt
        .query_map([user], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;

    Ok(users)
}
