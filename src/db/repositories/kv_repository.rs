use rusqlite::{named_params, Connection, OptionalExtension};

use crate::error::AppResult;

pub struct KvRepository;

impl KvRepository {
    pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = :key",
                named_params! {":key": key},
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    pub fn upsert(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO kv_store (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            named_params! {":key": key, ":value": value},
        )?;

        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> AppResult<()> {
        conn.execute(
            "DELETE FROM kv_store WHERE key = :key",
            named_params! {":key": key},
        )?;
        Ok(())
    }
}
