#![forbid(unsafe_code)]

use super::super::StoreError;
use mt_core::ids::RecordKind;
use rusqlite::{OptionalExtension, Transaction, params};

/// Allocates the next display id for `kind` (`MS-001`, `MS-002`, ...).
pub(in crate::store) fn next_id_tx(
    tx: &Transaction<'_>,
    kind: RecordKind,
) -> Result<String, StoreError> {
    let name = kind.counter();
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE name=?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        r#"
        INSERT INTO counters(name, value) VALUES (?1, ?2)
        ON CONFLICT(name) DO UPDATE SET value=excluded.value
        "#,
        params![name, next],
    )?;
    Ok(kind.format(next))
}
