#![forbid(unsafe_code)]

use super::milestones::milestone_record_id;
use super::*;

impl SqliteStore {
    /// Evidence attached to a milestone, oldest first, with public URLs.
    pub fn list_evidence(&self, milestone_id: &str) -> Result<Vec<EvidenceRow>, StoreError> {
        let milestone_id = milestone_record_id(milestone_id)?;
        load_milestone(&self.conn, &milestone_id)?;

        let bucket = self.bucket.as_ref();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVIDENCE_COLUMNS} FROM evidence WHERE milestone_id=?1 ORDER BY uploaded_at_ms, rowid"
        ))?;
        let rows = stmt.query_map(params![&milestone_id], |row| evidence_from_row(row, bucket))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_evidence(&self, milestone_id: &str) -> Result<usize, StoreError> {
        let milestone_id = milestone_record_id(milestone_id)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM evidence WHERE milestone_id=?1",
            params![&milestone_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
