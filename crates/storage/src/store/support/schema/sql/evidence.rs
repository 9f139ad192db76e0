#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS evidence (
          id TEXT PRIMARY KEY,
          milestone_id TEXT NOT NULL REFERENCES milestones(id) ON DELETE CASCADE,
          file_name TEXT NOT NULL,
          file_path TEXT NOT NULL UNIQUE,
          mime_type TEXT NOT NULL,
          file_size INTEGER NOT NULL,
          description TEXT,
          uploaded_by TEXT NOT NULL,
          uploaded_at_ms INTEGER NOT NULL
        );
"#;
