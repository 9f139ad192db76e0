#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS project_schedules (
          id TEXT PRIMARY KEY,
          project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          description TEXT,
          start_date TEXT,
          end_date TEXT,
          status TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schedule_activities (
          id TEXT PRIMARY KEY,
          schedule_id TEXT NOT NULL REFERENCES project_schedules(id) ON DELETE CASCADE,
          ordinal INTEGER NOT NULL,
          name TEXT NOT NULL,
          description TEXT,
          activity_type TEXT NOT NULL,
          start_date TEXT,
          end_date TEXT,
          duration_days INTEGER,
          progress_percentage REAL NOT NULL DEFAULT 0
            CHECK(progress_percentage >= 0 AND progress_percentage <= 100),
          status TEXT NOT NULL,
          UNIQUE(schedule_id, ordinal)
        );
"#;
