#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS milestone_templates (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL UNIQUE COLLATE NOCASE,
          description TEXT,
          default_weight_percentage REAL NOT NULL
            CHECK(default_weight_percentage > 0 AND default_weight_percentage <= 100),
          default_evidence_required INTEGER NOT NULL DEFAULT 1,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS milestones (
          id TEXT PRIMARY KEY,
          project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          purchase_order_id TEXT REFERENCES purchase_orders(id) ON DELETE SET NULL,
          name TEXT NOT NULL,
          description TEXT,
          weight_percentage REAL NOT NULL CHECK(weight_percentage > 0 AND weight_percentage <= 100),
          completion_percentage REAL NOT NULL DEFAULT 0
            CHECK(completion_percentage >= 0 AND completion_percentage <= 100),
          status TEXT NOT NULL,
          due_date TEXT,
          completed_date TEXT,
          vendor_notes TEXT,
          rejection_reason TEXT,
          evidence_required INTEGER NOT NULL DEFAULT 1,
          revision INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          template_id TEXT REFERENCES milestone_templates(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS milestone_events (
          seq INTEGER PRIMARY KEY AUTOINCREMENT,
          milestone_id TEXT NOT NULL REFERENCES milestones(id) ON DELETE CASCADE,
          ts_ms INTEGER NOT NULL,
          event_type TEXT NOT NULL,
          actor TEXT,
          payload_json TEXT NOT NULL
        );
"#;
