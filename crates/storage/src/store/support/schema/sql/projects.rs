#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS projects (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          description TEXT,
          client_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE RESTRICT,
          project_manager_id TEXT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
          vendor_id TEXT REFERENCES organizations(id) ON DELETE SET NULL,
          status TEXT NOT NULL,
          start_date TEXT,
          end_date TEXT,
          budget REAL,
          currency TEXT NOT NULL DEFAULT 'USD',
          revision INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK(start_date IS NULL OR end_date IS NULL OR end_date > start_date),
          CHECK(budget IS NULL OR budget >= 0)
        );

        CREATE TABLE IF NOT EXISTS purchase_orders (
          id TEXT PRIMARY KEY,
          po_number TEXT NOT NULL UNIQUE,
          project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          vendor_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE RESTRICT,
          title TEXT NOT NULL,
          description TEXT,
          total_amount REAL NOT NULL CHECK(total_amount >= 0),
          currency TEXT NOT NULL DEFAULT 'USD',
          status TEXT NOT NULL,
          issue_date TEXT,
          expected_delivery_date TEXT,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
"#;
