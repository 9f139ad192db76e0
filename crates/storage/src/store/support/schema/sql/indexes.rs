#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status, id);
        CREATE INDEX IF NOT EXISTS idx_purchase_orders_project ON purchase_orders(project_id, id);
        CREATE INDEX IF NOT EXISTS idx_milestones_project ON milestones(project_id, due_date, id);
        CREATE INDEX IF NOT EXISTS idx_milestone_events_milestone ON milestone_events(milestone_id, seq);
        CREATE INDEX IF NOT EXISTS idx_evidence_milestone ON evidence(milestone_id, uploaded_at_ms);
        CREATE INDEX IF NOT EXISTS idx_schedules_project ON project_schedules(project_id, id);
        CREATE INDEX IF NOT EXISTS idx_vendor_tokens_project ON vendor_tokens(project_id);
"#;
