#![forbid(unsafe_code)]

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value.trim() {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Pipe-joined labels, used in validation messages.
            pub fn labels() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("|")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod dates;
pub mod lifecycle;
pub mod progress;

pub mod ids {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum RecordKind {
        Organization,
        User,
        Project,
        PurchaseOrder,
        Milestone,
        Evidence,
        Schedule,
        Activity,
        VendorToken,
        MilestoneTemplate,
    }

    impl RecordKind {
        pub fn prefix(self) -> &'static str {
            match self {
                RecordKind::Organization => "ORG",
                RecordKind::User => "USR",
                RecordKind::Project => "PRJ",
                RecordKind::PurchaseOrder => "PO",
                RecordKind::Milestone => "MS",
                RecordKind::Evidence => "EV",
                RecordKind::Schedule => "SCH",
                RecordKind::Activity => "ACT",
                RecordKind::VendorToken => "VT",
                RecordKind::MilestoneTemplate => "TPL",
            }
        }

        /// Name of the per-kind id counter.
        pub fn counter(self) -> &'static str {
            match self {
                RecordKind::Organization => "organization",
                RecordKind::User => "user",
                RecordKind::Project => "project",
                RecordKind::PurchaseOrder => "purchase_order",
                RecordKind::Milestone => "milestone",
                RecordKind::Evidence => "evidence",
                RecordKind::Schedule => "schedule",
                RecordKind::Activity => "activity",
                RecordKind::VendorToken => "vendor_token",
                RecordKind::MilestoneTemplate => "milestone_template",
            }
        }

        pub fn format(self, seq: i64) -> String {
            format!("{}-{:03}", self.prefix(), seq)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct RecordId {
        kind: RecordKind,
        value: String,
    }

    impl RecordId {
        pub fn as_str(&self) -> &str {
            &self.value
        }

        pub fn kind(&self) -> RecordKind {
            self.kind
        }

        pub fn into_string(self) -> String {
            self.value
        }

        pub fn parse(kind: RecordKind, value: &str) -> Result<Self, RecordIdError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(RecordIdError::Empty {
                    prefix: kind.prefix(),
                });
            }
            let digits = value
                .strip_prefix(kind.prefix())
                .and_then(|rest| rest.strip_prefix('-'))
                .ok_or(RecordIdError::InvalidFormat {
                    prefix: kind.prefix(),
                })?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RecordIdError::InvalidFormat {
                    prefix: kind.prefix(),
                });
            }
            Ok(Self {
                kind,
                value: value.to_string(),
            })
        }
    }

    impl std::fmt::Display for RecordId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.value)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
    pub enum RecordIdError {
        #[error("{prefix} id must not be empty")]
        Empty { prefix: &'static str },
        #[error("id must look like {prefix}-<number>")]
        InvalidFormat { prefix: &'static str },
    }
}

pub mod model {
    string_enum! {
        OrganizationType {
            Client => "client",
            Vendor => "vendor",
            Contractor => "contractor",
            Consultant => "consultant",
        }
    }

    string_enum! {
        UserRole {
            Admin => "admin",
            ProjectManager => "project_manager",
            Vendor => "vendor",
            Client => "client",
            Consultant => "consultant",
        }
    }

    impl UserRole {
        pub fn can_review(self) -> bool {
            matches!(self, UserRole::Admin | UserRole::ProjectManager)
        }
    }

    string_enum! {
        ProjectStatus {
            Planning => "planning",
            Active => "active",
            OnHold => "on_hold",
            Completed => "completed",
            Cancelled => "cancelled",
        }
    }

    string_enum! {
        PurchaseOrderStatus {
            Draft => "draft",
            Issued => "issued",
            Acknowledged => "acknowledged",
            InProgress => "in_progress",
            Completed => "completed",
            Cancelled => "cancelled",
        }
    }

    string_enum! {
        /// Stored milestone status. `Overdue` is accepted from older rows; the
        /// display status is derived by `progress::effective_status`.
        MilestoneStatus {
            Pending => "pending",
            InProgress => "in_progress",
            Completed => "completed",
            PendingCompletionReview => "pending_completion_review",
            Approved => "approved",
            Rejected => "rejected",
            Overdue => "overdue",
        }
    }

    string_enum! {
        ScheduleStatus {
            Draft => "draft",
            Active => "active",
            Completed => "completed",
        }
    }

    string_enum! {
        ActivityType {
            Task => "task",
            Milestone => "milestone",
            Summary => "summary",
        }
    }

    string_enum! {
        ActivityStatus {
            NotStarted => "not_started",
            InProgress => "in_progress",
            Completed => "completed",
        }
    }
}
