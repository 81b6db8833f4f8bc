/// Kind of cached presentation view that a mutation can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The per-user list of projects.
    ProjectList,
    /// A single project page (tickets, members, settings).
    Project,
    /// A single ticket page (fields and comments).
    Ticket,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectList => "project_list",
            Self::Project => "project",
            Self::Ticket => "ticket",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
