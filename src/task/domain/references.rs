//! Read-only records the importer resolves references against.

use super::{CompanyId, ProjectCode, ProjectId, StageId, UserId};
use serde::{Deserialize, Serialize};

/// A project reachable by its commessa code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project identifier.
    pub id: ProjectId,
    /// Commessa code.
    pub code: ProjectCode,
    /// Project display name.
    pub name: String,
    /// Stage new tasks of this project start in, if configured.
    pub default_stage: Option<StageId>,
}

/// A user tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User identifier.
    pub id: UserId,
    /// Display name as written in the spreadsheet.
    pub name: String,
}

/// A company or contact partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    /// Partner identifier.
    pub id: CompanyId,
    /// Partner display name.
    pub name: String,
}
