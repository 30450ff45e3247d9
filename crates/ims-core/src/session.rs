//! Acting identity for a workflow run.

use serde::{Deserialize, Serialize};

use crate::identity::{IncubatorId, UserId};

/// Who is performing an operation and on behalf of which incubator.
///
/// Passed explicitly into clients and workflows. The user id is stamped
/// into `createdBy`/`modifiedBy` fields and the incubator id scopes list
/// queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// The acting user.
    pub user_id: UserId,
    /// The tenant whose data is read and written.
    pub incubator_id: IncubatorId,
}

impl SessionContext {
    /// Build a session context from its two identifiers.
    pub fn new(user_id: UserId, incubator_id: IncubatorId) -> Self {
        Self {
            user_id,
            incubator_id,
        }
    }
}
