//! Two-column board of Admins and Lawyers
//!
//! Dragging a member between columns reclassifies their role. The board
//! never lets the last Admin be dragged out of the Admin column.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{authorize, Action, GateContext};
use crate::errors::{CaseflowError, Result};
use crate::schemas::{Actor, StaffUser, UserRole};
use crate::store::UserStore;

use super::as_transport;

/// A column of the role board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSet {
    Admins,
    Lawyers,
}

impl BoardSet {
    /// Role carried by members of this column
    pub fn role(self) -> UserRole {
        match self {
            BoardSet::Admins => UserRole::Admin,
            BoardSet::Lawyers => UserRole::Lawyer,
        }
    }
}

impl fmt::Display for BoardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardSet::Admins => write!(f, "Admins"),
            BoardSet::Lawyers => write!(f, "Lawyers"),
        }
    }
}

impl FromStr for BoardSet {
    type Err = CaseflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admins" | "admin" => Ok(BoardSet::Admins),
            "lawyers" | "lawyer" => Ok(BoardSet::Lawyers),
            other => Err(CaseflowError::validation(format!("unknown board column: {}", other))),
        }
    }
}

pub struct RoleBoard {
    admins: Vec<StaffUser>,
    lawyers: Vec<StaffUser>,
    users: Arc<dyn UserStore>,
}

impl RoleBoard {
    /// Split a staff roster into the two columns. Paralegals and Staff are
    /// not on the board.
    pub fn from_roster(roster: &[StaffUser], users: Arc<dyn UserStore>) -> Self {
        let column = |role: UserRole| -> Vec<StaffUser> {
            roster.iter().filter(|u| u.user_role == role).cloned().collect()
        };
        RoleBoard {
            admins: column(UserRole::Admin),
            lawyers: column(UserRole::Lawyer),
            users,
        }
    }

    /// Load the roster from the store and build the board
    pub async fn load(users: Arc<dyn UserStore>) -> Result<Self> {
        let roster = users.list_users().await.map_err(as_transport)?;
        Ok(Self::from_roster(&roster, users))
    }

    pub fn admins(&self) -> &[StaffUser] {
        &self.admins
    }

    pub fn lawyers(&self) -> &[StaffUser] {
        &self.lawyers
    }

    fn column(&self, set: BoardSet) -> &[StaffUser] {
        match set {
            BoardSet::Admins => &self.admins,
            BoardSet::Lawyers => &self.lawyers,
        }
    }

    fn column_mut(&mut self, set: BoardSet) -> &mut Vec<StaffUser> {
        match set {
            BoardSet::Admins => &mut self.admins,
            BoardSet::Lawyers => &mut self.lawyers,
        }
    }

    fn check_last_admin(&self, from: BoardSet, to: BoardSet) -> Result<()> {
        if from == BoardSet::Admins && to == BoardSet::Lawyers && self.admins.len() == 1 {
            return Err(CaseflowError::LastAdminViolation(
                "at least one Admin must remain".to_string(),
            ));
        }
        Ok(())
    }

    /// Move `user_id` from one column to the other, persisting the new role
    /// before the board changes.
    pub async fn reclassify(
        &mut self,
        user_id: &str,
        from: BoardSet,
        to: BoardSet,
        actor: &Actor,
    ) -> Result<()> {
        authorize(
            actor,
            Action::ReclassifyRole,
            &GateContext::for_board(!self.admins.is_empty()),
        )?;
        if let Err(e) = self.check_last_admin(from, to) {
            tracing::warn!(user_id, actor = %actor.user_id, "refused to remove the last Admin");
            return Err(e);
        }
        if from == to {
            return Err(CaseflowError::validation(format!("{} is already in {}", user_id, to)));
        }
        let index = self
            .column(from)
            .iter()
            .position(|u| u.user_id == user_id)
            .ok_or_else(|| CaseflowError::validation(format!("{} is not in {}", user_id, from)))?;

        // Re-validated immediately before the write. Nothing after a
        // successful write can fail, so the store and board stay in step.
        self.check_last_admin(from, to)?;
        let role = to.role();
        self.users
            .update_user_role(user_id, role)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "role update failed");
                as_transport(e)
            })?;

        let source = self.column_mut(from);
        let member = source.remove(index).with_role(role);
        self.column_mut(to).push(member);

        tracing::info!(user_id, %from, %to, actor = %actor.user_id, "role reclassified");
        Ok(())
    }
}
