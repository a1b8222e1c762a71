use derive_more::Display as DisplayMore;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, IntoStaticStr, Serialize, Deserialize, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Accountant,
    Admin,
}

impl Role {
    /// Session role strings are case-sensitive. Anything unrecognised gets
    /// the least privileged role.
    pub fn from_session(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(role = value, "Unknown session role, treating as employee");
            Role::Employee
        })
    }

    /// May bypass the pending queue and decide on pending entities.
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// May work with payroll, payments, cheques and reports.
    pub fn handles_finance(self) -> bool {
        matches!(self, Role::Accountant | Role::Manager | Role::Admin)
    }
}

/// Who is performing an operation. Passed explicitly into every workflow
/// call.
#[derive(Debug, Clone, PartialEq, Eq, DisplayMore)]
#[display(fmt = "{} ({})", username, role)]
pub struct Actor {
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn require_manager_or_admin(&self, action: &str) -> AppResult<()> {
        if self.role.is_elevated() {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Access denied: only managers can {action}"
            )))
        }
    }

    pub fn require_finance(&self, action: &str) -> AppResult<()> {
        if self.role.handles_finance() {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Access denied: employees cannot {action}"
            )))
        }
    }
}
