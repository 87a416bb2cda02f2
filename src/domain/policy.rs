//! Authorization rules for user records.

use serde_json::json;

use crate::domain::entities::User;
use crate::error::AppError;

/// Actions an authenticated user may attempt on user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
}

impl UserAction {
    fn as_str(self) -> &'static str {
        match self {
            UserAction::ViewAny => "view_any",
            UserAction::View => "view",
            UserAction::Create => "create",
            UserAction::Update => "update",
            UserAction::Delete => "delete",
            UserAction::Restore => "restore",
            UserAction::ForceDelete => "force_delete",
        }
    }
}

/// Decides whether `actor_id` may perform `action` on `target`.
///
/// Listing, viewing and creating are open to any authenticated user; a user
/// may only update or delete their own record. Restore and force-delete are
/// never allowed.
pub struct UserPolicy;

impl UserPolicy {
    pub fn allows(actor_id: i64, action: UserAction, target: Option<&User>) -> bool {
        match action {
            UserAction::ViewAny | UserAction::View | UserAction::Create => true,
            UserAction::Update | UserAction::Delete => target.is_some_and(|t| t.id == actor_id),
            UserAction::Restore | UserAction::ForceDelete => false,
        }
    }

    /// Like [`UserPolicy::allows`], but returns [`AppError::Forbidden`] on denial.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the action is not allowed.
    pub fn authorize(actor_id: i64, action: UserAction, target: Option<&User>) -> Result<(), AppError> {
        if Self::allows(actor_id, action, target) {
            return Ok(());
        }

        Err(AppError::forbidden(
            "This action is unauthorized.",
            json!({ "action": action.as_str(), "user_id": target.map(|t| t.id) }),
        ))
    }
}
