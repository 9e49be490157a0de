/// Authorization engine: role and ownership checks
///
/// All role-check logic lives here instead of being re-derived per endpoint.
/// There are two granularities:
///
/// - **View-level**: may the caller reach this endpoint at all? Only the
///   user-listing endpoint is gated this way ([`can_administer`] /
///   [`require_admin`]), and a denial is reported as *forbidden*.
/// - **Object-level**: may the caller touch this specific task?
///   ([`can_access`] / [`require_task_access`]). A denial here is reported
///   as *not found*, so callers cannot probe for the existence of other
///   users' tasks. The scoped queries in [`crate::models::task`] enforce the
///   same rule at the SQL layer; these predicates are the in-memory
///   counterpart.
///
/// Decisions are recomputed on every request and never stored.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::authorization::{can_access, can_administer};
/// use taskboard_shared::auth::middleware::CurrentUser;
/// use taskboard_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let admin = CurrentUser { id: Uuid::new_v4(), role: UserRole::Admin };
/// assert!(can_administer(&admin));
///
/// let user = CurrentUser { id: Uuid::new_v4(), role: UserRole::User };
/// assert!(!can_administer(&user));
/// ```

use uuid::Uuid;

use super::middleware::CurrentUser;
use crate::models::task::Task;

/// Denial message for the admin-only user listing
pub const ADMIN_ONLY_MESSAGE: &str = "Access restricted to admin users only.";

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is authenticated but not an admin (view-level denial)
    #[error("{ADMIN_ONLY_MESSAGE}")]
    AdminOnly,

    /// Caller may not touch this task (object-level denial)
    ///
    /// Deliberately indistinguishable from the task not existing.
    #[error("Task not found")]
    NotVisible(Uuid),
}

/// Outcome of an access check, with an optional denial reason
///
/// Computed per (actor, action, resource) triple; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the action is permitted
    pub allowed: bool,

    /// Human-readable reason, present only on denial
    pub reason: Option<String>,
}

impl AccessDecision {
    /// An allowing decision
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A denying decision with a reason
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Checks whether the actor may use administrative views
///
/// True iff the actor's role is admin. Gates the user-listing endpoint.
pub fn can_administer(actor: &CurrentUser) -> bool {
    actor.role.is_admin()
}

/// Checks whether the actor may access a specific task
///
/// Admins access any task unconditionally; everyone else only their own.
pub fn can_access(actor: &CurrentUser, task: &Task) -> bool {
    actor.role.is_admin() || task.owner_id == actor.id
}

/// Decides administrative access, carrying the denial reason
pub fn administer_decision(actor: &CurrentUser) -> AccessDecision {
    if can_administer(actor) {
        AccessDecision::allow()
    } else {
        AccessDecision::deny(ADMIN_ONLY_MESSAGE)
    }
}

/// Requires administrative access
///
/// # Errors
///
/// Returns `AuthzError::AdminOnly` for non-admin actors; callers map this to
/// HTTP 403 with the fixed denial message.
pub fn require_admin(actor: &CurrentUser) -> Result<(), AuthzError> {
    if administer_decision(actor).allowed {
        Ok(())
    } else {
        Err(AuthzError::AdminOnly)
    }
}

/// Requires object-level access to a task
///
/// # Errors
///
/// Returns `AuthzError::NotVisible` when the actor may not touch the task;
/// callers map this to HTTP 404, the same outcome as a missing task.
pub fn require_task_access(actor: &CurrentUser, task: &Task) -> Result<(), AuthzError> {
    if !can_access(actor, task) {
        return Err(AuthzError::NotVisible(task.id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;

    fn actor(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
        }
    }

    fn task_owned_by(owner_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Finish report".to_string(),
            description: String::new(),
            completed: false,
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_can_administer() {
        assert!(can_administer(&actor(UserRole::Admin)));
        assert!(require_admin(&actor(UserRole::Admin)).is_ok());
    }

    #[test]
    fn test_regular_user_cannot_administer() {
        let user = actor(UserRole::User);
        assert!(!can_administer(&user));
        assert!(matches!(require_admin(&user), Err(AuthzError::AdminOnly)));
    }

    #[test]
    fn test_admin_only_denial_message() {
        let err = require_admin(&actor(UserRole::User)).unwrap_err();
        assert_eq!(err.to_string(), "Access restricted to admin users only.");

        let decision = administer_decision(&actor(UserRole::User));
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Access restricted to admin users only.")
        );
    }

    #[test]
    fn test_administer_decision_allows_admin() {
        let decision = administer_decision(&actor(UserRole::Admin));
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_owner_can_access_own_task() {
        let user = actor(UserRole::User);
        let task = task_owned_by(user.id);

        assert!(can_access(&user, &task));
        assert!(require_task_access(&user, &task).is_ok());
    }

    #[test]
    fn test_non_owner_cannot_access_foreign_task() {
        let user = actor(UserRole::User);
        let task = task_owned_by(Uuid::new_v4());

        assert!(!can_access(&user, &task));
        assert!(matches!(
            require_task_access(&user, &task),
            Err(AuthzError::NotVisible(_))
        ));
    }

    #[test]
    fn test_admin_can_access_any_task() {
        let admin = actor(UserRole::Admin);

        // Several foreign tasks, all accessible
        for _ in 0..3 {
            let task = task_owned_by(Uuid::new_v4());
            assert!(can_access(&admin, &task));
            assert!(require_task_access(&admin, &task).is_ok());
        }
    }

    #[test]
    fn test_object_denial_reads_as_not_found() {
        let user = actor(UserRole::User);
        let task = task_owned_by(Uuid::new_v4());

        let err = require_task_access(&user, &task).unwrap_err();
        // The message must not hint that the task exists but is forbidden
        assert_eq!(err.to_string(), "Task not found");
    }
}
