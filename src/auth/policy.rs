//! Access policies applied at mutation sites.
//!
//! Both checks run per request against the freshly attached principal;
//! nothing here caches a past authorization decision.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{Principal, Role};

/// Require the principal to hold at least the given role. Admin passes
/// every check. Failure is `Forbidden`, distinct from the `Unauthorized`
/// of token failure.
pub fn require_role(principal: &Principal, required: Role) -> AppResult<()> {
    if principal.role.grants(required) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "Requires {} role",
        required.as_str()
    )))
}

/// The owner-or-admin rule for mutating user-owned content: allowed when
/// the principal owns the resource or holds the admin role. Checked before
/// any write is attempted.
pub fn require_owner_or_admin(principal: &Principal, owner_id: Uuid) -> AppResult<()> {
    if principal.id == owner_id || principal.role.is_admin() {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You are not allowed to modify this resource".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            role,
        }
    }

    #[test]
    fn test_user_role_never_passes_admin_check() {
        let p = principal(Role::User);
        assert!(matches!(
            require_role(&p, Role::Admin),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_passes_any_role_check() {
        let p = principal(Role::Admin);
        for required in [Role::User, Role::Contributor, Role::Admin] {
            assert!(require_role(&p, required).is_ok());
        }
    }

    #[test]
    fn test_owner_succeeds_regardless_of_role() {
        let p = principal(Role::User);
        assert!(require_owner_or_admin(&p, p.id).is_ok());
    }

    #[test]
    fn test_non_owner_non_admin_is_forbidden() {
        let p = principal(Role::Contributor);
        assert!(matches!(
            require_owner_or_admin(&p, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_non_owner_admin_succeeds() {
        let p = principal(Role::Admin);
        assert!(require_owner_or_admin(&p, Uuid::new_v4()).is_ok());
    }
}
