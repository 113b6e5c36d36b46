//! Authorization policies.
//!
//! A policy is a named rule evaluated against the authenticated identity
//! and, for ownership checks, the id of the record being touched.

use crate::api::error::ApiError;
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Only ADMIN callers.
    AdminOnly,
    /// The user whose record is being touched, or an ADMIN.
    SelfOrAdmin { owner_id: i64 },
    /// Any authenticated caller.
    Open,
}

impl Policy {
    /// Evaluate the policy. Denials carry the call site's message, since the
    /// endpoints keep their distinct historical wording.
    pub fn authorize(self, user: &User, detail: &'static str) -> Result<(), ApiError> {
        let allowed = match self {
            Policy::AdminOnly => user.role.is_admin(),
            Policy::SelfOrAdmin { owner_id } => user.id == owner_id || user.role.is_admin(),
            Policy::Open => true,
        };

        if allowed {
            Ok(())
        } else {
            Err(ApiError::Forbidden(detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_only() {
        let admin = user(1, UserRole::Admin);
        let writer = user(2, UserRole::Writer);

        assert!(Policy::AdminOnly.authorize(&admin, "Not allowed").is_ok());
        assert!(Policy::AdminOnly.authorize(&writer, "Not allowed").is_err());
    }

    #[test]
    fn test_self_or_admin() {
        let admin = user(1, UserRole::Admin);
        let writer = user(2, UserRole::Writer);

        let own_record = Policy::SelfOrAdmin { owner_id: 2 };
        let other_record = Policy::SelfOrAdmin { owner_id: 3 };

        assert!(own_record.authorize(&writer, "Not allowed").is_ok());
        assert!(other_record.authorize(&writer, "Not allowed").is_err());

        // An admin passes ownership checks on anyone's record
        assert!(other_record.authorize(&admin, "Not allowed").is_ok());
    }

    #[test]
    fn test_open_allows_everyone() {
        let writer = user(2, UserRole::Writer);
        assert!(Policy::Open.authorize(&writer, "Not allowed").is_ok());
    }

    #[test]
    fn test_denial_keeps_call_site_message() {
        let writer = user(2, UserRole::Writer);
        let err = Policy::AdminOnly
            .authorize(&writer, "Not enough permissions")
            .unwrap_err();

        match err {
            ApiError::Forbidden(detail) => assert_eq!(detail, "Not enough permissions"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }
}
