//! HTTP side of the ownership guard
//!
//! Maps the request method onto `Access` and turns a denial into 403.
//! Handlers call this after fetching the object, so a missing object is
//! always reported as 404 first.

use axum::http::Method;
use geopin_core::{is_write_allowed, Access, Ownable};

use super::error::ApiError;
use crate::db::User;

/// GET/HEAD/OPTIONS/TRACE read; everything else writes.
pub fn access_for(method: &Method) -> Access {
    if method.is_safe() {
        Access::Read
    } else {
        Access::Write
    }
}

/// Reject the request unless `actor` may use `method` on `object`.
pub fn authorize<O: Ownable + ?Sized>(
    method: &Method,
    actor: Option<&User>,
    object: &O,
) -> Result<(), ApiError> {
    let access = access_for(method);
    let actor_id = actor.map(|u| u.id);

    if is_write_allowed(access, actor_id, object) {
        return Ok(());
    }

    tracing::info!(
        method = %method,
        actor = ?actor_id,
        owner = ?object.owner_id(),
        "ownership guard denied request"
    );
    Err(ApiError::Forbidden {
        reason: "You do not have permission to perform this action.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geopin_core::UserId;

    fn user(id: i64) -> User {
        User {
            id: UserId(id),
            username: format!("u{id}"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    struct Thing(UserId);

    impl Ownable for Thing {
        fn owner_id(&self) -> Option<UserId> {
            Some(self.0)
        }
    }

    #[test]
    fn method_mapping() {
        assert_eq!(access_for(&Method::GET), Access::Read);
        assert_eq!(access_for(&Method::HEAD), Access::Read);
        assert_eq!(access_for(&Method::OPTIONS), Access::Read);
        assert_eq!(access_for(&Method::PATCH), Access::Write);
        assert_eq!(access_for(&Method::PUT), Access::Write);
        assert_eq!(access_for(&Method::DELETE), Access::Write);
    }

    #[test]
    fn stranger_patch_is_forbidden() {
        let err = authorize(&Method::PATCH, Some(&user(2)), &Thing(UserId(1))).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
    }

    #[test]
    fn stranger_get_is_fine() {
        assert!(authorize(&Method::GET, Some(&user(2)), &Thing(UserId(1))).is_ok());
        assert!(authorize(&Method::GET, None, &Thing(UserId(1))).is_ok());
    }

    #[test]
    fn owner_delete_is_fine() {
        assert!(authorize(&Method::DELETE, Some(&user(1)), &Thing(UserId(1))).is_ok());
    }
}
