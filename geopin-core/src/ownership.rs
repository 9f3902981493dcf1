//! Ownership guard
//!
//! Reads are open to everyone. Writes are limited to the user who owns the
//! object: the creator of a point, the author of a message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of access a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// GET, HEAD, OPTIONS
    Read,
    /// Anything that mutates
    Write,
}

/// Something with an owning user.
pub trait Ownable {
    /// Owner of the object, or `None` if it has no owner at all.
    fn owner_id(&self) -> Option<UserId>;
}

impl<T: Ownable + ?Sized> Ownable for &T {
    fn owner_id(&self) -> Option<UserId> {
        (**self).owner_id()
    }
}

/// Decide whether `actor` may perform `access` on `object`.
///
/// Fails closed: a write with no actor, or on an object without an owner,
/// is denied.
pub fn is_write_allowed<O: Ownable + ?Sized>(
    access: Access,
    actor: Option<UserId>,
    object: &O,
) -> bool {
    match access {
        Access::Read => true,
        Access::Write => match (actor, object.owner_id()) {
            (Some(actor), Some(owner)) => actor == owner,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(Option<UserId>);

    impl Ownable for Owned {
        fn owner_id(&self) -> Option<UserId> {
            self.0
        }
    }

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[test]
    fn reads_always_allowed() {
        let obj = Owned(Some(ALICE));
        assert!(is_write_allowed(Access::Read, Some(BOB), &obj));
        assert!(is_write_allowed(Access::Read, None, &obj));
        assert!(is_write_allowed(Access::Read, None, &Owned(None)));
    }

    #[test]
    fn owner_may_write() {
        assert!(is_write_allowed(Access::Write, Some(ALICE), &Owned(Some(ALICE))));
    }

    #[test]
    fn stranger_may_not_write() {
        assert!(!is_write_allowed(Access::Write, Some(BOB), &Owned(Some(ALICE))));
    }

    #[test]
    fn anonymous_write_denied() {
        assert!(!is_write_allowed(Access::Write, None, &Owned(Some(ALICE))));
    }

    #[test]
    fn ownerless_object_denied() {
        assert!(!is_write_allowed(Access::Write, Some(ALICE), &Owned(None)));
    }

    #[test]
    fn works_through_references() {
        let obj = Owned(Some(ALICE));
        let by_ref = &obj;
        assert!(is_write_allowed(Access::Write, Some(ALICE), &by_ref));
    }
}
