/*
 * Responsibility
 * - handler が action の前に呼ぶ認可 guard (require_token / require_user / require_service)
 * - 判定は同期・純粋。拒否は AccessError として返し、action は呼ばない
 * - middleware が Claims を extensions に入れている前提。入っていなければ未認証
 */
use axum::http::Extensions;

use crate::error::AccessError;
use crate::services::auth::claims::Claims;

/// Reserved role tag identifying a machine-to-machine caller.
pub const SERVICE_ROLE: &str = "service";

/// Identity constraints for [`require_user`].
///
/// `None` means "do not check this", which is different from a constraint
/// that is present but unmet. With no constraints at all only token presence
/// is enforced; opt into that deliberately.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRequirement<'a> {
    pub user_id: Option<i64>,
    pub subject: Option<&'a str>,
    pub allow_service: bool,
}

impl<'a> UserRequirement<'a> {
    /// Require the caller's `uid` to equal `user_id`.
    pub fn id(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Require the caller's `sub` to equal `subject`.
    pub fn named(subject: &'a str) -> Self {
        Self {
            subject: Some(subject),
            ..Self::default()
        }
    }

    /// Also let callers with the `service` role through, skipping the
    /// identity checks. Widens access only; callers without the role still
    /// go through the normal checks.
    pub fn allow_service(mut self) -> Self {
        self.allow_service = true;
        self
    }
}

fn attached(ext: &Extensions) -> Result<&Claims, AccessError> {
    ext.get::<Claims>().ok_or(AccessError::Unauthenticated)
}

/// Run `action` only if the request carries verified claims.
///
/// The base guard; the other guards build on this presence check. The
/// action's own result comes back untouched.
pub fn require_token<T>(ext: &Extensions, action: impl FnOnce() -> T) -> Result<T, AccessError> {
    attached(ext)?;

    Ok(action())
}

/// Run `action` only if the caller matches the given identity constraints.
///
/// Check order is fixed: service bypass, then `user_id`, then `subject`.
/// The first failing check wins; later ones are not evaluated.
pub fn require_user<T>(
    ext: &Extensions,
    who: UserRequirement<'_>,
    action: impl FnOnce() -> T,
) -> Result<T, AccessError> {
    let claims = attached(ext)?;

    if who.allow_service && claims.has_role(SERVICE_ROLE) {
        return Ok(action());
    }

    if let Some(user_id) = who.user_id {
        if claims.user_id() != Some(user_id) {
            return Err(AccessError::PermissionDenied);
        }
    }

    if let Some(subject) = who.subject {
        if claims.subject() != Some(subject) {
            return Err(AccessError::PermissionDenied);
        }
    }

    Ok(action())
}

/// Run `action` only for machine-to-machine callers (role `service`).
pub fn require_service<T>(ext: &Extensions, action: impl FnOnce() -> T) -> Result<T, AccessError> {
    let claims = attached(ext)?;

    if !claims.has_role(SERVICE_ROLE) {
        return Err(AccessError::PermissionDenied);
    }

    Ok(action())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn anonymous() -> Extensions {
        Extensions::new()
    }

    fn with_claims(payload: Value) -> Extensions {
        let mut ext = Extensions::new();
        ext.insert(Claims::new(payload.as_object().cloned().expect("object payload")));
        ext
    }

    fn service_token() -> Extensions {
        with_claims(json!({ "sub": "courier-posts", "roles": ["service"] }))
    }

    mod require_token {
        use super::*;

        #[test]
        fn denies_an_anonymous_request_without_running_the_action() {
            let mut called = false;

            let result = require_token(&anonymous(), || called = true);

            assert_eq!(result, Err(AccessError::Unauthenticated));
            assert!(!called);
        }

        #[test]
        fn returns_the_action_result_for_any_claims() {
            let result = require_token(&with_claims(json!({})), || "hello");
            assert_eq!(result, Ok("hello"));
        }
    }

    mod require_user {
        use super::*;

        #[test]
        fn denies_an_anonymous_request() {
            let result = require_user(&anonymous(), UserRequirement::id(123), || "hello");
            assert_eq!(result, Err(AccessError::Unauthenticated));
        }

        #[test]
        fn denies_a_token_for_a_different_user_id() {
            let ext = with_claims(json!({ "uid": 134 }));

            let mut called = false;
            let result = require_user(&ext, UserRequirement::id(123), || called = true);

            assert_eq!(result, Err(AccessError::PermissionDenied));
            assert!(!called);
        }

        #[test]
        fn permits_a_token_for_the_user_id() {
            let ext = with_claims(json!({ "uid": 123 }));

            let result = require_user(&ext, UserRequirement::id(123), || "hello");
            assert_eq!(result, Ok("hello"));
        }

        #[test]
        fn denies_a_token_without_a_uid_claim() {
            let ext = with_claims(json!({ "sub": "example" }));

            let result = require_user(&ext, UserRequirement::id(123), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn denies_a_service_token_unless_allowed() {
            let result = require_user(&service_token(), UserRequirement::id(123), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn permits_a_service_token_when_allowed() {
            let result = require_user(
                &service_token(),
                UserRequirement::id(123).allow_service(),
                || "hello",
            );
            assert_eq!(result, Ok("hello"));
        }

        #[test]
        fn allow_service_still_permits_the_matching_user() {
            let ext = with_claims(json!({ "uid": 123 }));

            let result = require_user(&ext, UserRequirement::id(123).allow_service(), || "hello");
            assert_eq!(result, Ok("hello"));
        }

        #[test]
        fn allow_service_does_not_widen_access_without_the_role() {
            let ext = with_claims(json!({ "uid": 134 }));

            let result = require_user(&ext, UserRequirement::id(123).allow_service(), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn denies_a_token_for_a_different_subject() {
            let ext = with_claims(json!({ "sub": "example2" }));

            let result = require_user(&ext, UserRequirement::named("example"), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn permits_a_token_for_the_subject() {
            let ext = with_claims(json!({ "sub": "example" }));

            let result = require_user(&ext, UserRequirement::named("example"), || "hello");
            assert_eq!(result, Ok("hello"));
        }

        #[test]
        fn subject_comparison_is_case_sensitive() {
            let ext = with_claims(json!({ "sub": "Example" }));

            let result = require_user(&ext, UserRequirement::named("example"), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn denies_a_service_token_on_subject_checks_unless_allowed() {
            let result =
                require_user(&service_token(), UserRequirement::named("example"), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn permits_a_service_token_on_subject_checks_when_allowed() {
            let result = require_user(
                &service_token(),
                UserRequirement::named("example").allow_service(),
                || "hello",
            );
            assert_eq!(result, Ok("hello"));
        }

        #[test]
        fn combined_constraints_must_both_pass() {
            let ext = with_claims(json!({ "uid": 123, "sub": "example" }));

            let both = UserRequirement {
                user_id: Some(123),
                subject: Some("example"),
                allow_service: false,
            };
            assert_eq!(require_user(&ext, both, || "hello"), Ok("hello"));

            let wrong_subject = UserRequirement {
                subject: Some("example2"),
                ..both
            };
            assert_eq!(
                require_user(&ext, wrong_subject, || "hello"),
                Err(AccessError::PermissionDenied)
            );

            let wrong_id = UserRequirement {
                user_id: Some(134),
                ..both
            };
            assert_eq!(
                require_user(&ext, wrong_id, || "hello"),
                Err(AccessError::PermissionDenied)
            );
        }

        #[test]
        fn no_constraints_only_checks_token_presence() {
            let ext = with_claims(json!({ "uid": 999 }));

            let result = require_user(&ext, UserRequirement::default(), || "hello");
            assert_eq!(result, Ok("hello"));
        }
    }

    mod require_service {
        use super::*;

        #[test]
        fn denies_an_anonymous_request() {
            let result = require_service(&anonymous(), || "hello");
            assert_eq!(result, Err(AccessError::Unauthenticated));
        }

        #[test]
        fn denies_a_token_without_the_service_role() {
            let ext = with_claims(json!({ "sub": "example", "roles": ["foo"] }));

            let mut called = false;
            let result = require_service(&ext, || called = true);

            assert_eq!(result, Err(AccessError::PermissionDenied));
            assert!(!called);
        }

        #[test]
        fn denies_a_token_with_no_roles_at_all() {
            let result = require_service(&with_claims(json!({})), || "hello");
            assert_eq!(result, Err(AccessError::PermissionDenied));
        }

        #[test]
        fn permits_a_token_with_the_service_role() {
            let result = require_service(&service_token(), || "hello");
            assert_eq!(result, Ok("hello"));
        }
    }
}
