//! Access-control policy values.
//!
//! An item is protected either by a plain [`Accessibility`] level or by an
//! [`AccessControl`] object combining accessibility with an
//! [`AuthenticationPolicy`] (biometric/passcode constraints). Queries may
//! additionally carry an [`AuthenticationUi`] mode or an
//! [`AuthenticationContext`] to control how the store resolves protected
//! matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::keys;
use crate::model::Accessibility;
use crate::status::Status;

/// Biometric/passcode constraints attached to an item's access control.
///
/// Policies are flag sets; combine them with `|`. The `OR` and `AND`
/// flags choose the logic connecting multiple constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticationPolicy(u32);

impl AuthenticationPolicy {
    /// User presence via biometry or passcode. Biometry does not have to
    /// be available or enrolled; the item stays accessible when biometric
    /// enrollment changes.
    pub const USER_PRESENCE: AuthenticationPolicy = AuthenticationPolicy(1 << 0);

    /// Any enrolled biometry. The item stays accessible when enrollment
    /// changes.
    pub const BIOMETRY_ANY: AuthenticationPolicy = AuthenticationPolicy(1 << 1);

    /// The currently enrolled biometry set. The item is invalidated when
    /// enrollment changes.
    pub const BIOMETRY_CURRENT_SET: AuthenticationPolicy = AuthenticationPolicy(1 << 3);

    /// Device passcode.
    pub const DEVICE_PASSCODE: AuthenticationPolicy = AuthenticationPolicy(1 << 4);

    /// At least one constraint must be satisfied.
    pub const OR: AuthenticationPolicy = AuthenticationPolicy(1 << 14);

    /// All constraints must be satisfied.
    pub const AND: AuthenticationPolicy = AuthenticationPolicy(1 << 15);

    /// Access control for private-key operations (signing).
    pub const PRIVATE_KEY_USAGE: AuthenticationPolicy = AuthenticationPolicy(1 << 30);

    /// Application-provided password for additional item encryption. Not
    /// a constraint on its own.
    pub const APPLICATION_PASSWORD: AuthenticationPolicy = AuthenticationPolicy(1 << 31);

    /// Policy with no flags set.
    pub const fn empty() -> AuthenticationPolicy {
        AuthenticationPolicy(0)
    }

    /// Raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a policy from raw flag bits.
    pub const fn from_bits(bits: u32) -> AuthenticationPolicy {
        AuthenticationPolicy(bits)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set in `self`.
    pub const fn contains(self, other: AuthenticationPolicy) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AuthenticationPolicy {
    type Output = AuthenticationPolicy;

    fn bitor(self, rhs: AuthenticationPolicy) -> AuthenticationPolicy {
        AuthenticationPolicy(self.0 | rhs.0)
    }
}

impl BitOrAssign for AuthenticationPolicy {
    fn bitor_assign(&mut self, rhs: AuthenticationPolicy) {
        self.0 |= rhs.0;
    }
}

/// Authentication-UI mode attached to a lookup.
///
/// When absent, the store is free to drive its own authentication UI for
/// protected items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationUi {
    /// Items which would need interactive authentication are silently
    /// skipped during matching.
    Skip,
}

impl AuthenticationUi {
    /// Native call-modifier value.
    pub fn as_raw(self) -> &'static str {
        match self {
            AuthenticationUi::Skip => keys::USE_AUTHENTICATION_UI_SKIP,
        }
    }
}

impl fmt::Display for AuthenticationUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationUi::Skip => f.write_str("skip"),
        }
    }
}

/// Opaque handle to a pre-established platform authentication session.
///
/// Attaching a context to a configuration lets lookups against
/// policy-protected items succeed without fresh user interaction. The
/// session material itself lives inside the platform; this handle only
/// marks that the caller holds one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticationContext {
    _private: (),
}

impl AuthenticationContext {
    pub fn new() -> AuthenticationContext {
        AuthenticationContext::default()
    }
}

/// Access-control object combining accessibility with an authentication
/// policy.
///
/// Construction validates the combination the way the platform does;
/// invalid combinations surface as a [`Status::Param`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    accessibility: Accessibility,
    policy: AuthenticationPolicy,
}

impl AccessControl {
    /// Build an access-control object.
    ///
    /// Fails with [`Status::Param`] when the policy is empty or combines
    /// the mutually exclusive `AND` and `OR` connectors.
    pub fn new(
        accessibility: Accessibility,
        policy: AuthenticationPolicy,
    ) -> Result<AccessControl, Status> {
        if policy.is_empty() {
            return Err(Status::Param);
        }
        if policy.contains(AuthenticationPolicy::AND) && policy.contains(AuthenticationPolicy::OR) {
            return Err(Status::Param);
        }
        Ok(AccessControl {
            accessibility,
            policy,
        })
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn policy(&self) -> AuthenticationPolicy {
        self.policy
    }
}

/// Protection applied to a written item: a plain accessibility level, or
/// a full access-control object when an authentication policy was
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protection {
    Plain(Accessibility),
    Control(AccessControl),
}

impl Protection {
    pub fn accessibility(&self) -> Accessibility {
        match self {
            Protection::Plain(accessibility) => *accessibility,
            Protection::Control(control) => control.accessibility(),
        }
    }

    /// Whether reads of the protected item require user authentication.
    pub fn requires_authentication(&self) -> bool {
        matches!(self, Protection::Control(control) if !control.policy().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_flags_combine() {
        let policy = AuthenticationPolicy::BIOMETRY_ANY | AuthenticationPolicy::DEVICE_PASSCODE;
        assert!(policy.contains(AuthenticationPolicy::BIOMETRY_ANY));
        assert!(policy.contains(AuthenticationPolicy::DEVICE_PASSCODE));
        assert!(!policy.contains(AuthenticationPolicy::USER_PRESENCE));
    }

    #[test]
    fn access_control_rejects_empty_policy() {
        let result = AccessControl::new(Accessibility::WhenUnlocked, AuthenticationPolicy::empty());
        assert_eq!(result, Err(Status::Param));
    }

    #[test]
    fn access_control_rejects_conflicting_connectors() {
        let policy = AuthenticationPolicy::USER_PRESENCE
            | AuthenticationPolicy::AND
            | AuthenticationPolicy::OR;
        let result = AccessControl::new(Accessibility::WhenUnlocked, policy);
        assert_eq!(result, Err(Status::Param));
    }

    #[test]
    fn protection_reports_authentication_requirement() {
        let plain = Protection::Plain(Accessibility::AfterFirstUnlock);
        assert!(!plain.requires_authentication());

        let control = AccessControl::new(
            Accessibility::WhenPasscodeSetThisDeviceOnly,
            AuthenticationPolicy::USER_PRESENCE,
        )
        .unwrap();
        assert!(Protection::Control(control).requires_authentication());
    }
}
