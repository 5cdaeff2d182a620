// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use crate::error::AuthError;
use bulk_orders_domain::AccessScope;

/// Caller roles for authorization.
///
/// Roles determine which bulk capabilities a caller may exercise. Both
/// roles are back-office staff; sellers never call the bulk endpoints
/// directly, they are reached through organization-scoped staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full structural and corrective authority, including
    /// bulk deletion.
    Admin,
    /// Staff role: day-to-day ingestion and reconciliation work.
    Staff,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

/// The bulk capabilities a request can exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Ingest new order rows.
    CreateOrders,
    /// Mutate existing order rows.
    UpdateOrders,
    /// Soft-delete order rows.
    DeleteOrders,
}

impl Capability {
    /// Returns the action name used in errors and logs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::CreateOrders => "bulk_create_orders",
            Self::UpdateOrders => "bulk_update_orders",
            Self::DeleteOrders => "bulk_delete_orders",
        }
    }
}

/// An authenticated caller with a role and an organization scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this caller.
    pub id: String,
    /// The role assigned to this caller.
    pub role: Role,
    /// The organization boundary the caller operates within.
    pub scope: AccessScope,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role, scope: AccessScope) -> Self {
        Self { id, role, scope }
    }
}

/// Validates the session identity a request arrived with.
///
/// Session verification itself lives in the external auth service; this
/// boundary only refuses requests that carry no usable identity.
///
/// # Errors
///
/// Returns an error if the caller identifier is empty.
pub fn authenticate(
    id: &str,
    role: Role,
    scope: AccessScope,
) -> Result<AuthenticatedActor, AuthError> {
    let trimmed: &str = id.trim();
    if trimmed.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("missing caller identity"),
        });
    }
    Ok(AuthenticatedActor::new(trimmed.to_string(), role, scope))
}

/// Role-to-capability decision table.
///
/// The production matrix lives in an external permission service; the
/// trait is the seam it plugs in through.
pub trait PermissionMatrix: Send + Sync {
    /// Returns true if `role` may exercise `capability`.
    fn allows(&self, role: Role, capability: Capability) -> bool;
}

/// Default matrix: staff handle ingestion and reconciliation, deletion
/// stays admin-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMatrix;

impl PermissionMatrix for StaticMatrix {
    fn allows(&self, role: Role, capability: Capability) -> bool {
        match capability {
            Capability::CreateOrders | Capability::UpdateOrders => true,
            Capability::DeleteOrders => role == Role::Admin,
        }
    }
}

/// Checks that an actor may exercise a capability.
///
/// # Errors
///
/// Returns an error naming the action and the missing permission if the
/// matrix denies it.
pub fn authorize(
    actor: &AuthenticatedActor,
    capability: Capability,
    matrix: &dyn PermissionMatrix,
) -> Result<(), AuthError> {
    if matrix.allows(actor.role, capability) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized {
            action: String::from(capability.action()),
            required_role: String::from("Admin"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identity_is_rejected() {
        let result = authenticate("   ", Role::Staff, AccessScope::Unrestricted);
        assert!(matches!(
            result,
            Err(AuthError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_identity_is_trimmed() {
        let actor =
            authenticate(" staff-1 ", Role::Staff, AccessScope::Unrestricted).unwrap();
        assert_eq!(actor.id, "staff-1");
    }

    #[test]
    fn test_static_matrix_reserves_deletion_for_admins() {
        let matrix: StaticMatrix = StaticMatrix;
        assert!(matrix.allows(Role::Staff, Capability::CreateOrders));
        assert!(matrix.allows(Role::Staff, Capability::UpdateOrders));
        assert!(!matrix.allows(Role::Staff, Capability::DeleteOrders));
        assert!(matrix.allows(Role::Admin, Capability::DeleteOrders));
    }
}
