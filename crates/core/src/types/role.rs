//! User roles and vendor application status.

use serde::{Deserialize, Serialize};

/// Account role as reported by the platform API.
///
/// Roles scope which dashboard routes the storefront offers. This is a
/// client-side allowance only - the platform re-checks authority on every
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular shopper.
    #[default]
    Customer,
    /// Seller with a scoped product/order dashboard.
    Vendor,
    /// Full store management.
    Admin,
}

impl Role {
    /// Whether this role may use the vendor dashboard.
    #[must_use]
    pub const fn can_vend(&self) -> bool {
        matches!(self, Self::Vendor | Self::Admin)
    }

    /// Whether this role may use the admin dashboard.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Vendor => write!(f, "vendor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Progress of a customer's application to become a vendor.
///
/// Owned and advanced by the platform; the storefront only displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VendorApplicationStatus {
    #[default]
    NotApplied,
    Pending,
    Approved,
    Rejected,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_display_roundtrip() {
        for role in [Role::Customer, Role::Vendor, Role::Admin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::Customer.can_vend());
        assert!(Role::Vendor.can_vend());
        assert!(Role::Admin.can_vend());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Vendor.is_admin());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::Vendor).unwrap();
        assert_eq!(json, "\"vendor\"");
    }
}
