//! Order lifecycle status and its display projection.
//!
//! The platform API owns the actual state machine; every transition happens
//! through a platform endpoint and the platform alone decides legality. The
//! storefront keeps a closed enum plus an explicit transition table so it can
//! scope which buttons to offer, instead of inferring "next status" from
//! strings.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Lifecycle label for a placed order, authoritative on the platform.
///
/// The wire format uses the platform's human-readable labels
/// (e.g. `"Out For Delivery"`), hence the per-variant renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    #[serde(rename = "Out For Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
    #[serde(rename = "Return Requested")]
    ReturnRequested,
    Returned,
}

/// Display badge class for an order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    /// In-flight along the happy path.
    Info,
    /// Delivered.
    Success,
    /// Awaiting a return decision.
    Warning,
    /// Cancelled or returned.
    Danger,
}

/// An action the storefront may offer against an order.
///
/// Offering an action never implies it will succeed - the platform endpoint
/// behind it is the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Customer cancellation, permitted only while Processing.
    Cancel,
    /// Customer return request, permitted only once Delivered.
    RequestReturn,
    /// Vendor/admin advance to the next happy-path status.
    Advance,
    /// Vendor/admin decision on a pending return request.
    ReviewReturn,
}

impl OrderStatus {
    /// The happy path rendered on the 4-step progress indicator.
    const PROGRESS: [Self; 4] = [
        Self::Processing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Whether the platform would accept a transition from `self` to `to`.
    ///
    /// This mirrors the server's table; it is used only to scope which
    /// actions the UI offers.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::OutForDelivery)
                | (Self::OutForDelivery, Self::Delivered)
                | (Self::Delivered, Self::ReturnRequested)
                // Return review: approve -> Returned, reject -> back to Delivered
                | (Self::ReturnRequested, Self::Returned | Self::Delivered)
        )
    }

    /// Index on the 4-step progress indicator, if this status sits on the
    /// happy path. Cancelled and Returned render as badges, not steps;
    /// a pending return request still displays at the Delivered step.
    #[must_use]
    pub fn progress_step(self) -> Option<u8> {
        let effective = if self == Self::ReturnRequested {
            Self::Delivered
        } else {
            self
        };
        Self::PROGRESS
            .iter()
            .position(|s| *s == effective)
            .and_then(|i| u8::try_from(i).ok())
    }

    /// The next happy-path status, used to label the vendor "advance" button
    /// (e.g. "Ship" while Processing). `None` when there is nothing to
    /// advance to.
    #[must_use]
    pub const fn next_forward(self) -> Option<Self> {
        match self {
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered
            | Self::Cancelled
            | Self::ReturnRequested
            | Self::Returned => None,
        }
    }

    /// Whether no further transition exists from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned)
    }

    /// Display badge for this status.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Processing | Self::Shipped | Self::OutForDelivery => StatusBadge::Info,
            Self::Delivered => StatusBadge::Success,
            Self::ReturnRequested => StatusBadge::Warning,
            Self::Cancelled | Self::Returned => StatusBadge::Danger,
        }
    }

    /// The actions the storefront offers for this status to the given role.
    #[must_use]
    pub fn actions_for(self, role: Role) -> Vec<OrderAction> {
        match role {
            Role::Customer => match self {
                Self::Processing => vec![OrderAction::Cancel],
                Self::Delivered => vec![OrderAction::RequestReturn],
                _ => vec![],
            },
            Role::Vendor | Role::Admin => {
                let mut actions = Vec::new();
                if self.next_forward().is_some() {
                    actions.push(OrderAction::Advance);
                }
                if self == Self::ReturnRequested {
                    actions.push(OrderAction::ReviewReturn);
                }
                actions
            }
        }
    }

    /// The platform's wire label for this status.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out For Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::ReturnRequested => "Return Requested",
            Self::Returned => "Returned",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Out For Delivery" => Ok(Self::OutForDelivery),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            "Return Requested" => Ok(Self::ReturnRequested),
            "Returned" => Ok(Self::Returned),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_only_from_processing() {
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_return_flow() {
        assert!(OrderStatus::Delivered.can_transition(OrderStatus::ReturnRequested));
        // Approval and rejection of a pending return request
        assert!(OrderStatus::ReturnRequested.can_transition(OrderStatus::Returned));
        assert!(OrderStatus::ReturnRequested.can_transition(OrderStatus::Delivered));
        // A return cannot be requested before delivery
        assert!(!OrderStatus::Processing.can_transition(OrderStatus::ReturnRequested));
    }

    #[test]
    fn test_no_transitions_out_of_terminal_states() {
        for to in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::ReturnRequested,
            OrderStatus::Returned,
        ] {
            assert!(!OrderStatus::Cancelled.can_transition(to));
            assert!(!OrderStatus::Returned.can_transition(to));
        }
    }

    #[test]
    fn test_progress_steps() {
        assert_eq!(OrderStatus::Processing.progress_step(), Some(0));
        assert_eq!(OrderStatus::Shipped.progress_step(), Some(1));
        assert_eq!(OrderStatus::OutForDelivery.progress_step(), Some(2));
        assert_eq!(OrderStatus::Delivered.progress_step(), Some(3));
        assert_eq!(OrderStatus::ReturnRequested.progress_step(), Some(3));
        assert_eq!(OrderStatus::Cancelled.progress_step(), None);
        assert_eq!(OrderStatus::Returned.progress_step(), None);
    }

    #[test]
    fn test_next_forward_labels_advance_button() {
        assert_eq!(
            OrderStatus::Processing.next_forward(),
            Some(OrderStatus::Shipped)
        );
        assert_eq!(OrderStatus::Delivered.next_forward(), None);
        assert_eq!(OrderStatus::Cancelled.next_forward(), None);
    }

    #[test]
    fn test_customer_actions() {
        assert_eq!(
            OrderStatus::Processing.actions_for(Role::Customer),
            vec![OrderAction::Cancel]
        );
        assert_eq!(
            OrderStatus::Delivered.actions_for(Role::Customer),
            vec![OrderAction::RequestReturn]
        );
        assert!(OrderStatus::Shipped.actions_for(Role::Customer).is_empty());
        assert!(OrderStatus::Cancelled.actions_for(Role::Customer).is_empty());
    }

    #[test]
    fn test_vendor_actions() {
        assert_eq!(
            OrderStatus::Processing.actions_for(Role::Vendor),
            vec![OrderAction::Advance]
        );
        assert_eq!(
            OrderStatus::ReturnRequested.actions_for(Role::Vendor),
            vec![OrderAction::ReviewReturn]
        );
        assert!(OrderStatus::Returned.actions_for(Role::Admin).is_empty());
    }

    #[test]
    fn test_wire_labels() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out For Delivery\"");

        let parsed: OrderStatus = serde_json::from_str("\"Return Requested\"").unwrap();
        assert_eq!(parsed, OrderStatus::ReturnRequested);

        let from_str: OrderStatus = "Out For Delivery".parse().unwrap();
        assert_eq!(from_str, OrderStatus::OutForDelivery);
    }
}
