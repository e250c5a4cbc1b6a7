//! Core types for Polar Scoop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod policy;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Money};
pub use policy::PricingPolicy;
pub use role::{Role, VendorApplicationStatus};
pub use status::{OrderAction, OrderStatus, StatusBadge};
