use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pricetier_core::AppError;
use serde::{Deserialize, Serialize};

/// Pricing tier a customer belongs to.
///
/// The set is closed: every price list on the storefront is keyed by one of
/// these values, and anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRole {
    /// Public pricing, shown to guests and unassigned customers.
    #[default]
    Retail,
    /// Wholesale pricing for bulk purchasers.
    Bulk,
    /// Premium pricing for VIP customers.
    Vip,
    /// Supplier accounts.
    Supplier,
}

/// Which tiered price columns a role may see on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceVisibility {
    /// Bulk price column is visible.
    pub can_see_bulk_prices: bool,
    /// VIP price column is visible.
    pub can_see_vip_prices: bool,
    /// Supplier price column is visible.
    pub can_see_supplier_prices: bool,
}

impl PricingRole {
    /// Role applied when neither group membership nor metadata says otherwise.
    pub const DEFAULT: Self = Self::Retail;

    /// Returns the stable slug used in storage and transport.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Bulk => "bulk",
            Self::Vip => "vip",
            Self::Supplier => "supplier",
        }
    }

    /// Returns all roles in declaration order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PricingRole] = &[
            PricingRole::Retail,
            PricingRole::Bulk,
            PricingRole::Vip,
            PricingRole::Supplier,
        ];

        ALL
    }

    /// Returns the elevated roles in the order group membership is checked.
    ///
    /// Retail is absent: it is the implicit default, never a positive signal.
    #[must_use]
    pub fn membership_priority() -> &'static [Self] {
        const PRIORITY: &[PricingRole] =
            &[PricingRole::Vip, PricingRole::Bulk, PricingRole::Supplier];

        PRIORITY
    }

    /// Returns the storefront price columns this role unlocks.
    #[must_use]
    pub fn price_visibility(&self) -> PriceVisibility {
        PriceVisibility {
            can_see_bulk_prices: matches!(self, Self::Bulk),
            can_see_vip_prices: matches!(self, Self::Vip),
            can_see_supplier_prices: matches!(self, Self::Supplier),
        }
    }
}

impl FromStr for PricingRole {
    type Err = AppError;

    /// Matches slugs exactly; surrounding whitespace or other casing is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "retail" => Ok(Self::Retail),
            "bulk" => Ok(Self::Bulk),
            "vip" => Ok(Self::Vip),
            "supplier" => Ok(Self::Supplier),
            other => Err(AppError::InvalidArgument(format!(
                "invalid role '{other}', expected one of retail, bulk, vip, supplier"
            ))),
        }
    }
}

impl Display for PricingRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::PricingRole;

    #[test]
    fn role_roundtrip_storage_value() {
        for role in PricingRole::all() {
            let restored = PricingRole::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(PricingRole::Retail), *role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let parsed = PricingRole::from_str("wholesale");
        assert!(matches!(
            parsed,
            Err(pricetier_core::AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn padded_or_uppercase_slug_is_rejected() {
        assert!(PricingRole::from_str(" vip ").is_err());
        assert!(PricingRole::from_str("vip\n").is_err());
        assert!(PricingRole::from_str("VIP").is_err());
    }

    #[test]
    fn declaration_order_is_stable() {
        let slugs: Vec<&str> = PricingRole::all().iter().map(PricingRole::as_str).collect();
        assert_eq!(slugs, vec!["retail", "bulk", "vip", "supplier"]);
        assert_eq!(PricingRole::all(), PricingRole::all());
    }

    #[test]
    fn membership_priority_checks_vip_first_and_skips_retail() {
        assert_eq!(
            PricingRole::membership_priority(),
            &[PricingRole::Vip, PricingRole::Bulk, PricingRole::Supplier]
        );
        assert!(!PricingRole::membership_priority().contains(&PricingRole::Retail));
    }

    #[test]
    fn retail_sees_no_tiered_prices() {
        let visibility = PricingRole::Retail.price_visibility();
        assert!(!visibility.can_see_bulk_prices);
        assert!(!visibility.can_see_vip_prices);
        assert!(!visibility.can_see_supplier_prices);
        assert!(PricingRole::Vip.price_visibility().can_see_vip_prices);
    }

    #[test]
    fn serde_uses_slugs() {
        let encoded = serde_json::to_string(&PricingRole::Vip);
        assert_eq!(encoded.unwrap_or_default(), "\"vip\"");
    }

    proptest! {
        #[test]
        fn parsing_accepts_only_known_slugs(value in "[a-z_]{0,12}") {
            let known = ["retail", "bulk", "vip", "supplier"].contains(&value.as_str());
            prop_assert_eq!(PricingRole::from_str(&value).is_ok(), known);
        }
    }
}
