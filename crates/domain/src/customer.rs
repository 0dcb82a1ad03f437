use pricetier_core::{CustomerGroupId, CustomerId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the denormalized pricing role label.
pub const PRICING_ROLE_METADATA_KEY: &str = "pricing_role";

/// Open-ended metadata bag attached to customers and groups.
pub type Metadata = Map<String, Value>;

/// Customer group record owned by the customer store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerGroup {
    id: CustomerGroupId,
    name: String,
    metadata: Metadata,
}

impl CustomerGroup {
    /// Creates a group record.
    #[must_use]
    pub fn new(id: CustomerGroupId, name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id,
            name: name.into(),
            metadata,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> &CustomerGroupId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns group metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Customer record loaded together with its group memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    email: String,
    metadata: Metadata,
    groups: Vec<CustomerGroup>,
}

impl Customer {
    /// Creates a customer record.
    #[must_use]
    pub fn new(
        id: CustomerId,
        email: impl Into<String>,
        metadata: Metadata,
        groups: Vec<CustomerGroup>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            metadata,
            groups,
        }
    }

    /// Returns the customer identifier.
    #[must_use]
    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    /// Returns the email as stored.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the email normalized for credential lookups.
    #[must_use]
    pub fn login_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Returns customer metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the groups the customer belongs to.
    #[must_use]
    pub fn groups(&self) -> &[CustomerGroup] {
        self.groups.as_slice()
    }

    /// Returns true when the customer is a member of the group.
    #[must_use]
    pub fn belongs_to(&self, group_id: &CustomerGroupId) -> bool {
        self.groups.iter().any(|group| group.id() == group_id)
    }

    /// Returns the raw `pricing_role` metadata label when present and non-blank.
    #[must_use]
    pub fn pricing_role_label(&self) -> Option<&str> {
        self.metadata
            .get(PRICING_ROLE_METADATA_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Merges `patch` into `target`, overwriting only the keys present in `patch`.
pub fn merge_metadata(target: &mut Metadata, patch: Metadata) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use pricetier_core::{CustomerGroupId, CustomerId};
    use serde_json::{Value, json};

    use super::{Customer, CustomerGroup, Metadata, merge_metadata};

    fn metadata(value: Value) -> Metadata {
        value.as_object().cloned().unwrap_or_default()
    }

    fn customer_with(metadata_value: Value, group_ids: &[&str]) -> Option<Customer> {
        let groups = group_ids
            .iter()
            .map(|id| {
                CustomerGroupId::new(*id).map(|id| CustomerGroup::new(id, "Group", Metadata::new()))
            })
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Customer::new(
            CustomerId::new("cus_1").ok()?,
            "Shopper@Example.com",
            metadata(metadata_value),
            groups,
        ))
    }

    #[test]
    fn pricing_role_label_ignores_blank_and_non_string_values() {
        let blank = customer_with(json!({ "pricing_role": "  " }), &[]);
        assert_eq!(blank.as_ref().and_then(Customer::pricing_role_label), None);

        let numeric = customer_with(json!({ "pricing_role": 3 }), &[]);
        assert_eq!(numeric.as_ref().and_then(Customer::pricing_role_label), None);

        let set = customer_with(json!({ "pricing_role": "vip" }), &[]);
        assert_eq!(set.as_ref().and_then(Customer::pricing_role_label), Some("vip"));
    }

    #[test]
    fn belongs_to_matches_group_ids() {
        let customer = customer_with(json!({}), &["cgrp_bulk"]);
        let bulk = CustomerGroupId::new("cgrp_bulk").ok();
        let vip = CustomerGroupId::new("cgrp_vip").ok();
        assert!(customer.is_some());
        if let (Some(customer), Some(bulk), Some(vip)) = (customer, bulk, vip) {
            assert!(customer.belongs_to(&bulk));
            assert!(!customer.belongs_to(&vip));
            assert_eq!(customer.login_email(), "shopper@example.com");
        }
    }

    #[test]
    fn merge_metadata_preserves_unrelated_keys() {
        let mut target = metadata(json!({ "newsletter": true, "pricing_role": "bulk" }));
        merge_metadata(&mut target, metadata(json!({ "pricing_role": "vip" })));

        assert_eq!(target.get("newsletter"), Some(&json!(true)));
        assert_eq!(target.get("pricing_role"), Some(&json!("vip")));
        assert_eq!(target.len(), 2);
    }
}
