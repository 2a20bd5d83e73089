use serde::{Deserialize, Serialize};

use sparetrack_core::{
    is_present, CategoryId, DomainError, DomainResult, Entity, PartId, Record, SupplierId, Violations,
};

pub const NAME_REQUIRED: &str = "Part name must not be empty";
pub const PRICE_REQUIRED: &str = "Unit price is required";
pub const PRICE_NOT_POSITIVE: &str = "Unit price must be greater than zero";
pub const CATEGORY_REQUIRED: &str = "Category id is required";
pub const SUPPLIER_REQUIRED: &str = "Supplier id is required";

/// Create/update payload for a part, as received (unchecked).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub unit_price: Option<f64>,
}

impl PartInput {
    pub fn validate(self) -> DomainResult<PartFields> {
        let mut violations = Violations::new();
        violations.check(is_present(self.name.as_deref()), NAME_REQUIRED);

        match self.unit_price {
            None => violations.push(PRICE_REQUIRED),
            // NaN fails the comparison too.
            Some(price) if !(price > 0.0) => violations.push(PRICE_NOT_POSITIVE),
            Some(_) => {}
        }

        violations.require(&self.category_id, CATEGORY_REQUIRED);
        violations.require(&self.supplier_id, SUPPLIER_REQUIRED);

        match (self.category_id, self.supplier_id, self.unit_price) {
            (Some(category_id), Some(supplier_id), Some(unit_price)) if violations.is_empty() => {
                Ok(PartFields {
                    name: self.name.unwrap_or_default(),
                    description: self.description,
                    category_id,
                    supplier_id,
                    unit_price,
                })
            }
            _ => Err(DomainError::Validation(violations.into_messages())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartFields {
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub unit_price: f64,
}

/// Persisted part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    pub unit_price: f64,
}

impl Part {
    pub fn references_category(&self, category_id: CategoryId) -> bool {
        self.category_id == category_id
    }

    pub fn references_supplier(&self, supplier_id: SupplierId) -> bool {
        self.supplier_id == supplier_id
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> PartId {
        self.id
    }
}

impl Record for Part {
    type Fields = PartFields;

    fn assemble(id: PartId, fields: PartFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            category_id: fields.category_id,
            supplier_id: fields.supplier_id,
            unit_price: fields.unit_price,
        }
    }

    fn fields(&self) -> PartFields {
        PartFields {
            name: self.name.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            unit_price: self.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid() -> PartInput {
        PartInput {
            name: Some("Brake pad".to_string()),
            description: None,
            category_id: Some(CategoryId::new(1)),
            supplier_id: Some(SupplierId::new(1)),
            unit_price: Some(12.5),
        }
    }

    #[test]
    fn valid_part_passes() {
        let fields = valid().validate().unwrap();
        assert_eq!(fields.category_id, CategoryId::new(1));
        assert_eq!(fields.unit_price, 12.5);
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut input = valid();
        input.unit_price = Some(0.0);
        let err = input.validate().unwrap_err();
        assert_eq!(err.messages(), vec![PRICE_NOT_POSITIVE.to_string()]);
    }

    #[test]
    fn nan_price_is_rejected() {
        let mut input = valid();
        input.unit_price = Some(f64::NAN);
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_payload_reports_every_rule() {
        let err = PartInput::default().validate().unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                NAME_REQUIRED.to_string(),
                PRICE_REQUIRED.to_string(),
                CATEGORY_REQUIRED.to_string(),
                SUPPLIER_REQUIRED.to_string(),
            ]
        );
    }

    #[test]
    fn reference_checks() {
        let part = Part::assemble(PartId::new(9), valid().validate().unwrap());
        assert!(part.references_category(CategoryId::new(1)));
        assert!(!part.references_category(CategoryId::new(2)));
        assert!(part.references_supplier(SupplierId::new(1)));
    }

    proptest! {
        #[test]
        fn any_positive_price_is_accepted(price in 0.0001f64..1.0e9) {
            let mut input = valid();
            input.unit_price = Some(price);
            prop_assert!(input.validate().is_ok());
        }

        #[test]
        fn any_non_positive_price_is_rejected(price in -1.0e9f64..=0.0) {
            let mut input = valid();
            input.unit_price = Some(price);
            prop_assert!(input.validate().is_err());
        }
    }
}
