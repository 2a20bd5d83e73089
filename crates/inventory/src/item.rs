use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sparetrack_core::{DomainError, DomainResult, Entity, InventoryId, PartId, Record, Violations};

pub const PART_REQUIRED: &str = "partId must not be null";
pub const QUANTITY_REQUIRED: &str = "quantityInStock must not be null";
pub const QUANTITY_BELOW_ONE: &str = "quantityInStock must be at least 1";
pub const QUANTITY_UNSPECIFIED: &str = "Quantity must be specified";
pub const QUANTITY_NEGATIVE: &str = "Quantity must not be negative";

/// Payload creating a stock record for a part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryInput {
    pub part_id: Option<PartId>,
    pub quantity_in_stock: Option<i64>,
}

impl InventoryInput {
    /// Validate a new stock record; `today` becomes its restock date.
    pub fn validate(self, today: NaiveDate) -> DomainResult<InventoryFields> {
        let mut violations = Violations::new();
        violations.require(&self.part_id, PART_REQUIRED);
        match self.quantity_in_stock {
            None => violations.push(QUANTITY_REQUIRED),
            Some(quantity) if quantity < 1 => violations.push(QUANTITY_BELOW_ONE),
            Some(_) => {}
        }

        match (self.part_id, self.quantity_in_stock) {
            (Some(part_id), Some(quantity_in_stock)) if violations.is_empty() => {
                Ok(InventoryFields {
                    part_id,
                    quantity_in_stock,
                    last_restock_date: today,
                })
            }
            _ => Err(DomainError::Validation(violations.into_messages())),
        }
    }
}

/// Payload replacing the quantity of an existing stock record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockInput {
    pub quantity_in_stock: Option<i64>,
}

impl RestockInput {
    /// Returns the checked quantity. Zero is allowed (sold out).
    pub fn validate(self) -> DomainResult<i64> {
        match self.quantity_in_stock {
            None => Err(DomainError::validation(QUANTITY_UNSPECIFIED)),
            Some(quantity) if quantity < 0 => Err(DomainError::validation(QUANTITY_NEGATIVE)),
            Some(quantity) => Ok(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFields {
    pub part_id: PartId,
    pub quantity_in_stock: i64,
    pub last_restock_date: NaiveDate,
}

/// Stock record for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: InventoryId,
    pub part_id: PartId,
    pub quantity_in_stock: i64,
    pub last_restock_date: NaiveDate,
}

impl InventoryItem {
    /// Set a new quantity; the restock date moves to `today`.
    pub fn restock(&mut self, quantity: i64, today: NaiveDate) {
        self.quantity_in_stock = quantity;
        self.last_restock_date = today;
    }
}

impl Entity for InventoryItem {
    type Id = InventoryId;

    fn id(&self) -> InventoryId {
        self.id
    }
}

impl Record for InventoryItem {
    type Fields = InventoryFields;

    fn assemble(id: InventoryId, fields: InventoryFields) -> Self {
        Self {
            id,
            part_id: fields.part_id,
            quantity_in_stock: fields.quantity_in_stock,
            last_restock_date: fields.last_restock_date,
        }
    }

    fn fields(&self) -> InventoryFields {
        InventoryFields {
            part_id: self.part_id,
            quantity_in_stock: self.quantity_in_stock,
            last_restock_date: self.last_restock_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn create_sets_restock_date_to_today() {
        let fields = InventoryInput {
            part_id: Some(PartId::new(4)),
            quantity_in_stock: Some(10),
        }
        .validate(day(1))
        .unwrap();
        assert_eq!(fields.last_restock_date, day(1));
        assert_eq!(fields.quantity_in_stock, 10);
    }

    #[test]
    fn create_requires_at_least_one_unit() {
        let err = InventoryInput {
            part_id: Some(PartId::new(4)),
            quantity_in_stock: Some(0),
        }
        .validate(day(1))
        .unwrap_err();
        assert_eq!(err.messages(), vec![QUANTITY_BELOW_ONE.to_string()]);
    }

    #[test]
    fn create_reports_missing_fields() {
        let err = InventoryInput::default().validate(day(1)).unwrap_err();
        assert_eq!(
            err.messages(),
            vec![PART_REQUIRED.to_string(), QUANTITY_REQUIRED.to_string()]
        );
    }

    #[test]
    fn restock_input_rules() {
        assert_eq!(RestockInput { quantity_in_stock: Some(0) }.validate(), Ok(0));
        assert_eq!(
            RestockInput { quantity_in_stock: None }.validate(),
            Err(DomainError::validation(QUANTITY_UNSPECIFIED))
        );
        assert_eq!(
            RestockInput { quantity_in_stock: Some(-1) }.validate(),
            Err(DomainError::validation(QUANTITY_NEGATIVE))
        );
    }

    #[test]
    fn restock_moves_the_date() {
        let mut item = InventoryItem::assemble(
            InventoryId::new(1),
            InventoryFields {
                part_id: PartId::new(4),
                quantity_in_stock: 10,
                last_restock_date: day(1),
            },
        );
        item.restock(3, day(9));
        assert_eq!(item.quantity_in_stock, 3);
        assert_eq!(item.last_restock_date, day(9));
        assert_eq!(item.part_id, PartId::new(4));
    }

    proptest! {
        #[test]
        fn restock_accepts_exactly_non_negative(q in -1000i64..1000) {
            let result = RestockInput { quantity_in_stock: Some(q) }.validate();
            prop_assert_eq!(result.is_ok(), q >= 0);
        }
    }
}
