use serde::{Deserialize, Serialize};

use sparetrack_core::{is_present, CategoryId, DomainResult, Entity, Record, Violations};

pub const NAME_REQUIRED: &str = "Category name must not be empty";

/// Create/update payload for a category, as received (unchecked).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryInput {
    /// Check the field rules and produce the fields to persist.
    pub fn validate(self) -> DomainResult<CategoryFields> {
        let mut violations = Violations::new();
        violations.check(is_present(self.name.as_deref()), NAME_REQUIRED);
        violations.into_result()?;

        Ok(CategoryFields {
            name: self.name.unwrap_or_default(),
            description: self.description,
        })
    }
}

/// Mutable fields of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    /// Overwrite every mutable field (full update).
    pub fn overwrite(&mut self, fields: CategoryFields) {
        self.name = fields.name;
        self.description = fields.description;
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl Record for Category {
    type Fields = CategoryFields;

    fn assemble(id: CategoryId, fields: CategoryFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
        }
    }

    fn fields(&self) -> CategoryFields {
        CategoryFields {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}
