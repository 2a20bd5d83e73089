use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use sparetrack_core::{is_present, DomainResult, Entity, Record, SupplierId, Violations};

pub const COMPANY_REQUIRED: &str = "Company name must not be empty";
pub const PHONE_REQUIRED: &str = "Phone must not be empty";
pub const PHONE_INVALID: &str = "Invalid phone format. Example: +79991234567";
pub const EMAIL_REQUIRED: &str = "Email must not be empty";
pub const EMAIL_INVALID: &str = "Email must be a valid address";
pub const PHONE_TAKEN: &str = "Phone is already taken";
pub const EMAIL_TAKEN: &str = "Email is already taken";

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9]{8,15}$").unwrap_or_else(|e| panic!("phone pattern: {e}"))
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
});

/// Optional leading `+`, then 8 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Create/update payload for a supplier, as received (unchecked).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl SupplierInput {
    /// Check every field rule; all violations are reported together.
    pub fn validate(self) -> DomainResult<SupplierFields> {
        let mut violations = Violations::new();
        violations.check(is_present(self.name.as_deref()), COMPANY_REQUIRED);

        match self.phone.as_deref() {
            Some(phone) if is_present(Some(phone)) => {
                violations.check(is_valid_phone(phone), PHONE_INVALID);
            }
            _ => {
                violations.push(PHONE_REQUIRED);
            }
        }

        match self.email.as_deref() {
            Some(email) if is_present(Some(email)) => {
                violations.check(is_valid_email(email), EMAIL_INVALID);
            }
            _ => {
                violations.push(EMAIL_REQUIRED);
            }
        }

        violations.into_result()?;

        Ok(SupplierFields {
            name: self.name.unwrap_or_default(),
            contact_person: self.contact_person,
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address: self.address,
        })
    }
}

/// Which unique contact field collides with another supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Phone,
    Email,
}

impl Conflict {
    pub fn message(self) -> &'static str {
        match self {
            Conflict::Phone => PHONE_TAKEN,
            Conflict::Email => EMAIL_TAKEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFields {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

/// Persisted supplier. Phone and email are unique across all suppliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}

impl Record for Supplier {
    type Fields = SupplierFields;

    fn assemble(id: SupplierId, fields: SupplierFields) -> Self {
        Self {
            id,
            name: fields.name,
            contact_person: fields.contact_person,
            phone: fields.phone,
            email: fields.email,
            address: fields.address,
        }
    }

    fn fields(&self) -> SupplierFields {
        SupplierFields {
            name: self.name.clone(),
            contact_person: self.contact_person.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}
