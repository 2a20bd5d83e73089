//! Postgres-backed tables.
//!
//! One `PgTable<R>` per service, driven by the record's `PgRecord` mapping.
//! Rows are decoded by hand with `Row::try_get` (no compile-time checked
//! queries), and the table is created on startup if it does not exist.
//!
//! ## Error Mapping
//!
//! | SQLx error | Postgres code | `StoreError` |
//! |------------|---------------|--------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Database` |
//! | ColumnDecode / ColumnNotFound | N/A | `Decode` |
//! | Other | N/A | `Database` |

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use tracing::{error, instrument};

use sparetrack_categories::Category;
use sparetrack_core::{CategoryId, InventoryId, PartId, Record, SupplierId};
use sparetrack_inventory::InventoryItem;
use sparetrack_parts::Part;
use sparetrack_suppliers::{Conflict, Supplier};

use super::{PartLookup, StoreError, SupplierLookup, Table};
use crate::config::DatabaseSettings;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Open a pool using the configured URL. `None` when no URL is configured.
pub async fn connect(settings: &DatabaseSettings) -> Result<Option<PgPool>, StoreError> {
    let Some(url) = settings.url.as_deref() else {
        return Ok(None);
    };

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(url)
        .await
        .map(Some)
        .map_err(|e| map_sqlx_error("connect", e))
}

/// How a record maps onto its table.
pub trait PgRecord: Record {
    const TABLE: &'static str;
    /// Every column except `id`, in bind order.
    const COLUMNS: &'static [&'static str];
    const DDL: &'static str;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    fn bind<'q>(fields: &'q Self::Fields, query: PgQuery<'q>) -> PgQuery<'q>;
}

pub struct PgTable<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: PgRecord> PgTable<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// Create the table if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(R::DDL)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ensure_schema", e))
    }

    fn select_list() -> String {
        format!("id, {}", R::COLUMNS.join(", "))
    }

    fn decode(rows: Vec<PgRow>) -> Result<Vec<R>, StoreError> {
        rows.iter()
            .map(|row| R::from_row(row).map_err(|e| StoreError::Decode(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl<R: PgRecord> Table<R> for PgTable<R> {
    #[instrument(skip_all, fields(table = R::TABLE), err)]
    async fn insert(&self, fields: R::Fields) -> Result<R, StoreError> {
        let placeholders: Vec<String> = (1..=R::COLUMNS.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            R::TABLE,
            R::COLUMNS.join(", "),
            placeholders.join(", "),
            Self::select_list()
        );

        let row = R::bind(&fields, sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;
        R::from_row(&row).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let id: i64 = id.into();
        let sql = format!("SELECT {} FROM {} WHERE id = $1", Self::select_list(), R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|row| R::from_row(&row).map_err(|e| StoreError::Decode(e.to_string())))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", Self::select_list(), R::TABLE);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;
        Self::decode(rows)
    }

    #[instrument(skip(self, record), fields(table = R::TABLE, id = %record.id()), err)]
    async fn replace(&self, record: R) -> Result<Option<R>, StoreError> {
        let assignments: Vec<String> = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ${}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            R::TABLE,
            assignments.join(", "),
            R::COLUMNS.len() + 1,
            Self::select_list()
        );

        let fields = record.fields();
        let id: i64 = record.id().into();
        let row = R::bind(&fields, sqlx::query(&sql))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("replace", e))?;

        row.map(|row| R::from_row(&row).map_err(|e| StoreError::Decode(e.to_string())))
            .transpose()
    }

    async fn remove(&self, id: R::Id) -> Result<bool, StoreError> {
        let id: i64 = id.into();
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove", e))?;
        Ok(result.rows_affected() > 0)
    }
}

impl PgRecord for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS categories (
            id          BIGSERIAL PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT
        )
    "#;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: CategoryId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }

    fn bind<'q>(fields: &'q Self::Fields, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&fields.name).bind(fields.description.as_deref())
    }
}

impl PgRecord for Supplier {
    const TABLE: &'static str = "suppliers";
    const COLUMNS: &'static [&'static str] =
        &["name", "contact_person", "phone", "email", "address"];
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS suppliers (
            id             BIGSERIAL PRIMARY KEY,
            name           TEXT NOT NULL,
            contact_person TEXT,
            phone          TEXT NOT NULL UNIQUE,
            email          TEXT NOT NULL UNIQUE,
            address        TEXT
        )
    "#;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: SupplierId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            contact_person: row.try_get("contact_person")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
        })
    }

    fn bind<'q>(fields: &'q Self::Fields, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&fields.name)
            .bind(fields.contact_person.as_deref())
            .bind(&fields.phone)
            .bind(&fields.email)
            .bind(fields.address.as_deref())
    }
}

impl PgRecord for Part {
    const TABLE: &'static str = "parts";
    const COLUMNS: &'static [&'static str] =
        &["name", "description", "category_id", "supplier_id", "unit_price"];
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS parts (
            id          BIGSERIAL PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT,
            category_id BIGINT NOT NULL,
            supplier_id BIGINT NOT NULL,
            unit_price  DOUBLE PRECISION NOT NULL CHECK (unit_price > 0)
        )
    "#;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: PartId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category_id: CategoryId::new(row.try_get("category_id")?),
            supplier_id: SupplierId::new(row.try_get("supplier_id")?),
            unit_price: row.try_get("unit_price")?,
        })
    }

    fn bind<'q>(fields: &'q Self::Fields, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&fields.name)
            .bind(fields.description.as_deref())
            .bind(fields.category_id.get())
            .bind(fields.supplier_id.get())
            .bind(fields.unit_price)
    }
}

impl PgRecord for InventoryItem {
    const TABLE: &'static str = "inventories";
    const COLUMNS: &'static [&'static str] =
        &["part_id", "quantity_in_stock", "last_restock_date"];
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS inventories (
            id                BIGSERIAL PRIMARY KEY,
            part_id           BIGINT NOT NULL,
            quantity_in_stock BIGINT NOT NULL CHECK (quantity_in_stock >= 0),
            last_restock_date DATE NOT NULL
        )
    "#;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: InventoryId::new(row.try_get("id")?),
            part_id: PartId::new(row.try_get("part_id")?),
            quantity_in_stock: row.try_get("quantity_in_stock")?,
            last_restock_date: row.try_get("last_restock_date")?,
        })
    }

    fn bind<'q>(fields: &'q Self::Fields, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(fields.part_id.get())
            .bind(fields.quantity_in_stock)
            .bind(fields.last_restock_date)
    }
}

impl PgTable<Part> {
    async fn exists_where(&self, column: &str, id: i64) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM parts WHERE {column} = $1)");
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))
    }
}

#[async_trait]
impl PartLookup for PgTable<Part> {
    async fn any_with_category(&self, id: CategoryId) -> Result<bool, StoreError> {
        self.exists_where("category_id", id.get()).await
    }

    async fn any_with_supplier(&self, id: SupplierId) -> Result<bool, StoreError> {
        self.exists_where("supplier_id", id.get()).await
    }
}

#[async_trait]
impl SupplierLookup for PgTable<Supplier> {
    async fn conflicts(
        &self,
        phone: &str,
        email: &str,
        except: Option<SupplierId>,
    ) -> Result<Vec<Conflict>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(BOOL_OR(phone = $1), FALSE) AS phone_taken,
                COALESCE(BOOL_OR(email = $2), FALSE) AS email_taken
            FROM suppliers
            WHERE $3::BIGINT IS NULL OR id <> $3
            "#,
        )
        .bind(phone)
        .bind(email)
        .bind(except.map(SupplierId::get))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("conflicts", e))?;

        let phone_taken: bool = row
            .try_get("phone_taken")
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let email_taken: bool = row
            .try_get("email_taken")
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut conflicts = Vec::new();
        if phone_taken {
            conflicts.push(Conflict::Phone);
        }
        if email_taken {
            conflicts.push(Conflict::Email);
        }
        Ok(conflicts)
    }
}

pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Conflict { operation, message }
            } else {
                error!(operation, %message, "database error");
                StoreError::Database { operation, message }
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Decode(err.to_string())
        }
        other => {
            error!(operation, error = %other, "store failure");
            StoreError::Database {
                operation,
                message: other.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_declares_every_mapped_column() {
        fn check<R: PgRecord>() {
            for column in R::COLUMNS {
                assert!(R::DDL.contains(column), "{} lacks {column}", R::TABLE);
            }
            assert!(R::DDL.contains(R::TABLE));
        }
        check::<Category>();
        check::<Supplier>();
        check::<Part>();
        check::<InventoryItem>();
    }

    #[test]
    fn transport_errors_map_to_database() {
        let err = map_sqlx_error("insert", sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Database { operation: "insert", .. }));
    }
}
