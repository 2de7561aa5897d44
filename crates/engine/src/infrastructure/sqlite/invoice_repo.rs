//! SQLite invoice repository.
//!
//! Items live in `invoice_items` keyed by `(invoice_id, position)` so the
//! stored order matches the order the client sent.

use std::collections::HashMap;

use async_trait::async_trait;
use castdb_domain::{
    ContactName, Description, DomainError, Invoice, InvoiceId, InvoiceItem, InvoiceItemId,
    InvoiceNumber, InvoiceStatus,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::helpers::{map_write_error, RowExt};
use crate::infrastructure::ports::{InvoiceRepo, RepoError};

const INVOICE_COLUMNS: &str = "id, invoice_number, contact_name, description, amount, \
                               invoice_date, due_date, status, version";

const ITEM_COLUMNS: &str =
    "id, invoice_id, position, name, description, unit_price, quantity, amount";

pub struct SqliteInvoiceRepo {
    pool: SqlitePool,
}

impl SqliteInvoiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Sqlite>,
        invoice: &Invoice,
    ) -> Result<(), RepoError> {
        for (position, item) in invoice.invoice_items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO invoice_items \
                 (id, invoice_id, position, name, description, unit_price, quantity, amount) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(item.id.to_string())
            .bind(invoice.id.to_string())
            .bind(position as i64)
            .bind(item.name.as_str())
            .bind(item.description.as_ref().map(|d| d.as_str()))
            .bind(item.unit_price.to_string())
            .bind(i64::from(item.quantity))
            .bind(item.amount.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                map_write_error("insert_invoice_items", e, |_| {
                    format!("Invoice item with id {} already exists", item.id)
                })
            })?;
        }
        Ok(())
    }

    async fn items_for(&self, invoice_id: InvoiceId) -> Result<Vec<InvoiceItem>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ? ORDER BY position"
        ))
        .bind(invoice_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_invoice_items", e))?;

        rows.iter().map(row_to_item).collect()
    }
}

fn invalid(e: DomainError) -> RepoError {
    RepoError::serialization(e.to_string())
}

fn optional_description(row: &SqliteRow) -> Result<Option<Description>, RepoError> {
    Ok(row
        .optional_text("description")?
        .map(Description::new)
        .transpose()
        .map_err(invalid)?
        .filter(|d| !d.is_empty()))
}

fn row_to_item(row: &SqliteRow) -> Result<InvoiceItem, RepoError> {
    let quantity = u32::try_from(row.int("quantity")?)
        .map_err(|e| RepoError::serialization(format!("quantity: {}", e)))?;

    InvoiceItem::new(
        InvoiceItemId::from_uuid(row.uuid("id")?),
        row.text("name")?,
        optional_description(row)?,
        row.text("unit_price")?.parse().map_err(invalid)?,
        quantity,
    )
    .map_err(invalid)
}

fn row_to_invoice(row: &SqliteRow, invoice_items: Vec<InvoiceItem>) -> Result<Invoice, RepoError> {
    Ok(Invoice {
        id: InvoiceId::from_uuid(row.uuid("id")?),
        invoice_number: InvoiceNumber::new(row.text("invoice_number")?).map_err(invalid)?,
        contact_name: ContactName::new(row.text("contact_name")?).map_err(invalid)?,
        description: optional_description(row)?,
        amount: row.text("amount")?.parse().map_err(invalid)?,
        invoice_date: row.fixed_datetime("invoice_date")?,
        due_date: row.fixed_datetime("due_date")?,
        status: row
            .text("status")?
            .parse::<InvoiceStatus>()
            .map_err(invalid)?,
        invoice_items,
        version: row.int("version")?,
    })
}

#[async_trait]
impl InvoiceRepo for SqliteInvoiceRepo {
    async fn list(&self) -> Result<Vec<Invoice>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY invoice_date, invoice_number"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_invoices", e))?;

        let item_rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items ORDER BY invoice_id, position"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_invoice_items", e))?;

        let mut items_by_invoice: HashMap<String, Vec<InvoiceItem>> = HashMap::new();
        for row in &item_rows {
            items_by_invoice
                .entry(row.text("invoice_id")?)
                .or_default()
                .push(row_to_item(row)?);
        }

        rows.iter()
            .map(|row| {
                let items = items_by_invoice.remove(&row.text("id")?).unwrap_or_default();
                row_to_invoice(row, items)
            })
            .collect()
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<Invoice>, RepoError> {
        let row = sqlx::query(&format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_invoice", e))?;

        match row {
            Some(row) => {
                let items = self.items_for(id).await?;
                Ok(Some(row_to_invoice(&row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, id: InvoiceId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM invoices WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("invoice_exists", e))?;
        Ok(row.is_some())
    }

    async fn create(&self, invoice: &Invoice) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("create_invoice", e))?;

        sqlx::query(&format!(
            "INSERT INTO invoices ({INVOICE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(invoice.id.to_string())
        .bind(invoice.invoice_number.as_str())
        .bind(invoice.contact_name.as_str())
        .bind(invoice.description.as_ref().map(|d| d.as_str()))
        .bind(invoice.amount.to_string())
        .bind(invoice.invoice_date.to_rfc3339())
        .bind(invoice.due_date.to_rfc3339())
        .bind(invoice.status.as_str())
        .bind(invoice.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error("create_invoice", e, |_| {
                format!("Invoice with id {} already exists", invoice.id)
            })
        })?;

        Self::insert_items(&mut tx, invoice).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("create_invoice", e))?;
        Ok(())
    }

    async fn update(
        &self,
        invoice: &Invoice,
        expected_version: Option<i64>,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update_invoice", e))?;

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET invoice_number = ?1, contact_name = ?2, description = ?3, amount = ?4,
                invoice_date = ?5, due_date = ?6, status = ?7, version = version + 1
            WHERE id = ?8 AND (?9 IS NULL OR version = ?9)
            "#,
        )
        .bind(invoice.invoice_number.as_str())
        .bind(invoice.contact_name.as_str())
        .bind(invoice.description.as_ref().map(|d| d.as_str()))
        .bind(invoice.amount.to_string())
        .bind(invoice.invoice_date.to_rfc3339())
        .bind(invoice.due_date.to_rfc3339())
        .bind(invoice.status.as_str())
        .bind(invoice.id.to_string())
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("update_invoice", e))?;

        // Dropping the transaction here rolls it back.
        if result.rows_affected() == 0 {
            return Err(RepoError::concurrency("Invoice", invoice.id));
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(invoice.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_invoice", e))?;

        Self::insert_items(&mut tx, invoice).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update_invoice", e))?;
        Ok(())
    }

    async fn delete(&self, id: InvoiceId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_invoice", e))?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_invoice", e))?;

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Invoice", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_invoice", e))?;
        Ok(())
    }
}
