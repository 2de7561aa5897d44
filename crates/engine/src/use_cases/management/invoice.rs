//! Invoice CRUD operations.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use castdb_domain::{
    Amount, ContactName, Description, Invoice, InvoiceId, InvoiceItem, InvoiceItemId,
    InvoiceNumber, InvoiceStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::infrastructure::ports::InvoiceRepo;

use super::{settle_update, ManagementError};

/// Client-supplied invoice record for create and replace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(default)]
    pub id: Option<InvoiceId>,
    pub invoice_number: String,
    pub contact_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Decimal,
    pub invoice_date: DateTime<FixedOffset>,
    pub due_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub invoice_items: Vec<InvoiceItemInput>,
    #[serde(default)]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemInput {
    #[serde(default)]
    pub id: Option<InvoiceItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
}

fn optional_description(value: Option<String>) -> Result<Option<Description>, ManagementError> {
    Ok(value
        .map(Description::new)
        .transpose()?
        .filter(|d| !d.is_empty()))
}

impl InvoiceInput {
    fn into_invoice(self, id: InvoiceId) -> Result<Invoice, ManagementError> {
        let invoice_items = self
            .invoice_items
            .into_iter()
            .map(|item| {
                InvoiceItem::new(
                    item.id.unwrap_or_default(),
                    item.name,
                    optional_description(item.description)?,
                    Amount::new(item.unit_price)?,
                    item.quantity,
                )
                .map_err(ManagementError::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Invoice {
            id,
            invoice_number: InvoiceNumber::new(self.invoice_number)?,
            contact_name: ContactName::new(self.contact_name)?,
            description: optional_description(self.description)?,
            amount: Amount::new(self.amount)?,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            status: self.status,
            invoice_items,
            version: 1,
        })
    }
}

pub struct InvoiceCrud {
    invoices: Arc<dyn InvoiceRepo>,
}

impl InvoiceCrud {
    pub fn new(invoices: Arc<dyn InvoiceRepo>) -> Self {
        Self { invoices }
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, ManagementError> {
        Ok(self.invoices.list().await?)
    }

    pub async fn get(&self, invoice_id: InvoiceId) -> Result<Invoice, ManagementError> {
        self.invoices
            .get(invoice_id)
            .await?
            .ok_or_else(|| ManagementError::not_found("Invoice", invoice_id))
    }

    pub async fn create(&self, input: InvoiceInput) -> Result<Invoice, ManagementError> {
        let id = input.id.unwrap_or_default();
        let invoice = input.into_invoice(id)?;

        self.invoices.create(&invoice).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            items = invoice.invoice_items.len(),
            "Created invoice"
        );
        Ok(invoice)
    }

    /// Replace the stored invoice and its full item list.
    pub async fn update(
        &self,
        invoice_id: InvoiceId,
        input: InvoiceInput,
    ) -> Result<(), ManagementError> {
        let body_id = input
            .id
            .ok_or_else(|| ManagementError::id_mismatch(invoice_id, "none"))?;
        if body_id != invoice_id {
            return Err(ManagementError::id_mismatch(invoice_id, body_id));
        }

        let version = input.version;
        let invoice = input.into_invoice(invoice_id)?;

        let outcome = self.invoices.update(&invoice, version).await;
        settle_update("Invoice", invoice_id, outcome, self.invoices.exists(invoice_id)).await?;

        tracing::info!(invoice_id = %invoice_id, "Updated invoice");
        Ok(())
    }

    pub async fn delete(&self, invoice_id: InvoiceId) -> Result<(), ManagementError> {
        if self.invoices.get(invoice_id).await?.is_none() {
            return Err(ManagementError::not_found("Invoice", invoice_id));
        }

        self.invoices.delete(invoice_id).await?;
        tracing::info!(invoice_id = %invoice_id, "Deleted invoice and its items");
        Ok(())
    }
}
