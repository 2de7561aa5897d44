//! Invoice entity and its owned line items.
//!
//! An invoice exclusively owns its items: they are replaced together with the
//! invoice on update and removed with it on delete.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Amount, ContactName, Description, InvoiceNumber};
use crate::{InvoiceId, InvoiceItemId};

/// Maximum length for line item names
pub const MAX_ITEM_NAME_LENGTH: usize = 64;

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    AwaitPayment,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::AwaitPayment => "AwaitPayment",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "AwaitPayment" => Ok(Self::AwaitPayment),
            "Paid" => Ok(Self::Paid),
            "Overdue" => Ok(Self::Overdue),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::parse(format!("Unknown invoice status: {}", s))),
        }
    }
}

/// One billed line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: InvoiceItemId,
    pub name: String,
    pub description: Option<Description>,
    pub unit_price: Amount,
    pub quantity: u32,
    /// `unit_price * quantity`, derived on construction
    pub amount: Amount,
}

impl InvoiceItem {
    pub fn new(
        id: InvoiceItemId,
        name: impl Into<String>,
        description: Option<Description>,
        unit_price: Amount,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Invoice item name cannot be empty"));
        }
        if name.chars().count() > MAX_ITEM_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Invoice item name cannot exceed {} characters",
                MAX_ITEM_NAME_LENGTH
            )));
        }
        if quantity == 0 {
            return Err(DomainError::validation(
                "Invoice item quantity must be at least 1",
            ));
        }
        let amount = unit_price.times(quantity)?;
        Ok(Self {
            id,
            name,
            description: description.filter(|d| !d.is_empty()),
            unit_price,
            quantity,
            amount,
        })
    }
}

/// A stored invoice record with its ordered line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: InvoiceNumber,
    pub contact_name: ContactName,
    pub description: Option<Description>,
    pub amount: Amount,
    pub invoice_date: DateTime<FixedOffset>,
    pub due_date: DateTime<FixedOffset>,
    pub status: InvoiceStatus,
    pub invoice_items: Vec<InvoiceItem>,
    pub version: i64,
}
