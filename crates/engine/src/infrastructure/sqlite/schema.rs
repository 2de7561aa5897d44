//! SQLite schema initialization and optional sample data.

use chrono::{DateTime, FixedOffset, TimeZone};
use castdb_domain::{
    ContactName, Description, Invoice, InvoiceId, InvoiceNumber, InvoiceStatus,
};
use sqlx::SqlitePool;

use crate::infrastructure::ports::{InvoiceRepo, RepoError};

use super::SqliteInvoiceRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS actors (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        version INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        release_year INTEGER NOT NULL,
        version INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_actors (
        movie_id TEXT NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        actor_id TEXT NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
        update_time TEXT NOT NULL,
        PRIMARY KEY (movie_id, actor_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS movie_actors_actor_id ON movie_actors (actor_id)",
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY NOT NULL,
        invoice_number TEXT NOT NULL,
        contact_name TEXT NOT NULL,
        description TEXT,
        amount TEXT NOT NULL,
        invoice_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        status TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_items (
        id TEXT PRIMARY KEY NOT NULL,
        invoice_id TEXT NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        unit_price TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        amount TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS invoice_items_invoice_id ON invoice_items (invoice_id, position)",
];

/// Create tables and indexes.
///
/// Safe to call on every startup; every statement is `IF NOT EXISTS`.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    tracing::info!("SQLite schema initialized (tables and indexes ensured)");
    Ok(())
}

/// Insert the sample invoice when the invoices table is empty.
///
/// Returns whether anything was inserted.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<bool, RepoError> {
    let repo = SqliteInvoiceRepo::new(pool.clone());
    if !repo.list().await?.is_empty() {
        tracing::debug!("Invoices already present, skipping sample data");
        return Ok(false);
    }

    let invoice = sample_invoice()?;
    repo.create(&invoice).await?;
    tracing::info!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        "Seeded sample invoice"
    );
    Ok(true)
}

fn sample_invoice() -> Result<Invoice, RepoError> {
    let invalid = |e: castdb_domain::DomainError| RepoError::serialization(e.to_string());
    Ok(Invoice {
        id: InvoiceId::new(),
        invoice_number: InvoiceNumber::new("INV-001").map_err(invalid)?,
        contact_name: ContactName::new("Iron Man").map_err(invalid)?,
        description: Some(Description::new("Invoice for the first month").map_err(invalid)?),
        amount: "100".parse().map_err(invalid)?,
        invoice_date: utc_midnight(2023, 1, 1)?,
        due_date: utc_midnight(2023, 1, 15)?,
        status: InvoiceStatus::AwaitPayment,
        invoice_items: Vec::new(),
        version: 1,
    })
}

fn utc_midnight(year: i32, month: u32, day: u32) -> Result<DateTime<FixedOffset>, RepoError> {
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| RepoError::serialization("invalid UTC offset"))?;
    utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| RepoError::serialization("invalid sample date"))
}
