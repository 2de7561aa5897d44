//! SQLite adapter tests against a private in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use castdb_domain::{
    Actor, ActorName, ContactName, Invoice, InvoiceId, InvoiceItem, InvoiceItemId,
    InvoiceNumber, InvoiceStatus, Movie, MovieActor, MovieTitle,
};
use sqlx::SqlitePool;

use super::*;
use crate::infrastructure::ports::{ActorRepo, CastingRepo, InvoiceRepo, MovieRepo, RepoError};

async fn setup() -> (SqlitePool, SqliteRepositories) {
    let pool = connect_in_memory().await.expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");
    let repos = SqliteRepositories::new(pool.clone());
    (pool, repos)
}

fn actor(name: &str) -> Actor {
    Actor::new(ActorName::new(name).unwrap())
}

fn movie(title: &str, year: i32) -> Movie {
    Movie::new(MovieTitle::new(title).unwrap(), year)
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn invoice_with_items(names: &[&str]) -> Invoice {
    let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
    let items = names
        .iter()
        .map(|name| {
            InvoiceItem::new(InvoiceItemId::new(), *name, None, "10.00".parse().unwrap(), 2)
                .unwrap()
        })
        .collect();
    Invoice {
        id: InvoiceId::new(),
        invoice_number: InvoiceNumber::new("INV-100").unwrap(),
        contact_name: ContactName::new("Pepper Potts").unwrap(),
        description: None,
        amount: "40.00".parse().unwrap(),
        invoice_date: offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        due_date: offset.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap(),
        status: InvoiceStatus::Draft,
        invoice_items: items,
        version: 1,
    }
}

#[tokio::test]
async fn actor_round_trips() {
    let (_pool, repos) = setup().await;
    let iron_man = actor("Iron Man");

    repos.actor.create(&iron_man).await.unwrap();

    let loaded = repos.actor.get(iron_man.id).await.unwrap();
    assert_eq!(loaded, Some(iron_man.clone()));
    assert!(repos.actor.exists(iron_man.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_actor_name_is_a_constraint_violation() {
    let (_pool, repos) = setup().await;
    repos.actor.create(&actor("Iron Man")).await.unwrap();

    let err = repos.actor.create(&actor("Iron Man")).await.unwrap_err();

    match err {
        RepoError::ConstraintViolation(msg) => assert!(msg.contains("Iron Man")),
        other => panic!("expected constraint violation, got {other:?}"),
    }
    assert_eq!(repos.actor.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_bumps_version_and_rejects_stale_token() {
    let (_pool, repos) = setup().await;
    let mut hulk = actor("Hulk");
    repos.actor.create(&hulk).await.unwrap();

    hulk.name = ActorName::new("Bruce Banner").unwrap();
    repos.actor.update(&hulk, Some(1)).await.unwrap();

    let stored = repos.actor.get(hulk.id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Bruce Banner");
    assert_eq!(stored.version, 2);

    let err = repos.actor.update(&hulk, Some(1)).await.unwrap_err();
    assert!(err.is_concurrency());

    // No token: last write wins
    repos.actor.update(&hulk, None).await.unwrap();
    assert_eq!(repos.actor.get(hulk.id).await.unwrap().unwrap().version, 3);
}

#[tokio::test]
async fn update_of_missing_record_is_a_concurrency_error() {
    let (_pool, repos) = setup().await;

    let err = repos.actor.update(&actor("Ghost"), None).await.unwrap_err();

    assert!(err.is_concurrency());
}

#[tokio::test]
async fn duplicate_link_is_a_constraint_violation_and_unlink_is_idempotent() {
    let (_pool, repos) = setup().await;
    let thor = actor("Thor");
    let avengers = movie("Avengers", 2012);
    repos.actor.create(&thor).await.unwrap();
    repos.movie.create(&avengers).await.unwrap();

    let link = MovieActor::new(avengers.id, thor.id, fixed_time());
    repos.casting.link(&link).await.unwrap();

    let err = repos.casting.link(&link).await.unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));

    let stored = repos.casting.get_link(thor.id, avengers.id).await.unwrap();
    assert_eq!(stored, Some(link));
    assert_eq!(repos.casting.movies_for_actor(thor.id).await.unwrap(), vec![avengers.clone()]);

    assert!(repos.casting.unlink(thor.id, avengers.id).await.unwrap());
    assert!(!repos.casting.unlink(thor.id, avengers.id).await.unwrap());
    assert!(repos.casting.movies_for_actor(thor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn link_to_missing_movie_is_not_found() {
    let (_pool, repos) = setup().await;
    let thor = actor("Thor");
    repos.actor.create(&thor).await.unwrap();

    let link = MovieActor::new(movie("Unreleased", 2030).id, thor.id, fixed_time());
    let err = repos.casting.link(&link).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn deleting_an_actor_removes_its_links() {
    let (_pool, repos) = setup().await;
    let widow = actor("Black Widow");
    let avengers = movie("Avengers", 2012);
    repos.actor.create(&widow).await.unwrap();
    repos.movie.create(&avengers).await.unwrap();
    repos
        .casting
        .link(&MovieActor::new(avengers.id, widow.id, fixed_time()))
        .await
        .unwrap();

    repos.actor.delete(widow.id).await.unwrap();

    assert!(repos.casting.actors_for_movie(avengers.id).await.unwrap().is_empty());
    assert!(repos.casting.get_link(widow.id, avengers.id).await.unwrap().is_none());
    assert!(repos.movie.exists(avengers.id).await.unwrap());
}

#[tokio::test]
async fn deleting_a_movie_removes_its_links() {
    let (_pool, repos) = setup().await;
    let widow = actor("Black Widow");
    let avengers = movie("Avengers", 2012);
    repos.actor.create(&widow).await.unwrap();
    repos.movie.create(&avengers).await.unwrap();
    repos
        .casting
        .link(&MovieActor::new(avengers.id, widow.id, fixed_time()))
        .await
        .unwrap();

    repos.movie.delete(avengers.id).await.unwrap();

    assert!(repos.movie.get(avengers.id).await.unwrap().is_none());
    assert!(repos.casting.movies_for_actor(widow.id).await.unwrap().is_empty());
    assert!(repos.casting.get_link(widow.id, avengers.id).await.unwrap().is_none());
    assert!(repos.actor.exists(widow.id).await.unwrap());

    let err = repos.movie.delete(avengers.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn movie_update_replaces_fields_and_bumps_version() {
    let (_pool, repos) = setup().await;
    let avengers = movie("Avengers", 2012);
    repos.movie.create(&avengers).await.unwrap();

    let mut renamed = avengers.clone();
    renamed.title = MovieTitle::new("The Avengers").unwrap();
    renamed.release_year = 2013;
    repos.movie.update(&renamed, Some(1)).await.unwrap();

    let stored = repos.movie.get(avengers.id).await.unwrap().unwrap();
    assert_eq!(stored.title.as_str(), "The Avengers");
    assert_eq!(stored.release_year, 2013);
    assert_eq!(stored.version, 2);

    let err = repos.movie.update(&renamed, Some(1)).await.unwrap_err();
    assert!(err.is_concurrency());
}

#[tokio::test]
async fn deleting_a_missing_actor_is_not_found() {
    let (_pool, repos) = setup().await;

    let err = repos.actor.delete(actor("Nobody").id).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn invoice_items_keep_their_order() {
    let (_pool, repos) = setup().await;
    let invoice = invoice_with_items(&["Design", "Build", "Audit"]);

    repos.invoice.create(&invoice).await.unwrap();

    let loaded = repos.invoice.get(invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded, invoice);
    let names: Vec<_> = loaded.invoice_items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Design", "Build", "Audit"]);
    assert_eq!(repos.invoice.list().await.unwrap(), vec![invoice]);
}

#[tokio::test]
async fn invoice_update_replaces_items() {
    let (_pool, repos) = setup().await;
    let mut invoice = invoice_with_items(&["Design", "Build"]);
    repos.invoice.create(&invoice).await.unwrap();

    invoice.invoice_items = invoice_with_items(&["Support"]).invoice_items;
    invoice.status = InvoiceStatus::Paid;
    repos.invoice.update(&invoice, Some(1)).await.unwrap();

    let loaded = repos.invoice.get(invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, InvoiceStatus::Paid);
    assert_eq!(loaded.version, 2);
    assert_eq!(loaded.invoice_items.len(), 1);
    assert_eq!(loaded.invoice_items[0].name, "Support");
}

#[tokio::test]
async fn stale_invoice_update_leaves_items_untouched() {
    let (_pool, repos) = setup().await;
    let mut invoice = invoice_with_items(&["Design", "Build"]);
    repos.invoice.create(&invoice).await.unwrap();

    invoice.invoice_items.clear();
    let err = repos.invoice.update(&invoice, Some(7)).await.unwrap_err();

    assert!(err.is_concurrency());
    let loaded = repos.invoice.get(invoice.id).await.unwrap().unwrap();
    assert_eq!(loaded.invoice_items.len(), 2);
}

#[tokio::test]
async fn deleting_an_invoice_removes_its_items() {
    let (pool, repos) = setup().await;
    let invoice = invoice_with_items(&["Design"]);
    repos.invoice.create(&invoice).await.unwrap();

    repos.invoice.delete(invoice.id).await.unwrap();

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoice_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(!repos.invoice.exists(invoice.id).await.unwrap());
}

#[tokio::test]
async fn sample_data_is_seeded_once() {
    let (pool, repos) = setup().await;

    assert!(seed_sample_data(&pool).await.unwrap());
    assert!(!seed_sample_data(&pool).await.unwrap());

    let invoices = repos.invoice.list().await.unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].invoice_number.as_str(), "INV-001");
    assert_eq!(invoices[0].amount.to_string(), "100.00");
    assert_eq!(invoices[0].status, InvoiceStatus::AwaitPayment);
}
