use flashdeck_core::{Card, CoreError, Deck, DeckStore, SessionStep, SyncMode, Workspace};
use flashdeck_sqlite::SqliteStore;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn round_trip_in_memory() {
    let store = SqliteStore::open_memory().await.unwrap();
    assert_eq!(store.sync_mode(), SyncMode::WriteThrough);

    store.create_deck("Lang").await.unwrap();
    let mut deck = Deck::new("Lang").unwrap();
    deck.insert("hola", "hello").unwrap();
    deck.insert("adios", "goodbye").unwrap();
    deck.insert("vacío", "").unwrap();
    store.save_deck(&deck).await.unwrap();

    assert_eq!(store.load_deck("Lang").await.unwrap(), deck);

    // A second save replaces rather than appends.
    deck.remove("hola").unwrap();
    store.save_deck(&deck).await.unwrap();
    assert_eq!(store.load_deck("Lang").await.unwrap(), deck);
}

#[tokio::test]
async fn duplicate_names_hit_the_constraint() {
    let store = SqliteStore::open_memory().await.unwrap();
    store.create_deck("X").await.unwrap();
    store.put_card("X", "k", "v").await.unwrap();

    assert!(matches!(store.create_deck("X").await, Err(CoreError::DuplicateName(_))));
    assert_eq!(
        store.load_deck("X").await.unwrap().cards(),
        &[Card::new("k", "v")]
    );
    assert_eq!(store.list_deck_names().await.unwrap(), vec!["X"]);
}

#[tokio::test]
async fn upsert_overwrites_in_place() {
    let store = SqliteStore::open_memory().await.unwrap();
    store.create_deck("d").await.unwrap();
    store.put_card("d", "a", "1").await.unwrap();
    store.put_card("d", "b", "2").await.unwrap();
    store.put_card("d", "a", "3").await.unwrap();
    assert_eq!(
        store.load_deck("d").await.unwrap().cards(),
        &[Card::new("a", "3"), Card::new("b", "2")]
    );
}

#[tokio::test]
async fn card_hooks_report_missing_things() {
    let store = SqliteStore::open_memory().await.unwrap();
    assert!(matches!(store.put_card("nope", "a", "b").await, Err(CoreError::DeckNotFound(_))));
    store.create_deck("d").await.unwrap();
    assert!(matches!(store.remove_card("d", "a").await, Err(CoreError::CardNotFound(_))));
    assert!(matches!(store.put_card("d", "", "b").await, Err(CoreError::Invalid(_))));

    store.put_card("d", "a", "1").await.unwrap();
    store.put_card("d", "b", "2").await.unwrap();
    store.remove_card("d", "a").await.unwrap();
    assert_eq!(store.load_deck("d").await.unwrap().len(), 1);
    store.clear_cards("d").await.unwrap();
    assert!(store.load_deck("d").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_cascades_to_cards() {
    let store = SqliteStore::open_memory().await.unwrap();
    store.create_deck("gone").await.unwrap();
    store.create_deck("kept").await.unwrap();
    store.put_card("gone", "a", "1").await.unwrap();
    store.put_card("kept", "a", "1").await.unwrap();

    store.delete_deck("gone").await.unwrap();
    assert!(matches!(store.load_deck("gone").await, Err(CoreError::DeckNotFound(_))));
    assert!(matches!(store.delete_deck("gone").await, Err(CoreError::DeckNotFound(_))));
    assert_eq!(store.list_deck_names().await.unwrap(), vec!["kept"]);
    assert_eq!(store.load_deck("kept").await.unwrap().len(), 1);

    // Re-creating the name starts empty.
    store.create_deck("gone").await.unwrap();
    assert!(store.load_deck("gone").await.unwrap().is_empty());
}

#[tokio::test]
async fn save_of_unknown_deck_fails() {
    let store = SqliteStore::open_memory().await.unwrap();
    let deck = Deck::new("ghost").unwrap();
    assert!(matches!(store.save_deck(&deck).await, Err(CoreError::DeckNotFound(_))));
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("decks.sqlite3");

    let store = Arc::new(SqliteStore::open_file(&path).await.unwrap());
    let mut ws = Workspace::new(store.clone());
    ws.create_deck("Capitals").await.unwrap();
    ws.add_card("France", "Paris").await.unwrap();
    ws.add_card("Japan", "Tokyo").await.unwrap();
    assert!(!ws.is_dirty());
    ws.close().await.unwrap();

    let reopened = Arc::new(SqliteStore::open_file(&path).await.unwrap());
    let mut ws = Workspace::new(reopened.clone());
    ws.load_deck("Capitals").await.unwrap();
    assert_eq!(
        ws.cards().unwrap(),
        &[Card::new("France", "Paris"), Card::new("Japan", "Tokyo")]
    );

    let mut session = ws.start_session().unwrap();
    assert!(matches!(session.next_card(), SessionStep::Card(_)));
    session.quit();
    assert_eq!(reopened.load_deck("Capitals").await.unwrap().len(), 2);
}

#[tokio::test]
async fn unopenable_path_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing-dir").join("decks.sqlite3");
    assert!(matches!(
        SqliteStore::open_file(&path).await,
        Err(CoreError::StorageUnavailable(_))
    ));
}
