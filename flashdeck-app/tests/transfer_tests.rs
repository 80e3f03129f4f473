use flashdeck_app::transfer::{self, ExportBundle, ExportDeck, ImportReport};
use flashdeck_core::{Card, CoreError, DeckStore, MemoryStore, Workspace};
use flashdeck_text::{paths, TextStore};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

async fn seeded() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.create_deck("Capitals").await.unwrap();
    store.put_card("Capitals", "France", "Paris").await.unwrap();
    store.put_card("Capitals", "Japan", "Tokyo").await.unwrap();
    store.create_deck("Lang").await.unwrap();
    store.put_card("Lang", "hola", "hello").await.unwrap();
    store
}

#[tokio::test]
async fn json_round_trip_into_a_fresh_store() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bundle.json");
    let source = seeded().await;

    let bundle = transfer::collect(&*source, None).await.unwrap();
    assert_eq!(bundle.decks.len(), 2);
    transfer::write_json(&bundle, &path).unwrap();
    let read = transfer::read_json(&path).unwrap();
    assert_eq!(read, bundle);

    let target = Arc::new(MemoryStore::new());
    let mut ws = Workspace::new(target.clone());
    let report = transfer::import(&mut ws, &read).await.unwrap();
    assert_eq!(
        report,
        ImportReport { decks_created: 2, cards_added: 3, cards_updated: 0 }
    );
    assert_eq!(
        target.load_deck("Capitals").await.unwrap(),
        source.load_deck("Capitals").await.unwrap()
    );
}

#[tokio::test]
async fn csv_import_merges_into_existing_deck() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("cards.csv");
    fs::write(
        &path,
        "deck,front,back\nCapitals,France,Lyon\nCapitals,Peru,Lima\nNew,a,b\n",
    )
    .unwrap();

    let store = seeded().await;
    let mut ws = Workspace::new(store.clone());
    let bundle = transfer::read_csv(&path, None).unwrap();
    let report = transfer::import(&mut ws, &bundle).await.unwrap();
    assert_eq!(
        report,
        ImportReport { decks_created: 1, cards_added: 2, cards_updated: 1 }
    );
    assert_eq!(
        store.load_deck("Capitals").await.unwrap().cards(),
        &[
            Card::new("France", "Lyon"),
            Card::new("Japan", "Tokyo"),
            Card::new("Peru", "Lima"),
        ]
    );
}

#[tokio::test]
async fn csv_export_of_one_deck() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lang.csv");
    let store = seeded().await;
    let bundle = transfer::collect(&*store, Some("Lang")).await.unwrap();
    transfer::write_csv(&bundle, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "deck,front,back\nLang,hola,hello\n");

    let back = transfer::read_csv(&path, Some("Renamed")).unwrap();
    assert_eq!(
        back.decks,
        vec![ExportDeck { name: "Renamed".into(), cards: vec![Card::new("hola", "hello")] }]
    );
}

#[test]
fn rejects_unknown_bundle_versions() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bundle.json");
    let bundle = ExportBundle { version: 9, decks: vec![] };
    transfer::write_json(&bundle, &path).unwrap();
    assert!(transfer::read_json(&path).is_err());
}

fn bundle_with_a_blank_front() -> ExportBundle {
    ExportBundle {
        version: 1,
        decks: vec![
            ExportDeck { name: "Good".into(), cards: vec![Card::new("a", "1")] },
            ExportDeck {
                name: "Bad".into(),
                cards: vec![Card::new("ok", "x"), Card::new("  ", "y")],
            },
        ],
    }
}

#[tokio::test]
async fn invalid_card_rejects_the_whole_import() {
    let store = Arc::new(MemoryStore::new());
    let mut ws = Workspace::new(store.clone());
    let res = transfer::import(&mut ws, &bundle_with_a_blank_front()).await;
    assert!(matches!(res, Err(CoreError::Invalid(_))));
    assert!(store.list_deck_names().await.unwrap().is_empty());
    assert!(ws.active_deck().is_none());
}

#[tokio::test]
async fn invalid_card_leaves_deck_files_untouched() {
    let tmp = TempDir::new().unwrap();
    paths::create_user(tmp.path(), "tester").unwrap();
    let store = Arc::new(TextStore::open_user(tmp.path(), "tester", 0).await.unwrap());
    store.create_deck("Good").await.unwrap();
    store.put_card("Good", "a", "old").await.unwrap();

    let mut ws = Workspace::new(store.clone());
    let res = transfer::import(&mut ws, &bundle_with_a_blank_front()).await;
    assert!(matches!(res, Err(CoreError::Invalid(_))));
    assert_eq!(store.list_deck_names().await.unwrap(), vec!["Good"]);
    assert_eq!(
        store.load_deck("Good").await.unwrap().cards(),
        &[Card::new("a", "old")]
    );
}
