use flashdeck_core::{Card, CoreError, Deck};

#[test]
fn insert_keeps_order_and_overwrites_in_place() {
    let mut deck = Deck::new("Capitals").unwrap();
    assert_eq!(deck.insert("France", "Paris").unwrap(), None);
    assert_eq!(deck.insert("Japan", "Tokyo").unwrap(), None);

    let prev = deck.insert("France", "Lyon").unwrap();
    assert_eq!(prev.as_deref(), Some("Paris"));
    assert_eq!(deck.len(), 2);
    assert_eq!(
        deck.cards(),
        &[Card::new("France", "Lyon"), Card::new("Japan", "Tokyo")]
    );
}

#[test]
fn empty_back_is_allowed() {
    let mut deck = Deck::new("d").unwrap();
    deck.insert("blank back", "").unwrap();
    assert_eq!(deck.get("blank back").unwrap().back, "");
}

#[test]
fn rejects_blank_front_and_multiline_text() {
    let mut deck = Deck::new("d").unwrap();
    assert!(matches!(deck.insert("", "x"), Err(CoreError::Invalid(_))));
    assert!(matches!(deck.insert("   ", "x"), Err(CoreError::Invalid(_))));
    assert!(matches!(deck.insert("a\nb", "x"), Err(CoreError::Invalid(_))));
    assert!(matches!(deck.insert("a", "x\r\ny"), Err(CoreError::Invalid(_))));
    assert!(deck.is_empty());
}

#[test]
fn rejects_bad_deck_names() {
    assert!(matches!(Deck::new(""), Err(CoreError::Invalid(_))));
    assert!(matches!(Deck::new(" \t"), Err(CoreError::Invalid(_))));
    assert!(matches!(Deck::new("two\nlines"), Err(CoreError::Invalid(_))));
}

#[test]
fn remove_and_clear() {
    let mut deck = Deck::from_cards(
        "Lang",
        vec![Card::new("hola", "hello"), Card::new("adios", "goodbye")],
    )
    .unwrap();

    let removed = deck.remove("hola").unwrap();
    assert_eq!(removed.back, "hello");
    match deck.remove("hola") {
        Err(CoreError::CardNotFound(front)) => assert_eq!(front, "hola"),
        other => panic!("expected CardNotFound, got {other:?}"),
    }

    deck.clear();
    assert!(deck.is_empty());
}

#[test]
fn from_cards_collapses_duplicate_fronts() {
    let deck = Deck::from_cards(
        "d",
        vec![
            Card::new("a", "1"),
            Card::new("b", "2"),
            Card::new("a", "3"),
        ],
    )
    .unwrap();
    assert_eq!(deck.cards(), &[Card::new("a", "3"), Card::new("b", "2")]);
}
