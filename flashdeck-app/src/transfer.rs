//! JSON and CSV bundles for moving decks between stores.

use anyhow::{bail, Result};
use flashdeck_core::{Card, CoreError, Deck, DeckStore, Workspace};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub version: u32,
    pub decks: Vec<ExportDeck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDeck {
    pub name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    deck: String,
    front: String,
    back: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub decks_created: usize,
    pub cards_added: usize,
    pub cards_updated: usize,
}

/// Collects every deck, or just `only`, from the store.
pub async fn collect(store: &dyn DeckStore, only: Option<&str>) -> Result<ExportBundle, CoreError> {
    let names = match only {
        Some(name) => vec![name.to_string()],
        None => store.list_deck_names().await?,
    };
    let mut decks = Vec::with_capacity(names.len());
    for name in names {
        let deck = store.load_deck(&name).await?;
        decks.push(ExportDeck {
            name,
            cards: deck.cards().to_vec(),
        });
    }
    Ok(ExportBundle {
        version: BUNDLE_VERSION,
        decks,
    })
}

pub fn write_json(bundle: &ExportBundle, path: &Path) -> Result<()> {
    let s = serde_json::to_string_pretty(bundle)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<ExportBundle> {
    let data = std::fs::read_to_string(path)?;
    let bundle: ExportBundle = serde_json::from_str(&data)?;
    if bundle.version != BUNDLE_VERSION {
        bail!("unsupported bundle version {}", bundle.version);
    }
    Ok(bundle)
}

pub fn write_csv(bundle: &ExportBundle, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for deck in &bundle.decks {
        for c in &deck.cards {
            wtr.serialize(CsvRow {
                deck: deck.name.clone(),
                front: c.front.clone(),
                back: c.back.clone(),
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Reads `deck,front,back` rows, grouping them by deck in first-seen order.
/// With `deck` set, every row goes to that deck.
pub fn read_csv(path: &Path, deck: Option<&str>) -> Result<ExportBundle> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut decks: Vec<ExportDeck> = Vec::new();
    for row in rdr.deserialize() {
        let row: CsvRow = row?;
        let name = deck.map(str::to_string).unwrap_or(row.deck);
        let card = Card::new(row.front, row.back);
        match decks.iter_mut().find(|d| d.name == name) {
            Some(d) => d.cards.push(card),
            None => decks.push(ExportDeck {
                name,
                cards: vec![card],
            }),
        }
    }
    Ok(ExportBundle {
        version: BUNDLE_VERSION,
        decks,
    })
}

/// Merges a bundle into the store behind `ws`, creating missing decks.
/// Colliding fronts overwrite. Leaves the last imported deck active.
///
/// Every deck and card is validated before the store is touched, so a bad
/// row rejects the whole bundle.
pub async fn import(ws: &mut Workspace, bundle: &ExportBundle) -> Result<ImportReport, CoreError> {
    let decks = bundle
        .decks
        .iter()
        .map(|d| Deck::from_cards(d.name.as_str(), d.cards.iter().cloned()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = ImportReport::default();
    for deck in &decks {
        match ws.create_deck(deck.name()).await {
            Ok(()) => report.decks_created += 1,
            Err(CoreError::DuplicateName(_)) => {
                ws.load_deck(deck.name()).await?;
            }
            Err(e) => return Err(e),
        }
        for c in deck.cards() {
            match ws.add_card(&c.front, &c.back).await? {
                None => report.cards_added += 1,
                Some(_) => report.cards_updated += 1,
            }
        }
        if ws.is_dirty() {
            ws.save().await?;
        }
        info!(deck = deck.name(), cards = deck.len(), "imported");
    }
    Ok(report)
}
