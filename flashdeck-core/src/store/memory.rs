use crate::{Card, CoreError, Deck, DeckStore, SyncMode};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

/// Non-durable store, handy for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    // Vec keeps creation order for listing.
    decks: RwLock<Vec<(String, Vec<Card>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeckStore for MemoryStore {
    fn sync_mode(&self) -> SyncMode {
        SyncMode::WriteThrough
    }

    async fn create_deck(&self, name: &str) -> Result<(), CoreError> {
        let deck = Deck::new(name)?;
        let mut m = self.decks.write();
        if m.iter().any(|(n, _)| n == name) {
            return Err(CoreError::DuplicateName(name.to_string()));
        }
        m.push((deck.name().to_string(), Vec::new()));
        debug!(deck = name, "created in memory");
        Ok(())
    }

    async fn load_deck(&self, name: &str) -> Result<Deck, CoreError> {
        let m = self.decks.read();
        let (_, cards) = m
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| CoreError::DeckNotFound(name.to_string()))?;
        Deck::from_cards(name, cards.iter().cloned())
    }

    async fn save_deck(&self, deck: &Deck) -> Result<(), CoreError> {
        let mut m = self.decks.write();
        let Some((_, cards)) = m.iter_mut().find(|(n, _)| n == deck.name()) else {
            return Err(CoreError::DeckNotFound(deck.name().to_string()));
        };
        *cards = deck.cards().to_vec();
        Ok(())
    }

    async fn delete_deck(&self, name: &str) -> Result<(), CoreError> {
        let mut m = self.decks.write();
        let idx = m
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| CoreError::DeckNotFound(name.to_string()))?;
        m.remove(idx);
        Ok(())
    }

    async fn list_deck_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.decks.read().iter().map(|(n, _)| n.clone()).collect())
    }
}
