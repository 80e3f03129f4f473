use crate::{CoreError, Deck};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStore;

/// When a store expects mutations of the active deck to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// Changes stay in memory until `save_deck`.
    Explicit,
    /// Every card mutation is committed through the card hooks before returning.
    WriteThrough,
}

#[async_trait]
pub trait DeckStore: Send + Sync {
    fn sync_mode(&self) -> SyncMode;

    // Decks
    async fn create_deck(&self, name: &str) -> Result<(), CoreError>;
    async fn load_deck(&self, name: &str) -> Result<Deck, CoreError>;
    async fn save_deck(&self, deck: &Deck) -> Result<(), CoreError>;
    async fn delete_deck(&self, name: &str) -> Result<(), CoreError>;
    async fn list_deck_names(&self) -> Result<Vec<String>, CoreError>;

    // Cards
    async fn put_card(&self, deck: &str, front: &str, back: &str) -> Result<(), CoreError> {
        let mut d = self.load_deck(deck).await?;
        d.insert(front, back)?;
        self.save_deck(&d).await
    }

    async fn remove_card(&self, deck: &str, front: &str) -> Result<(), CoreError> {
        let mut d = self.load_deck(deck).await?;
        d.remove(front)?;
        self.save_deck(&d).await
    }

    async fn clear_cards(&self, deck: &str) -> Result<(), CoreError> {
        let mut d = self.load_deck(deck).await?;
        d.clear();
        self.save_deck(&d).await
    }

    async fn close(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
