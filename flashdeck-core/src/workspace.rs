use crate::{Card, CoreError, Deck, DeckStore, StudySession, SyncMode};
use std::sync::Arc;
use tracing::{debug, info};

struct ActiveDeck {
    deck: Deck,
    dirty: bool,
}

/// Session context: the store handle plus the single active deck.
pub struct Workspace {
    store: Arc<dyn DeckStore>,
    active: Option<ActiveDeck>,
}

impl Workspace {
    pub fn new(store: Arc<dyn DeckStore>) -> Self {
        Self { store, active: None }
    }

    pub fn store(&self) -> &Arc<dyn DeckStore> {
        &self.store
    }

    pub fn active_deck(&self) -> Option<&Deck> {
        self.active.as_ref().map(|a| &a.deck)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_deck().map(|d| d.name())
    }

    /// True when the active deck holds changes an explicit-save store has not seen.
    pub fn is_dirty(&self) -> bool {
        self.active.as_ref().map(|a| a.dirty).unwrap_or(false)
    }

    pub async fn list_decks(&self) -> Result<Vec<String>, CoreError> {
        self.store.list_deck_names().await
    }

    /// Registers an empty deck and makes it active.
    pub async fn create_deck(&mut self, name: &str) -> Result<(), CoreError> {
        let deck = Deck::new(name)?;
        self.store.create_deck(name).await?;
        info!(deck = name, "deck created");
        self.active = Some(ActiveDeck { deck, dirty: false });
        Ok(())
    }

    /// Replaces the active deck with the stored one. The current deck is
    /// left untouched if the load fails.
    pub async fn load_deck(&mut self, name: &str) -> Result<&Deck, CoreError> {
        let deck = self.store.load_deck(name).await?;
        debug!(deck = name, cards = deck.len(), "deck loaded");
        let active = self.active.insert(ActiveDeck { deck, dirty: false });
        Ok(&active.deck)
    }

    pub async fn save(&mut self) -> Result<(), CoreError> {
        let active = self.active.as_mut().ok_or(CoreError::NoActiveDeck)?;
        self.store.save_deck(&active.deck).await?;
        active.dirty = false;
        debug!(deck = active.deck.name(), cards = active.deck.len(), "deck saved");
        Ok(())
    }

    /// Deletes a stored deck. Returns true when it was the active deck,
    /// which is then unloaded.
    pub async fn delete_deck(&mut self, name: &str) -> Result<bool, CoreError> {
        self.store.delete_deck(name).await?;
        info!(deck = name, "deck deleted");
        if self.active_name() == Some(name) {
            self.active = None;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn cards(&self) -> Result<&[Card], CoreError> {
        self.active_deck()
            .map(|d| d.cards())
            .ok_or(CoreError::NoActiveDeck)
    }

    /// Adds or overwrites a card. Returns the previous back on overwrite.
    pub async fn add_card(&mut self, front: &str, back: &str) -> Result<Option<String>, CoreError> {
        let write_through = self.write_through();
        let active = self.active.as_mut().ok_or(CoreError::NoActiveDeck)?;
        let mut next = active.deck.clone();
        let previous = next.insert(front, back)?;
        if write_through {
            self.store.put_card(next.name(), front, back).await?;
        } else {
            active.dirty = true;
        }
        active.deck = next;
        Ok(previous)
    }

    pub async fn remove_card(&mut self, front: &str) -> Result<Card, CoreError> {
        let write_through = self.write_through();
        let active = self.active.as_mut().ok_or(CoreError::NoActiveDeck)?;
        let mut next = active.deck.clone();
        let removed = next.remove(front)?;
        if write_through {
            self.store.remove_card(next.name(), front).await?;
        } else {
            active.dirty = true;
        }
        active.deck = next;
        Ok(removed)
    }

    pub async fn clear_cards(&mut self) -> Result<usize, CoreError> {
        let write_through = self.write_through();
        let active = self.active.as_mut().ok_or(CoreError::NoActiveDeck)?;
        let count = active.deck.len();
        if write_through {
            self.store.clear_cards(active.deck.name()).await?;
        } else {
            active.dirty = true;
        }
        active.deck.clear();
        Ok(count)
    }

    pub fn start_session(&self) -> Result<StudySession, CoreError> {
        self.active_deck()
            .map(StudySession::start)
            .ok_or(CoreError::NoActiveDeck)
    }

    /// Releases the store handle. Unsaved changes are dropped.
    pub async fn close(&self) -> Result<(), CoreError> {
        self.store.close().await
    }

    fn write_through(&self) -> bool {
        self.store.sync_mode() == SyncMode::WriteThrough
    }
}
