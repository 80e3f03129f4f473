use crate::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// A named, insertion-ordered set of cards keyed by their front text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    name: String,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        validate_deck_name(&name)?;
        Ok(Self {
            name,
            cards: Vec::new(),
        })
    }

    /// Builds a deck from stored pairs. Later duplicates of a front overwrite earlier ones.
    pub fn from_cards<I>(name: impl Into<String>, cards: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut deck = Self::new(name)?;
        for c in cards {
            deck.insert(c.front, c.back)?;
        }
        Ok(deck)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, front: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.front == front)
    }

    /// Inserts a card, or replaces the back of the card with the same front
    /// without moving it. Returns the previous back on overwrite.
    pub fn insert(
        &mut self,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<Option<String>, CoreError> {
        let front = front.into();
        let back = back.into();
        validate_card_text(&front, &back)?;

        if let Some(existing) = self.cards.iter_mut().find(|c| c.front == front) {
            return Ok(Some(std::mem::replace(&mut existing.back, back)));
        }
        self.cards.push(Card { front, back });
        Ok(None)
    }

    pub fn remove(&mut self, front: &str) -> Result<Card, CoreError> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.front == front)
            .ok_or_else(|| CoreError::CardNotFound(front.to_string()))?;
        Ok(self.cards.remove(idx))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

pub fn validate_deck_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Invalid("deck name must not be empty"));
    }
    if has_line_break(name) {
        return Err(CoreError::Invalid("deck name must be a single line"));
    }
    Ok(())
}

// Deck files hold one card per two lines, so neither side may span lines.
pub fn validate_card_text(front: &str, back: &str) -> Result<(), CoreError> {
    if front.trim().is_empty() {
        return Err(CoreError::Invalid("card front must not be empty"));
    }
    if has_line_break(front) || has_line_break(back) {
        return Err(CoreError::Invalid("card text must be a single line"));
    }
    Ok(())
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}
