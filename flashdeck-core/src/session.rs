use crate::{Card, Deck};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    UserQuit,
    Exhausted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::UserQuit | SessionState::Exhausted)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    UserQuit,
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStep {
    Card(Card),
    Done(SessionEnd),
}

/// One shuffled pass over a snapshot of a deck. Once it ends it stays ended;
/// start a new session for another pass.
#[derive(Debug)]
pub struct StudySession {
    deck_name: String,
    queue: Vec<Card>,
    next: usize,
    state: SessionState,
}

impl StudySession {
    pub fn start(deck: &Deck) -> Self {
        Self::start_with_rng(deck, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Self {
        let mut queue = deck.cards().to_vec();
        queue.shuffle(rng);
        Self {
            deck_name: deck.name().to_string(),
            queue,
            next: 0,
            state: SessionState::NotStarted,
        }
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    /// Cards handed out so far.
    pub fn shown(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        if self.state.is_terminal() {
            0
        } else {
            self.queue.len() - self.next
        }
    }

    pub fn next_card(&mut self) -> SessionStep {
        match self.state {
            SessionState::UserQuit => return SessionStep::Done(SessionEnd::UserQuit),
            SessionState::Exhausted => return SessionStep::Done(SessionEnd::Exhausted),
            SessionState::NotStarted | SessionState::InProgress => {}
        }

        match self.queue.get(self.next) {
            Some(card) => {
                self.next += 1;
                self.state = SessionState::InProgress;
                SessionStep::Card(card.clone())
            }
            None => {
                self.state = SessionState::Exhausted;
                SessionStep::Done(SessionEnd::Exhausted)
            }
        }
    }

    pub fn quit(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::UserQuit;
        }
    }
}

impl Iterator for StudySession {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        match self.next_card() {
            SessionStep::Card(c) => Some(c),
            SessionStep::Done(_) => None,
        }
    }
}
