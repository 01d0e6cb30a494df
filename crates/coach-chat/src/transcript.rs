//! The transcript store.

use coach_types::Turn;

/// Greeting every new conversation opens with.
pub const DEFAULT_GREETING: &str = "Hello, I am your sales coach!";

/// Ordered, append-only sequence of turns.
///
/// Insertion order is conversational order and is replayed verbatim to the
/// provider. Turns are only ever added; the whole sequence is replaced on
/// [`Transcript::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    greeting: String,
    turns: Vec<Turn>,
}

impl Transcript {
    /// Starts a transcript holding a single assistant greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let turns = vec![Turn::assistant(greeting.clone())];
        Self { greeting, turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drops every turn and starts again from the greeting.
    pub fn reset(&mut self) {
        self.turns = vec![Turn::assistant(self.greeting.clone())];
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
