//! Player state management.

use std::collections::HashMap;

/// Unique identifier for a player.
pub type PlayerId = u8;

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Spendable budget, never negative.
    budget: i64,
    /// Variables bound by this player's plans. Kept across turns.
    identifiers: HashMap<String, i64>,
    /// Whether the player is still in the game.
    pub alive: bool,
}

impl Player {
    /// Create a new player.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, budget: i64) -> Self {
        Self {
            id,
            name: name.into(),
            budget: budget.max(0),
            identifiers: HashMap::new(),
            alive: true,
        }
    }

    /// Current budget.
    #[must_use]
    pub const fn budget(&self) -> i64 {
        self.budget
    }

    /// Whether the player can pay `amount` right now.
    #[must_use]
    pub const fn can_afford(&self, amount: i64) -> bool {
        self.budget >= amount
    }

    /// Add `amount` (possibly negative) to the budget.
    ///
    /// The budget stops at 0. Returns `false` if the full amount could not
    /// be paid.
    pub fn update_budget(&mut self, amount: i64) -> bool {
        let updated = self.budget.saturating_add(amount);
        self.budget = updated.max(0);
        updated >= 0
    }

    /// Overwrite the budget, clamping at 0.
    pub fn set_budget(&mut self, budget: i64) {
        self.budget = budget.max(0);
    }

    /// The identifier table.
    #[must_use]
    pub fn identifiers(&self) -> &HashMap<String, i64> {
        &self.identifiers
    }

    /// Look up a bound identifier.
    #[must_use]
    pub fn identifier(&self, name: &str) -> Option<i64> {
        self.identifiers.get(name).copied()
    }

    /// Bind `name` to `value`.
    pub fn assign(&mut self, name: &str, value: i64) {
        self.identifiers.insert(name.to_string(), value);
    }

    /// Eliminate this player.
    pub fn eliminate(&mut self) {
        self.alive = false;
    }
}
