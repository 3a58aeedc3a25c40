use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successful calculation. Never modified once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// The expression as the user saw it
    pub expression: String,
    /// The formatted result
    pub result: String,
    /// Unit of the result, for formula calculations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// When the calculation happened
    pub timestamp: DateTime<Utc>,
}

impl HistoryItem {
    /// Create an item stamped with the current time
    pub fn new(
        expression: impl Into<String>,
        result: impl Into<String>,
        unit: Option<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            unit,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only log of calculations, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a calculation at the tail
    pub fn push(&mut self, item: HistoryItem) {
        log::info!(
            "history #{}: {} = {}",
            self.items.len(),
            item.expression,
            item.result
        );
        self.items.push(item);
    }

    /// Number of recorded calculations
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the item at `index`, counting from the oldest
    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    /// The most recent item
    pub fn last(&self) -> Option<&HistoryItem> {
        self.items.last()
    }

    /// Iterate from the oldest item
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Iterate from the most recent item, in display order
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    /// Forget every recorded calculation
    pub fn clear(&mut self) {
        log::info!("clearing {} history items", self.items.len());
        self.items.clear();
    }
}
