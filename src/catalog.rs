//! The emoji pool
//!
//! A catalog is an ordered list of symbols, optionally split into named
//! categories. Grids and sequences only ever contain catalog symbols.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tappable emoji. Only equality matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named group of symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl Category {
    pub fn new(name: impl Into<String>, symbols: &[&str]) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.iter().map(|s| Symbol::new(*s)).collect(),
        }
    }
}

/// Emoji of the classic, unpartitioned pool
const CLASSIC_POOL: [&str; 30] = [
    "😀", "😁", "😂", "🤣", "😅", "😊", "😍", "🤩", "😎", "🤓", //
    "🫠", "🤖", "👻", "💩", "🎃", "🐶", "🐱", "🦊", "🐼", "🦄", //
    "🍏", "🍕", "🍩", "⚽", "🌈", "🔥", "⭐", "🌙", "🚀", "🎵",
];

/// The full symbol pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Unpartitioned catalog
    pub fn flat(symbols: &[&str]) -> Self {
        Self::categorized(vec![Category::new("all", symbols)])
    }

    /// Catalog split into categories. A symbol listed twice is kept only at
    /// its first occurrence; empty categories are dropped.
    pub fn categorized(categories: Vec<Category>) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .into_iter()
            .map(|mut category| {
                let before = category.symbols.len();
                category.symbols.retain(|s| seen.insert(s.clone()));
                if category.symbols.len() != before {
                    log::warn!(
                        "Dropped {} duplicate symbol(s) from category '{}'",
                        before - category.symbols.len(),
                        category.name
                    );
                }
                category
            })
            .filter(|category| !category.symbols.is_empty())
            .collect();
        Self { categories }
    }

    /// Classic 30-emoji pool
    pub fn classic() -> Self {
        Self::flat(&CLASSIC_POOL)
    }

    /// A larger pool balanced across themes
    pub fn themed() -> Self {
        Self::categorized(vec![
            Category::new("faces", &["😀", "😁", "😂", "🤣", "😅", "😊", "😍", "🤩", "😎", "🤓"]),
            Category::new("creatures", &["🐶", "🐱", "🦊", "🐼", "🦄", "🐸", "🐵", "🐧", "🐙", "🦋"]),
            Category::new("food", &["🍏", "🍕", "🍩", "🍓", "🍔", "🌮", "🍉", "🍪", "🧀", "🍒"]),
            Category::new("nature", &["🌈", "🔥", "⭐", "🌙", "🌵", "🌻", "❄️", "🌊", "🍀", "⚡"]),
            Category::new("objects", &["🚀", "🎵", "🎃", "👻", "💩", "🤖", "🎁", "💎", "🔔", "🧲"]),
            Category::new("activities", &["⚽", "🏀", "🎲", "🎯", "🎸", "🎮", "🏆", "🎨", "🛹", "🎳"]),
        ])
    }

    /// True when the catalog has more than one category
    pub fn is_partitioned(&self) -> bool {
        self.categories.len() > 1
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All symbols in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.categories.iter().flat_map(|c| c.symbols.iter())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.symbols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.iter().any(|s| s == symbol)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::classic()
    }
}
