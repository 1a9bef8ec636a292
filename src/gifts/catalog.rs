//! Built-in gift definitions

use std::collections::BTreeMap;

use super::constraint::{Comparator, Constraint};

pub const LIGHTBULB: &str = "lightbulb";
pub const BASE1: &str = "base1";
pub const WHEEL: &str = "wheel";
pub const RIBBON: &str = "ribbon";

/// Named gift definitions that levels can refer to
#[derive(Debug, Clone, Default)]
pub struct GiftCatalog {
    gifts: BTreeMap<String, Constraint>,
}

impl GiftCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog shipped with the game
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "test",
            Constraint::joint([Constraint::single(BASE1), Constraint::single(LIGHTBULB)]),
        );
        catalog.insert(
            "lamp",
            Constraint::joint([
                Constraint::single(BASE1),
                Constraint::item_set(2, [LIGHTBULB]),
                Constraint::items_number(4, Comparator::LessOrEqual),
            ]),
        );
        catalog.insert(
            "cart",
            Constraint::joint([
                Constraint::single(BASE1),
                Constraint::item_set(4, [WHEEL]),
                Constraint::item_set(1, [RIBBON, LIGHTBULB]),
            ]),
        );
        catalog
    }

    /// Register or replace a definition
    pub fn insert(&mut self, name: impl Into<String>, gift: Constraint) {
        self.gifts.insert(name.into(), gift);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.gifts.get(name)
    }

    /// Definition names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gifts.keys().map(String::as_str)
    }
}
