//! Declarative gift constraints
//!
//! A gift definition is a tree of requirements over the multiset of part
//! names found in an assembled chain. Checking never stops at the first
//! failure: every unmet leaf is reported, so one delivery attempt surfaces
//! everything that is missing.

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Multiset of gift part names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartMultiset {
    counts: FxHashMap<String, u32>,
    total: u32,
}

impl PartMultiset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of a part
    pub fn insert(&mut self, name: impl Into<String>) {
        *self.counts.entry(name.into()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of one part name
    #[must_use]
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Occurrences of any of the given names
    #[must_use]
    pub fn count_any(&self, names: &BTreeSet<String>) -> u32 {
        names.iter().map(|name| self.count(name)).sum()
    }

    /// Total number of parts
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate over (name, count) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }
}

impl<S: Into<String>> FromIterator<S> for PartMultiset {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut parts = Self::new();
        for name in iter {
            parts.insert(name);
        }
        parts
    }
}

/// Comparison applied by [`Constraint::ItemsNumber`] as `total <op> count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparator {
    #[must_use]
    pub fn compare(self, total: u32, count: u32) -> bool {
        match self {
            Self::Equal => total == count,
            Self::NotEqual => total != count,
            Self::Less => total < count,
            Self::LessOrEqual => total <= count,
            Self::Greater => total > count,
            Self::GreaterOrEqual => total >= count,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// A node of a gift constraint tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// All children must hold
    Joint(Vec<Constraint>),
    /// At least `count` parts must carry one of `names`
    ItemSet { count: u32, names: BTreeSet<String> },
    /// The total number of parts must compare to `count`
    ItemsNumber { count: u32, comparator: Comparator },
}

/// Result of checking a constraint tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstraintReport<'a> {
    /// Number of unmet requirements
    pub error_count: u32,
    /// Every failing leaf, in tree order
    pub reasons: Vec<&'a Constraint>,
}

impl ConstraintReport<'_> {
    /// Whether every requirement is met
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.error_count == 0
    }

    /// Clone the failing nodes out of the tree
    #[must_use]
    pub fn owned_reasons(&self) -> Vec<Constraint> {
        self.reasons.iter().map(|&reason| reason.clone()).collect()
    }
}

impl Constraint {
    /// All of `children` must hold
    #[must_use]
    pub fn joint(children: impl IntoIterator<Item = Constraint>) -> Self {
        Self::Joint(children.into_iter().collect())
    }

    /// `count` parts named any of `names`
    #[must_use]
    pub fn item_set<S: Into<String>>(count: u32, names: impl IntoIterator<Item = S>) -> Self {
        Self::ItemSet {
            count,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// A single part named `name`
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self::item_set(1, [name.into()])
    }

    /// Total part count compared against `count`
    #[must_use]
    pub const fn items_number(count: u32, comparator: Comparator) -> Self {
        Self::ItemsNumber { count, comparator }
    }

    /// Evaluate the tree against a multiset of parts
    #[must_use]
    pub fn check(&self, parts: &PartMultiset) -> ConstraintReport<'_> {
        let mut report = ConstraintReport::default();
        self.check_into(parts, &mut report);
        report
    }

    fn check_into<'a>(&'a self, parts: &PartMultiset, report: &mut ConstraintReport<'a>) {
        match self {
            Self::Joint(children) => {
                for child in children {
                    child.check_into(parts, report);
                }
            }
            Self::ItemSet { count, names } => {
                let missing = count.saturating_sub(parts.count_any(names));
                if missing > 0 {
                    report.error_count += missing;
                    report.reasons.push(self);
                }
            }
            Self::ItemsNumber { count, comparator } => {
                if !comparator.compare(parts.total(), *count) {
                    report.error_count += 1;
                    report.reasons.push(self);
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joint(children) => {
                write!(f, "all of [")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, "]")
            }
            Self::ItemSet { count, names } => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "{count} x {}", names.join("|"))
            }
            Self::ItemsNumber { count, comparator } => {
                write!(f, "parts {} {count}", comparator.symbol())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parts(names: &[&str]) -> PartMultiset {
        names.iter().copied().collect()
    }

    #[test]
    fn test_item_set_missing_part() {
        let constraint = Constraint::single("A");
        let report = constraint.check(&PartMultiset::new());

        assert_eq!(report.error_count, 1);
        assert_eq!(report.reasons, vec![&constraint]);
    }

    #[test]
    fn test_item_set_satisfied() {
        let constraint = Constraint::single("A");
        let report = constraint.check(&parts(&["A"]));

        assert_eq!(report.error_count, 0);
        assert!(report.reasons.is_empty());
        assert!(report.is_satisfied());
    }

    #[test]
    fn test_item_set_counts_shortfall() {
        let constraint = Constraint::item_set(3, ["wheel", "spare_wheel"]);
        let report = constraint.check(&parts(&["wheel", "spare_wheel", "bell"]));

        assert_eq!(report.error_count, 1);

        let report = constraint.check(&parts(&["bell"]));
        assert_eq!(report.error_count, 3);
        assert_eq!(report.reasons.len(), 1);
    }

    #[test]
    fn test_items_number() {
        let exactly_two = Constraint::items_number(2, Comparator::Equal);
        assert!(exactly_two.check(&parts(&["a", "b"])).is_satisfied());

        let report = exactly_two.check(&parts(&["a", "b", "c"]));
        assert_eq!(report.error_count, 1);
        assert_eq!(report.reasons, vec![&exactly_two]);

        let at_most_one = Constraint::items_number(1, Comparator::LessOrEqual);
        assert!(at_most_one.check(&PartMultiset::new()).is_satisfied());
    }

    #[test]
    fn test_joint_reports_every_branch() {
        let base = Constraint::single("base1");
        let bulb = Constraint::single("lightbulb");
        let size = Constraint::items_number(4, Comparator::GreaterOrEqual);
        let gift = Constraint::joint([base.clone(), bulb.clone(), size.clone()]);

        let report = gift.check(&parts(&["ribbon"]));

        assert_eq!(report.error_count, 3);
        assert_eq!(report.reasons, vec![&base, &bulb, &size]);
    }

    #[test]
    fn test_nested_joint() {
        let gift = Constraint::joint([
            Constraint::single("base1"),
            Constraint::joint([Constraint::item_set(2, ["lightbulb"])]),
        ]);

        let report = gift.check(&parts(&["base1", "lightbulb"]));
        assert_eq!(report.error_count, 1);
        assert_eq!(
            report.owned_reasons(),
            vec![Constraint::item_set(2, ["lightbulb"])]
        );
    }

    #[test]
    fn test_display() {
        let gift = Constraint::joint([
            Constraint::item_set(2, ["b", "a"]),
            Constraint::items_number(3, Comparator::Less),
        ]);
        assert_eq!(gift.to_string(), "all of [2 x a|b, parts < 3]");
    }

    #[test]
    fn test_ron_authoring() {
        let source = r#"Joint([
            ItemSet(count: 1, names: ["base1"]),
            ItemsNumber(count: 2, comparator: GreaterOrEqual),
        ])"#;
        let gift: Constraint = ron::from_str(source).unwrap();
        assert_eq!(
            gift,
            Constraint::joint([
                Constraint::single("base1"),
                Constraint::items_number(2, Comparator::GreaterOrEqual),
            ])
        );
    }

    fn leaf() -> impl Strategy<Value = Constraint> {
        prop_oneof![
            (0u32..4, proptest::sample::subsequence(vec!["a", "b", "c"], 1..3))
                .prop_map(|(count, names)| Constraint::item_set(count, names)),
            (0u32..6).prop_map(|count| Constraint::items_number(count, Comparator::GreaterOrEqual)),
        ]
    }

    proptest! {
        #[test]
        fn joint_is_invariant_under_reordering(
            children in proptest::collection::vec(leaf(), 0..6),
            names in proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c")], 0..8),
        ) {
            let parts: PartMultiset = names.iter().copied().collect();
            let forward = Constraint::joint(children.clone());
            let backward = Constraint::joint(children.iter().rev().cloned());

            let a = forward.check(&parts);
            let b = backward.check(&parts);
            prop_assert_eq!(a.error_count, b.error_count);

            let mut a_reasons = a.owned_reasons();
            let mut b_reasons = b.owned_reasons();
            a_reasons.sort_by_key(ToString::to_string);
            b_reasons.sort_by_key(ToString::to_string);
            prop_assert_eq!(a_reasons, b_reasons);
        }
    }
}
