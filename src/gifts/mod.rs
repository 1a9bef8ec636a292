//! Gift parts, order definitions and delivery

pub mod catalog;
mod constraint;
mod delivery;

pub use catalog::GiftCatalog;
pub use constraint::{Comparator, Constraint, ConstraintReport, PartMultiset};
pub use delivery::{DeliveryOutcome, GiftConstraint, deliver, has_pending_order, install_order};

/// Tag naming what kind of gift component an entity represents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GiftPart {
    pub name: String,
}

impl GiftPart {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
