//! Sort selector for note lists.
//!
//! # Invariants
//! - Two orders are equal only when both field and direction match.
//! - `NoteOrder` is `Copy`; "changing" a direction always builds a new value.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Sort direction applied on top of a field comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Field + direction used to sort the note list.
///
/// Serialized as `{"by": "title", "direction": "ascending"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "direction", rename_all = "snake_case")]
pub enum NoteOrder {
    /// Case-insensitive lexicographic order on the title.
    Title(OrderDirection),
    /// Numeric order on the note timestamp.
    Date(OrderDirection),
    /// Numeric order on the packed color value.
    Color(OrderDirection),
}

impl NoteOrder {
    /// Returns the direction carried by this order.
    pub fn direction(self) -> OrderDirection {
        match self {
            Self::Title(direction) | Self::Date(direction) | Self::Color(direction) => direction,
        }
    }

    /// Returns an order on the same field with `direction`.
    pub fn with_direction(self, direction: OrderDirection) -> Self {
        match self {
            Self::Title(_) => Self::Title(direction),
            Self::Date(_) => Self::Date(direction),
            Self::Color(_) => Self::Color(direction),
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Date(_) => "date",
            Self::Color(_) => "color",
        }
    }
}

impl Default for NoteOrder {
    fn default() -> Self {
        crate::config::DEFAULT_NOTE_ORDER
    }
}

impl Display for NoteOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.field_name(), self.direction().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteOrder, OrderDirection};

    #[test]
    fn default_order_is_date_descending() {
        assert_eq!(
            NoteOrder::default(),
            NoteOrder::Date(OrderDirection::Descending)
        );
    }

    #[test]
    fn equality_requires_field_and_direction() {
        let title_asc = NoteOrder::Title(OrderDirection::Ascending);
        assert_eq!(title_asc, NoteOrder::Title(OrderDirection::Ascending));
        assert_ne!(title_asc, NoteOrder::Title(OrderDirection::Descending));
        assert_ne!(title_asc, NoteOrder::Color(OrderDirection::Ascending));
    }

    #[test]
    fn with_direction_keeps_field_and_leaves_original_untouched() {
        let original = NoteOrder::Color(OrderDirection::Ascending);
        let changed = original.with_direction(original.direction().flipped());
        assert_eq!(changed, NoteOrder::Color(OrderDirection::Descending));
        assert_eq!(original, NoteOrder::Color(OrderDirection::Ascending));
    }

    #[test]
    fn serde_uses_tagged_shape() {
        let order: NoteOrder =
            serde_json::from_str(r#"{"by":"title","direction":"ascending"}"#).unwrap();
        assert_eq!(order, NoteOrder::Title(OrderDirection::Ascending));
        assert_eq!(order.to_string(), "title_asc");
    }
}
