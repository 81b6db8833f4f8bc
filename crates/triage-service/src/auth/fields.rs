//! Ticket field sets.

use serde::Serialize;

/// A ticket field that an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    DueDate,
}

impl TicketField {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::Assignee,
        Self::DueDate,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set of ticket fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: Self = Self(0);

    /// Every updatable field.
    pub const FULL: Self = Self::of(&TicketField::ALL);

    /// Title and description, the fields a Customer may edit.
    pub const CONTENT: Self = Self::of(&[TicketField::Title, TicketField::Description]);

    #[must_use]
    pub const fn of(fields: &[TicketField]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < fields.len() {
            bits |= fields[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn contains(self, field: TicketField) -> bool {
        self.0 & field.bit() != 0
    }

    #[must_use]
    pub const fn with(self, field: TicketField) -> Self {
        Self(self.0 | field.bit())
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Fields in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TicketField> {
        TicketField::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }
}

impl Serialize for FieldSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
