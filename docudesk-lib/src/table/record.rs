//! Capabilities a record needs to be shown in a [`Table`](super::Table).

use std::fmt::Debug;
use std::hash::Hash;

/// A typed field name of a record.
///
/// Implemented by small `Copy` enums, one per record type, so that column
/// accessors and sort keys are checked at compile time. `name` is the field
/// name the server understands in `order_by`.
pub trait ColumnKey: Copy + Eq + Debug + 'static {
    /// The server-side field name.
    fn name(&self) -> &'static str;

    /// Looks a key up by its server-side name.
    fn parse(name: &str) -> Option<Self>;
}

/// A record that can be listed, selected and filtered.
pub trait TableRecord {
    /// Stable identifier, used to track selection across re-fetches.
    type Id: Clone + Eq + Hash + Debug;

    /// The fields a column may read.
    type Key: ColumnKey;

    /// Returns this record's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the display value of `key`, or `None` when the field is empty.
    fn value(&self, key: Self::Key) -> Option<String>;
}
