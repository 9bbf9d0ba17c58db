//! Immutable tagged record kernel.
//!
//! # Responsibility
//! - Build records from a canonical default plus a partial override.
//! - Provide named field accessors (`get`/`set`/`update`) that never touch
//!   the record they are given.
//!
//! # Invariants
//! - `Factory::make` only patches a fresh copy of its defaults.
//! - `Field::set` and `Field::update` return a new record.
//! - Equality is structural over the whole record.

/// A record carrying a fixed discriminant.
///
/// The `Default` impl of an implementor is its canonical default: every
/// field a factory caller leaves out is taken from it.
pub trait TaggedRecord: Clone + PartialEq + Default {
    /// Discriminant shared by every value of this record type.
    const TAG: &'static str;

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    /// Returns a factory filled with the canonical default.
    fn factory() -> Factory<Self> {
        Factory::new(Self::default())
    }
}

/// Default-filling constructor for one record type.
#[derive(Debug, Clone)]
pub struct Factory<R> {
    defaults: R,
}

impl<R: TaggedRecord> Factory<R> {
    /// Creates a factory that uses `defaults` for every unspecified field.
    pub fn new(defaults: R) -> Self {
        Self { defaults }
    }

    /// Builds a record from the defaults with `patch` applied to a copy.
    pub fn make(&self, patch: impl FnOnce(&mut R)) -> R {
        let mut record = self.defaults.clone();
        patch(&mut record);
        record
    }
}

/// Named accessor for one field `V` of record `R`.
pub struct Field<R, V> {
    name: &'static str,
    get: fn(&R) -> &V,
    set: fn(&mut R, V),
}

impl<R, V> Field<R, V> {
    pub const fn new(name: &'static str, get: fn(&R) -> &V, set: fn(&mut R, V)) -> Self {
        Self { name, get, set }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'r>(&self, record: &'r R) -> &'r V {
        (self.get)(record)
    }
}

impl<R: Clone, V> Field<R, V> {
    /// Returns a copy of `record` with this field replaced by `value`.
    pub fn set(&self, value: V, record: &R) -> R {
        let mut next = record.clone();
        (self.set)(&mut next, value);
        next
    }

    /// Returns a copy of `record` with this field mapped through `f`.
    pub fn update(&self, record: &R, f: impl FnOnce(&V) -> V) -> R {
        let value = f(self.get(record));
        self.set(value, record)
    }
}

impl<R, V> Clone for Field<R, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, V> Copy for Field<R, V> {}

impl<R, V> std::fmt::Debug for Field<R, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// Structural equality over two records of the same type.
pub fn equals<R: TaggedRecord>(a: &R, b: &R) -> bool {
    a == b
}

/// Declares `Field` constants on a record, one per listed struct field.
macro_rules! record_fields {
    ($record:ty { $($name:ident: $field:ident => $value:ty),* $(,)? }) => {
        impl $record {
            $(
                pub const $name: $crate::record::Field<$record, $value> =
                    $crate::record::Field::new(
                        stringify!($field),
                        |record: &$record| &record.$field,
                        |record: &mut $record, value: $value| record.$field = value,
                    );
            )*
        }
    };
}

pub(crate) use record_fields;
