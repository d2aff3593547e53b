//! Literal and Enum: schemas over fixed value sets
//!
//! A literal pins its inner schema to one exact value; an enum restricts it
//! to a finite declared set. Both delegate raw encode/decode to the inner
//! schema and reject non-members on lift, exact-match only — no coercion.

use std::fmt;

use datum_types::Data;
use rand::{Rng, RngCore};

use crate::constants::DEFAULT_RENDER_DEPTH;
use crate::error::{DefinitionError, SchemaError, SchemaResult};
use crate::schema::Schema;

/// Schema pinned to one exact value.
pub struct LiteralSchema<S: Schema> {
    inner: S,
    pinned: S::Value,
}

impl<S: Schema> LiteralSchema<S> {
    /// Pin `inner` to exactly `pinned`.
    pub fn new(inner: S, pinned: S::Value) -> Self {
        Self { inner, pinned }
    }
}

impl<S: Schema> Schema for LiteralSchema<S>
where
    S::Value: Send + Sync,
{
    type Value = S::Value;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let value = self.inner.lift(wire)?;
        if value != self.pinned {
            return Err(SchemaError::RefinementViolation {
                predicate: "literal".to_string(),
                value: self.inner.render(&value, DEFAULT_RENDER_DEPTH),
            });
        }
        Ok(value)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        self.inner.lower(value)
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        Ok(self.pinned.clone())
    }

    fn population(&self) -> u128 {
        1
    }
}

/// Schema restricted to a finite fixed value set.
///
/// Declared values are expected to be distinct; `population` counts the
/// declared list as-is.
pub struct EnumSchema<S: Schema> {
    inner: S,
    values: Vec<S::Value>,
}

impl<S: Schema> EnumSchema<S> {
    /// Restrict `inner` to the declared value set.
    pub fn new(inner: S, values: Vec<S::Value>) -> Result<Self, DefinitionError> {
        if values.is_empty() {
            return Err(DefinitionError::EmptyAlternatives { shape: "enum" });
        }
        Ok(Self { inner, values })
    }
}

impl<S: Schema> Schema for EnumSchema<S>
where
    S::Value: Send + Sync,
{
    type Value = S::Value;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let value = self.inner.lift(wire)?;
        if !self.values.contains(&value) {
            return Err(SchemaError::RefinementViolation {
                predicate: "enum-member".to_string(),
                value: self.inner.render(&value, DEFAULT_RENDER_DEPTH),
            });
        }
        Ok(value)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        self.inner.lower(value)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let position = rng.gen_range(0..self.values.len());
        Ok(self.values[position].clone())
    }

    fn population(&self) -> u128 {
        self.values.len() as u128
    }
}

impl<S: Schema> fmt::Debug for EnumSchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumSchema")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{BytesSchema, IntSchema};
    use num_bigint::BigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn literal_accepts_only_the_pinned_value() {
        let schema = LiteralSchema::new(IntSchema::default(), BigInt::from(42));
        assert_eq!(
            schema.lift(&Data::int(42)).expect("lift literal"),
            BigInt::from(42)
        );
        let err = schema.lift(&Data::int(41)).unwrap_err();
        match &err {
            SchemaError::RefinementViolation { predicate, value } => {
                assert_eq!(predicate, "literal");
                assert_eq!(value, "41");
            }
            other => panic!("expected refinement violation, got {other:?}"),
        }
    }

    #[test]
    fn literal_generates_the_pinned_value() {
        let schema = LiteralSchema::new(BytesSchema::fixed(2), vec![0xca, 0xfe]);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..20 {
            assert_eq!(
                schema.generate(&mut rng).expect("generate literal"),
                vec![0xca, 0xfe]
            );
        }
        assert_eq!(schema.population(), 1);
    }

    #[test]
    fn enum_membership_is_exact() {
        let members = vec![BigInt::from(1), BigInt::from(5), BigInt::from(9)];
        let schema =
            EnumSchema::new(IntSchema::default(), members.clone()).expect("non-empty set");
        assert_eq!(schema.population(), 3);
        assert_eq!(
            schema.lift(&Data::int(5)).expect("lift member"),
            BigInt::from(5)
        );
        assert!(matches!(
            schema.lift(&Data::int(4)).unwrap_err(),
            SchemaError::RefinementViolation { .. }
        ));

        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let value = schema.generate(&mut rng).expect("generate member");
            assert!(members.contains(&value));
        }
    }

    #[test]
    fn empty_enum_is_rejected_at_construction() {
        assert!(matches!(
            EnumSchema::new(IntSchema::default(), vec![]).unwrap_err(),
            DefinitionError::EmptyAlternatives { shape: "enum" }
        ));
    }
}
