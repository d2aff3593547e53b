//! Wrapped: single-field newtype projection
//!
//! Bridges an external domain type whose only observable content is one
//! inner value. Lift and lower delegate to the inner schema and then apply
//! the projection pair supplied at construction. The wrap direction is
//! fallible so validating domain constructors can reject lifted or generated
//! values; such rejections surface as `ConstructionFailure` with a rendered
//! dump of the offending inner value attached.

use std::fmt;

use datum_types::Data;
use rand::RngCore;

use crate::constants::DEFAULT_RENDER_DEPTH;
use crate::error::{SchemaError, SchemaResult};
use crate::schema::Schema;

/// Projection functions mapping the inner schema's value to and from the
/// wrapper domain type.
pub struct WrappedSchema<S: Schema, T> {
    inner: S,
    wrap: Box<dyn Fn(S::Value) -> Result<T, String> + Send + Sync>,
    unwrap: Box<dyn Fn(&T) -> S::Value + Send + Sync>,
}

impl<S, T> WrappedSchema<S, T>
where
    S: Schema,
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    /// Wrap `inner` with a validating constructor and its inverse.
    pub fn new<W, U>(inner: S, wrap: W, unwrap: U) -> Self
    where
        W: Fn(S::Value) -> Result<T, String> + Send + Sync + 'static,
        U: Fn(&T) -> S::Value + Send + Sync + 'static,
    {
        Self {
            inner,
            wrap: Box::new(wrap),
            unwrap: Box::new(unwrap),
        }
    }

    /// Wrap `inner` with an infallible constructor and its inverse.
    pub fn total<W, U>(inner: S, wrap: W, unwrap: U) -> Self
    where
        W: Fn(S::Value) -> T + Send + Sync + 'static,
        U: Fn(&T) -> S::Value + Send + Sync + 'static,
    {
        Self::new(inner, move |value| Ok(wrap(value)), unwrap)
    }

    fn construct(&self, inner_value: S::Value) -> SchemaResult<T> {
        (self.wrap)(inner_value.clone()).map_err(|reason| SchemaError::ConstructionFailure {
            reason,
            dump: self.inner.render(&inner_value, DEFAULT_RENDER_DEPTH),
        })
    }
}

impl<S, T> Schema for WrappedSchema<S, T>
where
    S: Schema,
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    type Value = T;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let inner_value = self.inner.lift(wire)?;
        self.construct(inner_value)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        self.inner.lower(&(self.unwrap)(value))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let inner_value = self.inner.generate(rng)?;
        self.construct(inner_value)
    }

    fn population(&self) -> u128 {
        self.inner.population()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::IntSchema;
    use num_bigint::BigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, PartialEq)]
    struct Lovelace(BigInt);

    fn lovelace_schema() -> WrappedSchema<IntSchema, Lovelace> {
        WrappedSchema::new(
            IntSchema::new(1_000_000).expect("valid magnitude"),
            |raw: BigInt| {
                if raw < BigInt::from(0) {
                    Err("lovelace amounts must be non-negative".to_string())
                } else {
                    Ok(Lovelace(raw))
                }
            },
            |amount: &Lovelace| amount.0.clone(),
        )
    }

    #[test]
    fn wrapped_round_trips_through_inner_schema() {
        let schema = lovelace_schema();
        let amount = Lovelace(BigInt::from(42));
        let wire = schema.lower(&amount).expect("lower lovelace");
        assert_eq!(wire, Data::int(42));
        assert_eq!(schema.lift(&wire).expect("lift lovelace"), amount);
    }

    #[test]
    fn rejecting_constructor_surfaces_construction_failure() {
        let schema = lovelace_schema();
        let err = schema.lift(&Data::int(-1)).unwrap_err();
        match err {
            SchemaError::ConstructionFailure { reason, dump } => {
                assert_eq!(reason, "lovelace amounts must be non-negative");
                assert_eq!(dump, "-1");
            }
            other => panic!("expected construction failure, got {other:?}"),
        }
    }

    #[test]
    fn inner_type_mismatch_passes_through_unchanged() {
        let schema = lovelace_schema();
        let err = schema.lift(&Data::bytes([0x00])).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn total_projection_never_fails_construction() {
        let schema = WrappedSchema::total(
            IntSchema::new(10).expect("valid magnitude"),
            Lovelace,
            |amount: &Lovelace| amount.0.clone(),
        );
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let value = schema.generate(&mut rng).expect("generate wrapper");
            let wire = schema.lower(&value).expect("lower wrapper");
            assert_eq!(schema.lift(&wire).expect("lift wrapper"), value);
        }
    }
}
