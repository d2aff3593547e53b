//! Constraint: refinement predicates over an inner schema
//!
//! Wraps an inner schema with an ordered list of named validity predicates
//! plus an override generator, without changing the wire shape. Refinement
//! types — bounded ranges, non-empty containers, cross-field invariants —
//! are built from this one combinator.
//!
//! Validation placement is deliberate and asymmetric:
//! - `lift` runs every predicate after the inner lift, so anything arriving
//!   from the wire is always checked;
//! - `generate` runs the override generator, then checks every predicate
//!   before returning, so a misconfigured generator fails loudly instead of
//!   leaking invalid values into tests;
//! - `lower` delegates to the inner schema with **no re-validation** —
//!   constrained values are invariant-safe by construction, and the encode
//!   path stays allocation-only. This is pinned by test.

use std::fmt;
use std::sync::Arc;

use datum_types::Data;
use num_bigint::{BigInt, RandBigInt};
use rand::{Rng, RngCore};

use crate::constants::{DEFAULT_MAX_GENERATED_LEN, DEFAULT_RENDER_DEPTH};
use crate::error::{DefinitionError, SchemaError, SchemaResult};
use crate::primitives::IntSchema;
use crate::schema::Schema;

use crate::collections::ListSchema;

/// A named validity predicate over a domain value.
pub struct Predicate<V> {
    name: &'static str,
    check: Box<dyn Fn(&V) -> bool + Send + Sync>,
}

impl<V> Predicate<V> {
    /// Declare a predicate with the name reported on violation.
    pub fn new(name: &'static str, check: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name,
            check: Box::new(check),
        }
    }
}

/// Refinement schema: inner shape + predicates + override generator.
pub struct ConstraintSchema<S: Schema> {
    inner: S,
    predicates: Vec<Predicate<S::Value>>,
    generator: Box<dyn Fn(&mut dyn RngCore) -> SchemaResult<S::Value> + Send + Sync>,
}

impl<S: Schema> ConstraintSchema<S> {
    /// Refine `inner` with `predicates`, generating via `generator`.
    ///
    /// The override generator exists because unconstrained generation would
    /// in general violate the predicates too often or never; it must produce
    /// values already known to satisfy all of them.
    pub fn new(
        inner: S,
        predicates: Vec<Predicate<S::Value>>,
        generator: impl Fn(&mut dyn RngCore) -> SchemaResult<S::Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            predicates,
            generator: Box::new(generator),
        }
    }

    fn check_all(&self, value: &S::Value) -> SchemaResult<()> {
        for predicate in &self.predicates {
            if !(predicate.check)(value) {
                return Err(SchemaError::RefinementViolation {
                    predicate: predicate.name.to_string(),
                    value: self.inner.render(value, DEFAULT_RENDER_DEPTH),
                });
            }
        }
        Ok(())
    }
}

impl ConstraintSchema<IntSchema> {
    /// Integer refinement bounded to `[lower, upper]` inclusive.
    pub fn bounded_int(
        lower: impl Into<BigInt>,
        upper: impl Into<BigInt>,
    ) -> Result<Self, DefinitionError> {
        let lower = lower.into();
        let upper = upper.into();
        if lower > upper {
            return Err(DefinitionError::InvalidBounds {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        let at_least = lower.clone();
        let at_most = upper.clone();
        let gen_lower = lower;
        let gen_upper = upper + 1;
        Ok(ConstraintSchema::new(
            IntSchema::default(),
            vec![
                Predicate::new("at-least-lower-bound", move |value: &BigInt| {
                    *value >= at_least
                }),
                Predicate::new("at-most-upper-bound", move |value: &BigInt| {
                    *value <= at_most
                }),
            ],
            move |rng| Ok(rng.gen_bigint_range(&gen_lower, &gen_upper)),
        ))
    }
}

impl<E: Schema + 'static> ConstraintSchema<ListSchema<Arc<E>>> {
    /// Non-empty homogeneous list refinement.
    pub fn non_empty_list(element: E) -> Self {
        let element = Arc::new(element);
        let gen_element = Arc::clone(&element);
        ConstraintSchema::new(
            ListSchema::new(Arc::clone(&element)),
            vec![Predicate::new("non-empty", |items: &Vec<E::Value>| {
                !items.is_empty()
            })],
            move |rng| {
                let len = rng.gen_range(1..=DEFAULT_MAX_GENERATED_LEN);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(gen_element.generate(rng)?);
                }
                Ok(items)
            },
        )
    }
}

impl<S: Schema> Schema for ConstraintSchema<S> {
    type Value = S::Value;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let value = self.inner.lift(wire)?;
        self.check_all(&value)?;
        Ok(value)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        self.inner.lower(value)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let value = (self.generator)(rng)?;
        self.check_all(&value)?;
        Ok(value)
    }

    /// Inner population, a documented upper bound: predicates only narrow
    /// the space and the estimate must stay positive.
    fn population(&self) -> u128 {
        self.inner.population()
    }
}

impl<S: Schema> fmt::Debug for ConstraintSchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSchema")
            .field(
                "predicates",
                &self.predicates.iter().map(|predicate| predicate.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
