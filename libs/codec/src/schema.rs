//! Schema capability contract
//!
//! Every schema node, primitive or combinator, exposes the same five
//! capabilities: `lift` (wire → domain), `lower` (domain → wire),
//! `generate` (random valid instance), `population` (cardinality estimate)
//! and `render` (depth-limited dump). Nodes are immutable once constructed
//! and hold no per-call state, so a single instance may be shared across
//! threads freely; the only mutable input is the caller-supplied random
//! source handed to `generate`.

use std::fmt;
use std::sync::Arc;

use datum_types::Data;
use rand::RngCore;

use crate::error::SchemaResult;

/// Conversion, validation and generation rules for one domain type.
///
/// Implementations must be pure: `lift`/`lower`/`generate` allocate fresh
/// values owned exclusively by the caller and retain no references into
/// them. `population` is a saturating cardinality estimate and is at least
/// one for every constructible schema.
pub trait Schema: Send + Sync {
    /// The domain representation this schema converts to and from.
    type Value: Clone + PartialEq + fmt::Debug;

    /// Decode a wire value into the domain representation.
    ///
    /// Fails on any structural mismatch; no partially-constructed value is
    /// ever exposed.
    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value>;

    /// Encode a domain value into its wire representation.
    ///
    /// Only sum dispatch can fail here; every other node encodes
    /// unconditionally.
    fn lower(&self, value: &Self::Value) -> SchemaResult<Data>;

    /// Produce a random domain value that `lift(lower(v))` reproduces.
    ///
    /// Never fails under a correct configuration; failures indicate a
    /// misconfigured override generator or a rejecting domain constructor.
    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value>;

    /// Saturating estimate of how many distinct values this schema admits.
    fn population(&self) -> u128;

    /// Human-readable dump of a domain value, expanded to `depth` levels.
    fn render(&self, value: &Self::Value, depth: usize) -> String {
        match self.lower(value) {
            Ok(wire) => wire.render(depth),
            Err(err) => format!("<unrenderable: {err}>"),
        }
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    type Value = S::Value;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        (**self).lift(wire)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        (**self).lower(value)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        (**self).generate(rng)
    }

    fn population(&self) -> u128 {
        (**self).population()
    }

    fn render(&self, value: &Self::Value, depth: usize) -> String {
        (**self).render(value, depth)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    type Value = S::Value;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        (**self).lift(wire)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        (**self).lower(value)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        (**self).generate(rng)
    }

    fn population(&self) -> u128 {
        (**self).population()
    }

    fn render(&self, value: &Self::Value, depth: usize) -> String {
        (**self).render(value, depth)
    }
}

/// A schema erased to its wire-value representation.
///
/// The synthesizer composes schemas at runtime; homogenizing over
/// `Value = Data` keeps the composition fully dynamic while still exercising
/// the ordinary combinator implementations underneath.
pub type DynSchema = Box<dyn Schema<Value = Data>>;
