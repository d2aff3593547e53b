//! # Datum Schema Codec
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of the Datum system: a generic,
//! reflection-free schema framework mapping strongly-typed domain values to
//! and from the universal wire value defined in `datum-types`. Every domain
//! value crossing the on-chain boundary — prices, identifiers, asset
//! descriptors, protocol records — is defined as a composition of the
//! schema nodes in this crate, so correctness of encode/decode, refinement
//! validation and randomized generation here underwrites correctness
//! everywhere else.
//!
//! ## Architecture Role
//!
//! ```text
//! Domain Structs → [datum-codec schemas] → Data → Transaction Builder
//!     ↑                    ↓                 ↓           ↓
//! Typed Values        Lift/Lower        Wire Trees   On-Chain
//! Validated           Generate          Rendered     (external)
//! ```
//!
//! The crate sits between typed business logic and the wire representation;
//! it is agnostic to the final binary encoding, which belongs to the
//! external transaction-building collaborator.
//!
//! ## What This Crate Contains
//! - [`Schema`]: the five-capability contract (lift, lower, generate,
//!   population, render)
//! - Primitive schemas: [`IntSchema`], [`BytesSchema`]
//! - Structural combinators: [`WrappedSchema`], `Record0`..`Record4`,
//!   [`SumSchema`], [`ListSchema`], [`MapSchema`], [`LiteralSchema`],
//!   [`EnumSchema`]
//! - Refinement layer: [`ConstraintSchema`] with named predicates and
//!   override generators
//! - [`synth`]: depth-bounded random schema synthesis for fuzzing the
//!   framework against itself
//!
//! ## What This Crate Does NOT Contain
//! - Transaction construction or signing (external collaborator)
//! - Wallet, key or network/UTXO concerns (external collaborators)
//! - Market-making price rules (domain crates compose schemas, not the
//!   other way around)
//!
//! ## Concurrency Model
//!
//! Fully synchronous. Schema nodes are immutable after construction and
//! safe to share across threads without locking; the only mutable input is
//! the caller-supplied random source handed to `generate`.

pub mod collections;
pub mod constants;
pub mod constraint;
pub mod error;
pub mod pinned;
pub mod primitives;
pub mod record;
pub mod schema;
pub mod sum;
pub mod synth;
pub mod wrapped;

// Re-export key types for convenience
pub use collections::{ListSchema, MapSchema};
pub use constraint::{ConstraintSchema, Predicate};
pub use error::{DefinitionError, SchemaError, SchemaResult};
pub use pinned::{EnumSchema, LiteralSchema};
pub use primitives::{BytesSchema, IntSchema, BYTES, INTEGER};
pub use record::{Field, Record0, Record1, Record2, Record3, Record4};
pub use schema::{DynSchema, Schema};
pub use sum::{Branch, SumSchema};
pub use synth::synthesize;
pub use wrapped::WrappedSchema;

// Re-export the wire value so downstream crates need only one dependency.
pub use datum_types::{Data, DataKind};
