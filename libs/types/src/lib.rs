//! # Datum Unified Types Library
//!
//! Pure data structures for the Datum schema/codec framework.
//!
//! ## Design Philosophy
//!
//! - **One Universal Representation**: every domain value crossing the
//!   on-chain boundary is expressed as the five-variant [`Data`] union
//! - **No Precision Loss**: integers are arbitrary precision (`BigInt`),
//!   never truncated to machine words
//! - **Pure Data Structures**: no codec logic lives here; encoding rules,
//!   validation and generation belong to `datum-codec`
//! - **Value Semantics**: wire values are owned, cloneable trees with
//!   structural equality; the framework never retains references into them
//!
//! ## Architecture Role
//!
//! ```text
//! Domain Structs → [datum-codec schemas] → Data → Transaction Builder
//!      ↑                    ↓                ↓           ↓
//!  Typed Values       Lift/Lower        Wire Trees   On-Chain
//! ```
//!
//! ## What This Crate Contains
//! - [`Data`]: the closed wire value union
//! - [`DataKind`]: kind descriptor used in diagnostics
//! - Depth-limited rendering for logs and error context
//!
//! ## What This Crate Does NOT Contain
//! - Schema definitions or encode/decode rules (belongs in `datum-codec`)
//! - Binary (CBOR-level) serialization of wire trees (external collaborator)

pub mod data;

pub use data::{Data, DataKind};
