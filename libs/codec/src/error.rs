//! Schema codec error taxonomy
//!
//! Two families: [`SchemaError`] for lift/lower/generate failures at call
//! time, and [`DefinitionError`] for invalid shapes rejected when a schema
//! node is constructed. All failures are synchronous, terminal and
//! non-retryable; each carries enough expected-vs-actual context to diagnose
//! without re-running, and the framework never substitutes a default value
//! for an invalid one.

use datum_types::DataKind;
use thiserror::Error;

/// Result alias for schema codec operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failures surfaced by `lift`, `lower` and `generate`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Wire value kind differs from the kind the schema expects.
    #[error("type mismatch: expected {expected} wire value, found {found}")]
    TypeMismatch {
        /// Wire kind the schema expects.
        expected: DataKind,
        /// Wire kind actually encountered.
        found: DataKind,
    },

    /// Wrong field, element or byte count.
    #[error("arity mismatch: expected {expected} items, found {found}")]
    ArityMismatch {
        /// Declared count (for ranged shapes, the violated bound).
        expected: usize,
        /// Count actually encountered.
        found: usize,
    },

    /// Constructor index outside the declared branch list.
    #[error("constructor tag {index} out of range (limit {limit})")]
    TagOutOfRange {
        /// Index carried by the wire value.
        index: u64,
        /// Exclusive upper bound on valid indices.
        limit: usize,
    },

    /// A refinement predicate rejected an otherwise well-shaped value.
    #[error("refinement violated: predicate `{predicate}` rejected {value}")]
    RefinementViolation {
        /// Name of the failing predicate.
        predicate: String,
        /// Rendered offending value.
        value: String,
    },

    /// `lower` found no declared branch covering the supplied value.
    #[error("no matching branch: {detail}")]
    NoMatchingBranch {
        /// What the discriminant reported versus what is declared.
        detail: String,
    },

    /// The domain-type constructor itself rejected the field values.
    #[error("domain construction failed: {reason} (fields: {dump})")]
    ConstructionFailure {
        /// Rejection reason reported by the constructor.
        reason: String,
        /// Rendered dump of the offending fields.
        dump: String,
    },

    /// Context wrapper naming the field or branch a nested failure occurred
    /// in.
    #[error("in `{field}`: {source}")]
    Field {
        /// Field or branch name.
        field: String,
        /// Underlying failure.
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Wrap this error with the name of the field or branch it occurred in.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        SchemaError::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// The innermost failure, with all field context stripped.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            SchemaError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Invalid shapes rejected at schema construction time.
///
/// Construction either yields a schema whose population is provably at
/// least one, or fails here; no degenerate schema ever reaches callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Numeric bounds with `lower > upper`.
    #[error("invalid bounds: lower {lower} exceeds upper {upper}")]
    InvalidBounds {
        /// Declared lower bound.
        lower: String,
        /// Declared upper bound.
        upper: String,
    },

    /// Length bounds with `min > max`.
    #[error("invalid length bounds: min {min} exceeds max {max}")]
    InvalidLength {
        /// Declared minimum length.
        min: usize,
        /// Declared maximum length.
        max: usize,
    },

    /// A sum or enum declared with no alternatives.
    #[error("{shape} requires at least one alternative")]
    EmptyAlternatives {
        /// Shape kind being constructed.
        shape: &'static str,
    },

    /// Generation weights summing to zero.
    #[error("generation weights must not all be zero")]
    ZeroWeight,

    /// Generation weight list whose length differs from the branch list.
    #[error("expected {expected} generation weights, got {found}")]
    WeightCountMismatch {
        /// Number of declared branches.
        expected: usize,
        /// Number of weights supplied.
        found: usize,
    },

    /// The same key declared twice in a fixed key set.
    #[error("duplicate key {key} in fixed key set")]
    DuplicateRequiredKey {
        /// Rendered duplicate key.
        key: String,
    },

    /// A fixed map size larger than the key schema can populate.
    #[error("fixed map size {size} exceeds key population {population}")]
    KeySpaceTooSmall {
        /// Declared fixed size.
        size: usize,
        /// Key schema population.
        population: u128,
    },
}
