//! Framework-wide tuning constants
//!
//! Generation bounds and diagnostic defaults shared by every schema node.
//! These only influence random instance synthesis and rendering; lift and
//! lower never consult them.

/// Default maximum magnitude for generated integers. Primitive integer
/// schemas draw uniformly from `[-MAGNITUDE, +MAGNITUDE]`.
pub const DEFAULT_INT_MAGNITUDE: i64 = 1_000_000_000;

/// Default lower bound on generated byte-string lengths.
pub const DEFAULT_MIN_BYTES: usize = 0;

/// Default upper bound on generated byte-string lengths.
pub const DEFAULT_MAX_BYTES: usize = 32;

/// Default upper bound on generated lengths for unconstrained lists and
/// maps. Keeps randomly generated trees small enough to diff by eye.
pub const DEFAULT_MAX_GENERATED_LEN: usize = 8;

/// Attempt cap when drawing distinct map keys during generation. Exhausting
/// the cap is a construction failure, not a silent duplicate.
pub const MAP_KEY_RETRY_LIMIT: usize = 64;

/// Default depth budget for rendered value dumps attached to diagnostics.
pub const DEFAULT_RENDER_DEPTH: usize = 6;

/// Maximum field/branch fan-out used by the schema synthesizer.
pub const MAX_SYNTH_FANOUT: usize = 3;
