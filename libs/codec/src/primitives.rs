//! Primitive schemas: integers and byte strings
//!
//! Terminal nodes with no sub-schema. Both enforce their structural
//! contract on `lift`, copy payloads defensively on `lower`, and draw
//! uniformly on `generate`.

use num_bigint::{BigInt, RandBigInt};
use once_cell::sync::Lazy;
use rand::{Rng, RngCore};

use datum_types::{Data, DataKind};

use crate::constants::{DEFAULT_INT_MAGNITUDE, DEFAULT_MAX_BYTES, DEFAULT_MIN_BYTES};
use crate::error::{DefinitionError, SchemaError, SchemaResult};
use crate::schema::Schema;

/// Shared default integer schema.
pub static INTEGER: Lazy<IntSchema> = Lazy::new(IntSchema::default);

/// Shared default byte-string schema.
pub static BYTES: Lazy<BytesSchema> = Lazy::new(BytesSchema::default);

/// Arbitrary-precision integer schema.
///
/// `lift` accepts any wire integer regardless of magnitude; the configured
/// magnitude only bounds the symmetric range `generate` draws from.
#[derive(Debug, Clone)]
pub struct IntSchema {
    magnitude: BigInt,
}

impl IntSchema {
    /// Create an integer schema generating within `[-magnitude, +magnitude]`.
    pub fn new(magnitude: impl Into<BigInt>) -> Result<Self, DefinitionError> {
        let magnitude = magnitude.into();
        if magnitude < BigInt::from(0) {
            return Err(DefinitionError::InvalidBounds {
                lower: (-&magnitude).to_string(),
                upper: magnitude.to_string(),
            });
        }
        Ok(Self { magnitude })
    }
}

impl Default for IntSchema {
    fn default() -> Self {
        Self {
            magnitude: BigInt::from(DEFAULT_INT_MAGNITUDE),
        }
    }
}

impl Schema for IntSchema {
    type Value = BigInt;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        match wire {
            Data::Integer(value) => Ok(value.clone()),
            other => Err(SchemaError::TypeMismatch {
                expected: DataKind::Integer,
                found: other.kind(),
            }),
        }
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        Ok(Data::Integer(value.clone()))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let upper = &self.magnitude + 1;
        Ok(rng.gen_bigint_range(&(-&self.magnitude), &upper))
    }

    fn population(&self) -> u128 {
        let count = BigInt::from(2) * &self.magnitude + 1;
        u128::try_from(&count).unwrap_or(u128::MAX)
    }
}

/// Byte-string schema with inclusive length bounds.
///
/// Lengths are part of the structural contract: lifting a wire byte string
/// outside `[min_len, max_len]` fails with an arity mismatch on the violated
/// bound. Payloads are copied in both directions so domain and wire values
/// never alias.
#[derive(Debug, Clone)]
pub struct BytesSchema {
    min_len: usize,
    max_len: usize,
}

impl BytesSchema {
    /// Create a byte-string schema with inclusive length bounds.
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, DefinitionError> {
        if min_len > max_len {
            return Err(DefinitionError::InvalidLength {
                min: min_len,
                max: max_len,
            });
        }
        Ok(Self { min_len, max_len })
    }

    /// Fixed-width byte-string schema, e.g. 28 bytes for hash identifiers.
    pub fn fixed(len: usize) -> Self {
        Self {
            min_len: len,
            max_len: len,
        }
    }
}

impl Default for BytesSchema {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_BYTES,
            max_len: DEFAULT_MAX_BYTES,
        }
    }
}

impl Schema for BytesSchema {
    type Value = Vec<u8>;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let bytes = match wire {
            Data::Bytes(bytes) => bytes,
            other => {
                return Err(SchemaError::TypeMismatch {
                    expected: DataKind::Bytes,
                    found: other.kind(),
                })
            }
        };
        if bytes.len() < self.min_len {
            return Err(SchemaError::ArityMismatch {
                expected: self.min_len,
                found: bytes.len(),
            });
        }
        if bytes.len() > self.max_len {
            return Err(SchemaError::ArityMismatch {
                expected: self.max_len,
                found: bytes.len(),
            });
        }
        Ok(bytes.clone())
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        Ok(Data::Bytes(value.clone()))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let len = rng.gen_range(self.min_len..=self.max_len);
        let mut bytes = vec![0u8; len];
        rng.fill_bytes(&mut bytes);
        Ok(bytes)
    }

    fn population(&self) -> u128 {
        let mut total: u128 = 0;
        for len in self.min_len..=self.max_len {
            total = total.saturating_add(length_population(len));
        }
        total
    }
}

/// Number of distinct byte strings of exactly `len` bytes, saturating.
fn length_population(len: usize) -> u128 {
    if len >= 16 {
        u128::MAX
    } else {
        1u128 << (8 * len)
    }
}
