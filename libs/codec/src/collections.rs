//! List and Map: homogeneous collection schemas
//!
//! Lists decode ordered wire sequences, maps decode ordered association
//! lists. Both lift elements fail-fast — the first failing element aborts
//! with its position in the error context and no partial result escapes.
//!
//! Duplicate-key policy: a wire association list may carry the same key more
//! than once; lifting resolves duplicates **last write wins** (entry keeps
//! its first position, its value is overwritten by later occurrences). This
//! is deliberate and pinned by test; lowering never deduplicates.

use std::fmt;

use datum_types::{Data, DataKind};
use rand::{Rng, RngCore};

use crate::constants::{DEFAULT_MAX_GENERATED_LEN, DEFAULT_RENDER_DEPTH, MAP_KEY_RETRY_LIMIT};
use crate::error::{DefinitionError, SchemaError, SchemaResult};
use crate::schema::Schema;

/// Homogeneous sequence schema with an optional fixed length.
pub struct ListSchema<S: Schema> {
    element: S,
    fixed_len: Option<usize>,
    max_generated: usize,
}

impl<S: Schema> ListSchema<S> {
    /// Variable-length list; generation draws lengths up to the default
    /// bound.
    pub fn new(element: S) -> Self {
        Self {
            element,
            fixed_len: None,
            max_generated: DEFAULT_MAX_GENERATED_LEN,
        }
    }

    /// Fixed-length list; lift rejects any other wire length.
    pub fn fixed(element: S, len: usize) -> Self {
        Self {
            element,
            fixed_len: Some(len),
            max_generated: len,
        }
    }
}

impl<S: Schema> Schema for ListSchema<S> {
    type Value = Vec<S::Value>;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let items = match wire {
            Data::Sequence(items) => items,
            other => {
                return Err(SchemaError::TypeMismatch {
                    expected: DataKind::Sequence,
                    found: other.kind(),
                })
            }
        };
        if let Some(fixed) = self.fixed_len {
            if items.len() != fixed {
                return Err(SchemaError::ArityMismatch {
                    expected: fixed,
                    found: items.len(),
                });
            }
        }
        let mut lifted = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            lifted.push(
                self.element
                    .lift(item)
                    .map_err(|err| err.in_field(format!("[{position}]")))?,
            );
        }
        Ok(lifted)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        let mut lowered = Vec::with_capacity(value.len());
        for (position, item) in value.iter().enumerate() {
            lowered.push(
                self.element
                    .lower(item)
                    .map_err(|err| err.in_field(format!("[{position}]")))?,
            );
        }
        Ok(Data::Sequence(lowered))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let len = match self.fixed_len {
            Some(fixed) => fixed,
            None => rng.gen_range(0..=self.max_generated),
        };
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.element.generate(rng)?);
        }
        Ok(items)
    }

    fn population(&self) -> u128 {
        let element = self.element.population();
        match self.fixed_len {
            Some(fixed) => saturating_pow(element, fixed),
            None => (0..=self.max_generated)
                .fold(0u128, |total, len| {
                    total.saturating_add(saturating_pow(element, len))
                }),
        }
    }
}

/// Association-list schema keyed and valued by sub-schemas.
///
/// Supports an optional fixed size or an exact fixed key set. The domain
/// representation preserves entry order, mirroring the wire association
/// list.
pub struct MapSchema<K: Schema, V: Schema> {
    key: K,
    value: V,
    fixed_size: Option<usize>,
    required_keys: Option<Vec<K::Value>>,
    max_generated: usize,
}

impl<K: Schema, V: Schema> MapSchema<K, V> {
    /// Variable-size map; generation draws sizes up to the default bound.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            fixed_size: None,
            required_keys: None,
            max_generated: DEFAULT_MAX_GENERATED_LEN,
        }
    }

    /// Require exactly `size` distinct entries.
    pub fn with_fixed_size(mut self, size: usize) -> Result<Self, DefinitionError> {
        let population = self.key.population();
        if size as u128 > population {
            return Err(DefinitionError::KeySpaceTooSmall { size, population });
        }
        self.fixed_size = Some(size);
        self.max_generated = size;
        Ok(self)
    }

    /// Require exactly this key set, in this declared order on generation.
    pub fn with_required_keys(mut self, keys: Vec<K::Value>) -> Result<Self, DefinitionError> {
        for (position, key) in keys.iter().enumerate() {
            if keys[..position].contains(key) {
                return Err(DefinitionError::DuplicateRequiredKey {
                    key: self.key.render(key, DEFAULT_RENDER_DEPTH),
                });
            }
        }
        self.fixed_size = Some(keys.len());
        self.max_generated = keys.len();
        self.required_keys = Some(keys);
        Ok(self)
    }

    fn draw_distinct_key(
        &self,
        rng: &mut dyn RngCore,
        taken: &[(K::Value, V::Value)],
    ) -> SchemaResult<K::Value> {
        for _ in 0..MAP_KEY_RETRY_LIMIT {
            let candidate = self.key.generate(rng)?;
            if !taken.iter().any(|(key, _)| *key == candidate) {
                return Ok(candidate);
            }
        }
        Err(SchemaError::ConstructionFailure {
            reason: format!(
                "unable to draw a distinct map key within {MAP_KEY_RETRY_LIMIT} attempts"
            ),
            dump: format!("{} keys already drawn", taken.len()),
        })
    }
}

impl<K: Schema, V: Schema> Schema for MapSchema<K, V>
where
    K::Value: Send + Sync,
{
    type Value = Vec<(K::Value, V::Value)>;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let pairs = match wire {
            Data::Assoc(pairs) => pairs,
            other => {
                return Err(SchemaError::TypeMismatch {
                    expected: DataKind::Assoc,
                    found: other.kind(),
                })
            }
        };
        let mut lifted: Vec<(K::Value, V::Value)> = Vec::with_capacity(pairs.len());
        for (position, (key, value)) in pairs.iter().enumerate() {
            let key = self
                .key
                .lift(key)
                .map_err(|err| err.in_field(format!("key[{position}]")))?;
            let value = self
                .value
                .lift(value)
                .map_err(|err| err.in_field(format!("value[{position}]")))?;
            // Last write wins: keep the first position, overwrite the value.
            match lifted.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => lifted.push((key, value)),
            }
        }
        if let Some(size) = self.fixed_size {
            if lifted.len() != size {
                return Err(SchemaError::ArityMismatch {
                    expected: size,
                    found: lifted.len(),
                });
            }
        }
        if let Some(required) = &self.required_keys {
            for key in required {
                if !lifted.iter().any(|(existing, _)| existing == key) {
                    return Err(SchemaError::RefinementViolation {
                        predicate: "fixed-key-set".to_string(),
                        value: format!(
                            "missing key {}",
                            self.key.render(key, DEFAULT_RENDER_DEPTH)
                        ),
                    });
                }
            }
        }
        Ok(lifted)
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        let mut pairs = Vec::with_capacity(value.len());
        for (position, (key, val)) in value.iter().enumerate() {
            let key = self
                .key
                .lower(key)
                .map_err(|err| err.in_field(format!("key[{position}]")))?;
            let val = self
                .value
                .lower(val)
                .map_err(|err| err.in_field(format!("value[{position}]")))?;
            pairs.push((key, val));
        }
        Ok(Data::Assoc(pairs))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        if let Some(required) = &self.required_keys {
            let mut entries = Vec::with_capacity(required.len());
            for key in required {
                entries.push((key.clone(), self.value.generate(rng)?));
            }
            return Ok(entries);
        }
        let size = match self.fixed_size {
            Some(fixed) => fixed,
            None => rng.gen_range(0..=self.max_generated),
        };
        let mut entries: Vec<(K::Value, V::Value)> = Vec::with_capacity(size);
        for _ in 0..size {
            let key = self.draw_distinct_key(rng, &entries)?;
            entries.push((key, self.value.generate(rng)?));
        }
        Ok(entries)
    }

    fn population(&self) -> u128 {
        let pair = self.key.population().saturating_mul(self.value.population());
        match self.fixed_size {
            Some(size) => saturating_pow(pair, size),
            None => (0..=self.max_generated)
                .fold(0u128, |total, size| {
                    total.saturating_add(saturating_pow(pair, size))
                }),
        }
    }
}

impl<K: Schema, V: Schema> fmt::Debug for MapSchema<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSchema")
            .field("fixed_size", &self.fixed_size)
            .field("required_keys", &self.required_keys)
            .field("max_generated", &self.max_generated)
            .finish_non_exhaustive()
    }
}

fn saturating_pow(base: u128, exp: usize) -> u128 {
    match u32::try_from(exp) {
        Ok(exp) => base.saturating_pow(exp),
        Err(_) => u128::MAX,
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
    fn fixed_length_list_rejects_other_lengths() {
        let schema = ListSchema::fixed(IntSchema::default(), 3);
        let wire = Data::seq(vec![Data::int(1), Data::int(2)]);
        assert_eq!(
            schema.lift(&wire).unwrap_err(),
            SchemaError::ArityMismatch {
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn list_element_failures_are_fail_fast_with_position() {
        let schema = ListSchema::new(IntSchema::default());
        let wire = Data::seq(vec![Data::int(1), Data::bytes([0xaa]), Data::int(3)]);
        let err = schema.lift(&wire).unwrap_err();
        match &err {
            SchemaError::Field { field, .. } => assert_eq!(field, "[1]"),
            other => panic!("expected positional context, got {other:?}"),
        }
    }

    #[test]
    fn variable_length_list_accepts_any_length() {
        let schema = ListSchema::new(IntSchema::default());
        let wire = Data::seq((0..20).map(|i| Data::int(i)).collect());
        assert_eq!(schema.lift(&wire).expect("lift list").len(), 20);
    }

    #[test]
    fn generated_lists_round_trip() {
        let schema = ListSchema::new(BytesSchema::fixed(4));
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let value = schema.generate(&mut rng).expect("generate list");
            assert!(value.len() <= DEFAULT_MAX_GENERATED_LEN);
            let wire = schema.lower(&value).expect("lower list");
            assert_eq!(schema.lift(&wire).expect("lift list"), value);
        }
    }

    #[test]
    fn map_duplicate_keys_last_write_wins() {
        let schema = MapSchema::new(IntSchema::default(), IntSchema::default());
        let wire = Data::assoc(vec![
            (Data::int(1), Data::int(10)),
            (Data::int(2), Data::int(20)),
            (Data::int(1), Data::int(30)),
        ]);
        let lifted = schema.lift(&wire).expect("lift map");
        // First position kept, later value wins.
        assert_eq!(
            lifted,
            vec![
                (BigInt::from(1), BigInt::from(30)),
                (BigInt::from(2), BigInt::from(20)),
            ]
        );
    }

    #[test]
    fn fixed_size_map_counts_after_deduplication() {
        let schema = MapSchema::new(IntSchema::default(), IntSchema::default())
            .with_fixed_size(2)
            .expect("key space large enough");
        let wire = Data::assoc(vec![
            (Data::int(1), Data::int(10)),
            (Data::int(1), Data::int(20)),
        ]);
        assert_eq!(
            schema.lift(&wire).unwrap_err(),
            SchemaError::ArityMismatch {
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn required_key_set_reports_missing_keys() {
        let schema = MapSchema::new(IntSchema::default(), IntSchema::default())
            .with_required_keys(vec![BigInt::from(1), BigInt::from(2)])
            .expect("distinct key set");
        let wire = Data::assoc(vec![
            (Data::int(1), Data::int(10)),
            (Data::int(3), Data::int(30)),
        ]);
        let err = schema.lift(&wire).unwrap_err();
        match &err {
            SchemaError::RefinementViolation { predicate, value } => {
                assert_eq!(predicate, "fixed-key-set");
                assert_eq!(value, "missing key 2");
            }
            other => panic!("expected refinement violation, got {other:?}"),
        }
    }

    #[test]
    fn required_key_set_generates_declared_keys_in_order() {
        let schema = MapSchema::new(IntSchema::default(), IntSchema::default())
            .with_required_keys(vec![BigInt::from(7), BigInt::from(3)])
            .expect("distinct key set");
        let mut rng = StdRng::seed_from_u64(29);
        let value = schema.generate(&mut rng).expect("generate map");
        let keys: Vec<&BigInt> = value.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![&BigInt::from(7), &BigInt::from(3)]);
        let wire = schema.lower(&value).expect("lower map");
        assert_eq!(schema.lift(&wire).expect("lift map"), value);
    }

    #[test]
    fn duplicate_required_keys_are_rejected_at_construction() {
        let err = MapSchema::new(IntSchema::default(), IntSchema::default())
            .with_required_keys(vec![BigInt::from(1), BigInt::from(1)])
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateRequiredKey {
                key: "1".to_string(),
            }
        );
    }

    #[test]
    fn fixed_size_beyond_key_population_is_rejected() {
        // A zero-magnitude integer key admits exactly one value.
        let err = MapSchema::new(IntSchema::new(0).expect("magnitude"), IntSchema::default())
            .with_fixed_size(2)
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::KeySpaceTooSmall {
                size: 2,
                population: 1,
            }
        );
    }

    #[test]
    fn generated_map_keys_are_distinct() {
        let schema = MapSchema::new(IntSchema::new(4).expect("magnitude"), IntSchema::default())
            .with_fixed_size(5)
            .expect("key space large enough");
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..50 {
            let value = schema.generate(&mut rng).expect("generate map");
            assert_eq!(value.len(), 5);
            for (position, (key, _)) in value.iter().enumerate() {
                assert!(!value[..position].iter().any(|(other, _)| other == key));
            }
            let wire = schema.lower(&value).expect("lower map");
            assert_eq!(schema.lift(&wire).expect("lift map"), value);
        }
    }
}
