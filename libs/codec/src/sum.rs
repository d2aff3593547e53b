//! Sum: discriminated union over an ordered branch list
//!
//! A branch's position in the declared list **is** its wire tag, so branch
//! order is part of the wire contract and reordering branches is a breaking
//! change. Each branch is record-shaped and stamped with its own position
//! via `Record*::with_tag`.
//!
//! Encoding dispatch is driven by an explicit discriminant function fixed at
//! construction — typically a `match` over a closed domain enum — never by
//! runtime type inspection. The discriminant returning `None` or an
//! out-of-range position means the caller passed a value no declared branch
//! covers, which is `NoMatchingBranch`.

use std::fmt;

use datum_types::{Data, DataKind};
use rand::{Rng, RngCore};

use crate::error::{DefinitionError, SchemaError, SchemaResult};
use crate::schema::Schema;

/// One alternative of a sum, backed by a record-shaped schema.
pub struct Branch<T> {
    name: &'static str,
    schema: Box<dyn Schema<Value = T>>,
}

impl<T: Clone + PartialEq + fmt::Debug> Branch<T> {
    /// Declare a branch with its stable name.
    ///
    /// The backing record must carry this branch's list position as its
    /// constructor tag; a mismatch fails loudly on the first lift.
    pub fn new(name: &'static str, schema: impl Schema<Value = T> + 'static) -> Self {
        Self {
            name,
            schema: Box::new(schema),
        }
    }
}

/// Discriminated union schema over a closed domain type.
pub struct SumSchema<T> {
    branches: Vec<Branch<T>>,
    discriminant: Box<dyn Fn(&T) -> Option<usize> + Send + Sync>,
    weights: Vec<u32>,
}

impl<T: Clone + PartialEq + fmt::Debug> SumSchema<T> {
    /// Declare a sum from its ordered branches and discriminant function.
    ///
    /// The discriminant maps a domain value to the position of the branch
    /// that encodes it, fixed at value-construction time by the enum
    /// variant. Generation picks branches uniformly unless reweighted via
    /// [`SumSchema::with_weights`].
    pub fn new<D>(branches: Vec<Branch<T>>, discriminant: D) -> Result<Self, DefinitionError>
    where
        D: Fn(&T) -> Option<usize> + Send + Sync + 'static,
    {
        if branches.is_empty() {
            return Err(DefinitionError::EmptyAlternatives { shape: "sum" });
        }
        let weights = vec![1; branches.len()];
        Ok(Self {
            branches,
            discriminant: Box::new(discriminant),
            weights,
        })
    }

    /// Replace the uniform generation weighting, one weight per branch.
    pub fn with_weights(mut self, weights: Vec<u32>) -> Result<Self, DefinitionError> {
        if weights.len() != self.branches.len() {
            return Err(DefinitionError::WeightCountMismatch {
                expected: self.branches.len(),
                found: weights.len(),
            });
        }
        if weights.iter().all(|weight| *weight == 0) {
            return Err(DefinitionError::ZeroWeight);
        }
        self.weights = weights;
        Ok(self)
    }

    fn pick_branch(&self, rng: &mut dyn RngCore) -> usize {
        let total: u64 = self.weights.iter().map(|weight| u64::from(*weight)).sum();
        let mut draw = rng.gen_range(0..total);
        for (position, weight) in self.weights.iter().enumerate() {
            let weight = u64::from(*weight);
            if draw < weight {
                return position;
            }
            draw -= weight;
        }
        self.branches.len() - 1
    }
}

impl<T: Clone + PartialEq + fmt::Debug> Schema for SumSchema<T> {
    type Value = T;

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        let index = match wire {
            Data::Tagged { index, .. } => *index,
            other => {
                return Err(SchemaError::TypeMismatch {
                    expected: DataKind::Tagged,
                    found: other.kind(),
                })
            }
        };
        let position = usize::try_from(index)
            .ok()
            .filter(|position| *position < self.branches.len())
            .ok_or(SchemaError::TagOutOfRange {
                index,
                limit: self.branches.len(),
            })?;
        let branch = &self.branches[position];
        branch
            .schema
            .lift(wire)
            .map_err(|err| err.in_field(branch.name))
    }

    fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
        let position = (self.discriminant)(value).ok_or_else(|| SchemaError::NoMatchingBranch {
            detail: format!(
                "discriminant reported no branch among {} declared",
                self.branches.len()
            ),
        })?;
        if position >= self.branches.len() {
            return Err(SchemaError::NoMatchingBranch {
                detail: format!(
                    "discriminant reported branch {position}, only {} declared",
                    self.branches.len()
                ),
            });
        }
        let branch = &self.branches[position];
        branch
            .schema
            .lower(value)
            .map_err(|err| err.in_field(branch.name))
    }

    fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        let position = self.pick_branch(rng);
        let branch = &self.branches[position];
        branch
            .schema
            .generate(rng)
            .map_err(|err| err.in_field(branch.name))
    }

    fn population(&self) -> u128 {
        self.branches
            .iter()
            .fold(0u128, |total, branch| {
                total.saturating_add(branch.schema.population())
            })
    }
}

impl<T> fmt::Debug for SumSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumSchema")
            .field(
                "branches",
                &self.branches.iter().map(|branch| branch.name).collect::<Vec<_>>(),
            )
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, Record1};
    use crate::wrapped::WrappedSchema;
    use num_bigint::BigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, PartialEq)]
    enum Quote {
        Bid(BigInt),
        Ask(BigInt),
    }

    fn quote_schema() -> SumSchema<Quote> {
        let bid = WrappedSchema::new(
            Record1::new((Field::new("price", crate::primitives::IntSchema::default()),)),
            |(price,)| Ok(Quote::Bid(price)),
            |quote: &Quote| match quote {
                Quote::Bid(price) => (price.clone(),),
                Quote::Ask(_) => unreachable!("dispatched to bid branch"),
            },
        );
        let ask = WrappedSchema::new(
            Record1::new((Field::new("price", crate::primitives::IntSchema::default()),))
                .with_tag(1),
            |(price,)| Ok(Quote::Ask(price)),
            |quote: &Quote| match quote {
                Quote::Ask(price) => (price.clone(),),
                Quote::Bid(_) => unreachable!("dispatched to ask branch"),
            },
        );
        SumSchema::new(
            vec![Branch::new("bid", bid), Branch::new("ask", ask)],
            |quote| match quote {
                Quote::Bid(_) => Some(0),
                Quote::Ask(_) => Some(1),
            },
        )
        .expect("non-empty branch list")
    }

    #[test]
    fn branch_position_is_the_wire_tag() {
        let schema = quote_schema();
        let wire = schema.lower(&Quote::Ask(BigInt::from(5))).expect("lower ask");
        assert_eq!(wire, Data::constr(1, vec![Data::int(5)]));
        let wire = schema.lower(&Quote::Bid(BigInt::from(7))).expect("lower bid");
        assert_eq!(wire, Data::constr(0, vec![Data::int(7)]));
    }

    #[test]
    fn out_of_range_tag_is_rejected() {
        let schema = quote_schema();
        let err = schema
            .lift(&Data::constr(2, vec![Data::int(1)]))
            .unwrap_err();
        assert_eq!(err, SchemaError::TagOutOfRange { index: 2, limit: 2 });
    }

    #[test]
    fn lift_dispatches_to_the_tagged_branch() {
        let schema = quote_schema();
        let value = schema
            .lift(&Data::constr(1, vec![Data::int(12)]))
            .expect("lift ask");
        assert_eq!(value, Quote::Ask(BigInt::from(12)));
    }

    #[test]
    fn non_tagged_wire_values_are_type_mismatches() {
        let schema = quote_schema();
        let err = schema.lift(&Data::int(4)).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }

    #[test]
    fn rogue_discriminant_is_no_matching_branch() {
        let bid = WrappedSchema::new(
            Record1::new((Field::new("price", crate::primitives::IntSchema::default()),)),
            |(price,)| Ok(Quote::Bid(price)),
            |quote: &Quote| match quote {
                Quote::Bid(price) => (price.clone(),),
                Quote::Ask(_) => unreachable!("single-branch schema"),
            },
        );
        let schema = SumSchema::new(vec![Branch::new("bid", bid)], |_| None)
            .expect("non-empty branch list");
        let err = schema.lower(&Quote::Bid(BigInt::from(1))).unwrap_err();
        assert!(matches!(err, SchemaError::NoMatchingBranch { .. }));
    }

    #[test]
    fn zero_weight_branches_are_never_generated() {
        let schema = quote_schema()
            .with_weights(vec![1, 0])
            .expect("matching weight count");
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..200 {
            let value = schema.generate(&mut rng).expect("generate quote");
            assert!(matches!(value, Quote::Bid(_)));
        }
    }

    #[test]
    fn weight_misconfiguration_is_rejected() {
        assert_eq!(
            quote_schema().with_weights(vec![1]).unwrap_err(),
            DefinitionError::WeightCountMismatch {
                expected: 2,
                found: 1,
            }
        );
        assert_eq!(
            quote_schema().with_weights(vec![0, 0]).unwrap_err(),
            DefinitionError::ZeroWeight
        );
        assert!(matches!(
            SumSchema::<Quote>::new(vec![], |_| None).unwrap_err(),
            DefinitionError::EmptyAlternatives { shape: "sum" }
        ));
    }

    #[test]
    fn generated_quotes_round_trip() {
        let schema = quote_schema();
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..200 {
            let value = schema.generate(&mut rng).expect("generate quote");
            let wire = schema.lower(&value).expect("lower quote");
            assert_eq!(schema.lift(&wire).expect("lift quote"), value);
        }
    }
}
