//! Schema synthesizer: depth-bounded random schema composition
//!
//! Builds an arbitrary schema instance out of the framework's own
//! combinators, homogenized over `Value = Data`, so the round-trip law can
//! be fuzzed across arbitrary shapes instead of a hand-picked few. The
//! produced schema is an ordinary [`DynSchema`]; calling its `generate`
//! yields the domain value.
//!
//! Termination: the depth budget is an explicit parameter at every
//! recursive call. At zero budget only terminal shapes are drawn, and the
//! terminal pool is never empty, so recursion always bottoms out.
//!
//! The `Data`-to-`Data` projection closures in the adapters below panic on
//! wire values of the wrong shape. That is API-misuse territory: adapters
//! are only handed values their own schema produced or lifted.

use num_bigint::BigInt;
use rand::{Rng, RngCore};
use tracing::trace;

use datum_types::Data;

use crate::collections::{ListSchema, MapSchema};
use crate::constants::MAX_SYNTH_FANOUT;
use crate::constraint::ConstraintSchema;
use crate::error::DefinitionError;
use crate::pinned::{EnumSchema, LiteralSchema};
use crate::primitives::{BytesSchema, IntSchema};
use crate::record::{Field, Record0, Record1, Record2, Record3};
use crate::schema::{DynSchema, Schema};
use crate::sum::{Branch, SumSchema};
use crate::wrapped::WrappedSchema;

const FIELD_NAMES: [&str; 3] = ["f0", "f1", "f2"];
const BRANCH_NAMES: [&str; 3] = ["alt0", "alt1", "alt2"];

/// Synthesize a random schema within the given depth budget.
///
/// At `depth == 0` the choice is restricted to terminal shapes; containers
/// recurse with `depth - 1` for their sub-schemas.
pub fn synthesize(rng: &mut dyn RngCore, depth: usize) -> Result<DynSchema, DefinitionError> {
    if depth == 0 {
        return terminal(rng);
    }
    if rng.gen_bool(0.5) {
        terminal(rng)
    } else {
        container(rng, depth)
    }
}

fn terminal(rng: &mut dyn RngCore) -> Result<DynSchema, DefinitionError> {
    let choice = rng.gen_range(0..5u32);
    trace!(choice, "synthesizing terminal schema");
    match choice {
        0 => Ok(integer_data()),
        1 => {
            let min = rng.gen_range(0..=4usize);
            let max = min + rng.gen_range(0..=4usize);
            Ok(bytes_data(BytesSchema::new(min, max)?))
        }
        2 => {
            let pinned = BigInt::from(rng.gen_range(-100i64..=100));
            Ok(Box::new(WrappedSchema::new(
                LiteralSchema::new(IntSchema::default(), pinned),
                |value| Ok(Data::Integer(value)),
                expect_integer,
            )))
        }
        3 => {
            let start = rng.gen_range(-50i64..=50);
            let count = rng.gen_range(1..=4i64);
            let members = (start..start + count).map(BigInt::from).collect();
            Ok(Box::new(WrappedSchema::new(
                EnumSchema::new(IntSchema::default(), members)?,
                |value| Ok(Data::Integer(value)),
                expect_integer,
            )))
        }
        _ => {
            let lower = rng.gen_range(-1000i64..=1000);
            let upper = lower + rng.gen_range(0..=1000i64);
            Ok(Box::new(WrappedSchema::new(
                ConstraintSchema::bounded_int(lower, upper)?,
                |value| Ok(Data::Integer(value)),
                expect_integer,
            )))
        }
    }
}

fn container(rng: &mut dyn RngCore, depth: usize) -> Result<DynSchema, DefinitionError> {
    let choice = rng.gen_range(0..5u32);
    trace!(choice, depth, "synthesizing container schema");
    match choice {
        0 => {
            let element = synthesize(rng, depth - 1)?;
            Ok(list_data(ListSchema::new(element)))
        }
        1 => {
            let element = synthesize(rng, depth - 1)?;
            let len = rng.gen_range(0..=MAX_SYNTH_FANOUT);
            Ok(list_data(ListSchema::fixed(element, len)))
        }
        2 => {
            // Keys stay in high-population terminal shapes so distinct-key
            // generation cannot exhaust its retry budget.
            let key: DynSchema = if rng.gen_bool(0.5) {
                integer_data()
            } else {
                bytes_data(BytesSchema::new(1, 8)?)
            };
            let value = synthesize(rng, depth - 1)?;
            Ok(map_data(MapSchema::new(key, value)))
        }
        3 => {
            let arity = rng.gen_range(1..=MAX_SYNTH_FANOUT);
            record_data(rng, depth, arity, 0)
        }
        _ => {
            let branch_count = rng.gen_range(1..=MAX_SYNTH_FANOUT);
            let mut branches = Vec::with_capacity(branch_count);
            for position in 0..branch_count {
                let arity = rng.gen_range(0..=2usize);
                branches.push(record_data(rng, depth, arity, position as u64)?);
            }
            sum_data(branches)
        }
    }
}

fn expect_integer(data: &Data) -> BigInt {
    match data.as_integer() {
        Some(value) => value.clone(),
        None => panic!("integer adapter invoked on {} wire value", data.kind()),
    }
}

fn tagged_fields(data: &Data) -> &[Data] {
    match data {
        Data::Tagged { fields, .. } => fields,
        other => panic!("record adapter invoked on {} wire value", other.kind()),
    }
}

fn integer_data() -> DynSchema {
    Box::new(WrappedSchema::new(
        IntSchema::default(),
        |value| Ok(Data::Integer(value)),
        expect_integer,
    ))
}

fn bytes_data(schema: BytesSchema) -> DynSchema {
    Box::new(WrappedSchema::new(
        schema,
        |value| Ok(Data::Bytes(value)),
        |data: &Data| match data.as_bytes() {
            Some(value) => value.to_vec(),
            None => panic!("bytes adapter invoked on {} wire value", data.kind()),
        },
    ))
}

fn list_data(schema: ListSchema<DynSchema>) -> DynSchema {
    Box::new(WrappedSchema::new(
        schema,
        |items| Ok(Data::Sequence(items)),
        |data: &Data| match data {
            Data::Sequence(items) => items.clone(),
            other => panic!("list adapter invoked on {} wire value", other.kind()),
        },
    ))
}

fn map_data(schema: MapSchema<DynSchema, DynSchema>) -> DynSchema {
    Box::new(WrappedSchema::new(
        schema,
        |pairs| Ok(Data::Assoc(pairs)),
        |data: &Data| match data {
            Data::Assoc(pairs) => pairs.clone(),
            other => panic!("map adapter invoked on {} wire value", other.kind()),
        },
    ))
}

fn record_data(
    rng: &mut dyn RngCore,
    depth: usize,
    arity: usize,
    tag: u64,
) -> Result<DynSchema, DefinitionError> {
    Ok(match arity {
        0 => Box::new(WrappedSchema::new(
            Record0::new().with_tag(tag),
            move |_: ()| Ok(Data::constr(tag, Vec::new())),
            |_: &Data| (),
        )),
        1 => {
            let record = Record1::new((Field::new(FIELD_NAMES[0], synthesize(rng, depth - 1)?),))
                .with_tag(tag);
            Box::new(WrappedSchema::new(
                record,
                move |(f0,)| Ok(Data::constr(tag, vec![f0])),
                |data: &Data| {
                    let fields = tagged_fields(data);
                    (fields[0].clone(),)
                },
            ))
        }
        2 => {
            let record = Record2::new((
                Field::new(FIELD_NAMES[0], synthesize(rng, depth - 1)?),
                Field::new(FIELD_NAMES[1], synthesize(rng, depth - 1)?),
            ))
            .with_tag(tag);
            Box::new(WrappedSchema::new(
                record,
                move |(f0, f1)| Ok(Data::constr(tag, vec![f0, f1])),
                |data: &Data| {
                    let fields = tagged_fields(data);
                    (fields[0].clone(), fields[1].clone())
                },
            ))
        }
        _ => {
            let record = Record3::new((
                Field::new(FIELD_NAMES[0], synthesize(rng, depth - 1)?),
                Field::new(FIELD_NAMES[1], synthesize(rng, depth - 1)?),
                Field::new(FIELD_NAMES[2], synthesize(rng, depth - 1)?),
            ))
            .with_tag(tag);
            Box::new(WrappedSchema::new(
                record,
                move |(f0, f1, f2)| Ok(Data::constr(tag, vec![f0, f1, f2])),
                |data: &Data| {
                    let fields = tagged_fields(data);
                    (fields[0].clone(), fields[1].clone(), fields[2].clone())
                },
            ))
        }
    })
}

fn sum_data(branch_schemas: Vec<DynSchema>) -> Result<DynSchema, DefinitionError> {
    let branches = branch_schemas
        .into_iter()
        .enumerate()
        .map(|(position, schema)| Branch::new(BRANCH_NAMES[position], schema))
        .collect();
    let sum = SumSchema::new(branches, |data: &Data| match data {
        Data::Tagged { index, .. } => usize::try_from(*index).ok(),
        _ => None,
    })?;
    Ok(Box::new(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_budget_synthesis_terminates() {
        let mut rng = StdRng::seed_from_u64(101);
        for _ in 0..100 {
            let schema = synthesize(&mut rng, 0).expect("synthesize terminal");
            assert!(schema.population() >= 1);
            let value = schema.generate(&mut rng).expect("generate value");
            let wire = schema.lower(&value).expect("lower value");
            assert_eq!(schema.lift(&wire).expect("lift value"), value);
        }
    }

    #[test]
    fn shallow_synthesis_round_trips() {
        let mut rng = StdRng::seed_from_u64(202);
        for _ in 0..100 {
            let schema = synthesize(&mut rng, 2).expect("synthesize schema");
            assert!(schema.population() >= 1);
            let value = schema.generate(&mut rng).expect("generate value");
            let wire = schema.lower(&value).expect("lower value");
            assert_eq!(schema.lift(&wire).expect("lift value"), value);
        }
    }
}
