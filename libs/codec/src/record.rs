//! Record: fixed, named, ordered heterogeneous field tuples
//!
//! A record embeds its fields inside one tagged constructor. Field order is
//! assigned at construction and is the wire contract: lift and lower walk
//! the same declared order, so reordering fields is a breaking change. The
//! constructor tag defaults to 0 and is stamped to the branch position when
//! a record backs a sum branch.
//!
//! A standalone record behaves as a single-branch union, so a wire value
//! carrying a different constructor index fails with `TagOutOfRange`.

use datum_types::{Data, DataKind};
use rand::RngCore;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::Schema;

/// A named record field backed by a sub-schema.
pub struct Field<S: Schema> {
    name: &'static str,
    schema: S,
}

impl<S: Schema> Field<S> {
    /// Declare a field with its stable name.
    pub fn new(name: &'static str, schema: S) -> Self {
        Self { name, schema }
    }
}

/// Check the tagged envelope of a record-shaped wire value and return its
/// ordered fields.
pub(crate) fn expect_tagged<'a>(
    wire: &'a Data,
    tag: u64,
    arity: usize,
) -> SchemaResult<&'a [Data]> {
    let (index, fields) = match wire {
        Data::Tagged { index, fields } => (*index, fields.as_slice()),
        other => {
            return Err(SchemaError::TypeMismatch {
                expected: DataKind::Tagged,
                found: other.kind(),
            })
        }
    };
    if index != tag {
        return Err(SchemaError::TagOutOfRange {
            index,
            limit: tag as usize + 1,
        });
    }
    if fields.len() != arity {
        return Err(SchemaError::ArityMismatch {
            expected: arity,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Field-free record: a bare constructor carrying no payload.
#[derive(Debug, Clone, Default)]
pub struct Record0 {
    tag: u64,
}

impl Record0 {
    /// Create a field-free record with constructor tag 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the constructor tag, used when this record backs a sum branch.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }
}

impl Schema for Record0 {
    type Value = ();

    fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
        expect_tagged(wire, self.tag, 0)?;
        Ok(())
    }

    fn lower(&self, _value: &Self::Value) -> SchemaResult<Data> {
        Ok(Data::constr(self.tag, Vec::new()))
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
        Ok(())
    }

    fn population(&self) -> u128 {
        1
    }
}

macro_rules! impl_record {
    ($(#[$doc:meta])* $name:ident, $arity:expr, $( $S:ident => $idx:tt ),+ ) => {
        $(#[$doc])*
        pub struct $name<$($S: Schema),+> {
            fields: ( $(Field<$S>,)+ ),
            tag: u64,
        }

        impl<$($S: Schema),+> $name<$($S),+> {
            /// Declare the record from its ordered fields, tag 0.
            pub fn new(fields: ( $(Field<$S>,)+ )) -> Self {
                Self { fields, tag: 0 }
            }

            /// Stamp the constructor tag, used when this record backs a sum
            /// branch.
            pub fn with_tag(mut self, tag: u64) -> Self {
                self.tag = tag;
                self
            }
        }

        impl<$($S: Schema),+> Schema for $name<$($S),+> {
            type Value = ( $($S::Value,)+ );

            fn lift(&self, wire: &Data) -> SchemaResult<Self::Value> {
                let fields = expect_tagged(wire, self.tag, $arity)?;
                Ok(( $(
                    self.fields.$idx.schema
                        .lift(&fields[$idx])
                        .map_err(|err| err.in_field(self.fields.$idx.name))?,
                )+ ))
            }

            fn lower(&self, value: &Self::Value) -> SchemaResult<Data> {
                let mut lowered = Vec::with_capacity($arity);
                $(
                    lowered.push(
                        self.fields.$idx.schema
                            .lower(&value.$idx)
                            .map_err(|err| err.in_field(self.fields.$idx.name))?,
                    );
                )+
                Ok(Data::constr(self.tag, lowered))
            }

            fn generate(&self, rng: &mut dyn RngCore) -> SchemaResult<Self::Value> {
                Ok(( $(
                    self.fields.$idx.schema
                        .generate(rng)
                        .map_err(|err| err.in_field(self.fields.$idx.name))?,
                )+ ))
            }

            fn population(&self) -> u128 {
                let mut product: u128 = 1;
                $(
                    product = product.saturating_mul(self.fields.$idx.schema.population());
                )+
                product
            }
        }
    };
}

impl_record!(
    /// One-field record.
    Record1, 1, A => 0
);
impl_record!(
    /// Two-field record.
    Record2, 2, A => 0, B => 1
);
impl_record!(
    /// Three-field record.
    Record3, 3, A => 0, B => 1, C => 2
);
impl_record!(
    /// Four-field record.
    Record4, 4, A => 0, B => 1, C => 2, D => 3
);
