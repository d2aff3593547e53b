//! Universal wire value for on-chain structured data
//!
//! Every domain value handled by the Datum framework is ultimately projected
//! into and out of the [`Data`] union defined here. The union is closed: the
//! external binary-data grammar it mirrors knows exactly these five shapes,
//! and domain code never extends it — schemas in `datum-codec` only ever
//! project into and out of it.

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// The five-variant universal wire value.
///
/// Wire trees are plain owned values: cloning is deep, equality is
/// structural, and producers hand exclusive ownership to their caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Data {
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// Raw byte sequence.
    Bytes(Vec<u8>),
    /// Ordered sequence of wire values.
    Sequence(Vec<Data>),
    /// Ordered association list. Order is preserved and duplicate keys are
    /// representable at this layer; schema-level policy decides their fate.
    Assoc(Vec<(Data, Data)>),
    /// Tagged constructor: an integer discriminant plus an ordered field
    /// list. Encodes both single-shape records (index fixed at 0) and
    /// multi-branch sums (index = branch position).
    Tagged {
        /// Constructor discriminant carried on the wire.
        index: u64,
        /// Ordered constructor fields.
        fields: Vec<Data>,
    },
}

/// Kind descriptor for a wire value, used in expected-vs-actual diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataKind {
    /// An [`Data::Integer`] value.
    Integer,
    /// A [`Data::Bytes`] value.
    Bytes,
    /// A [`Data::Sequence`] value.
    Sequence,
    /// A [`Data::Assoc`] value.
    Assoc,
    /// A [`Data::Tagged`] value.
    Tagged,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Integer => "integer",
            DataKind::Bytes => "bytes",
            DataKind::Sequence => "sequence",
            DataKind::Assoc => "assoc",
            DataKind::Tagged => "tagged",
        };
        write!(f, "{name}")
    }
}

impl Data {
    /// Construct an integer wire value.
    pub fn int(value: impl Into<BigInt>) -> Self {
        Data::Integer(value.into())
    }

    /// Construct a byte-sequence wire value, copying the input.
    pub fn bytes(value: impl AsRef<[u8]>) -> Self {
        Data::Bytes(value.as_ref().to_vec())
    }

    /// Construct an ordered sequence wire value.
    pub fn seq(items: Vec<Data>) -> Self {
        Data::Sequence(items)
    }

    /// Construct an association-list wire value.
    pub fn assoc(pairs: Vec<(Data, Data)>) -> Self {
        Data::Assoc(pairs)
    }

    /// Construct a tagged-constructor wire value.
    pub fn constr(index: u64, fields: Vec<Data>) -> Self {
        Data::Tagged { index, fields }
    }

    /// The kind of this wire value.
    pub fn kind(&self) -> DataKind {
        match self {
            Data::Integer(_) => DataKind::Integer,
            Data::Bytes(_) => DataKind::Bytes,
            Data::Sequence(_) => DataKind::Sequence,
            Data::Assoc(_) => DataKind::Assoc,
            Data::Tagged { .. } => DataKind::Tagged,
        }
    }

    /// Borrow the integer payload, if this is an integer value.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Data::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the byte payload, if this is a bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Data::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// Render a human-readable dump of this wire tree.
    ///
    /// `depth` bounds how many levels of nested structure are expanded;
    /// containers below the budget render as `...`. Leaves always render in
    /// full, with bytes shown as hex.
    pub fn render(&self, depth: usize) -> String {
        match self {
            Data::Integer(value) => value.to_string(),
            Data::Bytes(value) => format!("0x{}", hex::encode(value)),
            Data::Sequence(items) => {
                if depth == 0 {
                    return "[...]".to_string();
                }
                let inner: Vec<String> =
                    items.iter().map(|item| item.render(depth - 1)).collect();
                format!("[{}]", inner.join(", "))
            }
            Data::Assoc(pairs) => {
                if depth == 0 {
                    return "{...}".to_string();
                }
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| {
                        format!("{}: {}", key.render(depth - 1), value.render(depth - 1))
                    })
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Data::Tagged { index, fields } => {
                if depth == 0 {
                    return format!("Constr#{index}(...)");
                }
                let inner: Vec<String> =
                    fields.iter().map(|field| field.render(depth - 1)).collect();
                format!("Constr#{index}({})", inner.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_variants() {
        assert_eq!(Data::int(1).kind(), DataKind::Integer);
        assert_eq!(Data::bytes([0xab]).kind(), DataKind::Bytes);
        assert_eq!(Data::seq(vec![]).kind(), DataKind::Sequence);
        assert_eq!(Data::assoc(vec![]).kind(), DataKind::Assoc);
        assert_eq!(Data::constr(0, vec![]).kind(), DataKind::Tagged);
        assert_eq!(DataKind::Tagged.to_string(), "tagged");
    }

    #[test]
    fn render_expands_within_depth_budget() {
        let tree = Data::constr(1, vec![Data::int(-7), Data::bytes([0xde, 0xad])]);
        assert_eq!(tree.render(2), "Constr#1(-7, 0xdead)");
    }

    #[test]
    fn render_truncates_below_depth_budget() {
        let nested = Data::seq(vec![Data::seq(vec![Data::int(1)])]);
        assert_eq!(nested.render(1), "[[...]]");
        assert_eq!(nested.render(0), "[...]");

        let tagged = Data::constr(3, vec![Data::int(9)]);
        assert_eq!(tagged.render(0), "Constr#3(...)");
    }

    #[test]
    fn render_assoc_pairs_in_order() {
        let map = Data::assoc(vec![
            (Data::int(1), Data::bytes([0x01])),
            (Data::int(2), Data::bytes([0x02])),
        ]);
        assert_eq!(map.render(2), "{1: 0x01, 2: 0x02}");
    }

    #[test]
    fn wire_trees_round_trip_through_serde() {
        let tree = Data::constr(
            2,
            vec![
                Data::int(BigInt::from(10).pow(30)),
                Data::assoc(vec![(Data::bytes([0xff]), Data::seq(vec![Data::int(0)]))]),
            ],
        );
        let encoded = serde_json::to_string(&tree).expect("serialize wire tree");
        let decoded: Data = serde_json::from_str(&encoded).expect("deserialize wire tree");
        assert_eq!(decoded, tree);
    }
}
