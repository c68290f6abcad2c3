use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Groth16 proof artifact as returned by the proving service.
///
/// Coordinates are string-encoded field elements in projective form:
/// `pi_a` and `pi_c` carry an affine pair plus a trailing normalizer
/// (always `"1"`), `pi_b` carries two Fq2 rows plus a normalizer row.
/// The normalizer coordinates are dropped during calldata encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
}

/// Public outputs of the circuit, in either of the two shapes the
/// proving service emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicOutputs {
    /// Ordered string-encoded field elements, used directly as signals.
    Signals(Vec<String>),
    /// Named output map; values are flattened in insertion order.
    Named(NamedOutputs),
}

/// Keyed public-outputs response. Each entry maps an output field name
/// to a scalar or a sequence of scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedOutputs {
    #[serde(default)]
    pub outputs: Option<Map<String, Value>>,
}

impl PublicOutputs {
    /// Flatten into the ordered signal sequence the encoder consumes.
    ///
    /// A `Named` value with no `outputs` container flattens to the empty
    /// sequence; shape problems here are never an error, since missing
    /// signals are padded with `"0"` downstream.
    pub fn flatten(&self) -> Vec<String> {
        match self {
            Self::Signals(signals) => signals.clone(),
            Self::Named(named) => named.flatten(),
        }
    }
}

impl NamedOutputs {
    fn flatten(&self) -> Vec<String> {
        let Some(outputs) = &self.outputs else {
            return Vec::new();
        };
        outputs.values().flat_map(value_to_signals).collect()
    }
}

/// One level of flattening: a JSON array contributes its elements,
/// anything else contributes itself.
fn value_to_signals(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_to_signal).collect(),
        other => vec![scalar_to_signal(other)],
    }
}

fn scalar_to_signal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
