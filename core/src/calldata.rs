use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proof::{ProofArtifact, PublicOutputs};

/// Number of public-signal slots the verifier contract expects.
pub const NUM_PUB_SIGNALS: usize = 5;

/// A coordinate group in the proof artifact is too short to yield the
/// points the verifier expects. This is an upstream contract violation,
/// not a condition the encoder recovers from.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed proof artifact: {group} is missing coordinates")]
pub struct EncodeError {
    /// Name of the offending coordinate group (`pi_a`, `pi_b` or `pi_c`).
    pub group: &'static str,
}

/// Proof calldata in the exact shapes `verifyProof(pA, pB, pC, pubSignals)`
/// takes, plus a rendered call string for contract-interaction tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCalldata {
    pub p_a: [String; 2],
    pub p_b: [[String; 2]; 2],
    pub p_c: [String; 2],
    pub pub_signals: [String; NUM_PUB_SIGNALS],
    pub function_call: String,
    pub raw_calldata: RawCalldata,
}

/// The same four arrays under the Solidity argument names, for direct
/// copy-paste into an EVM IDE's argument fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCalldata {
    #[serde(rename = "_pA")]
    pub p_a: [String; 2],
    #[serde(rename = "_pB")]
    pub p_b: [[String; 2]; 2],
    #[serde(rename = "_pC")]
    pub p_c: [String; 2],
    #[serde(rename = "_pubSignals")]
    pub pub_signals: [String; NUM_PUB_SIGNALS],
}

/// Reshape a proof artifact and its public outputs into verifier calldata.
///
/// Deterministic and side-effect free. `pi_a` and `pi_c` lose their
/// projective normalizer; each retained `pi_b` row has its two Fq2
/// components swapped, because the verifier consumes extension-field
/// elements in the opposite component order from the proving system.
/// The flattened public outputs are projected onto exactly
/// [`NUM_PUB_SIGNALS`] slots: short sequences are padded with `"0"`,
/// longer ones are truncated.
pub fn encode_calldata(
    proof: &ProofArtifact,
    public_outputs: &PublicOutputs,
) -> Result<ContractCalldata, EncodeError> {
    let p_a = affine_pair(&proof.pi_a, "pi_a")?;
    let p_b = [fq2_swapped(&proof.pi_b, 0)?, fq2_swapped(&proof.pi_b, 1)?];
    let p_c = affine_pair(&proof.pi_c, "pi_c")?;

    let signals = public_outputs.flatten();
    let pub_signals: [String; NUM_PUB_SIGNALS] =
        std::array::from_fn(|i| signals.get(i).cloned().unwrap_or_else(|| "0".to_string()));

    let function_call = format!(
        "verifyProof([{}], [[{}], [{}]], [{}], [{}])",
        p_a.join(", "),
        p_b[0].join(", "),
        p_b[1].join(", "),
        p_c.join(", "),
        pub_signals.join(", "),
    );

    Ok(ContractCalldata {
        raw_calldata: RawCalldata {
            p_a: p_a.clone(),
            p_b: p_b.clone(),
            p_c: p_c.clone(),
            pub_signals: pub_signals.clone(),
        },
        p_a,
        p_b,
        p_c,
        pub_signals,
        function_call,
    })
}

/// First two coordinates of a projective point, normalizer dropped.
fn affine_pair(coords: &[String], group: &'static str) -> Result<[String; 2], EncodeError> {
    match coords {
        [x, y, ..] => Ok([x.clone(), y.clone()]),
        _ => Err(EncodeError { group }),
    }
}

/// One `pi_b` row with its two components in verifier order.
fn fq2_swapped(rows: &[Vec<String>], row: usize) -> Result<[String; 2], EncodeError> {
    let coords = rows.get(row).ok_or(EncodeError { group: "pi_b" })?;
    match coords.as_slice() {
        [c0, c1, ..] => Ok([c1.clone(), c0.clone()]),
        _ => Err(EncodeError { group: "pi_b" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_proof() -> ProofArtifact {
        ProofArtifact {
            pi_a: strings(&["10", "20", "1"]),
            pi_b: vec![strings(&["30", "31", "1"]), strings(&["40", "41", "1"])],
            pi_c: strings(&["50", "60", "1"]),
        }
    }

    fn signals(items: &[&str]) -> PublicOutputs {
        PublicOutputs::Signals(strings(items))
    }

    #[test]
    fn extracts_affine_coordinates_and_drops_normalizer() {
        let mut proof = sample_proof();
        // the third coordinate never reaches the output, whatever it holds
        proof.pi_a[2] = "garbage".to_string();
        proof.pi_c[2] = "99".to_string();

        let calldata = encode_calldata(&proof, &signals(&[])).unwrap();
        assert_eq!(calldata.p_a, ["10", "20"]);
        assert_eq!(calldata.p_c, ["50", "60"]);
    }

    #[test]
    fn swaps_fq2_component_order() {
        let proof = ProofArtifact {
            pi_a: strings(&["1", "2", "1"]),
            pi_b: vec![
                strings(&["b00", "b01", "b02"]),
                strings(&["b10", "b11", "b12"]),
            ],
            pi_c: strings(&["3", "4", "1"]),
        };

        let calldata = encode_calldata(&proof, &signals(&[])).unwrap();
        assert_eq!(calldata.p_b, [["b01", "b00"], ["b11", "b10"]]);
    }

    #[test]
    fn pads_short_signal_sequences_with_zero() {
        let calldata = encode_calldata(&sample_proof(), &signals(&["100", "200", "300"])).unwrap();
        assert_eq!(calldata.pub_signals, ["100", "200", "300", "0", "0"]);
    }

    #[test]
    fn truncates_signals_beyond_five() {
        let outputs = signals(&["1", "2", "3", "4", "5", "666666", "777777"]);
        let calldata = encode_calldata(&sample_proof(), &outputs).unwrap();

        assert_eq!(calldata.pub_signals, ["1", "2", "3", "4", "5"]);
        // truncated values must not leak into the call string either
        assert!(!calldata.function_call.contains("666666"));
        assert!(!calldata.function_call.contains("777777"));
    }

    #[test]
    fn named_outputs_flatten_like_plain_sequence() {
        let named: PublicOutputs = serde_json::from_value(json!({
            "outputs": { "a": ["100", "200"], "b": "300" }
        }))
        .unwrap();
        let plain = signals(&["100", "200", "300"]);

        let from_named = encode_calldata(&sample_proof(), &named).unwrap();
        let from_plain = encode_calldata(&sample_proof(), &plain).unwrap();
        assert_eq!(from_named.pub_signals, from_plain.pub_signals);
    }

    #[test]
    fn unrecognized_named_shape_degrades_to_zero_signals() {
        let outputs: PublicOutputs = serde_json::from_value(json!({})).unwrap();
        let calldata = encode_calldata(&sample_proof(), &outputs).unwrap();
        assert_eq!(calldata.pub_signals, ["0", "0", "0", "0", "0"]);
    }

    #[test]
    fn function_call_formatting() {
        let proof = ProofArtifact {
            // pre-swapped so the rendered pB rows come out as [[3, 4], [5, 6]]
            pi_b: vec![strings(&["4", "3", "1"]), strings(&["6", "5", "1"])],
            pi_a: strings(&["1", "2", "1"]),
            pi_c: strings(&["7", "8", "1"]),
        };
        let outputs = signals(&["9", "10", "11", "12", "13"]);

        let calldata = encode_calldata(&proof, &outputs).unwrap();
        assert_eq!(
            calldata.function_call,
            "verifyProof([1, 2], [[3, 4], [5, 6]], [7, 8], [9, 10, 11, 12, 13])"
        );
    }

    #[test]
    fn end_to_end_example() {
        let calldata =
            encode_calldata(&sample_proof(), &signals(&["100", "200", "300"])).unwrap();

        assert_eq!(calldata.p_a, ["10", "20"]);
        assert_eq!(calldata.p_b, [["31", "30"], ["41", "40"]]);
        assert_eq!(calldata.p_c, ["50", "60"]);
        assert_eq!(calldata.pub_signals, ["100", "200", "300", "0", "0"]);
        assert_eq!(calldata.raw_calldata.p_a, calldata.p_a);
        assert_eq!(calldata.raw_calldata.pub_signals, calldata.pub_signals);
    }

    #[test]
    fn short_coordinate_group_is_a_malformed_artifact() {
        let mut proof = sample_proof();
        proof.pi_a = strings(&["10"]);
        let err = encode_calldata(&proof, &signals(&[])).unwrap_err();
        assert_eq!(err.group, "pi_a");

        let mut proof = sample_proof();
        proof.pi_b = vec![strings(&["30", "31", "1"])];
        let err = encode_calldata(&proof, &signals(&[])).unwrap_err();
        assert_eq!(err.group, "pi_b");
    }

    #[test]
    fn serializes_under_contract_field_names() {
        let calldata = encode_calldata(&sample_proof(), &signals(&["100"])).unwrap();
        let value = serde_json::to_value(&calldata).unwrap();

        assert!(value.get("pA").is_some());
        assert!(value.get("pB").is_some());
        assert!(value.get("pC").is_some());
        assert!(value.get("pubSignals").is_some());
        assert!(value.get("functionCall").is_some());
        let raw = value.get("rawCalldata").unwrap();
        assert!(raw.get("_pA").is_some());
        assert!(raw.get("_pubSignals").is_some());
    }
}
