//! Data model and calldata encoding for email ZK proofs.
//!
//! The proving service returns a Groth16 proof artifact plus the circuit's
//! public outputs; a Solidity verifier contract consumes them as four
//! fixed-shape arrays. This crate holds the wire types and the pure
//! reshaping step between the two. No I/O happens here.

mod calldata;
mod proof;

pub use calldata::{encode_calldata, ContractCalldata, EncodeError, RawCalldata, NUM_PUB_SIGNALS};
pub use proof::{NamedOutputs, ProofArtifact, PublicOutputs};
