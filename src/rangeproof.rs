/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The external rangeproof engine, wrapped for the transaction builder.
//!
//! Proving a batch of output amounts yields, per amount, the pedersen
//! commitment that goes on the wire and the blinding mask the builder
//! needs for balance aggregation. The engine itself is Bulletproofs+.

use std::iter::zip;

use crate::internal_common::*;

use bulletproofs_plus::{
    range_parameters::RangeParameters,
    range_witness::RangeWitness,
    commitment_opening::CommitmentOpening,
    range_statement::RangeStatement,
    range_proof::{
        RangeProof as BulletPlusProof,
        VerifyAction
    },
    generators::pedersen_gens::{
        ExtensionDegree,
        PedersenGens
    },
    errors::ProofError as BulletPlusError,
};

///Commitment values (in atomic units) are allowed to be between 0 and 2<sup>`BIT_RANGE`</sup> - 1.
//This must be a power of 2 and should not exceed 64.
pub const BIT_RANGE: usize = 64;

///Maximum number of values allowed in one aggregated proof.
///This matches the output cap of a transaction, rounded up to a power of 2.
pub const MAX_AGGREGATION_SIZE: usize = 32;

const EXTENSION_DEGREE: ExtensionDegree = ExtensionDegree::DefaultPedersen;
const TRANSCRIPT_LABEL: &'static str = "Output amount rangeproofs";

lazy_static! {
    static ref RANGE_PARAMETERS: Vec<RangeParameters<RistrettoPoint>> = generate_range_parameters();
    static ref ZERO_COMMITMENT_OPENING: CommitmentOpening = CommitmentOpening::new(0, vec!(Scalar::zero()));
    static ref ZERO_COMMITMENT: Commitment = Commitment(&Scalar::zero() * G);
}

/// pre-generate range parameters for every aggregation size
fn generate_range_parameters() -> Vec<RangeParameters<RistrettoPoint>> {
    let pedersen_gens: PedersenGens<RistrettoPoint> = PedersenGens {
        h_base: *PEDERSEN_H_POINT,
        h_base_compressed: PEDERSEN_H_POINT.compress(),
        g_base_vec: vec!(*PEDERSEN_G_POINT),
        g_base_compressed_vec: vec!(PEDERSEN_G_POINT.compress()),
        extension_degree: EXTENSION_DEGREE
    };

    let max_agg_factor = (MAX_AGGREGATION_SIZE as f64).log2() as usize;
    let mut result: Vec<RangeParameters<RistrettoPoint>> = Vec::new();
    for i in 0 .. max_agg_factor + 1 {
        result.push(RangeParameters::init(
            BIT_RANGE,
            2usize.pow(i as u32),
            pedersen_gens.clone(),
        ).expect("failed to generate range parameters"));
    }
    return result;
}

///A single proven value: the commitment that travels on the wire,
///and the blinding factor the prover keeps.
#[derive(Debug, Clone)]
pub struct ValueCommitment {
    pub value: Commitment,
    pub blinding: Scalar
}

///An aggregated rangeproof over a batch of output amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeProof(
    BulletPlusProof<RistrettoPoint>

); impl RangeProof {
    ///Prove that every amount is within range.
    ///
    ///Blinding factors are sampled here; the returned `ValueCommitment`s
    ///carry both the commitments and their masks.
    pub fn prove(values: &[u64]) -> Result<(Vec<ValueCommitment>, Self), RangeProofError> {

        //wrapped so we don't have to deal with BulletPlusError
        fn inner(values: &[u64], blindings: Vec<Scalar>
        ) -> Result<(Vec<ValueCommitment>, RangeProof), BulletPlusError> {

            let mut commitment_openings: Vec<CommitmentOpening> = Vec::new();
            let mut commitments: Vec<ValueCommitment> = Vec::new();
            for (value, blinding) in zip(values, blindings) {
                commitment_openings.push(
                    CommitmentOpening::new(*value, vec!(blinding))
                );
                commitments.push(ValueCommitment{
                    value: Commitment::commit_value(*value, &blinding),
                    blinding
                });
            }

            //power = closest value of log_2( commitments.len() ), rounded up
            let power = (commitments.len() as f64).log2().ceil();
            //n = closest power of 2, rounded up
            let n = 1 << (power as u32);
            //pad_len = distance to closest power of 2, rounded up
            let pad_len = n - commitments.len();
            //commitments must be padded to the next power of 2
            let padded_openings = [
                vec![ZERO_COMMITMENT_OPENING.clone(); pad_len], commitment_openings
            ].concat();
            let padded_commitments = [
                vec![*ZERO_COMMITMENT; pad_len],
                commitments.iter().map(|com| com.value).collect()
            ].concat();
            let padded_commitments = padded_commitments.into_iter()
                .map(|com| com.0).collect();

            let witness = RangeWitness::init(padded_openings)?;

            let none_vec = vec![None; n];
            let statement = RangeStatement::init(
                RANGE_PARAMETERS[power as usize].to_owned(), padded_commitments, none_vec, None
            )?;

            let proof = BulletPlusProof::prove(
                TRANSCRIPT_LABEL, &statement, &witness
            )?;

            return Ok((commitments, RangeProof(proof)))
        }

        if values.is_empty() {
            return Err(RangeProofError::Malformed)
        }
        if values.len() > MAX_AGGREGATION_SIZE {
            return Err(RangeProofError::TooLargeAggregationSize)
        }

        let blindings: Vec<Scalar> = values.iter().map(|_| random_scalar()).collect();
        return match inner(values, blindings) {
            Ok(proof) => Ok(proof),
            Err(_) => Err(
                RangeProofError::Unspecified("failed to create rangeproof".to_string())
            )
        }
    }

    ///Verify a rangeproof against its commitments.
    pub fn verify(&self, commitments: &[Commitment]) -> Result<(), RangeProofError> {

        //wrapped so we don't have to deal with BulletPlusError
        fn inner(proof: &RangeProof, commitments: &[Commitment]) -> Result<(), BulletPlusError> {
            let power = (commitments.len() as f64).log2().ceil();
            let n = 1 << (power as u32);
            let pad_len = n - commitments.len();

            //commitments must be padded to the next power of 2
            let padded_commitments: Vec<RistrettoPoint> = [
                vec![*ZERO_COMMITMENT; pad_len], commitments.to_vec()
            ].concat().into_iter().map(|com| com.0).collect();

            let none_vec = vec![None; n];
            let statement = RangeStatement::init(
                RANGE_PARAMETERS[power as usize].to_owned(), padded_commitments, none_vec, None
            )?;

            BulletPlusProof::verify_batch(
                TRANSCRIPT_LABEL, &[statement], &[proof.0.to_owned()], VerifyAction::VerifyOnly
            )?;
            return Ok(())
        }

        if commitments.is_empty() {
            return Err(RangeProofError::Malformed)
        }
        if commitments.len() > MAX_AGGREGATION_SIZE {
            return Err(RangeProofError::TooLargeAggregationSize)
        }

        return match inner(self, commitments) {
            Ok(_) => Ok(()),
            Err(e) => match e {
                BulletPlusError::VerificationFailed(_) => Err(RangeProofError::Invalid),
                _ => Err(RangeProofError::Unspecified("failed to verify rangeproof".to_string()))
            }
        }
    }

} impl ToBytes<'_> for RangeProof {
    //BulletPlusProof has its own encoding system so we don't need bincode
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        return Ok(self.0.to_bytes());
    }
    fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        return match BulletPlusProof::from_bytes(bytes) {
            Ok(proof) => Ok(Self(proof)),
            Err(_) => Err(SerializationError::DecodingError)
        };
    }
}
