/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use crate::internal_common::*;
use crate::keys::PublicAddress;
use crate::rangeproof::RangeProof;
use super::decoys::{decoys_to_mlsag, Decoys};
use super::input::Input;
use super::output::Output;
use super::{MAX_INPUTS, MAX_OUTPUTS, NUM_MIXINS};

///The shared payload of every transaction type.
///
///A standard transaction hides its senders behind per-input rings, its
///receivers behind one-time keys, and its amounts inside commitments.
#[derive(Debug, Clone)]
pub struct Standard {
    //per-transaction nonce; R = r * G is published
    pub(crate) r: Scalar,
    pub big_r: RistrettoPoint,

    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub fee: u64,

    //monotone output counter
    index: u32,
    net_prefix: u8,

    pub range_proof: Option<RangeProof>,

    total_sent: u64

} impl Standard {
    pub fn new(net_prefix: u8, fee: i64) -> Result<Self, TxError> {
        if fee < 0 {
            return Err(TxError::NegativeFee)
        }

        let r = random_scalar();
        return Ok(Self{
            r,
            big_r: &r * G,
            inputs: Vec::new(),
            outputs: Vec::new(),
            fee: fee as u64,
            index: 0,
            net_prefix,
            range_proof: None,
            total_sent: 0
        })
    }

    ///Sum of all output amounts added so far, excluding the fee.
    pub fn total_sent(&self) -> u64 {
        return self.total_sent
    }

    pub fn add_input(&mut self, input: Input) -> Result<(), TxError> {
        if self.inputs.len() + 1 > MAX_INPUTS {
            return Err(TxError::TooManyInputs)
        }

        self.inputs.push(input);
        return Ok(())
    }

    ///Add an output of `amount` to `pub_addr`.
    ///The one-time destination key is derived at the current output index.
    pub fn add_output(&mut self, pub_addr: &PublicAddress, amount: u64) -> Result<(), TxError> {
        if self.outputs.len() + 1 > MAX_OUTPUTS {
            return Err(TxError::TooManyOutputs)
        }

        let pub_key = pub_addr.to_key(self.net_prefix)?;
        self.outputs.push(Output::new(&self.r, amount, self.index, &pub_key));

        self.index += 1;
        self.total_sent += amount;

        return Ok(())
    }

    ///Prove the rangeproof over every output amount, which also fixes the
    ///output commitments and their blinding masks.
    fn prove_range_proof(&mut self) -> Result<(), TxError> {
        if self.outputs.is_empty() {
            return Ok(())
        }

        let amounts: Vec<u64> = self.outputs.iter().map(|output| output.amount()).collect();
        let (values, proof) = RangeProof::prove(&amounts)?;

        if values.len() != amounts.len() {
            return Err(TxError::RangeProofMismatch)
        }

        for (output, value) in self.outputs.iter_mut().zip(values) {
            output.set_commitment(value.value);
            output.set_mask(value.blinding);
        }

        self.range_proof = Some(proof);
        return Ok(())
    }

    ///Fetch decoys for every input and append them to its ring.
    fn add_decoys<F>(&mut self, fetch_decoys: &mut F) -> Result<(), TxError>
        where F: FnMut(usize) -> Decoys
    {
        for input in &mut self.inputs {
            let decoys = fetch_decoys(NUM_MIXINS);
            let (keys, offsets) = decoys_to_mlsag(&decoys)?;
            input.add_decoys(offsets, keys);
        }
        return Ok(())
    }

    ///Choose pseudo-masks so input and output blinders balance, then set
    ///each input's pseudo-commitment and commitment-to-zero witness.
    fn calculate_comm_to_zero(&mut self) {
        //aggregate mask values of each output's commitment
        let sum_output_masks: Scalar = self.outputs.iter()
            .map(|output| output.mask)
            .sum();

        let n = self.inputs.len();
        let mut sum_pseudo_masks = Scalar::zero();

        for (i, input) in self.inputs.iter_mut().enumerate() {
            //the last blinder is forced so that
            //sum(pseudo masks) == sum(output masks)
            let pseudo_mask = match i == n - 1 {
                true => sum_output_masks - sum_pseudo_masks,
                false => random_scalar()
            };
            sum_pseudo_masks += pseudo_mask;

            let pseudo_commitment = Commitment::commit_value(input.amount(), &pseudo_mask);
            let comm_to_zero = pseudo_mask - input.mask();
            let primary_key = *input.private_key();

            input.proof.set_primary_key(primary_key);
            input.proof.set_comm_to_zero(comm_to_zero);
            input.set_pseudo_commitment(pseudo_commitment, pseudo_mask);
        }
    }

    ///Run the proving pipeline up to (but not including) the ring
    ///signatures, which need the final transaction hash as their message.
    pub(crate) fn prepare_proofs<F>(&mut self, fetch_decoys: &mut F, encrypt_values: bool) -> Result<(), TxError>
        where F: FnMut(usize) -> Decoys
    {
        self.prove_range_proof()?;

        //the value fields can only be filled once the masks exist
        let r = self.r;
        for output in &mut self.outputs {
            match encrypt_values {
                true => output.conceal_values(&r),
                false => output.reveal_values()
            }
        }

        self.add_decoys(fetch_decoys)?;
        self.calculate_comm_to_zero();

        //shift the commitment slot of every ring member by the
        //pseudo-commitment, binding the input's balance to its ring
        for input in &mut self.inputs {
            let pseudo_commitment = input.pseudo_commitment.to_point();
            input.proof.sub_comm_to_zero(&pseudo_commitment);
        }

        return Ok(())
    }

    ///Sign every input over the transaction hash.
    pub(crate) fn sign_inputs(&mut self, msg: &[u8]) -> Result<(), TxError> {
        for input in &mut self.inputs {
            input.prove(msg)?;
        }
        return Ok(())
    }

    ///Encode the fields bound by the transaction hash:
    ///`fee || R || inputs || outputs` with input signatures excluded.
    pub(crate) fn encode_hashable<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        write_scalar_be(w, &Scalar::from(self.fee))?;
        write_point(w, &self.big_r)?;

        write_u32_be(w, self.inputs.len() as u32)?;
        for input in &self.inputs {
            input.encode_hashable(w)?;
        }

        write_u32_be(w, self.outputs.len() as u32)?;
        for output in &self.outputs {
            output.encode(w)?;
        }
        return Ok(())
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        write_scalar_be(w, &Scalar::from(self.fee))?;
        write_point(w, &self.big_r)?;

        write_u32_be(w, self.inputs.len() as u32)?;
        for input in &self.inputs {
            input.encode(w)?;
        }

        write_u32_be(w, self.outputs.len() as u32)?;
        for output in &self.outputs {
            output.encode(w)?;
        }

        let range_proof = match &self.range_proof {
            Some(proof) => proof.to_bytes()?,
            None => Vec::new()
        };
        return write_var_bytes(w, &range_proof)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let fee_scalar = read_scalar_be(r)?;
        //the fee must fit a u64
        if fee_scalar.to_bytes()[8..].iter().any(|byte| *byte != 0) {
            return Err(SerializationError::DecodingError)
        }
        let fee = scalar_to_u64(&fee_scalar);

        let big_r = read_point(r)?;

        let n_inputs = read_u32_be(r)?;
        if n_inputs as usize > MAX_INPUTS {
            return Err(SerializationError::DecodingError)
        }
        let mut inputs: Vec<Input> = Vec::new();
        for _ in 0..n_inputs {
            inputs.push(Input::decode(r)?);
        }

        let n_outputs = read_u32_be(r)?;
        if n_outputs as usize > MAX_OUTPUTS {
            return Err(SerializationError::DecodingError)
        }
        let mut outputs: Vec<Output> = Vec::new();
        for _ in 0..n_outputs {
            outputs.push(Output::decode(r)?);
        }

        let range_proof_bytes = read_var_bytes(r)?;
        let range_proof = match range_proof_bytes.is_empty() {
            true => None,
            false => Some(RangeProof::from_bytes(&range_proof_bytes)?)
        };

        let index = outputs.len() as u32;
        return Ok(Self{
            r: Scalar::zero(),
            big_r,
            inputs,
            outputs,
            fee,
            index,
            net_prefix: 0,
            range_proof,
            total_sent: 0
        })
    }
}
