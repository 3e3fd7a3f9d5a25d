/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use zeroize::Zeroize;

use crate::internal_common::*;
use super::{Proof, PubKeys, Signature};

///A two-slot MLSAG where the second key is a commitment to zero.
///
///Slot 0 holds the one-time key of the output being spent; slot 1 holds
///the difference between the input's pseudo-commitment blinder and its
///real blinder. Only the slot-0 key image is published: the commitment
///slot needs no linkability, so its challenge leg is base-point only.
#[derive(Debug, Clone)]
pub struct DualKey {
    proof: Proof,
    primary_key: Scalar,
    comm_to_zero: Scalar,

} impl DualKey {
    pub fn new() -> Self {
        return Self{
            proof: Proof::new(),
            primary_key: Scalar::zero(),
            comm_to_zero: Scalar::zero()
        }
    }

    ///Set the one-time private key of the output being spent.
    pub fn set_primary_key(&mut self, key: Scalar) {
        self.primary_key = key;
    }

    ///Set the commitment-to-zero witness: `pseudo_mask - real_mask`.
    pub fn set_comm_to_zero(&mut self, key: Scalar) {
        self.comm_to_zero = key;
    }

    ///Add a decoy `(destination key, commitment)` pair to the ring.
    pub fn add_decoy(&mut self, keys: PubKeys) {
        self.proof.add_decoy(keys);
    }

    ///Add multiple decoy pairs to the ring.
    pub fn add_decoys(&mut self, keys: Vec<PubKeys>) {
        self.proof.add_decoys(keys);
    }

    ///Number of ring members added so far (the witness row is added at prove time).
    pub fn ring_size(&self) -> usize {
        return self.proof.ring_size()
    }

    ///Subtract the input's pseudo-commitment from the commitment slot of
    ///every decoy row.
    ///
    ///The witness row is added at prove time with slot-1 public key
    ///`(b' - b) * G`, which is exactly `C' - C` for the real output,
    ///so the shifted ring binds the input's balance to the signature.
    pub fn sub_comm_to_zero(&mut self, pseudo_commitment: &RistrettoPoint) {
        for row in self.proof.decoy_rows_mut() {
            if let Some(slot) = row.keys.get_mut(1) {
                *slot = *slot - pseudo_commitment;
            }
        }
    }

    ///Sign `msg`, returning the signature and the single (slot-0) key image.
    pub fn prove(&mut self, msg: &[u8]) -> Result<(Signature, RistrettoPoint), SignatureError> {
        if self.primary_key == Scalar::zero() || self.comm_to_zero == Scalar::zero() {
            return Err(SignatureError::ZeroWitness)
        }
        if self.proof.has_secret() {
            //a previous prove attempt already planted the witness row
            return Err(SignatureError::Malformed)
        }

        self.proof.add_secret(vec!(self.primary_key, self.comm_to_zero))?;

        let signature = self.proof.prove_internal(msg, true)?;
        if signature.key_images.len() != 1 {
            return Err(SignatureError::Unspecified(
                "dual key mlsag must contain exactly one key image".to_string()))
        }

        let key_image = signature.key_images[0];
        return Ok((signature, key_image))
    }

} impl Drop for DualKey {
    fn drop(&mut self) {
        self.primary_key.zeroize();
        self.comm_to_zero.zeroize();
    }
}
