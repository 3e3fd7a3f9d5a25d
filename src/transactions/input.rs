/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use zeroize::Zeroize;

use crate::internal_common::*;
use crate::mlsag::{calculate_key_image, DualKey, PubKeys, Signature};

///An input of a transaction: a spend of one previously received output,
///hidden inside a ring of decoys.
#[derive(Debug, Clone)]
pub struct Input {
    //prover-side state, never on the wire
    pub(crate) amount: u64,
    pub(crate) mask: Scalar,
    priv_key: Scalar,
    pub(crate) pseudo_mask: Scalar,
    pub(crate) proof: DualKey,

    ///One-time destination key of the output being spent
    pub pub_key: RistrettoPoint,
    ///Key image of the one-time key; the double-spend fingerprint
    pub key_image: RistrettoPoint,
    ///Global positions of every ring member, real and decoy
    pub offsets: Vec<Vec<u8>>,
    ///Commitment to the same amount under a fresh blinder,
    ///chosen so the whole transaction balances
    pub pseudo_commitment: Commitment,
    pub signature: Option<Signature>

} impl Input {
    ///Create an input from the private data of an owned, unlocked output.
    pub fn new(amount: u64, mask: Scalar, priv_key: Scalar) -> Self {
        let pub_key = &priv_key * G;
        let key_image = calculate_key_image(&priv_key, &pub_key);

        return Self{
            amount,
            mask,
            priv_key,
            pseudo_mask: Scalar::zero(),
            proof: DualKey::new(),
            pub_key,
            key_image,
            offsets: Vec::new(),
            pseudo_commitment: Commitment(RistrettoPoint::identity()),
            signature: None
        }
    }

    pub fn amount(&self) -> u64 {
        return self.amount
    }

    pub(crate) fn mask(&self) -> &Scalar {
        return &self.mask
    }

    pub(crate) fn private_key(&self) -> &Scalar {
        return &self.priv_key
    }

    ///Append fetched decoys (as two-slot key vectors) and their offsets
    ///to this input's ring.
    pub(crate) fn add_decoys(&mut self, offsets: Vec<Vec<u8>>, keys: Vec<PubKeys>) {
        self.offsets.extend(offsets);
        self.proof.add_decoys(keys);
    }

    pub(crate) fn set_pseudo_commitment(&mut self, commitment: Commitment, pseudo_mask: Scalar) {
        self.pseudo_commitment = commitment;
        self.pseudo_mask = pseudo_mask;
    }

    ///Prove ownership and balance of this input over `msg`.
    pub(crate) fn prove(&mut self, msg: &[u8]) -> Result<(), SignatureError> {
        let (signature, key_image) = self.proof.prove(msg)?;

        //the ring signature's key image must be the one we derived
        //directly from the one-time key
        if key_image != self.key_image {
            return Err(SignatureError::Unspecified(
                "signature key image does not match the input".to_string()))
        }

        self.signature = Some(signature);
        return Ok(())
    }

    ///Verify this input's ring signature over `msg`.
    pub fn verify(&self, msg: &[u8]) -> Result<(), SignatureError> {
        let signature = match &self.signature {
            Some(signature) => signature,
            None => return Err(SignatureError::Malformed)
        };

        if signature.key_images.len() != 1 || signature.key_images[0] != self.key_image {
            return Err(SignatureError::Malformed)
        }

        return signature.verify(msg)
    }

    ///Encode the fields that the transaction hash binds.
    ///The signature itself is excluded: it signs this very hash.
    pub(crate) fn encode_hashable<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        write_point(w, &self.key_image)?;
        write_u64_le(w, self.offsets.len() as u64)?;
        for offset in &self.offsets {
            write_var_bytes(w, offset)?;
        }
        return write_point(w, &self.pseudo_commitment.0)
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.encode_hashable(w)?;

        let signature = match &self.signature {
            Some(signature) => signature.to_bytes()?,
            None => Vec::new()
        };
        return write_var_bytes(w, &signature)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let key_image = read_point(r)?;

        let n_offsets = read_u64_le(r)?;
        let mut offsets: Vec<Vec<u8>> = Vec::new();
        for _ in 0..n_offsets {
            offsets.push(read_var_bytes(r)?);
        }

        let pseudo_commitment = Commitment(read_point(r)?);

        let signature_bytes = read_var_bytes(r)?;
        let signature = match signature_bytes.is_empty() {
            true => None,
            false => Some(Signature::from_bytes(&signature_bytes)?)
        };

        return Ok(Self{
            amount: 0,
            mask: Scalar::zero(),
            priv_key: Scalar::zero(),
            pseudo_mask: Scalar::zero(),
            proof: DualKey::new(),
            pub_key: RistrettoPoint::identity(),
            key_image,
            offsets,
            pseudo_commitment,
            signature
        })
    }

} impl Drop for Input {
    fn drop(&mut self) {
        self.priv_key.zeroize();
        self.mask.zeroize();
        self.pseudo_mask.zeroize();
    }
}
