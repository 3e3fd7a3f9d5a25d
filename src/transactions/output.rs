/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{Read, Write};

use crate::internal_common::*;
use crate::keys::{shared_scalar, PublicKey, StealthAddress};

///An output of a transaction.
#[derive(Debug, Clone)]
pub struct Output {
    //prover-side state, never on the wire
    pub(crate) amount: u64,
    pub(crate) mask: Scalar,
    pub(crate) pub_view: RistrettoPoint,

    ///Pedersen commitment to the amount
    pub commitment: Commitment,
    ///One-time destination key of the receiver
    pub dest: StealthAddress,
    ///Position of this output within its transaction.
    ///Not to be confused with the global offset, which counts from block zero.
    pub index: u32,
    pub encrypted_amount: Scalar,
    pub encrypted_mask: Scalar

} impl Output {
    ///Create an output of `amount` to `pub_key`, with its one-time
    ///destination key derived from the transaction nonce `r` and `index`.
    pub fn new(r: &Scalar, amount: u64, index: u32, pub_key: &PublicKey) -> Self {
        return Self{
            amount,
            mask: Scalar::zero(),
            pub_view: pub_key.view,
            commitment: Commitment(RistrettoPoint::identity()),
            dest: pub_key.stealth_address(r, index),
            index,
            encrypted_amount: Scalar::zero(),
            encrypted_mask: Scalar::zero()
        }
    }

    pub fn amount(&self) -> u64 {
        return self.amount
    }

    pub(crate) fn set_commitment(&mut self, commitment: Commitment) {
        self.commitment = commitment;
    }

    pub(crate) fn set_mask(&mut self, mask: Scalar) {
        self.mask = mask;
    }

    ///Fill the value fields with their encrypted forms.
    pub(crate) fn conceal_values(&mut self, r: &Scalar) {
        self.encrypted_amount = encrypt_amount(&Scalar::from(self.amount), r, self.index, &self.pub_view);
        self.encrypted_mask = encrypt_mask(&self.mask, r, self.index, &self.pub_view);
    }

    ///Fill the value fields with plaintext scalars.
    ///Used by transaction types whose amounts are public.
    pub(crate) fn reveal_values(&mut self) {
        self.encrypted_amount = Scalar::from(self.amount);
        self.encrypted_mask = self.mask;
    }

    ///Fix this output to a public `amount` with a zero blinding factor.
    ///Coinbase rewards are committed this way.
    pub(crate) fn set_plain_value(&mut self) {
        self.mask = Scalar::zero();
        self.commitment = Commitment::commit_value(self.amount, &Scalar::zero());
        self.reveal_values();
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        write_u32_le(w, self.index)?;
        write_point(w, &self.commitment.0)?;
        write_point(w, &self.dest.0)?;
        write_scalar(w, &self.encrypted_amount)?;
        return write_scalar(w, &self.encrypted_mask)
    }

    pub fn decode<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let index = read_u32_le(r)?;
        let commitment = Commitment(read_point(r)?);
        let dest = StealthAddress(read_point(r)?);
        let encrypted_amount = read_scalar(r)?;
        let encrypted_mask = read_scalar(r)?;

        return Ok(Self{
            amount: 0,
            mask: Scalar::zero(),
            pub_view: RistrettoPoint::identity(),
            commitment,
            dest,
            index,
            encrypted_amount,
            encrypted_mask
        })
    }
}

///derive the value-encryption key: `H_s^depth(shared_point || index_be32)`
fn value_key(shared: &RistrettoPoint, index: u32, depth: u32) -> Scalar {
    let mut key = shared_scalar(shared, index);
    for _ in 1..depth {
        key = derive_scalar(&key.to_bytes());
    }
    return key
}

///`enc_amount = amount + H_s(H_s(H_s(r * PubView || index)))`
pub fn encrypt_amount(amount: &Scalar, r: &Scalar, index: u32, pub_view: &RistrettoPoint) -> Scalar {
    return amount + value_key(&(r * pub_view), index, 3)
}

///Recover an amount using the private view key and the transaction nonce `R`.
pub fn decrypt_amount(encrypted_amount: &Scalar, big_r: &RistrettoPoint, index: u32, priv_view: &Scalar) -> Scalar {
    return encrypted_amount - value_key(&(priv_view * big_r), index, 3)
}

///`enc_mask = mask + H_s(H_s(r * PubView || index))`
///
///The mask key is the double hash and the amount key the triple hash;
///the two must never collapse into one.
pub fn encrypt_mask(mask: &Scalar, r: &Scalar, index: u32, pub_view: &RistrettoPoint) -> Scalar {
    return mask + value_key(&(r * pub_view), index, 2)
}

///Recover a blinding mask using the private view key and the transaction nonce `R`.
pub fn decrypt_mask(encrypted_mask: &Scalar, big_r: &RistrettoPoint, index: u32, priv_view: &Scalar) -> Scalar {
    return encrypted_mask - value_key(&(priv_view * big_r), index, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    #[test]
    fn encryption_roundtrip() {
        let pair = KeyPair::new(&[3u8; 64]).unwrap();
        let public = pair.public_key();

        let r = random_scalar();
        let big_r = &r * G;

        let amount = Scalar::from(123_456u64);
        let mask = random_scalar();

        for index in [0u32, 1, 9] {
            let enc_amount = encrypt_amount(&amount, &r, index, &public.view);
            let enc_mask = encrypt_mask(&mask, &r, index, &public.view);

            assert_ne!(enc_amount, amount);
            assert_ne!(enc_mask, mask);

            assert_eq!(decrypt_amount(&enc_amount, &big_r, index, pair.private_view()), amount);
            assert_eq!(decrypt_mask(&enc_mask, &big_r, index, pair.private_view()), mask);
        }
    }

    #[test]
    fn amount_and_mask_keys_differ() {
        let pair = KeyPair::new(&[4u8; 64]).unwrap();
        let public = pair.public_key();
        let r = random_scalar();

        let zero = Scalar::zero();
        assert_ne!(
            encrypt_amount(&zero, &r, 0, &public.view),
            encrypt_mask(&zero, &r, 0, &public.view)
        );
    }

    #[test]
    fn wire_roundtrip() {
        let pair = KeyPair::new(&[5u8; 64]).unwrap();
        let r = random_scalar();

        let mut output = Output::new(&r, 50, 2, &pair.public_key());
        output.set_mask(random_scalar());
        output.set_commitment(Commitment::commit_value(50, &output.mask));
        output.conceal_values(&r);

        let mut buf: Vec<u8> = Vec::new();
        output.encode(&mut buf).unwrap();

        let decoded = Output::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.index, output.index);
        assert_eq!(decoded.commitment, output.commitment);
        assert_eq!(decoded.dest, output.dest);
        assert_eq!(decoded.encrypted_amount, output.encrypted_amount);
        assert_eq!(decoded.encrypted_mask, output.encrypted_mask);
    }
}
