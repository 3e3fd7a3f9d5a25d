/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!Multilayered Linkable Spontaneous Anonymous Group (MLSAG) signatures.
//!
//!A signature is produced over a ring of public-key *vectors*: `n` ring
//!members, each holding `k` keys. The signer knows the private keys of one
//!column and proves that knowledge without revealing which column it is.
//!Key images make two signatures by the same witness linkable.

mod dualkey;
pub use dualkey::DualKey;

use rand::{thread_rng, seq::SliceRandom};
use zeroize::Zeroize;

use crate::internal_common::*;

///A vector of public keys belonging to one ring member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PubKeys {
    //Set to true if this key vector is a decoy
    pub(crate) decoy: bool,
    pub keys: Vec<RistrettoPoint>

} impl PubKeys {
    ///Creates a new, empty key vector.
    pub fn new() -> Self {
        return Self{ decoy: false, keys: Vec::new() }
    }

    ///Appends a public key to the vector.
    pub fn push(&mut self, key: RistrettoPoint) {
        self.keys.push(key);
    }

    pub fn len(&self) -> usize {
        return self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        return self.keys.is_empty()
    }
}

///hash to point, specific for key images
pub(crate) fn key_image_point(encoded_pub: &[u8]) -> RistrettoPoint {
    return domain_derive_point(encoded_pub, domains::SIGNATURE_KEY_IMAGE);
}

///Given a private key and its public key, return the key image:
///`x * derive_point(x * G)`.
///
///The key image is deterministic from the private key alone,
///which is what makes double-spends detectable regardless of ring choice.
pub fn calculate_key_image(private_key: &Scalar, public_key: &RistrettoPoint) -> RistrettoPoint {
    return private_key * key_image_point(&encode_point(public_key))
}

///An unproven ring: decoy key vectors plus exactly one witness column.
#[derive(Debug, Clone)]
pub struct Proof {
    //private keys corresponding to one column in the matrix
    priv_keys: Vec<Scalar>,

    //all pubkey vectors, including the decoys.
    //there exists an index s such that pub_keys_matrix[s][j] == priv_keys[j] * G
    pub_keys_matrix: Vec<PubKeys>,

} impl Proof {
    pub fn new() -> Self {
        return Self{
            priv_keys: Vec::new(),
            pub_keys_matrix: Vec::new()
        }
    }

    fn add_pub_keys(&mut self, keys: PubKeys) {
        self.pub_keys_matrix.push(keys);
    }

    ///Add a decoy key vector to the ring.
    pub fn add_decoy(&mut self, mut keys: PubKeys) {
        keys.decoy = true;
        self.add_pub_keys(keys);
    }

    ///Add multiple decoy key vectors to the ring.
    pub fn add_decoys(&mut self, keys: Vec<PubKeys>) {
        for key in keys {
            self.add_decoy(key);
        }
    }

    ///Add the witness column. Its public keys are derived from the
    ///private keys, so the witness row is indistinguishable from a decoy.
    ///
    ///Only one witness column may be added.
    pub fn add_secret(&mut self, priv_keys: Vec<Scalar>) -> Result<(), SignatureError> {
        if !self.priv_keys.is_empty() {
            return Err(SignatureError::Malformed)
        }
        if priv_keys.is_empty() {
            return Err(SignatureError::MissingWitness)
        }

        let mut pub_keys = PubKeys::new();
        for key in &priv_keys {
            pub_keys.push(key * G);
        }

        self.add_pub_keys(pub_keys);
        self.priv_keys = priv_keys;
        return Ok(())
    }

    ///Number of ring members currently in the proof.
    pub fn ring_size(&self) -> usize {
        return self.pub_keys_matrix.len()
    }

    pub(crate) fn has_secret(&self) -> bool {
        return !self.priv_keys.is_empty()
    }

    ///Mutable access to the decoy rows, for commitment shifting.
    pub(crate) fn decoy_rows_mut(&mut self) -> impl Iterator<Item = &mut PubKeys> + '_ {
        return self.pub_keys_matrix.iter_mut().filter(|row| row.decoy)
    }

    ///Shuffle the ring so the witness position is unbiased,
    ///then return the secret index.
    fn shuffle_set(&mut self) -> Result<usize, SignatureError> {
        self.pub_keys_matrix.shuffle(&mut thread_rng());

        return match self.pub_keys_matrix.iter().position(|row| !row.decoy) {
            Some(index) => Ok(index),
            None => Err(SignatureError::MissingWitness)
        }
    }

    ///Sign `msg` with every key image published.
    pub fn prove(&mut self, msg: &[u8]) -> Result<Signature, SignatureError> {
        return self.prove_internal(msg, false)
    }

    ///Internal signing function.
    ///
    ///With `skip_last_key_image`, the final key slot contributes only its
    ///base-point leg to the challenges and publishes no key image. This is
    ///how the dual-key form avoids a key image for the commitment to zero.
    pub(crate) fn prove_internal(
        &mut self, msg: &[u8], skip_last_key_image: bool
    ) -> Result<Signature, SignatureError> {
        let n = self.pub_keys_matrix.len();
        let k = self.priv_keys.len();

        if k == 0 {
            return Err(SignatureError::MissingWitness)
        }
        if n < 2 {
            return Err(SignatureError::Malformed)
        }
        if self.pub_keys_matrix.iter().any(|row| row.len() != k) {
            return Err(SignatureError::Malformed)
        }
        if skip_last_key_image && k < 2 {
            return Err(SignatureError::Malformed)
        }

        //shuffle the ring, then find our position in it
        let s = self.shuffle_set()?;
        let signers_pub_keys = self.pub_keys_matrix[s].keys.clone();

        //number of slots which carry a key image
        let linkable = match skip_last_key_image {
            true => k - 1,
            false => k
        };

        let key_images: Vec<RistrettoPoint> = (0..linkable)
            .map(|j| self.priv_keys[j] * key_image_point(&encode_point(&signers_pub_keys[j])))
            .collect();

        //nonces for the secret row
        let mut nonces: Vec<Scalar> = (0..k).map(|_| random_scalar()).collect();

        //c_{s+1} = H(msg || { a_j*G , a_j*Hp(P_j) }_j)
        let mut buf: Vec<u8> = msg.to_vec();
        for j in 0..k {
            buf.extend_from_slice(&encode_point(&(&nonces[j] * G)));
            if j < linkable {
                let hp = key_image_point(&encode_point(&signers_pub_keys[j]));
                buf.extend_from_slice(&encode_point(&(nonces[j] * hp)));
            }
        }
        let c_next = derive_scalar(&buf);
        buf.zeroize();

        //fake responses everywhere except the secret row
        let mut responses: Vec<Vec<Scalar>> = (0..n)
            .map(|i| match i == s {
                true => vec![Scalar::zero(); k],
                false => (0..k).map(|_| random_scalar()).collect()
            })
            .collect();

        //travel around the ring: row i yields challenge i+1
        let mut challenges: Vec<Scalar> = vec![Scalar::zero(); n];
        challenges[(s + 1) % n] = c_next;

        let mut i = (s + 1) % n;
        while i != s {
            let next = (i + 1) % n;
            let challenge = generate_challenge(
                msg,
                &responses[i],
                &key_images,
                &self.pub_keys_matrix[i].keys,
                &challenges[i]
            );
            challenges[next] = challenge;
            i = next;
        }

        //close the loop with the real responses: r_j = a_j - c_s * x_j
        for j in 0..k {
            responses[s][j] = nonces[j] - (challenges[s] * self.priv_keys[j]);
        }
        nonces.zeroize();

        return Ok(Signature{
            c: challenges[0],
            responses,
            pub_keys: self.pub_keys_matrix.iter().map(|row| row.keys.clone()).collect(),
            key_images
        })
    }
}

///compute the next ring challenge from one member's row
fn generate_challenge(
    msg: &[u8],
    responses: &[Scalar],
    key_images: &[RistrettoPoint],
    pub_keys: &[RistrettoPoint],
    prev_challenge: &Scalar
) -> Scalar {
    let mut buf: Vec<u8> = msg.to_vec();

    for j in 0..pub_keys.len() {
        //left = r_j * G + c * P_j
        let left = G_MULTISCALAR_MUL.vartime_mixed_multiscalar_mul(
            vec!(responses[j]), vec!(*prev_challenge), vec!(pub_keys[j])
        );
        buf.extend_from_slice(&encode_point(&left));

        if j < key_images.len() {
            //right = r_j * Hp(P_j) + c * KI_j
            let hp = key_image_point(&encode_point(&pub_keys[j]));
            let right = RistrettoPoint::vartime_multiscalar_mul(
                vec!(responses[j], *prev_challenge), vec!(hp, key_images[j])
            );
            buf.extend_from_slice(&encode_point(&right));
        }
    }

    return derive_scalar(&buf)
}

///A proven MLSAG ring signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    //the first ring challenge; verification recomputes the rest
    c: Scalar,
    //responses[ring_member][key_slot]
    responses: Vec<Vec<Scalar>>,
    ///The full ring, including the witness row at its hidden position.
    pub pub_keys: Vec<Vec<RistrettoPoint>>,
    ///One key image per linkable key slot.
    pub key_images: Vec<RistrettoPoint>,

} impl Signature {
    ///Check this signature over `msg`.
    ///
    ///Returns `Ok(())` if valid, `SignatureError::Invalid` if the challenge
    ///ring does not close, or `SignatureError::Malformed` for dimension errors.
    pub fn verify(&self, msg: &[u8]) -> Result<(), SignatureError> {
        let n = self.pub_keys.len();
        if n < 1 || self.responses.len() != n {
            return Err(SignatureError::Malformed)
        }

        let k = self.pub_keys[0].len();
        if k < 1 {
            return Err(SignatureError::Malformed)
        }
        if self.pub_keys.iter().any(|row| row.len() != k) {
            return Err(SignatureError::Malformed)
        }
        if self.responses.iter().any(|row| row.len() != k) {
            return Err(SignatureError::Malformed)
        }

        //either every slot is linkable, or the last slot goes without
        //a key image (the dual-key commitment-to-zero form)
        let linkable = self.key_images.len();
        if linkable != k && !(k >= 2 && linkable == k - 1) {
            return Err(SignatureError::Malformed)
        }

        let mut challenge = self.c;
        for i in 0..n {
            challenge = generate_challenge(
                msg,
                &self.responses[i],
                &self.key_images,
                &self.pub_keys[i],
                &challenge
            );
        }

        //check if we end up back where we started
        return match challenge == self.c {
            true => Ok(()),
            false => Err(SignatureError::Invalid)
        }
    }

} impl ToBytes<'_> for Signature {}
