/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use bls12_381::{G2Affine, G2Projective};
use sha3::{Digest, Sha3_512};

use crate::errors::WalletError;

///The wallet's consensus keypair: a BLS secret and its compressed
///G2 public key, as carried by stake transactions.
#[derive(Debug, Clone)]
pub struct ConsensusKeys {
    pub bls_secret: bls12_381::Scalar,
    pub bls_public: Vec<u8>

} impl ConsensusKeys {
    ///Derive consensus keys from a wallet seed.
    ///
    ///BLS key generation needs more entropy than the seed itself carries,
    ///so the seed hash is doubled:
    ///`extended = SHA3-512(seed) || SHA3-512(SHA3-512(seed))`.
    ///A zero secret is rejected; the caller retries with a fresh seed.
    pub fn generate(seed: &[u8]) -> Result<Self, WalletError> {
        let seed_hash = Sha3_512::digest(seed);
        let second_hash = Sha3_512::digest(seed_hash.as_slice());
        let extended = [seed_hash.as_slice(), second_hash.as_slice()].concat();

        let wide: [u8; 64] = extended[0..64].try_into()
            .expect("Wrong digest length");
        let bls_secret = bls12_381::Scalar::from_bytes_wide(&wide);

        if bls_secret == bls12_381::Scalar::zero() {
            return Err(WalletError::ConsensusKeys)
        }

        let bls_public = G2Affine::from(G2Projective::generator() * bls_secret)
            .to_compressed()
            .to_vec();

        return Ok(Self{ bls_secret, bls_public })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ConsensusKeys::generate(&[1u8; 64]).unwrap();
        let b = ConsensusKeys::generate(&[1u8; 64]).unwrap();
        assert_eq!(a.bls_public, b.bls_public);
        assert_eq!(a.bls_public.len(), 96);

        let c = ConsensusKeys::generate(&[2u8; 64]).unwrap();
        assert_ne!(a.bls_public, c.bls_public);
    }
}
