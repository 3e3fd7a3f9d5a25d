/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Wallet keys and stealth addresses.
//!
//! A wallet holds a spend/view scalar pair derived deterministically from
//! a seed. Senders derive a fresh one-time destination key per output;
//! only the view key holder can recognize it and only the spend key holder
//! can sign for it.

use sha3::{Digest, Sha3_256};
use zeroize::Zeroize;

use crate::internal_common::*;

const CHECKSUM_LEN: usize = 4;

///The private spend/view key pair of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Zeroize)]
pub struct KeyPair {
    priv_spend: Scalar,
    priv_view: Scalar

} impl KeyPair {
    ///Deterministically derive a key pair from a seed of at least 32 bytes.
    ///The same seed always yields bit-identical keys.
    pub fn new(seed: &[u8]) -> Result<Self, KeyError> {
        if seed.len() < 32 {
            return Err(KeyError::SeedTooShort)
        }

        let priv_spend = derive_scalar(seed);
        let priv_view = derive_scalar(&priv_spend.to_bytes());

        return Ok(Self{ priv_spend, priv_view })
    }

    pub fn private_spend(&self) -> &Scalar {
        return &self.priv_spend
    }

    pub fn private_view(&self) -> &Scalar {
        return &self.priv_view
    }

    ///Convert this key pair into its public half.
    pub fn public_key(&self) -> PublicKey {
        return PublicKey{
            spend: &self.priv_spend * G,
            view: &self.priv_view * G
        }
    }

    ///Check whether an output addressed to `dest` at position `index` of a
    ///transaction with public nonce `R` belongs to this wallet.
    ///
    ///Returns the one-time private key if it does: the key whose public
    ///image is exactly `dest`, usable to sign a spend of that output.
    pub fn did_receive_tx(&self, big_r: &RistrettoPoint, dest: &StealthAddress, index: u32) -> Option<Scalar> {
        let f = shared_scalar(&(self.priv_view * big_r), index);

        if dest.0 - (&f * G) != self.public_key().spend {
            return None
        }

        return Some(f + self.priv_spend)
    }

} impl Drop for KeyPair {
    fn drop(&mut self) {
        self.zeroize()
    }

} impl ToBytes<'_> for KeyPair {}

///The public spend/view keys of a wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKey {
    pub spend: RistrettoPoint,
    pub view: RistrettoPoint

} impl PublicKey {
    ///Derive the one-time destination key for output `index` of a
    ///transaction using nonce `r`:
    ///`P = H_s(r * view || index) * G + spend`.
    pub fn stealth_address(&self, r: &Scalar, index: u32) -> StealthAddress {
        let f = shared_scalar(&(r * self.view), index);
        return StealthAddress((&f * G) + self.spend)
    }

    ///Render this key as a checksummed base58 address for `net_prefix`.
    pub fn public_address(&self, net_prefix: u8) -> PublicAddress {
        let mut payload = vec![net_prefix];
        payload.extend_from_slice(&encode_point(&self.spend));
        payload.extend_from_slice(&encode_point(&self.view));

        let checksum = address_checksum(&payload);
        payload.extend_from_slice(&checksum);

        return PublicAddress(bs58::encode(payload).into_string())
    }

} impl ToBytes<'_> for PublicKey {}

///A checksummed base58 rendering of a `PublicKey`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicAddress(
    String

); impl PublicAddress {
    pub fn from_string(s: String) -> Self {
        return Self(s)
    }

    pub fn as_str(&self) -> &str {
        return &self.0
    }

    ///Decode back into a `PublicKey`, verifying length, checksum, and
    ///the expected network prefix.
    pub fn to_key(&self, net_prefix: u8) -> Result<PublicKey, KeyError> {
        let payload = bs58::decode(&self.0).into_vec()
            .map_err(|_| KeyError::MalformedAddress)?;

        if payload.len() != 1 + 64 + CHECKSUM_LEN {
            return Err(KeyError::MalformedAddress)
        }

        let (body, checksum) = payload.split_at(1 + 64);
        if checksum != address_checksum(body) {
            return Err(KeyError::MalformedAddress)
        }
        if body[0] != net_prefix {
            return Err(KeyError::MalformedAddress)
        }

        let spend = RistrettoPoint::from_bytes(&body[1..33])
            .map_err(|_| KeyError::MalformedAddress)?;
        let view = RistrettoPoint::from_bytes(&body[33..65])
            .map_err(|_| KeyError::MalformedAddress)?;

        return Ok(PublicKey{ spend, view })
    }

} impl std::fmt::Display for PublicAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.0)
    }
}

///A one-time destination key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StealthAddress(
    pub RistrettoPoint

); impl StealthAddress {
    pub fn to_point(&self) -> RistrettoPoint {
        return self.0
    }

} impl ToBytes<'_> for StealthAddress {
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        return Ok(encode_point(&self.0).to_vec())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        return Ok(Self(RistrettoPoint::from_bytes(bytes)?))
    }
}

///`H_s(point || index_be32)`: the scalar both sides of a transfer can
///derive, used for stealth keys and as the root of value encryption.
pub(crate) fn shared_scalar(point: &RistrettoPoint, index: u32) -> Scalar {
    let bytes = [&encode_point(point)[..], &index.to_be_bytes()].concat();
    return derive_scalar(&bytes)
}

fn address_checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha3_256::digest(payload);
    return digest[0..CHECKSUM_LEN].try_into()
        .expect("Wrong checksum length")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_from_seed() {
        let seed = b"this is a test seed with enough bytes in it";
        let a = KeyPair::new(seed).unwrap();
        let b = KeyPair::new(seed).unwrap();
        assert_eq!(a, b);

        assert!(matches!(KeyPair::new(b"too short"), Err(KeyError::SeedTooShort)));
    }

    #[test]
    fn detect_roundtrip() {
        let pair = KeyPair::new(&[7u8; 64]).unwrap();
        let public = pair.public_key();

        let r = random_scalar();
        let big_r = &r * G;

        for index in [0u32, 1, 2, 77] {
            let stealth = public.stealth_address(&r, index);
            let one_time = pair.did_receive_tx(&big_r, &stealth, index)
                .expect("output should be ours");

            //the recovered key signs for the destination
            assert_eq!(&one_time * G, stealth.to_point());

            //wrong index is not ours
            assert!(pair.did_receive_tx(&big_r, &stealth, index + 1).is_none());
        }

        //a different wallet does not detect it
        let other = KeyPair::new(&[8u8; 64]).unwrap();
        let stealth = public.stealth_address(&r, 0);
        assert!(other.did_receive_tx(&big_r, &stealth, 0).is_none());
    }

    #[test]
    fn address_roundtrip() {
        let pair = KeyPair::new(&[9u8; 64]).unwrap();
        let public = pair.public_key();

        let addr = public.public_address(1);
        let decoded = addr.to_key(1).unwrap();
        assert_eq!(decoded, public);

        //wrong network prefix
        assert!(addr.to_key(2).is_err());

        //corrupted text
        let mut s = addr.as_str().to_string();
        s.truncate(s.len() - 2);
        assert!(PublicAddress::from_string(s).to_key(1).is_err());
    }
}
