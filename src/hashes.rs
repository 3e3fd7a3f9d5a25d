/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use blake2::{
    Blake2b,
    Digest,
    digest::consts::{U32, U64}
};
use crate::curve::*;

type Blake2b256 = Blake2b<U32>;
type Blake2b512 = Blake2b<U64>;

///Hash bytes to bytes, domain separated.
///You most likely won't need this, see `derive_bytes` instead.
pub fn domain_derive_bytes(msg: &[u8], domain: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::default();
    hasher.update([msg, domain].concat());
    return hasher.finalize().as_slice().try_into()
        .expect("Wrong digest length");
}

///Hash bytes to elliptic curve point, domain separated.
///You most likely won't need this, see `derive_point` instead.
pub fn domain_derive_point(msg: &[u8], domain: &[u8]) -> RistrettoPoint {
    let mut hasher = Blake2b512::default();
    hasher.update([msg, domain].concat());
    return RistrettoPoint::from_uniform_bytes(
        hasher.finalize().as_slice().try_into()
        .expect("Wrong digest length")
    );
}

///Hash bytes to scalar, domain separated.
///You most likely won't need this, see `derive_scalar` instead.
pub fn domain_derive_scalar(msg: &[u8], domain: &[u8]) -> Scalar {
    return Scalar::from_bytes_mod_order(
        domain_derive_bytes(msg, domain));
}

///Hash bytes to bytes.
pub fn derive_bytes(msg: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::default();
    hasher.update(msg);
    return hasher.finalize().as_slice().try_into()
        .expect("Wrong digest length");
}

///Hash bytes to elliptic curve point.
pub fn derive_point(msg: &[u8]) -> RistrettoPoint {
    let mut hasher = Blake2b512::default();
    hasher.update(msg);
    return RistrettoPoint::from_uniform_bytes(
        hasher.finalize().as_slice().try_into()
        .expect("Wrong digest length")
    );
}

///Hash bytes to scalar.
pub fn derive_scalar(msg: &[u8]) -> Scalar {
    let mut hasher = Blake2b512::default();
    hasher.update(msg);
    return Scalar::from_bytes_mod_order_wide(
        hasher.finalize().as_slice().try_into()
        .expect("Wrong digest length")
    );
}

pub mod domains {
    //! Pre-defined hash domains

    pub const SIGNATURE_KEY_IMAGE: &[u8] =  "key_img".as_bytes();
}
