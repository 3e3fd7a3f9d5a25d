/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!Pedersen commitments

use std::iter::Sum;

use crate::tobytes::*;
use crate::curve::*;
use crate::hashes::*;

lazy_static! {
    pub static ref PEDERSEN_G_POINT: RistrettoPoint = pedersen_g_point();
    pub static ref PEDERSEN_H_POINT: RistrettoPoint = pedersen_h_point();
    pub static ref PEDERSEN_G: RistrettoBasepointTable = pedersen_g_table();
    pub static ref PEDERSEN_H: RistrettoBasepointTable = pedersen_h_table();
}

///get `H`, the blinding base point
fn pedersen_h_point() -> RistrettoPoint {
    return derive_point("blindPoint".as_bytes());
}

///get table of precomputed `H` values
fn pedersen_h_table() -> RistrettoBasepointTable {
    return RistrettoBasepointTable::create(&PEDERSEN_H_POINT);
}

///get `G`
fn pedersen_g_point() -> RistrettoPoint {
    return G_POINT;
}

///get table of precomputed `G` values
fn pedersen_g_table() -> RistrettoBasepointTable {
    return G.to_owned();
}

///A pedersen commitment: `amount * H + blinding * G`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commitment(
    pub RistrettoPoint

); impl Commitment {
    ///create a commitment to `amount` with blinding factor `blinding`
    pub fn commit(amount: &Scalar, blinding: &Scalar) -> Self {
        //(a * H) + (b * G)
        return Self(
            (amount * &*PEDERSEN_H) + (blinding * &*PEDERSEN_G)
        )
    }

    ///create a commitment to a plain `u64` amount
    pub fn commit_value(amount: u64, blinding: &Scalar) -> Self {
        return Self::commit(&Scalar::from(amount), blinding)
    }

    ///Return the elliptic curve point which represents this commitment.
    ///To convert an elliptic curve point back into a commitment, use `Commitment(point)`.
    pub fn to_point(&self) -> RistrettoPoint {
        return self.0;
    }

    ///Given input (pseudo) commitments, output commitments, and a fee,
    ///check if the equation is balanced.
    ///
    ///`in == out + fee * H`
    pub fn is_balanced(in_commitments: Vec<Commitment>, out_commitments: Vec<Commitment>, fee: u64) -> bool {
        let out = [ out_commitments, vec!(Commitment(&Scalar::from(fee) * &*PEDERSEN_H)) ].concat();
        return Commitment::sum(in_commitments.into_iter()) == Commitment::sum(out.into_iter())
    }

} impl Sum for Commitment {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        return Commitment(RistrettoPoint::sum(
            iter.map(|com| com.to_point()).collect::<Vec<RistrettoPoint>>().iter()))
    }
}

impl ToBytes<'_> for Commitment {
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        return Ok(self.0.compress().to_bytes().to_vec())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        if bytes.len() != 32 {
            return Err(SerializationError::DecodingError)
        }

        return match CompressedRistretto::from_slice(bytes).decompress() {
            Some(point) => Ok(Self(point)),
            None => Err(SerializationError::DecodingError)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::random_scalar;

    #[test]
    fn homomorphic() {
        let (a1, b1) = (Scalar::from(300u64), random_scalar());
        let (a2, b2) = (Scalar::from(45u64), random_scalar());

        let sum = Commitment::commit(&(a1 + a2), &(b1 + b2));
        let parts = Commitment(
            Commitment::commit(&a1, &b1).to_point() + Commitment::commit(&a2, &b2).to_point());

        assert_eq!(sum, parts);
    }

    #[test]
    fn balanced() {
        let b1 = random_scalar();
        let b2 = random_scalar();

        let ins = vec!(
            Commitment::commit_value(80, &b1),
            Commitment::commit_value(40, &b2));
        let outs = vec!(
            Commitment::commit_value(100, &(b1 + b2)));

        assert!(Commitment::is_balanced(ins.clone(), outs.clone(), 20));
        assert!(!Commitment::is_balanced(ins, outs, 21));
    }
}
