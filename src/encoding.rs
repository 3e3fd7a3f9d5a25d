/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Wire codec helpers.
//!
//! All 32-byte scalar/point fields use canonical Ristretto encodings,
//! and decoding rejects anything non-canonical.

use std::io::{Read, Write};

use crate::curve::*;
use crate::errors::SerializationError;

//Upper bound on any var-length field read from the wire.
const MAX_VAR_BYTES: u64 = 1 << 20;

pub(crate) fn write_u32_be<W: Write>(w: &mut W, x: u32) -> Result<(), SerializationError> {
    return w.write_all(&x.to_be_bytes()).map_err(|_| SerializationError::EncodingError)
}

pub(crate) fn read_u32_be<R: Read>(r: &mut R) -> Result<u32, SerializationError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(|_| SerializationError::DecodingError)?;
    return Ok(u32::from_be_bytes(buf))
}

pub(crate) fn write_u32_le<W: Write>(w: &mut W, x: u32) -> Result<(), SerializationError> {
    return w.write_all(&x.to_le_bytes()).map_err(|_| SerializationError::EncodingError)
}

pub(crate) fn read_u32_le<R: Read>(r: &mut R) -> Result<u32, SerializationError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(|_| SerializationError::DecodingError)?;
    return Ok(u32::from_le_bytes(buf))
}

pub(crate) fn write_u64_le<W: Write>(w: &mut W, x: u64) -> Result<(), SerializationError> {
    return w.write_all(&x.to_le_bytes()).map_err(|_| SerializationError::EncodingError)
}

pub(crate) fn read_u64_le<R: Read>(r: &mut R) -> Result<u64, SerializationError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).map_err(|_| SerializationError::DecodingError)?;
    return Ok(u64::from_le_bytes(buf))
}

///Write a fixed 32-byte field.
pub(crate) fn write_256<W: Write>(w: &mut W, bytes: &[u8; 32]) -> Result<(), SerializationError> {
    return w.write_all(bytes).map_err(|_| SerializationError::EncodingError)
}

///Read a fixed 32-byte field.
pub(crate) fn read_256<R: Read>(r: &mut R) -> Result<[u8; 32], SerializationError> {
    let mut buf = [0u8; 32];
    r.read_exact(&mut buf).map_err(|_| SerializationError::DecodingError)?;
    return Ok(buf)
}

///Write a length-prefixed (u64 little-endian) byte string.
pub(crate) fn write_var_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<(), SerializationError> {
    write_u64_le(w, bytes.len() as u64)?;
    return w.write_all(bytes).map_err(|_| SerializationError::EncodingError)
}

///Read a length-prefixed (u64 little-endian) byte string.
pub(crate) fn read_var_bytes<R: Read>(r: &mut R) -> Result<Vec<u8>, SerializationError> {
    let len = read_u64_le(r)?;
    if len > MAX_VAR_BYTES {
        return Err(SerializationError::DecodingError)
    }

    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf).map_err(|_| SerializationError::DecodingError)?;
    return Ok(buf)
}

///Write a point as its canonical 32-byte encoding.
pub(crate) fn write_point<W: Write>(w: &mut W, point: &RistrettoPoint) -> Result<(), SerializationError> {
    return write_256(w, &point.compress().to_bytes())
}

///Read a point, rejecting non-canonical encodings.
pub(crate) fn read_point<R: Read>(r: &mut R) -> Result<RistrettoPoint, SerializationError> {
    let bytes = read_256(r)?;
    return match CompressedRistretto(bytes).decompress() {
        Some(point) => Ok(point),
        None => Err(SerializationError::DecodingError)
    }
}

///Write a scalar as its canonical (little-endian) 32-byte encoding.
pub(crate) fn write_scalar<W: Write>(w: &mut W, scalar: &Scalar) -> Result<(), SerializationError> {
    return write_256(w, &scalar.reduce().to_bytes())
}

///Read a scalar, rejecting non-canonical encodings.
pub(crate) fn read_scalar<R: Read>(r: &mut R) -> Result<Scalar, SerializationError> {
    let bytes = read_256(r)?;
    return match Scalar::from_canonical_bytes(bytes) {
        Some(scalar) => Ok(scalar),
        None => Err(SerializationError::DecodingError)
    }
}

///Write a scalar as 32 big-endian bytes (the fee field layout).
pub(crate) fn write_scalar_be<W: Write>(w: &mut W, scalar: &Scalar) -> Result<(), SerializationError> {
    let mut bytes = scalar.reduce().to_bytes();
    bytes.reverse();
    return write_256(w, &bytes)
}

///Read a 32-byte big-endian scalar, rejecting non-canonical encodings.
pub(crate) fn read_scalar_be<R: Read>(r: &mut R) -> Result<Scalar, SerializationError> {
    let mut bytes = read_256(r)?;
    bytes.reverse();
    return match Scalar::from_canonical_bytes(bytes) {
        Some(scalar) => Ok(scalar),
        None => Err(SerializationError::DecodingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{random_point, random_scalar};

    #[test]
    fn var_bytes_roundtrip() {
        let mut buf: Vec<u8> = Vec::new();
        write_var_bytes(&mut buf, b"offsets").unwrap();
        write_var_bytes(&mut buf, b"").unwrap();

        let mut r = buf.as_slice();
        assert_eq!(read_var_bytes(&mut r).unwrap(), b"offsets");
        assert_eq!(read_var_bytes(&mut r).unwrap(), b"");
    }

    #[test]
    fn scalar_be_roundtrip() {
        let s = random_scalar();
        let mut buf: Vec<u8> = Vec::new();
        write_scalar_be(&mut buf, &s).unwrap();
        assert_eq!(read_scalar_be(&mut buf.as_slice()).unwrap(), s);
    }

    #[test]
    fn point_rejects_noncanonical() {
        let p = random_point();
        let mut buf: Vec<u8> = Vec::new();
        write_point(&mut buf, &p).unwrap();
        assert_eq!(read_point(&mut buf.as_slice()).unwrap(), p);

        //not a valid Ristretto encoding
        let garbage = [0xffu8; 32];
        assert!(read_point(&mut garbage.as_slice()).is_err());
    }
}
