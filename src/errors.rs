/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    error::Error,
    fmt::Display
};

///Encoding/serialization errors
#[derive(Debug, Clone)]
pub enum SerializationError {
    ///Failure to serialize.
    EncodingError,
    ///Failure to deserialize.
    DecodingError,

} impl Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self{
            Self::EncodingError => "Encoding error.",
            Self::DecodingError => "Decoding error."
        })
    }

} impl Error for SerializationError {}

///Rangeproof errors
#[derive(Debug, Clone)]
pub enum RangeProofError {
    ///The rangeproof is invalid.
    Invalid,
    ///The given rangeproof is malformed in some way,
    ///or the parameters are incorrect/inconsistent.
    Malformed,
    ///Aggregation size was too large, see `MAX_AGGREGATION_SIZE`.
    TooLargeAggregationSize,
    ///Miscellaneous/unspecified error.
    Unspecified(String)

} impl Display for RangeProofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self{
            Self::Invalid => "This rangeproof is invalid.",
            Self::Malformed => "Malformed proof or parameters.",
            Self::TooLargeAggregationSize => "Too many aggregated values.",
            Self::Unspecified(msg) => msg,
        })
    }

} impl Error for RangeProofError {}

///Ring signature errors
#[derive(Debug, Clone)]
pub enum SignatureError {
    ///The signature is invalid.
    Invalid,
    ///The given signature is malformed in some way,
    ///or the parameters are incorrect/inconsistent.
    Malformed,
    ///The witness key vector was never added to the ring.
    MissingWitness,
    ///A witness scalar is zero, which would leak the secret index.
    ZeroWitness,
    ///Miscellaneous/unspecified error.
    Unspecified(String)

} impl Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self{
            Self::Invalid => "This signature is invalid.",
            Self::Malformed => "Malformed signature or parameters.",
            Self::MissingWitness => "The ring does not contain a witness row.",
            Self::ZeroWitness => "Witness scalars cannot be zero.",
            Self::Unspecified(msg) => msg,
        })
    }

} impl Error for SignatureError {}

///Key and address errors
#[derive(Debug, Clone)]
pub enum KeyError {
    ///The seed is too short to derive keys from.
    SeedTooShort,
    ///The public address failed to decode or its checksum/prefix is wrong.
    MalformedAddress,

} impl Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self{
            Self::SeedTooShort => "Seed must be at least 32 bytes.",
            Self::MalformedAddress => "Malformed public address.",
        })
    }

} impl Error for KeyError {}

///Transaction building/verification errors
#[derive(Debug, Clone)]
pub enum TxError {
    ///The fee cannot be negative.
    NegativeFee,
    ///The maximum number of inputs was reached.
    TooManyInputs,
    ///The maximum number of outputs was reached.
    TooManyOutputs,
    ///The decoy fetcher returned no decoys for an input.
    InsufficientDecoys,
    ///The rangeproof did not cover every output amount.
    RangeProofMismatch,
    ///An underlying key/address error.
    Key(KeyError),
    ///An underlying ring signature error.
    Signature(SignatureError),
    ///An underlying rangeproof error.
    RangeProof(RangeProofError),
    ///An underlying serialization error.
    Serialization(SerializationError),

} impl Display for TxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeFee => write!(f, "Fee cannot be negative."),
            Self::TooManyInputs => write!(f, "Maximum amount of inputs reached."),
            Self::TooManyOutputs => write!(f, "Maximum amount of outputs reached."),
            Self::InsufficientDecoys => write!(f, "No decoys available for an input."),
            Self::RangeProofMismatch => write!(f, "Rangeproof did not create a proof for all amounts."),
            Self::Key(e) => e.fmt(f),
            Self::Signature(e) => e.fmt(f),
            Self::RangeProof(e) => e.fmt(f),
            Self::Serialization(e) => e.fmt(f),
        }
    }

} impl Error for TxError {}

impl From<KeyError> for TxError {
    fn from(e: KeyError) -> Self {
        return Self::Key(e)
    }
}
impl From<SignatureError> for TxError {
    fn from(e: SignatureError) -> Self {
        return Self::Signature(e)
    }
}
impl From<RangeProofError> for TxError {
    fn from(e: RangeProofError) -> Self {
        return Self::RangeProof(e)
    }
}
impl From<SerializationError> for TxError {
    fn from(e: SerializationError) -> Self {
        return Self::Serialization(e)
    }
}

///Storage errors from the wallet's key-value store
#[derive(Debug, Clone)]
pub enum StoreError {
    ///The requested key does not exist.
    NotFound,
    ///A stored record failed to decrypt.
    DecryptFailed,
    ///A stored record failed to decode.
    DecodeFailed,
    ///A record failed to encrypt.
    EncryptFailed,
    ///The accumulated value of the unlocked inputs falls short of the target.
    InsufficientFunds,
    ///An error surfaced by the underlying store.
    Storage(String),

} impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Key not found."),
            Self::DecryptFailed => write!(f, "Failed to decrypt stored record."),
            Self::DecodeFailed => write!(f, "Failed to decode stored record."),
            Self::EncryptFailed => write!(f, "Failed to encrypt record."),
            Self::InsufficientFunds => write!(f, "Accumulated value of all of your inputs does not cover the total amount."),
            Self::Storage(msg) => write!(f, "{}", msg),
        }
    }

} impl Error for StoreError {}

///Wallet lifecycle and chain tracking errors
#[derive(Debug, Clone)]
pub enum WalletError {
    ///The provided block is not at the wallet's current height.
    HeightMismatch{ expected: u64, got: u64 },
    ///The seed is too short to derive a wallet from.
    SeedTooShort,
    ///The wallet seed file already exists; overwriting it may cause loss of funds.
    SeedFileExists,
    ///Consensus key generation failed for this seed.
    ConsensusKeys,
    ///An I/O failure around the seed file.
    Io(String),
    ///An underlying storage error.
    Store(StoreError),
    ///An underlying transaction error.
    Tx(TxError),
    ///An underlying key error.
    Key(KeyError),

} impl Display for WalletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeightMismatch{expected, got} =>
                write!(f, "Mismatch between block height and wallet height: block height {} - wallet height {}", got, expected),
            Self::SeedTooShort => write!(f, "Seed must be at least 64 bytes in size."),
            Self::SeedFileExists => write!(f, "Wallet seed file already exists."),
            Self::ConsensusKeys => write!(f, "Seed cannot be used to generate consensus keys."),
            Self::Io(msg) => write!(f, "{}", msg),
            Self::Store(e) => e.fmt(f),
            Self::Tx(e) => e.fmt(f),
            Self::Key(e) => e.fmt(f),
        }
    }

} impl Error for WalletError {}

impl From<StoreError> for WalletError {
    fn from(e: StoreError) -> Self {
        return Self::Store(e)
    }
}
impl From<TxError> for WalletError {
    fn from(e: TxError) -> Self {
        return Self::Tx(e)
    }
}
impl From<KeyError> for WalletError {
    fn from(e: KeyError) -> Self {
        return Self::Key(e)
    }
}
impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        return Self::Io(e.to_string())
    }
}
