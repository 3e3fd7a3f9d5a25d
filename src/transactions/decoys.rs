/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::internal_common::*;
use crate::mlsag::PubKeys;

///One decoy ring member: an unrelated output pulled from the chain.
#[derive(Debug, Clone)]
pub struct Decoy {
    ///Pedersen commitment of the decoy output
    pub commitment: RistrettoPoint,
    ///Destination key of the decoy output
    pub pub_key: RistrettoPoint,
    ///Global position of the decoy output in the chain's output table
    pub offset: Vec<u8>
}

pub type Decoys = Vec<Decoy>;

///Convert decoys into two-slot MLSAG key vectors plus their global offsets.
///
///Slot 0 is the destination key, slot 1 the commitment; the builder later
///shifts slot 1 by the input's pseudo-commitment.
pub(crate) fn decoys_to_mlsag(decoys: &Decoys) -> Result<(Vec<PubKeys>, Vec<Vec<u8>>), TxError> {
    if decoys.is_empty() {
        return Err(TxError::InsufficientDecoys)
    }

    let mut keys: Vec<PubKeys> = Vec::with_capacity(decoys.len());
    let mut offsets: Vec<Vec<u8>> = Vec::with_capacity(decoys.len());

    for decoy in decoys {
        let mut row = PubKeys::new();
        row.push(decoy.pub_key);
        row.push(decoy.commitment);

        keys.push(row);
        offsets.push(decoy.offset.clone());
    }

    return Ok((keys, offsets))
}
