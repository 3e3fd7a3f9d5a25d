// SPDX short identifier: Unlicense

use veilwallet::{
    common::*,
    mlsag::{
        calculate_key_image,
        DualKey,
        Proof,
        PubKeys,
        Signature
    }
};

const RING_SIZES: [usize; 8] = [2, 3, 4, 8, 11, 16, 32, 64];

fn random_decoy(width: usize) -> PubKeys {
    let mut decoy = PubKeys::new();
    for _ in 0..width {
        decoy.push(random_point());
    }
    return decoy
}

#[test]
fn mlsag_test() {
    for n in RING_SIZES {
        for k in [1usize, 2, 4] {
            let witness: Vec<Scalar> = (0..k).map(|_| random_scalar()).collect();

            let mut proof = Proof::new();
            for _ in 0..n - 1 {
                proof.add_decoy(random_decoy(k));
            }
            proof.add_secret(witness.clone()).unwrap();

            //sign
            let sig = proof.prove(b"abcdef").unwrap();
            assert_eq!(sig.key_images.len(), k);

            //serialize
            let serialized = sig.to_bytes().unwrap();
            let deserialized = Signature::from_bytes(&serialized).unwrap();

            //sanity check the key images
            for j in 0..k {
                assert_eq!(
                    deserialized.key_images[j],
                    calculate_key_image(&witness[j], &(&witness[j] * G))
                );
            }

            //verify
            deserialized.verify(b"abcdef").unwrap();

            //wrong message
            assert!(deserialized.verify(b"123456").is_err());
        }
    }
}

#[test]
fn key_image_determinism() {
    let witness = vec![random_scalar(), random_scalar()];

    let mut images: Vec<Vec<RistrettoPoint>> = Vec::new();
    for n in [4usize, 12] {
        let mut proof = Proof::new();
        for _ in 0..n - 1 {
            proof.add_decoy(random_decoy(2));
        }
        proof.add_secret(witness.clone()).unwrap();

        let sig = proof.prove(b"same witness, different ring").unwrap();
        images.push(sig.key_images.clone());
    }

    //two signatures by the same witness share key images
    assert_eq!(images[0], images[1]);
}

#[test]
fn dualkey_test() {
    //ring size 20, both witnesses random nonzero scalars
    let mut dk = DualKey::new();
    let primary = random_scalar();
    dk.set_primary_key(primary);
    dk.set_comm_to_zero(random_scalar());

    for _ in 0..19 {
        dk.add_decoy(random_decoy(2));
    }

    let (sig, key_image) = dk.prove(b"dual key").unwrap();

    //exactly one key image, matching the primary key
    assert_eq!(sig.key_images.len(), 1);
    assert_eq!(sig.key_images[0], key_image);
    assert_eq!(key_image, calculate_key_image(&primary, &(&primary * G)));

    //the signature verifies against [key_image]
    sig.verify(b"dual key").unwrap();
    assert!(sig.verify(b"tampered").is_err());

    //and round-trips through its wire form
    let serialized = sig.to_bytes().unwrap();
    let deserialized = Signature::from_bytes(&serialized).unwrap();
    assert_eq!(sig, deserialized);
    deserialized.verify(b"dual key").unwrap();
}

#[test]
fn dualkey_commitment_binding() {
    use veilwallet::pedersen::Commitment;

    //the witness for the commitment slot is the blinder difference
    let amount = Scalar::from(250u64);
    let real_mask = random_scalar();
    let pseudo_mask = random_scalar();

    let real_commitment = Commitment::commit(&amount, &real_mask);
    let pseudo_commitment = Commitment::commit(&amount, &pseudo_mask);

    //witness image: (b' - b) * G == C' - C
    let comm_to_zero = pseudo_mask - real_mask;
    assert_eq!(
        &comm_to_zero * G,
        pseudo_commitment.to_point() - real_commitment.to_point()
    );

    let mut dk = DualKey::new();
    dk.set_primary_key(random_scalar());
    dk.set_comm_to_zero(comm_to_zero);
    for _ in 0..7 {
        dk.add_decoy(random_decoy(2));
    }
    dk.sub_comm_to_zero(&pseudo_commitment.to_point());

    let (sig, _) = dk.prove(b"balance").unwrap();
    sig.verify(b"balance").unwrap();
}
