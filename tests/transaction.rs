// SPDX short identifier: Unlicense

use veilwallet::{
    common::*,
    keys::{KeyPair, PublicAddress},
    pedersen::Commitment,
    transactions::{
        Decoy,
        Decoys,
        Input,
        Standard,
        Timelock,
        Transaction
    }
};

fn generate_decoys(num_mixins: usize) -> Decoys {
    let mut decoys: Decoys = Vec::new();
    for _ in 0..num_mixins {
        let pub_key = random_point();
        decoys.push(Decoy{
            commitment: random_point(),
            pub_key,
            offset: encode_point(&pub_key)[..5].to_vec()
        });
    }
    return decoys
}

fn generate_inputs(num: usize, amount: u64) -> Vec<Input> {
    return (0..num)
        .map(|_| Input::new(amount, random_scalar(), random_scalar()))
        .collect()
}

fn send_addr(seed: &[u8], net_prefix: u8) -> PublicAddress {
    return KeyPair::new(seed).unwrap()
        .public_key()
        .public_address(net_prefix)
}

///Inputs 5 x 20, outputs 2 x 10 plus 80 change, fee 0:
///the pseudo-commitments must cancel the output commitments exactly.
#[test]
fn balance_holds() {
    let net_prefix = 1u8;
    let addr = send_addr(&[11u8; 64], net_prefix);

    let mut standard = Standard::new(net_prefix, 0).unwrap();
    standard.add_output(&addr, 10).unwrap();
    standard.add_output(&addr, 10).unwrap();
    standard.add_output(&addr, 80).unwrap();

    for input in generate_inputs(5, 20) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    let standard = tx.standard();
    let sum_in: Commitment = standard.inputs.iter()
        .map(|input| input.pseudo_commitment)
        .sum();
    let sum_out: Commitment = standard.outputs.iter()
        .map(|output| output.commitment)
        .sum();

    assert_eq!(sum_in.to_point() - sum_out.to_point(), RistrettoPoint::identity());
    assert!(Commitment::is_balanced(
        standard.inputs.iter().map(|input| input.pseudo_commitment).collect(),
        standard.outputs.iter().map(|output| output.commitment).collect(),
        0
    ));
}

///With a nonzero fee the balance shifts by fee * H.
#[test]
fn balance_includes_fee() {
    let net_prefix = 1u8;
    let addr = send_addr(&[12u8; 64], net_prefix);

    let mut standard = Standard::new(net_prefix, 20).unwrap();
    standard.add_output(&addr, 30).unwrap();
    for input in generate_inputs(1, 50) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    let standard = tx.standard();
    assert!(Commitment::is_balanced(
        standard.inputs.iter().map(|input| input.pseudo_commitment).collect(),
        standard.outputs.iter().map(|output| output.commitment).collect(),
        20
    ));
}

#[test]
fn prove_signs_every_input() {
    let net_prefix = 1u8;
    let addr = send_addr(&[13u8; 64], net_prefix);

    let mut standard = Standard::new(net_prefix, 0).unwrap();
    standard.add_output(&addr, 40).unwrap();
    for input in generate_inputs(4, 10) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    //every input carries a signature that checks out
    tx.verify().unwrap();
    let msg = tx.hash().unwrap();
    for input in &tx.standard().inputs {
        input.verify(&msg).unwrap();
        assert!(input.signature.is_some());
    }

    //the rangeproof covers the output commitments
    let commitments: Vec<Commitment> = tx.standard().outputs.iter()
        .map(|output| output.commitment)
        .collect();
    tx.standard().range_proof.as_ref().unwrap()
        .verify(&commitments).unwrap();
}

#[test]
fn builder_guards() {
    let net_prefix = 1u8;

    //negative fee
    assert!(matches!(Standard::new(net_prefix, -1), Err(TxError::NegativeFee)));

    //empty decoy fetch
    let addr = send_addr(&[14u8; 64], net_prefix);
    let mut standard = Standard::new(net_prefix, 0).unwrap();
    standard.add_output(&addr, 10).unwrap();
    for input in generate_inputs(1, 10) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    assert!(matches!(
        tx.prove(|_| Vec::new()),
        Err(TxError::InsufficientDecoys)
    ));
}

#[test]
fn standard_wire_roundtrip() {
    let net_prefix = 1u8;
    let addr = send_addr(&[15u8; 64], net_prefix);

    let mut standard = Standard::new(net_prefix, 5).unwrap();
    standard.add_output(&addr, 25).unwrap();
    standard.add_output(&addr, 35).unwrap();
    for input in generate_inputs(2, 35) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    let mut wire: Vec<u8> = Vec::new();
    tx.encode(&mut wire).unwrap();

    let decoded = Transaction::decode(&mut wire.as_slice()).unwrap();

    //identical wire form after a decode/encode pass
    let mut rewire: Vec<u8> = Vec::new();
    decoded.encode(&mut rewire).unwrap();
    assert_eq!(wire, rewire);

    //the decoded transaction hashes and verifies identically
    assert_eq!(tx.hash().unwrap(), decoded.hash().unwrap());
    decoded.verify().unwrap();

    //and its rangeproof still checks against the decoded commitments
    let commitments: Vec<Commitment> = decoded.standard().outputs.iter()
        .map(|output| output.commitment)
        .collect();
    decoded.standard().range_proof.as_ref().unwrap()
        .verify(&commitments).unwrap();
}

#[test]
fn timelock_wire_roundtrip() {
    let net_prefix = 1u8;
    let addr = send_addr(&[16u8; 64], net_prefix);

    let mut timelock = Timelock::new(net_prefix, 0, 1000).unwrap();
    timelock.standard.add_output(&addr, 10).unwrap();
    for input in generate_inputs(1, 10) {
        timelock.standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Timelock(timelock);
    tx.prove(generate_decoys).unwrap();

    let mut wire: Vec<u8> = Vec::new();
    tx.encode(&mut wire).unwrap();

    let decoded = Transaction::decode(&mut wire.as_slice()).unwrap();
    assert_eq!(decoded.lock_time(), 1000);

    let mut rewire: Vec<u8> = Vec::new();
    decoded.encode(&mut rewire).unwrap();
    assert_eq!(wire, rewire);

    decoded.verify().unwrap();
}

#[test]
fn tagged_variants_roundtrip() {
    use veilwallet::transactions::{Bid, Coinbase, Stake};

    let net_prefix = 1u8;
    let addr = send_addr(&[19u8; 64], net_prefix);

    let mut bid = Bid::new(net_prefix, 0, 250, vec![7u8; 32]).unwrap();
    bid.timelock.standard.add_output(&addr, 15).unwrap();

    let mut stake = Stake::new(net_prefix, 0, 250, vec![9u8; 96]).unwrap();
    stake.timelock.standard.add_output(&addr, 15).unwrap();

    let mut coinbase = Coinbase::new(net_prefix);
    coinbase.add_reward(&addr, 40).unwrap();

    let mut txs = vec![
        Transaction::Bid(bid),
        Transaction::Stake(stake),
        Transaction::Coinbase(coinbase),
    ];

    for tx in &mut txs {
        tx.prove(generate_decoys).unwrap();

        let mut wire: Vec<u8> = Vec::new();
        tx.encode(&mut wire).unwrap();

        let decoded = Transaction::decode(&mut wire.as_slice()).unwrap();
        assert_eq!(decoded.tx_type(), tx.tx_type());

        let mut rewire: Vec<u8> = Vec::new();
        decoded.encode(&mut rewire).unwrap();
        assert_eq!(wire, rewire);
    }
}

#[test]
fn hash_binds_the_message() {
    let net_prefix = 1u8;
    let addr = send_addr(&[17u8; 64], net_prefix);

    let mut standard = Standard::new(net_prefix, 0).unwrap();
    standard.add_output(&addr, 10).unwrap();
    for input in generate_inputs(1, 10) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    //a signature checked against a different message fails
    let msg = tx.hash().unwrap();
    let input = &tx.standard().inputs[0];
    input.verify(&msg).unwrap();

    let mut wrong = msg;
    wrong[0] ^= 1;
    assert!(input.verify(&wrong).is_err());
}

#[test]
fn detect_outputs_of_proven_tx() {
    let net_prefix = 1u8;
    let seed = [18u8; 64];
    let receiver = KeyPair::new(&seed).unwrap();
    let addr = receiver.public_key().public_address(net_prefix);

    let mut standard = Standard::new(net_prefix, 0).unwrap();
    standard.add_output(&addr, 75).unwrap();
    standard.add_output(&addr, 25).unwrap();
    for input in generate_inputs(1, 100) {
        standard.add_input(input).unwrap();
    }

    let mut tx = Transaction::Standard(standard);
    tx.prove(generate_decoys).unwrap();

    let standard = tx.standard();
    for output in &standard.outputs {
        let one_time = receiver
            .did_receive_tx(&standard.big_r, &output.dest, output.index)
            .expect("output should be detected");
        assert_eq!(&one_time * G, output.dest.to_point());
    }
}
