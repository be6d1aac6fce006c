/// Accounts, addresses and signed transfers end to end.
///
/// Derives accounts the way the reward sender does, builds a reward
/// transfer to another account and checks that everything a node would
/// validate (address checksum, chain id, proof, id) holds together.

use kss_core::crypto::{Account, Address, AddressError, KSS_CHAIN_ID};
use kss_core::tx::{Transfer, DEFAULT_TRANSFER_FEE};
use kss_core::units::{format_kss, to_decimal};

// ═══════════════════════════════════════════════════════════════════════════
// 1. Accounts and addresses
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_seed_addresses_are_35_chars_and_parse() {
    for nonce in 0..8 {
        let acc = Account::from_seed("integration seed phrase", nonce, KSS_CHAIN_ID).unwrap();
        let encoded = acc.address().to_string();
        assert_eq!(encoded.len(), 35, "nonce {nonce}");
        let parsed = Address::parse(&encoded, KSS_CHAIN_ID).unwrap();
        assert_eq!(&parsed, acc.address());
    }
}

#[test]
fn test_nonce_changes_account() {
    let a = Account::from_seed("same seed", 0, KSS_CHAIN_ID).unwrap();
    let b = Account::from_seed("same seed", 1, KSS_CHAIN_ID).unwrap();
    assert_ne!(a.public_key(), b.public_key());
    assert_ne!(a.address(), b.address());
}

#[test]
fn test_corrupted_address_fails_checksum() {
    let acc = Account::from_seed("checksum seed", 0, KSS_CHAIN_ID).unwrap();
    let mut bytes = *acc.address().as_bytes();
    bytes[10] ^= 0x01;
    let corrupted = bs58::encode(bytes).into_string();
    assert_eq!(
        Address::parse(&corrupted, KSS_CHAIN_ID).unwrap_err(),
        AddressError::Checksum
    );
}

#[test]
fn test_wrong_chain_rejected() {
    let acc = Account::from_seed("chain seed", 0, b'T').unwrap();
    let err = Address::parse(acc.address().as_str(), KSS_CHAIN_ID).unwrap_err();
    assert_eq!(
        err,
        AddressError::ChainId {
            expected: 'N',
            actual: 'T'
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. Reward transfer
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_reward_transfer_signs_and_serializes() {
    let sender = Account::from_seed("integration sender", 0, KSS_CHAIN_ID).unwrap();
    let generator = Account::from_seed("integration generator", 0, KSS_CHAIN_ID).unwrap();

    let signed = Transfer::new(
        &sender,
        generator.address().clone(),
        500_000,
        DEFAULT_TRANSFER_FEE,
        1_714_564_800_000,
        "Thanks for running a node",
    )
    .unwrap()
    .sign(&sender);

    assert!(signed.verify());
    assert_eq!(signed.transfer.total_cost(), 600_000);

    let json = serde_json::to_value(signed.to_json()).unwrap();
    assert_eq!(json["recipient"], generator.address().to_string());
    assert_eq!(json["timestamp"], 1_714_564_800_000u64);
    assert!(json["proofs"][0].as_str().unwrap().len() > 80);
    assert_eq!(
        bs58::decode(json["attachment"].as_str().unwrap()).into_vec().unwrap(),
        b"Thanks for running a node"
    );
}

#[test]
fn test_signature_from_other_key_fails() {
    let sender = Account::from_seed("integration sender", 0, KSS_CHAIN_ID).unwrap();
    let impostor = Account::from_seed("impostor", 0, KSS_CHAIN_ID).unwrap();
    let recipient = Account::from_seed("integration generator", 0, KSS_CHAIN_ID).unwrap();

    let mut signed = Transfer::new(&sender, recipient.address().clone(), 1, 1, 0, Vec::new())
        .unwrap()
        .sign(&impostor);
    assert!(!signed.verify());

    // the proof covers the sender key, so swapping it in afterwards still fails
    signed.transfer.sender_public_key = *impostor.public_key();
    assert!(!signed.verify());
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Units
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_reward_amount_in_kss() {
    assert_eq!(format_kss(to_decimal(500_000)), "0.00500000");
    assert_eq!(format_kss(to_decimal(100_000_000)), "1.00000000");
}
