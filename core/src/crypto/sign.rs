/// Curve25519 signatures (XEd25519 / "Axolotl" variant) for KSS proofs.
///
/// The account private key is a clamped X25519 scalar `a`. Signing uses the
/// matching Edwards point `A = aB`:
///
///   r = H(0xFE ‖ 0xFF×31 ‖ a ‖ msg ‖ random64) mod l
///   R = rB
///   h = H(R ‖ A ‖ msg) mod l
///   S = h·a + r
///
/// The signature is `R ‖ S` with the sign bit of `A` stored in the top bit of
/// the last byte, so a verifier holding only the Montgomery public key can
/// recover `A`.

use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::{EdwardsPoint, Scalar};
use rand::rngs::OsRng;
use rand::RngCore;

use super::hash::sha512_parts;

pub const SIGNATURE_BYTES: usize = 64;

const NONCE_PREFIX: [u8; 32] = {
    let mut p = [0xFFu8; 32];
    p[0] = 0xFE;
    p
};

/// Sign with fresh randomness from the OS.
pub fn sign(private_key: &[u8; 32], message: &[u8]) -> [u8; SIGNATURE_BYTES] {
    let mut random = [0u8; 64];
    OsRng.fill_bytes(&mut random);
    sign_with_random(private_key, message, &random)
}

pub fn sign_with_random(
    private_key: &[u8; 32],
    message: &[u8],
    random: &[u8; 64],
) -> [u8; SIGNATURE_BYTES] {
    let a = Scalar::from_bytes_mod_order(*private_key);
    let ed_public = EdwardsPoint::mul_base(&a).compress().to_bytes();
    let sign_bit = ed_public[31] & 0x80;

    let r = Scalar::from_bytes_mod_order_wide(&sha512_parts(&[
        &NONCE_PREFIX[..],
        &private_key[..],
        message,
        &random[..],
    ]));
    let big_r = EdwardsPoint::mul_base(&r).compress().to_bytes();

    let h = Scalar::from_bytes_mod_order_wide(&sha512_parts(&[&big_r[..], &ed_public[..], message]));
    let s = h * a + r;

    let mut signature = [0u8; SIGNATURE_BYTES];
    signature[..32].copy_from_slice(&big_r);
    signature[32..].copy_from_slice(s.as_bytes());
    signature[63] &= 0x7F;
    signature[63] |= sign_bit;
    signature
}

/// Verify a signature against an X25519 public key.
pub fn verify(public_key: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_BYTES]) -> bool {
    let sign_bit = (signature[63] & 0x80) >> 7;
    let Some(ed_point) = MontgomeryPoint(*public_key).to_edwards(sign_bit) else {
        return false;
    };
    let ed_public = ed_point.compress().to_bytes();

    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&signature[32..]);
    s_bytes[31] &= 0x7F;
    let Some(s) = Option::<Scalar>::from(Scalar::from_canonical_bytes(s_bytes)) else {
        return false;
    };

    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&signature[..32]);
    if CompressedEdwardsY(r_bytes).decompress().is_none() {
        return false;
    }

    let h = Scalar::from_bytes_mod_order_wide(&sha512_parts(&[&r_bytes[..], &ed_public[..], message]));
    // sB - hA must equal R
    let check = EdwardsPoint::vartime_double_scalar_mul_basepoint(&h, &(-ed_point), &s);
    check.compress().to_bytes() == r_bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{Account, KSS_CHAIN_ID};

    fn account() -> Account {
        Account::from_seed("signing test seed", 0, KSS_CHAIN_ID).unwrap()
    }

    #[test]
    fn test_signature_verifies() {
        let acc = account();
        let msg = b"transfer body bytes";
        let sig = sign(acc.private_key(), msg);
        assert!(verify(acc.public_key(), msg, &sig));
    }

    #[test]
    fn test_tampered_message_fails() {
        let acc = account();
        let sig = sign(acc.private_key(), b"pay 500000");
        assert!(!verify(acc.public_key(), b"pay 900000", &sig));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let acc = account();
        let msg = b"payload";
        let mut sig = sign(acc.private_key(), msg);
        sig[5] ^= 0x20;
        assert!(!verify(acc.public_key(), msg, &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let acc = account();
        let other = Account::from_seed("another seed", 0, KSS_CHAIN_ID).unwrap();
        let sig = sign(acc.private_key(), b"payload");
        assert!(!verify(other.public_key(), b"payload", &sig));
    }

    #[test]
    fn test_random_suffix_changes_signature_not_validity() {
        let acc = account();
        let msg = b"payload";
        let a = sign_with_random(acc.private_key(), msg, &[1u8; 64]);
        let b = sign_with_random(acc.private_key(), msg, &[2u8; 64]);
        assert_ne!(a, b);
        assert!(verify(acc.public_key(), msg, &a));
        assert!(verify(acc.public_key(), msg, &b));
    }

    #[test]
    fn test_fixed_random_is_deterministic() {
        let acc = account();
        let a = sign_with_random(acc.private_key(), b"m", &[9u8; 64]);
        let b = sign_with_random(acc.private_key(), b"m", &[9u8; 64]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_many_keys_round_trip() {
        // exercise both sign-bit values of the Edwards public key
        for nonce in 0..24 {
            let acc = Account::from_seed("sign bit sweep", nonce, KSS_CHAIN_ID).unwrap();
            let sig = sign(acc.private_key(), b"sweep");
            assert!(verify(acc.public_key(), b"sweep", &sig), "nonce {nonce}");
        }
    }
}
