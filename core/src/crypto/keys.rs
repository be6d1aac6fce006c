/// KSS account keys and addresses
///
/// Accounts follow the Waves-family scheme used by KrossChain:
///
///   1. `seed_hash = secure_hash(be_u32(nonce) ‖ seed)`
///   2. `private   = clamp(sha256(seed_hash))` (Curve25519 clamping)
///   3. `public    = X25519(private, basepoint)`
///
/// Address layout (26 bytes, base58 encoded → 35 chars):
///
///   `0x01 ‖ chain_id ‖ secure_hash(public)[..20] ‖ checksum(4)`
///
/// where `checksum = secure_hash(first 22 bytes)[..4]`.

use curve25519_dalek::{EdwardsPoint, Scalar};
use std::fmt;
use thiserror::Error;

use super::hash::{secure_hash, sha256};

pub const ADDRESS_VERSION: u8 = 1;
pub const ADDRESS_BYTES: usize = 26;
pub const PUBLIC_KEY_BYTES: usize = 32;

/// Chain id byte of KrossChain mainnet.
pub const KSS_CHAIN_ID: u8 = b'N';

const CHECKSUM_BYTES: usize = 4;
const BODY_HASH_BYTES: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("seed phrase is empty")]
    EmptySeed,
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is not valid base58: {0}")]
    Base58(String),
    #[error("address must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("unsupported address version {0}")]
    Version(u8),
    #[error("address belongs to chain '{actual}', expected '{expected}'")]
    ChainId { expected: char, actual: char },
    #[error("address checksum mismatch")]
    Checksum,
}

/// Apply Curve25519 private key clamping.
pub fn clamp(mut key: [u8; 32]) -> [u8; 32] {
    key[0] &= 248;
    key[31] &= 127;
    key[31] |= 64;
    key
}

/// X25519 public key (Montgomery u-coordinate) for a clamped private key.
pub fn public_key_from_private(private_key: &[u8; 32]) -> [u8; 32] {
    let a = Scalar::from_bytes_mod_order(*private_key);
    EdwardsPoint::mul_base(&a).to_montgomery().to_bytes()
}

/// A signing account derived from a seed phrase.
#[derive(Clone)]
pub struct Account {
    private_key: [u8; 32],
    public_key: [u8; 32],
    address: Address,
}

impl Account {
    pub fn from_seed(seed: &str, nonce: u32, chain_id: u8) -> Result<Self, KeyError> {
        if seed.trim().is_empty() {
            return Err(KeyError::EmptySeed);
        }

        let mut material = Vec::with_capacity(4 + seed.len());
        material.extend_from_slice(&nonce.to_be_bytes());
        material.extend_from_slice(seed.as_bytes());

        let seed_hash = secure_hash(&material);
        let private_key = clamp(sha256(&seed_hash));
        Ok(Self::from_private_key(private_key, chain_id))
    }

    pub fn from_private_key(private_key: [u8; 32], chain_id: u8) -> Self {
        let private_key = clamp(private_key);
        let public_key = public_key_from_private(&private_key);
        let address = Address::from_public_key(&public_key, chain_id);
        Self {
            private_key,
            public_key,
            address,
        }
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.public_key).into_string()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("public_key", &self.public_key_base58())
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// A validated account address.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: [u8; ADDRESS_BYTES],
    encoded: String,
}

impl Address {
    pub fn from_public_key(public_key: &[u8; 32], chain_id: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = chain_id;
        bytes[2..2 + BODY_HASH_BYTES].copy_from_slice(&secure_hash(public_key)[..BODY_HASH_BYTES]);

        let prefix_len = ADDRESS_BYTES - CHECKSUM_BYTES;
        let checksum = secure_hash(&bytes[..prefix_len]);
        bytes[prefix_len..].copy_from_slice(&checksum[..CHECKSUM_BYTES]);

        Self::from_validated_bytes(bytes)
    }

    /// Parse and fully validate a base58 address for `chain_id`.
    pub fn parse(s: &str, chain_id: u8) -> Result<Self, AddressError> {
        let decoded = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| AddressError::Base58(e.to_string()))?;

        if decoded.len() != ADDRESS_BYTES {
            return Err(AddressError::Length {
                expected: ADDRESS_BYTES,
                actual: decoded.len(),
            });
        }
        if decoded[0] != ADDRESS_VERSION {
            return Err(AddressError::Version(decoded[0]));
        }
        if decoded[1] != chain_id {
            return Err(AddressError::ChainId {
                expected: chain_id as char,
                actual: decoded[1] as char,
            });
        }

        let prefix_len = ADDRESS_BYTES - CHECKSUM_BYTES;
        let checksum = secure_hash(&decoded[..prefix_len]);
        if decoded[prefix_len..] != checksum[..CHECKSUM_BYTES] {
            return Err(AddressError::Checksum);
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_validated_bytes(bytes))
    }

    fn from_validated_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        let encoded = bs58::encode(bytes).into_string();
        Self { bytes, encoded }
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn chain_id(&self) -> u8 {
        self.bytes[1]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encoded)
    }
}
