use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha2::{Sha256, Sha512};
use sha3::Keccak256;

type Blake2b256 = Blake2b<U32>;

pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `keccak256(blake2b256(data))`, the chain's "secure hash" used for
/// account seeds and address bodies.
pub fn secure_hash(data: &[u8]) -> [u8; 32] {
    keccak256(&blake2b256(data))
}

/// SHA-512 over several parts without concatenating them first.
pub fn sha512_parts(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
