pub mod hash;
pub mod keys;
pub mod sign;

pub use keys::{Account, Address, AddressError, KeyError, KSS_CHAIN_ID};

pub fn to_base58(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}
