/// Native-asset transfer transactions (type 4, version 2).
///
/// Body layout signed by the sender:
///
/// ```text
/// 0x04 ‖ 0x02 ‖ sender_pk(32) ‖ 0x00 ‖ 0x00 ‖ timestamp(8) ‖ amount(8) ‖ fee(8)
///      ‖ recipient(26) ‖ attachment_len(2) ‖ attachment
/// ```
///
/// The two zero bytes mark the native asset for both amount and fee.
/// All integers are big-endian.

use serde::Serialize;
use thiserror::Error;

use crate::crypto::hash::blake2b256;
use crate::crypto::{sign, to_base58, Account, Address};

pub const TRANSFER_TX_TYPE: u8 = 4;
pub const TRANSFER_TX_VERSION: u8 = 2;
pub const MAX_ATTACHMENT_BYTES: usize = 140;

/// Minimum fee for a plain transfer, in units.
pub const DEFAULT_TRANSFER_FEE: u64 = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxError {
    #[error("transfer amount must be greater than zero")]
    ZeroAmount,
    #[error("attachment is {0} bytes, maximum is 140")]
    AttachmentTooLong(usize),
    #[error("amount {amount} plus fee {fee} overflows")]
    Overflow { amount: u64, fee: u64 },
}

/// An unsigned transfer. Call [`Transfer::sign`] to produce a broadcastable
/// [`SignedTransfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub sender_public_key: [u8; 32],
    pub recipient: Address,
    pub amount: u64,
    pub fee: u64,
    pub timestamp_ms: u64,
    pub attachment: Vec<u8>,
}

impl Transfer {
    pub fn new(
        sender: &Account,
        recipient: Address,
        amount: u64,
        fee: u64,
        timestamp_ms: u64,
        attachment: impl Into<Vec<u8>>,
    ) -> Result<Self, TxError> {
        let attachment = attachment.into();
        if amount == 0 {
            return Err(TxError::ZeroAmount);
        }
        if attachment.len() > MAX_ATTACHMENT_BYTES {
            return Err(TxError::AttachmentTooLong(attachment.len()));
        }
        amount
            .checked_add(fee)
            .ok_or(TxError::Overflow { amount, fee })?;

        Ok(Self {
            sender_public_key: *sender.public_key(),
            recipient,
            amount,
            fee,
            timestamp_ms,
            attachment,
        })
    }

    /// Total debited from the sender (amount + fee).
    pub fn total_cost(&self) -> u64 {
        self.amount.saturating_add(self.fee)
    }

    pub fn body_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(2 + 32 + 2 + 24 + 26 + 2 + self.attachment.len());
        data.push(TRANSFER_TX_TYPE);
        data.push(TRANSFER_TX_VERSION);
        data.extend_from_slice(&self.sender_public_key);
        data.push(0); // amount asset: native
        data.push(0); // fee asset: native
        data.extend_from_slice(&self.timestamp_ms.to_be_bytes());
        data.extend_from_slice(&self.amount.to_be_bytes());
        data.extend_from_slice(&self.fee.to_be_bytes());
        data.extend_from_slice(self.recipient.as_bytes());
        data.extend_from_slice(&(self.attachment.len() as u16).to_be_bytes());
        data.extend_from_slice(&self.attachment);
        data
    }

    /// Transaction id as reported by the node: base58 of blake2b256(body).
    pub fn id(&self) -> String {
        to_base58(&blake2b256(&self.body_bytes()))
    }

    pub fn sign(self, sender: &Account) -> SignedTransfer {
        let proof = sign::sign(sender.private_key(), &self.body_bytes());
        SignedTransfer {
            id: self.id(),
            transfer: self,
            proof,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignedTransfer {
    pub id: String,
    pub transfer: Transfer,
    pub proof: [u8; sign::SIGNATURE_BYTES],
}

impl SignedTransfer {
    pub fn verify(&self) -> bool {
        sign::verify(
            &self.transfer.sender_public_key,
            &self.transfer.body_bytes(),
            &self.proof,
        )
    }

    /// JSON body for `POST /transactions/broadcast`.
    pub fn to_json(&self) -> TransferJson {
        let t = &self.transfer;
        TransferJson {
            tx_type: TRANSFER_TX_TYPE,
            version: TRANSFER_TX_VERSION,
            sender_public_key: to_base58(&t.sender_public_key),
            recipient: t.recipient.to_string(),
            asset_id: None,
            fee_asset_id: None,
            amount: t.amount,
            fee: t.fee,
            timestamp: t.timestamp_ms,
            attachment: to_base58(&t.attachment),
            proofs: vec![to_base58(&self.proof)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferJson {
    #[serde(rename = "type")]
    pub tx_type: u8,
    pub version: u8,
    pub sender_public_key: String,
    pub recipient: String,
    pub asset_id: Option<String>,
    pub fee_asset_id: Option<String>,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub attachment: String,
    pub proofs: Vec<String>,
}
