//! Prefix-preserving IPv4 pseudonymization (Crypto-PAn)
//!
//! Two addresses that share their first `n` bits map to outputs that also share
//! their first `n` bits. The mapping is a bijection on the 32-bit address space
//! and depends only on the 32-byte key.
//!
//! Key layout: bytes `0..16` are the AES-128 key, bytes `16..32` are encrypted
//! once to produce the pad that seeds every round.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use std::net::Ipv4Addr;
use zeroize::Zeroizing;

use crate::domain::{PalosaError, Result};

/// Length of Crypto-PAn key material in bytes
pub const KEY_LEN: usize = 32;

/// Crypto-PAn IPv4 anonymizer
#[derive(Clone)]
pub struct CryptoPan {
    cipher: Aes128,
    pad: [u8; 16],
}

impl CryptoPan {
    /// Creates an anonymizer from exactly 32 bytes of key material
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let cipher = Aes128::new(GenericArray::from_slice(&key[..16]));

        let mut block = GenericArray::clone_from_slice(&key[16..]);
        cipher.encrypt_block(&mut block);
        let mut pad = [0u8; 16];
        pad.copy_from_slice(&block);

        Self { cipher, pad }
    }

    /// Creates an anonymizer from a UTF-8 secret
    ///
    /// The secret bytes are zero-padded to 32 bytes, or truncated when longer.
    pub fn from_secret(secret: &str) -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        let bytes = secret.as_bytes();
        let len = bytes.len().min(KEY_LEN);
        key[..len].copy_from_slice(&bytes[..len]);
        Self::new(&key)
    }

    /// Anonymizes a 32-bit address
    pub fn anonymize_u32(&self, orig: u32) -> u32 {
        let first4 = u32::from_be_bytes([self.pad[0], self.pad[1], self.pad[2], self.pad[3]]);
        let mut result: u32 = 0;

        for pos in 0..32u32 {
            let newpad = if pos == 0 {
                first4
            } else {
                ((orig >> (32 - pos)) << (32 - pos)) | ((first4 << pos) >> pos)
            };

            let mut input = [0u8; 16];
            input[..4].copy_from_slice(&newpad.to_be_bytes());
            input[4..].copy_from_slice(&self.pad[4..]);

            let mut block = GenericArray::from(input);
            self.cipher.encrypt_block(&mut block);

            result |= u32::from(block[0] >> 7) << (31 - pos);
        }

        result ^ orig
    }

    /// Anonymizes four address bytes
    pub fn anonymize_bytes(&self, bytes: [u8; 4]) -> [u8; 4] {
        self.anonymize_u32(u32::from_be_bytes(bytes)).to_be_bytes()
    }
}

impl std::fmt::Debug for CryptoPan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoPan").finish_non_exhaustive()
    }
}

/// Parses a dotted-quad address into its four bytes
pub fn ip_to_bytes(ip: &str) -> Result<[u8; 4]> {
    ip.parse::<Ipv4Addr>()
        .map(|addr| addr.octets())
        .map_err(|e| PalosaError::ContentTransform(format!("Invalid IPv4 address: {e}")))
}

/// Formats four bytes as a dotted-quad address
pub fn bytes_to_ip(bytes: [u8; 4]) -> String {
    Ipv4Addr::from(bytes).to_string()
}
