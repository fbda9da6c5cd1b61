// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Public key APDUs
//!

use encdec::{DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, NEO_APDU_CLA};
use crate::path::{Bip44Path, BIP44_PATH_ENC_LEN};

/// Uncompressed secp256r1 public key length (`0x04 || X || Y`)
pub const PUBLIC_KEY_LEN: usize = 65;

/// Fetch the public key for a given BIP44 path, P1 and P2 must be zero
///
/// ## Encoding
/// See [`Bip44Path`] for path encoding
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PublicKeyReq {
    /// Derivation path
    pub path: Bip44Path,
}

impl PublicKeyReq {
    pub fn new(path: Bip44Path) -> Self {
        Self { path }
    }
}

impl ApduStatic for PublicKeyReq {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::GetPublicKey as u8;
}

impl Encode for PublicKeyReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        self.path.encode_len()
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        self.path.encode(buff)
    }
}

impl DecodeOwned for PublicKeyReq {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        // Requests must contain exactly one path
        if buff.len() != BIP44_PATH_ENC_LEN {
            return Err(ApduError::InvalidLength);
        }

        let (path, n) = Bip44Path::decode_owned(buff)?;

        Ok((Self { path }, n))
    }
}

/// Public key response
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     0x04      |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                X, Y (2 x 32-byte big-endian)                  /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PublicKeyResp {
    pub public_key: [u8; PUBLIC_KEY_LEN],
}

impl PublicKeyResp {
    pub fn new(public_key: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self { public_key }
    }
}

impl Encode for PublicKeyResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(PUBLIC_KEY_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < PUBLIC_KEY_LEN {
            return Err(ApduError::InvalidLength);
        }

        buff[..PUBLIC_KEY_LEN].copy_from_slice(&self.public_key);

        Ok(PUBLIC_KEY_LEN)
    }
}

impl DecodeOwned for PublicKeyResp {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() < PUBLIC_KEY_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&buff[..PUBLIC_KEY_LEN]);

        // Only uncompressed points are returned
        if public_key[0] != 0x04 {
            return Err(ApduError::InvalidEncoding);
        }

        Ok((Self { public_key }, PUBLIC_KEY_LEN))
    }
}
