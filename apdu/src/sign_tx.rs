// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Transaction signing APDUs
//!
//! Transactions are streamed to the device in a sequence of [`Instruction::SignTx`]
//! messages, P1 carrying an incrementing sequence index and P2 indicating whether
//! more messages follow ([`P2_MORE`]) or this is the final message ([`P2_LAST`]).
//!
//! 1. Sequence `0`: [`SignTxIdentity`] containing the BIP44 path, optionally followed by the network magic
//! 2. Sequence `1`: [`SignTxMagic`] containing the network magic (where not provided in 1.)
//! 3. Sequence `n+1`..: [`SignTxChunk`]s containing the unsigned transaction, split at arbitrary offsets
//!
//! The final chunk is answered once the user has approved or rejected the transaction,
//! with a [`SignTxResp`] containing a DER encoded signature on approval.
//!

use byteorder::{ByteOrder, LittleEndian};
use encdec::{Decode, DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, NEO_APDU_CLA};
use crate::path::{Bip44Path, BIP44_PATH_ENC_LEN};

/// P2 flag indicating more messages follow
pub const P2_MORE: u8 = 0x80;

/// P2 flag indicating this is the final message
pub const P2_LAST: u8 = 0x00;

/// Sequence index for the identity (path) message
pub const SEQ_IDENTITY: u8 = 0x00;

/// Sequence index for the network magic message
pub const SEQ_MAGIC: u8 = 0x01;

/// Maximum DER encoded signature length
pub const MAX_SIGNATURE_LEN: usize = 72;

/// Identity message, starts a signing session
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                 BIP44_PATH (5 x u32, BE)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |              NETWORK_MAGIC (u32, LE, optional)                |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignTxIdentity {
    pub path: Bip44Path,
    pub magic: Option<u32>,
}

impl SignTxIdentity {
    pub fn new(path: Bip44Path, magic: Option<u32>) -> Self {
        Self { path, magic }
    }
}

impl ApduStatic for SignTxIdentity {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::SignTx as u8;
}

impl Encode for SignTxIdentity {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(BIP44_PATH_ENC_LEN + self.magic.map(|_| 4).unwrap_or(0))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        let mut index = self.path.encode(buff)?;

        if let Some(m) = self.magic {
            LittleEndian::write_u32(&mut buff[index..], m);
            index += 4;
        }

        Ok(index)
    }
}

impl DecodeOwned for SignTxIdentity {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        let magic = match buff.len() {
            BIP44_PATH_ENC_LEN => None,
            n if n == BIP44_PATH_ENC_LEN + 4 => {
                Some(LittleEndian::read_u32(&buff[BIP44_PATH_ENC_LEN..]))
            }
            _ => return Err(ApduError::InvalidLength),
        };

        let (path, _) = Bip44Path::decode_owned(buff)?;

        Ok((Self { path, magic }, buff.len()))
    }
}

/// Network magic message
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                  NETWORK_MAGIC (u32, LE)                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignTxMagic {
    pub magic: u32,
}

impl SignTxMagic {
    pub fn new(magic: u32) -> Self {
        Self { magic }
    }
}

impl ApduStatic for SignTxMagic {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::SignTx as u8;
}

impl Encode for SignTxMagic {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        LittleEndian::write_u32(buff, self.magic);

        Ok(4)
    }
}

impl DecodeOwned for SignTxMagic {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() != 4 {
            return Err(ApduError::InvalidLength);
        }

        let magic = LittleEndian::read_u32(buff);

        Ok((Self { magic }, 4))
    }
}

/// Transaction data chunk, raw bytes of the unsigned transaction
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignTxChunk<'a> {
    pub data: &'a [u8],
}

impl<'a> SignTxChunk<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> ApduStatic for SignTxChunk<'a> {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::SignTx as u8;
}

impl<'a> Encode for SignTxChunk<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.data.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..self.data.len()].copy_from_slice(self.data);

        Ok(self.data.len())
    }
}

impl<'a> Decode<'a> for SignTxChunk<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        Ok((Self { data: buff }, buff.len()))
    }
}

/// Signature response, a DER encoded ECDSA signature
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SignTxResp<'a> {
    pub signature: &'a [u8],
}

impl<'a> SignTxResp<'a> {
    pub fn new(signature: &'a [u8]) -> Self {
        Self { signature }
    }
}

impl<'a> Encode for SignTxResp<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.signature.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let n = self.signature.len();
        if n > MAX_SIGNATURE_LEN || buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[..n].copy_from_slice(self.signature);

        Ok(n)
    }
}

impl<'a> Decode<'a> for SignTxResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        // DER SEQUENCE header
        if buff.len() < 8 || buff.len() > MAX_SIGNATURE_LEN {
            return Err(ApduError::InvalidLength);
        }
        if buff[0] != 0x30 || buff[1] as usize != buff.len() - 2 {
            return Err(ApduError::InvalidEncoding);
        }

        Ok((Self { signature: buff }, buff.len()))
    }
}
