// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Command APDU framing
//!
//! ## Encoding
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      CLA      |      INS      |      P1       |      P2       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      LC       |             DATA (LC bytes)...                /
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use super::{ApduError, MAX_APDU_DATA};

/// Command APDU header length (CLA, INS, P1, P2, LC)
pub const APDU_HEADER_LEN: usize = 5;

/// Command APDU header
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ApduHeader {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
}

impl ApduHeader {
    /// Create a new command header
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self { cla, ins, p1, p2 }
    }

    /// Split a raw command APDU into header and payload
    ///
    /// Fails with [`ApduError::InvalidLength`] where the APDU is shorter than
    /// [`APDU_HEADER_LEN`] or `LC` does not match the payload length.
    pub fn split(buff: &[u8]) -> Result<(Self, &[u8]), ApduError> {
        if buff.len() < APDU_HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        let data = &buff[APDU_HEADER_LEN..];
        if data.len() != buff[4] as usize {
            return Err(ApduError::InvalidLength);
        }

        let h = Self {
            cla: buff[0],
            ins: buff[1],
            p1: buff[2],
            p2: buff[3],
        };

        Ok((h, data))
    }

    /// Write a full command APDU with this header and the provided payload
    pub fn encode_with(&self, data: &[u8], buff: &mut [u8]) -> Result<usize, ApduError> {
        if data.len() > MAX_APDU_DATA || buff.len() < APDU_HEADER_LEN + data.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.cla;
        buff[1] = self.ins;
        buff[2] = self.p1;
        buff[3] = self.p2;
        buff[4] = data.len() as u8;
        buff[APDU_HEADER_LEN..][..data.len()].copy_from_slice(data);

        Ok(APDU_HEADER_LEN + data.len())
    }
}
