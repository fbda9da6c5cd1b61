// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! BIP44 derivation paths
//!
//! Neo N3 keys are derived at `m/44'/888'/account'/change/address`,
//! encoded on the wire as 5 big-endian `u32` values.
//!
//! ## Encoding
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                     PURPOSE (u32, BE)                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    COIN_TYPE (u32, BE)                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                     ACCOUNT (u32, BE)                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      CHANGE (u32, BE)                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                  ADDRESS_INDEX (u32, BE)                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use core::{fmt, str::FromStr};

use byteorder::{BigEndian, ByteOrder};
use encdec::{DecodeOwned, Encode};

use super::ApduError;

/// Number of elements in a BIP44 path
pub const BIP44_PATH_LEN: usize = 5;

/// Encoded length of a BIP44 path
pub const BIP44_PATH_ENC_LEN: usize = BIP44_PATH_LEN * 4;

/// Hardened derivation flag
pub const HARDENED: u32 = 0x8000_0000;

/// BIP44 purpose
pub const BIP44_PURPOSE: u32 = 44;

/// Registered SLIP-0044 coin type for NEO
pub const NEO_COIN_TYPE: u32 = 888;

/// BIP44 derivation path
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Bip44Path(pub [u32; BIP44_PATH_LEN]);

impl Bip44Path {
    /// Create a standard Neo path `m/44'/888'/account'/change/address`
    pub const fn new(account: u32, change: u32, address: u32) -> Self {
        Self([
            BIP44_PURPOSE | HARDENED,
            NEO_COIN_TYPE | HARDENED,
            account | HARDENED,
            change,
            address,
        ])
    }

    pub fn purpose(&self) -> u32 {
        self.0[0]
    }

    pub fn coin_type(&self) -> u32 {
        self.0[1]
    }

    pub fn account(&self) -> u32 {
        self.0[2]
    }

    pub fn change(&self) -> u32 {
        self.0[3]
    }

    pub fn address(&self) -> u32 {
        self.0[4]
    }

    /// Fetch path elements for derivation
    pub fn as_slice(&self) -> &[u32] {
        &self.0[..]
    }
}

impl Encode for Bip44Path {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(BIP44_PATH_ENC_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < BIP44_PATH_ENC_LEN {
            return Err(ApduError::InvalidLength);
        }

        for (i, v) in self.0.iter().enumerate() {
            BigEndian::write_u32(&mut buff[i * 4..], *v);
        }

        Ok(BIP44_PATH_ENC_LEN)
    }
}

impl DecodeOwned for Bip44Path {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() < BIP44_PATH_ENC_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut p = [0u32; BIP44_PATH_LEN];
        for (i, v) in p.iter_mut().enumerate() {
            *v = BigEndian::read_u32(&buff[i * 4..]);
        }

        Ok((Self(p), BIP44_PATH_ENC_LEN))
    }
}

impl fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;

        for v in self.0 {
            match v & HARDENED != 0 {
                true => write!(f, "/{}'", v & !HARDENED)?,
                false => write!(f, "/{v}")?,
            }
        }

        Ok(())
    }
}

/// Parse a path from `m/44'/888'/0'/0/0` notation
impl FromStr for Bip44Path {
    type Err = ApduError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');

        if parts.next() != Some("m") {
            return Err(ApduError::InvalidEncoding);
        }

        let mut p = [0u32; BIP44_PATH_LEN];
        let mut n = 0;

        for part in parts {
            if n >= BIP44_PATH_LEN {
                return Err(ApduError::InvalidLength);
            }

            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(d) => (d, HARDENED),
                None => (part, 0),
            };

            let v = u32::from_str(digits).map_err(|_| ApduError::InvalidEncoding)?;
            if v & HARDENED != 0 {
                return Err(ApduError::InvalidEncoding);
            }

            p[n] = v | hardened;
            n += 1;
        }

        if n != BIP44_PATH_LEN {
            return Err(ApduError::InvalidLength);
        }

        Ok(Self(p))
    }
}
