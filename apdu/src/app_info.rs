// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Application Information APDUs

use encdec::{Decode, DecodeOwned, Encode};

use super::{
    ApduError, ApduStatic, Instruction, BOLOS_APDU_CLA, BOLOS_INS_GET_APP_AND_VERSION,
    NEO_APDU_CLA,
};

/// Fetch application name APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AppNameReq {}

impl ApduStatic for AppNameReq {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::GetAppName as u8;
}

/// Fetch application version APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct VersionReq {}

impl ApduStatic for VersionReq {
    const CLA: u8 = NEO_APDU_CLA;
    const INS: u8 = Instruction::GetVersion as u8;
}

/// Fetch application name and version via the dashboard class
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AppAndVersionReq {}

impl ApduStatic for AppAndVersionReq {
    /// Dashboard APDU class `0xb0`
    const CLA: u8 = BOLOS_APDU_CLA;

    /// Get app and version instruction `0x01`
    const INS: u8 = BOLOS_INS_GET_APP_AND_VERSION;
}

/// Helper for empty request encoding
macro_rules! empty_req {
    ($t:ty) => {
        impl Encode for $t {
            type Error = ApduError;

            fn encode_len(&self) -> Result<usize, Self::Error> {
                Ok(0)
            }

            fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
                Ok(0)
            }
        }

        impl DecodeOwned for $t {
            type Output = Self;

            type Error = ApduError;

            fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
                if !buff.is_empty() {
                    return Err(ApduError::InvalidLength);
                }

                Ok((Self {}, 0))
            }
        }
    };
}

empty_req!(AppNameReq);
empty_req!(VersionReq);
empty_req!(AppAndVersionReq);

/// Application name response, raw ASCII with no length prefix
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppNameResp<'a> {
    pub name: &'a str,
}

impl<'a> AppNameResp<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }
}

impl<'a> Encode for AppNameResp<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.name.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = self.name.as_bytes();
        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(d);

        Ok(d.len())
    }
}

impl<'a> Decode<'a> for AppNameResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let name = core::str::from_utf8(buff).map_err(|_| ApduError::InvalidEncoding)?;
        Ok((Self { name }, buff.len()))
    }
}

/// Application version response
///
/// ## Encoding
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct VersionResp {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl VersionResp {
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// Application name and version response
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   FORMAT_ID   |   NAME_LEN    |           NAME...             /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  VERSION_LEN  |                 VERSION...                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppAndVersionResp<'a> {
    /// Response format (must be 1)
    pub format: u8,

    /// Application name
    pub name: &'a str,

    /// Application version
    pub version: &'a str,
}

/// Format identifier for [`AppAndVersionResp`]
pub const APP_AND_VERSION_FORMAT: u8 = 1;

impl<'a> AppAndVersionResp<'a> {
    pub fn new(name: &'a str, version: &'a str) -> Self {
        Self {
            format: APP_AND_VERSION_FORMAT,
            name,
            version,
        }
    }
}

impl<'a> Encode for AppAndVersionResp<'a> {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;

        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[index] = self.format;
        index += 1;

        // Write name
        buff[index] = self.name.len() as u8;
        index += 1;
        buff[index..][..self.name.len()].copy_from_slice(self.name.as_bytes());
        index += self.name.len();

        // Write version
        buff[index] = self.version.len() as u8;
        index += 1;
        buff[index..][..self.version.len()].copy_from_slice(self.version.as_bytes());
        index += self.version.len();

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(3 + self.name.len() + self.version.len())
    }
}

impl<'a> Decode<'a> for AppAndVersionResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let mut index = 0;

        if buff.len() < 2 {
            return Err(ApduError::InvalidLength);
        }

        let format = buff[index];
        index += 1;

        // Fetch name string
        let name_len = buff[index] as usize;
        index += 1;
        if buff.len() < index + name_len + 1 {
            return Err(ApduError::InvalidLength);
        }
        let name = core::str::from_utf8(&buff[index..][..name_len])
            .map_err(|_| ApduError::InvalidEncoding)?;
        index += name_len;

        // Fetch version string
        let version_len = buff[index] as usize;
        index += 1;
        if buff.len() < index + version_len {
            return Err(ApduError::InvalidLength);
        }
        let version = core::str::from_utf8(&buff[index..][..version_len])
            .map_err(|_| ApduError::InvalidEncoding)?;
        index += version_len;

        Ok((
            Self {
                format,
                name,
                version,
            },
            index,
        ))
    }
}
