// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Transaction parser status codes
//!
//! Returned as the payload of a [`TxParsingFail`][crate::status::StatusWord::TxParsingFail]
//! response to identify the exact rule a transaction violated. Values are part of the wire
//! protocol and are only ever appended.
//!
//! ## Encoding
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      STATUS (i32, LE)                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use encdec::{DecodeOwned, Encode};
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::ApduError;

/// Transaction parser outcome
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    EnumString,
    Display,
    IntoStaticStr,
    EnumIter,
    TryFromPrimitive,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ParserStatus {
    ParsingOk = 1,
    InvalidLengthError = -1,
    VersionParsingError = -2,
    VersionValueError = -3,
    NonceParsingError = -4,
    SystemFeeParsingError = -5,
    SystemFeeValueError = -6,
    NetworkFeeParsingError = -7,
    NetworkFeeValueError = -8,
    ValidUntilBlockParsingError = -9,
    SignerLengthParsingError = -10,
    SignerLengthValueError = -11,
    SignerAccountParsingError = -12,
    SignerAccountDuplicateError = -13,
    SignerScopeParsingError = -14,
    SignerScopeValueErrorGlobalFlag = -15,
    SignerAllowedContractsLengthParsingError = -16,
    SignerAllowedContractsLengthValueError = -17,
    SignerAllowedContractParsingError = -18,
    SignerAllowedGroupsLengthParsingError = -19,
    SignerAllowedGroupsLengthValueError = -20,
    SignerAllowedGroupsParsingError = -21,
    AttributesLengthParsingError = -22,
    AttributesLengthValueError = -23,
    AttributesUnsupportedType = -24,
    AttributesDuplicateType = -25,
    ScriptLengthParsingError = -26,
    ScriptLengthValueError = -27,
    SignerScopeGroupsNotAllowedError = -28,
    SignerScopeContractsNotAllowedError = -29,
    /// Scope carries bits this parser does not handle (including witness rules)
    SignerScopeUnsupportedFlagError = -30,
    /// Attribute type tag missing
    AttributeTypeParsingError = -31,
}

impl ParserStatus {
    /// Check whether this status indicates a successful parse
    pub fn is_ok(&self) -> bool {
        *self == ParserStatus::ParsingOk
    }

    /// Fetch the wire value for this status
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl Encode for ParserStatus {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[..4].copy_from_slice(&self.code().to_le_bytes());

        Ok(4)
    }
}

impl DecodeOwned for ParserStatus {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let v = i32::from_le_bytes([buff[0], buff[1], buff[2], buff[3]]);

        match Self::try_from(v) {
            Ok(s) => Ok((s, 4)),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}
