// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu::{parser_status::ParserStatus, status::StatusWord};

/// [Engine][super::Engine] errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Invalid argument length
    #[cfg_attr(feature = "thiserror", error("Invalid argument length"))]
    InvalidLength = 0x00,

    /// Unexpected event
    #[cfg_attr(feature = "thiserror", error("Unexpected event"))]
    UnexpectedEvent = 0x01,

    /// Unsupported APDU class
    #[cfg_attr(feature = "thiserror", error("Unsupported class"))]
    ClaNotSupported = 0x02,

    /// Signing error
    #[cfg_attr(feature = "thiserror", error("Signing error"))]
    SignError = 0x03,

    /// Unsupported APDU instruction
    #[cfg_attr(feature = "thiserror", error("Unsupported instruction"))]
    InsNotSupported = 0x04,

    /// Invalid P1 / P2 parameters
    #[cfg_attr(feature = "thiserror", error("Invalid P1 / P2"))]
    WrongP1P2 = 0x05,

    /// Network magic missing or malformed
    #[cfg_attr(feature = "thiserror", error("invalid network magic"))]
    InvalidMagic = 0x06,

    /// Transaction rejected by the validator
    #[cfg_attr(feature = "thiserror", error("transaction parsing failed: {0}"))]
    TxParsing(ParserStatus) = 0x07,

    /// Transaction denied by the user
    #[cfg_attr(feature = "thiserror", error("transaction denied"))]
    Denied = 0x08,

    /// Key derivation failed
    #[cfg_attr(feature = "thiserror", error("invalid secp256r1 key"))]
    InvalidKey = 0x09,

    /// Invalid engine state
    #[cfg_attr(feature = "thiserror", error("invalid engine state"))]
    InvalidState = 0x0a,

    /// Message encoding failed
    #[cfg_attr(feature = "thiserror", error("message encoding failed"))]
    EncodingFailed = 0x0b,

    /// BIP44 purpose is not 44'
    #[cfg_attr(feature = "thiserror", error("invalid BIP44 purpose"))]
    Bip44BadPurpose = 0x10,

    /// BIP44 coin type is not 888'
    #[cfg_attr(feature = "thiserror", error("invalid BIP44 coin type"))]
    Bip44BadCoinType = 0x11,

    /// BIP44 account not hardened
    #[cfg_attr(feature = "thiserror", error("BIP44 account not hardened"))]
    Bip44AccountNotHardened = 0x12,

    /// BIP44 account out of range
    #[cfg_attr(feature = "thiserror", error("invalid BIP44 account"))]
    Bip44BadAccount = 0x13,

    /// BIP44 change not 0 or 1
    #[cfg_attr(feature = "thiserror", error("invalid BIP44 change"))]
    Bip44BadChange = 0x14,

    /// BIP44 address index out of range
    #[cfg_attr(feature = "thiserror", error("invalid BIP44 address index"))]
    Bip44BadAddress = 0x15,

    /// Address could not be rendered for review
    #[cfg_attr(feature = "thiserror", error("failed to display address"))]
    DisplayAddressFail = 0x20,

    /// Amount could not be rendered for review
    #[cfg_attr(feature = "thiserror", error("failed to display amount"))]
    DisplayAmountFail = 0x21,

    /// System fee could not be rendered for review
    #[cfg_attr(feature = "thiserror", error("failed to display system fee"))]
    DisplaySystemFeeFail = 0x22,

    /// Network fee could not be rendered for review
    #[cfg_attr(feature = "thiserror", error("failed to display network fee"))]
    DisplayNetworkFeeFail = 0x23,
}

impl Error {
    /// Fetch the response status word for an error
    pub fn status(&self) -> StatusWord {
        use Error::*;

        match self {
            InvalidLength => StatusWord::WrongDataLength,
            UnexpectedEvent | InvalidState => StatusWord::BadState,
            ClaNotSupported => StatusWord::ClaNotSupported,
            InsNotSupported => StatusWord::InsNotSupported,
            WrongP1P2 => StatusWord::WrongP1P2,
            InvalidMagic => StatusWord::MagicParsingFail,
            TxParsing(_) => StatusWord::TxParsingFail,
            Denied => StatusWord::Deny,
            SignError | InvalidKey => StatusWord::SignFail,
            EncodingFailed => StatusWord::WrongResponseLength,
            Bip44BadPurpose => StatusWord::Bip44BadPurpose,
            Bip44BadCoinType => StatusWord::Bip44BadCoinType,
            Bip44AccountNotHardened => StatusWord::Bip44AccountNotHardened,
            Bip44BadAccount => StatusWord::Bip44BadAccount,
            Bip44BadChange => StatusWord::Bip44BadChange,
            Bip44BadAddress => StatusWord::Bip44BadAddress,
            DisplayAddressFail => StatusWord::DisplayAddressFail,
            DisplayAmountFail => StatusWord::DisplayAmountFail,
            DisplaySystemFeeFail => StatusWord::DisplaySystemFeeFail,
            DisplayNetworkFeeFail => StatusWord::DisplayNetworkFeeFail,
        }
    }

    /// Encode the error payload (the [`ParserStatus`] for parsing failures, otherwise empty)
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Error::TxParsing(s) => s.encode(buff),
            _ => Ok(0),
        }
    }
}

impl From<Error> for StatusWord {
    fn from(e: Error) -> Self {
        e.status()
    }
}

impl From<ParserStatus> for Error {
    fn from(s: ParserStatus) -> Self {
        Error::TxParsing(s)
    }
}
