// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Response status words
//!

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Status word returned as the trailing two bytes of every response APDU
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    EnumString,
    Display,
    EnumVariantNames,
    EnumIter,
    TryFromPrimitive,
)]
#[repr(u16)]
pub enum StatusWord {
    /// Success
    Ok = 0x9000,
    /// Rejected by user
    Deny = 0x6985,
    /// Incorrect P1 or P2
    WrongP1P2 = 0x6A86,
    /// Incorrect APDU length
    WrongDataLength = 0x6A87,
    /// Unknown instruction
    InsNotSupported = 0x6D00,
    /// Unknown class
    ClaNotSupported = 0x6E00,
    /// Response does not fit the output buffer
    WrongResponseLength = 0xB000,
    /// Failed to render BIP32 path
    DisplayBip32PathFail = 0xB001,
    /// Failed to render address
    DisplayAddressFail = 0xB002,
    /// Failed to render amount
    DisplayAmountFail = 0xB003,
    /// Transaction exceeds buffer capacity
    WrongTxLength = 0xB004,
    /// Transaction parsing failed, payload carries a [`ParserStatus`][crate::parser_status::ParserStatus]
    TxParsingFail = 0xB005,
    /// Confirmation failed
    TxUserConfirmationFail = 0xB006,
    /// Hashing failed
    TxHashFail = 0xB007,
    /// Message received in the wrong session state
    BadState = 0xB008,
    /// Signing failed
    SignFail = 0xB009,
    /// BIP44 purpose is not 44'
    Bip44BadPurpose = 0xB100,
    /// BIP44 coin type is not 888'
    Bip44BadCoinType = 0xB101,
    /// BIP44 account is not hardened
    Bip44AccountNotHardened = 0xB102,
    /// BIP44 account index out of range
    Bip44BadAccount = 0xB103,
    /// BIP44 change is not 0 or 1
    Bip44BadChange = 0xB104,
    /// BIP44 address index out of range
    Bip44BadAddress = 0xB105,
    /// Network magic could not be parsed
    MagicParsingFail = 0xB106,
    /// Failed to render system fee
    DisplaySystemFeeFail = 0xB107,
    /// Failed to render network fee
    DisplayNetworkFeeFail = 0xB108,
}

impl StatusWord {
    /// Check whether this status indicates success
    pub fn is_ok(&self) -> bool {
        *self == StatusWord::Ok
    }

    /// Encode status word for transmission (big-endian)
    pub fn to_be_bytes(&self) -> [u8; 2] {
        (*self as u16).to_be_bytes()
    }
}

impl From<StatusWord> for u16 {
    fn from(s: StatusWord) -> Self {
        s as u16
    }
}
