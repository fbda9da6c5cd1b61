// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Protocol / APDU definitions for Neo N3 app communication
//!
//! This module provides a protocol specification and reference implementation for communication
//! with Neo N3 hardware wallets.
//!
//! Commands use class [`NEO_APDU_CLA`] with the [`Instruction`] codes below, the only exception
//! being the dashboard [`AppAndVersionReq`][app_info::AppAndVersionReq] which uses [`BOLOS_APDU_CLA`].
//!
//! Transactions are too large for a single APDU so are streamed to the device via a
//! sequence of [`sign_tx`] messages, with P1 carrying a sequence index and P2 a continuation
//! flag. Transaction bytes use the Neo N3 wire encoding (little-endian), derivation paths
//! are big-endian per the usual ledger convention.
//!

#![no_std]

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter};

pub use ledger_proto::{ApduError, ApduStatic};

pub mod app_info;
pub mod header;
pub mod parser_status;
pub mod path;
pub mod prelude;
pub mod public_key;
pub mod sign_tx;
pub mod status;

/// Neo N3 APDU Class
pub const NEO_APDU_CLA: u8 = 0x80;

/// Dashboard (BOLOS) APDU class, used for application name / version queries
pub const BOLOS_APDU_CLA: u8 = 0xb0;

/// Maximum payload length for a single command APDU
pub const MAX_APDU_DATA: usize = 255;

/// Neo N3 APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Display, EnumIter)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch application name
    GetAppName = 0x00,

    /// Fetch application version (MAJOR, MINOR, PATCH)
    GetVersion = 0x01,

    /// Sign a transaction, streamed over multiple APDUs
    SignTx = 0x02,

    /// Fetch the public key for a BIP44 path
    GetPublicKey = 0x04,
}

/// Dashboard instruction for fetching application name and version
pub const BOLOS_INS_GET_APP_AND_VERSION: u8 = 0x01;
