// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Neo N3 hardware wallet core
//!
//! This provides a common [Engine][engine] supporting streaming transaction validation
//! and signing for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_neo_apdu] for APDU objects and wire encodings, and [dispatch] for a reference
//! APDU handler wiring these together.
//!
//! ## Operations
//!
//! Application information may be requested at any time via
//! [`AppNameReq`][ledger_neo_apdu::app_info::AppNameReq],
//! [`VersionReq`][ledger_neo_apdu::app_info::VersionReq] or the dashboard
//! [`AppAndVersionReq`][ledger_neo_apdu::app_info::AppAndVersionReq].
//!
//! ### Requesting public keys
//!
//! The uncompressed secp256r1 public key for a BIP44 path can be requested via
//! [`PublicKeyReq`][ledger_neo_apdu::public_key::PublicKeyReq], returning a
//! [`PublicKeyResp`][ledger_neo_apdu::public_key::PublicKeyResp]. No user approval is required.
//!
//! ### Signing a transaction
//!
//! 1. Issue [`SignTxIdentity`][ledger_neo_apdu::sign_tx::SignTxIdentity] with sequence `0` to start a session,
//!    any prior session is discarded
//! 2. Where the identity did not include the network magic, issue
//!    [`SignTxMagic`][ledger_neo_apdu::sign_tx::SignTxMagic] with sequence `1`
//! 3. Stream the unsigned transaction via [`SignTxChunk`][ledger_neo_apdu::sign_tx::SignTxChunk]s with
//!    incrementing sequence numbers, each validated by the [`TxParser`][tx::TxParser] as it arrives
//! 4. Following the final chunk the engine awaits user confirmation, on approval the final chunk is
//!    answered with a [`SignTxResp`][ledger_neo_apdu::sign_tx::SignTxResp] containing a DER encoded
//!    signature over `magic || sha256(unsigned_tx)`
//!
//! Validation failures are reported with a
//! [`TxParsingFail`][ledger_neo_apdu::status::StatusWord::TxParsingFail] status carrying the
//! [`ParserStatus`][ledger_neo_apdu::parser_status::ParserStatus] of the violated rule, and discard
//! the session.
//!

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub use ledger_neo_apdu::{self as apdu};

pub mod consts;

pub mod dispatch;

pub mod engine;

pub mod helpers;

pub mod review;

pub mod settings;

pub mod tx;
