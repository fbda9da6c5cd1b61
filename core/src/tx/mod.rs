// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Neo N3 transaction model and streaming validation
//!
//! The unsigned transaction is received as a sequence of chunks and
//! validated field by field by the [`TxParser`], producing a [`TxSummary`]
//! once the script has been consumed.
//!
//! ## Encoding
//!
//! ```text
//! version         u8          must be 0
//! nonce           u32 LE
//! system_fee      i64 LE      non-negative
//! network_fee     i64 LE      non-negative
//! valid_until     u32 LE
//! signers         varint n    1..=2 x Signer
//! attributes      varint n    0..=2 x Attribute
//! script          varint n    n > 0 bytes
//! ```

use bitflags::bitflags;
use heapless::Vec;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter};

mod buffer;
pub use buffer::{ChunkBuffer, ReadError, BUFFER_CAPACITY, MAX_FIELD_LEN};

mod parser;
pub use parser::{ParseState, Progress, TxParser};

mod script;
pub use script::{ScriptKind, Token, GAS_HASH, NEO_HASH, SCRIPT_PREFIX_LEN};

/// Supported transaction version
pub const TX_VERSION: u8 = 0;

/// Maximum number of signers per transaction
pub const MAX_SIGNERS: usize = 2;

/// Maximum number of allowed contracts per signer
pub const MAX_ALLOWED_CONTRACTS: usize = 16;

/// Maximum number of allowed groups per signer
pub const MAX_ALLOWED_GROUPS: usize = 2;

/// Maximum number of transaction attributes
pub const MAX_ATTRIBUTES: usize = 2;

/// Script hash length
pub const UINT160_LEN: usize = 20;

/// Compressed public key length
pub const ECPOINT_LEN: usize = 33;

/// Script hash (account or contract)
pub type UInt160 = [u8; UINT160_LEN];

/// Compressed secp256r1 public key
pub type EcPoint = [u8; ECPOINT_LEN];

bitflags! {
    /// Signer witness scope
    pub struct WitnessScope: u8 {
        /// Witness only valid for the entry script
        const CALLED_BY_ENTRY = 0x01;
        /// Witness valid for listed contracts
        const CUSTOM_CONTRACTS = 0x10;
        /// Witness valid for contracts in listed groups
        const CUSTOM_GROUPS = 0x20;
        /// Witness rules (not supported)
        const WITNESS_RULES = 0x40;
        /// Witness valid everywhere
        const GLOBAL = 0x80;
    }
}

impl Default for WitnessScope {
    fn default() -> Self {
        WitnessScope::empty()
    }
}

/// Transaction attribute types
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum AttributeType {
    HighPriority = 0x01,
    OracleResponse = 0x11,
    NotValidBefore = 0x20,
    Conflicts = 0x21,
    NotaryAssisted = 0x22,
}

impl AttributeType {
    /// Whether this attribute may be signed
    pub fn is_supported(&self) -> bool {
        matches!(self, AttributeType::HighPriority)
    }
}

/// Validated transaction signer
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Signer {
    pub account: UInt160,
    pub scope: WitnessScope,
    pub allowed_contracts: Vec<UInt160, MAX_ALLOWED_CONTRACTS>,
    pub allowed_groups: Vec<EcPoint, MAX_ALLOWED_GROUPS>,
}

impl Signer {
    pub fn new(account: UInt160) -> Self {
        Self {
            account,
            ..Default::default()
        }
    }
}

/// Validated transaction summary, populated as each field passes validation
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TxSummary {
    pub version: u8,
    pub nonce: u32,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer, MAX_SIGNERS>,
    pub attributes: Vec<AttributeType, MAX_ATTRIBUTES>,
    pub script_len: usize,
    pub script: ScriptKind,
    /// SHA-256 over the unsigned transaction
    pub digest: [u8; 32],
}

impl TxSummary {
    /// Sum of system and network fees, both non-negative once validated
    pub fn total_fees(&self) -> u64 {
        (self.system_fee as u64).saturating_add(self.network_fee as u64)
    }
}
