// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Streaming transaction validator
//!
//! The parser advances through a strictly ordered set of [`ParseState`]s,
//! each consuming one fixed or length-prefixed unit from the
//! [`ChunkBuffer`]. Reads that run short of data suspend the parser until
//! the next chunk, any violation moves the parser to a terminal
//! [`ParseState::Failed`] state carrying the [`ParserStatus`].

use heapless::Vec;
use strum::Display;

use crate::apdu::parser_status::ParserStatus;

use super::{
    AttributeType, ChunkBuffer, EcPoint, ReadError, ScriptKind, Signer, TxSummary, UInt160,
    WitnessScope, MAX_ALLOWED_CONTRACTS, MAX_ALLOWED_GROUPS, MAX_ATTRIBUTES, MAX_SIGNERS,
    SCRIPT_PREFIX_LEN, TX_VERSION,
};

/// Parser states, one per transaction field
#[derive(Copy, Clone, PartialEq, Debug, Display)]
pub enum ParseState {
    Version,
    Nonce,
    SystemFee,
    NetworkFee,
    ValidUntilBlock,
    SignerCount,
    SignerAccount { signers: u8 },
    SignerScope { signers: u8 },
    ContractCount { signers: u8 },
    Contract { signers: u8, contracts: u8 },
    GroupCount { signers: u8 },
    Group { signers: u8, groups: u8 },
    AttributeCount,
    Attribute { attributes: u8 },
    ScriptLength,
    Script { remaining: u64 },
    Done,
    Failed(ParserStatus),
}

impl ParseState {
    /// Status reported where this field is truncated or malformed
    pub fn parse_error(&self) -> ParserStatus {
        use ParseState::*;

        match self {
            Version => ParserStatus::VersionParsingError,
            Nonce => ParserStatus::NonceParsingError,
            SystemFee => ParserStatus::SystemFeeParsingError,
            NetworkFee => ParserStatus::NetworkFeeParsingError,
            ValidUntilBlock => ParserStatus::ValidUntilBlockParsingError,
            SignerCount => ParserStatus::SignerLengthParsingError,
            SignerAccount { .. } => ParserStatus::SignerAccountParsingError,
            SignerScope { .. } => ParserStatus::SignerScopeParsingError,
            ContractCount { .. } => ParserStatus::SignerAllowedContractsLengthParsingError,
            Contract { .. } => ParserStatus::SignerAllowedContractParsingError,
            GroupCount { .. } => ParserStatus::SignerAllowedGroupsLengthParsingError,
            // Groups share the contract entry code
            Group { .. } => ParserStatus::SignerAllowedContractParsingError,
            AttributeCount => ParserStatus::AttributesLengthParsingError,
            Attribute { .. } => ParserStatus::AttributeTypeParsingError,
            ScriptLength => ParserStatus::ScriptLengthParsingError,
            Script { .. } => ParserStatus::ScriptLengthValueError,
            Done => ParserStatus::InvalidLengthError,
            Failed(s) => *s,
        }
    }
}

/// Parser progress following a chunk
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Progress {
    /// More chunks expected
    Pending,
    /// Transaction validated and final chunk received
    Complete,
}

/// Internal step failures
enum Fault {
    Read(ReadError),
    Invalid(ParserStatus),
}

impl From<ReadError> for Fault {
    fn from(e: ReadError) -> Self {
        Fault::Read(e)
    }
}

impl From<ParserStatus> for Fault {
    fn from(s: ParserStatus) -> Self {
        Fault::Invalid(s)
    }
}

/// Streaming transaction parser
#[derive(Clone, Debug)]
pub struct TxParser {
    state: ParseState,
    buff: ChunkBuffer,
    summary: TxSummary,
    script: Vec<u8, SCRIPT_PREFIX_LEN>,
}

impl Default for TxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TxParser {
    /// Create a new parser awaiting the transaction version
    pub fn new() -> Self {
        Self {
            state: ParseState::Version,
            buff: ChunkBuffer::new(),
            summary: TxSummary::default(),
            script: Vec::new(),
        }
    }

    /// Fetch current parser state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Fetch the validated summary once parsing is complete
    pub fn summary(&self) -> Option<&TxSummary> {
        match self.state {
            ParseState::Done => Some(&self.summary),
            _ => None,
        }
    }

    /// Feed a transaction chunk, validating all complete fields
    ///
    /// Bytes following the script are discarded and not hashed.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn feed(&mut self, chunk: &[u8], is_last: bool) -> Result<Progress, ParserStatus> {
        if let ParseState::Failed(s) = self.state {
            return Err(s);
        }

        if self.buff.feed(chunk, is_last).is_err() {
            return Err(self.fail(ParserStatus::InvalidLengthError));
        }

        loop {
            if self.state == ParseState::Done {
                let _n = self.buff.discard();

                #[cfg(feature = "log")]
                if _n > 0 {
                    log::debug!("discarding {} trailing bytes", _n);
                }

                return match is_last {
                    true => Ok(Progress::Complete),
                    false => Ok(Progress::Pending),
                };
            }

            match self.step() {
                Ok(next) => self.state = next,
                Err(Fault::Read(ReadError::NeedMoreData)) => return Ok(Progress::Pending),
                Err(Fault::Read(ReadError::Overflow)) => {
                    return Err(self.fail(ParserStatus::InvalidLengthError))
                }
                Err(Fault::Read(_)) => {
                    let s = self.state.parse_error();
                    return Err(self.fail(s));
                }
                Err(Fault::Invalid(s)) => return Err(self.fail(s)),
            }
        }
    }

    fn fail(&mut self, s: ParserStatus) -> ParserStatus {
        #[cfg(feature = "log")]
        log::warn!(
            "parse failed in state {:?} at offset {}: {}",
            self.state,
            self.buff.consumed(),
            s
        );

        self.state = ParseState::Failed(s);
        s
    }

    /// Consume a single field, returning the following state
    fn step(&mut self) -> Result<ParseState, Fault> {
        use ParseState::*;

        let next = match self.state {
            Version => {
                let v = self.buff.read_u8()?;
                if v != TX_VERSION {
                    return Err(ParserStatus::VersionValueError.into());
                }
                self.summary.version = v;
                Nonce
            }
            Nonce => {
                self.summary.nonce = self.buff.read_u32()?;
                SystemFee
            }
            SystemFee => {
                let v = self.buff.read_i64()?;
                if v < 0 {
                    return Err(ParserStatus::SystemFeeValueError.into());
                }
                self.summary.system_fee = v;
                NetworkFee
            }
            NetworkFee => {
                let v = self.buff.read_i64()?;
                if v < 0 {
                    return Err(ParserStatus::NetworkFeeValueError.into());
                }
                self.summary.network_fee = v;
                ValidUntilBlock
            }
            ValidUntilBlock => {
                self.summary.valid_until_block = self.buff.read_u32()?;
                SignerCount
            }
            SignerCount => {
                let n = self.buff.read_varint()?;
                if n == 0 || n > MAX_SIGNERS as u64 {
                    return Err(ParserStatus::SignerLengthValueError.into());
                }
                SignerAccount { signers: n as u8 }
            }
            SignerAccount { signers } => {
                let account: UInt160 = self.buff.read_array()?;
                if self.summary.signers.iter().any(|s| s.account == account) {
                    return Err(ParserStatus::SignerAccountDuplicateError.into());
                }
                self.summary
                    .signers
                    .push(Signer::new(account))
                    .map_err(|_| ParserStatus::SignerLengthValueError)?;
                SignerScope { signers }
            }
            SignerScope { signers } => {
                let raw = self.buff.read_u8()?;
                let scope = parse_scope(raw)?;
                self.signer()?.scope = scope;

                if scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
                    self.enter_contracts(signers)?
                } else if scope.contains(WitnessScope::CUSTOM_GROUPS) {
                    self.enter_groups(signers)?
                } else {
                    self.next_signer(signers)
                }
            }
            ContractCount { signers } => {
                let n = self.buff.read_varint()?;
                if n == 0 || n > MAX_ALLOWED_CONTRACTS as u64 {
                    return Err(ParserStatus::SignerAllowedContractsLengthValueError.into());
                }
                Contract {
                    signers,
                    contracts: n as u8,
                }
            }
            Contract { signers, contracts } => {
                let c: UInt160 = self.buff.read_array()?;
                let s = self.signer()?;
                s.allowed_contracts
                    .push(c)
                    .map_err(|_| ParserStatus::SignerAllowedContractsLengthValueError)?;

                if s.allowed_contracts.len() < contracts as usize {
                    Contract { signers, contracts }
                } else if s.scope.contains(WitnessScope::CUSTOM_GROUPS) {
                    self.enter_groups(signers)?
                } else {
                    self.next_signer(signers)
                }
            }
            GroupCount { signers } => {
                let n = self.buff.read_varint()?;
                if n == 0 || n > MAX_ALLOWED_GROUPS as u64 {
                    return Err(ParserStatus::SignerAllowedGroupsLengthValueError.into());
                }
                Group {
                    signers,
                    groups: n as u8,
                }
            }
            Group { signers, groups } => {
                let g: EcPoint = self.buff.read_array()?;
                if g[0] != 0x02 && g[0] != 0x03 {
                    return Err(ParserStatus::SignerAllowedGroupsParsingError.into());
                }
                let s = self.signer()?;
                s.allowed_groups
                    .push(g)
                    .map_err(|_| ParserStatus::SignerAllowedGroupsLengthValueError)?;

                if s.allowed_groups.len() < groups as usize {
                    Group { signers, groups }
                } else {
                    self.next_signer(signers)
                }
            }
            AttributeCount => {
                let n = self.buff.read_varint()?;
                if n > MAX_ATTRIBUTES as u64 {
                    return Err(ParserStatus::AttributesLengthValueError.into());
                }
                match n {
                    0 => ScriptLength,
                    _ => Attribute {
                        attributes: n as u8,
                    },
                }
            }
            Attribute { attributes } => {
                let tag = self.buff.read_u8()?;

                let kind = match AttributeType::try_from(tag) {
                    Ok(k) if k.is_supported() => k,
                    _ => return Err(ParserStatus::AttributesUnsupportedType.into()),
                };
                if self.summary.attributes.contains(&kind) {
                    return Err(ParserStatus::AttributesDuplicateType.into());
                }
                self.summary
                    .attributes
                    .push(kind)
                    .map_err(|_| ParserStatus::AttributesLengthValueError)?;

                match self.summary.attributes.len() < attributes as usize {
                    true => Attribute { attributes },
                    false => ScriptLength,
                }
            }
            ScriptLength => {
                let n = self.buff.read_varint()?;
                if n == 0 {
                    return Err(ParserStatus::ScriptLengthValueError.into());
                }
                self.summary.script_len = usize::try_from(n)
                    .map_err(|_| ParserStatus::ScriptLengthValueError)?;
                Script { remaining: n }
            }
            Script { remaining } => {
                let max = usize::try_from(remaining).unwrap_or(usize::MAX);
                let d = self.buff.read_up_to(max)?;

                // Retain leading bytes for classification
                let keep = d.len().min(self.script.capacity() - self.script.len());
                let _ = self.script.extend_from_slice(&d[..keep]);

                let remaining = remaining - d.len() as u64;
                match remaining {
                    0 => self.complete(),
                    _ => Script { remaining },
                }
            }
            Done => Done,
            Failed(s) => return Err(s.into()),
        };

        Ok(next)
    }

    /// Finalise the summary once the script has been consumed
    fn complete(&mut self) -> ParseState {
        self.summary.script = ScriptKind::classify(&self.script, self.summary.script_len);
        self.summary.digest = self.buff.digest();

        #[cfg(feature = "log")]
        log::debug!(
            "parsed {} byte transaction, script: {:?}",
            self.buff.consumed(),
            self.summary.script
        );

        ParseState::Done
    }

    fn signer(&mut self) -> Result<&mut Signer, Fault> {
        self.summary
            .signers
            .last_mut()
            .ok_or(Fault::Invalid(ParserStatus::SignerLengthValueError))
    }

    fn enter_contracts(&mut self, signers: u8) -> Result<ParseState, Fault> {
        if !self.signer()?.scope.contains(WitnessScope::CUSTOM_CONTRACTS) {
            return Err(ParserStatus::SignerScopeContractsNotAllowedError.into());
        }
        Ok(ParseState::ContractCount { signers })
    }

    fn enter_groups(&mut self, signers: u8) -> Result<ParseState, Fault> {
        if !self.signer()?.scope.contains(WitnessScope::CUSTOM_GROUPS) {
            return Err(ParserStatus::SignerScopeGroupsNotAllowedError.into());
        }
        Ok(ParseState::GroupCount { signers })
    }

    fn next_signer(&self, signers: u8) -> ParseState {
        match self.summary.signers.len() < signers as usize {
            true => ParseState::SignerAccount { signers },
            false => ParseState::AttributeCount,
        }
    }
}

/// Validate a raw witness scope
fn parse_scope(raw: u8) -> Result<WitnessScope, ParserStatus> {
    let global = WitnessScope::GLOBAL.bits();

    // Global must be exclusive
    if raw & global != 0 && raw != global {
        return Err(ParserStatus::SignerScopeValueErrorGlobalFlag);
    }

    match WitnessScope::from_bits(raw) {
        Some(s) if !s.contains(WitnessScope::WITNESS_RULES) => Ok(s),
        _ => Err(ParserStatus::SignerScopeUnsupportedFlagError),
    }
}
