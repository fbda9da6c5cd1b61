// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

use crate::{
    apdu::path::Bip44Path,
    tx::{Progress, TxParser, TxSummary},
};

use super::Error;

/// Signing session, created by an identity message and discarded on
/// completion, failure, or replacement by a new identity
#[derive(Clone, Debug)]
pub struct Session {
    path: Bip44Path,
    magic: Option<u32>,
    seq: u8,
    parser: TxParser,
}

impl Session {
    /// Create a new session with the provided path and optional network magic
    pub fn new(path: Bip44Path, magic: Option<u32>) -> Self {
        Self {
            path,
            magic,
            seq: 0,
            parser: TxParser::new(),
        }
    }

    pub fn path(&self) -> &Bip44Path {
        &self.path
    }

    pub fn magic(&self) -> Option<u32> {
        self.magic
    }

    /// Sequence number of the last accepted message
    pub fn seq(&self) -> u8 {
        self.seq
    }

    /// Validated summary, once parsing is complete
    pub fn summary(&self) -> Option<&TxSummary> {
        self.parser.summary()
    }

    /// Check and advance the message sequence number
    pub fn next_seq(&mut self, seq: u8) -> Result<(), Error> {
        match self.seq.checked_add(1) {
            Some(n) if n == seq => {
                self.seq = n;
                Ok(())
            }
            _ => Err(Error::UnexpectedEvent),
        }
    }

    /// Set the network magic
    pub fn set_magic(&mut self, magic: u32) {
        self.magic = Some(magic);
    }

    /// Feed a transaction chunk to the parser
    pub fn feed(&mut self, data: &[u8], last: bool) -> Result<Progress, Error> {
        self.parser.feed(data, last).map_err(Error::TxParsing)
    }
}
