// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Host-side Neo N3 transaction builder and serialiser
//!

use sha2::{Digest, Sha256};

use crate::script::{arbitrary_call, transfer_script, vote_script, NEO_HASH};

/// Default signer account for scripts without an obvious sender
pub const DEFAULT_ACCOUNT: [u8; 20] = [
    0x54, 0xa6, 0x4c, 0xac, 0x1b, 0x10, 0x73, 0xe6, 0x62, 0x93, 0x3e, 0xf3, 0xe3, 0x0b, 0x00, 0x7c,
    0xd9, 0x8d, 0x67, 0xd7,
];

/// Witness scope flags
pub mod scope {
    pub const NONE: u8 = 0x00;
    pub const CALLED_BY_ENTRY: u8 = 0x01;
    pub const CUSTOM_CONTRACTS: u8 = 0x10;
    pub const CUSTOM_GROUPS: u8 = 0x20;
    pub const WITNESS_RULES: u8 = 0x40;
    pub const GLOBAL: u8 = 0x80;
}

/// Transaction signer
///
/// `scope` is raw so invalid combinations may be serialised.
#[derive(Clone, PartialEq, Debug)]
pub struct Signer {
    pub account: [u8; 20],
    pub scope: u8,
    pub allowed_contracts: Vec<[u8; 20]>,
    pub allowed_groups: Vec<[u8; 33]>,
}

impl Signer {
    pub fn called_by_entry(account: &[u8; 20]) -> Self {
        Self {
            account: *account,
            scope: scope::CALLED_BY_ENTRY,
            allowed_contracts: vec![],
            allowed_groups: vec![],
        }
    }

    pub fn global(account: &[u8; 20]) -> Self {
        Self {
            scope: scope::GLOBAL,
            ..Self::called_by_entry(account)
        }
    }

    fn serialize(&self, buff: &mut Vec<u8>) {
        buff.extend_from_slice(&self.account);
        buff.push(self.scope);

        if self.scope & scope::CUSTOM_CONTRACTS != 0 {
            write_varint(buff, self.allowed_contracts.len() as u64);
            for c in &self.allowed_contracts {
                buff.extend_from_slice(c);
            }
        }

        if self.scope & scope::CUSTOM_GROUPS != 0 {
            write_varint(buff, self.allowed_groups.len() as u64);
            for g in &self.allowed_groups {
                buff.extend_from_slice(g);
            }
        }
    }
}

/// Transaction attributes
#[derive(Clone, PartialEq, Debug)]
pub enum Attribute {
    HighPriority,
    OracleResponse { id: u64, code: u8, result: Vec<u8> },
    NotValidBefore(u32),
    Conflicts([u8; 32]),
    NotaryAssisted(u8),
}

impl Attribute {
    pub fn kind(&self) -> u8 {
        match self {
            Attribute::HighPriority => 0x01,
            Attribute::OracleResponse { .. } => 0x11,
            Attribute::NotValidBefore(_) => 0x20,
            Attribute::Conflicts(_) => 0x21,
            Attribute::NotaryAssisted(_) => 0x22,
        }
    }

    fn serialize(&self, buff: &mut Vec<u8>) {
        buff.push(self.kind());

        match self {
            Attribute::HighPriority => (),
            Attribute::OracleResponse { id, code, result } => {
                buff.extend_from_slice(&id.to_le_bytes());
                buff.push(*code);
                write_varint(buff, result.len() as u64);
                buff.extend_from_slice(result);
            }
            Attribute::NotValidBefore(h) => buff.extend_from_slice(&h.to_le_bytes()),
            Attribute::Conflicts(h) => buff.extend_from_slice(h),
            Attribute::NotaryAssisted(n) => buff.push(*n),
        }
    }
}

/// Neo N3 transaction (unsigned)
#[derive(Clone, PartialEq, Debug)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<Attribute>,
    pub script: Vec<u8>,
}

impl Transaction {
    /// Create a transaction for the provided script with a single signer
    pub fn new(script: Vec<u8>, signer: Signer) -> Self {
        Self {
            version: 0,
            nonce: 0,
            system_fee: 0,
            network_fee: 0,
            valid_until_block: 0,
            signers: vec![signer],
            attributes: vec![],
            script,
        }
    }

    /// NEP-17 transfer signed by the sender
    pub fn transfer(hash: &[u8; 20], from: &[u8; 20], to: &[u8; 20], amount: i64) -> Self {
        Self::new(
            transfer_script(hash, from, to, amount),
            Signer::called_by_entry(from),
        )
    }

    /// NEO vote signed by the voting account
    pub fn vote(account: &[u8; 20], to: Option<&[u8; 33]>) -> Self {
        Self::new(vote_script(account, to), Signer::called_by_entry(account))
    }

    /// Raw script signed by [`DEFAULT_ACCOUNT`]
    pub fn arbitrary(script: &[u8]) -> Self {
        Self::new(script.to_vec(), Signer::called_by_entry(&DEFAULT_ACCOUNT))
    }

    /// Call to an unrecognised NEO method
    pub fn arbitrary_call(method: &str) -> Self {
        Self::arbitrary(&arbitrary_call(&NEO_HASH, method))
    }

    pub fn nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn fees(mut self, system_fee: i64, network_fee: i64) -> Self {
        self.system_fee = system_fee;
        self.network_fee = network_fee;
        self
    }

    pub fn valid_until_block(mut self, height: u32) -> Self {
        self.valid_until_block = height;
        self
    }

    pub fn attribute(mut self, a: Attribute) -> Self {
        self.attributes.push(a);
        self
    }

    pub fn signers(mut self, signers: &[Signer]) -> Self {
        self.signers = signers.to_vec();
        self
    }

    /// Serialise the unsigned transaction (everything but witnesses)
    pub fn serialize_unsigned(&self) -> Vec<u8> {
        let mut buff = Vec::with_capacity(64 + self.script.len());

        buff.push(self.version);
        buff.extend_from_slice(&self.nonce.to_le_bytes());
        buff.extend_from_slice(&self.system_fee.to_le_bytes());
        buff.extend_from_slice(&self.network_fee.to_le_bytes());
        buff.extend_from_slice(&self.valid_until_block.to_le_bytes());

        write_varint(&mut buff, self.signers.len() as u64);
        for s in &self.signers {
            s.serialize(&mut buff);
        }

        write_varint(&mut buff, self.attributes.len() as u64);
        for a in &self.attributes {
            a.serialize(&mut buff);
        }

        write_varint(&mut buff, self.script.len() as u64);
        buff.extend_from_slice(&self.script);

        buff
    }

    /// Serialise the transaction with a single witness
    pub fn serialize_with_witness(&self, invocation: &[u8], verification: &[u8]) -> Vec<u8> {
        let mut buff = self.serialize_unsigned();

        write_varint(&mut buff, 1);
        write_varint(&mut buff, invocation.len() as u64);
        buff.extend_from_slice(invocation);
        write_varint(&mut buff, verification.len() as u64);
        buff.extend_from_slice(verification);

        buff
    }

    /// SHA256 of the unsigned transaction
    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.serialize_unsigned()).into()
    }

    /// Message signed by the wallet, `magic_le || sha256(unsigned_tx)`
    pub fn sign_data(&self, magic: u32) -> Vec<u8> {
        let mut d = magic.to_le_bytes().to_vec();
        d.extend_from_slice(&self.hash());
        d
    }
}

/// Write a variable length integer in the canonical form
pub fn write_varint(buff: &mut Vec<u8>, v: u64) {
    match v {
        0..=0xfc => buff.push(v as u8),
        0xfd..=0xffff => {
            buff.push(0xfd);
            buff.extend_from_slice(&(v as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buff.push(0xfe);
            buff.extend_from_slice(&(v as u32).to_le_bytes());
        }
        _ => {
            buff.push(0xff);
            buff.extend_from_slice(&v.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn varints() {
        let tests: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (0xfc, &[0xfc]),
            (0xfd, &[0xfd, 0xfd, 0x00]),
            (0xffff, &[0xfd, 0xff, 0xff]),
            (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (
                0x1_0000_0000,
                &[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
            ),
        ];

        for (v, expected) in tests {
            let mut b = vec![];
            write_varint(&mut b, *v);
            assert_eq!(&b, expected, "varint {v}");
        }
    }

    #[test]
    fn unsigned_layout() {
        let tx = Transaction::arbitrary(&[0x40])
            .nonce(0x01020304)
            .fees(5, 6)
            .valid_until_block(7)
            .attribute(Attribute::HighPriority);

        let b = tx.serialize_unsigned();

        assert_eq!(b[0], 0);
        assert_eq!(&b[1..5], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&b[5..13], &5i64.to_le_bytes());
        assert_eq!(&b[13..21], &6i64.to_le_bytes());
        assert_eq!(&b[21..25], &7u32.to_le_bytes());
        assert_eq!(b[25], 1);
        assert_eq!(&b[26..46], &DEFAULT_ACCOUNT);
        assert_eq!(&b[46..], &[0x01, 0x01, 0x01, 0x01, 0x40]);
    }

    #[test]
    fn custom_signer_layout() {
        let s = Signer {
            account: [0x11; 20],
            scope: scope::CUSTOM_CONTRACTS | scope::CUSTOM_GROUPS,
            allowed_contracts: vec![[0x22; 20]],
            allowed_groups: vec![[0x03; 33]],
        };

        let mut b = vec![];
        s.serialize(&mut b);

        assert_eq!(b.len(), 20 + 1 + 1 + 20 + 1 + 33);
        assert_eq!(b[20], 0x30);
        assert_eq!(b[21], 1);
        assert_eq!(b[42], 1);
    }
}
