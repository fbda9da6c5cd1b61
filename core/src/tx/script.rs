// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Script classification
//!
//! Recognises the NEO / GAS `transfer` and NEO `vote` contract calls as
//! emitted by standard script builders, everything else is treated as an
//! arbitrary script.
//!
//! A contract call pushes its arguments in reverse order, packs them, then
//! pushes the call flags, method name and contract hash before invoking
//! `System.Contract.Call`:
//!
//! ```text
//! <args reversed> PUSH<n> PACK PUSH15 PUSHDATA1 <method> PUSHDATA1 <hash> SYSCALL <0x627d5b52>
//! ```

use strum::{Display, EnumIter};

use super::{EcPoint, UInt160, ECPOINT_LEN, UINT160_LEN};

/// Number of leading script bytes retained for classification
pub const SCRIPT_PREFIX_LEN: usize = 128;

/// NEO token contract hash (serialised byte order)
pub const NEO_HASH: UInt160 = [
    0xf5, 0x63, 0xea, 0x40, 0xbc, 0x28, 0x3d, 0x4d, 0x0e, 0x05, 0xc4, 0x8e, 0xa3, 0x05, 0xb3, 0xf2,
    0xa0, 0x73, 0x40, 0xef,
];

/// GAS token contract hash (serialised byte order)
pub const GAS_HASH: UInt160 = [
    0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01, 0x13, 0x19,
    0xf3, 0xcf, 0xa4, 0xd2,
];

/// `System.Contract.Call` interop hash
const CONTRACT_CALL: [u8; 4] = [0x62, 0x7d, 0x5b, 0x52];

/// Call flags `ALL`
const CALL_FLAGS_ALL: u8 = 0x0f;

/// NeoVM opcodes used by contract calls
mod op {
    pub const PUSHINT8: u8 = 0x00;
    pub const PUSHINT16: u8 = 0x01;
    pub const PUSHINT32: u8 = 0x02;
    pub const PUSHINT64: u8 = 0x03;
    pub const PUSHNULL: u8 = 0x0b;
    pub const PUSHDATA1: u8 = 0x0c;
    pub const PUSH0: u8 = 0x10;
    pub const PUSH16: u8 = 0x20;
    pub const ASSERT: u8 = 0x39;
    pub const SYSCALL: u8 = 0x41;
    pub const PACK: u8 = 0xc0;
}

/// Native tokens recognised in transfers
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter)]
pub enum Token {
    #[strum(serialize = "NEO")]
    Neo,
    #[strum(serialize = "GAS")]
    Gas,
}

impl Token {
    /// Contract hash for the token
    pub fn hash(&self) -> &'static UInt160 {
        match self {
            Token::Neo => &NEO_HASH,
            Token::Gas => &GAS_HASH,
        }
    }

    /// Decimal places for display
    pub fn decimals(&self) -> u32 {
        match self {
            Token::Neo => 0,
            Token::Gas => 8,
        }
    }

    fn from_hash(h: &UInt160) -> Option<Self> {
        if *h == NEO_HASH {
            Some(Token::Neo)
        } else if *h == GAS_HASH {
            Some(Token::Gas)
        } else {
            None
        }
    }
}

/// Classified transaction script
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub enum ScriptKind {
    /// Native token transfer
    Transfer {
        token: Token,
        from: UInt160,
        to: UInt160,
        amount: u64,
    },
    /// NEO vote, `to` is `None` when removing a vote
    Vote {
        account: UInt160,
        to: Option<EcPoint>,
    },
    /// Any other script
    #[default]
    Arbitrary,
}

impl ScriptKind {
    /// Classify a script from its retained prefix and full length
    pub fn classify(prefix: &[u8], script_len: usize) -> Self {
        // Scripts longer than the retained prefix are never standard calls
        if script_len > prefix.len() {
            return ScriptKind::Arbitrary;
        }

        let mut r = Reader { buff: prefix };

        Self::transfer(&mut r.clone())
            .or_else(|| Self::vote(&mut r))
            .unwrap_or(ScriptKind::Arbitrary)
    }

    /// Whether this script requires the arbitrary script setting to be signed
    pub fn is_arbitrary(&self) -> bool {
        matches!(self, ScriptKind::Arbitrary)
    }

    fn transfer(r: &mut Reader) -> Option<Self> {
        // data
        r.expect(op::PUSHNULL)?;
        let amount = r.push_uint()?;
        let to = r.push_data::<UINT160_LEN>()?;
        let from = r.push_data::<UINT160_LEN>()?;

        let (method, hash) = r.call(4)?;
        if method != b"transfer" {
            return None;
        }
        let token = Token::from_hash(&hash)?;

        r.end()?;

        Some(ScriptKind::Transfer {
            token,
            from,
            to,
            amount,
        })
    }

    fn vote(r: &mut Reader) -> Option<Self> {
        let to = match r.peek()? {
            op::PUSHNULL => {
                r.expect(op::PUSHNULL)?;
                None
            }
            _ => Some(r.push_data::<ECPOINT_LEN>()?),
        };
        let account = r.push_data::<UINT160_LEN>()?;

        let (method, hash) = r.call(2)?;
        if method != b"vote" || hash != NEO_HASH {
            return None;
        }

        r.end()?;

        Some(ScriptKind::Vote { account, to })
    }
}

/// Cursor over script bytes, all reads return `None` on mismatch
#[derive(Clone)]
struct Reader<'a> {
    buff: &'a [u8],
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<u8> {
        self.buff.first().copied()
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.buff.len() < n {
            return None;
        }
        let (d, rest) = self.buff.split_at(n);
        self.buff = rest;
        Some(d)
    }

    fn expect(&mut self, b: u8) -> Option<()> {
        match self.take(1)? {
            [v] if *v == b => Some(()),
            _ => None,
        }
    }

    /// Read a `PUSHDATA1` of exactly `N` bytes
    fn push_data<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.expect(op::PUSHDATA1)?;
        self.expect(N as u8)?;

        let mut a = [0u8; N];
        a.copy_from_slice(self.take(N)?);
        Some(a)
    }

    /// Read a short `PUSHDATA1` (method names)
    fn push_str(&mut self) -> Option<&'a [u8]> {
        self.expect(op::PUSHDATA1)?;
        let n = self.take(1)?[0] as usize;
        self.take(n)
    }

    /// Read a non-negative integer push
    fn push_uint(&mut self) -> Option<u64> {
        let code = self.take(1)?[0];

        let width = match code {
            op::PUSH0..=op::PUSH16 => return Some((code - op::PUSH0) as u64),
            op::PUSHINT8 => 1,
            op::PUSHINT16 => 2,
            op::PUSHINT32 => 4,
            op::PUSHINT64 => 8,
            _ => return None,
        };

        let d = self.take(width)?;

        // Two's complement, negative amounts are not transfers
        if d[width - 1] & 0x80 != 0 {
            return None;
        }

        let mut b = [0u8; 8];
        b[..width].copy_from_slice(d);
        Some(u64::from_le_bytes(b))
    }

    /// Read the argument pack and contract call, returning method and contract hash
    fn call(&mut self, num_args: u8) -> Option<(&'a [u8], UInt160)> {
        self.expect(op::PUSH0 + num_args)?;
        self.expect(op::PACK)?;
        self.expect(op::PUSH0 + CALL_FLAGS_ALL)?;

        let method = self.push_str()?;
        let hash = self.push_data::<UINT160_LEN>()?;

        self.expect(op::SYSCALL)?;
        if self.take(4)? != CONTRACT_CALL {
            return None;
        }

        Some((method, hash))
    }

    /// Check the script is complete, allowing a trailing `ASSERT`
    fn end(&mut self) -> Option<()> {
        match self.buff {
            [] | [op::ASSERT] => Some(()),
            _ => None,
        }
    }
}
