// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Formatting helpers for transaction review
//!
//! Each helper writes into a caller provided buffer, returning the rendered
//! string or `None` where the buffer is too small or encoding fails.

use core::str::from_utf8;

use emstr::{helpers::Fractional, EncodeStr};
use crate::{
    consts::{ADDRESS_VERSION, GAS_SCALAR, NETWORK_MAINNET, NETWORK_TESTNET},
    tx::{Token, UInt160},
};

/// Address length following base58 encoding
pub const ADDRESS_LEN: usize = 34;

/// Format a token amount with its symbol, `NEO 10` or `GAS 1.5`
pub fn fmt_token_val(value: i64, token: Token, buff: &mut [u8]) -> Option<&str> {
    // NOTE THAT NAMES STRINGS MUST BE HARDCODED TO AVOID PIC issues with the ledger
    let r = match token {
        Token::Neo => emstr::write!(&mut buff[..], "NEO ", value),
        Token::Gas => emstr::write!(
            &mut buff[..],
            "GAS ",
            Fractional::<i64>::new(value, GAS_SCALAR)
        ),
    };

    let n = r.ok()?;
    from_utf8(&buff[..n]).ok()
}

/// Format a GAS denominated fee
pub fn fmt_gas(value: i64, buff: &mut [u8]) -> Option<&str> {
    fmt_token_val(value, Token::Gas, buff)
}

/// Format a GAS total, which may exceed the range of a single fee
pub fn fmt_gas_total(value: u64, buff: &mut [u8]) -> Option<&str> {
    let n = emstr::write!(
        &mut buff[..],
        "GAS ",
        Fractional::<i128>::new(value as i128, GAS_SCALAR as i128)
    )
    .ok()?;

    from_utf8(&buff[..n]).ok()
}

/// Format a network magic, using names for well known networks
pub fn fmt_network(magic: u32, buff: &mut [u8]) -> Option<&str> {
    let n = match magic {
        NETWORK_MAINNET => emstr::write!(&mut buff[..], "MainNet"),
        NETWORK_TESTNET => emstr::write!(&mut buff[..], "TestNet"),
        _ => emstr::write!(&mut buff[..], magic),
    }
    .ok()?;

    from_utf8(&buff[..n]).ok()
}

/// Format an index as `i of n` (`index` counting from zero)
pub fn fmt_index(index: usize, total: usize, buff: &mut [u8]) -> Option<&str> {
    let n = emstr::write!(&mut buff[..], index + 1, " of ", total).ok()?;
    from_utf8(&buff[..n]).ok()
}

/// Format a titled index as `name i of n` (`index` counting from zero)
pub fn fmt_titled_index<'a>(
    name: &str,
    index: usize,
    total: usize,
    buff: &'a mut [u8],
) -> Option<&'a str> {
    let n = emstr::write!(&mut buff[..], name, ' ', index + 1, " of ", total).ok()?;
    from_utf8(&buff[..n]).ok()
}

/// Format a decimal value
pub fn fmt_u32(value: u32, buff: &mut [u8]) -> Option<&str> {
    let n = emstr::write!(&mut buff[..], value).ok()?;
    from_utf8(&buff[..n]).ok()
}

/// Format bytes as lower case hex
pub fn fmt_hex<'a>(data: &[u8], buff: &'a mut [u8]) -> Option<&'a str> {
    let n = data.len() * 2;
    if buff.len() < n {
        return None;
    }

    hex::encode_to_slice(data, &mut buff[..n]).ok()?;
    from_utf8(&buff[..n]).ok()
}

/// Format a script hash as a base58check address
pub fn fmt_address<'a>(script_hash: &UInt160, buff: &'a mut [u8]) -> Option<&'a str> {
    let n = bs58::encode(script_hash)
        .with_check_version(ADDRESS_VERSION)
        .into(&mut buff[..])
        .ok()?;
    from_utf8(&buff[..n]).ok()
}
