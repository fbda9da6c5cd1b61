// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Neo N3 App Constants

/// App Information
pub const APP_NAME: &str = "NEO N3";
pub const APP_VERSION: &str = "0.3.1";

pub const APP_VERSION_MAJOR: u8 = 0;
pub const APP_VERSION_MINOR: u8 = 3;
pub const APP_VERSION_PATCH: u8 = 1;

/// Network magic for MainNet
pub const NETWORK_MAINNET: u32 = 860_833_102;

/// Network magic for TestNet (T5)
pub const NETWORK_TESTNET: u32 = 894_710_606;

/// Address version byte prefixed to script hashes
pub const ADDRESS_VERSION: u8 = 0x35;

/// Maximum BIP44 account index
pub const MAX_ACCOUNT: u32 = 10;

/// Maximum BIP44 address index
pub const MAX_ADDRESS_INDEX: u32 = 5000;

/// GAS fixed point scalar (8 decimals)
pub const GAS_SCALAR: i64 = 100_000_000;
