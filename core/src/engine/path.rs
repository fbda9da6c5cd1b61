// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! BIP44 path checks for key requests

use crate::{
    apdu::path::{Bip44Path, BIP44_PURPOSE, HARDENED, NEO_COIN_TYPE},
    consts::{MAX_ACCOUNT, MAX_ADDRESS_INDEX},
};

use super::Error;

/// Check a path is a standard Neo path `m/44'/888'/account'/change/address`
/// within the supported account and address ranges
pub fn check_path(path: &Bip44Path) -> Result<(), Error> {
    if path.purpose() != BIP44_PURPOSE | HARDENED {
        return Err(Error::Bip44BadPurpose);
    }

    if path.coin_type() != NEO_COIN_TYPE | HARDENED {
        return Err(Error::Bip44BadCoinType);
    }

    let account = path.account();
    if account & HARDENED == 0 {
        return Err(Error::Bip44AccountNotHardened);
    }
    if account & !HARDENED > MAX_ACCOUNT {
        return Err(Error::Bip44BadAccount);
    }

    if path.change() != 0 && path.change() != 1 {
        return Err(Error::Bip44BadChange);
    }

    if path.address() > MAX_ADDRESS_INDEX {
        return Err(Error::Bip44BadAddress);
    }

    Ok(())
}
