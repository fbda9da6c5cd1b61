// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

use encdec::Encode;
use heapless::Vec;

use ledger_proto::ApduError;

use crate::{
    apdu::{self, public_key::PUBLIC_KEY_LEN, sign_tx::MAX_SIGNATURE_LEN},
    consts::{APP_NAME, APP_VERSION, APP_VERSION_MAJOR, APP_VERSION_MINOR, APP_VERSION_PATCH},
};

/// [`Engine`][super::Engine] outputs (in response to events), typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    /// Empty response (event accepted)
    None,

    /// Application name
    AppName,

    /// Application version
    Version,

    /// Application name and version (dashboard format)
    AppAndVersion,

    /// Uncompressed secp256r1 public key
    PublicKey { public_key: [u8; PUBLIC_KEY_LEN] },

    /// DER encoded transaction signature
    Signature {
        signature: Vec<u8, MAX_SIGNATURE_LEN>,
    },

    /// Indicate the device is waiting for user input
    Pending,
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::AppName => apdu::app_info::AppNameResp::new(APP_NAME).encode(buff),
            Output::Version => apdu::app_info::VersionResp::new(
                APP_VERSION_MAJOR,
                APP_VERSION_MINOR,
                APP_VERSION_PATCH,
            )
            .encode(buff),
            Output::AppAndVersion => {
                apdu::app_info::AppAndVersionResp::new(APP_NAME, APP_VERSION).encode(buff)
            }
            Output::PublicKey { public_key } => {
                apdu::public_key::PublicKeyResp::new(*public_key).encode(buff)
            }
            Output::Signature { signature } => {
                apdu::sign_tx::SignTxResp::new(signature).encode(buff)
            }
            Output::Pending => Ok(0),
        }
    }

    /// Fetch signature for outputs containing this
    pub fn signature(&self) -> Option<&[u8]> {
        match self {
            Output::Signature { signature } => Some(signature),
            _ => None,
        }
    }
}
