// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

use encdec::Decode;

use ledger_proto::{ApduError, ApduStatic};
use ledger_neo_apdu::{
    prelude::*,
    sign_tx::{P2_LAST, P2_MORE, SEQ_IDENTITY},
    Instruction, NEO_APDU_CLA,
};

use super::Error;

/// [`Engine`][super::Engine] input events, typically decoded from request [APDUs][crate::apdu]
#[derive(Clone, Debug)]
pub enum Event<'a> {
    None,

    /// Fetch application name
    GetAppName,

    /// Fetch application version
    GetVersion,

    /// Fetch application name and version (dashboard format)
    GetAppAndVersion,

    /// Fetch public key for a BIP44 path
    GetPublicKey { path: Bip44Path },

    /// Start a signing session (sequence `0`)
    SignTxIdentity { path: Bip44Path, magic: Option<u32> },

    /// Signing session data (sequence `1..`), either the network magic
    /// or a transaction chunk depending on session state
    SignTxData {
        seq: u8,
        data: &'a [u8],
        last: bool,
    },
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event<'a>, Error>
where
    T: Decode<'a, Error = ApduError>,
    Event<'a>: From<T::Output>,
{
    T::decode(buff)
        .map(|(v, _n)| Event::from(v))
        .map_err(|_| Error::InvalidLength)
}

impl<'a> Event<'a> {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(header: &ApduHeader, buff: &'a [u8]) -> Result<Self, Error> {
        // Dashboard app / version query
        if (header.cla, header.ins) == (AppAndVersionReq::CLA, AppAndVersionReq::INS) {
            return decode_event::<AppAndVersionReq>(buff);
        }

        if header.cla != NEO_APDU_CLA {
            return Err(Error::ClaNotSupported);
        }

        let ins = Instruction::try_from(header.ins).map_err(|_| Error::InsNotSupported)?;

        match ins {
            Instruction::GetAppName | Instruction::GetVersion | Instruction::GetPublicKey
                if header.p1 != 0 || header.p2 != 0 =>
            {
                Err(Error::WrongP1P2)
            }
            Instruction::GetAppName => decode_event::<AppNameReq>(buff),
            Instruction::GetVersion => decode_event::<VersionReq>(buff),
            Instruction::GetPublicKey => decode_event::<PublicKeyReq>(buff),
            Instruction::SignTx => Self::parse_sign_tx(header, buff),
        }
    }

    fn parse_sign_tx(header: &ApduHeader, buff: &'a [u8]) -> Result<Self, Error> {
        let last = match header.p2 {
            P2_MORE => false,
            P2_LAST => true,
            _ => return Err(Error::WrongP1P2),
        };

        match header.p1 {
            // Identity is always followed by further messages
            SEQ_IDENTITY if last => Err(Error::WrongP1P2),
            SEQ_IDENTITY => decode_event::<SignTxIdentity>(buff),
            seq => Ok(Event::SignTxData {
                seq,
                data: SignTxChunk::decode(buff)
                    .map(|(c, _n)| c.data)
                    .map_err(|_| Error::InvalidLength)?,
                last,
            }),
        }
    }
}

impl<'a> From<AppNameReq> for Event<'a> {
    fn from(_: AppNameReq) -> Self {
        Event::GetAppName
    }
}

impl<'a> From<VersionReq> for Event<'a> {
    fn from(_: VersionReq) -> Self {
        Event::GetVersion
    }
}

impl<'a> From<AppAndVersionReq> for Event<'a> {
    fn from(_: AppAndVersionReq) -> Self {
        Event::GetAppAndVersion
    }
}

impl<'a> From<PublicKeyReq> for Event<'a> {
    fn from(r: PublicKeyReq) -> Self {
        Event::GetPublicKey { path: r.path }
    }
}

impl<'a> From<SignTxIdentity> for Event<'a> {
    fn from(r: SignTxIdentity) -> Self {
        Event::SignTxIdentity {
            path: r.path,
            magic: r.magic,
        }
    }
}
