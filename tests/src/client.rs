// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Host-side client helpers, encoding requests to raw APDUs and decoding responses
//!

use std::future::Future;

use async_trait::async_trait;
use encdec::{Decode, DecodeOwned, Encode};
use log::debug;

use ledger_neo_apdu::{
    prelude::*, sign_tx::SEQ_IDENTITY, ApduStatic, Instruction, MAX_APDU_DATA, NEO_APDU_CLA,
};

/// Raw APDU exchange, implemented by device transports and test harnesses
///
/// Responses contain the payload followed by the big-endian status word.
#[async_trait]
pub trait Exchange {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn exchange(&self, command: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

#[async_trait]
impl<T: Exchange + Send + Sync> Exchange for &T {
    type Error = T::Error;

    async fn exchange(&self, command: &[u8]) -> Result<Vec<u8>, Self::Error> {
        T::exchange(self, command).await
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("device returned status {0} ({1:02x?})")]
    Status(StatusWord, Vec<u8>),

    #[error("invalid response")]
    InvalidResponse,
}

/// Decoded response APDU
#[derive(Clone, PartialEq, Debug)]
pub struct Response {
    pub data: Vec<u8>,
    pub status: StatusWord,
}

impl Response {
    /// Split a raw response into payload and status word
    pub fn parse(buff: &[u8]) -> Result<Self, Error> {
        if buff.len() < 2 {
            return Err(Error::InvalidResponse);
        }

        let (data, sw) = buff.split_at(buff.len() - 2);
        let status = StatusWord::try_from(u16::from_be_bytes([sw[0], sw[1]]))
            .map_err(|_| Error::InvalidResponse)?;

        Ok(Self {
            data: data.to_vec(),
            status,
        })
    }

    /// Return payload for successful responses, otherwise the status as an error
    pub fn ok(self) -> Result<Vec<u8>, Error> {
        match self.status {
            StatusWord::Ok => Ok(self.data),
            s => Err(Error::Status(s, self.data)),
        }
    }

    /// Decode the [`ParserStatus`] payload of a parsing failure
    pub fn parser_status(&self) -> Option<ParserStatus> {
        if self.status != StatusWord::TxParsingFail {
            return None;
        }

        ParserStatus::decode_owned(&self.data).ok().map(|(s, _)| s)
    }
}

/// Build a raw command APDU
pub fn command(cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Vec<u8> {
    let mut buff = vec![0u8; 5 + data.len()];
    let n = ApduHeader::new(cla, ins, p1, p2)
        .encode_with(data, &mut buff)
        .expect("command payload exceeds APDU length");
    buff.truncate(n);
    buff
}

fn encode<E: Encode>(v: &E) -> Vec<u8>
where
    E::Error: core::fmt::Debug,
{
    let mut buff = vec![0u8; MAX_APDU_DATA];
    let n = v.encode(&mut buff).expect("request encoding failed");
    buff.truncate(n);
    buff
}

/// Issue a raw command, returning the decoded response
pub async fn send<T: Exchange>(t: &T, command: &[u8]) -> Result<Response, Error> {
    debug!("cmd: {:02x?}", command);

    let r = t
        .exchange(command)
        .await
        .map_err(|e| Error::Transport(e.to_string()))?;

    debug!("resp: {:02x?}", r);

    Response::parse(&r)
}

/// Fetch application name
pub async fn get_app_name<T: Exchange>(t: &T) -> Result<String, Error> {
    let c = command(NEO_APDU_CLA, Instruction::GetAppName as u8, 0, 0, &[]);
    let d = send(t, &c).await?.ok()?;

    let (r, _) = AppNameResp::decode(&d).map_err(|_| Error::InvalidResponse)?;
    Ok(r.name.to_string())
}

/// Fetch application version
pub async fn get_version<T: Exchange>(t: &T) -> Result<(u8, u8, u8), Error> {
    let c = command(NEO_APDU_CLA, Instruction::GetVersion as u8, 0, 0, &[]);
    let d = send(t, &c).await?.ok()?;

    let (r, _) = VersionResp::decode_owned(&d).map_err(|_| Error::InvalidResponse)?;
    Ok((r.major, r.minor, r.patch))
}

/// Fetch application name and version via the dashboard command
pub async fn get_app_and_version<T: Exchange>(t: &T) -> Result<(String, String), Error> {
    let c = command(AppAndVersionReq::CLA, AppAndVersionReq::INS, 0, 0, &[]);
    let d = send(t, &c).await?.ok()?;

    let (r, _) = AppAndVersionResp::decode(&d).map_err(|_| Error::InvalidResponse)?;
    Ok((r.name.to_string(), r.version.to_string()))
}

/// Fetch the uncompressed public key for a BIP44 path
pub async fn get_public_key<T: Exchange>(t: &T, path: Bip44Path) -> Result<[u8; 65], Error> {
    let c = command(
        NEO_APDU_CLA,
        Instruction::GetPublicKey as u8,
        0,
        0,
        &encode(&PublicKeyReq::new(path)),
    );
    let d = send(t, &c).await?.ok()?;

    let (r, _) = PublicKeyResp::decode_owned(&d).map_err(|_| Error::InvalidResponse)?;
    Ok(r.public_key)
}

/// Build the APDU sequence for signing a transaction
///
/// With `combined` set the magic is sent with the path in the identity message,
/// otherwise it is sent separately as sequence `1`.
pub fn sign_tx_commands(path: Bip44Path, magic: u32, tx: &[u8], combined: bool) -> Vec<Vec<u8>> {
    let ins = Instruction::SignTx as u8;
    let mut cmds = vec![];

    let ident = match combined {
        true => SignTxIdentity::new(path, Some(magic)),
        false => SignTxIdentity::new(path, None),
    };
    cmds.push(command(NEO_APDU_CLA, ins, SEQ_IDENTITY, P2_MORE, &encode(&ident)));

    if !combined {
        let m = encode(&SignTxMagic::new(magic));
        cmds.push(command(NEO_APDU_CLA, ins, 1, P2_MORE, &m));
    }

    let chunks: Vec<_> = tx.chunks(MAX_APDU_DATA).collect();
    let seq = cmds.len();

    for (i, c) in chunks.iter().enumerate() {
        let p2 = match i == chunks.len() - 1 {
            true => P2_LAST,
            false => P2_MORE,
        };

        let p1 = u8::try_from(seq + i).expect("transaction exceeds sequence space");
        cmds.push(command(NEO_APDU_CLA, ins, p1, p2, c));
    }

    cmds
}

/// Stream a transaction for signing, calling `approve` while the final chunk is pending
///
/// Returns the final response, either a signature or an error status.
pub async fn sign_tx<T, F>(
    t: &T,
    approve: impl FnOnce() -> F,
    path: Bip44Path,
    magic: u32,
    tx: &[u8],
    combined: bool,
) -> Result<Response, Error>
where
    T: Exchange,
    F: Future<Output = ()>,
{
    let mut cmds = sign_tx_commands(path, magic, tx, combined);
    let last = cmds.pop().ok_or(Error::InvalidResponse)?;

    for c in &cmds {
        let r = send(t, c).await?;
        if r.status != StatusWord::Ok {
            return Ok(r);
        }
    }

    // Final chunk is answered once the user has decided
    let (r, _) = tokio::join!(send(t, &last), approve());

    r
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_sequence() {
        let path = Bip44Path::new(0, 0, 0);
        let tx = [0xaa; 600];

        let cmds = sign_tx_commands(path, 7, &tx, false);
        assert_eq!(cmds.len(), 5);

        let headers: Vec<_> = cmds.iter().map(|c| (c[2], c[3], c[4])).collect();
        assert_eq!(
            &headers,
            &[
                (0, P2_MORE, 20),
                (1, P2_MORE, 4),
                (2, P2_MORE, 255),
                (3, P2_MORE, 255),
                (4, P2_LAST, 90)
            ]
        );

        let cmds = sign_tx_commands(path, 7, &tx[..10], true);
        let headers: Vec<_> = cmds.iter().map(|c| (c[2], c[3], c[4])).collect();
        assert_eq!(&headers, &[(0, P2_MORE, 24), (1, P2_LAST, 10)]);
    }

    #[test]
    fn parse_responses() {
        let r = Response::parse(&[0xff, 0xff, 0xff, 0xff, 0xb0, 0x05]).unwrap();
        assert_eq!(r.status, StatusWord::TxParsingFail);
        assert_eq!(r.parser_status(), Some(ParserStatus::InvalidLengthError));

        let r = Response::parse(&[0x69, 0x85]).unwrap();
        assert_eq!(r.status, StatusWord::Deny);
        assert_eq!(r.parser_status(), None);

        assert!(Response::parse(&[0x90]).is_err());
    }
}
