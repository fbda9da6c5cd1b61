// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! APDU dispatch, decoding raw command APDUs to engine [Event]s and
//! encoding [Output]s and [Error]s to response APDUs terminated by a
//! [`StatusWord`].
//!
//! The final transaction chunk is not answered until the user has approved
//! or denied the transaction, callers should respond via [handle_decision]
//! once this is available.

use crate::{
    apdu::{header::ApduHeader, status::StatusWord},
    engine::{Driver, Engine, Error, Event, Output},
};

/// Response length for a status word only
pub const STATUS_LEN: usize = 2;

/// Result of handling a command APDU
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Response {
    /// Response ready, containing the number of bytes written (including status)
    Ready(usize),
    /// Response deferred pending user confirmation
    Deferred,
}

/// Handle an incoming command APDU, writing any response to `tx`
#[cfg_attr(feature = "noinline", inline(never))]
pub fn handle_apdu<DRV: Driver>(engine: &mut Engine<DRV>, rx: &[u8], tx: &mut [u8]) -> Response {
    // Split header and check payload length
    let (header, data) = match ApduHeader::split(rx) {
        Ok(v) => v,
        Err(_e) => {
            #[cfg(feature = "log")]
            log::warn!("invalid APDU length: {}", rx.len());

            engine.abort();
            return Response::Ready(reply_err(Error::InvalidLength, tx));
        }
    };

    #[cfg(feature = "log")]
    log::debug!("apdu: {:02x?} ({} bytes)", header, data.len());

    // Decode event
    let evt = match Event::parse(&header, data) {
        Ok(v) => v,
        Err(e) => {
            #[cfg(feature = "log")]
            log::warn!("failed to parse APDU: {:?}", e);

            engine.abort();
            return Response::Ready(reply_err(e, tx));
        }
    };

    // Update engine
    match engine.update(&evt) {
        Ok(Output::Pending) => Response::Deferred,
        Ok(o) => Response::Ready(reply_ok(&o, tx)),
        Err(e) => {
            engine.abort();
            Response::Ready(reply_err(e, tx))
        }
    }
}

/// Answer a deferred final chunk with the user's decision
#[cfg_attr(feature = "noinline", inline(never))]
pub fn handle_decision<DRV: Driver>(engine: &mut Engine<DRV>, approve: bool, tx: &mut [u8]) -> usize {
    let r = match approve {
        true => engine.approve(),
        false => engine.deny(),
    };

    match r {
        Ok(o) => reply_ok(&o, tx),
        Err(e) => reply_err(e, tx),
    }
}

/// Split a response APDU into payload and status word
pub fn split_response(buff: &[u8]) -> Option<(&[u8], StatusWord)> {
    if buff.len() < STATUS_LEN {
        return None;
    }

    let (data, sw) = buff.split_at(buff.len() - STATUS_LEN);
    let sw = StatusWord::try_from(u16::from_be_bytes([sw[0], sw[1]])).ok()?;

    Some((data, sw))
}

fn reply_ok(o: &Output, tx: &mut [u8]) -> usize {
    let n = match tx.len().checked_sub(STATUS_LEN) {
        Some(n) => n,
        None => return 0,
    };

    match o.encode(&mut tx[..n]) {
        Ok(n) => write_status(StatusWord::Ok, n, tx),
        Err(_e) => reply_err(Error::EncodingFailed, tx),
    }
}

fn reply_err(e: Error, tx: &mut [u8]) -> usize {
    let n = match tx.len().checked_sub(STATUS_LEN) {
        Some(n) => n,
        None => return 0,
    };

    match e.encode(&mut tx[..n]) {
        Ok(n) => write_status(e.status(), n, tx),
        Err(_e) => write_status(StatusWord::WrongResponseLength, 0, tx),
    }
}

fn write_status(sw: StatusWord, n: usize, tx: &mut [u8]) -> usize {
    tx[n..][..STATUS_LEN].copy_from_slice(&(sw as u16).to_be_bytes());
    n + STATUS_LEN
}
