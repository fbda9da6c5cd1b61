#![allow(unused)]

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::{debug, trace};
use sha2::Sha256;
use zeroize::Zeroizing;

use ledger_neo_core::{
    dispatch::{handle_apdu, handle_decision, Response},
    engine::{Driver, Engine, State},
    settings::Settings,
};
use ledger_neo_tests::client::Exchange;

/// Seed for test key derivation
pub const SEED: [u8; 32] = [
    0x6b, 0x2e, 0x7f, 0x04, 0x91, 0xd3, 0x5a, 0x1c, 0x88, 0x40, 0xe2, 0x37, 0xa9, 0x0f, 0x5d, 0xc4,
    0x12, 0x9e, 0x63, 0xbb, 0x07, 0xf1, 0x4a, 0x28, 0xd5, 0x6c, 0x30, 0x9b, 0xe8, 0x71, 0x14, 0xa2,
];

/// Maximum response APDU length
const RESP_LEN: usize = 260;

#[derive(Clone)]
pub struct TestEngine {
    pub engine: Arc<Mutex<Engine<TestDriver>>>,
    decision: Arc<Mutex<Option<Vec<u8>>>>,
}

impl TestEngine {
    pub fn new(engine: Engine<TestDriver>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            decision: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a test engine with the provided settings
    pub fn with_settings(settings: Settings) -> Self {
        Self::new(Engine::new_with_settings(TestDriver::new(SEED), settings))
    }

    pub fn state(&self) -> State {
        self.engine.lock().unwrap().state()
    }

    /// Wait for a pending transaction then apply the user's decision
    pub async fn decide(&self, approve: bool) {
        loop {
            {
                let mut e = self.engine.lock().unwrap();

                match e.state() {
                    State::AwaitingConfirmation => {
                        if let Some(r) = e.review() {
                            for i in r.items().flatten() {
                                debug!("{}: {}", i.title, i.text);
                            }
                        }

                        let mut buff = [0u8; RESP_LEN];
                        let n = handle_decision(&mut *e, approve, &mut buff);

                        *self.decision.lock().unwrap() = Some(buff[..n].to_vec());
                        return;
                    }
                    // Nothing to decide where the session has already ended
                    State::AwaitingIdentity | State::Completed | State::Denied | State::Failed => {
                        return
                    }
                    _ => (),
                }
            }

            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl Exchange for TestEngine {
    type Error = Infallible;

    async fn exchange(&self, command: &[u8]) -> Result<Vec<u8>, Self::Error> {
        trace!("command: {:02x?}", command);

        let mut buff = [0u8; RESP_LEN];

        let r = {
            let mut e = self.engine.lock().unwrap();
            handle_apdu(&mut *e, command, &mut buff)
        };

        match r {
            Response::Ready(n) => Ok(buff[..n].to_vec()),
            // Final chunk, wait for the user
            Response::Deferred => loop {
                let d = self.decision.lock().unwrap().take();
                if let Some(d) = d {
                    return Ok(d);
                }

                tokio::time::sleep(Duration::from_millis(1)).await;
            },
        }
    }
}

/// Driver implementation for test use
pub struct TestDriver {
    pub seed: [u8; 32],
}

impl TestDriver {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }
}

impl Driver for TestDriver {
    fn secp256r1_derive(&self, path: &[u32]) -> Zeroizing<[u8; 32]> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.seed).unwrap();
        for p in path {
            mac.update(&p.to_be_bytes());
        }
        Zeroizing::new(mac.finalize().into_bytes().into())
    }
}

pub async fn approve_tx(e: &TestEngine) {
    debug!("Approve transaction");

    e.decide(true).await;
}

pub async fn deny_tx(e: &TestEngine) {
    debug!("Deny transaction");

    e.decide(false).await;
}
