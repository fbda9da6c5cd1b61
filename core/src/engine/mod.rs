// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! The [Engine] provides functionality required by hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.
//!
//! Signing sessions move through the following [State]s, with any unexpected
//! event discarding the session:
//!
//! ```text
//! AwaitingIdentity -> [AwaitingMagic] -> AwaitingPayload -> Parsing -> AwaitingConfirmation
//!                                                                        |-> Completed
//!                                                                        |-> Denied
//! (any failure) -> Failed
//! ```
//!
//! A new identity message is accepted in every state, replacing any
//! session in progress.

use encdec::DecodeOwned;
use heapless::Vec;
use p256::{
    ecdsa::{signature::Signer, Signature, SigningKey},
    elliptic_curve::sec1::ToEncodedPoint,
    SecretKey,
};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroizing;

use crate::{
    apdu::{
        path::Bip44Path, public_key::PUBLIC_KEY_LEN, sign_tx::MAX_SIGNATURE_LEN,
        sign_tx::SignTxMagic,
    },
    review::Review,
    settings::Settings,
    tx::Progress,
};

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod error;
pub use error::Error;

mod path;
pub use path::check_path;

mod session;
pub use session::Session;

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no session running
    AwaitingIdentity,
    /// Session started, network magic pending
    AwaitingMagic,
    /// Awaiting the first transaction chunk
    AwaitingPayload,
    /// Transaction partially received
    Parsing,
    /// Transaction validated, pending user approval
    AwaitingConfirmation,
    /// Transaction signed
    Completed,
    /// Transaction denied
    Denied,
    /// Session failed
    Failed,
}

/// [Engine] provides hardware-independent support for Neo N3 wallet operations
///
pub struct Engine<DRV: Driver> {
    state: State,
    session: Option<Session>,
    settings: Settings,
    drv: DRV,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// BIP32 derivation for secp256r1 private keys
    fn secp256r1_derive(&self, path: &[u32]) -> Zeroizing<[u8; 32]>;
}

impl<T: Driver> Driver for &mut T {
    fn secp256r1_derive(&self, path: &[u32]) -> Zeroizing<[u8; 32]> {
        T::secp256r1_derive(self, path)
    }
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver and default settings
    pub const fn new(drv: DRV) -> Self {
        Self::new_with_settings(drv, Settings::new())
    }

    /// Create a new engine instance with the provided driver and settings
    pub const fn new_with_settings(drv: DRV, settings: Settings) -> Self {
        Self {
            state: State::AwaitingIdentity,
            session: None,
            settings,
            drv,
        }
    }

    /// Handle incoming events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        match (self.state, evt) {
            // Empty event, do nothing
            (_, Event::None) => Ok(Output::None),

            // Application information
            (_, Event::GetAppName) => Ok(Output::AppName),
            (_, Event::GetVersion) => Ok(Output::Version),
            (_, Event::GetAppAndVersion) => Ok(Output::AppAndVersion),

            // Fetch public key, no approval required
            (_, Event::GetPublicKey { path }) => self.public_key(path),

            // Start a new session, replacing any existing session
            (_, Event::SignTxIdentity { path, magic }) => {
                let r = self.start(path, *magic);
                self.fail_on_err(r)
            }

            // Set network magic
            (State::AwaitingMagic, Event::SignTxData { seq, data, last }) => {
                let r = self.set_magic(*seq, data, *last);
                self.fail_on_err(r)
            }

            // Load transaction chunks
            (State::AwaitingPayload | State::Parsing, Event::SignTxData { seq, data, last }) => {
                let r = self.load_chunk(*seq, data, *last);
                self.fail_on_err(r)
            }

            _ => {
                #[cfg(feature = "log")]
                log::error!("Unexpected event in state {:?}: {:02x?}", self.state, evt);

                self.discard(State::Failed);

                Err(Error::UnexpectedEvent)
            }
        }
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch active session
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Fetch engine settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Update engine settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Fetch the review for a transaction pending approval
    pub fn review(&self) -> Option<Review<'_>> {
        if self.state != State::AwaitingConfirmation {
            return None;
        }

        let s = self.session.as_ref()?;
        Some(Review::new(s.summary()?, s.magic()?))
    }

    /// Approve a pending transaction, returning the signature
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn approve(&mut self) -> Result<Output, Error> {
        if self.state != State::AwaitingConfirmation {
            return Err(Error::InvalidState);
        }

        let session = match self.session.take() {
            Some(s) => s,
            None => {
                self.state = State::Failed;
                return Err(Error::InvalidState);
            }
        };

        let (summary, magic) = match (session.summary(), session.magic()) {
            (Some(s), Some(m)) => (s, m),
            _ => {
                self.state = State::Failed;
                return Err(Error::InvalidState);
            }
        };

        // Arbitrary scripts may only be denied unless enabled in settings
        if summary.script.is_arbitrary() && !self.settings.allow_arbitrary_scripts {
            #[cfg(feature = "log")]
            log::warn!("arbitrary script rejected by settings");

            self.state = State::Denied;
            return Err(Error::Denied);
        }

        match self.sign(session.path(), magic, &summary.digest) {
            Ok(signature) => {
                self.state = State::Completed;
                Ok(Output::Signature { signature })
            }
            Err(e) => {
                #[cfg(feature = "log")]
                log::error!("signing failed: {:?}", e);

                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Deny a pending transaction
    pub fn deny(&mut self) -> Result<Output, Error> {
        if self.state != State::AwaitingConfirmation {
            return Err(Error::InvalidState);
        }

        self.discard(State::Denied);

        Err(Error::Denied)
    }

    /// Reset engine state
    pub fn reset(&mut self) {
        self.discard(State::AwaitingIdentity);
    }

    /// Abort any active session, used where a message fails before reaching the engine
    pub fn abort(&mut self) {
        if self.session.is_some() {
            #[cfg(feature = "log")]
            log::warn!("aborting session in state {:?}", self.state);

            self.discard(State::Failed);
        }
    }

    fn discard(&mut self, state: State) {
        self.session = None;
        self.state = state;
    }

    fn fail_on_err(&mut self, r: Result<Output, Error>) -> Result<Output, Error> {
        if let Err(_e) = &r {
            #[cfg(feature = "log")]
            log::warn!("session failed in state {:?}: {}", self.state, _e);

            self.discard(State::Failed);
        }
        r
    }

    fn start(&mut self, path: &Bip44Path, magic: Option<u32>) -> Result<Output, Error> {
        if self.session.take().is_some() {
            #[cfg(feature = "log")]
            log::debug!("discarding session in state {:?}", self.state);
        }

        check_path(path)?;

        self.session = Some(Session::new(*path, magic));
        self.state = match magic {
            Some(_) => State::AwaitingPayload,
            None => State::AwaitingMagic,
        };

        Ok(Output::None)
    }

    fn set_magic(&mut self, seq: u8, data: &[u8], last: bool) -> Result<Output, Error> {
        let session = self.session.as_mut().ok_or(Error::InvalidState)?;

        session.next_seq(seq)?;

        // Magic is always followed by the transaction
        if last {
            return Err(Error::WrongP1P2);
        }

        let (m, _) = SignTxMagic::decode_owned(data).map_err(|_| Error::InvalidMagic)?;
        session.set_magic(m.magic);

        self.state = State::AwaitingPayload;

        Ok(Output::None)
    }

    fn load_chunk(&mut self, seq: u8, data: &[u8], last: bool) -> Result<Output, Error> {
        let session = self.session.as_mut().ok_or(Error::InvalidState)?;

        session.next_seq(seq)?;

        match session.feed(data, last)? {
            Progress::Pending => {
                self.state = State::Parsing;
                Ok(Output::None)
            }
            Progress::Complete => {
                let summary = session.summary().ok_or(Error::InvalidState)?;
                let magic = session.magic().ok_or(Error::InvalidState)?;

                // Surface display failures before prompting the user
                Review::new(summary, magic).check()?;

                #[cfg(feature = "log")]
                log::debug!("transaction loaded, awaiting confirmation");

                self.state = State::AwaitingConfirmation;
                Ok(Output::Pending)
            }
        }
    }

    /// Fetch the uncompressed public key for a given path
    #[cfg_attr(feature = "noinline", inline(never))]
    fn public_key(&self, path: &Bip44Path) -> Result<Output, Error> {
        check_path(path)?;

        let key = self.drv.secp256r1_derive(path.as_slice());
        let secret = SecretKey::from_slice(&key[..]).map_err(|_| Error::InvalidKey)?;

        let p = secret.public_key().to_encoded_point(false);

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        if p.as_bytes().len() != PUBLIC_KEY_LEN {
            return Err(Error::InvalidKey);
        }
        public_key.copy_from_slice(p.as_bytes());

        Ok(Output::PublicKey { public_key })
    }

    /// Sign `magic || digest` with the key for the provided path
    #[cfg_attr(feature = "noinline", inline(never))]
    fn sign(
        &self,
        path: &Bip44Path,
        magic: u32,
        digest: &[u8; 32],
    ) -> Result<Vec<u8, MAX_SIGNATURE_LEN>, Error> {
        let key = self.drv.secp256r1_derive(path.as_slice());
        let signing_key = SigningKey::from_slice(&key[..]).map_err(|_| Error::InvalidKey)?;

        let mut msg = [0u8; 36];
        msg[..4].copy_from_slice(&magic.to_le_bytes());
        msg[4..].copy_from_slice(digest);

        let sig: Signature = signing_key.try_sign(&msg).map_err(|_| Error::SignError)?;

        Vec::from_slice(sig.to_der().as_bytes()).map_err(|_| Error::SignError)
    }
}
