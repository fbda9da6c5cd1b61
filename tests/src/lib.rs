// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Tests for Neo N3 hardware wallet integration.
//!
//! Generic over [client::Exchange] for reuse against simulated engines and devices.
//!

pub mod client;


pub mod tx;


pub mod deserialize;
