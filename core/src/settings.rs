// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Runtime application settings

/// User configurable settings, persisted by the platform
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Settings {
    /// Allow signing transactions with scripts other than NEO / GAS transfers and votes
    pub allow_arbitrary_scripts: bool,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            allow_arbitrary_scripts: false,
        }
    }

    /// Toggle the arbitrary script setting
    pub fn toggle_arbitrary_scripts(&mut self) {
        self.allow_arbitrary_scripts = !self.allow_arbitrary_scripts;
    }
}
