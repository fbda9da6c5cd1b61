// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Transaction review rendering
//!
//! A [`Review`] lists the [`Field`]s to be displayed for a validated
//! [`TxSummary`], with each rendered on demand to a [`ReviewItem`] so only
//! the item currently on screen need be resident.

use heapless::{String, Vec};
use strum::Display;

use crate::{
    engine::Error,
    helpers::{
        fmt_address, fmt_gas, fmt_gas_total, fmt_hex, fmt_index, fmt_network, fmt_titled_index, fmt_token_val,
        fmt_u32,
    },
    tx::{ScriptKind, TxSummary, WitnessScope, MAX_ALLOWED_CONTRACTS, MAX_ALLOWED_GROUPS, MAX_SIGNERS},
};

/// Maximum rendered title length
pub const TITLE_LEN: usize = 24;

/// Maximum rendered text length (hex encoded group key)
pub const TEXT_LEN: usize = 72;

/// Maximum number of review fields
pub const MAX_FIELDS: usize =
    8 + MAX_SIGNERS * (3 + MAX_ALLOWED_CONTRACTS + MAX_ALLOWED_GROUPS);

/// Transaction level fields (destination, amount, network, three fees, valid until)
const TX_FIELDS: usize = 7;

/// Per signer fields (signer, account, scope) excluding contracts and groups
const SIGNER_FIELDS: usize = 3;

static_assertions::const_assert!(
    MAX_FIELDS >= TX_FIELDS + MAX_SIGNERS * (SIGNER_FIELDS + MAX_ALLOWED_CONTRACTS + MAX_ALLOWED_GROUPS)
);

/// Review fields, in display order
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum Field {
    /// Transfer destination address
    Destination,
    /// Transfer amount
    Amount,
    /// Vote target (or retraction)
    Vote,
    /// Arbitrary script warning
    Script,
    Network,
    SystemFee,
    NetworkFee,
    TotalFees,
    ValidUntil,
    Signer(u8),
    Account(u8),
    Scope(u8),
    Contract(u8, u8),
    Group(u8, u8),
}

/// Rendered review item
#[derive(Clone, PartialEq, Debug)]
pub struct ReviewItem {
    pub title: String<TITLE_LEN>,
    pub text: String<TEXT_LEN>,
}

impl ReviewItem {
    fn new(title: &str, text: &str) -> Result<Self, Error> {
        let mut i = ReviewItem {
            title: String::new(),
            text: String::new(),
        };

        i.title
            .push_str(title)
            .map_err(|_| Error::EncodingFailed)?;
        i.text.push_str(text).map_err(|_| Error::EncodingFailed)?;

        Ok(i)
    }
}

/// Transaction review for a validated summary
pub struct Review<'a> {
    summary: &'a TxSummary,
    magic: u32,
    fields: Vec<Field, MAX_FIELDS>,
}

impl<'a> Review<'a> {
    /// Build the review field list for a summary
    pub fn new(summary: &'a TxSummary, magic: u32) -> Self {
        let mut f = Vec::<Field, MAX_FIELDS>::new();

        // Capacity covers the bounded signer / contract / group counts
        let mut push = |v| {
            let _ = f.push(v);
        };

        match summary.script {
            ScriptKind::Transfer { .. } => {
                push(Field::Destination);
                push(Field::Amount);
            }
            ScriptKind::Vote { .. } => push(Field::Vote),
            ScriptKind::Arbitrary => push(Field::Script),
        }

        push(Field::Network);
        push(Field::SystemFee);
        push(Field::NetworkFee);
        push(Field::TotalFees);
        push(Field::ValidUntil);

        for (i, s) in summary.signers.iter().enumerate() {
            let i = i as u8;

            push(Field::Signer(i));
            push(Field::Account(i));
            push(Field::Scope(i));

            for c in 0..s.allowed_contracts.len() {
                push(Field::Contract(i, c as u8));
            }
            for g in 0..s.allowed_groups.len() {
                push(Field::Group(i, g as u8));
            }
        }

        Self {
            summary,
            magic,
            fields: f,
        }
    }

    /// Fetch review fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fetch the number of review fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over rendered review items
    pub fn items(&self) -> impl Iterator<Item = Result<ReviewItem, Error>> + '_ {
        self.fields.iter().map(|f| self.render(*f))
    }

    /// Render every field, returning the first failure
    pub fn check(&self) -> Result<(), Error> {
        for i in self.items() {
            i?;
        }
        Ok(())
    }

    /// Render a single review field
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn render(&self, field: Field) -> Result<ReviewItem, Error> {
        let s = self.summary;
        let mut buff = [0u8; TEXT_LEN];

        match (field, &s.script) {
            (Field::Destination, ScriptKind::Transfer { to, .. }) => {
                let a = fmt_address(to, &mut buff).ok_or(Error::DisplayAddressFail)?;
                ReviewItem::new("Destination addr", a)
            }
            (
                Field::Amount,
                ScriptKind::Transfer {
                    token, amount, ..
                },
            ) => {
                let v = i64::try_from(*amount).map_err(|_| Error::DisplayAmountFail)?;
                let a = fmt_token_val(v, *token, &mut buff).ok_or(Error::DisplayAmountFail)?;
                ReviewItem::new("Token amount", a)
            }
            (Field::Vote, ScriptKind::Vote { to: Some(k), .. }) => {
                let k = fmt_hex(k, &mut buff).ok_or(Error::EncodingFailed)?;
                ReviewItem::new("Casting vote for", k)
            }
            (Field::Vote, ScriptKind::Vote { to: None, .. }) => {
                ReviewItem::new("Retracting vote", "")
            }
            (Field::Script, _) => ReviewItem::new("Warning", "Arbitrary contract script"),
            (Field::Network, _) => {
                let n = fmt_network(self.magic, &mut buff).ok_or(Error::EncodingFailed)?;
                ReviewItem::new("Target network", n)
            }
            (Field::SystemFee, _) => {
                let v = fmt_gas(s.system_fee, &mut buff).ok_or(Error::DisplaySystemFeeFail)?;
                ReviewItem::new("System fee", v)
            }
            (Field::NetworkFee, _) => {
                let v = fmt_gas(s.network_fee, &mut buff).ok_or(Error::DisplayNetworkFeeFail)?;
                ReviewItem::new("Network fee", v)
            }
            (Field::TotalFees, _) => {
                let v = fmt_gas_total(s.total_fees(), &mut buff)
                    .ok_or(Error::DisplayAmountFail)?;
                ReviewItem::new("Total fees", v)
            }
            (Field::ValidUntil, _) => {
                let v = fmt_u32(s.valid_until_block, &mut buff).ok_or(Error::EncodingFailed)?;
                ReviewItem::new("Valid until height", v)
            }
            (Field::Signer(i), _) => {
                let v = fmt_index(i as usize, s.signers.len(), &mut buff)
                    .ok_or(Error::EncodingFailed)?;
                ReviewItem::new("Signer", v)
            }
            (Field::Account(i), _) => {
                let signer = s.signers.get(i as usize).ok_or(Error::InvalidState)?;
                let v = fmt_hex(&signer.account, &mut buff).ok_or(Error::DisplayAddressFail)?;
                ReviewItem::new("Account", v)
            }
            (Field::Scope(i), _) => {
                let signer = s.signers.get(i as usize).ok_or(Error::InvalidState)?;
                let v = fmt_scope(signer.scope, &mut buff).ok_or(Error::EncodingFailed)?;
                ReviewItem::new("Scope", v)
            }
            (Field::Contract(i, c), _) => {
                let signer = s.signers.get(i as usize).ok_or(Error::InvalidState)?;
                let h = signer
                    .allowed_contracts
                    .get(c as usize)
                    .ok_or(Error::InvalidState)?;

                let mut title = [0u8; TITLE_LEN];
                let t = fmt_titled_index(
                    "Contract",
                    c as usize,
                    signer.allowed_contracts.len(),
                    &mut title,
                )
                .ok_or(Error::EncodingFailed)?;
                let v = fmt_hex(h, &mut buff).ok_or(Error::EncodingFailed)?;

                ReviewItem::new(t, v)
            }
            (Field::Group(i, g), _) => {
                let signer = s.signers.get(i as usize).ok_or(Error::InvalidState)?;
                let k = signer
                    .allowed_groups
                    .get(g as usize)
                    .ok_or(Error::InvalidState)?;

                let mut title = [0u8; TITLE_LEN];
                let t = fmt_titled_index("Group", g as usize, signer.allowed_groups.len(), &mut title)
                    .ok_or(Error::EncodingFailed)?;
                let v = fmt_hex(k, &mut buff).ok_or(Error::EncodingFailed)?;

                ReviewItem::new(t, v)
            }
            // Field does not apply to this script
            _ => Err(Error::InvalidState),
        }
    }
}

/// Format a witness scope, `None`, `Global` or `By Entry,Contracts,Groups`
fn fmt_scope(scope: WitnessScope, buff: &mut [u8]) -> Option<&str> {
    if scope.is_empty() {
        return Some("None");
    }
    if scope == WitnessScope::GLOBAL {
        return Some("Global");
    }

    let names = [
        (WitnessScope::CALLED_BY_ENTRY, "Entry"),
        (WitnessScope::CUSTOM_CONTRACTS, "Contracts"),
        (WitnessScope::CUSTOM_GROUPS, "Groups"),
    ];

    let mut n = emstr::write!(&mut buff[..], "By ").ok()?;
    let mut first = true;

    for (flag, name) in names {
        if !scope.contains(flag) {
            continue;
        }
        if !first {
            n += emstr::write!(&mut buff[n..], ',').ok()?;
        }
        n += emstr::write!(&mut buff[n..], name).ok()?;
        first = false;
    }

    core::str::from_utf8(&buff[..n]).ok()
}
