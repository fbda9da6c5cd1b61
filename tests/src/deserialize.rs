// Copyright (c) 2022-2023 The Neo N3 Ledger App Developers

//! Transaction validation vectors, each violating a single rule
//!

use ledger_neo_apdu::prelude::*;

use crate::{
    client::{sign_tx, Exchange},
    sign::TESTNET,
    tx::{scope, write_varint, Attribute, Signer, Transaction, DEFAULT_ACCOUNT},
};

/// Deserialisation test vector
pub struct Vector {
    pub name: &'static str,
    pub data: Vec<u8>,
    pub status: ParserStatus,
}

/// Fixed header (version, nonce, fees, valid until block) with zeroed fields
fn header() -> Vec<u8> {
    let mut v = vec![0x00];
    v.extend_from_slice(&[0x00; 4]);
    v.extend_from_slice(&0i64.to_le_bytes());
    v.extend_from_slice(&0i64.to_le_bytes());
    v.extend_from_slice(&[0x00; 4]);
    v
}

/// Header followed by a single signer with the provided scope
fn signer(scope: u8) -> Vec<u8> {
    let mut v = header();
    v.push(0x01);
    v.extend_from_slice(&[0x00; 20]);
    v.push(scope);
    v
}

fn concat(a: Vec<u8>, b: &[u8]) -> Vec<u8> {
    [a, b.to_vec()].concat()
}

fn vector(name: &'static str, data: Vec<u8>, status: ParserStatus) -> Vector {
    Vector { name, data, status }
}

lazy_static::lazy_static! {
    pub static ref VECTORS: Vec<Vector> = {
        use ParserStatus::*;

        let base = || Transaction::arbitrary(&[0x40]);

        vec![
            vector("version_value", vec![0x01], VersionValueError),
            vector("nonce_parsing", vec![0x00, 0x00], NonceParsingError),
            vector("system_fee_parsing", header()[..6].to_vec(), SystemFeeParsingError),
            vector("system_fee_value", {
                let mut h = header();
                h[5..13].copy_from_slice(&(-1i64).to_be_bytes());
                h[..13].to_vec()
            }, SystemFeeValueError),
            vector("network_fee_parsing", header()[..14].to_vec(), NetworkFeeParsingError),
            vector("network_fee_value", {
                let mut h = header();
                h[13..21].copy_from_slice(&(-1i64).to_be_bytes());
                h[..21].to_vec()
            }, NetworkFeeValueError),
            vector("valid_until_block", header()[..22].to_vec(), ValidUntilBlockParsingError),
            vector("signers_length", header(), SignerLengthParsingError),
            vector("signers_length_value", concat(header(), &[0x03]), SignerLengthValueError),
            vector("signers_account", concat(header(), &[0x01]), SignerAccountParsingError),
            vector("signers_scope", signer(0x00)[..46].to_vec(), SignerScopeParsingError),
            vector(
                "signers_scope_global",
                signer(scope::GLOBAL | scope::CALLED_BY_ENTRY),
                SignerScopeValueErrorGlobalFlag,
            ),
            vector(
                "signers_scope_contracts",
                concat(signer(scope::CUSTOM_CONTRACTS), &[0x11]),
                SignerAllowedContractsLengthValueError,
            ),
            vector(
                "signers_scope_contracts_no_data",
                concat(signer(scope::CUSTOM_CONTRACTS), &[0x01]),
                SignerAllowedContractParsingError,
            ),
            vector(
                "signers_scope_groups",
                concat(signer(scope::CUSTOM_GROUPS), &[0x03]),
                SignerAllowedGroupsLengthValueError,
            ),
            vector(
                "signers_scope_groups_no_data",
                concat(signer(scope::CUSTOM_GROUPS), &[0x01]),
                SignerAllowedContractParsingError,
            ),
            vector(
                "signers_scope_witness_rules",
                signer(scope::WITNESS_RULES),
                SignerScopeUnsupportedFlagError,
            ),
            vector(
                "signers_duplicate",
                base()
                    .signers(&[Signer::called_by_entry(&DEFAULT_ACCOUNT), Signer::called_by_entry(&DEFAULT_ACCOUNT)])
                    .serialize_unsigned(),
                SignerAccountDuplicateError,
            ),
            vector("attributes", signer(scope::CALLED_BY_ENTRY), AttributesLengthParsingError),
            vector(
                "attributes_value",
                base()
                    .attribute(Attribute::HighPriority)
                    .attribute(Attribute::HighPriority)
                    .attribute(Attribute::HighPriority)
                    .serialize_unsigned(),
                AttributesLengthValueError,
            ),
            vector(
                "attributes_duplicate",
                base()
                    .attribute(Attribute::HighPriority)
                    .attribute(Attribute::HighPriority)
                    .serialize_unsigned(),
                AttributesDuplicateType,
            ),
            vector(
                "attributes_oracle_response",
                base()
                    .attribute(Attribute::OracleResponse { id: 1, code: 0, result: vec![] })
                    .serialize_unsigned(),
                AttributesUnsupportedType,
            ),
            vector(
                "attributes_not_valid_before",
                base().attribute(Attribute::NotValidBefore(10)).serialize_unsigned(),
                AttributesUnsupportedType,
            ),
            vector(
                "script_length",
                concat(signer(scope::CALLED_BY_ENTRY), &[0x00]),
                ScriptLengthParsingError,
            ),
            vector(
                "script_length_zero",
                concat(signer(scope::CALLED_BY_ENTRY), &[0x00, 0x00]),
                ScriptLengthValueError,
            ),
            vector("script_truncated", {
                let mut d = signer(scope::CALLED_BY_ENTRY);
                d.push(0x00);
                write_varint(&mut d, 300);
                d.extend_from_slice(&[0x40; 10]);
                d
            }, ScriptLengthValueError),
        ]
    };
}

/// Stream an invalid transaction, checking the reported [`ParserStatus`]
pub async fn test<T: Exchange>(t: T, v: &Vector) -> anyhow::Result<()> {
    let resp = sign_tx(
        &t,
        || async {},
        Bip44Path::new(0, 0, 0),
        TESTNET,
        &v.data,
        false,
    )
    .await?;

    assert_eq!(resp.status, StatusWord::TxParsingFail, "{}: unexpected status", v.name);
    assert_eq!(resp.parser_status(), Some(v.status), "{}: unexpected parser status", v.name);

    Ok(())
}
