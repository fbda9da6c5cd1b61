//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{AppAndVersionReq, AppAndVersionResp, AppNameReq, AppNameResp, VersionReq, VersionResp},
    header::ApduHeader,
    parser_status::ParserStatus,
    path::Bip44Path,
    public_key::{PublicKeyReq, PublicKeyResp},
    sign_tx::{SignTxChunk, SignTxIdentity, SignTxMagic, SignTxResp, P2_LAST, P2_MORE},
    status::StatusWord,
};
