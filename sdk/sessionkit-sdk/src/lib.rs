pub mod advanced;
pub mod basic;
pub mod config;
pub mod core;
pub mod error;
pub mod revert;
pub mod types;
pub mod utils;

pub use crate::basic::account::{PaymasterContext, SmartAccount};
pub use crate::basic::guard::{use_session, SessionUsage, SessionUseOptions};
pub use crate::basic::paymaster::{paymaster_from, NoopPaymaster, PaymasterRunner};
pub use crate::basic::policy::{guard, limits, GuardInit, PolicyBuilder};
pub use crate::basic::sessions::SessionStore;
pub use crate::config::AccountConfig;
pub use crate::core::connection::CallTransport;
pub use crate::core::paymaster::PaymasterAdapter;
pub use crate::error::{PolicyViolationKind, Result, SdkError};
pub use crate::revert::{map_contract_error, RawFailure, RevertCode};
pub use crate::types::{
    AccountCall, AccountTransaction, Felt, InvokeResult, Session, SessionAllow, SessionLimits,
    SessionPolicy, SponsoredExecuteResult, SponsoredTransaction, Uint256,
};
pub use crate::utils::{hex_pad, to_felt, to_uint256, ToFelt, ToUint256};
