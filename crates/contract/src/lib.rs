//! # simplepay-contract
//!
//! A local mirror of the SimplePay payment contract: cached aggregate state, owner detection
//! and the state-changing calls, all signed through the shared wallet session.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod abi;

pub mod call;
pub use call::{ContractCall, PaymentContract, PendingCall};

pub mod error;
pub use error::{CallError, MirrorError};

mod mirror;
pub use mirror::{ContractMirror, FETCH_ERROR};

mod outcome;
pub use outcome::{Operation, TransactionOutcome, TxPhase};

pub mod rpc;
pub use rpc::RpcPaymentContract;

mod snapshot;
pub use snapshot::ContractSnapshot;
