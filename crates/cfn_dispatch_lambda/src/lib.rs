//! AWS-oriented adapters and handlers for the `Custom::Boto3` resource.
//!
//! This crate owns runtime integration details (Lambda handlers, the callback
//! responder and the AWS SDK capabilities) and re-exports the pure contract
//! primitives of `cfn_dispatch_core` through `runtime`.

pub mod adapters;
pub mod handlers;
pub mod services;

pub mod runtime {
    pub use cfn_dispatch_core::{action, contract, kwargs, mode, template};
}
