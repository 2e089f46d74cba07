//! Shared custom-resource dispatch primitives.
//!
//! This crate owns the CloudFormation event/report contracts, mode matching,
//! action parsing, keyword-argument extraction and the template macro
//! rewrite. It intentionally excludes AWS SDK, HTTP and Lambda runtime
//! concerns, which live in `cfn_dispatch_lambda`.

pub mod action;
pub mod contract;
pub mod kwargs;
pub mod mode;
pub mod template;
