#![forbid(unsafe_code)]
//! solver-oracle: a correctness oracle for black-box point-set solvers
//!
//! Solvers are external programs that read an instance file (a terminal count followed by one
//! `x y z` line per terminal) and print a single scalar. This crate generates instances, runs one or
//! two solvers on them and judges the output, either against known answers (fixtures) or against
//! each other (differential testing).
//!
//! ## Pipeline
//!
//! `instance` (generate / serialize) → `invoker` (subprocess) → `oracle` (verdict) → `campaign`
//! (matrix, tally, fail-fast, reporting).
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod campaign;
pub mod cli;
pub mod errors;
pub mod instance;
pub mod invoker;
pub mod oracle;
pub mod version;

pub use campaign::{
    CampaignMode, CampaignOutcome, CampaignState, FixtureCatalog, FixtureConfig, RandomConfig, RandomMatrix,
    run_differential, run_fixtures,
};
pub use errors::{HarnessError, InstanceError, InvocationError};
pub use instance::{ProblemInstance, Terminal};
pub use invoker::{ProcessInvoker, SolverInvoker, SolverResult};
pub use oracle::{AbnormalExitPolicy, OutcomeComparator, Verdict};
