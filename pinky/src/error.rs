use crate::ledger::CallRecord;

use thiserror::Error;

/// Exact-count expectation mismatch reported by [`CallLedger::check`](crate::CallLedger::check).
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error(
    "Expected to receive exactly {expected} call(s) matching:\n\t{call}\nActually received {actual} matching call(s):\n\t{call}"
)]
pub struct VerificationError {
    pub call: CallRecord,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GhostError {
    /// The identity token has no registered factory. Generated call sites and
    /// the generated registry are produced by the same expansion, so this is
    /// an internal invariant violation.
    #[error("no mock specification is registered for `{key}`")]
    NoMatchingSpecification { key: String },

    #[error("mock registered for `{key}` does not implement `{contract}`")]
    ContractMismatch {
        key: String,
        contract: &'static str,
    },

    #[error("return value configured for `{method}` is not a `{expected}`")]
    ConfiguredTypeMismatch {
        method: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Verification(#[from] VerificationError),
}
