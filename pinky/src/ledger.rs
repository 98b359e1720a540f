use crate::error::VerificationError;

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};

/// Rendered argument of a recorded call.
///
/// Calls are matched by method identity and count only, so generated mocks
/// always record an empty argument list. The type exists so a call record keeps
/// the same shape once arguments are taken into account.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Argument(String);

impl Argument {
    pub fn new<T: Debug + ?Sized>(value: &T) -> Self {
        Self(format!("{value:?}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One invocation shape: the method name and its arguments.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CallRecord {
    method: String,
    arguments: Vec<Argument>,
}

impl CallRecord {
    pub fn new(method: impl Into<String>, arguments: &[Argument]) -> Self {
        Self {
            method: method.into(),
            arguments: arguments.to_vec(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

impl Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;
        for (idx, arg) in self.arguments.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Records every invocation of one mock instance and checks exact-count
/// expectations against them.
#[derive(Debug, Default, Clone)]
pub struct CallLedger {
    calls: HashMap<CallRecord, usize>,
}

impl CallLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of the matching call, inserting it if absent.
    pub fn track(&mut self, method: &str, arguments: &[Argument]) {
        *self
            .calls
            .entry(CallRecord::new(method, arguments))
            .or_insert(0) += 1;
    }

    /// Number of recorded calls matching `method` and `arguments`, zero if the
    /// call was never tracked.
    pub fn count(&self, method: &str, arguments: &[Argument]) -> usize {
        self.calls
            .get(&CallRecord::new(method, arguments))
            .copied()
            .unwrap_or(0)
    }

    /// Succeeds only if exactly `expected` matching calls were recorded.
    ///
    /// Expecting zero calls of a method that was never tracked succeeds.
    pub fn check(
        &self,
        method: &str,
        arguments: &[Argument],
        expected: usize,
    ) -> Result<(), VerificationError> {
        let actual = self.count(method, arguments);
        if actual == expected {
            Ok(())
        } else {
            Err(VerificationError {
                call: CallRecord::new(method, arguments),
                expected,
                actual,
            })
        }
    }

    /// Total number of recorded calls, all methods included.
    pub fn total(&self) -> usize {
        self.calls.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_call_counts_zero() {
        let ledger = CallLedger::new();
        assert_eq!(ledger.count("void_method", &[]), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn track_accumulates_per_method() {
        let mut ledger = CallLedger::new();
        ledger.track("void_method", &[]);
        ledger.track("void_method", &[]);
        ledger.track("int_method", &[]);

        assert_eq!(ledger.count("void_method", &[]), 2);
        assert_eq!(ledger.count("int_method", &[]), 1);
        assert_eq!(ledger.total(), 3);
    }

    #[test]
    fn arguments_are_part_of_the_record() {
        let mut ledger = CallLedger::new();
        ledger.track("save", &[Argument::new(&1)]);

        assert_eq!(ledger.count("save", &[Argument::new(&1)]), 1);
        assert_eq!(ledger.count("save", &[Argument::new(&2)]), 0);
        assert_eq!(ledger.count("save", &[]), 0);
    }

    #[test]
    fn check_exact_count() {
        let mut ledger = CallLedger::new();
        for _ in 0..3 {
            ledger.track("int_method", &[]);
        }

        assert!(ledger.check("int_method", &[], 3).is_ok());

        let more = ledger.check("int_method", &[], 4).unwrap_err();
        assert_eq!(more.expected, 4);
        assert_eq!(more.actual, 3);

        let less = ledger.check("int_method", &[], 2).unwrap_err();
        assert_eq!(less.expected, 2);
        assert_eq!(less.actual, 3);
    }

    #[test]
    fn zero_expected_of_untracked_call_passes() {
        let ledger = CallLedger::new();
        assert!(ledger.check("void_method", &[], 0).is_ok());
    }

    #[test]
    fn expected_call_never_tracked_fails() {
        let ledger = CallLedger::new();
        let err = ledger.check("void_method", &[], 1).unwrap_err();
        assert_eq!(err.actual, 0);
        assert_eq!(err.call.method(), "void_method");
    }

    #[test]
    fn verification_message_is_fixed() {
        let mut ledger = CallLedger::new();
        ledger.track("void_method", &[]);

        let err = ledger.check("void_method", &[], 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected to receive exactly 2 call(s) matching:\n\
             \tvoid_method()\n\
             Actually received 1 matching call(s):\n\
             \tvoid_method()"
        );
    }

    #[test]
    fn call_record_renders_arguments() {
        let record = CallRecord::new("save", &[Argument::new(&1), Argument::new("a")]);
        assert_eq!(record.to_string(), "save(1, \"a\")");
    }
}
