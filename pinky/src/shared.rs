use crate::error::GhostError;
use crate::ledger::{Argument, CallLedger};

use std::any::{type_name, Any};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Behaviour of a generated mock method.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    /// Records the call and returns a value.
    Stub,
    /// Checks that exactly `expected` matching calls were recorded before
    /// returning the same value a stub would.
    Verifying { expected: usize },
}

/// State shared by a mock instance and every verifier built from it.
#[derive(Debug, Default)]
pub struct MockCore {
    ledger: RefCell<CallLedger>,
    overrides: RefCell<Overrides>,
}

impl MockCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry point of every generated method.
    ///
    /// # Panics
    ///
    /// In [`Mode::Verifying`] panics with the [`VerificationError`](crate::VerificationError)
    /// message when the recorded count differs from the expected one.
    #[track_caller]
    pub fn observe(&self, mode: Mode, method: &str, arguments: &[Argument]) {
        if let Err(err) = self.try_observe(mode, method, arguments) {
            panic!("{}", err);
        }
    }

    pub fn try_observe(
        &self,
        mode: Mode,
        method: &str,
        arguments: &[Argument],
    ) -> Result<(), GhostError> {
        match mode {
            Mode::Stub => {
                self.ledger.borrow_mut().track(method, arguments);
                Ok(())
            }
            Mode::Verifying { expected } => {
                self.ledger.borrow().check(method, arguments, expected)?;
                Ok(())
            }
        }
    }

    pub fn ledger(&self) -> Ref<'_, CallLedger> {
        self.ledger.borrow()
    }

    /// Stores a return value for `method` that takes precedence over the
    /// value baked in at expansion time.
    pub fn configure<T: Clone + 'static>(&self, method: &str, value: T) {
        self.overrides.borrow_mut().insert(method, value);
    }

    /// Runtime-configured return value of `method`, if any.
    pub fn configured<T: 'static>(&self, method: &str) -> Result<Option<T>, GhostError> {
        self.overrides.borrow().get(method)
    }

    /// Runtime-configured return value of `method`, or `fallback`.
    ///
    /// # Panics
    ///
    /// If the configured value is not a `T`.
    #[track_caller]
    pub fn returned<T: 'static>(&self, method: &str, fallback: impl FnOnce() -> T) -> T {
        match self.configured(method) {
            Ok(Some(value)) => value,
            Ok(None) => fallback(),
            Err(err) => panic!("{}", err),
        }
    }
}

type Producer<T> = Rc<dyn Fn() -> T>;

/// Typed return values keyed by method name.
///
/// Each value is stored as a type-erased `Producer<T>` so reading it back
/// does not require `T: Clone` at the call site.
#[derive(Debug, Default)]
struct Overrides {
    values: HashMap<String, Box<dyn Any>>,
}

impl Overrides {
    fn insert<T: Clone + 'static>(&mut self, method: &str, value: T) {
        let producer: Producer<T> = Rc::new(move || value.clone());
        self.values.insert(method.to_owned(), Box::new(producer));
    }

    fn get<T: 'static>(&self, method: &str) -> Result<Option<T>, GhostError> {
        match self.values.get(method) {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<Producer<T>>()
                .map(|producer| Some(producer()))
                .ok_or_else(|| GhostError::ConfiguredTypeMismatch {
                    method: method.to_owned(),
                    expected: type_name::<T>(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_mode_tracks() {
        let core = MockCore::new();
        core.observe(Mode::Stub, "f", &[]);
        core.observe(Mode::Stub, "f", &[]);
        assert_eq!(core.ledger().count("f", &[]), 2);
    }

    #[test]
    fn verifying_mode_does_not_track() {
        let core = MockCore::new();
        core.observe(Mode::Stub, "f", &[]);
        core.observe(Mode::Verifying { expected: 1 }, "f", &[]);
        assert_eq!(core.ledger().count("f", &[]), 1);
    }

    #[test]
    fn verifying_mode_reports_mismatch() {
        let core = MockCore::new();
        core.observe(Mode::Stub, "f", &[]);

        let err = core
            .try_observe(Mode::Verifying { expected: 2 }, "f", &[])
            .unwrap_err();
        match err {
            GhostError::Verification(err) => {
                assert_eq!(err.expected, 2);
                assert_eq!(err.actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[should_panic(expected = "Expected to receive exactly 1 call(s) matching:\n\tf()")]
    fn observe_panics_on_mismatch() {
        let core = MockCore::new();
        core.observe(Mode::Verifying { expected: 1 }, "f", &[]);
    }

    #[test]
    fn returned_prefers_configured_value() {
        let core = MockCore::new();
        assert_eq!(core.returned("f", || 15i32), 15);

        core.configure("f", 42i32);
        assert_eq!(core.returned("f", || 15i32), 42);
        assert_eq!(core.returned("f", || 15i32), 42);
    }

    #[test]
    fn configure_is_last_write_wins() {
        let core = MockCore::new();
        core.configure("f", String::from("first"));
        core.configure("f", String::from("second"));
        assert_eq!(core.returned("f", String::new), "second");
    }

    #[test]
    fn configured_with_wrong_type_is_an_error() {
        let core = MockCore::new();
        core.configure("f", 1u8);

        let err = core.configured::<i32>("f").unwrap_err();
        assert_eq!(
            err,
            GhostError::ConfiguredTypeMismatch {
                method: "f".to_owned(),
                expected: "i32",
            }
        );
    }
}
