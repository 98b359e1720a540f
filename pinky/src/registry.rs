use crate::error::GhostError;
use crate::shared::{MockCore, Mode};

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// Constructor of one generated mock type.
///
/// Returns the mock boxed as `Box<dyn Contract>`, erased behind `Box<dyn Any>`.
pub type Factory = fn(Rc<MockCore>, Mode) -> Box<dyn Any>;

/// Registration table from call-site identity token to mock factory.
///
/// Built once by the generated dispatcher and passed to it explicitly.
#[derive(Default, Clone)]
pub struct Registry {
    factories: BTreeMap<&'static str, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: &'static str, factory: Factory) -> &mut Self {
        self.factories.insert(key, factory);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Constructs the mock registered for `key` in [`Mode::Stub`].
    pub fn summon<T: ?Sized + 'static>(&self, key: &'static str) -> Result<Ghosted<T>, GhostError> {
        let factory = self.factory(key)?;
        let core = Rc::new(MockCore::new());
        let mock = downcast::<T>(key, factory(Rc::clone(&core), Mode::Stub))?;

        Ok(Ghosted { key, core, mock })
    }

    /// Constructs the verifying variant of `ghost`'s registered type, bound to
    /// the same [`MockCore`] and expecting exactly `count` calls.
    pub fn received<T: ?Sized + 'static>(
        &self,
        ghost: &Ghosted<T>,
        count: usize,
    ) -> Result<Box<T>, GhostError> {
        let factory = self.factory(ghost.key)?;
        let mode = Mode::Verifying { expected: count };
        downcast::<T>(ghost.key, factory(Rc::clone(&ghost.core), mode))
    }

    fn factory(&self, key: &str) -> Result<Factory, GhostError> {
        self.factories
            .get(key)
            .copied()
            .ok_or_else(|| GhostError::NoMatchingSpecification {
                key: key.to_owned(),
            })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

fn downcast<T: ?Sized + 'static>(key: &str, erased: Box<dyn Any>) -> Result<Box<T>, GhostError> {
    erased
        .downcast::<Box<T>>()
        .map(|mock| *mock)
        .map_err(|_| GhostError::ContractMismatch {
            key: key.to_owned(),
            contract: type_name::<T>(),
        })
}

/// Mock instance handed to the test, typed as its contract.
pub struct Ghosted<T: ?Sized> {
    key: &'static str,
    core: Rc<MockCore>,
    mock: Box<T>,
}

impl<T: ?Sized> Ghosted<T> {
    /// Identity token of the call site that created this mock.
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn core(&self) -> &Rc<MockCore> {
        &self.core
    }

    /// Number of recorded calls of `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.core.ledger().count(method, &[])
    }

    /// Makes every following call of `method` return `value`.
    pub fn configure<V: Clone + 'static>(&self, method: &str, value: V) -> &Self {
        self.core.configure(method, value);
        self
    }

    pub fn into_inner(self) -> Box<T> {
        self.mock
    }
}

impl<T: ?Sized> Deref for Ghosted<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.mock
    }
}

impl<T: ?Sized> DerefMut for Ghosted<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.mock
    }
}

impl<T: ?Sized> fmt::Debug for Ghosted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ghosted")
            .field("key", &self.key)
            .field("ledger", &*self.core.ledger())
            .finish_non_exhaustive()
    }
}
