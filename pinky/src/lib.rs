//! # Pinky
//!
//! This library provides the procedural macro that reads the tests of a module and
//! generates, for every mock requested there, a struct that implements the mocked
//! trait and records each call.
//!
//! ## User guide
//! - [Getting started](#getting-started)
//! - [Return values](#return-values)
//! - [Verifying calls](#verifying-calls)
//! - [Dispatcher name](#dispatcher-name)
//! - [Nested modules](#nested-modules)
//! - [Restrictions](#restrictions)
//!
//! ### Getting started
//!
//! Put the `ghost` attribute on the module holding your tests and ask the `Ghost`
//! dispatcher for a mock of the trait you want:
//! ```ignore
//! #[pinky::ghost] // <-- this macro
//! mod samples {
//!     pub trait IWithIntMethod {
//!         fn int_method(&self) -> i32;
//!     }
//!
//!     #[test]
//!     fn int_method_defaults_to_zero() {
//!         let instance = Ghost::of::<dyn IWithIntMethod>();
//!
//!         assert_eq!(instance.int_method(), 0);
//!     }
//! }
//! ```
//!
//! #### How its work
//! The macro finds every `Ghost::of::<dyn Trait>()` inside a test function, reads the
//! members of `Trait` and generates one mock struct per test function. The call site
//! is rewritten to pass its own identity (`"samples::int_method_defaults_to_zero"`),
//! which the generated dispatcher uses to pick the right struct.
//!
//! ### Return values
//!
//! Methods return the default value of their return type. A constant return value can
//! be specified in the test itself:
//! ```ignore
//! #[test]
//! fn change_int_return() {
//!     let instance = Ghost::of::<dyn IWithIntMethod>();
//!
//!     const DESIRED: i32 = 15;
//!     instance.int_method().returns(DESIRED); // <-- read by the macro, removed from the test
//!
//!     assert_eq!(instance.int_method(), 15);
//! }
//! ```
//!
//! The argument of `returns` must be a literal or a `const` declared in the test or in
//! its module, otherwise the method keeps its default. If the same method is configured
//! several times, the last one wins.
//!
//! Values can also be set at runtime, they take precedence over `returns`:
//! ```ignore
//! let instance = Ghost::of::<dyn IWithIntMethod>();
//! instance.configure("int_method", 42i32);
//!
//! assert_eq!(instance.int_method(), 42);
//! ```
//!
//! ### Verifying calls
//!
//! Each mock counts its calls. `Ghost::received` returns the same mock in verifying
//! mode: calling a method on it checks the exact count instead of recording it.
//! ```ignore
//! #[test]
//! fn track_method_call() {
//!     let instance = Ghost::of::<dyn IWithVoidMethod>();
//!     instance.void_method();
//!
//!     Ghost::received(&instance, 1).void_method();
//!     Ghost::did_not_receive(&instance).other_method();
//! }
//! ```
//!
//! A mismatch panics with:
//! ```text
//! Expected to receive exactly 2 call(s) matching:
//!     void_method()
//! Actually received 1 matching call(s):
//!     void_method()
//! ```
//!
//! ### Dispatcher name
//!
//! By default the dispatcher is called `Ghost` and the configuration method `returns`.
//! Both can be customised:
//! ```ignore
//! #[pinky::ghost(rename = "Phantom", returns = "will_return")]
//! mod samples {
//!     // Phantom::of::<dyn Trait>(), instance.f().will_return(1)
//! }
//! ```
//!
//! ### Nested modules
//!
//! Tests and traits in inline submodules are analyzed too. `Ghost::of` works there
//! as is, `Ghost::received` needs `use super::Ghost;`.
//!
//! ### Restrictions
//!
//! - The mocked trait must be declared in the annotated module (or one of its inline
//!   submodules) and be usable as `dyn Trait`: no generics, supertraits, associated
//!   items, static, `async` or generic methods
//! - Return types without a default value (`Result<_, _>`, references other than
//!   `&str`/`&[T]`, `impl Trait`) are rejected
//! - Calls are matched by method name and count, not by arguments
//! - Inside macro invocations, `Ghost::of` and `returns` are only seen when the arguments
//!   are comma-separated expressions, as in `assert_eq!` or `dbg!`
//! - Mocks are `!Send`, one mock instance belongs to one thread
//!
//! The runtime side is usable by hand as well:
//! ```
//! use pinky::CallLedger;
//!
//! let mut ledger = CallLedger::new();
//! ledger.track("void_method", &[]);
//!
//! assert!(ledger.check("void_method", &[], 1).is_ok());
//! assert_eq!(
//!     ledger.check("void_method", &[], 2).unwrap_err().to_string(),
//!     "Expected to receive exactly 2 call(s) matching:\n\tvoid_method()\n\
//!      Actually received 1 matching call(s):\n\tvoid_method()",
//! );
//! ```

mod error;
mod ledger;
mod registry;
mod shared;

pub use error::{GhostError, VerificationError};
pub use ledger::{Argument, CallLedger, CallRecord};
pub use pinky_derive::ghost;
pub use registry::{Factory, Ghosted, Registry};
pub use shared::{MockCore, Mode};
