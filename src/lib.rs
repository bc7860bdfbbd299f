//! # Automocker
//!
//! Auto-mocking dependency-resolution container for unit tests.
//!
//! Given a target type, [`AutoMocker`] constructs an instance by
//! resolving each constructor parameter either from an explicitly
//! registered service or by fabricating a mock on demand. Mocks are
//! memoized per type, so repeated resolutions are stable and each mock
//! can be configured and verified individually.
//!
//! ## Features
//!
//! - **Constructor selection**: picks the best overload deterministically
//!   (most parameters first, registered services preferred, declaration
//!   order as the tie-break)
//! - **Memoized mocks**: one mock per service type for the container's
//!   lifetime, shared between the object graph and the test's assertions
//! - **Combine**: several service types aliased onto one underlying mock
//! - **Self-mocks**: partial mocks of concrete types, built from resolved
//!   constructor arguments
//! - **Verification**: per-expectation (`verify`/`verify_all`) and
//!   per-call (`verify_called` with [`Times`]) checks
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use automocker::{AutoMocker, Times};
//!
//! let mut mocker = AutoMocker::new();
//! mocker.use_instance::<Rc<dyn Logger>>(Rc::new(StdoutLogger::default()));
//!
//! // Widget's logger is the registered instance, its clock a fresh mock.
//! let widget: Widget = mocker.create_instance()?;
//! widget.greet();
//!
//! mocker.verify_called::<Rc<dyn Clock>>("now", Times::never())?;
//! mocker.verify_all()?;
//! ```
//!
//! Rust has no runtime reflection, so types opt in through small trait
//! impls: [`Constructible`] (generated by [`constructible!`]) lists the
//! constructor overloads, [`Mockable`]/[`MockView`] bind a service type
//! to the mock type backing it, and [`Resolve`] (generated by
//! [`resolve_via_mock!`]) tells the container how to obtain a parameter
//! value. The mock-object engine itself is a black box behind
//! [`MockControl`]; hand-written doubles embed a [`MockCore`], and other
//! engines plug in through thin adapters.
//!
//! The container is single-threaded by contract: use one per test, or
//! one per thread.

mod behavior;
mod constructor;
mod container;
mod error;
mod macros;
mod mock;
mod recorder;
mod registry;
mod resolve;

pub use behavior::{MockBehavior, Times};
pub use constructor::{ArgBag, Constructible, ConstructorCandidate, ParamSpec, SelfMockable};
pub use container::AutoMocker;
pub use error::{MockerError, MockerResult};
pub use mock::{MockControl, MockView, MockViews, Mockable, SharedMock, VerifyError, shared};
pub use recorder::{CallRecord, ExpectationToken, MockCore};
pub use registry::{InstanceRecord, InstanceRegistry, MockArrayInstance, MockInstance};
pub use resolve::Resolve;
