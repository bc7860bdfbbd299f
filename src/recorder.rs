//! Call-recording core for hand-written mock implementations.
//!
//! `MockCore` is the primitive a mock type embeds to satisfy the engine
//! port: it records invocations, holds configured expectations, enforces
//! the strictness policy and answers verification queries. Return values
//! stay in the embedding type, where they keep their concrete types.
//!
//! # Examples
//!
//! ```
//! use automocker::{MockBehavior, MockCore, Times};
//!
//! let core = MockCore::new("MockClock", MockBehavior::Loose);
//! core.expect("now").times(Times::once()).verifiable();
//!
//! core.record("now");
//! assert_eq!(core.call_count("now"), 1);
//! assert!(core.verify().is_ok());
//! assert!(core.verify_all().is_ok());
//! ```

use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::behavior::{MockBehavior, Times};
use crate::mock::VerifyError;

/// A single recorded invocation.
#[derive(Debug, Clone)]
pub struct CallRecord {
	/// Invoked method name.
	pub method: &'static str,
	/// Rendered arguments, if the caller recorded any.
	pub args: Vec<String>,
}

#[derive(Debug)]
struct Expectation {
	method: &'static str,
	times: Times,
	verifiable: bool,
}

/// Recording core embedded by mock implementations.
#[derive(Debug)]
pub struct MockCore {
	type_name: &'static str,
	behavior: MockBehavior,
	calls: RefCell<Vec<CallRecord>>,
	expectations: RefCell<Vec<Expectation>>,
	all_properties: Cell<bool>,
}

impl MockCore {
	/// Creates a core for the named mock type under the given behavior.
	pub fn new(type_name: &'static str, behavior: MockBehavior) -> Self {
		Self {
			type_name,
			behavior,
			calls: RefCell::new(Vec::new()),
			expectations: RefCell::new(Vec::new()),
			all_properties: Cell::new(false),
		}
	}

	/// The strictness this core enforces.
	pub fn behavior(&self) -> MockBehavior {
		self.behavior
	}

	/// The mock type name used in failure reports.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Records an argument-less invocation.
	///
	/// # Panics
	///
	/// Under [`MockBehavior::Strict`], panics if no expectation is
	/// configured for `method`.
	pub fn record(&self, method: &'static str) {
		self.record_call(method, Vec::new());
	}

	/// Records an invocation with rendered arguments.
	///
	/// # Panics
	///
	/// Under [`MockBehavior::Strict`], panics if no expectation is
	/// configured for `method`.
	pub fn record_args(&self, method: &'static str, args: Vec<String>) {
		self.record_call(method, args);
	}

	fn record_call(&self, method: &'static str, args: Vec<String>) {
		if self.behavior == MockBehavior::Strict
			&& !self
				.expectations
				.borrow()
				.iter()
				.any(|expectation| expectation.method == method)
		{
			panic!(
				"strict mock `{}`: unexpected call to `{}` with no matching setup",
				self.type_name, method
			);
		}
		trace!(mock = self.type_name, method, "recorded call");
		self.calls.borrow_mut().push(CallRecord { method, args });
	}

	/// Configures an expectation for `method` and returns a token to refine
	/// it. Newly configured expectations default to [`Times::at_least`] one
	/// call and are not marked verifiable.
	pub fn expect(&self, method: &'static str) -> ExpectationToken<'_> {
		let mut expectations = self.expectations.borrow_mut();
		expectations.push(Expectation {
			method,
			times: Times::at_least(1),
			verifiable: false,
		});
		let index = expectations.len() - 1;
		drop(expectations);
		ExpectationToken { core: self, index }
	}

	/// Number of recorded invocations of `method`.
	pub fn call_count(&self, method: &str) -> usize {
		self.calls
			.borrow()
			.iter()
			.filter(|call| call.method == method)
			.count()
	}

	/// Snapshot of every recorded invocation, in order.
	pub fn calls(&self) -> Vec<CallRecord> {
		self.calls.borrow().clone()
	}

	/// Checks expectations explicitly marked verifiable.
	pub fn verify(&self) -> Result<(), VerifyError> {
		self.check(|expectation| expectation.verifiable)
	}

	/// Checks every configured expectation.
	pub fn verify_all(&self) -> Result<(), VerifyError> {
		self.check(|_| true)
	}

	/// Marks property accessors as stubbed.
	pub fn stub_all_properties(&self) {
		self.all_properties.set(true);
	}

	/// Whether property accessors are stubbed.
	pub fn properties_stubbed(&self) -> bool {
		self.all_properties.get()
	}

	fn check(&self, include: impl Fn(&Expectation) -> bool) -> Result<(), VerifyError> {
		let failures: Vec<String> = self
			.expectations
			.borrow()
			.iter()
			.filter(|expectation| include(expectation))
			.filter_map(|expectation| {
				let count = self.call_count(expectation.method);
				if expectation.times.is_satisfied_by(count) {
					None
				} else {
					Some(format!(
						"`{}` expected {} but was called {} time(s)",
						expectation.method, expectation.times, count
					))
				}
			})
			.collect();
		if failures.is_empty() {
			Ok(())
		} else {
			Err(VerifyError::new(format!(
				"{}: {}",
				self.type_name,
				failures.join("; ")
			)))
		}
	}
}

/// Refines the most recently configured expectation.
pub struct ExpectationToken<'a> {
	core: &'a MockCore,
	index: usize,
}

impl ExpectationToken<'_> {
	/// Sets the expected call cardinality.
	pub fn times(self, times: Times) -> Self {
		if let Some(expectation) = self.core.expectations.borrow_mut().get_mut(self.index) {
			expectation.times = times;
		}
		self
	}

	/// Marks the expectation for [`MockCore::verify`].
	pub fn verifiable(self) -> Self {
		if let Some(expectation) = self.core.expectations.borrow_mut().get_mut(self.index) {
			expectation.verifiable = true;
		}
		self
	}
}
