//! Constructor metadata and overload selection.
//!
//! Rust has no runtime constructor reflection, so a constructible type
//! supplies a small metadata table instead: one [`ConstructorCandidate`]
//! per overload, carrying the ordered parameter specs and an invocable
//! handle. The [`constructible!`](crate::constructible) macro generates
//! the table from ordinary constructor signatures.
//!
//! Selection ranks eligible candidates by most parameters first, then by
//! most parameters whose type is already registered (explicitly supplied
//! services beat freshly fabricated mocks), then by declaration order.

use std::any::{Any, TypeId, type_name};
use std::collections::VecDeque;

use tracing::debug;

use crate::behavior::MockBehavior;
use crate::container::AutoMocker;
use crate::error::{MockerError, MockerResult};
use crate::registry::InstanceRegistry;
use crate::resolve::Resolve;

/// One constructor parameter: its type identity and how to resolve it.
pub struct ParamSpec {
	type_id: fn() -> TypeId,
	type_name: fn() -> &'static str,
	resolve: fn(&mut AutoMocker) -> MockerResult<Box<dyn Any>>,
}

impl ParamSpec {
	/// Describes a parameter of type `P`.
	pub fn of<P: Resolve>() -> Self {
		Self {
			type_id: TypeId::of::<P>,
			type_name: type_name::<P>,
			resolve: |mocker| mocker.resolve_boxed::<P>(),
		}
	}

	/// Type identity of the parameter.
	pub fn type_id(&self) -> TypeId {
		(self.type_id)()
	}

	/// Parameter type name.
	pub fn type_name(&self) -> &'static str {
		(self.type_name)()
	}

	pub(crate) fn resolve(&self, mocker: &mut AutoMocker) -> MockerResult<Box<dyn Any>> {
		(self.resolve)(mocker)
	}
}

/// Ordered, type-erased arguments handed to a constructor invocation.
pub struct ArgBag {
	args: VecDeque<Box<dyn Any>>,
}

impl ArgBag {
	pub(crate) fn new(args: Vec<Box<dyn Any>>) -> Self {
		Self { args: args.into() }
	}

	/// Takes the next argument, downcast to its declared type.
	pub fn take<P: Any>(&mut self) -> MockerResult<P> {
		let mismatch = || MockerError::ArgumentMismatch {
			type_name: type_name::<P>(),
		};
		let boxed = self.args.pop_front().ok_or_else(mismatch)?;
		boxed.downcast::<P>().map(|value| *value).map_err(|_| mismatch())
	}

	/// Number of arguments not yet taken.
	pub fn remaining(&self) -> usize {
		self.args.len()
	}
}

/// A constructor overload: ordered parameters plus an invocable handle.
pub struct ConstructorCandidate<T> {
	params: Vec<ParamSpec>,
	public: bool,
	invoke: fn(ArgBag) -> MockerResult<T>,
}

impl<T> ConstructorCandidate<T> {
	/// Builds a candidate from its parameter specs and invocation handle.
	pub fn new(
		public: bool,
		params: Vec<ParamSpec>,
		invoke: fn(ArgBag) -> MockerResult<T>,
	) -> Self {
		Self {
			params,
			public,
			invoke,
		}
	}

	/// Ordered parameter specs.
	pub fn params(&self) -> &[ParamSpec] {
		&self.params
	}

	/// Whether the constructor is publicly visible.
	pub fn is_public(&self) -> bool {
		self.public
	}

	pub(crate) fn invoke(&self, args: ArgBag) -> MockerResult<T> {
		(self.invoke)(args)
	}
}

/// A type the container can construct by resolving constructor arguments.
///
/// Candidates must be listed in declaration order; order is the final
/// ranking tie-break.
pub trait Constructible: Sized + 'static {
	/// The constructor metadata table.
	fn constructors() -> Vec<ConstructorCandidate<Self>>;
}

/// A concrete type the mocking engine can build as a partial mock: a real
/// instance constructed from the given arguments, with its overridable
/// behavior intercepted.
///
/// Rust has no general proxy-based spy capability, so each self-mockable
/// type supplies this construction itself (typically by embedding a
/// [`MockCore`](crate::MockCore) that its overridable methods consult).
pub trait SelfMockable: Constructible {
	/// Builds the partial mock from already-resolved constructor arguments.
	fn self_mock(behavior: MockBehavior, args: ArgBag) -> MockerResult<Self>;
}

/// Picks the best eligible constructor for `T` against the currently
/// registered type set.
pub(crate) fn select_constructor<T: Constructible>(
	registry: &InstanceRegistry,
	allow_private: bool,
) -> MockerResult<ConstructorCandidate<T>> {
	let mut best: Option<(ConstructorCandidate<T>, (usize, usize))> = None;
	for candidate in T::constructors() {
		if !candidate.is_public() && !allow_private {
			continue;
		}
		let arity = candidate.params().len();
		let known = candidate
			.params()
			.iter()
			.filter(|param| registry.contains(ParamSpec::type_id(param)))
			.count();
		let score = (arity, known);
		// Strict comparison keeps the earliest candidate on ties,
		// which is the declaration-order tie-break.
		let replace = best.as_ref().is_none_or(|(_, current)| score > *current);
		if replace {
			best = Some((candidate, score));
		}
	}
	match best {
		Some((candidate, (arity, known))) => {
			debug!(ty = type_name::<T>(), arity, known, "selected constructor");
			Ok(candidate)
		}
		None => Err(MockerError::NoConstructorFound {
			type_name: type_name::<T>(),
		}),
	}
}
