//! The auto-mocking container.
//!
//! [`AutoMocker`] builds instances of a target type by resolving each
//! constructor parameter either from an explicitly registered service or
//! by fabricating a mock on demand. Fabricated mocks are memoized per
//! type, so repeated resolutions observe the same mock and each one can
//! be configured and verified individually.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut mocker = AutoMocker::new();
//! mocker.use_instance::<Rc<dyn Logger>>(Rc::new(StdoutLogger::default()));
//!
//! // `clock` is auto-mocked, `logger` is the registered instance.
//! let widget: Widget = mocker.create_instance()?;
//!
//! mocker.verify_called::<Rc<dyn Clock>>("now", Times::never())?;
//! mocker.verify_all()?;
//! ```
//!
//! The container is single-threaded by contract: no internal
//! synchronization, no blocking, no background work. Use one container
//! per test.

use std::any::{Any, TypeId, type_name};
use std::rc::Rc;

use tracing::debug;

use crate::behavior::{MockBehavior, Times};
use crate::constructor::{ArgBag, Constructible, ParamSpec, SelfMockable, select_constructor};
use crate::error::{MockerError, MockerResult};
use crate::mock::{MockControl, Mockable, MockViews, SharedMock, VerifyError, shared};
use crate::registry::{InstanceRecord, InstanceRegistry, MockInstance};
use crate::resolve::Resolve;

/// Auto-mocking dependency-resolution container.
pub struct AutoMocker {
	behavior: MockBehavior,
	registry: InstanceRegistry,
}

impl AutoMocker {
	/// Creates a container fabricating loose mocks.
	pub fn new() -> Self {
		Self::with_behavior(MockBehavior::Loose)
	}

	/// Creates a container fabricating mocks under `behavior`.
	pub fn with_behavior(behavior: MockBehavior) -> Self {
		Self {
			behavior,
			registry: InstanceRegistry::new(),
		}
	}

	/// The strictness applied to every mock this container fabricates.
	pub fn behavior(&self) -> MockBehavior {
		self.behavior
	}

	/// Constructs a `T` through its best public constructor, resolving
	/// every parameter from the registry or a fresh mock.
	///
	/// Registrations made before this call count toward constructor
	/// preference. A panic inside the constructor body propagates to the
	/// caller untouched.
	pub fn create_instance<T: Constructible>(&mut self) -> MockerResult<T> {
		self.create_instance_with(false)
	}

	/// Like [`create_instance`](Self::create_instance), optionally making
	/// non-public constructors eligible.
	pub fn create_instance_with<T: Constructible>(
		&mut self,
		allow_private: bool,
	) -> MockerResult<T> {
		let candidate = select_constructor::<T>(&self.registry, allow_private)?;
		let args = self.resolve_args(candidate.params())?;
		candidate.invoke(ArgBag::new(args))
	}

	/// Builds a partial mock of the concrete type `T`: a real instance
	/// constructed from resolved arguments, with its overridable behavior
	/// intercepted. The result is not registered.
	pub fn create_self_mock<T: SelfMockable>(&mut self) -> MockerResult<T> {
		self.create_self_mock_with(false)
	}

	/// Like [`create_self_mock`](Self::create_self_mock), optionally
	/// making non-public constructors eligible.
	pub fn create_self_mock_with<T: SelfMockable>(
		&mut self,
		allow_private: bool,
	) -> MockerResult<T> {
		let candidate = select_constructor::<T>(&self.registry, allow_private)?;
		let args = self.resolve_args(candidate.params())?;
		T::self_mock(self.behavior, ArgBag::new(args))
	}

	/// Registers a concrete value for the service type `S`, overwriting
	/// any existing record.
	///
	/// Call with an explicit service type so trait-object handles are not
	/// registered under their concrete type:
	/// `mocker.use_instance::<Rc<dyn Logger>>(logger)`.
	pub fn use_instance<S: Any>(&mut self, value: S) {
		debug!(service = type_name::<S>(), "registering real instance");
		self.registry
			.set(TypeId::of::<S>(), Rc::new(InstanceRecord::real(value)));
	}

	/// Registers a type-erased value for `S`, failing fast when the
	/// value's concrete type is not `S`.
	pub fn use_boxed<S: Any>(&mut self, value: Box<dyn Any>) -> MockerResult<()> {
		match value.downcast::<S>() {
			Ok(value) => {
				self.use_instance::<S>(*value);
				Ok(())
			}
			Err(_) => Err(MockerError::InvalidRegistration {
				expected: type_name::<S>(),
			}),
		}
	}

	/// Registers an existing mock handle as the record for `S`.
	pub fn use_mock<S: Mockable>(&mut self, mock: SharedMock<S::Mock>) {
		debug!(service = type_name::<S>(), "registering supplied mock");
		let record = InstanceRecord::Mock(MockInstance::from_shared::<S>(self.behavior, mock));
		self.registry.set(TypeId::of::<S>(), Rc::new(record));
	}

	/// Fabricates a mock for `S`, applies `configure` to it, registers it
	/// and returns the handle.
	pub fn use_configured<S: Mockable>(
		&mut self,
		configure: impl FnOnce(&mut S::Mock),
	) -> SharedMock<S::Mock> {
		let mock = shared(S::new_mock(self.behavior));
		configure(&mut mock.borrow_mut());
		self.use_mock::<S>(Rc::clone(&mock));
		mock
	}

	/// Resolves a service value: the registered record's produced object,
	/// or a freshly fabricated (and memoized) mock.
	///
	/// Works for any resolvable type, including ones that could never be
	/// constructed by injection.
	pub fn get<S: Resolve>(&mut self) -> MockerResult<S> {
		S::resolve(self)
	}

	/// The produced object of an already-registered record, if any.
	pub fn registered<S: Any + Clone>(&self) -> Option<S> {
		self.registry
			.get(TypeId::of::<S>())
			.and_then(|record| record.produced::<S>())
	}

	/// Whether a record is registered for `S`.
	pub fn is_registered<S: Any>(&self) -> bool {
		self.registry.contains(TypeId::of::<S>())
	}

	/// Lookup-or-fabricate for a mockable service type.
	pub fn resolve_mockable<S: Mockable + Clone>(&mut self) -> MockerResult<S> {
		if let Some(record) = self.registry.get(TypeId::of::<S>()) {
			return record
				.produced::<S>()
				.ok_or_else(|| mismatch::<S>(record_shape(record)));
		}
		let record = self.registry.get_or_create_mock::<S>(self.behavior);
		record
			.produced::<S>()
			.ok_or_else(|| mismatch::<S>(record_shape(&record)))
	}

	/// Lookup-or-fabricate for the array form of a mockable element type.
	///
	/// A fresh aggregate is seeded with any already-registered `E`
	/// record, so a service injected via `use_*` also shows up inside the
	/// resolved array.
	pub fn resolve_vec<E: Mockable + Clone>(&mut self) -> MockerResult<Vec<E>> {
		let record = self.registry.get_or_create_vec::<E>();
		match &*record {
			InstanceRecord::MockArray(array) => Ok(array.produced_vec::<E>()),
			other => other.produced::<Vec<E>>().ok_or_else(|| {
				MockerError::MockTypeMismatch {
					type_name: type_name::<Vec<E>>(),
					expected: "mock array aggregate",
					actual: record_shape(other),
				}
			}),
		}
	}

	/// Resolves a constructor argument as a type-erased box.
	pub fn resolve_boxed<P: Resolve>(&mut self) -> MockerResult<Box<dyn Any>> {
		P::resolve(self).map(|value| Box::new(value) as Box<dyn Any>)
	}

	/// The mock handle for `S`, fabricating one if nothing is registered.
	///
	/// Fails with [`MockerError::NotAMock`] if `S` was registered as a
	/// real instance: the caller supplied a non-mock and then asked for
	/// mock-level control over it.
	pub fn get_mock<S: Mockable>(&mut self) -> MockerResult<SharedMock<S::Mock>> {
		if let Some(record) = self.registry.get(TypeId::of::<S>()) {
			return match &**record {
				InstanceRecord::Real { .. } => Err(MockerError::NotAMock {
					type_name: type_name::<S>(),
				}),
				InstanceRecord::Mock(mock) => mock
					.handle::<S::Mock>()
					.ok_or_else(|| mismatch::<S>(mock.mock_type())),
				InstanceRecord::MockArray(_) => Err(mismatch::<S>("mock array aggregate")),
			};
		}
		let record = self.registry.get_or_create_mock::<S>(self.behavior);
		let InstanceRecord::Mock(mock) = &*record else {
			return Err(mismatch::<S>(record_shape(&record)));
		};
		mock.handle::<S::Mock>()
			.ok_or_else(|| mismatch::<S>(mock.mock_type()))
	}

	/// Locates or fabricates the mock for `S`, registers it and applies
	/// `configure` to it.
	///
	/// A real-instance record for `S` is replaced by the fresh mock.
	/// Fails fast with [`MockerError::MockTypeMismatch`] before any
	/// configuration if the record's mock is not `S::Mock`.
	pub fn setup<S: Mockable>(
		&mut self,
		configure: impl FnOnce(&mut S::Mock),
	) -> MockerResult<SharedMock<S::Mock>> {
		let handle = self.mock_handle_or_create::<S>()?;
		configure(&mut handle.borrow_mut());
		Ok(handle)
	}

	/// Stubs property accessors on the mock for `S`.
	pub fn setup_all_properties<S: Mockable>(&mut self) -> MockerResult<()> {
		let handle = self.mock_handle_or_create::<S>()?;
		handle.borrow_mut().setup_all_properties();
		Ok(())
	}

	/// Fabricates one mock of `S::Mock` and registers the same record
	/// under `S` and every alias in `Aliases`.
	///
	/// Exactly one underlying mock instance backs all aliased keys:
	/// calls recorded through any alias view are observed through every
	/// other, and verification visits the shared record once.
	pub fn combine<S, Aliases>(&mut self)
	where
		S: Mockable,
		Aliases: MockViews<S::Mock>,
	{
		let mock = shared(S::new_mock(self.behavior));
		let mut views = Aliases::views(&mock);
		views.push((TypeId::of::<S>(), Box::new(S::view(&mock)) as Box<dyn Any>));
		let ids: Vec<TypeId> = views.iter().map(|(id, _)| *id).collect();
		let record = Rc::new(InstanceRecord::Mock(MockInstance::with_views(
			self.behavior,
			mock,
			views.into_iter().collect(),
		)));
		debug!(
			primary = type_name::<S>(),
			aliases = ids.len() - 1,
			"registered combined mock"
		);
		for id in ids {
			self.registry.set(id, Rc::clone(&record));
		}
	}

	/// Verifies that `method` on the mock for `S` was called per `times`.
	///
	/// Fabricates the mock if nothing is registered, so expecting
	/// [`Times::never`] on an untouched service passes.
	pub fn verify_called<S: Mockable>(
		&mut self,
		method: &'static str,
		times: Times,
	) -> MockerResult<()> {
		self.check_called::<S>(method, times, None)
	}

	/// Like [`verify_called`](Self::verify_called) with a custom message
	/// prefixed to the failure report.
	pub fn verify_called_msg<S: Mockable>(
		&mut self,
		method: &'static str,
		times: Times,
		message: &str,
	) -> MockerResult<()> {
		self.check_called::<S>(method, times, Some(message))
	}

	/// Checks expectations explicitly marked verifiable, on every mock
	/// record. Real-instance records are skipped.
	pub fn verify(&self) -> MockerResult<()> {
		self.verify_records(&|control| control.verify())
	}

	/// Checks every configured expectation on every mock record.
	/// Real-instance records are skipped.
	pub fn verify_all(&self) -> MockerResult<()> {
		self.verify_records(&|control| control.verify_all())
	}

	fn resolve_args(&mut self, params: &[ParamSpec]) -> MockerResult<Vec<Box<dyn Any>>> {
		params.iter().map(|param| param.resolve(self)).collect()
	}

	fn mock_handle_or_create<S: Mockable>(&mut self) -> MockerResult<SharedMock<S::Mock>> {
		let record = self.registry.get_or_create_mock::<S>(self.behavior);
		let InstanceRecord::Mock(mock) = &*record else {
			return Err(mismatch::<S>(record_shape(&record)));
		};
		mock.handle::<S::Mock>()
			.ok_or_else(|| mismatch::<S>(mock.mock_type()))
	}

	fn verify_records(
		&self,
		check: &dyn Fn(&dyn MockControl) -> Result<(), VerifyError>,
	) -> MockerResult<()> {
		// Combine aliases the same record under several keys; dedup by
		// record identity so each mock is verified exactly once.
		let mut seen: Vec<*const InstanceRecord> = Vec::new();
		for record in self.registry.records() {
			Self::verify_record(record, &mut seen, check)?;
		}
		Ok(())
	}

	fn verify_record(
		record: &Rc<InstanceRecord>,
		seen: &mut Vec<*const InstanceRecord>,
		check: &dyn Fn(&dyn MockControl) -> Result<(), VerifyError>,
	) -> MockerResult<()> {
		let ptr = Rc::as_ptr(record);
		if seen.contains(&ptr) {
			return Ok(());
		}
		seen.push(ptr);
		match &**record {
			InstanceRecord::Real { .. } => Ok(()),
			InstanceRecord::Mock(mock) => {
				let control = mock.control();
				let borrowed = control.borrow();
				check(&*borrowed).map_err(|err| MockerError::VerificationFailed {
					type_name: mock.mock_type(),
					message: err.to_string(),
				})
			}
			InstanceRecord::MockArray(array) => {
				for element in array.elements() {
					Self::verify_record(element, seen, check)?;
				}
				Ok(())
			}
		}
	}

	fn check_called<S: Mockable>(
		&mut self,
		method: &'static str,
		times: Times,
		message: Option<&str>,
	) -> MockerResult<()> {
		let mock = self.get_mock::<S>()?;
		let count = mock.borrow().call_count(method);
		if times.is_satisfied_by(count) {
			return Ok(());
		}
		let detail = format!("`{method}` expected {times} but was called {count} time(s)");
		let message = match message {
			Some(prefix) => format!("{prefix}: {detail}"),
			None => detail,
		};
		Err(MockerError::VerificationFailed {
			type_name: type_name::<S>(),
			message,
		})
	}
}

impl Default for AutoMocker {
	fn default() -> Self {
		Self::new()
	}
}

fn mismatch<S: Mockable>(actual: &'static str) -> MockerError {
	MockerError::MockTypeMismatch {
		type_name: type_name::<S>(),
		expected: type_name::<S::Mock>(),
		actual,
	}
}

fn record_shape(record: &InstanceRecord) -> &'static str {
	match record {
		InstanceRecord::Real { .. } => "real instance",
		InstanceRecord::Mock(mock) => mock.mock_type(),
		InstanceRecord::MockArray(_) => "mock array aggregate",
	}
}
