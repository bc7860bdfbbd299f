//! Port onto the mock-object engine.
//!
//! The container does not generate mock objects itself; it consumes them
//! through this trait surface. A service type opts in by implementing
//! [`Mockable`] (which mock type backs it, how to fabricate one) and
//! [`MockView`] (how to produce the service object from a shared mock).
//! One mock type may back several service types, which is what the
//! container's `combine` builds on.
//!
//! Hand-written mocks usually embed a [`MockCore`](crate::MockCore) to
//! satisfy [`MockControl`]; any other engine (e.g. a `mockall`-generated
//! mock behind a small adapter) works the same way.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::behavior::MockBehavior;

/// Shared, mutable handle to a fabricated mock.
///
/// The container memoizes one handle per service type; `setup` borrows it
/// mutably, produced service objects borrow it for each forwarded call.
pub type SharedMock<M> = Rc<RefCell<M>>;

/// Wraps a freshly fabricated mock into a [`SharedMock`].
pub fn shared<M>(mock: M) -> SharedMock<M> {
	Rc::new(RefCell::new(mock))
}

/// Verification failure reported by a mock.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VerifyError {
	message: String,
}

impl VerifyError {
	/// Creates a failure report with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Control surface every fabricated mock exposes to the container.
pub trait MockControl: Any {
	/// Checks expectations explicitly marked for verification.
	fn verify(&self) -> Result<(), VerifyError>;

	/// Checks every configured expectation.
	fn verify_all(&self) -> Result<(), VerifyError>;

	/// Number of recorded invocations of `method`.
	fn call_count(&self, method: &str) -> usize;

	/// Stubs property accessors so reads observe prior writes.
	///
	/// Engines without property tracking may ignore this.
	fn setup_all_properties(&mut self) {}
}

/// A service type the container can fabricate a mock for.
pub trait Mockable: MockView<Self::Mock> + Any + Sized {
	/// The mock type backing this service.
	type Mock: MockControl + 'static;

	/// Fabricates a fresh mock under the given strictness behavior.
	fn new_mock(behavior: MockBehavior) -> Self::Mock;
}

/// A service view over a shared mock.
///
/// Implemented by every service type a mock of type `M` can be exposed
/// as. The primary service implements it through [`Mockable`]; additional
/// implementations are what make a service eligible as a `combine` alias.
pub trait MockView<M>: Any + Sized {
	/// Produces the service object backed by `mock`.
	fn view(mock: &SharedMock<M>) -> Self;
}

/// A tuple of additional service views for `combine`.
///
/// Implemented for tuples of up to six [`MockView`] types.
pub trait MockViews<M>: 'static {
	/// Produces one `(type identity, service object)` pair per alias.
	fn views(mock: &SharedMock<M>) -> Vec<(std::any::TypeId, Box<dyn Any>)>;
}

impl<M: 'static> MockViews<M> for () {
	fn views(_mock: &SharedMock<M>) -> Vec<(std::any::TypeId, Box<dyn Any>)> {
		Vec::new()
	}
}

macro_rules! impl_mock_views {
	($($alias:ident),+) => {
		impl<M: 'static, $($alias: MockView<M>),+> MockViews<M> for ($($alias,)+) {
			fn views(mock: &SharedMock<M>) -> Vec<(std::any::TypeId, Box<dyn Any>)> {
				vec![$(
					(
						std::any::TypeId::of::<$alias>(),
						Box::new($alias::view(mock)) as Box<dyn Any>,
					)
				),+]
			}
		}
	};
}

impl_mock_views!(A);
impl_mock_views!(A, B);
impl_mock_views!(A, B, C);
impl_mock_views!(A, B, C, D);
impl_mock_views!(A, B, C, D, E);
impl_mock_views!(A, B, C, D, E, F);
