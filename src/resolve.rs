//! Resolution trait for constructor parameters and `get`.

use crate::container::AutoMocker;
use crate::error::MockerResult;
use crate::mock::Mockable;

/// How a value of this type is obtained from the container.
///
/// Mockable service types get their implementations from the
/// [`resolve_via_mock!`](crate::resolve_via_mock) macro: registry lookup
/// first, then fabricate-and-memoize a mock. Types that should never be
/// mocked can implement this directly, e.g. by reading a registered
/// value or falling back to a default.
pub trait Resolve: Sized + 'static {
	/// Produces a value of this type from the container.
	fn resolve(mocker: &mut AutoMocker) -> MockerResult<Self>;
}

/// The array form of any mockable element type resolves to the mock
/// array aggregate for that element.
impl<E: Mockable + Clone> Resolve for Vec<E> {
	fn resolve(mocker: &mut AutoMocker) -> MockerResult<Self> {
		mocker.resolve_vec::<E>()
	}
}
