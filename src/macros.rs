//! Declarative helpers wiring user types into the container.

/// Implements [`Constructible`](crate::Constructible) from a list of
/// constructor signatures, in declaration order.
///
/// Each listed constructor must exist on the target type with the same
/// name and parameter list and return `Self`. Constructors written with
/// `pub` are eligible by default; the rest only when the caller allows
/// non-public constructors.
///
/// # Examples
///
/// ```rust,ignore
/// automocker::constructible! {
///     impl Widget {
///         pub fn new(logger: Rc<dyn Logger>, clock: Rc<dyn Clock>) -> Self;
///         fn bare() -> Self;
///     }
/// }
/// ```
#[macro_export]
macro_rules! constructible {
	(impl $target:ty { $($body:tt)* }) => {
		impl $crate::Constructible for $target {
			fn constructors() -> ::std::vec::Vec<$crate::ConstructorCandidate<Self>> {
				let mut candidates = ::std::vec::Vec::new();
				$crate::__constructible_candidates!(candidates, $target, $($body)*);
				candidates
			}
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __constructible_candidates {
	($acc:ident, $target:ty,) => {};
	($acc:ident, $target:ty, pub fn $ctor:ident ( $($pname:ident : $pty:ty),* $(,)? ) -> Self; $($rest:tt)*) => {
		$crate::__constructible_push!($acc, $target, true, $ctor, $($pname : $pty),*);
		$crate::__constructible_candidates!($acc, $target, $($rest)*);
	};
	($acc:ident, $target:ty, fn $ctor:ident ( $($pname:ident : $pty:ty),* $(,)? ) -> Self; $($rest:tt)*) => {
		$crate::__constructible_push!($acc, $target, false, $ctor, $($pname : $pty),*);
		$crate::__constructible_candidates!($acc, $target, $($rest)*);
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __constructible_push {
	($acc:ident, $target:ty, $public:expr, $ctor:ident, $($pname:ident : $pty:ty),*) => {
		$acc.push($crate::ConstructorCandidate::new(
			$public,
			::std::vec![$($crate::ParamSpec::of::<$pty>()),*],
			|args: $crate::ArgBag| {
				let mut args = args;
				let instance = <$target>::$ctor($(args.take::<$pty>()?),*);
				let _ = &mut args;
				::std::result::Result::Ok(instance)
			},
		));
	};
}

/// Implements [`Resolve`](crate::Resolve) for one or more mockable
/// service types: registry lookup first, then fabricate-and-memoize a
/// mock. Their `Vec` array forms are covered by a blanket impl in the
/// crate itself.
///
/// # Examples
///
/// ```rust,ignore
/// automocker::resolve_via_mock!(Rc<dyn Logger>, Rc<dyn Clock>);
/// ```
#[macro_export]
macro_rules! resolve_via_mock {
	($($service:ty),+ $(,)?) => {$(
		impl $crate::Resolve for $service {
			fn resolve(mocker: &mut $crate::AutoMocker) -> $crate::MockerResult<Self> {
				mocker.resolve_mockable::<Self>()
			}
		}
	)+};
}
