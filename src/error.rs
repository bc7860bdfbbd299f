//! Container error types.
//!
//! Every failure the container can surface is a [`MockerError`] variant.
//! Failures raised inside a constructor body are *not* represented here:
//! the container never catches unwinds, so a panicking constructor
//! propagates to the caller untouched.

use thiserror::Error;

/// Result type for container operations.
pub type MockerResult<T> = Result<T, MockerError>;

/// Auto-mocking container errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MockerError {
	/// No constructor is usable under the current visibility rules.
	#[error("no usable constructor found for `{type_name}`")]
	NoConstructorFound {
		/// Target type.
		type_name: &'static str,
	},

	/// Mock-level control was requested for a type registered as a real
	/// instance.
	#[error("`{type_name}` is registered as a real instance, not a mock")]
	NotAMock {
		/// Service type.
		type_name: &'static str,
	},

	/// A dynamically supplied value does not match its registration key.
	#[error("value registered for `{expected}` is not assignable to it")]
	InvalidRegistration {
		/// The service type the value was registered under.
		expected: &'static str,
	},

	/// The record behind a service key is backed by a different mock type
	/// than the one the service declares. Surfaced before any mock
	/// configuration is attempted.
	#[error("mock registered for `{type_name}` is a `{actual}`, not the expected `{expected}`")]
	MockTypeMismatch {
		/// Service type.
		type_name: &'static str,
		/// The mock type the service declares.
		expected: &'static str,
		/// The mock type actually backing the record.
		actual: &'static str,
	},

	/// A mock reported unmet expectations.
	#[error("verification failed for `{type_name}`: {message}")]
	VerificationFailed {
		/// Service or mock type the failure belongs to.
		type_name: &'static str,
		/// Engine-provided failure report.
		message: String,
	},

	/// A resolved argument did not have the type its parameter spec declared.
	#[error("resolved argument for `{type_name}` has an unexpected type")]
	ArgumentMismatch {
		/// Declared parameter type.
		type_name: &'static str,
	},
}
