//! Shared service traits, hand-written doubles and constructible targets
//! used across the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use automocker::{
	ArgBag, AutoMocker, MockBehavior, MockControl, MockCore, MockView, Mockable, MockerResult,
	Resolve, SelfMockable, SharedMock, VerifyError, constructible, resolve_via_mock,
};

// ============================================================================
// Service traits
// ============================================================================

pub trait Logger {
	fn log(&self, message: &str);
}

pub trait Clock {
	fn now(&self) -> u64;
	fn set_timezone(&self, timezone: &str);
	fn timezone(&self) -> String;
}

pub trait Reader {
	fn read(&self) -> String;
}

pub trait Writer {
	fn write(&self, data: &str);
}

// ============================================================================
// Real collaborator used for identity round trips
// ============================================================================

#[derive(Default)]
pub struct RecordingLogger {
	pub messages: RefCell<Vec<String>>,
}

impl Logger for RecordingLogger {
	fn log(&self, message: &str) {
		self.messages.borrow_mut().push(message.to_string());
	}
}

// ============================================================================
// Hand-written doubles satisfying the engine port
// ============================================================================

pub struct MockLogger {
	pub core: MockCore,
	pub messages: RefCell<Vec<String>>,
}

impl MockLogger {
	pub fn new(behavior: MockBehavior) -> Self {
		Self {
			core: MockCore::new("MockLogger", behavior),
			messages: RefCell::new(Vec::new()),
		}
	}
}

impl MockControl for MockLogger {
	fn verify(&self) -> Result<(), VerifyError> {
		self.core.verify()
	}

	fn verify_all(&self) -> Result<(), VerifyError> {
		self.core.verify_all()
	}

	fn call_count(&self, method: &str) -> usize {
		self.core.call_count(method)
	}
}

struct LoggerHandle(SharedMock<MockLogger>);

impl Logger for LoggerHandle {
	fn log(&self, message: &str) {
		let mock = self.0.borrow();
		mock.core.record_args("log", vec![message.to_string()]);
		mock.messages.borrow_mut().push(message.to_string());
	}
}

impl Mockable for Rc<dyn Logger> {
	type Mock = MockLogger;

	fn new_mock(behavior: MockBehavior) -> MockLogger {
		MockLogger::new(behavior)
	}
}

impl MockView<MockLogger> for Rc<dyn Logger> {
	fn view(mock: &SharedMock<MockLogger>) -> Self {
		Rc::new(LoggerHandle(Rc::clone(mock)))
	}
}

pub struct MockClock {
	pub core: MockCore,
	now_value: Cell<u64>,
	timezone: RefCell<String>,
}

impl MockClock {
	pub fn new(behavior: MockBehavior) -> Self {
		Self {
			core: MockCore::new("MockClock", behavior),
			now_value: Cell::new(0),
			timezone: RefCell::new(String::new()),
		}
	}

	pub fn stub_now(&mut self, value: u64) {
		self.now_value.set(value);
	}
}

impl MockControl for MockClock {
	fn verify(&self) -> Result<(), VerifyError> {
		self.core.verify()
	}

	fn verify_all(&self) -> Result<(), VerifyError> {
		self.core.verify_all()
	}

	fn call_count(&self, method: &str) -> usize {
		self.core.call_count(method)
	}

	fn setup_all_properties(&mut self) {
		self.core.stub_all_properties();
	}
}

struct ClockHandle(SharedMock<MockClock>);

impl Clock for ClockHandle {
	fn now(&self) -> u64 {
		let mock = self.0.borrow();
		mock.core.record("now");
		mock.now_value.get()
	}

	fn set_timezone(&self, timezone: &str) {
		let mock = self.0.borrow();
		mock.core
			.record_args("set_timezone", vec![timezone.to_string()]);
		if mock.core.properties_stubbed() {
			*mock.timezone.borrow_mut() = timezone.to_string();
		}
	}

	fn timezone(&self) -> String {
		let mock = self.0.borrow();
		mock.core.record("timezone");
		mock.timezone.borrow().clone()
	}
}

impl Mockable for Rc<dyn Clock> {
	type Mock = MockClock;

	fn new_mock(behavior: MockBehavior) -> MockClock {
		MockClock::new(behavior)
	}
}

impl MockView<MockClock> for Rc<dyn Clock> {
	fn view(mock: &SharedMock<MockClock>) -> Self {
		Rc::new(ClockHandle(Rc::clone(mock)))
	}
}

/// One mock backing two service traits, for `combine`.
pub struct MockStore {
	pub core: MockCore,
	pub contents: RefCell<String>,
}

impl MockStore {
	pub fn new(behavior: MockBehavior) -> Self {
		Self {
			core: MockCore::new("MockStore", behavior),
			contents: RefCell::new(String::new()),
		}
	}
}

impl MockControl for MockStore {
	fn verify(&self) -> Result<(), VerifyError> {
		self.core.verify()
	}

	fn verify_all(&self) -> Result<(), VerifyError> {
		self.core.verify_all()
	}

	fn call_count(&self, method: &str) -> usize {
		self.core.call_count(method)
	}
}

struct ReaderHandle(SharedMock<MockStore>);

impl Reader for ReaderHandle {
	fn read(&self) -> String {
		let mock = self.0.borrow();
		mock.core.record("read");
		mock.contents.borrow().clone()
	}
}

struct WriterHandle(SharedMock<MockStore>);

impl Writer for WriterHandle {
	fn write(&self, data: &str) {
		let mock = self.0.borrow();
		mock.core.record_args("write", vec![data.to_string()]);
		*mock.contents.borrow_mut() = data.to_string();
	}
}

impl Mockable for Rc<dyn Reader> {
	type Mock = MockStore;

	fn new_mock(behavior: MockBehavior) -> MockStore {
		MockStore::new(behavior)
	}
}

impl MockView<MockStore> for Rc<dyn Reader> {
	fn view(mock: &SharedMock<MockStore>) -> Self {
		Rc::new(ReaderHandle(Rc::clone(mock)))
	}
}

impl Mockable for Rc<dyn Writer> {
	type Mock = MockStore;

	fn new_mock(behavior: MockBehavior) -> MockStore {
		MockStore::new(behavior)
	}
}

impl MockView<MockStore> for Rc<dyn Writer> {
	fn view(mock: &SharedMock<MockStore>) -> Self {
		Rc::new(WriterHandle(Rc::clone(mock)))
	}
}

resolve_via_mock!(Rc<dyn Logger>, Rc<dyn Clock>, Rc<dyn Reader>, Rc<dyn Writer>);

// ============================================================================
// Non-mockable configuration resolved from the registry
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
	pub width: u32,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self { width: 80 }
	}
}

impl Resolve for RenderConfig {
	fn resolve(mocker: &mut AutoMocker) -> MockerResult<Self> {
		Ok(mocker.registered::<Self>().unwrap_or_default())
	}
}

// ============================================================================
// Constructible targets
// ============================================================================

pub struct Widget {
	pub logger: Rc<dyn Logger>,
	pub clock: Rc<dyn Clock>,
}

impl Widget {
	pub fn new(logger: Rc<dyn Logger>, clock: Rc<dyn Clock>) -> Self {
		Self { logger, clock }
	}

	pub fn greet(&self) {
		self.logger.log("hello");
	}

	pub fn timestamp(&self) -> u64 {
		self.clock.now()
	}
}

constructible! {
	impl Widget {
		pub fn new(logger: Rc<dyn Logger>, clock: Rc<dyn Clock>) -> Self;
	}
}

/// Overloads with differing arity: the two-parameter constructor always
/// wins.
pub struct Gadget {
	pub ctor: &'static str,
	pub logger: Option<Rc<dyn Logger>>,
	pub clock: Option<Rc<dyn Clock>>,
}

impl Gadget {
	pub fn with_logger(logger: Rc<dyn Logger>) -> Self {
		Self {
			ctor: "with_logger",
			logger: Some(logger),
			clock: None,
		}
	}

	pub fn with_both(logger: Rc<dyn Logger>, clock: Rc<dyn Clock>) -> Self {
		Self {
			ctor: "with_both",
			logger: Some(logger),
			clock: Some(clock),
		}
	}

	fn bare() -> Self {
		Self {
			ctor: "bare",
			logger: None,
			clock: None,
		}
	}
}

constructible! {
	impl Gadget {
		pub fn with_logger(logger: Rc<dyn Logger>) -> Self;
		pub fn with_both(logger: Rc<dyn Logger>, clock: Rc<dyn Clock>) -> Self;
		fn bare() -> Self;
	}
}

/// Equal-arity overloads: registration breaks the tie, declaration order
/// settles the rest.
pub struct Picker {
	pub ctor: &'static str,
}

impl Picker {
	pub fn from_logger(_logger: Rc<dyn Logger>) -> Self {
		Self {
			ctor: "from_logger",
		}
	}

	pub fn from_clock(_clock: Rc<dyn Clock>) -> Self {
		Self { ctor: "from_clock" }
	}
}

constructible! {
	impl Picker {
		pub fn from_logger(logger: Rc<dyn Logger>) -> Self;
		pub fn from_clock(clock: Rc<dyn Clock>) -> Self;
	}
}

/// Only a non-public constructor.
pub struct Sealed {
	pub marker: u8,
}

impl Sealed {
	fn assemble() -> Self {
		Self { marker: 7 }
	}
}

constructible! {
	impl Sealed {
		fn assemble() -> Self;
	}
}

/// Constructor body that fails; the container must stay transparent.
pub struct Volatile;

impl Volatile {
	pub fn new(_logger: Rc<dyn Logger>) -> Self {
		panic!("boom from constructor");
	}
}

constructible! {
	impl Volatile {
		pub fn new(logger: Rc<dyn Logger>) -> Self;
	}
}

pub struct Renderer {
	pub config: RenderConfig,
	pub logger: Rc<dyn Logger>,
}

impl Renderer {
	pub fn new(config: RenderConfig, logger: Rc<dyn Logger>) -> Self {
		Self { config, logger }
	}
}

constructible! {
	impl Renderer {
		pub fn new(config: RenderConfig, logger: Rc<dyn Logger>) -> Self;
	}
}

// ============================================================================
// Self-mock target: real construction, intercepted overridable behavior
// ============================================================================

pub struct ReportBuilder {
	pub logger: Rc<dyn Logger>,
	spy: Option<MockCore>,
}

impl ReportBuilder {
	pub fn new(logger: Rc<dyn Logger>) -> Self {
		Self { logger, spy: None }
	}

	pub fn build(&self) -> String {
		self.logger.log("building report");
		format!("{}\nbody", self.header())
	}

	// Overridable: a self-mock intercepts this and records the call.
	fn header(&self) -> String {
		match &self.spy {
			Some(core) => {
				core.record("header");
				String::new()
			}
			None => "== report ==".to_string(),
		}
	}

	pub fn spy_core(&self) -> Option<&MockCore> {
		self.spy.as_ref()
	}
}

constructible! {
	impl ReportBuilder {
		pub fn new(logger: Rc<dyn Logger>) -> Self;
	}
}

impl SelfMockable for ReportBuilder {
	fn self_mock(behavior: MockBehavior, mut args: ArgBag) -> MockerResult<Self> {
		Ok(Self {
			logger: args.take::<Rc<dyn Logger>>()?,
			spy: Some(MockCore::new("ReportBuilder", behavior)),
		})
	}
}
