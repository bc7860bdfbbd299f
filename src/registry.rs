//! Instance registry: type identity to instance record.
//!
//! The registry is a plain mutable mapping with no internal
//! synchronization; one record per `TypeId`, overwritten wholesale and
//! never deleted. Records are reference counted so `combine` can install
//! one record under several keys.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::behavior::MockBehavior;
use crate::mock::{MockControl, Mockable, MockView, SharedMock, shared};

/// A memoized mock and the service objects it is exposed as.
pub struct MockInstance {
	behavior: MockBehavior,
	mock: Rc<dyn Any>,
	control: Rc<RefCell<dyn MockControl>>,
	mock_type: &'static str,
	views: HashMap<TypeId, Box<dyn Any>>,
}

impl MockInstance {
	pub(crate) fn from_shared<S: Mockable>(
		behavior: MockBehavior,
		mock: SharedMock<S::Mock>,
	) -> Self {
		let mut views = HashMap::new();
		views.insert(
			TypeId::of::<S>(),
			Box::new(S::view(&mock)) as Box<dyn Any>,
		);
		Self::with_views(behavior, mock, views)
	}

	pub(crate) fn with_views<M: MockControl + 'static>(
		behavior: MockBehavior,
		mock: SharedMock<M>,
		views: HashMap<TypeId, Box<dyn Any>>,
	) -> Self {
		let control: Rc<RefCell<dyn MockControl>> = mock.clone();
		let mock: Rc<dyn Any> = mock;
		Self {
			behavior,
			control,
			mock_type: type_name::<M>(),
			mock,
			views,
		}
	}

	/// The strictness the mock was fabricated under.
	pub fn behavior(&self) -> MockBehavior {
		self.behavior
	}

	/// Name of the mock type backing this record.
	pub fn mock_type(&self) -> &'static str {
		self.mock_type
	}

	/// The typed shared handle, if `M` is the backing mock type.
	pub fn handle<M: 'static>(&self) -> Option<SharedMock<M>> {
		Rc::clone(&self.mock).downcast::<RefCell<M>>().ok()
	}

	/// Type-erased control surface for verification.
	pub fn control(&self) -> Rc<RefCell<dyn MockControl>> {
		Rc::clone(&self.control)
	}

	fn produced<S: Any + Clone>(&self) -> Option<S> {
		self.views
			.get(&TypeId::of::<S>())
			.and_then(|view| view.downcast_ref::<S>())
			.cloned()
	}
}

/// Aggregate of element records exposed as a `Vec` of produced objects.
pub struct MockArrayInstance {
	elements: Vec<Rc<InstanceRecord>>,
}

impl MockArrayInstance {
	/// The element records accumulated so far.
	pub fn elements(&self) -> &[Rc<InstanceRecord>] {
		&self.elements
	}

	/// Produced objects of every element able to yield an `E`.
	pub fn produced_vec<E: Any + Clone>(&self) -> Vec<E> {
		self.elements
			.iter()
			.filter_map(|record| record.produced::<E>())
			.collect()
	}
}

/// A registered instance: a caller-supplied value, a memoized mock, or an
/// array aggregate of mocks.
pub enum InstanceRecord {
	/// Concrete caller-supplied value.
	Real {
		/// The stored value, produced by clone.
		value: Box<dyn Any>,
		/// Service type name, for failure reports.
		type_name: &'static str,
	},
	/// Lazily fabricated (or caller-supplied) mock.
	Mock(MockInstance),
	/// Aggregate of element records.
	MockArray(MockArrayInstance),
}

impl InstanceRecord {
	pub(crate) fn real<S: Any>(value: S) -> Self {
		Self::Real {
			value: Box::new(value),
			type_name: type_name::<S>(),
		}
	}

	/// Whether mock-level control is available on this record.
	pub fn is_mock(&self) -> bool {
		!matches!(self, Self::Real { .. })
	}

	/// The produced service object for `S`, if this record can yield one.
	pub fn produced<S: Any + Clone>(&self) -> Option<S> {
		match self {
			Self::Real { value, .. } => value.downcast_ref::<S>().cloned(),
			Self::Mock(mock) => mock.produced::<S>(),
			Self::MockArray(_) => None,
		}
	}
}

/// Mapping from type identity to instance record.
#[derive(Default)]
pub struct InstanceRegistry {
	records: HashMap<TypeId, Rc<InstanceRecord>>,
}

impl InstanceRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The record registered for `id`, if any.
	pub fn get(&self, id: TypeId) -> Option<&Rc<InstanceRecord>> {
		self.records.get(&id)
	}

	/// Registers `record` under `id`, discarding any previous record.
	pub fn set(&mut self, id: TypeId, record: Rc<InstanceRecord>) {
		if self.records.insert(id, record).is_some() {
			trace!(?id, "overwrote existing record");
		}
	}

	/// Whether any record is registered for `id`.
	pub fn contains(&self, id: TypeId) -> bool {
		self.records.contains_key(&id)
	}

	/// Iterates every registered record.
	pub fn records(&self) -> impl Iterator<Item = &Rc<InstanceRecord>> {
		self.records.values()
	}

	/// Returns the mock record for `S`, fabricating one if the type is
	/// unregistered or registered as a non-mock. Idempotent while a mock
	/// record is present.
	pub fn get_or_create_mock<S: Mockable>(&mut self, behavior: MockBehavior) -> Rc<InstanceRecord> {
		let id = TypeId::of::<S>();
		if let Some(record) = self.records.get(&id) {
			if record.is_mock() {
				return Rc::clone(record);
			}
		}
		debug!(service = type_name::<S>(), "fabricating mock");
		let mock = shared(S::new_mock(behavior));
		let record = Rc::new(InstanceRecord::Mock(MockInstance::from_shared::<S>(
			behavior, mock,
		)));
		self.records.insert(id, Rc::clone(&record));
		record
	}

	/// Returns the record for `Vec<E>`, fabricating an array aggregate if
	/// absent. A fresh aggregate is seeded with the already-registered
	/// record for `E`, so an injected element also appears inside the
	/// array.
	pub fn get_or_create_vec<E: Mockable>(&mut self) -> Rc<InstanceRecord> {
		let id = TypeId::of::<Vec<E>>();
		if let Some(record) = self.records.get(&id) {
			return Rc::clone(record);
		}
		let mut elements = Vec::new();
		if let Some(element) = self.records.get(&TypeId::of::<E>()) {
			elements.push(Rc::clone(element));
		}
		debug!(
			element = type_name::<E>(),
			seeded = !elements.is_empty(),
			"fabricating mock array"
		);
		let record = Rc::new(InstanceRecord::MockArray(MockArrayInstance { elements }));
		self.records.insert(id, Rc::clone(&record));
		record
	}
}
