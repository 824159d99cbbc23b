//! Error handling and edge case tests.

use parking_lot::Mutex;
use reducer_store::{
    shallow_diff, with_reentrancy_detection, Capabilities, EventListener, Identifiable,
    ImmutableIndexedList, Reduction, RootState, ShallowDiff, StateKey, Store, StoreError,
    Version,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

#[derive(Clone, Debug)]
enum Action {
    Bump,
}

#[derive(Debug)]
struct Counter(u32);

#[derive(Debug)]
struct Other;

const COUNTER: StateKey<Counter> = StateKey::new("counter");
const MISSING: StateKey<Counter> = StateKey::new("missing");

fn test_store() -> Store<Action> {
    Store::new(RootState::builder().with(COUNTER, Counter(0)).unwrap().build())
}

fn bump(c: &Counter, _: &Action) -> Reduction<Counter> {
    Reduction::Changed(Counter(c.0 + 1))
}

// --- Registration Errors ---

#[test]
fn test_register_duplicate_reducer() {
    let store = test_store();
    store.register_reducer(COUNTER, bump).unwrap();

    let result = store.register_reducer(COUNTER, bump);
    assert!(matches!(result, Err(StoreError::DuplicateReducer(_))));

    // The first reducer is still the one in effect.
    store.dispatch(Action::Bump);
    assert_eq!(store.get(COUNTER).unwrap().0, 1);
}

#[test]
fn test_register_unknown_state() {
    let store = test_store();
    let result = store.register_reducer(MISSING, bump);
    assert!(matches!(result, Err(StoreError::UnknownState(_))));
}

#[test]
fn test_register_mismatched_type() {
    let store = test_store();
    let wrong: StateKey<Other> = StateKey::new("counter");
    let result = store.register_reducer(wrong, |_: &Other, _: &Action| Reduction::Unchanged);
    assert!(matches!(result, Err(StoreError::StateTypeMismatch { .. })));
}

#[test]
fn test_duplicate_state_key() {
    let result = RootState::builder()
        .with(COUNTER, Counter(0))
        .unwrap()
        .with(COUNTER, Counter(1));
    assert!(matches!(result, Err(StoreError::DuplicateState(_))));
}

// --- List Errors ---

#[derive(Clone, Debug, Serialize)]
struct Row {
    id: String,
    meta: HashMap<String, String>,
}

impl Identifiable for Row {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ShallowDiff for Row {}

fn row(id: &str) -> Row {
    Row {
        id: id.to_string(),
        meta: HashMap::new(),
    }
}

#[test]
fn test_list_errors_leave_source_intact() {
    let list = ImmutableIndexedList::new(vec![row("a"), row("b")]).unwrap();

    assert!(matches!(list.update("zz", |r| r.clone()), Err(StoreError::IdNotFound(_))));
    assert!(matches!(list.delete("zz"), Err(StoreError::IdNotFound(_))));
    assert!(matches!(list.append([row("a")]), Err(StoreError::DuplicateId(_))));
    assert!(matches!(
        list.update("a", |_| row("b")),
        Err(StoreError::IdChanged { .. })
    ));

    assert_eq!(list.len(), 2);
    assert!(list.contains("a") && list.contains("b"));
}

#[test]
fn test_update_with_diff_requires_map_override() {
    let list = ImmutableIndexedList::new(vec![row("a")]).unwrap();
    let result = list.update_with_diff("a", |r| r.clone());
    match result {
        Err(StoreError::UnsupportedField { field, .. }) => assert_eq!(field, "meta"),
        Err(other) => panic!("Expected UnsupportedField, got {:?}", other),
        Ok(_) => panic!("Expected UnsupportedField, got a diff"),
    }
}

#[test]
fn test_diff_of_scalar_type() {
    #[derive(Serialize)]
    struct Score(i32);
    impl ShallowDiff for Score {}

    let result = shallow_diff(&Score(1), &Score(2));
    assert!(matches!(result, Err(StoreError::NotARecord(_))));
}

// --- Reentrancy ---

struct Redispatcher {
    store: Mutex<Weak<Store<Action>>>,
}

impl EventListener<Action> for Redispatcher {
    fn unique_identifier(&self) -> &str {
        "redispatcher"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::change()
    }

    fn on_change(&self, _version: Version) {
        let store = self.store.lock().upgrade();
        if let Some(store) = store {
            store.dispatch(Action::Bump);
        }
    }
}

#[test]
#[should_panic(expected = "Dispatch issued while the dispatching thread holds the store lock")]
fn test_reentrant_dispatch_detected() {
    let root = RootState::builder().with(COUNTER, Counter(0)).unwrap().build();
    let store = Arc::new(Store::with_options(root, [with_reentrancy_detection::<Action>()]));
    store.register_reducer(COUNTER, bump).unwrap();

    let listener = Arc::new(Redispatcher {
        store: Mutex::new(Weak::new()),
    });
    *listener.store.lock() = Arc::downgrade(&store);
    store.add_listener(listener);

    store.dispatch(Action::Bump);
}

#[test]
fn test_store_usable_after_detected_reentrancy() {
    let root = RootState::builder().with(COUNTER, Counter(0)).unwrap().build();
    let store = Arc::new(Store::with_options(root, [with_reentrancy_detection::<Action>()]));
    store.register_reducer(COUNTER, bump).unwrap();

    let listener = Arc::new(Redispatcher {
        store: Mutex::new(Arc::downgrade(&store)),
    });
    store.add_listener(listener);

    let inner = Arc::clone(&store);
    let outcome = std::thread::spawn(move || inner.dispatch(Action::Bump)).join();
    assert!(outcome.is_err());

    store.remove_listener("redispatcher");
    store.dispatch(Action::Bump);
    assert_eq!(store.get(COUNTER).unwrap().0, 2);
}
