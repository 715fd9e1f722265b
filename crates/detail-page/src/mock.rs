//! # Mock Toolkit
//!
//! Test doubles for everything surrounding the page controller:
//!
//! - [`MockSettings`] — an [`EntitySettings`] implementation driven by a
//!   queue of scripted expectations, in the fluent builder style
//!   (`mock.expect_read("P1").return_ok(record)`), with holdable responses
//!   for resolution-order tests.
//! - [`RecordingShell`] — a [`PageShell`] that records notifications,
//!   presented errors, and navigation writes instead of rendering anything.
//! - [`MockField`] — a child field with an observable [`FieldProbe`].
//! - [`wait_for_snapshot`] — polls the page until its observable state
//!   satisfies a predicate, since load completions arrive asynchronously.
//!
//! ## Error Injection
//!
//! Scripted expectations make failures trivial to simulate:
//!
//! ```ignore
//! let mock = MockSettings::<DynamicRecord>::new("Asset", "/assets/");
//! mock.expect_read("A1").return_err(ServiceError::rejected("Asset A1 not found"));
//! ```
//!
//! ## Controlled Resolution Order
//!
//! A held expectation does not resolve until its gate is released, letting a
//! test start read B while read A is still outstanding:
//!
//! ```ignore
//! let gate_a = mock.expect_read("A").return_ok_held(record_a);
//! let gate_b = mock.expect_read("B").return_ok_held(record_b);
//! // ... mount, navigate ...
//! gate_b.release();
//! gate_a.release(); // superseded: resolves but must not mutate state
//! ```

use crate::children::{ChildField, ChildHandle};
use crate::client::PageClient;
use crate::error::ServiceError;
use crate::message::PageSnapshot;
use crate::record::EntityRecord;
use crate::settings::{EntityScreen, EntitySettings};
use crate::shell::PageShell;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// =============================================================================
// MOCK SETTINGS
// =============================================================================

enum Expectation<R> {
    Init {
        result: Result<R, ServiceError>,
        gate: Option<oneshot::Receiver<()>>,
    },
    Read {
        code: String,
        result: Result<R, ServiceError>,
        gate: Option<oneshot::Receiver<()>>,
    },
    Create {
        result: Result<R, ServiceError>,
    },
    Update {
        result: Result<R, ServiceError>,
    },
    Delete {
        code: String,
        result: Result<(), ServiceError>,
    },
}

impl<R> Expectation<R> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init_new_entity",
            Self::Read { .. } => "read_entity",
            Self::Create { .. } => "create_entity",
            Self::Update { .. } => "update_entity",
            Self::Delete { .. } => "delete_entity",
        }
    }
}

struct Inner<R> {
    entity_desc: String,
    entity_url: String,
    screen: Mutex<Option<EntityScreen>>,
    expectations: Mutex<VecDeque<Expectation<R>>>,
    calls: Mutex<Vec<String>>,
    submissions: Mutex<Vec<R>>,
}

/// Scripted [`EntitySettings`] for tests. Cheap to clone; all clones share
/// the same expectation queue, so a test can keep one handle for scripting
/// while the page owns another.
pub struct MockSettings<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for MockSettings<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: EntityRecord> MockSettings<R> {
    /// New mock with access granted and updates allowed.
    pub fn new(entity_desc: impl Into<String>, entity_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entity_desc: entity_desc.into(),
                entity_url: entity_url.into(),
                screen: Mutex::new(Some(EntityScreen {
                    update_allowed: true,
                })),
                expectations: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                submissions: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Deny all access to this entity type.
    pub fn deny_access(&self) {
        *self.inner.screen.lock().unwrap() = None;
    }

    /// Grant access but forbid updates, so children get disabled after reads.
    pub fn read_only(&self) {
        *self.inner.screen.lock().unwrap() = Some(EntityScreen {
            update_allowed: false,
        });
    }

    /// Expects an `init_new_entity` call.
    pub fn expect_init(&self) -> InitExpectationBuilder<R> {
        InitExpectationBuilder {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Expects a `read_entity` call for `code`.
    pub fn expect_read(&self, code: impl Into<String>) -> ReadExpectationBuilder<R> {
        ReadExpectationBuilder {
            code: code.into(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Expects a `create_entity` call.
    pub fn expect_create(&self) -> CreateExpectationBuilder<R> {
        CreateExpectationBuilder {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Expects an `update_entity` call.
    pub fn expect_update(&self) -> UpdateExpectationBuilder<R> {
        UpdateExpectationBuilder {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Expects a `delete_entity` call for `code`.
    pub fn expect_delete(&self, code: impl Into<String>) -> DeleteExpectationBuilder<R> {
        DeleteExpectationBuilder {
            code: code.into(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Records submitted through create/update, in order.
    pub fn submissions(&self) -> Vec<R> {
        self.inner.submissions.lock().unwrap().clone()
    }

    /// Panics if any scripted expectation was never consumed.
    pub fn verify(&self) {
        let expectations = self.inner.expectations.lock().unwrap();
        if !expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                expectations.len()
            );
        }
    }

    fn pop(&self, op: &'static str) -> Expectation<R> {
        self.inner.calls.lock().unwrap().push(op.to_owned());
        let expectation = self.inner.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(expectation) if expectation.kind() == op => expectation,
            Some(expectation) => panic!(
                "Expectation mismatch: got {op} call, next expectation is {}",
                expectation.kind()
            ),
            None => panic!("Unexpected {op} call: no expectation scripted"),
        }
    }
}

async fn hold(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        // A dropped sender counts as released so tests cannot deadlock.
        let _ = gate.await;
    }
}

#[async_trait]
impl<R: EntityRecord> EntitySettings for MockSettings<R> {
    type Record = R;

    fn entity_screen(&self) -> Option<EntityScreen> {
        *self.inner.screen.lock().unwrap()
    }

    fn entity_desc(&self) -> &str {
        &self.inner.entity_desc
    }

    fn entity_url(&self) -> &str {
        &self.inner.entity_url
    }

    async fn init_new_entity(&self) -> Result<R, ServiceError> {
        match self.pop("init_new_entity") {
            Expectation::Init { result, gate } => {
                hold(gate).await;
                result
            }
            _ => unreachable!(),
        }
    }

    async fn read_entity(&self, code: &str, cancel: CancellationToken) -> Result<R, ServiceError> {
        match self.pop("read_entity") {
            Expectation::Read {
                code: expected,
                result,
                gate,
            } => {
                assert_eq!(expected, code, "read_entity called with unexpected code");
                tokio::select! {
                    () = cancel.cancelled() => Err(ServiceError::Cancelled),
                    () = hold(gate) => result,
                }
            }
            _ => unreachable!(),
        }
    }

    async fn create_entity(&self, record: R) -> Result<R, ServiceError> {
        self.inner.submissions.lock().unwrap().push(record);
        match self.pop("create_entity") {
            Expectation::Create { result } => result,
            _ => unreachable!(),
        }
    }

    async fn update_entity(&self, record: R) -> Result<R, ServiceError> {
        self.inner.submissions.lock().unwrap().push(record);
        match self.pop("update_entity") {
            Expectation::Update { result } => result,
            _ => unreachable!(),
        }
    }

    async fn delete_entity(&self, code: &str) -> Result<(), ServiceError> {
        match self.pop("delete_entity") {
            Expectation::Delete {
                code: expected,
                result,
            } => {
                assert_eq!(expected, code, "delete_entity called with unexpected code");
                result
            }
            _ => unreachable!(),
        }
    }
}

/// Releases one held load response.
pub struct LoadGate {
    sender: oneshot::Sender<()>,
}

impl LoadGate {
    pub fn release(self) {
        let _ = self.sender.send(());
    }
}

/// Builder for `init_new_entity` expectations.
pub struct InitExpectationBuilder<R> {
    inner: Arc<Inner<R>>,
}

impl<R> InitExpectationBuilder<R> {
    pub fn return_ok(self, record: R) {
        self.push(Ok(record), None);
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error), None);
    }

    /// Scripts a success that resolves only once the gate is released.
    pub fn return_ok_held(self, record: R) -> LoadGate {
        let (sender, receiver) = oneshot::channel();
        self.push(Ok(record), Some(receiver));
        LoadGate { sender }
    }

    fn push(self, result: Result<R, ServiceError>, gate: Option<oneshot::Receiver<()>>) {
        self.inner
            .expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Init { result, gate });
    }
}

/// Builder for `read_entity` expectations.
pub struct ReadExpectationBuilder<R> {
    code: String,
    inner: Arc<Inner<R>>,
}

impl<R> ReadExpectationBuilder<R> {
    pub fn return_ok(self, record: R) {
        self.push(Ok(record), None);
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error), None);
    }

    /// Scripts a success that resolves only once the gate is released.
    pub fn return_ok_held(self, record: R) -> LoadGate {
        let (sender, receiver) = oneshot::channel();
        self.push(Ok(record), Some(receiver));
        LoadGate { sender }
    }

    fn push(self, result: Result<R, ServiceError>, gate: Option<oneshot::Receiver<()>>) {
        self.inner
            .expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Read {
                code: self.code,
                result,
                gate,
            });
    }
}

/// Builder for `create_entity` expectations.
pub struct CreateExpectationBuilder<R> {
    inner: Arc<Inner<R>>,
}

impl<R> CreateExpectationBuilder<R> {
    pub fn return_ok(self, record: R) {
        self.push(Ok(record));
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<R, ServiceError>) {
        self.inner
            .expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Create { result });
    }
}

/// Builder for `update_entity` expectations.
pub struct UpdateExpectationBuilder<R> {
    inner: Arc<Inner<R>>,
}

impl<R> UpdateExpectationBuilder<R> {
    pub fn return_ok(self, record: R) {
        self.push(Ok(record));
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<R, ServiceError>) {
        self.inner
            .expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Update { result });
    }
}

/// Builder for `delete_entity` expectations.
pub struct DeleteExpectationBuilder<R> {
    code: String,
    inner: Arc<Inner<R>>,
}

impl<R> DeleteExpectationBuilder<R> {
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_err(self, error: ServiceError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<(), ServiceError>) {
        self.inner
            .expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Delete {
                code: self.code,
                result,
            });
    }
}

// =============================================================================
// RECORDING SHELL
// =============================================================================

/// Everything a [`RecordingShell`] has been asked to present or perform.
#[derive(Debug, Default, Clone)]
pub struct ShellLog {
    pub notifications: Vec<String>,
    pub error_toasts: Vec<String>,
    pub handled_errors: Vec<String>,
    pub navigations: Vec<String>,
    pub rewrites: Vec<String>,
}

/// [`PageShell`] that records every call instead of rendering anything.
#[derive(Default, Clone)]
pub struct RecordingShell {
    log: Arc<Mutex<ShellLog>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> ShellLog {
        self.log.lock().unwrap().clone()
    }
}

impl PageShell for RecordingShell {
    fn show_notification(&self, text: &str) {
        self.log.lock().unwrap().notifications.push(text.to_owned());
    }

    fn show_error(&self, text: &str) {
        self.log.lock().unwrap().error_toasts.push(text.to_owned());
    }

    fn handle_error(&self, error: &ServiceError) -> Vec<String> {
        let message = error.to_string();
        self.log
            .lock()
            .unwrap()
            .handled_errors
            .push(message.clone());
        vec![message]
    }

    fn navigate(&self, url: &str) {
        self.log.lock().unwrap().navigations.push(url.to_owned());
    }

    fn rewrite_location(&self, url: &str) {
        self.log.lock().unwrap().rewrites.push(url.to_owned());
    }
}

// =============================================================================
// MOCK CHILD FIELDS
// =============================================================================

#[derive(Debug, Clone)]
struct FieldState {
    valid: bool,
    error: bool,
    helper_text: Option<String>,
    enabled: bool,
    validate_calls: u32,
}

/// Child field whose state is observable from the test through a
/// [`FieldProbe`].
pub struct MockField {
    state: Arc<Mutex<FieldState>>,
}

impl MockField {
    /// A validating field that reports `valid` from every `validate()` call.
    pub fn full(valid: bool) -> (ChildHandle, FieldProbe) {
        let (field, probe) = Self::with_state(valid);
        (ChildHandle::Full(Box::new(field)), probe)
    }

    /// A display-only field; never consulted during validation.
    pub fn display_only() -> (ChildHandle, FieldProbe) {
        let (field, probe) = Self::with_state(true);
        (ChildHandle::DisplayOnly(Box::new(field)), probe)
    }

    fn with_state(valid: bool) -> (Self, FieldProbe) {
        let state = Arc::new(Mutex::new(FieldState {
            valid,
            error: false,
            helper_text: None,
            enabled: true,
            validate_calls: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            FieldProbe { state },
        )
    }
}

impl ChildField for MockField {
    fn validate(&mut self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.validate_calls += 1;
        state.valid
    }

    fn set_validation_error(&mut self, error: bool, message: Option<String>) {
        let mut state = self.state.lock().unwrap();
        state.error = error;
        state.helper_text = message;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.lock().unwrap().enabled = enabled;
    }
}

/// Test-side view of a [`MockField`]'s state.
pub struct FieldProbe {
    state: Arc<Mutex<FieldState>>,
}

impl FieldProbe {
    pub fn has_error(&self) -> bool {
        self.state.lock().unwrap().error
    }

    pub fn helper_text(&self) -> Option<String> {
        self.state.lock().unwrap().helper_text.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().unwrap().enabled
    }

    pub fn validate_calls(&self) -> u32 {
        self.state.lock().unwrap().validate_calls
    }
}

// =============================================================================
// POLLING HELPER
// =============================================================================

/// Polls the page until a snapshot satisfies `pred`, panicking after two
/// seconds. Load completions are posted back to the page asynchronously, so
/// tests observe state through this rather than a single racy snapshot.
pub async fn wait_for_snapshot<S, F>(client: &PageClient<S>, mut pred: F) -> PageSnapshot<S::Record>
where
    S: EntitySettings,
    F: FnMut(&PageSnapshot<S::Record>) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if let Ok(snapshot) = client.snapshot().await {
            if pred(&snapshot) {
                return snapshot;
            }
        }
        if Instant::now() >= deadline {
            panic!("page did not reach the expected state in time");
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
