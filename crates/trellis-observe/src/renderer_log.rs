//! Lifecycle entry points for a component-tree renderer.
//!
//! The renderer calls one method per lifecycle moment, passing the component
//! it just acted on (and its parent where relevant). Every method goes
//! through the same dispatch path:
//!
//! 1. the gate: `sink.is_active(template.severity)`, skipped only for
//!    templates without `precheck` under [`DispatchPolicy::PerTemplate`];
//! 2. field resolution, including the deferred type descriptor lookup;
//! 3. binding the catalog template and handing the record to the sink.
//!
//! When the gate denies, step 2 never runs. Nothing in this path can fail
//! or unwind into the renderer: sink errors and panics are logged on
//! [`DIAGNOSTICS_TARGET`] and dropped.
//!
//! ```text
//! (root) InitializingRootComponent | (child) InitializingChildComponent
//!     └─▶ InitializingAndSettingParametersComponent
//!           └─▶ RenderingComponent ─▶ RenderedComponent ─▶ AfterRenderCompleteComponent
//!                   ▲                                           │
//!                   └────── SettingParametersComponent ◀────────┘
//!                                  │
//!                           HandlingEvent (0..n)
//!                                  ▼
//!                           DisposingComponent
//! ```

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use trellis_core::{
    ComponentId, ComponentIdentity, DispatchPolicy, EventKind, EventPayload, FieldValue,
};

use crate::sink::{DiagnosticSink, SinkError, SinkResult, panic_message};

/// Target for reports about the diagnostics layer itself.
pub const DIAGNOSTICS_TARGET: &str = "trellis::diagnostics";

/// Lifecycle diagnostics for one renderer.
///
/// Holds no per-component state; calls are independent and may run
/// concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trellis_core::{ComponentRef, Severity};
/// use trellis_observe::{CollectingSink, DiagnosticSink, RendererLog};
///
/// let sink = Arc::new(CollectingSink::new(Severity::Detail, 100));
/// let log = RendererLog::new(Arc::clone(&sink) as Arc<dyn DiagnosticSink>);
///
/// let app = ComponentRef::new(1u32, "app::App");
/// log.initializing_component(&app, None);
///
/// assert_eq!(sink.records()[0].name(), "InitializingRootComponent");
/// ```
#[derive(Clone)]
pub struct RendererLog {
    sink: Arc<dyn DiagnosticSink>,
    policy: DispatchPolicy,
}

impl RendererLog {
    /// Create a renderer log that always checks the gate first.
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            policy: DispatchPolicy::AlwaysGuard,
        }
    }

    /// Set the gate policy.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the sink.
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Get the gate policy.
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// A component is about to begin its first initialization.
    ///
    /// Emits the root template when `parent` is `None`, the child template
    /// otherwise.
    pub fn initializing_component(
        &self,
        component: &dyn ComponentIdentity,
        parent: Option<&dyn ComponentIdentity>,
    ) {
        match parent {
            None => self.dispatch(EventKind::InitializingRootComponent, || {
                identity_fields(component)
            }),
            Some(parent) => self.dispatch(EventKind::InitializingChildComponent, || {
                identity_fields(component)
                    .into_iter()
                    .chain(identity_fields(parent))
            }),
        }
    }

    /// A component is about to be initialized and receive its first parameters.
    pub fn initializing_and_setting_parameters_component(
        &self,
        component: &dyn ComponentIdentity,
    ) {
        self.component_event(EventKind::InitializingAndSettingParametersComponent, component);
    }

    /// A component is about to receive an updated parameter set.
    pub fn setting_parameters_component(&self, component: &dyn ComponentIdentity) {
        self.component_event(EventKind::SettingParametersComponent, component);
    }

    /// A component is about to render.
    pub fn rendering_component(&self, component: &dyn ComponentIdentity) {
        self.component_event(EventKind::RenderingComponent, component);
    }

    /// A component has finished rendering.
    pub fn rendered_component(&self, component: &dyn ComponentIdentity) {
        self.component_event(EventKind::RenderedComponent, component);
    }

    /// A component's post-render callback has completed.
    pub fn after_render_complete_component(&self, component: &dyn ComponentIdentity) {
        self.component_event(EventKind::AfterRenderCompleteComponent, component);
    }

    /// A component is about to be torn down.
    pub fn disposing_component(&self, component: &dyn ComponentIdentity) {
        self.component_event(EventKind::DisposingComponent, component);
    }

    /// An inbound event is about to be routed to its handler.
    ///
    /// A missing payload or target renders as the literal `null`.
    pub fn handling_event(
        &self,
        event_handler_id: u64,
        payload: Option<&dyn EventPayload>,
        component_id: Option<ComponentId>,
    ) {
        self.dispatch(EventKind::HandlingEvent, || {
            let event_type = match payload {
                Some(payload) => FieldValue::Text(payload.payload_type().into_short_name()),
                None => FieldValue::null(),
            };
            let target = match component_id {
                Some(id) => FieldValue::Text(Cow::Owned(id.to_string())),
                None => FieldValue::null(),
            };
            [FieldValue::Unsigned(event_handler_id), event_type, target]
        });
    }

    fn component_event(&self, kind: EventKind, component: &dyn ComponentIdentity) {
        self.dispatch(kind, || identity_fields(component));
    }

    fn dispatch<F, I>(&self, kind: EventKind, fields: F)
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = FieldValue>,
    {
        let template = kind.template();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> SinkResult<()> {
            if self.policy.requires_gate(template) && !self.sink.is_active(template.severity) {
                return Ok(());
            }
            let record = template.bind(fields());
            self.sink.emit(&record)
        }));

        let failure = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => DispatchFailure::Rejected(err),
            Err(payload) => DispatchFailure::Panicked(panic_message(payload.as_ref())),
        };
        // The report may reach the subscriber that just failed.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| report(template.id.get(), &failure)));
    }
}

enum DispatchFailure {
    Rejected(SinkError),
    Panicked(String),
}

fn report(event_id: u16, failure: &DispatchFailure) {
    match failure {
        DispatchFailure::Rejected(err) => {
            tracing::warn!(
                target: DIAGNOSTICS_TARGET,
                event_id,
                error = %err,
                "Diagnostic sink rejected record"
            );
        }
        DispatchFailure::Panicked(message) => {
            tracing::warn!(
                target: DIAGNOSTICS_TARGET,
                event_id,
                panic = %message,
                "Diagnostic dispatch panicked; record dropped"
            );
        }
    }
}

fn identity_fields(component: &dyn ComponentIdentity) -> [FieldValue; 2] {
    [
        FieldValue::ComponentId(component.component_id()),
        FieldValue::TypeName(component.component_type()),
    ]
}

impl std::fmt::Debug for RendererLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererLog")
            .field("policy", &self.policy)
            .finish()
    }
}
