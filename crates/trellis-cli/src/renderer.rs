//! A minimal in-process component tree that walks the renderer lifecycle.
//!
//! It owns no rendering logic; it only performs the lifecycle transitions in
//! order and reports each one to a [`RendererLog`].

use anyhow::{Result, anyhow};

use trellis_core::{ComponentId, ComponentIdentity, EventPayload, TypeDescriptor};
use trellis_observe::RendererLog;

/// Component types known to the simulation.
#[allow(dead_code)]
pub mod components {
    /// The root application component.
    pub struct App;
    /// A counter with a click handler.
    pub struct Counter;
    /// A list with an input field.
    pub struct TodoList;
}

/// Event payload types dispatched by the simulation.
pub mod events {
    /// A mouse click.
    #[allow(dead_code)]
    pub struct MouseEventArgs {
        pub x: i32,
        pub y: i32,
    }

    /// An input value change.
    #[allow(dead_code)]
    pub struct ChangeEventArgs {
        pub value: String,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    App,
    Counter,
    TodoList,
}

struct ComponentState {
    id: ComponentId,
    parent: Option<ComponentId>,
    kind: ComponentKind,
}

impl ComponentIdentity for ComponentState {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn component_type(&self) -> TypeDescriptor {
        match self.kind {
            ComponentKind::App => TypeDescriptor::of::<components::App>(),
            ComponentKind::Counter => TypeDescriptor::of::<components::Counter>(),
            ComponentKind::TodoList => TypeDescriptor::of::<components::TodoList>(),
        }
    }
}

/// Simulated renderer.
pub struct SimulatedRenderer<'a> {
    log: &'a RendererLog,
    next_id: u32,
    live: Vec<ComponentState>,
}

impl<'a> SimulatedRenderer<'a> {
    /// Create a renderer reporting to `log`.
    pub fn new(log: &'a RendererLog) -> Self {
        Self {
            log,
            next_id: 0,
            live: Vec::new(),
        }
    }

    /// Number of live components.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Attach a root component and render it for the first time.
    pub fn attach_root(&mut self, kind: ComponentKind) -> Result<ComponentId> {
        self.attach(kind, None)
    }

    /// Attach a child component and render it for the first time.
    pub fn attach_child(&mut self, parent: ComponentId, kind: ComponentKind) -> Result<ComponentId> {
        self.state(parent)?;
        self.attach(kind, Some(parent))
    }

    fn attach(&mut self, kind: ComponentKind, parent: Option<ComponentId>) -> Result<ComponentId> {
        let id = ComponentId::new(self.next_id);
        self.next_id += 1;
        self.live.push(ComponentState { id, parent, kind });

        let state = self.state(id)?;
        let parent_state = parent.map(|parent| self.state(parent)).transpose()?;
        self.log
            .initializing_component(state, parent_state.map(|p| p as &dyn ComponentIdentity));
        self.log.initializing_and_setting_parameters_component(state);
        self.render(id)?;

        tracing::debug!(component = %id, ?kind, "Component attached");
        Ok(id)
    }

    /// Run one render pass for a component.
    pub fn render(&self, id: ComponentId) -> Result<()> {
        let state = self.state(id)?;
        self.log.rendering_component(state);
        self.log.rendered_component(state);
        self.log.after_render_complete_component(state);
        Ok(())
    }

    /// Supply updated parameters, then re-render.
    pub fn set_parameters(&self, id: ComponentId) -> Result<()> {
        self.log.setting_parameters_component(self.state(id)?);
        self.render(id)
    }

    /// Route an inbound event to a component, then re-render it.
    pub fn dispatch_event(
        &self,
        handler_id: u64,
        payload: Option<&dyn EventPayload>,
        target: ComponentId,
    ) -> Result<()> {
        self.state(target)?;
        self.log.handling_event(handler_id, payload, Some(target));
        self.render(target)
    }

    /// Dispose a component and all of its descendants, children first.
    pub fn dispose(&mut self, id: ComponentId) -> Result<()> {
        self.state(id)?;
        let children: Vec<ComponentId> = self
            .live
            .iter()
            .filter(|state| state.parent == Some(id))
            .map(|state| state.id)
            .collect();
        for child in children {
            self.dispose(child)?;
        }

        self.log.disposing_component(self.state(id)?);
        self.live.retain(|state| state.id != id);
        Ok(())
    }

    fn state(&self, id: ComponentId) -> Result<&ComponentState> {
        self.live
            .iter()
            .find(|state| state.id == id)
            .ok_or_else(|| anyhow!("Unknown component {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use trellis_core::{EventKind, Severity};
    use trellis_observe::{CollectingSink, DiagnosticSink};

    fn recording() -> (Arc<CollectingSink>, RendererLog) {
        let sink = Arc::new(CollectingSink::new(Severity::Detail, 1_000));
        let log = RendererLog::new(Arc::clone(&sink) as Arc<dyn DiagnosticSink>);
        (sink, log)
    }

    #[test]
    fn test_lifecycle_order() {
        let (sink, log) = recording();
        let mut renderer = SimulatedRenderer::new(&log);

        let root = renderer.attach_root(ComponentKind::App).unwrap();
        let child = renderer.attach_child(root, ComponentKind::Counter).unwrap();
        renderer.set_parameters(child).unwrap();
        renderer
            .dispatch_event(1, Some(&events::MouseEventArgs { x: 1, y: 2 }), child)
            .unwrap();
        renderer.dispose(root).unwrap();

        let kinds: Vec<EventKind> = sink.records().iter().map(|r| r.kind()).collect();
        use EventKind::*;
        assert_eq!(
            kinds,
            vec![
                InitializingRootComponent,
                InitializingAndSettingParametersComponent,
                RenderingComponent,
                RenderedComponent,
                AfterRenderCompleteComponent,
                InitializingChildComponent,
                InitializingAndSettingParametersComponent,
                RenderingComponent,
                RenderedComponent,
                AfterRenderCompleteComponent,
                SettingParametersComponent,
                RenderingComponent,
                RenderedComponent,
                AfterRenderCompleteComponent,
                HandlingEvent,
                RenderingComponent,
                RenderedComponent,
                AfterRenderCompleteComponent,
                DisposingComponent,
                DisposingComponent,
            ]
        );
        assert_eq!(renderer.live_count(), 0);
    }

    #[test]
    fn test_dispose_children_first() {
        let (sink, log) = recording();
        let mut renderer = SimulatedRenderer::new(&log);

        let root = renderer.attach_root(ComponentKind::App).unwrap();
        renderer.attach_child(root, ComponentKind::TodoList).unwrap();
        sink.clear();

        renderer.dispose(root).unwrap();

        let ids: Vec<String> = sink
            .records()
            .iter()
            .map(|r| r.field("ComponentId").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "0"]);
    }

    #[test]
    fn test_handling_event_uses_short_payload_name() {
        let (sink, log) = recording();
        let mut renderer = SimulatedRenderer::new(&log);
        let root = renderer.attach_root(ComponentKind::App).unwrap();
        sink.clear();

        let change = events::ChangeEventArgs {
            value: "milk".to_string(),
        };
        renderer.dispatch_event(9, Some(&change), root).unwrap();

        let record = &sink.records()[0];
        assert_eq!(
            record.message(),
            "Handling event 9 of type 'ChangeEventArgs' for component '0'"
        );
    }

    #[test]
    fn test_unknown_component() {
        let (_sink, log) = recording();
        let mut renderer = SimulatedRenderer::new(&log);

        assert!(renderer.attach_child(ComponentId::new(5), ComponentKind::Counter).is_err());
        assert!(renderer.set_parameters(ComponentId::new(5)).is_err());
    }
}
