//! The fixed catalog of renderer lifecycle events.
//!
//! Each [`EventTemplate`] is pure data: a numeric id, a severity, a message
//! template with named placeholders, a stable symbolic name and an ordered
//! field schema. Numeric ids are the durable correlation key. They are
//! assigned once and never reused or renumbered, even when a template's
//! message or fields change.
//!
//! Ids 1-5 cover the primary state machine (initialize, render, dispose,
//! handle event). Ids 6-9 refine it: "finished rendering" versus "about to
//! render", and first-time initialization versus later parameter updates.
//!
//! # Example
//!
//! ```
//! use trellis_core::catalog::{self, EventKind};
//!
//! catalog::validate().unwrap();
//!
//! let template = EventKind::RenderingComponent.template();
//! assert_eq!(template.id.get(), 3);
//! assert_eq!(template.name, "RenderingComponent");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::record::{FieldValue, StructuredRecord};
use crate::severity::Severity;

/// Numeric id of an event template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u16);

impl EventId {
    /// Create an event id.
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semantic type of a template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A component instance id.
    ComponentId,
    /// A type descriptor.
    TypeName,
    /// Free text.
    Text,
    /// An unsigned numeric id.
    Unsigned,
}

impl FieldKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::ComponentId => "component_id",
            FieldKind::TypeName => "type_name",
            FieldKind::Text => "text",
            FieldKind::Unsigned => "unsigned",
        }
    }
}

/// One entry of a template's field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Field name, also the placeholder name in the message template.
    pub name: &'static str,
    /// Semantic type.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// The lifecycle moments the catalog has a template for.
///
/// Discriminants equal the template's numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A non-root component is about to begin its first initialization.
    InitializingChildComponent = 1,
    /// A root component is about to begin its first initialization.
    InitializingRootComponent = 2,
    /// A component is about to execute its render step.
    RenderingComponent = 3,
    /// A component is about to be torn down.
    DisposingComponent = 4,
    /// An inbound event is about to be routed to a handler.
    HandlingEvent = 5,
    /// A component has just finished its render step.
    RenderedComponent = 6,
    /// A component is about to be initialized and receive its first parameters.
    InitializingAndSettingParametersComponent = 7,
    /// A component is about to receive an updated parameter set.
    SettingParametersComponent = 8,
    /// A component's post-render callback has completed.
    AfterRenderCompleteComponent = 9,
}

impl EventKind {
    /// Every kind, in id order.
    pub const ALL: [EventKind; 9] = [
        EventKind::InitializingChildComponent,
        EventKind::InitializingRootComponent,
        EventKind::RenderingComponent,
        EventKind::DisposingComponent,
        EventKind::HandlingEvent,
        EventKind::RenderedComponent,
        EventKind::InitializingAndSettingParametersComponent,
        EventKind::SettingParametersComponent,
        EventKind::AfterRenderCompleteComponent,
    ];

    /// The catalog template for this kind.
    pub fn template(self) -> &'static EventTemplate {
        &CATALOG[self as usize - 1]
    }

    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::InitializingChildComponent => "InitializingChildComponent",
            EventKind::InitializingRootComponent => "InitializingRootComponent",
            EventKind::RenderingComponent => "RenderingComponent",
            EventKind::DisposingComponent => "DisposingComponent",
            EventKind::HandlingEvent => "HandlingEvent",
            EventKind::RenderedComponent => "RenderedComponent",
            EventKind::InitializingAndSettingParametersComponent => {
                "InitializingAndSettingParametersComponent"
            }
            EventKind::SettingParametersComponent => "SettingParametersComponent",
            EventKind::AfterRenderCompleteComponent => "AfterRenderCompleteComponent",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog entry.
#[derive(Debug, PartialEq, Eq)]
pub struct EventTemplate {
    /// Durable numeric id.
    pub id: EventId,
    /// The lifecycle moment this template describes.
    pub kind: EventKind,
    /// Stable symbolic name. Several templates of one family may share it.
    pub name: &'static str,
    /// Severity the template is emitted at.
    pub severity: Severity,
    /// Message template with `{Field}` placeholders.
    pub message: &'static str,
    /// Ordered field schema.
    pub fields: &'static [FieldSpec],
    /// Whether the gate must be checked before resolving field values.
    pub precheck: bool,
}

impl EventTemplate {
    /// Bind field values to this template, producing a record.
    ///
    /// Values are taken in schema order; extra values are ignored.
    pub fn bind(&'static self, values: impl IntoIterator<Item = FieldValue>) -> StructuredRecord {
        let values: Vec<FieldValue> = values.into_iter().take(self.fields.len()).collect();
        debug_assert_eq!(values.len(), self.fields.len(), "arity mismatch for {}", self.kind);
        debug_assert!(
            self.fields
                .iter()
                .zip(&values)
                .all(|(spec, value)| spec.kind == value.kind()),
            "field kind mismatch for {}",
            self.kind
        );
        StructuredRecord::new(self, values)
    }

    /// Render the message with `values` substituted into its placeholders.
    ///
    /// Placeholders without a bound value are left as written.
    pub fn render<'a>(&self, values: impl IntoIterator<Item = &'a FieldValue>) -> String {
        let mut out = String::with_capacity(self.message.len() + 16 * self.fields.len());
        let Ok(segments) = parse_message(self.message) else {
            out.push_str(self.message);
            return out;
        };
        let mut next = values.into_iter();
        for segment in segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Hole(name) => match next.next() {
                    Some(value) => {
                        use fmt::Write;
                        let _ = write!(out, "{value}");
                    }
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }

    /// The placeholder names in the message, in order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        parse_message(self.message)
            .map(|segments| {
                segments
                    .into_iter()
                    .filter_map(|segment| match segment {
                        Segment::Hole(name) => Some(name),
                        Segment::Literal(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

const COMPONENT: &[FieldSpec] = &[
    FieldSpec::new("ComponentId", FieldKind::ComponentId),
    FieldSpec::new("ComponentType", FieldKind::TypeName),
];

const CHILD_COMPONENT: &[FieldSpec] = &[
    FieldSpec::new("ComponentId", FieldKind::ComponentId),
    FieldSpec::new("ComponentType", FieldKind::TypeName),
    FieldSpec::new("ParentComponentId", FieldKind::ComponentId),
    FieldSpec::new("ParentComponentType", FieldKind::TypeName),
];

const HANDLING_EVENT: &[FieldSpec] = &[
    FieldSpec::new("EventId", FieldKind::Unsigned),
    FieldSpec::new("EventType", FieldKind::Text),
    FieldSpec::new("ComponentId", FieldKind::Text),
];

/// The event catalog, ordered by id.
pub static CATALOG: [EventTemplate; 9] = [
    EventTemplate {
        id: EventId::new(1),
        kind: EventKind::InitializingChildComponent,
        name: "InitializingChildComponent",
        severity: Severity::Detail,
        message: "Initializing component {ComponentId} ({ComponentType}) as child of {ParentComponentId} ({ParentComponentType})",
        fields: CHILD_COMPONENT,
        precheck: true,
    },
    EventTemplate {
        id: EventId::new(2),
        kind: EventKind::InitializingRootComponent,
        name: "InitializingRootComponent",
        severity: Severity::Detail,
        message: "Initializing root component {ComponentId} ({ComponentType})",
        fields: COMPONENT,
        precheck: true,
    },
    EventTemplate {
        id: EventId::new(3),
        kind: EventKind::RenderingComponent,
        name: "RenderingComponent",
        severity: Severity::Detail,
        message: "Rendering component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: false,
    },
    EventTemplate {
        id: EventId::new(4),
        kind: EventKind::DisposingComponent,
        name: "DisposingComponent",
        severity: Severity::Detail,
        message: "Disposing component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: true,
    },
    EventTemplate {
        id: EventId::new(5),
        kind: EventKind::HandlingEvent,
        name: "HandlingEvent",
        severity: Severity::Detail,
        message: "Handling event {EventId} of type '{EventType}' for component '{ComponentId}'",
        fields: HANDLING_EVENT,
        precheck: true,
    },
    // 6-9 were added after the primary state machine; the shared stable
    // names group them with the render family.
    EventTemplate {
        id: EventId::new(6),
        kind: EventKind::RenderedComponent,
        name: "RenderingComponent",
        severity: Severity::Detail,
        message: "Rendered component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: false,
    },
    EventTemplate {
        id: EventId::new(7),
        kind: EventKind::InitializingAndSettingParametersComponent,
        name: "RenderedComponent",
        severity: Severity::Detail,
        message: "Initializing and setting parameters for component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: false,
    },
    EventTemplate {
        id: EventId::new(8),
        kind: EventKind::SettingParametersComponent,
        name: "RenderedComponent",
        severity: Severity::Detail,
        message: "Setting parameters for component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: false,
    },
    EventTemplate {
        id: EventId::new(9),
        kind: EventKind::AfterRenderCompleteComponent,
        name: "RenderedComponent",
        severity: Severity::Detail,
        message: "AfterRender completed for component {ComponentId} of type {ComponentType}",
        fields: COMPONENT,
        precheck: true,
    },
];

/// Look up a template by numeric id.
pub fn by_id(id: EventId) -> Option<&'static EventTemplate> {
    CATALOG.iter().find(|template| template.id == id)
}

/// Validate the built-in catalog.
pub fn validate() -> CatalogResult<()> {
    validate_catalog(&CATALOG)
}

/// Validate a set of templates.
///
/// Checks that ids are non-zero and unique, names are non-empty, and each
/// message's placeholders name the template's fields exactly, in order.
pub fn validate_catalog(templates: &[EventTemplate]) -> CatalogResult<()> {
    let mut seen: BTreeMap<EventId, &'static str> = BTreeMap::new();

    for template in templates {
        if template.id.get() == 0 {
            return Err(CatalogError::ZeroId {
                name: template.name.to_string(),
            });
        }
        if template.name.is_empty() {
            return Err(CatalogError::EmptyName { id: template.id });
        }
        if let Some(first) = seen.insert(template.id, template.kind.as_str()) {
            return Err(CatalogError::DuplicateId {
                id: template.id,
                first: first.to_string(),
                second: template.kind.as_str().to_string(),
            });
        }

        let segments = parse_message(template.message)
            .map_err(|offset| CatalogError::MalformedMessage { id: template.id, offset })?;
        let placeholders: Vec<&str> = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Hole(name) => Some(*name),
                Segment::Literal(_) => None,
            })
            .collect();
        let fields: Vec<&str> = template.fields.iter().map(|field| field.name).collect();
        if placeholders != fields {
            return Err(CatalogError::PlaceholderMismatch {
                id: template.id,
                fields: fields.join(", "),
                placeholders: placeholders.join(", "),
            });
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Hole(&'a str),
}

/// Split a message template into literals and `{name}` holes.
///
/// Returns the byte offset of the first unbalanced or empty brace on error.
fn parse_message(message: &str) -> Result<Vec<Segment<'_>>, usize> {
    let mut segments = Vec::new();
    let mut rest = message;
    let mut offset = 0;

    while let Some(open) = rest.find(['{', '}']) {
        if rest.as_bytes()[open] == b'}' {
            return Err(offset + open);
        }
        let close = rest[open + 1..]
            .find(['{', '}'])
            .filter(|&i| rest.as_bytes()[open + 1 + i] == b'}')
            .ok_or(offset + open)?;
        let name = &rest[open + 1..open + 1 + close];
        if name.is_empty() {
            return Err(offset + open);
        }
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        segments.push(Segment::Hole(name));
        let consumed = open + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    Ok(segments)
}
