//! Structured records produced from catalog templates.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::catalog::{EventId, EventKind, EventTemplate, FieldKind};
use crate::identity::{ComponentId, TypeDescriptor};
use crate::severity::Severity;

/// Placeholder rendered for absent optional values.
pub const NULL_TEXT: &str = "null";

/// A bound field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A component instance id.
    ComponentId(ComponentId),
    /// A type descriptor.
    TypeName(TypeDescriptor),
    /// Free text.
    Text(Cow<'static, str>),
    /// An unsigned numeric id.
    Unsigned(u64),
}

impl FieldValue {
    /// The literal `null` text value.
    pub const fn null() -> Self {
        FieldValue::Text(Cow::Borrowed(NULL_TEXT))
    }

    /// The semantic kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::ComponentId(_) => FieldKind::ComponentId,
            FieldValue::TypeName(_) => FieldKind::TypeName,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Unsigned(_) => FieldKind::Unsigned,
        }
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::ComponentId(id) => write!(f, "{id}"),
            FieldValue::TypeName(ty) => write!(f, "{ty}"),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Unsigned(value) => write!(f, "{value}"),
        }
    }
}

impl From<ComponentId> for FieldValue {
    fn from(id: ComponentId) -> Self {
        FieldValue::ComponentId(id)
    }
}

impl From<TypeDescriptor> for FieldValue {
    fn from(ty: TypeDescriptor) -> Self {
        FieldValue::TypeName(ty)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

/// A named field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name from the template schema.
    pub name: &'static str,
    /// Bound value.
    pub value: FieldValue,
}

/// One emitted diagnostic record.
///
/// Carries the template's severity, stable name and numeric id together
/// with the bound field values, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredRecord {
    severity: Severity,
    name: &'static str,
    id: EventId,
    kind: EventKind,
    fields: Vec<Field>,
    #[serde(skip)]
    template: &'static EventTemplate,
}

impl StructuredRecord {
    pub(crate) fn new(template: &'static EventTemplate, values: Vec<FieldValue>) -> Self {
        let fields = template
            .fields
            .iter()
            .zip(values)
            .map(|(spec, value)| Field {
                name: spec.name,
                value,
            })
            .collect();
        Self {
            severity: template.severity,
            name: template.name,
            id: template.id,
            kind: template.kind,
            fields,
            template,
        }
    }

    /// Severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Stable symbolic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Numeric template id.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// The template kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The template this record was bound from.
    pub fn template(&self) -> &'static EventTemplate {
        self.template
    }

    /// Fields in schema order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field values in schema order.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().map(|field| &field.value)
    }

    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// The human-readable message with values substituted.
    pub fn message(&self) -> String {
        self.template.render(self.values())
    }

    /// Display adapter for `name=value` field pairs.
    pub fn fields_display(&self) -> FieldsDisplay<'_> {
        FieldsDisplay(&self.fields)
    }
}

impl fmt::Display for StructuredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}({}): {}",
            self.severity,
            self.name,
            self.id,
            self.message()
        )
    }
}

/// Formats fields as space-separated `name=value` pairs.
pub struct FieldsDisplay<'a>(&'a [Field]);

impl fmt::Display for FieldsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", field.name, field.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendering(id: u32) -> StructuredRecord {
        EventKind::RenderingComponent.template().bind([
            FieldValue::ComponentId(ComponentId::new(id)),
            FieldValue::TypeName(TypeDescriptor::new("app::Counter")),
        ])
    }

    #[test]
    fn test_record_carries_template_metadata() {
        let record = rendering(4);
        assert_eq!(record.id().get(), 3);
        assert_eq!(record.name(), "RenderingComponent");
        assert_eq!(record.severity(), Severity::Detail);
        assert_eq!(record.kind(), EventKind::RenderingComponent);
        assert_eq!(record.fields().len(), 2);
    }

    #[test]
    fn test_field_lookup() {
        let record = rendering(4);
        assert_eq!(
            record.field("ComponentId"),
            Some(&FieldValue::ComponentId(ComponentId::new(4)))
        );
        assert!(record.field("ParentComponentId").is_none());
    }

    #[test]
    fn test_message_and_display() {
        let record = rendering(4);
        assert_eq!(record.message(), "Rendering component 4 of type app::Counter");
        assert_eq!(
            record.to_string(),
            "[detail] RenderingComponent(3): Rendering component 4 of type app::Counter"
        );
        assert_eq!(
            record.fields_display().to_string(),
            "ComponentId=4 ComponentType=app::Counter"
        );
    }

    #[test]
    fn test_null_text() {
        let value = FieldValue::null();
        assert_eq!(value.as_text(), Some("null"));
        assert_eq!(value.kind(), FieldKind::Text);
    }

    #[test]
    fn test_records_compare_structurally() {
        assert_eq!(rendering(4), rendering(4));
        assert_ne!(rendering(4), rendering(5));
    }
}
