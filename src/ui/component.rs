//! Adapter seam between patch rules and the host's component system.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A computed property's getter.
pub type ComputedGetter = Arc<dyn Fn() -> Value + Send + Sync>;

/// What a patch hook needs from a freshly created UI component.
///
/// The host adapter implements this over its real component instances;
/// `override_computed` must replace the component's own getter even when the
/// host would normally keep the component's definition on a name collision.
pub trait ComponentInstance {
    fn name(&self) -> Option<&str>;

    fn data(&self, field: &str) -> Option<Value>;

    fn set_data(&mut self, field: &str, value: Value);

    fn computed(&self, name: &str) -> Option<ComputedGetter>;

    fn override_computed(&mut self, name: &str, getter: ComputedGetter);
}

/// Plain in-memory component, for hosts that render from data snapshots.
#[derive(Default, Clone)]
pub struct StaticComponent {
    name: Option<String>,
    data: Map<String, Value>,
    computed: HashMap<String, ComputedGetter>,
}

impl StaticComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, field: impl Into<String>, value: Value) -> Self {
        self.data.insert(field.into(), value);
        self
    }

    pub fn with_computed(
        mut self,
        name: impl Into<String>,
        getter: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.computed.insert(name.into(), Arc::new(getter));
        self
    }

    /// Evaluates a computed property.
    pub fn evaluate(&self, name: &str) -> Option<Value> {
        self.computed.get(name).map(|getter| getter())
    }

    pub fn data_fields(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl std::fmt::Debug for StaticComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticComponent")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("computed", &self.computed.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ComponentInstance for StaticComponent {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn data(&self, field: &str) -> Option<Value> {
        self.data.get(field).cloned()
    }

    fn set_data(&mut self, field: &str, value: Value) {
        self.data.insert(field.to_string(), value);
    }

    fn computed(&self, name: &str) -> Option<ComputedGetter> {
        self.computed.get(name).cloned()
    }

    fn override_computed(&mut self, name: &str, getter: ComputedGetter) {
        self.computed.insert(name.to_string(), getter);
    }
}
