//! Declarative UI patch rules and the per-mod hooks that apply them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::component::{ComponentInstance, ComputedGetter};
use crate::mods::ModDescriptor;

pub type ComponentPredicate = Arc<dyn Fn(&dyn ComponentInstance) -> bool + Send + Sync>;
pub type DataTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;
/// Receives a producer of the previously resolved value.
pub type ComputedFn = Arc<dyn Fn(&dyn Fn() -> Value) -> Value + Send + Sync>;

#[derive(Clone)]
pub enum ComponentMatcher {
    /// Exact component name.
    Name(String),
    /// Regex over the component name.
    Pattern(Regex),
    Predicate(ComponentPredicate),
}

impl ComponentMatcher {
    pub fn matches(&self, component: &dyn ComponentInstance) -> bool {
        match self {
            ComponentMatcher::Name(name) => component.name() == Some(name.as_str()),
            ComponentMatcher::Pattern(pattern) => {
                component.name().is_some_and(|name| pattern.is_match(name))
            }
            ComponentMatcher::Predicate(predicate) => predicate(component),
        }
    }
}

impl fmt::Debug for ComponentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentMatcher::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ComponentMatcher::Pattern(pattern) => {
                f.debug_tuple("Pattern").field(&pattern.as_str()).finish()
            }
            ComponentMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Clone)]
pub enum DataOverride {
    /// Replace the field outright.
    Value(Value),
    /// Compute the new value from the field's prior value.
    Transform(DataTransform),
}

#[derive(Clone)]
pub enum ComputedOverride {
    Value(Value),
    Function(ComputedFn),
}

impl fmt::Debug for DataOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOverride::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DataOverride::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

impl fmt::Debug for ComputedOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputedOverride::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ComputedOverride::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// One `vueHooks` entry of a mod.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPatchRule")]
pub struct ComponentPatchRule {
    pub matcher: ComponentMatcher,
    pub computed: BTreeMap<String, ComputedOverride>,
    pub data: BTreeMap<String, DataOverride>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatchRule {
    match_name: Option<String>,
    match_pattern: Option<String>,
    #[serde(default)]
    computed: BTreeMap<String, Value>,
    #[serde(default)]
    data: BTreeMap<String, Value>,
}

impl TryFrom<RawPatchRule> for ComponentPatchRule {
    type Error = String;

    fn try_from(raw: RawPatchRule) -> Result<Self, Self::Error> {
        let matcher = match (raw.match_name, raw.match_pattern) {
            (Some(name), _) => ComponentMatcher::Name(name),
            (None, Some(pattern)) => ComponentMatcher::Pattern(
                Regex::new(&pattern).map_err(|e| format!("invalid matchPattern: {e}"))?,
            ),
            (None, None) => return Err("patch rule needs matchName or matchPattern".into()),
        };
        Ok(Self {
            matcher,
            computed: raw
                .computed
                .into_iter()
                .map(|(k, v)| (k, ComputedOverride::Value(v)))
                .collect(),
            data: raw
                .data
                .into_iter()
                .map(|(k, v)| (k, DataOverride::Value(v)))
                .collect(),
        })
    }
}

impl ComponentPatchRule {
    pub fn new(matcher: ComponentMatcher) -> Self {
        Self {
            matcher,
            computed: BTreeMap::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn for_name(name: impl Into<String>) -> Self {
        Self::new(ComponentMatcher::Name(name.into()))
    }

    pub fn for_predicate(
        predicate: impl Fn(&dyn ComponentInstance) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(ComponentMatcher::Predicate(Arc::new(predicate)))
    }

    pub fn data(mut self, field: impl Into<String>, value: Value) -> Self {
        self.data.insert(field.into(), DataOverride::Value(value));
        self
    }

    pub fn transform_data(
        mut self,
        field: impl Into<String>,
        transform: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.data
            .insert(field.into(), DataOverride::Transform(Arc::new(transform)));
        self
    }

    pub fn computed(mut self, name: impl Into<String>, value: Value) -> Self {
        self.computed
            .insert(name.into(), ComputedOverride::Value(value));
        self
    }

    pub fn computed_fn(
        mut self,
        name: impl Into<String>,
        compute: impl Fn(&dyn Fn() -> Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.computed
            .insert(name.into(), ComputedOverride::Function(Arc::new(compute)));
        self
    }

    /// Applies the overrides if the rule matches. Returns whether it matched.
    pub fn apply(&self, component: &mut dyn ComponentInstance) -> bool {
        if !self.matcher.matches(component) {
            return false;
        }

        for (name, computed) in &self.computed {
            let getter: ComputedGetter = match computed {
                ComputedOverride::Value(value) => {
                    let value = value.clone();
                    Arc::new(move || value.clone())
                }
                ComputedOverride::Function(compute) => {
                    let prior = component.computed(name);
                    let compute = Arc::clone(compute);
                    Arc::new(move || {
                        let previous = || prior.as_ref().map(|g| g()).unwrap_or(Value::Null);
                        compute(&previous)
                    })
                }
            };
            component.override_computed(name, getter);
        }

        for (field, data) in &self.data {
            let value = match data {
                DataOverride::Value(value) => value.clone(),
                DataOverride::Transform(transform) => {
                    transform(component.data(field).unwrap_or(Value::Null))
                }
            };
            component.set_data(field, value);
        }

        true
    }
}

/// Creation-time hook for one mod: runs its rules in declared order.
#[derive(Debug, Clone)]
pub struct PatchHook {
    mod_id: String,
    rules: Arc<[ComponentPatchRule]>,
}

impl PatchHook {
    pub fn new(mod_id: impl Into<String>, rules: Vec<ComponentPatchRule>) -> Self {
        Self {
            mod_id: mod_id.into(),
            rules: rules.into(),
        }
    }

    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    pub fn rules(&self) -> &[ComponentPatchRule] {
        &self.rules
    }

    /// Returns how many rules matched.
    pub fn on_created(&self, component: &mut dyn ComponentInstance) -> usize {
        let mut applied = 0;
        for rule in self.rules.iter() {
            if rule.apply(component) {
                applied += 1;
            }
        }
        if applied > 0 {
            tracing::debug!(
                mod_id = %self.mod_id,
                component = component.name().unwrap_or("<anonymous>"),
                applied,
                "Patched component"
            );
        }
        applied
    }
}

/// One hook per mod, lowest priority first so the highest-priority mod's
/// overrides are applied last.
pub fn compose_patches(descriptors: &[ModDescriptor]) -> Vec<PatchHook> {
    descriptors
        .iter()
        .rev()
        .map(|descriptor| {
            PatchHook::new(
                descriptor.id(),
                descriptor.definition().vue_hooks.clone(),
            )
        })
        .collect()
}

/// Runs `hooks` in order against a newly created component.
pub fn apply_patches(hooks: &[PatchHook], component: &mut dyn ComponentInstance) -> usize {
    hooks.iter().map(|hook| hook.on_created(component)).sum()
}
