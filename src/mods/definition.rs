//! Mod definitions as exported by a mod's entry point.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::document::{DocumentEdit, FootnoteGroup, ModEdit};
use crate::ui::ComponentPatchRule;

/// Where a mod's footnotes come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FootnoteSource {
    /// Mod-relative path to a JSON file holding an array of groups.
    File(String),
    Groups(Vec<FootnoteGroup>),
    /// Anything else; rejected as malformed when the footnotes are merged.
    Raw(Value),
}

/// A mod's exported definition, as produced by a [`ModuleLoader`].
///
/// [`ModuleLoader`]: super::ModuleLoader
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
    /// Mod-local directory (ending in `/`) to virtual asset directory
    /// (`assets://...`, ending in `/`), in declaration order.
    #[serde(default)]
    pub trees: Option<IndexMap<String, String>>,
    /// Virtual asset URL to mod-relative path, in declaration order.
    #[serde(default)]
    pub routes: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub footnotes: Option<FootnoteSource>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub vue_hooks: Vec<ComponentPatchRule>,
    #[serde(default)]
    pub edit: Option<ModEdit>,
}

impl ModDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tree(
        mut self,
        local_dir: impl Into<String>,
        asset_dir: impl Into<String>,
    ) -> Self {
        self.trees
            .get_or_insert_with(IndexMap::new)
            .insert(local_dir.into(), asset_dir.into());
        self
    }

    pub fn with_route(mut self, asset_url: impl Into<String>, local: impl Into<String>) -> Self {
        self.routes
            .get_or_insert_with(IndexMap::new)
            .insert(asset_url.into(), local.into());
        self
    }

    pub fn with_footnotes(mut self, footnotes: FootnoteSource) -> Self {
        self.footnotes = Some(footnotes);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.push(style.into());
        self
    }

    pub fn with_patch(mut self, rule: ComponentPatchRule) -> Self {
        self.vue_hooks.push(rule);
        self
    }

    pub fn with_edit(mut self, edit: impl DocumentEdit + 'static) -> Self {
        self.edit = Some(ModEdit::new(edit));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Attribution;
    use serde_json::json;

    #[test]
    fn test_definition_from_json() {
        let definition: ModDefinition = serde_json::from_value(json!({
            "title": "Hi-res sprites",
            "desc": "Sharper sprites",
            "trees": {"gfx/": "assets://storyfiles/"},
            "routes": {"assets://logo.png": "logo.png"},
            "footnotes": "notes.json",
            "styles": ["style.css"],
            "vueHooks": [{"matchName": "PageView", "data": {"zoom": 2}}],
            "edit": [{"op": "set", "path": "/title", "value": "x"}]
        }))
        .unwrap();

        assert_eq!(definition.title.as_deref(), Some("Hi-res sprites"));
        assert_eq!(definition.description.as_deref(), Some("Sharper sprites"));
        assert_eq!(definition.trees.unwrap()["gfx/"], "assets://storyfiles/");
        assert_eq!(definition.routes.unwrap()["assets://logo.png"], "logo.png");
        assert_eq!(
            definition.footnotes,
            Some(FootnoteSource::File("notes.json".into()))
        );
        assert_eq!(definition.styles, vec!["style.css"]);
        assert_eq!(definition.vue_hooks.len(), 1);
        assert!(definition.edit.is_some());
    }

    #[test]
    fn test_minimal_definition() {
        let definition: ModDefinition = serde_json::from_value(json!({})).unwrap();

        assert!(definition.title.is_none());
        assert!(definition.trees.is_none());
        assert!(definition.routes.is_none());
        assert!(definition.footnotes.is_none());
        assert!(definition.edit.is_none());
    }

    #[test]
    fn test_footnote_source_variants() {
        let groups: FootnoteSource = serde_json::from_value(json!([
            {"author": "A", "footnotes": {"1": [{"content": "x"}]}}
        ]))
        .unwrap();
        match groups {
            FootnoteSource::Groups(groups) => {
                assert_eq!(groups[0].author, Attribution::named("A"))
            }
            other => panic!("expected groups, got {other:?}"),
        }

        let raw: FootnoteSource = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(raw, FootnoteSource::Raw(json!(42)));
    }

    #[test]
    fn test_tree_and_route_declaration_order() {
        let definition: ModDefinition = serde_json::from_str(
            r#"{
                "trees": {"z/": "assets://p/", "a/": "assets://p/"},
                "routes": {"assets://y": "y.png", "assets://b": "b.png"}
            }"#,
        )
        .unwrap();

        let trees: Vec<_> = definition.trees.unwrap().into_keys().collect();
        assert_eq!(trees, ["z/", "a/"]);
        let routes: Vec<_> = definition.routes.unwrap().into_keys().collect();
        assert_eq!(routes, ["assets://y", "assets://b"]);
    }

    #[test]
    fn test_builder() {
        let definition = ModDefinition::new()
            .with_title("t")
            .with_tree("gfx/", "assets://")
            .with_route("assets://a", "a.png")
            .with_route("assets://b", "b.png")
            .with_style("s.css");

        assert_eq!(definition.trees.as_ref().map(|t| t.len()), Some(1));
        assert_eq!(definition.routes.as_ref().map(|r| r.len()), Some(2));
        assert_eq!(definition.styles.len(), 1);
    }
}
