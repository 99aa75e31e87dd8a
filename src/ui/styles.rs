use crate::mods::ModDescriptor;

/// Stylesheet URLs to inject into the main view, in enabled-list order.
///
/// Each mod's `styles` resolve against its root URL. A mod with an
/// unresolvable entry contributes nothing.
pub fn collect_stylesheets(descriptors: &[ModDescriptor]) -> Vec<String> {
    let mut styles = Vec::new();
    for descriptor in descriptors {
        let resolved: Result<Vec<_>, _> = descriptor
            .definition()
            .styles
            .iter()
            .map(|style| descriptor.resolve_url(style).map(String::from))
            .collect();

        match resolved {
            Ok(urls) => styles.extend(urls),
            Err(e) => tracing::error!(mod_id = %descriptor.id(), error = %e, "Skipping mod styles"),
        }
    }
    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::ModDefinition;
    use std::path::PathBuf;
    use url::Url;

    fn package(id: &str, styles: &[&str]) -> ModDescriptor {
        let definition = styles
            .iter()
            .fold(ModDefinition::new(), |def, style| def.with_style(*style));
        ModDescriptor::package(
            id,
            PathBuf::from("/mods").join(id),
            Url::parse(&format!("assets://mods/{id}/")).unwrap(),
            definition,
        )
    }

    #[test]
    fn test_enabled_order() {
        let styles = collect_stylesheets(&[
            package("a", &["a.css", "css/extra.css"]),
            package("b", &["b.css"]),
        ]);

        assert_eq!(
            styles,
            vec![
                "assets://mods/a/a.css",
                "assets://mods/a/css/extra.css",
                "assets://mods/b/b.css",
            ]
        );
    }

    #[test]
    fn test_single_file_needs_absolute_urls() {
        let good = ModDescriptor::single_file(
            "good.json",
            ModDefinition::new().with_style("https://example.com/theme.css"),
        );
        let bad = ModDescriptor::single_file(
            "bad.json",
            ModDefinition::new()
                .with_style("https://example.com/ok.css")
                .with_style("local.css"),
        );

        assert_eq!(
            collect_stylesheets(&[bad, good]),
            vec!["https://example.com/theme.css"]
        );
    }
}
