use std::collections::BTreeMap;

/// Flattened mapping from virtual asset URL to the concrete URL serving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
    /// Enabled mod ids this table was baked from, highest priority first.
    source: Vec<String>,
}

impl RouteTable {
    pub fn new(routes: BTreeMap<String, String>, source: Vec<String>) -> Self {
        Self { routes, source }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.routes.get(url).map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.routes.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Whether this table was baked from exactly `enabled`.
    pub fn is_baked_from(&self, enabled: &[String]) -> bool {
        self.source == enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = RouteTable::new(
            BTreeMap::from([("assets://x".to_string(), "assets://mods/a/x.png".to_string())]),
            vec!["a".to_string()],
        );

        assert_eq!(table.get("assets://x"), Some("assets://mods/a/x.png"));
        assert_eq!(table.get("assets://y"), None);
        assert!(table.contains("assets://x"));
        assert_eq!(table.len(), 1);
        assert!(table.is_baked_from(&["a".to_string()]));
        assert!(!table.is_baked_from(&[]));
    }

    #[test]
    fn test_empty() {
        let table = RouteTable::empty();
        assert!(table.is_empty());
        assert!(table.is_baked_from(&[]));
        assert_eq!(table.urls().count(), 0);
    }
}
