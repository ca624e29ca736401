//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stash_core::{ItemKind, MemoryCatalog};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogFile {
    pub items: Vec<ItemKind>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load raw item kinds from a RON file without validating them.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemKind>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemKind>> {
        let catalog: ItemCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }

    /// Load and validate a catalog. Malformed kinds and duplicate handles
    /// reject the whole file.
    pub fn load_catalog(path: &Path) -> LoadResult<MemoryCatalog> {
        let kinds = Self::load(path)?;
        let count = kinds.len();
        let catalog = MemoryCatalog::from_kinds(kinds)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), count, "loaded item catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use stash_core::{ItemCatalog, ItemCategory, ItemHandle};

    use super::*;

    const CATALOG: &str = r##"#![enable(unwrap_newtypes)]
(
    items: [
        (
            handle: 1,
            name: "Arrow",
            max_stack: 50,
            weight: 0.1,
            category: Weapon,
        ),
        (
            handle: 2,
            name: "Satchel",
            footprint: (width: 2, height: 2),
            nested: Some((dimensions: (width: 3, height: 3))),
        ),
    ],
)
"##;

    #[test]
    fn parses_defaults_and_nested_specs() {
        let kinds = ItemLoader::parse(CATALOG).unwrap();

        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[0].category, ItemCategory::Weapon);
        assert_eq!(kinds[0].footprint.width, 1);
        assert_eq!(kinds[1].max_stack, 1);
        assert_eq!(kinds[1].nested.unwrap().dimensions.width, 3);
    }

    #[test]
    fn load_catalog_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let duplicated = "#![enable(unwrap_newtypes)]\n\
            (items: [(handle: 4, name: \"a\"), (handle: 4, name: \"b\")])";
        write!(file, "{duplicated}").unwrap();

        let error = ItemLoader::load_catalog(file.path()).unwrap_err();
        assert!(error.to_string().contains("more than once"));
    }

    #[test]
    fn load_catalog_indexes_by_handle() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = ItemLoader::load_catalog(file.path()).unwrap();
        assert_eq!(catalog.lookup(ItemHandle(2)).unwrap().name, "Satchel");
    }
}
