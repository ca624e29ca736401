//! Data-driven item catalogs and container layouts.
//!
//! Loaders read RON/TOML data files into `stash-core` types:
//! - Item catalogs (`items.ron`, RON)
//! - Container configurations (`containers/<name>.toml`, TOML)
//!
//! The engine itself performs no I/O; applications resolve content here and
//! hand the results to [`stash_core::GridContainer`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ItemCatalogFile, ItemLoader, LoadResult};
