//! Headless stash client.
//!
//! Loads an item catalog and a container layout from the data directory,
//! replays an operation script against the container and prints the result.
//!
//! # Examples
//!
//! ```bash
//! STASH_CONTAINER=backpack RUST_LOG=debug cargo run -p stash-client
//! ```

mod config;
mod render;
mod script;

use std::sync::Arc;

use anyhow::Result;
use stash_content::ContentFactory;
use stash_core::{ChangeCounter, ContainerEnv, DefaultFactory, GridContainer};

use crate::config::ClientConfig;
use crate::script::{Script, Session};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Container: {}", config.container);

    let content = ContentFactory::new(&config.data_dir);
    let catalog = content.load_catalog()?;
    let layout = content.load_container(&config.container)?;
    tracing::info!("Loaded {} item kinds", catalog.len());

    let changes = Arc::new(ChangeCounter::new());
    let env = ContainerEnv::new(Arc::new(DefaultFactory::new())).with_sink(changes.clone());
    let container = GridContainer::new(layout, env)?;

    let script_path = config.script_path();
    let script = if script_path.exists() {
        Script::load(&script_path)?
    } else {
        tracing::warn!("No script at {}, showing empty container", script_path.display());
        Script::default()
    };

    let mut session = Session::new(container, &catalog);
    let reports = session.run(&script);
    let failed = reports.iter().filter(|r| !r.code.is_success()).count();
    tracing::info!(
        "Applied {} steps ({} failed, {} change notifications)",
        reports.len(),
        failed,
        changes.count()
    );

    print!("{}", render::render(session.container()));
    if let Some(carried) = session.carried() {
        println!("  carrying {} x{}", carried.kind().name, carried.amount());
    }
    if config.print_snapshot {
        println!("{}", render::snapshot_json(session.container())?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use stash_core::{ContainerSnapshot, ItemHandle};

    use super::*;

    #[test]
    fn bundled_content_loads_and_replays() {
        let config = ClientConfig::default();
        let content = ContentFactory::new(&config.data_dir);
        let catalog = content.load_catalog().unwrap();

        for name in ["backpack", "keyring"] {
            let layout = content.load_container(name).unwrap();
            let container = GridContainer::new(layout, ContainerEnv::default()).unwrap();
            let script = Script::load(
                &ClientConfig {
                    container: name.to_owned(),
                    ..config.clone()
                }
                .script_path(),
            )
            .unwrap();

            let mut session = Session::new(container, &catalog);
            let reports = session.run(&script);
            assert_eq!(reports.len(), script.steps.len());
        }
    }

    #[test]
    fn custom_data_dir_replays_and_reloads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("containers")).unwrap();
        fs::create_dir_all(root.join("scripts")).unwrap();
        fs::write(
            root.join("items.ron"),
            "#![enable(unwrap_newtypes)]\n(items: [(handle: 1, name: \"Pebble\", max_stack: 4)])",
        )
        .unwrap();
        fs::write(
            root.join("containers").join("pouch.toml"),
            "id = \"pouch\"\n\n[dimensions]\nwidth = 2\nheight = 1\n",
        )
        .unwrap();
        fs::write(
            root.join("scripts").join("pouch.ron"),
            "(steps: [Add(item: 1, amount: 6)])",
        )
        .unwrap();

        let config = ClientConfig {
            data_dir: root.to_path_buf(),
            container: "pouch".to_owned(),
            ..ClientConfig::default()
        };
        let content = ContentFactory::new(&config.data_dir);
        let catalog = content.load_catalog().unwrap();
        let layout = content.load_container(&config.container).unwrap();
        let container = GridContainer::new(layout, ContainerEnv::default()).unwrap();
        let script = Script::load(&config.script_path()).unwrap();

        let mut session = Session::new(container, &catalog);
        let reports = session.run(&script);
        assert!(reports[0].code.is_success());
        assert_eq!(session.container().amount_of(ItemHandle(1)), 6);

        let saved = root.join("pouch.json");
        fs::write(&saved, render::snapshot_json(session.container()).unwrap()).unwrap();
        let snapshot: ContainerSnapshot =
            serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();

        let layout = content.load_container("pouch").unwrap();
        let mut reloaded = GridContainer::new(layout, ContainerEnv::default()).unwrap();
        assert!(reloaded.restore(&snapshot, &catalog).is_clean());
        assert_eq!(reloaded.snapshot(), session.container().snapshot());
    }
}
