//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding `items.ron` and `containers/`.
    pub data_dir: PathBuf,
    /// Container layout to open, without the `.toml` extension.
    pub container: String,
    /// Operation script to replay. Defaults to `scripts/<container>.ron`.
    pub script: Option<PathBuf>,
    /// Print the final JSON snapshot to stdout.
    pub print_snapshot: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            container: "backpack".to_owned(),
            script: None,
            print_snapshot: true,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STASH_DATA_DIR` - Content directory (default: bundled `data/`)
    /// - `STASH_CONTAINER` - Container layout name (default: `backpack`)
    /// - `STASH_SCRIPT` - Path to a RON operation script
    /// - `STASH_PRINT_SNAPSHOT` - Print the final snapshot as JSON (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("STASH_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(name) = read_env::<String>("STASH_CONTAINER")
            && !name.is_empty()
        {
            config.container = name;
        }
        if let Some(script) = read_env::<PathBuf>("STASH_SCRIPT") {
            config.script = Some(script);
        }
        if let Some(print) = read_env_bool("STASH_PRINT_SNAPSHOT") {
            config.print_snapshot = print;
        }

        config
    }

    pub fn script_path(&self) -> PathBuf {
        self.script.clone().unwrap_or_else(|| {
            self.data_dir
                .join("scripts")
                .join(format!("{}.ron", self.container))
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_defaults_to_container_name() {
        let config = ClientConfig {
            data_dir: PathBuf::from("/srv/stash"),
            container: "chest".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.script_path(), PathBuf::from("/srv/stash/scripts/chest.ron"));
    }
}
