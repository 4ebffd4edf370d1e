//! Configuration commands.

use clap::Subcommand;
use habitroom_core::{Config, ConfigError};
use serde_json::Value;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dotted key, e.g. "autosave.debounce_ms" or "display.good_threshold"
        key: String,
    },
    /// Change one value and save the file
    Set {
        /// Dotted key
        key: String,
        /// New value, parsed as the key's type
        value: String,
    },
    /// Print every key with its value
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let previous = config.get(&key).unwrap_or_default();
            config.set(&key, &value)?;
            config.save()?;
            let current = config.get(&key).unwrap_or_default();
            tracing::debug!(%key, %previous, %current, "config updated");
            println!("{key}: {previous} -> {current}");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in entries(&serde_json::to_value(&config)?) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Config reset to defaults ({})", Config::path()?.display());
        }
    }
    Ok(())
}

/// Flatten sections into sorted `section.key` pairs.
fn entries(root: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Value::Object(sections) = root else {
        return out;
    };
    for (section, fields) in sections {
        let Value::Object(fields) = fields else {
            continue;
        };
        for (field, value) in fields {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.push((format!("{section}.{field}"), rendered));
        }
    }
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_cover_every_settable_key() {
        let config = Config::default();
        let listed = entries(&serde_json::to_value(&config).unwrap());

        assert!(listed.contains(&("storage.data_file".into(), "habits.json".into())));
        assert!(listed.contains(&("display.good_threshold".into(), "50.0".into())));
        for (key, value) in &listed {
            assert_eq!(config.get(key).as_deref(), Some(value.as_str()));
        }
        assert_eq!(listed.len(), 5);
    }
}
