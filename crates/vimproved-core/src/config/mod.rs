// Vimproved Config
// TOML intercept declarations, resolved to ordered InterceptSpec lists

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::intercept::{InterceptSpec, SpecError};
use crate::key::{key_from_name, Key};

/// Configuration errors.
///
/// Any of these makes the loader fall back wholesale to the built-in
/// default configuration; a config is never partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("unknown key name: {0}")]
    UnknownKey(String),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Root TOML table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    #[serde(default)]
    intercept: Vec<InterceptToml>,
}

/// One `[[intercept]]` declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterceptToml {
    /// Name of the intercepted key
    key: String,

    /// Key emitted on tap; defaults to `key`
    #[serde(default)]
    ontap: Option<String>,

    /// Hold behavior: a key name (modifier) or a mapping list (layer)
    onhold: OnHold,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OnHold {
    Modifier(String),
    Layer(Vec<MappingEntry>),
}

/// One `{ from, to }` layer mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingEntry {
    from: String,
    to: String,
}

/// A loaded configuration: the resolved, ordered intercept spec list.
///
/// Modifier specs come before Layer specs, which the coordinator's
/// processing order requires; declaration order is kept within each group.
#[derive(Debug, Clone)]
pub struct Config {
    specs: Vec<InterceptSpec>,
}

impl Config {
    /// Parse a TOML configuration string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        let mut modifiers = Vec::new();
        let mut layers = Vec::new();
        for entry in parsed.intercept {
            let intercept = resolve_key(&entry.key)?;
            let tap = match entry.ontap {
                Some(name) => resolve_key(&name)?,
                None => intercept,
            };
            match entry.onhold {
                OnHold::Modifier(name) => {
                    let modifier = resolve_key(&name)?;
                    modifiers.push(InterceptSpec::modifier(intercept, tap, modifier)?);
                }
                OnHold::Layer(entries) => {
                    let mut map = HashMap::new();
                    for mapping in entries {
                        map.insert(resolve_key(&mapping.from)?, resolve_key(&mapping.to)?);
                    }
                    layers.push(InterceptSpec::layer(intercept, tap, map)?);
                }
            }
        }

        modifiers.extend(layers);
        Ok(Self { specs: modifiers })
    }

    /// Load a TOML configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The conventional config location, `~/.config/vimproved/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vimproved").join("config.toml"))
    }

    /// Number of intercept declarations
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True when no intercepts are declared
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The resolved spec list, modifiers first
    pub fn into_specs(self) -> Vec<InterceptSpec> {
        self.specs
    }
}

fn resolve_key(name: &str) -> Result<Key, ConfigError> {
    key_from_name(name).ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
}

/// Default layer mappings for the held space key, from/to key codes
const DEFAULT_SPACE_LAYER: &[(u16, u16)] = &[
    // vim home row
    (35, 105), // H -> LEFT
    (36, 108), // J -> DOWN
    (37, 103), // K -> UP
    (38, 106), // L -> RIGHT
    // vim above home row
    (21, 102), // Y -> HOME
    (22, 109), // U -> PAGEDOWN
    (23, 104), // I -> PAGEUP
    (24, 107), // O -> END
    // number row to F keys
    (2, 59),  // 1 -> F1
    (3, 60),  // 2 -> F2
    (4, 61),  // 3 -> F3
    (5, 62),  // 4 -> F4
    (6, 63),  // 5 -> F5
    (7, 64),  // 6 -> F6
    (8, 65),  // 7 -> F7
    (9, 66),  // 8 -> F8
    (10, 67), // 9 -> F9
    (11, 68), // 0 -> F10
    (12, 87), // MINUS -> F11
    (13, 88), // EQUAL -> F12
    // xf86 audio
    (50, 113), // M -> MUTE
    (51, 114), // COMMA -> VOLUMEDOWN
    (52, 115), // DOT -> VOLUMEUP
    // special chars
    (18, 1),   // E -> ESC
    (32, 111), // D -> DELETE
    (48, 14),  // B -> BACKSPACE
    // mouse navigation
    (0x110, 0x116), // BTN_LEFT -> BTN_BACK
    (0x111, 0x115), // BTN_RIGHT -> BTN_FORWARD
];

impl Default for Config {
    /// Built-in configuration: tap caps for esc / hold for ctrl, tap enter
    /// for enter / hold for ctrl, tap space for space / hold for the layer.
    fn default() -> Self {
        let caps = InterceptSpec::modifier(Key(58), Key(1), Key(29))
            .expect("built-in capslock spec is valid");
        let enter = InterceptSpec::modifier(Key(28), Key(28), Key(97))
            .expect("built-in enter spec is valid");

        let map = DEFAULT_SPACE_LAYER
            .iter()
            .map(|&(from, to)| (Key(from), Key(to)))
            .collect();
        let space =
            InterceptSpec::layer(Key(57), Key(57), map).expect("built-in space spec is valid");

        Self {
            specs: vec![caps, enter, space],
        }
    }
}

/// Load the configuration, falling back to the built-in default.
///
/// An explicit path is tried first; without one, the conventional config
/// location is tried if the file exists. Any error along the way falls
/// back wholesale to the default configuration.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let candidate = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Config::default_path().filter(|p| p.exists()),
    };

    let Some(candidate) = candidate else {
        log::debug!("no configuration file, using built-in defaults");
        return Config::default();
    };

    match Config::from_path(&candidate) {
        Ok(config) => {
            log::info!(
                "loaded {} intercept(s) from {}",
                config.len(),
                candidate.display()
            );
            config
        }
        Err(e) => {
            log::warn!(
                "failed to load {}: {e}; using built-in defaults",
                candidate.display()
            );
            Config::default()
        }
    }
}
