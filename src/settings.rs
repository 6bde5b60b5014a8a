//! Player options
//!
//! Read by the session once per level load; persisted separately from scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};
use crate::sim::GameMode;

/// What the session reads from the options screen
pub trait OptionsSource: Send {
    fn selected_mode(&self) -> GameMode;
    fn vibration_enabled(&self) -> bool;
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub mode: GameMode,
    /// Vibrate on a loss
    pub vibration: bool,
    /// Play sound effects
    pub sound: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: GameMode::Reaction,
            vibration: true,
            sound: true,
        }
    }
}

impl Options {
    const STORAGE_KEY: &'static str = "chain_reaction_options";

    pub fn with_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Load options, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Options>(store, Self::STORAGE_KEY) {
            Ok(Some(options)) => {
                log::info!("Loaded options ({} mode)", options.mode.as_str());
                options
            }
            Ok(None) => {
                log::info!("Using default options");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read options ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Options saved");
        Ok(())
    }
}

impl OptionsSource for Options {
    fn selected_mode(&self) -> GameMode {
        self.mode
    }

    fn vibration_enabled(&self) -> bool {
        self.vibration
    }
}
