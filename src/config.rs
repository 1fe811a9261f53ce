// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! `settings.json` handling.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::apperr;
use crate::compiler::{CodegenOptions, CompileOptions, ParseMode};

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name of the external compiler binary.
    pub compiler: String,
    pub run_delay_ms: u64,
    pub wasm_stage_delay_ms: u64,
    /// Reject lines the parser doesn't recognize instead of skipping them.
    pub strict: bool,
    pub disambiguate_identifiers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compiler: "yyocamlc".to_string(),
            run_delay_ms: 500,
            wasm_stage_delay_ms: 1000,
            strict: false,
            disambiguate_identifiers: false,
        }
    }
}

impl Settings {
    /// Loads the user's settings file. A missing file (or config directory) yields defaults.
    pub fn load() -> apperr::Result<Self> {
        let Some(path) = settings_json_path() else {
            return Ok(Self::default());
        };
        match Self::load_from(&path) {
            Err(apperr::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            res => res,
        }
    }

    /// Loads settings from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> apperr::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> apperr::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            parse_mode: if self.strict { ParseMode::Strict } else { ParseMode::Lenient },
            codegen: CodegenOptions { disambiguate_identifiers: self.disambiguate_identifiers },
        }
    }

    pub fn run_delay(&self) -> Duration {
        Duration::from_millis(self.run_delay_ms)
    }

    pub fn wasm_stage_delay(&self) -> Duration {
        Duration::from_millis(self.wasm_stage_delay_ms)
    }
}

pub fn settings_json_path() -> Option<PathBuf> {
    let mut config_dir = config_dir()?;
    config_dir.push(SETTINGS_FILE_NAME);
    Some(config_dir)
}

fn config_dir() -> Option<PathBuf> {
    fn var_path(key: &str) -> Option<PathBuf> {
        std::env::var_os(key).map(PathBuf::from)
    }

    fn push(mut path: PathBuf, suffix: &str) -> PathBuf {
        path.push(suffix);
        path
    }

    #[cfg(target_os = "windows")]
    {
        var_path("APPDATA").map(|p| push(p, "luoyan"))
    }
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    {
        var_path("HOME").map(|p| push(p, "Library/Application Support/luoyan"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios")))]
    {
        var_path("XDG_CONFIG_HOME")
            .or_else(|| var_path("HOME").map(|p| push(p, ".config")))
            .map(|p| push(p, "luoyan"))
    }
}
