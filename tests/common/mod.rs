//! Shared utilities for integration tests.

use std::io::Cursor;
use std::path::PathBuf;

use loadgate::config::bootstrap::LineConsole;
use loadgate::config::{ConfigSources, MapEnv};
use loadgate::observability::SilentMode;

/// A scratch directory holding the settings file for one test.
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join(".env")
    }

    pub fn write_settings(&self, contents: &str) {
        std::fs::write(self.settings_path(), contents).unwrap();
    }

    /// Sources backed by `env` with `input` as the operator's replies.
    pub fn sources(&self, env: MapEnv, input: &str) -> ConfigSources {
        ConfigSources {
            settings_path: self.settings_path(),
            env: Box::new(env),
            console: Box::new(LineConsole::new(
                Cursor::new(input.as_bytes().to_vec()),
                Vec::<u8>::new(),
            )),
            silent: SilentMode::new(false),
        }
    }
}
