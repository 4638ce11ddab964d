#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use vite_envsubst::config::AppConfig;
use vite_envsubst::BuildSession;

pub const DECLARATIONS: &str = r#"/// <reference types="vite/client" />

interface ImportMetaEnv {
    readonly VITE_API_URL: string;
    readonly VITE_APP_TITLE: string;
    readonly SECRET_TOKEN: string;
}

interface ImportMeta {
    readonly env: ImportMetaEnv;
}
"#;

pub struct EnvGuard {
    previous: HashMap<String, Option<String>>,
}

impl EnvGuard {
    pub fn set(pairs: &[(&str, &str)]) -> Self {
        let mut previous = HashMap::new();
        for (key, value) in pairs {
            previous.insert((*key).to_string(), std::env::var(key).ok());
            std::env::set_var(key, value);
        }
        Self { previous }
    }

    pub fn clear(keys: &[&str]) -> Self {
        let mut previous = HashMap::new();
        for key in keys {
            previous.insert((*key).to_string(), std::env::var(key).ok());
            std::env::remove_var(key);
        }
        Self { previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            if let Some(value) = value {
                std::env::set_var(key, value);
            } else {
                std::env::remove_var(key);
            }
        }
    }
}

pub fn envsubst_env_keys() -> [&'static str; 6] {
    [
        "ENVSUBST_GLOBAL_OBJECT",
        "ENVSUBST_TEMPLATE_ENGINE",
        "ENVSUBST_INCLUDE",
        "ENVSUBST_EXCLUDE",
        "ENVSUBST_ENV_PREFIX",
        "ENVSUBST_DECLARATION_FILE",
    ]
}

/// A throwaway Vite-style project on disk.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    pub fn with_declarations(content: &str) -> Self {
        let project = Self::new();
        project.write("src/vite-env.d.ts", content);
        project
    }

    /// Canonical root, so ids built from it match what the CLI sees.
    pub fn root(&self) -> PathBuf {
        std::fs::canonicalize(self.dir.path()).expect("failed to resolve temp dir")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.path(rel);
        write_file(&full_path, content);
        full_path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("failed to read file")
    }

    pub fn session(&self, cfg: &AppConfig) -> BuildSession {
        let root = self.root();
        BuildSession::resolve(cfg.session_options(&root).expect("session options"))
    }

    pub fn run(&self, args: &[&str]) -> Output {
        run_cli(self.dir.path(), args)
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directories");
    }
    std::fs::write(path, content).expect("failed to write file");
}

pub fn run_cli(root: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vite-envsubst"));
    cmd.arg("--root").arg(root).args(args).current_dir(root);
    for key in envsubst_env_keys() {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("failed to run vite-envsubst")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
