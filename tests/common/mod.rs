#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A freshly created project in a temp dir, with `HOME` pointed at the same
/// temp dir so user settings never leak into a test.
pub struct TestProject {
    dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        bin(dir.path())
            .args(["create", "--name", name, "--dir"])
            .arg(dir.path())
            .assert()
            .success();
        let root = dir.path().join(name);
        Self { dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = bin(self.dir.path());
        cmd.arg("--project-dir").arg(&self.root);
        cmd
    }

    /// Run with `--json` and return the parsed result, whatever the exit code.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().arg("--json").args(args).output().unwrap();
        serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "invalid JSON ({}): {}",
                e,
                String::from_utf8_lossy(&output.stdout)
            )
        })
    }

    /// Run with `--json` and require success.
    pub fn ok(&self, args: &[&str]) -> Value {
        let result = self.json(args);
        assert_eq!(result["success"], true, "command {:?} failed: {}", args, result);
        result
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join("agentcore").join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn doc(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read(relative)).unwrap()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// The agent record named `name` in agentcore.json
    pub fn agent(&self, name: &str) -> Value {
        self.doc("agentcore.json")["agents"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["name"] == name)
            .cloned()
            .unwrap_or_else(|| panic!("agent {} not found", name))
    }
}

pub fn bin(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentcore"));
    cmd.env("HOME", home)
        .env_remove("AGENTCORE_JSON")
        .env_remove("AGENTCORE_CDK_COMMAND")
        .env_remove("AGENTCORE_AWS_COMMAND")
        .env_remove("AGENTCORE_ENV_FILE")
        .env_remove("RUST_LOG");
    cmd
}

pub fn names(list: &Value, field: &str) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item[field].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
