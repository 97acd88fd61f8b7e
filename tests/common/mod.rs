use assert_cmd::assert::Assert;
use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            temp_dir: tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn dploy_cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo_bin!("dploy"));
        cmd.current_dir(self.path());
        cmd
    }

    pub fn run_dploy(&self, args: &[&str]) -> Assert {
        let mut cmd = self.dploy_cmd();
        cmd.args(args);
        cmd.assert()
    }

    pub fn create_dir(&self, name: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir_path = self.path().join(name);
        fs::create_dir_all(&dir_path)?;
        Ok(dir_path)
    }

    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;
        Ok(file_path)
    }
}
