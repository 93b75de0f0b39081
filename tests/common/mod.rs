#![allow(dead_code)]

pub mod server;

use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the `sitework` binary against the mock backend with an isolated
/// configuration file
pub struct SiteworkTest {
    pub temp_dir: TempDir,
}

impl SiteworkTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        SiteworkTest { temp_dir }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute sitework command")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_sitework"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("SITEWORK_CONFIG", self.config_path())
            .env("SITEWORK_BACKEND", "mock")
            .env_remove("SITEWORK_API_URL")
            .env_remove("SITEWORK_API_TOKEN")
            .env_remove("SITEWORK_LOG")
            .env("NO_COLOR", "1");
        command
    }

    /// Run with extra environment variables, expecting success
    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> String {
        let mut command = self.command(args);
        command.envs(vars.iter().copied());
        let output = command.output().expect("Failed to execute sitework command");
        assert!(
            output.status.success(),
            "Command {:?} failed\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
