//! # Test Harness
//!
//! Small constructors for engines with hand-picked geometry, and a wrapper that
//! drives a [`Simulator`] with command lines and collects the rendered output.

use memsim_core::cache::Cache;
use memsim_core::config::{CacheConfig, Config, ReplacementPolicy};
use memsim_core::sim::{Command, Response};
use memsim_core::Simulator;

/// Builds a standalone cache level with unit latency.
pub fn cache(size_bytes: u64, line_bytes: u64, ways: u64, policy: ReplacementPolicy) -> Cache {
    Cache::new(
        "T",
        &CacheConfig {
            size_bytes,
            line_bytes,
            ways,
            policy,
            latency: 1,
        },
    )
    .unwrap()
}

/// A simulator driven by command lines.
#[derive(Debug)]
pub struct TestContext {
    /// The simulator under test.
    pub sim: Simulator,
}

impl TestContext {
    /// Creates a context with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a context with a custom configuration.
    pub fn with_config(config: &Config) -> Self {
        Self {
            sim: Simulator::new(config).unwrap(),
        }
    }

    /// Parses and executes one line, panicking on parse or dispatch errors.
    pub fn exec(&mut self, line: &str) -> Response {
        let command: Command = line.parse().unwrap();
        self.sim.execute(command).unwrap()
    }

    /// Executes every non-blank line and concatenates the rendered responses.
    pub fn run(&mut self, script: &str) -> String {
        script
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| self.exec(l).to_string())
            .collect()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
