//! Resolution of the world configuration from files and flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_trail_world::WorldConfig;

/// Values supplied on the command line; each one replaces the file value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) size: Option<(u32, u32)>,
    pub(crate) mutation_rate: Option<u32>,
    pub(crate) seed: Option<u32>,
}

impl Overrides {
    pub(crate) fn apply_to(self, mut config: WorldConfig) -> WorldConfig {
        if let Some((width, height)) = self.size {
            config.width = width;
            config.height = height;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation_rate = rate;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

/// Loads a configuration file, or the defaults when no file is given.
pub(crate) fn load(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration {}", path.display()))
}

fn parse(contents: &str) -> Result<WorldConfig> {
    toml::from_str(contents).context("failed to parse world configuration toml contents")
}

/// Parses a `WIDTHxHEIGHT` maze size.
pub(crate) fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("expected WIDTHxHEIGHT, got '{value}'");
    let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(format!("maze dimensions must be positive, got '{value}'"));
    }
    Ok((width, height))
}
