use crate::storage::resolve_data_path;
use serde::Serialize;
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DAILY_GOAL: i64 = 10;
pub const DEFAULT_WEEKLY_GOAL: i64 = 50;

/// Application goals, read once at startup and never re-read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalConfig {
    pub daily_goal: i64,
    pub weekly_goal: i64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }
}

impl GoalConfig {
    pub fn new(daily_goal: i64, weekly_goal: i64) -> Self {
        Self {
            daily_goal,
            weekly_goal,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            daily_goal: parse_or(&lookup, "DAILY_GOAL", DEFAULT_DAILY_GOAL),
            weekly_goal: parse_or(&lookup, "WEEKLY_GOAL", DEFAULT_WEEKLY_GOAL),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub data_path: PathBuf,
    pub goals: GoalConfig,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, std::io::Error> {
        Ok(Self {
            port: parse_or(&|key: &str| env::var(key).ok(), "PORT", DEFAULT_PORT),
            data_path: resolve_data_path()?,
            goals: GoalConfig::from_env(),
        })
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    fallback: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}, using {fallback}");
            fallback
        }),
        None => fallback,
    }
}
