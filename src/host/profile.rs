//! JSONプロファイルを読むホスト
//!
//! 送信ペイロードと同じ形式のファイルを毎ティック読み直す。
//! ファイルがない・読めない場合はプレイヤー不在として扱う。

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::HostEnvironment;
use crate::skills::{CounterSource, Skill};

#[derive(Deserialize)]
struct ProfileFile {
    #[serde(rename = "playerName", default)]
    player_name: Option<String>,
    #[serde(flatten)]
    skills: HashMap<String, Value>,
}

/// ある時点のプレイヤー状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    name: Option<String>,
    experience: HashMap<Skill, u32>,
}

impl PlayerProfile {
    /// プレイヤー不在
    pub fn absent() -> Self {
        Self::default()
    }

    /// JSON文字列からパース
    ///
    /// 未知のキーは無視し、記載のないスキルは0として扱う。
    pub fn parse(content: &str) -> Result<Self> {
        let file: ProfileFile =
            serde_json::from_str(content).context("Failed to parse player profile")?;

        let mut experience = HashMap::new();
        for (key, value) in &file.skills {
            let Some(skill) = Skill::from_key(key) else {
                tracing::debug!("Ignoring unknown profile key: {}", key);
                continue;
            };
            let xp = value
                .as_u64()
                .and_then(|xp| u32::try_from(xp).ok())
                .with_context(|| format!("Invalid experience for {}: {}", key, value))?;
            experience.insert(skill, xp);
        }

        Ok(Self {
            name: file.player_name,
            experience,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CounterSource for PlayerProfile {
    fn experience(&self, skill: Skill) -> u32 {
        self.experience.get(&skill).copied().unwrap_or(0)
    }
}

impl HostEnvironment for PlayerProfile {
    fn local_player_name(&self) -> Option<String> {
        self.name.clone()
    }
}

/// プロファイルファイルを読むホスト
#[derive(Debug, Clone)]
pub struct ProfileHost {
    path: PathBuf,
}

impl ProfileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 現在のプレイヤー状態を読む
    pub fn poll(&self) -> PlayerProfile {
        match self.load() {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!("No player available: {:#}", e);
                PlayerProfile::absent()
            }
        }
    }

    fn load(&self) -> Result<PlayerProfile> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile: {}", self.path.display()))?;
        PlayerProfile::parse(&content)
    }
}
