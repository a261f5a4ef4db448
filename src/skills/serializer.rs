//! スキルスナップショットのJSON化
//!
//! `playerName` を先頭に、23スキルのキーを固定順で並べたオブジェクトを生成する。

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::snapshot::{Skill, SkillSnapshot, SKILL_COUNT};
use crate::error::ReportError;

/// プレイヤー名のキー
pub const PLAYER_NAME_KEY: &str = "playerName";

/// キー順を保ったままシリアライズするためのラッパー
struct Payload<'a>(&'a SkillSnapshot);

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SKILL_COUNT + 1))?;
        map.serialize_entry(PLAYER_NAME_KEY, self.0.subject())?;
        for (skill, value) in Skill::ALL.iter().zip(self.0.counters()) {
            map.serialize_entry(skill.key(), value)?;
        }
        map.end()
    }
}

/// スナップショットを送信用JSONに変換
pub fn serialize(snapshot: &SkillSnapshot) -> Result<String, ReportError> {
    let actual = snapshot.counters().len();
    if actual != SKILL_COUNT {
        return Err(ReportError::Serialization {
            expected: SKILL_COUNT,
            actual,
        });
    }

    Ok(serde_json::to_string(&Payload(snapshot))?)
}
