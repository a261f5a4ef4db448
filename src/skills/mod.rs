pub mod serializer;
pub mod snapshot;

pub use serializer::{serialize, PLAYER_NAME_KEY};
pub use snapshot::{CounterSource, Skill, SkillSnapshot, SKILL_COUNT};
