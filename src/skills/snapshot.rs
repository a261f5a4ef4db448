use chrono::{DateTime, Utc};

/// 送信対象のスキル数
pub const SKILL_COUNT: usize = 23;

/// 経験値を送信するスキル
///
/// 並び順はサーバーのスキーマと位置で対応しているため変更しないこと。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skill {
    Agility,
    Attack,
    Construction,
    Cooking,
    Crafting,
    Defence,
    Farming,
    Firemaking,
    Fishing,
    Fletching,
    Herblore,
    Hitpoints,
    Hunter,
    Magic,
    Mining,
    Prayer,
    Ranged,
    Runecraft,
    Slayer,
    Smithing,
    Strength,
    Thieving,
    Woodcutting,
}

impl Skill {
    /// 送信順のスキル一覧
    pub const ALL: [Skill; SKILL_COUNT] = [
        Skill::Agility,
        Skill::Attack,
        Skill::Construction,
        Skill::Cooking,
        Skill::Crafting,
        Skill::Defence,
        Skill::Farming,
        Skill::Firemaking,
        Skill::Fishing,
        Skill::Fletching,
        Skill::Herblore,
        Skill::Hitpoints,
        Skill::Hunter,
        Skill::Magic,
        Skill::Mining,
        Skill::Prayer,
        Skill::Ranged,
        Skill::Runecraft,
        Skill::Slayer,
        Skill::Smithing,
        Skill::Strength,
        Skill::Thieving,
        Skill::Woodcutting,
    ];

    /// ペイロード上のキー名
    pub fn key(self) -> &'static str {
        match self {
            Skill::Agility => "agility_xp",
            Skill::Attack => "attack_xp",
            Skill::Construction => "construction_xp",
            Skill::Cooking => "cooking_xp",
            Skill::Crafting => "crafting_xp",
            Skill::Defence => "defence_xp",
            Skill::Farming => "farming_xp",
            Skill::Firemaking => "firemaking_xp",
            Skill::Fishing => "fishing_xp",
            Skill::Fletching => "fletching_xp",
            Skill::Herblore => "herblore_xp",
            Skill::Hitpoints => "hitpoints_xp",
            Skill::Hunter => "hunter_xp",
            Skill::Magic => "magic_xp",
            Skill::Mining => "mining_xp",
            Skill::Prayer => "prayer_xp",
            Skill::Ranged => "ranged_xp",
            Skill::Runecraft => "runecraft_xp",
            Skill::Slayer => "slayer_xp",
            Skill::Smithing => "smithing_xp",
            Skill::Strength => "strength_xp",
            Skill::Thieving => "thieving_xp",
            Skill::Woodcutting => "woodcutting_xp",
        }
    }

    /// キー名からスキルを取得
    pub fn from_key(key: &str) -> Option<Skill> {
        Self::ALL.iter().copied().find(|skill| skill.key() == key)
    }

    /// 送信順でのインデックス
    pub fn index(self) -> usize {
        self as usize
    }
}

/// ホストからスキル経験値を読み取る機能
pub trait CounterSource {
    /// 指定スキルの現在の経験値
    fn experience(&self, skill: Skill) -> u32;
}

/// あるプレイヤーの、ある時点でのスキル経験値
#[derive(Debug, Clone, PartialEq)]
pub struct SkillSnapshot {
    subject: String,
    counters: Vec<u32>,
    captured_at: DateTime<Utc>,
}

impl SkillSnapshot {
    /// 既に読み取った値からスナップショットを作成
    ///
    /// カウンタ数はここでは検証しない。送信前にシリアライザが検証する。
    pub fn new(subject: impl Into<String>, counters: Vec<u32>) -> Self {
        Self {
            subject: subject.into(),
            counters,
            captured_at: Utc::now(),
        }
    }

    /// ホストから現在の値を読み取る
    ///
    /// プレイヤーがいない（名前が空）場合はNoneを返す。
    pub fn capture<S>(subject: Option<&str>, source: &S) -> Option<Self>
    where
        S: CounterSource + ?Sized,
    {
        let subject = subject.filter(|name| !name.is_empty())?;
        let counters = Skill::ALL
            .iter()
            .map(|&skill| source.experience(skill))
            .collect();

        Some(Self::new(subject, counters))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn counters(&self) -> &[u32] {
        &self.counters
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// スキル単位で値を取得
    pub fn get(&self, skill: Skill) -> Option<u32> {
        self.counters.get(skill.index()).copied()
    }
}
