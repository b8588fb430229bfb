//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::ecs::components::Emotion;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "affect/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "affect/.env"
    )]
    pub env_file: Option<String>,

    #[arg(short = 't', long = "ticks", help = "Override the number of ticks to simulate")]
    pub ticks: Option<u64>,

    #[arg(short = 's', long = "seed", help = "Override the random seed")]
    pub seed: Option<u64>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "affect/config.yaml".to_string(),
            env_file: Some("affect/.env".to_string()),
            ticks: None,
            seed: None,
        }
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Open(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub affect: AffectConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, ConfigError> {
        let conf: Configuration = serde_yaml::from_reader(std::fs::File::open(path)?)?;
        conf.affect.validate()?;
        Ok(conf)
    }
}

/// Tuning for every affect system, grouped by the system that reads it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectConfig {
    pub emotion: EmotionConfig,
    pub decay: DecayConfig,
    pub memory: MemoryConfig,
    pub mood: MoodConfig,
    pub contagion: ContagionConfig,
    pub shadow: ShadowConfig,
}

impl AffectConfig {
    /// Reject settings that would break ring buffers, bucket lookup or budgeting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emotion.low_ei_threshold >= self.emotion.high_ei_threshold {
            return Err(ConfigError::Invalid(
                "emotion.low_ei_threshold must be below emotion.high_ei_threshold".into(),
            ));
        }
        if self.emotion.soft_k <= 0.0 {
            return Err(ConfigError::Invalid("emotion.soft_k must be positive".into()));
        }
        let emotion = &self.emotion;
        for (band, min, max) in [
            ("low_ei", emotion.low_ei_scale_min, emotion.low_ei_scale_max),
            ("high_ei", emotion.high_ei_scale_min, emotion.high_ei_scale_max),
        ] {
            if !(min > 0.0 && min <= max && max.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "emotion.{band}_scale_min must be positive and no greater than emotion.{band}_scale_max"
                )));
            }
        }
        if self.decay.step_min > self.decay.step_max || self.decay.step_min < 1 {
            return Err(ConfigError::Invalid(
                "decay.step_min must be at least 1 and no greater than decay.step_max".into(),
            ));
        }
        if self.decay.extreme_multiplier < 1.5 {
            return Err(ConfigError::Invalid(
                "decay.extreme_multiplier must be at least 1.5".into(),
            ));
        }
        if self.memory.capacity == 0 {
            return Err(ConfigError::Invalid("memory.capacity must be positive".into()));
        }
        if self.memory.age_buckets.len() != 5 {
            return Err(ConfigError::Invalid(format!(
                "memory.age_buckets must contain exactly 5 buckets, found {}",
                self.memory.age_buckets.len()
            )));
        }
        if self.shadow.capacity == 0 {
            return Err(ConfigError::Invalid("shadow.capacity must be positive".into()));
        }
        if self.shadow.budget_max < self.shadow.base_cost {
            return Err(ConfigError::Invalid(
                "shadow.budget_max must cover at least one shadow.base_cost".into(),
            ));
        }
        if self.shadow.score_limit <= 0 || self.shadow.no_action_floor <= -self.shadow.score_limit
        {
            return Err(ConfigError::Invalid(
                "shadow.no_action_floor must lie inside (-score_limit, score_limit)".into(),
            ));
        }
        Ok(())
    }
}

/// Emotion update pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Emotional intelligence below this value amplifies deltas
    pub low_ei_threshold: u8,
    /// Emotional intelligence above this value damps deltas
    pub high_ei_threshold: u8,
    pub low_ei_scale_min: f64,
    pub low_ei_scale_max: f64,
    pub high_ei_scale_min: f64,
    pub high_ei_scale_max: f64,
    /// Raw values above the knee are compressed toward 100
    pub soft_knee: f64,
    /// Half-saturation constant of the compression curve
    pub soft_k: f64,
    /// Per-emotion Neuroticism gain coefficients (aversive emotions only)
    pub neuroticism_gain: BTreeMap<Emotion, f64>,
}

impl EmotionConfig {
    pub fn beta(&self, emotion: Emotion) -> f64 {
        self.neuroticism_gain.get(&emotion).copied().unwrap_or(0.0)
    }
}

impl Default for EmotionConfig {
    fn default() -> Self {
        let neuroticism_gain = BTreeMap::from([
            (Emotion::Fear, 0.40),
            (Emotion::Sadness, 0.35),
            (Emotion::Shame, 0.25),
            (Emotion::Humiliation, 0.30),
            (Emotion::Pain, 0.20),
            (Emotion::Horror, 0.35),
            (Emotion::Disgust, 0.20),
            (Emotion::Envy, 0.25),
            (Emotion::Anger, 0.30),
        ]);
        Self {
            low_ei_threshold: 35,
            high_ei_threshold: 70,
            low_ei_scale_min: 1.2,
            low_ei_scale_max: 1.5,
            high_ei_scale_min: 0.7,
            high_ei_scale_max: 0.9,
            soft_knee: 80.0,
            soft_k: 20.0,
            neuroticism_gain,
        }
    }
}

/// Passive decay / homeostasis tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub step_min: i32,
    pub step_max: i32,
    /// Values above this decay faster
    pub extreme_threshold: i32,
    pub extreme_multiplier: f64,
    /// Global decay rate multiplier
    pub multiplier: f64,
    /// Baseline for sadness, pain, horror, disgust, shame and humiliation
    pub low_baseline: i32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            step_min: 1,
            step_max: 3,
            extreme_threshold: 80,
            extreme_multiplier: 1.5,
            multiplier: 1.0,
            low_baseline: 2,
        }
    }
}

/// One age bucket of the memory weighting table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBucket {
    /// Exclusive upper bound in minutes; `None` for the final open bucket
    pub max_age_minutes: Option<i64>,
    pub weight: f64,
}

/// Memory ring and relationship weighting tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Slots per ring buffer (received and active rings share it)
    pub capacity: usize,
    pub age_buckets: Vec<AgeBucket>,
    pub major_multiplier: f64,
    /// Share of weight kept by memories of things the NPC did itself
    pub active_weight: f64,
    /// Neutral emotion level deviations are measured from
    pub neutral: i32,
}

impl MemoryConfig {
    /// Weight of the bucket containing the given age
    pub fn bucket_weight(&self, age_minutes: i64) -> f64 {
        self.age_buckets
            .iter()
            .find(|b| b.max_age_minutes.is_none_or(|max| age_minutes < max))
            .map(|b| b.weight)
            .unwrap_or(0.0)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            age_buckets: vec![
                AgeBucket { max_age_minutes: Some(10), weight: 1.0 },
                AgeBucket { max_age_minutes: Some(60), weight: 0.7 },
                AgeBucket { max_age_minutes: Some(180), weight: 0.5 },
                AgeBucket { max_age_minutes: Some(720), weight: 0.3 },
                AgeBucket { max_age_minutes: None, weight: 0.1 },
            ],
            major_multiplier: 2.0,
            active_weight: 0.3,
            neutral: 50,
        }
    }
}

/// Mood smoothing and relationship blending
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Stored mood moves at most 1/divisor of the gap per tick
    pub smoothing_divisor: i32,
    /// Gap above which a step of at least one point is forced
    pub min_step_gap: i32,
    /// Share of the relationship deviation applied by `effective_emotion_toward`
    pub relationship_blend: f64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            smoothing_divisor: 3,
            min_step_gap: 5,
            relationship_blend: 0.6,
        }
    }
}

/// Crowd, group and leader contagion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContagionConfig {
    pub emotions: Vec<Emotion>,
    /// Gaps smaller than this are ignored
    pub threshold: i32,
    pub rate: f64,
    /// Influence multiplier for members of the same group
    pub group_weight: f64,
    /// Additional multiplier for a group's leader
    pub leader_weight: f64,
    /// Largest single contagion delta per emotion per tick
    pub max_delta: i32,
}

impl Default for ContagionConfig {
    fn default() -> Self {
        Self {
            emotions: vec![
                Emotion::Fear,
                Emotion::Happiness,
                Emotion::Anger,
                Emotion::Sadness,
                Emotion::Excitement,
                Emotion::Courage,
                Emotion::Horror,
            ],
            threshold: 10,
            rate: 0.10,
            group_weight: 2.0,
            leader_weight: 2.0,
            max_delta: 5,
        }
    }
}

/// Shadow Timeline simulator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Projection slots per decision
    pub capacity: usize,
    pub base_cost: i32,
    pub default_horizon: u8,
    pub combat_horizon: u8,
    /// Persistent per-NPC budget cap
    pub budget_max: i32,
    pub budget_regen: i32,
    /// Budget for player-controlled or budget-less entities
    pub unbounded_budget: i32,
    /// Weight of perceived danger in the score
    pub danger_weight: f64,
    /// Scores are clamped to [-score_limit, score_limit]
    pub score_limit: i32,
    /// Best scores below this select no action
    pub no_action_floor: i32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            base_cost: 10,
            default_horizon: 2,
            combat_horizon: 1,
            budget_max: 120,
            budget_regen: 30,
            unbounded_budget: 200,
            danger_weight: 0.5,
            score_limit: 200,
            no_action_floor: -150,
        }
    }
}

/// Driver settings for the headless simulation binary
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticks: u64,
    pub seed: EnvField<u64>,
    pub minutes_per_tick: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 48,
            seed: Default::default(),
            minutes_per_tick: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_arguments_default() {
        let args = Arguments::default();
        assert_eq!(args.config_file, "affect/config.yaml");
        assert_eq!(args.env_file, Some("affect/.env".to_string()));
        assert!(args.ticks.is_none());
    }

    #[test]
    fn test_arguments_default_matches_command_line() {
        let parsed = Arguments::parse_from(["wyldlands-affect"]);
        let args = Arguments::default();
        assert_eq!(parsed.config_file, args.config_file);
        assert_eq!(parsed.env_file, args.env_file);
        assert_eq!(parsed.seed, args.seed);
    }

    #[test]
    fn test_default_configuration_is_valid() {
        let config = Configuration::default();
        assert!(config.affect.validate().is_ok());
        assert_eq!(config.simulation.ticks, 48);
        assert_eq!(config.affect.memory.age_buckets.len(), 5);
    }

    #[test]
    fn test_bucket_weight_lookup() {
        let memory = MemoryConfig::default();
        assert_eq!(memory.bucket_weight(0), 1.0);
        assert_eq!(memory.bucket_weight(10), 0.7);
        assert_eq!(memory.bucket_weight(70), 0.5);
        assert_eq!(memory.bucket_weight(10_000), 0.1);
    }

    #[test]
    fn test_beta_only_for_aversive() {
        let emotion = EmotionConfig::default();
        assert_eq!(emotion.beta(Emotion::Fear), 0.40);
        assert_eq!(emotion.beta(Emotion::Happiness), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_buckets() {
        let mut config = AffectConfig::default();
        config.memory.age_buckets.pop();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_volatility_range() {
        let mut config = AffectConfig::default();
        config.emotion.low_ei_scale_min = 1.5;
        config.emotion.low_ei_scale_max = 1.2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AffectConfig::default();
        config.emotion.high_ei_scale_min = 0.9;
        config.emotion.high_ei_scale_max = 0.7;
        assert!(config.validate().is_err());

        let mut config = AffectConfig::default();
        config.emotion.high_ei_scale_min = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_small_budget() {
        let mut config = AffectConfig::default();
        config.shadow.budget_max = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_load_missing_file() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let result = Configuration::load("non_existent.yaml");
        assert!(matches!(result, Err(ConfigError::Open(_))));
    }

    #[test]
    fn test_configuration_load_from_file() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &file_path,
            "simulation:\n  ticks: 12\n  seed: \"99\"\n  minutes_per_tick: 5\naffect:\n  shadow:\n    base_cost: 12\n  memory:\n    capacity: 4\n",
        )
        .unwrap();

        let config = Configuration::load(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.simulation.ticks, 12);
        assert_eq!(*config.simulation.seed, 99);
        assert_eq!(config.affect.shadow.base_cost, 12);
        assert_eq!(config.affect.shadow.budget_max, 120);
        assert_eq!(config.affect.memory.capacity, 4);
        assert_eq!(config.affect.memory.age_buckets.len(), 5);
    }

    #[test]
    fn test_configuration_load_rejects_invalid() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.yaml");
        std::fs::write(&file_path, "affect:\n  memory:\n    capacity: 0\n").unwrap();

        let result = Configuration::load(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
