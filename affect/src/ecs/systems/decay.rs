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

//! Passive decay / homeostasis
//!
//! Once per tick every decaying emotion moves a bounded random step toward
//! its baseline. Steps pass through the emotion pipeline with the baseline
//! as a bound, so a value never crosses it.

use super::emotion::apply_bounded;
use crate::config::{AffectConfig, DecayConfig};
use crate::ecs::GameWorld;
use crate::ecs::components::*;
use rand::Rng;

/// Emotions pulled toward a baseline each tick
pub const DECAYING: [Emotion; 9] = [
    Emotion::Fear,
    Emotion::Anger,
    Emotion::Happiness,
    Emotion::Sadness,
    Emotion::Pain,
    Emotion::Horror,
    Emotion::Disgust,
    Emotion::Shame,
    Emotion::Humiliation,
];

/// Lowest trait-driven rate factor
const RATE_FLOOR: f64 = 0.2;

/// Resting values for the decaying emotions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baselines {
    values: [i32; DECAYING.len()],
}

impl Baselines {
    /// Derive baselines from temperament and alignment.
    ///
    /// Fear rests higher with a larger wimpy tendency; anger rises with evil
    /// alignment and happiness with good alignment. The quartet share of the
    /// baselines is trimmed to fit under the quartet limit, happiness first.
    pub fn derive(config: &DecayConfig, personality: &Personality, sec: &SecBaseline) -> Self {
        let mut values = [config.low_baseline.clamp(0, EMOTION_MAX); DECAYING.len()];
        let fear = sec.fear + personality.wimpy as i32 / 5;
        let anger = sec.anger + (-personality.alignment).max(0) / 50;
        let happiness = sec.happiness + personality.alignment.max(0) / 50;
        values[0] = fear.clamp(0, EMOTION_MAX);
        values[1] = anger.clamp(0, EMOTION_MAX);
        values[2] = happiness.clamp(0, EMOTION_MAX);

        // Quartet members: fear, anger, happiness, sadness
        let mut overflow = values[..4].iter().sum::<i32>() - QUARTET_LIMIT;
        for slot in [2, 1, 0, 3] {
            if overflow <= 0 {
                break;
            }
            let take = overflow.min(values[slot]);
            values[slot] -= take;
            overflow -= take;
        }
        Self { values }
    }

    pub fn get(&self, emotion: Emotion) -> Option<i32> {
        DECAYING
            .iter()
            .position(|&e| e == emotion)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, i32)> + '_ {
        DECAYING.iter().copied().zip(self.values.iter().copied())
    }
}

/// Multiplicative decay rate for one emotion at its current value
pub fn decay_factor(config: &DecayConfig, emotion: Emotion, value: i32, traits: &PersonalityTraits) -> f64 {
    let mut factor = config.multiplier;
    if value > config.extreme_threshold {
        factor *= config.extreme_multiplier;
    }
    // High conscientiousness persists: [0.6, 1.2]
    factor *= 1.2 - 0.6 * traits.conscientiousness as f64;
    if matches!(emotion, Emotion::Fear | Emotion::Anger) {
        // High neuroticism ruminates, but never halts decay
        factor *= (1.2 - 0.6 * traits.neuroticism as f64).max(RATE_FLOOR);
    }
    if emotion == Emotion::Anger {
        // Agreeable NPCs forgive faster: [0.8, 1.8]
        factor *= 0.8 + traits.agreeableness as f64;
    }
    factor
}

/// Run one decay step over a detached emotion store.
///
/// Decreases go first so that quartet room freed this tick can be used by
/// increases. Increases are capped by the room left under the quartet limit
/// and never trigger inhibition.
pub fn decay_state<R: Rng + ?Sized>(
    config: &AffectConfig,
    state: &mut EmotionState,
    personality: &Personality,
    baselines: &Baselines,
    rng: &mut R,
) {
    let traits = personality.traits(state);
    let ei = personality.emotional_intelligence;
    let decay = &config.decay;

    let mut rising = Vec::new();
    for (emotion, baseline) in baselines.iter() {
        let value = state.get(emotion);
        if value > baseline {
            let step = decay_step(decay, emotion, value, value - baseline, &traits, rng);
            apply_bounded(&config.emotion, state, &traits, ei, emotion, -step, Some(baseline), rng);
        } else if value < baseline {
            rising.push((emotion, baseline));
        }
    }

    for (emotion, baseline) in rising {
        let value = state.get(emotion);
        let mut target = baseline;
        if emotion.in_quartet() {
            let headroom = QUARTET_LIMIT - state.quartet_sum();
            if headroom <= 0 {
                continue;
            }
            target = target.min(value + headroom);
        }
        let step = decay_step(decay, emotion, value, target - value, &traits, rng);
        apply_bounded(&config.emotion, state, &traits, ei, emotion, step, Some(target), rng);
    }
}

fn decay_step<R: Rng + ?Sized>(
    config: &DecayConfig,
    emotion: Emotion,
    value: i32,
    distance: i32,
    traits: &PersonalityTraits,
    rng: &mut R,
) -> i32 {
    let base = rng.random_range(config.step_min..=config.step_max) as f64;
    let step = (base * decay_factor(config, emotion, value, traits)).round() as i32;
    step.clamp(1, distance.max(1))
}

/// Run passive decay for every entity with an emotion store
pub fn run_decay<R: Rng + ?Sized>(world: &mut GameWorld, config: &AffectConfig, rng: &mut R) {
    let default_personality = Personality::default();
    for (state, personality, sec) in world
        .query_mut::<(&mut EmotionState, Option<&Personality>, Option<&SecBaseline>)>()
    {
        let personality = personality.unwrap_or(&default_personality);
        let sec = sec.copied().unwrap_or_else(|| personality.profile.baseline());
        let baselines = Baselines::derive(&config.decay, personality, &sec);
        decay_state(config, state, personality, &baselines, rng);
    }
}
