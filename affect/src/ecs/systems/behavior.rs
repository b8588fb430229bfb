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

//! Behaviour getters read by collaborators
//!
//! All pure functions of the current emotion store.

use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};

/// Behavioural intensity multiplier in [0.5, 2.0]
///
/// Driven by high-arousal emotions; a calm NPC acts at half intensity and
/// a maximally aroused one at double.
pub fn four_d_modifier(state: &EmotionState) -> f64 {
    let arousal = [
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Excitement,
        Emotion::Horror,
        Emotion::Courage,
    ]
    .iter()
    .map(|&e| state.get(e))
    .sum::<i32>() as f64
        / 500.0;
    (0.5 + 1.5 * arousal).clamp(0.5, 2.0)
}

/// Tendency to run away, in [-100, 100]
pub fn flee_bias(state: &EmotionState) -> i32 {
    let bias = state.get(Emotion::Fear) + state.get(Emotion::Horror) / 2 + state.get(Emotion::Pain) / 2
        - state.get(Emotion::Courage)
        - state.get(Emotion::Anger) / 2;
    bias.clamp(-100, 100)
}

/// Tendency to stay idle, in [-100, 100]
pub fn lethargy_bias(state: &EmotionState) -> i32 {
    let bias = state.get(Emotion::Sadness) + state.get(Emotion::Pain) / 2
        - state.get(Emotion::Excitement)
        - state.get(Emotion::Curiosity) / 2;
    bias.clamp(-100, 100)
}

/// Preference for strong (positive) or weak (negative) targets, in [-100, 100]
pub fn target_selection_bias(state: &EmotionState) -> i32 {
    let bias = state.get(Emotion::Anger) + state.get(Emotion::Courage) / 2
        - state.get(Emotion::Fear)
        - state.get(Emotion::Compassion) / 2;
    bias.clamp(-100, 100)
}

/// All behaviour getters for one NPC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile {
    pub intensity: f64,
    pub flee: i32,
    pub lethargy: i32,
    pub target_selection: i32,
    pub traits: PersonalityTraits,
}

/// Collect the behaviour getters for an NPC; `None` without an emotion store
pub fn behavior_profile(world: &GameWorld, npc: EcsEntity) -> Option<BehaviorProfile> {
    let state = world.get::<&EmotionState>(npc).ok()?;
    let traits = world
        .get::<&Personality>(npc)
        .map(|p| p.traits(&state))
        .unwrap_or_default();
    Some(BehaviorProfile {
        intensity: four_d_modifier(&state),
        flee: flee_bias(&state),
        lethargy: lethargy_bias(&state),
        target_selection: target_selection_bias(&state),
        traits,
    })
}
