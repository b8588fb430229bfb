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

//! Mood resolver
//!
//! Mood is the average of the positive emotions minus the average of the
//! negative ones. The stored value chases that target slowly so a single
//! event never swings it.

use super::environment::Environment;
use super::memory::{relationship_emotion, remembers};
use crate::config::{AffectConfig, MoodConfig};
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use chrono::{DateTime, Utc};

/// Instantaneous mood of an emotion store, in [-100, 100]
pub fn mood_target(state: &EmotionState) -> i32 {
    let average = |set: &[Emotion]| {
        set.iter().map(|&e| state.get(e)).sum::<i32>() as f64 / set.len() as f64
    };
    let mood = average(&Emotion::POSITIVE) - average(&Emotion::NEGATIVE);
    (mood.round() as i32).clamp(-100, 100)
}

/// Stored mood of an NPC; 0 for invalid entities
pub fn mood(world: &GameWorld, npc: EcsEntity) -> i32 {
    world
        .get::<&EmotionState>(npc)
        .map(|s| s.mood())
        .unwrap_or(0)
}

/// Move `current` a third of the way toward `target`
pub fn smooth_mood(config: &MoodConfig, current: i32, target: i32) -> i32 {
    let gap = target - current;
    let mut step = gap / config.smoothing_divisor.max(1);
    if step == 0 && gap.abs() > config.min_step_gap {
        step = gap.signum();
    }
    (current + step).clamp(-100, 100)
}

/// Smooth every NPC's stored mood toward its current target
///
/// Environmental modifiers are added to the target before smoothing.
pub fn update_moods(world: &mut GameWorld, config: &MoodConfig, environment: Option<&Environment>) {
    let indoor_rooms: Vec<EcsEntity> = world
        .query::<(hecs::Entity, &Room)>()
        .iter()
        .filter(|(_, room)| room.has_flag(RoomFlag::Indoors))
        .map(|(entity, _)| entity)
        .collect();

    for (state, personality, location) in
        world.query_mut::<(&mut EmotionState, Option<&Personality>, Option<&Location>)>()
    {
        let mut target = mood_target(state);
        if let Some(environment) = environment {
            let alignment = personality.map(|p| p.alignment).unwrap_or(0);
            let indoors = location.is_some_and(|l| indoor_rooms.contains(&l.room));
            target += environment.mood_modifier(alignment, indoors);
        }
        let next = smooth_mood(config, state.mood(), target.clamp(-100, 100));
        state.set_mood(next);
    }
}

/// Emotion level toward a specific entity, blending in remembered history.
///
/// Without any memory of `other` this is the NPC's current level of
/// `emotion`. Otherwise the remembered level's deviation from neutral is
/// applied as an offset at the configured blend.
pub fn effective_emotion_toward(
    world: &GameWorld,
    config: &AffectConfig,
    npc: EcsEntity,
    other: EcsEntity,
    emotion: Emotion,
    now: DateTime<Utc>,
) -> i32 {
    let Ok(state) = world.get::<&EmotionState>(npc) else {
        return 0;
    };
    let current = state.get(emotion);
    if !remembers(world, npc, other) {
        return current;
    }
    let remembered = relationship_emotion(world, &config.memory, npc, other, emotion, now);
    let offset = config.mood.relationship_blend * (remembered - config.memory.neutral) as f64;
    (current + offset.round() as i32).clamp(0, EMOTION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::systems::environment::Sky;
    use crate::ecs::systems::memory::record;

    #[test]
    fn test_mood_target_balanced() {
        assert_eq!(mood_target(&EmotionState::new()), 0);
        let joyful = EmotionState::new()
            .with(Emotion::Happiness, 90)
            .with(Emotion::Love, 90);
        assert_eq!(mood_target(&joyful), 20);
        let grim = EmotionState::new().with(Emotion::Horror, 90);
        assert_eq!(mood_target(&grim), -10);
    }

    #[test]
    fn test_smoothing_moves_a_third() {
        let config = MoodConfig::default();
        assert_eq!(smooth_mood(&config, 0, 30), 10);
        assert_eq!(smooth_mood(&config, 0, -30), -10);
        assert_eq!(smooth_mood(&config, 0, 2), 0);
        let loose = MoodConfig { smoothing_divisor: 10, ..MoodConfig::default() };
        assert_eq!(smooth_mood(&loose, 0, 8), 1);
    }

    #[test]
    fn test_update_moods_converges() {
        let mut world = GameWorld::new();
        let npc = world.spawn((EmotionState::new().with(Emotion::Happiness, 90).with(Emotion::Love, 90),));
        let config = MoodConfig::default();
        for _ in 0..30 {
            update_moods(&mut world, &config, None);
        }
        let mood = world.get::<&EmotionState>(npc).unwrap().mood();
        assert!((18..=20).contains(&mood), "mood {}", mood);
    }

    #[test]
    fn test_indoor_npcs_ignore_the_sky() {
        let mut world = GameWorld::new();
        let hall = world.spawn((Room::new().with_flag(RoomFlag::Indoors),));
        let field = world.spawn((Room::new(),));
        let inside = world.spawn((EmotionState::new(), Location::new(hall)));
        let outside = world.spawn((EmotionState::new(), Location::new(field)));
        let storm = Environment::new(Sky::Lightning, 15, 12);
        update_moods(&mut world, &MoodConfig::default(), Some(&storm));
        assert_eq!(mood(&world, inside), 0);
        assert!(mood(&world, outside) < 0);
    }

    #[test]
    fn test_effective_emotion_blends_memory() {
        let config = AffectConfig::default();
        let mut world = GameWorld::new();
        let npc = world.spawn((EmotionState::new(), Memories::new(4)));
        let friend = world.spawn((Npc,));
        let stranger = world.spawn((Npc,));
        let now = Utc::now();

        world.get::<&mut EmotionState>(npc).unwrap().set(Emotion::Trust, 100);
        record(&mut world, npc, friend, MemoryDirection::Received, Interaction::Rescued, true, None, now);
        world.get::<&mut EmotionState>(npc).unwrap().set(Emotion::Trust, 40);

        assert_eq!(effective_emotion_toward(&world, &config, npc, stranger, Emotion::Trust, now), 40);
        // 40 + 0.6 * (100 - 50)
        assert_eq!(effective_emotion_toward(&world, &config, npc, friend, Emotion::Trust, now), 70);
    }
}
