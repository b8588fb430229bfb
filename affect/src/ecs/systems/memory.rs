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

//! Memory store operations
//!
//! Recording pushes a full emotion snapshot into one of an NPC's two rings.
//! Reads weight every matching entry by age bucket, importance and
//! direction, then average the remembered values.

use crate::config::MemoryConfig;
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use chrono::{DateTime, Utc};

/// Resolve the memory identity for an entity.
///
/// Players are keyed by their persistent UUID when they carry one; every
/// other entity by its session handle. Returns `None` for dead handles.
pub fn memory_target(world: &GameWorld, entity: EcsEntity) -> Option<MemoryTarget> {
    let entity_ref = world.entity(entity).ok()?;
    if entity_ref.has::<Player>() {
        let key = match entity_ref.get::<&EntityUuid>() {
            Some(uuid) => MemoryKey::Persistent(uuid.0),
            None => MemoryKey::Session(entity),
        };
        return Some(MemoryTarget::new(key, EntityKind::Player));
    }
    let kind = if entity_ref.has::<Item>() {
        EntityKind::Item
    } else if entity_ref.has::<Room>() {
        EntityKind::Room
    } else {
        EntityKind::Npc
    };
    Some(MemoryTarget::new(MemoryKey::Session(entity), kind))
}

/// Key for an entity, falling back to its session handle once despawned
fn memory_key(world: &GameWorld, entity: EcsEntity) -> MemoryKey {
    memory_target(world, entity)
        .map(|t| t.key)
        .unwrap_or(MemoryKey::Session(entity))
}

/// Record an interaction in the NPC's received or active ring.
///
/// The NPC's current emotions are snapshotted into the entry. Returns
/// `false` without side effects when either entity is invalid or the NPC
/// keeps no memories.
#[allow(clippy::too_many_arguments)]
pub fn record(
    world: &mut GameWorld,
    npc: EcsEntity,
    other: EcsEntity,
    direction: MemoryDirection,
    interaction: Interaction,
    major: bool,
    label: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    let Some(target) = memory_target(world, other) else {
        tracing::trace!("record {:?}: {:?} is not a valid entity", npc, other);
        return false;
    };
    let Ok((state, memories)) = world.query_one_mut::<(&EmotionState, &mut Memories)>(npc) else {
        tracing::trace!("record: {:?} keeps no memories", npc);
        return false;
    };
    memories.ring_mut(direction).push(MemoryEntry {
        target,
        interaction,
        major,
        timestamp: now,
        snapshot: state.snapshot(),
        label: label.map(str::to_string),
    });
    tracing::trace!(
        "{:?} remembers {} with {:?} ({:?})",
        npc,
        interaction.as_str(),
        other,
        direction
    );
    true
}

/// Weight of one entry at time `now`
pub fn entry_weight(
    config: &MemoryConfig,
    entry: &MemoryEntry,
    direction: MemoryDirection,
    now: DateTime<Utc>,
) -> f64 {
    let age = (now - entry.timestamp).num_minutes().max(0);
    let mut weight = config.bucket_weight(age);
    if entry.major {
        weight *= config.major_multiplier;
    }
    if direction == MemoryDirection::Active {
        weight *= config.active_weight;
    }
    weight
}

/// Weighted average of `value` over every entry about `key` in both rings
pub fn weighted_average<F>(
    config: &MemoryConfig,
    memories: &Memories,
    key: MemoryKey,
    now: DateTime<Utc>,
    value: F,
) -> Option<f64>
where
    F: Fn(&EmotionSnapshot) -> i32,
{
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for direction in [MemoryDirection::Received, MemoryDirection::Active] {
        for entry in memories.ring(direction).about(key) {
            let weight = entry_weight(config, entry, direction, now);
            total += weight * value(&entry.snapshot) as f64;
            weight_sum += weight;
        }
    }
    (weight_sum > 0.0).then(|| total / weight_sum)
}

/// Trust and friendship remembered about `other`, as signed deviations from neutral.
///
/// `(0, 0)` when nothing is remembered.
pub fn memory_modifier(
    world: &GameWorld,
    config: &MemoryConfig,
    npc: EcsEntity,
    other: EcsEntity,
    now: DateTime<Utc>,
) -> (i32, i32) {
    let Ok(memories) = world.get::<&Memories>(npc) else {
        return (0, 0);
    };
    let key = memory_key(world, other);
    let deviation = |emotion: Emotion| {
        weighted_average(config, &memories, key, now, |s| s.get(emotion))
            .map(|avg| (avg - config.neutral as f64).round() as i32)
            .unwrap_or(0)
    };
    (deviation(Emotion::Trust), deviation(Emotion::Friendship))
}

/// Remembered level of any emotion toward `other`; 0 with no memory
pub fn relationship_emotion(
    world: &GameWorld,
    config: &MemoryConfig,
    npc: EcsEntity,
    other: EcsEntity,
    emotion: Emotion,
    now: DateTime<Utc>,
) -> i32 {
    let Ok(memories) = world.get::<&Memories>(npc) else {
        return 0;
    };
    let key = memory_key(world, other);
    weighted_average(config, &memories, key, now, |s| s.get(emotion))
        .map(|avg| avg.round() as i32)
        .unwrap_or(0)
}

/// Whether the NPC remembers anything about `other`
pub fn remembers(world: &GameWorld, npc: EcsEntity, other: EcsEntity) -> bool {
    let key = memory_key(world, other);
    world
        .get::<&Memories>(npc)
        .map(|m| m.knows(key))
        .unwrap_or(false)
}

/// Clear every slot about `key` in every NPC's memory; returns slots cleared
pub fn forget_key(world: &mut GameWorld, key: MemoryKey) -> usize {
    let mut cleared = 0;
    for memories in world.query_mut::<&mut Memories>() {
        cleared += memories.received.clear_matching(key);
        cleared += memories.active.clear_matching(key);
    }
    cleared
}

/// Forget a removed entity by its session handle.
///
/// Player memories keyed by UUID survive; a player leaving the world is not
/// forgotten.
pub fn forget_entity(world: &mut GameWorld, entity: EcsEntity) -> usize {
    let cleared = forget_key(world, MemoryKey::Session(entity));
    if cleared > 0 {
        tracing::debug!("Forgot {:?} in {} memory slots", entity, cleared);
    }
    cleared
}
