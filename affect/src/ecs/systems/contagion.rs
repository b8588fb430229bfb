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

//! Emotional contagion between occupants of the same room
//!
//! All influence is computed from one snapshot taken before any delta is
//! applied, so no NPC sees another's same-tick contagion result.

use super::emotion::adjust;
use crate::config::{AffectConfig, ContagionConfig};
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use hecs::Entity;
use rand::Rng;
use std::collections::HashMap;

/// Frozen view of one room occupant
#[derive(Debug, Clone)]
pub struct Occupant {
    pub entity: EcsEntity,
    pub room: EcsEntity,
    pub snapshot: EmotionSnapshot,
    pub group: Option<u32>,
    pub leader: bool,
    pub traits: PersonalityTraits,
    /// Only NPCs receive contagion; players still spread it
    pub receptive: bool,
}

/// A pending contagion change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContagionDelta {
    pub entity: EcsEntity,
    pub emotion: Emotion,
    pub delta: i32,
}

/// Snapshot every located entity with an emotion store
pub fn snapshot_occupants(world: &GameWorld) -> Vec<Occupant> {
    world
        .query::<(
            Entity,
            &EmotionState,
            &Location,
            Option<&Personality>,
            Option<&Group>,
            Option<&Leader>,
            Option<&Npc>,
        )>()
        .iter()
        .map(|(entity, state, location, personality, group, leader, npc)| Occupant {
            entity,
            room: location.room,
            snapshot: state.snapshot(),
            group: group.map(|g| g.id),
            leader: leader.is_some(),
            traits: personality.map(|p| p.traits(state)).unwrap_or_default(),
            receptive: npc.is_some(),
        })
        .collect()
}

/// How strongly an NPC picks up the feelings around it, in [0.5, 1.5]
pub fn susceptibility(traits: &PersonalityTraits) -> f64 {
    0.5 + (traits.extraversion + traits.agreeableness) as f64 / 2.0
}

/// Influence of `source` on `target`
fn influence_weight(config: &ContagionConfig, target: &Occupant, source: &Occupant) -> f64 {
    let mut weight = 1.0;
    if target.group.is_some() && target.group == source.group {
        weight *= config.group_weight;
        if source.leader {
            weight *= config.leader_weight;
        }
    }
    weight
}

/// Compute every contagion delta from a snapshot
pub fn contagion_deltas(config: &ContagionConfig, occupants: &[Occupant]) -> Vec<ContagionDelta> {
    let mut rooms: HashMap<EcsEntity, Vec<&Occupant>> = HashMap::new();
    for occupant in occupants {
        rooms.entry(occupant.room).or_default().push(occupant);
    }

    let mut deltas = Vec::new();
    for target in occupants.iter().filter(|o| o.receptive) {
        let sources: Vec<&Occupant> = rooms
            .get(&target.room)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|o| o.entity != target.entity)
                    .collect()
            })
            .unwrap_or_default();
        if sources.is_empty() {
            continue;
        }
        let crowd = (1.0 + 0.1 * (sources.len() as f64 - 1.0)).min(1.5);
        let susceptibility = susceptibility(&target.traits);

        for &emotion in config.emotions.iter() {
            let mut weighted = 0.0;
            let mut weights = 0.0;
            for source in sources.iter() {
                let weight = influence_weight(config, target, source);
                weighted += weight * source.snapshot.get(emotion) as f64;
                weights += weight;
            }
            let gap = weighted / weights - target.snapshot.get(emotion) as f64;
            if gap.abs() <= config.threshold as f64 {
                continue;
            }
            let delta = (gap * config.rate * susceptibility * crowd).round() as i32;
            let delta = delta.clamp(-config.max_delta, config.max_delta);
            if delta != 0 {
                deltas.push(ContagionDelta {
                    entity: target.entity,
                    emotion,
                    delta,
                });
            }
        }
    }
    deltas
}

/// Snapshot, compute and apply contagion for the whole world
pub fn apply_contagion<R: Rng + ?Sized>(
    world: &mut GameWorld,
    config: &AffectConfig,
    rng: &mut R,
) -> Vec<ContagionDelta> {
    let occupants = snapshot_occupants(world);
    let deltas = contagion_deltas(&config.contagion, &occupants);
    for delta in deltas.iter() {
        adjust(world, &config.emotion, delta.entity, delta.emotion, delta.delta, rng);
    }
    if !deltas.is_empty() {
        tracing::debug!("Applied {} contagion deltas", deltas.len());
    }
    deltas
}
