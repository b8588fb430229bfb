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

//! Integration tests for the memory store and relationship resolver

use chrono::{Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wyldlands_affect::config::AffectConfig;
use wyldlands_affect::ecs::components::*;
use wyldlands_affect::ecs::events::AffectEvent;
use wyldlands_affect::ecs::systems::appraisal::appraise_all;
use wyldlands_affect::ecs::systems::memory::{
    entry_weight, forget_entity, memory_modifier, record, remembers,
};
use wyldlands_affect::ecs::{GameWorld, NpcBuilder};

fn set_trust(world: &mut GameWorld, npc: hecs::Entity, value: i32) {
    world.get::<&mut EmotionState>(npc).unwrap().set(Emotion::Trust, value);
}

#[test]
fn test_major_event_outweighs_its_age() {
    let config = AffectConfig::default();
    let mut world = GameWorld::new();
    let npc = NpcBuilder::new("Hilde").build(&mut world);
    let helper = NpcBuilder::new("Oswin").build(&mut world);
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let later = start + Duration::minutes(70);

    set_trust(&mut world, npc, 90);
    assert!(record(&mut world, npc, helper, MemoryDirection::Received, Interaction::Rescued, true, None, start));
    set_trust(&mut world, npc, 30);
    assert!(record(&mut world, npc, helper, MemoryDirection::Received, Interaction::Assisted, false, None, later));

    {
        let memories = world.get::<&Memories>(npc).unwrap();
        let entries: Vec<_> = memories.received.iter().cloned().collect();
        assert_eq!(entries.len(), 2);
        let major = entries.iter().find(|e| e.major).unwrap();
        let minor = entries.iter().find(|e| !e.major).unwrap();
        let major_weight = entry_weight(&config.memory, major, MemoryDirection::Received, later);
        assert_eq!(major_weight, 2.0 * config.memory.bucket_weight(70));
        assert_eq!(entry_weight(&config.memory, minor, MemoryDirection::Received, later), 1.0);
    }

    // (90 * 1.0 + 30 * 1.0) / 2 = 60, ten above neutral
    let (trust, _) = memory_modifier(&world, &config.memory, npc, helper, later);
    assert_eq!(trust, 10);
}

#[test]
fn test_active_memories_count_less() {
    let config = AffectConfig::default();
    let mut world = GameWorld::new();
    let npc = NpcBuilder::new("Hilde").build(&mut world);
    let other = NpcBuilder::new("Oswin").build(&mut world);
    let now = Utc::now();

    set_trust(&mut world, npc, 100);
    record(&mut world, npc, other, MemoryDirection::Received, Interaction::Healed, false, None, now);
    set_trust(&mut world, npc, 0);
    record(&mut world, npc, other, MemoryDirection::Active, Interaction::Attacked, false, None, now);

    // (100 * 1.0 + 0 * 0.3) / 1.3 = 76.9
    let (trust, _) = memory_modifier(&world, &config.memory, npc, other, now);
    assert_eq!(trust, 27);
}

#[test]
fn test_ring_overwrites_oldest() {
    let mut config = AffectConfig::default();
    config.memory.capacity = 3;
    let mut world = GameWorld::new();
    let npc = NpcBuilder::new("Hilde").configured(&config).build(&mut world);
    let others: Vec<_> = (0..4)
        .map(|i| NpcBuilder::new(format!("Visitor {}", i)).build(&mut world))
        .collect();
    let now = Utc::now();

    for &other in others.iter() {
        record(&mut world, npc, other, MemoryDirection::Received, Interaction::Assisted, false, None, now);
    }
    assert_eq!(world.get::<&Memories>(npc).unwrap().received.len(), 3);
    assert!(!remembers(&world, npc, others[0]));
    assert!(remembers(&world, npc, others[3]));
}

#[test]
fn test_forgetting_a_despawned_npc() {
    let config = AffectConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut world = GameWorld::new();
    let room = world.spawn((Room::new(), Exits::new()));
    let npc = NpcBuilder::new("Hilde").location(room).build(&mut world);
    let thief = NpcBuilder::new("Magpie").location(room).build(&mut world);
    let now = Utc::now();

    appraise_all(
        &mut world,
        &config,
        &[AffectEvent::Stolen { thief, victim: npc, item: None }],
        now,
        &mut rng,
    );
    assert!(remembers(&world, npc, thief));

    world.despawn(thief).unwrap();
    assert!(forget_entity(&mut world, thief) > 0);
    assert!(world.get::<&Memories>(npc).unwrap().received.is_empty());
}

#[test]
fn test_players_are_remembered_across_sessions() {
    let mut world = GameWorld::new();
    let npc = NpcBuilder::new("Hilde").build(&mut world);
    let identity = EntityUuid::new();
    let first = world.spawn((Player, identity));
    let now = Utc::now();
    record(&mut world, npc, first, MemoryDirection::Received, Interaction::QuestCompleted, true, Some("wolves"), now);

    // Logging out removes the session handle but not the identity
    world.despawn(first).unwrap();
    assert_eq!(forget_entity(&mut world, first), 0);
    let second = world.spawn((Player, identity));
    assert!(remembers(&world, npc, second));

    let memories = world.get::<&Memories>(npc).unwrap();
    let entry = memories.received.iter().next().unwrap();
    assert_eq!(entry.label.as_deref(), Some("wolves"));
    assert_eq!(entry.target.kind, EntityKind::Player);
}

#[test]
fn test_record_without_memories_is_rejected() {
    let mut world = GameWorld::new();
    let rock = world.spawn((Name::new("rock"),));
    let npc = NpcBuilder::new("Hilde").build(&mut world);
    let now = Utc::now();
    assert!(!record(&mut world, rock, npc, MemoryDirection::Received, Interaction::Attacked, false, None, now));

    let gone = NpcBuilder::new("Ghost").build(&mut world);
    world.despawn(gone).unwrap();
    assert!(!record(&mut world, npc, gone, MemoryDirection::Received, Interaction::Attacked, false, None, now));
}
