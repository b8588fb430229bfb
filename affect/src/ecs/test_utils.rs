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

//! Test utilities for ECS testing

use crate::ecs::builder::{NpcBuilder, link_rooms, spawn_room};
use crate::ecs::components::{Direction, Personality, PersonalityProfile};
use crate::ecs::{EcsEntity, GameWorld};

/// Create a test world
pub fn create_test_world() -> GameWorld {
    GameWorld::new()
}

/// Spawn a square with a gate to its north; returns `(square, gate)`
pub fn two_rooms(world: &mut GameWorld) -> (EcsEntity, EcsEntity) {
    let square = spawn_room(world, "square", &[]);
    let gate = spawn_room(world, "gate", &[]);
    link_rooms(world, square, Direction::North, gate).unwrap();
    (square, gate)
}

/// Spawn a balanced NPC in `room`
pub fn spawn_test_npc(world: &mut GameWorld, room: EcsEntity) -> EcsEntity {
    NpcBuilder::new("Test NPC")
        .personality(Personality::new(PersonalityProfile::Balanced))
        .location(room)
        .build(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{EmotionState, Location, Memories};

    #[test]
    fn test_create_world() {
        let world = create_test_world();
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_spawn_npc() {
        let mut world = create_test_world();
        let (square, _) = two_rooms(&mut world);
        let npc = spawn_test_npc(&mut world, square);

        assert!(world.get::<&EmotionState>(npc).is_ok());
        assert!(world.get::<&Memories>(npc).is_ok());
        assert_eq!(world.get::<&Location>(npc).unwrap().room, square);
    }
}
