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

//! Read-only room graph queries

use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use hecs::Entity;
use std::collections::{HashSet, VecDeque};

/// Whether the handle still refers to a live entity
pub fn is_valid(world: &GameWorld, entity: EcsEntity) -> bool {
    world.contains(entity)
}

/// Room the entity currently occupies
pub fn room_of(world: &GameWorld, entity: EcsEntity) -> Option<EcsEntity> {
    world.get::<&Location>(entity).ok().map(|l| l.room)
}

fn has_room_flag(world: &GameWorld, room: EcsEntity, flag: RoomFlag) -> bool {
    world
        .get::<&Room>(room)
        .map(|r| r.has_flag(flag))
        .unwrap_or(false)
}

pub fn is_peaceful(world: &GameWorld, room: EcsEntity) -> bool {
    has_room_flag(world, room, RoomFlag::Peaceful)
}

pub fn is_death_trap(world: &GameWorld, room: EcsEntity) -> bool {
    has_room_flag(world, room, RoomFlag::DeathTrap)
}

pub fn is_indoors(world: &GameWorld, room: EcsEntity) -> bool {
    has_room_flag(world, room, RoomFlag::Indoors)
}

/// Exits of a room that can be walked through right now
pub fn exits_from(world: &GameWorld, room: EcsEntity) -> Vec<ExitData> {
    world
        .get::<&Exits>(room)
        .map(|exits| {
            exits
                .iter()
                .filter(|e| e.is_passable() && world.satisfies::<&Room>(e.dest))
                .copied()
                .collect()
        })
        .unwrap_or_default()
}

/// Passable exits that do not lead into a death trap
pub fn escape_routes(world: &GameWorld, room: EcsEntity) -> Vec<ExitData> {
    exits_from(world, room)
        .into_iter()
        .filter(|e| !is_death_trap(world, e.dest))
        .collect()
}

/// Destination of a legal move from `room` toward `direction`
pub fn legal_exit(world: &GameWorld, room: EcsEntity, direction: Direction) -> Option<EcsEntity> {
    exits_from(world, room)
        .into_iter()
        .find(|e| e.direction == direction)
        .map(|e| e.dest)
}

/// Shortest walking distance between two rooms, in rooms
///
/// Breadth-first over passable exits; `None` when unreachable.
pub fn distance(world: &GameWorld, from: EcsEntity, to: EcsEntity) -> Option<u32> {
    if from == to {
        return Some(0);
    }
    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([(from, 0u32)]);
    while let Some((room, depth)) = queue.pop_front() {
        for exit in exits_from(world, room) {
            if exit.dest == to {
                return Some(depth + 1);
            }
            if visited.insert(exit.dest) {
                queue.push_back((exit.dest, depth + 1));
            }
        }
    }
    None
}

/// Entities located in `room`
pub fn occupants(world: &GameWorld, room: EcsEntity) -> Vec<EcsEntity> {
    world
        .query::<(Entity, &Location)>()
        .iter()
        .filter(|(_, location)| location.room == room)
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(world: &mut GameWorld, from: EcsEntity, direction: Direction, to: EcsEntity) {
        if world.get::<&Exits>(from).is_err() {
            world.insert_one(from, Exits::new()).unwrap();
        }
        world
            .get::<&mut Exits>(from)
            .unwrap()
            .set(ExitData::new(direction, to));
    }

    #[test]
    fn test_bfs_distance() {
        let mut world = GameWorld::new();
        let rooms: Vec<_> = (0..4).map(|_| world.spawn((Room::new(),))).collect();
        link(&mut world, rooms[0], Direction::East, rooms[1]);
        link(&mut world, rooms[1], Direction::East, rooms[2]);
        link(&mut world, rooms[2], Direction::West, rooms[1]);
        link(&mut world, rooms[1], Direction::West, rooms[0]);

        assert_eq!(distance(&world, rooms[0], rooms[0]), Some(0));
        assert_eq!(distance(&world, rooms[0], rooms[2]), Some(2));
        assert_eq!(distance(&world, rooms[2], rooms[0]), Some(2));
        assert_eq!(distance(&world, rooms[0], rooms[3]), None);
    }

    #[test]
    fn test_closed_exits_are_not_legal() {
        let mut world = GameWorld::new();
        let a = world.spawn((Room::new(),));
        let b = world.spawn((Room::new(),));
        link(&mut world, a, Direction::North, b);
        assert_eq!(legal_exit(&world, a, Direction::North), Some(b));

        world
            .get::<&mut Exits>(a)
            .unwrap()
            .get_mut(Direction::North)
            .unwrap()
            .closed = true;
        assert_eq!(legal_exit(&world, a, Direction::North), None);
        assert_eq!(distance(&world, a, b), None);
    }

    #[test]
    fn test_exit_to_despawned_room_is_not_legal() {
        let mut world = GameWorld::new();
        let a = world.spawn((Room::new(),));
        let b = world.spawn((Room::new(),));
        link(&mut world, a, Direction::Up, b);
        world.despawn(b).unwrap();
        assert!(exits_from(&world, a).is_empty());
    }

    #[test]
    fn test_room_flags_and_occupants() {
        let mut world = GameWorld::new();
        let temple = world.spawn((Room::new().with_flag(RoomFlag::Peaceful),));
        let pit = world.spawn((Room::new().with_flag(RoomFlag::DeathTrap),));
        let monk = world.spawn((Npc, Location::new(temple)));
        assert!(is_peaceful(&world, temple));
        assert!(!is_peaceful(&world, pit));
        assert!(is_death_trap(&world, pit));
        assert_eq!(occupants(&world, temple), vec![monk]);
        assert_eq!(room_of(&world, monk), Some(temple));
        assert!(is_valid(&world, monk));
    }
}
