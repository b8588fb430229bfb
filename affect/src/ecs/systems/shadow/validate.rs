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

//! World-consistency checks for candidate actions

use super::{Action, ShadowContext, ShadowTimeline};
use crate::ecs::EcsEntity;
use crate::ecs::components::*;
use crate::ecs::systems::navigation::{escape_routes, is_peaceful, legal_exit, room_of};

impl ShadowTimeline<'_> {
    /// Whether `action` is possible for the context's actor right now
    pub fn validate(&self, ctx: &ShadowContext, action: &Action) -> bool {
        let actor = ctx.actor();
        if !self.world.contains(actor) {
            return false;
        }
        let room = room_of(self.world, actor);
        match *action {
            Action::Wait => true,
            Action::Move { direction } => {
                room.is_some_and(|room| legal_exit(self.world, room, direction).is_some())
            }
            Action::Attack { target } => self.can_harm(actor, room, target),
            Action::Flee => {
                ctx.in_combat() && room.is_some_and(|room| !escape_routes(self.world, room).is_empty())
            }
            Action::UseItem { item } => {
                let carried = self
                    .world
                    .get::<&Inventory>(actor)
                    .is_ok_and(|inventory| inventory.contains(item));
                carried
                    && self
                        .world
                        .get::<&Item>(item)
                        .is_ok_and(|item| item.is_usable())
            }
            Action::CastSpell { target } => {
                let can_cast = self
                    .world
                    .get::<&Spellcaster>(actor)
                    .is_ok_and(|caster| caster.can_cast());
                can_cast && target.is_none_or(|target| self.can_harm(actor, room, target))
            }
            Action::Social { target, .. } => {
                target != actor && room.is_some() && room_of(self.world, target) == room
            }
            Action::Guard => self
                .world
                .get::<&Sentinel>(actor)
                .is_ok_and(|sentinel| room == Some(sentinel.post)),
        }
    }

    /// Living target sharing a room that allows violence
    fn can_harm(&self, actor: EcsEntity, room: Option<EcsEntity>, target: EcsEntity) -> bool {
        let Some(room) = room else {
            return false;
        };
        target != actor
            && room_of(self.world, target) == Some(room)
            && !is_peaceful(self.world, room)
            && self
                .world
                .get::<&Vitals>(target)
                .is_ok_and(|vitals| vitals.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AffectConfig;
    use crate::ecs::GameWorld;
    use crate::ecs::builder::{link_rooms, spawn_room};
    use crate::ecs::components::*;
    use crate::ecs::systems::shadow::{Action, ShadowTimeline};
    use chrono::Utc;

    #[test]
    fn test_no_attacks_in_peaceful_rooms() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let temple = world.spawn((Room::new().with_flag(RoomFlag::Peaceful),));
        let alley = world.spawn((Room::new(),));
        let brute = world.spawn((Npc, Location::new(temple), Vitals::new(5, 50)));
        let monk = world.spawn((Npc, Location::new(temple), Vitals::new(1, 10)));
        let thug = world.spawn((Npc, Location::new(alley), Vitals::new(5, 50)));
        let mark = world.spawn((Npc, Location::new(alley), Vitals::new(1, 10)));

        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(brute).unwrap();
        assert!(!timeline.validate(&ctx, &Action::Attack { target: monk }));
        assert!(!timeline.validate(&ctx, &Action::Attack { target: mark }));
        let ctx = timeline.begin(thug).unwrap();
        assert!(timeline.validate(&ctx, &Action::Attack { target: mark }));
        assert!(!timeline.validate(&ctx, &Action::Attack { target: thug }));
    }

    #[test]
    fn test_guard_requires_post() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let gate = world.spawn((Room::new(),));
        let road = world.spawn((Room::new(),));
        let on_post = world.spawn((Npc, Location::new(gate), Sentinel::new(gate)));
        let off_post = world.spawn((Npc, Location::new(road), Sentinel::new(gate)));
        let civilian = world.spawn((Npc, Location::new(gate)));

        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        for (npc, expected) in [(on_post, true), (off_post, false), (civilian, false)] {
            let ctx = timeline.begin(npc).unwrap();
            assert_eq!(timeline.validate(&ctx, &Action::Guard), expected);
        }
    }

    #[test]
    fn test_items_must_be_carried_and_usable() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let potion = world.spawn((Item::new(ItemKind::Potion, 20),));
        let sword = world.spawn((Item::new(ItemKind::Weapon, 50),));
        let stray = world.spawn((Item::new(ItemKind::Food, 1),));
        let mut inventory = Inventory::new();
        inventory.add(potion);
        inventory.add(sword);
        let npc = world.spawn((Npc, inventory));

        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(npc).unwrap();
        assert!(timeline.validate(&ctx, &Action::UseItem { item: potion }));
        assert!(!timeline.validate(&ctx, &Action::UseItem { item: sword }));
        assert!(!timeline.validate(&ctx, &Action::UseItem { item: stray }));
    }

    #[test]
    fn test_flee_requires_combat_and_exit() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let cell = world.spawn((Room::new(),));
        let foe = world.spawn((Npc, Location::new(cell)));
        let trapped = world.spawn((Npc, Location::new(cell), Combatant { opponent: Some(foe) }));
        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(trapped).unwrap();
        assert!(!timeline.validate(&ctx, &Action::Flee));
        let ctx = timeline.begin(foe).unwrap();
        assert!(!timeline.validate(&ctx, &Action::Flee));
    }

    #[test]
    fn test_flee_ignores_death_trap_exits() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let ledge = spawn_room(&mut world, "ledge", &[]);
        let cliff = spawn_room(&mut world, "cliff", &[RoomFlag::DeathTrap]);
        link_rooms(&mut world, ledge, Direction::Down, cliff).unwrap();
        let foe = world.spawn((Npc, Location::new(ledge)));
        let cornered = world.spawn((Npc, Location::new(ledge), Combatant { opponent: Some(foe) }));
        {
            let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
            let ctx = timeline.begin(cornered).unwrap();
            assert!(!timeline.validate(&ctx, &Action::Flee));
        }

        let path = spawn_room(&mut world, "path", &[]);
        link_rooms(&mut world, ledge, Direction::East, path).unwrap();
        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(cornered).unwrap();
        assert!(timeline.validate(&ctx, &Action::Flee));
    }
}
