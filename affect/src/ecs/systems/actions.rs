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

//! Action execution
//!
//! Applies a chosen [`Action`] to the world and publishes what actually
//! happened, so the result re-enters the emotion pipeline as an event.

use super::navigation::{escape_routes, is_peaceful, legal_exit, room_of};
use super::shadow::Action;
use crate::ecs::components::*;
use crate::ecs::events::{AffectEvent, EventBus};
use crate::ecs::{EcsEntity, GameWorld};
use thiserror::Error;

/// Hit points restored by a self-targeted spell
const SELF_HEAL: i32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EcsEntity),
    #[error("Entity {0:?} has no location")]
    NoLocation(EcsEntity),
    #[error("No passable exit {direction} from {room:?}")]
    NoExit { room: EcsEntity, direction: Direction },
    #[error("Room {0:?} offers no way out")]
    Cornered(EcsEntity),
    #[error("Invalid target {target:?} for {actor:?}")]
    InvalidTarget { actor: EcsEntity, target: EcsEntity },
    #[error("Item {item:?} is not carried by {actor:?}")]
    ItemNotCarried { actor: EcsEntity, item: EcsEntity },
    #[error("Entity {0:?} cannot cast")]
    CannotCast(EcsEntity),
}

pub struct ActionSystem {
    event_bus: EventBus,
}

impl ActionSystem {
    /// Create a new action system publishing onto `event_bus`
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Carry out `action` for `actor`
    pub fn execute(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        action: Action,
    ) -> Result<(), ActionError> {
        if !world.contains(actor) {
            return Err(ActionError::EntityNotFound(actor));
        }
        tracing::debug!("{:?} performs {}", actor, action);
        match action {
            Action::Move { direction } => self.move_entity(world, actor, direction),
            Action::Attack { target } => self.attack(world, actor, target, 0),
            Action::Flee => self.flee(world, actor),
            Action::UseItem { item } => self.use_item(world, actor, item),
            Action::CastSpell { target } => self.cast(world, actor, target),
            Action::Social { target, name } => {
                if !world.contains(target) {
                    return Err(ActionError::InvalidTarget { actor, target });
                }
                self.event_bus.publish(AffectEvent::Social {
                    actor,
                    target,
                    name: name.to_string(),
                });
                Ok(())
            }
            Action::Guard | Action::Wait => Ok(()),
        }
    }

    fn move_entity(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        direction: Direction,
    ) -> Result<(), ActionError> {
        let room = room_of(world, actor).ok_or(ActionError::NoLocation(actor))?;
        let dest = legal_exit(world, room, direction).ok_or(ActionError::NoExit { room, direction })?;
        if let Ok(mut location) = world.get::<&mut Location>(actor) {
            location.room = dest;
        }
        Ok(())
    }

    /// Strike `target`; both sides end up engaged with each other
    fn attack(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        target: EcsEntity,
        bonus: i32,
    ) -> Result<(), ActionError> {
        let room = room_of(world, actor).ok_or(ActionError::NoLocation(actor))?;
        let alive = world.get::<&Vitals>(target).is_ok_and(|v| v.is_alive());
        if target == actor || !alive || room_of(world, target) != Some(room) || is_peaceful(world, room) {
            return Err(ActionError::InvalidTarget { actor, target });
        }

        let level = world.get::<&Vitals>(actor).map(|v| v.level).unwrap_or(1);
        let damage = 5 + level * 2 + bonus;
        let died = match world.get::<&mut Vitals>(target) {
            Ok(mut vitals) => {
                vitals.damage(damage);
                !vitals.is_alive()
            }
            Err(_) => false,
        };

        engage(world, actor, target)?;
        engage(world, target, actor)?;
        self.event_bus.publish(AffectEvent::Attacked {
            attacker: actor,
            defender: target,
            damage,
        });
        if died {
            tracing::debug!("{:?} killed {:?}", actor, target);
            disengage(world, actor);
            disengage(world, target);
            self.event_bus.publish(AffectEvent::Died {
                entity: target,
                killer: Some(actor),
            });
        }
        Ok(())
    }

    /// Leave through the first exit that is not a death trap and break off any fight
    fn flee(&mut self, world: &mut GameWorld, actor: EcsEntity) -> Result<(), ActionError> {
        let room = room_of(world, actor).ok_or(ActionError::NoLocation(actor))?;
        let exit = escape_routes(world, room)
            .into_iter()
            .next()
            .ok_or(ActionError::Cornered(room))?;
        let opponent = world
            .get::<&Combatant>(actor)
            .ok()
            .and_then(|c| c.opponent);
        disengage(world, actor);
        if let Some(opponent) = opponent {
            disengage(world, opponent);
        }
        self.move_entity(world, actor, exit.direction)
    }

    fn use_item(&mut self, world: &mut GameWorld, actor: EcsEntity, item: EcsEntity) -> Result<(), ActionError> {
        let removed = world
            .get::<&mut Inventory>(actor)
            .is_ok_and(|mut inventory| inventory.remove(item));
        if !removed {
            return Err(ActionError::ItemNotCarried { actor, item });
        }
        let consumed = world.get::<&Item>(item).ok().map(|i| *i);
        if let Some(consumed) = consumed {
            if consumed.kind == ItemKind::Potion {
                if let Ok(mut vitals) = world.get::<&mut Vitals>(actor) {
                    vitals.heal(consumed.value);
                }
            }
        }
        if world.despawn(item).is_ok() {
            self.event_bus.publish(AffectEvent::Despawned { entity: item });
        }
        Ok(())
    }

    fn cast(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        target: Option<EcsEntity>,
    ) -> Result<(), ActionError> {
        {
            let mut caster = world
                .get::<&mut Spellcaster>(actor)
                .map_err(|_| ActionError::CannotCast(actor))?;
            if !caster.can_cast() {
                return Err(ActionError::CannotCast(actor));
            }
            let cost = caster.spell_cost;
            caster.mana -= cost;
        }
        match target {
            Some(target) => self.attack(world, actor, target, 5),
            None => {
                if let Ok(mut vitals) = world.get::<&mut Vitals>(actor) {
                    vitals.heal(SELF_HEAL);
                }
                Ok(())
            }
        }
    }
}

fn engage(world: &mut GameWorld, entity: EcsEntity, opponent: EcsEntity) -> Result<(), ActionError> {
    if let Ok(mut combatant) = world.get::<&mut Combatant>(entity) {
        combatant.engage(opponent);
        return Ok(());
    }
    world
        .insert_one(entity, Combatant { opponent: Some(opponent) })
        .map_err(|_| ActionError::EntityNotFound(entity))
}

fn disengage(world: &mut GameWorld, entity: EcsEntity) {
    if let Ok(mut combatant) = world.get::<&mut Combatant>(entity) {
        combatant.disengage();
    }
}
