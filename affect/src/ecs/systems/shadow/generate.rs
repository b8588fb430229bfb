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

//! Candidate generation and budgeted projection

use super::{Action, Projection, ShadowContext, ShadowTimeline};
use crate::ecs::EcsEntity;
use crate::ecs::components::*;
use crate::ecs::systems::navigation::{exits_from, occupants, room_of};
use metrics::counter;

impl ShadowTimeline<'_> {
    /// Context-sensitive candidate actions, in evaluation order.
    ///
    /// A sentinel considers guarding first. A fighter considers only
    /// attacking and fleeing. A goal-seeker considers moves and items.
    /// Everyone else gets a mix that includes one social gesture.
    pub fn candidates(&self, ctx: &ShadowContext) -> Vec<Action> {
        let actor = ctx.actor();
        let Ok(entity) = self.world.entity(actor) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();

        if ctx.in_combat() {
            if let Some(opponent) = entity.get::<&Combatant>().and_then(|c| c.opponent) {
                candidates.push(Action::Attack { target: opponent });
            }
            candidates.push(Action::Flee);
            return candidates;
        }

        let room = room_of(self.world, actor);
        let moves: Vec<Action> = room
            .map(|room| {
                exits_from(self.world, room)
                    .into_iter()
                    .map(|exit| Action::Move {
                        direction: exit.direction,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let items: Vec<Action> = entity
            .get::<&Inventory>()
            .map(|inventory| {
                inventory
                    .items
                    .iter()
                    .map(|&item| Action::UseItem { item })
                    .collect()
            })
            .unwrap_or_default();

        if entity.has::<Sentinel>() {
            candidates.push(Action::Guard);
            candidates.extend(moves);
            candidates.push(Action::Wait);
            return candidates;
        }

        if entity.has::<ActiveGoal>() {
            candidates.extend(moves);
            candidates.extend(items);
            return candidates;
        }

        candidates.push(Action::Wait);
        if let Some(target) = room.and_then(|room| self.social_partner(ctx, room)) {
            let snapshot = ctx.snapshot();
            let name = if snapshot.get(Emotion::Happiness) >= snapshot.get(Emotion::Anger) {
                "wave"
            } else {
                "frown"
            };
            candidates.push(Action::Social { target, name });
            if snapshot.get(Emotion::Anger) > 50 {
                candidates.push(Action::Attack { target });
            }
        }
        candidates.extend(moves);
        candidates.extend(items);
        if entity.has::<Spellcaster>() {
            candidates.push(Action::CastSpell { target: None });
        }
        candidates
    }

    /// First other feeling entity in the room
    fn social_partner(&self, ctx: &ShadowContext, room: EcsEntity) -> Option<EcsEntity> {
        occupants(self.world, room).into_iter().find(|&other| {
            other != ctx.actor()
                && (self.world.satisfies::<&EmotionState>(other)
                    || self.world.satisfies::<&Player>(other))
        })
    }

    /// Budget consumed by simulating `action`
    pub fn cost(&self, ctx: &ShadowContext, action: &Action) -> i32 {
        let shadow = &self.config.shadow;
        let mut cost = (shadow.base_cost * i32::from(ctx.horizon().max(1))) as f64;
        if action.is_trivial() {
            cost /= 2.0;
        }
        if matches!(action, Action::CastSpell { .. }) {
            cost *= 2.0;
        }
        if ctx.emotional_intelligence() > self.config.emotion.high_ei_threshold {
            cost *= 0.8;
        }
        (cost.round() as i32).max(1)
    }

    /// Validate, predict, bias and score candidates until the context is
    /// full or the budget cannot cover another base-cost projection.
    ///
    /// Invalid candidates are dropped without consuming budget; a candidate
    /// the remaining budget cannot cover is skipped. Returns the number of
    /// projections held.
    pub fn generate_projections(&self, ctx: &mut ShadowContext) -> usize {
        for action in self.candidates(ctx) {
            if ctx.is_full() || ctx.remaining() < self.config.shadow.base_cost {
                break;
            }
            if !self.validate(ctx, &action) {
                tracing::trace!("{:?}: dropped invalid {}", ctx.actor(), action);
                continue;
            }
            let cost = self.cost(ctx, &action);
            if !ctx.can_afford(cost) {
                continue;
            }
            let mut outcome = self.predict(ctx, &action);
            self.bias(ctx, &action, &mut outcome);
            outcome.score = self.score(ctx, &action, &outcome);
            let projection = Projection {
                action,
                outcome,
                cost,
                horizon: ctx.horizon(),
                tick: self.tick,
            };
            if ctx.push(projection) {
                counter!("shadow.projections.executed").increment(1);
            }
        }
        ctx.len()
    }
}
