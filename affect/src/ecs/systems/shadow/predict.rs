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

//! Heuristic outcome prediction and subjective biasing
//!
//! Everything here reads the world through a shared borrow. Predictions are
//! coarse on purpose: they only need to rank a handful of candidates.

use super::{Action, Outcome, ShadowContext, ShadowTimeline};
use crate::ecs::EcsEntity;
use crate::ecs::components::*;
use crate::ecs::systems::memory::memory_modifier;
use crate::ecs::systems::navigation::{distance, is_death_trap, legal_exit, occupants, room_of};
use crate::ecs::systems::social::classify_social;

/// Level/HP edge beyond which a fight is considered decided
const DECISIVE_EDGE: i32 = 15;

/// Moves below this perceived danger need no deliberation
const OBVIOUS_DANGER: i32 = 20;

impl ShadowTimeline<'_> {
    /// Estimate what `action` would do, without doing it
    pub fn predict(&self, ctx: &ShadowContext, action: &Action) -> Outcome {
        match *action {
            Action::Guard => Outcome {
                score: 40,
                danger: 5,
                reward: 10,
                ..Outcome::default()
            },
            Action::Wait => Outcome {
                score: 5,
                ..Outcome::default()
            },
            Action::Move { direction } => self.predict_move(ctx, direction),
            Action::Attack { target } => self.predict_attack(ctx, target),
            Action::CastSpell {
                target: Some(target),
            } => {
                let mut outcome = self.predict_attack(ctx, target);
                outcome.reward += 10;
                outcome.danger = (outcome.danger - 10).max(0);
                outcome
            }
            Action::CastSpell { target: None } => {
                let hp_percent = self.hp_percent(ctx.actor());
                Outcome {
                    hp_delta: 10,
                    reward: (100 - hp_percent) / 3,
                    ..Outcome::default()
                }
            }
            Action::Flee => self.predict_flee(ctx),
            Action::UseItem { item } => self.predict_item(ctx, item),
            Action::Social { target, name } => self.predict_social(ctx, target, name),
        }
    }

    fn hp_percent(&self, entity: EcsEntity) -> i32 {
        self.world
            .get::<&Vitals>(entity)
            .map(|v| v.hp_percent())
            .unwrap_or(100)
    }

    fn predict_move(&self, ctx: &ShadowContext, direction: Direction) -> Outcome {
        let actor = ctx.actor();
        let Some(room) = room_of(self.world, actor) else {
            return Outcome::default();
        };
        let Some(dest) = legal_exit(self.world, room, direction) else {
            return Outcome::default();
        };
        if is_death_trap(self.world, dest) {
            return Outcome {
                score: -100,
                danger: 100,
                leads_to_death: true,
                ..Outcome::default()
            };
        }

        let fighters = occupants(self.world, dest)
            .into_iter()
            .filter(|&other| {
                self.world
                    .get::<&Combatant>(other)
                    .is_ok_and(|c| c.in_combat())
            })
            .count() as i32;
        let mut outcome = Outcome {
            score: 10,
            danger: 5 + 10 * fighters,
            ..Outcome::default()
        };

        let post = self.world.get::<&Sentinel>(actor).ok().map(|s| s.post);
        let goal = self.world.get::<&ActiveGoal>(actor).ok().map(|g| g.destination);
        let Some(anchor) = post.or(goal) else {
            return outcome;
        };
        if dest == anchor {
            outcome.reward += 30;
            outcome.achieves_goal = true;
            return outcome;
        }
        if post.is_some() && room == anchor {
            outcome.score -= 40;
        }
        let before = distance(self.world, room, anchor);
        let after = distance(self.world, dest, anchor);
        match (before, after) {
            (Some(before), Some(after)) if after < before => outcome.reward += 30,
            (Some(before), Some(after)) if after > before => outcome.score -= 20,
            (Some(_), None) => outcome.score -= 20,
            _ => {}
        }
        outcome
    }

    /// Coarse win/lose/even estimate from level and health
    fn predict_attack(&self, ctx: &ShadowContext, target: EcsEntity) -> Outcome {
        let actor = ctx.actor();
        let level = |entity| {
            self.world
                .get::<&Vitals>(entity)
                .map(|v| v.level)
                .unwrap_or(1)
        };
        let own_hp = self.hp_percent(actor);
        let edge = (level(actor) - level(target)) * 10 + (own_hp - self.hp_percent(target)) / 2;

        let mut outcome = if edge > DECISIVE_EDGE {
            Outcome {
                score: 30,
                reward: 20,
                danger: 10,
                hp_delta: -5,
                emotion_deltas: vec![(Emotion::Pride, 5)],
                ..Outcome::default()
            }
        } else if edge < -DECISIVE_EDGE {
            Outcome {
                score: -40,
                danger: 60,
                hp_delta: -30,
                leads_to_death: own_hp <= 30,
                emotion_deltas: vec![(Emotion::Fear, 10)],
                ..Outcome::default()
            }
        } else {
            Outcome {
                reward: 10,
                danger: 30,
                hp_delta: -15,
                ..Outcome::default()
            }
        };
        outcome.leads_to_combat = true;

        // Friends are hard to hit; old enemies are easy.
        let (_, friendship) = memory_modifier(self.world, &self.config.memory, actor, target, self.now);
        outcome.score -= friendship / 2;
        outcome
    }

    fn predict_flee(&self, ctx: &ShadowContext) -> Outcome {
        let actor = ctx.actor();
        let hp_percent = self.hp_percent(actor);
        let wimpy = self
            .world
            .get::<&Personality>(actor)
            .map(|p| i32::from(p.wimpy))
            .unwrap_or(0);
        let mut outcome = Outcome {
            danger: 10,
            emotion_deltas: vec![(Emotion::Fear, -5)],
            ..Outcome::default()
        };
        if hp_percent < 30 {
            outcome.score += 30;
        }
        if hp_percent < wimpy {
            outcome.score += 20;
        }
        outcome
    }

    fn predict_item(&self, ctx: &ShadowContext, item: EcsEntity) -> Outcome {
        let Ok(item) = self.world.get::<&Item>(item) else {
            return Outcome::default();
        };
        match item.kind {
            ItemKind::Potion => {
                let missing = 100 - self.hp_percent(ctx.actor());
                Outcome {
                    hp_delta: item.value,
                    reward: if missing > 0 { missing / 2 + 5 } else { 0 },
                    ..Outcome::default()
                }
            }
            ItemKind::Food => Outcome {
                reward: 5,
                emotion_deltas: vec![(Emotion::Happiness, 3)],
                ..Outcome::default()
            },
            ItemKind::Trinket | ItemKind::Weapon => Outcome::default(),
        }
    }

    fn predict_social(&self, ctx: &ShadowContext, target: EcsEntity, name: &str) -> Outcome {
        let Some(class) = classify_social(name) else {
            return Outcome::default();
        };
        let (_, friendship) =
            memory_modifier(self.world, &self.config.memory, ctx.actor(), target, self.now);
        match class.tone {
            SocialTone::Positive => Outcome {
                score: 5 + friendship / 5,
                reward: 5,
                emotion_deltas: vec![(Emotion::Happiness, 2)],
                ..Outcome::default()
            },
            SocialTone::Negative => Outcome {
                score: -5 - friendship / 5,
                danger: 10,
                ..Outcome::default()
            },
            SocialTone::Violent => Outcome {
                score: -5 - friendship / 5,
                danger: 20,
                leads_to_combat: true,
                ..Outcome::default()
            },
        }
    }

    /// Colour a base outcome with the actor's emotions at decision time,
    /// then mark it obvious where no deliberation is needed.
    pub fn bias(&self, ctx: &ShadowContext, action: &Action, outcome: &mut Outcome) {
        let snapshot = ctx.snapshot();
        let scale = |value: i32, factor: f64| (value as f64 * factor).round() as i32;

        if snapshot.get(Emotion::Fear) > 50 {
            outcome.danger = scale(outcome.danger, 1.3);
        }
        if snapshot.get(Emotion::Courage) > 50 {
            outcome.danger = scale(outcome.danger, 0.7);
        }
        if snapshot.get(Emotion::Greed) > 50 {
            outcome.reward = scale(outcome.reward, 1.2);
        }
        if snapshot.get(Emotion::Happiness) > 60 {
            outcome.score += 5;
        }
        if snapshot.get(Emotion::Sadness) > 60 {
            outcome.score -= 5;
        }

        let insightful = ctx.emotional_intelligence() > self.config.emotion.high_ei_threshold;
        outcome.obvious = action.is_simple()
            || (matches!(action, Action::Move { .. }) && outcome.danger < OBVIOUS_DANGER)
            || (outcome.leads_to_death && insightful);
    }
}
