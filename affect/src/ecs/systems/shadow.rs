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

//! Shadow Timeline: bounded, non-mutating action simulation
//!
//! A decision runs `Init -> Generate -> Validate -> Execute -> Score ->
//! Select -> Discard`. The simulator only ever holds a shared borrow of the
//! world, so prediction cannot write to emotions, memories or positions.
//! The one write a decision makes is deducting the spent cognitive budget,
//! after the simulator has been dropped.

mod context;
mod generate;
mod predict;
mod score;
mod validate;

pub use context::{Projection, ShadowContext};

use crate::config::AffectConfig;
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use chrono::{DateTime, Utc};
use metrics::counter;

/// Something an NPC can do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move { direction: Direction },
    Attack { target: EcsEntity },
    Flee,
    UseItem { item: EcsEntity },
    CastSpell { target: Option<EcsEntity> },
    Social { target: EcsEntity, name: &'static str },
    Guard,
    Wait,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Attack { .. } => "attack",
            Action::Flee => "flee",
            Action::UseItem { .. } => "use_item",
            Action::CastSpell { .. } => "cast_spell",
            Action::Social { .. } => "social",
            Action::Guard => "guard",
            Action::Wait => "wait",
        }
    }

    /// Actions cheap enough to simulate at half cost
    pub fn is_trivial(&self) -> bool {
        matches!(self, Action::Wait | Action::Social { .. })
    }

    /// Actions whose outcome needs no thought
    pub fn is_simple(&self) -> bool {
        matches!(self, Action::Wait | Action::Guard | Action::Flee)
    }

    pub fn is_hostile(&self) -> bool {
        matches!(
            self,
            Action::Attack { .. } | Action::CastSpell { target: Some(_) }
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { direction } => write!(f, "move {}", direction),
            Action::Attack { target } => write!(f, "attack {:?}", target),
            Action::UseItem { item } => write!(f, "use {:?}", item),
            Action::CastSpell { target: Some(target) } => write!(f, "cast at {:?}", target),
            Action::CastSpell { target: None } => f.write_str("cast"),
            Action::Social { target, name } => write!(f, "{} {:?}", name, target),
            other => f.write_str(other.kind()),
        }
    }
}

/// Predicted result of an action, never applied to the world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub score: i32,
    pub hp_delta: i32,
    pub danger: i32,
    pub reward: i32,
    pub emotion_deltas: Vec<(Emotion, i32)>,
    pub leads_to_combat: bool,
    pub leads_to_death: bool,
    pub achieves_goal: bool,
    pub obvious: bool,
}

/// Summary of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionReport {
    pub actor: EcsEntity,
    pub action: Option<Action>,
    pub score: Option<i32>,
    pub projections: usize,
    pub spent: i32,
}

/// Read-only simulator over a borrowed world
pub struct ShadowTimeline<'w> {
    world: &'w GameWorld,
    config: &'w AffectConfig,
    tick: u64,
    now: DateTime<Utc>,
}

impl<'w> ShadowTimeline<'w> {
    pub fn new(world: &'w GameWorld, config: &'w AffectConfig, tick: u64, now: DateTime<Utc>) -> Self {
        Self {
            world,
            config,
            tick,
            now,
        }
    }

    /// Open a context for `actor`; `None` when the actor is not a valid entity
    pub fn begin(&self, actor: EcsEntity) -> Option<ShadowContext> {
        let entity = self.world.entity(actor).ok()?;
        let shadow = &self.config.shadow;

        let budget = match entity.get::<&CognitiveBudget>() {
            Some(budget) if !entity.has::<Player>() => budget.remaining,
            _ => shadow.unbounded_budget,
        };
        let in_combat = entity
            .get::<&Combatant>()
            .is_some_and(|c| c.in_combat());
        let horizon = if in_combat {
            shadow.combat_horizon
        } else {
            shadow.default_horizon
        };
        let snapshot = entity
            .get::<&EmotionState>()
            .map(|s| s.snapshot())
            .unwrap_or_else(|| EmotionState::new().snapshot());
        let ei = entity
            .get::<&Personality>()
            .map(|p| p.emotional_intelligence)
            .unwrap_or(50);

        Some(ShadowContext::new(
            actor,
            shadow.capacity,
            budget,
            horizon,
            snapshot,
            ei,
            in_combat,
        ))
    }
}

/// Run a full decision for `actor` and deduct what it spent.
///
/// Player-controlled and budget-less entities think against the unbounded
/// ceiling and have nothing deducted.
#[tracing::instrument(skip(world, config, actor, now), fields(actor = actor.id()))]
pub fn decide(
    world: &mut GameWorld,
    config: &AffectConfig,
    actor: EcsEntity,
    tick: u64,
    now: DateTime<Utc>,
) -> DecisionReport {
    let (choice, projections, spent) = {
        let timeline = ShadowTimeline::new(world, config, tick, now);
        let Some(mut context) = timeline.begin(actor) else {
            tracing::trace!("No decision for invalid entity {:?}", actor);
            return DecisionReport {
                actor,
                action: None,
                score: None,
                projections: 0,
                spent: 0,
            };
        };
        let projections = timeline.generate_projections(&mut context);
        let spent = context.spent();
        (timeline.select(context), projections, spent)
    };

    let is_player = world.satisfies::<&Player>(actor);
    if !is_player {
        if let Ok(mut budget) = world.get::<&mut CognitiveBudget>(actor) {
            budget.spend(spent);
        }
    }
    counter!("shadow.budget.spent").increment(spent.max(0) as u64);

    match &choice {
        Some(projection) => tracing::debug!(
            "{:?} chose {} (score {}, {} projections, spent {})",
            actor,
            projection.action,
            projection.outcome.score,
            projections,
            spent
        ),
        None => {
            counter!("shadow.no_action").increment(1);
            tracing::debug!("{:?} found no action ({} projections)", actor, projections);
        }
    }

    DecisionReport {
        actor,
        action: choice.as_ref().map(|p| p.action),
        score: choice.as_ref().map(|p| p.outcome.score),
        projections,
        spent,
    }
}

/// Pick an action for `actor`, or `None` so the caller falls back to its default
pub fn choose_action(
    world: &mut GameWorld,
    config: &AffectConfig,
    actor: EcsEntity,
    tick: u64,
    now: DateTime<Utc>,
) -> Option<Action> {
    decide(world, config, actor, tick, now).action
}

/// Restore every persistent budget by the per-tick amount, up to its cap
pub fn regenerate_budgets(world: &mut GameWorld, config: &AffectConfig) {
    for budget in world.query_mut::<&mut CognitiveBudget>() {
        budget.regenerate(config.shadow.budget_regen);
    }
}
