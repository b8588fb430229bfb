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

//! Transient per-decision state

use super::{Action, Outcome};
use crate::ecs::EcsEntity;
use crate::ecs::components::EmotionSnapshot;

/// One simulated candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub action: Action,
    pub outcome: Outcome,
    pub cost: i32,
    pub horizon: u8,
    pub tick: u64,
}

/// Bounded scratch space for a single decision
///
/// Created by [`super::ShadowTimeline::begin`] and consumed by
/// [`super::ShadowTimeline::select`]; it never outlives one decision.
#[derive(Debug)]
pub struct ShadowContext {
    actor: EcsEntity,
    projections: Vec<Projection>,
    capacity: usize,
    initial_budget: i32,
    remaining: i32,
    horizon: u8,
    snapshot: EmotionSnapshot,
    emotional_intelligence: u8,
    in_combat: bool,
}

impl ShadowContext {
    pub fn new(
        actor: EcsEntity,
        capacity: usize,
        budget: i32,
        horizon: u8,
        snapshot: EmotionSnapshot,
        emotional_intelligence: u8,
        in_combat: bool,
    ) -> Self {
        Self {
            actor,
            projections: Vec::with_capacity(capacity),
            capacity,
            initial_budget: budget.max(0),
            remaining: budget.max(0),
            horizon,
            snapshot,
            emotional_intelligence,
            in_combat,
        }
    }

    pub fn actor(&self) -> EcsEntity {
        self.actor
    }

    pub fn horizon(&self) -> u8 {
        self.horizon
    }

    /// Actor's emotions when the decision began
    pub fn snapshot(&self) -> &EmotionSnapshot {
        &self.snapshot
    }

    pub fn emotional_intelligence(&self) -> u8 {
        self.emotional_intelligence
    }

    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn initial_budget(&self) -> i32 {
        self.initial_budget
    }

    pub fn spent(&self) -> i32 {
        self.initial_budget - self.remaining
    }

    pub fn is_full(&self) -> bool {
        self.projections.len() >= self.capacity
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        cost <= self.remaining
    }

    /// Charge `projection.cost` and store it.
    ///
    /// Refused, leaving the context untouched, when full or unaffordable.
    pub fn push(&mut self, projection: Projection) -> bool {
        if self.is_full() || !self.can_afford(projection.cost) {
            return false;
        }
        self.remaining -= projection.cost;
        self.projections.push(projection);
        true
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    pub(super) fn into_projections(self) -> Vec<Projection> {
        self.projections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::EmotionState;
    use hecs::World;

    fn projection(cost: i32) -> Projection {
        Projection {
            action: Action::Wait,
            outcome: Outcome::default(),
            cost,
            horizon: 1,
            tick: 0,
        }
    }

    #[test]
    fn test_push_charges_budget() {
        let mut world = World::new();
        let actor = world.spawn(());
        let mut ctx = ShadowContext::new(actor, 2, 25, 1, EmotionState::new().snapshot(), 50, false);
        assert!(ctx.push(projection(10)));
        assert!(!ctx.push(projection(20)));
        assert!(ctx.push(projection(15)));
        assert!(ctx.is_full());
        assert!(!ctx.push(projection(0)));
        assert_eq!(ctx.spent(), 25);
        assert_eq!(ctx.remaining(), 0);
        assert_eq!(ctx.len(), 2);
    }
}
