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

//! Final scoring and selection

use super::{Action, Outcome, Projection, ShadowContext, ShadowTimeline};
use crate::ecs::components::Emotion;

impl ShadowTimeline<'_> {
    /// Fold reward, danger and the actor's emotions into a clamped score
    pub fn score(&self, ctx: &ShadowContext, action: &Action, outcome: &Outcome) -> i32 {
        let shadow = &self.config.shadow;
        let snapshot = ctx.snapshot();
        let danger = outcome.danger as f64;

        let mut weight = shadow.danger_weight;
        if snapshot.get(Emotion::Fear) > 70 {
            weight /= 2.0;
        }
        let mut score = outcome.score as f64 + outcome.reward as f64 - danger * weight;
        if snapshot.get(Emotion::Anger) > 70 && action.is_hostile() {
            score += 15.0;
        }
        if snapshot.get(Emotion::Courage) > 70 {
            score += danger * 0.2;
        }
        if outcome.achieves_goal {
            score += 50.0;
        }
        (score.round() as i32).clamp(-shadow.score_limit, shadow.score_limit)
    }

    /// Highest scoring projection, first wins ties.
    ///
    /// Consumes the context. `None` when nothing was projected or the best
    /// score is below the no-action floor.
    pub fn select(&self, ctx: ShadowContext) -> Option<Projection> {
        let mut best: Option<Projection> = None;
        for projection in ctx.into_projections() {
            let better = best
                .as_ref()
                .is_none_or(|b| projection.outcome.score > b.outcome.score);
            if better {
                best = Some(projection);
            }
        }
        best.filter(|b| b.outcome.score >= self.config.shadow.no_action_floor)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AffectConfig;
    use crate::ecs::GameWorld;
    use crate::ecs::components::*;
    use crate::ecs::systems::shadow::{
        Action, Outcome, Projection, ShadowContext, ShadowTimeline, choose_action,
    };
    use chrono::Utc;

    fn projection(action: Action, score: i32) -> Projection {
        Projection {
            action,
            outcome: Outcome {
                score,
                ..Outcome::default()
            },
            cost: 10,
            horizon: 2,
            tick: 0,
        }
    }

    #[test]
    fn test_score_weights_danger_and_goal() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let npc = world.spawn((Npc,));
        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(npc).unwrap();

        let outcome = Outcome {
            score: 10,
            reward: 20,
            danger: 40,
            ..Outcome::default()
        };
        assert_eq!(timeline.score(&ctx, &Action::Wait, &outcome), 10);
        let goal = Outcome {
            achieves_goal: true,
            ..outcome.clone()
        };
        assert_eq!(timeline.score(&ctx, &Action::Wait, &goal), 60);
        let extreme = Outcome {
            score: 1000,
            ..Outcome::default()
        };
        assert_eq!(timeline.score(&ctx, &Action::Wait, &extreme), config.shadow.score_limit);
    }

    #[test]
    fn test_anger_favours_hostility() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let target = world.spawn((Npc,));
        let angry = world.spawn((Npc, EmotionState::new().with(Emotion::Anger, 80)));
        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let ctx = timeline.begin(angry).unwrap();
        let outcome = Outcome::default();
        assert_eq!(timeline.score(&ctx, &Action::Attack { target }, &outcome), 15);
        assert_eq!(timeline.score(&ctx, &Action::Wait, &outcome), 0);
    }

    #[test]
    fn test_select_first_best_and_floor() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let npc = world.spawn((Npc,));
        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let snapshot = EmotionState::new().snapshot();

        let mut ctx = ShadowContext::new(npc, 8, 100, 2, snapshot, 50, false);
        ctx.push(projection(Action::Wait, 20));
        ctx.push(projection(Action::Guard, 30));
        ctx.push(projection(Action::Flee, 30));
        assert_eq!(timeline.select(ctx).map(|p| p.action), Some(Action::Guard));

        let mut ctx = ShadowContext::new(npc, 8, 100, 2, snapshot, 50, false);
        ctx.push(projection(Action::Flee, -180));
        assert!(timeline.select(ctx).is_none());

        let ctx = ShadowContext::new(npc, 8, 100, 2, snapshot, 50, false);
        assert!(timeline.select(ctx).is_none());
    }

    #[test]
    fn test_sentinel_prefers_guarding_post() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let gate = world.spawn((Room::new(), Exits::new()));
        let road = world.spawn((Room::new(), Exits::new()));
        world
            .get::<&mut Exits>(gate)
            .unwrap()
            .set(ExitData::new(Direction::South, road));
        world
            .get::<&mut Exits>(road)
            .unwrap()
            .set(ExitData::new(Direction::North, gate));
        let sentinel = world.spawn((
            Npc,
            EmotionState::new(),
            Location::new(gate),
            Sentinel::new(gate),
            CognitiveBudget::new(120),
        ));

        let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
        let mut ctx = timeline.begin(sentinel).unwrap();
        timeline.generate_projections(&mut ctx);
        let score_of = |wanted: Action| {
            ctx.projections()
                .iter()
                .find(|p| p.action == wanted)
                .map(|p| p.outcome.score)
        };
        let guard = score_of(Action::Guard).expect("guard projected");
        if let Some(away) = score_of(Action::Move { direction: Direction::South }) {
            assert!(guard - away >= 60, "guard {} away {}", guard, away);
        }
        assert_eq!(timeline.select(ctx).map(|p| p.action), Some(Action::Guard));
    }

    #[test]
    fn test_starved_budget_selects_nothing() {
        let mut world = GameWorld::new();
        let config = AffectConfig::default();
        let room = world.spawn((Room::new(),));
        let npc = world.spawn((
            Npc,
            EmotionState::new(),
            Location::new(room),
            CognitiveBudget::new(120).with_remaining(5),
        ));

        {
            let timeline = ShadowTimeline::new(&world, &config, 0, Utc::now());
            let mut ctx = timeline.begin(npc).unwrap();
            assert_eq!(timeline.generate_projections(&mut ctx), 0);
        }
        assert_eq!(choose_action(&mut world, &config, npc, 0, Utc::now()), None);
        assert_eq!(world.get::<&CognitiveBudget>(npc).unwrap().remaining, 5);
    }
}
