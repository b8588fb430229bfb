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

//! NPC affect system: one tick of the whole emotional loop

use super::appraisal::appraise_all;
use super::contagion::apply_contagion;
use super::decay::run_decay;
use super::emotion::adjust_many;
use super::environment::{ClockWeather, Environment, TtlCache, WeatherSource};
use super::mood::update_moods;
use super::navigation::{is_indoors, room_of};
use super::shadow::{DecisionReport, decide, regenerate_budgets};
use crate::config::AffectConfig;
use crate::ecs::components::*;
use crate::ecs::events::EventBus;
use crate::ecs::{EcsEntity, GameWorld};
use chrono::{DateTime, Duration, Utc};
use hecs::Entity;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// How long a weather sample stays valid
const WEATHER_TTL_MINUTES: i64 = 60;

/// Drives every affect system in a fixed order
///
/// Each tick drains queued events into appraisal, regenerates cognitive
/// budgets, decays, spreads contagion, applies weather, smooths moods and
/// finally runs a Shadow Timeline decision for every living NPC.
pub struct AffectSystem {
    config: AffectConfig,
    event_bus: EventBus,
    rng: StdRng,
    clock: DateTime<Utc>,
    tick: u64,
    minutes_per_tick: i64,
    weather: Box<dyn WeatherSource>,
    weather_cache: TtlCache<Environment>,
}

impl AffectSystem {
    /// Create a new affect system starting its clock at `start`
    pub fn new(config: AffectConfig, event_bus: EventBus, seed: u64, start: DateTime<Utc>) -> Self {
        Self {
            config,
            event_bus,
            rng: StdRng::seed_from_u64(seed),
            clock: start,
            tick: 0,
            minutes_per_tick: 10,
            weather: Box::new(ClockWeather::new(seed)),
            weather_cache: TtlCache::new(Duration::minutes(WEATHER_TTL_MINUTES)),
        }
    }

    pub fn with_weather(mut self, weather: Box<dyn WeatherSource>) -> Self {
        self.weather = weather;
        self.weather_cache.invalidate();
        self
    }

    pub fn with_minutes_per_tick(mut self, minutes: i64) -> Self {
        self.minutes_per_tick = minutes.max(1);
        self
    }

    pub fn config(&self) -> &AffectConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Run one tick and return every decision made
    pub fn tick(&mut self, world: &mut GameWorld) -> Vec<DecisionReport> {
        let now = self.clock;

        let events = self.event_bus.drain();
        if !events.is_empty() {
            tracing::debug!("Tick {}: appraising {} events", self.tick, events.len());
        }
        appraise_all(world, &self.config, &events, now, &mut self.rng);

        regenerate_budgets(world, &self.config);
        run_decay(world, &self.config, &mut self.rng);
        apply_contagion(world, &self.config, &mut self.rng);

        let environment = self.environment(world, now);
        update_moods(world, &self.config.mood, Some(&environment));

        let deciders: Vec<EcsEntity> = world
            .query::<(Entity, &Npc, Option<&Vitals>)>()
            .iter()
            .filter(|(_, _, vitals)| vitals.is_none_or(|v| v.is_alive()))
            .map(|(entity, _, _)| entity)
            .collect();
        let decisions: Vec<DecisionReport> = deciders
            .into_iter()
            .map(|npc| decide(world, &self.config, npc, self.tick, now))
            .collect();

        self.tick += 1;
        self.clock = now + Duration::minutes(self.minutes_per_tick);
        decisions
    }

    /// Current conditions; a fresh sample also hits outdoor NPCs directly
    fn environment(&mut self, world: &mut GameWorld, now: DateTime<Utc>) -> Environment {
        let refreshed = !self.weather_cache.is_fresh(now);
        let weather = &mut self.weather;
        let environment = *self.weather_cache.get_or_refresh(now, || weather.sample(now));
        if !refreshed {
            return environment;
        }

        tracing::debug!("Weather now {:?}", environment);
        let deltas = environment.weather_deltas();
        if deltas.is_empty() {
            return environment;
        }
        let outdoors: Vec<EcsEntity> = world
            .query::<(Entity, &Npc)>()
            .iter()
            .map(|(entity, _)| entity)
            .filter(|&npc| room_of(world, npc).is_some_and(|room| !is_indoors(world, room)))
            .collect();
        for npc in outdoors {
            adjust_many(world, &self.config.emotion, npc, &deltas, &mut self.rng);
        }
        environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::events::AffectEvent;
    use crate::ecs::systems::environment::{FixedWeather, Sky};
    use crate::ecs::test_utils::*;

    fn system() -> AffectSystem {
        AffectSystem::new(AffectConfig::default(), EventBus::new(), 7, Utc::now())
            .with_weather(Box::new(FixedWeather(Environment::default())))
    }

    #[test]
    fn test_tick_advances_clock_and_decides() {
        let mut world = create_test_world();
        let (square, _) = two_rooms(&mut world);
        let npc = spawn_test_npc(&mut world, square);
        let mut system = system();
        let start = system.clock();

        let decisions = system.tick(&mut world);
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].actor, npc);
        assert_eq!(system.tick_count(), 1);
        assert_eq!(system.clock() - start, Duration::minutes(10));
    }

    #[test]
    fn test_tick_drains_events() {
        let mut world = create_test_world();
        let (square, _) = two_rooms(&mut world);
        let victim = spawn_test_npc(&mut world, square);
        let attacker = spawn_test_npc(&mut world, square);
        let mut system = system();
        system.event_bus().publish(AffectEvent::Attacked {
            attacker,
            defender: victim,
            damage: 5,
        });

        system.tick(&mut world);
        assert_eq!(system.event_bus().queue_len(), 0);
        let memories = world.get::<&Memories>(victim).unwrap();
        assert_eq!(memories.received.len(), 1);
    }

    #[test]
    fn test_dead_npcs_do_not_decide() {
        let mut world = create_test_world();
        let (square, _) = two_rooms(&mut world);
        let npc = spawn_test_npc(&mut world, square);
        world.get::<&mut Vitals>(npc).unwrap().damage(1000);
        assert!(system().tick(&mut world).is_empty());
    }

    #[test]
    fn test_storm_sours_outdoor_npcs_only() {
        let mut world = create_test_world();
        let field = crate::ecs::builder::spawn_room(&mut world, "field", &[]);
        let hall = crate::ecs::builder::spawn_room(&mut world, "hall", &[RoomFlag::Indoors]);
        let outside = spawn_test_npc(&mut world, field);
        let inside = spawn_test_npc(&mut world, hall);
        let storm = Environment::new(Sky::Lightning, 15, 12);
        let mut system = AffectSystem::new(AffectConfig::default(), EventBus::new(), 7, Utc::now())
            .with_weather(Box::new(FixedWeather(storm)));

        let now = system.clock();
        system.environment(&mut world, now);
        let fear = |npc| world.get::<&EmotionState>(npc).unwrap().get(Emotion::Fear);
        assert!(fear(outside) > fear(inside));
    }
}
