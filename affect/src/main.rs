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

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wyldlands_affect::config::{Arguments, Configuration};
use wyldlands_affect::ecs::VillageBuilder;
use wyldlands_affect::ecs::components::{EmotionState, Npc};
use wyldlands_affect::ecs::events::EventBus;
use wyldlands_affect::ecs::systems::{ActionSystem, AffectSystem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let mut config = Configuration::load(&arguments.config_file)?;
    if let Some(ticks) = arguments.ticks {
        config.simulation.ticks = ticks;
    }
    let seed = arguments.seed.unwrap_or(*config.simulation.seed);
    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!(
        "Simulating {} ticks of {} minutes with seed {}",
        config.simulation.ticks,
        config.simulation.minutes_per_tick,
        seed
    );

    let mut village = VillageBuilder::new(&config.affect).build()?;
    let event_bus = EventBus::new();
    let mut actions = ActionSystem::new(event_bus.clone());
    let mut affect = AffectSystem::new(config.affect.clone(), event_bus, seed, Utc::now())
        .with_minutes_per_tick(config.simulation.minutes_per_tick);

    for _ in 0..config.simulation.ticks {
        let tick = affect.tick_count();
        for decision in affect.tick(&mut village.world) {
            let name = village.name_of(decision.actor);
            let Some(action) = decision.action else {
                tracing::debug!("[{}] {} idles ({} projections)", tick, name, decision.projections);
                continue;
            };
            tracing::info!(
                "[{}] {} -> {} (score {:?}, spent {})",
                tick,
                name,
                action,
                decision.score,
                decision.spent
            );
            if let Err(e) = actions.execute(&mut village.world, decision.actor, action) {
                tracing::warn!("[{}] {} could not {}: {}", tick, name, action, e);
            }
        }
    }

    let residents: Vec<_> = village
        .world
        .query::<(hecs::Entity, &Npc, &EmotionState)>()
        .iter()
        .map(|(entity, _, state)| {
            let strongest = state.iter().max_by_key(|&(_, value)| value);
            (entity, state.mood(), strongest)
        })
        .collect();
    for (entity, mood, strongest) in residents {
        if let Some((emotion, value)) = strongest {
            tracing::info!(
                "{}: mood {}, strongest {} at {}",
                village.name_of(entity),
                mood,
                emotion,
                value
            );
        }
    }

    Ok(())
}
