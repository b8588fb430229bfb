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

//! World construction helpers
//!
//! [`NpcBuilder`] gives an NPC every component the affect systems read.
//! [`VillageBuilder`] lays out the small demonstration village used by the
//! binary and the integration tests.

use crate::config::AffectConfig;
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, EntityBuilder, GameWorld};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),
    #[error("Entity {0:?} is not a room")]
    NotARoom(EcsEntity),
}

/// Builder for a fully equipped NPC
///
/// Emotions start at the profile's homeostatic baseline; explicit
/// [`NpcBuilder::emotion`] values are applied on top, in call order.
#[derive(Debug, Clone)]
pub struct NpcBuilder {
    name: String,
    personality: Personality,
    emotions: Vec<(Emotion, i32)>,
    room: Option<EcsEntity>,
    vitals: Vitals,
    memory_capacity: usize,
    budget: i32,
    sentinel: Option<EcsEntity>,
    goal: Option<EcsEntity>,
    group: Option<u32>,
    leader: bool,
    spellcaster: Option<Spellcaster>,
    items: Vec<EcsEntity>,
}

impl NpcBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let config = AffectConfig::default();
        Self {
            name: name.into(),
            personality: Personality::default(),
            emotions: Vec::new(),
            room: None,
            vitals: Vitals::new(1, 20),
            memory_capacity: config.memory.capacity,
            budget: config.shadow.budget_max,
            sentinel: None,
            goal: None,
            group: None,
            leader: false,
            spellcaster: None,
            items: Vec::new(),
        }
    }

    /// Take memory capacity and budget cap from `config`
    pub fn configured(mut self, config: &AffectConfig) -> Self {
        self.memory_capacity = config.memory.capacity;
        self.budget = config.shadow.budget_max;
        self
    }

    pub fn personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn profile(mut self, profile: PersonalityProfile) -> Self {
        self.personality.profile = profile;
        self.personality.genetic = profile.genetic();
        self
    }

    pub fn emotion(mut self, emotion: Emotion, value: i32) -> Self {
        self.emotions.push((emotion, value));
        self
    }

    pub fn location(mut self, room: EcsEntity) -> Self {
        self.room = Some(room);
        self
    }

    pub fn vitals(mut self, level: i32, max_hp: i32) -> Self {
        self.vitals = Vitals::new(level, max_hp);
        self
    }

    pub fn budget(mut self, max: i32) -> Self {
        self.budget = max;
        self
    }

    pub fn sentinel(mut self, post: EcsEntity) -> Self {
        self.sentinel = Some(post);
        self
    }

    pub fn goal(mut self, destination: EcsEntity) -> Self {
        self.goal = Some(destination);
        self
    }

    pub fn group(mut self, id: u32) -> Self {
        self.group = Some(id);
        self
    }

    pub fn leader(mut self) -> Self {
        self.leader = true;
        self
    }

    pub fn spellcaster(mut self, mana: i32, spell_cost: i32) -> Self {
        self.spellcaster = Some(Spellcaster::new(mana, spell_cost));
        self
    }

    pub fn item(mut self, item: EcsEntity) -> Self {
        self.items.push(item);
        self
    }

    /// Spawn the NPC into `world`
    pub fn build(self, world: &mut GameWorld) -> EcsEntity {
        let baseline = SecBaseline::from_profile(self.personality.profile);
        let mut emotions = EmotionState::new()
            .with(Emotion::Fear, baseline.fear)
            .with(Emotion::Anger, baseline.anger)
            .with(Emotion::Happiness, baseline.happiness);
        for (emotion, value) in self.emotions {
            emotions.set(emotion, value);
        }

        let mut builder = EntityBuilder::new();
        builder.add_bundle((
            Npc,
            Name::new(self.name.as_str()),
            EntityUuid::new(),
            emotions,
            self.personality,
            baseline,
            Memories::new(self.memory_capacity),
            CognitiveBudget::new(self.budget),
            self.vitals,
            Combatant::new(),
        ));
        if let Some(room) = self.room {
            builder.add(Location::new(room));
        }
        if let Some(post) = self.sentinel {
            builder.add(Sentinel::new(post));
        }
        if let Some(destination) = self.goal {
            builder.add(ActiveGoal::new(destination));
        }
        if let Some(id) = self.group {
            builder.add(Group { id });
        }
        if self.leader {
            builder.add(Leader);
        }
        if let Some(spellcaster) = self.spellcaster {
            builder.add(spellcaster);
        }
        let mut inventory = Inventory::new();
        for item in self.items {
            inventory.add(item);
        }
        builder.add(inventory);

        let npc = world.spawn(builder.build());
        tracing::debug!("Spawned NPC {} as {:?}", self.name, npc);
        npc
    }
}

/// Spawn an empty room
pub fn spawn_room(world: &mut GameWorld, name: &str, flags: &[RoomFlag]) -> EcsEntity {
    let room = flags
        .iter()
        .fold(Room::new(), |room, &flag| room.with_flag(flag));
    world.spawn((Name::new(name), room, Exits::new()))
}

/// Connect two rooms both ways
pub fn link_rooms(
    world: &mut GameWorld,
    from: EcsEntity,
    direction: Direction,
    to: EcsEntity,
) -> Result<(), WorldError> {
    for (room, dir, dest) in [(from, direction, to), (to, direction.opposite(), from)] {
        let mut exits = world
            .get::<&mut Exits>(room)
            .map_err(|_| WorldError::NotARoom(room))?;
        exits.set(ExitData::new(dir, dest));
    }
    Ok(())
}

/// Spawn a player with a persistent identity
pub fn spawn_player(world: &mut GameWorld, name: &str, room: EcsEntity, level: i32) -> EcsEntity {
    world.spawn((
        Player,
        Name::new(name),
        EntityUuid::new(),
        Location::new(room),
        Vitals::new(level, 20 + level * 10),
    ))
}

/// The demonstration village and its notable residents
pub struct Village {
    pub world: GameWorld,
    pub rooms: HashMap<String, EcsEntity>,
    pub sentinel: EcsEntity,
    pub merchant: EcsEntity,
    pub apprentice: EcsEntity,
    pub priest: EcsEntity,
    pub bandit: EcsEntity,
    pub player: EcsEntity,
}

impl Village {
    pub fn room(&self, name: &str) -> Result<EcsEntity, WorldError> {
        self.rooms
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::RoomNotFound(name.to_string()))
    }

    /// Display name of an entity, or its handle when unnamed
    pub fn name_of(&self, entity: EcsEntity) -> String {
        self.world
            .get::<&Name>(entity)
            .map(|n| n.display.clone())
            .unwrap_or_else(|_| format!("{:?}", entity))
    }
}

/// Lays out the village:
///
/// ```text
///            cliff (death trap, below the road)
///              |
///            road
///              |
///   tavern - square - temple (peaceful)
///              |
///            gate
/// ```
pub struct VillageBuilder<'a> {
    config: &'a AffectConfig,
    world: GameWorld,
    rooms: HashMap<String, EcsEntity>,
}

impl<'a> VillageBuilder<'a> {
    pub fn new(config: &'a AffectConfig) -> Self {
        Self {
            config,
            world: GameWorld::new(),
            rooms: HashMap::new(),
        }
    }

    fn room(&mut self, name: &str, flags: &[RoomFlag]) -> EcsEntity {
        let room = spawn_room(&mut self.world, name, flags);
        self.rooms.insert(name.to_string(), room);
        room
    }

    fn lookup(&self, name: &str) -> Result<EcsEntity, WorldError> {
        self.rooms
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::RoomNotFound(name.to_string()))
    }

    fn link(&mut self, from: &str, direction: Direction, to: &str) -> Result<(), WorldError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        link_rooms(&mut self.world, from, direction, to)
    }

    pub fn build(mut self) -> Result<Village, WorldError> {
        self.room("square", &[]);
        self.room("gate", &[]);
        self.room("road", &[]);
        self.room("cliff", &[RoomFlag::DeathTrap]);
        self.room("tavern", &[RoomFlag::Indoors]);
        self.room("temple", &[RoomFlag::Indoors, RoomFlag::Peaceful]);
        self.link("square", Direction::South, "gate")?;
        self.link("square", Direction::North, "road")?;
        self.link("road", Direction::Down, "cliff")?;
        self.link("square", Direction::West, "tavern")?;
        self.link("square", Direction::East, "temple")?;

        let config = self.config;
        let square = self.lookup("square")?;
        let gate = self.lookup("gate")?;
        let road = self.lookup("road")?;
        let temple = self.lookup("temple")?;

        let sentinel = NpcBuilder::new("Bram")
            .configured(config)
            .personality(
                Personality::new(PersonalityProfile::Brave)
                    .with_alignment(500)
                    .with_wimpy(10),
            )
            .vitals(6, 80)
            .location(gate)
            .sentinel(gate)
            .build(&mut self.world);

        let potion = self.world.spawn((Name::new("healing draught"), Item::new(ItemKind::Potion, 20)));
        let bread = self.world.spawn((Name::new("bread"), Item::new(ItemKind::Food, 2)));
        let merchant = NpcBuilder::new("Odile")
            .configured(config)
            .personality(
                Personality::new(PersonalityProfile::Cheerful)
                    .with_alignment(200)
                    .with_emotional_intelligence(75),
            )
            .emotion(Emotion::Greed, 60)
            .vitals(3, 40)
            .location(square)
            .group(1)
            .leader()
            .item(potion)
            .item(bread)
            .build(&mut self.world);

        let apprentice = NpcBuilder::new("Pip")
            .configured(config)
            .personality(Personality::new(PersonalityProfile::Timid).with_wimpy(50))
            .vitals(1, 20)
            .location(square)
            .group(1)
            .build(&mut self.world);

        let priest = NpcBuilder::new("Sister Anwen")
            .configured(config)
            .personality(
                Personality::new(PersonalityProfile::Stoic)
                    .with_alignment(800)
                    .with_emotional_intelligence(85),
            )
            .vitals(4, 45)
            .location(temple)
            .spellcaster(30, 10)
            .build(&mut self.world);

        let bandit = NpcBuilder::new("Vex")
            .configured(config)
            .personality(Personality::new(PersonalityProfile::Hothead).with_alignment(-600))
            .emotion(Emotion::Anger, 55)
            .vitals(4, 50)
            .location(road)
            .goal(square)
            .build(&mut self.world);

        let player = spawn_player(&mut self.world, "Traveller", square, 3);

        tracing::info!("Built village with {} rooms", self.rooms.len());
        Ok(Village {
            world: self.world,
            rooms: self.rooms,
            sentinel,
            merchant,
            apprentice,
            priest,
            bandit,
            player,
        })
    }
}
