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

//! NPC role, ownership and grouping components

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Marker for autonomous characters driven by the affect engine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Npc;

/// Marker for player-controlled characters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// NPC that guards a fixed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinel {
    pub post: Entity,
}

impl Sentinel {
    pub fn new(post: Entity) -> Self {
        Self { post }
    }
}

/// Room an NPC is currently trying to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGoal {
    pub destination: Entity,
}

impl ActiveGoal {
    pub fn new(destination: Entity) -> Self {
        Self { destination }
    }
}

/// Kinds of usable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Potion,
    Food,
    Trinket,
    Weapon,
}

/// Item component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Trade value, read by greed-sensitive predictions
    pub value: i32,
}

impl Item {
    pub fn new(kind: ItemKind, value: i32) -> Self {
        Self { kind, value }
    }

    /// Whether using the item does something on its own
    pub fn is_usable(&self) -> bool {
        matches!(self.kind, ItemKind::Potion | ItemKind::Food)
    }
}

/// Items carried by an entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item: Entity) -> bool {
        self.items.contains(&item)
    }

    pub fn add(&mut self, item: Entity) {
        if !self.contains(item) {
            self.items.push(item);
        }
    }

    pub fn remove(&mut self, item: Entity) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != item);
        before != self.items.len()
    }
}

/// Membership in a travelling group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: u32,
}

/// Marker for the leader of its group
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Leader;
