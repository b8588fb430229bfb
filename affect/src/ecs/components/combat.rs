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

//! Combat components consumed by the appraisal and prediction systems

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Combat state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Combatant {
    /// Current opponent, if fighting
    pub opponent: Option<Entity>,
}

impl Combatant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_combat(&self) -> bool {
        self.opponent.is_some()
    }

    pub fn engage(&mut self, opponent: Entity) {
        self.opponent = Some(opponent);
    }

    pub fn disengage(&mut self) {
        self.opponent = None;
    }
}

/// Level and hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
}

impl Vitals {
    pub fn new(level: i32, max_hp: i32) -> Self {
        Self {
            level,
            hp: max_hp,
            max_hp,
        }
    }

    /// Current hit points as a percentage of maximum
    pub fn hp_percent(&self) -> i32 {
        if self.max_hp <= 0 {
            return 0;
        }
        (self.hp.max(0) * 100) / self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }
}

/// Mana pool for entities that can cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcaster {
    pub mana: i32,
    /// Mana spent per cast
    pub spell_cost: i32,
}

impl Spellcaster {
    pub fn new(mana: i32, spell_cost: i32) -> Self {
        Self { mana, spell_cost }
    }

    pub fn can_cast(&self) -> bool {
        self.mana >= self.spell_cost
    }
}
