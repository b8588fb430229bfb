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

//! Event type definitions

use crate::ecs::EcsEntity;
use serde::{Deserialize, Serialize};

/// World events the affect engine appraises
///
/// Events carry transient ECS handles; they are consumed within the tick
/// they were published in and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AffectEvent {
    // Combat
    Attacked {
        attacker: EcsEntity,
        defender: EcsEntity,
        damage: i32,
    },
    Died {
        entity: EcsEntity,
        killer: Option<EcsEntity>,
    },

    // Help
    Healed {
        healer: EcsEntity,
        target: EcsEntity,
        amount: i32,
    },
    Rescued {
        rescuer: EcsEntity,
        rescued: EcsEntity,
    },
    Assisted {
        helper: EcsEntity,
        helped: EcsEntity,
    },

    // Economy
    ItemGiven {
        giver: EcsEntity,
        receiver: EcsEntity,
        item: EcsEntity,
    },
    Stolen {
        thief: EcsEntity,
        victim: EcsEntity,
        item: Option<EcsEntity>,
    },

    // Quests
    QuestCompleted {
        quest_giver: EcsEntity,
        player: EcsEntity,
    },
    QuestFailed {
        quest_giver: EcsEntity,
        player: EcsEntity,
    },
    QuestBetrayed {
        quest_giver: EcsEntity,
        player: EcsEntity,
    },

    // Communication
    Social {
        actor: EcsEntity,
        target: EcsEntity,
        name: String,
    },

    // Entity lifecycle
    Despawned {
        entity: EcsEntity,
    },
}

impl AffectEvent {
    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AffectEvent::Attacked { .. } => "attacked",
            AffectEvent::Died { .. } => "died",
            AffectEvent::Healed { .. } => "healed",
            AffectEvent::Rescued { .. } => "rescued",
            AffectEvent::Assisted { .. } => "assisted",
            AffectEvent::ItemGiven { .. } => "item_given",
            AffectEvent::Stolen { .. } => "stolen",
            AffectEvent::QuestCompleted { .. } => "quest_completed",
            AffectEvent::QuestFailed { .. } => "quest_failed",
            AffectEvent::QuestBetrayed { .. } => "quest_betrayed",
            AffectEvent::Social { .. } => "social",
            AffectEvent::Despawned { .. } => "despawned",
        }
    }
}
