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

//! Memory components: two fixed-capacity ring buffers per NPC
//!
//! Memories are session-scoped. NPC targets are keyed by their ECS handle
//! and vanish with the world; player targets are keyed by their persistent
//! UUID so an NPC still recognises a player who logs back in.

use super::{EmotionSnapshot, EntityKind};
use chrono::{DateTime, Utc};
use hecs::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity a memory refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryKey {
    /// Runtime-only handle for NPCs and objects
    Session(Entity),
    /// Persistent identity for players
    Persistent(Uuid),
}

/// Who a memory is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryTarget {
    pub key: MemoryKey,
    pub kind: EntityKind,
}

impl MemoryTarget {
    pub fn new(key: MemoryKey, kind: EntityKind) -> Self {
        Self { key, kind }
    }
}

/// Tone of a social command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialTone {
    Positive,
    Negative,
    Violent,
}

/// Interaction classification stored with each memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    Attacked,
    Healed,
    ReceivedItem,
    Stolen,
    Rescued,
    Assisted,
    WitnessedDeath,
    QuestCompleted,
    QuestFailed,
    QuestBetrayed,
    /// Social command aimed directly at (or issued by) the NPC
    Social(SocialTone),
    /// Social command observed between two other entities
    Witnessed(SocialTone),
}

impl Interaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::Attacked => "attacked",
            Interaction::Healed => "healed",
            Interaction::ReceivedItem => "received_item",
            Interaction::Stolen => "stolen",
            Interaction::Rescued => "rescued",
            Interaction::Assisted => "assisted",
            Interaction::WitnessedDeath => "witnessed_death",
            Interaction::QuestCompleted => "quest_completed",
            Interaction::QuestFailed => "quest_failed",
            Interaction::QuestBetrayed => "quest_betrayed",
            Interaction::Social(SocialTone::Positive) => "social_positive",
            Interaction::Social(SocialTone::Negative) => "social_negative",
            Interaction::Social(SocialTone::Violent) => "social_violent",
            Interaction::Witnessed(SocialTone::Positive) => "witnessed_positive",
            Interaction::Witnessed(SocialTone::Negative) => "witnessed_negative",
            Interaction::Witnessed(SocialTone::Violent) => "witnessed_violent",
        }
    }
}

/// One remembered interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub target: MemoryTarget,
    pub interaction: Interaction,
    pub major: bool,
    pub timestamp: DateTime<Utc>,
    /// All twenty emotions as they stood when the memory formed
    pub snapshot: EmotionSnapshot,
    /// Social command name, when the interaction was social
    pub label: Option<String>,
}

/// Fixed-capacity ring buffer with a wrapping write cursor
///
/// The oldest entry is overwritten in place once the ring is full. Empty
/// and forgotten slots hold `None` and are skipped by every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRing {
    slots: Vec<Option<MemoryEntry>>,
    cursor: usize,
}

impl MemoryRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Next slot to be written
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Occupied slot count
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, entry: MemoryEntry) {
        self.slots[self.cursor] = Some(entry);
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// Occupied entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.slots.iter().flatten()
    }

    /// Entries about the given identity
    pub fn about(&self, key: MemoryKey) -> impl Iterator<Item = &MemoryEntry> {
        self.iter().filter(move |m| m.target.key == key)
    }

    /// Empty every slot referring to `key`; returns how many were cleared
    pub fn clear_matching(&mut self, key: MemoryKey) -> usize {
        let mut cleared = 0;
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|m| m.target.key == key) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }
}

/// Which ring a memory lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryDirection {
    /// Something done to the NPC
    Received,
    /// Something the NPC did
    Active,
}

/// Memory component holding both rings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memories {
    pub received: MemoryRing,
    pub active: MemoryRing,
}

impl Memories {
    pub fn new(capacity: usize) -> Self {
        Self {
            received: MemoryRing::with_capacity(capacity),
            active: MemoryRing::with_capacity(capacity),
        }
    }

    pub fn ring(&self, direction: MemoryDirection) -> &MemoryRing {
        match direction {
            MemoryDirection::Received => &self.received,
            MemoryDirection::Active => &self.active,
        }
    }

    pub fn ring_mut(&mut self, direction: MemoryDirection) -> &mut MemoryRing {
        match direction {
            MemoryDirection::Received => &mut self.received,
            MemoryDirection::Active => &mut self.active,
        }
    }

    /// Whether either ring holds anything about `key`
    pub fn knows(&self, key: MemoryKey) -> bool {
        self.received.about(key).next().is_some() || self.active.about(key).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::EmotionState;

    fn entry(key: MemoryKey, interaction: Interaction) -> MemoryEntry {
        MemoryEntry {
            target: MemoryTarget::new(key, EntityKind::Player),
            interaction,
            major: false,
            timestamp: Utc::now(),
            snapshot: EmotionState::new().snapshot(),
            label: None,
        }
    }

    #[test]
    fn test_ring_wraps_and_overwrites_oldest() {
        let a = MemoryKey::Persistent(Uuid::new_v4());
        let b = MemoryKey::Persistent(Uuid::new_v4());
        let mut ring = MemoryRing::with_capacity(3);
        ring.push(entry(a, Interaction::Attacked));
        ring.push(entry(a, Interaction::Healed));
        ring.push(entry(a, Interaction::Assisted));
        assert_eq!(ring.cursor(), 0);
        ring.push(entry(b, Interaction::Stolen));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.cursor(), 1);
        let kinds: Vec<_> = ring.iter().map(|m| m.interaction).collect();
        assert_eq!(
            kinds,
            vec![Interaction::Stolen, Interaction::Healed, Interaction::Assisted]
        );
    }

    #[test]
    fn test_clear_matching_only_removes_target() {
        let a = MemoryKey::Persistent(Uuid::new_v4());
        let b = MemoryKey::Persistent(Uuid::new_v4());
        let mut memories = Memories::new(4);
        memories.received.push(entry(a, Interaction::Attacked));
        memories.received.push(entry(b, Interaction::Healed));
        memories.active.push(entry(a, Interaction::Assisted));

        assert_eq!(memories.received.clear_matching(a), 1);
        assert_eq!(memories.active.clear_matching(a), 1);
        assert!(!memories.knows(a));
        assert!(memories.knows(b));
        assert_eq!(memories.received.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let ring = MemoryRing::with_capacity(0);
        assert_eq!(ring.capacity(), 1);
        assert!(ring.is_empty());
    }
}
