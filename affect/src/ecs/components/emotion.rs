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

//! Emotion store components
//!
//! Every NPC owns one [`EmotionState`]: twenty integer emotions in `[0, 100]`
//! indexed by [`Emotion`], plus the smoothed mood scalar. The four competing
//! emotions (fear, sadness, anger, happiness) never sum above
//! [`QUARTET_LIMIT`].

use serde::{Deserialize, Serialize};

/// Upper bound on the sum of the competing quartet
pub const QUARTET_LIMIT: i32 = 100;

/// Highest value any single emotion may hold
pub const EMOTION_MAX: i32 = 100;

/// Named emotions tracked for every NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Fear,
    Anger,
    Happiness,
    Sadness,
    Friendship,
    Love,
    Trust,
    Loyalty,
    Curiosity,
    Greed,
    Pride,
    Compassion,
    Envy,
    Courage,
    Excitement,
    Disgust,
    Shame,
    Pain,
    Horror,
    Humiliation,
}

impl Emotion {
    pub const COUNT: usize = 20;

    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Fear,
        Emotion::Anger,
        Emotion::Happiness,
        Emotion::Sadness,
        Emotion::Friendship,
        Emotion::Love,
        Emotion::Trust,
        Emotion::Loyalty,
        Emotion::Curiosity,
        Emotion::Greed,
        Emotion::Pride,
        Emotion::Compassion,
        Emotion::Envy,
        Emotion::Courage,
        Emotion::Excitement,
        Emotion::Disgust,
        Emotion::Shame,
        Emotion::Pain,
        Emotion::Horror,
        Emotion::Humiliation,
    ];

    /// The competing emotions subject to lateral inhibition
    pub const QUARTET: [Emotion; 4] = [
        Emotion::Fear,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Happiness,
    ];

    /// Emotions averaged into the positive half of mood
    pub const POSITIVE: [Emotion; 9] = [
        Emotion::Happiness,
        Emotion::Friendship,
        Emotion::Love,
        Emotion::Trust,
        Emotion::Loyalty,
        Emotion::Curiosity,
        Emotion::Compassion,
        Emotion::Courage,
        Emotion::Excitement,
    ];

    /// Emotions averaged into the negative half of mood
    pub const NEGATIVE: [Emotion; 9] = [
        Emotion::Fear,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Envy,
        Emotion::Disgust,
        Emotion::Shame,
        Emotion::Pain,
        Emotion::Horror,
        Emotion::Humiliation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Fear => "fear",
            Emotion::Anger => "anger",
            Emotion::Happiness => "happiness",
            Emotion::Sadness => "sadness",
            Emotion::Friendship => "friendship",
            Emotion::Love => "love",
            Emotion::Trust => "trust",
            Emotion::Loyalty => "loyalty",
            Emotion::Curiosity => "curiosity",
            Emotion::Greed => "greed",
            Emotion::Pride => "pride",
            Emotion::Compassion => "compassion",
            Emotion::Envy => "envy",
            Emotion::Courage => "courage",
            Emotion::Excitement => "excitement",
            Emotion::Disgust => "disgust",
            Emotion::Shame => "shame",
            Emotion::Pain => "pain",
            Emotion::Horror => "horror",
            Emotion::Humiliation => "humiliation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
    }

    /// Aversive emotions receive Neuroticism gain on increase
    pub fn is_aversive(self) -> bool {
        matches!(
            self,
            Emotion::Fear
                | Emotion::Sadness
                | Emotion::Shame
                | Emotion::Humiliation
                | Emotion::Pain
                | Emotion::Horror
                | Emotion::Disgust
                | Emotion::Envy
                | Emotion::Anger
        )
    }

    pub fn in_quartet(self) -> bool {
        Emotion::QUARTET.contains(&self)
    }

    /// The other three quartet members, in quartet order
    pub fn quartet_rivals(self) -> Option<[Emotion; 3]> {
        if !self.in_quartet() {
            return None;
        }
        let mut rivals = [self; 3];
        for (slot, rival) in rivals
            .iter_mut()
            .zip(Emotion::QUARTET.iter().filter(|&&e| e != self))
        {
            *slot = *rival;
        }
        Some(rivals)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frozen copy of all twenty emotion values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSnapshot([u8; Emotion::COUNT]);

impl EmotionSnapshot {
    pub fn get(&self, emotion: Emotion) -> i32 {
        self.0[emotion.index()] as i32
    }
}

/// Per-NPC emotion store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionState {
    values: [u8; Emotion::COUNT],
    /// Smoothed mood in [-100, 100]
    mood: i32,
}

impl EmotionState {
    /// Create a state with every emotion at zero and neutral mood
    pub fn new() -> Self {
        Self {
            values: [0; Emotion::COUNT],
            mood: 0,
        }
    }

    /// Builder form of [`EmotionState::set`]
    pub fn with(mut self, emotion: Emotion, value: i32) -> Self {
        self.set(emotion, value);
        self
    }

    pub fn get(&self, emotion: Emotion) -> i32 {
        self.values[emotion.index()] as i32
    }

    /// Initialize an emotion directly, outside the update pipeline.
    ///
    /// The value is clamped to `[0, 100]`; a quartet member is additionally
    /// capped at whatever room its three siblings leave under the quartet
    /// limit. Siblings are never lowered.
    pub fn set(&mut self, emotion: Emotion, value: i32) {
        let mut value = value.clamp(0, EMOTION_MAX);
        if emotion.in_quartet() {
            let others = self.quartet_sum() - self.get(emotion);
            value = value.min(QUARTET_LIMIT - others);
        }
        self.write(emotion, value);
    }

    /// Raw clamped write used by the update pipeline
    pub(crate) fn write(&mut self, emotion: Emotion, value: i32) {
        self.values[emotion.index()] = value.clamp(0, EMOTION_MAX) as u8;
    }

    pub fn quartet_sum(&self) -> i32 {
        Emotion::QUARTET.iter().map(|&e| self.get(e)).sum()
    }

    pub fn mood(&self) -> i32 {
        self.mood
    }

    pub(crate) fn set_mood(&mut self, mood: i32) {
        self.mood = mood.clamp(-100, 100);
    }

    pub fn snapshot(&self) -> EmotionSnapshot {
        EmotionSnapshot(self.values)
    }

    /// Iterate `(emotion, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, i32)> + '_ {
        Emotion::ALL.iter().map(move |&e| (e, self.get(e)))
    }
}

impl Default for EmotionState {
    fn default() -> Self {
        Self::new()
    }
}
