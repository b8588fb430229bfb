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

//! Personality components: OCEAN traits, temperament and homeostatic baselines

use super::{Emotion, EmotionState};
use serde::{Deserialize, Serialize};

/// Alignment at or above this is considered good
pub const ALIGN_GOOD: i32 = 350;
/// Alignment at or below this is considered evil
pub const ALIGN_EVIL: i32 = -350;

/// Raw OCEAN scores; used both for genetic bases and builder modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OceanScores {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl OceanScores {
    pub fn new(
        openness: f32,
        conscientiousness: f32,
        extraversion: f32,
        agreeableness: f32,
        neuroticism: f32,
    ) -> Self {
        Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        }
    }

    /// All five scores at the same value
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value, value)
    }
}

/// Personality profiles selectable at NPC creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityProfile {
    Balanced,
    Timid,
    Brave,
    Hothead,
    Cheerful,
    Melancholic,
    Stoic,
}

/// One row of the profile lookup table
struct ProfileRow {
    profile: PersonalityProfile,
    genetic: [f32; 5],
    baseline: [i32; 3],
}

/// Genetic OCEAN bases and fear/anger/happiness baselines per profile
const PROFILE_TABLE: [ProfileRow; 7] = [
    ProfileRow { profile: PersonalityProfile::Balanced, genetic: [0.5, 0.5, 0.5, 0.5, 0.5], baseline: [10, 10, 25] },
    ProfileRow { profile: PersonalityProfile::Timid, genetic: [0.4, 0.6, 0.2, 0.6, 0.8], baseline: [25, 5, 15] },
    ProfileRow { profile: PersonalityProfile::Brave, genetic: [0.6, 0.6, 0.6, 0.5, 0.2], baseline: [3, 10, 30] },
    ProfileRow { profile: PersonalityProfile::Hothead, genetic: [0.4, 0.3, 0.7, 0.2, 0.7], baseline: [5, 25, 15] },
    ProfileRow { profile: PersonalityProfile::Cheerful, genetic: [0.7, 0.5, 0.8, 0.7, 0.3], baseline: [5, 5, 40] },
    ProfileRow { profile: PersonalityProfile::Melancholic, genetic: [0.5, 0.5, 0.3, 0.5, 0.7], baseline: [15, 5, 10] },
    ProfileRow { profile: PersonalityProfile::Stoic, genetic: [0.3, 0.8, 0.3, 0.5, 0.1], baseline: [5, 5, 20] },
];

impl PersonalityProfile {
    fn row(self) -> &'static ProfileRow {
        PROFILE_TABLE
            .iter()
            .find(|row| row.profile == self)
            .unwrap_or(&PROFILE_TABLE[0])
    }

    /// Genetic OCEAN base for this profile
    pub fn genetic(self) -> OceanScores {
        let [o, c, e, a, n] = self.row().genetic;
        OceanScores::new(o, c, e, a, n)
    }

    /// Homeostatic fear/anger/happiness baseline for this profile
    pub fn baseline(self) -> SecBaseline {
        let [fear, anger, happiness] = self.row().baseline;
        SecBaseline {
            fear,
            anger,
            happiness,
        }
    }
}

/// Per-NPC decay baseline, fixed at creation from the profile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecBaseline {
    pub fear: i32,
    pub anger: i32,
    pub happiness: i32,
}

impl SecBaseline {
    pub fn from_profile(profile: PersonalityProfile) -> Self {
        profile.baseline()
    }
}

/// Personality component
///
/// Holds the inputs traits are derived from. Events never write here;
/// [`Personality::traits`] computes the final values on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub profile: PersonalityProfile,
    /// Inherited OCEAN base
    pub genetic: OceanScores,
    /// Builder adjustment layered over the genetic base
    pub modifier: OceanScores,
    /// Emotional intelligence, 0-100
    pub emotional_intelligence: u8,
    /// Tendency to flee, 0-100
    pub wimpy: u8,
    /// Alignment, -1000 (evil) to 1000 (good)
    pub alignment: i32,
}

impl Personality {
    pub fn new(profile: PersonalityProfile) -> Self {
        Self {
            profile,
            genetic: profile.genetic(),
            modifier: OceanScores::default(),
            emotional_intelligence: 50,
            wimpy: 20,
            alignment: 0,
        }
    }

    pub fn with_modifier(mut self, modifier: OceanScores) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_genetic(mut self, genetic: OceanScores) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn with_emotional_intelligence(mut self, value: u8) -> Self {
        self.emotional_intelligence = value.min(100);
        self
    }

    pub fn with_wimpy(mut self, value: u8) -> Self {
        self.wimpy = value.min(100);
        self
    }

    pub fn with_alignment(mut self, alignment: i32) -> Self {
        self.alignment = alignment.clamp(-1000, 1000);
        self
    }

    pub fn is_good(&self) -> bool {
        self.alignment >= ALIGN_GOOD
    }

    pub fn is_evil(&self) -> bool {
        self.alignment <= ALIGN_EVIL
    }

    /// Final trait values given the current emotional state
    pub fn traits(&self, emotions: &EmotionState) -> PersonalityTraits {
        PersonalityTraits::derive(self, emotions)
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new(PersonalityProfile::Balanced)
    }
}

/// Derived OCEAN trait finals, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl PersonalityTraits {
    /// Combine genetic base, builder modifier and the emotion-driven modulation
    pub fn derive(personality: &Personality, emotions: &EmotionState) -> Self {
        let base = |genetic: f32, modifier: f32, modulation: f32| {
            (genetic + modifier + modulation).clamp(0.0, 1.0)
        };
        let e = |emotion: Emotion| emotions.get(emotion) as f32;
        let g = &personality.genetic;
        let m = &personality.modifier;

        // Modulation bounds: openness and conscientiousness +/-0.05, the rest +/-0.10.
        let openness = 0.05 * (e(Emotion::Curiosity) - 50.0) / 50.0;
        let conscientiousness = 0.05 * (e(Emotion::Pride) - e(Emotion::Shame)) / 100.0;
        let extraversion = 0.10
            * (e(Emotion::Happiness) + e(Emotion::Excitement)
                - e(Emotion::Sadness)
                - e(Emotion::Shame))
            / 200.0;
        let agreeableness = 0.10
            * (e(Emotion::Compassion) + e(Emotion::Trust) - e(Emotion::Anger) - e(Emotion::Envy))
            / 200.0;
        let neuroticism = 0.10
            * (e(Emotion::Fear) + e(Emotion::Sadness)
                - e(Emotion::Happiness)
                - e(Emotion::Courage))
            / 200.0;

        Self {
            openness: base(g.openness, m.openness, openness),
            conscientiousness: base(g.conscientiousness, m.conscientiousness, conscientiousness),
            extraversion: base(g.extraversion, m.extraversion, extraversion),
            agreeableness: base(g.agreeableness, m.agreeableness, agreeableness),
            neuroticism: base(g.neuroticism, m.neuroticism, neuroticism),
        }
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            openness: 0.5,
            conscientiousness: 0.5,
            extraversion: 0.5,
            agreeableness: 0.5,
            neuroticism: 0.5,
        }
    }
}
