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

//! Social command classification
//!
//! The single table consulted by both direct social appraisal and witness
//! appraisal.

use crate::ecs::components::SocialTone;

/// Classification of a social command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialClass {
    pub tone: SocialTone,
    /// Whether the command is memorable enough to count as a major event
    pub major: bool,
}

const SOCIAL_TABLE: &[(&str, SocialTone, bool)] = &[
    ("smile", SocialTone::Positive, false),
    ("hug", SocialTone::Positive, false),
    ("kiss", SocialTone::Positive, true),
    ("thank", SocialTone::Positive, false),
    ("bow", SocialTone::Positive, false),
    ("comfort", SocialTone::Positive, false),
    ("applaud", SocialTone::Positive, false),
    ("wave", SocialTone::Positive, false),
    ("cuddle", SocialTone::Positive, false),
    ("frown", SocialTone::Negative, false),
    ("insult", SocialTone::Negative, false),
    ("sneer", SocialTone::Negative, false),
    ("laugh", SocialTone::Negative, false),
    ("spit", SocialTone::Negative, true),
    ("slap", SocialTone::Violent, false),
    ("punch", SocialTone::Violent, true),
    ("kick", SocialTone::Violent, false),
    ("strangle", SocialTone::Violent, true),
];

/// Classify a social command by name, case-insensitively
///
/// Unknown commands are emotionally neutral and return `None`.
pub fn classify_social(name: &str) -> Option<SocialClass> {
    let name = name.trim();
    SOCIAL_TABLE
        .iter()
        .find(|(command, _, _)| command.eq_ignore_ascii_case(name))
        .map(|&(_, tone, major)| SocialClass { tone, major })
}
