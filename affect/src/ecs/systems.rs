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

//! ECS Systems
//!
//! This module contains all system implementations that operate on components.
//! Systems contain the emotion pipeline, memory resolution and decision logic.

pub mod actions;
pub mod appraisal;
pub mod behavior;
pub mod contagion;
pub mod decay;
pub mod emotion;
pub mod environment;
pub mod memory;
pub mod mood;
pub mod navigation;
pub mod npc_ai;
pub mod shadow;
pub mod social;

// Re-export the entry points collaborators reach for
pub use actions::{ActionError, ActionSystem};
pub use appraisal::{Appraiser, appraise_all};
pub use behavior::{BehaviorProfile, behavior_profile};
pub use contagion::apply_contagion;
pub use decay::run_decay;
pub use emotion::{adjust, adjust_many};
pub use environment::{ClockWeather, Environment, FixedWeather, Sky, TtlCache, WeatherSource};
pub use memory::{forget_entity, memory_modifier, record, relationship_emotion};
pub use mood::{effective_emotion_toward, mood, update_moods};
pub use npc_ai::AffectSystem;
pub use shadow::{Action, DecisionReport, Outcome, ShadowTimeline, choose_action, decide};
pub use social::classify_social;
