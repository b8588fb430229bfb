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

//! Cognitive budget component

use serde::{Deserialize, Serialize};

/// Persistent per-NPC budget consumed by Shadow Timeline projections
///
/// Drains as projections execute and regenerates each tick up to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitiveBudget {
    pub remaining: i32,
    pub max: i32,
}

impl CognitiveBudget {
    pub fn new(max: i32) -> Self {
        Self {
            remaining: max.max(0),
            max: max.max(0),
        }
    }

    pub fn with_remaining(mut self, remaining: i32) -> Self {
        self.remaining = remaining.clamp(0, self.max);
        self
    }

    /// Deduct spent budget, flooring at zero
    pub fn spend(&mut self, amount: i32) {
        self.remaining = (self.remaining - amount.max(0)).max(0);
    }

    /// Add `amount`, capping at `max`
    pub fn regenerate(&mut self, amount: i32) {
        self.remaining = (self.remaining + amount.max(0)).min(self.max);
    }
}
