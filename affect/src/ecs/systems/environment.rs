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

//! Environment modulators: weather, temperature and time of day
//!
//! The current [`Environment`] is sampled from a [`WeatherSource`] and held
//! in an explicitly owned [`TtlCache`], refreshed only once its TTL lapses.

use crate::ecs::components::Emotion;
use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Sky conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sky {
    Cloudless,
    Cloudy,
    Raining,
    Lightning,
}

/// Coarse time of day derived from the hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=6 => TimeOfDay::Dawn,
            7..=18 => TimeOfDay::Day,
            19..=20 => TimeOfDay::Dusk,
            _ => TimeOfDay::Night,
        }
    }
}

/// Temperature bands in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureBand {
    Freezing,
    Cold,
    Mild,
    Hot,
    Scorching,
}

impl TemperatureBand {
    pub fn from_celsius(celsius: i32) -> Self {
        match celsius {
            i32::MIN..=-1 => TemperatureBand::Freezing,
            0..=9 => TemperatureBand::Cold,
            10..=24 => TemperatureBand::Mild,
            25..=34 => TemperatureBand::Hot,
            _ => TemperatureBand::Scorching,
        }
    }
}

/// Outdoor conditions at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub sky: Sky,
    pub temperature: i32,
    pub hour: u32,
}

impl Environment {
    pub fn new(sky: Sky, temperature: i32, hour: u32) -> Self {
        Self {
            sky,
            temperature,
            hour: hour % 24,
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour)
    }

    pub fn temperature_band(&self) -> TemperatureBand {
        TemperatureBand::from_celsius(self.temperature)
    }

    /// Offset added to an NPC's mood target.
    ///
    /// Sheltered NPCs ignore sky and temperature but still feel the time of
    /// day. Good NPCs prefer daylight and evil ones the night.
    pub fn mood_modifier(&self, alignment: i32, indoors: bool) -> i32 {
        let mut modifier = 0;
        if !indoors {
            modifier += match self.sky {
                Sky::Cloudless => 5,
                Sky::Cloudy => 0,
                Sky::Raining => -3,
                Sky::Lightning => -6,
            };
            modifier += match self.temperature_band() {
                TemperatureBand::Freezing | TemperatureBand::Scorching => -5,
                TemperatureBand::Cold | TemperatureBand::Hot => -2,
                TemperatureBand::Mild => 2,
            };
        }
        let leaning = alignment.signum() * (alignment.abs() >= 350) as i32;
        modifier += match self.time_of_day() {
            TimeOfDay::Day => 3 * leaning,
            TimeOfDay::Night => -3 * leaning,
            TimeOfDay::Dawn | TimeOfDay::Dusk => 0,
        };
        modifier
    }

    /// Emotion nudges applied to outdoor NPCs on each weather tick
    pub fn weather_deltas(&self) -> Vec<(Emotion, i32)> {
        let mut deltas = Vec::new();
        match self.sky {
            Sky::Lightning => {
                deltas.push((Emotion::Fear, 2));
                deltas.push((Emotion::Excitement, 1));
            }
            Sky::Raining => deltas.push((Emotion::Sadness, 1)),
            Sky::Cloudless if self.time_of_day() == TimeOfDay::Day => {
                deltas.push((Emotion::Happiness, 1));
            }
            _ => {}
        }
        if matches!(
            self.temperature_band(),
            TemperatureBand::Freezing | TemperatureBand::Scorching
        ) {
            deltas.push((Emotion::Pain, 1));
        }
        if self.time_of_day() == TimeOfDay::Night {
            deltas.push((Emotion::Fear, 1));
        }
        deltas
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Sky::Cloudy, 15, 12)
    }
}

/// Single cached value with an explicit time-to-live
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    value: Option<T>,
    stored_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            value: None,
            stored_at: None,
            ttl,
        }
    }

    /// Whether a value is held and younger than the TTL at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.value, self.stored_at) {
            (Some(_), Some(stored_at)) => now - stored_at < self.ttl,
            _ => false,
        }
    }

    /// The cached value, if still fresh
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_fresh(now) { self.value.as_ref() } else { None }
    }

    pub fn store(&mut self, value: T, now: DateTime<Utc>) {
        self.value = Some(value);
        self.stored_at = Some(now);
    }

    pub fn invalidate(&mut self) {
        self.value = None;
        self.stored_at = None;
    }

    /// The cached value, recomputed with `refresh` when stale
    pub fn get_or_refresh<F>(&mut self, now: DateTime<Utc>, refresh: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if !self.is_fresh(now) {
            self.value = None;
            self.stored_at = Some(now);
        }
        self.value.get_or_insert_with(refresh)
    }
}

/// Source of environment samples
pub trait WeatherSource {
    fn sample(&mut self, now: DateTime<Utc>) -> Environment;
}

/// Always reports the same conditions
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub Environment);

impl WeatherSource for FixedWeather {
    fn sample(&mut self, _now: DateTime<Utc>) -> Environment {
        self.0
    }
}

/// Weather that follows the clock: the hour comes from the sample time,
/// temperature follows a daily curve and the sky drifts one step at a time
#[derive(Debug, Clone)]
pub struct ClockWeather {
    rng: StdRng,
    sky: Sky,
    /// Temperature at midday
    pub peak_temperature: i32,
}

impl ClockWeather {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sky: Sky::Cloudless,
            peak_temperature: 22,
        }
    }

    fn drift(&mut self) -> Sky {
        let roll = self.rng.random_range(0..10);
        self.sky = match (self.sky, roll) {
            (Sky::Cloudless, 0..=1) => Sky::Cloudy,
            (Sky::Cloudy, 0..=1) => Sky::Cloudless,
            (Sky::Cloudy, 2..=3) => Sky::Raining,
            (Sky::Raining, 0..=2) => Sky::Cloudy,
            (Sky::Raining, 3) => Sky::Lightning,
            (Sky::Lightning, 0..=5) => Sky::Raining,
            (sky, _) => sky,
        };
        self.sky
    }
}

impl WeatherSource for ClockWeather {
    fn sample(&mut self, now: DateTime<Utc>) -> Environment {
        let hour = now.hour();
        let distance_from_noon = (hour as i32 - 13).abs();
        let temperature = self.peak_temperature - distance_from_noon;
        let sky = self.drift();
        Environment::new(sky, temperature, hour)
    }
}
