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

//! Emotion update pipeline
//!
//! [`adjust`] is the only path by which events change an NPC's emotions.
//! Every call runs the same fixed sequence:
//!
//! 1. volatility scaling by emotional intelligence
//! 2. Neuroticism gain on increases to aversive emotions
//! 3. soft saturation above the knee
//! 4. lateral inhibition across fear, sadness, anger and happiness
//!
//! None of the steps can fail. Out-of-range values are clamped and an
//! unknown NPC is a silent no-op.

use crate::config::EmotionConfig;
use crate::ecs::components::*;
use crate::ecs::{EcsEntity, GameWorld};
use metrics::counter;
use rand::Rng;

/// Highest value the soft clamp may produce
const SOFT_CEILING: f64 = 99.99;

/// Compress values above `knee` toward 100 along `knee + (100 - knee) * e / (e + k)`.
///
/// Values at or below the knee pass through. The result is monotonically
/// non-decreasing in `raw` and strictly below 100 for every finite input.
pub fn soft_saturation_clamp(raw: f64, knee: f64, k: f64) -> f64 {
    if raw <= knee {
        return raw;
    }
    let excess = raw - knee;
    (knee + (100.0 - knee) * (excess / (excess + k))).min(SOFT_CEILING)
}

/// Delta multiplier from emotional intelligence
pub fn volatility_scale<R: Rng + ?Sized>(config: &EmotionConfig, ei: u8, rng: &mut R) -> f64 {
    if ei < config.low_ei_threshold {
        rng.random_range(config.low_ei_scale_min..=config.low_ei_scale_max)
    } else if ei > config.high_ei_threshold {
        rng.random_range(config.high_ei_scale_min..=config.high_ei_scale_max)
    } else {
        1.0
    }
}

/// Apply one delta to a detached emotion store.
///
/// Returns the signed change of `emotion` itself, after inhibition.
pub fn apply<R: Rng + ?Sized>(
    config: &EmotionConfig,
    state: &mut EmotionState,
    traits: &PersonalityTraits,
    ei: u8,
    emotion: Emotion,
    delta: i32,
    rng: &mut R,
) -> i32 {
    apply_bounded(config, state, traits, ei, emotion, delta, None, rng)
}

/// [`apply`] with an optional value the update must not cross.
///
/// Used by decay so a randomized step toward a baseline never overshoots
/// it: a decrease stops at `bound` from above, an increase from below.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_bounded<R: Rng + ?Sized>(
    config: &EmotionConfig,
    state: &mut EmotionState,
    traits: &PersonalityTraits,
    ei: u8,
    emotion: Emotion,
    delta: i32,
    bound: Option<i32>,
    rng: &mut R,
) -> i32 {
    if delta == 0 {
        return 0;
    }
    let old = state.get(emotion);
    let scaled = delta as f64 * volatility_scale(config, ei, rng);
    let mut raw = old as f64 + scaled;

    let increase = delta > 0;
    if increase && emotion.is_aversive() {
        raw *= 1.0 + config.beta(emotion) * traits.neuroticism as f64;
    }

    let mut new = if increase && raw > config.soft_knee {
        let soft = soft_saturation_clamp(raw, config.soft_knee, config.soft_k);
        // An increase never lowers the stored value, even when an earlier
        // direct write left it above the curve.
        (soft.round() as i32).min(EMOTION_MAX - 1).max(old)
    } else {
        (raw.round() as i32).clamp(0, EMOTION_MAX)
    };

    if let Some(bound) = bound {
        new = if increase { new.min(bound.max(old)) } else { new.max(bound.min(old)) };
    }

    state.write(emotion, new);
    if new > old && emotion.in_quartet() {
        lateral_inhibition(state, emotion);
    }
    debug_assert!(
        state.quartet_sum() <= QUARTET_LIMIT,
        "quartet sum {} exceeds {}",
        state.quartet_sum(),
        QUARTET_LIMIT
    );
    state.get(emotion) - old
}

/// Drain any quartet excess above the limit from the rivals of `raised`.
///
/// Shares are integer-proportional to each rival's value, with the rounding
/// remainder assigned to the last rival. A share larger than its rival's
/// value is taken from the remaining rivals in quartet order, so the drained
/// total always equals the excess exactly. With no rival left to drain, the
/// excess comes back out of `raised`.
///
/// Returns the amount drained.
pub fn lateral_inhibition(state: &mut EmotionState, raised: Emotion) -> i32 {
    let Some(rivals) = raised.quartet_rivals() else {
        return 0;
    };
    let excess = state.quartet_sum() - QUARTET_LIMIT;
    if excess <= 0 {
        return 0;
    }

    let pool: i32 = rivals.iter().map(|&r| state.get(r)).sum();
    let mut remaining = excess;
    if pool > 0 {
        let mut shares = [0i32; 3];
        let mut assigned = 0;
        for (share, &rival) in shares.iter_mut().zip(rivals.iter()).take(2) {
            *share = excess * state.get(rival) / pool;
            assigned += *share;
        }
        shares[2] = excess - assigned;

        for (&share, &rival) in shares.iter().zip(rivals.iter()) {
            let current = state.get(rival);
            let take = share.min(current);
            state.write(rival, current - take);
            remaining -= take;
        }
        for &rival in rivals.iter() {
            if remaining == 0 {
                break;
            }
            let current = state.get(rival);
            let take = remaining.min(current);
            state.write(rival, current - take);
            remaining -= take;
        }
    }
    if remaining > 0 {
        let current = state.get(raised);
        state.write(raised, current - remaining);
    }

    counter!("affect.inhibition.drained").increment(excess as u64);
    excess
}

/// Adjust one emotion of an NPC in the world.
///
/// Returns the applied change; zero when the entity has no emotion store.
pub fn adjust<R: Rng + ?Sized>(
    world: &mut GameWorld,
    config: &EmotionConfig,
    npc: EcsEntity,
    emotion: Emotion,
    delta: i32,
    rng: &mut R,
) -> i32 {
    adjust_bounded(world, config, npc, emotion, delta, None, rng)
}

pub(crate) fn adjust_bounded<R: Rng + ?Sized>(
    world: &mut GameWorld,
    config: &EmotionConfig,
    npc: EcsEntity,
    emotion: Emotion,
    delta: i32,
    bound: Option<i32>,
    rng: &mut R,
) -> i32 {
    let Ok((state, personality)) =
        world.query_one_mut::<(&mut EmotionState, Option<&Personality>)>(npc)
    else {
        tracing::trace!("adjust {} on {:?}: no emotion store", emotion, npc);
        return 0;
    };

    let (traits, ei) = match personality {
        Some(p) => (p.traits(state), p.emotional_intelligence),
        None => (PersonalityTraits::default(), 50),
    };
    counter!("affect.adjust.total").increment(1);
    apply_bounded(config, state, &traits, ei, emotion, delta, bound, rng)
}

/// Adjust several emotions of one NPC in order
pub fn adjust_many<R: Rng + ?Sized>(
    world: &mut GameWorld,
    config: &EmotionConfig,
    npc: EcsEntity,
    deltas: &[(Emotion, i32)],
    rng: &mut R,
) {
    for &(emotion, delta) in deltas {
        adjust(world, config, npc, emotion, delta, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn neutral_traits() -> PersonalityTraits {
        PersonalityTraits::default()
    }

    #[test]
    fn test_soft_clamp_passes_below_knee() {
        assert_eq!(soft_saturation_clamp(42.0, 80.0, 20.0), 42.0);
        assert_eq!(soft_saturation_clamp(80.0, 80.0, 20.0), 80.0);
    }

    #[test]
    fn test_soft_clamp_compresses_above_knee() {
        let value = soft_saturation_clamp(100.0, 80.0, 20.0);
        assert!((value - 90.0).abs() < 1e-9);
        assert!(soft_saturation_clamp(1e12, 80.0, 20.0) < 100.0);
    }

    #[test]
    fn test_positive_increase_within_range() {
        let config = EmotionConfig::default();
        let mut state = EmotionState::new().with(Emotion::Trust, 30);
        let applied = apply(&config, &mut state, &neutral_traits(), 50, Emotion::Trust, 20, &mut rng());
        assert_eq!(applied, 20);
        assert_eq!(state.get(Emotion::Trust), 50);
    }

    #[test]
    fn test_lateral_inhibition_drains_fear() {
        let config = EmotionConfig::default();
        let mut state = EmotionState::new().with(Emotion::Fear, 90);
        apply(&config, &mut state, &neutral_traits(), 50, Emotion::Happiness, 50, &mut rng());
        assert_eq!(state.get(Emotion::Happiness), 50);
        assert_eq!(state.get(Emotion::Fear), 50);
        assert_eq!(state.quartet_sum(), 100);
    }

    #[test]
    fn test_lateral_inhibition_proportional_split() {
        let mut state = EmotionState::new()
            .with(Emotion::Sadness, 30)
            .with(Emotion::Anger, 20)
            .with(Emotion::Happiness, 10);
        state.write(Emotion::Fear, 60);
        let drained = lateral_inhibition(&mut state, Emotion::Fear);
        assert_eq!(drained, 20);
        // Shares: sadness 20*30/60 = 10, anger 20*20/60 = 6, happiness 4
        assert_eq!(state.get(Emotion::Sadness), 20);
        assert_eq!(state.get(Emotion::Anger), 14);
        assert_eq!(state.get(Emotion::Happiness), 6);
        assert_eq!(state.quartet_sum(), 100);
    }

    #[test]
    fn test_lateral_inhibition_redistributes_shortfall() {
        // Remainder lands on a rival holding less than its share.
        let mut state = EmotionState::new()
            .with(Emotion::Sadness, 49)
            .with(Emotion::Anger, 49)
            .with(Emotion::Happiness, 1);
        state.write(Emotion::Fear, 11);
        let drained = lateral_inhibition(&mut state, Emotion::Fear);
        assert_eq!(drained, 10);
        assert_eq!(state.get(Emotion::Happiness), 0);
        assert_eq!(state.quartet_sum(), 100);
        assert_eq!(state.get(Emotion::Fear), 11);
    }

    #[test]
    fn test_no_inhibition_for_non_quartet() {
        let config = EmotionConfig::default();
        let mut state = EmotionState::new().with(Emotion::Fear, 90);
        apply(&config, &mut state, &neutral_traits(), 50, Emotion::Courage, 40, &mut rng());
        assert_eq!(state.get(Emotion::Fear), 90);
    }

    #[test]
    fn test_neuroticism_gain_then_soft_clamp() {
        let config = EmotionConfig::default();
        let traits = PersonalityTraits {
            neuroticism: 1.0,
            ..PersonalityTraits::default()
        };
        let mut state = EmotionState::new().with(Emotion::Fear, 50);
        apply(&config, &mut state, &traits, 50, Emotion::Fear, 10, &mut rng());
        // (50 + 10) * 1.4 = 84 -> 80 + 20 * 4 / 24
        let expected = (80.0 + 20.0 * (4.0 / 24.0_f64)).round() as i32;
        assert_eq!(state.get(Emotion::Fear), expected);
    }

    #[test]
    fn test_no_gain_on_decrease() {
        let config = EmotionConfig::default();
        let traits = PersonalityTraits {
            neuroticism: 1.0,
            ..PersonalityTraits::default()
        };
        let mut state = EmotionState::new().with(Emotion::Fear, 50);
        apply(&config, &mut state, &traits, 50, Emotion::Fear, -10, &mut rng());
        assert_eq!(state.get(Emotion::Fear), 40);
    }

    #[test]
    fn test_no_gain_for_positive_emotions() {
        let config = EmotionConfig::default();
        let traits = PersonalityTraits {
            neuroticism: 1.0,
            ..PersonalityTraits::default()
        };
        let mut state = EmotionState::new().with(Emotion::Curiosity, 50);
        apply(&config, &mut state, &traits, 50, Emotion::Curiosity, 10, &mut rng());
        assert_eq!(state.get(Emotion::Curiosity), 60);
    }

    #[test]
    fn test_increase_never_displays_hundred() {
        let config = EmotionConfig::default();
        let mut state = EmotionState::new().with(Emotion::Pride, 95);
        apply(&config, &mut state, &neutral_traits(), 50, Emotion::Pride, 100, &mut rng());
        assert!(state.get(Emotion::Pride) < 100);
        assert!(state.get(Emotion::Pride) >= 95);
    }

    #[test]
    fn test_low_ei_amplifies() {
        let config = EmotionConfig::default();
        let mut rng = rng();
        for _ in 0..50 {
            let mut state = EmotionState::new();
            let applied = apply(&config, &mut state, &neutral_traits(), 10, Emotion::Trust, 10, &mut rng);
            assert!((12..=15).contains(&applied), "applied {}", applied);
        }
    }

    #[test]
    fn test_high_ei_damps() {
        let config = EmotionConfig::default();
        let mut rng = rng();
        for _ in 0..50 {
            let mut state = EmotionState::new();
            let applied = apply(&config, &mut state, &neutral_traits(), 90, Emotion::Trust, 10, &mut rng);
            assert!((7..=9).contains(&applied), "applied {}", applied);
        }
    }

    #[test]
    fn test_bound_stops_decrease() {
        let config = EmotionConfig::default();
        let mut state = EmotionState::new().with(Emotion::Pain, 12);
        apply_bounded(&config, &mut state, &neutral_traits(), 10, Emotion::Pain, -5, Some(10), &mut rng());
        assert_eq!(state.get(Emotion::Pain), 10);
    }

    #[test]
    fn test_adjust_unknown_entity_is_noop() {
        let mut world = GameWorld::new();
        let room = world.spawn((Room::new(),));
        let applied = adjust(&mut world, &EmotionConfig::default(), room, Emotion::Fear, 10, &mut rng());
        assert_eq!(applied, 0);

        let gone = world.spawn((EmotionState::new(),));
        world.despawn(gone).unwrap();
        let applied = adjust(&mut world, &EmotionConfig::default(), gone, Emotion::Fear, 10, &mut rng());
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_adjust_in_world() {
        let mut world = GameWorld::new();
        let npc = world.spawn((EmotionState::new(), Personality::default()));
        adjust_many(
            &mut world,
            &EmotionConfig::default(),
            npc,
            &[(Emotion::Trust, 10), (Emotion::Trust, 5)],
            &mut rng(),
        );
        assert_eq!(world.get::<&EmotionState>(npc).unwrap().get(Emotion::Trust), 15);
    }
}
