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

//! World event appraisal
//!
//! Each handler turns a discrete world event into emotion deltas for the
//! entities involved and records the interaction on both sides: the
//! target's received ring and the actor's active ring. Bystanders in the
//! same room appraise what they saw at reduced strength.

use super::emotion::adjust_many;
use super::memory::{forget_entity, record, relationship_emotion};
use super::navigation::{occupants, room_of};
use super::social::classify_social;
use crate::config::AffectConfig;
use crate::ecs::components::*;
use crate::ecs::events::AffectEvent;
use crate::ecs::{EcsEntity, GameWorld};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Scale applied to everything a bystander feels
pub const WITNESS_SCALE: f64 = 0.5;

/// Damage at or above this makes an attack a major event
const MAJOR_DAMAGE: i32 = 20;

/// Healing at or above this makes a heal a major event
const MAJOR_HEAL: i32 = 30;

/// Appraises events against one configuration and clock
pub struct Appraiser<'a, R: Rng + ?Sized> {
    config: &'a AffectConfig,
    now: DateTime<Utc>,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Appraiser<'a, R> {
    pub fn new(config: &'a AffectConfig, now: DateTime<Utc>, rng: &'a mut R) -> Self {
        Self { config, now, rng }
    }

    /// Appraise one event
    pub fn appraise(&mut self, world: &mut GameWorld, event: &AffectEvent) {
        tracing::trace!("Appraising {} event", event.kind());
        match *event {
            AffectEvent::Attacked {
                attacker,
                defender,
                damage,
            } => self.attacked(world, attacker, defender, damage),
            AffectEvent::Died { entity, killer } => self.died(world, entity, killer),
            AffectEvent::Healed {
                healer,
                target,
                amount,
            } => {
                let major = amount >= MAJOR_HEAL;
                self.interaction(
                    world,
                    healer,
                    target,
                    Interaction::Healed,
                    major,
                    &[(Emotion::Compassion, 3), (Emotion::Happiness, 2)],
                    &[
                        (Emotion::Trust, 10),
                        (Emotion::Friendship, 5),
                        (Emotion::Happiness, 5),
                        (Emotion::Pain, -(amount / 2).clamp(0, 20)),
                    ],
                );
            }
            AffectEvent::Rescued { rescuer, rescued } => self.interaction(
                world,
                rescuer,
                rescued,
                Interaction::Rescued,
                true,
                &[(Emotion::Pride, 5), (Emotion::Courage, 3)],
                &[
                    (Emotion::Trust, 20),
                    (Emotion::Friendship, 15),
                    (Emotion::Loyalty, 10),
                    (Emotion::Happiness, 10),
                    (Emotion::Fear, -15),
                ],
            ),
            AffectEvent::Assisted { helper, helped } => self.interaction(
                world,
                helper,
                helped,
                Interaction::Assisted,
                false,
                &[(Emotion::Loyalty, 2)],
                &[(Emotion::Trust, 5), (Emotion::Friendship, 5)],
            ),
            AffectEvent::ItemGiven {
                giver,
                receiver,
                item,
            } => {
                let value = world.get::<&Item>(item).map(|i| i.value).unwrap_or(0);
                let greed = (value / 10).clamp(0, 10);
                self.interaction(
                    world,
                    giver,
                    receiver,
                    Interaction::ReceivedItem,
                    value >= 100,
                    &[(Emotion::Compassion, 2)],
                    &[
                        (Emotion::Happiness, 5),
                        (Emotion::Trust, 5),
                        (Emotion::Friendship, 3),
                        (Emotion::Greed, greed),
                    ],
                );
            }
            AffectEvent::Stolen { thief, victim, .. } => {
                let thief_shame = world
                    .get::<&Personality>(thief)
                    .map(|p| if p.is_good() { 5 } else { 0 })
                    .unwrap_or(0);
                self.interaction(
                    world,
                    thief,
                    victim,
                    Interaction::Stolen,
                    true,
                    &[(Emotion::Greed, 3), (Emotion::Shame, thief_shame)],
                    &[
                        (Emotion::Anger, 10),
                        (Emotion::Trust, -15),
                        (Emotion::Sadness, 3),
                    ],
                );
            }
            AffectEvent::QuestCompleted {
                quest_giver,
                player,
            } => self.quest(
                world,
                quest_giver,
                player,
                Interaction::QuestCompleted,
                false,
                &[
                    (Emotion::Happiness, 10),
                    (Emotion::Trust, 10),
                    (Emotion::Friendship, 5),
                ],
            ),
            AffectEvent::QuestFailed {
                quest_giver,
                player,
            } => self.quest(
                world,
                quest_giver,
                player,
                Interaction::QuestFailed,
                false,
                &[(Emotion::Sadness, 5), (Emotion::Trust, -5)],
            ),
            AffectEvent::QuestBetrayed {
                quest_giver,
                player,
            } => self.quest(
                world,
                quest_giver,
                player,
                Interaction::QuestBetrayed,
                true,
                &[
                    (Emotion::Anger, 15),
                    (Emotion::Trust, -25),
                    (Emotion::Humiliation, 5),
                ],
            ),
            AffectEvent::Social {
                actor,
                target,
                ref name,
            } => self.social(world, actor, target, name),
            AffectEvent::Despawned { entity } => {
                forget_entity(world, entity);
            }
        }
    }

    /// Apply deltas and record memories for an actor/target pair
    #[allow(clippy::too_many_arguments)]
    fn interaction(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        target: EcsEntity,
        interaction: Interaction,
        major: bool,
        actor_deltas: &[(Emotion, i32)],
        target_deltas: &[(Emotion, i32)],
    ) {
        if !world.contains(actor) || !world.contains(target) {
            tracing::debug!(
                "Ignoring {} between invalid entities {:?} and {:?}",
                interaction.as_str(),
                actor,
                target
            );
            return;
        }
        self.exchange(world, actor, target, interaction, major, None, actor_deltas, target_deltas);
    }

    #[allow(clippy::too_many_arguments)]
    fn exchange(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        target: EcsEntity,
        interaction: Interaction,
        major: bool,
        label: Option<&str>,
        actor_deltas: &[(Emotion, i32)],
        target_deltas: &[(Emotion, i32)],
    ) {
        adjust_many(world, &self.config.emotion, target, target_deltas, &mut *self.rng);
        record(world, target, actor, MemoryDirection::Received, interaction, major, label, self.now);
        adjust_many(world, &self.config.emotion, actor, actor_deltas, &mut *self.rng);
        record(world, actor, target, MemoryDirection::Active, interaction, major, label, self.now);
    }

    fn attacked(&mut self, world: &mut GameWorld, attacker: EcsEntity, defender: EcsEntity, damage: i32) {
        if !world.contains(attacker) || !world.contains(defender) {
            tracing::debug!("Ignoring attack between {:?} and {:?}", attacker, defender);
            return;
        }
        let damage = damage.max(0);
        self.exchange(
            world,
            attacker,
            defender,
            Interaction::Attacked,
            damage >= MAJOR_DAMAGE,
            None,
            &[(Emotion::Excitement, 3)],
            &[
                (Emotion::Fear, 5 + (damage / 5).min(10)),
                (Emotion::Anger, 8),
                (Emotion::Pain, (damage / 2).min(20)),
                (Emotion::Trust, -10),
            ],
        );
        self.witness(world, attacker, defender, SocialTone::Violent, Some("attack"));
    }

    fn died(&mut self, world: &mut GameWorld, entity: EcsEntity, killer: Option<EcsEntity>) {
        let Some(room) = room_of(world, entity).or_else(|| killer.and_then(|k| room_of(world, k))) else {
            tracing::debug!("Death of {:?} had no witnesses", entity);
            return;
        };
        let subject = killer.filter(|&k| world.contains(k)).unwrap_or(entity);
        let witnesses: Vec<EcsEntity> = occupants(world, room)
            .into_iter()
            .filter(|&w| w != entity && Some(w) != killer)
            .collect();
        for witness in witnesses {
            let friendship =
                relationship_emotion(world, &self.config.memory, witness, entity, Emotion::Friendship, self.now);
            let grief = if friendship > 60 { 10 } else { 3 };
            adjust_many(
                world,
                &self.config.emotion,
                witness,
                &[(Emotion::Horror, 8), (Emotion::Fear, 5), (Emotion::Sadness, grief)],
                &mut *self.rng,
            );
            record(
                world,
                witness,
                subject,
                MemoryDirection::Received,
                Interaction::WitnessedDeath,
                true,
                None,
                self.now,
            );
        }
    }

    fn quest(
        &mut self,
        world: &mut GameWorld,
        quest_giver: EcsEntity,
        player: EcsEntity,
        interaction: Interaction,
        major: bool,
        deltas: &[(Emotion, i32)],
    ) {
        if !world.contains(quest_giver) || !world.contains(player) {
            return;
        }
        adjust_many(world, &self.config.emotion, quest_giver, deltas, &mut *self.rng);
        record(world, quest_giver, player, MemoryDirection::Received, interaction, major, None, self.now);
    }

    fn social(&mut self, world: &mut GameWorld, actor: EcsEntity, target: EcsEntity, name: &str) {
        let Some(class) = classify_social(name) else {
            tracing::trace!("Social '{}' carries no emotional weight", name);
            return;
        };
        if !world.contains(actor) || !world.contains(target) {
            return;
        }
        let scale = if class.major { 2 } else { 1 };
        let target_deltas: Vec<(Emotion, i32)> = match class.tone {
            SocialTone::Positive => vec![
                (Emotion::Happiness, 4),
                (Emotion::Friendship, 3),
                (Emotion::Trust, 2),
            ],
            SocialTone::Negative => vec![
                (Emotion::Anger, 4),
                (Emotion::Humiliation, 3),
                (Emotion::Trust, -3),
            ],
            SocialTone::Violent => vec![
                (Emotion::Anger, 8),
                (Emotion::Fear, 4),
                (Emotion::Pain, 3),
                (Emotion::Trust, -6),
            ],
        }
        .into_iter()
        .map(|(e, d)| (e, d * scale))
        .collect();
        let actor_deltas: &[(Emotion, i32)] = match class.tone {
            SocialTone::Positive => &[(Emotion::Happiness, 1)],
            SocialTone::Negative | SocialTone::Violent => &[(Emotion::Excitement, 1)],
        };
        self.exchange(
            world,
            actor,
            target,
            Interaction::Social(class.tone),
            class.major,
            Some(name),
            actor_deltas,
            &target_deltas,
        );
        self.witness(world, actor, target, class.tone, Some(name));
    }

    /// Appraisal for bystanders who saw `actor` do something to `target`.
    ///
    /// Each observer takes the side of whichever party it remembers more
    /// warmly: harm to a friend angers it, kindness to a friend pleases it.
    fn witness(
        &mut self,
        world: &mut GameWorld,
        actor: EcsEntity,
        target: EcsEntity,
        tone: SocialTone,
        label: Option<&str>,
    ) {
        let Some(room) = room_of(world, target).or_else(|| room_of(world, actor)) else {
            return;
        };
        let observers: Vec<EcsEntity> = occupants(world, room)
            .into_iter()
            .filter(|&o| o != actor && o != target && world.satisfies::<&EmotionState>(o))
            .collect();

        for observer in observers {
            let memory = &self.config.memory;
            let toward_target =
                relationship_emotion(world, memory, observer, target, Emotion::Friendship, self.now);
            let toward_actor =
                relationship_emotion(world, memory, observer, actor, Emotion::Friendship, self.now);
            let sides_with_target = toward_target > toward_actor;

            let mut deltas = match tone {
                SocialTone::Positive => vec![(Emotion::Happiness, 2)],
                SocialTone::Negative => vec![(Emotion::Disgust, 2)],
                SocialTone::Violent => vec![(Emotion::Fear, 3), (Emotion::Disgust, 2)],
            };
            if sides_with_target {
                match tone {
                    SocialTone::Positive => deltas.push((Emotion::Happiness, 2)),
                    SocialTone::Negative | SocialTone::Violent => deltas.push((Emotion::Anger, 4)),
                }
            }
            let scaled: Vec<(Emotion, i32)> = deltas
                .into_iter()
                .map(|(e, d)| (e, (d as f64 * WITNESS_SCALE).round() as i32))
                .collect();
            adjust_many(world, &self.config.emotion, observer, &scaled, &mut *self.rng);
            record(
                world,
                observer,
                actor,
                MemoryDirection::Received,
                Interaction::Witnessed(tone),
                false,
                label,
                self.now,
            );
        }
    }
}

/// Appraise a batch of events in order
pub fn appraise_all<R: Rng + ?Sized>(
    world: &mut GameWorld,
    config: &AffectConfig,
    events: &[AffectEvent],
    now: DateTime<Utc>,
    rng: &mut R,
) {
    let mut appraiser = Appraiser::new(config, now, rng);
    for event in events {
        appraiser.appraise(world, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Scene {
        world: GameWorld,
        square: EcsEntity,
        alice: EcsEntity,
        bob: EcsEntity,
        carol: EcsEntity,
    }

    fn scene() -> Scene {
        let mut world = GameWorld::new();
        let square = world.spawn((Room::new(),));
        let npc = |world: &mut GameWorld| {
            world.spawn((
                Npc,
                EmotionState::new(),
                Personality::default(),
                Memories::new(8),
                Location::new(square),
            ))
        };
        let alice = npc(&mut world);
        let bob = npc(&mut world);
        let carol = npc(&mut world);
        Scene { world, square, alice, bob, carol }
    }

    fn emotion(world: &GameWorld, npc: EcsEntity, emotion: Emotion) -> i32 {
        world.get::<&EmotionState>(npc).unwrap().get(emotion)
    }

    #[test]
    fn test_attack_records_both_sides() {
        let Scene { mut world, alice, bob, .. } = scene();
        let config = AffectConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        appraise_all(
            &mut world,
            &config,
            &[AffectEvent::Attacked { attacker: alice, defender: bob, damage: 30 }],
            Utc::now(),
            &mut rng,
        );
        assert!(emotion(&world, bob, Emotion::Anger) > 0);
        assert!(emotion(&world, bob, Emotion::Pain) > 0);
        let bob_memories = world.get::<&Memories>(bob).unwrap();
        let memory = bob_memories.received.iter().next().unwrap();
        assert_eq!(memory.interaction, Interaction::Attacked);
        assert!(memory.major);
        drop(bob_memories);
        assert_eq!(world.get::<&Memories>(alice).unwrap().active.len(), 1);
    }

    #[test]
    fn test_witness_scaled_and_recorded() {
        let Scene { mut world, alice, bob, carol, .. } = scene();
        let config = AffectConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        appraise_all(
            &mut world,
            &config,
            &[AffectEvent::Social { actor: alice, target: bob, name: "slap".into() }],
            Utc::now(),
            &mut rng,
        );
        assert!(emotion(&world, bob, Emotion::Anger) >= 8);
        let carol_fear = emotion(&world, carol, Emotion::Fear);
        assert!(carol_fear > 0 && carol_fear < 4);
        let carol_memories = world.get::<&Memories>(carol).unwrap();
        let seen = carol_memories.received.iter().next().unwrap();
        assert_eq!(seen.interaction, Interaction::Witnessed(SocialTone::Violent));
        assert_eq!(seen.target.key, MemoryKey::Session(alice));
        assert_eq!(seen.label.as_deref(), Some("slap"));
    }

    #[test]
    fn test_witness_sides_with_friend() {
        let Scene { mut world, alice, bob, carol, .. } = scene();
        let config = AffectConfig::default();
        let now = Utc::now();
        world.get::<&mut EmotionState>(carol).unwrap().set(Emotion::Friendship, 90);
        record(&mut world, carol, bob, MemoryDirection::Received, Interaction::Assisted, false, None, now);
        world.get::<&mut EmotionState>(carol).unwrap().set(Emotion::Friendship, 0);

        let mut rng = StdRng::seed_from_u64(3);
        appraise_all(
            &mut world,
            &config,
            &[AffectEvent::Social { actor: alice, target: bob, name: "insult".into() }],
            now,
            &mut rng,
        );
        assert!(emotion(&world, carol, Emotion::Anger) > 0);
    }

    #[test]
    fn test_unknown_social_is_ignored() {
        let Scene { mut world, alice, bob, .. } = scene();
        let mut rng = StdRng::seed_from_u64(4);
        appraise_all(
            &mut world,
            &AffectConfig::default(),
            &[AffectEvent::Social { actor: alice, target: bob, name: "ponder".into() }],
            Utc::now(),
            &mut rng,
        );
        assert!(world.get::<&Memories>(bob).unwrap().received.is_empty());
    }

    #[test]
    fn test_invalid_entities_are_noops() {
        let Scene { mut world, alice, bob, .. } = scene();
        let before = (*world.get::<&EmotionState>(alice).unwrap()).clone();
        world.despawn(bob).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        appraise_all(
            &mut world,
            &AffectConfig::default(),
            &[
                AffectEvent::Healed { healer: bob, target: alice, amount: 40 },
                AffectEvent::Stolen { thief: bob, victim: alice, item: None },
            ],
            Utc::now(),
            &mut rng,
        );
        assert_eq!(*world.get::<&EmotionState>(alice).unwrap(), before);
        assert!(world.get::<&Memories>(alice).unwrap().received.is_empty());
    }

    #[test]
    fn test_death_horrifies_room() {
        let Scene { mut world, square, alice, bob, carol } = scene();
        let mut rng = StdRng::seed_from_u64(6);
        appraise_all(
            &mut world,
            &AffectConfig::default(),
            &[AffectEvent::Died { entity: bob, killer: Some(alice) }],
            Utc::now(),
            &mut rng,
        );
        assert!(emotion(&world, carol, Emotion::Horror) > 0);
        assert_eq!(emotion(&world, alice, Emotion::Horror), 0);
        assert_eq!(occupants(&world, square).len(), 3);
    }

    #[test]
    fn test_despawn_forgets() {
        let Scene { mut world, alice, bob, .. } = scene();
        let config = AffectConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        appraise_all(
            &mut world,
            &config,
            &[AffectEvent::Assisted { helper: bob, helped: alice }],
            Utc::now(),
            &mut rng,
        );
        assert_eq!(world.get::<&Memories>(alice).unwrap().received.len(), 1);
        world.despawn(bob).unwrap();
        appraise_all(&mut world, &config, &[AffectEvent::Despawned { entity: bob }], Utc::now(), &mut rng);
        assert!(world.get::<&Memories>(alice).unwrap().received.is_empty());
    }
}
