//! Mob lifecycle scheduling: spawn admission, per-tick AI updates, combat
//! resolution, despawn, and death payout.
//!
//! The scheduler owns no world state. It is handed the [`World`] and the
//! [`BlockEventSystem`] each tick; detonations requested by fuse mobs are
//! routed through the latter so mob blasts and TNT blasts share one path.

use crate::block_event::BlockEventSystem;
use crate::mob::{
    Mob, MobStepInput, MobType, HOSTILE_SPAWN_TABLE, PASSIVE_SPAWN_TABLE,
};
use crate::time::SimTime;
use crate::world::World;
use boxcraft_core::scoped_rng;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

/// Largest tick delta the scheduler will integrate; callers are expected to
/// clamp, this is the backstop.
pub const MAX_TICK_DELTA: f64 = 0.1;

/// Radius scanned around the origin by [`attack_mob`].
pub const ATTACK_SCAN_RADIUS: f64 = 3.0;

// RNG domains, disjoint from mob ids.
const SPAWN_DOMAIN: u64 = 0x5350_4157_4E41_444D; // "SPAWNADM"

/// Tunables for spawn admission and despawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Hard cap on the live mob population.
    pub mob_cap: usize,
    /// Ticks between spawn admission attempts.
    pub spawn_interval_ticks: u64,
    /// Inner edge of the spawn distance band around the player.
    pub min_spawn_radius: f64,
    /// Outer edge of the spawn distance band.
    pub max_spawn_radius: f64,
    /// Mobs farther than this from the player are removed immediately.
    pub despawn_distance: f64,
    /// Candidates whose ground sits below this height are rejected.
    pub min_spawn_height: i32,
    /// Chance the species draw crosses the day/night category.
    pub wrong_category_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            mob_cap: 30,
            spawn_interval_ticks: 60,
            min_spawn_radius: 24.0,
            max_spawn_radius: 80.0,
            despawn_distance: 128.0,
            min_spawn_height: 1,
            wrong_category_chance: 0.1,
        }
    }
}

/// Per-tick driver for the mob population.
pub struct MobScheduler {
    config: SpawnConfig,
    ticks_since_spawn: u64,
}

impl MobScheduler {
    /// Create a scheduler with the given spawn tuning.
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            ticks_since_spawn: 0,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Advance every mob by one tick.
    ///
    /// Update order per mob: despawn check first (it dominates all other
    /// state), then the AI step, then side effects. Removals are collected
    /// and applied once at the end of the tick so ids stay stable while
    /// iterating.
    pub fn tick(
        &mut self,
        world: &mut World,
        events: &mut BlockEventSystem,
        time: &SimTime,
        delta: f64,
    ) {
        let delta = delta.clamp(0.0, MAX_TICK_DELTA);
        let tick = time.tick;

        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= self.config.spawn_interval_ticks {
            self.ticks_since_spawn = 0;
            self.try_spawn(world, time);
        }

        let player = world.player_position();
        let mut removals: Vec<u64> = Vec::new();
        let mut detonations: Vec<([f64; 3], i32, f32)> = Vec::new();
        let mut player_damage = 0.0f32;

        for id in world.mob_ids() {
            let Some(mob) = world.mob(id) else { continue };
            let (x, y, z) = (mob.x, mob.y, mob.z);
            let mob_type = mob.mob_type;
            let already_dead = mob.dead || mob.health <= 0.0;

            let distance = ((x - player[0]).powi(2)
                + (y - player[1]).powi(2)
                + (z - player[2]).powi(2))
            .sqrt();
            if distance > self.config.despawn_distance {
                tracing::debug!(id, kind = mob_type.as_str(), distance, "Mob despawned");
                removals.push(id);
                continue;
            }

            // Deaths from combat between ticks pay out before the AI step.
            if already_dead {
                self.pay_death_drop(world, mob_type);
                removals.push(id);
                continue;
            }

            let input = MobStepInput {
                player,
                player_distance: distance,
                ground_height: world.ground_height(x, z),
                delta,
            };
            let mut rng = scoped_rng(world.seed(), id, tick);
            let out = match world.mob_mut(id) {
                Some(mob) => mob.step(&input, &mut rng),
                None => continue,
            };

            if let Some(damage) = out.attack_damage {
                player_damage += damage;
            }

            let Some(mob) = world.mob(id) else { continue };
            if out.detonate {
                detonations.push(([mob.x, mob.y, mob.z], mob_type.explosion_radius(), mob_type.explosion_damage()));
                removals.push(id);
            } else if mob.dead || mob.health <= 0.0 {
                self.pay_death_drop(world, mob_type);
                removals.push(id);
            }
        }

        if player_damage > 0.0 {
            world.apply_player_damage(player_damage);
        }
        for (center, radius, base_damage) in detonations {
            events.detonate(world, center, radius, base_damage, tick);
        }
        for id in removals {
            world.remove_mob(id);
        }
    }

    fn pay_death_drop(&self, world: &mut World, mob_type: MobType) {
        let (item, count) = mob_type.death_drop();
        if !world.add_inventory_item(item, count) {
            tracing::debug!(kind = mob_type.as_str(), "Death drop rejected, inventory full");
        }
    }

    /// Spawn admission: at most one candidate per interval, rejected silently
    /// when the cap, distance band, or ground checks fail.
    fn try_spawn(&self, world: &mut World, time: &SimTime) {
        if world.mob_count() >= self.config.mob_cap {
            tracing::debug!(cap = self.config.mob_cap, "Spawn rejected, population cap");
            return;
        }

        let mut rng = scoped_rng(world.seed(), SPAWN_DOMAIN, time.tick);
        let player = world.player_position();
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let radius = rng.gen_range(self.config.min_spawn_radius..self.config.max_spawn_radius);
        let x = player[0] + angle.cos() * radius;
        let z = player[2] + angle.sin() * radius;

        let ground = world.ground_height(x, z);
        if ground < self.config.min_spawn_height {
            tracing::debug!(x, z, ground, "Spawn rejected, no valid ground");
            return;
        }

        let mob_type = self.pick_species(time.is_night(), &mut rng);
        let id = world.spawn_mob(Mob::new(x, ground as f64 + 1.0, z, mob_type));
        tracing::debug!(id, kind = mob_type.as_str(), x, z, "Mob spawned");
    }

    /// Weighted species draw: night favors hostiles, day favors passives,
    /// with a residual chance of the other category.
    fn pick_species(&self, night: bool, rng: &mut StdRng) -> MobType {
        let hostile = if rng.gen_bool(self.config.wrong_category_chance) {
            !night
        } else {
            night
        };
        let table = if hostile {
            HOSTILE_SPAWN_TABLE
        } else {
            PASSIVE_SPAWN_TABLE
        };

        let total: f32 = table.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen_range(0.0..total);
        for (mob_type, weight) in table {
            if roll < *weight {
                return *mob_type;
            }
            roll -= weight;
        }
        table[table.len() - 1].0
    }
}

impl Default for MobScheduler {
    fn default() -> Self {
        Self::new(SpawnConfig::default())
    }
}

/// Resolve a melee swing from `origin` along `direction`.
///
/// Scans mobs within [`ATTACK_SCAN_RADIUS`] and accepts the first (not the
/// nearest) whose relative position points the same way as `direction`.
/// At most one mob is hit per call. Returns whether a hit landed.
pub fn attack_mob(world: &mut World, origin: [f64; 3], direction: [f64; 3], damage: f32) -> bool {
    for id in world.mob_ids() {
        let Some(mob) = world.mob(id) else { continue };
        let rel = [mob.x - origin[0], mob.y - origin[1], mob.z - origin[2]];
        let dist = (rel[0] * rel[0] + rel[1] * rel[1] + rel[2] * rel[2]).sqrt();
        if dist > ATTACK_SCAN_RADIUS {
            continue;
        }
        let dot = rel[0] * direction[0] + rel[1] * direction[1] + rel[2] * direction[2];
        if dot <= 0.0 {
            continue;
        }

        let kind = mob.mob_type.as_str();
        if let Some(mob) = world.mob_mut(id) {
            let died = mob.damage(damage, origin);
            mob.apply_knockback(origin[0], origin[2]);
            tracing::debug!(id, kind, damage, died, "Mob hit");
        }
        return true;
    }
    false
}
