//! Mob records and the per-mob AI state machine.
//!
//! Species stats are fixed tables; per-tick behavior is a pure step over a
//! small input snapshot so the scheduler can gather world queries up front
//! and apply side effects afterwards.

use boxcraft_core::ItemType;
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

/// Detection range for hostile mobs, in world units.
pub const DETECTION_RANGE: f64 = 16.0;
/// Fuse time before a fuse-type mob detonates, in milliseconds.
pub const FUSE_THRESHOLD_MS: f32 = 2000.0;
/// Cooldown between contact attacks, in milliseconds.
pub const ATTACK_COOLDOWN_MS: f32 = 1000.0;
/// How long the hurt timer runs after taking damage, in milliseconds.
pub const HURT_DURATION_MS: f32 = 500.0;
/// Chance per tick for an idle passive mob to start wandering.
pub const WANDER_CHANCE: f64 = 0.01;
/// A mob closer than this to its target has arrived.
pub const ARRIVAL_DISTANCE: f64 = 0.5;
/// How far a fleeing mob projects its escape point.
pub const FLEE_DISTANCE: f64 = 8.0;
/// Horizontal knockback speed applied on a melee hit, units per second.
pub const KNOCKBACK_SPEED: f64 = 6.0;

/// Types of mobs that can spawn in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobType {
    // Passive mobs
    /// Pig - common daytime spawn
    Pig,
    /// Cow - common daytime spawn
    Cow,
    /// Sheep - common daytime spawn
    Sheep,
    /// Chicken - common daytime spawn
    Chicken,

    // Hostile mobs
    /// Zombie - chases and attacks the player
    Zombie,
    /// Skeleton - chases and attacks the player
    Skeleton,
    /// Spider - fast hostile
    Spider,
    /// Creeper - closes in and detonates instead of attacking
    Creeper,
}

impl MobType {
    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            MobType::Pig => "pig",
            MobType::Cow => "cow",
            MobType::Sheep => "sheep",
            MobType::Chicken => "chicken",
            MobType::Zombie => "zombie",
            MobType::Skeleton => "skeleton",
            MobType::Spider => "spider",
            MobType::Creeper => "creeper",
        }
    }

    /// Parse a mob type from a string key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        match key.as_str() {
            "pig" => Some(MobType::Pig),
            "cow" => Some(MobType::Cow),
            "sheep" => Some(MobType::Sheep),
            "chicken" => Some(MobType::Chicken),
            "zombie" => Some(MobType::Zombie),
            "skeleton" => Some(MobType::Skeleton),
            "spider" => Some(MobType::Spider),
            "creeper" => Some(MobType::Creeper),
            _ => None,
        }
    }

    /// Check if this mob type is hostile.
    pub fn is_hostile(self) -> bool {
        matches!(
            self,
            MobType::Zombie | MobType::Skeleton | MobType::Spider | MobType::Creeper
        )
    }

    /// Check if this mob detonates instead of attacking.
    pub fn is_fuse(self) -> bool {
        matches!(self, MobType::Creeper)
    }

    /// Maximum health.
    pub fn max_health(self) -> f32 {
        match self {
            MobType::Pig => 10.0,
            MobType::Cow => 10.0,
            MobType::Sheep => 8.0,
            MobType::Chicken => 4.0,
            MobType::Zombie => 20.0,
            MobType::Skeleton => 20.0,
            MobType::Spider => 16.0,
            MobType::Creeper => 20.0,
        }
    }

    /// Movement speed in world units per second.
    pub fn move_speed(self) -> f64 {
        match self {
            MobType::Pig => 2.0,
            MobType::Cow => 1.8,
            MobType::Sheep => 1.9,
            MobType::Chicken => 2.2,
            MobType::Zombie => 2.3,
            MobType::Skeleton => 2.5,
            MobType::Spider => 2.8, // Spiders are fast
            MobType::Creeper => 2.0,
        }
    }

    /// Bounding radius, used to derive the melee reach.
    pub fn size(self) -> f64 {
        match self {
            MobType::Pig => 0.45,
            MobType::Cow => 0.7,
            MobType::Sheep => 0.45,
            MobType::Chicken => 0.3,
            MobType::Zombie => 0.6,
            MobType::Skeleton => 0.6,
            MobType::Spider => 0.7,
            MobType::Creeper => 0.5,
        }
    }

    /// Flat contact damage dealt per attack (0 for passive and fuse types).
    pub fn contact_damage(self) -> f32 {
        match self {
            MobType::Zombie => 3.0,
            MobType::Skeleton => 2.0,
            MobType::Spider => 2.0,
            _ => 0.0,
        }
    }

    /// Melee reach; fuse types trigger at this plus one.
    pub fn attack_range(self) -> f64 {
        self.size() + 1.5
    }

    /// Detection range for hostiles; passive mobs ignore the player.
    pub fn detection_range(self) -> f64 {
        if self.is_hostile() {
            DETECTION_RANGE
        } else {
            0.0
        }
    }

    /// Blast radius when this mob detonates.
    pub fn explosion_radius(self) -> i32 {
        match self {
            MobType::Creeper => 3,
            _ => 0,
        }
    }

    /// Blast damage at the detonation center.
    pub fn explosion_damage(self) -> f32 {
        match self {
            MobType::Creeper => 15.0,
            _ => 0.0,
        }
    }

    /// Item paid out when this mob dies.
    pub fn death_drop(self) -> (ItemType, u8) {
        match self {
            MobType::Pig => (ItemType::RawPork, 1),
            MobType::Cow => (ItemType::RawBeef, 1),
            MobType::Sheep => (ItemType::Wool, 1),
            MobType::Chicken => (ItemType::Feather, 1),
            MobType::Zombie => (ItemType::RottenFlesh, 1),
            MobType::Skeleton => (ItemType::Bone, 1),
            MobType::Spider => (ItemType::String, 1),
            MobType::Creeper => (ItemType::Gunpowder, 1),
        }
    }
}

/// Hostile spawn weights used by the admission check.
pub const HOSTILE_SPAWN_TABLE: &[(MobType, f32)] = &[
    (MobType::Zombie, 10.0),
    (MobType::Skeleton, 8.0),
    (MobType::Spider, 8.0),
    (MobType::Creeper, 6.0),
];

/// Passive spawn weights used by the admission check.
pub const PASSIVE_SPAWN_TABLE: &[(MobType, f32)] = &[
    (MobType::Pig, 10.0),
    (MobType::Sheep, 12.0),
    (MobType::Chicken, 10.0),
    (MobType::Cow, 8.0),
];

/// AI state for mob behavior. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MobState {
    /// Standing still
    Idle,
    /// Moving toward a random nearby target
    Wander,
    /// Closing on the player (hostile mobs)
    Chase,
    /// In melee reach, attacking on cooldown (hostile mobs)
    Attack,
    /// Running from the last damage source
    Flee,
    /// Fuse charging toward detonation (creeper-class)
    Fuse,
}

/// World queries gathered for one mob before its step runs.
#[derive(Debug, Clone, Copy)]
pub struct MobStepInput {
    /// Player position.
    pub player: [f64; 3],
    /// Euclidean distance from the mob to the player.
    pub player_distance: f64,
    /// Topmost ground Y under the mob (already defaulted for unloaded columns).
    pub ground_height: i32,
    /// Elapsed seconds this tick (caller-clamped).
    pub delta: f64,
}

/// Side effects requested by a mob step, applied by the scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobStepOutput {
    /// Contact damage to apply to the player this tick.
    pub attack_damage: Option<f32>,
    /// The mob's fuse expired; detonate at its position and remove it.
    pub detonate: bool,
}

/// A mob instance in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mob {
    /// Stable arena id (assigned by the world on spawn).
    #[serde(default)]
    pub id: u64,
    /// Species.
    pub mob_type: MobType,
    /// World X position.
    pub x: f64,
    /// World Y position.
    pub y: f64,
    /// World Z position.
    pub z: f64,
    /// Knockback velocity, X component.
    pub vel_x: f64,
    /// Knockback/fall velocity, Y component.
    pub vel_y: f64,
    /// Knockback velocity, Z component.
    pub vel_z: f64,
    /// Yaw the mob faces, radians.
    pub facing: f32,
    /// Current movement target, if any.
    pub target: Option<[f64; 3]>,
    /// Current AI state.
    pub state: MobState,
    /// Current health, clamped to `[0, max_health]`.
    pub health: f32,
    /// Remaining attack cooldown in milliseconds.
    pub attack_cooldown_ms: f32,
    /// Accumulated fuse in milliseconds (fuse types only).
    pub fuse_ms: f32,
    /// Remaining hurt timer in milliseconds.
    pub hurt_ms: f32,
    /// Where the last damage came from, for flee mirroring.
    pub last_damage_source: Option<[f64; 3]>,
    /// Marked for removal at the end of the tick.
    pub dead: bool,
}

impl Mob {
    /// Create a new mob at the given position.
    pub fn new(x: f64, y: f64, z: f64, mob_type: MobType) -> Self {
        Self {
            id: 0,
            mob_type,
            x,
            y,
            z,
            vel_x: 0.0,
            vel_y: 0.0,
            vel_z: 0.0,
            facing: 0.0,
            target: None,
            state: MobState::Idle,
            health: mob_type.max_health(),
            attack_cooldown_ms: 0.0,
            fuse_ms: 0.0,
            hurt_ms: 0.0,
            last_damage_source: None,
            dead: false,
        }
    }

    /// Apply damage from a source point. Returns true if the mob died.
    ///
    /// Health is clamped to `[0, max_health]`; the hurt timer starts and the
    /// mob is forced into [`MobState::Flee`].
    pub fn damage(&mut self, amount: f32, source: [f64; 3]) -> bool {
        self.health = (self.health - amount).clamp(0.0, self.mob_type.max_health());
        self.hurt_ms = HURT_DURATION_MS;
        self.last_damage_source = Some(source);
        self.state = MobState::Flee;
        self.target = Some(self.flee_target(source));
        if self.health <= 0.0 {
            self.dead = true;
            true
        } else {
            false
        }
    }

    /// Apply horizontal knockback away from a point.
    pub fn apply_knockback(&mut self, from_x: f64, from_z: f64) {
        let dx = self.x - from_x;
        let dz = self.z - from_z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > 1e-6 {
            self.vel_x = (dx / dist) * KNOCKBACK_SPEED;
            self.vel_z = (dz / dist) * KNOCKBACK_SPEED;
        }
    }

    /// Euclidean distance to a point.
    pub fn distance_to(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        let dz = self.z - z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Check if this mob is hostile.
    pub fn is_hostile(&self) -> bool {
        self.mob_type.is_hostile()
    }

    /// Point mirrored away from a damage source.
    fn flee_target(&self, source: [f64; 3]) -> [f64; 3] {
        let dx = self.x - source[0];
        let dz = self.z - source[2];
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > 1e-6 {
            [
                self.x + dx / dist * FLEE_DISTANCE,
                self.y,
                self.z + dz / dist * FLEE_DISTANCE,
            ]
        } else {
            [self.x + FLEE_DISTANCE, self.y, self.z]
        }
    }

    /// Run one AI step. World queries arrive pre-gathered in `input`; side
    /// effects (player damage, detonation) are returned for the scheduler to
    /// apply once the mob borrow ends.
    pub fn step(&mut self, input: &MobStepInput, rng: &mut StdRng) -> MobStepOutput {
        let mut out = MobStepOutput::default();
        let delta_ms = (input.delta * 1000.0) as f32;

        if self.attack_cooldown_ms > 0.0 {
            self.attack_cooldown_ms = (self.attack_cooldown_ms - delta_ms).max(0.0);
        }
        if self.hurt_ms > 0.0 {
            self.hurt_ms = (self.hurt_ms - delta_ms).max(0.0);
        }

        if self.hurt_ms > 0.0 && self.state == MobState::Flee {
            // Fleeing dominates until the hurt timer runs out.
        } else if self.is_hostile() {
            self.step_hostile(input, delta_ms, &mut out);
        } else {
            self.step_passive(rng);
        }

        self.locomote(input.delta);
        self.apply_gravity(input);

        out
    }

    fn step_hostile(&mut self, input: &MobStepInput, delta_ms: f32, out: &mut MobStepOutput) {
        let distance = input.player_distance;
        let detection = self.mob_type.detection_range();
        let attack_range = self.mob_type.attack_range();

        if self.mob_type.is_fuse() {
            let fuse_range = attack_range + 1.0;
            if distance <= fuse_range {
                self.state = MobState::Fuse;
                self.target = None;
                self.fuse_ms += delta_ms;
                if self.fuse_ms >= FUSE_THRESHOLD_MS {
                    out.detonate = true;
                    self.dead = true;
                }
                return;
            }
            // Defusing: the fuse unwinds at half rate, never below zero.
            self.fuse_ms = (self.fuse_ms - delta_ms * 0.5).max(0.0);
            if distance <= detection {
                self.state = MobState::Chase;
                self.target = Some(input.player);
            } else if self.state == MobState::Chase
                || (self.state == MobState::Fuse && self.fuse_ms <= 0.0)
            {
                self.state = MobState::Wander;
                self.target = None;
            }
            return;
        }

        if distance <= attack_range {
            self.state = MobState::Attack;
            self.target = None;
            if self.attack_cooldown_ms <= 0.0 {
                out.attack_damage = Some(self.mob_type.contact_damage());
                self.attack_cooldown_ms = ATTACK_COOLDOWN_MS;
            }
        } else if distance <= detection {
            self.state = MobState::Chase;
            self.target = Some(input.player);
        } else if self.state == MobState::Chase || self.state == MobState::Attack {
            // Lost the player; only a chasing mob falls back to wandering.
            self.state = MobState::Wander;
            self.target = None;
        }
    }

    fn step_passive(&mut self, rng: &mut StdRng) {
        if self.state == MobState::Idle && rng.gen_bool(WANDER_CHANCE) {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let dist = rng.gen_range(3.0..10.0);
            self.state = MobState::Wander;
            self.target = Some([
                self.x + angle.cos() * dist,
                self.y,
                self.z + angle.sin() * dist,
            ]);
        }
    }

    /// Integrate toward the current target along the XZ plane, plus any
    /// residual knockback velocity.
    fn locomote(&mut self, delta: f64) {
        let moving = matches!(
            self.state,
            MobState::Wander | MobState::Chase | MobState::Flee
        );
        if moving {
            if let Some(target) = self.target {
                let dx = target[0] - self.x;
                let dz = target[2] - self.z;
                let dist = (dx * dx + dz * dz).sqrt();
                if dist < ARRIVAL_DISTANCE {
                    self.target = None;
                    self.state = MobState::Idle;
                } else {
                    let speed = self.mob_type.move_speed();
                    let step = (speed * delta).min(dist);
                    self.x += dx / dist * step;
                    self.z += dz / dist * step;
                    self.facing = dz.atan2(dx) as f32;
                }
            }
        }

        // Knockback decays whether or not the mob is walking.
        if self.vel_x.abs() > 1e-3 || self.vel_z.abs() > 1e-3 {
            self.x += self.vel_x * delta;
            self.z += self.vel_z * delta;
            self.vel_x *= 0.8;
            self.vel_z *= 0.8;
        } else {
            self.vel_x = 0.0;
            self.vel_z = 0.0;
        }
    }

    /// Fall toward the sampled ground height, snapping when within one unit.
    fn apply_gravity(&mut self, input: &MobStepInput) {
        let stand_y = input.ground_height as f64 + 1.0;
        if self.y > stand_y + 1.0 {
            self.vel_y -= 20.0 * input.delta;
            self.y += self.vel_y * input.delta;
            if self.y < stand_y {
                self.y = stand_y;
                self.vel_y = 0.0;
            }
        } else {
            self.y = stand_y;
            self.vel_y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxcraft_core::{scoped_rng, SimTick};

    fn step_input(distance: f64) -> MobStepInput {
        MobStepInput {
            player: [distance, 65.0, 0.0],
            player_distance: distance,
            ground_height: 64,
            delta: 0.05,
        }
    }

    fn rng() -> rand::rngs::StdRng {
        scoped_rng(42, 0, SimTick::ZERO)
    }

    #[test]
    fn hostile_chases_inside_detection_range() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Zombie);
        mob.step(&step_input(10.0), &mut rng());
        assert_eq!(mob.state, MobState::Chase);
        assert!(mob.target.is_some());
        assert!(mob.x > 0.0, "chasing mob should close the gap");
    }

    #[test]
    fn hostile_falls_back_to_wander_only_from_chase() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Zombie);
        mob.state = MobState::Chase;
        mob.step(&step_input(100.0), &mut rng());
        assert_eq!(mob.state, MobState::Wander);

        let mut idle = Mob::new(0.0, 65.0, 0.0, MobType::Zombie);
        idle.step(&step_input(100.0), &mut rng());
        assert_eq!(idle.state, MobState::Idle);
    }

    #[test]
    fn attack_respects_cooldown() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Zombie);
        let input = step_input(1.0);
        let out = mob.step(&input, &mut rng());
        assert_eq!(out.attack_damage, Some(3.0));
        assert_eq!(mob.state, MobState::Attack);

        // Immediately after, the cooldown gates the next swing.
        let out = mob.step(&input, &mut rng());
        assert_eq!(out.attack_damage, None);
    }

    #[test]
    fn fuse_accumulates_and_detonates_crossing_threshold() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Creeper);
        let input = step_input(1.0);
        let ticks_needed = (FUSE_THRESHOLD_MS / 50.0).ceil() as usize;
        let mut detonated = false;
        for _ in 0..ticks_needed {
            let out = mob.step(&input, &mut rng());
            if out.detonate {
                detonated = true;
                break;
            }
            assert_eq!(mob.state, MobState::Fuse);
        }
        assert!(detonated, "fuse must fire once the threshold is crossed");
        assert!(mob.dead);
    }

    #[test]
    fn fuse_decays_at_half_rate_and_never_negative() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Creeper);
        mob.fuse_ms = 100.0;
        mob.state = MobState::Fuse;
        // Out of trigger range but inside detection.
        let input = step_input(10.0);
        mob.step(&input, &mut rng());
        assert_eq!(mob.fuse_ms, 75.0); // 50ms tick decays 25ms
        for _ in 0..20 {
            mob.step(&input, &mut rng());
        }
        assert_eq!(mob.fuse_ms, 0.0);
        assert_eq!(mob.state, MobState::Chase);
    }

    #[test]
    fn damage_clamps_health_and_forces_flee() {
        let mut mob = Mob::new(5.0, 65.0, 5.0, MobType::Pig);
        assert!(!mob.damage(4.0, [0.0, 65.0, 0.0]));
        assert_eq!(mob.health, 6.0);
        assert_eq!(mob.state, MobState::Flee);
        let target = mob.target.unwrap();
        // Flee target is mirrored away from the source.
        assert!(target[0] > mob.x && target[2] > mob.z);

        assert!(mob.damage(100.0, [0.0, 65.0, 0.0]));
        assert_eq!(mob.health, 0.0);
        assert!(mob.dead);
    }

    #[test]
    fn gravity_snaps_to_ground_within_one_unit() {
        let mut mob = Mob::new(0.0, 80.0, 0.0, MobType::Sheep);
        let input = step_input(50.0);
        for _ in 0..200 {
            mob.step(&input, &mut rng());
        }
        assert_eq!(mob.y, 65.0);
        assert_eq!(mob.vel_y, 0.0);
    }

    #[test]
    fn wander_arrival_reverts_to_idle() {
        let mut mob = Mob::new(0.0, 65.0, 0.0, MobType::Pig);
        mob.state = MobState::Wander;
        mob.target = Some([1.0, 65.0, 0.0]);
        let input = step_input(50.0);
        for _ in 0..40 {
            mob.step(&input, &mut rng());
            if mob.state == MobState::Idle {
                break;
            }
        }
        assert_eq!(mob.state, MobState::Idle);
        assert!(mob.target.is_none());
    }

    #[test]
    fn spawn_tables_are_category_consistent() {
        for (mob_type, weight) in HOSTILE_SPAWN_TABLE {
            assert!(mob_type.is_hostile());
            assert!(*weight > 0.0);
        }
        for (mob_type, weight) in PASSIVE_SPAWN_TABLE {
            assert!(!mob_type.is_hostile());
            assert!(*weight > 0.0);
        }
    }
}
