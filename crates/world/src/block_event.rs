//! Block-triggered world events: ignition, explosion carving with chain
//! reactions, deferred batch flushing, and linked block pairs (doors, beds).
//!
//! Fuses are tick-counted on the primed record itself, so timing is
//! deterministic and a fuse is cancelled by clearing its validity flag
//! rather than by unwinding a timer queue.

use crate::chunk::{
    block_flags, BlockFlags, BlockPos, BLOCK_BED_FOOT, BLOCK_BED_HEAD, BLOCK_OAK_DOOR,
};
use crate::world::World;
use boxcraft_core::{position_domain, scoped_rng, SimTick};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Neighbor offsets scanned for the second half of a two-cell structure.
const PAIR_NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Tunables for ignition and explosion resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Carve radius of a standard explosion.
    pub radius: i32,
    /// Fuse length applied by [`BlockEventSystem::ignite`], in ticks.
    pub fuse_ticks: u32,
    /// Hard cap on simultaneously primed explosives.
    pub primed_cap: usize,
    /// Carve batches above this size are deferred across ticks.
    pub batch_limit: usize,
    /// Player damage at the blast center.
    pub base_damage: f32,
    /// Shortest fuse a chain-ignited explosive can get.
    pub chain_fuse_min: u32,
    /// Longest fuse a chain-ignited explosive can get.
    pub chain_fuse_max: u32,
    /// Survival chance for cells in the outer shell (beyond 60% of radius).
    pub shell_survival_chance: f64,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            fuse_ticks: 80,
            primed_cap: 350,
            batch_limit: 256,
            base_damage: 20.0,
            chain_fuse_min: 5,
            chain_fuse_max: 20,
            shell_survival_chance: 0.3,
        }
    }
}

/// Per-tick driver for primed explosives and linked block pairs.
pub struct BlockEventSystem {
    config: ExplosionConfig,
    /// Deferred carve batches, flushed one per tick.
    pending: VecDeque<Vec<BlockPos>>,
    /// Open linked cells, keyed by position, mapped to the original block id.
    linked: HashMap<BlockPos, u16>,
}

impl BlockEventSystem {
    /// Create a propagator with the given explosion tuning.
    pub fn new(config: ExplosionConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            linked: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Number of carve batches still waiting to flush.
    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    /// Convert an explosive block into a primed explosive.
    ///
    /// Rejected (silently, at debug level) once the primed population hits
    /// the cap, and for cells that aren't an explosive block.
    pub fn ignite(&mut self, world: &mut World, pos: BlockPos) -> bool {
        if world.primed_explosive_count() >= self.config.primed_cap {
            tracing::debug!(%pos, cap = self.config.primed_cap, "Ignition rejected, primed cap");
            return false;
        }
        let Some(id) = world.block(pos) else {
            return false;
        };
        if !block_flags(id).contains(BlockFlags::EXPLOSIVE) {
            return false;
        }
        world.remove_block(pos);
        world.spawn_primed_explosive(pos, self.config.fuse_ticks);
        tracing::debug!(%pos, fuse_ticks = self.config.fuse_ticks, "Explosive primed");
        true
    }

    /// Advance fuses and deferred work by one tick.
    ///
    /// At most one pending carve batch is flushed per tick; a flushed batch
    /// is fully applied before this returns, so the world is never left
    /// mid-batch.
    pub fn tick(&mut self, world: &mut World, tick: SimTick) {
        if let Some(batch) = self.pending.pop_front() {
            let removed = world.remove_blocks(&batch);
            tracing::debug!(removed, remaining = self.pending.len(), "Flushed carve batch");
        }

        let mut expired: Vec<BlockPos> = Vec::new();
        {
            let primed = world.primed_mut();
            for p in primed.iter_mut() {
                if p.fuse_ticks > 0 {
                    p.fuse_ticks -= 1;
                }
            }
            primed.retain(|p| {
                if !p.valid {
                    return false;
                }
                if p.fuse_ticks == 0 {
                    expired.push(p.pos);
                    return false;
                }
                true
            });
        }

        for pos in expired {
            let center = [
                pos.x as f64 + 0.5,
                pos.y as f64 + 0.5,
                pos.z as f64 + 0.5,
            ];
            self.detonate(world, center, self.config.radius, self.config.base_damage, tick);
        }
    }

    /// Resolve an explosion at `center`.
    ///
    /// Scans the bounding cube, keeping only cells within true Euclidean
    /// distance of the radius. Blast-immune materials always survive, cells
    /// in the outer shell get a randomized survival roll, and explosive
    /// cells chain-ignite with a short randomized fuse instead of being
    /// destroyed. Small carve sets apply synchronously; large ones are
    /// split into batches flushed on subsequent ticks.
    pub fn detonate(
        &mut self,
        world: &mut World,
        center: [f64; 3],
        radius: i32,
        base_damage: f32,
        tick: SimTick,
    ) {
        let cx = center[0].floor() as i32;
        let cy = center[1].floor() as i32;
        let cz = center[2].floor() as i32;
        let r = radius as f64;
        let shell = r * 0.6;

        let mut destroyed: Vec<(BlockPos, u16)> = Vec::new();
        let mut chained = 0usize;

        for x in cx - radius..=cx + radius {
            for y in cy - radius..=cy + radius {
                for z in cz - radius..=cz + radius {
                    let pos = BlockPos::new(x, y, z);
                    let dist = pos.distance_to_point(center[0], center[1], center[2]);
                    if dist > r {
                        continue;
                    }
                    let Some(id) = world.block(pos) else {
                        continue;
                    };
                    let flags = block_flags(id);
                    if flags.contains(BlockFlags::BLAST_IMMUNE) {
                        continue;
                    }
                    if dist > shell {
                        let mut rng =
                            scoped_rng(world.seed(), position_domain(x, y, z), tick);
                        if rng.gen_bool(self.config.shell_survival_chance) {
                            continue;
                        }
                    }
                    if flags.contains(BlockFlags::EXPLOSIVE) {
                        // Chain reaction: re-ignite with a short fuse.
                        if world.primed_explosive_count() < self.config.primed_cap {
                            let mut rng =
                                scoped_rng(world.seed(), position_domain(x, y, z), tick);
                            let fuse = rng
                                .gen_range(self.config.chain_fuse_min..=self.config.chain_fuse_max);
                            world.remove_block(pos);
                            world.spawn_primed_explosive(pos, fuse);
                            chained += 1;
                        }
                        continue;
                    }
                    destroyed.push((pos, id));
                }
            }
        }

        // A destroyed half of a two-cell structure takes its partner along.
        let mut cells: Vec<BlockPos> = destroyed.iter().map(|(pos, _)| *pos).collect();
        for (pos, id) in &destroyed {
            if let Some(partner) = find_pair_partner(world, *pos, *id) {
                if !cells.contains(&partner) {
                    cells.push(partner);
                }
            }
            self.linked.remove(pos);
        }

        let carved = cells.len();
        if carved <= self.config.batch_limit {
            world.remove_blocks(&cells);
        } else {
            for batch in cells.chunks(self.config.batch_limit) {
                self.pending.push_back(batch.to_vec());
            }
        }

        let player = world.player_position();
        let damage_radius = r * 2.0;
        let player_dist = ((player[0] - center[0]).powi(2)
            + (player[1] - center[1]).powi(2)
            + (player[2] - center[2]).powi(2))
        .sqrt();
        if player_dist < damage_radius {
            let damage = (base_damage as f64 * (1.0 - player_dist / damage_radius)).round();
            if damage > 0.0 {
                world.apply_player_damage(damage as f32);
            }
        }

        tracing::info!(
            x = cx,
            y = cy,
            z = cz,
            radius,
            carved,
            chained,
            deferred = self.pending.len(),
            "Explosion resolved"
        );
    }

    /// Toggle a door cell.
    ///
    /// Opening removes the block and records the original id under the
    /// position key; closing restores the recorded block and drops the key.
    /// Stale state (the cell changed under us) degrades to a no-op.
    pub fn toggle_door(&mut self, world: &mut World, pos: BlockPos) -> bool {
        if let Some(&original) = self.linked.get(&pos) {
            self.linked.remove(&pos);
            if world.block(pos).is_some() {
                // Something else occupies the cell; restoring would clobber it.
                return false;
            }
            world.set_block(pos, original);
            return true;
        }

        let Some(id) = world.block(pos) else {
            return false;
        };
        if id != BLOCK_OAK_DOOR {
            return false;
        }
        world.remove_block(pos);
        self.linked.insert(pos, id);
        true
    }

    /// Toggle a two-cell bed. Both halves open and close together.
    pub fn toggle_bed(&mut self, world: &mut World, pos: BlockPos) -> bool {
        if let Some(&original) = self.linked.get(&pos) {
            self.linked.remove(&pos);
            if world.block(pos).is_none() {
                world.set_block(pos, original);
            }
            // Restore the partner key recorded next to this one.
            for (dx, dz) in PAIR_NEIGHBOR_OFFSETS {
                let neighbor = BlockPos::new(pos.x + dx, pos.y, pos.z + dz);
                if let Some(&partner_id) = self.linked.get(&neighbor) {
                    if is_bed_half(partner_id) {
                        self.linked.remove(&neighbor);
                        if world.block(neighbor).is_none() {
                            world.set_block(neighbor, partner_id);
                        }
                        break;
                    }
                }
            }
            return true;
        }

        let Some(id) = world.block(pos) else {
            return false;
        };
        if !is_bed_half(id) {
            return false;
        }
        let partner = find_pair_partner(world, pos, id);
        world.remove_block(pos);
        self.linked.insert(pos, id);
        if let Some(partner_pos) = partner {
            if let Some(partner_id) = world.block(partner_pos) {
                world.remove_block(partner_pos);
                self.linked.insert(partner_pos, partner_id);
            }
        }
        true
    }

    /// Break a bed half directly, removing its partner for consistency.
    pub fn break_bed(&mut self, world: &mut World, pos: BlockPos) -> bool {
        let Some(id) = world.block(pos) else {
            return false;
        };
        if !is_bed_half(id) {
            return false;
        }
        let partner = find_pair_partner(world, pos, id);
        world.remove_block(pos);
        self.linked.remove(&pos);
        if let Some(partner_pos) = partner {
            world.remove_block(partner_pos);
            self.linked.remove(&partner_pos);
        }
        true
    }

    /// Whether a position is currently recorded as open.
    pub fn is_open(&self, pos: BlockPos) -> bool {
        self.linked.contains_key(&pos)
    }
}

impl Default for BlockEventSystem {
    fn default() -> Self {
        Self::new(ExplosionConfig::default())
    }
}

fn is_bed_half(id: u16) -> bool {
    id == BLOCK_BED_HEAD || id == BLOCK_BED_FOOT
}

/// Locate the other half of a two-cell structure among axis-aligned
/// neighbors, if the destroyed cell was one.
fn find_pair_partner(world: &World, pos: BlockPos, id: u16) -> Option<BlockPos> {
    let partner_id = match id {
        BLOCK_BED_HEAD => BLOCK_BED_FOOT,
        BLOCK_BED_FOOT => BLOCK_BED_HEAD,
        _ => return None,
    };
    for (dx, dz) in PAIR_NEIGHBOR_OFFSETS {
        let neighbor = BlockPos::new(pos.x + dx, pos.y, pos.z + dz);
        if world.block(neighbor) == Some(partner_id) {
            return Some(neighbor);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{BLOCK_BEDROCK, BLOCK_OBSIDIAN, BLOCK_STONE, BLOCK_TNT, BLOCK_WATER};

    fn exact_config() -> ExplosionConfig {
        // No shell randomness so carve sets are exactly the Euclidean ball.
        ExplosionConfig {
            shell_survival_chance: 0.0,
            ..ExplosionConfig::default()
        }
    }

    fn stone_box(world: &mut World, center: BlockPos, half: i32) {
        for x in center.x - half..=center.x + half {
            for y in center.y - half..=center.y + half {
                for z in center.z - half..=center.z + half {
                    world.set_block(BlockPos::new(x, y, z), BLOCK_STONE);
                }
            }
        }
    }

    #[test]
    fn ignite_primes_and_respects_cap() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(ExplosionConfig {
            primed_cap: 1,
            ..exact_config()
        });

        let a = BlockPos::new(0, 64, 0);
        let b = BlockPos::new(2, 64, 0);
        world.set_block(a, BLOCK_TNT);
        world.set_block(b, BLOCK_TNT);

        assert!(system.ignite(&mut world, a));
        assert_eq!(world.block(a), None);
        assert_eq!(world.primed_explosive_count(), 1);

        // Cap reached: second ignition is silently rejected.
        assert!(!system.ignite(&mut world, b));
        assert_eq!(world.block(b), Some(BLOCK_TNT));

        // Non-explosive cells can't be primed.
        let c = BlockPos::new(4, 64, 0);
        world.set_block(c, BLOCK_STONE);
        assert!(!system.ignite(&mut world, c));
    }

    #[test]
    fn fuse_counts_down_in_ticks_and_fires_once() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(ExplosionConfig {
            fuse_ticks: 10,
            ..exact_config()
        });
        let center = BlockPos::new(8, 64, 8);
        stone_box(&mut world, center, 6);
        world.set_block(center, BLOCK_TNT);
        assert!(system.ignite(&mut world, center));

        let mut tick = SimTick::ZERO;
        for _ in 0..9 {
            system.tick(&mut world, tick);
            tick = tick.advance(1);
        }
        // Fuse still running: nearby stone untouched.
        assert_eq!(world.block(BlockPos::new(9, 64, 8)), Some(BLOCK_STONE));
        assert_eq!(world.primed_explosive_count(), 1);

        system.tick(&mut world, tick);
        assert_eq!(world.primed_explosive_count(), 0);
        assert_eq!(world.block(BlockPos::new(9, 64, 8)), None);
    }

    #[test]
    fn invalidated_fuse_never_detonates() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(ExplosionConfig {
            fuse_ticks: 3,
            ..exact_config()
        });
        let center = BlockPos::new(8, 64, 8);
        stone_box(&mut world, center, 5);
        world.set_block(center, BLOCK_TNT);
        system.ignite(&mut world, center);
        world.invalidate_primed_at(center);

        let mut tick = SimTick::ZERO;
        for _ in 0..5 {
            system.tick(&mut world, tick);
            tick = tick.advance(1);
        }
        assert_eq!(world.primed_explosive_count(), 0);
        assert_eq!(world.block(BlockPos::new(9, 64, 8)), Some(BLOCK_STONE));
    }

    #[test]
    fn explosion_is_bounded_and_skips_immune_blocks() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let center = BlockPos::new(10, 10, 10);
        stone_box(&mut world, center, 6);
        world.set_block(BlockPos::new(10, 10, 7), BLOCK_BEDROCK);
        world.set_block(BlockPos::new(11, 10, 10), BLOCK_OBSIDIAN);
        world.set_block(BlockPos::new(10, 11, 10), BLOCK_WATER);

        system.detonate(&mut world, [10.5, 10.5, 10.5], 4, 0.0, SimTick::ZERO);

        // Inside the radius: carved.
        assert_eq!(world.block(BlockPos::new(13, 10, 10)), None); // distance 3
        assert_eq!(world.block(BlockPos::new(10, 10, 10)), None);
        // Immune materials survive even well inside.
        assert_eq!(world.block(BlockPos::new(10, 10, 7)), Some(BLOCK_BEDROCK));
        assert_eq!(world.block(BlockPos::new(11, 10, 10)), Some(BLOCK_OBSIDIAN));
        assert_eq!(world.block(BlockPos::new(10, 11, 10)), Some(BLOCK_WATER));
        // Strictly beyond the radius: untouched.
        assert_eq!(world.block(BlockPos::new(15, 10, 10)), Some(BLOCK_STONE)); // distance 5
        assert_eq!(world.block(BlockPos::new(10, 15, 10)), Some(BLOCK_STONE));
    }

    #[test]
    fn chained_explosive_is_primed_not_destroyed() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(ExplosionConfig {
            fuse_ticks: 2,
            ..exact_config()
        });
        let a = BlockPos::new(8, 64, 8);
        let b = BlockPos::new(10, 64, 8);
        stone_box(&mut world, a, 5);
        world.set_block(a, BLOCK_TNT);
        world.set_block(b, BLOCK_TNT);

        system.ignite(&mut world, a);
        let mut tick = SimTick::ZERO;
        system.tick(&mut world, tick);
        tick = tick.advance(1);
        system.tick(&mut world, tick);

        // A detonated; B was re-ignited with its own fuse rather than carved.
        assert_eq!(world.block(b), None);
        assert_eq!(world.primed_explosive_count(), 1);
        let primed = world.primed_explosives()[0];
        assert_eq!(primed.pos, b);
        assert!(primed.fuse_ticks >= 1 && primed.fuse_ticks <= 20);
    }

    #[test]
    fn oversized_carve_defers_across_ticks() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(ExplosionConfig {
            batch_limit: 8,
            ..exact_config()
        });
        let center = BlockPos::new(8, 64, 8);
        stone_box(&mut world, center, 4);

        system.detonate(&mut world, [8.5, 64.5, 8.5], 2, 0.0, SimTick::ZERO);
        // Nothing carved synchronously; the ball (33 cells at radius 2) was
        // split into 8-cell batches.
        assert!(system.pending_batches() >= 4);
        assert_eq!(world.block(center), Some(BLOCK_STONE));

        let mut tick = SimTick(1);
        let mut flushed_ticks = 0;
        while system.pending_batches() > 0 {
            system.tick(&mut world, tick);
            tick = tick.advance(1);
            flushed_ticks += 1;
            assert!(flushed_ticks < 64, "pending batches never drained");
        }
        assert_eq!(world.block(center), None);
        assert_eq!(world.block(BlockPos::new(10, 64, 8)), None); // distance 2
    }

    #[test]
    fn explosion_damage_falls_off_linearly() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        world.set_player_position(14.5, 10.5, 10.5); // distance 4 from center

        system.detonate(&mut world, [10.5, 10.5, 10.5], 4, 20.0, SimTick::ZERO);
        // damage = round(20 * (1 - 4/8)) = 10
        assert_eq!(world.player_health(), 10.0);

        // Outside the damage radius: no effect.
        world.set_player_position(100.0, 10.5, 10.5);
        system.detonate(&mut world, [10.5, 10.5, 10.5], 4, 20.0, SimTick::ZERO);
        assert_eq!(world.player_health(), 10.0);
    }

    #[test]
    fn door_toggle_restores_original_block() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let pos = BlockPos::new(3, 64, 3);
        world.set_block(pos, BLOCK_OAK_DOOR);

        assert!(system.toggle_door(&mut world, pos));
        assert_eq!(world.block(pos), None);
        assert!(system.is_open(pos));

        assert!(system.toggle_door(&mut world, pos));
        assert_eq!(world.block(pos), Some(BLOCK_OAK_DOOR));
        assert!(!system.is_open(pos));

        // Toggling a non-door is a no-op.
        let stone = BlockPos::new(5, 64, 5);
        world.set_block(stone, BLOCK_STONE);
        assert!(!system.toggle_door(&mut world, stone));
    }

    #[test]
    fn door_close_on_occupied_cell_is_stale_noop() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let pos = BlockPos::new(3, 64, 3);
        world.set_block(pos, BLOCK_OAK_DOOR);
        system.toggle_door(&mut world, pos);

        // Another system placed a block into the open cell.
        world.set_block(pos, BLOCK_STONE);
        assert!(!system.toggle_door(&mut world, pos));
        assert_eq!(world.block(pos), Some(BLOCK_STONE));
        assert!(!system.is_open(pos));
    }

    #[test]
    fn bed_toggles_both_halves_together() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let head = BlockPos::new(3, 64, 3);
        let foot = BlockPos::new(4, 64, 3);
        world.set_block(head, BLOCK_BED_HEAD);
        world.set_block(foot, BLOCK_BED_FOOT);

        assert!(system.toggle_bed(&mut world, head));
        assert_eq!(world.block(head), None);
        assert_eq!(world.block(foot), None);

        assert!(system.toggle_bed(&mut world, head));
        assert_eq!(world.block(head), Some(BLOCK_BED_HEAD));
        assert_eq!(world.block(foot), Some(BLOCK_BED_FOOT));
        assert!(!system.is_open(head));
        assert!(!system.is_open(foot));
    }

    #[test]
    fn breaking_one_bed_half_removes_the_partner() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let head = BlockPos::new(3, 64, 3);
        let foot = BlockPos::new(3, 64, 4);
        world.set_block(head, BLOCK_BED_HEAD);
        world.set_block(foot, BLOCK_BED_FOOT);

        assert!(system.break_bed(&mut world, foot));
        assert_eq!(world.block(head), None);
        assert_eq!(world.block(foot), None);
    }

    #[test]
    fn explosion_takes_bed_partner_outside_radius() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        // Head sits inside the blast, foot strictly outside.
        let head = BlockPos::new(12, 64, 10);
        let foot = BlockPos::new(13, 64, 10);
        world.set_block(head, BLOCK_BED_HEAD);
        world.set_block(foot, BLOCK_BED_FOOT);

        system.detonate(&mut world, [10.5, 64.5, 10.5], 2, 0.0, SimTick::ZERO);
        assert_eq!(world.block(head), None);
        assert_eq!(world.block(foot), None, "partner goes with its half");
    }

    #[test]
    fn linked_table_never_double_records_a_key() {
        let mut world = World::new(7);
        let mut system = BlockEventSystem::new(exact_config());
        let pos = BlockPos::new(3, 64, 3);
        world.set_block(pos, BLOCK_OAK_DOOR);
        system.toggle_door(&mut world, pos);

        // A second toggle on the open cell closes it; the key count per
        // position never exceeds one.
        system.toggle_door(&mut world, pos);
        assert!(!system.is_open(pos));
        system.toggle_door(&mut world, pos);
        assert!(system.is_open(pos));
    }
}
