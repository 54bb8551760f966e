#![warn(missing_docs)]
//! Deterministic scenario harness for simulation tests and the headless
//! driver.
//!
//! Wires a fabricated world to the AI scheduler and block event propagator
//! and advances them in lockstep at the fixed tick rate, so worldtests drive
//! multi-tick scenarios without re-implementing the loop.

use boxcraft_core::TICK_SECONDS;
use boxcraft_world::{
    BlockEventSystem, ExplosionConfig, MobScheduler, SimTime, SpawnConfig, World, WorldEvent,
};

/// A world plus the two per-tick systems, advanced together.
pub struct SimHarness {
    /// Shared world state under test.
    pub world: World,
    /// Mob lifecycle scheduler.
    pub scheduler: MobScheduler,
    /// Block event propagator.
    pub events: BlockEventSystem,
    /// Simulation clock.
    pub time: SimTime,
    collected_events: Vec<WorldEvent>,
}

impl SimHarness {
    /// Harness over an explicit world with default system tuning.
    pub fn new(world: World) -> Self {
        Self::with_configs(world, SpawnConfig::default(), ExplosionConfig::default())
    }

    /// Harness over a flat world (ground height 64, chunk radius 4).
    pub fn flat(seed: u64) -> Self {
        Self::new(World::flat(seed, 64, 4))
    }

    /// Harness with explicit spawn and explosion tuning.
    pub fn with_configs(world: World, spawn: SpawnConfig, explosion: ExplosionConfig) -> Self {
        Self {
            world,
            scheduler: MobScheduler::new(spawn),
            events: BlockEventSystem::new(explosion),
            time: SimTime::default(),
            collected_events: Vec::new(),
        }
    }

    /// Advance the simulation by one tick at the fixed rate.
    pub fn tick(&mut self) {
        self.scheduler
            .tick(&mut self.world, &mut self.events, &self.time, TICK_SECONDS);
        self.events.tick(&mut self.world, self.time.tick);
        self.collected_events.extend(self.world.drain_events());
        self.time.advance();
    }

    /// Advance the simulation by `n` ticks.
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Fast-forward the clock to night without running any ticks.
    pub fn jump_to_night(&mut self) {
        while !self.time.is_night() {
            self.time.advance();
        }
    }

    /// All world events observed since the last drain.
    pub fn drain_collected_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.collected_events)
    }
}
