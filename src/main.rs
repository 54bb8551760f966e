//! Headless deterministic simulation driver.
//!
//! Runs the gameplay core (mob scheduler + block event propagator) against a
//! flat world for a fixed number of ticks and reports what happened. Useful
//! for smoke-testing tuning changes and for reproducing simulation bugs from
//! a seed.

mod config;

use anyhow::Result;
use boxcraft_core::TICK_SECONDS;
use boxcraft_world::{
    BlockEventSystem, BlockPos, MobScheduler, SimTime, World, WorldEvent, BLOCK_TNT,
};
use clap::Parser;
use config::SimConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "boxcraft", about = "Headless voxel gameplay core driver")]
struct Args {
    /// World seed; the same seed replays the same simulation.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// How many ticks to simulate (20 ticks = 1 s).
    #[arg(long, default_value_t = 2400)]
    ticks: u64,

    /// Simulation config file (TOML); defaults apply if absent.
    #[arg(long, default_value = "config/sim.toml")]
    config: PathBuf,

    /// Flat-world ground height.
    #[arg(long, default_value_t = 64)]
    ground_height: i32,

    /// Flat-world chunk radius around the origin.
    #[arg(long, default_value_t = 6)]
    chunk_radius: i32,

    /// Tick at which a demo TNT block near spawn is ignited (skipped if
    /// beyond --ticks).
    #[arg(long, default_value_t = 200)]
    ignite_at: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = SimConfig::load_from_path(&args.config);

    let mut world = World::flat(args.seed, args.ground_height, args.chunk_radius);
    let mut scheduler = MobScheduler::new(config.spawn.clone());
    let mut events = BlockEventSystem::new(config.explosion.clone());
    let mut time = SimTime::new(config.ticks_per_day);

    let tnt_pos = BlockPos::new(12, args.ground_height + 1, 12);
    world.set_block(tnt_pos, BLOCK_TNT);

    info!(
        seed = args.seed,
        ticks = args.ticks,
        chunk_radius = args.chunk_radius,
        "Simulation starting"
    );

    let mut blocks_destroyed = 0u64;
    let mut chunk_bumps = 0u64;

    for tick in 0..args.ticks {
        if tick == args.ignite_at {
            events.ignite(&mut world, tnt_pos);
        }

        scheduler.tick(&mut world, &mut events, &time, TICK_SECONDS);
        events.tick(&mut world, time.tick);

        for event in world.drain_events() {
            match event {
                WorldEvent::BlockDestroyed { .. } => blocks_destroyed += 1,
                WorldEvent::ChunkVersionBumped { .. } => chunk_bumps += 1,
            }
        }
        time.advance();

        if (tick + 1) % 400 == 0 {
            info!(
                tick = tick + 1,
                mobs = world.mob_count(),
                primed = world.primed_explosive_count(),
                player_health = world.player_health(),
                night = time.is_night(),
                "Simulation progress"
            );
        }
    }

    info!(
        mobs = world.mob_count(),
        blocks_destroyed,
        chunk_bumps,
        player_health = world.player_health(),
        "Simulation finished"
    );
    Ok(())
}
