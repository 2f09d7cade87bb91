//! Headless driver that scrolls a Skyline world at a fixed tick rate.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p skyline-demo -- --seed alpha --ticks 600`.

use std::collections::BTreeMap;

use clap::Parser;
use skyline_config::{CliArgs, Config, default_config_dir};
use skyline_procgen::{Biome, PlacedObject, World};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct RunTotals {
    chunks_generated: usize,
    objects_pruned: usize,
    peak_live: usize,
    biome_ticks: BTreeMap<Biome, u64>,
    reseeds: u32,
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    skyline_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        warn!("Invalid settings after CLI overrides: {e}, using defaults");
        config = Config::default();
    }

    let mut world = World::new(
        config.world.seed.as_str(),
        config.world.layers.clone(),
        config.vegetation.clone(),
        config.world_settings(),
    );
    let dna = world.generator().dna();
    info!(
        seed = %world.seed(),
        layers = world.layers().len(),
        density = dna.density,
        greenery = dna.greenery,
        height_scale = dna.height_scale,
        "Starting run of {} ticks",
        config.driver.ticks
    );

    let dt = config.tick_dt();
    let mut totals = RunTotals::default();
    for tick in 1..=config.driver.ticks {
        let stats = world.tick(dt);
        totals.chunks_generated += stats.chunks_generated;
        totals.objects_pruned += stats.objects_pruned;
        totals.peak_live = totals.peak_live.max(stats.live_objects);
        *totals.biome_ticks.entry(stats.biome).or_default() += 1;

        if config.driver.report_every > 0 && tick % config.driver.report_every == 0 {
            info!(
                tick,
                camera_x = stats.camera_x,
                biome = %stats.biome,
                live = stats.live_objects,
                "Progress"
            );
        }

        if args.reseed_at == Some(tick)
            && let Some(ref seed) = args.reseed_seed
        {
            world.reseed(seed.as_str());
            totals.reseeds += 1;
        }
    }

    report(&world, &totals);
}

fn report(world: &World, totals: &RunTotals) {
    info!(
        camera_x = world.camera_x(),
        chunks = totals.chunks_generated,
        pruned = totals.objects_pruned,
        peak_live = totals.peak_live,
        reseeds = totals.reseeds,
        "Run finished"
    );

    for (index, layer) in world.layers().iter().enumerate() {
        let mut structures = 0;
        let mut plants = 0;
        let mut landscapes = 0;
        for object in layer.objects() {
            match object {
                PlacedObject::Ground(_) => {}
                PlacedObject::Structure(_) => structures += 1,
                PlacedObject::Vegetation(_) => plants += 1,
                PlacedObject::Landscape(_) => landscapes += 1,
            }
        }
        info!(
            layer = index,
            speed = layer.speed_factor(),
            live = layer.len(),
            frontier = world.generator().frontier(index),
            structures,
            plants,
            landscapes,
            "Layer"
        );
    }

    for (biome, ticks) in &totals.biome_ticks {
        info!(%biome, ticks, "Biome time");
    }
}
