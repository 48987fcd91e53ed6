//! Headless runner: generate a floor, let an autopilot hero fight through it
//! for a number of ticks and print what happened.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use scopeguard::defer;
use tracing::{debug, info};

use pixel_crawler::combat::Position;
use pixel_crawler::error::handle_error;
use pixel_crawler::hero::{Class, SpellKind};
use pixel_crawler::{
    EventBus, GameConfig, RecordingSink, TracingSink, WorldState, advance_tick, logging,
    move_player, resolve_melee_attack, resolve_spell_cast,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeroClass {
    Warrior,
    Mage,
    Rogue,
    Huntress,
}

impl From<HeroClass> for Class {
    fn from(class: HeroClass) -> Self {
        match class {
            HeroClass::Warrior => Class::Warrior,
            HeroClass::Mage => Class::Mage,
            HeroClass::Rogue => Class::Rogue,
            HeroClass::Huntress => Class::Huntress,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pixel_crawler", about = "Run the dungeon simulation headless")]
struct Args {
    /// Run seed; the same seed always produces the same floors.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Floor to start on (1-based).
    #[arg(long, default_value_t = 1)]
    floor: u32,
    /// Ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Milliseconds per tick.
    #[arg(long, default_value_t = 16.0)]
    dt: f32,
    #[arg(long, value_enum, default_value_t = HeroClass::Warrior)]
    class: HeroClass,
    /// JSON config file; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the ASCII map dump.
    #[arg(long)]
    no_map: bool,
}

/// Mend when badly hurt, otherwise walk towards the nearest hostile and swing
/// once in reach.
fn autopilot(state: &mut WorldState, rng: &mut Pcg32) {
    if state.hero.hp * 2 < state.hero.max_hp {
        let mend = (0..state.hero.spellbook.len()).find(|&i| {
            state
                .hero
                .spellbook
                .slot(i)
                .is_some_and(|s| s.spell.kind == SpellKind::Mend && s.is_ready())
        });
        if let Some(slot) = mend {
            if let Err(err) = resolve_spell_cast(state, slot) {
                debug!(reason = %handle_error(&err), "autopilot could not mend");
            }
        }
    }

    let here = state.hero.position;
    let nearest = state
        .entities
        .iter()
        .filter(|e| e.is_live_hostile())
        .map(|e| e.position)
        .min_by(|a, b| a.distance_to(&here).total_cmp(&b.distance_to(&here)));

    let Some(target) = nearest else {
        if let Some(stairs) = state.stairs().filter(|s| !s.is_hidden).map(|s| s.position) {
            step_towards(state, stairs);
        }
        return;
    };
    let reach = state.hero.weapon.reach.max(1.0);
    state.hero.face(target - here);
    if state.hero.weapon.is_ranged() || here.distance_to(&target) <= reach {
        let weapon = state.hero.weapon.clone();
        resolve_melee_attack(state, &weapon, rng);
    } else {
        step_towards(state, target);
    }
}

fn step_towards(state: &mut WorldState, target: Position) {
    let direction = (target - state.hero.position).normalized() * 0.1;
    move_player(state, direction.x, direction.y);
}

fn main() -> Result<()> {
    logging::init_tracing(logging::DEFAULT_FILTER);
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.validate().context("invalid configuration")?;

    let started = Instant::now();
    defer! {
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "run finished");
    }

    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut state = WorldState::new(args.class.into(), config, args.floor.max(1), &mut rng);
    let mut bus = EventBus::new();
    bus.subscribe(Box::new(TracingSink));
    let mut recorder = RecordingSink::default();
    debug!(sinks = bus.subscriber_count(), "event bus ready");

    let mut kills = 0;
    let mut failed = 0;
    for _ in 0..args.ticks {
        autopilot(&mut state, &mut rng);
        let report = advance_tick(&mut state, args.dt, &mut rng);
        kills += report.kills;
        failed += EventBus::dispatch(&report.feedback, &mut recorder).failed;
        failed += bus.publish(report.feedback).failed;
        if report.player_died {
            break;
        }
        if state.on_exit() {
            state
                .descend(&mut rng)
                .context("failed to descend to the next floor")?;
            bus.clear_history();
        }
    }

    if !args.no_map {
        println!("{}", state.ascii_map());
    }
    println!(
        "seed {} | floor {} ({}, {}) | {} ticks | hp {}/{} | lvl {} | gold {} | kills {} | hostiles left {} | feedback {} ({} failed)",
        args.seed,
        state.floor,
        state.theme,
        state.layout,
        state.ticks,
        state.hero.hp,
        state.hero.max_hp,
        state.hero.level,
        state.hero.gold,
        kills,
        state.live_hostiles(),
        recorder.events.len(),
        failed,
    );
    Ok(())
}
