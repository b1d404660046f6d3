//! Colony Clash headless runner
//!
//! Loads a galaxy (or the built-in demo), runs the simulation for a fixed
//! number of ticks and prints the final frame as JSON.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, bail};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use colony_clash::{Game, Settings, galaxy::GalaxyLayout};

/// Run a galaxy headless and print the last frame
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "colony-clash", version)]
struct Args {
    /// Galaxy layout JSON; the demo galaxy when omitted
    galaxy: Option<PathBuf>,
    /// Settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Ticks to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,
    /// Ship to watch; the first ship in the roster when omitted
    #[arg(long)]
    watch: Option<String>,
    /// Build every ship in the roster, not only the watched one
    #[arg(long = "all")]
    all_ships: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Colony Clash (headless) starting...");

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings {}", path.display()))?,
        None => Settings::default(),
    };
    let galaxy = match &args.galaxy {
        Some(path) => GalaxyLayout::load(path)
            .with_context(|| format!("loading galaxy {}", path.display()))?,
        None => GalaxyLayout::demo(settings.seed),
    };
    let watch = match args.watch.clone().or_else(|| galaxy.ships.first().map(|s| s.name.clone())) {
        Some(name) => name,
        None => bail!("galaxy '{}' has no ships", galaxy.name),
    };

    let ticks_per_second = u64::from(settings.tick_rate_hz.max(1));
    let mut game = Game::new(settings);
    game.start(&galaxy, args.all_ships, &watch)?;

    for _ in 0..args.ticks {
        game.update()?;
        if game.frame % ticks_per_second == 0 {
            if let Some(ship) = game.watched_ship() {
                log::info!(
                    "[frame {}] {} in {} at ({:.1}, {:.1}) health {:.0}/{:.0}",
                    game.frame,
                    ship.name,
                    game.solar_system_name,
                    ship.motion.pos.x,
                    ship.motion.pos.y,
                    ship.health,
                    ship.max_health
                );
            }
        }
    }

    let snapshot = game.draw()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    game.end_game();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the library is driven by the host page
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["colony-clash"]).unwrap();
        assert!(args.galaxy.is_none());
        assert_eq!(args.ticks, 500);
        assert!(!args.all_ships);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "colony-clash",
            "sol.json",
            "--ticks",
            "20",
            "--watch",
            "Serenity",
            "--all",
        ])
        .unwrap();
        assert_eq!(args.galaxy, Some(PathBuf::from("sol.json")));
        assert_eq!(args.ticks, 20);
        assert_eq!(args.watch.as_deref(), Some("Serenity"));
        assert!(args.all_ships);
        assert!(Args::try_parse_from(["colony-clash", "--bogus"]).is_err());
    }
}
