//! Command-line front end: load the market, derive doors, plan routes.
//!
//! ```text
//! marketnav route --from -79.35914,43.81261 --to -79.35974,43.81283
//! marketnav doors
//! marketnav export --out out/
//! marketnav to-geo 1200 800
//! marketnav --config other.toml search fish
//! marketnav convert-graphml plan.graphml --out plan.geojson
//! ```
//!
//! Logging defaults to WARN, INFO for marketnav; override with `RUST_LOG`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geojson::GeoJson;
use tracing::{info, warn};

use marketnav::config::Config;
use marketnav::engine::{PlanarGeometry, WalkwayGraphFinder};
use marketnav::geometry::{DrawingCoord, GeoCoord};
use marketnav::georef::GeoTransform;
use marketnav::io::{self, GraphmlLoader, Loader};
use marketnav::model::Route;
use marketnav::navigation::Navigator;

#[derive(Parser, Debug)]
#[command(name = "marketnav")]
#[command(about = "Indoor market navigation: doors, walls and walking routes")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "marketnav.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route and print it as GeoJSON
    Route {
        /// Origin as LNG,LAT (default: configured origin)
        #[arg(long, allow_hyphen_values = true)]
        from: Option<GeoCoord>,
        /// Destination as LNG,LAT (default: configured destination)
        #[arg(long, allow_hyphen_values = true)]
        to: Option<GeoCoord>,
    },
    /// List the inferred door of every booth
    Doors,
    /// List booths whose label contains TERM
    Search { term: String },
    /// Write floor, roof, wall, door and entrance GeoJSON into a directory
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Convert a yEd GraphML floor plan to GeoJSON rooms and connections
    ConvertGraphml {
        input: PathBuf,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Convert drawing coordinates to LNG,LAT
    ToGeo { x: f64, y: f64 },
    /// Convert LNG,LAT to drawing coordinates
    ToDrawing {
        #[arg(allow_hyphen_values = true)]
        lng: f64,
        lat: f64,
    },
}

type MarketNavigator = Navigator<PlanarGeometry, WalkwayGraphFinder>;

fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("marketnav=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    let transform = config.transform().context("invalid transform calibration")?;

    match args.command {
        Command::ToGeo { x, y } => {
            let p = DrawingCoord::new(x, y);
            if !transform.is_within_bounds(p) {
                warn!(x, y, "point lies outside the floor-plan extent");
            }
            println!("{}", transform.to_geo(p));
        }
        Command::ToDrawing { lng, lat } => {
            let d = transform.to_drawing(GeoCoord::new(lng, lat));
            println!("{},{}", d.x, d.y);
        }
        Command::ConvertGraphml { input, out } => {
            let plan = GraphmlLoader::new(&transform)
                .load(&input)
                .with_context(|| format!("failed to convert {}", input.display()))?;
            let fc = io::graphml_collection(&plan);
            match out {
                Some(path) => io::write_collection(&path, fc)?,
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&GeoJson::FeatureCollection(fc))?
                ),
            }
        }
        Command::Route { from, to } => {
            let nav = build_navigator(&config, &transform)?;
            let origin = from.unwrap_or(config.navigation.origin);
            let destination = to.unwrap_or(config.navigation.destination);
            for c in [origin, destination] {
                if !config.bounds.contains(c) {
                    warn!(%c, "coordinate lies outside the market bounds");
                }
            }
            let state = nav.recompute(&nav.initial_state(origin, destination));
            match state.route {
                Some(route @ Route::Path(_)) => {
                    info!(length_m = route.length_m(), "route found");
                    let geojson = GeoJson::FeatureCollection(io::route_collection(&route));
                    println!("{}", serde_json::to_string_pretty(&geojson)?);
                }
                _ => println!("no route"),
            }
        }
        Command::Doors => {
            let nav = build_navigator(&config, &transform)?;
            for door in nav.derived().doors.iter() {
                println!(
                    "{}\t{}\t{}",
                    door.booth_id,
                    door.label.as_deref().unwrap_or("-"),
                    door.coord
                );
            }
        }
        Command::Search { term } => {
            let nav = build_navigator(&config, &transform)?;
            for door in nav.search(&term) {
                println!("{}\t{}", door.booth_id, door.label.as_deref().unwrap_or("-"));
            }
        }
        Command::Export { out } => {
            let nav = build_navigator(&config, &transform)?;
            let mut written = io::export_derived(&out, nav.derived())
                .with_context(|| format!("failed to export into {}", out.display()))?;
            if let Some(path) = &config.data.entrances {
                let entrances = Loader::new(config.data.space, &transform).entrances(path)?;
                let target = out.join("entrances.geojson");
                io::write_collection(&target, io::entrance_collection(&entrances))?;
                written.push(target);
            }
            for path in written {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn build_navigator(config: &Config, transform: &GeoTransform) -> anyhow::Result<MarketNavigator> {
    let (booths, walkways) = if let Some(path) = &config.data.graphml {
        let plan = GraphmlLoader::new(transform)
            .load(path)
            .context("failed to load GraphML plan")?;
        let walkways = plan.walkways();
        (plan.booths, walkways)
    } else {
        let loader = Loader::new(config.data.space, transform);
        let booths = loader
            .booths(&config.data.booths)
            .context("failed to load booths")?;
        let walkways = loader
            .walkways(&config.data.walkways)
            .context("failed to load walkways")?;
        (booths, walkways)
    };

    let nav = Navigator::new(
        PlanarGeometry::new(),
        WalkwayGraphFinder,
        booths,
        walkways,
        &config.pipeline_options(),
    );
    for diagnostic in &nav.derived().diagnostics {
        warn!(%diagnostic, "feature dropped");
    }
    Ok(nav)
}
