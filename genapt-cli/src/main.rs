// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 The genapt Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line entry point (spec §6): parses an airport description
//! file, builds every matching airport's scenery object in parallel
//! (spec §5's coarse-grained, one-worker-per-airport model), then
//! flushes the shared tile splitter and polygon-id counter once every
//! worker has finished.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;

use aptcore::chop::Chopper;
use aptcore::counter;
use aptcore::surface::{DemSource, GridDem};
use aptcore::{build_airport, BuildOptions};
use aptdat::Airport;

/// Turns airport descriptions and DEM tiles into tile-indexed binary
/// scenery objects.
#[derive(Parser, Debug)]
#[command(name = "genapt", author, version, about)]
struct Cli {
    /// Output root directory.
    #[arg(long)]
    work: PathBuf,

    /// Airport description file in the documented text format.
    #[arg(long)]
    input: PathBuf,

    /// Starting value for the shared polygon-id counter, used only the
    /// first time `--work` is populated.
    #[arg(long)]
    start_id: Option<u64>,

    /// Build only the airport with this ICAO identifier.
    #[arg(long)]
    airport: Option<String>,

    #[arg(long)]
    min_lon: Option<f64>,
    #[arg(long)]
    max_lon: Option<f64>,
    #[arg(long)]
    min_lat: Option<f64>,
    #[arg(long)]
    max_lat: Option<f64>,

    /// Advisory numerical-stability hint; no consumer in this
    /// workspace reads it (spec §9 Open Question 3).
    #[arg(long, default_value_t = 10)]
    nudge: i32,

    /// Local terrain-fit slope above which a warning is logged.
    #[arg(long, default_value_t = 0.2)]
    max_slope: f64,

    /// Ignore any previously registered DEM sources and use only the
    /// `--dem-path` values given on this invocation.
    #[arg(long)]
    clear_dem_path: bool,

    /// DEM grid file, highest priority first. Repeatable.
    #[arg(long = "dem-path")]
    dem_path: Vec<PathBuf>,

    /// Material name associated with the `--dem-path` of the same
    /// index; logged for traceability only, since no consumer in this
    /// workspace dispatches on it.
    #[arg(long = "terrain")]
    terrain: Vec<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.clear_dem_path {
        log::info!("ignoring any prior DEM source configuration, using only --dem-path arguments");
    }
    if cli.dem_path.len() != cli.terrain.len() && !cli.terrain.is_empty() {
        log::warn!(
            "{} --dem-path values but {} --terrain labels; labels will not line up 1:1",
            cli.dem_path.len(),
            cli.terrain.len()
        );
    }

    let airports = aptdat::parse_file(&cli.input)
        .with_context(|| format!("parsing {}", cli.input.display()))?;
    log::info!("parsed {} airport(s) from {}", airports.len(), cli.input.display());

    let selected: Vec<&Airport> = airports
        .iter()
        .filter(|a| matches_filters(a, &cli))
        .collect();
    log::info!("{} airport(s) selected for build", selected.len());

    let dems: Vec<GridDem> = cli
        .dem_path
        .iter()
        .map(|p| load_grid_dem(p))
        .collect::<anyhow::Result<_>>()?;
    if dems.is_empty() {
        anyhow::bail!("no DEM sources supplied (use --dem-path at least once)");
    }
    let dem_sources: Vec<&dyn DemSource> = dems.iter().map(|d| d as &dyn DemSource).collect();

    fs::create_dir_all(&cli.work).with_context(|| format!("creating {}", cli.work.display()))?;
    let counter_path = cli.work.join("next-polygon-id");
    let id_counter = counter::open_or_start(&counter_path, cli.start_id.unwrap_or(0))
        .context("opening the shared polygon-id counter")?;
    let chopper = Chopper::new();
    let options = BuildOptions {
        nudge_m: cli.nudge as f64,
        max_slope: cli.max_slope,
    };

    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    selected.into_par_iter().for_each(|airport| {
        let icao = airport.id();
        match build_airport(airport, &dem_sources, &cli.work, &chopper, &id_counter, &options) {
            Ok(outcome) => {
                log::info!(
                    "{icao}: {} triangles, {} light points -> {}",
                    outcome.triangle_count,
                    outcome.light_point_count,
                    outcome.output_path.display()
                );
                succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                log::error!("{icao}: build failed: {e}");
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    // The per-bucket append queues and the polygon-id counter are
    // flushed once, after every worker has finished, per spec §4.H's
    // scheduling model: no long-running I/O happens while a worker
    // holds the shared lock.
    let area_root = cli.work.join("AirportArea");
    chopper.flush(&area_root).context("flushing tile splitter output")?;
    id_counter.flush().context("flushing the shared polygon-id counter")?;

    let succeeded = succeeded.load(Ordering::Relaxed);
    let failed = failed.load(Ordering::Relaxed);
    let skipped = airports.len() - succeeded - failed;
    log::info!("done: {succeeded} succeeded, {failed} failed, {skipped} skipped");

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn matches_filters(airport: &Airport, cli: &Cli) -> bool {
    if let Some(icao) = &cli.airport {
        if airport.id() != icao {
            return false;
        }
    }
    if cli.min_lon.is_none() && cli.max_lon.is_none() && cli.min_lat.is_none() && cli.max_lat.is_none() {
        return true;
    }
    airport.runways.iter().any(|rwy| {
        rwy.ends.iter().any(|end| {
            cli.min_lon.map_or(true, |v| end.lon_deg >= v)
                && cli.max_lon.map_or(true, |v| end.lon_deg <= v)
                && cli.min_lat.map_or(true, |v| end.lat_deg >= v)
                && cli.max_lat.map_or(true, |v| end.lat_deg <= v)
        })
    })
}

/// Reads a DEM grid from the minimal whitespace-delimited format this
/// workspace defines for [`GridDem`]: a header line
/// `min_lon min_lat cell_deg cols rows` followed by `cols * rows`
/// elevation values. Parsing an actual DEM raster format (SRTM, USGS
/// DEM, GeoTIFF) is out of scope per the design's DEM-raster-loader
/// non-goal; this reader exists only so the CLI has a working source
/// to drive [`aptcore::surface::AptSurface`] with.
fn load_grid_dem(path: &Path) -> anyhow::Result<GridDem> {
    let text = fs::read_to_string(path).with_context(|| format!("reading DEM grid {}", path.display()))?;
    let mut tokens = text.split_whitespace();
    let mut next_f64 = |name: &str| -> anyhow::Result<f64> {
        tokens
            .next()
            .ok_or_else(|| anyhow::anyhow!("{}: missing {name}", path.display()))?
            .parse::<f64>()
            .with_context(|| format!("{}: bad {name}", path.display()))
    };
    let min_lon = next_f64("min_lon")?;
    let min_lat = next_f64("min_lat")?;
    let cell_deg = next_f64("cell_deg")?;
    let cols = next_f64("cols")? as usize;
    let rows = next_f64("rows")? as usize;

    let mut values = Vec::with_capacity(cols * rows);
    for tok in tokens {
        values.push(
            tok.parse::<f64>()
                .with_context(|| format!("{}: bad elevation value {tok:?}", path.display()))?,
        );
    }
    if values.len() != cols * rows {
        anyhow::bail!(
            "{}: expected {} elevation values, found {}",
            path.display(),
            cols * rows,
            values.len()
        );
    }
    Ok(GridDem::new(min_lon, min_lat, cell_deg, cols, rows, values))
}
