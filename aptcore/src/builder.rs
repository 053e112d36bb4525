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

//! The airport builder (spec §4.H): orchestrates the pavement generator,
//! the lighting generator, the polygon algebra/repair/tessellation
//! layers and the airport surface into one finished scenery object,
//! then hands the residual base/clearing footprint to the tile
//! splitter.
//!
//! The fourteen steps below follow the orchestration order directly;
//! each is commented with its step number so the sequence stays
//! legible even once every step's implementation has grown past a
//! glance.

use std::fs;
use std::path::{Path, PathBuf};

use aptdat::Airport;
use aptgeo::bucket::Bucket;
use aptgeo::nodes::{NodeKind, NodeTable};
use aptgeo::tessellate::{self, Triangle};
use aptgeo::{algebra, geodesy, repair, Contour, GeoPoint, Polygon};

use crate::btg::{Group, GroupKind, SceneObject};
use crate::chop::Chopper;
use crate::counter::{CounterStore, IdCounter};
use crate::error::Error;
use crate::lighting;
use crate::runway;
use crate::superpoly::Superpoly;
use crate::surface::{self, AptSurface, DemSource};

/// The two materials the tile splitter (spec §4.I) tracks as separate
/// per-bucket polygon lists.
const HOLE_MATERIAL: &str = "__hole__";
const CLEARING_MATERIAL: &str = "__clearing__";

/// Builder knobs taken from the CLI (spec §6). `nudge` is advisory only
/// (spec §9 Open Question 3: no consumer of a fractional-meter terrain
/// nudge ships in this workspace); `max_slope` gates a post-lift
/// warning, not a hard failure, since spec §7 does not list a steep-
/// slope error kind.
#[derive(Copy, Clone, Debug)]
pub struct BuildOptions {
    pub nudge_m: f64,
    pub max_slope: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            nudge_m: 10.0,
            max_slope: 0.2,
        }
    }
}

/// What one successful [`build_airport`] call produced, for the CLI's
/// summary line.
#[derive(Debug)]
pub struct BuildOutcome {
    pub icao: String,
    pub bucket: Bucket,
    pub output_path: PathBuf,
    pub triangle_count: usize,
    pub light_point_count: usize,
}

/// Builds one airport's scenery object and enqueues its base/clearing
/// footprint with `chopper`, writing the finished object under
/// `output_root/AirportObj/<bucket-path>/<icao>.btg` (spec §6).
pub fn build_airport<S: CounterStore>(
    airport: &Airport,
    dem_sources: &[&dyn DemSource],
    output_root: &Path,
    chopper: &Chopper,
    counter: &IdCounter<S>,
    options: &BuildOptions,
) -> Result<BuildOutcome, Error> {
    let icao = airport.id().to_string();
    if airport.runways.is_empty() {
        return Err(Error::InputFormat(format!(
            "airport {icao} has no runway/taxiway/helipad records"
        )));
    }
    log::debug!("building {icao}: nudge={}m (advisory)", options.nudge_m);

    // Step 1: assign the owning bucket from the mean of every runway
    // end point.
    let bucket = Bucket::from_point(&representative_point(&airport.runways));

    // Step 2: run the four ordered pavement passes; every committed
    // polygon (base quad or marking layer, in emission order) is
    // differenced against the running accumulation, then unioned into
    // it, so later passes see earlier ones' full footprint.
    let ordered = runway::order_passes(&airport.runways);
    let mut accumulation: Vec<Polygon> = Vec::new();
    let mut pavement: Vec<Superpoly> = Vec::new();
    for rwy in &ordered {
        for sp in runway::gen_pavement(rwy) {
            let tex = sp.polygon.tex_params;
            let pieces = algebra::difference(
                std::slice::from_ref(&sp.polygon),
                &accumulation,
                &sp.material,
            );
            if pieces.is_empty() {
                continue;
            }
            accumulation = algebra::union(&accumulation, &pieces, "accumulation");
            for mut piece in pieces {
                piece.tex_params = tex;
                pavement.push(Superpoly::new(piece, sp.material.clone()));
            }
        }
    }

    // Lighting is independent of the accumulation polygon.
    let mut lights: Vec<Superpoly> = Vec::new();
    for rwy in &airport.runways {
        lights.extend(lighting::gen_all_lights(rwy));
    }

    // Airport base / clearing: unioned across every runway/taxiway,
    // regardless of pavement classification (a helipad still claims
    // ground and still needs a cleared safety area).
    let mut apt_base: Vec<Polygon> = Vec::new();
    let mut apt_clearing: Vec<Polygon> = Vec::new();
    for rwy in &airport.runways {
        apt_base = algebra::union(&apt_base, std::slice::from_ref(&runway::gen_base(rwy)), "Grass");
        apt_clearing = algebra::union(
            &apt_clearing,
            std::slice::from_ref(&runway::gen_safe_base(rwy)),
            "Grass",
        );
    }

    // Step 4: divided_base drops holes (the base footprint replaces
    // terrain solidly) and splits long edges so the skirt and
    // tessellation never see a multi-hundred-meter edge.
    let divided_base: Vec<Polygon> = apt_base
        .iter()
        .map(|p| repair::split_long_edges(&repair::strip_holes(p), 200.0))
        .collect();

    // Step 5: base_poly is divided_base minus whatever pavement has
    // already claimed.
    let base_poly = algebra::difference(&divided_base, &accumulation, "Grass");

    // Step 6: clean every pavement polygon and base_poly, thread their
    // shared vertices through each other via a T-junction pass, then
    // clean once more.
    let mut combined: Vec<Polygon> = pavement.iter().map(|sp| sp.polygon.clone()).collect();
    let pavement_len = combined.len();
    combined.extend(base_poly.iter().cloned());
    clean_and_thread(&mut combined);
    let (cleaned_pavement, cleaned_base) = combined.split_at(pavement_len);
    for (sp, cleaned) in pavement.iter_mut().zip(cleaned_pavement) {
        sp.polygon = cleaned.clone();
    }
    let base_poly: Vec<Polygon> = cleaned_base.to_vec();

    // Step 7: tessellate.
    for sp in pavement.iter_mut() {
        let triangles = tessellate::tessellate(&sp.polygon, &[])?;
        sp.set_triangles(triangles);
    }
    let mut base_superpolies: Vec<Superpoly> = Vec::new();
    for piece in &base_poly {
        let triangles = tessellate::tessellate(piece, &[])?;
        let mut sp = Superpoly::new(piece.clone(), "Grass");
        sp.set_triangles(triangles);
        base_superpolies.push(sp);
    }

    // Step 8: texture coordinates. Pavement uses its stored texture
    // parameters; base uses a per-bucket geographic-to-atlas projection
    // since it carries no runway-aligned frame of its own.
    for sp in pavement.iter_mut() {
        let Some(tex) = sp.polygon.tex_params else {
            continue;
        };
        let Some(triangles) = sp.triangles.clone() else {
            continue;
        };
        let mut uv = Vec::with_capacity(triangles.len() * 3);
        for t in &triangles {
            for p in t.points() {
                uv.push(tex.project(&p));
            }
        }
        sp.set_texcoords(uv);
    }
    for sp in base_superpolies.iter_mut() {
        let Some(triangles) = sp.triangles.clone() else {
            continue;
        };
        let mut uv = Vec::with_capacity(triangles.len() * 3);
        for t in &triangles {
            for p in t.points() {
                uv.push(base_atlas_uv(&bucket, &p));
            }
        }
        sp.set_texcoords(uv);
    }

    // Step 9: build the terrain-fit surface over the mesh's bounds,
    // extended 10% in every direction.
    let mut mesh_points: Vec<GeoPoint> = Vec::new();
    for sp in &pavement {
        mesh_points.extend(sp.polygon.all_points());
    }
    for sp in &base_superpolies {
        mesh_points.extend(sp.polygon.all_points());
    }
    for piece in &divided_base {
        mesh_points.extend(piece.all_points());
    }
    for sp in &lights {
        mesh_points.extend(sp.polygon.all_points());
    }
    let (min_lon, min_lat, max_lon, max_lat) = bounds_of_points(mesh_points.iter().copied())
        .ok_or_else(|| Error::GeometricDegeneracy(format!("{icao}: mesh has no vertices")))?;
    let lon_pad = (max_lon - min_lon).max(1.0e-9) * 0.1;
    let lat_pad = (max_lat - min_lat).max(1.0e-9) * 0.1;
    let terrain = AptSurface::new(
        dem_sources,
        min_lon - lon_pad,
        min_lat - lat_pad,
        max_lon + lon_pad,
        max_lat + lat_pad,
        surface::DEFAULT_GRID_STEP_DEG,
    )?;

    // Step 10: lift every node's elevation to the terrain surface.
    // Tessellation discards elevation (spade only knows 2D points), so
    // this is where pavement/base meshes regain real height. Light
    // points are lifted an extra half meter above the surface so they
    // clear the pavement mesh.
    for sp in pavement.iter_mut() {
        if let Some(triangles) = sp.triangles.take() {
            sp.set_triangles(triangles.into_iter().map(|t| lift_triangle(t, &terrain)).collect());
        }
    }
    for sp in base_superpolies.iter_mut() {
        if let Some(triangles) = sp.triangles.take() {
            sp.set_triangles(triangles.into_iter().map(|t| lift_triangle(t, &terrain)).collect());
        }
    }
    for sp in lights.iter_mut() {
        let material = sp.polygon.material.clone();
        let pts: Vec<GeoPoint> = sp
            .polygon
            .all_points()
            .map(|p| lift_point(p, &terrain, 0.5))
            .collect();
        sp.polygon = Polygon::new(Contour::outer(pts)).with_material(material);
    }
    let lifted_divided_base: Vec<Polygon> = divided_base
        .iter()
        .map(|p| {
            let mut out = p.clone();
            for contour in out.contours_mut() {
                for pt in contour.points_mut() {
                    *pt = lift_point(*pt, &terrain, 0.0);
                }
            }
            out
        })
        .collect();

    for sp in pavement.iter().chain(base_superpolies.iter()) {
        if let Some(triangles) = &sp.triangles {
            warn_on_steep_triangles(&icao, triangles, options.max_slope);
        }
    }

    // Step 11: build the skirt around every contour of divided_base,
    // dropping 20 m to hide the seam against neighboring terrain tiles.
    let mut skirt_triangles: Vec<Triangle> = Vec::new();
    for piece in &lifted_divided_base {
        for contour in piece.contours() {
            for (a, b) in contour.edges() {
                let lower_a = a.with_elevation(a.elevation_m - 20.0);
                let lower_b = b.with_elevation(b.elevation_m - 20.0);
                skirt_triangles.push(Triangle { a, b, c: lower_b });
                skirt_triangles.push(Triangle {
                    a,
                    b: lower_b,
                    c: lower_a,
                });
            }
        }
    }

    // Step 12: convert to WGS-84 cartesian and assemble the shared
    // vertex/normal/texcoord arrays plus material-tagged groups.
    //
    // Pavement, base and skirt-upper vertices share one node table so
    // coincident mesh corners (T-junctions, skirt attachment points)
    // collapse onto a single vertex index. Skirt-lower copies and light
    // points are appended unduplicated: the node table's epsilon match
    // is 2D-only (spec's `GeoPoint` equality ignores elevation, by
    // design, for contour dedup), so folding a skirt's lower copy
    // through it would collapse it back onto the vertex it is supposed
    // to sit 20 m below.
    let mut terrain_nodes = NodeTable::new();
    let mut vertices: Vec<(f64, f64, f64)> = Vec::new();
    let mut normals: Vec<(f32, f32, f32)> = Vec::new();
    let mut texcoords: Vec<(f32, f32)> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();

    for sp in &pavement {
        let Some(triangles) = &sp.triangles else {
            continue;
        };
        let tex = sp.texcoords.as_deref();
        let mut indices = Vec::with_capacity(triangles.len() * 3);
        for (i, t) in triangles.iter().enumerate() {
            for (j, p) in t.points().into_iter().enumerate() {
                let uv = tex.and_then(|u| u.get(i * 3 + j)).copied().unwrap_or((0.0, 0.0));
                indices.push(register_terrain_vertex(
                    &mut terrain_nodes,
                    &mut vertices,
                    &mut normals,
                    &mut texcoords,
                    p,
                    uv,
                ));
            }
        }
        if !indices.is_empty() {
            groups.push(Group {
                material: sp.material.clone(),
                kind: GroupKind::Triangles,
                indices,
            });
        }
    }

    for sp in &base_superpolies {
        let Some(triangles) = &sp.triangles else {
            continue;
        };
        let tex = sp.texcoords.as_deref();
        let mut indices = Vec::with_capacity(triangles.len() * 3);
        for (i, t) in triangles.iter().enumerate() {
            for (j, p) in t.points().into_iter().enumerate() {
                let uv = tex.and_then(|u| u.get(i * 3 + j)).copied().unwrap_or((0.0, 0.0));
                indices.push(register_terrain_vertex(
                    &mut terrain_nodes,
                    &mut vertices,
                    &mut normals,
                    &mut texcoords,
                    p,
                    uv,
                ));
            }
        }
        if !indices.is_empty() {
            groups.push(Group {
                material: "Grass".to_string(),
                kind: GroupKind::Triangles,
                indices,
            });
        }
    }

    let mut skirt_indices = Vec::with_capacity(skirt_triangles.len() * 3);
    for t in &skirt_triangles {
        for (j, p) in t.points().into_iter().enumerate() {
            let is_lower = j != 0 && p.elevation_m < t.a.elevation_m - 1.0;
            let idx = if is_lower {
                push_raw_vertex(&mut vertices, &mut normals, &mut texcoords, p, (0.0, 0.0))
            } else {
                register_terrain_vertex(&mut terrain_nodes, &mut vertices, &mut normals, &mut texcoords, p, (0.0, 0.0))
            };
            skirt_indices.push(idx);
        }
    }
    if !skirt_indices.is_empty() {
        groups.push(Group {
            material: "Grass".to_string(),
            kind: GroupKind::Triangles,
            indices: skirt_indices,
        });
    }

    let mut light_point_count = 0;
    for sp in &lights {
        let mut indices = Vec::new();
        for p in sp.polygon.all_points() {
            indices.push(push_raw_vertex(&mut vertices, &mut normals, &mut texcoords, p, (0.0, 0.0)));
        }
        light_point_count += indices.len();
        if !indices.is_empty() {
            groups.push(Group {
                material: sp.material.clone(),
                kind: GroupKind::Points,
                indices,
            });
        }
    }

    let triangle_count = groups
        .iter()
        .filter(|g| g.kind == GroupKind::Triangles)
        .map(|g| g.indices.len() / 3)
        .sum();

    // Step 13: write the finished object.
    let scene = SceneObject::new(vertices, normals, texcoords, groups);
    let output_dir = output_root.join("AirportObj").join(bucket.path_fragment());
    fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(format!("{icao}.btg"));
    scene.write_to_path(&output_path)?;

    // Step 14: chop the residual hole (divided_base) and clearing
    // (apt_clearing) footprints into the scenery bucket grid.
    for piece in &divided_base {
        chopper.chop_and_enqueue(piece, HOLE_MATERIAL, counter)?;
    }
    for piece in &apt_clearing {
        chopper.chop_and_enqueue(piece, CLEARING_MATERIAL, counter)?;
    }

    Ok(BuildOutcome {
        icao,
        bucket,
        output_path,
        triangle_count,
        light_point_count,
    })
}

fn representative_point(runways: &[aptdat::Runway]) -> GeoPoint {
    let mut lon_sum = 0.0;
    let mut lat_sum = 0.0;
    let mut n = 0.0;
    for rwy in runways {
        for end in &rwy.ends {
            lon_sum += end.lon_deg;
            lat_sum += end.lat_deg;
            n += 1.0;
        }
    }
    if n == 0.0 {
        GeoPoint::flat(0.0, 0.0)
    } else {
        GeoPoint::flat(lon_sum / n, lat_sum / n)
    }
}

/// Spec §4.H step 6: clean, gather every vertex into a shared pool,
/// re-thread it back through every polygon via `add_colinear_nodes`,
/// then clean once more.
fn clean_and_thread(polys: &mut [Polygon]) {
    for p in polys.iter_mut() {
        let (deduped, _) = repair::remove_dups(p);
        *p = repair::reduce_degeneracy(&deduped);
    }
    let mut tmp_nodes: Vec<GeoPoint> = Vec::new();
    for p in polys.iter() {
        tmp_nodes.extend(p.all_points());
    }
    for p in polys.iter_mut() {
        let threaded = repair::add_colinear_nodes(p, &tmp_nodes);
        let (deduped, _) = repair::remove_dups(&threaded);
        let (cleaned, _) = repair::remove_bad_contours(&deduped);
        *p = cleaned;
    }
}

fn lift_point(p: GeoPoint, terrain: &AptSurface, extra_m: f64) -> GeoPoint {
    p.with_elevation(terrain.query(p.lon_deg, p.lat_deg) + extra_m)
}

fn lift_triangle(t: Triangle, terrain: &AptSurface) -> Triangle {
    Triangle {
        a: lift_point(t.a, terrain, 0.0),
        b: lift_point(t.b, terrain, 0.0),
        c: lift_point(t.c, terrain, 0.0),
    }
}

/// A placeholder geographic-to-atlas projection for base (terrain-fill)
/// triangles: fractional position within the owning bucket's
/// rectangle. Spec §4.H step 8 leaves the real projection to "a
/// per-bucket geographic-to-atlas function supplied by the renderer",
/// which has no counterpart in this workspace.
fn base_atlas_uv(bucket: &Bucket, p: &GeoPoint) -> (f64, f64) {
    let (min_lon, min_lat, max_lon, max_lat) = bucket.rect();
    let u = ((p.lon_deg - min_lon) / (max_lon - min_lon).max(1.0e-12)).clamp(0.0, 1.0);
    let v = ((p.lat_deg - min_lat) / (max_lat - min_lat).max(1.0e-12)).clamp(0.0, 1.0);
    (u, v)
}

fn bounds_of_points(pts: impl Iterator<Item = GeoPoint>) -> Option<(f64, f64, f64, f64)> {
    let mut min_lon = f64::INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut any = false;
    for p in pts {
        any = true;
        min_lon = min_lon.min(p.lon_deg);
        min_lat = min_lat.min(p.lat_deg);
        max_lon = max_lon.max(p.lon_deg);
        max_lat = max_lat.max(p.lat_deg);
    }
    any.then_some((min_lon, min_lat, max_lon, max_lat))
}

/// Logs triangles whose edge rise/run exceeds `max_slope`; a best-effort
/// diagnostic rather than a hard failure, since spec §7 names no error
/// kind for "terrain fit too steep".
fn warn_on_steep_triangles(icao: &str, triangles: &[Triangle], max_slope: f64) {
    for t in triangles {
        for (a, b) in [(t.a, t.b), (t.b, t.c), (t.c, t.a)] {
            let run = geodesy::distance_m(&a, &b).max(1.0e-6);
            let slope = (b.elevation_m - a.elevation_m).abs() / run;
            if slope > max_slope {
                log::warn!("{icao}: triangle edge slope {slope:.3} exceeds max-slope {max_slope:.3}");
            }
        }
    }
}

/// Registers `p` in the shared terrain node table, appending a fresh
/// cartesian/normal/texcoord entry only on first insertion so repeat
/// corners collapse onto the same index.
fn register_terrain_vertex(
    nodes: &mut NodeTable,
    vertices: &mut Vec<(f64, f64, f64)>,
    normals: &mut Vec<(f32, f32, f32)>,
    texcoords: &mut Vec<(f32, f32)>,
    p: GeoPoint,
    uv: (f64, f64),
) -> u32 {
    let idx = nodes.unique_add(p, NodeKind::Terrain);
    if idx == vertices.len() {
        push_raw_vertex(vertices, normals, texcoords, p, uv);
    }
    idx as u32
}

/// Appends a new vertex with no dedup check. Used for skirt-lower
/// copies and light points, which must never collapse onto an
/// unrelated vertex at the same 2D position.
fn push_raw_vertex(
    vertices: &mut Vec<(f64, f64, f64)>,
    normals: &mut Vec<(f32, f32, f32)>,
    texcoords: &mut Vec<(f32, f32)>,
    p: GeoPoint,
    uv: (f64, f64),
) -> u32 {
    let idx = vertices.len() as u32;
    let cart = geodesy::geod_to_cart(&p);
    vertices.push((cart.x, cart.y, cart.z));
    let n = geodesy::geocentric_up(&p);
    normals.push((n.0 as f32, n.1 as f32, n.2 as f32));
    texcoords.push((uv.0 as f32, uv.1 as f32));
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptdat::{AirportHeader, AirportKind, ApproachLights, Marking, Runway, RunwayEnd, RunwayKind, Surface};

    use crate::counter::InMemoryCounterStore;
    use crate::surface::GridDem;

    fn flat_runway(surface: Surface, marking: u8, lon0: f64, lon1: f64) -> Runway {
        Runway {
            kind: RunwayKind::Land,
            width_m: 45.0,
            surface,
            shoulder: 0,
            smoothness: 1.0,
            centerline_lights: true,
            edge_lights: 2,
            dist_remain_signs: false,
            ends: [
                RunwayEnd {
                    ident: "09".into(),
                    lat_deg: 0.0,
                    lon_deg: lon0,
                    threshold_m: 0.0,
                    overrun_m: 0.0,
                    marking: Marking(marking),
                    approach_lights: ApproachLights::None,
                    tz_lights: false,
                    reil: false,
                },
                RunwayEnd {
                    ident: "27".into(),
                    lat_deg: 0.0,
                    lon_deg: lon1,
                    threshold_m: 0.0,
                    overrun_m: 0.0,
                    marking: Marking(marking),
                    approach_lights: ApproachLights::None,
                    tz_lights: false,
                    reil: false,
                },
            ],
            is_taxiway: false,
        }
    }

    fn sample_airport() -> Airport {
        Airport {
            header: Some(AirportHeader {
                kind: AirportKind::Land,
                elevation_ft: 0.0,
                icao: "KXYZ".into(),
                name: "Test Field".into(),
            }),
            runways: vec![flat_runway(Surface::Asphalt, 3, 0.0, 0.009)],
            pavements: Vec::new(),
            boundary: None,
            linear_features: Vec::new(),
        }
    }

    fn flat_dem_sources() -> Vec<GridDem> {
        vec![GridDem::flat(-1.0, -1.0, 0.001, 3000, 3000, 50.0)]
    }

    #[test]
    fn single_precision_runway_produces_pavement_and_writes_object() {
        let airport = sample_airport();
        let dems = flat_dem_sources();
        let sources: Vec<&dyn DemSource> = dems.iter().map(|d| d as &dyn DemSource).collect();
        let chopper = Chopper::new();
        let counter = IdCounter::open(InMemoryCounterStore::new(0)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let outcome = build_airport(
            &airport,
            &sources,
            dir.path(),
            &chopper,
            &counter,
            &BuildOptions::default(),
        )
        .unwrap();

        assert!(outcome.triangle_count > 0);
        assert!(outcome.output_path.exists());

        let scene = SceneObject::read_from_path(&outcome.output_path).unwrap();
        assert!(!scene.vertices.is_empty());
        assert!(scene.groups.iter().any(|g| g.kind == GroupKind::Triangles));
    }

    #[test]
    fn build_enqueues_hole_and_clearing_pieces() {
        let airport = sample_airport();
        let dems = flat_dem_sources();
        let sources: Vec<&dyn DemSource> = dems.iter().map(|d| d as &dyn DemSource).collect();
        let chopper = Chopper::new();
        let counter = IdCounter::open(InMemoryCounterStore::new(0)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        build_airport(&airport, &sources, dir.path(), &chopper, &counter, &BuildOptions::default()).unwrap();

        assert!(chopper.pending_count() > 0);
    }

    #[test]
    fn crossing_runways_leave_a_gap_in_the_lower_priority_centerline() {
        let mut airport = sample_airport();
        airport.runways = vec![
            flat_runway(Surface::Asphalt, 3, -0.005, 0.005),
            {
                let mut rwy = flat_runway(Surface::Asphalt, 2, 0.0, 0.0);
                rwy.ends[0].lat_deg = -0.005;
                rwy.ends[1].lat_deg = 0.005;
                rwy
            },
        ];

        let ordered = runway::order_passes(&airport.runways);
        let mut accumulation: Vec<Polygon> = Vec::new();
        let mut any_clipped = false;
        for rwy in &ordered {
            for sp in runway::gen_pavement(rwy) {
                let pieces = algebra::difference(
                    std::slice::from_ref(&sp.polygon),
                    &accumulation,
                    &sp.material,
                );
                if sp.material == "rwy_white_lines" && pieces.len() != 1 {
                    any_clipped = true;
                }
                accumulation = algebra::union(&accumulation, &pieces, "accumulation");
            }
        }
        assert!(any_clipped, "expected the crossing centerline to be split by clipping");
    }

    #[test]
    fn missing_runways_is_rejected() {
        let mut airport = sample_airport();
        airport.runways.clear();
        let dems = flat_dem_sources();
        let sources: Vec<&dyn DemSource> = dems.iter().map(|d| d as &dyn DemSource).collect();
        let chopper = Chopper::new();
        let counter = IdCounter::open(InMemoryCounterStore::new(0)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = build_airport(&airport, &sources, dir.path(), &chopper, &counter, &BuildOptions::default());
        assert!(result.is_err());
    }
}
