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

//! Runway and approach lighting (spec §4.F).
//!
//! Every light point is emitted as a [`Superpoly`] whose polygon holds
//! one point per light and whose parallel normal array holds the
//! direction a pilot on approach should see the light face. Points of
//! the same color are grouped into a single superpoly per call, mirroring
//! the original generator's `r_lights`/`w_lights`/`y_lights`/`g_lights`
//! bucket-by-color convention.

use aptdat::{ApproachLights, Runway};
use aptgeo::{geodesy, Contour, GeoPoint, Polygon};

use crate::superpoly::Superpoly;

/// Cross product of two 3D vectors.
fn cross(a: (f64, f64, f64), b: (f64, f64, f64)) -> (f64, f64, f64) {
    (
        a.1 * b.2 - a.2 * b.1,
        a.2 * b.0 - a.0 * b.2,
        a.0 * b.1 - a.1 * b.0,
    )
}

fn sub(a: (f64, f64, f64), b: (f64, f64, f64)) -> (f64, f64, f64) {
    (a.0 - b.0, a.1 - b.1, a.2 - b.2)
}

fn normalize(v: (f64, f64, f64)) -> (f64, f64, f64) {
    let mag = (v.0 * v.0 + v.1 * v.1 + v.2 * v.2).sqrt();
    if mag < f64::EPSILON {
        return v;
    }
    (v.0 / mag, v.1 / mag, v.2 / mag)
}

/// Rotates `v` by `angle_deg` around unit axis `axis`, via Rodrigues'
/// rotation formula (the axis-angle form the original expresses as an
/// `SGQuatf::fromAngleAxisDeg` rotation).
fn rotate_axis_angle(v: (f64, f64, f64), axis: (f64, f64, f64), angle_deg: f64) -> (f64, f64, f64) {
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = (theta.sin(), theta.cos());
    let dot = v.0 * axis.0 + v.1 * axis.1 + v.2 * axis.2;
    let cross_av = cross(axis, v);
    (
        v.0 * cos_t + cross_av.0 * sin_t + axis.0 * dot * (1.0 - cos_t),
        v.1 * cos_t + cross_av.1 * sin_t + axis.1 * dot * (1.0 - cos_t),
        v.2 * cos_t + cross_av.2 * sin_t + axis.2 * dot * (1.0 - cos_t),
    )
}

/// The direction a runway light should face: pitched `pitch_deg` above
/// the runway centerline vector, around the horizontal axis perpendicular
/// to it. Grounded on `gen_runway_light_vector`.
pub fn light_vector(rwy: &Runway, pitch_deg: f64, recip: bool) -> (f64, f64, f64) {
    let (p0, p1) = if recip {
        (rwy.ends[1].point(), rwy.ends[0].point())
    } else {
        (rwy.ends[0].point(), rwy.ends[1].point())
    };
    let cart1 = normalize(to_unit_cart(&p0));
    let cart2 = normalize(to_unit_cart(&p1));
    let runway_vec = normalize(sub(cart1, cart2));
    let horizontal = normalize(cross(cart1, runway_vec));
    rotate_axis_angle(runway_vec, horizontal, pitch_deg)
}

fn to_unit_cart(p: &GeoPoint) -> (f64, f64, f64) {
    geodesy::geocentric_up(p)
}

/// Which end of the pair is the "start" for this direction of travel.
fn reference(rwy: &Runway, recip: bool) -> (GeoPoint, f64, f64) {
    let (heading_deg, _) = heading_and_length(rwy);
    if recip {
        let length_hdg = normalize_heading(heading_deg + 180.0);
        (rwy.ends[1].point(), length_hdg, rwy.ends[1].threshold_m)
    } else {
        (rwy.ends[0].point(), heading_deg, rwy.ends[0].threshold_m)
    }
}

fn heading_and_length(rwy: &Runway) -> (f64, f64) {
    let solved = geodesy::inverse(
        rwy.ends[0].lat_deg,
        rwy.ends[0].lon_deg,
        rwy.ends[1].lat_deg,
        rwy.ends[1].lon_deg,
    );
    (solved.forward_azimuth_deg, solved.distance_m)
}

fn normalize_heading(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// One light-color group: a flat point list plus the shared direction
/// normal, wrapped into a [`Superpoly`] by [`group_to_superpoly`].
struct Group {
    material: &'static str,
    points: Vec<GeoPoint>,
}

impl Group {
    fn new(material: &'static str) -> Self {
        Self {
            material,
            points: Vec::new(),
        }
    }

    fn push(&mut self, p: GeoPoint) {
        self.points.push(p);
    }
}

fn group_to_superpoly(group: Group, normal: (f64, f64, f64)) -> Option<Superpoly> {
    if group.points.is_empty() {
        return None;
    }
    let count = group.points.len();
    let polygon = Polygon::new(Contour::outer(group.points)).with_material(group.material);
    Superpoly::new(polygon, group.material)
        .with_normals(vec![normal; count])
        .ok()
}

/// Runway edge lights: white along most of the runway, switching to
/// yellow in the last 610 m (or half-length, whichever is shorter),
/// with a denser red bar across each threshold. Spaced 60 m or the
/// next divisor below it, per `gen_runway_edge_lights`. Emits nothing
/// when the runway carries no edge lighting (`lights.cxx` gates the
/// whole edge/threshold family on `rwy.edge_lights`).
pub fn gen_edge_lights(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    if rwy.edge_lights == 0 {
        return Vec::new();
    }
    let (_, length_m) = heading_and_length(rwy);
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let offset = 2.0 + rwy.width_m * 0.5;
    let normal = light_vector(rwy, 3.0, recip);

    let mut dist = length_m - rwy.ends[0].threshold_m - rwy.ends[1].threshold_m;
    if dist <= 0.0 {
        return Vec::new();
    }
    let divs = (dist / 60.0) as i32 + 1;
    let step = dist / divs as f64;

    let mut red = Group::new("RWY_RED_LIGHTS");
    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut yellow = Group::new("RWY_YELLOW_LIGHTS");

    let pt1 = geodesy::offset(&start, length_hdg, threshold_m);

    if threshold_m > step {
        let mut pt0 = pt1;
        let tstep = (threshold_m / step) as i32;
        for _ in 0..tstep {
            pt0 = geodesy::offset(&pt0, length_hdg, -step);
            red.push(geodesy::offset(&pt0, left_hdg, offset));
            red.push(geodesy::offset(&pt0, left_hdg, -offset));
        }
    }

    let mut pt = pt1;
    for _ in 0..divs {
        pt = geodesy::offset(&pt, length_hdg, step);
        dist -= step;
        if dist > 610.0 || dist > length_m / 2.0 {
            white.push(geodesy::offset(&pt, left_hdg, offset));
            white.push(geodesy::offset(&pt, left_hdg, -offset));
        } else if dist > 5.0 {
            yellow.push(geodesy::offset(&pt, left_hdg, offset));
            yellow.push(geodesy::offset(&pt, left_hdg, -offset));
        }
    }

    [red, white, yellow]
        .into_iter()
        .filter_map(|g| group_to_superpoly(g, normal))
        .collect()
}

/// Whether this end gets the simple green threshold bar: edge lights
/// present, and the approach system is either absent or omnidirectional
/// (spec §4.F: "a runway with edge lights but no (or only an
/// omnidirectional) approach system additionally receives a simple
/// threshold bar").
fn has_simple_threshold_bar(rwy: &Runway, recip: bool) -> bool {
    if rwy.edge_lights == 0 {
        return false;
    }
    let code = if recip {
        rwy.ends[1].approach_lights
    } else {
        rwy.ends[0].approach_lights
    };
    matches!(code, ApproachLights::None | ApproachLights::Odals)
}

/// Green threshold bar lights, spanning the runway width at each
/// threshold. Only called when [`has_simple_threshold_bar`] holds.
pub fn gen_threshold_lights(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 3.0, recip);
    let anchor = geodesy::offset(&start, length_hdg, threshold_m);

    let mut green = Group::new("RWY_GREEN_LIGHTS");
    let half_count = ((rwy.width_m / 2.0) / 3.0).round() as i32;
    for i in -half_count..=half_count {
        green.push(geodesy::offset(&anchor, left_hdg, i as f64 * 3.0));
    }

    group_to_superpoly(green, normal).into_iter().collect()
}

/// Centerline lights, tiling the runway at 15 m spacing: white until
/// 900 m remain, alternating red/white to 300 m, solid red thereafter.
pub fn gen_centerline_lights(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    if !rwy.centerline_lights {
        return Vec::new();
    }
    let (_, length_m) = heading_and_length(rwy);
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let normal = light_vector(rwy, 3.0, recip);
    let usable = length_m - rwy.ends[0].threshold_m - rwy.ends[1].threshold_m;

    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut red = Group::new("RWY_RED_LIGHTS");

    let spacing = 15.0;
    let count = (usable / spacing) as i32;
    let mut pt = geodesy::offset(&start, length_hdg, threshold_m);
    for i in 0..count {
        let remaining = usable - i as f64 * spacing;
        if remaining <= 300.0 {
            red.push(pt);
        } else if remaining <= 900.0 && i % 2 == 0 {
            red.push(pt);
        } else {
            white.push(pt);
        }
        pt = geodesy::offset(&pt, length_hdg, spacing);
    }

    [white, red]
        .into_iter()
        .filter_map(|g| group_to_superpoly(g, normal))
        .collect()
}

/// Touchdown zone lights: paired three-light bars flanking the
/// centerline, repeating every 30 m for up to 900 m (or half the
/// runway length, whichever is shorter), capped at 30 rows. Grounded
/// on `gen_touchdown_zone_lights`.
pub fn gen_touchdown_zone_lights(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let (_, length_m) = heading_and_length(rwy);
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 3.0, recip);

    let rows = ((length_m * 0.5) / 30.0) as i32;
    let rows = rows.min(30);

    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut bar = geodesy::offset(&start, length_hdg, threshold_m);
    for _ in 0..rows {
        bar = geodesy::offset(&bar, length_hdg, 30.0);
        for side in [11.0, -11.0] {
            let mut pt = geodesy::offset(&bar, left_hdg, side);
            white.push(pt);
            pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.5);
            white.push(pt);
            pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.5);
            white.push(pt);
        }
    }

    group_to_superpoly(white, normal).into_iter().collect()
}

/// Runway end identifier lights: two omnidirectional strobes flanking
/// the threshold.
pub fn gen_reil(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 10.0, recip);
    let anchor = geodesy::offset(&start, length_hdg, threshold_m);
    let half_width = rwy.width_m / 2.0 + 3.0;

    let mut strobe = Group::new("RWY_SEQUENCED_LIGHTS");
    strobe.push(geodesy::offset(&anchor, left_hdg, half_width));
    strobe.push(geodesy::offset(&anchor, left_hdg, -half_width));

    group_to_superpoly(strobe, normal).into_iter().collect()
}

/// ALSF-I / ALSF-II / SALS / SALSF center-bar approach lighting,
/// grounded on `gen_alsf`: a center bar of lights every 30 m (ALSF) or
/// every 30 m over a shorter run (SALS), side rows at 300-600-900 m,
/// a terminating bar 60 m before the threshold for ALSF-I/SALS, and a
/// red side-row for ALSF-II.
fn gen_alsf(rwy: &Runway, recip: bool, is_full: bool, has_terminating_bar: bool, has_red_rows: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 3.0, recip);
    let ref_save = geodesy::offset(&start, length_hdg, threshold_m);

    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut red = Group::new("RWY_RED_LIGHTS");

    let (start_offset, count) = if is_full { (30.0, 30) } else { (90.0, 13) };
    let mut ref_pt = geodesy::offset(&ref_save, length_hdg, -start_offset);
    for _ in 0..count {
        white.push(ref_pt);
        white.push(geodesy::offset(&ref_pt, left_hdg, 1.0));
        white.push(geodesy::offset(&ref_pt, left_hdg, 2.0));
        white.push(geodesy::offset(&ref_pt, left_hdg, -1.0));
        white.push(geodesy::offset(&ref_pt, left_hdg, -2.0));
        ref_pt = geodesy::offset(&ref_pt, length_hdg, -30.0);
    }

    if has_terminating_bar {
        let bar = geodesy::offset(&ref_save, length_hdg, -60.0);
        for side in [4.5, -4.5] {
            let mut pt = geodesy::offset(&bar, left_hdg, side);
            for _ in 0..3 {
                red.push(pt);
                pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.5);
            }
        }
    }

    if has_red_rows {
        let mut bar = ref_save;
        for _ in 0..9 {
            bar = geodesy::offset(&bar, length_hdg, -30.0);
            for side in [11.0, -11.0] {
                let mut pt = geodesy::offset(&bar, left_hdg, side);
                for _ in 0..3 {
                    red.push(pt);
                    pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.5);
                }
            }
        }
    }

    if has_terminating_bar {
        let bar = geodesy::offset(&ref_save, length_hdg, -30.0);
        for side in [22.5, -22.5] {
            let mut pt = geodesy::offset(&bar, left_hdg, side);
            for _ in 0..5 {
                red.push(pt);
                pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.0);
            }
        }
    }

    [white, red]
        .into_iter()
        .filter_map(|g| group_to_superpoly(g, normal))
        .collect()
}

/// Calvert-I / Calvert-II, grounded on `gen_calvert`: a 900 m center
/// bar fanning from single lights to 3-wide, 5 crossbars of increasing
/// width, and (Calvert-II only) a red/white bar pattern inside 300 m.
fn gen_calvert(rwy: &Runway, recip: bool, is_cal2: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 3.0, recip);
    let ref_save = geodesy::offset(&start, length_hdg, threshold_m);

    let vert_space = 30.0;
    let horiz_space = 10.0;

    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut red = Group::new("RWY_RED_LIGHTS");

    let mut crossbar = [ref_save; 5];
    let mut pt = ref_save;
    for i in 0..30 {
        pt = geodesy::offset(&pt, length_hdg, -vert_space);
        if (10..20).contains(&i) {
            white.push(geodesy::offset(&pt, left_hdg, horiz_space / 2.0));
            white.push(geodesy::offset(&pt, left_hdg, -horiz_space / 2.0));
        } else if i >= 20 {
            white.push(pt);
            white.push(geodesy::offset(&pt, left_hdg, horiz_space));
            white.push(geodesy::offset(&pt, left_hdg, -horiz_space));
        } else if !is_cal2 {
            white.push(pt);
        } else {
            red.push(pt);
        }
        if matches!(i, 4 | 9 | 14 | 19 | 24) {
            crossbar[((i - 4) / 5) as usize] = pt;
        }
    }

    if is_cal2 {
        let mut bar = ref_save;
        for _ in 0..9 {
            bar = geodesy::offset(&bar, length_hdg, -vert_space);
            for side in [1.0, -1.0] {
                let mut wpt = geodesy::offset(&bar, left_hdg, side * 1.5);
                white.push(wpt);
                wpt = geodesy::offset(&wpt, left_hdg, side * 1.5);
                white.push(wpt);

                let mut rpt = geodesy::offset(&bar, left_hdg, side * 11.0);
                for _ in 0..3 {
                    red.push(rpt);
                    rpt = geodesy::offset(&rpt, left_hdg, side * 1.5);
                }
            }
        }
    }

    for (i, bar) in crossbar.into_iter().enumerate() {
        let num_lights = 4 + i as i32;
        for side in [1.0, -1.0] {
            let mut pt = bar;
            for _ in 0..num_lights {
                pt = geodesy::offset(&pt, left_hdg, side * horiz_space);
                white.push(pt);
            }
        }
    }

    [white, red]
        .into_iter()
        .filter_map(|g| group_to_superpoly(g, normal))
        .collect()
}

/// SSALS/SSALF/SSALR and MALS/MALSF/MALSR, grounded on `gen_ssalx`: a
/// 7-bar center line every 60 m, an extra row at -300 m, and for the
/// `R`/`F` variants a sequenced-flasher row (rabbit lights every 60 m
/// out to 480 m, or 3 flashers aligned with the last bars).
fn gen_ssalx_family(
    rwy: &Runway,
    recip: bool,
    sequenced: Option<SequencedKind>,
) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let left_hdg = normalize_heading(length_hdg - 90.0);
    let normal = light_vector(rwy, 3.0, recip);
    let ref_save = geodesy::offset(&start, length_hdg, threshold_m);

    let mut white = Group::new("RWY_WHITE_LIGHTS");
    let mut strobe = Group::new("RWY_SEQUENCED_LIGHTS");

    let mut bar = ref_save;
    for _ in 0..7 {
        bar = geodesy::offset(&bar, length_hdg, -60.0);
        white.push(bar);
        for side in [1.0, -1.0] {
            let mut pt = geodesy::offset(&bar, left_hdg, side);
            white.push(pt);
            pt = geodesy::offset(&pt, left_hdg, side);
            white.push(pt);
        }
    }

    let row = geodesy::offset(&ref_save, length_hdg, -300.0);
    for side in [4.5, -4.5] {
        let mut pt = geodesy::offset(&row, left_hdg, side);
        for _ in 0..5 {
            white.push(pt);
            pt = geodesy::offset(&pt, left_hdg, side.signum() * 1.5);
        }
    }

    match sequenced {
        Some(SequencedKind::Rabbit) => {
            let mut pt = geodesy::offset(&ref_save, length_hdg, -480.0);
            for _ in 0..8 {
                strobe.push(pt);
                pt = geodesy::offset(&pt, length_hdg, -60.0);
            }
        }
        Some(SequencedKind::Flasher) => {
            let mut pt = geodesy::offset(&ref_save, length_hdg, -300.0);
            for _ in 0..3 {
                strobe.push(pt);
                pt = geodesy::offset(&pt, length_hdg, -60.0);
            }
        }
        None => {}
    }

    [white, strobe]
        .into_iter()
        .filter_map(|g| group_to_superpoly(g, normal))
        .collect()
}

enum SequencedKind {
    Rabbit,
    Flasher,
}

/// Omnidirectional approach lights (spec §4.F): a single row of
/// strobes out to 450 m with no centerline bar, since ODALS carries no
/// steady-burning bar lights in the original system either.
fn gen_odals(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let normal = light_vector(rwy, 10.0, recip);
    let ref_save = geodesy::offset(&start, length_hdg, threshold_m);

    let mut strobe = Group::new("RWY_SEQUENCED_LIGHTS");
    let mut pt = ref_save;
    for _ in 0..5 {
        pt = geodesy::offset(&pt, length_hdg, -90.0);
        strobe.push(pt);
    }

    group_to_superpoly(strobe, normal).into_iter().collect()
}

/// RAIL (Runway Alignment Indicator Lights): a standalone sequenced
/// strobe row, used to supplement existing approach lighting rather
/// than replace it.
fn gen_rail(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let (start, length_hdg, threshold_m) = reference(rwy, recip);
    let normal = light_vector(rwy, 10.0, recip);
    let ref_save = geodesy::offset(&start, length_hdg, threshold_m);

    let mut strobe = Group::new("RWY_SEQUENCED_LIGHTS");
    let mut pt = ref_save;
    for _ in 0..8 {
        pt = geodesy::offset(&pt, length_hdg, -60.0);
        strobe.push(pt);
    }

    group_to_superpoly(strobe, normal).into_iter().collect()
}

/// Dispatches on the end's approach-light code and builds its full
/// light set. `Unsupported` and `None` produce no geometry.
pub fn gen_approach_lights(rwy: &Runway, recip: bool) -> Vec<Superpoly> {
    let code = if recip {
        rwy.ends[1].approach_lights
    } else {
        rwy.ends[0].approach_lights
    };
    match code {
        ApproachLights::AlsfI => gen_alsf(rwy, recip, true, true, false),
        ApproachLights::AlsfII => gen_alsf(rwy, recip, true, false, true),
        ApproachLights::Sals => gen_alsf(rwy, recip, false, false, false),
        ApproachLights::Malsf => gen_alsf(rwy, recip, false, false, false),
        ApproachLights::CalvertI => gen_calvert(rwy, recip, false),
        ApproachLights::CalvertII => gen_calvert(rwy, recip, true),
        ApproachLights::Ssalr => gen_ssalx_family(rwy, recip, Some(SequencedKind::Rabbit)),
        ApproachLights::Ssalf => gen_ssalx_family(rwy, recip, Some(SequencedKind::Flasher)),
        ApproachLights::Malsr => gen_ssalx_family(rwy, recip, Some(SequencedKind::Rabbit)),
        ApproachLights::Malsx => gen_ssalx_family(rwy, recip, None),
        ApproachLights::Odals => gen_odals(rwy, recip),
        ApproachLights::Rail => gen_rail(rwy, recip),
        ApproachLights::None | ApproachLights::Unsupported(_) => Vec::new(),
    }
}

/// Builds every light superpoly for both ends of one runway: edge,
/// threshold, centerline, touchdown zone, REIL and the end-specific
/// approach lighting. Dispatches per spec §4.F on `edge_lights`,
/// `centerline_lights`, `tz_lights[end]`, `reil[end]` and
/// `approach_lights[end]`; a runway with no edge lights and no approach
/// system at either end emits nothing.
pub fn gen_all_lights(rwy: &Runway) -> Vec<Superpoly> {
    let mut out = Vec::new();
    for recip in [false, true] {
        out.extend(gen_edge_lights(rwy, recip));
        if has_simple_threshold_bar(rwy, recip) {
            out.extend(gen_threshold_lights(rwy, recip));
        }
        out.extend(gen_centerline_lights(rwy, recip));
        out.extend(gen_approach_lights(rwy, recip));
        let end = if recip { &rwy.ends[1] } else { &rwy.ends[0] };
        if end.tz_lights {
            out.extend(gen_touchdown_zone_lights(rwy, recip));
        }
        if end.reil {
            out.extend(gen_reil(rwy, recip));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptdat::{Marking, RunwayEnd, RunwayKind, Surface};

    fn sample_runway(approach: ApproachLights) -> Runway {
        Runway {
            kind: RunwayKind::Land,
            width_m: 45.0,
            surface: Surface::Asphalt,
            shoulder: 0,
            smoothness: 1.0,
            centerline_lights: true,
            edge_lights: 2,
            dist_remain_signs: false,
            ends: [
                RunwayEnd {
                    ident: "09".into(),
                    lat_deg: 0.0,
                    lon_deg: 0.0,
                    threshold_m: 0.0,
                    overrun_m: 0.0,
                    marking: Marking(3),
                    approach_lights: approach,
                    tz_lights: false,
                    reil: true,
                },
                RunwayEnd {
                    ident: "27".into(),
                    lat_deg: 0.0,
                    lon_deg: 0.03,
                    threshold_m: 0.0,
                    overrun_m: 0.0,
                    marking: Marking(3),
                    approach_lights: ApproachLights::None,
                    tz_lights: false,
                    reil: false,
                },
            ],
            is_taxiway: false,
        }
    }

    #[test]
    fn light_vector_is_unit_length() {
        let rwy = sample_runway(ApproachLights::None);
        let v = light_vector(&rwy, 3.0, false);
        let mag = (v.0 * v.0 + v.1 * v.1 + v.2 * v.2).sqrt();
        assert!((mag - 1.0).abs() < 1e-6);
    }

    #[test]
    fn edge_lights_nonempty_for_long_runway() {
        let rwy = sample_runway(ApproachLights::None);
        let lights = gen_edge_lights(&rwy, false);
        assert!(!lights.is_empty());
    }

    #[test]
    fn alsf_ii_has_more_red_lights_than_alsf_i() {
        let alsf1 = sample_runway(ApproachLights::AlsfI);
        let alsf2 = sample_runway(ApproachLights::AlsfII);
        let l1 = gen_approach_lights(&alsf1, false);
        let l2 = gen_approach_lights(&alsf2, false);
        let red_count = |lights: &[Superpoly]| -> usize {
            lights
                .iter()
                .find(|s| s.material == "RWY_RED_LIGHTS")
                .map(|s| s.polygon.all_points().count())
                .unwrap_or(0)
        };
        assert!(red_count(&l2) > red_count(&l1));
    }

    #[test]
    fn ssalr_emits_sequenced_group() {
        let rwy = sample_runway(ApproachLights::Ssalr);
        let lights = gen_approach_lights(&rwy, false);
        assert!(lights.iter().any(|s| s.material == "RWY_SEQUENCED_LIGHTS"));
    }

    #[test]
    fn reil_emits_two_points() {
        let rwy = sample_runway(ApproachLights::None);
        let lights = gen_reil(&rwy, false);
        assert_eq!(lights[0].polygon.all_points().count(), 2);
    }

    #[test]
    fn no_approach_lights_code_emits_nothing() {
        let rwy = sample_runway(ApproachLights::None);
        assert!(gen_approach_lights(&rwy, false).is_empty());
    }

    #[test]
    fn centerline_disabled_emits_nothing() {
        let mut rwy = sample_runway(ApproachLights::None);
        rwy.centerline_lights = false;
        assert!(gen_centerline_lights(&rwy, false).is_empty());
    }

    #[test]
    fn no_edge_lights_suppresses_edge_and_threshold_and_all_lights() {
        let mut rwy = sample_runway(ApproachLights::None);
        rwy.edge_lights = 0;
        rwy.centerline_lights = false;
        rwy.ends[0].reil = false;
        assert!(gen_edge_lights(&rwy, false).is_empty());
        assert!(!has_simple_threshold_bar(&rwy, false));
        assert!(gen_all_lights(&rwy).is_empty());
    }

    #[test]
    fn threshold_bar_suppressed_under_directional_approach_system() {
        let rwy = sample_runway(ApproachLights::AlsfI);
        assert!(!has_simple_threshold_bar(&rwy, false));
    }

    #[test]
    fn threshold_bar_allowed_under_omnidirectional_approach_system() {
        let rwy = sample_runway(ApproachLights::Odals);
        assert!(has_simple_threshold_bar(&rwy, false));
    }

    #[test]
    fn touchdown_zone_lights_are_a_single_white_group_of_paired_bars() {
        let rwy = sample_runway(ApproachLights::None);
        let tz = gen_touchdown_zone_lights(&rwy, false);
        assert_eq!(tz.len(), 1);
        assert_eq!(tz[0].material, "RWY_WHITE_LIGHTS");
        // Three lights per bar, two bars per row.
        let count = tz[0].polygon.all_points().count();
        assert!(count > 0);
        assert_eq!(count % 6, 0);
    }

    #[test]
    fn gen_all_lights_only_includes_touchdown_zone_lights_when_flagged() {
        let without_tz = sample_runway(ApproachLights::None);
        let with_tz = {
            let mut rwy = sample_runway(ApproachLights::None);
            rwy.ends[0].tz_lights = true;
            rwy
        };
        assert!(gen_all_lights(&with_tz).len() > gen_all_lights(&without_tz).len());
    }
}
