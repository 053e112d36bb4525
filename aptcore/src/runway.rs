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

//! Per-runway/taxiway pavement geometry and markings (spec §4.E).

use aptdat::{Runway, RunwayKind, Surface};
use aptgeo::texture::{TexParams, TexProjection};
use aptgeo::{geodesy, Contour, GeoPoint, Polygon};

use crate::superpoly::Superpoly;

/// Which marking family a runway/taxiway belongs to, per spec §4.E's
/// `type_flag` table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeFlag {
    Precision,
    NonPrecision,
    Visual,
    /// Paved, but neither end carries a recognized marking code.
    Plain,
    Buoy,
    Helipad,
    /// Dirt, grass, turf or dry-lakebed: a single untextured quad.
    UnpavedQuad,
}

/// Classifies a runway record for the marking-layer pass. Helipads and
/// water runways are classified by their record kind; everything else
/// is classified by surface, then by the more permissive of its two end
/// markings.
pub fn classify(rwy: &Runway) -> TypeFlag {
    match rwy.kind {
        RunwayKind::Helipad => return TypeFlag::Helipad,
        RunwayKind::Water => return TypeFlag::Buoy,
        RunwayKind::Land => {}
    }
    match rwy.surface {
        Surface::Turf | Surface::Dirt | Surface::Gravel | Surface::DryLakebed => {
            return TypeFlag::UnpavedQuad
        }
        Surface::Water => return TypeFlag::Buoy,
        _ => {}
    }
    let best_marking = rwy.ends.iter().map(|e| e.marking.0).max().unwrap_or(0);
    if rwy.ends.iter().any(|e| e.marking.is_precision()) {
        TypeFlag::Precision
    } else if rwy.ends.iter().any(|e| e.marking.is_non_precision()) {
        TypeFlag::NonPrecision
    } else if best_marking > 0 {
        TypeFlag::Visual
    } else {
        TypeFlag::Plain
    }
}

/// Base pavement material prefix, grounded on the original surface-code
/// dispatch (asphalt -> `pa_`, concrete -> `pc_`, turf/grass ->
/// `grass_rwy`, dirt/gravel/dry-lakebed -> `dirt_rwy`); the
/// taxiway/tiedown split for concrete follows the `width <= 150`
/// threshold spec §4.E states explicitly.
pub fn material_for(rwy: &Runway) -> Option<String> {
    match rwy.surface {
        Surface::Asphalt => Some(if rwy.is_taxiway {
            "pa_taxiway".to_string()
        } else {
            "pa_rwy".to_string()
        }),
        Surface::Concrete => Some(if rwy.is_taxiway {
            if rwy.width_m <= 150.0 {
                "pc_taxiway".to_string()
            } else {
                "pc_tiedown".to_string()
            }
        } else {
            "pc_rwy".to_string()
        }),
        Surface::Turf => Some("grass_rwy".to_string()),
        Surface::Dirt | Surface::Gravel | Surface::DryLakebed => Some("dirt_rwy".to_string()),
        Surface::Water => None,
        _ => Some("pa_rwy".to_string()),
    }
}

/// The four-corner outer pavement quad: geodesic offsets from the
/// runway midpoint, half-length along heading (with per-end
/// displacement/extension), half-width along heading-90 (with
/// extension). Corner order is clockwise starting at the `-length,
/// -width` corner, matching `gen_wgs84_area`'s winding.
pub fn gen_runway_area_w_extend(
    rwy: &Runway,
    length_extend_m: f64,
    displ_begin_m: f64,
    displ_end_m: f64,
    width_extend_m: f64,
) -> Polygon {
    let (heading_deg, length_m) = heading_and_length(rwy);
    let mid = midpoint(rwy);
    let half_width = rwy.width_m / 2.0 + width_extend_m;

    let fwd = heading_deg;
    let left = normalize_heading(heading_deg - 90.0);
    let right = normalize_heading(heading_deg + 90.0);

    let plus_end = geodesy::offset(&mid, fwd, length_m / 2.0 + length_extend_m - displ_end_m);
    let minus_end = geodesy::offset(&mid, normalize_heading(fwd + 180.0), length_m / 2.0 + length_extend_m - displ_begin_m);

    let c0 = geodesy::offset(&minus_end, right, half_width);
    let c1 = geodesy::offset(&minus_end, left, half_width);
    let c2 = geodesy::offset(&plus_end, left, half_width);
    let c3 = geodesy::offset(&plus_end, right, half_width);

    Polygon::new(Contour::outer(vec![c0, c1, c2, c3]))
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

fn midpoint(rwy: &Runway) -> GeoPoint {
    geodesy::midpoint(&rwy.ends[0].point(), &rwy.ends[1].point())
}

fn normalize_heading(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// A narrow rectangle `width_m` x `length_m` centered on `anchor`,
/// oriented along `heading_deg`, used for every marking bar/stripe.
fn marking_rect(anchor: &GeoPoint, heading_deg: f64, width_m: f64, length_m: f64) -> Polygon {
    let left = normalize_heading(heading_deg - 90.0);
    let right = normalize_heading(heading_deg + 90.0);
    let half_w = width_m / 2.0;
    let half_l = length_m / 2.0;

    let front = geodesy::offset(anchor, heading_deg, half_l);
    let back = geodesy::offset(anchor, normalize_heading(heading_deg + 180.0), half_l);

    let c0 = geodesy::offset(&back, right, half_w);
    let c1 = geodesy::offset(&back, left, half_w);
    let c2 = geodesy::offset(&front, left, half_w);
    let c3 = geodesy::offset(&front, right, half_w);

    Polygon::new(Contour::outer(vec![c0, c1, c2, c3]))
}

fn superpoly_with_tex(
    polygon: Polygon,
    material: &str,
    anchor: GeoPoint,
    width_m: f64,
    length_m: f64,
    heading_deg: f64,
    tile: bool,
) -> Superpoly {
    let method = if tile {
        TexProjection::Tile
    } else {
        TexProjection::Clip
    };
    let tex = TexParams::new(anchor, width_m, length_m, heading_deg).with_method(method);
    let poly = polygon.with_material(material).with_tex_params(tex);
    Superpoly::new(poly, material)
}

/// Builds the pavement base superpoly plus the marking-layer superpolys
/// for one runway, per its [`TypeFlag`] (spec §4.E table). Returns an
/// empty vec for [`TypeFlag::Buoy`] and [`TypeFlag::Helipad`], which
/// carry no pavement.
pub fn gen_pavement(rwy: &Runway) -> Vec<Superpoly> {
    let flag = classify(rwy);
    if matches!(flag, TypeFlag::Buoy) {
        return Vec::new();
    }

    let (heading_deg, length_m) = heading_and_length(rwy);
    let mid = midpoint(rwy);
    let material = material_for(rwy).unwrap_or_else(|| "pa_rwy".to_string());

    let pavement = gen_runway_area_w_extend(rwy, 0.0, 0.0, 0.0, 0.0);
    let mut out = vec![superpoly_with_tex(
        pavement,
        &material,
        mid,
        rwy.width_m,
        length_m,
        heading_deg,
        rwy.is_taxiway,
    )];

    if matches!(flag, TypeFlag::UnpavedQuad | TypeFlag::Helipad) {
        return out;
    }

    // Centerline stripe: a thin rectangle the full length of the
    // runway, common to every marked paved variant.
    out.push(superpoly_with_tex(
        marking_rect(&mid, heading_deg, 0.9, length_m - 6.0),
        "rwy_white_lines",
        mid,
        0.9,
        length_m - 6.0,
        heading_deg,
        true,
    ));

    match flag {
        TypeFlag::Precision => {
            // Side stripes, run the pavement length just inside each edge.
            for side_heading in [
                normalize_heading(heading_deg - 90.0),
                normalize_heading(heading_deg + 90.0),
            ] {
                let offset_anchor =
                    geodesy::offset(&mid, side_heading, rwy.width_m / 2.0 - 1.5);
                out.push(superpoly_with_tex(
                    marking_rect(&offset_anchor, heading_deg, 0.9, length_m - 6.0),
                    "rwy_white_lines",
                    offset_anchor,
                    0.9,
                    length_m - 6.0,
                    heading_deg,
                    true,
                ));
            }
            for end in &rwy.ends {
                let threshold = end.point();
                let inward = geodesy::offset(&threshold, reverse_heading_to(&threshold, &mid), 300.0);
                out.push(superpoly_with_tex(
                    marking_rect(&inward, heading_deg, rwy.width_m * 0.5, 30.0),
                    "rwy_aiming_point",
                    inward,
                    rwy.width_m * 0.5,
                    30.0,
                    heading_deg,
                    false,
                ));
                for i in 0..6 {
                    let dist = 150.0 + i as f64 * 150.0;
                    if dist > length_m / 2.0 {
                        break;
                    }
                    let bar = geodesy::offset(&threshold, reverse_heading_to(&threshold, &mid), dist);
                    out.push(superpoly_with_tex(
                        marking_rect(&bar, heading_deg, rwy.width_m * 0.8, 3.0),
                        "rwy_tdz_bar",
                        bar,
                        rwy.width_m * 0.8,
                        3.0,
                        heading_deg,
                        false,
                    ));
                }
                out.push(gen_numbers(&threshold, heading_deg, rwy.width_m, &mid));
            }
        }
        TypeFlag::NonPrecision => {
            for end in &rwy.ends {
                let threshold = end.point();
                let bar = geodesy::offset(&threshold, reverse_heading_to(&threshold, &mid), 10.0);
                out.push(superpoly_with_tex(
                    marking_rect(&bar, heading_deg, rwy.width_m * 0.9, 3.0),
                    "rwy_threshold_bar",
                    bar,
                    rwy.width_m * 0.9,
                    3.0,
                    heading_deg,
                    false,
                ));
                out.push(gen_numbers(&threshold, heading_deg, rwy.width_m, &mid));
            }
        }
        TypeFlag::Visual => {
            for end in &rwy.ends {
                out.push(gen_numbers(&end.point(), heading_deg, rwy.width_m, &mid));
            }
        }
        TypeFlag::Plain | TypeFlag::UnpavedQuad | TypeFlag::Buoy | TypeFlag::Helipad => {}
    }

    out
}

fn reverse_heading_to(from: &GeoPoint, to: &GeoPoint) -> f64 {
    geodesy::course(from, to)
}

fn gen_numbers(threshold: &GeoPoint, heading_deg: f64, width_m: f64, mid: &GeoPoint) -> Superpoly {
    let anchor = geodesy::offset(threshold, reverse_heading_to(threshold, mid), 15.0);
    superpoly_with_tex(
        marking_rect(&anchor, heading_deg, width_m * 0.3, 12.0),
        "rwy_numbers",
        anchor,
        width_m * 0.3,
        12.0,
        heading_deg,
        false,
    )
}

/// `base` (spec §4.E): pavement extended by 20 m length / 20 m width
/// for runways, or 10 m all round for taxiways.
pub fn gen_base(rwy: &Runway) -> Polygon {
    if rwy.is_taxiway {
        gen_runway_area_w_extend(rwy, 10.0, -10.0, -10.0, 10.0)
    } else {
        gen_runway_area_w_extend(rwy, 20.0, -20.0, -20.0, 20.0)
    }
}

/// `safe_base` (spec §4.E): runway +-180 m length / +-50 m width;
/// taxiway +-40 m all round.
pub fn gen_safe_base(rwy: &Runway) -> Polygon {
    if rwy.is_taxiway {
        gen_runway_area_w_extend(rwy, 40.0, -40.0, -40.0, 40.0)
    } else {
        gen_runway_area_w_extend(rwy, 180.0, -180.0, -180.0, 50.0)
    }
}

/// Size proxy used for the taxiway ordering pass (spec §4.E, §9 Open
/// Question 2): `length * width`. Ties keep source-traversal order,
/// which falls out naturally from a stable sort.
pub fn taxiway_area_proxy(rwy: &Runway) -> f64 {
    let (_, length_m) = heading_and_length(rwy);
    length_m * rwy.width_m
}

/// Orders runway records into the four passes spec §4.E requires:
/// precision, then non-precision/visual, then other runways, then
/// taxiways by decreasing area. Stable sort preserves source order
/// within a tier and among taxiway ties.
pub fn order_passes(runways: &[Runway]) -> Vec<&Runway> {
    let mut indexed: Vec<(usize, &Runway)> = runways.iter().enumerate().collect();
    indexed.sort_by_key(|(i, rwy)| {
        let tier = if rwy.is_taxiway {
            3
        } else {
            match classify(rwy) {
                TypeFlag::Precision => 0,
                TypeFlag::NonPrecision | TypeFlag::Visual => 1,
                _ => 2,
            }
        };
        (tier, *i)
    });
    // Within the taxiway tier, re-sort by decreasing area, stable on
    // source order for ties.
    let mut taxiway_start = indexed.len();
    for (idx, (_, rwy)) in indexed.iter().enumerate() {
        if rwy.is_taxiway {
            taxiway_start = idx;
            break;
        }
    }
    let (head, tail) = indexed.split_at_mut(taxiway_start);
    tail.sort_by(|(_, a), (_, b)| {
        taxiway_area_proxy(b)
            .partial_cmp(&taxiway_area_proxy(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut out: Vec<&Runway> = head.iter().map(|(_, r)| *r).collect();
    out.extend(tail.iter().map(|(_, r)| *r));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptdat::{ApproachLights, Marking, RunwayEnd};

    fn sample_runway(surface: Surface, marking: u8, is_taxiway: bool) -> Runway {
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
                    lon_deg: 0.0,
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
                    lon_deg: 0.009,
                    threshold_m: 0.0,
                    overrun_m: 0.0,
                    marking: Marking(marking),
                    approach_lights: ApproachLights::None,
                    tz_lights: false,
                    reil: false,
                },
            ],
            is_taxiway,
        }
    }

    #[test]
    fn precision_marking_classifies_as_precision() {
        let rwy = sample_runway(Surface::Asphalt, 3, false);
        assert_eq!(classify(&rwy), TypeFlag::Precision);
    }

    #[test]
    fn grass_surface_is_unpaved_quad_regardless_of_marking() {
        let rwy = sample_runway(Surface::Turf, 3, false);
        assert_eq!(classify(&rwy), TypeFlag::UnpavedQuad);
    }

    #[test]
    fn area_quad_is_a_rectangle() {
        let rwy = sample_runway(Surface::Asphalt, 0, false);
        let quad = gen_runway_area_w_extend(&rwy, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(quad.outer().unwrap().len(), 4);
        for i in 0..4 {
            let angle = quad.outer().unwrap().interior_angle_deg(i);
            assert!((angle - 90.0).abs() < 1.0);
        }
    }

    #[test]
    fn precision_runway_emits_more_layers_than_visual() {
        let precision = sample_runway(Surface::Asphalt, 3, false);
        let visual = sample_runway(Surface::Asphalt, 1, false);
        assert!(gen_pavement(&precision).len() > gen_pavement(&visual).len());
    }

    #[test]
    fn buoy_runway_has_no_pavement() {
        let mut rwy = sample_runway(Surface::Water, 0, false);
        rwy.kind = RunwayKind::Water;
        assert!(gen_pavement(&rwy).is_empty());
    }

    #[test]
    fn order_passes_puts_precision_before_taxiways() {
        let precision = sample_runway(Surface::Asphalt, 3, false);
        let taxiway = sample_runway(Surface::Asphalt, 0, true);
        let runways = vec![taxiway, precision];
        let ordered = order_passes(&runways);
        assert_eq!(classify(ordered[0]), TypeFlag::Precision);
    }
}
