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

//! Line-oriented parser for the airport description format (spec §6).
//!
//! Every record starts with an integer code. The codes this crate
//! turns into typed data are the ones spec §3/§6 names: header
//! (1/16/17), runway (100/101/102), pavement (110) and its node
//! sub-records (111-116), linear feature (120), boundary (130),
//! end-of-file (99). Every other code recognized by the original
//! format (14/15/18/19/20/21, 50-56 comm frequencies, and similar
//! single-line records) is a real record this crate has no use for: it
//! is skipped at trace level rather than treated as a parse error, so a
//! vanilla airport description doesn't need to be stripped first.

use std::path::Path;

use aptgeo::GeoPoint;

use crate::error::Error;
use crate::records::{
    Airport, AirportHeader, AirportKind, ApproachLights, LinearFeature, Marking, PavementBoundary,
    PavementNode, Runway, RunwayEnd, RunwayKind, Surface,
};

const LAND_AIRPORT_CODE: &str = "1";
const SEA_AIRPORT_CODE: &str = "16";
const HELIPORT_CODE: &str = "17";
const LAND_RUNWAY_CODE: &str = "100";
const WATER_RUNWAY_CODE: &str = "101";
const HELIPAD_CODE: &str = "102";
const PAVEMENT_CODE: &str = "110";
const LINEAR_FEATURE_CODE: &str = "120";
const BOUNDARY_CODE: &str = "130";
const NODE_CODE: &str = "111";
const BEZIER_NODE_CODE: &str = "112";
const CLOSE_NODE_CODE: &str = "113";
const CLOSE_BEZIER_NODE_CODE: &str = "114";
const TERM_NODE_CODE: &str = "115";
const TERM_BEZIER_NODE_CODE: &str = "116";
const END_OF_FILE: &str = "99";

#[derive(Debug)]
enum Block {
    None,
    Pavement(PavementBoundary),
    Boundary(PavementBoundary),
    Feature(LinearFeature),
}

/// Parses an airport description file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Airport>, Error> {
    let text = std::fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parses an airport description already loaded into memory.
pub fn parse_str(input: &str) -> Result<Vec<Airport>, Error> {
    let mut airports = Vec::new();
    let mut current = Airport::default();
    let mut have_current = false;
    let mut block = Block::None;

    for (line_no, raw_line) in input.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let Some(code) = fields.next() else {
            continue;
        };

        match code {
            LAND_AIRPORT_CODE | SEA_AIRPORT_CODE | HELIPORT_CODE => {
                flush_block(&mut current, block);
                block = Block::None;
                if have_current {
                    airports.push(std::mem::take(&mut current));
                }
                current.header = Some(parse_header(code, line_no, line[code.len()..].trim())?);
                have_current = true;
            }
            LAND_RUNWAY_CODE => {
                current
                    .runways
                    .push(parse_runway(RunwayKind::Land, line_no, &line[code.len()..])?);
            }
            WATER_RUNWAY_CODE => {
                current
                    .runways
                    .push(parse_water_or_helipad(RunwayKind::Water, line_no, &line[code.len()..])?);
            }
            HELIPAD_CODE => {
                current.runways.push(parse_water_or_helipad(
                    RunwayKind::Helipad,
                    line_no,
                    &line[code.len()..],
                )?);
            }
            PAVEMENT_CODE => {
                flush_block(&mut current, block);
                block = Block::Pavement(parse_pavement_header(line_no, &line[code.len()..], false)?);
            }
            BOUNDARY_CODE => {
                flush_block(&mut current, block);
                block = Block::Boundary(parse_pavement_header(line_no, &line[code.len()..], true)?);
            }
            LINEAR_FEATURE_CODE => {
                flush_block(&mut current, block);
                block = Block::Feature(LinearFeature {
                    description: line[code.len()..].trim().to_string(),
                    nodes: Vec::new(),
                });
            }
            NODE_CODE | BEZIER_NODE_CODE | CLOSE_NODE_CODE | CLOSE_BEZIER_NODE_CODE
            | TERM_NODE_CODE | TERM_BEZIER_NODE_CODE => {
                let node = parse_node(code, line_no, &line[code.len()..])?;
                match &mut block {
                    Block::Pavement(p) | Block::Boundary(p) => p.nodes.push(node),
                    Block::Feature(f) => f.nodes.push(node),
                    Block::None => return Err(Error::NodeOutsideBlock { line: line_no }),
                }
            }
            END_OF_FILE => {
                flush_block(&mut current, block);
                block = Block::None;
                if have_current {
                    airports.push(std::mem::take(&mut current));
                    have_current = false;
                }
                break;
            }
            other => {
                log::trace!("line {line_no}: skipping record code {other} (out of scope)");
            }
        }
    }

    flush_block(&mut current, block);
    if have_current {
        airports.push(current);
    }

    Ok(airports)
}

fn flush_block(airport: &mut Airport, block: Block) {
    match block {
        Block::Pavement(p) => airport.pavements.push(p),
        Block::Boundary(b) => airport.boundary = Some(b),
        Block::Feature(f) => airport.linear_features.push(f),
        Block::None => {}
    }
}

fn parse_header(code: &str, line_no: usize, rest: &str) -> Result<AirportHeader, Error> {
    let mut fields = rest.split_whitespace();
    let elevation_ft = parse_f64(&mut fields, line_no, "elevation_ft")?;
    let _deprecated1 = fields.next();
    let _deprecated2 = fields.next();
    let icao = fields
        .next()
        .ok_or(Error::ShortRecord {
            line: line_no,
            code: code.to_string(),
        })?
        .to_string();
    let name = fields.collect::<Vec<_>>().join(" ");
    let kind = match code {
        LAND_AIRPORT_CODE => AirportKind::Land,
        SEA_AIRPORT_CODE => AirportKind::Sea,
        HELIPORT_CODE => AirportKind::Heliport,
        _ => unreachable!("dispatched only for header codes"),
    };
    Ok(AirportHeader {
        kind,
        elevation_ft,
        icao,
        name,
    })
}

fn parse_runway(kind: RunwayKind, line_no: usize, rest: &str) -> Result<Runway, Error> {
    let mut fields = rest.split_whitespace();
    let width_m = parse_f64(&mut fields, line_no, "width_m")?;
    let surface = Surface::from_code(parse_u8(&mut fields, line_no, "surface")?);
    let shoulder = parse_u8(&mut fields, line_no, "shoulder")?;
    let smoothness = parse_f64(&mut fields, line_no, "smoothness")?;
    let centerline_lights = parse_bool(&mut fields, line_no, "centerline_lights")?;
    let edge_lights = parse_u8(&mut fields, line_no, "edge_lights")?;
    let dist_remain_signs = parse_bool(&mut fields, line_no, "dist_remain_signs")?;

    let end0 = parse_runway_end(&mut fields, line_no)?;
    let end1 = parse_runway_end(&mut fields, line_no)?;

    Ok(Runway {
        kind,
        width_m,
        surface,
        shoulder,
        smoothness,
        centerline_lights,
        edge_lights,
        dist_remain_signs,
        ends: [end0, end1],
        is_taxiway: false,
    })
}

/// Water runways and helipads carry a reduced field set (no shoulder,
/// smoothness, lighting detail); both ends still parse as thresholds so
/// the geometry generator can treat them uniformly, with defaults for
/// the fields the record omits.
fn parse_water_or_helipad(
    kind: RunwayKind,
    line_no: usize,
    rest: &str,
) -> Result<Runway, Error> {
    let mut fields = rest.split_whitespace();
    let width_m = parse_f64(&mut fields, line_no, "width_m")?;
    let surface = Surface::from_code(parse_u8(&mut fields, line_no, "surface")?);
    let _shoulder_marker = parse_u8(&mut fields, line_no, "buoys")?;

    let end0 = parse_runway_end(&mut fields, line_no)?;
    let end1 = parse_runway_end(&mut fields, line_no)?;

    Ok(Runway {
        kind,
        width_m,
        surface,
        shoulder: 0,
        smoothness: 0.0,
        centerline_lights: false,
        edge_lights: 0,
        dist_remain_signs: false,
        ends: [end0, end1],
        is_taxiway: false,
    })
}

fn parse_runway_end<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<RunwayEnd, Error> {
    let ident = fields
        .next()
        .ok_or(Error::ShortRecord {
            line: line_no,
            code: "runway end".to_string(),
        })?
        .to_string();
    let lat_deg = parse_f64(fields, line_no, "end_lat")?;
    let lon_deg = parse_f64(fields, line_no, "end_lon")?;
    let threshold_m = parse_f64(fields, line_no, "threshold")?;
    let overrun_m = parse_f64(fields, line_no, "overrun")?;
    let marking = Marking(parse_u8(fields, line_no, "marking")?);
    let approach_lights = ApproachLights::from_code(parse_i32(fields, line_no, "approach_lights")?);
    let tz_lights = parse_bool(fields, line_no, "tz_lights")?;
    let reil = parse_bool(fields, line_no, "reil")?;

    Ok(RunwayEnd {
        ident,
        lat_deg,
        lon_deg,
        threshold_m,
        overrun_m,
        marking,
        approach_lights,
        tz_lights,
        reil,
    })
}

fn parse_pavement_header(
    line_no: usize,
    rest: &str,
    is_boundary: bool,
) -> Result<PavementBoundary, Error> {
    let mut fields = rest.split_whitespace();
    let surface = Surface::from_code(parse_u8(&mut fields, line_no, "surface")?);
    let texture_heading_deg = fields
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0);
    Ok(PavementBoundary {
        surface,
        texture_heading_deg,
        nodes: Vec::new(),
        is_boundary,
    })
}

fn parse_node(code: &str, line_no: usize, rest: &str) -> Result<PavementNode, Error> {
    let mut fields = rest.split_whitespace();
    let lat_deg = parse_f64(&mut fields, line_no, "node_lat")?;
    let lon_deg = parse_f64(&mut fields, line_no, "node_lon")?;
    let point = GeoPoint::flat(lon_deg, lat_deg);

    let is_bezier = matches!(code, BEZIER_NODE_CODE | CLOSE_BEZIER_NODE_CODE | TERM_BEZIER_NODE_CODE);
    let bezier_control = if is_bezier {
        let bz_lat = parse_f64(&mut fields, line_no, "bezier_lat")?;
        let bz_lon = parse_f64(&mut fields, line_no, "bezier_lon")?;
        Some(GeoPoint::flat(bz_lon, bz_lat))
    } else {
        None
    };

    Ok(PavementNode {
        point,
        bezier_control,
        closes_ring: matches!(code, CLOSE_NODE_CODE | CLOSE_BEZIER_NODE_CODE),
        terminates: matches!(code, TERM_NODE_CODE | TERM_BEZIER_NODE_CODE),
    })
}

fn parse_f64<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    name: &'static str,
) -> Result<f64, Error> {
    let raw = next_field(fields, line_no, name)?;
    raw.parse::<f64>().map_err(|_| Error::BadField {
        line: line_no,
        field: name,
        value: raw.to_string(),
    })
}

fn parse_u8<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    name: &'static str,
) -> Result<u8, Error> {
    let raw = next_field(fields, line_no, name)?;
    raw.parse::<u8>().map_err(|_| Error::BadField {
        line: line_no,
        field: name,
        value: raw.to_string(),
    })
}

fn parse_i32<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    name: &'static str,
) -> Result<i32, Error> {
    let raw = next_field(fields, line_no, name)?;
    raw.parse::<i32>().map_err(|_| Error::BadField {
        line: line_no,
        field: name,
        value: raw.to_string(),
    })
}

fn parse_bool<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    name: &'static str,
) -> Result<bool, Error> {
    let raw = next_field(fields, line_no, name)?;
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => raw
            .parse::<u8>()
            .map(|v| v != 0)
            .map_err(|_| Error::BadField {
                line: line_no,
                field: name,
                value: raw.to_string(),
            }),
    }
}

fn next_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    name: &'static str,
) -> Result<&'a str, Error> {
    fields.next().ok_or(Error::BadField {
        line: line_no,
        field: name,
        value: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1   11 0 0 00AK Lowell Field
100 46.02 2 1 0.00 1 2 1 09L 33.63470475 -084.44798671 0.00 120.09 3 7 0 1 27R 33.63469907 -084.40893004 0.00 120.09 3 6 0 1
110 1 0
111 33.635 -084.448
111 33.635 -084.440
113 33.634 -084.440
99
";

    #[test]
    fn parses_header_runway_and_pavement() {
        let airports = parse_str(SAMPLE).unwrap();
        assert_eq!(airports.len(), 1);
        let apt = &airports[0];
        assert_eq!(apt.header.as_ref().unwrap().icao, "00AK");
        assert_eq!(apt.runways.len(), 1);
        assert_eq!(apt.runways[0].ends[0].ident, "09L");
        assert_eq!(apt.pavements.len(), 1);
        assert_eq!(apt.pavements[0].nodes.len(), 3);
        assert!(apt.pavements[0].nodes[2].closes_ring);
    }

    #[test]
    fn multiple_airports_split_on_header() {
        let two = format!("{SAMPLE}1 5 0 0 00AL Second Field\n99\n");
        let airports = parse_str(&two).unwrap();
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[1].header.as_ref().unwrap().icao, "00AL");
    }

    #[test]
    fn unknown_record_codes_are_skipped_not_fatal() {
        let input = format!("{SAMPLE}");
        let with_misc = input.replacen("99\n", "50 118.0\n99\n", 1);
        assert!(parse_str(&with_misc).is_ok());
    }

    #[test]
    fn node_outside_block_is_an_error() {
        let bad = "111 33.635 -084.448\n99\n";
        assert!(parse_str(bad).is_err());
    }

    #[test]
    fn short_runway_record_is_rejected() {
        let bad = "1 11 0 0 00AK Lowell\n100 46.02\n99\n";
        assert!(parse_str(bad).is_err());
    }
}
