//! Default world factory: the standard 1901 starting position.
//!
//! Centres and units are loaded from the embedded `data/centres.json` and
//! `data/units.json` files and sanity-checked the same way the map data is.
//! The starting centre list doubles as the home-centre table consulted by
//! build validation.

use std::collections::HashSet;

use serde::Deserialize;

use super::board::{Board, Centre};
use super::location::{Location, Phase};
use super::state::World;
use super::unit::{Nation, Unit, UnitKind};
use crate::error::EngineError;

const CENTRES_JSON: &str = include_str!("../../data/centres.json");
const UNITS_JSON: &str = include_str!("../../data/units.json");

/// The first board's cell: timeline 1, Spring 1901.
pub const FIRST_TIMELINE: u32 = 1;
pub const FIRST_YEAR: i32 = 1901;

#[derive(Deserialize)]
struct LocationRecord {
    #[serde(rename = "regionId")]
    region_id: String,
}

#[derive(Deserialize)]
struct CentreRecord {
    owner: Option<Nation>,
    location: LocationRecord,
}

#[derive(Deserialize)]
struct UnitRecord {
    owner: Nation,
    #[serde(rename = "type")]
    kind: UnitKind,
    location: LocationRecord,
}

fn starting_location(region: String) -> Location {
    Location {
        timeline: FIRST_TIMELINE,
        year: FIRST_YEAR,
        phase: Phase::Spring,
        region,
    }
}

/// The standard starting centres, with home ownership.
pub fn starting_centres() -> Result<Vec<Centre>, EngineError> {
    let records: Vec<CentreRecord> = serde_json::from_str(CENTRES_JSON)?;
    Ok(records
        .into_iter()
        .map(|r| Centre {
            owner: r.owner,
            location: starting_location(r.location.region_id),
        })
        .collect())
}

/// The standard starting units.
pub fn starting_units() -> Result<Vec<Unit>, EngineError> {
    let records: Vec<UnitRecord> = serde_json::from_str(UNITS_JSON)?;
    Ok(records
        .into_iter()
        .map(|r| Unit::new(r.owner, r.kind, starting_location(r.location.region_id)))
        .collect())
}

/// Creates a fresh world holding the standard starting board.
pub fn default_world() -> Result<World, EngineError> {
    let centres = starting_centres()?;
    let units = starting_units()?;
    check_starting_position(&centres, &units)?;

    let mut board = Board::new(FIRST_TIMELINE, FIRST_YEAR, Phase::Spring);
    board.centres = centres;
    board.units = units;

    let mut world = World::new();
    world.boards.push(board);
    Ok(world)
}

fn check_starting_position(centres: &[Centre], units: &[Unit]) -> Result<(), EngineError> {
    let mut centre_regions = HashSet::new();
    for centre in centres {
        if !centre_regions.insert(centre.location.region.as_str()) {
            return Err(EngineError::InvalidWorldData(format!(
                "non-unique centre region '{}'",
                centre.location.region
            )));
        }
    }

    let mut unit_regions = HashSet::new();
    for unit in units {
        if !unit_regions.insert(unit.location.region.as_str()) {
            return Err(EngineError::InvalidWorldData(format!(
                "non-unique unit region '{}'",
                unit.location.region
            )));
        }
        // Units start on their home centres; coast children count via the root.
        let root = unit
            .location
            .region
            .split('_')
            .next()
            .unwrap_or(&unit.location.region);
        if !centre_regions.contains(root) {
            return Err(EngineError::InvalidWorldData(format!(
                "starting unit at '{}' has no matching centre",
                unit.location.region
            )));
        }
    }

    Ok(())
}
