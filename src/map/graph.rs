//! The queryable region adjacency graph.
//!
//! Built once from the embedded `data/regions.json` and
//! `data/connections.json` files, with the same structural validation the
//! data went through upstream: unique ids and names, parents that exist and
//! are not themselves children, and connections between known regions.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use super::region::{Connection, ConnectionType, Region, RegionType};
use crate::error::EngineError;

const REGIONS_JSON: &str = include_str!("../../data/regions.json");
const CONNECTIONS_JSON: &str = include_str!("../../data/connections.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: RegionType,
    parent_id: Option<String>,
}

#[derive(Deserialize)]
struct ConnectionRecord {
    #[serde(rename = "type")]
    kind: ConnectionType,
    regions: Vec<String>,
}

/// Read-only adjacency graph over the map's regions.
pub struct RegionMap {
    regions: Vec<Region>,
    connections: Vec<Connection>,
    by_id: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    neighbours: HashMap<String, Vec<(usize, ConnectionType)>>,
}

static STANDARD: OnceLock<RegionMap> = OnceLock::new();

impl RegionMap {
    /// Returns the standard map, built from the embedded data on first use.
    pub fn standard() -> Result<&'static RegionMap, EngineError> {
        if let Some(map) = STANDARD.get() {
            return Ok(map);
        }
        let map = RegionMap::load(REGIONS_JSON, CONNECTIONS_JSON)?;
        Ok(STANDARD.get_or_init(|| map))
    }

    /// Builds a map from region and connection JSON documents.
    pub fn load(regions_json: &str, connections_json: &str) -> Result<RegionMap, EngineError> {
        let records: Vec<RegionRecord> = serde_json::from_str(regions_json)?;
        let connection_records: Vec<ConnectionRecord> = serde_json::from_str(connections_json)?;

        let mut by_id = HashMap::with_capacity(records.len());
        let mut names = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), i).is_some() {
                return Err(EngineError::InvalidMapData(format!(
                    "non-unique region id '{}'",
                    record.id
                )));
            }
            if names.insert(record.name.clone(), i).is_some() {
                return Err(EngineError::InvalidMapData(format!(
                    "non-unique region name '{}'",
                    record.name
                )));
            }
        }

        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            let Some(parent_id) = &record.parent_id else {
                continue;
            };
            let parent = records.iter().find(|r| &r.id == parent_id);
            match parent {
                None => {
                    return Err(EngineError::InvalidMapData(format!(
                        "region '{}' has unknown parent '{}'",
                        record.id, parent_id
                    )));
                }
                Some(parent) if parent.parent_id.is_some() => {
                    return Err(EngineError::InvalidMapData(format!(
                        "region '{}' has parent '{}' which itself has a parent",
                        record.id, parent_id
                    )));
                }
                Some(_) => children.entry(parent_id.clone()).or_default().push(i),
            }
        }

        let mut neighbours: HashMap<String, Vec<(usize, ConnectionType)>> = HashMap::new();
        let mut connections = Vec::with_capacity(connection_records.len());
        for record in connection_records {
            let [a, b]: [String; 2] = record.regions.try_into().map_err(|r: Vec<String>| {
                EngineError::InvalidMapData(format!(
                    "connection must join exactly two regions, got {}",
                    r.len()
                ))
            })?;
            let (ia, ib) = match (by_id.get(&a), by_id.get(&b)) {
                (Some(&ia), Some(&ib)) if ia != ib => (ia, ib),
                (Some(_), Some(_)) => {
                    return Err(EngineError::InvalidMapData(format!(
                        "connection joins region '{a}' to itself"
                    )));
                }
                _ => {
                    return Err(EngineError::InvalidMapData(format!(
                        "connection references unknown region: '{a}' - '{b}'"
                    )));
                }
            };
            neighbours.entry(a.clone()).or_default().push((ib, record.kind));
            neighbours.entry(b.clone()).or_default().push((ia, record.kind));
            connections.push(Connection {
                kind: record.kind,
                endpoints: [a, b],
            });
        }

        let regions = records
            .into_iter()
            .map(|r| Region {
                id: r.id,
                name: r.name,
                kind: r.kind,
                parent: r.parent_id,
            })
            .collect();

        Ok(RegionMap {
            regions,
            connections,
            by_id,
            children,
            neighbours,
        })
    }

    /// Looks up a region, failing with `UnknownRegion` if absent.
    pub fn region(&self, id: &str) -> Result<&Region, EngineError> {
        self.get(id)
            .ok_or_else(|| EngineError::UnknownRegion(id.to_string()))
    }

    /// Looks up a region by id.
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.by_id.get(id).map(|&i| &self.regions[i])
    }

    /// Returns the parent region of a coast child, if any.
    pub fn parent_of(&self, id: &str) -> Option<&Region> {
        let region = self.get(id)?;
        region.parent.as_deref().and_then(|p| self.get(p))
    }

    /// Returns the coast children of a region (empty for most regions).
    pub fn children_of(&self, id: &str) -> Vec<&Region> {
        match self.children.get(id) {
            Some(indices) => indices.iter().map(|&i| &self.regions[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Returns each region directly connected to `id` with the connection type.
    pub fn neighbours_of(&self, id: &str) -> Vec<(&Region, ConnectionType)> {
        match self.neighbours.get(id) {
            Some(edges) => edges.iter().map(|&(i, kind)| (&self.regions[i], kind)).collect(),
            None => Vec::new(),
        }
    }

    /// Returns the connection type between two regions, if directly connected.
    pub fn connection_between(&self, from: &str, to: &str) -> Option<ConnectionType> {
        let edges = self.neighbours.get(from)?;
        let to_index = *self.by_id.get(to)?;
        edges
            .iter()
            .find(|&&(i, _)| i == to_index)
            .map(|&(_, kind)| kind)
    }

    /// Returns true if the region is coastal itself or through a coast child.
    pub fn touches_coast(&self, id: &str) -> bool {
        let Some(region) = self.get(id) else {
            return false;
        };
        region.kind == RegionType::Coast
            || self.children_of(id).iter().any(|c| c.kind == RegionType::Coast)
    }

    /// Returns the id of the region's root province: its parent for coast
    /// children, the region itself otherwise.
    pub fn root_id<'a>(&'a self, id: &'a str) -> &'a str {
        match self.parent_of(id) {
            Some(parent) => parent.id.as_str(),
            None => id,
        }
    }

    /// All regions on the map.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All typed connections on the map.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_map_loads() {
        let map = RegionMap::standard().unwrap();
        assert_eq!(map.regions().len(), 81);
    }

    #[test]
    fn region_lookup() {
        let map = RegionMap::standard().unwrap();
        assert_eq!(map.get("Lon").unwrap().name, "London");
        assert_eq!(map.get("WES").unwrap().kind, RegionType::Sea);
        assert!(map.get("Xyz").is_none());
        assert!(matches!(
            map.region("Xyz"),
            Err(EngineError::UnknownRegion(_))
        ));
    }

    #[test]
    fn coast_children_and_parents() {
        let map = RegionMap::standard().unwrap();
        let children = map.children_of("Spa");
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.kind == RegionType::Coast));
        assert_eq!(map.parent_of("Spa_S").unwrap().id, "Spa");
        assert!(map.parent_of("Spa").is_none());
        assert_eq!(map.root_id("Stp_N"), "Stp");
        assert_eq!(map.root_id("Mos"), "Mos");
    }

    #[test]
    fn connection_types() {
        let map = RegionMap::standard().unwrap();
        assert_eq!(map.connection_between("ENG", "NTH"), Some(ConnectionType::Sea));
        assert_eq!(map.connection_between("Vie", "Bud"), Some(ConnectionType::Land));
        assert_eq!(map.connection_between("Bre", "Pic"), Some(ConnectionType::Coast));
        assert_eq!(map.connection_between("Vie", "Ven"), None);
    }

    #[test]
    fn connections_are_symmetric() {
        let map = RegionMap::standard().unwrap();
        for region in map.regions() {
            for (neighbour, kind) in map.neighbours_of(&region.id) {
                assert_eq!(
                    map.connection_between(&neighbour.id, &region.id),
                    Some(kind),
                    "asymmetric connection {} - {}",
                    region.id,
                    neighbour.id
                );
            }
        }
    }

    #[test]
    fn touches_coast() {
        let map = RegionMap::standard().unwrap();
        assert!(map.touches_coast("Lon"));
        assert!(map.touches_coast("Spa"));
        assert!(map.touches_coast("Stp_S"));
        assert!(!map.touches_coast("Mos"));
        assert!(!map.touches_coast("NTH"));
    }

    #[test]
    fn sea_regions_carry_no_army_edges() {
        let map = RegionMap::standard().unwrap();
        for region in map.regions() {
            if region.kind != RegionType::Sea {
                continue;
            }
            for (_, kind) in map.neighbours_of(&region.id) {
                assert!(
                    !kind.army_ok(),
                    "sea region {} has an army-passable edge",
                    region.id
                );
            }
        }
    }

    #[test]
    fn rejects_duplicate_region_id() {
        let regions = r#"[
            { "id": "Aaa", "name": "A", "type": "Land", "parentId": null },
            { "id": "Aaa", "name": "B", "type": "Land", "parentId": null }
        ]"#;
        let result = RegionMap::load(regions, "[]");
        assert!(matches!(result, Err(EngineError::InvalidMapData(_))));
    }

    #[test]
    fn rejects_nested_parent() {
        let regions = r#"[
            { "id": "Aaa", "name": "A", "type": "Land", "parentId": null },
            { "id": "Bbb", "name": "B", "type": "Coast", "parentId": "Aaa" },
            { "id": "Ccc", "name": "C", "type": "Coast", "parentId": "Bbb" }
        ]"#;
        let result = RegionMap::load(regions, "[]");
        assert!(matches!(result, Err(EngineError::InvalidMapData(_))));
    }

    #[test]
    fn rejects_unknown_connection_endpoint() {
        let regions = r#"[
            { "id": "Aaa", "name": "A", "type": "Land", "parentId": null }
        ]"#;
        let connections = r#"[ { "type": "Land", "regions": ["Aaa", "Zzz"] } ]"#;
        let result = RegionMap::load(regions, connections);
        assert!(matches!(result, Err(EngineError::InvalidMapData(_))));
    }
}
