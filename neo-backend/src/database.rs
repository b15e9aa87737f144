//! In-memory NEO database.
//!
//! Owns the linked NEO and approach collections and two indices over the
//! NEOs: exact designation, and case-insensitive name. The database is built
//! once and is read-only afterwards, so it can be shared freely by reference.

use std::collections::HashMap;
use std::fmt;

use neo_common::{ApproachId, ApproachRecord, CloseApproach, NearEarthObject, NeoId};
use tracing::{info, warn};

use crate::error::NeoResult;
use crate::linker::{LinkedCatalog, designation_index, link};
use crate::query::FilterSet;

/// Normalize a name for the name index (trimmed, lowercase)
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A close approach viewed together with the NEO it is linked to
#[derive(Debug, Clone, Copy)]
pub struct LinkedApproach<'a> {
    id: ApproachId,
    approach: &'a CloseApproach,
    neo: &'a NearEarthObject,
}

impl<'a> LinkedApproach<'a> {
    pub fn id(&self) -> ApproachId {
        self.id
    }

    pub fn approach(&self) -> &'a CloseApproach {
        self.approach
    }

    pub fn neo(&self) -> &'a NearEarthObject {
        self.neo
    }

    /// Serialize the approach joined with its NEO's current fields.
    pub fn serialize(&self) -> ApproachRecord {
        self.approach.serialize(self.neo)
    }
}

impl fmt::Display for LinkedApproach<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.approach.time() {
            Some(_) => write!(f, "On {}, ", self.approach.time_str())?,
            None => write!(f, "At an unknown time, ")?,
        }
        write!(
            f,
            "'{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.neo.fullname(),
            self.approach.distance(),
            self.approach.velocity()
        )
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub total_neos: usize,
    pub total_approaches: usize,
    pub neos_with_approaches: usize,
    pub named_neos: usize,
}

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NEOs: {}, Close approaches: {}, NEOs with approaches: {}, Named NEOs: {}",
            self.total_neos, self.total_approaches, self.neos_with_approaches, self.named_neos
        )
    }
}

/// Linked NEOs and close approaches with lookup indices
#[derive(Debug)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Index an already linked catalog.
    pub fn new(catalog: LinkedCatalog) -> NeoResult<Self> {
        let (neos, approaches) = catalog.into_parts();

        let by_designation = designation_index(&neos)?;

        let mut by_name: HashMap<String, NeoId> = HashMap::new();
        for (position, neo) in neos.iter().enumerate() {
            let Some(name) = neo.name() else {
                continue;
            };
            let key = normalize_name(name);
            if let Some(existing) = by_name.get(&key) {
                warn!(
                    "Name {:?} of {} already indexed for {}, keeping the first",
                    name,
                    neo.fullname(),
                    neos[existing.0].fullname()
                );
                continue;
            }
            by_name.insert(key, NeoId(position));
        }

        let db = Self {
            neos,
            approaches,
            by_designation,
            by_name,
        };
        info!("NEO database ready: {}", db.stats());
        Ok(db)
    }

    /// Link raw collections, then index them.
    pub fn from_collections(
        neos: Vec<NearEarthObject>,
        approaches: Vec<CloseApproach>,
    ) -> NeoResult<Self> {
        Self::new(link(neos, approaches)?)
    }

    /// Exact designation lookup
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation)
            .map(|id| &self.neos[id.0])
    }

    /// Case-insensitive exact name lookup; empty input finds nothing
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|id| &self.neos[id.0])
    }

    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    pub fn approach(&self, id: ApproachId) -> Option<LinkedApproach<'_>> {
        let approach = self.approaches.get(id.0)?;
        let neo = self.neos.get(approach.neo()?.0)?;
        Some(LinkedApproach { id, approach, neo })
    }

    /// Every close approach, in load order
    pub fn approaches(&self) -> impl Iterator<Item = LinkedApproach<'_>> {
        (0..self.approaches.len()).filter_map(move |i| self.approach(ApproachId(i)))
    }

    /// Close approaches of one NEO, in load order
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = LinkedApproach<'a>> {
        neo.approaches().iter().filter_map(move |&id| self.approach(id))
    }

    /// Lazily yield the approaches matching every filter, in load order.
    ///
    /// Each call starts a fresh scan.
    pub fn query<'a>(&'a self, filters: &'a FilterSet) -> impl Iterator<Item = LinkedApproach<'a>> {
        self.approaches()
            .filter(move |linked| filters.matches(linked.approach, linked.neo))
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            total_neos: self.neos.len(),
            total_approaches: self.approaches.len(),
            neos_with_approaches: self
                .neos
                .iter()
                .filter(|n| !n.approaches().is_empty())
                .count(),
            named_neos: self.neos.iter().filter(|n| n.name().is_some()).count(),
        }
    }
}
