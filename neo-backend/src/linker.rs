//! Link step: resolves each close approach's designation to its owning NEO.
//!
//! Runs once between loading and indexing. Any approach whose designation
//! matches no NEO fails the whole step, so a database is never built over a
//! partial graph.

use std::collections::HashMap;

use neo_common::{ApproachId, CloseApproach, NearEarthObject, NeoId};
use tracing::{debug, info};

use crate::error::{NeoError, NeoResult};

/// NEOs and approaches after linking, ready to be indexed
#[derive(Debug)]
pub struct LinkedCatalog {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
}

impl LinkedCatalog {
    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    pub fn into_parts(self) -> (Vec<NearEarthObject>, Vec<CloseApproach>) {
        (self.neos, self.approaches)
    }
}

/// Map each present designation to its NEO's position.
///
/// Fails on the first designation seen twice.
pub(crate) fn designation_index(neos: &[NearEarthObject]) -> NeoResult<HashMap<String, NeoId>> {
    let mut index = HashMap::with_capacity(neos.len());
    for (position, neo) in neos.iter().enumerate() {
        let Some(designation) = neo.designation() else {
            continue;
        };
        if index.insert(designation.to_string(), NeoId(position)).is_some() {
            return Err(NeoError::DuplicateDesignation(designation.to_string()));
        }
    }
    Ok(index)
}

/// Cross-link two independently loaded collections.
///
/// Every approach is bound to the NEO carrying its designation and appended
/// to that NEO's approaches, preserving input order.
pub fn link(
    mut neos: Vec<NearEarthObject>,
    mut approaches: Vec<CloseApproach>,
) -> NeoResult<LinkedCatalog> {
    let index = designation_index(&neos)?;
    debug!("Built transient designation index with {} entries", index.len());

    for (position, approach) in approaches.iter_mut().enumerate() {
        let neo_id = *index
            .get(approach.designation())
            .ok_or_else(|| NeoError::UnresolvedDesignation(approach.designation().to_string()))?;
        approach.bind(neo_id);
        neos[neo_id.0].attach_approach(ApproachId(position));
    }

    info!("Linked {} close approaches to {} NEOs", approaches.len(), neos.len());

    Ok(LinkedCatalog { neos, approaches })
}
