//! Incremental near-duplicate clustering.
//!
//! Records arrive one at a time in discovery order. Each record joins the
//! closest existing cluster whose representative hash is within the
//! threshold, or starts a new cluster. Representatives never change, so the
//! outcome depends on arrival order: feeding {A, B, C} and {C, B, A} can group
//! differently when distances sit near the threshold.

use super::traits::ComparisonStrategy;
use crate::core::extractor::ImageRecord;
use crate::core::hasher::{ImageHashValue, PerceptualHash};
use serde::{Deserialize, Serialize};

/// Cluster identifier, assigned in creation order starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u32);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which member of a cluster stays in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CanonicalPolicy {
    /// The first member in discovery order
    #[default]
    #[serde(rename = "first")]
    FirstEncountered,
    /// The member with the largest file; ties keep the earlier member
    #[serde(rename = "largest")]
    LargestSize,
}

/// A group of near-identical images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub id: ClusterId,
    /// Hash of the first member; every member is within threshold of it
    pub representative: ImageHashValue,
    /// Indices into [`DuplicateClusterer::records`], in insertion order
    pub members: Vec<usize>,
    /// Record index of the member that stays in place
    pub canonical: usize,
}

impl DuplicateCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Only clusters with more than one member lead to duplicate moves
    pub fn is_duplicate_group(&self) -> bool {
        self.members.len() > 1
    }
}

/// Where one record ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    pub cluster: ClusterId,
    pub is_canonical: bool,
    pub cluster_size: usize,
}

impl DuplicateVerdict {
    /// Non-canonical member of a multi-member cluster
    pub fn is_duplicate(&self) -> bool {
        !self.is_canonical
    }
}

/// Single-pass clusterer over perceptual hashes
pub struct DuplicateClusterer {
    strategy: Box<dyn ComparisonStrategy>,
    policy: CanonicalPolicy,
    clusters: Vec<DuplicateCluster>,
    records: Vec<ImageRecord>,
    membership: Vec<ClusterId>,
}

impl DuplicateClusterer {
    pub fn new(strategy: impl ComparisonStrategy + 'static, policy: CanonicalPolicy) -> Self {
        Self {
            strategy: Box::new(strategy),
            policy,
            clusters: Vec::new(),
            records: Vec::new(),
            membership: Vec::new(),
        }
    }

    /// Closest representative as `(cluster index, distance)`.
    ///
    /// Clusters are visited oldest first and only a strictly smaller distance
    /// replaces the current best, so ties go to the lowest cluster id.
    fn nearest(&self, hash: &ImageHashValue) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (index, cluster) in self.clusters.iter().enumerate() {
            let distance = cluster.representative.distance(hash);
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }
        best
    }

    /// Add a record and return the cluster it joined or created
    pub fn assign(&mut self, record: ImageRecord) -> ClusterId {
        let record_index = self.records.len();

        let target = match self.nearest(&record.hash) {
            Some((index, distance)) if self.strategy.is_duplicate(distance) => index,
            _ => {
                let id = ClusterId(self.clusters.len() as u32);
                self.clusters.push(DuplicateCluster {
                    id,
                    representative: record.hash.clone(),
                    members: Vec::new(),
                    canonical: record_index,
                });
                self.clusters.len() - 1
            }
        };

        self.records.push(record);
        self.clusters[target].members.push(record_index);
        self.recompute_canonical(target);

        let id = self.clusters[target].id;
        self.membership.push(id);
        id
    }

    fn recompute_canonical(&mut self, cluster_index: usize) {
        let cluster = &self.clusters[cluster_index];
        let canonical = match self.policy {
            CanonicalPolicy::FirstEncountered => cluster.members[0],
            CanonicalPolicy::LargestSize => {
                let mut best = cluster.members[0];
                for &member in &cluster.members[1..] {
                    if self.records[member].size > self.records[best].size {
                        best = member;
                    }
                }
                best
            }
        };
        self.clusters[cluster_index].canonical = canonical;
    }

    /// Final verdict for the record at `index` (insertion order)
    pub fn verdict(&self, index: usize) -> Option<DuplicateVerdict> {
        let id = *self.membership.get(index)?;
        let cluster = &self.clusters[id.0 as usize];
        Some(DuplicateVerdict {
            cluster: id,
            is_canonical: cluster.canonical == index,
            cluster_size: cluster.len(),
        })
    }

    /// Records in insertion order
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Clusters in creation order
    pub fn clusters(&self) -> &[DuplicateCluster] {
        &self.clusters
    }

    /// Number of clusters with more than one member
    pub fn duplicate_groups(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_duplicate_group()).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
