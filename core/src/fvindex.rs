//! Facade over the feature-vector subsumption index.
//!
//! The original source's `CPIsSIndexed` flag and the deregistration call
//! in `clause_set_extract_entry` attest to a second, independent index
//! (a feature-vector index used for fast subsumption pre-filtering)
//! alongside the demodulator index; the full subsumption machinery is
//! out of scope for the same reason the PD-tree is (see [`crate::demod`]).
//! [`FeatureVectorIndex`] is the seam; [`BucketFeatureVectorIndex`] is a
//! minimal stand-in grouping clauses by their exact feature vector.

use fnv::FnvHashMap;

use crate::clause_set::ClauseRef;

pub trait FeatureVectorIndex {
    fn insert(&mut self, cref: ClauseRef, features: &[i64]);
    fn remove(&mut self, cref: ClauseRef, features: &[i64]);
}

#[derive(Debug, Default)]
pub struct BucketFeatureVectorIndex {
    buckets: FnvHashMap<Vec<i64>, Vec<ClauseRef>>,
}

impl BucketFeatureVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self, features: &[i64]) -> &[ClauseRef] {
        self.buckets
            .get(features)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl FeatureVectorIndex for BucketFeatureVectorIndex {
    fn insert(&mut self, cref: ClauseRef, features: &[i64]) {
        self.buckets.entry(features.to_vec()).or_default().push(cref);
    }

    fn remove(&mut self, cref: ClauseRef, features: &[i64]) {
        if let Some(bucket) = self.buckets.get_mut(features) {
            bucket.retain(|&c| c != cref);
        }
    }
}
