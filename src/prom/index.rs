use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::{MetricMeta, MetricSample, SkipReason};
use super::parser;

/// Immutable snapshot of one parsed exposition document.
///
/// Built once from the full text; every query reads the same data until the
/// caller replaces the index with a fresh parse. Queries are total: unknown
/// names and empty documents yield empty results, never errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricIndex {
    samples: Vec<MetricSample>,
    metadata: HashMap<String, MetricMeta>,
    skipped: Vec<SkipReason>,
}

/// One search hit: the metric's first matching sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub name: &'a str,
    pub help: &'a str,
    pub value: f64,
}

/// Everything known about one metric name.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDetails<'a> {
    /// Absent when no sample for the name was ever seen.
    pub meta: Option<&'a MetricMeta>,
    /// Every sample for the name, in document order. May be empty.
    pub samples: Vec<&'a MetricSample>,
}

impl MetricIndex {
    pub fn from_exposition(text: &str) -> Self {
        let parser::Parsed {
            samples,
            metadata,
            skipped,
        } = parser::parse(text);
        MetricIndex {
            samples,
            metadata,
            skipped,
        }
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Reasons for every sample line the parse dropped, in document order.
    pub fn skipped(&self) -> &[SkipReason] {
        &self.skipped
    }

    /// Metric names bucketed by the token before the first `_` (the whole
    /// name when there is none). Names keep first-seen order within a bucket
    /// and appear once each.
    pub fn group_by_prefix(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for sample in &self.samples {
            let prefix = sample.name.split('_').next().unwrap_or(&sample.name);
            let names = groups.entry(prefix).or_default();
            if !names.contains(&sample.name.as_str()) {
                names.push(&sample.name);
            }
        }
        groups
    }

    /// Case-insensitive substring search over metric names and help text.
    ///
    /// A metric is included when its first matching sample matches on either
    /// field; the hit reports that sample's value and help, and each name
    /// appears at most once.
    pub fn search(&self, term: &str) -> Vec<SearchHit<'_>> {
        let needle = term.to_lowercase();
        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for sample in &self.samples {
            if seen.contains(sample.name.as_str()) {
                continue;
            }
            if sample.name.to_lowercase().contains(&needle)
                || sample.help.to_lowercase().contains(&needle)
            {
                seen.insert(sample.name.as_str());
                hits.push(SearchHit {
                    name: &sample.name,
                    help: &sample.help,
                    value: sample.value,
                });
            }
        }
        hits
    }

    pub fn details(&self, name: &str) -> MetricDetails<'_> {
        MetricDetails {
            meta: self.metadata.get(name),
            samples: self.samples.iter().filter(|s| s.name == name).collect(),
        }
    }

    /// Sorted, deduplicated metric names, e.g. for completion hints.
    pub fn metric_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .samples
            .iter()
            .map(|s| s.name.as_str())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort_unstable();
        names
    }
}
