use std::hash::{DefaultHasher, Hash, Hasher};

use folio_protocol::Group;
use serde::{Deserialize, Serialize};

use super::experience::ExperienceRecord;
use super::group::CompanyMatcher;
use super::normalize::normalize;
use crate::config::Layout;

/// An experience placed on the shared axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedExperience {
    pub record: ExperienceRecord,
    /// Stable key: the record id, or `company-startDate-slot` without one.
    pub key: String,
    pub group: Group,
    /// Rank within its group, chronological.
    pub group_index: usize,
    /// Rank across all experiences, chronological.
    pub slot_index: usize,
    /// Position on the axis in [0, 1].
    pub slot_position: f64,
}

/// The derived timeline: every experience with its slot, plus the extent
/// of the secondary rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineModel {
    pub enriched: Vec<EnrichedExperience>,
    /// Number of experiences, plus one when a primary entry is ongoing (the
    /// implied "now" endpoint past the last record).
    pub total_axis_slots: usize,
    pub other_start_position: f64,
    pub other_end_position: f64,
}

impl TimelineModel {
    /// Build the model from raw records.
    ///
    /// Records are sorted with [`normalize`] first; the result depends only
    /// on the input list and the matcher.
    pub fn build<M>(records: &[ExperienceRecord], matcher: &M) -> Self
    where
        M: CompanyMatcher + ?Sized,
    {
        let sorted = normalize(records);
        let groups: Vec<Group> = sorted.iter().map(|r| matcher.group_of(&r.company)).collect();

        let has_ongoing_primary = sorted
            .iter()
            .zip(&groups)
            .any(|(r, g)| *g == Group::Primary && r.is_ongoing());

        let total_axis_slots = sorted.len() + usize::from(has_ongoing_primary);

        let other_slots = || {
            groups
                .iter()
                .enumerate()
                .filter(|(_, g)| **g == Group::Other)
                .map(|(i, _)| i)
        };
        let other_start_slot = other_slots().min().unwrap_or(0);
        let other_end_slot = other_slots().max().unwrap_or(0);

        let mut primary_count = 0;
        let mut other_count = 0;
        let enriched = sorted
            .into_iter()
            .zip(groups)
            .enumerate()
            .map(|(slot_index, (record, group))| {
                let counter = match group {
                    Group::Primary => &mut primary_count,
                    Group::Other => &mut other_count,
                };
                let group_index = *counter;
                *counter += 1;

                let key = match &record.id {
                    Some(id) => id.clone(),
                    None => format!("{}-{}-{slot_index}", record.company, record.start_date),
                };

                EnrichedExperience {
                    record,
                    key,
                    group,
                    group_index,
                    slot_index,
                    slot_position: slot_position(slot_index, total_axis_slots),
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "timeline model: {} experiences, {total_axis_slots} axis slots (ongoing primary: {has_ongoing_primary})",
            enriched.len()
        );

        Self {
            enriched,
            total_axis_slots,
            other_start_position: slot_position(other_start_slot, total_axis_slots),
            other_end_position: slot_position(other_end_slot, total_axis_slots),
        }
    }

    pub fn len(&self) -> usize {
        self.enriched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enriched.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EnrichedExperience> {
        self.enriched.get(index)
    }

    /// Number of move/hold segments along the axis (never zero).
    pub fn total_segments(&self) -> usize {
        self.total_axis_slots.saturating_sub(1).max(1)
    }

    pub fn group(&self, group: Group) -> impl Iterator<Item = &EnrichedExperience> {
        self.enriched.iter().filter(move |e| e.group == group)
    }

    pub fn has_group(&self, group: Group) -> bool {
        self.group(group).next().is_some()
    }

    /// Where the secondary rail ends, inset from the axis edge so its end
    /// cap never sits on top of it.
    pub fn other_end_max_position(&self, layout: &Layout) -> f64 {
        (1.0 - layout.other_end_gap).min(self.other_end_position + layout.other_after_last)
    }
}

/// Axis position of a slot, in [0, 1].
pub fn slot_position(slot_index: usize, total_axis_slots: usize) -> f64 {
    let denominator = total_axis_slots.saturating_sub(1).max(1) as f64;
    (slot_index as f64 / denominator).clamp(0.0, 1.0)
}

/// Fingerprint of the inputs the model depends on: the list length and each
/// record's id, company and start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelIdentity(u64);

impl ModelIdentity {
    pub fn of(records: &[ExperienceRecord]) -> Self {
        let mut hasher = DefaultHasher::new();
        records.len().hash(&mut hasher);
        for record in records {
            record.id.hash(&mut hasher);
            record.company.hash(&mut hasher);
            record.start_date.hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}
