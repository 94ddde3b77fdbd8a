use std::collections::HashMap;

use folio_protocol::Group;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schedule::VisualTarget;
use crate::model::{EnrichedExperience, TimelineModel};

/// Opaque handle to a presentation element (a DOM node, a widget id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetHandle(pub u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    #[error("missing animation target: {0}")]
    MissingTarget(&'static str),
}

/// Handles for one marker on a rail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotTargets {
    pub dot: Option<TargetHandle>,
    pub label: Option<TargetHandle>,
    pub dot_inner: Option<TargetHandle>,
}

/// Declarative map from logical targets to presentation handles.
///
/// Built once per mount and discarded when the model is rebuilt. The eight
/// container handles are required; per-experience handles are optional and
/// missing ones are simply not animated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetMap {
    pub section: Option<TargetHandle>,
    pub cards: Option<TargetHandle>,
    pub milestones: Option<TargetHandle>,
    pub primary_fill: Option<TargetHandle>,
    pub other_fill: Option<TargetHandle>,
    pub primary_rail: Option<TargetHandle>,
    pub other_rail: Option<TargetHandle>,
    pub other_end_cap: Option<TargetHandle>,
    dots: HashMap<(Group, usize), DotTargets>,
    experience_cards: Vec<Option<TargetHandle>>,
}

impl TargetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a complete map for `model` with sequential handles.
    pub fn for_model(model: &TimelineModel) -> Self {
        let mut next = 0u32;
        let mut alloc = || {
            let handle = TargetHandle(next);
            next += 1;
            Some(handle)
        };

        let mut map = Self {
            section: alloc(),
            cards: alloc(),
            milestones: alloc(),
            primary_fill: alloc(),
            other_fill: alloc(),
            primary_rail: alloc(),
            other_rail: alloc(),
            other_end_cap: alloc(),
            ..Self::default()
        };
        for experience in &model.enriched {
            map.set_dot(
                experience.group,
                experience.group_index,
                DotTargets {
                    dot: alloc(),
                    label: alloc(),
                    dot_inner: alloc(),
                },
            );
            map.experience_cards.push(alloc());
        }
        map
    }

    pub fn set_dot(&mut self, group: Group, group_index: usize, targets: DotTargets) {
        self.dots.insert((group, group_index), targets);
    }

    pub fn set_card(&mut self, index: usize, handle: TargetHandle) {
        if self.experience_cards.len() <= index {
            self.experience_cards.resize(index + 1, None);
        }
        self.experience_cards[index] = Some(handle);
    }

    pub fn dot_targets(&self, experience: &EnrichedExperience) -> DotTargets {
        self.dots
            .get(&(experience.group, experience.group_index))
            .copied()
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.experience_cards.iter().flatten().count()
    }

    pub fn resolve(&self, target: VisualTarget) -> Option<TargetHandle> {
        match target {
            VisualTarget::Card(index) => self.experience_cards.get(index).copied().flatten(),
            VisualTarget::Dot(group, index) => self.dots.get(&(group, index)).and_then(|d| d.dot),
            VisualTarget::DotInner(group, index) => {
                self.dots.get(&(group, index)).and_then(|d| d.dot_inner)
            }
            VisualTarget::Label(group, index) => {
                self.dots.get(&(group, index)).and_then(|d| d.label)
            }
        }
    }

    /// Check that every container the timeline drives is present and that
    /// a non-empty `model` has at least one experience card. An empty model
    /// mounts as a static rail with no cards.
    pub fn validate(&self, model: &TimelineModel) -> Result<(), MountError> {
        let required = [
            (self.section, "section"),
            (self.cards, "cards"),
            (self.milestones, "milestones"),
            (self.primary_fill, "primary fill"),
            (self.other_fill, "other fill"),
            (self.primary_rail, "primary rail"),
            (self.other_rail, "other rail"),
            (self.other_end_cap, "other end cap"),
        ];
        for (handle, name) in required {
            if handle.is_none() {
                return Err(MountError::MissingTarget(name));
            }
        }
        if !model.is_empty() && self.card_count() == 0 {
            return Err(MountError::MissingTarget("experience cards"));
        }
        Ok(())
    }
}
