//! Multi-track animation schedule.
//!
//! Every marker, label and card transition is laid out once on the virtual
//! timeline when the model is built. Styles are then replayed as a pure
//! function of time, so scrubbing backward lands on exactly the same state
//! as scrubbing forward.

use std::collections::HashMap;

use folio_protocol::{ElementStyle, Group};
use serde::{Deserialize, Serialize};

use super::curve::ProgressCurve;
use crate::config::TimelineConfig;
use crate::model::{EnrichedExperience, TimelineModel};

const CARD_ENTER_OFFSET: f64 = 16.0;
const CARD_EXIT_OFFSET: f64 = -10.0;
const LABEL_ENTER_OFFSET: f64 = 10.0;
const LABEL_EXIT_OFFSET: f64 = -6.0;

/// A logical animation target. The presentation layer maps these to
/// concrete handles through a `TargetMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualTarget {
    /// Experience card by chronological index.
    Card(usize),
    /// Marker ring on a rail, by group and group index.
    Dot(Group, usize),
    /// Filled core inside a marker ring.
    DotInner(Group, usize),
    /// Position/date label above or below a marker.
    Label(Group, usize),
}

impl VisualTarget {
    pub fn dot(experience: &EnrichedExperience) -> Self {
        Self::Dot(experience.group, experience.group_index)
    }

    pub fn dot_inner(experience: &EnrichedExperience) -> Self {
        Self::DotInner(experience.group, experience.group_index)
    }

    pub fn label(experience: &EnrichedExperience) -> Self {
        Self::Label(experience.group, experience.group_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Default tween ease: fast start, soft landing.
    Power1Out,
    Power2InOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// The subset of style properties a transition animates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleChange {
    pub opacity: Option<f64>,
    pub offset_y: Option<f64>,
    pub scale: Option<f64>,
    pub accent: Option<f64>,
}

impl StyleChange {
    fn fade(opacity: f64, offset_y: f64) -> Self {
        Self {
            opacity: Some(opacity),
            offset_y: Some(offset_y),
            ..Self::default()
        }
    }

    fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Interpolate from `from` toward this change by `amount` in [0, 1].
    pub fn blend(&self, from: ElementStyle, amount: f64) -> ElementStyle {
        let lerp = |a: f64, b: Option<f64>| b.map_or(a, |b| a + (b - a) * amount);
        ElementStyle {
            opacity: lerp(from.opacity, self.opacity),
            offset_y: lerp(from.offset_y, self.offset_y),
            scale: lerp(from.scale, self.scale),
            accent: lerp(from.accent, self.accent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: VisualTarget,
    pub start: f64,
    pub duration: f64,
    pub to: StyleChange,
    pub ease: Ease,
}

impl Transition {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// When one experience takes over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub index: usize,
    pub slot_index: usize,
    /// The fill arrives at this experience's marker.
    pub reach_time: f64,
    /// The previous experience starts fading out, `lead` ahead of the reach.
    pub start_time: f64,
    /// This experience starts fading in.
    pub show_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    cues: Vec<Cue>,
    tracks: HashMap<VisualTarget, Vec<Transition>>,
    initial: HashMap<VisualTarget, ElementStyle>,
    milestone_fade: f64,
}

impl Schedule {
    pub fn build(model: &TimelineModel, curve: &ProgressCurve, config: &TimelineConfig) -> Self {
        let durations = &config.durations;
        let timings = &config.timings;

        let mut initial = HashMap::new();
        for (index, experience) in model.enriched.iter().enumerate() {
            let first = index == 0;
            initial.insert(
                VisualTarget::Card(index),
                if first {
                    ElementStyle::VISIBLE
                } else {
                    ElementStyle {
                        offset_y: CARD_ENTER_OFFSET,
                        ..ElementStyle::HIDDEN
                    }
                },
            );
            initial.insert(
                VisualTarget::dot(experience),
                ElementStyle {
                    accent: if first { 1.0 } else { 0.0 },
                    ..ElementStyle::VISIBLE
                },
            );
            initial.insert(
                VisualTarget::dot_inner(experience),
                ElementStyle {
                    scale: if first { 1.0 } else { 0.0 },
                    ..ElementStyle::VISIBLE
                },
            );
            initial.insert(
                VisualTarget::label(experience),
                if first {
                    ElementStyle::VISIBLE
                } else {
                    ElementStyle {
                        offset_y: LABEL_ENTER_OFFSET,
                        ..ElementStyle::HIDDEN
                    }
                },
            );
        }

        let mut cues = Vec::with_capacity(model.len());
        let mut transitions = Vec::with_capacity(model.len() * 7);
        let mut push = |target, start, duration, to, ease| {
            transitions.push(Transition {
                target,
                start,
                duration,
                to,
                ease,
            });
        };

        for (index, experience) in model.enriched.iter().enumerate() {
            let reach_time = curve.reach_time(experience.slot_index);
            let start_time = (reach_time - timings.lead).max(0.0);
            let show_time = start_time + timings.step_delay;
            cues.push(Cue {
                index,
                slot_index: experience.slot_index,
                reach_time,
                start_time,
                show_time,
            });

            if let Some(previous) = index.checked_sub(1).and_then(|i| model.get(i)) {
                push(
                    VisualTarget::Card(index - 1),
                    start_time,
                    durations.step_fade,
                    StyleChange::fade(0.0, CARD_EXIT_OFFSET),
                    Ease::Power1Out,
                );
                push(
                    VisualTarget::label(previous),
                    start_time,
                    durations.step_fade,
                    StyleChange::fade(0.0, LABEL_EXIT_OFFSET),
                    Ease::Power1Out,
                );
                // The ring keeps its accent once visited; only the core shrinks.
                push(
                    VisualTarget::dot_inner(previous),
                    start_time,
                    durations.dot_animation,
                    StyleChange::scale(0.0),
                    Ease::Power2InOut,
                );
            }

            push(
                VisualTarget::Card(index),
                show_time,
                durations.step_show,
                StyleChange::fade(1.0, 0.0),
                Ease::Power1Out,
            );
            push(
                VisualTarget::dot(experience),
                show_time,
                durations.dot_animation,
                StyleChange {
                    scale: Some(1.0),
                    accent: Some(1.0),
                    ..StyleChange::default()
                },
                Ease::Power2InOut,
            );
            push(
                VisualTarget::dot_inner(experience),
                show_time,
                durations.dot_animation,
                StyleChange::scale(1.0),
                Ease::Power2InOut,
            );
            push(
                VisualTarget::label(experience),
                show_time,
                durations.step_show,
                StyleChange::fade(1.0, 0.0),
                Ease::Power1Out,
            );
        }

        let mut tracks: HashMap<VisualTarget, Vec<Transition>> = HashMap::new();
        for transition in transitions {
            tracks.entry(transition.target).or_default().push(transition);
        }
        for track in tracks.values_mut() {
            track.sort_by(|a, b| a.start.total_cmp(&b.start));
        }

        Self {
            cues,
            tracks,
            initial,
            milestone_fade: durations.milestone_fade,
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn transitions(&self, target: VisualTarget) -> &[Transition] {
        self.tracks.get(&target).map_or(&[], Vec::as_slice)
    }

    pub fn transition_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }

    /// The style of `target` at virtual time `time`.
    pub fn style_at(&self, target: VisualTarget, time: f64) -> ElementStyle {
        let mut style = self.initial.get(&target).copied().unwrap_or_default();
        for transition in self.transitions(target) {
            if time < transition.start {
                break;
            }
            let amount = if transition.duration <= 0.0 || time >= transition.end() {
                1.0
            } else {
                transition
                    .ease
                    .apply((time - transition.start) / transition.duration)
            };
            style = transition.to.blend(style, amount);
        }
        style
    }

    /// Index of the experience whose cue has most recently started.
    pub fn active_cue_at(&self, time: f64) -> Option<&Cue> {
        let started = self.cues.partition_point(|cue| cue.start_time <= time);
        match started {
            0 => self.cues.first(),
            n => self.cues.get(n - 1),
        }
    }

    /// Opacity of the milestone list, which fades in after each swap.
    pub fn milestone_opacity_at(&self, time: f64) -> f64 {
        match self.active_cue_at(time) {
            Some(cue) if cue.index > 0 => {
                if self.milestone_fade <= 0.0 {
                    1.0
                } else {
                    ((time - cue.show_time) / self.milestone_fade).clamp(0.0, 1.0)
                }
            }
            _ => 1.0,
        }
    }
}
