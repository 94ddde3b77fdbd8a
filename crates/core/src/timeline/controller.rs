use folio_protocol::{ElementStyle, TimelineFrame};
use serde::Serialize;

use super::curve::ProgressCurve;
use super::driver::{ProgressDriver, ScrollInput};
use super::resolver::{Resolver, active_index_for};
use super::schedule::{Schedule, VisualTarget};
use super::targets::{MountError, TargetHandle, TargetMap};
use crate::config::TimelineConfig;
use crate::model::{
    CompanyMatcher, ExperienceRecord, MarkerMatcher, Milestone, ModelIdentity, TimelineModel,
};

type TargetFactory = Box<dyn Fn(&TimelineModel) -> TargetMap + Send>;

/// Releases whatever the host registered for a mount (resize observers,
/// scroll listeners). The callback runs exactly once, on drop.
pub struct ObserverGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ObserverGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for ObserverGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// The active experience changed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Everything derived from one record list. Dropped wholesale on rebuild.
#[derive(Debug)]
struct Session {
    identity: ModelIdentity,
    model: TimelineModel,
    schedule: Schedule,
    driver: ProgressDriver,
    targets: TargetMap,
    active: Option<usize>,
}

impl Session {
    fn resolver<'a>(&'a self, config: &'a TimelineConfig) -> Resolver<'a> {
        Resolver::new(
            &self.model,
            self.driver.curve(),
            &self.schedule,
            &config.layout,
        )
    }

    fn progress_active(&self) -> Option<usize> {
        active_index_for(
            self.driver.progress(),
            self.model.len(),
            self.driver.curve().segments,
        )
    }
}

/// Owns one mounted career timeline: model, schedule, scroll state and the
/// host's observer registrations.
pub struct TimelineController {
    config: TimelineConfig,
    matcher: Box<dyn CompanyMatcher + Send + Sync>,
    session: Option<Session>,
    target_factory: Option<TargetFactory>,
    guard: Option<ObserverGuard>,
    generation: u64,
}

impl TimelineController {
    pub fn new(config: TimelineConfig) -> Self {
        let matcher = MarkerMatcher::new(&config.primary_marker);
        Self::with_matcher(config, matcher)
    }

    pub fn with_matcher(
        config: TimelineConfig,
        matcher: impl CompanyMatcher + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            matcher: Box::new(matcher),
            session: None,
            target_factory: None,
            guard: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Whether a built timeline is live. A controller whose last rebuild
    /// failed validation reports `false` until a later `set_records` succeeds.
    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    /// Incremented on every successful build.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Build the timeline for `records` and take ownership of the host's
    /// observer registrations.
    ///
    /// `targets` is asked for a fresh map on every build. When the map lacks
    /// a required container the mount is abandoned: nothing is kept and
    /// `guard` is released.
    pub fn mount<F>(
        &mut self,
        records: &[ExperienceRecord],
        targets: F,
        guard: ObserverGuard,
    ) -> Result<(), MountError>
    where
        F: Fn(&TimelineModel) -> TargetMap + Send + 'static,
    {
        self.unmount();
        let session = self.build_session(records, &targets)?;
        self.session = Some(session);
        self.target_factory = Some(Box::new(targets));
        self.guard = Some(guard);
        Ok(())
    }

    /// Replace the record list. Returns `true` when the timeline was rebuilt.
    ///
    /// Content-only edits (descriptions, end dates that leave the slot layout
    /// alone) keep the current scroll state; anything touching identity or
    /// layout tears the schedule down and starts over.
    ///
    /// A rebuild whose targets fail validation leaves the timeline unbuilt
    /// but keeps the target factory and observer guard, so the next call
    /// with a usable record list builds it again.
    pub fn set_records(&mut self, records: &[ExperienceRecord]) -> Result<bool, MountError> {
        if self.target_factory.is_none() {
            return Ok(false);
        }

        if let Some(session) = self.session.as_mut() {
            let identity = ModelIdentity::of(records);
            let model = TimelineModel::build(records, &*self.matcher);
            if identity == session.identity && same_layout(&session.model, &model) {
                session.model = model;
                return Ok(false);
            }
            log::debug!(
                "experience list changed ({} records), rebuilding timeline",
                records.len()
            );
        }

        self.session = None;
        let Some(factory) = self.target_factory.take() else {
            return Ok(false);
        };
        let built = self.build_session(records, &factory);
        self.target_factory = Some(factory);
        self.session = Some(built?);
        Ok(true)
    }

    /// Cancel the schedule and release the host's observers.
    pub fn unmount(&mut self) {
        if self.session.take().is_some() {
            log::debug!("timeline unmounted (generation {})", self.generation);
        }
        self.target_factory = None;
        self.guard = None;
    }

    fn build_session(
        &mut self,
        records: &[ExperienceRecord],
        targets: &dyn Fn(&TimelineModel) -> TargetMap,
    ) -> Result<Session, MountError> {
        let model = TimelineModel::build(records, &*self.matcher);
        let targets = targets(&model);
        if let Err(err) = targets.validate(&model) {
            log::warn!("timeline mount aborted: {err}");
            return Err(err);
        }

        let curve = ProgressCurve::for_model(&model, &self.config);
        let schedule = Schedule::build(&model, &curve, &self.config);
        let driver = ProgressDriver::new(curve, &self.config, model.len() > 1);
        self.generation += 1;
        log::debug!(
            "timeline built: {} experiences, {} slots, {} transitions (generation {})",
            model.len(),
            model.total_axis_slots,
            schedule.transition_count(),
            self.generation
        );

        let mut session = Session {
            identity: ModelIdentity::of(records),
            model,
            schedule,
            driver,
            targets,
            active: None,
        };
        session.active = session.progress_active();
        Ok(session)
    }

    pub fn scroll(&mut self, input: ScrollInput) {
        if let Some(session) = self.session.as_mut() {
            session.driver.scroll(input);
        }
    }

    /// Jump to virtual time `time` without smoothing.
    pub fn seek(&mut self, time: f64) {
        if let Some(session) = self.session.as_mut() {
            session.driver.seek(time);
        }
    }

    /// Jump to the earliest time `progress` is reached.
    pub fn seek_progress(&mut self, progress: f64) {
        if let Some(session) = self.session.as_mut() {
            let time = session.driver.curve().earliest_time_for(progress);
            session.driver.seek(time);
        }
    }

    /// The user stopped scrolling; snap toward the nearest marker.
    pub fn release(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.driver.release();
        }
    }

    /// Advance smoothing by `dt` seconds and report an active change.
    pub fn tick(&mut self, dt: f64) -> Option<ActiveChange> {
        let session = self.session.as_mut()?;
        session.driver.tick(dt);
        let current = session.progress_active();
        if current == session.active {
            return None;
        }
        let previous = std::mem::replace(&mut session.active, current);
        Some(ActiveChange { previous, current })
    }

    pub fn frame(&self) -> Option<TimelineFrame> {
        let session = self.session.as_ref()?;
        Some(session.resolver(&self.config).at_time(session.driver.time()))
    }

    /// Styles for every mapped handle at the current time.
    pub fn target_styles(&self) -> Vec<(TargetHandle, ElementStyle)> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let time = session.driver.time();
        session
            .model
            .enriched
            .iter()
            .enumerate()
            .flat_map(|(index, experience)| {
                [
                    VisualTarget::Card(index),
                    VisualTarget::dot(experience),
                    VisualTarget::dot_inner(experience),
                    VisualTarget::label(experience),
                ]
            })
            .filter_map(|target| {
                let handle = session.targets.resolve(target)?;
                Some((handle, session.schedule.style_at(target, time)))
            })
            .collect()
    }

    pub fn model(&self) -> Option<&TimelineModel> {
        self.session.as_ref().map(|s| &s.model)
    }

    pub fn targets(&self) -> Option<&TargetMap> {
        self.session.as_ref().map(|s| &s.targets)
    }

    pub fn progress(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.driver.progress())
    }

    pub fn time(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.driver.time())
    }

    pub fn total_duration(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| s.driver.curve().total_duration())
    }

    /// Pixels of scroll the host should pin the section for.
    pub fn scroll_distance(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| s.driver.scroll_distance())
    }

    pub fn is_settled(&self) -> bool {
        self.session.as_ref().is_none_or(|s| s.driver.is_settled())
    }

    /// The experience shown by the card stack, as of the last tick.
    pub fn active_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.active)
    }

    pub fn current_milestones(&self) -> &[Milestone] {
        self.session
            .as_ref()
            .and_then(|s| s.model.get(s.active?))
            .map_or(&[], |e| e.record.milestones())
    }
}

impl Drop for TimelineController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for TimelineController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineController")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

fn same_layout(a: &TimelineModel, b: &TimelineModel) -> bool {
    a.total_axis_slots == b.total_axis_slots
        && a.other_start_position == b.other_start_position
        && a.other_end_position == b.other_end_position
        && a.enriched
            .iter()
            .zip(&b.enriched)
            .all(|(x, y)| x.group == y.group && x.group_index == y.group_index)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn config() -> TimelineConfig {
        TimelineConfig {
            scrub_seconds: 0.0,
            ..TimelineConfig::with_primary_marker("acme")
        }
    }

    fn records() -> Vec<ExperienceRecord> {
        let mut acme = ExperienceRecord::new("Acme", "Lead", "2018-02", None);
        acme.milestones = Some(vec![Milestone {
            title: "Platform".into(),
            description: "Shipped it".into(),
        }]);
        vec![
            ExperienceRecord::new("Initech", "Dev", "2014-01", Some("2016-01")),
            ExperienceRecord::new("Globex", "Dev", "2016-02", Some("2018-01")),
            acme,
        ]
    }

    fn counting_guard() -> (ObserverGuard, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let guard = ObserverGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (guard, released)
    }

    fn mounted() -> TimelineController {
        let mut controller = TimelineController::new(config());
        let mounted = controller.mount(&records(), TargetMap::for_model, ObserverGuard::noop());
        assert_eq!(mounted, Ok(()));
        controller
    }

    #[test]
    fn mount_builds_the_timeline() {
        let controller = mounted();
        assert!(controller.is_mounted());
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.active_index(), Some(0));
        // Three records plus the ongoing slot: three segments of 3s.
        assert_eq!(controller.total_duration(), 9.0);
        assert_eq!(controller.scroll_distance(), 9.0 * 600.0);
    }

    #[test]
    fn missing_target_leaves_nothing_mounted() {
        let (guard, released) = counting_guard();
        let mut controller = TimelineController::new(config());
        let result = controller.mount(
            &records(),
            |model: &TimelineModel| {
                let mut map = TargetMap::for_model(model);
                map.cards = None;
                map
            },
            guard,
        );
        assert_eq!(result, Err(MountError::MissingTarget("cards")));
        assert!(!controller.is_mounted());
        assert!(controller.frame().is_none());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_list_mounts_a_static_timeline() {
        let mut controller = TimelineController::new(config());
        assert_eq!(
            controller.mount(&[], TargetMap::for_model, ObserverGuard::noop()),
            Ok(())
        );
        assert!(controller.is_mounted());
        assert_eq!(controller.active_index(), None);
        assert!(controller.current_milestones().is_empty());
        assert!(controller.target_styles().is_empty());

        controller.scroll(ScrollInput::pinned(1_000.0));
        controller.release();
        assert_eq!(controller.tick(0.016), None);
        let frame = controller.frame().expect("frame");
        assert!(frame.experiences.is_empty());
        assert_eq!(frame.active_index, None);
    }

    #[test]
    fn emptied_list_recovers_on_next_update() {
        let mut controller = mounted();
        assert_eq!(controller.set_records(&[]), Ok(true));
        assert!(controller.is_mounted());
        assert_eq!(controller.model().map(TimelineModel::len), Some(0));

        assert_eq!(controller.set_records(&records()), Ok(true));
        assert!(controller.is_mounted());
        assert_eq!(controller.generation(), 3);
        assert_eq!(controller.active_index(), Some(0));
    }

    #[test]
    fn failed_rebuild_keeps_observers_until_a_later_rebuild() {
        let (guard, released) = counting_guard();
        let mut controller = TimelineController::new(config());
        // A host that cannot find its card container for single-entry lists.
        let targets = |model: &TimelineModel| {
            let mut map = TargetMap::for_model(model);
            if model.len() == 1 {
                map.cards = None;
            }
            map
        };
        assert_eq!(controller.mount(&records(), targets, guard), Ok(()));

        let all = records();
        assert_eq!(
            controller.set_records(&all[..1]),
            Err(MountError::MissingTarget("cards"))
        );
        assert!(!controller.is_mounted());
        assert!(controller.frame().is_none());
        assert_eq!(controller.generation(), 1);
        assert_eq!(released.load(Ordering::SeqCst), 0);

        assert_eq!(controller.set_records(&records()), Ok(true));
        assert!(controller.is_mounted());
        assert_eq!(controller.generation(), 2);
        assert_eq!(released.load(Ordering::SeqCst), 0);

        drop(controller);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tick_reports_active_changes() {
        let mut controller = mounted();
        controller.scroll(ScrollInput::pinned(0.5 * 600.0));
        assert_eq!(controller.tick(0.016), None);

        controller.scroll(ScrollInput::pinned(1.5 * 600.0));
        assert_eq!(
            controller.tick(0.016),
            Some(ActiveChange {
                previous: Some(0),
                current: Some(1),
            })
        );
        assert_eq!(controller.tick(0.016), None);

        controller.scroll(ScrollInput::pinned(0.0));
        assert_eq!(
            controller.tick(0.016),
            Some(ActiveChange {
                previous: Some(1),
                current: Some(0),
            })
        );
    }

    #[test]
    fn release_snaps_then_settles_on_marker() {
        let mut controller = mounted();
        // 0.8 through the first move phase.
        controller.scroll(ScrollInput::pinned(0.8 * 600.0));
        controller.release();
        controller.tick(0.016);
        assert!((controller.progress() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(controller.active_index(), Some(1));
    }

    #[test]
    fn milestones_follow_active_experience() {
        let mut controller = mounted();
        assert!(controller.current_milestones().is_empty());
        controller.seek(controller.total_duration());
        controller.tick(0.0);
        assert_eq!(controller.active_index(), Some(2));
        assert_eq!(controller.current_milestones().len(), 1);
        assert_eq!(controller.current_milestones()[0].title, "Platform");
    }

    #[test]
    fn frame_reflects_driver_time() {
        let mut controller = mounted();
        controller.seek(4.5);
        let frame = controller.frame().expect("frame");
        assert_eq!(frame.time, 4.5);
        assert!((frame.progress - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(frame.experiences.len(), 3);
    }

    #[test]
    fn seek_progress_lands_on_first_arrival() {
        let mut controller = mounted();
        controller.seek_progress(2.0 / 3.0);
        assert!((controller.time() - 4.0).abs() < 1e-9);
        controller.tick(0.0);
        assert_eq!(controller.active_index(), Some(2));
    }

    #[test]
    fn target_styles_cover_every_mapped_handle() {
        let controller = mounted();
        let styles = controller.target_styles();
        assert_eq!(styles.len(), 3 * 4);
    }

    #[test]
    fn content_edit_keeps_generation() {
        let mut controller = mounted();
        controller.seek(2.0);
        let mut edited = records();
        edited[0].body = "Rewritten".into();
        assert_eq!(controller.set_records(&edited), Ok(false));
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.time(), 2.0);
        let body = controller
            .model()
            .and_then(|m| m.get(0))
            .map(|e| e.record.body.clone());
        assert_eq!(body.as_deref(), Some("Rewritten"));
    }

    #[test]
    fn identity_change_rebuilds_from_scratch() {
        let mut controller = mounted();
        controller.seek(4.0);
        let mut more = records();
        more.push(ExperienceRecord::new("Hooli", "CTO", "2012-01", Some("2013-12")));
        assert_eq!(controller.set_records(&more), Ok(true));
        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.time(), 0.0);
        assert_eq!(controller.model().map(TimelineModel::len), Some(4));
    }

    #[test]
    fn ending_the_ongoing_role_rebuilds() {
        let mut controller = mounted();
        let mut ended = records();
        ended[2].end_date = Some("2024-01".into());
        assert_eq!(controller.set_records(&ended), Ok(true));
        assert_eq!(controller.total_duration(), 6.0);
    }

    #[test]
    fn unmount_and_drop_release_observers_once() {
        let (guard, released) = counting_guard();
        let mut controller = TimelineController::new(config());
        assert_eq!(
            controller.mount(&records(), TargetMap::for_model, guard),
            Ok(())
        );
        controller.unmount();
        assert_eq!(released.load(Ordering::SeqCst), 1);
        drop(controller);
        assert_eq!(released.load(Ordering::SeqCst), 1);

        let (guard, released) = counting_guard();
        let mut controller = TimelineController::new(config());
        assert_eq!(
            controller.mount(&records(), TargetMap::for_model, guard),
            Ok(())
        );
        drop(controller);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remount_releases_previous_observers() {
        let (first, released) = counting_guard();
        let mut controller = TimelineController::new(config());
        assert_eq!(
            controller.mount(&records(), TargetMap::for_model, first),
            Ok(())
        );
        assert_eq!(
            controller.mount(&records(), TargetMap::for_model, ObserverGuard::noop()),
            Ok(())
        );
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(controller.generation(), 2);
    }

    #[test]
    fn unmounted_controller_is_inert() {
        let mut controller = TimelineController::new(config());
        controller.scroll(ScrollInput::pinned(100.0));
        assert_eq!(controller.tick(0.1), None);
        assert_eq!(controller.progress(), 0.0);
        assert!(controller.target_styles().is_empty());
        assert_eq!(controller.set_records(&records()), Ok(false));
    }
}
