use std::sync::{Mutex, MutexGuard};

use folio_core::config::TimelineConfig;
use folio_core::contact::handle_contact;
use folio_core::content::{parse_experiences, parse_projects};
use folio_core::projects::ProjectCarousel;
use folio_core::timeline::{ObserverGuard, ScrollInput, TargetMap, TimelineController};
use folio_core::views::{render_card, render_milestones, render_rails};
use folio_protocol::Viewport;
use wasm_bindgen::prelude::*;

static TIMELINES: Mutex<Vec<Option<TimelineController>>> = Mutex::new(Vec::new());
static CAROUSELS: Mutex<Vec<ProjectCarousel>> = Mutex::new(Vec::new());

fn timelines() -> Result<MutexGuard<'static, Vec<Option<TimelineController>>>, JsError> {
    TIMELINES
        .lock()
        .map_err(|_| JsError::new("timeline registry is poisoned"))
}

fn with_timeline<T>(
    handle: usize,
    f: impl FnOnce(&mut TimelineController) -> Result<T, JsError>,
) -> Result<T, JsError> {
    let mut timelines = timelines()?;
    let controller = timelines
        .get_mut(handle)
        .and_then(Option::as_mut)
        .ok_or_else(|| JsError::new("invalid timeline handle"))?;
    f(controller)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Mount a timeline from a JSON array of experience records and an optional
/// JSON config. Returns a handle for later calls.
///
/// Presentation handles are allocated sequentially by the core; the host
/// maps them to DOM nodes when applying `timeline_styles`.
#[wasm_bindgen]
pub fn mount_timeline(experiences: &[u8], config: Option<String>) -> Result<usize, JsError> {
    let records = parse_experiences(experiences).map_err(|e| JsError::new(&e.to_string()))?;
    let config = match config {
        Some(json) => TimelineConfig::from_json(json.as_bytes())
            .map_err(|e| JsError::new(&e.to_string()))?,
        None => TimelineConfig::default(),
    };

    let mut controller = TimelineController::new(config);
    controller
        .mount(&records, TargetMap::for_model, ObserverGuard::noop())
        .map_err(|e| JsError::new(&e.to_string()))?;

    let mut timelines = timelines()?;
    let handle = timelines.len();
    timelines.push(Some(controller));
    Ok(handle)
}

/// Replace the experience list. Returns whether the timeline was rebuilt.
#[wasm_bindgen]
pub fn update_timeline(handle: usize, experiences: &[u8]) -> Result<bool, JsError> {
    let records = parse_experiences(experiences).map_err(|e| JsError::new(&e.to_string()))?;
    with_timeline(handle, |controller| {
        controller
            .set_records(&records)
            .map_err(|e| JsError::new(&e.to_string()))
    })
}

/// Pixels of scroll the host should keep the section pinned for.
#[wasm_bindgen]
pub fn scroll_distance(handle: usize) -> Result<f64, JsError> {
    with_timeline(handle, |controller| Ok(controller.scroll_distance()))
}

#[wasm_bindgen]
pub fn scroll_timeline(handle: usize, offset_px: f64, pinned: bool) -> Result<(), JsError> {
    with_timeline(handle, |controller| {
        controller.scroll(ScrollInput { offset_px, pinned });
        Ok(())
    })
}

/// The user stopped scrolling: snap to the nearest marker when appropriate.
#[wasm_bindgen]
pub fn release_timeline(handle: usize) -> Result<(), JsError> {
    with_timeline(handle, |controller| {
        controller.release();
        Ok(())
    })
}

/// Advance smoothing by `dt` seconds. Returns the active change as JSON, or
/// `null` when the active experience stayed the same.
#[wasm_bindgen]
pub fn tick_timeline(handle: usize, dt: f64) -> Result<String, JsError> {
    with_timeline(handle, |controller| to_json(&controller.tick(dt)))
}

/// The full visual state at the current time, as JSON.
#[wasm_bindgen]
pub fn timeline_frame(handle: usize) -> Result<String, JsError> {
    with_timeline(handle, |controller| to_json(&controller.frame()))
}

/// `[[handle, style], ...]` for every mapped element, as JSON.
#[wasm_bindgen]
pub fn timeline_styles(handle: usize) -> Result<String, JsError> {
    with_timeline(handle, |controller| to_json(&controller.target_styles()))
}

/// Render one part of the timeline, returning render commands as JSON.
#[wasm_bindgen]
pub fn render_timeline(
    handle: usize,
    view: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<String, JsError> {
    let viewport = Viewport {
        x,
        y,
        width,
        height,
        dpr,
    };

    with_timeline(handle, |controller| {
        let (Some(model), Some(frame)) = (controller.model(), controller.frame()) else {
            return Err(JsError::new("timeline is not mounted"));
        };
        let commands = match view {
            "rails" => render_rails(
                model,
                &frame,
                &controller.config().layout,
                controller.targets(),
                &viewport,
            ),
            "card" => render_card(model, &frame, controller.targets(), &viewport),
            "milestones" => render_milestones(
                controller.current_milestones(),
                frame.milestone_opacity,
                &viewport,
            ),
            _ => return Err(JsError::new(&format!("unknown timeline view: {view}"))),
        };
        to_json(&commands)
    })
}

/// Release a timeline. The handle stays reserved but is no longer valid.
#[wasm_bindgen]
pub fn unmount_timeline(handle: usize) -> Result<(), JsError> {
    let mut timelines = timelines()?;
    let slot = timelines
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid timeline handle"))?;
    *slot = None;
    Ok(())
}

/// Load a JSON array of projects for the filtered carousel. Returns a handle.
#[wasm_bindgen]
pub fn mount_projects(projects: &[u8]) -> Result<usize, JsError> {
    let projects = parse_projects(projects).map_err(|e| JsError::new(&e.to_string()))?;
    let mut carousels = CAROUSELS
        .lock()
        .map_err(|_| JsError::new("carousel registry is poisoned"))?;
    carousels.push(ProjectCarousel::new(projects));
    Ok(carousels.len() - 1)
}

/// Select a company tab (`"Todos"` for all). Returns the carousel view as
/// JSON: `{tabs, selected, direction, projects}`.
#[wasm_bindgen]
pub fn select_company(handle: usize, company: Option<String>) -> Result<String, JsError> {
    let mut carousels = CAROUSELS
        .lock()
        .map_err(|_| JsError::new("carousel registry is poisoned"))?;
    let carousel = carousels
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid carousel handle"))?;
    match company {
        Some(company) => to_json(&carousel.select(&company)),
        None => to_json(&carousel.view()),
    }
}

/// Validate a contact form submission. Returns `{status, body}` as JSON.
#[wasm_bindgen]
pub fn submit_contact(body: &[u8]) -> Result<String, JsError> {
    to_json(&handle_contact(body))
}
