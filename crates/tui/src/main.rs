mod renderer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use folio_core::config::TimelineConfig;
use folio_core::content::parse_experiences;
use folio_core::svg::render_svg;
use folio_core::timeline::{ObserverGuard, TargetMap, TimelineController};
use folio_core::views::{render_card, render_milestones, render_rails};
use folio_protocol::Viewport;

const USAGE: &str =
    "Usage: folio <experiences.json> [--config <config.json>] [--svg <out.svg> [--progress <0..1>]]";

struct Args {
    experiences: PathBuf,
    config: Option<PathBuf>,
    svg: Option<PathBuf>,
    progress: f64,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut experiences = None;
    let mut config = None;
    let mut svg = None;
    let mut progress = 1.0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next().context(USAGE)?)),
            "--svg" => svg = Some(PathBuf::from(args.next().context(USAGE)?)),
            "--progress" => {
                progress = args
                    .next()
                    .context(USAGE)?
                    .parse::<f64>()
                    .context("--progress expects a number")?;
            }
            _ if experiences.is_none() => experiences = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg:?}\n{USAGE}"),
        }
    }

    Ok(Args {
        experiences: experiences.context(USAGE)?,
        config,
        svg,
        progress,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let data = std::fs::read(&args.experiences)
        .with_context(|| format!("reading {}", args.experiences.display()))?;
    let records = parse_experiences(&data)?;

    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            TimelineConfig::from_json(&data)?
        }
        None => TimelineConfig::default(),
    };

    let mut controller = TimelineController::new(config);
    controller.mount(&records, TargetMap::for_model, ObserverGuard::noop())?;

    match &args.svg {
        Some(out) => export_svg(&mut controller, args.progress, out),
        None => renderer::run_tui(&mut controller),
    }
}

/// Write a static snapshot of the timeline at `progress`.
fn export_svg(controller: &mut TimelineController, progress: f64, out: &Path) -> Result<()> {
    const WIDTH: f64 = 1200.0;
    const RAILS_HEIGHT: f64 = 240.0;
    const BODY_HEIGHT: f64 = 480.0;

    controller.seek_progress(progress);
    controller.tick(0.0);

    let model = controller.model().context("timeline is not mounted")?;
    let frame = controller.frame().context("timeline is not mounted")?;
    let mut commands = render_rails(
        model,
        &frame,
        &controller.config().layout,
        controller.targets(),
        &Viewport::new(WIDTH, RAILS_HEIGHT),
    );
    commands.extend(render_card(
        model,
        &frame,
        controller.targets(),
        &Viewport {
            x: 0.0,
            y: RAILS_HEIGHT,
            width: WIDTH * 0.6,
            height: BODY_HEIGHT,
            dpr: 1.0,
        },
    ));
    commands.extend(render_milestones(
        controller.current_milestones(),
        frame.milestone_opacity,
        &Viewport {
            x: WIDTH * 0.6,
            y: RAILS_HEIGHT,
            width: WIDTH * 0.4,
            height: BODY_HEIGHT,
            dpr: 1.0,
        },
    ));

    let svg = render_svg(&commands, WIDTH, RAILS_HEIGHT + BODY_HEIGHT, false);
    std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
    log::info!(
        "wrote {} ({} commands, progress {:.3})",
        out.display(),
        commands.len(),
        frame.progress
    );
    Ok(())
}
