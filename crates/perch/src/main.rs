//! Perch - drives a tooltip group through a scripted pointer and keyboard session.
//!
//! Usage: `perch [CONFIG_JSON]`. Without a path the default group timing is used.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use perch_core::logging::{init_logging, LogConfig};
use perch_core::{
    AnchorElement, ContentPayload, GroupConfig, HostEvent, HostWindow, Key, PerchError, Rect, Side,
    Size,
};
use perch_ui::{
    AnimationRequest, Animator, ArrowPosition, PlacementEngine, PlacementRequest,
    ResolvedPosition, Tooltip, TooltipGroup, TooltipOverlay,
};

fn main() -> ExitCode {
    let log_config = LogConfig::new(perch_core::logging::log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting Perch");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match GroupConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, hint = ?e.hint(), "Failed to load group config");
                return ExitCode::FAILURE;
            }
        },
        None => GroupConfig::default(),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            let e = PerchError::from(e);
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run_session(config));
    tracing::info!("Perch session finished");
    ExitCode::SUCCESS
}

/// Host element with fixed bounds.
struct StaticElement(Rect);

impl AnchorElement for StaticElement {
    fn bounding_rect(&self) -> Rect {
        self.0
    }
}

/// Centers the overlay on the chosen side without collision handling.
struct CenteredPlacement;

impl PlacementEngine for CenteredPlacement {
    fn compute(&self, request: &PlacementRequest) -> Option<ResolvedPosition> {
        let reference = request.reference;
        let floating = request.floating_size?;
        let gap = request.main_axis_offset;
        let center_x = reference.x + (reference.width - floating.width) / 2.0;
        let center_y = reference.y + (reference.height - floating.height) / 2.0;

        let (x, y) = match request.placement.side {
            Side::Top => (center_x, reference.y - floating.height - gap),
            Side::Bottom => (center_x, reference.y + reference.height + gap),
            Side::Left => (reference.x - floating.width - gap, center_y),
            Side::Right => (reference.x + reference.width + gap, center_y),
        };
        let arrow = match request.placement.side {
            Side::Top | Side::Bottom => ArrowPosition { x: Some(floating.width / 2.0), y: None },
            Side::Left | Side::Right => ArrowPosition { x: None, y: Some(floating.height / 2.0) },
        };

        Some(ResolvedPosition {
            x: x + request.cross_axis_offset,
            y,
            placement: request.placement,
            arrow: Some(arrow),
        })
    }
}

/// Logs each animation instead of running it.
struct LoggingAnimator;

impl Animator for LoggingAnimator {
    fn animate(&self, request: AnimationRequest) {
        tracing::debug!(
            layout_id = %request.layout_id,
            from_opacity = request.from.opacity,
            to_opacity = request.to.opacity,
            "Animate overlay"
        );
    }
}

fn log_frame(step: &str, overlay: &mut TooltipOverlay) {
    overlay.sync();
    match overlay.frame() {
        Some(frame) => tracing::info!(
            step,
            tooltip_id = %frame.tooltip_id,
            state = frame.state.as_str(),
            side = frame.side.as_str(),
            x = frame.x,
            y = frame.y,
            "Overlay frame"
        ),
        None => tracing::info!(step, "Overlay unmounted"),
    }
}

async fn run_session(config: GroupConfig) {
    let open_delay = config.open_delay();
    let close_delay = config.close_delay();
    let settle = Duration::from_millis(20);

    let window = HostWindow::new();
    let mut group = match TooltipGroup::mount(&window, config) {
        Ok(group) => group,
        Err(e) => {
            tracing::error!(error = %e, "Failed to mount tooltip group");
            return;
        }
    };

    let save_el: Arc<dyn AnchorElement> =
        Arc::new(StaticElement(Rect::new(40.0, 40.0, 32.0, 32.0)));
    let open_el: Arc<dyn AnchorElement> =
        Arc::new(StaticElement(Rect::new(80.0, 40.0, 32.0, 32.0)));
    let save =
        group.trigger(Tooltip::with_id("save").content(ContentPayload::new("Save file")), save_el);
    let open = group.trigger(
        Tooltip::with_id("open").side(Side::Bottom).content(ContentPayload::new("Open file")),
        open_el,
    );

    let mut overlay = group.overlay(Arc::new(CenteredPlacement), Arc::new(LoggingAnimator));
    overlay.set_floating_size(Size::new(96.0, 24.0));

    save.pointer_enter();
    tokio::time::sleep(open_delay + settle).await;
    log_frame("cold open", &mut overlay);

    save.pointer_leave();
    open.pointer_enter();
    log_frame("switch", &mut overlay);

    open.pointer_leave();
    tokio::time::sleep(close_delay + settle).await;
    log_frame("leave", &mut overlay);
    overlay.on_animation_complete();

    save.pointer_enter();
    log_frame("warm reopen", &mut overlay);

    save.pointer_down();
    log_frame("click", &mut overlay);
    overlay.on_animation_complete();
    tokio::task::yield_now().await;

    open.focus_in();
    tokio::time::sleep(open_delay + settle).await;
    log_frame("focus", &mut overlay);

    window.dispatch(&HostEvent::KeyDown(Key::Escape));
    log_frame("escape", &mut overlay);
    overlay.on_animation_complete();

    group.unmount();
}
