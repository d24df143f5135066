use std::path::PathBuf;
use std::process::ExitCode;

use treedo_app_shell::{AppShell, ClickTarget, HydrateOutcome, ItemAction, ShellError};
use treedo_core::{AccentColor, OrphanPolicy};
use treedo_render_common::RecordingSurface;
use treedo_runtime_std::StdServices;
use treedo_ui::log_recorded_frame;

const STATE_ENV: &str = "TREEDO_STATE";

fn state_dir() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(STATE_ENV))
        .map(PathBuf::from)
}

fn paint(shell: &mut AppShell) -> Result<(), ShellError> {
    let mut surface = RecordingSurface::new();
    let frame = shell.paint(&mut surface)?;
    log_recorded_frame(surface.operations());
    log::info!(
        "frame: {} ops, cursor {:?}",
        surface.operations().len(),
        frame.cursor
    );
    Ok(())
}

/// Clicks the centre of the node's box as laid out by the last frame.
fn click(shell: &mut AppShell, id: &str) -> Option<ClickTarget> {
    let rect = shell
        .engine()
        .current_project()
        .and_then(|project| project.node(id))
        .and_then(|node| node.bounding_box())?;
    shell.set_cursor(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
    shell.pointer_pressed();
    shell.pointer_released()
}

fn first_child(shell: &AppShell, id: &str) -> Option<String> {
    shell
        .engine()
        .current_project()?
        .children_of(id)?
        .first()
        .cloned()
}

fn run() -> Result<(), ShellError> {
    let services = match state_dir() {
        Some(dir) => {
            log::info!("storing state under {}", dir.display());
            StdServices::on_disk(dir)
        }
        None => {
            log::info!("no state directory given; state lives in memory");
            StdServices::in_memory()
        }
    };
    let mut shell = AppShell::new(services);

    if shell.hydrate()? == HydrateOutcome::NeedsFirstProject {
        shell.create_first_project("Home")?;
        for text in ["Groceries", "Garden"] {
            shell.apply_action(&ClickTarget::Root, ItemAction::AddChild { text: text.into() })?;
        }
    }
    paint(&mut shell)?;

    if let Some(first) = first_child(&shell, treedo_core::ROOT_ID) {
        if let Some(target) = click(&mut shell, &first) {
            shell.apply_action(&target, ItemAction::AddChild { text: "Milk".into() })?;
            shell.apply_action(&target, ItemAction::ToggleDone)?;
        }
    }
    paint(&mut shell)?;

    if let Some(first) = first_child(&shell, treedo_core::ROOT_ID) {
        shell.apply_action(&ClickTarget::Item(first), ItemAction::Remove(OrphanPolicy::MoveToParent))?;
        paint(&mut shell)?;
        shell.undo()?;
    }

    shell.set_preferred_color(AccentColor::Blue)?;
    shell.clear_cursor();
    paint(&mut shell)?;
    shell.log_debug_info();
    shell.engine().flush();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
