//! Drives the engine and the layout once per frame and turns pointer input
//! into click targets.

use std::fmt;

use treedo_core::{
    AccentColor, Engine, EngineError, EngineOptions, EngineServices, NodeKind, OrphanPolicy,
    ROOT_ID,
};
use treedo_render_common::DrawSurface;
use treedo_ui::{format_tree, LayoutEngine, LayoutError, LayoutMetrics, Palette, PointerContext};
use treedo_ui_graphics::{Point, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellOptions {
    horizontal_padding: f32,
    viewport: Size,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            horizontal_padding: 32.0,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl ShellOptions {
    /// Distance between the left edge of the viewport and the root box.
    pub fn with_horizontal_padding(mut self, padding: f32) -> Self {
        self.horizontal_padding = padding;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn horizontal_padding(&self) -> f32 {
        self.horizontal_padding
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// Nothing was stored yet; the user has to name a first project.
    NeedsFirstProject,
    Ready,
}

/// Node a completed click landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Root,
    Item(String),
}

impl ClickTarget {
    fn node_id(&self) -> &str {
        match self {
            ClickTarget::Root => ROOT_ID,
            ClickTarget::Item(id) => id,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    /// The pointer is over a node.
    Pointer,
    #[default]
    Grab,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub pointer_over_item: bool,
    pub cursor: CursorHint,
}

/// What the user picked for a click target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemAction {
    AddChild { text: String },
    /// Removes an item; on the root it clears the whole project.
    Remove(OrphanPolicy),
    ToggleDone,
    /// Renames an item, or the project when applied to the root.
    Rename { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    Engine(EngineError),
    Layout(LayoutError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Engine(err) => write!(f, "engine error: {err}"),
            ShellError::Layout(err) => write!(f, "layout error: {err}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Engine(err) => Some(err),
            ShellError::Layout(err) => Some(err),
        }
    }
}

impl From<EngineError> for ShellError {
    fn from(err: EngineError) -> Self {
        ShellError::Engine(err)
    }
}

impl From<LayoutError> for ShellError {
    fn from(err: LayoutError) -> Self {
        ShellError::Layout(err)
    }
}

pub struct AppShell {
    engine: Engine,
    layout: LayoutEngine,
    options: ShellOptions,
    cursor: Option<Point>,
    pressed: bool,
    press_target: Option<ClickTarget>,
}

impl AppShell {
    pub fn new(services: EngineServices) -> Self {
        Self::with_options(
            services,
            EngineOptions::default(),
            ShellOptions::default(),
            LayoutMetrics::default(),
        )
    }

    pub fn with_options(
        services: EngineServices,
        engine_options: EngineOptions,
        options: ShellOptions,
        metrics: LayoutMetrics,
    ) -> Self {
        Self {
            engine: Engine::with_options(services, engine_options),
            layout: LayoutEngine::new(metrics, Palette::default()),
            options,
            cursor: None,
            pressed: false,
            press_target: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn options(&self) -> &ShellOptions {
        &self.options
    }

    /// Loads stored state. Selects the first stored project when none is
    /// marked current.
    pub fn hydrate(&mut self) -> Result<HydrateOutcome, ShellError> {
        self.engine.hydrate()?;
        if self.engine.current_project().is_some() {
            return Ok(HydrateOutcome::Ready);
        }
        let first = self
            .engine
            .projects()
            .next()
            .map(|project| project.id().to_string());
        match first {
            Some(id) => {
                self.engine.set_project(&id)?;
                Ok(HydrateOutcome::Ready)
            }
            None => Ok(HydrateOutcome::NeedsFirstProject),
        }
    }

    pub fn create_first_project(&mut self, name: &str) -> Result<String, ShellError> {
        let id = self.engine.add_project(name)?;
        self.engine.set_project(&id)?;
        log::debug!("created first project {id}");
        Ok(id)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.options.viewport = Size::new(width, height);
    }

    pub fn viewport(&self) -> Size {
        self.options.viewport
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some(Point::new(x, y));
    }

    /// The pointer left the surface.
    pub fn clear_cursor(&mut self) {
        self.cursor = None;
        self.pressed = false;
        self.press_target = None;
    }

    pub fn pointer_pressed(&mut self) {
        self.pressed = true;
        self.press_target = self.target_under_cursor();
    }

    /// Completes a press. Returns the target when press and release landed on
    /// the same node.
    pub fn pointer_released(&mut self) -> Option<ClickTarget> {
        self.pressed = false;
        let pressed_on = self.press_target.take()?;
        let released_on = self.target_under_cursor()?;
        (pressed_on == released_on).then_some(released_on)
    }

    /// Lays out and paints the current project, vertically centred in the
    /// viewport.
    pub fn paint<S>(&mut self, surface: &mut S) -> Result<FrameOutcome, ShellError>
    where
        S: DrawSurface + ?Sized,
    {
        self.layout
            .set_palette(Palette::for_accent(self.engine.settings().preferred_color));
        let Some(project) = self.engine.current_project_mut() else {
            return Ok(FrameOutcome::default());
        };
        let total_height = self.layout.total_height(project, ROOT_ID, &*surface)?;
        let origin = Point::new(
            self.options.horizontal_padding,
            self.options.viewport.height / 2.0 - total_height / 2.0,
        );
        let pointer = PointerContext {
            position: self.cursor,
            pressed: self.pressed,
        };
        let pointer_over_item = self.layout.draw_tree(project, surface, origin, &pointer)?;
        Ok(FrameOutcome {
            pointer_over_item,
            cursor: if pointer_over_item {
                CursorHint::Pointer
            } else {
                CursorHint::Grab
            },
        })
    }

    pub fn apply_action(&mut self, target: &ClickTarget, action: ItemAction) -> Result<(), ShellError> {
        log::debug!("{action:?} on {target:?}");
        match (target, action) {
            (_, ItemAction::AddChild { text }) => {
                let item = self.engine.new_item(text);
                self.engine.add_todo_item(item, target.node_id())?;
            }
            (ClickTarget::Root, ItemAction::Remove(_)) => self.engine.clear_project()?,
            (ClickTarget::Item(id), ItemAction::Remove(policy)) => {
                self.engine.remove_todo_item(id, policy)?;
            }
            (ClickTarget::Root, ItemAction::ToggleDone) => {}
            (ClickTarget::Item(id), ItemAction::ToggleDone) => {
                let done = self
                    .engine
                    .current_project()
                    .and_then(|project| project.node(id))
                    .and_then(|node| match node.kind() {
                        NodeKind::Item(content) => Some(content.done),
                        NodeKind::Root(_) => None,
                    })
                    .ok_or_else(|| EngineError::UnknownId { id: id.clone() })?;
                self.engine.set_item_done(id, !done)?;
            }
            (ClickTarget::Root, ItemAction::Rename { text }) => {
                let project_id = self
                    .engine
                    .current_project_id()
                    .map(str::to_string)
                    .ok_or(EngineError::NoCurrentProject)?;
                self.engine.rename_project(&project_id, text)?;
            }
            (ClickTarget::Item(id), ItemAction::Rename { text }) => {
                self.engine.set_item_text(id, text)?;
            }
        }
        Ok(())
    }

    pub fn set_preferred_color(&mut self, color: AccentColor) -> Result<(), ShellError> {
        self.engine.set_preferred_color(color)?;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, ShellError> {
        Ok(self.engine.undo()?)
    }

    pub fn redo(&mut self) -> Result<bool, ShellError> {
        Ok(self.engine.redo()?)
    }

    pub fn log_debug_info(&self) {
        match self.engine.current_project() {
            Some(project) => log::debug!("\n{}", format_tree(project)),
            None => log::debug!("no project selected"),
        }
    }

    fn target_under_cursor(&self) -> Option<ClickTarget> {
        let cursor = self.cursor?;
        let project = self.engine.current_project()?;
        match self.layout.item_at_point(project, cursor) {
            Ok(Some(id)) if id == ROOT_ID => Some(ClickTarget::Root),
            Ok(Some(id)) => Some(ClickTarget::Item(id)),
            Ok(None) => None,
            Err(err) => {
                log::debug!("hit test skipped: {err}");
                None
            }
        }
    }
}

impl fmt::Debug for AppShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppShell")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .field("cursor", &self.cursor)
            .field("pressed", &self.pressed)
            .finish()
    }
}
