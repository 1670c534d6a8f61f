//! Window collection, z-order allocation, and lifecycle transitions.
//!
//! All operations are no-ops on unknown ids: the embedding only ever holds
//! ids it observed in the current collection, and a stale id must never
//! crash the shell.

use lumen_types::geometry::{Rect, Size};
use serde_json::Value;

use crate::window::{OpenRequest, WindowRecord};

/// Screen metrics the manager lays windows out against.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub screen: Size,
    /// Height of the top bar, reserved above the work area.
    pub top_bar: u32,
    /// Height of the dock, reserved below the work area.
    pub dock: u32,
}

impl Viewport {
    pub const fn new(screen: Size, top_bar: u32, dock: u32) -> Self {
        Self {
            screen,
            top_bar,
            dock,
        }
    }

    /// The area between the top bar and the dock.
    pub fn work_area(&self) -> Rect {
        let height = self
            .screen
            .height
            .saturating_sub(self.top_bar)
            .saturating_sub(self.dock);
        Rect::new(0, self.top_bar as i32, self.screen.width, height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(1280, 800), 28, 70)
    }
}

/// The window manager state: ordered window collection, active id, and the
/// monotonic z counter.
#[derive(Debug)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    active: Option<String>,
    next_z: u32,
    instance_seq: u64,
    viewport: Viewport,
}

impl WindowManager {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            next_z: 1,
            instance_seq: 1,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// All windows in creation order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Windows sorted by descending z (mission-control order).
    pub fn by_z_desc(&self) -> Vec<&WindowRecord> {
        let mut sorted: Vec<&WindowRecord> = self.windows.iter().collect();
        sorted.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        sorted
    }

    /// Look up a window by id.
    pub fn window(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Whether any window (minimized or not) hosts the given app.
    pub fn is_running(&self, app_id: &str) -> bool {
        self.windows.iter().any(|w| w.app_id == app_id)
    }

    /// The currently active window id, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn alloc_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Open a window, or focus the existing one for single-instance apps.
    /// Returns the id of the window that is now active.
    pub fn open(&mut self, request: OpenRequest) -> String {
        if !request.multi_instance {
            if let Some(existing) = self.windows.iter().position(|w| w.id == request.app_id) {
                let id = self.windows[existing].id.clone();
                log::debug!("open {}: focusing existing window", request.app_id);
                self.raise(&id);
                return id;
            }
        }

        let id = if request.multi_instance {
            let id = format!("{}-{}", request.app_id, self.instance_seq);
            self.instance_seq += 1;
            id
        } else {
            request.app_id.clone()
        };

        let size = request.default_size.unwrap_or_default();
        let position = self.viewport.work_area().center(size);
        let z_index = self.alloc_z();
        log::debug!("open {}: created window z={z_index}", id);
        self.windows.push(WindowRecord {
            id: id.clone(),
            app_id: request.app_id,
            title: request.title,
            position,
            size,
            z_index,
            minimized: false,
            maximized: false,
            previous_geometry: None,
            props: request.props,
        });
        self.active = Some(id.clone());
        id
    }

    /// Bring a window to the front and unminimize it. No-op if the window is
    /// already active or the id is unknown.
    pub fn focus(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            return;
        }
        if self.window(id).is_none() {
            return;
        }
        self.raise(id);
    }

    fn raise(&mut self, id: &str) {
        let z = self.alloc_z();
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == id) {
            w.z_index = z;
            w.minimized = false;
            self.active = Some(id.to_string());
        }
    }

    /// Minimize a window. The active slot empties if it was active.
    pub fn minimize(&mut self, id: &str) {
        let Some(w) = self.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        w.minimized = true;
        log::debug!("minimize {id}");
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    /// Toggle maximize. Maximizing saves the current geometry and fills the
    /// work area; un-maximizing restores the saved geometry (centered default
    /// geometry if none was saved). Always re-focuses the window.
    pub fn toggle_maximize(&mut self, id: &str) {
        let work_area = self.viewport.work_area();
        let Some(w) = self.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        if w.maximized {
            let restored = w.previous_geometry.take().unwrap_or_else(|| {
                let size = Size::default();
                Rect {
                    origin: work_area.center(size),
                    size,
                }
            });
            w.position = restored.origin;
            w.size = restored.size;
            w.maximized = false;
            log::debug!("restore {id}");
        } else {
            w.previous_geometry = Some(w.frame());
            w.position = work_area.origin;
            w.size = work_area.size;
            w.maximized = true;
            log::debug!("maximize {id}");
        }
        self.raise(id);
    }

    /// Move a window (dragging). Maximized windows do not move.
    pub fn set_position(&mut self, id: &str, position: lumen_types::geometry::Point) {
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == id && !w.maximized) {
            w.position = position;
        }
    }

    /// Resize a window (drag handle). Maximized windows do not resize.
    pub fn set_size(&mut self, id: &str, size: Size) {
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == id && !w.maximized) {
            w.size = size;
        }
    }

    /// Remove a window from the collection.
    pub fn close(&mut self, id: &str) {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        if self.windows.len() != before {
            log::debug!("close {id}");
            if self.active.as_deref() == Some(id) {
                self.active = None;
            }
        }
    }

    /// Replace the props of an existing window (profile-derived prop
    /// injection after a state change).
    pub fn update_props(&mut self, id: &str, props: Value) {
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == id) {
            w.props = props;
        }
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
