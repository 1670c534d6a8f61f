//! Window record types.

use lumen_types::geometry::{Point, Rect, Size};

/// Request to open (or re-focus) a window.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    /// The launchable app identifier.
    pub app_id: String,
    /// Window title.
    pub title: String,
    /// App-declared geometry; `None` falls back to 800x600.
    pub default_size: Option<Size>,
    /// Whether this request may coexist with other windows of the same app
    /// (file-opening windows mint a synthetic id per instance).
    pub multi_instance: bool,
    /// Opaque props injected into the hosted app component.
    pub props: serde_json::Value,
}

impl OpenRequest {
    pub fn new(app_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            title: title.into(),
            default_size: None,
            multi_instance: false,
            props: serde_json::Value::Null,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.default_size = Some(size);
        self
    }

    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = props;
        self
    }

    pub fn multi_instance(mut self) -> Self {
        self.multi_instance = true;
        self
    }
}

/// Bookkeeping entry for one open app instance.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    /// Window id: the app id, or `appId-n` for multi-instance windows.
    pub id: String,
    /// The app this window hosts.
    pub app_id: String,
    pub title: String,
    pub position: Point,
    pub size: Size,
    /// Monotonically allocated; never reused.
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    /// Geometry saved when maximizing, restored on un-maximize.
    pub previous_geometry: Option<Rect>,
    pub props: serde_json::Value,
}

impl WindowRecord {
    /// Current geometry as a rectangle.
    pub fn frame(&self) -> Rect {
        Rect {
            origin: self.position,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_request_defaults() {
        let req = OpenRequest::new("calculator", "Calculator");
        assert_eq!(req.app_id, "calculator");
        assert!(req.default_size.is_none());
        assert!(!req.multi_instance);
        assert!(req.props.is_null());
    }

    #[test]
    fn open_request_builders() {
        let req = OpenRequest::new("editor", "Editor")
            .with_size(Size::new(640, 480))
            .with_props(serde_json::json!({"file_path": "/Documents/a.txt"}))
            .multi_instance();
        assert_eq!(req.default_size, Some(Size::new(640, 480)));
        assert!(req.multi_instance);
        assert_eq!(req.props["file_path"], "/Documents/a.txt");
    }

    #[test]
    fn frame_combines_position_and_size() {
        let record = WindowRecord {
            id: "calculator".to_string(),
            app_id: "calculator".to_string(),
            title: "Calculator".to_string(),
            position: Point::new(10, 20),
            size: Size::new(300, 400),
            z_index: 1,
            minimized: false,
            maximized: false,
            previous_geometry: None,
            props: serde_json::Value::Null,
        };
        assert_eq!(record.frame(), Rect::new(10, 20, 300, 400));
    }
}
