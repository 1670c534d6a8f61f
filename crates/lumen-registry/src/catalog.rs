//! The app catalog: built-ins plus dynamic extensions.

use lumen_profile::{ExternalApp, LocalAppManifest, Profile, ShortcutEntry};
use lumen_types::geometry::Size;

/// The closed set of built-in apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinApp {
    Finder,
    TextEditor,
    Preview,
    Terminal,
    Calculator,
    Calendar,
    Clock,
    Weather,
    Stocks,
    News,
    Contacts,
    Chat,
    Browser,
    Settings,
}

impl BuiltinApp {
    pub const ALL: [Self; 14] = [
        Self::Finder,
        Self::TextEditor,
        Self::Preview,
        Self::Terminal,
        Self::Calculator,
        Self::Calendar,
        Self::Clock,
        Self::Weather,
        Self::Stocks,
        Self::News,
        Self::Contacts,
        Self::Chat,
        Self::Browser,
        Self::Settings,
    ];

    /// Stable app identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Finder => "finder",
            Self::TextEditor => "editor",
            Self::Preview => "preview",
            Self::Terminal => "terminal",
            Self::Calculator => "calculator",
            Self::Calendar => "calendar",
            Self::Clock => "clock",
            Self::Weather => "weather",
            Self::Stocks => "stocks",
            Self::News => "news",
            Self::Contacts => "contacts",
            Self::Chat => "chat",
            Self::Browser => "browser",
            Self::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Finder => "Finder",
            Self::TextEditor => "Notes",
            Self::Preview => "Preview",
            Self::Terminal => "Terminal",
            Self::Calculator => "Calculator",
            Self::Calendar => "Calendar",
            Self::Clock => "Clock",
            Self::Weather => "Weather",
            Self::Stocks => "Stocks",
            Self::News => "News",
            Self::Contacts => "Contacts",
            Self::Chat => "Assistant",
            Self::Browser => "Browser",
            Self::Settings => "Settings",
        }
    }

    /// App-declared default window geometry; `None` falls back to 800x600.
    pub fn default_size(self) -> Option<Size> {
        match self {
            Self::Finder => Some(Size::new(860, 560)),
            Self::TextEditor => Some(Size::new(900, 640)),
            Self::Preview => None,
            Self::Terminal => Some(Size::new(720, 480)),
            Self::Calculator => Some(Size::new(320, 480)),
            Self::Calendar => Some(Size::new(860, 600)),
            Self::Clock => Some(Size::new(360, 360)),
            Self::Weather => Some(Size::new(640, 560)),
            Self::Stocks => Some(Size::new(720, 560)),
            Self::News => Some(Size::new(820, 600)),
            Self::Contacts => Some(Size::new(720, 520)),
            Self::Chat => Some(Size::new(760, 600)),
            Self::Browser => Some(Size::new(1100, 700)),
            Self::Settings => Some(Size::new(760, 520)),
        }
    }

    /// Whether the app appears in the dock by default.
    pub fn dock_visible(self) -> bool {
        !matches!(self, Self::Preview | Self::Clock)
    }

    /// The widget this app contributes, if any.
    pub fn widget(self) -> Option<&'static str> {
        match self {
            Self::Calendar => Some("calendar"),
            Self::Clock => Some("clock"),
            Self::Weather => Some("weather"),
            Self::Stocks => Some("stocks"),
            _ => None,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.id() == id)
    }
}

/// One launchable app: a built-in or a validated dynamic descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum AppDescriptor {
    Builtin(BuiltinApp),
    External(ExternalApp),
    Local(LocalAppManifest),
    Shortcut(ShortcutEntry),
}

impl AppDescriptor {
    pub fn id(&self) -> &str {
        match self {
            Self::Builtin(app) => app.id(),
            Self::External(app) => &app.id,
            Self::Local(app) => &app.id,
            Self::Shortcut(app) => &app.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Builtin(app) => app.title(),
            Self::External(app) => &app.title,
            Self::Local(app) => &app.title,
            Self::Shortcut(app) => &app.title,
        }
    }

    pub fn default_size(&self) -> Option<Size> {
        match self {
            Self::Builtin(app) => app.default_size(),
            Self::External(app) => match (app.width, app.height) {
                (Some(w), Some(h)) => Some(Size::new(w, h)),
                _ => None,
            },
            Self::Local(app) => match (app.width, app.height) {
                (Some(w), Some(h)) => Some(Size::new(w, h)),
                _ => None,
            },
            Self::Shortcut(_) => None,
        }
    }

    pub fn dock_visible(&self) -> bool {
        match self {
            Self::Builtin(app) => app.dock_visible(),
            // Installed apps and shortcuts always surface in the dock until
            // the user hides them.
            _ => true,
        }
    }
}

/// The effective app list for one profile: built-ins merged with installed
/// externals, local apps, and shortcuts, de-duplicated by id (built-ins
/// win).
#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps: Vec<AppDescriptor>,
}

impl AppRegistry {
    pub fn from_profile(profile: &Profile) -> Self {
        let mut apps: Vec<AppDescriptor> =
            BuiltinApp::ALL.into_iter().map(AppDescriptor::Builtin).collect();
        let push_unique = |descriptor: AppDescriptor, apps: &mut Vec<AppDescriptor>| {
            if apps.iter().any(|a| a.id() == descriptor.id()) {
                log::warn!("ignoring duplicate app id {}", descriptor.id());
            } else {
                apps.push(descriptor);
            }
        };
        for app in &profile.external_apps {
            push_unique(AppDescriptor::External(app.clone()), &mut apps);
        }
        for app in &profile.local_apps {
            push_unique(AppDescriptor::Local(app.clone()), &mut apps);
        }
        for app in &profile.shortcuts {
            push_unique(AppDescriptor::Shortcut(app.clone()), &mut apps);
        }
        Self { apps }
    }

    pub fn apps(&self) -> &[AppDescriptor] {
        &self.apps
    }

    pub fn find(&self, id: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| a.id() == id)
    }
}
