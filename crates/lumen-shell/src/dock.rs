//! Dock state derivation.

use lumen_profile::Profile;
use lumen_registry::AppRegistry;
use lumen_wm::WindowManager;

/// One dock tile.
#[derive(Debug, Clone, PartialEq)]
pub struct DockItem {
    pub app_id: String,
    pub title: String,
    /// Any window (minimized or not) hosts this app.
    pub running: bool,
    /// The active window hosts this app.
    pub active: bool,
    /// Ids of this app's minimized windows, for dock re-entry.
    pub minimized_windows: Vec<String>,
}

/// Derive the dock from the effective app list, the profile's hidden set,
/// and the live window collection. Hidden apps that are currently running
/// still show (quitting them removes the tile).
pub fn dock_items(
    registry: &AppRegistry,
    profile: &Profile,
    wm: &WindowManager,
) -> Vec<DockItem> {
    let active_app = wm
        .active_id()
        .and_then(|id| wm.window(id))
        .map(|w| w.app_id.clone());
    registry
        .apps()
        .iter()
        .filter(|app| {
            let hidden = profile.dock_hidden.iter().any(|id| id == app.id());
            (app.dock_visible() && !hidden) || wm.is_running(app.id())
        })
        .map(|app| DockItem {
            app_id: app.id().to_string(),
            title: app.title().to_string(),
            running: wm.is_running(app.id()),
            active: active_app.as_deref() == Some(app.id()),
            minimized_windows: wm
                .windows()
                .iter()
                .filter(|w| w.app_id == app.id() && w.minimized)
                .map(|w| w.id.clone())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_wm::OpenRequest;

    fn fixtures() -> (AppRegistry, Profile, WindowManager) {
        let profile = Profile::default();
        let registry = AppRegistry::from_profile(&profile);
        let wm = WindowManager::default();
        (registry, profile, wm)
    }

    #[test]
    fn default_dock_shows_dock_visible_builtins() {
        let (registry, profile, wm) = fixtures();
        let items = dock_items(&registry, &profile, &wm);
        assert!(items.iter().any(|i| i.app_id == "terminal"));
        // Preview is not dock-visible and not running.
        assert!(!items.iter().any(|i| i.app_id == "preview"));
    }

    #[test]
    fn hidden_apps_are_filtered() {
        let (registry, mut profile, wm) = fixtures();
        profile.dock_hidden.push("stocks".to_string());
        let items = dock_items(&registry, &profile, &wm);
        assert!(!items.iter().any(|i| i.app_id == "stocks"));
    }

    #[test]
    fn hidden_but_running_app_still_shows() {
        let (registry, mut profile, mut wm) = fixtures();
        profile.dock_hidden.push("stocks".to_string());
        wm.open(OpenRequest::new("stocks", "Stocks"));
        let items = dock_items(&registry, &profile, &wm);
        let stocks = items.iter().find(|i| i.app_id == "stocks").unwrap();
        assert!(stocks.running);
    }

    #[test]
    fn running_and_active_flags() {
        let (registry, profile, mut wm) = fixtures();
        wm.open(OpenRequest::new("terminal", "Terminal"));
        wm.open(OpenRequest::new("calculator", "Calculator"));
        let items = dock_items(&registry, &profile, &wm);
        let terminal = items.iter().find(|i| i.app_id == "terminal").unwrap();
        let calculator = items.iter().find(|i| i.app_id == "calculator").unwrap();
        assert!(terminal.running && !terminal.active);
        assert!(calculator.running && calculator.active);
    }

    #[test]
    fn minimized_windows_listed_for_reentry() {
        let (registry, profile, mut wm) = fixtures();
        let id = wm.open(OpenRequest::new("terminal", "Terminal"));
        wm.minimize(&id);
        let items = dock_items(&registry, &profile, &wm);
        let terminal = items.iter().find(|i| i.app_id == "terminal").unwrap();
        assert_eq!(terminal.minimized_windows, vec![id]);
        assert!(terminal.running);
        assert!(!terminal.active);
    }
}
