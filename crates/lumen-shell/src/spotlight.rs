//! Spotlight search over apps and VFS file names.

use lumen_registry::AppRegistry;
use lumen_vfs::Vfs;

/// One search result.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotlightHit {
    App { app_id: String, title: String },
    File { path: String, name: String },
}

/// Overlay state: query text and keyboard selection.
#[derive(Debug, Default)]
pub struct SpotlightState {
    pub open: bool,
    pub query: String,
    pub selected: usize,
}

impl SpotlightState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.query.clear();
            self.selected = 0;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
    }

    /// Move the selection, clamped to the result count.
    pub fn move_selection(&mut self, delta: i32, result_count: usize) {
        if result_count == 0 {
            self.selected = 0;
            return;
        }
        let max = result_count - 1;
        let next = self.selected as i64 + delta as i64;
        self.selected = next.clamp(0, max as i64) as usize;
    }
}

/// Match score: prefix beats substring; no match is `None`.
fn score(haystack: &str, needle: &str) -> Option<u32> {
    let haystack = haystack.to_lowercase();
    if haystack.starts_with(needle) {
        Some(2)
    } else if haystack.contains(needle) {
        Some(1)
    } else {
        None
    }
}

/// Search apps (by title and id) and VFS files (by name), ranked: apps
/// before files, prefix matches before substring matches, ties broken
/// alphabetically. An empty query yields nothing.
pub fn search(registry: &AppRegistry, vfs: &Vfs, query: &str, limit: usize) -> Vec<SpotlightHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    // (app rank, score, sort key, hit)
    let mut ranked: Vec<(u8, u32, String, SpotlightHit)> = Vec::new();
    for app in registry.apps() {
        let best = score(app.title(), &needle).max(score(app.id(), &needle));
        if let Some(s) = best {
            ranked.push((
                0,
                s,
                app.title().to_lowercase(),
                SpotlightHit::App {
                    app_id: app.id().to_string(),
                    title: app.title().to_string(),
                },
            ));
        }
    }
    for node in vfs.nodes() {
        if !node.is_file() {
            continue;
        }
        if let Some(s) = score(&node.name, &needle) {
            if let Some(path) = vfs.path_of(&node.id) {
                ranked.push((
                    1,
                    s,
                    node.name.to_lowercase(),
                    SpotlightHit::File {
                        path,
                        name: node.name.clone(),
                    },
                ));
            }
        }
    }

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(limit).map(|(_, _, _, hit)| hit).collect()
}
