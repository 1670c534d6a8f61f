//! Launch resolution: file associations and install routing.

use lumen_types::error::{LumenError, Result};

use crate::catalog::{AppDescriptor, AppRegistry, BuiltinApp};
use crate::manifest::MANIFEST_EXT;

/// Extensions routed to the document editor.
const TEXT_EXTENSIONS: [&str; 6] = ["txt", "md", "json", "csv", "log", "toml"];

/// Extensions routed to the image preview.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "svg"];

/// What an open request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchTarget {
    /// Open (or focus) a window for this app. File-opening requests are
    /// multi-instance: each gets its own window.
    Window {
        descriptor: AppDescriptor,
        multi_instance: bool,
    },
    /// The path names a package manifest: run the installer instead of
    /// opening a window.
    InstallLocalApp { manifest_path: String },
}

fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty()).then_some(ext)
}

/// Resolve an open request to its effective target.
///
/// With a file path, association rules may reroute to a different app than
/// the one asked for; without one, the request resolves to the named app
/// directly. Unknown app ids are errors (the caller surfaces them as
/// notifications; no window is opened).
pub fn resolve_launch(
    registry: &AppRegistry,
    app_id: &str,
    file_path: Option<&str>,
) -> Result<LaunchTarget> {
    let Some(path) = file_path else {
        let descriptor = registry
            .find(app_id)
            .ok_or_else(|| LumenError::Registry(format!("unknown app: {app_id}")))?;
        return Ok(LaunchTarget::Window {
            descriptor: descriptor.clone(),
            multi_instance: false,
        });
    };

    let ext = extension(path).unwrap_or("").to_ascii_lowercase();
    if ext == MANIFEST_EXT {
        return Ok(LaunchTarget::InstallLocalApp {
            manifest_path: path.to_string(),
        });
    }

    let routed = if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        AppDescriptor::Builtin(BuiltinApp::TextEditor)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        AppDescriptor::Builtin(BuiltinApp::Preview)
    } else {
        registry
            .find(app_id)
            .cloned()
            .ok_or_else(|| LumenError::Registry(format!("unknown app: {app_id}")))?
    };
    Ok(LaunchTarget::Window {
        descriptor: routed,
        multi_instance: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_profile::Profile;

    fn registry() -> AppRegistry {
        AppRegistry::from_profile(&Profile::default())
    }

    #[test]
    fn plain_open_resolves_named_app() {
        let target = resolve_launch(&registry(), "calculator", None).unwrap();
        match target {
            LaunchTarget::Window {
                descriptor,
                multi_instance,
            } => {
                assert_eq!(descriptor.id(), "calculator");
                assert!(!multi_instance);
            }
            _ => panic!("expected a window target"),
        }
    }

    #[test]
    fn unknown_app_is_an_error() {
        let err = resolve_launch(&registry(), "ghost", None).unwrap_err();
        assert!(format!("{err}").contains("unknown app"));
    }

    #[test]
    fn text_file_routes_to_editor() {
        let target =
            resolve_launch(&registry(), "finder", Some("/Documents/notes.txt")).unwrap();
        match target {
            LaunchTarget::Window {
                descriptor,
                multi_instance,
            } => {
                assert_eq!(descriptor.id(), "editor");
                assert!(multi_instance);
            }
            _ => panic!("expected a window target"),
        }
    }

    #[test]
    fn image_file_routes_to_preview() {
        let target = resolve_launch(&registry(), "finder", Some("/Pictures/cat.PNG")).unwrap();
        match target {
            LaunchTarget::Window { descriptor, .. } => assert_eq!(descriptor.id(), "preview"),
            _ => panic!("expected a window target"),
        }
    }

    #[test]
    fn manifest_file_routes_to_installer() {
        let target =
            resolve_launch(&registry(), "finder", Some("/Downloads/sketch.arsapp")).unwrap();
        assert_eq!(
            target,
            LaunchTarget::InstallLocalApp {
                manifest_path: "/Downloads/sketch.arsapp".to_string()
            }
        );
    }

    #[test]
    fn unassociated_extension_opens_with_requesting_app() {
        let target = resolve_launch(&registry(), "editor", Some("/Documents/data.bin")).unwrap();
        match target {
            LaunchTarget::Window {
                descriptor,
                multi_instance,
            } => {
                assert_eq!(descriptor.id(), "editor");
                assert!(multi_instance);
            }
            _ => panic!("expected a window target"),
        }
    }

    #[test]
    fn extensionless_file_opens_with_requesting_app() {
        let target = resolve_launch(&registry(), "editor", Some("/Documents/README")).unwrap();
        match target {
            LaunchTarget::Window { descriptor, .. } => assert_eq!(descriptor.id(), "editor"),
            _ => panic!("expected a window target"),
        }
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(extension("/home/.bashrc"), None);
        assert_eq!(extension("/a/b.txt"), Some("txt"));
        assert_eq!(extension("/a/archive.tar.gz"), Some("gz"));
    }
}
