//! `.arsapp` manifest parsing and validation.
//!
//! A local app is sideloaded by opening a `.arsapp` file in the VFS: a JSON
//! manifest naming a component and icon from the build-time allow-lists.
//! Installation is rejected for malformed JSON, unknown references, and
//! duplicate app ids; rejection leaves the profile unchanged.

use lumen_profile::{LocalAppManifest, Profile};
use lumen_types::error::{LumenError, Result};

use crate::catalog::BuiltinApp;

/// File extension that routes an open request into the installer.
pub const MANIFEST_EXT: &str = "arsapp";

/// Components a manifest may reference. Each id maps to a component shipped
/// with the build.
pub const ALLOWED_COMPONENTS: [&str; 5] = [
    "markdown-viewer",
    "kanban-board",
    "pixel-canvas",
    "sound-board",
    "unit-converter",
];

/// Icons a manifest may reference.
pub const ALLOWED_ICONS: [&str; 6] = ["notes", "board", "palette", "speaker", "ruler", "gear"];

/// Parse manifest JSON.
pub fn parse_manifest(content: &str) -> Result<LocalAppManifest> {
    serde_json::from_str(content)
        .map_err(|e| LumenError::Manifest(format!("malformed manifest: {e}")))
}

/// Validate a parsed manifest against the allow-lists and the apps already
/// present in the profile.
pub fn validate_manifest(manifest: &LocalAppManifest, profile: &Profile) -> Result<()> {
    if manifest.id.is_empty() {
        return Err(LumenError::Manifest("manifest has an empty id".to_string()));
    }
    if !ALLOWED_COMPONENTS.contains(&manifest.component_id.as_str()) {
        return Err(LumenError::Manifest(format!(
            "unknown component id: {}",
            manifest.component_id
        )));
    }
    if !ALLOWED_ICONS.contains(&manifest.icon_id.as_str()) {
        return Err(LumenError::Manifest(format!(
            "unknown icon id: {}",
            manifest.icon_id
        )));
    }
    let taken = BuiltinApp::from_id(&manifest.id).is_some()
        || profile.local_apps.iter().any(|a| a.id == manifest.id)
        || profile.external_apps.iter().any(|a| a.id == manifest.id)
        || profile.shortcuts.iter().any(|a| a.id == manifest.id);
    if taken {
        return Err(LumenError::Manifest(format!(
            "app id already installed: {}",
            manifest.id
        )));
    }
    Ok(())
}

/// Parse and validate manifest content; returns the manifest to append to
/// the profile's local-app list.
pub fn install_manifest(content: &str, profile: &Profile) -> Result<LocalAppManifest> {
    let manifest = parse_manifest(content)?;
    validate_manifest(&manifest, profile)?;
    log::info!("installing local app {} ({})", manifest.id, manifest.title);
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> String {
        serde_json::json!({
            "id": "sketch",
            "title": "Sketch",
            "component_id": "pixel-canvas",
            "icon_id": "palette",
            "width": 640,
            "height": 480,
        })
        .to_string()
    }

    #[test]
    fn valid_manifest_installs() {
        let manifest = install_manifest(&valid_json(), &Profile::default()).unwrap();
        assert_eq!(manifest.id, "sketch");
        assert_eq!(manifest.component_id, "pixel-canvas");
        assert_eq!(manifest.width, Some(640));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = install_manifest("{not json", &Profile::default()).unwrap_err();
        assert!(format!("{err}").contains("malformed"));
    }

    #[test]
    fn missing_required_field_rejected() {
        let json = r#"{"id":"sketch","title":"Sketch","icon_id":"palette"}"#;
        assert!(install_manifest(json, &Profile::default()).is_err());
    }

    #[test]
    fn unknown_component_rejected() {
        let json = serde_json::json!({
            "id": "sketch",
            "title": "Sketch",
            "component_id": "own-binary",
            "icon_id": "palette",
        })
        .to_string();
        let err = install_manifest(&json, &Profile::default()).unwrap_err();
        assert!(format!("{err}").contains("unknown component"));
    }

    #[test]
    fn unknown_icon_rejected() {
        let json = serde_json::json!({
            "id": "sketch",
            "title": "Sketch",
            "component_id": "pixel-canvas",
            "icon_id": "skull",
        })
        .to_string();
        let err = install_manifest(&json, &Profile::default()).unwrap_err();
        assert!(format!("{err}").contains("unknown icon"));
    }

    #[test]
    fn duplicate_local_app_rejected() {
        let mut profile = Profile::default();
        let manifest = install_manifest(&valid_json(), &profile).unwrap();
        profile.local_apps.push(manifest);
        let err = install_manifest(&valid_json(), &profile).unwrap_err();
        assert!(format!("{err}").contains("already installed"));
    }

    #[test]
    fn builtin_id_collision_rejected() {
        let json = serde_json::json!({
            "id": "terminal",
            "title": "Not A Terminal",
            "component_id": "pixel-canvas",
            "icon_id": "palette",
        })
        .to_string();
        assert!(install_manifest(&json, &Profile::default()).is_err());
    }

    #[test]
    fn geometry_is_optional() {
        let json = serde_json::json!({
            "id": "sketch",
            "title": "Sketch",
            "component_id": "pixel-canvas",
            "icon_id": "palette",
        })
        .to_string();
        let manifest = install_manifest(&json, &Profile::default()).unwrap();
        assert!(manifest.width.is_none());
        assert!(manifest.height.is_none());
    }
}
