//! Serialized tree form.
//!
//! The persistence contract is snapshot-per-edit: after any mutation the
//! embedding takes a [`NodeSnapshot`] of the whole tree and stores it inside
//! the profile document. The snapshot is the nested tagged-union JSON shape
//! (`type` discriminant, directory children keyed by node id); the arena is
//! rebuilt from it on load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lumen_types::error::{LumenError, Result};
use lumen_types::geometry::Point;

use crate::tree::{Node, NodeKind, Vfs};

/// One serialized node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSnapshot {
    File {
        id: String,
        name: String,
        #[serde(default)]
        content: String,
    },
    Directory {
        id: String,
        name: String,
        #[serde(default)]
        children: BTreeMap<String, NodeSnapshot>,
    },
    App {
        id: String,
        name: String,
        app_id: String,
        #[serde(default)]
        icon_position: Option<Point>,
    },
}

impl NodeSnapshot {
    pub fn id(&self) -> &str {
        match self {
            Self::File { id, .. } | Self::Directory { id, .. } | Self::App { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Directory { name, .. } | Self::App { name, .. } => name,
        }
    }
}

impl Default for NodeSnapshot {
    /// An empty root directory, the shape of a brand-new tree.
    fn default() -> Self {
        Self::Directory {
            id: "dir-0".to_string(),
            name: "/".to_string(),
            children: BTreeMap::new(),
        }
    }
}

impl Vfs {
    /// Serialize the whole tree.
    pub fn snapshot(&self) -> NodeSnapshot {
        self.snapshot_node(&self.root)
            .unwrap_or_default()
    }

    fn snapshot_node(&self, id: &str) -> Option<NodeSnapshot> {
        let node = self.node(id)?;
        Some(match &node.kind {
            NodeKind::File { content } => NodeSnapshot::File {
                id: node.id.clone(),
                name: node.name.clone(),
                content: content.clone(),
            },
            NodeKind::Directory { children } => NodeSnapshot::Directory {
                id: node.id.clone(),
                name: node.name.clone(),
                children: children
                    .iter()
                    .filter_map(|child| Some((child.clone(), self.snapshot_node(child)?)))
                    .collect(),
            },
            NodeKind::App {
                app_id,
                icon_position,
            } => NodeSnapshot::App {
                id: node.id.clone(),
                name: node.name.clone(),
                app_id: app_id.clone(),
                icon_position: *icon_position,
            },
        })
    }

    /// Rebuild an arena from a snapshot. The root must be a directory;
    /// duplicate ids and child-key/id mismatches are rejected. The id
    /// counter resumes past the highest sequence number seen, so reloaded
    /// trees never re-mint a live id.
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Result<Self> {
        let NodeSnapshot::Directory { .. } = snapshot else {
            return Err(LumenError::Vfs("snapshot root is not a directory".to_string()));
        };
        let mut vfs = Vfs {
            nodes: std::collections::HashMap::new(),
            root: snapshot.id().to_string(),
            next_seq: 0,
        };
        insert_from(&mut vfs, snapshot, None)?;
        vfs.next_seq = vfs
            .nodes
            .keys()
            .filter_map(|id| id.rsplit('-').next()?.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Ok(vfs)
    }
}

fn insert_from(vfs: &mut Vfs, snapshot: &NodeSnapshot, parent: Option<String>) -> Result<()> {
    let id = snapshot.id().to_string();
    if vfs.nodes.contains_key(&id) {
        return Err(LumenError::Vfs(format!("duplicate node id: {id}")));
    }
    let kind = match snapshot {
        NodeSnapshot::File { content, .. } => NodeKind::File {
            content: content.clone(),
        },
        NodeSnapshot::Directory { children, .. } => {
            for (key, child) in children {
                if key != child.id() {
                    return Err(LumenError::Vfs(format!(
                        "child key {key} does not match node id {}",
                        child.id()
                    )));
                }
            }
            NodeKind::Directory {
                children: children.keys().cloned().collect(),
            }
        }
        NodeSnapshot::App {
            app_id,
            icon_position,
            ..
        } => NodeKind::App {
            app_id: app_id.clone(),
            icon_position: *icon_position,
        },
    };
    vfs.nodes.insert(
        id.clone(),
        Node {
            id: id.clone(),
            name: snapshot.name().to_string(),
            parent,
            kind,
        },
    );
    if let NodeSnapshot::Directory { children, .. } = snapshot {
        for child in children.values() {
            insert_from(vfs, child, Some(id.clone()))?;
        }
    }
    Ok(())
}
