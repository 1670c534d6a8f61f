//! Arena-backed node tree.
//!
//! Nodes are addressed by stable string ids (`file-3`, `dir-1`, `app-7`)
//! minted from a monotonic counter. Directories track child ids; every
//! non-root node tracks its parent, so path reconstruction and edits are
//! O(depth). Name uniqueness within a directory is enforced at mutation
//! time, not structurally.

use std::collections::HashMap;

use lumen_types::error::{LumenError, Result};
use lumen_types::geometry::Point;

use crate::path;

/// Stable node identifier, unique within one tree.
pub type NodeId = String;

/// Node variants, discriminated the same way the serialized form is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Opaque text content (may hold base64 data URLs for binary payloads).
    File { content: String },
    /// Child node ids in insertion order.
    Directory { children: Vec<NodeId> },
    /// Desktop shortcut referencing a launchable app id.
    App {
        app_id: String,
        icon_position: Option<Point>,
    },
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// `None` only for the root directory.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// File content, if this is a file node.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            _ => None,
        }
    }

    fn children(&self) -> Option<&[NodeId]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            _ => None,
        }
    }
}

/// What to create at a path.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    File { content: String },
    Directory,
    App { app_id: String },
}

impl NodePayload {
    fn id_prefix(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Directory => "dir",
            Self::App { .. } => "app",
        }
    }
}

/// The virtual file system: one rooted tree of nodes.
#[derive(Debug, Clone)]
pub struct Vfs {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) root: NodeId,
    pub(crate) next_seq: u64,
}

impl Vfs {
    /// Create a tree holding only the root directory `/`.
    pub fn new() -> Self {
        let root: NodeId = "dir-0".to_string();
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node {
                id: root.clone(),
                name: "/".to_string(),
                parent: None,
                kind: NodeKind::Directory {
                    children: Vec::new(),
                },
            },
        );
        Self {
            nodes,
            root,
            next_seq: 1,
        }
    }

    /// Id of the root directory.
    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over every node in the arena (unordered).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    fn mint_id(&mut self, prefix: &str) -> NodeId {
        let id = format!("{prefix}-{}", self.next_seq);
        self.next_seq += 1;
        id
    }

    // -- Resolution ---------------------------------------------------------

    /// Resolve a path to a node id by walking children by name. Returns
    /// `None` if any segment is missing or an intermediate node is not a
    /// directory. `/` resolves to the root.
    pub fn resolve_id(&self, raw_path: &str) -> Option<NodeId> {
        let normalized = path::normalize(raw_path);
        let mut current = self.root.clone();
        for segment in path::segments(&normalized) {
            let node = self.nodes.get(&current)?;
            let children = node.children()?;
            // Linear scan per level: children are keyed by id, not name.
            current = children
                .iter()
                .find(|child_id| {
                    self.nodes
                        .get(*child_id)
                        .is_some_and(|child| child.name == segment)
                })?
                .clone();
        }
        Some(current)
    }

    /// Resolve a path to a node.
    pub fn resolve(&self, raw_path: &str) -> Option<&Node> {
        let id = self.resolve_id(raw_path)?;
        self.nodes.get(&id)
    }

    /// Resolve the directory containing `raw_path` (the path with its last
    /// segment stripped). The root has no parent.
    pub fn resolve_parent(&self, raw_path: &str) -> Option<&Node> {
        let (parent, _) = path::split_parent(raw_path)?;
        let node = self.resolve(&parent)?;
        node.is_directory().then_some(node)
    }

    /// Children of the directory at `raw_path`, in insertion order.
    pub fn list(&self, raw_path: &str) -> Result<Vec<&Node>> {
        let node = self
            .resolve(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such directory: {raw_path}")))?;
        let children = node
            .children()
            .ok_or_else(|| LumenError::Vfs(format!("not a directory: {raw_path}")))?;
        Ok(children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Reconstruct the absolute path of a node by climbing parent links.
    pub fn path_of(&self, id: &str) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.nodes.get(id)?;
        while let Some(parent_id) = &current.parent {
            names.push(current.name.clone());
            current = self.nodes.get(parent_id)?;
        }
        if names.is_empty() {
            return Some("/".to_string());
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    // -- Mutation -----------------------------------------------------------

    /// Create a node under `parent_path`. Fails if the parent does not
    /// resolve to a directory or a sibling already bears `name`.
    pub fn create(&mut self, parent_path: &str, name: &str, payload: NodePayload) -> Result<NodeId> {
        validate_name(name)?;
        let parent_id = self
            .resolve_id(parent_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such directory: {parent_path}")))?;
        if !self.nodes[&parent_id].is_directory() {
            return Err(LumenError::Vfs(format!("not a directory: {parent_path}")));
        }
        if self.child_named(&parent_id, name).is_some() {
            return Err(LumenError::Vfs(format!("name collision: {name}")));
        }

        let id = self.mint_id(payload.id_prefix());
        let kind = match payload {
            NodePayload::File { content } => NodeKind::File { content },
            NodePayload::Directory => NodeKind::Directory {
                children: Vec::new(),
            },
            NodePayload::App { app_id } => NodeKind::App {
                app_id,
                icon_position: None,
            },
        };
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                name: name.to_string(),
                parent: Some(parent_id.clone()),
                kind,
            },
        );
        if let Some(NodeKind::Directory { children }) =
            self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
        {
            children.push(id.clone());
        }
        Ok(id)
    }

    /// Rename the node at `raw_path`. Rejected (tree unchanged) iff a
    /// *different* sibling already bears `new_name`.
    pub fn rename(&mut self, raw_path: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let id = self
            .resolve_id(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such path: {raw_path}")))?;
        if id == self.root {
            return Err(LumenError::Vfs("cannot rename root".to_string()));
        }
        let parent_id = self.nodes[&id]
            .parent
            .clone()
            .ok_or_else(|| LumenError::Vfs("cannot rename root".to_string()))?;
        if let Some(sibling) = self.child_named(&parent_id, new_name) {
            if sibling != id {
                return Err(LumenError::Vfs(format!("name collision: {new_name}")));
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = new_name.to_string();
        }
        Ok(())
    }

    /// Replace the content of the file at `raw_path`.
    pub fn update_content(&mut self, raw_path: &str, content: &str) -> Result<()> {
        let id = self
            .resolve_id(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such file: {raw_path}")))?;
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::File { content: existing }) => {
                *existing = content.to_string();
                Ok(())
            }
            _ => Err(LumenError::Vfs(format!("not a file: {raw_path}"))),
        }
    }

    /// Read the content of the file at `raw_path`.
    pub fn read(&self, raw_path: &str) -> Result<&str> {
        let node = self
            .resolve(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such file: {raw_path}")))?;
        match &node.kind {
            NodeKind::File { content } => Ok(content),
            NodeKind::Directory { .. } => {
                Err(LumenError::Vfs(format!("is a directory: {raw_path}")))
            }
            NodeKind::App { .. } => Err(LumenError::Vfs(format!("not a file: {raw_path}"))),
        }
    }

    /// Delete the node at `raw_path`, freeing its whole subtree from the
    /// arena. The root cannot be deleted.
    pub fn delete(&mut self, raw_path: &str) -> Result<()> {
        let id = self
            .resolve_id(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such path: {raw_path}")))?;
        if id == self.root {
            return Err(LumenError::Vfs("cannot delete root".to_string()));
        }
        // Detach from the parent first so a partial failure never leaves a
        // dangling child id.
        if let Some(parent_id) = self.nodes[&id].parent.clone() {
            if let Some(NodeKind::Directory { children }) =
                self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
            {
                children.retain(|child| *child != id);
            }
        }
        // Free the subtree.
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                if let NodeKind::Directory { children } = node.kind {
                    stack.extend(children);
                }
            }
        }
        Ok(())
    }

    /// Set the desktop icon position of an app shortcut.
    pub fn set_icon_position(&mut self, raw_path: &str, position: Point) -> Result<()> {
        let id = self
            .resolve_id(raw_path)
            .ok_or_else(|| LumenError::Vfs(format!("no such path: {raw_path}")))?;
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::App { icon_position, .. }) => {
                *icon_position = Some(position);
                Ok(())
            }
            _ => Err(LumenError::Vfs(format!("not an app shortcut: {raw_path}"))),
        }
    }

    fn child_named(&self, parent_id: &str, name: &str) -> Option<NodeId> {
        let children = self.nodes.get(parent_id)?.children()?;
        children
            .iter()
            .find(|id| self.nodes.get(*id).is_some_and(|n| n.name == name))
            .cloned()
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LumenError::Vfs("empty node name".to_string()));
    }
    if name.contains('/') {
        return Err(LumenError::Vfs(format!("name contains '/': {name}")));
    }
    Ok(())
}
