//! Core data types shared by the scanner, the layout transform and the UI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

/// Whether a scanned entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A regular file (or anything that is not a directory, symlinks included).
    File,
    /// A directory.
    Directory,
}

impl NodeKind {
    /// Lowercase name as used on the wire and in the detail view.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// One file-system entry discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Path relative to the scan root with separators replaced by `-`.
    pub id: String,
    /// Base name of the entry.
    pub name: String,
    /// Absolute path on the host file system. Serialized lossily when it is
    /// not valid UTF-8.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    /// File or directory.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Visible entries of a directory in listing order. Empty means "no
    /// visible entries", never "not scanned".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Returns `true` for files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Total number of nodes in a forest.
#[must_use]
pub fn count_nodes(forest: &[FileNode]) -> usize {
    forest.iter().map(|node| 1 + count_nodes(&node.children)).sum()
}

/// 2D layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// A positioned node in the layered diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Same as the source [`FileNode::id`].
    pub id: String,
    /// Display label (the entry's base name).
    pub label: String,
    /// Absolute path of the entry.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    /// File or directory.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Depth from the scan root; roots are level 0.
    pub level: usize,
    /// Layout coordinates.
    pub position: Position,
}

/// A parent→child link in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// `edge-{source}-{target}`.
    pub id: String,
    /// Parent node id.
    pub source: String,
    /// Child node id.
    pub target: String,
}

/// Output of the layout transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLayout {
    /// One node per scanned entry, in depth-first visitation order.
    pub nodes: Vec<GraphNode>,
    /// One edge per parent→child relationship.
    pub edges: Vec<GraphEdge>,
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(id: &str) -> FileNode {
        FileNode {
            id: id.into(),
            name: id.into(),
            path: PathBuf::from(format!("/w/{id}")),
            kind: NodeKind::File,
            children: vec![],
        }
    }

    #[test]
    fn file_node_serializes_with_type_key_and_no_children() {
        let value = serde_json::to_value(file("a.txt")).unwrap();
        assert_eq!(
            value,
            json!({"id": "a.txt", "name": "a.txt", "path": "/w/a.txt", "type": "file"})
        );
    }

    #[test]
    fn directory_children_are_serialized_when_present() {
        let dir = FileNode {
            id: "src".into(),
            name: "src".into(),
            path: PathBuf::from("/w/src"),
            kind: NodeKind::Directory,
            children: vec![file("src-lib.rs")],
        };
        let value = serde_json::to_value(&dir).unwrap();
        assert_eq!(value["type"], "directory");
        assert_eq!(value["children"][0]["id"], "src-lib.rs");
    }

    #[test]
    fn count_nodes_walks_the_whole_forest() {
        let dir = FileNode {
            id: "d".into(),
            name: "d".into(),
            path: PathBuf::from("/w/d"),
            kind: NodeKind::Directory,
            children: vec![file("d-a"), file("d-b")],
        };
        assert_eq!(count_nodes(&[dir, file("c")]), 4);
        assert_eq!(count_nodes(&[]), 0);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_still_serialize() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut node = file("caf");
        node.path = Path::new("/w").join(OsStr::from_bytes(b"caf\xe9"));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["path"], "/w/caf\u{fffd}");
    }
}
