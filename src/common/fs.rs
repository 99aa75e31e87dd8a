//! Narrow filesystem seam: directory listing and file reads.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only view of the filesystem. The engine never writes through it.
pub trait FileSystem: Send + Sync {
    /// Lists a directory. Entries are sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            entries.push(DirEntry {
                name,
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// A crawled directory: file names map to `File`, subdirectories to `Dir`.
///
/// A non-recursive crawl leaves subdirectories as `Dir(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File,
    Dir(Option<FileTree>),
}

pub type FileTree = BTreeMap<String, TreeNode>;

pub fn crawl_tree(fs: &dyn FileSystem, root: &Path, recursive: bool) -> io::Result<FileTree> {
    let mut tree = FileTree::new();
    for entry in fs.read_dir(root)? {
        let node = if !entry.is_dir {
            TreeNode::File
        } else if recursive {
            TreeNode::Dir(Some(crawl_tree(fs, &root.join(&entry.name), true)?))
        } else {
            TreeNode::Dir(None)
        };
        tree.insert(entry.name, node);
    }
    Ok(tree)
}

/// Flattens a crawled tree to `/`-separated file paths relative to its root.
pub fn flatten_tree(tree: &FileTree) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(tree, "", &mut paths);
    paths
}

fn collect_paths(tree: &FileTree, parent: &str, out: &mut Vec<String>) {
    for (name, node) in tree {
        let subpath = if parent.is_empty() {
            name.clone()
        } else {
            format!("{parent}/{name}")
        };
        match node {
            TreeNode::File => out.push(subpath),
            TreeNode::Dir(Some(children)) => collect_paths(children, &subpath, out),
            TreeNode::Dir(None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("gfx/ui/icons")).unwrap();
        std::fs::write(temp.path().join("gfx/b.png"), "b").unwrap();
        std::fs::write(temp.path().join("gfx/a.png"), "a").unwrap();
        std::fs::write(temp.path().join("gfx/ui/icons/x.svg"), "x").unwrap();
        std::fs::create_dir(temp.path().join("gfx/empty")).unwrap();
        temp
    }

    #[test]
    fn test_read_dir_sorted() {
        let temp = fixture();
        let entries = OsFileSystem.read_dir(&temp.path().join("gfx")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.png", "empty", "ui"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }

    #[test]
    fn test_crawl_recursive_and_flatten() {
        let temp = fixture();
        let tree = crawl_tree(&OsFileSystem, &temp.path().join("gfx"), true).unwrap();

        assert_eq!(
            flatten_tree(&tree),
            vec!["a.png", "b.png", "ui/icons/x.svg"]
        );
    }

    #[test]
    fn test_crawl_shallow() {
        let temp = fixture();
        let tree = crawl_tree(&OsFileSystem, temp.path(), false).unwrap();

        assert_eq!(tree.get("gfx"), Some(&TreeNode::Dir(None)));
        assert!(flatten_tree(&tree).is_empty());
    }

    #[test]
    fn test_crawl_missing_root() {
        let err = crawl_tree(&OsFileSystem, Path::new("/nonexistent/path"), true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
