mod fs;

pub use fs::{DirEntry, FileSystem, FileTree, OsFileSystem, TreeNode, crawl_tree, flatten_tree};
