//! File-system access for the store.
//!
//! A [`Route`] is a path plus exactly the operations the dictionary needs:
//! joining, existence checks, node creation, opening, loading and storing,
//! recursive removal, listing immediate children, and size queries.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

/// Kind of node to create with [`Route::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// How [`Route::open`] opens a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Read from the start.
    Read,
    /// Create if absent and truncate.
    Write,
}

/// A location on the file system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    path: PathBuf,
}

impl Route {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The route of a single child.
    pub fn join(&self, segment: impl AsRef<Path>) -> Route {
        Route::from_path(self.path.join(segment))
    }

    /// The route reached by joining each segment in turn.
    pub fn extend<I, S>(&self, segments: I) -> Route
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut path = self.path.clone();
        path.extend(segments);
        Route::from_path(path)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn is_directory(&self) -> bool {
        self.path.is_dir()
    }

    /// Create the node, along with any missing parent directories.
    ///
    /// An existing file is left untouched.
    pub fn init(&self, kind: NodeKind) -> io::Result<()> {
        match kind {
            NodeKind::Directory => fs::create_dir_all(&self.path),
            NodeKind::File => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .map(drop)
            }
        }
    }

    pub fn open(&self, mode: Mode) -> io::Result<File> {
        match mode {
            Mode::Read => File::open(&self.path),
            Mode::Write => File::create(&self.path),
        }
    }

    /// Read the whole file.
    pub fn load(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// Replace the file's contents.
    pub fn store(&self, data: &[u8]) -> io::Result<()> {
        fs::write(&self.path, data)
    }

    /// Remove the node and everything below it. A missing node is not an error.
    pub fn void(&self) -> io::Result<()> {
        let metadata = match fs::symlink_metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if metadata.is_dir() {
            fs::remove_dir_all(&self.path)
        } else {
            fs::remove_file(&self.path)
        }
    }

    /// Immediate children as `(directories, files)`, each sorted by path.
    pub fn subnodes(&self) -> io::Result<(Vec<Route>, Vec<Route>)> {
        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_dir() {
                directories.push(Route::from_path(path));
            } else {
                files.push(Route::from_path(path));
            }
        }
        directories.sort();
        files.sort();
        Ok((directories, files))
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> io::Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    pub fn last_modified(&self) -> io::Result<SystemTime> {
        fs::metadata(&self.path)?.modified()
    }

    /// Total size of all files at or below this route.
    pub fn usage(&self) -> io::Result<u64> {
        let mut total = 0;
        for entry in WalkDir::new(&self.path) {
            let entry = entry?;
            if entry.file_type().is_file() {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }
}

impl AsRef<Path> for Route {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl From<PathBuf> for Route {
    fn from(path: PathBuf) -> Self {
        Self::from_path(path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn join_and_extend() {
        let root = Route::from_path("/store");
        assert_eq!(root.join("hash").path(), Path::new("/store/hash"));
        assert_eq!(root.extend(["ab", "cd"]).path(), Path::new("/store/ab/cd"));
        assert_eq!(root.extend(Vec::<String>::new()), root);
    }

    #[test]
    fn init_file_creates_parents_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let file = Route::from_path(dir.path()).extend(["a", "b", "index"]);
        file.init(NodeKind::File).unwrap();
        assert!(file.exists());
        assert_eq!(file.size().unwrap(), 0);

        file.store(b"data").unwrap();
        file.init(NodeKind::File).unwrap();
        assert_eq!(file.load().unwrap(), b"data");
    }

    #[test]
    fn open_write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let file = Route::from_path(dir.path()).join("f");
        file.store(b"long contents").unwrap();
        file.open(Mode::Write).unwrap().write_all(b"short").unwrap();

        let mut buf = String::new();
        file.open(Mode::Read).unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "short");
    }

    #[test]
    fn subnodes_splits_directories_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = Route::from_path(dir.path());
        root.join("d2").init(NodeKind::Directory).unwrap();
        root.join("d1").init(NodeKind::Directory).unwrap();
        root.join("f").store(b"").unwrap();

        let (directories, files) = root.subnodes().unwrap();
        assert_eq!(directories, vec![root.join("d1"), root.join("d2")]);
        assert_eq!(files, vec![root.join("f")]);
    }

    #[test]
    fn void_is_recursive_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = Route::from_path(dir.path()).join("tree");
        root.extend(["x", "y"]).init(NodeKind::Directory).unwrap();
        root.extend(["x", "y", "z"]).store(b"1").unwrap();

        root.void().unwrap();
        assert!(!root.exists());
        root.void().unwrap();
    }

    #[test]
    fn usage_sums_file_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Route::from_path(dir.path());
        root.join("a").store(b"12345").unwrap();
        root.extend(["s", "b"]).init(NodeKind::File).unwrap();
        root.extend(["s", "b"]).store(b"123").unwrap();
        assert_eq!(root.usage().unwrap(), 8);
    }

    #[test]
    fn metadata_queries() {
        let dir = tempfile::tempdir().unwrap();
        let file = Route::from_path(dir.path()).join("f");
        file.store(b"abc").unwrap();
        assert_eq!(file.size().unwrap(), 3);
        assert!(file.last_modified().unwrap() <= SystemTime::now());
        assert!(!file.is_directory());
        assert_eq!(file.to_string(), dir.path().join("f").display().to_string());
    }
}
