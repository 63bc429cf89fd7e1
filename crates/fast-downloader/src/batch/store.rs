//! Line-oriented persistence of the link list

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::core::files::write_lines_atomic;
use crate::core::{FileOperation, LinkError, Result};

/// The link list file: one URL per line, trailing newline
///
/// Reads skip blank lines and trim surrounding whitespace, so the count, the
/// full read, and the lazy line iterator always agree.
#[derive(Debug, Clone)]
pub struct LinkStore {
    path: PathBuf,
}

impl LinkStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the stored list with `links`
    ///
    /// Always overwrites; asking before replacing an existing list is the
    /// caller's job.
    pub fn write<S: AsRef<str>>(&self, links: &[S]) -> Result<usize> {
        let written = write_lines_atomic(&self.path, links.iter().map(AsRef::as_ref))?;
        info!("Wrote {} links to {}", written, self.path.display());
        Ok(written)
    }

    /// Read the whole list in order
    pub fn read(&self) -> Result<Vec<String>> {
        self.lines()?.collect()
    }

    /// Count stored links without keeping them in memory
    pub fn count(&self) -> Result<usize> {
        let mut total = 0;
        for line in self.lines()? {
            line?;
            total += 1;
        }
        debug!("{} holds {} links", self.path.display(), total);
        Ok(total)
    }

    /// Lazily iterate stored links from a freshly opened handle
    pub fn lines(&self) -> Result<LinkLines> {
        let file = File::open(&self.path)
            .map_err(|e| LinkError::io(&self.path, FileOperation::Read, e))?;
        Ok(LinkLines {
            path: self.path.clone(),
            lines: BufReader::new(file).lines(),
        })
    }
}

/// Iterator over the non-blank, trimmed lines of a link list
#[derive(Debug)]
pub struct LinkLines {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl Iterator for LinkLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Some(Ok(trimmed.to_string()));
                }
                Err(e) => return Some(Err(LinkError::io(&self.path, FileOperation::Read, e))),
            }
        }
    }
}
