//! Collaborators the session calls out to: opening links and overwrite consent

use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Hands a single link off to whatever displays it
pub trait LinkOpener {
    fn open(&mut self, url: &str) -> io::Result<()>;
}

impl<F> LinkOpener for F
where
    F: FnMut(&str) -> io::Result<()>,
{
    fn open(&mut self, url: &str) -> io::Result<()> {
        self(url)
    }
}

/// Opens links in the system's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl LinkOpener for BrowserOpener {
    fn open(&mut self, url: &str) -> io::Result<()> {
        debug!(%url, "Opening in browser");
        open::that(url)
    }
}

/// Writes links to an output stream instead of opening them
#[derive(Debug)]
pub struct PrintOpener<W: Write = io::Stdout> {
    out: W,
}

impl PrintOpener {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PrintOpener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LinkOpener for PrintOpener<W> {
    fn open(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out, "{}", url)
    }
}

/// Decides whether an existing link list may be replaced
pub trait OverwriteConsent {
    fn allow_overwrite(&mut self, path: &Path) -> bool;
}

impl<F> OverwriteConsent for F
where
    F: FnMut(&Path) -> bool,
{
    fn allow_overwrite(&mut self, path: &Path) -> bool {
        self(path)
    }
}

/// Consent that always allows replacing the list
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOverwrite;

impl OverwriteConsent for AlwaysOverwrite {
    fn allow_overwrite(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Consent that never replaces an existing list
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverOverwrite;

impl OverwriteConsent for NeverOverwrite {
    fn allow_overwrite(&mut self, _path: &Path) -> bool {
        false
    }
}
