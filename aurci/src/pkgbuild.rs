//! PKGBUILD field extraction and rewriting
//!
//! Only four declarations are understood, each identified by an anchor at
//! the start of a line:
//! - `pkgver=` and `_dir=` span their whole line
//! - `source=(` and `sha256sums=(` span the anchor plus the first list entry
//!
//! The first line carrying an anchor is that field's declaration. Every other
//! byte of the file, including line terminators, is carried over verbatim.

use aurci_meta::PackageMetadata;

use crate::{Error, Result};

/// Name of the recipe file inside a package directory
pub const RECIPE_FILE: &str = "PKGBUILD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pkgver,
    Dir,
    Source,
    Sha256sums,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Pkgver, Field::Dir, Field::Source, Field::Sha256sums];

    pub fn anchor(self) -> &'static str {
        match self {
            Field::Pkgver => "pkgver=",
            Field::Dir => "_dir=",
            Field::Source => "source=(",
            Field::Sha256sums => "sha256sums=(",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Pkgver => "pkgver",
            Field::Dir => "_dir",
            Field::Source => "source",
            Field::Sha256sums => "sha256sums",
        }
    }

    fn is_list(self) -> bool {
        matches!(self, Field::Source | Field::Sha256sums)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Values of the four managed declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub pkgver: String,
    pub dir: String,
    pub source: String,
    pub sha256sums: String,
}

impl RecipeFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Pkgver => &self.pkgver,
            Field::Dir => &self.dir,
            Field::Source => &self.source,
            Field::Sha256sums => &self.sha256sums,
        }
    }

    /// Whether the fields derivable without the archive already match
    pub fn matches_release(&self, other: &RecipeFields) -> bool {
        self.pkgver == other.pkgver && self.dir == other.dir && self.source == other.source
    }
}

pub fn pkgver_field(version: &str) -> String {
    format!("pkgver='{}'", version)
}

/// Build directory; sibling packages live in a subdirectory of the repository
pub fn dir_field(metadata: &PackageMetadata) -> String {
    let suffix = if metadata.has_siblings() {
        format!("/{}", metadata.upstream_name)
    } else {
        String::new()
    };
    format!("_dir=\"{}-${{pkgver}}{}\"", metadata.repository, suffix)
}

pub fn source_field(download_url: &str) -> String {
    format!("source=(\"${{pkgname}}-${{pkgver}}.tar.gz\"::\"{}\"", download_url)
}

pub fn sha256sums_field(checksum: &str) -> String {
    format!("sha256sums=('{}'", checksum)
}

/// Location of a declaration: line index and byte length of the managed prefix
#[derive(Debug, Clone, Copy)]
struct Span {
    line: usize,
    end: usize,
}

/// A parsed PKGBUILD
#[derive(Debug, Clone)]
pub struct Pkgbuild {
    /// Lines including their terminators
    lines: Vec<String>,
    spans: [Span; 4],
}

impl Pkgbuild {
    /// Locate all four declarations, failing with `RecipeMalformed` if any is absent
    pub fn parse(package: &str, content: &str) -> Result<Self> {
        let lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

        let mut spans = [None; 4];
        for field in Field::ALL {
            spans[field.index()] = lines
                .iter()
                .enumerate()
                .find(|(_, line)| line.starts_with(field.anchor()))
                .and_then(|(idx, line)| {
                    field_extent(field, line).map(|end| Span { line: idx, end })
                });
        }

        let missing: Vec<&'static str> = Field::ALL
            .iter()
            .filter(|f| spans[f.index()].is_none())
            .map(|f| f.name())
            .collect();

        match spans {
            [Some(pkgver), Some(dir), Some(source), Some(sha)] => Ok(Self {
                lines,
                spans: [pkgver, dir, source, sha],
            }),
            _ => Err(Error::RecipeMalformed {
                package: package.to_string(),
                missing,
            }),
        }
    }

    /// Current text of a declaration
    pub fn field(&self, field: Field) -> &str {
        let span = self.spans[field.index()];
        &self.lines[span.line][..span.end]
    }

    pub fn fields(&self) -> RecipeFields {
        RecipeFields {
            pkgver: self.field(Field::Pkgver).to_string(),
            dir: self.field(Field::Dir).to_string(),
            source: self.field(Field::Source).to_string(),
            sha256sums: self.field(Field::Sha256sums).to_string(),
        }
    }

    /// Render the file with each declaration replaced by its new value
    pub fn rewrite(&self, fields: &RecipeFields) -> String {
        let mut lines = self.lines.clone();
        for field in Field::ALL {
            let span = self.spans[field.index()];
            let line = &mut lines[span.line];
            line.replace_range(..span.end, fields.get(field));
        }
        lines.concat()
    }
}

/// Byte length of the managed prefix of a declaration line
fn field_extent(field: Field, line: &str) -> Option<usize> {
    let content_end = line.trim_end_matches(['\n', '\r']).len();
    if !field.is_list() {
        return Some(content_end);
    }

    let start = field.anchor().len();
    let bytes = &line.as_bytes()[..content_end];

    let mut pos = start;
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    let entry_start = pos;

    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b')' => break,
            b'\'' => {
                pos = closing_quote(bytes, pos, b'\'')?;
            }
            b'"' => {
                pos = closing_quote(bytes, pos, b'"')?;
            }
            b'\\' => pos += 2,
            _ => pos += 1,
        }
    }

    if pos == entry_start {
        None
    } else {
        Some(pos.min(bytes.len()))
    }
}

/// Position just past the quote that closes the one at `open`
fn closing_quote(bytes: &[u8], open: usize, quote: u8) -> Option<usize> {
    let mut pos = open + 1;
    while pos < bytes.len() {
        if quote == b'"' && bytes[pos] == b'\\' {
            pos += 2;
            continue;
        }
        if bytes[pos] == quote {
            return Some(pos + 1);
        }
        pos += 1;
    }
    None
}
