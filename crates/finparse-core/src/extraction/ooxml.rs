//! Shared plumbing for Office Open XML packages (.docx, .pptx).
//!
//! These files are ZIP archives of XML parts; the readers here only hand out
//! part contents and attribute values, the per-format extractors do the rest.

use crate::error::DocparseError;
use quick_xml::events::BytesStart;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

pub type Package = ZipArchive<File>;

pub fn open_package(path: &Path) -> Result<Package, DocparseError> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|e| {
        DocparseError::Extraction(format!(
            "{} is not an Office Open XML package: {e}",
            path.display()
        ))
    })
}

/// Read a part as text. `Ok(None)` when the package has no such part.
pub fn read_part(package: &mut Package, name: &str) -> Result<Option<String>, DocparseError> {
    let mut entry = match package.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(DocparseError::Extraction(format!("failed to read {name}: {e}"))),
    };
    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer)?;
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}

/// Names of all parts in the package.
pub fn part_names(package: &Package) -> Vec<String> {
    package.file_names().map(str::to_string).collect()
}

/// Value of the attribute whose local name (namespace prefix ignored) is `name`.
pub fn attr_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

pub fn xml_error(part: &str, err: impl std::fmt::Display) -> DocparseError {
    DocparseError::Extraction(format!("malformed XML in {part}: {err}"))
}
