//! The application manifest (`AndroidManifest.xml`).
//!
//! The manifest is scanned for references exactly like any other markup file,
//! but it lives outside the resource directory, so it is handed in on its own.
//! It also carries the two values used to decide whether a project should be
//! analysed at all: its `package` and, for instrumentation test projects, the
//! `android:targetPackage` of the `<instrumentation>` element.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::category::CategorySet;
use crate::error::{DeadresError, DeadresResult, IoResultExt};
use crate::identifier::ReferenceSet;
use crate::markup::extract_markup_file;

/// Conventional manifest file name.
pub const MANIFEST_FILE_NAME: &str = "AndroidManifest.xml";

const MANIFEST_TAG: &[u8] = b"manifest";
const INSTRUMENTATION_TAG: &[u8] = b"instrumentation";
const PACKAGE_ATTR: &[u8] = b"package";
const TARGET_PACKAGE_ATTR: &[u8] = b"android:targetPackage";

/// Identity values read from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    /// `package` attribute of the root `<manifest>` element
    pub package: Option<String>,
    /// `android:targetPackage` of the first `<instrumentation>` element
    pub target_package: Option<String>,
}

impl ManifestInfo {
    /// True when the manifest instruments a different package, i.e. the
    /// project is a test harness whose resources belong to another app.
    pub fn is_instrumentation_only(&self) -> bool {
        match &self.target_package {
            Some(target) => self.package.as_ref() != Some(target),
            None => false,
        }
    }
}

/// Extract resource references from the manifest.
///
/// Like any markup file, an unreadable or broken manifest contributes nothing.
pub fn extract_manifest_references(path: &Path, categories: &CategorySet) -> ReferenceSet {
    match extract_markup_file(path, categories) {
        Ok(refs) => refs,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping manifest");
            ReferenceSet::new()
        }
    }
}

/// Read the package identity values from a manifest file.
pub fn read_manifest_info(path: &Path) -> DeadresResult<ManifestInfo> {
    let file = File::open(path).with_path(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let info = read_info(&mut reader).map_err(|e| {
        DeadresError::markup(
            path,
            format!("{} (near byte {})", e, reader.buffer_position()),
        )
    })?;
    debug!(
        path = %path.display(),
        package = ?info.package,
        target_package = ?info.target_package,
        "read manifest"
    );
    Ok(info)
}

/// Read the package identity values from in-memory manifest content.
pub fn read_manifest_info_str(content: &str) -> DeadresResult<ManifestInfo> {
    let mut reader = Reader::from_reader(content.as_bytes());
    read_info(&mut reader).map_err(|e| {
        DeadresError::markup(
            "<memory>",
            format!("{} (near byte {})", e, reader.buffer_position()),
        )
    })
}

fn read_info<R: BufRead>(reader: &mut Reader<R>) -> Result<ManifestInfo, quick_xml::Error> {
    let mut info = ManifestInfo::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(tag) | Event::Empty(tag) => {
                let name = tag.name();
                if name.as_ref() == MANIFEST_TAG && info.package.is_none() {
                    info.package = attribute_value(&tag, PACKAGE_ATTR)?;
                } else if name.as_ref() == INSTRUMENTATION_TAG {
                    info.target_package = attribute_value(&tag, TARGET_PACKAGE_ATTR)?;
                    if info.target_package.is_some() {
                        break;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(info)
}

fn attribute_value(tag: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in tag.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
