//! `@<category>/<name>` reference extraction from XML markup.
//!
//! Each document is streamed with `quick-xml`. Every attribute value of every
//! start or empty tag is inspected, as is every non-blank text node and CDATA
//! section. A value beginning with a configured `@<category>/` prefix becomes
//! `R.<category>.<name>`; anything else is ignored. Comments and processing
//! instructions are never inspected.
//!
//! Entities declared in the document's internal DTD subset
//! (`<!DOCTYPE resources [<!ENTITY brand "Acme">]>`) are resolved. A value
//! holding an entity that still cannot be resolved is inspected raw instead of
//! failing the whole document.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, warn};

use crate::category::CategorySet;
use crate::error::{DeadresError, DeadresResult, IoResultExt};
use crate::identifier::{ReferenceSet, ResourceId};

/// Extract references from every markup file.
///
/// A file that cannot be opened or parsed contributes nothing; the failure is
/// logged and the scan moves on.
pub fn extract_markup_references(files: &[PathBuf], categories: &CategorySet) -> ReferenceSet {
    let mut refs = ReferenceSet::new();
    for path in files {
        match extract_markup_file(path, categories) {
            Ok(found) => refs.extend(found),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping markup file"),
        }
    }
    refs
}

/// Extract references from a single markup file.
pub fn extract_markup_file(path: &Path, categories: &CategorySet) -> DeadresResult<ReferenceSet> {
    let file = File::open(path).with_path(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let refs = extract_from_reader(&mut reader, categories).map_err(|e| {
        DeadresError::markup(
            path,
            format!("{} (near byte {})", e, reader.buffer_position()),
        )
    })?;
    debug!(path = %path.display(), count = refs.len(), "extracted markup references");
    Ok(refs)
}

/// Extract references from in-memory markup.
pub fn extract_from_markup_str(content: &str, categories: &CategorySet) -> DeadresResult<ReferenceSet> {
    let mut reader = Reader::from_reader(content.as_bytes());
    extract_from_reader(&mut reader, categories).map_err(|e| {
        DeadresError::markup(
            "<memory>",
            format!("{} (near byte {})", e, reader.buffer_position()),
        )
    })
}

fn extract_from_reader<R: BufRead>(
    reader: &mut Reader<R>,
    categories: &CategorySet,
) -> Result<ReferenceSet, quick_xml::Error> {
    reader.config_mut().trim_text(true);

    let mut refs = ReferenceSet::new();
    let mut entities: HashMap<String, String> = HashMap::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::DocType(doctype) => {
                entities.extend(declared_entities(&String::from_utf8_lossy(&doctype)));
            }
            Event::Start(tag) | Event::Empty(tag) => {
                for attr in tag.attributes() {
                    let attr = attr?;
                    let value = attr
                        .unescape_value_with(|e| entities.get(e).map(String::as_str))
                        .unwrap_or_else(|e| {
                            debug!(error = %e, "unresolved entity in attribute, using raw value");
                            Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned())
                        });
                    insert_reference(&value, categories, &mut refs);
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape_with(|e| entities.get(e).map(String::as_str))
                    .unwrap_or_else(|e| {
                        debug!(error = %e, "unresolved entity in text, using raw value");
                        Cow::Owned(String::from_utf8_lossy(&text).into_owned())
                    });
                insert_reference(&text, categories, &mut refs);
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata);
                insert_reference(&text, categories, &mut refs);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(refs)
}

/// General entities declared in a DOCTYPE internal subset.
fn declared_entities(doctype: &str) -> Vec<(String, String)> {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let entity = ENTITY.get_or_init(|| {
        Regex::new(r#"<!ENTITY\s+([^\s%"'>]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
            .expect("Hardcoded regex pattern is valid")
    });
    entity
        .captures_iter(doctype)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some((caps[1].to_string(), value.as_str().to_string()))
        })
        .collect()
}

fn insert_reference(value: &str, categories: &CategorySet, out: &mut ReferenceSet) {
    if let Some(id) = reference_from_value(value, categories) {
        out.insert(id);
    }
}

/// Map a single markup value to a resource reference.
///
/// The prefix includes the slash, so `@styleable/x` is never mistaken for a
/// `style`. Framework references (`@android:string/ok`) and new-id
/// declarations (`@+id/x`) match no prefix.
pub fn reference_from_value(value: &str, categories: &CategorySet) -> Option<ResourceId> {
    let value = value.trim();
    categories.markup_prefixes().find_map(|(category, prefix)| {
        value
            .strip_prefix(prefix)
            .filter(|name| !name.is_empty())
            .map(|name| ResourceId::new(category, name))
    })
}
