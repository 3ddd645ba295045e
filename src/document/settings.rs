//! Lectura del estado de protección guardado en `word/settings.xml`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use xmltree::Element;

use crate::constants::{
    EDIT_ATTRIBUTE, ENFORCEMENT_ATTRIBUTE, PROTECTION_ELEMENT, RSID_ELEMENT, RSIDS_ELEMENT,
    TRACK_REVISIONS_ELEMENT, VAL_ATTRIBUTE, W_NS,
};
use crate::error::WfebError;

use super::xml::{ElementSpec, child_elements, find_element, get_attr_value, strip_prefix};

const PROTECTION: ElementSpec<'static> = ElementSpec::new(PROTECTION_ELEMENT, W_NS);
const TRACK_REVISIONS: ElementSpec<'static> = ElementSpec::new(TRACK_REVISIONS_ELEMENT, W_NS);
const RSIDS: ElementSpec<'static> = ElementSpec::new(RSIDS_ELEMENT, W_NS);
const RSID: ElementSpec<'static> = ElementSpec::new(RSID_ELEMENT, W_NS);

/// Vista de protección y control de cambios de un `settings.xml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProtectionRecord {
    pub has_protection: bool,
    pub enforcement: Option<String>,
    pub edit_mode: Option<String>,
    /// Todos los atributos de `documentProtection`, sin prefijo.
    pub protection_attributes: BTreeMap<String, String>,
    pub track_revisions: bool,
    pub revision_ids: BTreeSet<String>,
}

impl ProtectionRecord {
    pub fn from_element(root: &Element) -> Self {
        let mut record = ProtectionRecord::default();

        if let Some(protection) = find_element(root, &PROTECTION) {
            record.has_protection = true;
            for (key, value) in &protection.attributes {
                let key = strip_prefix(key);
                match key {
                    ENFORCEMENT_ATTRIBUTE => record.enforcement = Some(value.clone()),
                    EDIT_ATTRIBUTE => record.edit_mode = Some(value.clone()),
                    _ => {}
                }
                record
                    .protection_attributes
                    .insert(key.to_string(), value.clone());
            }
        }

        record.track_revisions = find_element(root, &TRACK_REVISIONS).is_some();

        if let Some(rsids) = find_element(root, &RSIDS) {
            record.revision_ids = child_elements(rsids, &RSID)
                .filter_map(|rsid| get_attr_value(rsid, VAL_ATTRIBUTE))
                .collect();
        }

        record
    }
}

pub fn parse_settings(contents: &[u8]) -> Result<ProtectionRecord, xmltree::ParseError> {
    let root = Element::parse(Cursor::new(contents))?;
    Ok(ProtectionRecord::from_element(&root))
}

/// Lee y analiza un `settings.xml` ya extraído.
pub fn parse_settings_file(path: &Path) -> Result<ProtectionRecord, WfebError> {
    let contents = fs::read(path)
        .map_err(|e| WfebError::io(format!("Could not read {}", path.display()), e))?;
    parse_settings(&contents).map_err(|e| WfebError::MalformedXml {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
