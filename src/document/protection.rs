//! Desactiva la protección de edición y el control de cambios de `settings.xml`.
//!
//! El XML se reescribe como flujo de eventos para conservar intactos los
//! prefijos, el orden de atributos y el resto del contenido.

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::reader::NsReader;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::{
    EDIT_ATTRIBUTE, ENFORCEMENT_ATTRIBUTE, ENFORCEMENT_DISABLED, PROTECTION_ELEMENT,
    TRACK_REVISIONS_ELEMENT, UNRESTRICTED_EDIT_MODE, W_NS,
};
use crate::error::WfebError;

/// Cambios aplicados sobre un `settings.xml`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtectionChanges {
    pub protection_disabled: bool,
    pub track_revisions_removed: bool,
}

impl ProtectionChanges {
    pub fn modified(&self) -> bool {
        self.protection_disabled || self.track_revisions_removed
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Protection,
    TrackRevisions,
    Other,
}

fn is_wordml(namespace: &ResolveResult<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(Namespace(ns)) if *ns == W_NS.as_bytes())
}

fn classify(start: &BytesStart<'_>, in_wordml: bool) -> Target {
    if !in_wordml {
        return Target::Other;
    }
    let local = start.local_name();
    if local.as_ref() == PROTECTION_ELEMENT.as_bytes() {
        Target::Protection
    } else if local.as_ref() == TRACK_REVISIONS_ELEMENT.as_bytes() {
        Target::TrackRevisions
    } else {
        Target::Other
    }
}

/// Fija `w:edit="edit"` y `w:enforcement="0"` en el primer `documentProtection`
/// y elimina el primer `trackRevisions` desde su padre, esté donde esté.
///
/// Si no hay nada que cambiar se devuelve el contenido original sin tocar.
pub fn disable_protection(contents: Vec<u8>) -> Result<(Vec<u8>, ProtectionChanges), String> {
    let mut changes = ProtectionChanges::default();
    let rewritten = {
        let mut reader = NsReader::from_reader(contents.as_slice());
        let mut writer = Writer::new(Vec::with_capacity(contents.len()));
        let mut buf = Vec::new();
        let mut depth = 0_usize;
        let mut skip_depth = 0_usize;
        let mut seen_root = false;
        let mut started = false;

        loop {
            buf.clear();
            let (namespace, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(|e| e.to_string())?;
            let in_wordml = match namespace {
                ResolveResult::Unknown(prefix) => {
                    return Err(format!(
                        "unbound namespace prefix '{}'",
                        String::from_utf8_lossy(&prefix)
                    ));
                }
                resolved => is_wordml(&resolved),
            };

            if skip_depth > 0 {
                match event {
                    Event::Start(_) => skip_depth += 1,
                    Event::End(_) => skip_depth -= 1,
                    Event::Eof => return Err("unexpected end of document".to_string()),
                    _ => {}
                }
                continue;
            }

            if !started {
                started = true;
                if !matches!(event, Event::Decl(_)) {
                    let declaration = BytesDecl::new("1.0", Some("UTF-8"), Some("yes"));
                    write(&mut writer, Event::Decl(declaration))?;
                }
            }

            let target = match &event {
                Event::Start(start) | Event::Empty(start) => {
                    seen_root = true;
                    classify(start, in_wordml)
                }
                _ => Target::Other,
            };

            match event {
                Event::Start(_)
                    if target == Target::TrackRevisions && !changes.track_revisions_removed =>
                {
                    changes.track_revisions_removed = true;
                    skip_depth = 1;
                }
                Event::Empty(_)
                    if target == Target::TrackRevisions && !changes.track_revisions_removed =>
                {
                    changes.track_revisions_removed = true;
                }
                Event::Start(start)
                    if target == Target::Protection && !changes.protection_disabled =>
                {
                    changes.protection_disabled = true;
                    depth += 1;
                    let unlocked = unlock_attributes(&reader, &start)?;
                    write(&mut writer, Event::Start(unlocked))?;
                }
                Event::Empty(start)
                    if target == Target::Protection && !changes.protection_disabled =>
                {
                    changes.protection_disabled = true;
                    let unlocked = unlock_attributes(&reader, &start)?;
                    write(&mut writer, Event::Empty(unlocked))?;
                }
                Event::Start(start) => {
                    depth += 1;
                    write(&mut writer, Event::Start(start))?;
                }
                Event::End(end) => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| "unexpected closing tag".to_string())?;
                    write(&mut writer, Event::End(end))?;
                }
                Event::Eof => break,
                other => write(&mut writer, other)?,
            }
        }

        if !seen_root {
            return Err("document has no root element".to_string());
        }
        if depth != 0 {
            return Err("unexpected end of document".to_string());
        }
        writer.into_inner()
    };

    if !changes.modified() {
        return Ok((contents, changes));
    }

    debug!(
        protection = changes.protection_disabled,
        track_revisions = changes.track_revisions_removed,
        "settings.xml reescrito"
    );
    Ok((rewritten, changes))
}

/// Copia los atributos del elemento cambiando solo `edit` y `enforcement`.
///
/// El elemento ya está en WordprocessingML, así que sus atributos sin prefijo
/// también cuentan (caso del espacio de nombres por defecto).
fn unlock_attributes(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<BytesStart<'static>, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut unlocked = BytesStart::new(name);
    let mut has_edit = false;
    let mut has_enforcement = false;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let (namespace, local) = reader.resolve_attribute(attr.key);
        let replacement = if !is_wordml(&namespace) && attr.key.prefix().is_some() {
            None
        } else if local.as_ref() == EDIT_ATTRIBUTE.as_bytes() {
            has_edit = true;
            Some(UNRESTRICTED_EDIT_MODE)
        } else if local.as_ref() == ENFORCEMENT_ATTRIBUTE.as_bytes() {
            has_enforcement = true;
            Some(ENFORCEMENT_DISABLED)
        } else {
            None
        };

        match replacement {
            Some(value) => unlocked.push_attribute(Attribute {
                key: attr.key,
                value: Cow::Borrowed(value.as_bytes()),
            }),
            None => unlocked.push_attribute(attr),
        }
    }

    if has_edit && has_enforcement {
        return Ok(unlocked);
    }

    let (prefix, declare) = wordml_prefix(reader, start)?;
    if declare {
        let declaration = format!("xmlns:{prefix}");
        unlocked.push_attribute((declaration.as_str(), W_NS));
    }
    if !has_edit {
        let key = format!("{prefix}:{EDIT_ATTRIBUTE}");
        unlocked.push_attribute((key.as_str(), UNRESTRICTED_EDIT_MODE));
    }
    if !has_enforcement {
        let key = format!("{prefix}:{ENFORCEMENT_ATTRIBUTE}");
        unlocked.push_attribute((key.as_str(), ENFORCEMENT_DISABLED));
    }

    Ok(unlocked)
}

/// Prefijo ligado a WordprocessingML para los atributos añadidos.
///
/// Devuelve `true` junto al prefijo cuando hay que declararlo en el propio
/// elemento: `w`, `w1`, `w2`... el primero que no choque con sus atributos.
fn wordml_prefix(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<(String, bool), String> {
    if let Some(prefix) = start.name().prefix() {
        return Ok((String::from_utf8_lossy(prefix.as_ref()).into_owned(), false));
    }

    let keys = start
        .attributes()
        .map(|attr| attr.map(|attr| attr.key.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut index = 0_usize;
    loop {
        let candidate = if index == 0 {
            "w".to_string()
        } else {
            format!("w{index}")
        };
        let qualified = format!("{candidate}:{EDIT_ATTRIBUTE}");
        let (namespace, _) = reader.resolve_attribute(QName(qualified.as_bytes()));
        if is_wordml(&namespace) {
            return Ok((candidate, false));
        }

        let declaration = format!("xmlns:{candidate}");
        let attribute_prefix = format!("{candidate}:");
        let taken = keys.iter().any(|key| {
            key == declaration.as_bytes() || key.starts_with(attribute_prefix.as_bytes())
        });
        if !taken {
            return Ok((candidate, true));
        }
        index += 1;
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer
        .write_event(event)
        .map_err(|e| format!("could not write XML: {}", e))
}

/// Aplica [`disable_protection`] sobre un `settings.xml` extraído en disco.
pub fn disable_protection_in_file(path: &Path) -> Result<ProtectionChanges, WfebError> {
    let contents = fs::read(path)
        .map_err(|e| WfebError::io(format!("Could not read {}", path.display()), e))?;

    let (output, changes) =
        disable_protection(contents).map_err(|reason| WfebError::MalformedXml {
            path: path.to_path_buf(),
            reason,
        })?;

    if changes.modified() {
        fs::write(path, output)
            .map_err(|e| WfebError::io(format!("Could not write {}", path.display()), e))?;
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::settings::parse_settings;
    use std::io::Cursor;
    use xmltree::{Element, XMLNode};

    const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:zoom w:percent="100"/><w:documentProtection w:edit="readOnly" w:enforcement="1" w:cryptSpinCount="100000" w:hash="abc="/><w:trackRevisions/><w:defaultTabStop w:val="708"/><w:rsids><w:rsid w:val="00112233"/></w:rsids></w:settings>"#;

    fn child_names(element: &Element) -> Vec<String> {
        element
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Element(child) => Some(child.name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn disable_protection_unlocks_and_removes_tracking() -> Result<(), Box<dyn std::error::Error>> {
        let (output, changes) = disable_protection(SETTINGS.as_bytes().to_vec())?;

        assert!(changes.protection_disabled);
        assert!(changes.track_revisions_removed);

        let text = String::from_utf8(output.clone())?;
        assert!(text.starts_with("<?xml"));
        assert!(text.contains(r#"w:edit="edit""#));
        assert!(text.contains(r#"w:enforcement="0""#));
        assert!(text.contains(r#"w:cryptSpinCount="100000""#));
        assert!(text.contains(r#"w:hash="abc=""#));
        assert!(!text.contains("trackRevisions"));

        let record = parse_settings(&output)?;
        assert!(record.has_protection);
        assert_eq!(record.edit_mode.as_deref(), Some("edit"));
        assert_eq!(record.enforcement.as_deref(), Some("0"));
        assert!(!record.track_revisions);

        let root = Element::parse(Cursor::new(&output[..]))?;
        assert_eq!(
            child_names(&root),
            vec!["zoom", "documentProtection", "defaultTabStop", "rsids"]
        );
        Ok(())
    }

    #[test]
    fn disable_protection_adds_missing_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:documentProtection w:formatting="1"/></w:settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;
        assert!(changes.protection_disabled);
        assert!(!changes.track_revisions_removed);

        let record = parse_settings(&output)?;
        assert_eq!(record.edit_mode.as_deref(), Some("edit"));
        assert_eq!(record.enforcement.as_deref(), Some("0"));
        assert_eq!(
            record
                .protection_attributes
                .get("formatting")
                .map(String::as_str),
            Some("1")
        );
        assert_eq!(record.protection_attributes.len(), 3);

        let text = String::from_utf8(output)?;
        assert!(text.contains(r#"w:edit="edit""#));
        Ok(())
    }

    #[test]
    fn disable_protection_without_targets_keeps_contents() -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:zoom w:percent="100"/></w:settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;

        assert_eq!(changes, ProtectionChanges::default());
        assert_eq!(output, xml.as_bytes());
        Ok(())
    }

    #[test]
    fn disable_protection_removes_nested_tracking_from_its_parent()
    -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:zoom/><w:group><w:first/><w:trackRevisions><w:inner/></w:trackRevisions><w:last/></w:group><w:tail/></w:settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;
        assert!(changes.track_revisions_removed);
        assert!(!changes.protection_disabled);

        let root = Element::parse(Cursor::new(&output[..]))?;
        assert_eq!(child_names(&root), vec!["zoom", "group", "tail"]);
        let group = root
            .children
            .iter()
            .find_map(|node| match node {
                XMLNode::Element(child) if child.name == "group" => Some(child),
                _ => None,
            })
            .ok_or("falta group")?;
        assert_eq!(child_names(group), vec!["first", "last"]);
        assert!(!parse_settings(&output)?.track_revisions);
        Ok(())
    }

    #[test]
    fn disable_protection_ignores_foreign_namespaces() -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:x="urn:otro"><x:trackRevisions/><x:documentProtection x:edit="readOnly"/></w:settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;

        assert!(!changes.modified());
        assert_eq!(output, xml.as_bytes());
        Ok(())
    }

    #[test]
    fn disable_protection_rewrites_default_namespace_attributes_in_place()
    -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<settings xmlns="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><documentProtection edit="readOnly" enforcement="1"/></settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;
        assert!(changes.protection_disabled);

        let text = String::from_utf8(output.clone())?;
        assert!(text.contains(r#"<documentProtection edit="edit" enforcement="0"/>"#));
        assert_eq!(text.matches("edit=").count(), 1);

        let record = parse_settings(&output)?;
        assert_eq!(record.edit_mode.as_deref(), Some("edit"));
        assert_eq!(record.enforcement.as_deref(), Some("0"));
        Ok(())
    }

    #[test]
    fn disable_protection_declares_prefix_for_added_attributes()
    -> Result<(), Box<dyn std::error::Error>> {
        let xml = r#"<settings xmlns="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w="urn:otro"><documentProtection w:formatting="1"/></settings>"#;

        let (output, changes) = disable_protection(xml.as_bytes().to_vec())?;
        assert!(changes.protection_disabled);

        let text = String::from_utf8(output.clone())?;
        assert!(text.contains(
            r#"xmlns:w1="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#
        ));
        assert!(text.contains(r#"w1:edit="edit""#));
        assert!(text.contains(r#"w1:enforcement="0""#));
        assert!(text.contains(r#"w:formatting="1""#));

        let record = parse_settings(&output)?;
        assert_eq!(record.edit_mode.as_deref(), Some("edit"));
        assert_eq!(record.enforcement.as_deref(), Some("0"));
        Ok(())
    }

    #[test]
    fn disable_protection_rejects_truncated_xml() {
        let xml = r#"<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:documentProtection w:edit="readOnly"/>"#;
        assert!(disable_protection(xml.as_bytes().to_vec()).is_err());
        assert!(disable_protection(Vec::new()).is_err());
    }
}
