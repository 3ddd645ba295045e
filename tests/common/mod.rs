use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
</Types>
"#;

pub const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

pub const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:body><w:p><w:r><w:t>Hola</w:t></w:r></w:p></w:body>
</w:document>
"#;

/// `settings.xml` con el contenido indicado dentro de `<w:settings>`.
pub fn settings_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{body}</w:settings>
"#
    )
}

pub fn rsids(ids: &[&str]) -> String {
    let entries: String = ids
        .iter()
        .map(|id| format!(r#"<w:rsid w:val="{id}"/>"#))
        .collect();
    format!("<w:rsids>{entries}</w:rsids>")
}

/// Escribe un `.docx` mínimo; `settings` en `None` omite `word/settings.xml`.
pub fn write_docx(path: &Path, settings: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Stored);

    // Orden distinto del de Office para comprobar que el reempaquetado lo corrige.
    writer.start_file("word/document.xml", options)?;
    writer.write_all(DOCUMENT_XML.as_bytes())?;

    if let Some(settings) = settings {
        writer.start_file("word/settings.xml", options)?;
        writer.write_all(settings.as_bytes())?;
    }

    writer.start_file("_rels/.rels", options)?;
    writer.write_all(RELS_XML.as_bytes())?;

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(CONTENT_TYPES.as_bytes())?;

    writer.finish()?;
    Ok(())
}
