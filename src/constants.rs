//! Valores compartidos para localizar las partes de un paquete Word.

/// Espacio de nombres WordprocessingML usado por `settings.xml`.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const SETTINGS_ENTRY: &str = "word/settings.xml";
pub const CONTENT_TYPES_ENTRY: &str = "[Content_Types].xml";
pub const RELS_DIR: &str = "_rels";

pub const PROTECTION_ELEMENT: &str = "documentProtection";
pub const TRACK_REVISIONS_ELEMENT: &str = "trackRevisions";
pub const RSIDS_ELEMENT: &str = "rsids";
pub const RSID_ELEMENT: &str = "rsid";

pub const EDIT_ATTRIBUTE: &str = "edit";
pub const ENFORCEMENT_ATTRIBUTE: &str = "enforcement";
pub const VAL_ATTRIBUTE: &str = "val";

/// Modo de edición sin restricciones y enforcement deshabilitado.
pub const UNRESTRICTED_EDIT_MODE: &str = "edit";
pub const ENFORCEMENT_DISABLED: &str = "0";

pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";
pub const DEFAULT_STAGING_SUFFIX: &str = ".new";

pub const NOT_SET_LABEL: &str = "Not set";
pub const MAX_REVISION_ID_EXAMPLES: usize = 5;

/// Variable de entorno con el filtro de logs (sintaxis de `EnvFilter`).
pub const LOG_ENV: &str = "WFEB_LOG";
