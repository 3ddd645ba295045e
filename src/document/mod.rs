//! Lectura y modificación de `word/settings.xml` dentro de paquetes `.docx`.

mod archive;
mod protection;
mod replace;
mod settings;
mod unlock;
mod xml;

pub use archive::{extract_all, extract_entry, packing_order, repack};
pub use protection::{ProtectionChanges, disable_protection, disable_protection_in_file};
pub use replace::{replace_with_backup, sibling_path};
pub use settings::{ProtectionRecord, parse_settings, parse_settings_file};
pub use unlock::{UnlockEvent, UnlockOptions, UnlockSummary, unlock_document};
