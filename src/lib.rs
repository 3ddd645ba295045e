//! Quita la protección de edición y el control de cambios de documentos Word
//! reescribiendo `word/settings.xml`, y compara ese estado entre documentos.

pub mod cli;
pub mod compare;
pub mod constants;
pub mod document;
pub mod error;
pub mod logging;
pub mod ui;

pub use error::{Result, WfebError};
