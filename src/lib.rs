pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod io;
pub mod logging;
pub mod session;
pub mod text;
pub mod translator;

// 重新导出主要结构
pub use config::SessionConfig;
pub use coordinator::{locate, TranslationCoordinator, TranslationOutcome};
pub use document::{Document, DocumentKind, DocumentSet, SourceText};
pub use error::{SessionError, SourcePosition, TranslationError};
pub use session::{Location, Session};
pub use translator::{CommandTranslator, LanguageCatalog, StaticLanguages, Translator};
