use crate::error::{ImportError, Result};
use crate::notes_text::NotesTextAdapter;
use crate::sheet_rows::SheetRowsAdapter;
use crate::solution_table::SolutionTableAdapter;
use atlas_model::{merge, Library};

/// Capability interface for import adapters.
///
/// Adapters only produce library fragments; they never see the display
/// graph. Dispatch is by file-name suffix so formats can share an outer
/// extension (`.sheets.json` before `.json`).
pub trait ImportAdapter: Send + Sync {
    /// File-name suffixes this adapter claims, lowercase, most specific
    /// first.
    fn suffixes(&self) -> &'static [&'static str];

    fn parse(&self, bytes: &[u8]) -> Result<Library>;
}

/// Diagnostic for a file that could not be imported. The batch continues
/// without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDiagnostic {
    pub file: String,
    pub message: String,
}

/// A named byte buffer handed to the registry, however it was obtained.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Ordered adapter collection with suffix dispatch.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn ImportAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in adapters. Registration order doubles as
    /// dispatch priority.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SheetRowsAdapter));
        registry.register(Box::new(SolutionTableAdapter));
        registry.register(Box::new(NotesTextAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn ImportAdapter>) {
        self.adapters.push(adapter);
    }

    fn adapter_for(&self, name: &str) -> Option<&dyn ImportAdapter> {
        let lower = name.to_lowercase();
        self.adapters
            .iter()
            .find(|a| a.suffixes().iter().any(|s| lower.ends_with(s)))
            .map(Box::as_ref)
    }

    /// Parse a single file through whichever adapter claims its name.
    pub fn parse_file(&self, name: &str, bytes: &[u8]) -> Result<Library> {
        match self.adapter_for(name) {
            Some(adapter) => adapter.parse(bytes),
            None => Err(ImportError::UnsupportedFile(name.to_string())),
        }
    }

    /// Import a batch of files on top of a base library.
    ///
    /// Each fragment merges per the library merge rules; a file that fails
    /// to parse is skipped with a diagnostic and the batch continues.
    pub fn import_all(
        &self,
        files: &[ImportFile],
        base: Library,
    ) -> (Library, Vec<ImportDiagnostic>) {
        let mut library = base;
        let mut diagnostics = Vec::new();

        for file in files {
            match self.parse_file(&file.name, &file.bytes) {
                Ok(fragment) => {
                    library = merge(library, fragment);
                }
                Err(err) => {
                    log::warn!("failed to import {}: {err}", file.name);
                    diagnostics.push(ImportDiagnostic {
                        file: file.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        (library, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dispatch_prefers_the_more_specific_suffix() {
        let registry = AdapterRegistry::with_defaults();

        let rows = br#"{"Sheet1": [{"id": "B1", "name": "Robot", "category": "Robot"}]}"#;
        let lib = registry.parse_file("export.sheets.json", rows).unwrap();
        assert_eq!(lib.building_blocks.len(), 1);

        let table = br#"[{"Prozessnummer": "100000", "Prozessname": "Drucken", "Prozessart": "Hauptprozess"}]"#;
        let lib = registry.parse_file("library.json", table).unwrap();
        assert_eq!(lib.processes.len(), 1);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let registry = AdapterRegistry::with_defaults();
        let err = registry.parse_file("photo.png", b"...").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFile(_)));
    }

    #[test]
    fn a_failing_file_is_skipped_and_the_batch_continues() {
        let registry = AdapterRegistry::with_defaults();
        let files = vec![
            ImportFile::new("broken.json", &b"not json"[..]),
            ImportFile::new("notes.txt", &b"first hint\nsecond hint"[..]),
        ];

        let (library, diagnostics) = registry.import_all(&files, Library::default());
        assert_eq!(library.notes.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].file, "broken.json");
    }
}
