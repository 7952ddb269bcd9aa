use crate::adapter::ImportAdapter;
use crate::error::Result;
use atlas_model::Library;

/// Plain-text notes adapter: every non-empty line becomes one note.
///
/// This is the boundary stand-in for document-to-notes extraction; upstream
/// tooling turns PDFs or similar documents into text before import.
pub struct NotesTextAdapter;

impl ImportAdapter for NotesTextAdapter {
    fn suffixes(&self) -> &'static [&'static str] {
        &[".txt"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<Library> {
        let text = std::str::from_utf8(bytes)?;
        let notes = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Library {
            notes,
            ..Library::default()
        })
    }
}
