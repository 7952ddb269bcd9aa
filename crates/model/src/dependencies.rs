use crate::types::{Library, Link, LinkKind, Process, ProcessKind};

/// Synthetic identifier for a process that was named but never assigned an
/// id: `gen:` plus the lowercased name with whitespace runs collapsed to `-`.
pub fn synthetic_id(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("gen:{slug}")
}

/// Idempotently ensure a process exists, returning its resolved id.
///
/// An existing record is kept as-is apart from filling in an empty name; a
/// missing one is created with the given kind.
pub fn ensure_process(
    library: &mut Library,
    id: Option<&str>,
    name: &str,
    kind: ProcessKind,
) -> String {
    let resolved = match id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => synthetic_id(name),
    };

    match library.process_mut(&resolved) {
        Some(existing) => {
            if existing.name.is_empty() {
                existing.name = name.to_string();
            }
        }
        None => library
            .processes
            .push(Process::new(resolved.clone(), name, kind)),
    }

    resolved
}

/// Add a link unless one with the same `(from, to, kind)` key already exists.
pub fn add_link_unique(library: &mut Library, from: &str, to: &str, kind: LinkKind) -> bool {
    let exists = library
        .links
        .iter()
        .any(|l| l.from == from && l.to == to && l.kind == kind);
    if exists {
        return false;
    }
    library.links.push(Link::new(from, to, kind));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn synthetic_ids_slugify_names() {
        assert_eq!(synthetic_id("Apply  Label"), "gen:apply-label");
        assert_eq!(synthetic_id("Drucken"), "gen:drucken");
    }

    #[test]
    fn ensure_process_is_idempotent() {
        let mut library = Library::default();

        let first = ensure_process(&mut library, None, "Apply label", ProcessKind::Main);
        let second = ensure_process(&mut library, None, "Apply label", ProcessKind::Main);

        assert_eq!(first, second);
        assert_eq!(library.processes.len(), 1);
        assert_eq!(library.processes[0].id, "gen:apply-label");
    }

    #[test]
    fn ensure_process_prefers_explicit_ids() {
        let mut library = Library::default();
        let id = ensure_process(&mut library, Some("100000"), "Apply label", ProcessKind::Main);
        assert_eq!(id, "100000");
        assert_eq!(library.process("100000").unwrap().name, "Apply label");
    }

    #[test]
    fn add_link_unique_deduplicates_by_key() {
        let mut library = Library::default();
        assert!(add_link_unique(
            &mut library,
            "100000",
            "100001",
            LinkKind::Contains
        ));
        assert!(!add_link_unique(
            &mut library,
            "100000",
            "100001",
            LinkKind::Contains
        ));
        assert!(add_link_unique(
            &mut library,
            "100000",
            "100001",
            LinkKind::Uses
        ));
        assert_eq!(library.links.len(), 2);
    }
}
