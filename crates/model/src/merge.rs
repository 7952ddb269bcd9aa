use crate::types::{Library, LinkKind};
use std::collections::HashMap;

/// Merge an incoming library fragment into an existing library.
///
/// Processes and building blocks merge by identifier: an incoming entity with
/// a known id overwrites the prior record entirely, keeping its position;
/// unknown entities are appended. Links merge as a set keyed by
/// `(from, to, kind)`. Notes are appended in order. The merge never fails.
///
/// Loading a full document from persistence is the degenerate case of merging
/// into an empty library.
pub fn merge(existing: Library, incoming: Library) -> Library {
    let mut processes = existing.processes;
    let mut index: HashMap<String, usize> = processes
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();
    let mut replaced_processes = 0usize;
    for process in incoming.processes {
        match index.get(&process.id) {
            Some(&i) => {
                processes[i] = process;
                replaced_processes += 1;
            }
            None => {
                index.insert(process.id.clone(), processes.len());
                processes.push(process);
            }
        }
    }

    let mut building_blocks = existing.building_blocks;
    let mut index: HashMap<String, usize> = building_blocks
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id.clone(), i))
        .collect();
    let mut replaced_blocks = 0usize;
    for block in incoming.building_blocks {
        match index.get(&block.id) {
            Some(&i) => {
                building_blocks[i] = block;
                replaced_blocks += 1;
            }
            None => {
                index.insert(block.id.clone(), building_blocks.len());
                building_blocks.push(block);
            }
        }
    }

    let mut links = existing.links;
    let mut index: HashMap<(String, String, LinkKind), usize> = links
        .iter()
        .enumerate()
        .map(|(i, l)| ((l.from.clone(), l.to.clone(), l.kind), i))
        .collect();
    for link in incoming.links {
        let key = (link.from.clone(), link.to.clone(), link.kind);
        match index.get(&key) {
            Some(&i) => links[i] = link,
            None => {
                index.insert(key, links.len());
                links.push(link);
            }
        }
    }

    let mut notes = existing.notes;
    notes.extend(incoming.notes);

    log::debug!(
        "merged library fragment: {} processes replaced, {} blocks replaced, {} processes / {} blocks / {} links total",
        replaced_processes,
        replaced_blocks,
        processes.len(),
        building_blocks.len(),
        links.len()
    );

    Library {
        processes,
        building_blocks,
        links,
        notes,
    }
}
