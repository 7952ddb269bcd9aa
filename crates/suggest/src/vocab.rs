use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Display-label translations for catalogue data that arrives in German.
static LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Process types / classes
        ("Applizieren", "Applying"),
        ("Drucken", "Printing"),
        ("Bereitstellen", "Preparing"),
        ("Manipulieren", "Manipulating"),
        ("Versetzen", "Positioning"),
        ("Hauptprozess", "Main Process"),
        ("Teilprozess", "Sub-Process"),
        // Process names
        ("Etikett applizieren", "Apply label"),
        ("Etikett drucken und bereitstellen", "Print and prepare label"),
        ("Etikett aufnehmen und manipulieren", "Pick up and manipulate label"),
        ("Versatz ermitteln", "Determine offset"),
        // Categories / components
        ("Roboter", "Robot"),
        ("Kamera", "Camera"),
        ("Etikettendrucker", "Label Printer"),
        ("Roboterfunktion", "Robot Function"),
        ("Vision", "Vision"),
        ("Vision-Job", "Vision Job"),
        ("Software", "Software"),
        ("SPS", "PLC"),
        // Sections
        ("Baukasten", "Modular System"),
        ("Baukasten (Modular System)", "Modular System"),
    ])
});

/// Feature-class synonyms folded to one canonical key so source- and
/// target-language spellings match identically.
static KEYWORDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("applizieren", "applying"),
        ("applying", "applying"),
        ("drucken", "printing"),
        ("printing", "printing"),
        ("bereitstellen", "preparing"),
        ("preparing", "preparing"),
        ("manipulieren", "manipulating"),
        ("manipulating", "manipulating"),
        ("versetzen", "positioning"),
        ("positioning", "positioning"),
        ("roboter", "robot"),
        ("robot", "robot"),
        ("kamera", "camera"),
        ("camera", "camera"),
    ])
});

/// Translate a known label to English; unknown labels pass through unchanged.
pub fn translate_label(text: &str) -> &str {
    LABELS.get(text).copied().unwrap_or(text)
}

/// Canonical key for a feature-class keyword. Unknown tokens pass through
/// trimmed and case-folded.
pub fn canonical_keyword(keyword: &str) -> String {
    let folded = keyword.trim().to_lowercase();
    match KEYWORDS.get(folded.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => folded,
    }
}

/// Case folding applied to titles and queries before substring matching.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}
