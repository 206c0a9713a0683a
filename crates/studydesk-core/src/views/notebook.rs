use crate::entity::{Note, Record};

/// Notes whose title or content contains `search` (case-insensitive),
/// optionally restricted to one subject. A blank search matches everything.
pub fn filter_notes(notes: &[Record<Note>], search: &str, subject: Option<&str>) -> Vec<Record<Note>> {
    let needle = search.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| {
            needle.is_empty()
                || n.data.title.to_lowercase().contains(&needle)
                || n.data.content.to_lowercase().contains(&needle)
        })
        .filter(|n| subject.map_or(true, |s| n.data.subject == s))
        .cloned()
        .collect()
}

/// Distinct subjects in first-seen order.
pub fn subjects(notes: &[Record<Note>]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for note in notes {
        if !seen.iter().any(|s| s == &note.data.subject) {
            seen.push(note.data.subject.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studydesk_store::DocId;

    fn note(title: &str, subject: &str, content: &str) -> Record<Note> {
        let at = Utc::now();
        Record {
            id: DocId::new_v4(),
            created: at,
            modified: at,
            data: Note::new(title, subject, content),
        }
    }

    fn notes() -> Vec<Record<Note>> {
        vec![
            note("Prescrição", "Civil", "Prazo geral de dez anos"),
            note("Dolo", "Penal", "Vontade livre e consciente"),
            note("Contratos", "Civil", "Boa-fé objetiva"),
        ]
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let notes = notes();
        assert_eq!(filter_notes(&notes, "PRAZO", None).len(), 1);
        assert_eq!(filter_notes(&notes, "dolo", None).len(), 1);
        assert_eq!(filter_notes(&notes, "", None).len(), 3);
    }

    #[test]
    fn subject_filter_combines_with_search() {
        let notes = notes();
        assert_eq!(filter_notes(&notes, "", Some("Civil")).len(), 2);
        assert!(filter_notes(&notes, "dolo", Some("Civil")).is_empty());
    }

    #[test]
    fn subjects_in_first_seen_order() {
        assert_eq!(subjects(&notes()), vec!["Civil", "Penal"]);
    }
}
