//! Reference library over a seeded in-memory store

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::rstest;
use studydesk_reference::{LegalKind, ReferenceLibrary, LEGISLATION_COLLECTION};
use studydesk_store::{DocumentStore, MemoryDocumentStore, NewDocument, Payload, Value};

fn seed(store: &MemoryDocumentStore, json: serde_json::Value) {
    let payload: Payload = match Value::from(json) {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {:?}", other),
    };
    store
        .create(LEGISLATION_COLLECTION, NewDocument::new(payload, Utc::now()))
        .unwrap();
}

fn library() -> ReferenceLibrary {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(
        &store,
        serde_json::json!({
            "titulo": "Constituição Federal",
            "tipo": "constituicao",
            "referencia": "CF/88",
            "conteudo": "Art. 5º Todos são iguais perante a lei.\n\nArt. 6º São direitos sociais.",
            "palavrasChave": ["direitos fundamentais"],
            "secoes": [
                {"titulo": "Título I", "conteudo": "Dos princípios"},
                {"titulo": "Título II", "referencia": "Arts. 5º a 17", "conteudo": "Dos direitos"}
            ],
            "dataAtualizacao": "2026-03-01T00:00:00Z"
        }),
    );
    seed(
        &store,
        serde_json::json!({
            "titulo": "Código Penal",
            "tipo": "codigo",
            "referencia": "Decreto-Lei 2.848/1940",
            "conteudo": "Art. 121. Matar alguém.",
            "palavrasChave": ["homicídio"],
            "dataCriacao": "2025-01-01T00:00:00Z"
        }),
    );
    seed(
        &store,
        serde_json::json!({
            "titulo": "Súmula Vinculante 11",
            "tipo": "sumula",
            "referencia": "STF",
            "conteudo": "Só é lícito o uso de algemas em casos de resistência."
        }),
    );
    ReferenceLibrary::new(store)
}

#[test]
fn test_all_ordered_by_title() {
    let titles: Vec<String> = library().all().unwrap().into_iter().map(|d| d.title).collect();
    assert_eq!(
        titles,
        vec!["Constituição Federal", "Código Penal", "Súmula Vinculante 11"]
    );
}

#[rstest]
#[case("", 3)]
#[case("   ", 3)]
#[case("CF/88", 1)]
#[case("homicídio", 1)]
#[case("ALGEMAS", 1)]
#[case("art.", 2)]
#[case("tributário", 0)]
fn test_search(#[case] term: &str, #[case] expected: usize) {
    assert_eq!(library().search(term).unwrap().len(), expected);
}

#[test]
fn test_by_kind() {
    let library = library();
    let codes = library.by_kind(Some(LegalKind::Code)).unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].title, "Código Penal");
    assert!(library.by_kind(Some(LegalKind::Decree)).unwrap().is_empty());
    assert_eq!(library.by_kind(None).unwrap().len(), 3);
}

#[test]
fn test_stats() {
    let stats = library().stats().unwrap();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_sections, 2);
    assert_eq!(stats.by_kind[&LegalKind::Constitution], 1);
    assert_eq!(stats.by_kind[&LegalKind::PrecedentSummary], 1);
    assert_eq!(
        stats.last_updated,
        Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_get_and_paragraphs() {
    let library = library();
    let constitution = library.by_kind(Some(LegalKind::Constitution)).unwrap().remove(0);
    let fetched = library.get(constitution.id).unwrap().unwrap();
    assert_eq!(fetched, constitution);
    assert_eq!(fetched.paragraphs().len(), 2);
    assert!(library.get(studydesk_store::DocId::new_v4()).unwrap().is_none());
}
