use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use studydesk_store::DocId;

/// Kind of legal instrument. Unknown stored keys decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegalKind {
    Constitution,
    Law,
    Decree,
    Ordinance,
    Resolution,
    NormativeInstruction,
    ProvisionalMeasure,
    ConstitutionalAmendment,
    Code,
    PrecedentSummary,
    Other,
}

impl LegalKind {
    pub const ALL: [LegalKind; 10] = [
        LegalKind::Constitution,
        LegalKind::Law,
        LegalKind::Decree,
        LegalKind::Ordinance,
        LegalKind::Resolution,
        LegalKind::NormativeInstruction,
        LegalKind::ProvisionalMeasure,
        LegalKind::ConstitutionalAmendment,
        LegalKind::Code,
        LegalKind::PrecedentSummary,
    ];

    /// Stored key, as found in the `tipo` field.
    pub fn key(self) -> &'static str {
        match self {
            LegalKind::Constitution => "constituicao",
            LegalKind::Law => "lei",
            LegalKind::Decree => "decreto",
            LegalKind::Ordinance => "portaria",
            LegalKind::Resolution => "resolucao",
            LegalKind::NormativeInstruction => "instrucao_normativa",
            LegalKind::ProvisionalMeasure => "medida_provisoria",
            LegalKind::ConstitutionalAmendment => "emenda_constitucional",
            LegalKind::Code => "codigo",
            LegalKind::PrecedentSummary => "sumula",
            LegalKind::Other => "outro",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            LegalKind::Constitution => "Constituição",
            LegalKind::Law => "Lei",
            LegalKind::Decree => "Decreto",
            LegalKind::Ordinance => "Portaria",
            LegalKind::Resolution => "Resolução",
            LegalKind::NormativeInstruction => "Instrução Normativa",
            LegalKind::ProvisionalMeasure => "Medida Provisória",
            LegalKind::ConstitutionalAmendment => "Emenda Constitucional",
            LegalKind::Code => "Código",
            LegalKind::PrecedentSummary => "Súmula",
            LegalKind::Other => "Outro",
        }
    }

    pub fn from_key(key: &str) -> Self {
        LegalKind::ALL
            .into_iter()
            .find(|k| k.key() == key)
            .unwrap_or(LegalKind::Other)
    }
}

impl Serialize for LegalKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for LegalKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(LegalKind::from_key(&key))
    }
}

impl fmt::Display for LegalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A titled part of a document, such as an article or chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalSection {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "referencia", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "conteudo", default)]
    pub content: String,
}

/// One document of the `legislation` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalDocument {
    #[serde(skip)]
    pub id: DocId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "tipo")]
    pub kind: LegalKind,
    #[serde(rename = "referencia", default)]
    pub reference: String,
    #[serde(rename = "conteudo", default)]
    pub content: String,
    #[serde(rename = "palavrasChave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "secoes", default)]
    pub sections: Vec<LegalSection>,
    #[serde(rename = "dataCriacao", default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "dataAtualizacao", default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl LegalDocument {
    /// Case-insensitive match over title, reference, content and keywords.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.reference.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }

    pub fn paragraphs(&self) -> Vec<&str> {
        paragraphs(&self.content)
    }
}

/// Split on blank lines; trimmed, empty pieces dropped.
pub fn paragraphs(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
