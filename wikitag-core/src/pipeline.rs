//! # Pipeline de Marcação — Orquestrador com Eventos Observáveis
//!
//! Conecta scanner, segmentador, construtor de spans e alinhador, e emite eventos em cada
//! passo via um canal Rust (`mpsc`), permitindo que o servidor WebSocket transmita o
//! progresso em tempo real para o cliente.
//!
//! ## Fluxo
//!
//! ```text
//! texto ──► tokenize ──► split_sentences ──┐
//!                                          ├──► align_sentence (por sentença) ──► TaggedDocument
//! anotações ──► build_sentence_groups ─────┘
//! ```
//!
//! As sentenças das duas correntes são emparelhadas pelo índice.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use wikitag_core::pipeline::tag_document;
//! use wikitag_core::span::Annotation;
//!
//! let annotations = vec![
//!     Annotation::entity("תל אביב", "LOC"),
//!     Annotation::plain(" היא עיר."),
//! ];
//! let document = tag_document("תל אביב היא עיר.", &annotations);
//! assert_eq!(document.sentences[0][0].tag.label(), "B-LOC");
//! ```

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::align::{align_sentence, AlignedToken};
use crate::error::TaggingError;
use crate::resolver::{annotations_from_nodes, plain_text, DocumentNode, TagResolver};
use crate::sentence::split_sentences;
use crate::span::{build_sentence_groups, Annotation, EntityGroup};
use crate::tagger::{entity_spans, EntitySpan};
use crate::tokenizer::{tokenize, Token};

/// Eventos emitidos pelo pipeline durante o processamento.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: Tokenização do texto corrido concluída.
    TokenizationDone { tokens: Vec<Token>, total: usize },
    /// **Passo 2**: As duas correntes foram segmentadas.
    SentencesSegmented {
        sentences: usize,
        annotated_sentences: usize,
    },
    /// **Passo 3**: Grupos de entidade de uma sentença (só sentenças com grupos).
    GroupsBuilt {
        sentence_index: usize,
        groups: Vec<EntityGroup>,
    },
    /// **Passo 4**: Um grupo foi ancorado nas posições `start..end` da sentença.
    GroupAnchored {
        sentence_index: usize,
        anchor: String,
        label: Option<String>,
        start: usize,
        end: usize,
    },
    /// **Passo 4**: Nenhuma posição contém a âncora; o grupo foi descartado.
    GroupUnmatched {
        sentence_index: usize,
        anchor: String,
    },
    /// **Conclusão**: Documento marcado.
    Done {
        document: TaggedDocument,
        processing_ms: u64,
    },
}

/// Saída final: uma lista de linhas `{word, tokenized_as, tag}` por sentença
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedDocument {
    pub sentences: Vec<Vec<AlignedToken>>,
    /// Grupos que não encontraram âncora em sua sentença
    pub unmatched_groups: usize,
}

impl TaggedDocument {
    /// Todas as linhas, na ordem do documento (formato de tabela/CSV)
    pub fn rows(&self) -> impl Iterator<Item = &AlignedToken> {
        self.sentences.iter().flatten()
    }

    pub fn total_tokens(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Entidades de cada sentença, como `(índice_da_sentença, entidade)`
    pub fn entities(&self) -> Vec<(usize, EntitySpan)> {
        self.sentences
            .iter()
            .enumerate()
            .flat_map(|(i, sentence)| entity_spans(sentence).into_iter().map(move |e| (i, e)))
            .collect()
    }
}

/// Marca um documento de forma síncrona e retorna o resultado final.
pub fn tag_document(text: &str, annotations: &[Annotation]) -> TaggedDocument {
    let (tx, rx) = mpsc::channel();
    tag_document_streaming(text, annotations, tx);

    rx.into_iter()
        .find_map(|event| match event {
            PipelineEvent::Done { document, .. } => Some(document),
            _ => None,
        })
        .unwrap_or_default()
}

/// Resolve os links de um documento em nós e marca o texto corrido resultante.
pub fn tag_nodes<R: TagResolver + ?Sized>(
    nodes: &[DocumentNode],
    resolver: &R,
) -> Result<TaggedDocument, TaggingError> {
    let annotations = annotations_from_nodes(nodes, resolver)?;
    Ok(tag_document(&plain_text(nodes), &annotations))
}

/// Executa o pipeline enviando eventos de progresso.
///
/// # Fluxo de Eventos
/// 1. `TokenizationDone`
/// 2. `SentencesSegmented`
/// 3. Por sentença: `GroupsBuilt`, seguido de `GroupAnchored`/`GroupUnmatched` por grupo
/// 4. `Done`
pub fn tag_document_streaming(
    text: &str,
    annotations: &[Annotation],
    tx: mpsc::Sender<PipelineEvent>,
) {
    let start = Instant::now();

    // === Passo 1: Tokenização ===
    let tokens = tokenize(text);
    let _ = tx.send(PipelineEvent::TokenizationDone {
        tokens: tokens.clone(),
        total: tokens.len(),
    });

    // === Passo 2: Segmentação das duas correntes ===
    let sentences = split_sentences(tokens);
    let annotated = build_sentence_groups(annotations);
    if annotated.len() > sentences.len() {
        warn!(
            sentences = sentences.len(),
            annotated = annotated.len(),
            "anotações com mais sentenças que o texto; excedente ignorado"
        );
    }
    debug!(sentences = sentences.len(), "documento segmentado");
    let _ = tx.send(PipelineEvent::SentencesSegmented {
        sentences: sentences.len(),
        annotated_sentences: annotated.len(),
    });

    // === Passo 3: Alinhamento por sentença ===
    let mut document = TaggedDocument::default();
    for (sentence_index, sentence) in sentences.iter().enumerate() {
        let groups = annotated.get(sentence_index).map_or(&[][..], Vec::as_slice);
        if !groups.is_empty() {
            let _ = tx.send(PipelineEvent::GroupsBuilt {
                sentence_index,
                groups: groups.to_vec(),
            });
        }

        let alignment = align_sentence(sentence, groups);
        for placement in alignment.placements {
            let event = match placement.positions {
                Some(range) => PipelineEvent::GroupAnchored {
                    sentence_index,
                    anchor: placement.anchor,
                    label: placement.label,
                    start: range.start,
                    end: range.end,
                },
                None => {
                    document.unmatched_groups += 1;
                    PipelineEvent::GroupUnmatched {
                        sentence_index,
                        anchor: placement.anchor,
                    }
                }
            };
            let _ = tx.send(event);
        }
        document.sentences.push(alignment.tokens);
    }

    let _ = tx.send(PipelineEvent::Done {
        document,
        processing_ms: start.elapsed().as_millis() as u64,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use crate::tagger::Tag;

    fn labels(sentence: &[AlignedToken]) -> Vec<String> {
        sentence.iter().map(|t| t.tag.label()).collect()
    }

    #[test]
    fn test_document_without_annotations() {
        let document = tag_document("החתול ישב. הכלב רץ.", &[]);
        assert_eq!(document.sentences.len(), 2);
        for sentence in &document.sentences {
            assert_eq!(sentence.len(), 3);
            assert_eq!(sentence[2], AlignedToken::sentence_end());
            assert!(sentence.iter().all(|t| t.tag == Tag::Outside));
        }
        assert_eq!(document.total_tokens(), 6);
        assert!(document.entities().is_empty());
    }

    #[test]
    fn test_document_with_one_annotation() {
        let annotations = vec![
            Annotation::entity("תל אביב", "LOC"),
            Annotation::plain(" היא עיר"),
        ];
        let document = tag_document("תל אביב היא עיר", &annotations);
        assert_eq!(document.sentences.len(), 1);
        assert_eq!(labels(&document.sentences[0]), vec!["B-LOC", "I-LOC", "O", "O", "O"]);

        let entities = document.entities();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].0, 0);
        assert_eq!(entities[0].1.text, "תל אביב");
    }

    #[test]
    fn test_sentences_are_paired_by_index() {
        let annotations = vec![
            Annotation::plain("הרכבת נפתחה ב"),
            Annotation::entity("מצרים", "LOC"),
            Annotation::plain(". היא הגיעה ל"),
            Annotation::entity("קהיר", "LOC"),
            Annotation::plain(" ול"),
            Annotation::entity("אסואן", "LOC"),
            Annotation::plain("."),
        ];
        let text = "הרכבת נפתחה במצרים. היא הגיעה לקהיר ולאסואן.";
        let document = tag_document(text, &annotations);

        assert_eq!(document.sentences.len(), 2);
        assert_eq!(labels(&document.sentences[0]), vec!["O", "O", "B-LOC", "O"]);
        assert_eq!(labels(&document.sentences[1]), vec!["O", "O", "B-LOC", "B-LOC", "O"]);
        assert_eq!(document.unmatched_groups, 0);
    }

    #[test]
    fn test_missing_annotation_sentences_default_to_outside() {
        let annotations = vec![Annotation::entity("מצרים", "LOC")];
        let document = tag_document("מצרים גדולה. מאוד.", &annotations);
        assert_eq!(document.sentences.len(), 2);
        assert_eq!(labels(&document.sentences[0]), vec!["B-LOC", "O", "O"]);
        assert_eq!(labels(&document.sentences[1]), vec!["O", "O"]);
    }

    #[test]
    fn test_surplus_annotation_sentences_are_ignored() {
        let annotations = vec![
            Annotation::entity("מצרים", "LOC"),
            Annotation::plain(". "),
            Annotation::entity("קהיר", "LOC"),
            Annotation::plain("."),
        ];
        let document = tag_document("מצרים", &annotations);
        assert_eq!(document.sentences.len(), 1);
        assert_eq!(labels(&document.sentences[0]), vec!["B-LOC", "O"]);
    }

    #[test]
    fn test_unmatched_groups_are_counted() {
        let annotations = vec![Annotation::entity("ירדן", "LOC")];
        let document = tag_document("הכלב רץ", &annotations);
        assert_eq!(document.unmatched_groups, 1);
        assert!(document.rows().all(|t| t.tag == Tag::Outside));
    }

    #[test]
    fn test_empty_document() {
        let document = tag_document("", &[]);
        assert!(document.sentences.is_empty());
        assert_eq!(document.rows().count(), 0);
    }

    #[test]
    fn test_pipeline_events_streaming() {
        let (tx, rx) = mpsc::channel();
        let annotations = vec![
            Annotation::entity("תל אביב", "LOC"),
            Annotation::plain(" ו"),
            Annotation::entity("חיפה", "LOC"),
            Annotation::plain(" ו"),
            Annotation::entity("אילת", "LOC"),
        ];
        tag_document_streaming("תל אביב וחיפה", &annotations, tx);

        let events: Vec<PipelineEvent> = rx.try_iter().collect();
        assert!(
            matches!(&events[0], PipelineEvent::TokenizationDone { total: 3, .. }),
            "Primeiro evento deve ser TokenizationDone"
        );
        assert!(matches!(&events[1], PipelineEvent::SentencesSegmented { sentences: 1, .. }));
        assert!(matches!(&events[2], PipelineEvent::GroupsBuilt { groups, .. } if groups.len() == 3));
        assert!(matches!(&events[3], PipelineEvent::GroupAnchored { start: 0, end: 2, .. }));
        assert!(matches!(&events[4], PipelineEvent::GroupAnchored { start: 2, end: 3, .. }));
        assert!(matches!(&events[5], PipelineEvent::GroupUnmatched { anchor, .. } if anchor == "אילת"));
        assert!(
            matches!(events.last().unwrap(), PipelineEvent::Done { document, .. } if document.unmatched_groups == 1),
            "Último evento deve ser Done"
        );
    }

    #[test]
    fn test_tag_nodes() {
        let resolver: StaticResolver = [("מצרים", "LOC")].into_iter().collect();
        let nodes = vec![
            DocumentNode::text("הרכבת הראשונה ב"),
            DocumentNode::link("מצרים"),
            DocumentNode::text(" נפתחה בשנת 1854."),
        ];
        let document = tag_nodes(&nodes, &resolver).unwrap();
        assert_eq!(
            labels(&document.sentences[0]),
            vec!["O", "O", "B-LOC", "O", "O", "O", "O"]
        );
    }

    #[test]
    fn test_done_event_serializes() {
        let document = tag_document("תל אביב", &[Annotation::entity("תל אביב", "LOC")]);
        let event = PipelineEvent::Done {
            document,
            processing_ms: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Done");
        let first = &json["data"]["document"]["sentences"][0][0];
        assert_eq!(first["word"], "תל");
        assert_eq!(first["tokenized_as"], "WORD_NATIVE");
        assert_eq!(first["tag"], "B-LOC");
    }
}
