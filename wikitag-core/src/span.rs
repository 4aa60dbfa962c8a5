//! # Construção de Spans BIO a partir das Anotações
//!
//! Transforma a lista de anotações de um documento (texto exibido + tag resolvida) em
//! grupos de palavras BIO por sentença, prontos para o alinhador.
//!
//! ## Algoritmo
//! 1. Tokeniza o texto de cada anotação com o scanner.
//! 2. Atribui tags palavra a palavra: `B-X` na primeira, `I-X` nas seguintes (`O` se a tag for `O`).
//! 3. Concatena tudo na ordem do documento e segmenta em sentenças (mesma regra do texto).
//! 4. Em cada sentença descarta as palavras `O` e reagrupa o resto: um novo grupo começa
//!    em todo `B` que segue um `B` ou um `I`.
//!
//! Trechos de texto corrido entre links entram como anotações de tag `O`: eles não geram
//! grupos, mas mantêm as fronteiras de sentença em sincronia com o texto tokenizado.

use serde::{Deserialize, Serialize};

use crate::sentence::split_sentences;
use crate::tagger::{Tag, TaggedWord, OUTSIDE};
use crate::tokenizer::tokenize;

fn outside() -> String {
    OUTSIDE.to_string()
}

/// Uma referência no documento com o texto exibido e a tag resolvida externamente
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub display_text: String,
    /// Nome da tag (ex: "LOC") ou `"O"` quando nenhuma tag é conhecida
    #[serde(default = "outside")]
    pub tag: String,
}

impl Annotation {
    pub fn entity(display_text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            tag: tag.into(),
        }
    }

    /// Texto corrido, sem entidade
    pub fn plain(display_text: impl Into<String>) -> Self {
        Self::entity(display_text, OUTSIDE)
    }

    pub fn is_entity(&self) -> bool {
        !self.tag.is_empty() && self.tag != OUTSIDE
    }
}

/// Uma sequência de palavras de uma mesma entidade, sempre iniciada por `B-X`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGroup {
    pub words: Vec<TaggedWord>,
}

impl EntityGroup {
    /// Palavra âncora: a primeira do grupo
    pub fn anchor(&self) -> &str {
        self.words.first().map_or("", |w| w.word.as_str())
    }

    /// Nome da entidade do grupo
    pub fn label(&self) -> Option<&str> {
        self.words.first().and_then(|w| w.tag.entity())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tokeniza o texto de uma anotação e atribui as tags BIO às palavras.
pub fn tag_annotation(annotation: &Annotation) -> Vec<TaggedWord> {
    tokenize(&annotation.display_text)
        .into_iter()
        .enumerate()
        .map(|(i, token)| TaggedWord::new(token.text, Tag::for_position(&annotation.tag, i)))
        .collect()
}

/// Expande todas as anotações, na ordem do documento, numa sequência plana de palavras.
pub fn tag_annotations(annotations: &[Annotation]) -> Vec<TaggedWord> {
    annotations.iter().flat_map(tag_annotation).collect()
}

/// Um novo grupo começa num `B` que segue outro `B` ou um `I`.
pub fn starts_new_group(prev: &Tag, current: &Tag) -> bool {
    matches!((prev.prefix(), current.prefix()), ('B', 'B') | ('I', 'B'))
}

/// Descarta as palavras `O` de uma sentença e agrupa o restante em entidades.
///
/// Se a sentença começa com um `I-X` (anotação cortada por uma fronteira de sentença),
/// essa palavra é promovida a `B-X`: nenhum grupo começa com `I`.
pub fn group_entity_words(words: Vec<TaggedWord>) -> Vec<EntityGroup> {
    let mut groups: Vec<EntityGroup> = Vec::new();

    for mut word in words.into_iter().filter(|w| w.tag.is_entity()) {
        let split = match groups.last().and_then(|g| g.words.last()) {
            Some(prev) => starts_new_group(&prev.tag, &word.tag),
            None => {
                if let Tag::Inside(name) = &word.tag {
                    word.tag = Tag::Begin(name.clone());
                }
                true
            }
        };

        match groups.last_mut() {
            Some(group) if !split => group.words.push(word),
            _ => groups.push(EntityGroup { words: vec![word] }),
        }
    }

    groups
}

/// Executa o construtor completo: uma lista de grupos de entidade por sentença.
pub fn build_sentence_groups(annotations: &[Annotation]) -> Vec<Vec<EntityGroup>> {
    split_sentences(tag_annotations(annotations))
        .into_iter()
        .map(group_entity_words)
        .collect()
}
