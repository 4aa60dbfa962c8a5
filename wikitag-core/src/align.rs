//! # Alinhamento de Grupos de Entidade com o Texto Tokenizado
//!
//! As duas correntes de tokens são produzidas de forma independente: uma do texto corrido
//! inteiro, outra do texto de cada anotação. O alinhador projeta as tags da segunda sobre
//! as posições da primeira, sentença por sentença.
//!
//! ## Algoritmo
//!
//! Um cursor `last` (inicialmente "nenhuma posição") só avança. Para cada grupo, em ordem:
//! 1. Procura a primeira posição `i > last` cujo token **contém** a âncora do grupo.
//! 2. Achou: atribui as tags do grupo às posições `i, i+1, ...` (uma por palavra), sem
//!    conferir o texto dessas posições, e avança `last` para a última posição atribuída.
//! 3. Não achou: o grupo é descartado (registrado em [`GroupPlacement`]).
//!
//! Posições não reclamadas ficam com `O`, e um `.` sintético fecha a sentença.
//!
//! ## Heurística Conhecida
//!
//! "Contém" em vez de "igual" tolera prefixos colados (`ב` + `ירושלים` = `בירושלים`), mas
//! uma âncora curta pode casar dentro de um token anterior sem relação com ela.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::span::EntityGroup;
use crate::tagger::Tag;
use crate::tokenizer::{Token, TokenCategory};

/// Unidade final de saída: uma linha do corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedToken {
    pub word: String,
    pub tokenized_as: TokenCategory,
    pub tag: Tag,
}

impl AlignedToken {
    /// O `.` sintético anexado ao fim de toda sentença
    pub fn sentence_end() -> Self {
        Self {
            word: ".".to_string(),
            tokenized_as: TokenCategory::PunctEos,
            tag: Tag::Outside,
        }
    }
}

/// Onde um grupo foi ancorado na sentença (ou `None` se não foi)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPlacement {
    pub anchor: String,
    pub label: Option<String>,
    pub positions: Option<Range<usize>>,
}

/// Resultado do alinhamento de uma sentença
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAlignment {
    /// Uma linha por token da sentença, mais o `.` sintético
    pub tokens: Vec<AlignedToken>,
    /// Um registro por grupo, na ordem dos grupos
    pub placements: Vec<GroupPlacement>,
}

impl SentenceAlignment {
    pub fn unmatched(&self) -> impl Iterator<Item = &GroupPlacement> {
        self.placements.iter().filter(|p| p.positions.is_none())
    }
}

/// Primeira posição depois de `after` cujo token contém `anchor`.
pub fn find_anchor(sentence: &[Token], anchor: &str, after: Option<usize>) -> Option<usize> {
    let from = after.map_or(0, |last| last + 1);
    sentence
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, token)| token.text.contains(anchor))
        .map(|(i, _)| i)
}

/// Alinha os grupos de entidade de uma sentença com os tokens dessa sentença.
pub fn align_sentence(sentence: &[Token], groups: &[EntityGroup]) -> SentenceAlignment {
    let mut tags = vec![Tag::Outside; sentence.len()];
    let mut last: Option<usize> = None;
    let mut placements = Vec::with_capacity(groups.len());

    for group in groups.iter().filter(|g| !g.is_empty()) {
        let positions = find_anchor(sentence, group.anchor(), last).map(|start| {
            // grupos que passam do fim da sentença são cortados
            let end = (start + group.len()).min(sentence.len());
            for (slot, word) in tags[start..end].iter_mut().zip(&group.words) {
                *slot = word.tag.clone();
            }
            last = Some(end - 1);
            start..end
        });

        if positions.is_none() {
            debug!(anchor = group.anchor(), "grupo sem âncora na sentença, descartado");
        }

        placements.push(GroupPlacement {
            anchor: group.anchor().to_string(),
            label: group.label().map(str::to_string),
            positions,
        });
    }

    let mut tokens: Vec<AlignedToken> = sentence
        .iter()
        .zip(tags)
        .map(|(token, tag)| AlignedToken {
            word: token.text.clone(),
            tokenized_as: token.category,
            tag,
        })
        .collect();
    tokens.push(AlignedToken::sentence_end());

    SentenceAlignment { tokens, placements }
}
