//! # Esquema de Tags BIO
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! para rotular palavras no corpus gerado.
//!
//! - `B-TAG`: Begin — primeira palavra de uma entidade
//! - `I-TAG`: Inside — palavras subsequentes da mesma entidade
//! - `O`: Outside — não é parte de nenhuma entidade
//!
//! ## Vocabulário Aberto
//!
//! O nome da tag (`LOC`, `ORG`, `PER`, ...) vem da configuração externa do resolvedor.
//! Aqui ele é uma string opaca: novas tags não exigem mudança no scanner nem no alinhador.

use serde::{Deserialize, Serialize};

use crate::align::AlignedToken;
use crate::error::TaggingError;
use crate::sentence::SentenceUnit;

/// Rótulo usado para "nenhuma entidade"
pub const OUTSIDE: &str = "O";

/// Tag BIO aplicada a uma palavra.
///
/// Serializada como o seu rótulo textual (`"B-LOC"`, `"I-LOC"`, `"O"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tag {
    /// **Begin**: Marca o INÍCIO de uma entidade. Ex: **תל** (B-LOC) אביב.
    Begin(String),
    /// **Inside**: Marca a CONTINUAÇÃO de uma entidade. Ex: תל **אביב** (I-LOC).
    Inside(String),
    /// **Outside**: A palavra não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Tag da palavra de posição `index` dentro de uma anotação de tag `name`.
    ///
    /// `name == "O"` (ou vazio) gera `Outside` para todas as palavras.
    pub fn for_position(name: &str, index: usize) -> Self {
        match (name, index) {
            (OUTSIDE | "", _) => Tag::Outside,
            (_, 0) => Tag::Begin(name.to_string()),
            _ => Tag::Inside(name.to_string()),
        }
    }

    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(name) => format!("B-{}", name),
            Tag::Inside(name) => format!("I-{}", name),
            Tag::Outside => OUTSIDE.to_string(),
        }
    }

    /// Prefixo do esquema: `'B'`, `'I'` ou `'O'`
    pub fn prefix(&self) -> char {
        match self {
            Tag::Begin(_) => 'B',
            Tag::Inside(_) => 'I',
            Tag::Outside => 'O',
        }
    }

    /// Nome da entidade (se for B- ou I-)
    pub fn entity(&self) -> Option<&str> {
        match self {
            Tag::Begin(name) | Tag::Inside(name) => Some(name),
            Tag::Outside => None,
        }
    }

    pub fn is_entity(&self) -> bool {
        !matches!(self, Tag::Outside)
    }

    /// Verifica se a transição tag_prev → self é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesma entidade)
    /// - `B-X` e `O` podem seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(name) => prev.entity() == Some(name.as_str()),
            _ => true,
        }
    }

    /// Parseia uma tag a partir do rótulo (ex: "B-PER" → Begin("PER"))
    pub fn from_label(s: &str) -> Result<Self, TaggingError> {
        if s == OUTSIDE {
            return Ok(Tag::Outside);
        }
        match s.split_once('-') {
            Some(("B", name)) if !name.is_empty() => Ok(Tag::Begin(name.to_string())),
            Some(("I", name)) if !name.is_empty() => Ok(Tag::Inside(name.to_string())),
            _ => Err(TaggingError::InvalidTag {
                label: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<String> for Tag {
    type Error = TaggingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::from_label(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.label()
    }
}

/// Uma palavra com sua tag BIO, vinda do texto de uma anotação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: Tag,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: Tag) -> Self {
        Self {
            word: word.into(),
            tag,
        }
    }
}

impl SentenceUnit for TaggedWord {
    fn text(&self) -> &str {
        &self.word
    }

    fn strip_trailing_period(&mut self) {
        if self.word.ends_with('.') {
            self.word.pop();
        }
    }
}

/// Uma entidade encontrada numa sentença já alinhada
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Palavras da entidade unidas por espaço (ex: "תל אביב")
    pub text: String,
    /// Nome da tag (ex: "LOC")
    pub label: String,
    /// Índice da primeira palavra na sentença
    pub start_token: usize,
    /// Índice da última palavra (inclusivo)
    pub end_token: usize,
}

/// Reconstrói as entidades de uma sentença a partir das tags BIO.
///
/// Uma entidade começa em `B-X` e continua enquanto houver `I-X` da **mesma** tag;
/// termina em `O`, `B-Y` ou `I-Y`. Um `I-X` órfão não abre entidade.
///
/// # Exemplo
/// `[B-LOC, I-LOC, O, B-PER]` -> `[EntitySpan(LOC), EntitySpan(PER)]`
pub fn entity_spans(tokens: &[AlignedToken]) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if let Tag::Begin(label) = &tokens[i].tag {
            let mut words = vec![tokens[i].word.as_str()];
            let mut j = i + 1;
            while j < tokens.len() {
                match &tokens[j].tag {
                    Tag::Inside(next) if next == label => {
                        words.push(tokens[j].word.as_str());
                        j += 1;
                    }
                    _ => break,
                }
            }

            spans.push(EntitySpan {
                text: words.join(" "),
                label: label.clone(),
                start_token: i,
                end_token: j - 1,
            });
            i = j;
        } else {
            i += 1;
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenCategory;

    fn aligned(word: &str, tag: &str) -> AlignedToken {
        AlignedToken {
            word: word.to_string(),
            tokenized_as: TokenCategory::WordNative,
            tag: Tag::from_label(tag).unwrap(),
        }
    }

    #[test]
    fn test_tag_labels() {
        assert_eq!(Tag::Outside.label(), "O");
        assert_eq!(Tag::Begin("PER".into()).label(), "B-PER");
        assert_eq!(Tag::Inside("LOC".into()).to_string(), "I-LOC");
    }

    #[test]
    fn test_for_position() {
        assert_eq!(Tag::for_position("LOC", 0), Tag::Begin("LOC".into()));
        assert_eq!(Tag::for_position("LOC", 3), Tag::Inside("LOC".into()));
        assert_eq!(Tag::for_position("O", 0), Tag::Outside);
        assert_eq!(Tag::for_position("O", 2), Tag::Outside);
        assert_eq!(Tag::for_position("", 0), Tag::Outside);
        assert_eq!(Tag::for_position("", 1), Tag::Outside);
    }

    #[test]
    fn test_open_vocabulary() {
        let tag = Tag::from_label("B-WORK_OF_ART").unwrap();
        assert_eq!(tag.entity(), Some("WORK_OF_ART"));
        assert_eq!(tag.prefix(), 'B');
        // o nome pode conter hífen
        assert_eq!(
            Tag::from_label("I-GPE-CITY").unwrap(),
            Tag::Inside("GPE-CITY".into())
        );
    }

    #[test]
    fn test_invalid_labels() {
        for label in ["", "X-LOC", "B-", "LOC", "b-LOC"] {
            assert!(
                matches!(Tag::from_label(label), Err(TaggingError::InvalidTag { .. })),
                "{:?} deveria ser inválido",
                label
            );
        }
    }

    #[test]
    fn test_valid_transitions() {
        let b_per = Tag::Begin("PER".into());
        let i_per = Tag::Inside("PER".into());
        let b_org = Tag::Begin("ORG".into());
        assert!(Tag::is_valid_transition(&b_per, &i_per));
        assert!(Tag::is_valid_transition(&i_per, &i_per));
        assert!(!Tag::is_valid_transition(&Tag::Outside, &i_per));
        assert!(!Tag::is_valid_transition(&b_org, &i_per));
        assert!(Tag::is_valid_transition(&i_per, &b_org));
    }

    #[test]
    fn test_tag_serializes_as_label() {
        let word = TaggedWord::new("אביב", Tag::Inside("LOC".into()));
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(json, r#"{"word":"אביב","tag":"I-LOC"}"#);

        let back: TaggedWord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
        assert!(serde_json::from_str::<Tag>("\"Z-LOC\"").is_err());
    }

    #[test]
    fn test_entity_spans() {
        let tokens = vec![
            aligned("תל", "B-LOC"),
            aligned("אביב", "I-LOC"),
            aligned("היא", "O"),
            aligned("עיר", "B-MISC"),
            aligned("של", "I-PER"),
            aligned("דוד", "B-PER"),
        ];
        let spans = entity_spans(&tokens);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "תל אביב");
        assert_eq!(spans[0].label, "LOC");
        assert_eq!((spans[0].start_token, spans[0].end_token), (0, 1));
        assert_eq!((spans[1].start_token, spans[1].end_token), (3, 3));
        assert_eq!(spans[2].label, "PER");
    }
}
