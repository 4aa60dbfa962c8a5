//! # Fronteira com o Resolvedor de Tags
//!
//! Descobrir qual item da base de conhecimento um link referencia, e qual tag esse item
//! carrega, é trabalho de um serviço externo. O núcleo só enxerga uma função pura
//! `resolve(títulos) -> {título: tag}`, fornecida por quem chama.
//!
//! Este módulo traz:
//! - o trait [`TagResolver`] (também implementado por closures);
//! - [`StaticResolver`], um mapa em memória (o formato do cache título → tag persistido);
//! - [`RetryingResolver`], que repete chamadas falhas um número fixo de vezes;
//! - [`DocumentNode`] e [`annotations_from_nodes`], que transformam um documento já limpo
//!   (texto + links) na lista de anotações consumida pelo construtor de spans.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ResolveError;
use crate::span::Annotation;
use crate::tagger::OUTSIDE;

/// Número padrão de tentativas do [`RetryingResolver`]
pub const DEFAULT_ATTEMPTS: usize = 3;

/// Resolve títulos de links em nomes de tag.
///
/// Títulos sem tag conhecida podem simplesmente ficar de fora do mapa retornado.
pub trait TagResolver {
    fn resolve(&self, titles: &[String]) -> Result<HashMap<String, String>, ResolveError>;
}

impl<F> TagResolver for F
where
    F: Fn(&[String]) -> Result<HashMap<String, String>, ResolveError>,
{
    fn resolve(&self, titles: &[String]) -> Result<HashMap<String, String>, ResolveError> {
        self(titles)
    }
}

/// Resolvedor em memória: título → tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticResolver {
    tags: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carrega um cache no formato `{"título": "TAG", ...}`
    pub fn from_json(json: &str) -> Result<Self, ResolveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, title: impl Into<String>, tag: impl Into<String>) {
        self.tags.insert(title.into(), tag.into());
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<T: Into<String>, G: Into<String>> FromIterator<(T, G)> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = (T, G)>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|(title, tag)| (title.into(), tag.into()))
                .collect(),
        }
    }
}

impl TagResolver for StaticResolver {
    fn resolve(&self, titles: &[String]) -> Result<HashMap<String, String>, ResolveError> {
        Ok(titles
            .iter()
            .filter_map(|title| self.tags.get(title).map(|tag| (title.clone(), tag.clone())))
            .collect())
    }
}

/// Repete a resolução até `max_attempts` vezes, sem espera entre tentativas.
///
/// Esgotadas as tentativas, devolve [`ResolveError::Exhausted`] com a última causa.
pub struct RetryingResolver<R> {
    inner: R,
    max_attempts: usize,
}

impl<R: TagResolver> RetryingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self::with_attempts(inner, DEFAULT_ATTEMPTS)
    }

    pub fn with_attempts(inner: R, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<R: TagResolver> TagResolver for RetryingResolver<R> {
    fn resolve(&self, titles: &[String]) -> Result<HashMap<String, String>, ResolveError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.inner.resolve(titles) {
                Ok(tags) => return Ok(tags),
                Err(err) if attempt < self.max_attempts => {
                    warn!(attempt, error = %err, "tentativa de resolução falhou");
                }
                Err(err) => {
                    return Err(ResolveError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    })
                }
            }
        }
    }
}

/// Um nó de um documento já sem marcação estrutural
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentNode {
    /// Texto corrido
    Text { text: String },
    /// Link interno: `[[title|text]]`
    Link {
        title: String,
        #[serde(default)]
        text: Option<String>,
    },
}

impl DocumentNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text { text: text.into() }
    }

    pub fn link(title: impl Into<String>) -> Self {
        DocumentNode::Link {
            title: title.into(),
            text: None,
        }
    }

    pub fn labeled_link(title: impl Into<String>, text: impl Into<String>) -> Self {
        DocumentNode::Link {
            title: title.into(),
            text: Some(text.into()),
        }
    }

    /// Texto exibido: o rótulo do link, ou o título quando não há rótulo
    pub fn display_text(&self) -> &str {
        match self {
            DocumentNode::Text { text } => text,
            DocumentNode::Link {
                text: Some(text), ..
            } => text,
            DocumentNode::Link { title, .. } => title,
        }
    }
}

/// Texto corrido do documento: os nós concatenados, com linhas vazias removidas e as
/// linhas restantes unidas por espaço.
pub fn plain_text(nodes: &[DocumentNode]) -> String {
    let raw: String = nodes.iter().map(DocumentNode::display_text).collect();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve os títulos de todos os links numa única chamada e gera as anotações do documento.
///
/// Nós de texto viram anotações `O`; links sem tag resolvida também.
pub fn annotations_from_nodes<R: TagResolver + ?Sized>(
    nodes: &[DocumentNode],
    resolver: &R,
) -> Result<Vec<Annotation>, ResolveError> {
    let mut titles: Vec<String> = nodes
        .iter()
        .filter_map(|node| match node {
            DocumentNode::Link { title, .. } => Some(title.clone()),
            DocumentNode::Text { .. } => None,
        })
        .collect();
    titles.sort();
    titles.dedup();

    let tags = if titles.is_empty() {
        HashMap::new()
    } else {
        resolver.resolve(&titles)?
    };

    Ok(nodes
        .iter()
        .map(|node| {
            let tag = match node {
                DocumentNode::Link { title, .. } => {
                    tags.get(title).map_or(OUTSIDE, String::as_str)
                }
                DocumentNode::Text { .. } => OUTSIDE,
            };
            Annotation::entity(node.display_text(), tag)
        })
        .collect())
}
