//! Erros do crate.
//!
//! Os algoritmos centrais (scanner, segmentação, alinhamento) não falham: entrada vazia ou
//! malformada produz saída vazia ou menor. Só há erro na fronteira com o mundo externo:
//! rótulos BIO vindos de texto e a resolução título → tag.

/// Falhas do resolvedor externo de tags
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("falha no serviço de resolução: {message}")]
    Backend { message: String },

    #[error("resolução falhou após {attempts} tentativas: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<ResolveError>,
    },

    #[error("cache de títulos inválido: {0}")]
    InvalidCache(#[from] serde_json::Error),
}

impl ResolveError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Erros do processo de marcação de um documento
#[derive(Debug, thiserror::Error)]
pub enum TaggingError {
    #[error("rótulo BIO inválido: {label:?}")]
    InvalidTag { label: String },

    #[error("resolução de tags falhou: {0}")]
    Resolve(#[from] ResolveError),
}
