//! # wikitag-core — Corpus NER com Tags BIO a partir da Wikipédia Hebraica
//!
//! Este crate transforma um documento em linguagem natural numa sequência de tokens com
//! tags BIO, pronta para treinar modelos de NER. As tags vêm dos links do próprio
//! documento: cada link aponta para um item da base de conhecimento, e o tipo desse item
//! (resolvido fora daqui) vira a tag da entidade.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: Texto corrido do documento + lista de anotações (texto exibido, tag).
//! 2.  **Tokenização** ([`tokenizer`]): scanner por regras ordenadas (hebraico, latim, números, pontuação).
//! 3.  **Segmentação** ([`sentence`]): quebra em sentenças após todo token terminado em `.`.
//! 4.  **Spans** ([`span`]): anotações → palavras BIO → grupos de entidade por sentença.
//! 5.  **Alinhamento** ([`align`]): projeta os grupos sobre os tokens do texto corrido.
//! 6.  **Saída**: sentenças de linhas `{word, tokenized_as, tag}` ([`pipeline::TaggedDocument`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use wikitag_core::{tag_document, Annotation};
//!
//! let annotations = vec![
//!     Annotation::entity("תל אביב", "LOC"),
//!     Annotation::plain(" היא עיר."),
//! ];
//! let document = tag_document("תל אביב היא עיר.", &annotations);
//!
//! for row in document.rows() {
//!     println!("{}\t{}\t{}", row.word, row.tokenized_as, row.tag);
//! }
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador principal que conecta todos os estágios.
//! - [`resolver`]: Fronteira com o resolvedor externo de tags (título → tag).
//! - [`batch`]: Processamento paralelo de vários documentos.
//! - [`corpus`]: Documentos de demonstração.

pub mod align;
pub mod batch;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod sentence;
pub mod span;
pub mod tagger;
pub mod tokenizer;

pub use align::AlignedToken;
pub use error::{ResolveError, TaggingError};
pub use pipeline::{tag_document, tag_nodes, PipelineEvent, TaggedDocument};
pub use resolver::{DocumentNode, StaticResolver, TagResolver};
pub use span::Annotation;
pub use tagger::{Tag, TaggedWord};
pub use tokenizer::{tokenize, Token, TokenCategory};
