//! # Processamento em Lote
//!
//! Marca vários documentos em paralelo (`rayon`). Cada documento é independente: não há
//! estado compartilhado no núcleo. A falha de um documento (resolução de tags esgotada)
//! é registrada e o lote continua com os demais.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::TaggingError;
use crate::pipeline::{tag_nodes, TaggedDocument};
use crate::resolver::{DocumentNode, TagResolver};

/// Um documento de entrada do lote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDocument {
    /// Identificador do documento (ex: título da página)
    pub id: String,
    pub nodes: Vec<DocumentNode>,
}

/// Resultado de um lote
#[derive(Debug, Default)]
pub struct BatchReport {
    pub tagged: Vec<(String, TaggedDocument)>,
    pub failed: Vec<(String, TaggingError)>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.tagged.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Marca todos os documentos, preservando a ordem de entrada nas duas listas do relatório.
pub fn tag_batch<R>(documents: &[BatchDocument], resolver: &R) -> BatchReport
where
    R: TagResolver + Sync + ?Sized,
{
    let start = Instant::now();

    let results: Vec<(String, Result<TaggedDocument, TaggingError>)> = documents
        .par_iter()
        .map(|doc| (doc.id.clone(), tag_nodes(&doc.nodes, resolver)))
        .collect();

    let mut report = BatchReport::default();
    for (id, result) in results {
        match result {
            Ok(document) => report.tagged.push((id, document)),
            Err(err) => {
                warn!(document = %id, error = %err, "documento ignorado");
                report.failed.push((id, err));
            }
        }
    }
    report.elapsed = start.elapsed();

    info!(
        tagged = report.tagged.len(),
        failed = report.failed.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "lote concluído"
    );
    report
}
