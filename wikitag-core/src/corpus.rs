//! # Documentos de Demonstração em Hebraico
//!
//! Pequenos documentos já limpos (texto corrido + links), no formato que o extrator de
//! páginas entrega ao núcleo, e um resolvedor estático com as tags dos seus links.
//!
//! ## Domínios Cobertos
//! - Transporte (ferrovias no Egito)
//! - Cidades
//! - História
//! - Ciência

use crate::resolver::{DocumentNode, StaticResolver};

/// Um documento de demonstração
pub struct DemoDocument {
    /// Título da página de origem
    pub title: &'static str,
    /// Domínio temático
    pub domain: &'static str,
    pub nodes: Vec<DocumentNode>,
}

/// Retorna os documentos de demonstração
pub fn demo_documents() -> Vec<DemoDocument> {
    vec![
        // ===== TRANSPORTE =====
        DemoDocument {
            title: "רכבות במצרים",
            domain: "transporte",
            nodes: vec![
                DocumentNode::text("הרכבת הראשונה ב"),
                DocumentNode::link("מצרים"),
                DocumentNode::text(" נפתחה בשנת 1854 בין "),
                DocumentNode::link("אלכסנדריה"),
                DocumentNode::text(" ל"),
                DocumentNode::link("קהיר"),
                DocumentNode::text(". את המסילה תכנן "),
                DocumentNode::link("רוברט סטיבנסון"),
                DocumentNode::text(".\n"),
                DocumentNode::text("כיום מפעילה את הרשת חברת "),
                DocumentNode::labeled_link("הרכבות הלאומיות של מצרים", "רכבות מצרים"),
                DocumentNode::text(", שאורכה כ-5,000 ק\"מ."),
            ],
        },
        // ===== CIDADES =====
        DemoDocument {
            title: "תל אביב-יפו",
            domain: "cidades",
            nodes: vec![
                DocumentNode::labeled_link("תל אביב-יפו", "תל אביב"),
                DocumentNode::text(" היא עיר ב"),
                DocumentNode::link("מחוז תל אביב"),
                DocumentNode::text(". העיר נוסדה ב-1909 ו"),
                DocumentNode::link("מאיר דיזנגוף"),
                DocumentNode::text(" היה ראש העירייה הראשון שלה."),
            ],
        },
        // ===== HISTÓRIA =====
        DemoDocument {
            title: "מגילת העצמאות",
            domain: "história",
            nodes: vec![
                DocumentNode::link("מגילת העצמאות"),
                DocumentNode::text(" הוכרזה ב-14 במאי 1948 ב"),
                DocumentNode::link("בית דיזנגוף"),
                DocumentNode::text(" על ידי "),
                DocumentNode::link("דוד בן-גוריון"),
                DocumentNode::text("!! הטקס שודר ב"),
                DocumentNode::labeled_link("קול ישראל", "רדיו"),
                DocumentNode::text("."),
            ],
        },
        // ===== CIÊNCIA =====
        DemoDocument {
            title: "מכון ויצמן למדע",
            domain: "ciência",
            nodes: vec![
                DocumentNode::text("ה"),
                DocumentNode::link("מכון ויצמן למדע"),
                DocumentNode::text(" ("),
                DocumentNode::labeled_link("מכון ויצמן למדע", "Weizmann Institute"),
                DocumentNode::text(") נמצא ב"),
                DocumentNode::link("רחובות"),
                DocumentNode::text(". ראו גם https://www.weizmann.ac.il/ ו"),
                DocumentNode::link("האוניברסיטה העברית"),
                DocumentNode::text("."),
            ],
        },
    ]
}

/// Tags dos links dos documentos de demonstração (cache título → tag)
pub fn demo_resolver() -> StaticResolver {
    [
        ("מצרים", "LOC"),
        ("אלכסנדריה", "LOC"),
        ("קהיר", "LOC"),
        ("רוברט סטיבנסון", "PER"),
        ("הרכבות הלאומיות של מצרים", "ORG"),
        ("תל אביב-יפו", "LOC"),
        ("מחוז תל אביב", "LOC"),
        ("מאיר דיזנגוף", "PER"),
        ("מגילת העצמאות", "MISC"),
        ("בית דיזנגוף", "LOC"),
        ("דוד בן-גוריון", "PER"),
        ("קול ישראל", "ORG"),
        ("מכון ויצמן למדע", "ORG"),
        ("רחובות", "LOC"),
        ("האוניברסיטה העברית", "ORG"),
    ]
    .into_iter()
    .collect()
}
