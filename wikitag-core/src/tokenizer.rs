//! # Tokenizador Robusto para Hebraico
//!
//! Divide o texto bruto em tokens tipados: palavras hebraicas, palavras latinas, números,
//! URLs, pontuações e "lixo" (qualquer sequência que não se encaixe nas outras classes).
//!
//! ## Disciplina de Casamento
//!
//! Em cada posição do texto as regras abaixo são testadas **nesta ordem**; a primeira que casar
//! vence e consome todo o seu match. Não é o maior match global entre regras: a ordem
//! codifica a política de desempate (ex: `'` é sempre pontuação de abertura, nunca de fechamento).
//!
//! | # | Regra              | Categoria         | Exemplo             |
//! |---|--------------------|-------------------|---------------------|
//! | 1 | Espaços            | (descartado)      | `"  "`              |
//! | 2 | URL                | `URL`             | `https://he.wiki/x` |
//! | 3 | Palavra hebraica   | `WORD_NATIVE`     | `תל-אביב`, `ג'ורג'` |
//! | 4 | Palavra latina     | `WORD_LATIN`      | `U.S.`, `don't`     |
//! | 5 | Número             | `NUMERIC`         | `-3.5%`, `23:00`    |
//! | 6 | Abertura           | `PUNCT_OPEN`      | `(`, `"`            |
//! | 7 | Fechamento         | `PUNCT_CLOSE`     | `)`, `]`            |
//! | 8 | Fim de sentença    | `PUNCT_EOS`       | `!!!`, `?!`, `.`    |
//! | 9 | Pontuação interna  | `PUNCT_INTERNAL`  | `,`, `-`, `&`       |
//! |10 | Lixo               | `JUNK`            | `@#`, `é`           |
//!
//! ## Limitações Conhecidas (preservadas de propósito)
//!
//! - `ב-23:00` vira `ב-23`, `:`, `00`.
//! - Prefixos hebraicos colados a números/aspas/hífens não são separados (`ב-1948` é um token só).
//! - `!!!!!!111111` vira `!!!!!!` e `111111`.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use wikitag_core::tokenizer::{tokenize, TokenCategory};
//!
//! let tokens = tokenize("word!!!123");
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1].category, TokenCategory::PunctEos);
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Um token extraído do texto (já normalizado).
///
/// `start` e `end` são offsets de byte no texto normalizado, não no texto original:
/// a normalização pode mudar o tamanho do texto.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// O texto do token (ex: "אביב", "!!!", "1948").
    pub text: String,
    /// Classe léxica atribuída pelo scanner.
    pub category: TokenCategory,
    /// Índice de byte inicial (inclusivo).
    pub start: usize,
    /// Índice de byte final (exclusivo).
    pub end: usize,
}

/// Classes léxicas do scanner. São mutuamente exclusivas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenCategory {
    /// Palavra em alfabeto hebraico (com niqqud, apóstrofos e hífens internos).
    WordNative,
    /// Palavra em alfabeto latino.
    WordLatin,
    /// Expressão numérica (sinal, separadores, `%`).
    Numeric,
    Url,
    PunctOpen,
    PunctClose,
    /// Uma ou mais marcas `! ? .` consumidas juntas.
    PunctEos,
    PunctInternal,
    /// Qualquer sequência sem letras, dígitos ou pontuação conhecida.
    Junk,
}

impl TokenCategory {
    /// Nome estável da categoria (o mesmo usado na serialização)
    pub fn name(&self) -> &'static str {
        match self {
            TokenCategory::WordNative => "WORD_NATIVE",
            TokenCategory::WordLatin => "WORD_LATIN",
            TokenCategory::Numeric => "NUMERIC",
            TokenCategory::Url => "URL",
            TokenCategory::PunctOpen => "PUNCT_OPEN",
            TokenCategory::PunctClose => "PUNCT_CLOSE",
            TokenCategory::PunctEos => "PUNCT_EOS",
            TokenCategory::PunctInternal => "PUNCT_INTERNAL",
            TokenCategory::Junk => "JUNK",
        }
    }

    /// Verdadeiro para as quatro classes de pontuação
    pub fn is_punct(&self) -> bool {
        matches!(
            self,
            TokenCategory::PunctOpen
                | TokenCategory::PunctClose
                | TokenCategory::PunctEos
                | TokenCategory::PunctInternal
        )
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Niqqud (sinais vocálicos) U+05B0..U+05C4
const NIKUD: &str = r"\x{05B0}-\x{05C4}";

/// Uma regra do scanner: padrão ancorado e a categoria produzida (`None` = descartar).
struct Rule {
    pattern: Regex,
    category: Option<TokenCategory>,
}

/// Tabela de regras, compilada uma única vez e apenas lida depois disso.
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let table: [(String, Option<TokenCategory>); 10] = [
            (r"\s+".to_string(), None),
            (r"[a-z]+://\S+".to_string(), Some(TokenCategory::Url)),
            // um separador final sem letra depois dele fica fora da palavra
            (
                format!(r#"[א-ת{n}]([.'`"\-/\\]?['`]?[א-ת{n}0-9'`])*"#, n = NIKUD),
                Some(TokenCategory::WordNative),
            ),
            (r"[a-zA-Z][a-zA-Z0-9'.]*".to_string(), Some(TokenCategory::WordLatin)),
            (r"[+-]?([0-9][0-9.,/\-:]*)?[0-9]%?".to_string(), Some(TokenCategory::Numeric)),
            (r#"[\[('`"{]"#.to_string(), Some(TokenCategory::PunctOpen)),
            (r#"[\])'`"}]"#.to_string(), Some(TokenCategory::PunctClose)),
            (r"[!?.]+".to_string(), Some(TokenCategory::PunctEos)),
            (r"[,;:\-&]".to_string(), Some(TokenCategory::PunctInternal)),
            (
                // espaços não são excluídos: um lixo já iniciado absorve os espaços seguintes
                format!(r"[^א-ת{n}a-zA-Z0-9!?.,:;\-()\[\]{{}}]+", n = NIKUD),
                Some(TokenCategory::Junk),
            ),
        ];

        table
            .into_iter()
            .map(|(pattern, category)| Rule {
                pattern: Regex::new(&format!(r"\A(?:{pattern})"))
                    .expect("padrão do scanner deve compilar"),
                category,
            })
            .collect()
    })
}

/// Expande ligaduras hebraicas e remove o ZERO WIDTH JOINER.
///
/// Deve rodar uma única vez sobre o documento inteiro, antes do scanner.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{05F0}' => out.push_str("וו"),
            '\u{05F1}' => out.push_str("וי"),
            '\u{05F2}' => out.push_str("יי"),
            '\u{FB4F}' => out.push_str("אל"),
            '\u{200D}' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Normaliza e tokeniza um texto.
///
/// Texto vazio gera uma lista vazia (não é erro).
pub fn tokenize(text: &str) -> Vec<Token> {
    let normalized = normalize(text);
    scan(&normalized).collect()
}

/// Itera os tokens de um texto **já normalizado**, sob demanda.
pub fn scan(text: &str) -> Scanner<'_> {
    Scanner { text, pos: 0 }
}

/// Iterador preguiçoso e não reiniciável sobre os tokens de um texto.
pub struct Scanner<'t> {
    text: &'t str,
    pos: usize,
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let (len, category) = match_at(rest);
            let start = self.pos;
            self.pos += len;
            if let Some(category) = category {
                return Some(Token {
                    text: rest[..len].to_string(),
                    category,
                    start,
                    end: self.pos,
                });
            }
        }
        None
    }
}

/// Aplica as regras em ordem de prioridade no início de `rest`.
///
/// Sempre consome ao menos um caractere: um caractere que nenhuma regra aceita vira `JUNK`.
fn match_at(rest: &str) -> (usize, Option<TokenCategory>) {
    rules()
        .iter()
        .find_map(|rule| {
            rule.pattern
                .find(rest)
                .filter(|m| m.end() > 0)
                .map(|m| (m.end(), rule.category))
        })
        .unwrap_or_else(|| {
            let len = rest.chars().next().map_or(1, char::len_utf8);
            (len, Some(TokenCategory::Junk))
        })
}
