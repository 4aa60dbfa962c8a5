//! # Segmentação em Sentenças
//!
//! Agrupa uma sequência de unidades (tokens do texto ou palavras anotadas) em sentenças,
//! quebrando **depois** de toda unidade cujo texto termina em `.`.
//!
//! ## Fronteira
//!
//! - Se a unidade que fechou a sentença é exatamente `"."`, ela é removida (é só o marcador).
//! - Caso contrário (ex: `"U.S."`, `"..."`), ela fica na sentença sem o último `.`.
//!
//! Assim toda sentença termina "sem ponto solto", e o alinhador pode anexar um único `.`
//! sintético ao final de cada uma. `!` e `?` não fecham sentenças.

use crate::tokenizer::Token;

/// Uma unidade segmentável: expõe seu texto e sabe remover o `.` final.
pub trait SentenceUnit {
    fn text(&self) -> &str;
    fn strip_trailing_period(&mut self);
}

impl SentenceUnit for Token {
    fn text(&self) -> &str {
        &self.text
    }

    fn strip_trailing_period(&mut self) {
        if self.text.ends_with('.') {
            self.text.pop();
            self.end -= 1;
        }
    }
}

/// Divide `units` em sentenças maximais.
///
/// O último trecho, se não terminar em `.`, é emitido como está. Dois `.` seguidos geram
/// uma sentença vazia, e ela é mantida para que as duas correntes (texto e anotações)
/// continuem emparelhadas.
pub fn split_sentences<T: SentenceUnit>(units: impl IntoIterator<Item = T>) -> Vec<Vec<T>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for unit in units {
        let closes = unit.text().ends_with('.');
        current.push(unit);
        if closes {
            let mut run = std::mem::take(&mut current);
            close_run(&mut run);
            sentences.push(run);
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

fn close_run<T: SentenceUnit>(run: &mut Vec<T>) {
    let bare_period = run.last().is_some_and(|last| last.text() == ".");
    if bare_period {
        run.pop();
    } else if let Some(last) = run.last_mut() {
        last.strip_trailing_period();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{tokenize, TokenCategory};

    fn words(sentences: &[Vec<Token>]) -> Vec<Vec<&str>> {
        sentences
            .iter()
            .map(|s| s.iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    fn period() -> Token {
        Token {
            text: ".".to_string(),
            category: TokenCategory::PunctEos,
            start: 0,
            end: 1,
        }
    }

    /// Junta as sentenças de volta, recolocando um `.` no fim de cada uma.
    fn rejoin(sentences: Vec<Vec<Token>>) -> Vec<Token> {
        sentences
            .into_iter()
            .flat_map(|mut s| {
                s.push(period());
                s
            })
            .collect()
    }

    #[test]
    fn test_split_two_sentences() {
        let sentences = split_sentences(tokenize("החתול ישב. הכלב רץ."));
        assert_eq!(words(&sentences), vec![vec!["החתול", "ישב"], vec!["הכלב", "רץ"]]);
    }

    #[test]
    fn test_trailing_text_without_period() {
        let sentences = split_sentences(tokenize("אחת. שתיים שלוש"));
        assert_eq!(words(&sentences), vec![vec!["אחת"], vec!["שתיים", "שלוש"]]);
    }

    #[test]
    fn test_period_inside_token_is_stripped() {
        let sentences = split_sentences(tokenize("הצבא של U.S. חזק"));
        assert_eq!(
            words(&sentences),
            vec![vec!["הצבא", "של", "U.S"], vec!["חזק"]]
        );
        let last = sentences[0].last().unwrap();
        assert_eq!(last.end - last.start, 3);

        let sentences = split_sentences(tokenize("רגע... ואז"));
        assert_eq!(words(&sentences), vec![vec!["רגע", ".."], vec!["ואז"]]);
    }

    #[test]
    fn test_other_eos_marks_do_not_split() {
        let sentences = split_sentences(tokenize("מה?! באמת!"));
        assert_eq!(sentences.len(), 1);
        assert_eq!(words(&sentences)[0], vec!["מה", "?!", "באמת", "!"]);
    }

    #[test]
    fn test_consecutive_periods_keep_empty_sentence() {
        let sentences = split_sentences(vec![period(), period()]);
        assert_eq!(sentences.len(), 2);
        assert!(sentences.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences(Vec::<Token>::new()).is_empty());
    }

    #[test]
    fn test_resegmenting_is_idempotent() {
        let samples = [
            "החתול ישב. הכלב רץ.",
            "הרכבת נפתחה בשנת 1854. היא חיברה את אלכסנדריה לקהיר. ועוד",
            "הצבא של U.S. חזק. מאוד",
            "שורה בלי נקודה",
        ];
        for sample in samples {
            let first = split_sentences(tokenize(sample));
            let second = split_sentences(rejoin(first.clone()));
            assert_eq!(words(&first), words(&second), "entrada: {:?}", sample);
        }
    }
}
