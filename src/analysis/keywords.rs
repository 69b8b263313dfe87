//! Multilingual heading keyword table.
//!
//! Each entry maps a lowercase, NFC keyword to the level it implies when a
//! line starts with it. Top-level terms (chapter, part) imply H1; every
//! other keyword implies H2.

use crate::model::HeadingLevel;

use super::normalize::is_spaceless_script_char;

use HeadingLevel::{H1, H2};

/// Words a heading may carry after its keyword ("Chapter 3: Methods").
const MAX_TRAILING_WORDS: usize = 3;

/// Characters a heading may carry after its keyword; bounds CJK lines,
/// which have no word spaces.
const MAX_TRAILING_CHARS: usize = 40;

/// Heading keywords and their implied levels.
pub static HEADING_KEYWORDS: &[(&str, HeadingLevel)] = &[
    // English
    ("chapter", H1),
    ("part", H1),
    ("section", H2),
    ("introduction", H2),
    ("conclusion", H2),
    ("conclusions", H2),
    ("summary", H2),
    ("overview", H2),
    ("background", H2),
    ("methodology", H2),
    ("results", H2),
    ("discussion", H2),
    ("references", H2),
    ("bibliography", H2),
    ("appendix", H2),
    ("abstract", H2),
    ("acknowledgements", H2),
    ("acknowledgments", H2),
    ("goals", H2),
    ("objectives", H2),
    // French
    ("chapitre", H1),
    ("partie", H1),
    ("introduction générale", H2),
    ("résumé", H2),
    ("références", H2),
    ("annexe", H2),
    ("bibliographie", H2),
    // German
    ("kapitel", H1),
    ("teil", H1),
    ("abschnitt", H2),
    ("einleitung", H2),
    ("zusammenfassung", H2),
    ("fazit", H2),
    ("literatur", H2),
    ("literaturverzeichnis", H2),
    ("anhang", H2),
    // Spanish / Portuguese
    ("capítulo", H1),
    ("parte", H1),
    ("sección", H2),
    ("introducción", H2),
    ("conclusión", H2),
    ("conclusiones", H2),
    ("resumen", H2),
    ("referencias", H2),
    ("apéndice", H2),
    ("introdução", H2),
    ("conclusão", H2),
    // Russian
    ("глава", H1),
    ("часть", H1),
    ("раздел", H2),
    ("введение", H2),
    ("заключение", H2),
    ("литература", H2),
    ("приложение", H2),
    // Arabic
    ("الفصل", H1),
    ("فصل", H1),
    ("الباب", H1),
    ("الجزء", H1),
    ("مقدمة", H2),
    ("المقدمة", H2),
    ("الخلاصة", H2),
    ("خلاصة", H2),
    ("الخاتمة", H2),
    ("خاتمة", H2),
    ("ملخص", H2),
    ("الملخص", H2),
    ("المراجع", H2),
    ("الملحق", H2),
    // Hebrew
    ("פרק", H1),
    ("חלק", H1),
    ("מבוא", H2),
    ("סיכום", H2),
    ("מסקנות", H2),
    ("מקורות", H2),
    ("ביבליוגרפיה", H2),
    ("נספח", H2),
    // Chinese
    ("引言", H2),
    ("摘要", H2),
    ("结论", H2),
    ("結論", H2),
    ("参考文献", H2),
    ("附录", H2),
    ("概述", H2),
    // Japanese
    ("はじめに", H2),
    ("序論", H2),
    ("概要", H2),
    ("まとめ", H2),
    ("付録", H2),
    // Korean
    ("서론", H2),
    ("결론", H2),
    ("요약", H2),
    ("참고문헌", H2),
    ("부록", H2),
];

/// Find the level implied by a leading keyword of `text`.
///
/// `text` should already be normalized; matching is case-insensitive.
/// The longest matching keyword wins. A keyword must be followed by a
/// non-alphanumeric character (or the end of the text) unless it ends in
/// a character of a script written without word spaces.
///
/// Only short, label-like lines qualify: a keyword that opens a sentence
/// ("Part of the budget was reallocated.") is body text.
pub fn match_keyword(text: &str) -> Option<HeadingLevel> {
    let lowered = text.trim().to_lowercase();

    let (keyword, level) = HEADING_KEYWORDS
        .iter()
        .filter(|(keyword, _)| starts_with_word(&lowered, keyword))
        .max_by_key(|(keyword, _)| keyword.chars().count())?;

    let rest = lowered[keyword.len()..].trim();
    is_label_tail(rest).then_some(*level)
}

/// Check that what follows a keyword reads as a label, not a sentence.
fn is_label_tail(rest: &str) -> bool {
    if rest.chars().count() > MAX_TRAILING_CHARS
        || rest.split_whitespace().count() > MAX_TRAILING_WORDS
    {
        return false;
    }

    // "Results are shown below." ends like prose; "Chapter 3." does not
    let has_words = rest.chars().any(char::is_alphabetic);
    !(has_words && rest.ends_with('.'))
}

fn starts_with_word(text: &str, keyword: &str) -> bool {
    let Some(rest) = text.strip_prefix(keyword) else {
        return false;
    };

    let spaceless = keyword
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);

    spaceless
        || rest
            .chars()
            .next()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        for (keyword, _) in HEADING_KEYWORDS {
            assert_eq!(keyword.to_lowercase(), *keyword, "keyword {:?}", keyword);
        }
    }

    #[test]
    fn test_top_level_keywords() {
        assert_eq!(match_keyword("Chapter 3: Methods"), Some(H1));
        assert_eq!(match_keyword("PART II"), Some(H1));
        assert_eq!(match_keyword("Kapitel 2"), Some(H1));
        assert_eq!(match_keyword("الفصل الأول"), Some(H1));
        assert_eq!(match_keyword("פרק ראשון"), Some(H1));
    }

    #[test]
    fn test_secondary_keywords() {
        assert_eq!(match_keyword("Introduction"), Some(H2));
        assert_eq!(match_keyword("References"), Some(H2));
        assert_eq!(match_keyword("Résumé exécutif"), Some(H2));
        assert_eq!(match_keyword("Введение"), Some(H2));
        assert_eq!(match_keyword("مقدمة"), Some(H2));
        assert_eq!(match_keyword("摘要：本文"), Some(H2));
        assert_eq!(match_keyword("参考文献一覧"), Some(H2));
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(match_keyword("Partial results are shown"), None);
        assert_eq!(match_keyword("Sectional views"), None);
        assert_eq!(match_keyword("The introduction"), None);
        assert_eq!(match_keyword("Summary."), Some(H2));
    }

    #[test]
    fn test_sentences_are_not_headings() {
        assert_eq!(match_keyword("Part of the budget was reallocated."), None);
        assert_eq!(match_keyword("Results are shown below."), None);
        assert_eq!(
            match_keyword("Summary of every finding gathered over the course of the year"),
            None
        );
        assert_eq!(match_keyword("Results"), Some(H2));
        assert_eq!(match_keyword("Part 2"), Some(H1));
        assert_eq!(match_keyword("Chapter 3."), Some(H1));
        assert_eq!(match_keyword("Results and Discussion"), Some(H2));
    }

    #[test]
    fn test_longest_keyword_wins() {
        assert_eq!(match_keyword("Parte primera"), Some(H1));
        assert_eq!(match_keyword("Conclusiones finales"), Some(H2));
        assert_eq!(match_keyword("Introduction générale du rapport"), Some(H2));
    }
}
