use std::collections::{HashMap, HashSet};

use crate::insights::types::{
    ComplexityDistribution, ComplexityInsight, KeywordInsight, LanguageInsight,
    ReadabilityInsight, ReadabilityLevel, SemanticInsight, ThemeInsight,
};
use crate::summaries::Summary;

/// Keywords kept in the overview
pub const TOP_KEYWORDS: usize = 15;

/// Confidence floor reported for every theme
const THEME_CONFIDENCE: f64 = 0.8;

/// Counts keyed by label, remembering first-seen order so ties sort stably
struct Tally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> Tally<V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut V {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Aggregate per-document semantic fields into a corpus overview.
///
/// Pure and reentrant. Records without a given field simply don't
/// contribute to that section.
pub fn aggregate(summaries: &[Summary]) -> SemanticInsight {
    SemanticInsight {
        keywords: aggregate_keywords(summaries),
        themes: aggregate_themes(summaries),
        languages: aggregate_languages(summaries),
        complexity: aggregate_complexity(summaries),
        readability: aggregate_readability(summaries),
    }
}

fn aggregate_keywords(summaries: &[Summary]) -> Vec<KeywordInsight> {
    let mut tally: Tally<(u32, f64)> = Tally::new();

    for keywords in summaries.iter().filter_map(|s| s.keywords.as_ref()) {
        if keywords.is_empty() {
            continue;
        }
        let weight = 1.0 / keywords.len() as f64;
        for keyword in keywords {
            let (frequency, relevance) = tally.entry(keyword);
            *frequency += 1;
            *relevance += weight;
        }
    }

    let mut out: Vec<KeywordInsight> = tally
        .into_entries()
        .into_iter()
        .map(|(word, (frequency, relevance))| KeywordInsight {
            word,
            frequency,
            relevance,
        })
        .collect();
    // sort_by is stable: equal frequencies keep first-seen order
    out.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    out.truncate(TOP_KEYWORDS);
    out
}

fn aggregate_themes(summaries: &[Summary]) -> Vec<ThemeInsight> {
    let mut tally: Tally<u32> = Tally::new();

    for themes in summaries.iter().filter_map(|s| s.themes.as_ref()) {
        let mut seen = HashSet::new();
        for theme in themes {
            if seen.insert(theme.as_str()) {
                *tally.entry(theme) += 1;
            }
        }
    }

    let mut out: Vec<ThemeInsight> = tally
        .into_entries()
        .into_iter()
        .map(|(theme, document_count)| ThemeInsight {
            theme,
            confidence: THEME_CONFIDENCE,
            document_count,
        })
        .collect();
    out.sort_by(|a, b| b.document_count.cmp(&a.document_count));
    out
}

fn aggregate_languages(summaries: &[Summary]) -> Vec<LanguageInsight> {
    let mut tally: Tally<u32> = Tally::new();
    for language in summaries.iter().filter_map(|s| s.language.as_deref()) {
        *tally.entry(language) += 1;
    }

    let total = summaries.len() as f64;
    let mut out: Vec<LanguageInsight> = tally
        .into_entries()
        .into_iter()
        .map(|(language, document_count)| LanguageInsight {
            code: language.to_lowercase(),
            percentage: f64::from(document_count) / total * 100.0,
            language,
            document_count,
        })
        .collect();
    out.sort_by(|a, b| b.document_count.cmp(&a.document_count));
    out
}

fn aggregate_complexity(summaries: &[Summary]) -> ComplexityInsight {
    let mut distribution = ComplexityDistribution::default();
    let mut sum = 0.0;

    for score in summaries.iter().filter_map(|s| s.complexity_score) {
        sum += score;
        if score <= 3.0 {
            distribution.simple += 1;
        } else if score <= 6.0 {
            distribution.medium += 1;
        } else {
            distribution.complex += 1;
        }
    }

    let count = distribution.total();
    ComplexityInsight {
        average: if count == 0 { 0.0 } else { sum / f64::from(count) },
        distribution,
    }
}

fn aggregate_readability(summaries: &[Summary]) -> ReadabilityInsight {
    let scores: Vec<f64> = summaries.iter().filter_map(|s| s.readability_score).collect();
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    ReadabilityInsight {
        average,
        classification: ReadabilityLevel::from_score(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(id: i64) -> Summary {
        Summary::new(id, format!("doc{}.txt", id), "01/01/2026", "", "# a")
    }

    fn with_keywords(id: i64, words: &[&str]) -> Summary {
        let mut s = doc(id);
        s.keywords = Some(words.iter().map(|w| w.to_string()).collect());
        s
    }

    fn with_readability(id: i64, score: f64) -> Summary {
        let mut s = doc(id);
        s.readability_score = Some(score);
        s
    }

    #[test]
    fn test_empty_input() {
        let insight = aggregate(&[]);
        assert!(insight.keywords.is_empty());
        assert!(insight.themes.is_empty());
        assert!(insight.languages.is_empty());
        assert_eq!(insight.complexity.average, 0.0);
        assert_eq!(insight.complexity.distribution.total(), 0);
        assert_eq!(insight.readability.average, 0.0);
        assert_eq!(insight.readability.classification, ReadabilityLevel::VeryDifficult);
    }

    #[test]
    fn test_keyword_frequency_and_relevance() {
        let insight = aggregate(&[
            with_keywords(1, &["contract", "payment"]),
            with_keywords(2, &["contract", "term", "party", "risk"]),
        ]);

        let contract = &insight.keywords[0];
        assert_eq!(contract.word, "contract");
        assert_eq!(contract.frequency, 2);
        assert!((contract.relevance - 0.75).abs() < 1e-9);

        // Ties keep first-seen order
        let rest: Vec<&str> = insight.keywords[1..].iter().map(|k| k.word.as_str()).collect();
        assert_eq!(rest, vec!["payment", "term", "party", "risk"]);
    }

    #[test]
    fn test_keywords_capped_at_fifteen() {
        let words: Vec<String> = (0..20).map(|i| format!("word{}", i)).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut docs = vec![with_keywords(1, &refs)];
        docs.push(with_keywords(2, &["word19"]));

        let insight = aggregate(&docs);
        assert_eq!(insight.keywords.len(), TOP_KEYWORDS);
        assert_eq!(insight.keywords[0].word, "word19");
        assert_eq!(insight.keywords[0].frequency, 2);
    }

    #[test]
    fn test_theme_counted_once_per_document() {
        let mut a = doc(1);
        a.themes = Some(vec!["Legal".into(), "Legal".into(), "Finance".into()]);
        let mut b = doc(2);
        b.themes = Some(vec!["Finance".into()]);

        let insight = aggregate(&[a, b]);
        assert_eq!(insight.themes[0].theme, "Finance");
        assert_eq!(insight.themes[0].document_count, 2);
        assert_eq!(insight.themes[1].theme, "Legal");
        assert_eq!(insight.themes[1].document_count, 1);
        assert!(insight.themes.iter().all(|t| t.confidence == 0.8));
    }

    #[test]
    fn test_language_percentage_over_all_inputs() {
        let mut a = doc(1);
        a.language = Some("English".into());
        let mut b = doc(2);
        b.language = Some("English".into());
        let mut c = doc(3);
        c.language = Some("Portuguese".into());
        let d = doc(4);

        let insight = aggregate(&[a, b, c, d]);
        assert_eq!(insight.languages.len(), 2);
        assert_eq!(insight.languages[0].language, "English");
        assert_eq!(insight.languages[0].code, "english");
        assert_eq!(insight.languages[0].document_count, 2);
        assert!((insight.languages[0].percentage - 50.0).abs() < 1e-9);
        assert!((insight.languages[1].percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_buckets() {
        let scores = [1.0, 3.0, 3.5, 4.0, 6.0, 6.5, 7.0, 10.0];
        let docs: Vec<Summary> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let mut s = doc(i as i64);
                s.complexity_score = Some(score);
                s
            })
            .collect();

        let insight = aggregate(&docs);
        assert_eq!(
            insight.complexity.distribution,
            ComplexityDistribution {
                simple: 2,
                medium: 3,
                complex: 3
            }
        );
        let expected = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!((insight.complexity.average - expected).abs() < 1e-9);
    }

    #[test]
    fn test_readability_classification_samples() {
        let cases = [
            (85.0, ReadabilityLevel::VeryEasy),
            (65.0, ReadabilityLevel::Easy),
            (45.0, ReadabilityLevel::Moderate),
            (25.0, ReadabilityLevel::Difficult),
            (10.0, ReadabilityLevel::VeryDifficult),
        ];
        for (score, level) in cases {
            let insight = aggregate(&[with_readability(1, score)]);
            assert_eq!(insight.readability.classification, level, "score {}", score);
        }
    }

    #[test]
    fn test_readability_exact_thresholds() {
        assert_eq!(ReadabilityLevel::from_score(80.0), ReadabilityLevel::VeryEasy);
        assert_eq!(ReadabilityLevel::from_score(79.99), ReadabilityLevel::Easy);
        assert_eq!(ReadabilityLevel::from_score(60.0), ReadabilityLevel::Easy);
        assert_eq!(ReadabilityLevel::from_score(40.0), ReadabilityLevel::Moderate);
        assert_eq!(ReadabilityLevel::from_score(20.0), ReadabilityLevel::Difficult);
        assert_eq!(ReadabilityLevel::from_score(19.99), ReadabilityLevel::VeryDifficult);
    }

    #[test]
    fn test_readability_average_ignores_missing() {
        let insight = aggregate(&[with_readability(1, 70.0), doc(2), with_readability(3, 90.0)]);
        assert!((insight.readability.average - 80.0).abs() < 1e-9);
        assert_eq!(insight.readability.classification, ReadabilityLevel::VeryEasy);
    }

    proptest! {
        #[test]
        fn property_complexity_buckets_sum_to_scored_count(
            scores in proptest::collection::vec(proptest::option::of(0.0f64..=10.0), 0..40)
        ) {
            let docs: Vec<Summary> = scores
                .iter()
                .enumerate()
                .map(|(i, score)| {
                    let mut s = doc(i as i64);
                    s.complexity_score = *score;
                    s
                })
                .collect();

            let insight = aggregate(&docs);
            let scored = scores.iter().filter(|s| s.is_some()).count() as u32;
            prop_assert_eq!(insight.complexity.distribution.total(), scored);
        }

        #[test]
        fn property_language_counts_never_exceed_input(
            langs in proptest::collection::vec(
                proptest::option::of(prop_oneof!["English", "Portuguese", "Spanish"]),
                1..30,
            )
        ) {
            let docs: Vec<Summary> = langs
                .iter()
                .enumerate()
                .map(|(i, lang)| {
                    let mut s = doc(i as i64);
                    s.language = lang.clone();
                    s
                })
                .collect();

            let insight = aggregate(&docs);
            let counted: u32 = insight.languages.iter().map(|l| l.document_count).sum();
            let total_pct: f64 = insight.languages.iter().map(|l| l.percentage).sum();
            prop_assert!(counted as usize <= docs.len());
            prop_assert!(total_pct <= 100.0 + 1e-9);
        }
    }
}
