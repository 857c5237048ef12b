use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;
use crate::semantics::provider::{SemanticAnalyzer, SemanticFields};

/// Characters outside word/space/basic punctuation become spaces
static CLEAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,;:!?\-]").unwrap());

/// Very long words, heavy punctuation and formal connectives push complexity up
static COMPLEXITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b\w{12,}\b").unwrap(),
        Regex::new(r"[;:]").unwrap(),
        Regex::new(
            r"\b(todavia|outrossim|não obstante|conquanto|porquanto|notwithstanding|whereas|hereinafter|nevertheless)\b",
        )
        .unwrap(),
    ]
});

const STOP_WORDS: &[&str] = &[
    // Portuguese
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "e", "ou", "mas", "que", "de", "do", "da",
    "dos", "das", "em", "no", "na", "nos", "nas", "por", "para", "com", "se", "é", "são", "foi",
    "foram", "ser", "estar", "ter", "haver", "este", "esta", "estes", "estas", "esse", "essa",
    "esses", "essas", "aquele", "aquela", "aqueles", "aquelas", "seu", "sua", "seus", "suas",
    "meu", "minha", "meus", "minhas", "nosso", "nossa", "nossos", "nossas", "muito", "mais",
    "menos", "bem", "mal", "melhor", "pior", "quando", "onde", "como", "porque", "porquê", "qual",
    "quais", "já", "ainda", "sempre", "nunca", "também", "só", "apenas", "pode", "podem",
    "poderia", "poderiam", "deve", "devem",
    // English
    "the", "and", "for", "are", "with", "this", "that", "have", "from", "will", "shall", "been",
    "were", "which", "their", "there", "these", "those", "into", "such", "than", "then",
];

const THEMES: &[(&str, &[&str])] = &[
    (
        "Technology",
        &["tecnologia", "software", "sistema", "digital", "computador", "internet", "technology", "computer"],
    ),
    (
        "Business",
        &["empresa", "negócio", "mercado", "vendas", "cliente", "produto", "company", "business", "market", "customer"],
    ),
    (
        "Education",
        &["ensino", "aprendizagem", "escola", "universidade", "curso", "estudante", "school", "university", "student"],
    ),
    (
        "Health",
        &["saúde", "médico", "tratamento", "paciente", "hospital", "medicina", "health", "patient", "treatment"],
    ),
    (
        "Finance",
        &["dinheiro", "investimento", "banco", "financeiro", "economia", "capital", "investment", "bank", "financial"],
    ),
    (
        "Legal",
        &["lei", "direito", "jurídico", "advogado", "tribunal", "processo", "contract", "court", "clause", "law"],
    ),
    (
        "Marketing",
        &["marketing", "publicidade", "marca", "campanha", "propaganda", "comunicação", "brand", "campaign"],
    ),
    (
        "Human Resources",
        &["funcionário", "contratação", "rh", "treinamento", "carreira", "salário", "employee", "salary", "hiring"],
    ),
];

const PORTUGUESE_INDICATORS: &[&str] = &["que", "não", "com", "uma", "para", "são", "dos", "mais"];
const ENGLISH_INDICATORS: &[&str] = &["the", "and", "for", "are", "with", "this", "have", "from"];
const SPANISH_INDICATORS: &[&str] = &["que", "con", "una", "para", "son", "los", "más", "como"];

const POSITIVE_CUES: &[&str] = &[
    "bom", "ótimo", "excelente", "positivo", "sucesso", "importante", "melhor", "good", "great",
    "excellent", "success",
];
const NEGATIVE_CUES: &[&str] = &[
    "ruim", "péssimo", "problema", "erro", "falha", "negativo", "pior", "bad", "problem", "error",
    "failure",
];

const VOWELS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'á', 'é', 'í', 'ó', 'ú', 'â', 'ê', 'ô', 'à', 'ã', 'õ',
];

/// Local, rule-based analyzer: keyword frequency, cue-word themes, indicator-word
/// language detection, and Flesch-style readability. No network, no model.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze_text(&self, text: &str) -> SemanticFields {
        let cleaned = clean_text(text);
        let words = tokenize(&cleaned);

        SemanticFields {
            keywords: extract_keywords(&words),
            themes: identify_themes(&cleaned),
            language: detect_language(&words).to_string(),
            complexity_score: complexity(&cleaned, &words),
            readability_score: readability(&cleaned, &words),
            word_count: words.len() as u64,
            sentiment_score: sentiment(&cleaned),
        }
    }
}

#[async_trait]
impl SemanticAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SemanticFields> {
        Ok(self.analyze_text(text))
    }
}

fn clean_text(text: &str) -> String {
    CLEAN_REGEX.replace_all(text, " ").to_lowercase()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Top 10 non-stop-words longer than 3 bytes; ties keep first appearance
fn extract_keywords(words: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words.iter().enumerate() {
        if word.len() > 3 && !STOP_WORDS.contains(&word.as_str()) {
            counts.entry(word.as_str()).or_insert((0, position)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(10)
        .map(|(word, _)| word.to_string())
        .collect()
}

fn identify_themes(text: &str) -> Vec<String> {
    THEMES
        .iter()
        .filter(|(_, cues)| cues.iter().filter(|cue| text.contains(*cue)).count() >= 2)
        .map(|(name, _)| name.to_string())
        .collect()
}

fn detect_language(words: &[String]) -> &'static str {
    if words.is_empty() {
        return "Unknown";
    }
    let ratio = |indicators: &[&str]| {
        words
            .iter()
            .filter(|w| indicators.contains(&w.as_str()))
            .count() as f64
            / words.len() as f64
    };

    let pt = ratio(PORTUGUESE_INDICATORS);
    let en = ratio(ENGLISH_INDICATORS);
    let es = ratio(SPANISH_INDICATORS);

    if pt > en && pt > es {
        "Portuguese"
    } else if en > es {
        "English"
    } else if es > 0.0 {
        "Spanish"
    } else {
        "Unknown"
    }
}

/// 1..=10, built from word length, sentence length, pattern hits and vocabulary spread
fn complexity(text: &str, words: &[String]) -> f64 {
    if words.is_empty() {
        return 1.0;
    }
    let word_count = words.len() as f64;
    let mut score = 1.0;

    let avg_word_len = words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / word_count;
    score += (avg_word_len - 4.0).max(0.0) * 0.5;

    let sentences = text.split(['.', '!', '?']).count() as f64;
    score += (word_count / sentences - 15.0).max(0.0) * 0.1;

    for pattern in COMPLEXITY_PATTERNS.iter() {
        score += pattern.find_iter(text).count() as f64 * 0.3;
    }

    let unique = words.iter().collect::<HashSet<_>>().len() as f64;
    score += unique / word_count * 2.0;

    score.clamp(1.0, 10.0)
}

/// Adapted Flesch reading ease, 0..=100; 50 when there is nothing to measure
fn readability(text: &str, words: &[String]) -> f64 {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count() as f64;
    let word_count = words.len() as f64;
    if sentences == 0.0 || word_count == 0.0 {
        return 50.0;
    }

    let syllables = words.iter().map(|w| count_syllables(w)).sum::<usize>() as f64;
    let flesch = 248.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables / word_count);
    flesch.clamp(0.0, 100.0)
}

fn count_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars().flat_map(char::to_lowercase) {
        let vowel = VOWELS.contains(&c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    count.max(1)
}

/// (positive - negative cue hits) / words, clamped to -1..=1
fn sentiment(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let hits = |cues: &[&str]| {
        cues.iter()
            .map(|cue| words.iter().filter(|w| w.contains(cue)).count())
            .sum::<usize>() as f64
    };

    ((hits(POSITIVE_CUES) - hits(NEGATIVE_CUES)) / words.len() as f64).clamp(-1.0, 1.0)
}
