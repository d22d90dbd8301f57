//! Text normalization for dedup keys and vectorization input.
//!
//! Two policies are available and chosen independently per deployment:
//! - [`Normalization::Light`]: trim and lowercase, nothing else
//! - [`Normalization::Full`]: tokenize, drop stopwords, reduce each token to its stem
//!
//! Both are pure functions of their input.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use serde::Deserialize;

/// Tokens shorter than this are not considered terms
const MIN_TOKEN_CHARS: usize = 2;

/// English stopwords: the scikit-learn list plus the NLTK contraction stems
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "ain", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "aren", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot",
    "cant", "co", "con", "could", "couldn", "couldnt", "cry", "de", "describe", "detail", "did",
    "didn", "do", "does", "doesn", "doing", "don", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty", "fill",
    "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found", "four", "from",
    "front", "full", "further", "get", "give", "go", "had", "hadn", "has", "hasn", "hasnt", "have",
    "haven", "having", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in",
    "inc", "indeed", "interest", "into", "is", "isn", "it", "its", "itself", "just", "keep", "last",
    "latter", "latterly", "least", "less", "ll", "ltd", "ma", "made", "many", "may", "me",
    "meanwhile", "might", "mightn", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "mustn", "my", "myself", "name", "namely", "needn", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps",
    "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
    "several", "shan", "she", "should", "shouldn", "show", "side", "since", "sincere", "six",
    "sixty", "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards",
    "twelve", "twenty", "two", "un", "under", "until", "up", "upon", "us", "ve", "very", "via",
    "was", "wasn", "we", "well", "were", "weren", "what", "whatever", "when", "whence", "whenever",
    "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
    "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "won", "would", "wouldn", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Normalization policy applied to article text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Trim and lowercase only
    Light,
    /// Tokenize, remove stopwords, stem
    Full,
}

impl Normalization {
    pub fn apply(self, text: &str) -> String {
        match self {
            Normalization::Light => light(text),
            Normalization::Full => full(text),
        }
    }
}

/// Trim and lowercase.
pub fn light(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Lowercased alphanumeric tokens with stopwords removed and stems applied,
/// joined by single spaces. Empty input yields an empty string.
pub fn full(text: &str) -> String {
    let stemmer = Stemmer::create(Algorithm::English);
    tokenize(text)
        .filter(|token| !is_stop_word(token))
        .map(|token| stemmer.stem(&token).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits text into lowercased runs of alphanumeric characters, dropping
/// anything shorter than two characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
