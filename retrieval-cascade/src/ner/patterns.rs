use std::sync::LazyLock;

use regex::Regex;
use retrieval_core::entity::EntityType;

/// Runs of capitalized words, the common shape of an English proper noun
/// span ("New York", "Acme Corp").
pub static RE_CAPITALIZED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*\b").expect("valid regex")
});

/// Runs of two to four CJK ideographs — the common shape of a Chinese
/// personal name or short place/organization name.
pub static RE_CJK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]{2,4}").expect("valid regex"));

const ORG_SUFFIXES_EN: &[&str] = &["Inc", "Corp", "Company", "University", "Institute", "Group"];
const LOC_SUFFIXES_EN: &[&str] = &["City", "River", "Mountain", "Island", "County"];

const ORG_SUFFIXES_CJK: &[&str] = &["公司", "集团", "大学", "学院", "政府"];
const LOC_SUFFIXES_CJK: &[&str] = &["市", "省", "国", "路", "街", "区", "县"];

/// Classifies a capitalized English span by a handful of common suffixes,
/// defaulting to PERSON for short spans and TOPIC for longer ones.
pub fn classify_english_span(span: &str) -> EntityType {
    if ORG_SUFFIXES_EN.iter().any(|s| span.ends_with(s)) {
        EntityType::Organization
    } else if LOC_SUFFIXES_EN.iter().any(|s| span.ends_with(s)) {
        EntityType::Location
    } else if span.split_whitespace().count() <= 3 {
        EntityType::Person
    } else {
        EntityType::Topic
    }
}

/// Classifies a CJK span by common organization/location suffix characters,
/// defaulting to PERSON for the canonical two-character name length and
/// TOPIC otherwise.
pub fn classify_cjk_span(span: &str) -> EntityType {
    if ORG_SUFFIXES_CJK.iter().any(|s| span.ends_with(s)) {
        EntityType::Organization
    } else if LOC_SUFFIXES_CJK.iter().any(|s| span.ends_with(s)) {
        EntityType::Location
    } else if span.chars().count() == 2 {
        EntityType::Person
    } else {
        EntityType::Topic
    }
}
