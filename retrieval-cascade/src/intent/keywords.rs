/// Curated keyword lists for rule-level intent classification. Kept
/// as plain string slices so a caller can override them wholesale by
/// constructing a [`super::IntentKeywords`] directly, without touching code.
pub const FACTUAL_KEYWORDS: &[&str] = &[
    "what is", "define", "definition", "meaning of", "explain", "是什么", "定义", "什么意思",
];

pub const TEMPORAL_KEYWORDS: &[&str] = &[
    "when", "before", "after", "since", "until", "history of", "timeline", "什么时候", "之前", "之后", "历史",
];

pub const RELATIONAL_KEYWORDS: &[&str] = &[
    "relationship", "relation", "connect", "between", "compare", "versus", "vs", "关系", "联系", "之间",
];
