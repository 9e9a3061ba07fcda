//! Player name handling.
//!
//! - **normalize**: whitespace, capitalization and typo substitution
//! - **whitelist**: exact-then-fuzzy reconciliation against the roster

pub mod normalize;
pub mod whitelist;

pub use normalize::{apply_typo_fixes, canonicalize, normalize_name, TypoFix};
pub use whitelist::{
    reconcile_records, similarity, NameMatch, ReconciledRows, Reconciliation, UnmatchedName,
    WhitelistReconciler, EXACT_SCORE,
};

pub(crate) use whitelist::char_similarity;
