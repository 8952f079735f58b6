use std::collections::HashMap;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Canonical Korean spellings the cascade knows about.
///
/// `as_ref()` yields the canonical spelling and `"내일".parse::<Keyword>()`
/// goes the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString, IntoStaticStr)]
pub enum Keyword {
    #[strum(serialize = "오늘")]
    Today,
    #[strum(serialize = "내일")]
    Tomorrow,
    #[strum(serialize = "모레")]
    DayAfterTomorrow,
    #[strum(serialize = "다음주")]
    NextWeek,
    #[strum(serialize = "이번주")]
    ThisWeek,
    #[strum(serialize = "오전")]
    Am,
    #[strum(serialize = "오후")]
    Pm,
}

/// Relative-day keywords in the order they are tried.
pub const RELATIVE_DAYS: [Keyword; 3] = [Keyword::Today, Keyword::Tomorrow, Keyword::DayAfterTomorrow];

impl Keyword {
    /// Days from now for the relative-day keywords, `None` for the rest.
    pub fn day_offset(self) -> Option<i64> {
        match self {
            Keyword::Today => Some(0),
            Keyword::Tomorrow => Some(1),
            Keyword::DayAfterTomorrow => Some(2),
            _ => None,
        }
    }
}

/// Spelling → keyword registry.
///
/// Seeded with every canonical spelling. User synonyms (`[synonyms]` in
/// `config.toml`) are added with [`extend`](Self::extend) before a parser is
/// built from the registry; a built parser never sees later changes.
///
/// Keys are stored lowercased so ASCII aliases such as `tmrw` match in any case.
#[derive(Debug, Clone)]
pub struct Keywords {
    registry: HashMap<String, Keyword>,
}

impl Default for Keywords {
    fn default() -> Self {
        let registry = Keyword::iter()
            .map(|keyword| (keyword.as_ref().to_string(), keyword))
            .collect();
        Self { registry }
    }
}

impl Keywords {
    /// Extends the registry with `(alias, target)` pairs.
    ///
    /// The `target` must already be known (a canonical spelling or an alias
    /// added earlier); unknown targets are skipped. An alias equal to a
    /// canonical spelling is skipped too, so `오늘 = "내일"` cannot remap today.
    ///
    /// ```
    /// # use nalja_core::keywords::{Keyword, Keywords};
    /// let mut keywords = Keywords::default();
    /// keywords.extend(&[("낼".into(), "내일".into())]);
    /// assert!(keywords.matches(Keyword::Tomorrow, "낼"));
    /// ```
    pub fn extend(&mut self, synonyms: &[(String, String)]) {
        for (alias, target) in synonyms {
            let alias = alias.trim().to_lowercase();
            if alias.is_empty() || Self::is_canonical(&alias) {
                continue;
            }
            if let Some(&canonical) = self.registry.get(&target.trim().to_lowercase()) {
                self.registry.insert(alias, canonical);
            }
        }
    }

    /// Returns `true` if `word` is a canonical spelling (eg "내일").
    pub fn is_canonical(word: &str) -> bool {
        Keyword::iter().any(|keyword| keyword.as_ref() == word)
    }

    /// The keyword `input` stands for, if any.
    pub fn lookup(&self, input: &str) -> Option<Keyword> {
        self.registry.get(&input.trim().to_lowercase()).copied()
    }

    /// Returns `true` if `input` is the canonical spelling of `keyword` or one of its aliases.
    pub fn matches(&self, keyword: Keyword, input: &str) -> bool {
        self.lookup(input).is_some_and(|found| found == keyword)
    }

    /// Every spelling of `keyword`, longest first, so regex alternation
    /// prefers `내일날` over its prefix `내일`. Ties are ordered by text.
    pub fn aliases(&self, keyword: Keyword) -> Vec<&str> {
        let canonical: &'static str = keyword.into();
        let mut aliases: Vec<&str> = self
            .registry
            .iter()
            .filter(|&(spelling, &found)| found == keyword && spelling != canonical)
            .map(|(spelling, _)| spelling.as_str())
            .collect();
        aliases.push(canonical);
        aliases.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        aliases
    }

    /// Case-insensitive regex alternation over [`aliases`](Self::aliases).
    pub fn pattern(&self, keyword: Keyword) -> String {
        let alternation = self
            .aliases(keyword)
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        format!("(?i:{alternation})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canonicals() {
        let keywords = Keywords::default();
        assert!(keywords.matches(Keyword::Today, "오늘"));
        assert!(keywords.matches(Keyword::DayAfterTomorrow, "모레"));
        assert!(!keywords.matches(Keyword::Today, "내일"));
        assert_eq!(keywords.lookup("오후"), Some(Keyword::Pm));
    }

    #[test]
    fn canonical_spelling_round_trips_through_strum() {
        assert_eq!("다음주".parse::<Keyword>().unwrap(), Keyword::NextWeek);
        assert_eq!(Keyword::Am.as_ref(), "오전");
        assert!(Keywords::is_canonical("이번주"));
        assert!(!Keywords::is_canonical("담주"));
    }

    #[test]
    fn synonyms_extend() {
        let mut keywords = Keywords::default();
        keywords.extend(&[
            ("낼".into(), "내일".into()),
            ("담주".into(), "다음주".into()),
            ("TMRW".into(), "내일".into()),
        ]);
        assert!(keywords.matches(Keyword::Tomorrow, "낼"));
        assert!(keywords.matches(Keyword::NextWeek, "담주"));
        assert!(keywords.matches(Keyword::Tomorrow, "tmrw"));
        assert!(keywords.matches(Keyword::Tomorrow, "Tmrw"));
    }

    #[test]
    fn synonym_of_synonym_resolves_to_canonical() {
        let mut keywords = Keywords::default();
        keywords.extend(&[("낼".into(), "내일".into())]);
        keywords.extend(&[("nal".into(), "낼".into())]);
        assert!(keywords.matches(Keyword::Tomorrow, "nal"));
    }

    #[test]
    fn unknown_target_is_ignored() {
        let mut keywords = Keywords::default();
        keywords.extend(&[("어제".into(), "yesterday".into())]);
        assert_eq!(keywords.lookup("어제"), None);
    }

    #[test]
    fn canonical_alias_cannot_be_remapped() {
        let mut keywords = Keywords::default();
        keywords.extend(&[("오늘".into(), "내일".into())]);
        assert!(keywords.matches(Keyword::Today, "오늘"));
    }

    #[test]
    fn aliases_are_longest_first() {
        let mut keywords = Keywords::default();
        keywords.extend(&[("낼".into(), "내일".into()), ("내일날".into(), "내일".into())]);
        assert_eq!(keywords.aliases(Keyword::Tomorrow), vec!["내일날", "내일", "낼"]);
        assert_eq!(keywords.aliases(Keyword::Today), vec!["오늘"]);
    }

    #[test]
    fn pattern_escapes_aliases() {
        let mut keywords = Keywords::default();
        keywords.extend(&[("p.m".into(), "오후".into())]);
        assert_eq!(keywords.pattern(Keyword::Pm), r"(?i:p\.m|오후)");
    }
}
