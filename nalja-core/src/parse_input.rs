use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cascade::{self, Clocks, Draft, Patterns, Stage};
use crate::heuristics::Heuristics;
use crate::keywords::Keywords;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static DEFAULT_PARSER: Lazy<DateTextParser> = Lazy::new(|| {
    DateTextParser::new(&Keywords::default(), Heuristics::default())
        .expect("built-in patterns compile")
});

/// Clocks for a single parse.
#[derive(Copy, Clone, Debug, Default)]
pub struct ParseOptions {
    /// The focused day. Seeds the working date and supplies the year for `M월 D일`.
    /// Defaults to `now`.
    pub reference: Option<NaiveDateTime>,
    /// The real current moment used by 오늘/내일/모레, weekdays, `N일 뒤` and the
    /// past-date check. Defaults to the local clock.
    pub now: Option<NaiveDateTime>,
}

/// What a quick-add line resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResult {
    /// Input with every matched fragment removed and whitespace collapsed.
    pub clean_text: String,
    /// `None` when neither a date nor a time matched; the caller picks its own default.
    pub parsed_date: Option<NaiveDateTime>,
    /// A time of day matched, not just a date.
    pub has_time: bool,
    /// Stages that fired, in cascade order.
    pub stages: Vec<Stage>,
}

/// Compiled Korean date/time cascade.
///
/// Building one compiles the keyword-dependent patterns; parsing afterwards
/// touches nothing but local state, so a parser can be shared freely.
#[derive(Debug)]
pub struct DateTextParser {
    patterns: Patterns,
    heuristics: Heuristics,
}

impl DateTextParser {
    pub fn new(keywords: &Keywords, heuristics: Heuristics) -> Result<Self> {
        Ok(Self {
            patterns: Patterns::new(keywords)?,
            heuristics,
        })
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Extracts a date and/or time from `text`.
    ///
    /// ```
    /// # use chrono::NaiveDate;
    /// # use nalja_core::keywords::Keywords;
    /// # use nalja_core::heuristics::Heuristics;
    /// # use nalja_core::parse_input::{DateTextParser, ParseOptions};
    /// let parser = DateTextParser::new(&Keywords::default(), Heuristics::default()).unwrap();
    /// let monday = NaiveDate::from_ymd_opt(2025, 12, 22).unwrap().and_hms_opt(9, 30, 0);
    /// let opts = ParseOptions { reference: monday, now: monday };
    ///
    /// let parsed = parser.parse("내일 오후 3시 회의", opts);
    ///
    /// assert_eq!(parsed.clean_text, "회의");
    /// assert_eq!(parsed.parsed_date, NaiveDate::from_ymd_opt(2025, 12, 23).unwrap().and_hms_opt(15, 0, 0));
    /// assert!(parsed.has_time);
    /// ```
    pub fn parse(&self, text: &str, options: ParseOptions) -> ParseResult {
        let now = options.now.unwrap_or_else(|| Local::now().naive_local());
        let reference = options.reference.unwrap_or(now);

        let mut draft = Draft::new(text, reference);
        cascade::run(&mut draft, Clocks { now, reference }, &self.patterns, &self.heuristics);

        let clean_text = WHITESPACE.replace_all(&draft.text, " ").trim().to_string();
        ParseResult {
            clean_text,
            parsed_date: (draft.has_date || draft.has_time).then_some(draft.date),
            has_time: draft.has_time,
            stages: draft.stages,
        }
    }
}

/// Parses `text` with the built-in keywords and heuristics.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nalja_core::parse_input::{parse_date_from_text, ParseOptions};
/// let reference = NaiveDate::from_ymd_opt(2025, 12, 22).unwrap().and_hms_opt(0, 0, 0);
/// let opts = ParseOptions { reference, now: reference };
///
/// let parsed = parse_date_from_text("15시에 유림테크에서 미팅", Some(opts));
///
/// assert_eq!(parsed.clean_text, "유림테크에서 미팅");
/// assert_eq!(parsed.parsed_date, NaiveDate::from_ymd_opt(2025, 12, 22).unwrap().and_hms_opt(15, 0, 0));
/// ```
pub fn parse_date_from_text(text: &str, options: Option<ParseOptions>) -> ParseResult {
    DEFAULT_PARSER.parse(text, options.unwrap_or_default())
}
