use crate::{
    Config,
    items::{Item, ItemKind, ItemStore, NewItem, Schedule},
    parse_input::{DateTextParser, ParseOptions, ParseResult},
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

pub struct Nalja {
    pub config: Config,
    parser: DateTextParser,
}

impl Nalja {
    /// Creates a new `Nalja` instance, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Creates a new `Nalja` instance with a specific `Config`.
    ///
    /// Compiles the parser once from the configured keywords and heuristics.
    pub fn with_config(config: Config) -> Result<Self> {
        let parser = DateTextParser::new(&config.keywords, config.heuristics)
            .context("building parser from config")?;
        Ok(Self { config, parser })
    }

    /// Parses `text` against the focused day `reference`, with the local clock as now.
    pub fn parse(&self, text: &str, reference: NaiveDateTime) -> ParseResult {
        self.parse_with(
            text,
            ParseOptions {
                reference: Some(reference),
                now: None,
            },
        )
    }

    /// Parses `text` with explicit reference and now clocks.
    pub fn parse_with(&self, text: &str, options: ParseOptions) -> ParseResult {
        self.parser.parse(text, options)
    }

    /// Turns a quick-add line into an item ready for storage.
    ///
    /// Returns `None` for blank input. Without a parsed date the item lands on
    /// the reference day. A to-do with a time is due at that time; an event
    /// with a time spans `config.event_duration` from it. Anything without a
    /// time is all-day.
    pub fn draft_item(&self, text: &str, kind: ItemKind, options: ParseOptions) -> Option<NewItem> {
        if text.trim().is_empty() {
            return None;
        }
        let parsed = self.parse_with(text, options);
        let date = parsed.parsed_date.unwrap_or_else(|| {
            options
                .reference
                .or(options.now)
                .unwrap_or_else(|| Local::now().naive_local())
        });

        let schedule = match (kind, parsed.has_time) {
            (_, false) => Schedule::AllDay,
            (ItemKind::Todo, true) => Schedule::At(date.time()),
            (ItemKind::Event, true) => {
                let start = date.time();
                let (end, _) = start.overflowing_add_signed(self.config.event_duration);
                Schedule::Span { start, end }
            }
        };

        Some(NewItem {
            content: parsed.clean_text,
            date,
            kind,
            schedule,
            completed: false,
        })
    }

    /// Drafts `text` and stores it for `user_id`. `Ok(None)` when there was nothing to add.
    pub fn submit<S: ItemStore>(
        &self,
        store: &mut S,
        user_id: &str,
        text: &str,
        kind: ItemKind,
        options: ParseOptions,
    ) -> Result<Option<Item>> {
        let Some(item) = self.draft_item(text, kind, options) else {
            return Ok(None);
        };
        let stored = store
            .create(user_id, item)
            .with_context(|| format!("saving {} for {user_id}", kind.as_ref()))?;
        Ok(Some(stored))
    }
}
