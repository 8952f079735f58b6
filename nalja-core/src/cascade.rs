//! The ordered stages of the quick-add parser.
//!
//! Every stage reads and writes one [`Draft`]. Stages run in [`CASCADE`] order
//! and a later stage overwrites whatever an earlier one put in the draft's
//! date, so `12월 27일 토요일` ends up with the date from `MonthDay`.
//!
//! | stage          | resolves against | matches                       |
//! |----------------|------------------|-------------------------------|
//! | RelativeDay    | now              | 오늘, 내일, 모레              |
//! | Weekday        | now              | [다음주/이번주] X요일          |
//! | RelativeOffset | now              | N일 뒤, N주 뒤                |
//! | MonthDay       | reference        | M월 D일                       |
//! | ClockTime      | draft            | 오전/오후 H시 [M[분]], HH:MM, H시 |

use std::ops::Range;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use strum_macros::{AsRefStr, EnumIter};

use crate::dates::{at_clock, roll_date, shift_days};
use crate::heuristics::Heuristics;
use crate::keywords::{Keyword, Keywords, RELATIVE_DAYS};

/// Weekday names indexed from Sunday (0) to Saturday (6).
pub const WEEKDAY_NAMES: [char; 7] = ['일', '월', '화', '수', '목', '금', '토'];

const DAYS_PER_WEEK: i64 = 7;

/// One matching step of the cascade, named in kebab-case for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    RelativeDay,
    Weekday,
    RelativeOffset,
    MonthDay,
    ClockTime,
}

/// Fixed stage order.
pub const CASCADE: [Stage; 5] = [
    Stage::RelativeDay,
    Stage::Weekday,
    Stage::RelativeOffset,
    Stage::MonthDay,
    Stage::ClockTime,
];

/// Which clock a stage resolves its date against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The real current moment, whatever reference the caller passed.
    Now,
    /// The caller's reference (the focused day).
    Reference,
    /// The draft as left by the earlier stages.
    Draft,
}

impl Stage {
    pub fn anchor(self) -> Anchor {
        match self {
            Stage::RelativeDay | Stage::Weekday | Stage::RelativeOffset => Anchor::Now,
            Stage::MonthDay => Anchor::Reference,
            Stage::ClockTime => Anchor::Draft,
        }
    }

    /// `true` for the stages that set a date rather than a time of day.
    pub fn sets_date(self) -> bool {
        !matches!(self, Stage::ClockTime)
    }
}

/// The two clocks a parse runs against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clocks {
    pub now: NaiveDateTime,
    pub reference: NaiveDateTime,
}

/// Mutable working state threaded through the cascade.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub text: String,
    pub date: NaiveDateTime,
    pub has_date: bool,
    pub has_time: bool,
    pub stages: Vec<Stage>,
}

impl Draft {
    pub fn new(text: &str, reference: NaiveDateTime) -> Self {
        Self {
            text: text.to_string(),
            date: reference,
            has_date: false,
            has_time: false,
            stages: Vec::new(),
        }
    }

    fn strip(&mut self, range: Range<usize>) {
        self.text.replace_range(range, "");
    }

    fn set_date(&mut self, stage: Stage, date: NaiveDateTime, range: Range<usize>) {
        debug!("{}: {:?} -> {}", stage.as_ref(), &self.text[range.clone()], date);
        self.date = date;
        self.strip(range);
        self.has_date = true;
    }

    fn set_time(&mut self, date: NaiveDateTime, range: Range<usize>) {
        debug!("{}: {:?} -> {}", Stage::ClockTime.as_ref(), &self.text[range.clone()], date);
        self.date = date;
        self.strip(range);
        self.has_time = true;
    }
}

static DAYS_LATER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*일\s*뒤").expect("valid days-later pattern"));
static WEEKS_LATER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*주\s*뒤").expect("valid weeks-later pattern"));
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2})\s*월\s*([0-9]{1,2})\s*일").expect("valid month-day pattern")
});
static COLON_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2}):([0-9]{2})").expect("valid colon-time pattern"));
static BARE_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})\s*시(?:에)?").expect("valid bare-hour pattern"));

/// Patterns that depend on the keyword registry.
#[derive(Debug)]
pub(crate) struct Patterns {
    relative_days: Vec<(Keyword, Regex)>,
    weekday: Regex,
    meridiem_time: Regex,
}

impl Patterns {
    pub fn new(keywords: &Keywords) -> Result<Self> {
        let relative_days = RELATIVE_DAYS
            .iter()
            .map(|&keyword| {
                Regex::new(&keywords.pattern(keyword))
                    .map(|re| (keyword, re))
                    .with_context(|| format!("compiling pattern for {}", keyword.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;

        let weekday = format!(
            r"(?:(?P<next>{})|(?P<this>{}))?\s*(?P<day>[{}])요일",
            keywords.pattern(Keyword::NextWeek),
            keywords.pattern(Keyword::ThisWeek),
            WEEKDAY_NAMES.iter().collect::<String>(),
        );
        let meridiem_time = format!(
            r"(?:(?P<am>{})|(?P<pm>{}))\s*(?P<hour>[0-9]{{1,2}})\s*시\s*(?P<minute>[0-9]{{1,2}})?\s*분?",
            keywords.pattern(Keyword::Am),
            keywords.pattern(Keyword::Pm),
        );

        Ok(Self {
            relative_days,
            weekday: Regex::new(&weekday).context("compiling weekday pattern")?,
            meridiem_time: Regex::new(&meridiem_time).context("compiling meridiem pattern")?,
        })
    }
}

/// Runs every stage over `draft` in [`CASCADE`] order.
pub(crate) fn run(draft: &mut Draft, clocks: Clocks, patterns: &Patterns, heuristics: &Heuristics) {
    for stage in CASCADE {
        // A relative-day keyword settles the date on its own.
        if stage.sets_date()
            && stage != Stage::RelativeDay
            && draft.stages.contains(&Stage::RelativeDay)
        {
            continue;
        }
        let fired = match stage {
            Stage::RelativeDay => relative_day(draft, clocks, patterns),
            Stage::Weekday => weekday(draft, clocks, patterns),
            Stage::RelativeOffset => relative_offset(draft, clocks),
            Stage::MonthDay => month_day(draft, clocks, heuristics),
            Stage::ClockTime => clock_time(draft, patterns, heuristics),
        };
        if fired {
            draft.stages.push(stage);
        }
    }
}

fn relative_day(draft: &mut Draft, clocks: Clocks, patterns: &Patterns) -> bool {
    for (keyword, re) in &patterns.relative_days {
        let Some(m) = re.find(&draft.text) else {
            continue;
        };
        let Some(date) = keyword
            .day_offset()
            .and_then(|days| shift_days(clocks.now, days))
        else {
            continue;
        };
        let range = m.range();
        draft.set_date(Stage::RelativeDay, date, range);
        return true;
    }
    false
}

fn weekday(draft: &mut Draft, clocks: Clocks, patterns: &Patterns) -> bool {
    let Some(caps) = patterns.weekday.captures(&draft.text) else {
        return false;
    };
    let Some(target) = caps
        .name("day")
        .and_then(|m| m.as_str().chars().next())
        .and_then(|day| WEEKDAY_NAMES.iter().position(|&name| name == day))
    else {
        return false;
    };

    let today = i64::from(clocks.now.weekday().num_days_from_sunday());
    let mut diff = target as i64 - today;
    if diff <= 0 {
        diff += DAYS_PER_WEEK;
    }
    // On top of the nearest occurrence, even when that is already next week.
    if caps.name("next").is_some() {
        diff += DAYS_PER_WEEK;
    }

    let range = whole(&caps);
    match shift_days(clocks.now, diff) {
        Some(date) => {
            draft.set_date(Stage::Weekday, date, range);
            true
        }
        None => false,
    }
}

fn relative_offset(draft: &mut Draft, clocks: Clocks) -> bool {
    let mut fired = false;
    for (re, days_per_unit) in [(&*DAYS_LATER, 1), (&*WEEKS_LATER, DAYS_PER_WEEK)] {
        let Some(caps) = re.captures(&draft.text) else {
            continue;
        };
        let Some(date) = number(caps.get(1))
            .and_then(|n| n.checked_mul(days_per_unit))
            .and_then(|days| shift_days(clocks.now, days))
        else {
            continue;
        };
        let range = whole(&caps);
        draft.set_date(Stage::RelativeOffset, date, range);
        fired = true;
    }
    fired
}

fn month_day(draft: &mut Draft, clocks: Clocks, heuristics: &Heuristics) -> bool {
    let Some(caps) = MONTH_DAY.captures(&draft.text) else {
        return false;
    };
    let (Some(month), Some(day)) = (number(caps.get(1)), number(caps.get(2))) else {
        return false;
    };

    let mut year = clocks.reference.year();
    let Some(candidate) = roll_date(year, month, day) else {
        return false;
    };
    let elapsed = clocks.now - candidate.and_time(NaiveTime::MIN);
    if Duration::try_days(heuristics.past_rollover_days).is_some_and(|limit| elapsed > limit) {
        year += 1;
    }

    let Some(date) = roll_date(year, month, day) else {
        return false;
    };
    let range = whole(&caps);
    let time = draft.date.time();
    draft.set_date(Stage::MonthDay, date.and_time(time), range);
    true
}

fn clock_time(draft: &mut Draft, patterns: &Patterns, heuristics: &Heuristics) -> bool {
    let found = if let Some(caps) = patterns.meridiem_time.captures(&draft.text) {
        number(caps.name("hour")).map(|hour| {
            let minute = number(caps.name("minute")).unwrap_or(0);
            let hour = match (caps.name("am").is_some(), hour) {
                (true, 12) => 0,
                (false, h) if h < 12 => h + 12,
                (_, h) => h,
            };
            (hour, minute, whole(&caps))
        })
    } else if let Some(caps) = COLON_TIME.captures(&draft.text) {
        number(caps.get(1))
            .zip(number(caps.get(2)))
            .map(|(hour, minute)| (hour, minute, whole(&caps)))
    } else if let Some(caps) = BARE_HOUR.captures(&draft.text) {
        number(caps.get(1)).map(|hour| {
            let hour = heuristics.bare_hour(hour as u32);
            (i64::from(hour), 0, whole(&caps))
        })
    } else {
        None
    };

    let Some((hour, minute, range)) = found else {
        return false;
    };
    match at_clock(draft.date, hour, minute) {
        Some(date) => {
            draft.set_time(date, range);
            true
        }
        None => false,
    }
}

fn whole(caps: &Captures) -> Range<usize> {
    caps.get(0).map(|m| m.range()).unwrap_or(0..0)
}

fn number(m: Option<regex::Match>) -> Option<i64> {
    m.and_then(|m| m.as_str().parse().ok())
}
