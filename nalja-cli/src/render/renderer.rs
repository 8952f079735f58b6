use std::fmt::Write;

use chrono::NaiveDateTime;
use nalja_core::{NewItem, ParseResult, Schedule};
use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

#[derive(Clone)]
pub struct RenderOptions {
    pub datetime_format: String,
    pub use_color: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(opts: RenderOptions) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.table.set_fg(Color::Magenta);
        skin.bullet.set_fg(Color::Cyan);
        Self { skin, opts }
    }

    pub fn print_md(&self, md: &str) {
        self.skin.print_text(md);
    }

    pub fn print_info(&self, message: &str) {
        if self.opts.use_color {
            let md = format!("|-|\n| {message} |\n|-|\n");
            self.skin.print_text(&md);
        } else {
            println!("{message}");
        }
    }

    /// `2025-12-23 15:00 [timed] - 회의`
    pub fn print_result(&self, parsed: &ParseResult) {
        let (mut date, mut marker) = match parsed.parsed_date {
            Some(d) => {
                let marker = if parsed.has_time { "timed" } else { "all day" };
                (self.format_date(d), marker.to_string())
            }
            None => ("no date".to_string(), "-".to_string()),
        };
        let mut title = if parsed.clean_text.is_empty() {
            "(empty)".to_string()
        } else {
            parsed.clean_text.clone()
        };
        if self.opts.use_color {
            date = date.with(Color::Cyan).to_string();
            marker = marker.with(Color::Blue).to_string();
            title = title.with(Color::Yellow).to_string();
        }
        println!("{date} [{marker}] - {title}");
    }

    fn format_date(&self, date: NaiveDateTime) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.opts.datetime_format)).is_err() {
            return date.to_string();
        }
        out
    }

    pub fn print_item(&self, item: &NewItem) {
        let schedule = match item.schedule {
            Schedule::AllDay => "all day".to_string(),
            Schedule::At(t) => format!("at {}", t.format("%H:%M")),
            Schedule::Span { start, end } => {
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
            }
        };
        let line = format!(
            "{} on {}, {}: {}",
            item.kind.as_ref(),
            item.date.format("%Y-%m-%d"),
            schedule,
            item.content
        );
        if self.opts.use_color {
            self.print_md(&format!("* *{line}*"));
        } else {
            println!("  {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn renderer(datetime_format: &str) -> Renderer {
        Renderer::new(RenderOptions {
            datetime_format: datetime_format.to_string(),
            use_color: false,
        })
    }

    #[test]
    fn formats_with_configured_format() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 23).unwrap().and_hms_opt(15, 0, 0).unwrap();
        assert_eq!(renderer("%m/%d %H:%M").format_date(d), "12/23 15:00");
    }

    #[test]
    fn unrenderable_format_falls_back() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 23).unwrap().and_hms_opt(15, 0, 0).unwrap();
        assert_eq!(renderer("%Q").format_date(d), "2025-12-23 15:00:00");
    }
}
