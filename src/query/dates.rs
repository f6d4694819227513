//! Date range resolution
//!
//! Every expression is resolved against an explicit reference date, never
//! against the system clock. Span matchers are tried in order and the first
//! one that recognizes something decides the result.
//!
//! Weekday policy:
//! - `last <day>`: most recent such day strictly before the reference
//! - `next <day>`: first such day strictly after the reference
//! - `this <day>` and a bare `<day>`: that day in the Monday–Sunday week
//!   containing the reference

use super::confidence::WEIGHTS;
use super::error::{InterpretationError, MAX_SPAN_DAYS};
use super::text::{
    HEDGE_WORDS, contains_any_word, month_from_name, number_from_word, weekday_from_name,
};
use crate::models::DateSpan;
use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// How to read an all-numeric date whose components are both ≤ 12
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// 10/05/2025 is October 5th
    #[default]
    MonthFirst,
    /// 10/05/2025 is May 10th
    DayFirst,
}

/// How a date was obtained, from least to most trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precision {
    Weekday,
    Counted,
    Keyword,
    Absolute,
}

impl Precision {
    fn confidence(self) -> f64 {
        match self {
            Self::Weekday => WEIGHTS.date_weekday,
            Self::Counted => WEIGHTS.date_counted,
            Self::Keyword => WEIGHTS.date_keyword,
            Self::Absolute => WEIGHTS.date_absolute,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Resolved {
    start: NaiveDate,
    end: NaiveDate,
    precision: Precision,
}

impl Resolved {
    fn day(day: NaiveDate, precision: Precision) -> Self {
        Self {
            start: day,
            end: day,
            precision,
        }
    }
}

type Resolution = Option<Result<Resolved, InterpretationError>>;
type SpanMatcher = fn(&DateRangeExtractor, &str, NaiveDate) -> Resolution;

/// Tried in order; `None` means "not recognized, try the next one"
const SPAN_MATCHERS: &[(&str, SpanMatcher)] = &[
    ("explicit_range", DateRangeExtractor::explicit_range),
    ("day_offset", DateRangeExtractor::day_offset),
    ("counted_days", DateRangeExtractor::counted_days),
    ("week_span", DateRangeExtractor::week_span),
    ("relative_keyword", DateRangeExtractor::relative_keyword),
    ("weekday_reference", DateRangeExtractor::weekday_reference),
    ("absolute_dates", DateRangeExtractor::absolute_dates),
];

/// Resolvers for one endpoint of an explicit range, tried in order
const DAY_RESOLVERS: &[SpanMatcher] = &[
    DateRangeExtractor::day_offset,
    DateRangeExtractor::relative_keyword,
    DateRangeExtractor::weekday_reference,
    DateRangeExtractor::iso_date,
    DateRangeExtractor::numeric_date,
    DateRangeExtractor::month_day_date,
    DateRangeExtractor::day_month_date,
];

const MONTH: &str = concat!(
    r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
    r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?",
);
const WEEKDAY: &str = concat!(
    r"(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday",
    r"|mon|tues?|wed|thu(?:rs?)?|fri|sat|sun)",
);
const ORDINAL: &str = r"(?:st|nd|rd|th)?";

fn absolute_expr() -> String {
    format!(
        concat!(
            r"\d{{4}}-\d{{1,2}}-\d{{1,2}}",
            r"|\d{{1,2}}/\d{{1,2}}(?:/(?:\d{{4}}|\d{{2}}))?",
            r"|\d{{1,2}}-\d{{1,2}}-\d{{4}}",
            r"|{MONTH}\s+\d{{1,2}}{ORDINAL}(?:,?\s+\d{{4}})?",
            r"|\d{{1,2}}{ORDINAL}\s+(?:of\s+)?{MONTH}(?:,?\s+\d{{4}})?",
        ),
        MONTH = MONTH,
        ORDINAL = ORDINAL,
    )
}

fn date_expr() -> String {
    format!(
        concat!(
            r"\b(?:{absolute}|day\s+after\s+tomorrow|day\s+before\s+yesterday",
            r"|today|tonight|tomorrow|yesterday",
            r"|(?:(?:last|this|next|on|coming)\s+)?{WEEKDAY})\b",
        ),
        absolute = absolute_expr(),
        WEEKDAY = WEEKDAY,
    )
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("date patterns are valid")
}

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let expr = date_expr();
    compile(&format!(
        concat!(
            r"(?i)(?:\bfrom\s+)?(?P<start>{expr})",
            r"\s+(?:to|until|till|through|thru|-|–)\s+(?P<end>{expr})",
        ),
        expr = expr,
    ))
});
static BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    let expr = date_expr();
    compile(&format!(
        r"(?i)\bbetween\s+(?P<start>{expr})\s+and\s+(?P<end>{expr})"
    ))
});
static DAY_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bday\s+(?P<which>after\s+tomorrow|before\s+yesterday)\b")
});
static COUNTED: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\b(?P<dir>next|coming|past|last|in)\s+",
        r"(?P<n>\d+|one|two|three|four|five|six|seven|eight|nine|ten",
        r"|eleven|twelve|thirteen|fourteen)\s+days?\b",
    ))
});
static WEEK: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?P<which>this|next|last|coming|the)\s+(?P<unit>weekend|week)\b")
});
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?P<word>today|tonight|tomorrow|yesterday)\b"));
static WEEKDAY_REF: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)\b(?P<qualifier>last|this|next|on|coming)\s+(?P<day>{WEEKDAY})\b"
    ))
});
static BARE_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)^(?P<day>{WEEKDAY})$")));
static ABSOLUTE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)\b(?:{})\b", absolute_expr())));
static ISO: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})$"));
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?P<a>\d{1,2})(?P<sep>[/-])(?P<b>\d{1,2})(?:[/-](?P<y>\d{4}|\d{2}))?$")
});
static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)^(?P<month>{MONTH})\s+(?P<d>\d{{1,2}}){ORDINAL}(?:,?\s+(?P<y>\d{{4}}))?$"
    ))
});
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?i)^(?P<d>\d{{1,2}}){ORDINAL}\s+(?:of\s+)?(?P<month>{MONTH})(?:,?\s+(?P<y>\d{{4}}))?$"
    ))
});

/// Resolves relative and absolute date expressions into a [`DateSpan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeExtractor {
    order: DateOrder,
}

impl DateRangeExtractor {
    #[must_use]
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    /// Extract a validated span and its partial confidence
    pub fn extract(
        &self,
        text: &str,
        reference: NaiveDate,
    ) -> Result<(DateSpan, f64), InterpretationError> {
        let lower = text.to_lowercase();

        let resolved = SPAN_MATCHERS
            .iter()
            .find_map(|(name, matcher)| {
                matcher(self, &lower, reference)
                    .inspect(|_| debug!(matcher = name, "Date expression matched"))
            })
            .unwrap_or_else(|| Err(InterpretationError::unparseable_dates()))?;

        let span = DateSpan::new(resolved.start, resolved.end)?;

        let mut confidence = resolved.precision.confidence();
        if contains_any_word(&lower, HEDGE_WORDS) {
            confidence -= WEIGHTS.date_hedge_penalty;
        }
        Ok((span, confidence.clamp(0.0, WEIGHTS.date_max)))
    }

    /// `from X to Y`, `X through Y`, `between X and Y`
    fn explicit_range(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = RANGE.captures(text).or_else(|| BETWEEN.captures(text))?;
        Some(self.resolve_endpoints(&captures, reference))
    }

    fn resolve_endpoints(
        &self,
        captures: &Captures<'_>,
        reference: NaiveDate,
    ) -> Result<Resolved, InterpretationError> {
        let start = self.resolve_day(&captures["start"], reference)?;
        let end = self.resolve_day(&captures["end"], reference)?;
        Ok(Resolved {
            start: start.start,
            end: end.end,
            precision: start.precision.min(end.precision),
        })
    }

    /// Resolve a single endpoint expression, which must match in full
    fn resolve_day(
        &self,
        expr: &str,
        reference: NaiveDate,
    ) -> Result<Resolved, InterpretationError> {
        let expr = expr.trim();
        DAY_RESOLVERS
            .iter()
            .find_map(|resolver| {
                resolver(self, expr, reference)
                    .filter(|r| r.as_ref().map_or(true, |r| r.start == r.end))
            })
            .unwrap_or_else(|| Err(InterpretationError::unparseable_dates()))
    }

    /// `day after tomorrow`, `day before yesterday`
    fn day_offset(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = DAY_OFFSET.captures(text)?;
        let offset = if captures["which"].starts_with("after") { 2 } else { -2 };
        Some(shift(reference, offset).map(|day| Resolved::day(day, Precision::Keyword)))
    }

    /// `next N days`, `past N days`, `in N days`
    fn counted_days(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = COUNTED.captures(text)?;
        let raw = &captures["n"];
        let Some(n) = raw.parse::<u32>().ok().or_else(|| number_from_word(raw)) else {
            // More digits than fit in a u32
            return Some(Err(InterpretationError::range_too_large()));
        };
        let n = i64::from(n);

        let resolved = match &captures["dir"] {
            "in" => shift(reference, n).map(|day| Resolved::day(day, Precision::Counted)),
            _ if n == 0 => Err(InterpretationError::unparseable_dates()),
            _ if n > i64::from(MAX_SPAN_DAYS) => Err(InterpretationError::range_too_large()),
            "past" | "last" => Ok(Resolved {
                start: shift(reference, -n).ok()?,
                end: shift(reference, -1).ok()?,
                precision: Precision::Counted,
            }),
            _ => Ok(Resolved {
                start: shift(reference, 1).ok()?,
                end: shift(reference, n).ok()?,
                precision: Precision::Counted,
            }),
        };
        Some(resolved)
    }

    /// `this week`, `next week`, `last week`, `this weekend`, `next weekend`
    fn week_span(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = WEEK.captures(text)?;
        let weeks = match &captures["which"] {
            "next" | "coming" => 1,
            "last" => -1,
            _ => 0,
        };
        let monday = i64::from(reference.weekday().num_days_from_monday());
        let (first, last) = match &captures["unit"] {
            "weekend" => (5, 6),
            _ => (0, 6),
        };
        let base = weeks * 7 - monday;
        let resolved = shift(reference, base + first).and_then(|start| {
            Ok(Resolved {
                start,
                end: shift(reference, base + last)?,
                precision: Precision::Keyword,
            })
        });
        Some(resolved)
    }

    /// `today`, `tonight`, `tomorrow`, `yesterday`
    fn relative_keyword(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = KEYWORD.captures(text)?;
        let offset = match &captures["word"] {
            "tomorrow" => 1,
            "yesterday" => -1,
            _ => 0,
        };
        Some(shift(reference, offset).map(|day| Resolved::day(day, Precision::Keyword)))
    }

    /// `last monday`, `next friday`, `this sunday`, `on thursday`; a bare
    /// weekday must be the whole expression
    fn weekday_reference(&self, text: &str, reference: NaiveDate) -> Resolution {
        let (qualifier, day) = match WEEKDAY_REF.captures(text) {
            Some(captures) => (
                captures.name("qualifier").map(|m| m.as_str().to_string()),
                captures["day"].to_string(),
            ),
            None => {
                let captures = BARE_WEEKDAY.captures(text)?;
                (None, captures["day"].to_string())
            }
        };
        let target = weekday_from_name(&day)?;
        Some(
            weekday_date(reference, target, qualifier.as_deref())
                .map(|day| Resolved::day(day, Precision::Weekday)),
        )
    }

    /// Absolute dates anywhere in the text: one gives a single day, several
    /// give first-to-last in the order written
    fn absolute_dates(&self, text: &str, reference: NaiveDate) -> Resolution {
        let mut found = ABSOLUTE.find_iter(text).map(|m| self.resolve_day(m.as_str(), reference));
        let first = match found.next()? {
            Ok(first) => first,
            Err(err) => return Some(Err(err)),
        };
        let last = match found.last() {
            Some(Ok(last)) => last,
            Some(Err(err)) => return Some(Err(err)),
            None => first,
        };
        Some(Ok(Resolved {
            start: first.start,
            end: last.end,
            precision: Precision::Absolute,
        }))
    }

    fn iso_date(&self, text: &str, _reference: NaiveDate) -> Resolution {
        let captures = ISO.captures(text)?;
        Some(calendar_date(&captures["y"], &captures["m"], &captures["d"]))
    }

    /// `A/B[/Y]` and `A-B-YYYY`; a component above 12 must be the day
    fn numeric_date(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = NUMERIC.captures(text)?;
        // Dashed dates need an explicit year to differ from "10-12" style ranges
        if &captures["sep"] == "-" && captures.name("y").is_none() {
            return None;
        }
        let (Ok(a), Ok(b)) = (captures["a"].parse::<u32>(), captures["b"].parse::<u32>()) else {
            return Some(Err(InterpretationError::unparseable_dates()));
        };
        let (month, day) = if a > 12 {
            (b, a)
        } else if b > 12 {
            (a, b)
        } else {
            match self.order {
                DateOrder::MonthFirst => (a, b),
                DateOrder::DayFirst => (b, a),
            }
        };
        let year = match captures.name("y") {
            Some(y) if y.as_str().len() == 2 => y.as_str().parse::<i32>().map(|y| 2000 + y).ok(),
            Some(y) => y.as_str().parse::<i32>().ok(),
            None => Some(reference.year()),
        };
        Some(
            year.and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
                .map(|day| Resolved::day(day, Precision::Absolute))
                .ok_or_else(InterpretationError::unparseable_dates),
        )
    }

    /// `October 5[, 2025]`
    fn month_day_date(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = MONTH_DAY.captures(text)?;
        Some(textual_date(&captures, reference))
    }

    /// `5 October [2025]`, `5th of Oct`
    fn day_month_date(&self, text: &str, reference: NaiveDate) -> Resolution {
        let captures = DAY_MONTH.captures(text)?;
        Some(textual_date(&captures, reference))
    }
}

fn shift(reference: NaiveDate, days: i64) -> Result<NaiveDate, InterpretationError> {
    TimeDelta::try_days(days)
        .and_then(|delta| reference.checked_add_signed(delta))
        .ok_or_else(InterpretationError::unparseable_dates)
}

fn weekday_date(
    reference: NaiveDate,
    target: Weekday,
    qualifier: Option<&str>,
) -> Result<NaiveDate, InterpretationError> {
    let current = i64::from(reference.weekday().num_days_from_monday());
    let wanted = i64::from(target.num_days_from_monday());
    let offset = match qualifier {
        Some("last") => {
            let back = (current - wanted).rem_euclid(7);
            -(if back == 0 { 7 } else { back })
        }
        Some("next" | "coming") => {
            let forward = (wanted - current).rem_euclid(7);
            if forward == 0 { 7 } else { forward }
        }
        _ => wanted - current,
    };
    shift(reference, offset)
}

fn calendar_date(year: &str, month: &str, day: &str) -> Result<Resolved, InterpretationError> {
    let (Ok(year), Ok(month), Ok(day)) = (
        year.parse::<i32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) else {
        return Err(InterpretationError::unparseable_dates());
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|day| Resolved::day(day, Precision::Absolute))
        .ok_or_else(InterpretationError::unparseable_dates)
}

fn textual_date(
    captures: &Captures<'_>,
    reference: NaiveDate,
) -> Result<Resolved, InterpretationError> {
    let month = month_from_name(&captures["month"].to_lowercase())
        .ok_or_else(InterpretationError::unparseable_dates)?;
    let year = match captures.name("y") {
        Some(y) => y.as_str().parse::<i32>().ok(),
        None => Some(reference.year()),
    };
    let day = captures["d"].parse::<u32>().ok();
    year.zip(day)
        .and_then(|(year, day)| NaiveDate::from_ymd_opt(year, month, day))
        .map(|day| Resolved::day(day, Precision::Absolute))
        .ok_or_else(InterpretationError::unparseable_dates)
}
