//! Word-level helpers shared by the extractors

use chrono::Weekday;

/// Words that soften a request ("maybe next week")
pub const HEDGE_WORDS: &[&str] = &[
    "maybe",
    "around",
    "approximately",
    "roughly",
    "possibly",
    "sometime",
];

/// Lower-cased words of `text`, split on anything that is not a letter,
/// digit or inner apostrophe
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// True if any whole word of `text` is in `list`
pub fn contains_any_word(text: &str, list: &[&str]) -> bool {
    words(text).any(|word| list.contains(&word.as_str()))
}

/// Upper-case the first letter of every space- or hyphen-separated part
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;
    for c in text.chars() {
        if at_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_start = false;
        } else {
            out.push(c);
            at_start = c == ' ' || c == '-';
        }
    }
    out
}

/// Parse an English weekday name or common abbreviation
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse an English month name or common abbreviation into 1..=12
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim_end_matches('.');
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse a small count written as a word
pub fn number_from_word(word: &str) -> Option<u32> {
    let n = match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        _ => return None,
    };
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_and_lowercase() {
        let collected: Vec<String> = words("What's the WEATHER in São Paulo, today?").collect();
        assert_eq!(
            collected,
            vec!["what's", "the", "weather", "in", "são", "paulo", "today"]
        );
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("tel aviv"), "Tel Aviv");
        assert_eq!(capitalize_words("chamonix-mont-blanc"), "Chamonix-Mont-Blanc");
        assert_eq!(capitalize_words("évian"), "Évian");
        assert_eq!(capitalize_words("NEW YORK"), "NEW YORK");
    }

    #[test]
    fn test_calendar_names() {
        assert_eq!(weekday_from_name("friday"), Some(Weekday::Fri));
        assert_eq!(weekday_from_name("fryday"), None);
        assert_eq!(month_from_name("sept."), Some(9));
        assert_eq!(month_from_name("octobre"), None);
        assert_eq!(number_from_word("seven"), Some(7));
    }

    #[test]
    fn test_contains_any_word() {
        assert!(contains_any_word("around noon", HEDGE_WORDS));
        assert!(!contains_any_word("surround", HEDGE_WORDS));
    }
}
