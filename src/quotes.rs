use crate::models::Quote;
use chrono::{Datelike, Local, NaiveDate};

const QUOTES: &[(&str, &str)] = &[
    (
        "The journey of a thousand miles begins with a single step.",
        "Lao Tzu",
    ),
    (
        "The difference between ordinary and extraordinary is that little extra.",
        "Jimmy Johnson",
    ),
    ("It always seems impossible until it's done.", "Nelson Mandela"),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    ("Opportunities don't happen. You create them.", "Chris Grosser"),
    ("Choose a job you love, and you will never have to work a day in your life.", "Confucius"),
    ("Don't watch the clock; do what it does. Keep going.", "Sam Levenson"),
];

pub fn quote_of_the_day() -> Quote {
    quote_for(Local::now().date_naive())
}

pub fn quote_for(date: NaiveDate) -> Quote {
    let (quote, author) = QUOTES[date.ordinal0() as usize % QUOTES.len()];
    Quote {
        quote: quote.to_string(),
        author: author.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_day_same_quote_next_day_rotates() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(quote_for(day), quote_for(day));
        assert_ne!(quote_for(day), quote_for(day.succ_opt().unwrap()));
        assert!(!quote_for(day).author.is_empty());
    }
}
