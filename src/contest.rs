use chrono::NaiveDate;
use std::fmt;

use crate::deadline;

pub trait Listing {
    fn title(&self) -> &str;
}

/// One listing card as scraped, before the deadline label is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContest {
    pub title: String,
    pub link: String,
    pub host: String,
    pub deadline_text: String,
}

impl RawContest {
    pub fn normalize_at(self, today: NaiveDate) -> ContestRecord {
        let deadline_date = deadline::normalize_at(&self.deadline_text, today);
        self.with_deadline(deadline_date)
    }

    fn with_deadline(self, deadline_date: Option<NaiveDate>) -> ContestRecord {
        ContestRecord {
            title: self.title,
            link: self.link,
            host: self.host,
            deadline_text: self.deadline_text,
            deadline_date,
        }
    }
}

impl Listing for RawContest {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRecord {
    pub title: String,
    pub link: String,
    pub host: String,
    pub deadline_text: String,
    pub deadline_date: Option<NaiveDate>,
}

impl ContestRecord {
    pub fn is_postable(&self) -> bool {
        !self.title.is_empty() && !self.link.is_empty()
    }

    pub fn deadline_iso(&self) -> Option<String> {
        self.deadline_date
            .map(|d| d.format("%Y-%m-%d").to_string())
    }
}

impl Listing for ContestRecord {
    fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for ContestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title           : {}", self.title)?;
        writeln!(f, "Host            : {}", self.host)?;
        writeln!(f, "Link            : {}", self.link)?;
        writeln!(f, "Deadline Label  : {}", self.deadline_text)?;
        if let Some(d) = self.deadline_iso() {
            writeln!(f, "Deadline Date   : {}", d)?;
        } else {
            writeln!(f, "Deadline Date   : None")?;
        };

        Ok(())
    }
}
