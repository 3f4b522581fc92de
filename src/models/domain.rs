use crate::error::DateFormatError;
use chrono::{Datelike, Days, NaiveDate};
use poise::CreateReply;
use regex::Regex;
use serenity::all::{CreateEmbed, CreateMessage, Timestamp};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MONTH_DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0?[1-9]|1[0-2])/(0?[1-9]|[12][0-9]|3[01])$").expect("valid month/day pattern")
});

/// Month and day of a birthday, without a year.
///
/// The day is only checked against 1..=31, not against the length of the month,
/// so `2/30` is a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self, DateFormatError> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Ok(MonthDay { month, day })
        } else {
            Err(DateFormatError(format!("{month}/{day}")))
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Calendar date this birthday falls on in `year`.
    ///
    /// Days past the end of the month roll into the next month (`2/30` is March 2nd
    /// in 2026).
    pub fn occurrence_in(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, 1)?
            .checked_add_days(Days::new(u64::from(self.day - 1)))
    }

    /// Whole calendar days from `today` until the next occurrence; 0 if it is today.
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        let this_year = self.occurrence_in(today.year())?;
        let next = if this_year < today {
            self.occurrence_in(today.year() + 1)?
        } else {
            this_year
        };
        Some((next - today).num_days())
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        MonthDay {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl FromStr for MonthDay {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = MONTH_DAY_PATTERN
            .captures(s)
            .ok_or_else(|| DateFormatError(s.to_string()))?;
        let month = captures[1]
            .parse()
            .map_err(|_| DateFormatError(s.to_string()))?;
        let day = captures[2]
            .parse()
            .map_err(|_| DateFormatError(s.to_string()))?;
        MonthDay::new(month, day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

/// A message as delivered by the chat platform, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub raw_text: String,
    pub caller_id: String,
    /// `None` for direct messages.
    pub server_id: Option<String>,
    pub mentioned_user_ids: Vec<String>,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayCommand {
    Add { target: String, date: Option<String> },
    Remove { target: String },
    List,
    Next,
    Help,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// Platform-neutral embed: title, color, body and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyEmbed {
    pub title: String,
    pub color: u32,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub timestamp: bool,
}

impl ReplyEmbed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        ReplyEmbed {
            title: title.into(),
            color,
            description: None,
            fields: Vec::new(),
            timestamp: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn timestamped(mut self) -> Self {
        self.timestamp = true;
        self
    }

    fn to_create_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new().title(&self.title).color(self.color);
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, false);
        }
        if self.timestamp {
            embed = embed.timestamp(Timestamp::now());
        }
        embed
    }
}

/// Outbound message produced by the router and the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub content: Option<String>,
    pub embed: Option<ReplyEmbed>,
}

impl BotReply {
    pub fn embed(embed: ReplyEmbed) -> Self {
        BotReply {
            content: None,
            embed: Some(embed),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.embed.as_ref().map(|embed| embed.title.as_str())
    }

    pub fn to_message(&self) -> CreateMessage {
        let mut message = CreateMessage::new();
        if let Some(content) = &self.content {
            message = message.content(content);
        }
        if let Some(embed) = &self.embed {
            message = message.embed(embed.to_create_embed());
        }
        message
    }

    pub fn to_poise_reply(&self) -> CreateReply {
        let mut reply = CreateReply::default();
        if let Some(content) = &self.content {
            reply = reply.content(content);
        }
        if let Some(embed) = &self.embed {
            reply = reply.embed(embed.to_create_embed());
        }
        reply
    }
}
