//! Console-only banners
//!
//! SUCCESS, FAILED and MESSAGE lines skip thresholds and the log file
//! entirely. They always reach the console with a fixed label and color.

use chrono::{DateTime, Local};
use colored::Color;

use crate::template::TimeFormat;

/// Fixed presentation tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Success,
    Failed,
    Message,
}

impl Banner {
    /// Label shown in the line
    pub fn label(self) -> &'static str {
        match self {
            Banner::Success => "SUCCESS",
            Banner::Failed => "FAILED",
            Banner::Message => "MESSAGE",
        }
    }

    /// Console color for this tag
    pub fn color(self) -> Color {
        match self {
            Banner::Success => Color::BrightGreen,
            Banner::Failed => Color::BrightRed,
            Banner::Message => Color::Cyan,
        }
    }

    /// Lay out a banner line: `[<timestamp> | ]<LABEL padded to 8> | <message>`
    pub fn line(
        self,
        message: &str,
        timestamp: Option<(&TimeFormat, &DateTime<Local>)>,
    ) -> String {
        match timestamp {
            Some((format, at)) => {
                format!("{} | {:<8} | {}", format.format(at), self.label(), message)
            }
            None => format!("{:<8} | {}", self.label(), message),
        }
    }
}
