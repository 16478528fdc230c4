//! Line-oriented tag scanner for Raven input files.
//!
//! The scanner reads one file at a time and follows `:RedirectToFile`
//! directives by suspending the current file on a stack and continuing in
//! the target. When a redirected file is exhausted the suspended parent
//! resumes where it left off. Every open file is owned by the scanner, so
//! all handles are closed when it is dropped, including on error paths.
//!
//! Lookahead is served from a per-file line buffer, so peeking never moves
//! the visible read position.

use crate::config::ReaderConfig;
use crate::constants::{DATE_FORMAT, TIME_FORMATS};
use crate::error::{RavenError, Result};
use crate::models::DateStep;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Delimiter used by the rows of a table block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Comma if the sample line contains any comma, whitespace otherwise
    pub fn detect(line: &str) -> Self {
        if line.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    pub fn is_comma(&self) -> bool {
        matches!(self, Delimiter::Comma)
    }

    /// Split a data row into fields
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// One open file with a lookahead buffer of raw lines
#[derive(Debug)]
struct LineSource {
    path: PathBuf,
    reader: BufReader<File>,
    lookahead: VecDeque<String>,
    lines_read: usize,
    lines_consumed: usize,
}

impl LineSource {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            lookahead: VecDeque::new(),
            lines_read: 0,
            lines_consumed: 0,
        })
    }

    /// Buffer lines until `count` are available or the file ends
    fn fill(&mut self, count: usize) -> Result<()> {
        while self.lookahead.len() < count {
            let mut buffer = String::new();
            if self.reader.read_line(&mut buffer)? == 0 {
                break;
            }
            let mut line = buffer.trim_end_matches(['\n', '\r']).to_string();
            if self.lines_read == 0 && line.starts_with('\u{feff}') {
                line.remove(0);
            }
            self.lines_read += 1;
            self.lookahead.push_back(line);
        }
        Ok(())
    }

    fn peek(&mut self, offset: usize) -> Result<Option<&str>> {
        self.fill(offset + 1)?;
        Ok(self.lookahead.get(offset).map(String::as_str))
    }

    fn next(&mut self) -> Result<Option<String>> {
        self.fill(1)?;
        let line = self.lookahead.pop_front();
        if line.is_some() {
            self.lines_consumed += 1;
        }
        Ok(line)
    }
}

/// Cursor over a Raven file and any files it redirects to
#[derive(Debug)]
pub struct TagScanner {
    base_dir: PathBuf,
    redirect_prefix: String,
    config: ReaderConfig,
    active: LineSource,
    backburner: Vec<LineSource>,
}

impl TagScanner {
    /// Open `path` with the default configuration
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, ReaderConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            base_dir,
            redirect_prefix: config.redirect_prefix(),
            config,
            active: LineSource::open(path)?,
            backburner: Vec::new(),
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Path of the file currently being read
    pub fn active_path(&self) -> &Path {
        &self.active.path
    }

    /// Number of lines consumed from the active file
    pub fn line_number(&self) -> usize {
        self.active.lines_consumed
    }

    /// Number of suspended parent files
    pub fn depth(&self) -> usize {
        self.backburner.len()
    }

    /// True once the active file and every suspended parent are exhausted.
    ///
    /// When the active file is empty but a parent is suspended, the parent
    /// becomes active again and `false` is returned.
    pub fn at_end(&mut self) -> Result<bool> {
        if self.active.peek(0)?.is_some() {
            return Ok(false);
        }

        match self.backburner.pop() {
            Some(parent) => {
                debug!(
                    "Finished {}, resuming {} at line {}",
                    self.active.path.display(),
                    parent.path.display(),
                    parent.lines_consumed
                );
                self.active = parent;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Next trimmed line of the active file, `None` when it is exhausted
    pub fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.active.next()?.map(|line| line.trim().to_string()))
    }

    /// Advance to the next tag line, following redirects on the way.
    ///
    /// Returns `None` once all input is exhausted.
    pub fn next_tag(&mut self) -> Result<Option<String>> {
        while !self.at_end()? {
            let Some(line) = self.next_line()? else {
                continue;
            };

            if let Some(target) = self.redirect_target(&line) {
                self.redirect(&target)?;
            } else if line.starts_with(self.config.tag_marker) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Relative path named by a redirect line, if `line` is one
    fn redirect_target(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix(self.redirect_prefix.as_str())?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim().to_string())
    }

    fn redirect(&mut self, relative: &str) -> Result<()> {
        let target = self.base_dir.join(relative);
        if relative.is_empty() || !target.is_file() {
            return Err(RavenError::RedirectTargetMissing {
                path: target,
                source_file: self.active.path.clone(),
            });
        }

        let source = LineSource::open(&target)?;
        debug!(
            "Redirecting from {} to {}",
            self.active.path.display(),
            target.display()
        );
        let parent = std::mem::replace(&mut self.active, source);
        self.backburner.push(parent);
        Ok(())
    }

    /// Read a `YYYY-MM-DD HH:MM:SS <step days> <count>` line
    pub fn read_date_step(&mut self) -> Result<DateStep> {
        let line = self
            .next_line()?
            .ok_or_else(|| self.end_of_input("date line"))?;
        parse_date_step(&line).map_err(|reason| RavenError::MalformedDateLine {
            path: self.active.path.clone(),
            line: line.clone(),
            reason,
        })
    }

    /// Discard exactly `count` lines of the active file
    pub fn skip_lines(&mut self, count: usize) -> Result<()> {
        for skipped in 0..count {
            if self.active.next()?.is_none() {
                return Err(self.end_of_input(&format!(
                    "{} skipped lines ({} available)",
                    count, skipped
                )));
            }
        }
        Ok(())
    }

    /// Delimiter of the next line, without consuming it
    pub fn detect_delimiter(&mut self) -> Result<Delimiter> {
        Ok(self
            .active
            .peek(0)?
            .map(Delimiter::detect)
            .unwrap_or(Delimiter::Whitespace))
    }

    /// Count the lines ahead up to the next tag, blank line or end of file
    pub fn measure_block_length(&mut self) -> Result<usize> {
        let marker = self.config.tag_marker;
        let mut count = 0;
        while let Some(line) = self.active.peek(count)? {
            let line = line.trim();
            if line.is_empty() || line.starts_with(marker) {
                break;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Up to `count` upcoming trimmed lines of the active file, not consumed
    pub fn peek_lines(&mut self, count: usize) -> Result<Vec<String>> {
        self.active.fill(count)?;
        Ok(self
            .active
            .lookahead
            .iter()
            .take(count)
            .map(|line| line.trim().to_string())
            .collect())
    }

    pub(crate) fn end_of_input(&self, context: &str) -> RavenError {
        RavenError::UnexpectedEndOfInput {
            path: self.active.path.clone(),
            context: context.to_string(),
        }
    }
}

/// Parse the four fields of a date-step line
fn parse_date_step(line: &str) -> std::result::Result<DateStep, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(format!("expected 4 fields, found {}", tokens.len()));
    }

    let date = NaiveDate::parse_from_str(tokens[0], DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", tokens[0], e))?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(tokens[1], format).ok())
        .ok_or_else(|| format!("invalid time '{}'", tokens[1]))?;
    let step_days = tokens[2]
        .parse::<f64>()
        .ok()
        .filter(|step| step.is_finite())
        .ok_or_else(|| format!("invalid time step '{}'", tokens[2]))?;
    let count = tokens[3]
        .parse::<usize>()
        .map_err(|e| format!("invalid value count '{}': {}", tokens[3], e))?;

    DateStep::from_days(NaiveDateTime::new(date, time), step_days, count).ok_or_else(|| {
        format!(
            "time step '{}' over {} values leaves the supported date range",
            tokens[2], count
        )
    })
}
