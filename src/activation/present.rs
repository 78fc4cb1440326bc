use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Write};

use chrono::{Local, TimeZone};

use super::{format_activation_header, ActivationRecord, LogLineFormatter, SeenSet};

/// Where a presentation call sits in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleContext {
    /// The run keeps polling after this cycle.
    pub follow: bool,
    /// A previous cycle already ran.
    pub follow_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationOutcome {
    /// One-shot run with nothing to show; the notice was written.
    NoData,
    /// Ids of the activations written, oldest first.
    Rendered(Vec<String>),
}

impl PresentationOutcome {
    pub fn rendered_count(&self) -> usize {
        match self {
            PresentationOutcome::NoData => 0,
            PresentationOutcome::Rendered(ids) => ids.len(),
        }
    }
}

/// Writes activations to a line-oriented sink and records them as seen.
pub struct ActivationPresenter<W, Tz: TimeZone = Local> {
    out: W,
    formatter: LogLineFormatter<Tz>,
    /// Function name as given by the user, for the no-data notice
    function: String,
}

impl<W: Write> ActivationPresenter<W, Local> {
    pub fn new(out: W, function: impl Into<String>) -> Self {
        Self::with_formatter(out, function, LogLineFormatter::new())
    }
}

impl<W: Write, Tz: TimeZone> ActivationPresenter<W, Tz>
where
    Tz::Offset: Display,
{
    pub fn with_formatter(
        out: W,
        function: impl Into<String>,
        formatter: LogLineFormatter<Tz>,
    ) -> Self {
        Self {
            out,
            formatter,
            function: function.into(),
        }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Render a newest-first batch oldest-first. Records without logs are
    /// skipped and stay unseen, so they show up later once they have logs.
    pub fn present(
        &mut self,
        records: &[ActivationRecord],
        seen: &mut SeenSet,
        cycle: CycleContext,
    ) -> io::Result<PresentationOutcome> {
        if records.is_empty() && !cycle.follow {
            writeln!(
                self.out,
                "There's no log data for function \"{}\" available right now…",
                self.function
            )?;
            self.out.flush()?;
            return Ok(PresentationOutcome::NoData);
        }

        let mut batch_ids = HashSet::new();
        let shown: Vec<&ActivationRecord> = records
            .iter()
            .rev()
            .filter(|record| record.has_logs())
            .filter(|record| !seen.contains(&record.activation_id))
            .filter(|record| batch_ids.insert(record.activation_id.clone()))
            .collect();

        let mut rendered = Vec::with_capacity(shown.len());
        for (idx, record) in shown.iter().enumerate() {
            if idx == 0 && cycle.follow_up {
                writeln!(self.out)?;
            }

            writeln!(self.out, "{}", format_activation_header(&record.activation_id))?;
            for line in &record.logs {
                writeln!(self.out, "{}", self.formatter.format(line))?;
            }
            seen.insert(&record.activation_id);

            if idx + 1 != shown.len() {
                writeln!(self.out)?;
            }
            rendered.push(record.activation_id.clone());
        }

        self.out.flush()?;
        Ok(PresentationOutcome::Rendered(rendered))
    }
}
