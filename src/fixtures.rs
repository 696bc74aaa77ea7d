//! Dummy FITS files for exercising filename-parsing code.
//!
//! Each generated file is empty; only its name matters. Alongside the files a
//! [`FixtureSummary`] records, per date, the largest multi-run number and the
//! largest run number within that multi-run, i.e. the file a "find latest"
//! routine is expected to pick.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::{debug, trace};

use crate::fits_filename::FitsFilename;

/// Number of consecutive days, counting back from today, to generate for.
pub const FIXTURE_DAYS: u32 = 3;
pub const FILES_PER_DAY: usize = 20;

/// Largest identifiers seen for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMaxima {
    pub max_mr: u32,
    pub max_r: u32,
}

impl RunMaxima {
    pub fn new(multi_run: u32, run: u32) -> Self {
        Self {
            max_mr: multi_run,
            max_r: run,
        }
    }

    /// A larger multi-run resets the run maximum to `run`; an equal one only
    /// raises it.
    pub fn observe(&mut self, multi_run: u32, run: u32) {
        if multi_run > self.max_mr {
            self.max_mr = multi_run;
            self.max_r = run;
        } else if multi_run == self.max_mr && run > self.max_r {
            self.max_r = run;
        }
    }
}

/// Per-date maxima, in the order dates were first recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixtureSummary {
    days: Vec<(String, RunMaxima)>,
}

impl FixtureSummary {
    pub fn record(&mut self, fits: &FitsFilename) {
        let date_str = fits.date_str();
        match self.days.iter_mut().find(|(date, _)| *date == date_str) {
            Some((_, maxima)) => maxima.observe(fits.multi_run, fits.run),
            None => self
                .days
                .push((date_str, RunMaxima::new(fits.multi_run, fits.run))),
        }
    }

    pub fn get(&self, date_str: &str) -> Option<&RunMaxima> {
        self.days
            .iter()
            .find(|(date, _)| date == date_str)
            .map(|(_, maxima)| maxima)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunMaxima)> {
        self.days.iter().map(|(date, maxima)| (date.as_str(), maxima))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl fmt::Display for FixtureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (date, maxima) in self.iter() {
            writeln!(f, "Max identifiers for date {}", date)?;
            writeln!(f, "\tmax_mr -> {}", maxima.max_mr)?;
            writeln!(f, "\tmax_r -> {}", maxima.max_r)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FixtureReport {
    pub summary: FixtureSummary,
    /// Paths written, in generation order. A name drawn twice appears twice.
    pub created: Vec<PathBuf>,
}

/// `today` followed by the `days - 1` days before it.
pub fn target_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .collect()
}

/// Create `per_day` empty, randomly numbered FITS files in `dir` for each of
/// `dates`.
///
/// Existing files with the same name are truncated. The first filesystem
/// error stops generation; files already written stay on disk.
pub fn generate_fixtures<R: Rng>(
    dir: &Path,
    dates: &[NaiveDate],
    per_day: usize,
    rng: &mut R,
) -> io::Result<FixtureReport> {
    let mut report = FixtureReport::default();

    for &date in dates {
        let mut batch = Vec::with_capacity(per_day);
        for _ in 0..per_day {
            let fits = FitsFilename::builder().date(date).build(rng);
            report.summary.record(&fits);
            batch.push(fits);
        }

        for fits in &batch {
            let path = dir.join(fits.to_string());
            File::create(&path)?;
            trace!(path = %path.display(), "created fixture");
            report.created.push(path);
        }
        debug!(date = %date, files = batch.len(), "generated fixtures");
    }

    Ok(report)
}
