use std::fmt;
use std::ops::{Range, RangeInclusive};

use chrono::{Local, NaiveDate};
use rand::Rng;

/// Instrument code used for the CCD camera fixtures.
pub const INSTRUMENT_CODE_CCD_CAMERA: char = 'c';
/// Exposure type code for a plain exposure.
pub const EXPOSURE_CODE_EXPOSURE: char = 'e';
/// Pipeline processing flag for raw, unprocessed frames.
pub const PIPELINE_PROCESSING_NONE: u32 = 0;
pub const DEFAULT_WINDOW_NUMBER: u32 = 1;
pub const FITS_EXTENSION: &str = "fits";

/// Range random multi-run numbers are drawn from.
pub const MULTI_RUN_RANGE: Range<u32> = 0..10;
/// Range random run numbers are drawn from.
pub const RUN_RANGE: RangeInclusive<u32> = 0..=100;

/// `strftime` pattern of the date field.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// A FITS filename broken into its fields.
///
/// The naming convention is `'.{1}_.{1}_.{8}_[0-9]+_[0-9]+_[0-9]+_[0-9]+(.*)'`:
///
/// ```text
///   c_e_20070830_11_10_1_0.fits
///   | |    |     |  |  | |  |
///   | |    |     |  |  | |  extension
///   | |    |     |  |  | pipeline processing
///   | |    |     |  |  window number
///   | |    |     |  run number
///   | |    |     multi-run number
///   | |    date (YYYYMMDD)
///   | exposure type
///   instrument code
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitsFilename {
    pub instrument: char,
    pub exposure: char,
    pub date: NaiveDate,
    pub multi_run: u32,
    pub run: u32,
    pub window: u32,
    pub pl_proc: u32,
    pub extension: String,
}

impl FitsFilename {
    pub fn builder() -> FitsFilenameBuilder {
        FitsFilenameBuilder::default()
    }

    /// The date field, `YYYYMMDD`.
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for FitsFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}_{}_{}.{}",
            self.instrument,
            self.exposure,
            self.date.format(DATE_FORMAT),
            self.multi_run,
            self.run,
            self.window,
            self.pl_proc,
            self.extension
        )
    }
}

/// Builds a [`FitsFilename`], filling every field left unset with its default.
///
/// Multi-run and run numbers default to random draws from
/// [`MULTI_RUN_RANGE`] and [`RUN_RANGE`]; the date defaults to today in local
/// time.
#[derive(Debug, Default, Clone)]
pub struct FitsFilenameBuilder {
    instrument: Option<char>,
    exposure: Option<char>,
    date: Option<NaiveDate>,
    multi_run: Option<u32>,
    run: Option<u32>,
    window: Option<u32>,
    pl_proc: Option<u32>,
    extension: Option<String>,
}

impl FitsFilenameBuilder {
    pub fn instrument(mut self, instrument: char) -> Self {
        self.instrument = Some(instrument);
        self
    }

    pub fn exposure(mut self, exposure: char) -> Self {
        self.exposure = Some(exposure);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn multi_run(mut self, multi_run: u32) -> Self {
        self.multi_run = Some(multi_run);
        self
    }

    pub fn run(mut self, run: u32) -> Self {
        self.run = Some(run);
        self
    }

    pub fn window(mut self, window: u32) -> Self {
        self.window = Some(window);
        self
    }

    pub fn pl_proc(mut self, pl_proc: u32) -> Self {
        self.pl_proc = Some(pl_proc);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn build<R: Rng>(self, rng: &mut R) -> FitsFilename {
        FitsFilename {
            instrument: self.instrument.unwrap_or(INSTRUMENT_CODE_CCD_CAMERA),
            exposure: self.exposure.unwrap_or(EXPOSURE_CODE_EXPOSURE),
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            multi_run: self
                .multi_run
                .unwrap_or_else(|| rng.random_range(MULTI_RUN_RANGE)),
            run: self.run.unwrap_or_else(|| rng.random_range(RUN_RANGE)),
            window: self.window.unwrap_or(DEFAULT_WINDOW_NUMBER),
            pl_proc: self.pl_proc.unwrap_or(PIPELINE_PROCESSING_NONE),
            extension: self
                .extension
                .unwrap_or_else(|| FITS_EXTENSION.to_string()),
        }
    }
}
