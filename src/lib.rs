//! Helper tools around the Aristarchos CCD acquisition software.
//!
//! * [`payload`] recovers the base64/bzip2 message embedded after a `BF=`
//!   marker in a file (`decmprss-b64z2`).
//! * [`fixtures`] writes empty, randomly numbered FITS files used as test
//!   input for filename parsing (`make-dummy-fits`).

pub mod error;
pub mod fits_filename;
pub mod fixtures;
pub mod logging;
pub mod payload;
pub mod render;

pub use error::DecomposeError;
pub use fits_filename::FitsFilename;
pub use payload::Extraction;
