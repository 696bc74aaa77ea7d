//! Extraction of the base64/bzip2 message that follows a `BF=` marker.
//!
//! The message lives somewhere in the first [`READ_LIMIT`] bytes of a file:
//! everything after the marker, minus the very last byte read, is the
//! base64 text of a bzip2 stream.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bzip2::bufread::BzDecoder;
use tracing::{debug, trace};

use crate::error::DecomposeError;
use crate::render;

/// How many bytes from the start of the file are searched.
pub const READ_LIMIT: usize = 4096;
/// Marker preceding the encoded message.
pub const MARKER: &str = "BF=";

/// Line printed when the message cannot be recovered.
pub const FAILURE_MESSAGE: &str = "Failed to decompose message";

/// Standard alphabet, canonical padding, stray low bits accepted.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Outcome of running the extractor over one file.
#[derive(Debug)]
pub enum Extraction {
    Decomposed(Vec<u8>),
    Failed(DecomposeError),
}

impl Extraction {
    /// Process exit status: 1 when the message was decomposed, 0 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Extraction::Decomposed(_) => 1,
            Extraction::Failed(_) => 0,
        }
    }

    pub fn is_decomposed(&self) -> bool {
        matches!(self, Extraction::Decomposed(_))
    }

    /// Lines to print on stdout.
    pub fn report_lines(&self) -> Vec<String> {
        match self {
            Extraction::Decomposed(message) => {
                render::wrap(&render::escape_bytes(message), render::WRAP_WIDTH)
            }
            Extraction::Failed(_) => vec![FAILURE_MESSAGE.to_string()],
        }
    }
}

/// Read at most [`READ_LIMIT`] bytes from the start of `file_path`.
pub fn read_head<P: AsRef<Path>>(file_path: P) -> io::Result<Vec<u8>> {
    let file = File::open(file_path.as_ref())?;
    let mut reader = BufReader::new(file).take(READ_LIMIT as u64);

    let mut buffer = Vec::with_capacity(READ_LIMIT);
    reader.read_to_end(&mut buffer)?;
    trace!(
        path = %file_path.as_ref().display(),
        bytes = buffer.len(),
        "read file head"
    );
    Ok(buffer)
}

/// Offset of the first marker in `buffer`.
pub fn find_marker(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(MARKER.len())
        .position(|window| window == MARKER.as_bytes())
}

/// The encoded message: bytes after the marker, excluding the final byte of
/// `buffer`. Empty when the marker sits at the very end.
pub fn payload_slice(buffer: &[u8]) -> Result<&[u8], DecomposeError> {
    let offset = find_marker(buffer).ok_or_else(DecomposeError::marker_not_found)?;
    let start = offset + MARKER.len();
    let end = buffer.len().saturating_sub(1);
    trace!(offset, start, end, "located marker");
    Ok(buffer.get(start..end).unwrap_or_default())
}

/// Decode base64 text the forgiving way.
///
/// Bytes outside the standard alphabet are skipped, and input after a
/// completed padding group is ignored. What remains must still be whole
/// quanta with correct padding.
pub fn decode_base64(encoded: &[u8]) -> Result<Vec<u8>, DecomposeError> {
    let cleaned = strip_base64_noise(encoded);
    Ok(LENIENT_STANDARD.decode(cleaned)?)
}

/// Keep only alphabet characters, stopping at the first padding group that
/// closes a quantum.
fn strip_base64_noise(encoded: &[u8]) -> Vec<u8> {
    let mut cleaned = Vec::with_capacity(encoded.len());
    let mut quad_pos = 0;
    let mut pads = 0;

    for &byte in encoded {
        if byte == b'=' {
            if quad_pos >= 2 {
                pads += 1;
                if quad_pos + pads >= 4 {
                    cleaned.extend(std::iter::repeat_n(b'=', pads));
                    break;
                }
            }
            continue;
        }
        if !(byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/') {
            continue;
        }
        pads = 0;
        quad_pos = (quad_pos + 1) % 4;
        cleaned.push(byte);
    }
    cleaned
}

/// Decompress one or more concatenated bzip2 streams.
///
/// Empty input yields empty output. Bytes following a complete stream that do
/// not start another valid stream are ignored; a stream cut short is an error.
pub fn decompress_bzip2(mut compressed: &[u8]) -> Result<Vec<u8>, DecomposeError> {
    let mut decompressed = Vec::new();
    let mut streams = 0usize;

    while !compressed.is_empty() {
        let mut decoder = BzDecoder::new(compressed);
        let mut stream = Vec::new();
        match decoder.read_to_end(&mut stream) {
            Ok(_) => {}
            Err(err) if streams > 0 && err.kind() != io::ErrorKind::UnexpectedEof => {
                trace!(error = %err, "ignoring trailing data after bzip2 stream");
                break;
            }
            Err(err) => return Err(DecomposeError::Bzip2(err)),
        }
        decompressed.extend_from_slice(&stream);
        streams += 1;
        compressed = decoder.into_inner();
    }

    Ok(decompressed)
}

/// Slice, decode and decompress the message held in `buffer`.
pub fn decompose(buffer: &[u8]) -> Result<Vec<u8>, DecomposeError> {
    let encoded = payload_slice(buffer)?;
    let compressed = decode_base64(encoded).inspect_err(|_| {
        debug!("encoded message:\n{}", render::hex_dump(encoded));
    })?;
    debug!(
        encoded = encoded.len(),
        compressed = compressed.len(),
        "decoded base64 message"
    );
    let message = decompress_bzip2(&compressed)?;
    debug!(bytes = message.len(), "decompressed message");
    Ok(message)
}

/// Read `file_path` and try to recover its `BF=` message.
///
/// Only failing to read the file is an error; a missing or damaged message
/// is reported as [`Extraction::Failed`].
pub fn extract<P: AsRef<Path>>(file_path: P) -> io::Result<Extraction> {
    let buffer = read_head(file_path)?;
    Ok(match decompose(&buffer) {
        Ok(message) => Extraction::Decomposed(message),
        Err(err) => {
            debug!(stage = err.stage(), error = %err, "failed to decompose message");
            Extraction::Failed(err)
        }
    })
}
