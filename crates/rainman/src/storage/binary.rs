//! Binary snapshot form of a series.
//!
//! Layout: 8-byte magic, 32-byte BLAKE3 digest of the payload, then the
//! bincode payload. bincode writes every map and sequence with a `u64` length
//! prefix, so the payload is self-delimiting.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::series::RainfallSeries;

/// Leading bytes of every snapshot.
pub const MAGIC: [u8; 8] = *b"RAINMAN1";

const DIGEST_LEN: usize = blake3::OUT_LEN;
const HEADER_LEN: usize = MAGIC.len() + DIGEST_LEN;

/// Encode `series` into snapshot bytes.
///
/// # Errors
///
/// Returns an error if bincode fails to encode the series.
pub fn encode(series: &RainfallSeries) -> Result<Vec<u8>> {
    let payload = bincode::serialize(series)?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(blake3::hash(&payload).as_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode snapshot bytes read from `path`.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns [`Error::Corrupt`] if the header is missing or the digest does not
/// match, or [`Error::Encode`] if the payload cannot be decoded.
pub fn decode(bytes: &[u8], path: &Path) -> Result<RainfallSeries> {
    let corrupt = |message: &str| Error::Corrupt {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    if bytes.len() < HEADER_LEN {
        return Err(corrupt("file is shorter than the header"));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    let (digest, payload) = rest.split_at(DIGEST_LEN);

    if magic != MAGIC.as_slice() {
        return Err(corrupt("bad magic"));
    }
    if blake3::hash(payload).as_bytes() != digest {
        return Err(corrupt("digest mismatch"));
    }

    Ok(bincode::deserialize(payload)?)
}

/// Read the snapshot at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode.
pub fn read_snapshot(path: &Path) -> Result<RainfallSeries> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let series = decode(&bytes, path)?;
    debug!(
        "Read snapshot of {} month(s) from {}",
        series.month_count(),
        path.display()
    );
    Ok(series)
}

/// Overwrite the snapshot at `path` with `series`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_snapshot(path: &Path, series: &RainfallSeries) -> Result<()> {
    let bytes = encode(series)?;
    fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    debug!("Wrote {} byte snapshot to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_series() -> RainfallSeries {
        let mut series = RainfallSeries::new();
        series.set_record(2021, 2, 0, 0.5).unwrap();
        series.set_record(2024, 2, 28, 1.1).unwrap();
        series.set_record(1987, 12, 24, 0.02).unwrap();
        series
    }

    #[test]
    fn test_encode_starts_with_magic() {
        let bytes = encode(&sample_series()).unwrap();
        assert_eq!(&bytes[..8], b"RAINMAN1");
        assert!(bytes.len() > HEADER_LEN);
    }

    #[test]
    fn test_decode_encoded() {
        let series = sample_series();
        let bytes = encode(&series).unwrap();
        let decoded = decode(&bytes, Path::new("x.rm")).unwrap();
        assert_eq!(decoded, series);
    }

    #[test]
    fn test_decode_empty_series() {
        let bytes = encode(&RainfallSeries::new()).unwrap();
        let decoded = decode(&bytes, Path::new("x.rm")).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        let err = decode(b"RAIN", Path::new("x.rm")).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }));
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = encode(&sample_series()).unwrap();
        bytes[0] = b'X';
        let err = decode(&bytes, Path::new("x.rm")).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_decode_detects_flipped_payload_bit() {
        let mut bytes = encode(&sample_series()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let err = decode(&bytes, Path::new("x.rm")).unwrap_err();
        assert!(err.to_string().contains("digest mismatch"));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_write_and_read_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TEST.rm");
        let series = sample_series();

        write_snapshot(&path, &series).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), series);
    }

    #[test]
    fn test_write_snapshot_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("TEST.rm");

        write_snapshot(&path, &sample_series()).unwrap();
        write_snapshot(&path, &RainfallSeries::new()).unwrap();
        assert!(read_snapshot(&path).unwrap().is_empty());
    }
}
