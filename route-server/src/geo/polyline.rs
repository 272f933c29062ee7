//! Precision-5 encoded polyline decoding.
//!
//! The format stores alternating latitude/longitude deltas. Each delta is
//! scaled by 1e5, zig-zag encoded, and split into 5-bit chunks written
//! least-significant first; every chunk except the last carries the 0x20
//! continuation bit, and each is offset by 63 into printable ASCII.

use super::Coordinate;

const PRECISION: f64 = 1e5;
const ASCII_OFFSET: u8 = 63;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;

/// Errors from decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// A byte outside the polyline alphabet (`?`..=`~`).
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    /// The string ended in the middle of a value, or after a lone latitude.
    #[error("polyline truncated at offset {0}")]
    Truncated(usize),

    /// A value used more bits than fit in a 64-bit accumulator, or the
    /// running coordinate sum left the `i64` range.
    #[error("polyline value overflows at offset {0}")]
    Overflow(usize),
}

/// Decode a precision-5 polyline into coordinates.
///
/// The empty string decodes to an empty list.
pub fn decode_polyline5(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        lat = lat
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated(index));
        }
        lon = lon
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;

        coordinates.push(Coordinate::new(
            lat as f64 / PRECISION,
            lon as f64 / PRECISION,
        ));
    }

    Ok(coordinates)
}

/// Read one zig-zag encoded delta starting at `index`, advancing it.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let offset = *index;
        let byte = *bytes.get(offset).ok_or(PolylineError::Truncated(offset))?;
        if !(ASCII_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidByte { byte, offset });
        }
        let chunk = u64::from(byte - ASCII_OFFSET);
        let bits = chunk & CHUNK_MASK;
        // At shift 60 only the low 4 bits of a chunk still fit.
        if shift >= 64 || (shift > 59 && bits >> (64 - shift) != 0) {
            return Err(PolylineError::Overflow(offset));
        }

        *index += 1;
        result |= bits << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !value } else { value })
}
