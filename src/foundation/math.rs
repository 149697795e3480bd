use crate::foundation::{
    core::Mat4,
    error::{R3dError, R3dResult},
};

/// Overwrite `out` with the identity matrix.
pub fn identity(out: &mut Mat4) {
    *out = Mat4::ZERO;
    out.m[0] = 1.0;
    out.m[5] = 1.0;
    out.m[10] = 1.0;
    out.m[15] = 1.0;
}

/// `out = lhs * rhs` for column-major matrices indexed `row + 4 * col`.
///
/// Column `c` of the result is `lhs` applied to column `c` of `rhs`.
pub fn multiply(out: &mut Mat4, lhs: &Mat4, rhs: &Mat4) {
    let a = &lhs.m;
    let b = &rhs.m;
    for col in 0..4 {
        let c = 4 * col;
        for row in 0..4 {
            out.m[c + row] = a[row] * b[c]
                + a[row + 4] * b[c + 1]
                + a[row + 8] * b[c + 2]
                + a[row + 12] * b[c + 3];
        }
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        multiply(&mut out, &self, &rhs);
        out
    }
}

/// Flip a pixel buffer vertically in place: row `i` swaps with row `rows - 1 - i`.
pub fn swap_rows(buf: &mut [u8], rows: usize, bytes_per_row: usize) -> R3dResult<()> {
    let needed = rows
        .checked_mul(bytes_per_row)
        .ok_or_else(|| R3dError::validation("row buffer size overflow"))?;
    if buf.len() < needed {
        return Err(R3dError::validation(format!(
            "row buffer holds {} bytes, {rows} rows of {bytes_per_row} need {needed}",
            buf.len()
        )));
    }

    for i in 0..rows / 2 {
        let lo = i * bytes_per_row;
        let hi = (rows - 1 - i) * bytes_per_row;
        let (head, tail) = buf.split_at_mut(hi);
        head[lo..lo + bytes_per_row].swap_with_slice(&mut tail[..bytes_per_row]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
