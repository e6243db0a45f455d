//! Reader and writer for Armadillo's `arma_binary` dumps.
//!
//! The simulation saves its matrices and cubes with Armadillo's default
//! binary format: a type tag line, a dimension line, then the raw
//! little-endian elements in column-major order.
//!
//! ```text
//! ARMA_CUB_BIN_FN008\n
//! 3 2 10000\n
//! <3 * 2 * 10000 f64 values>
//! ```
//!
//! Cubes are returned as `(n_slices, n_rows, n_cols)`, i.e. the slice index
//! comes first. For the trajectory dumps that is `(time, component, particle)`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, Array3, ShapeBuilder};
use tracing::debug;

use crate::error::{CalcError, CalcResult};

const MAT_PREFIX: &str = "ARMA_MAT_BIN_";
const CUBE_PREFIX: &str = "ARMA_CUB_BIN_";

/// Element encodings we understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElemType {
    F64,
    F32,
}

impl ElemType {
    fn from_tag(tag: &str) -> CalcResult<Self> {
        match tag {
            "FN008" => Ok(ElemType::F64),
            "FN004" => Ok(ElemType::F32),
            other => Err(CalcError::UnsupportedFormat(other.to_string())),
        }
    }

    fn width(self) -> usize {
        match self {
            ElemType::F64 => 8,
            ElemType::F32 => 4,
        }
    }
}

/// Split off one '\n'-terminated ASCII line.
fn take_line<'a>(bytes: &'a [u8], what: &str) -> CalcResult<(&'a str, &'a [u8])> {
    let end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| CalcError::InvalidHeader(format!("missing {what} line")))?;
    let line = std::str::from_utf8(&bytes[..end])
        .map_err(|_| CalcError::InvalidHeader(format!("{what} line is not ASCII")))?;
    Ok((line.trim(), &bytes[end + 1..]))
}

/// Parse the two header lines and return (element type, dims, payload).
fn parse_header<'a>(
    bytes: &'a [u8],
    prefix: &str,
    n_dims: usize,
) -> CalcResult<(ElemType, Vec<usize>, &'a [u8])> {
    let (tag, rest) = take_line(bytes, "type tag")?;
    let elem = match tag.strip_prefix(prefix) {
        Some(suffix) => ElemType::from_tag(suffix)?,
        None => return Err(CalcError::UnsupportedFormat(tag.to_string())),
    };

    let (dims_line, payload) = take_line(rest, "dimension")?;
    let dims = dims_line
        .split_whitespace()
        .map(|d| {
            d.parse::<usize>()
                .map_err(|_| CalcError::InvalidHeader(format!("bad dimension '{d}'")))
        })
        .collect::<CalcResult<Vec<_>>>()?;
    if dims.len() != n_dims {
        return Err(CalcError::InvalidHeader(format!(
            "expected {n_dims} dimensions, found {}",
            dims.len()
        )));
    }

    Ok((elem, dims, payload))
}

/// Product of the header dimensions.
fn element_count(dims: &[usize]) -> CalcResult<usize> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| CalcError::InvalidHeader("element count overflows".to_string()))
}

/// Decode `count` elements, widening f32 to f64.
fn decode(payload: &[u8], elem: ElemType, count: usize) -> CalcResult<Vec<f64>> {
    let expected = count
        .checked_mul(elem.width())
        .ok_or_else(|| CalcError::InvalidHeader("payload size overflows".to_string()))?;
    if payload.len() < expected {
        return Err(CalcError::Truncated {
            expected,
            found: payload.len(),
        });
    }
    let bytes = &payload[..expected];

    // payload is not aligned for floats, so copy into typed buffers
    let values = match elem {
        ElemType::F64 => {
            let mut values = vec![0.0f64; count];
            bytemuck::cast_slice_mut::<f64, u8>(&mut values).copy_from_slice(bytes);
            for v in &mut values {
                *v = f64::from_bits(u64::from_le(v.to_bits()));
            }
            values
        }
        ElemType::F32 => {
            let mut raw = vec![0.0f32; count];
            bytemuck::cast_slice_mut::<f32, u8>(&mut raw).copy_from_slice(bytes);
            raw.into_iter()
                .map(|v| f32::from_bits(u32::from_le(v.to_bits())) as f64)
                .collect()
        }
    };
    Ok(values)
}

/// Parse a matrix dump held in memory.
pub fn parse_mat(bytes: &[u8]) -> CalcResult<Array2<f64>> {
    let (elem, dims, payload) = parse_header(bytes, MAT_PREFIX, 2)?;
    let (rows, cols) = (dims[0], dims[1]);
    let data = decode(payload, elem, element_count(&dims)?)?;
    Array2::from_shape_vec((rows, cols).f(), data)
        .map_err(|e| CalcError::ShapeMismatch(e.to_string()))
}

/// Parse a cube dump held in memory into `(n_slices, n_rows, n_cols)`.
pub fn parse_cube(bytes: &[u8]) -> CalcResult<Array3<f64>> {
    let (elem, dims, payload) = parse_header(bytes, CUBE_PREFIX, 3)?;
    let (rows, cols, slices) = (dims[0], dims[1], dims[2]);
    let data = decode(payload, elem, element_count(&dims)?)?;
    // slice-major, then column, then row
    let cube = Array3::from_shape_vec((slices, cols, rows), data)
        .map_err(|e| CalcError::ShapeMismatch(e.to_string()))?;
    Ok(cube.permuted_axes([0, 2, 1]).as_standard_layout().into_owned())
}

fn read_file(path: &Path) -> CalcResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| CalcError::io(path, e))
}

/// Load a matrix saved with `mat::save`.
pub fn load_mat(path: impl AsRef<Path>) -> CalcResult<Array2<f64>> {
    let path = path.as_ref();
    let mat = parse_mat(&read_file(path)?)?;
    debug!(path = %path.display(), shape = ?mat.dim(), "loaded matrix");
    Ok(mat)
}

/// Load a cube saved with `cube::save`.
pub fn load_cube(path: impl AsRef<Path>) -> CalcResult<Array3<f64>> {
    let path = path.as_ref();
    let cube = parse_cube(&read_file(path)?)?;
    debug!(path = %path.display(), shape = ?cube.dim(), "loaded cube");
    Ok(cube)
}

fn write_values<W: Write>(out: &mut W, values: impl Iterator<Item = f64>) -> std::io::Result<()> {
    let le: Vec<f64> = values.map(|v| f64::from_bits(v.to_bits().to_le())).collect();
    out.write_all(bytemuck::cast_slice(&le))
}

/// Save a matrix as `ARMA_MAT_BIN_FN008`.
pub fn save_mat(path: impl AsRef<Path>, mat: &Array2<f64>) -> CalcResult<()> {
    let path = path.as_ref();
    let (rows, cols) = mat.dim();
    let write = || -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "{MAT_PREFIX}FN008\n{rows} {cols}\n")?;
        write_values(&mut out, mat.t().iter().copied())?;
        out.flush()
    };
    write().map_err(|e| CalcError::io(path, e))
}

/// Save a `(n_slices, n_rows, n_cols)` array as `ARMA_CUB_BIN_FN008`.
pub fn save_cube(path: impl AsRef<Path>, cube: &Array3<f64>) -> CalcResult<()> {
    let path = path.as_ref();
    let (slices, rows, cols) = cube.dim();
    let write = || -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "{CUBE_PREFIX}FN008\n{rows} {cols} {slices}\n")?;
        let column_major = (0..slices)
            .flat_map(|s| (0..cols).flat_map(move |c| (0..rows).map(move |r| (s, r, c))))
            .map(|(s, r, c)| cube[[s, r, c]]);
        write_values(&mut out, column_major)?;
        out.flush()
    };
    write().map_err(|e| CalcError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("penning_calc_arma_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_parse_mat_column_major() {
        let mut bytes = b"ARMA_MAT_BIN_FN008\n2 3\n".to_vec();
        // column-major: (0,0) (1,0) (0,1) (1,1) (0,2) (1,2)
        for v in [1.0_f64, 4.0, 2.0, 5.0, 3.0, 6.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mat = parse_mat(&bytes).unwrap();
        assert_eq!(mat, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_parse_cube_axis_order() {
        // 3 rows (components), 2 cols (particles), 2 slices (timesteps)
        let mut bytes = b"ARMA_CUB_BIN_FN008\n3 2 2\n".to_vec();
        for v in 0..12 {
            bytes.extend_from_slice(&(v as f64).to_le_bytes());
        }
        let cube = parse_cube(&bytes).unwrap();
        assert_eq!(cube.dim(), (2, 3, 2));
        // slice 1, row 2, col 1 -> 1*6 + 1*3 + 2
        assert_eq!(cube[[1, 2, 1]], 11.0);
        assert_eq!(cube[[0, 1, 0]], 1.0);
        assert_eq!(cube[[0, 0, 1]], 3.0);
    }

    #[test]
    fn test_parse_f32_payload() {
        let mut bytes = b"ARMA_MAT_BIN_FN004\n1 2\n".to_vec();
        for v in [0.5_f32, -2.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(parse_mat(&bytes).unwrap(), array![[0.5, -2.0]]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let ints = b"ARMA_MAT_BIN_IS004\n1 1\n\0\0\0\0";
        assert!(matches!(parse_mat(ints), Err(CalcError::UnsupportedFormat(_))));

        let cube_as_mat = b"ARMA_CUB_BIN_FN008\n1 1 1\n";
        assert!(matches!(parse_mat(cube_as_mat), Err(CalcError::UnsupportedFormat(_))));

        let short = b"ARMA_MAT_BIN_FN008\n2 2\n\0\0\0\0\0\0\0\0";
        assert!(matches!(
            parse_mat(short),
            Err(CalcError::Truncated { expected: 32, found: 8 })
        ));

        let bad_dims = b"ARMA_CUB_BIN_FN008\n3 x 2\n";
        assert!(matches!(parse_cube(bad_dims), Err(CalcError::InvalidHeader(_))));

        assert!(matches!(parse_mat(b"ARMA_MAT_BIN_FN008"), Err(CalcError::InvalidHeader(_))));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        let mut mat = b"ARMA_MAT_BIN_FN008\n4611686018427387904 4\n".to_vec();
        mat.extend_from_slice(&[0u8; 64]);
        assert!(matches!(parse_mat(&mat), Err(CalcError::InvalidHeader(_))));

        let cube = b"ARMA_CUB_BIN_FN008\n3 2 3074457345618258603\n";
        assert!(matches!(parse_cube(cube), Err(CalcError::InvalidHeader(_))));

        // element count fits, byte count does not
        let wide = b"ARMA_MAT_BIN_FN008\n2305843009213693952 1\n";
        assert!(matches!(parse_mat(wide), Err(CalcError::InvalidHeader(_))));

        // zero elements but an unrepresentable shape
        let empty = b"ARMA_CUB_BIN_FN008\n0 4611686018427387904 4\n";
        assert!(matches!(parse_cube(empty), Err(CalcError::ShapeMismatch(_))));
    }

    #[test]
    fn test_save_then_load() {
        let cube = Array3::from_shape_fn((4, 3, 2), |(s, r, c)| (s * 100 + r * 10 + c) as f64);
        let cube_path = temp_path("cube.bin");
        save_cube(&cube_path, &cube).unwrap();
        assert_eq!(load_cube(&cube_path).unwrap(), cube);

        let mat = array![[0.0], [0.25], [0.5]];
        let mat_path = temp_path("mat.bin");
        save_mat(&mat_path, &mat).unwrap();
        assert_eq!(load_mat(&mat_path).unwrap(), mat);
    }

    #[test]
    fn test_missing_file() {
        let err = load_mat(temp_path("does_not_exist.bin")).unwrap_err();
        assert!(matches!(err, CalcError::Io { .. }));
    }
}
