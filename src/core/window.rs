use crate::types::{Overlap, WindowError, WindowRequest, WindowResult};
use ndarray::{s, Array2, Array3, ArrayBase, Data, DataMut, Ix2, Ix3};
use num_traits::Zero;

/// Extract a `(row_end - row_start) x (col_end - col_start)` window from `grid`.
///
/// Cells of the window that fall outside the grid are zero. The request may
/// start at negative indices or extend past the grid; only inverted or empty
/// ranges are rejected, with [`WindowError::InvalidRange`].
pub fn extract_window<S, T>(
    grid: &ArrayBase<S, Ix2>,
    row_start: isize,
    row_end: isize,
    col_start: isize,
    col_end: isize,
) -> WindowResult<Array2<T>>
where
    S: Data<Elem = T>,
    T: Clone + Zero,
{
    let request = WindowRequest::new(row_start, row_end, col_start, col_end)?;
    extract_window_for(grid, &request)
}

/// Extract the window described by `request`
pub fn extract_window_for<S, T>(grid: &ArrayBase<S, Ix2>, request: &WindowRequest) -> WindowResult<Array2<T>>
where
    S: Data<Elem = T>,
    T: Clone + Zero,
{
    request.validate()?;

    let (height, width) = request.shape();
    check_allocation::<T>(height, width, 1)?;

    let mut window = Array2::zeros((height, width));
    if let Some(overlap) = locate(grid.dim(), request) {
        window
            .slice_mut(s![overlap.dst_rows, overlap.dst_cols])
            .assign(&grid.slice(s![overlap.src_rows, overlap.src_cols]));
    }

    Ok(window)
}

/// Extract into a caller-owned buffer of the request's shape.
///
/// Every cell of `out` is overwritten. On a shape mismatch `out` is left
/// untouched.
pub fn extract_window_into<S, SO, T>(
    grid: &ArrayBase<S, Ix2>,
    request: &WindowRequest,
    out: &mut ArrayBase<SO, Ix2>,
) -> WindowResult<()>
where
    S: Data<Elem = T>,
    SO: DataMut<Elem = T>,
    T: Clone + Zero,
{
    request.validate()?;

    let expected = request.shape();
    if out.dim() != expected {
        return Err(WindowError::ShapeMismatch {
            expected,
            actual: out.dim(),
        });
    }

    out.fill(T::zero());
    if let Some(overlap) = locate(grid.dim(), request) {
        out.slice_mut(s![overlap.dst_rows, overlap.dst_cols])
            .assign(&grid.slice(s![overlap.src_rows, overlap.src_cols]));
    }

    Ok(())
}

/// Extract a window from a `(rows, cols, bands)` image.
///
/// Clipping applies to rows and columns; every band is carried through.
pub fn extract_window_bands<S, T>(image: &ArrayBase<S, Ix3>, request: &WindowRequest) -> WindowResult<Array3<T>>
where
    S: Data<Elem = T>,
    T: Clone + Zero,
{
    request.validate()?;

    let (rows, cols, bands) = image.dim();
    let (height, width) = request.shape();
    check_allocation::<T>(height, width, bands)?;

    let mut window = Array3::zeros((height, width, bands));
    if let Some(overlap) = locate((rows, cols), request) {
        window
            .slice_mut(s![overlap.dst_rows, overlap.dst_cols, ..])
            .assign(&image.slice(s![overlap.src_rows, overlap.src_cols, ..]));
    }

    Ok(window)
}

// Arrays are limited to isize::MAX bytes (and elements, for zero-sized types).
fn check_allocation<T>(rows: usize, cols: usize, bands: usize) -> WindowResult<()> {
    let bytes = rows
        .checked_mul(cols)
        .and_then(|cells| cells.checked_mul(bands))
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<T>().max(1)));

    match bytes {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(WindowError::TooLarge { rows, cols, bands }),
    }
}

fn locate(dim: (usize, usize), request: &WindowRequest) -> Option<Overlap> {
    let (rows, cols) = dim;
    let overlap = request.overlap(rows, cols);
    match &overlap {
        Some(o) => log::debug!(
            "Window {} over {}x{} grid: copying rows {:?} cols {:?} to {:?} {:?}",
            request, rows, cols, o.src_rows, o.src_cols, o.dst_rows, o.dst_cols
        ),
        None => log::debug!("Window {} does not overlap {}x{} grid", request, rows, cols),
    }
    overlap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RangeAxis;
    use ndarray::{array, Array};

    fn ones5x5() -> Array2<f32> {
        Array2::ones((5, 5))
    }

    #[test]
    fn test_high_side_over_extent() {
        let window = extract_window(&ones5x5(), 0, 6, 0, 6).unwrap();

        assert_eq!(window.dim(), (6, 6));
        assert!(window.slice(s![0..5, 0..5]).iter().all(|&v| v == 1.0));
        assert!(window.row(5).iter().all(|&v| v == 0.0));
        assert!(window.column(5).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_corner_overlap() {
        let window = extract_window(&ones5x5(), 3, 8, 3, 8).unwrap();

        let mut expected = Array2::<f32>::zeros((5, 5));
        expected.slice_mut(s![0..2, 0..2]).fill(1.0);
        assert_eq!(window, expected);
    }

    #[test]
    fn test_negative_start() {
        let window = extract_window(&ones5x5(), -2, 2, -1, 1).unwrap();

        let expected: Array2<f32> = array![[0.0, 0.0], [0.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
        assert_eq!(window, expected);
    }

    #[test]
    fn test_wholly_negative_rows() {
        let window = extract_window(&ones5x5(), -10, -5, 4, 9).unwrap();

        assert_eq!(window.dim(), (5, 5));
        assert!(window.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_height_rejected() {
        let result = extract_window(&ones5x5(), 3, 3, 0, 5);
        assert_eq!(
            result,
            Err(WindowError::InvalidRange {
                axis: RangeAxis::Row,
                start: 3,
                end: 3
            })
        );
    }

    #[test]
    fn test_values_keep_position() {
        let grid = Array::from_shape_fn((4, 6), |(i, j)| (i * 10 + j) as i32);
        let window = extract_window(&grid, -1, 2, 4, 8).unwrap();

        let expected: Array2<i32> = array![[0, 0, 0, 0], [4, 5, 0, 0], [14, 15, 0, 0]];
        assert_eq!(window, expected);
    }

    #[test]
    fn test_into_resets_stale_cells() {
        let grid = Array::from_shape_fn((3, 3), |(i, j)| (i * 3 + j + 1) as u8);
        let request = WindowRequest::new(1, 4, 1, 4).unwrap();

        let mut out = Array2::from_elem((3, 3), 99u8);
        extract_window_into(&grid, &request, &mut out).unwrap();

        let expected: Array2<u8> = array![[5, 6, 0], [8, 9, 0], [0, 0, 0]];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_into_rejects_wrong_shape() {
        let grid = Array2::<f64>::ones((3, 3));
        let request = WindowRequest::new(0, 2, 0, 2).unwrap();

        let mut out = Array2::from_elem((2, 3), 7.0);
        let result = extract_window_into(&grid, &request, &mut out.view_mut());

        assert_eq!(
            result,
            Err(WindowError::ShapeMismatch {
                expected: (2, 2),
                actual: (2, 3)
            })
        );
        assert!(out.iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_bands_carried() {
        let image = Array::from_shape_fn((2, 2, 3), |(i, j, b)| (i * 100 + j * 10 + b) as u16);
        let request = WindowRequest::new(-1, 1, 1, 3).unwrap();

        let window = extract_window_bands(&image, &request).unwrap();

        assert_eq!(window.dim(), (2, 2, 3));
        assert!(window.slice(s![0, .., ..]).iter().all(|&v| v == 0));
        assert_eq!(window.slice(s![1, 0, ..]).to_vec(), vec![10, 11, 12]);
        assert!(window.slice(s![1, 1, ..]).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_oversized_window_rejected_before_allocation() {
        let grid = Array2::<f64>::ones((2, 2));
        let height = isize::MAX / 4;

        // Cell count fits, byte count does not
        let result = extract_window(&grid, 0, height, 0, 1);
        assert_eq!(
            result,
            Err(WindowError::TooLarge {
                rows: height as usize,
                cols: 1,
                bands: 1
            })
        );
    }

    #[test]
    fn test_oversized_bands_rejected() {
        let image = Array3::<u8>::ones((1, 1, 4));
        let height = isize::MAX / 2;
        let request = WindowRequest::new(0, height, 0, 1).unwrap();

        let result = extract_window_bands(&image, &request);
        assert_eq!(
            result,
            Err(WindowError::TooLarge {
                rows: height as usize,
                cols: 1,
                bands: 4
            })
        );
    }

    #[test]
    fn test_hand_built_request_validated() {
        let grid = Array2::<f32>::ones((4, 4));
        let inverted = WindowRequest {
            row_start: 2,
            row_end: 1,
            col_start: 0,
            col_end: 2,
        };
        let expected_err = WindowError::InvalidRange {
            axis: RangeAxis::Row,
            start: 2,
            end: 1,
        };

        assert_eq!(extract_window_for(&grid, &inverted), Err(expected_err.clone()));

        let image = Array3::<f32>::ones((4, 4, 3));
        assert_eq!(extract_window_bands(&image, &inverted), Err(expected_err.clone()));

        let mut out = Array2::from_elem((1, 2), 5.0f32);
        assert_eq!(
            extract_window_into(&grid, &inverted, &mut out),
            Err(expected_err)
        );
        assert!(out.iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_hand_built_empty_columns_validated() {
        let grid = Array2::<i32>::ones((4, 4));
        let empty = WindowRequest {
            row_start: 0,
            row_end: 2,
            col_start: 3,
            col_end: 3,
        };

        assert!(matches!(
            extract_window_for(&grid, &empty),
            Err(WindowError::InvalidRange {
                axis: RangeAxis::Column,
                ..
            })
        ));
    }

    #[test]
    fn test_works_on_views() {
        let grid = Array::from_shape_fn((6, 6), |(i, j)| (i + j) as f64);
        let view = grid.slice(s![2.., 2..]);

        let window = extract_window(&view, 3, 5, 3, 5).unwrap();
        let expected: Array2<f64> = array![[10.0, 0.0], [0.0, 0.0]];
        assert_eq!(window, expected);
    }
}
