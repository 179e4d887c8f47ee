use crate::core::window::extract_window_for;
use crate::types::{WindowError, WindowRequest, WindowResult};
use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Patch sampling parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSamplerParams {
    /// Patch height in rows
    pub patch_height: usize,
    /// Patch width in columns
    pub patch_width: usize,
}

impl Default for PatchSamplerParams {
    fn default() -> Self {
        Self {
            patch_height: 32,
            patch_width: 32,
        }
    }
}

/// Fixed-size patch sampler built on window extraction.
///
/// Patches near or beyond the grid edges are zero-padded, so every patch has
/// the configured shape.
#[derive(Debug, Clone)]
pub struct PatchSampler {
    params: PatchSamplerParams,
}

impl Default for PatchSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchSampler {
    /// Create a new patch sampler with default parameters
    pub fn new() -> Self {
        Self {
            params: PatchSamplerParams::default(),
        }
    }

    /// Create a patch sampler with custom parameters
    pub fn with_params(params: PatchSamplerParams) -> WindowResult<Self> {
        if params.patch_height == 0 || params.patch_width == 0 {
            return Err(WindowError::InvalidParams(format!(
                "Patch size {}x{} must be non-zero",
                params.patch_height, params.patch_width
            )));
        }

        WindowRequest::centered(0, 0, params.patch_height, params.patch_width).map_err(|e| {
            WindowError::InvalidParams(format!(
                "Patch size {}x{} is unusable: {}",
                params.patch_height, params.patch_width, e
            ))
        })?;

        Ok(Self { params })
    }

    /// Current sampler parameters
    pub fn params(&self) -> &PatchSamplerParams {
        &self.params
    }

    /// Request for the patch centered on `(center_row, center_col)`
    pub fn request_at(&self, center_row: isize, center_col: isize) -> WindowResult<WindowRequest> {
        WindowRequest::centered(
            center_row,
            center_col,
            self.params.patch_height,
            self.params.patch_width,
        )
    }

    /// Sample one patch centered on `(center_row, center_col)`
    pub fn sample<S, T>(&self, grid: &ArrayBase<S, Ix2>, center_row: isize, center_col: isize) -> WindowResult<Array2<T>>
    where
        S: Data<Elem = T>,
        T: Clone + Zero,
    {
        let request = self.request_at(center_row, center_col)?;
        extract_window_for(grid, &request)
    }

    /// Sample one patch per center, in input order
    pub fn sample_many<S, T>(&self, grid: &ArrayBase<S, Ix2>, centers: &[(isize, isize)]) -> WindowResult<Vec<Array2<T>>>
    where
        S: Data<Elem = T>,
        T: Clone + Zero + Send,
        ArrayBase<S, Ix2>: Sync,
    {
        log::info!(
            "Sampling {} patches of {}x{} from {}x{} grid",
            centers.len(),
            self.params.patch_height,
            self.params.patch_width,
            grid.nrows(),
            grid.ncols()
        );

        self.sample_centers(grid, centers)
    }

    #[cfg(feature = "parallel")]
    fn sample_centers<S, T>(&self, grid: &ArrayBase<S, Ix2>, centers: &[(isize, isize)]) -> WindowResult<Vec<Array2<T>>>
    where
        S: Data<Elem = T>,
        T: Clone + Zero + Send,
        ArrayBase<S, Ix2>: Sync,
    {
        use rayon::prelude::*;

        centers
            .par_iter()
            .map(|&(row, col)| self.sample(grid, row, col))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn sample_centers<S, T>(&self, grid: &ArrayBase<S, Ix2>, centers: &[(isize, isize)]) -> WindowResult<Vec<Array2<T>>>
    where
        S: Data<Elem = T>,
        T: Clone + Zero + Send,
        ArrayBase<S, Ix2>: Sync,
    {
        centers
            .iter()
            .map(|&(row, col)| self.sample(grid, row, col))
            .collect()
    }

    /// Row-major tiling of a `rows x cols` grid with patch-sized requests.
    ///
    /// Edge tiles extend past the grid rather than shrinking.
    pub fn tile_requests(&self, rows: usize, cols: usize) -> Vec<WindowRequest> {
        let (height, width) = (self.params.patch_height, self.params.patch_width);

        let mut requests = Vec::new();
        for row in (0..rows).step_by(height) {
            for col in (0..cols).step_by(width) {
                let row_start = row as isize;
                let col_start = col as isize;
                requests.push(WindowRequest {
                    row_start,
                    row_end: row_start.saturating_add(height as isize),
                    col_start,
                    col_end: col_start.saturating_add(width as isize),
                });
            }
        }

        requests
    }

    /// Cut `grid` into patch-sized tiles, zero-padding the far edges
    pub fn tiles<S, T>(&self, grid: &ArrayBase<S, Ix2>) -> WindowResult<Vec<(WindowRequest, Array2<T>)>>
    where
        S: Data<Elem = T>,
        T: Clone + Zero,
    {
        let requests = self.tile_requests(grid.nrows(), grid.ncols());
        log::info!(
            "Tiling {}x{} grid into {} tiles of {}x{}",
            grid.nrows(),
            grid.ncols(),
            requests.len(),
            self.params.patch_height,
            self.params.patch_width
        );

        requests
            .into_iter()
            .map(|request| extract_window_for(grid, &request).map(|tile| (request, tile)))
            .collect()
    }
}
