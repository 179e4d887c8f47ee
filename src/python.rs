use crate::core::{extract_window_for, PatchSampler, PatchSamplerParams};
use crate::types::{WindowError, WindowRequest};
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(extract_window, m)?)?;
    m.add_class::<PyPatchSampler>()?;
    Ok(())
}

fn to_py_err(err: WindowError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{}", err))
}

/// Extract a zero-padded window from a 2-D float64 array
#[pyfunction]
fn extract_window<'py>(
    py: Python<'py>,
    grid: PyReadonlyArray2<'py, f64>,
    row_start: isize,
    row_end: isize,
    col_start: isize,
    col_end: isize,
) -> PyResult<&'py PyArray2<f64>> {
    let request = WindowRequest::new(row_start, row_end, col_start, col_end).map_err(to_py_err)?;
    let window = extract_window_for(&grid.as_array(), &request).map_err(to_py_err)?;
    Ok(window.into_pyarray(py))
}

/// Python wrapper for PatchSampler
#[pyclass(name = "PatchSampler")]
struct PyPatchSampler {
    inner: PatchSampler,
}

#[pymethods]
impl PyPatchSampler {
    #[new]
    fn new(patch_height: usize, patch_width: usize) -> PyResult<Self> {
        let inner = PatchSampler::with_params(PatchSamplerParams {
            patch_height,
            patch_width,
        })
        .map_err(to_py_err)?;

        Ok(PyPatchSampler { inner })
    }

    fn sample<'py>(
        &self,
        py: Python<'py>,
        grid: PyReadonlyArray2<'py, f64>,
        center_row: isize,
        center_col: isize,
    ) -> PyResult<&'py PyArray2<f64>> {
        let patch = self
            .inner
            .sample(&grid.as_array(), center_row, center_col)
            .map_err(to_py_err)?;
        Ok(patch.into_pyarray(py))
    }

    fn __repr__(&self) -> String {
        let params = self.inner.params();
        format!(
            "PatchSampler(patch_height={}, patch_width={})",
            params.patch_height, params.patch_width
        )
    }
}
