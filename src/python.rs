use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::core::Simulation;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing driver around the Rust Simulation core.
///
/// - __new__(num_particles, seed=None)
/// - step(time_limit, redraw_hz) -> "idle" | "discarded" | "collision" | "redraw"
/// - run_until_idle(time_limit, redraw_hz) -> (collisions, redraws, discarded)
/// - get_positions() -> np.ndarray, shape (N, 2)
/// - get_radii() -> np.ndarray, shape (N,)
///
/// Random placement does not keep discs off the walls or apart from each
/// other. Overlapping starts are not corrected, so their predicted contact
/// times can lie in the past and `time()` may decrease between steps.
#[pyclass]
pub struct BilliardSim {
    sim: Simulation,
}

#[pymethods]
impl BilliardSim {
    /// Build `num_particles` random discs in the unit square.
    ///
    /// Parameters
    /// - num_particles: number of particles (int, >= 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    #[new]
    #[pyo3(signature = (num_particles, seed=None))]
    fn new(num_particles: usize, seed: Option<u64>) -> PyResult<Self> {
        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        let sim = Simulation::random(num_particles, &mut rng).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Process at most one event and report what happened.
    fn step(&mut self, time_limit: f64, redraw_hz: f64) -> PyResult<&'static str> {
        self.sim
            .step(time_limit, redraw_hz)
            .map(|o| o.as_str())
            .map_err(py_err)
    }

    /// Step until the queue drains (releases the GIL during computation).
    fn run_until_idle(
        &mut self,
        py: Python<'_>,
        time_limit: f64,
        redraw_hz: f64,
    ) -> PyResult<(u64, u64, u64)> {
        let stats = py
            .detach(|| self.sim.run_until_idle(time_limit, redraw_hz))
            .map_err(py_err)?;
        Ok((stats.collisions, stats.redraws, stats.discarded))
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let snap = self.sim.snapshot();
        let mut arr = Array2::<f64>::zeros((snap.len(), 2));
        for (i, v) in snap.iter().enumerate() {
            arr[[i, 0]] = v.rx;
            arr[[i, 1]] = v.ry;
        }
        Ok(arr.into_pyarray(py).unbind())
    }

    /// Return radii as a NumPy array of shape (N,), dtype=float64.
    fn get_radii<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
        let radii: Array1<f64> = self.sim.particles().iter().map(|p| p.radius()).collect();
        Ok(radii.into_pyarray(py).unbind())
    }

    /// Current simulated time. Not monotone for populations that start overlapping.
    fn time(&self) -> f64 {
        self.sim.time()
    }

    fn kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }

    fn pending_events(&self) -> usize {
        self.sim.pending_events()
    }
}

/// The collisim Python module entry point.
#[pymodule]
fn collisim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BilliardSim>()?;
    Ok(())
}
