use super::{ReinforcingSteel, UniaxialMaterial};
use crate::base::{ParamSteel, RebarError, RebarResult, Settings};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Holds the response of a material at one point of a strain path (engineering measures)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Holds the strain
    pub strain: f64,

    /// Holds the stress
    pub stress: f64,

    /// Holds the tangent modulus
    pub tangent: f64,

    /// Holds the id of the active branch
    pub branch_id: usize,

    /// Holds the cumulative damage index
    pub damage: f64,
}

/// Holds a sequence of imposed (engineering) strains
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrainPath {
    /// Holds the strains
    pub strains: Vec<f64>,
}

impl StrainPath {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        StrainPath { strains: Vec::new() }
    }

    /// Returns the last strain or zero if the path is empty
    pub fn last(&self) -> f64 {
        self.strains.last().copied().unwrap_or(0.0)
    }

    /// Appends a strain
    pub fn push(&mut self, strain: f64) -> &mut Self {
        self.strains.push(strain);
        self
    }

    /// Appends `n_increments` equal steps from the last strain to `target`
    pub fn linear_to(&mut self, target: f64, n_increments: usize) -> &mut Self {
        let start = self.last();
        let n = usize::max(n_increments, 1);
        for i in 1..=n {
            let t = (i as f64) / (n as f64);
            self.strains.push(start + t * (target - start));
        }
        self
    }

    /// Appends symmetric cycles
    ///
    /// Each amplitude `a` adds a branch to `+a` followed by a branch to `-a`; each
    /// branch is divided into `n_increments` steps.
    pub fn cycles(&mut self, amplitudes: &[f64], n_increments: usize) -> &mut Self {
        for a in amplitudes {
            self.linear_to(*a, n_increments);
            self.linear_to(-*a, n_increments);
        }
        self
    }

    /// Drives a material through the path, committing each step
    ///
    /// Returns one response per strain of the path. Stops at the first error.
    pub fn follow(&self, material: &mut dyn UniaxialMaterial) -> RebarResult<Vec<Response>> {
        let mut responses = Vec::with_capacity(self.strains.len());
        for strain in &self.strains {
            material.set_trial_strain(*strain, 0.0)?;
            material.commit_state()?;
            responses.push(Response {
                strain: material.strain(),
                stress: material.stress(),
                tangent: material.tangent(),
                branch_id: material.branch_id(),
                damage: material.cumulative_damage(),
            });
        }
        Ok(responses)
    }
}

/// Computes the work per unit volume ∫σ dε along the responses (trapezoidal rule)
pub fn dissipated_energy(responses: &[Response]) -> f64 {
    responses
        .windows(2)
        .map(|w| 0.5 * (w[0].stress + w[1].stress) * (w[1].strain - w[0].strain))
        .sum()
}

/// Computes the energy dissipated by each closed loop
///
/// The loops are delimited by the peaks of the strain history, i.e., the points where
/// the strain stops increasing and starts decreasing.
pub fn loop_energies(responses: &[Response]) -> Vec<f64> {
    let mut peaks = Vec::new();
    for i in 1..responses.len().saturating_sub(1) {
        let before = responses[i].strain - responses[i - 1].strain;
        let after = responses[i + 1].strain - responses[i].strain;
        if before > 0.0 && after < 0.0 {
            peaks.push(i);
        }
    }
    if let Some(last) = responses.len().checked_sub(1) {
        if last > 0 && responses[last].strain > responses[last - 1].strain {
            peaks.push(last);
        }
    }
    peaks
        .windows(2)
        .map(|w| dissipated_energy(&responses[w[0]..=w[1]]))
        .collect()
}

/// Writes the responses to a CSV file
///
/// # Input
///
/// * `full_path` -- may be a String, &str, or Path
pub fn write_responses_csv<P>(responses: &[Response], full_path: &P) -> RebarResult<()>
where
    P: AsRef<OsStr> + ?Sized,
{
    let path = Path::new(full_path).to_path_buf();
    if let Some(p) = path.parent() {
        fs::create_dir_all(p)?;
    }
    let mut buffer = BufWriter::new(File::create(&path)?);
    writeln!(buffer, "strain,stress,tangent,branch_id,damage")?;
    for r in responses {
        writeln!(
            buffer,
            "{:?},{:?},{:?},{},{:?}",
            r.strain, r.stress, r.tangent, r.branch_id, r.damage
        )?;
    }
    buffer.flush()?;
    Ok(())
}

/// Holds the input of a strain-path simulation
///
/// Example of a JSON file:
///
/// ```text
/// {
///   "param": {"fy": 420.0, "fu": 630.0, "young": 200000.0, "young_sh": 5000.0, "esh": 0.008, "eu": 0.12},
///   "strains": [0.0, 0.01, 0.02, 0.01, 0.0, -0.01]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathInput {
    /// Holds the material parameters
    pub param: ParamSteel,

    /// Holds the numerical settings (defaults are used if absent)
    #[serde(default)]
    pub settings: Option<Settings>,

    /// Holds the imposed (engineering) strains
    pub strains: Vec<f64>,
}

impl PathInput {
    /// Reads a JSON file containing the input
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> RebarResult<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path)?;
        let buffered = BufReader::new(input);
        let data: PathInput = serde_json::from_reader(buffered)?;
        if data.strains.is_empty() {
            return Err(RebarError::InvalidParameter("the strain path is empty".to_string()));
        }
        Ok(data)
    }

    /// Allocates a model and drives it through the strains
    pub fn run(&self) -> RebarResult<Vec<Response>> {
        let settings = self.settings.unwrap_or_default();
        let mut steel = ReinforcingSteel::new(&self.param, &settings)?;
        let path = StrainPath {
            strains: self.strains.clone(),
        };
        path.follow(&mut steel)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
