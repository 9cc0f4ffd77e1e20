use super::{Anchor, Backbone, Branch, BranchStack, Buckling, FatigueState, HardeningLocation};
use super::{ReinforcingSteel, SteelState, TransitionCurve};
use crate::base::{ParamBuckling, ParamCurve, ParamFatigue, ParamHardening, ParamSteel};
use crate::base::{RebarError, RebarResult, Settings};
use serde::{Deserialize, Deserializer};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Version of the flat state layout
const FLAT_VERSION: f64 = 1.0;

/// Number of values of each frame in the anchor-history arrays
pub const N_FRAME_VALUES: usize = 11;

/// Number of values of the header, parameters and settings
pub const N_HEADER_VALUES: usize = 2 + 18 + 8;

/// Number of scalar values of each state (excluding the anchor-history array)
pub const N_STATE_SCALARS: usize = 8 + 8 + 1 + 18 + 1 + 6 + 2 + 2;

/// Returns the length of the flat state vector for a given stack capacity
pub fn flat_len(capacity: usize) -> usize {
    N_HEADER_VALUES + 2 * (N_STATE_SCALARS + capacity * N_FRAME_VALUES)
}

/// Appends values to the flat state vector
struct FlatWriter {
    data: Vec<f64>,
}

/// Reads values from the flat state vector
struct FlatReader<'a> {
    data: &'a [f64],
    pos: usize,
}

impl FlatWriter {
    fn put(&mut self, value: f64) {
        self.data.push(value);
    }

    fn put_all(&mut self, values: &[f64]) {
        self.data.extend_from_slice(values);
    }

    fn put_anchor(&mut self, anchor: &Option<Anchor>) {
        match anchor {
            Some(a) => self.put_all(&[1.0, a.strain, a.stress, a.tangent]),
            None => self.put_all(&[0.0, 0.0, 0.0, 0.0]),
        }
    }

    fn put_state(&mut self, state: &SteelState) {
        self.put_all(&[
            state.strain,
            state.stress,
            state.tangent,
            state.ideal_stress,
            state.ideal_tangent,
            state.branch.code(),
            state.shift_tension,
            state.shift_compression,
        ]);
        self.put_anchor(&state.return_tension);
        self.put_anchor(&state.return_compression);
        self.put(state.hardening.factor);
        let b = &state.backbone;
        self.put_all(&[
            b.ee, b.eyp, b.fyp, b.ee_plat, b.fy0, b.eshp0, b.esup0, b.fsup, b.ee_su, b.ee_sh, b.factor, b.eshp, b.fshp,
            b.ee_shp, b.esup, b.window, b.dd, b.pp,
        ]);
        self.put(state.buckling_reference);
        let f = &state.fatigue;
        self.put_all(&[
            f.reversal_strain,
            f.reversal_stress,
            f.open_plastic,
            f.open_damage,
            f.cumulative_plastic,
            f.cumulative_damage,
        ]);
        self.put(state.scale_factor);
        self.put(if state.failed { 1.0 } else { 0.0 });
        self.put(state.stack.depth() as f64);
        self.put(state.stack.root_direction());
        for c in state.stack.frames() {
            self.put_all(&[
                c.ein, c.fin, c.ee_in, c.eout, c.fout, c.ee_out, c.rr, c.fch, c.qq, c.ee_sec, c.ee_return,
            ]);
        }
        let padding = (state.stack.capacity() - state.stack.depth()) * N_FRAME_VALUES;
        self.data.extend(std::iter::repeat(0.0).take(padding));
    }
}

impl<'a> FlatReader<'a> {
    fn get(&mut self) -> RebarResult<f64> {
        let value = self
            .data
            .get(self.pos)
            .copied()
            .ok_or_else(|| RebarError::InvalidState(format!("missing value at position {}", self.pos)))?;
        self.pos += 1;
        Ok(value)
    }

    fn get_count(&mut self, what: &str) -> RebarResult<usize> {
        let value = self.get()?;
        if !(value >= 0.0 && value.fract() == 0.0 && value < 1e9) {
            return Err(RebarError::InvalidState(format!("{} = {:?} must be a non-negative integer", what, value)));
        }
        Ok(value as usize)
    }

    fn get_flag(&mut self, what: &str) -> RebarResult<bool> {
        match self.get()? {
            v if v == 0.0 => Ok(false),
            v if v == 1.0 => Ok(true),
            v => Err(RebarError::InvalidState(format!("{} flag = {:?} must be 0 or 1", what, v))),
        }
    }

    fn get_anchor(&mut self) -> RebarResult<Option<Anchor>> {
        let present = self.get_flag("anchor")?;
        let anchor = Anchor::new(self.get()?, self.get()?, self.get()?);
        Ok(if present { Some(anchor) } else { None })
    }

    fn get_curve(&mut self) -> RebarResult<TransitionCurve> {
        Ok(TransitionCurve {
            ein: self.get()?,
            fin: self.get()?,
            ee_in: self.get()?,
            eout: self.get()?,
            fout: self.get()?,
            ee_out: self.get()?,
            rr: self.get()?,
            fch: self.get()?,
            qq: self.get()?,
            ee_sec: self.get()?,
            ee_return: self.get()?,
        })
    }

    fn get_state(&mut self, param: &ParamSteel, capacity: usize) -> RebarResult<SteelState> {
        let strain = self.get()?;
        let stress = self.get()?;
        let tangent = self.get()?;
        let ideal_stress = self.get()?;
        let ideal_tangent = self.get()?;
        let branch = Branch::from_code(self.get()?)?;
        let shift_tension = self.get()?;
        let shift_compression = self.get()?;
        let return_tension = self.get_anchor()?;
        let return_compression = self.get_anchor()?;
        let mut hardening = HardeningLocation::new(&param.hardening);
        hardening.factor = self.get()?;
        let backbone = Backbone {
            ee: self.get()?,
            eyp: self.get()?,
            fyp: self.get()?,
            ee_plat: self.get()?,
            fy0: self.get()?,
            eshp0: self.get()?,
            esup0: self.get()?,
            fsup: self.get()?,
            ee_su: self.get()?,
            ee_sh: self.get()?,
            factor: self.get()?,
            eshp: self.get()?,
            fshp: self.get()?,
            ee_shp: self.get()?,
            esup: self.get()?,
            window: self.get()?,
            dd: self.get()?,
            pp: self.get()?,
        };
        let buckling_reference = self.get()?;
        let fatigue = FatigueState {
            reversal_strain: self.get()?,
            reversal_stress: self.get()?,
            open_plastic: self.get()?,
            open_damage: self.get()?,
            cumulative_plastic: self.get()?,
            cumulative_damage: self.get()?,
        };
        let scale_factor = self.get()?;
        let failed = self.get_flag("failed")?;
        let depth = self.get_count("depth")?;
        let root_direction = self.get()?;
        if depth > capacity {
            return Err(RebarError::InvalidState(format!(
                "depth = {} exceeds the capacity = {}",
                depth, capacity
            )));
        }
        let mut frames = Vec::with_capacity(depth);
        for _ in 0..depth {
            frames.push(self.get_curve()?);
        }
        self.pos += (capacity - depth) * N_FRAME_VALUES;
        let stack = BranchStack::from_frames(frames, capacity, root_direction)?;
        Ok(SteelState {
            strain,
            stress,
            tangent,
            ideal_stress,
            ideal_tangent,
            branch,
            stack,
            shift_tension,
            shift_compression,
            return_tension,
            return_compression,
            hardening,
            backbone,
            buckling_reference,
            fatigue,
            scale_factor,
            failed,
        })
    }
}

/// Holds the decoded fields of a model before the consistency checks
#[derive(Deserialize)]
struct StoredSteel {
    param: ParamSteel,
    settings: Settings,
    committed: SteelState,
    trial: SteelState,
}

impl StoredSteel {
    /// Checks the decoded fields and allocates the model
    ///
    /// The buckling post-processor is rebuilt from the parameters.
    fn into_steel(self) -> RebarResult<ReinforcingSteel> {
        self.param.validate()?;
        self.settings.validate()?;
        let capacity = 2 * self.settings.max_nesting + 1;
        check_state(&self.committed, &self.param, capacity)?;
        check_state(&self.trial, &self.param, capacity)?;
        let buckling = Buckling::new(self.param.buckling, &Backbone::new(&self.param, 1.0), &self.settings);
        Ok(ReinforcingSteel {
            param: self.param,
            settings: self.settings,
            buckling,
            committed: self.committed,
            trial: self.trial,
        })
    }
}

/// Checks the consistency of a decoded state
fn check_state(state: &SteelState, param: &ParamSteel, capacity: usize) -> RebarResult<()> {
    let stack = &state.stack;
    if stack.capacity() != capacity {
        return Err(RebarError::InvalidState(format!(
            "stack capacity = {} must be {}",
            stack.capacity(),
            capacity
        )));
    }
    BranchStack::from_frames(stack.frames().to_vec(), capacity, stack.root_direction())?;
    if (state.branch == Branch::Transition) == stack.is_empty() {
        return Err(RebarError::InvalidState(format!(
            "branch {:?} is inconsistent with {} frames",
            state.branch,
            stack.depth()
        )));
    }
    let h = &state.hardening;
    if h.a1 != param.hardening.a1 || h.limit != param.hardening.limit {
        return Err(RebarError::InvalidState("hardening constants differ from the parameters".to_string()));
    }
    if !(h.factor >= h.limit && h.factor <= 1.0) {
        return Err(RebarError::InvalidState(format!(
            "hardening factor = {:?} must be in [{:?}, 1]",
            h.factor, h.limit
        )));
    }
    if state.backbone.factor != h.factor {
        return Err(RebarError::InvalidState(format!(
            "backbone factor = {:?} differs from hardening factor = {:?}",
            state.backbone.factor, h.factor
        )));
    }
    Ok(())
}

impl<'de> Deserialize<'de> for ReinforcingSteel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = StoredSteel::deserialize(deserializer)?;
        stored.into_steel().map_err(serde::de::Error::custom)
    }
}

impl ReinforcingSteel {
    /// Returns the full model as a flat vector
    ///
    /// The layout is:
    ///
    /// ```text
    /// [version, capacity,
    ///  fy, fu, young, young_sh, esh, eu, buckling(4), cf, alpha, cd, r1, r2, r3, a1, limit,
    ///  settings(8),
    ///  committed state scalars, committed anchor-history array (capacity × 11),
    ///  trial state scalars, trial anchor-history array (capacity × 11)]
    /// ```
    ///
    /// Unused frames of the anchor-history arrays are padded with zeros.
    pub fn to_flat(&self) -> Vec<f64> {
        let capacity = self.committed.stack.capacity();
        let mut w = FlatWriter {
            data: Vec::with_capacity(flat_len(capacity)),
        };
        w.put(FLAT_VERSION);
        w.put(capacity as f64);
        let p = &self.param;
        w.put_all(&[p.fy, p.fu, p.young, p.young_sh, p.esh, p.eu]);
        match p.buckling {
            ParamBuckling::None => w.put_all(&[0.0, 0.0, 0.0, 0.0]),
            ParamBuckling::GomesAppleton { slenderness, beta, r } => w.put_all(&[1.0, slenderness, beta, r]),
            ParamBuckling::DhakalMaekawa { slenderness, alpha } => w.put_all(&[2.0, slenderness, alpha, 0.0]),
        }
        w.put_all(&[p.fatigue.cf, p.fatigue.alpha, p.fatigue.cd]);
        w.put_all(&[p.curve.r1, p.curve.r2, p.curve.r3]);
        w.put_all(&[p.hardening.a1, p.hardening.limit]);
        let s = &self.settings;
        w.put_all(&[
            s.max_nesting as f64,
            s.fit_bisection_tol,
            s.fit_tolerance,
            s.fit_max_iterations as f64,
            s.min_engineering_strain,
            s.buckling_floor,
            s.buckling_step,
            s.failed_tangent_ratio,
        ]);
        w.put_state(&self.committed);
        w.put_state(&self.trial);
        w.data
    }

    /// Allocates a new instance from a flat vector generated by [ReinforcingSteel::to_flat]
    pub fn from_flat(data: &[f64]) -> RebarResult<Self> {
        let mut r = FlatReader { data, pos: 0 };
        let version = r.get()?;
        if version != FLAT_VERSION {
            return Err(RebarError::InvalidState(format!("version = {:?} is not supported", version)));
        }
        let capacity = r.get_count("capacity")?;
        if data.len() != flat_len(capacity) {
            return Err(RebarError::InvalidState(format!(
                "length = {} is incorrect; it must be {}",
                data.len(),
                flat_len(capacity)
            )));
        }
        let (fy, fu, young, young_sh, esh, eu) = (r.get()?, r.get()?, r.get()?, r.get()?, r.get()?, r.get()?);
        let code = r.get()?;
        let (b1, b2, b3) = (r.get()?, r.get()?, r.get()?);
        let buckling = match code {
            c if c == 0.0 => ParamBuckling::None,
            c if c == 1.0 => ParamBuckling::GomesAppleton {
                slenderness: b1,
                beta: b2,
                r: b3,
            },
            c if c == 2.0 => ParamBuckling::DhakalMaekawa {
                slenderness: b1,
                alpha: b2,
            },
            c => return Err(RebarError::InvalidState(format!("buckling code = {:?} is invalid", c))),
        };
        let param = ParamSteel {
            fy,
            fu,
            young,
            young_sh,
            esh,
            eu,
            buckling,
            fatigue: ParamFatigue {
                cf: r.get()?,
                alpha: r.get()?,
                cd: r.get()?,
            },
            curve: ParamCurve {
                r1: r.get()?,
                r2: r.get()?,
                r3: r.get()?,
            },
            hardening: ParamHardening {
                a1: r.get()?,
                limit: r.get()?,
            },
        };
        let settings = Settings {
            max_nesting: r.get_count("max_nesting")?,
            fit_bisection_tol: r.get()?,
            fit_tolerance: r.get()?,
            fit_max_iterations: r.get_count("fit_max_iterations")?,
            min_engineering_strain: r.get()?,
            buckling_floor: r.get()?,
            buckling_step: r.get()?,
            failed_tangent_ratio: r.get()?,
        };
        param.validate()?;
        settings.validate()?;
        if capacity != 2 * settings.max_nesting + 1 {
            return Err(RebarError::InvalidState(format!(
                "capacity = {} is inconsistent with max_nesting = {}",
                capacity, settings.max_nesting
            )));
        }
        let committed = r.get_state(&param, capacity)?;
        let trial = r.get_state(&param, capacity)?;
        StoredSteel {
            param,
            settings,
            committed,
            trial,
        }
        .into_steel()
    }

    /// Reads a JSON file containing the model
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
        let stored: StoredSteel = serde_json::from_reader(buffered)?;
        stored.into_steel()
    }

    /// Writes a JSON file with the model
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> RebarResult<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = File::create(&path)?;
        serde_json::to_writer(&mut file, &self)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{flat_len, N_HEADER_VALUES, N_STATE_SCALARS};
    use crate::base::{RebarError, SampleParams, Settings};
    use crate::material::{Branch, ReinforcingSteel, UniaxialMaterial};

    fn loaded_steel() -> ReinforcingSteel {
        let param = SampleParams::param_steel_gomes_appleton();
        let mut steel = ReinforcingSteel::new(&param, &Settings::new()).unwrap();
        for strain in [0.02, -0.01, 0.005, -0.002] {
            steel.set_trial_strain(strain, 0.0).unwrap();
            steel.commit_state().unwrap();
        }
        steel.set_trial_strain(0.0, 0.0).unwrap();
        steel
    }

    #[test]
    fn flat_len_works() {
        assert_eq!(flat_len(21), N_HEADER_VALUES + 2 * (N_STATE_SCALARS + 21 * 11));
        let steel = ReinforcingSteel::new(&SampleParams::param_steel(), &Settings::new()).unwrap();
        assert_eq!(steel.to_flat().len(), flat_len(21));
    }

    #[test]
    fn flat_vector_restores_the_model() {
        let steel = loaded_steel();
        let data = steel.to_flat();
        assert_eq!(data.len(), flat_len(21));
        let read = ReinforcingSteel::from_flat(&data).unwrap();
        assert_eq!(read.param(), steel.param());
        assert_eq!(read.settings(), steel.settings());
        assert_eq!(read.committed(), steel.committed());
        assert_eq!(read.trial(), steel.trial());
        assert_eq!(read.to_flat(), data);
    }

    #[test]
    fn from_flat_captures_errors() {
        let data = loaded_steel().to_flat();
        assert!(matches!(
            ReinforcingSteel::from_flat(&data[..data.len() - 1]),
            Err(RebarError::InvalidState(_))
        ));
        assert!(matches!(ReinforcingSteel::from_flat(&[]), Err(RebarError::InvalidState(_))));

        let mut wrong = data.clone();
        wrong[0] = 2.0;
        assert_eq!(
            ReinforcingSteel::from_flat(&wrong).err().map(|e| e.to_string()),
            Some("invalid state vector: version = 2.0 is not supported".to_string())
        );

        let mut wrong = data.clone();
        wrong[2] = -1.0; // fy
        assert!(matches!(
            ReinforcingSteel::from_flat(&wrong),
            Err(RebarError::InvalidParameter(_))
        ));

        // branch code of the committed state
        let mut wrong = data.clone();
        wrong[N_HEADER_VALUES + 5] = 7.0;
        assert!(matches!(ReinforcingSteel::from_flat(&wrong), Err(RebarError::InvalidState(_))));
    }

    #[test]
    fn json_restores_the_model() {
        let steel = loaded_steel();
        let json = serde_json::to_string(&steel).unwrap();
        let read: ReinforcingSteel = serde_json::from_str(&json).unwrap();
        assert_eq!(read.committed(), steel.committed());
        assert_eq!(read.trial(), steel.trial());
        assert_eq!(read.stress(), steel.stress());
    }

    #[test]
    fn json_restore_captures_errors() {
        let steel = loaded_steel();
        let json = serde_json::to_string(&steel).unwrap();
        assert_eq!(json.matches("\"capacity\":21").count(), 2);

        // stack capacity below the nesting requirement
        let wrong = json.replace("\"capacity\":21", "\"capacity\":1");
        let path = "/tmp/rebar/test_state_codec_capacity.json";
        std::fs::create_dir_all("/tmp/rebar").unwrap();
        std::fs::write(path, &wrong).unwrap();
        assert!(matches!(ReinforcingSteel::read_json(path), Err(RebarError::InvalidState(_))));
        assert!(serde_json::from_str::<ReinforcingSteel>(&wrong).is_err());

        // nesting depth inconsistent with the stacks
        let wrong = json.replace("\"max_nesting\":10", "\"max_nesting\":2");
        std::fs::write(path, &wrong).unwrap();
        assert!(matches!(ReinforcingSteel::read_json(path), Err(RebarError::InvalidState(_))));

        // invalid parameter
        let wrong = json.replacen("\"fy\":420.0", "\"fy\":-420.0", 1);
        std::fs::write(path, &wrong).unwrap();
        assert!(matches!(ReinforcingSteel::read_json(path), Err(RebarError::InvalidParameter(_))));

        // transition branch without curves
        let mut empty = steel.clone();
        empty.trial.branch = Branch::Transition;
        empty.trial.stack.clear();
        let wrong = serde_json::to_string(&empty).unwrap();
        assert!(serde_json::from_str::<ReinforcingSteel>(&wrong).is_err());
        assert!(matches!(
            ReinforcingSteel::from_flat(&empty.to_flat()),
            Err(RebarError::InvalidState(_))
        ));
    }

    #[test]
    fn json_file_works() {
        let steel = loaded_steel();
        let path = "/tmp/rebar/test_state_codec.json";
        steel.write_json(path).unwrap();
        let read = ReinforcingSteel::read_json(path).unwrap();
        assert_eq!(read.to_flat(), steel.to_flat());
        assert!(matches!(
            ReinforcingSteel::read_json("/tmp/rebar/__not_found__.json"),
            Err(RebarError::Io(_))
        ));
    }
}
