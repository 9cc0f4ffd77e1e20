use super::{shape_exponent, Anchor, Branch, Buckling, SteelState, TransitionCurve};
use crate::base::{ParamSteel, RebarError, RebarResult, Settings};

/// Relative tolerance to accept that a curve passes through a landing point
const LANDING_TOLERANCE: f64 = 1e-9;

impl SteelState {
    /// Updates the state given a new natural strain
    ///
    /// This state must be a copy of the last committed state. The active branch is selected by
    /// the sign of the strain increment and by whether the far anchors of the nested curves
    /// are crossed or not.
    ///
    /// # Errors
    ///
    /// Returns the errors of the transition curve fit. The state is then inconsistent and must
    /// be discarded by the caller.
    pub fn update(
        &mut self,
        strain: f64,
        param: &ParamSteel,
        settings: &Settings,
        buckling: &Buckling,
    ) -> RebarResult<()> {
        if strain == self.strain {
            return Ok(());
        }
        let direction = if strain > self.strain { 1.0 } else { -1.0 };
        let (stress, tangent) = match self.branch {
            Branch::Virgin => self.follow_virgin(strain),
            Branch::TensionEnvelope | Branch::CompressionEnvelope => {
                let side = self.branch.side();
                if direction == side {
                    self.envelope(strain, side)
                } else {
                    self.reverse_on_envelope(direction, param, settings)?;
                    self.follow_transitions(strain, direction, param, settings)?
                }
            }
            Branch::Transition => {
                if direction != self.stack.top_direction() {
                    self.reverse_on_transition(direction, param, settings)?;
                }
                self.follow_transitions(strain, direction, param, settings)?
            }
        };
        self.finalize(strain, stress, tangent, param, settings, buckling);
        Ok(())
    }

    /// Evaluates the envelope of a side (+1 tension; -1 compression)
    fn envelope(&self, strain: f64, side: f64) -> (f64, f64) {
        let shift = if side > 0.0 {
            self.shift_tension
        } else {
            self.shift_compression
        };
        self.backbone.response(strain - shift)
    }

    /// Evaluates the virgin branch and detects the first yielding
    fn follow_virgin(&mut self, strain: f64) -> (f64, f64) {
        if f64::abs(strain) > self.backbone.eyp {
            self.branch = Branch::envelope(strain);
            log::debug!("first yielding at ε = {:?}: entering {:?}", strain, self.branch);
        }
        self.backbone.response(strain)
    }

    /// Starts a transition curve from the committed point on an envelope
    fn reverse_on_envelope(&mut self, direction: f64, param: &ParamSteel, settings: &Settings) -> RebarResult<()> {
        let side = -direction;
        let reversal = Anchor::new(self.strain, self.ideal_stress, self.ideal_tangent);
        if side > 0.0 {
            self.return_tension = Some(reversal);
        } else {
            self.return_compression = Some(reversal);
        }
        self.fatigue.start_half_cycle(reversal.strain, reversal.stress);

        // zero-stress intercept of the elastic unloading line
        let intercept = reversal.strain - reversal.stress / param.young;
        let own_shift = if side > 0.0 {
            self.shift_tension
        } else {
            self.shift_compression
        };
        let offset = f64::abs(reversal.strain - own_shift);
        let on_plateau = offset < self.backbone.eshp;
        if on_plateau {
            let plastic_strain = if side > 0.0 {
                intercept - self.shift_tension
            } else {
                self.shift_compression - intercept
            };
            if self.hardening.update(plastic_strain) {
                self.backbone.set_factor(self.hardening.factor);
                log::debug!("hardening-location factor reduced to {:?}", self.hardening.factor);
            }
        }

        // return to the last reversal on the opposite envelope if it lies ahead
        let opposite = if side > 0.0 {
            self.return_compression
        } else {
            self.return_tension
        };
        let target = match opposite {
            Some(anchor) if (anchor.strain - reversal.strain) * direction > 0.0 => anchor,
            _ => {
                if side > 0.0 {
                    self.shift_compression = intercept;
                } else {
                    self.shift_tension = intercept;
                }
                let reach = if on_plateau { self.backbone.eshp } else { offset };
                let (stress, tangent) = self.backbone.response(direction * reach);
                Anchor::new(intercept + direction * reach, stress, tangent)
            }
        };

        let start = Anchor::new(reversal.strain, reversal.stress, param.young);
        let curve = self.fit_curve(start, target, reversal.tangent, param, settings)?;
        self.stack.clear();
        self.stack.push(curve, direction);
        self.branch = Branch::Transition;
        log::debug!(
            "reversal on {:?} at ε = {:?}: curve towards ε = {:?} (branch {})",
            Branch::envelope(side),
            reversal.strain,
            target.strain,
            self.branch_id()
        );
        Ok(())
    }

    /// Starts a nested transition curve from the committed point on the active curve
    fn reverse_on_transition(&mut self, direction: f64, param: &ParamSteel, settings: &Settings) -> RebarResult<()> {
        let parent = *self.active_curve()?;
        self.fatigue.start_half_cycle(self.strain, self.ideal_stress);
        let start = Anchor::new(self.strain, self.ideal_stress, param.young);
        let curve = self.fit_curve(start, parent.return_anchor(), self.ideal_tangent, param, settings)?;
        if self.stack.push(curve, direction) {
            log::debug!("oldest nested pair of curves evicted");
        }
        log::debug!(
            "reversal on branch at ε = {:?}: curve towards ε = {:?} (branch {})",
            self.strain,
            parent.ein,
            self.branch_id()
        );
        Ok(())
    }

    /// Follows the nested transition curves while their far anchors are crossed
    fn follow_transitions(
        &mut self,
        strain: f64,
        direction: f64,
        param: &ParamSteel,
        settings: &Settings,
    ) -> RebarResult<(f64, f64)> {
        // each pass pops at least one frame every two passes
        let n_max_passes = 2 * self.stack.capacity() + 2;
        for _ in 0..n_max_passes {
            let curve = *self.active_curve()?;
            if (strain - curve.eout) * direction < 0.0 {
                return Ok((curve.stress(strain), curve.tangent(strain)));
            }
            let landing = curve.target();
            self.stack.pop();

            // the parent moves against: either we are back at its start or its ancestor was evicted
            if !self.stack.is_empty() && self.stack.top_direction() != direction {
                let parent = *self.active_curve()?;
                if parent.ein == landing.strain {
                    self.stack.pop();
                } else {
                    let curve = self.fit_curve(landing, parent.return_anchor(), landing.tangent, param, settings)?;
                    self.stack.push(curve, direction);
                    log::debug!("curve towards ε = {:?} rebuilt after eviction", parent.ein);
                    continue;
                }
            }

            if self.stack.is_empty() {
                return Ok(self.land_on_envelope(strain, direction, landing));
            }

            // the ancestor must pass through the landing point
            let parent = *self.active_curve()?;
            let tolerance = LANDING_TOLERANCE * f64::max(1.0, f64::abs(landing.stress));
            if f64::abs(parent.stress(landing.strain) - landing.stress) > tolerance {
                let curve = self.fit_curve(landing, parent.target(), parent.ee_return, param, settings)?;
                self.stack.replace_top(curve);
                log::debug!("ancestor curve refitted from ε = {:?}", landing.strain);
            }
        }
        Err(RebarError::InvalidState("nested transition curves did not settle".to_string()))
    }

    /// Switches to the envelope of the moving direction, keeping continuity with the landing point
    fn land_on_envelope(&mut self, strain: f64, direction: f64, landing: Anchor) -> (f64, f64) {
        let shift = landing.strain - self.backbone.strain_at(landing.stress);
        if direction > 0.0 {
            self.shift_tension = shift;
        } else {
            self.shift_compression = shift;
        }
        self.branch = Branch::envelope(direction);
        log::debug!("landing on {:?} at ε = {:?} (shift = {:?})", self.branch, landing.strain, shift);
        self.envelope(strain, direction)
    }

    /// Fits a transition curve with the shape exponent of its span
    fn fit_curve(
        &self,
        start: Anchor,
        target: Anchor,
        ee_return: f64,
        param: &ParamSteel,
        settings: &Settings,
    ) -> RebarResult<TransitionCurve> {
        let rr = shape_exponent(
            target.strain - start.strain,
            target.stress - start.stress,
            param.young,
            self.backbone.eyp,
            &param.curve,
        );
        TransitionCurve::fit(start, target, ee_return, rr, settings)
    }

    /// Returns the active transition curve
    fn active_curve(&self) -> RebarResult<&TransitionCurve> {
        self.stack
            .top()
            .ok_or_else(|| RebarError::InvalidState("transition branch without curves".to_string()))
    }

    /// Stores the response and updates the fatigue damage and the buckled output
    fn finalize(
        &mut self,
        strain: f64,
        stress: f64,
        tangent: f64,
        param: &ParamSteel,
        settings: &Settings,
        buckling: &Buckling,
    ) {
        self.strain = strain;
        self.ideal_stress = stress;
        self.ideal_tangent = tangent;
        match self.branch {
            Branch::TensionEnvelope => self.buckling_reference = strain,
            Branch::Virgin if strain > self.buckling_reference => self.buckling_reference = strain,
            _ => (),
        }

        self.fatigue.update(strain, stress, param.young, &param.fatigue);
        self.scale_factor = self.fatigue.scale_factor(&param.fatigue);
        if self.scale_factor < 0.0 {
            self.failed = true;
            self.stress = 0.0;
            self.tangent = settings.failed_tangent_ratio * param.young;
            return;
        }

        let (stress, tangent) = buckling.response(self.buckling_reference - strain, stress, tangent);
        self.stress = self.scale_factor * stress;
        self.tangent = self.scale_factor * tangent;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
