use super::Response;
use crate::base::{RebarError, RebarResult};
use plotpy::{Curve, Plot};
use std::ffi::OsStr;

/// Plots the stress-strain response and the damage history
pub struct ResponsePlot {
    /// Holds the stress-strain curves
    curves: Vec<Curve>,

    /// Holds the damage curves
    damage: Vec<Curve>,
}

impl ResponsePlot {
    /// Allocates a new instance
    pub fn new() -> Self {
        ResponsePlot {
            curves: Vec::new(),
            damage: Vec::new(),
        }
    }

    /// Draws the stress-strain curve and the damage versus the step number
    ///
    /// # Input
    ///
    /// * `responses` -- the points of the strain path
    /// * `config` -- a function `|curve| {}` to configure both curves
    pub fn draw<F>(&mut self, responses: &[Response], mut config: F)
    where
        F: FnMut(&mut Curve),
    {
        let x: Vec<_> = responses.iter().map(|r| r.strain).collect();
        let y: Vec<_> = responses.iter().map(|r| r.stress).collect();
        let mut curve = Curve::new();
        config(&mut curve);
        curve.draw(&x, &y);
        self.curves.push(curve);

        let steps: Vec<_> = (0..responses.len()).map(|i| i as f64).collect();
        let d: Vec<_> = responses.iter().map(|r| r.damage).collect();
        let mut curve = Curve::new();
        config(&mut curve);
        curve.draw(&steps, &d);
        self.damage.push(curve);
    }

    /// Saves the figure
    ///
    /// **Note:** Call this function after [ResponsePlot::draw()].
    ///
    /// # Input
    ///
    /// * `filepath` -- may be a String, &str, or Path
    /// * `with_damage` -- adds a second sub-plot with the damage history
    pub fn save<P>(&self, filepath: &P, with_damage: bool) -> RebarResult<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        if self.curves.is_empty() {
            return Err(RebarError::Figure("there are no curves to plot".to_string()));
        }
        let mut plot = Plot::new();
        if with_damage {
            plot.set_subplot(2, 1, 1);
        }
        for curve in &self.curves {
            plot.add(curve);
        }
        plot.grid_and_labels("strain", "stress");
        if with_damage {
            plot.set_subplot(2, 1, 2);
            for curve in &self.damage {
                plot.add(curve);
            }
            plot.grid_and_labels("step", "damage");
            plot.set_figure_size_points(400.0, 600.0);
        }
        plot.save(filepath).map_err(|e| RebarError::Figure(e.to_string()))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ResponsePlot;
    use crate::base::{RebarError, SampleParams, Settings};
    use crate::material::{ReinforcingSteel, StrainPath};

    const SAVE_FIGURE: bool = false;

    #[test]
    fn save_captures_errors() {
        let plot = ResponsePlot::new();
        assert_eq!(
            plot.save("/tmp/rebar/test_response_plot_empty.svg", false)
                .err()
                .map(|e| e.to_string()),
            Some("cannot save figure: there are no curves to plot".to_string())
        );
        assert!(matches!(plot.save("/tmp/rebar/x.svg", true), Err(RebarError::Figure(_))));
    }

    #[test]
    fn draw_works() {
        let mut path = StrainPath::new();
        path.cycles(&[0.01, 0.02, 0.03], 20);
        let mut plot = ResponsePlot::new();
        for param in [SampleParams::param_steel(), SampleParams::param_steel_gomes_appleton()] {
            let mut steel = ReinforcingSteel::new(&param, &Settings::new()).unwrap();
            let responses = path.follow(&mut steel).unwrap();
            plot.draw(&responses, |curve| {
                curve.set_marker_style(".");
            });
        }
        assert_eq!(plot.curves.len(), 2);
        assert_eq!(plot.damage.len(), 2);
        if SAVE_FIGURE {
            plot.save("/tmp/rebar/test_response_plot.svg", true).unwrap();
        }
    }
}
