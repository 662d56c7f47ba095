use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::approx::DEFAULT_REL_TOL;

/// Parameter validation failure.
#[derive(Debug, Clone, Error)]
pub enum ParamError {
    #[error("parameter `{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("fin thickness {delta} must be smaller than the pitch {pitch}")]
    FinThickerThanPitch { delta: f64, pitch: f64 },
    #[error("fin height {height} must be smaller than the tube radius {radius}")]
    FinTallerThanRadius { height: f64, radius: f64 },
    #[error("split fraction {split} must lie strictly between 0 and 1")]
    SplitOutOfRange { split: f64 },
    #[error(
        "channel length {length_all} leaves no room for two stabilizers of length {length_stb}"
    )]
    StabilizersOverlap { length_all: f64, length_stb: f64 },
    #[error(
        "length {length_all} minus stabilizers is not within half a pitch of a whole number of pitches {pitch}"
    )]
    PeriodMismatch { length_all: f64, pitch: f64 },
}

/// Physical parameters of an internally finned tube. Lengths in millimetres.
///
/// The tube axis is +Z. The finned section spans `[length_stb,
/// length_all - length_stb]`; smooth stabilizer sections fill the two ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Inner tube radius.
    pub radius: f64,
    /// Radial fin height, measured inward from the tube wall.
    pub height: f64,
    /// Axial period of the fin pattern.
    pub pitch: f64,
    /// Axial fin thickness.
    pub delta: f64,
    /// Fraction of the fin-free radius given to the core block.
    pub split: f64,
    /// Length of each smooth stabilizer section.
    pub length_stb: f64,
    /// Total channel length.
    pub length_all: f64,
    /// Absolute tolerance for topology unification.
    pub share_tol: f64,
    /// Relative tolerance for selection predicates.
    pub rel_tol: f64,
}

impl ParameterSet {
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("radius", self.radius),
            ("height", self.height),
            ("pitch", self.pitch),
            ("delta", self.delta),
            ("length_stb", self.length_stb),
            ("length_all", self.length_all),
            ("share_tol", self.share_tol),
            ("rel_tol", self.rel_tol),
        ] {
            if value <= 0.0 {
                return Err(ParamError::NotPositive { name, value });
            }
        }
        if self.delta >= self.pitch {
            return Err(ParamError::FinThickerThanPitch {
                delta: self.delta,
                pitch: self.pitch,
            });
        }
        if self.height >= self.radius {
            return Err(ParamError::FinTallerThanRadius {
                height: self.height,
                radius: self.radius,
            });
        }
        if self.split <= 0.0 || self.split >= 1.0 {
            return Err(ParamError::SplitOutOfRange { split: self.split });
        }
        if 2.0 * self.length_stb >= self.length_all {
            return Err(ParamError::StabilizersOverlap {
                length_all: self.length_all,
                length_stb: self.length_stb,
            });
        }
        // The finned span is reconstructed as the nearest whole number of
        // pitches; anything off by more than half a pitch is a mistake, not
        // rounding slack.
        let span = self.length_all - 2.0 * self.length_stb;
        let sections = (span / self.pitch).round();
        if sections < 1.0 || (span - sections * self.pitch).abs() > self.pitch / 2.0 {
            return Err(ParamError::PeriodMismatch {
                length_all: self.length_all,
                pitch: self.pitch,
            });
        }
        Ok(())
    }

    /// Number of fin periods in the finned section, rounded to the nearest
    /// whole count.
    pub fn section_count(&self) -> usize {
        ((self.length_all - 2.0 * self.length_stb) / self.pitch).round() as usize
    }

    /// Half-diagonal of the square core block.
    pub fn core_half_diagonal(&self) -> f64 {
        (self.radius - self.height) * self.split
    }

    /// Axial start of the fin within one period.
    pub fn fin_start(&self) -> f64 {
        self.pitch / 2.0 - self.delta / 2.0
    }

    /// Axial end of the fin within one period.
    pub fn fin_end(&self) -> f64 {
        self.pitch / 2.0 + self.delta / 2.0
    }

    /// With a different fin height, keeping everything else.
    pub fn with_height(&self, height: f64) -> ParameterSet {
        ParameterSet {
            height,
            ..self.clone()
        }
    }

    /// With a different pitch, adjusting nothing else. The caller is
    /// responsible for re-validating, since the period count changes.
    pub fn with_pitch(&self, pitch: f64) -> ParameterSet {
        ParameterSet {
            pitch,
            ..self.clone()
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        ParameterSet {
            radius: 5.0,
            height: 0.2,
            pitch: 5.0,
            delta: 0.48,
            split: 0.74,
            length_stb: 50.0,
            length_all: 220.0,
            share_tol: 0.2,
            rel_tol: DEFAULT_REL_TOL,
        }
    }
}

/// Parameters of a corrugated-plate channel. Lengths in millimetres,
/// `gamma` in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateParams {
    /// Plate extent along Y.
    pub height: f64,
    /// Plate extent along X.
    pub width: f64,
    /// Corrugation half-amplitude.
    pub delta: f64,
    /// Corrugation period measured perpendicular to the ridges.
    pub pitch: f64,
    /// Chevron angle between ridges and the Y axis.
    pub gamma: f64,
}

impl PlateParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("height", self.height),
            ("width", self.width),
            ("delta", self.delta),
            ("pitch", self.pitch),
            ("gamma", self.gamma),
        ] {
            if value <= 0.0 {
                return Err(ParamError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Corrugation period projected onto the X axis.
    pub fn pitch_x(&self) -> f64 {
        self.pitch / self.gamma.sin()
    }

    /// Corrugation period projected onto the Y axis.
    pub fn pitch_y(&self) -> f64 {
        self.pitch / self.gamma.cos()
    }

    /// Rise of a ridge over one half-period.
    pub fn ascent(&self) -> f64 {
        2.0 * self.delta
    }

    /// Number of corrugation panels needed to span the width.
    pub fn panels_x(&self) -> usize {
        (self.width / self.pitch_x()).ceil() as usize
    }

    /// Number of corrugation panels needed to span the height.
    pub fn panels_y(&self) -> usize {
        (self.height / self.pitch_y()).ceil() as usize
    }
}
