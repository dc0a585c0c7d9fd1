use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use crate::error::GaborError;

/// The default Gaussian envelope width, `2 * PI`.
pub const DEFAULT_SIGMA: f64 = 2.0 * PI;

/// The default spatial frequency ratio between scales, `sqrt(2)`.
pub const DEFAULT_FREQUENCY: f64 = SQRT_2;

/// The orientation of a Gabor kernel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Orientation index `mu`, resolved as `phi = mu * PI / 8`.
    Index(i32),
    /// Orientation angle `phi` in radians.
    Radians(f64),
}

impl Orientation {
    /// Resolve the orientation angle in radians.
    pub fn radians(&self) -> f64 {
        match *self {
            Orientation::Index(mu) => PI * mu as f64 / 8.0,
            Orientation::Radians(phi) => phi,
        }
    }
}

/// The user facing parameters of a Gabor kernel.
///
/// ```
/// use gabor_filter::{GaborParams, Orientation};
///
/// let params = GaborParams::new(Orientation::Index(2), 1).with_sigma(3.0);
///
/// assert_eq!(params.scale, 1);
/// assert_eq!(params.sigma, 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaborParams {
    /// The kernel orientation.
    pub orientation: Orientation,
    /// The scale index `nu`, may be negative.
    pub scale: i32,
    /// The Gaussian envelope width.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// The spatial frequency ratio between scales.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY
}

impl GaborParams {
    /// Create parameters with the default sigma and frequency.
    pub fn new(orientation: Orientation, scale: i32) -> Self {
        Self {
            orientation,
            scale,
            sigma: DEFAULT_SIGMA,
            frequency: DEFAULT_FREQUENCY,
        }
    }

    /// Set the Gaussian envelope width.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the spatial frequency ratio.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Validate the parameters and compute the derived quantities.
    ///
    /// # Errors
    ///
    /// Returns [`GaborError::InvalidParameter`] if `sigma` or `frequency` is not a
    /// positive finite number, if the orientation angle is not finite or if the
    /// kernel width cannot be represented.
    pub fn derive(&self) -> Result<DerivedParams, GaborError> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(GaborError::InvalidParameter {
                name: "sigma",
                value: self.sigma,
            });
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(GaborError::InvalidParameter {
                name: "frequency",
                value: self.frequency,
            });
        }

        let phi = self.orientation.radians();
        if !phi.is_finite() {
            return Err(GaborError::InvalidParameter {
                name: "phi",
                value: phi,
            });
        }

        let kmax = PI / 2.0;
        let k = kmax / self.frequency.powi(self.scale);
        if !(k.is_finite() && k > 0.0) {
            return Err(GaborError::InvalidParameter {
                name: "scale",
                value: self.scale as f64,
            });
        }

        let width = kernel_width(self.sigma, k).ok_or(GaborError::InvalidParameter {
            name: "scale",
            value: self.scale as f64,
        })?;

        Ok(DerivedParams {
            params: *self,
            kmax,
            k,
            phi,
            width,
        })
    }
}

// round(6 * sigma / k + 1), bumped to the next odd number
fn kernel_width(sigma: f64, k: f64) -> Option<usize> {
    let width = (6.0 * sigma / k + 1.0).round();
    if !width.is_finite() || width < 1.0 || width >= (u32::MAX as f64) {
        return None;
    }

    let width = width as usize;
    Some(if width % 2 == 0 { width + 1 } else { width })
}

/// Quantities derived from [`GaborParams`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedParams {
    /// The parameters the quantities were derived from.
    pub params: GaborParams,
    /// The maximum frequency `PI / 2`.
    pub kmax: f64,
    /// The wave number `kmax / frequency^scale`.
    pub k: f64,
    /// The orientation angle in radians.
    pub phi: f64,
    /// The odd side length of the square kernel.
    pub width: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_width() -> Result<(), GaborError> {
        let derived = GaborParams::new(Orientation::Index(0), 0).derive()?;
        assert_eq!(derived.width, 25);
        assert_relative_eq!(derived.k, PI / 2.0);
        assert_eq!(derived.phi, 0.0);
        Ok(())
    }

    #[test]
    fn width_per_scale() -> Result<(), GaborError> {
        for (scale, expected) in [(-2, 13), (-1, 19), (0, 25), (1, 35), (2, 49)] {
            let derived = GaborParams::new(Orientation::Index(3), scale).derive()?;
            assert_eq!(derived.width, expected, "scale {scale}");
        }
        Ok(())
    }

    #[test]
    fn width_is_odd() -> Result<(), GaborError> {
        for scale in -3..5 {
            for sigma in [0.5, 1.0, 2.0, DEFAULT_SIGMA, 9.3] {
                let params = GaborParams::new(Orientation::Radians(0.3), scale).with_sigma(sigma);
                let width = params.derive()?.width;
                assert_eq!(width % 2, 1);
                assert_eq!(params.derive()?.width, width);
            }
        }
        Ok(())
    }

    #[test]
    fn orientation_index_and_radians_agree() -> Result<(), GaborError> {
        let by_index = GaborParams::new(Orientation::Index(4), 1).derive()?;
        let by_radians = GaborParams::new(Orientation::Radians(PI / 2.0), 1).derive()?;
        assert_relative_eq!(by_index.phi, by_radians.phi);
        assert_eq!(by_index.width, by_radians.width);
        Ok(())
    }

    #[test]
    fn invalid_parameters() {
        let base = GaborParams::new(Orientation::Index(0), 0);

        for sigma in [0.0, -1.0, f64::NAN] {
            let res = base.with_sigma(sigma).derive();
            assert!(matches!(
                res,
                Err(GaborError::InvalidParameter { name: "sigma", .. })
            ));
        }

        for frequency in [0.0, -2.0, f64::INFINITY] {
            let res = base.with_frequency(frequency).derive();
            assert!(matches!(
                res,
                Err(GaborError::InvalidParameter {
                    name: "frequency",
                    ..
                })
            ));
        }

        let res = GaborParams::new(Orientation::Radians(f64::NAN), 0).derive();
        assert!(matches!(
            res,
            Err(GaborError::InvalidParameter { name: "phi", .. })
        ));
    }

    #[test]
    fn params_json() -> Result<(), serde_json::Error> {
        let params: GaborParams =
            serde_json::from_str(r#"{ "orientation": { "index": 2 }, "scale": -1 }"#)?;
        assert_eq!(params, GaborParams::new(Orientation::Index(2), -1));

        let json = serde_json::to_string(&params.with_sigma(3.0))?;
        let back: GaborParams = serde_json::from_str(&json)?;
        assert_eq!(back.sigma, 3.0);
        Ok(())
    }
}
