use std::f64::consts::PI;

use gabor_image::{Image, ImageDtype};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::GaborError,
    filter::GaborFilter,
    params::{GaborParams, Orientation, DEFAULT_FREQUENCY, DEFAULT_SIGMA},
    response::{OutputDepth, ResponseImage, ResponseType},
};

/// The layout of a filter bank.
///
/// The bank holds `orientations` evenly spaced orientations `mu * PI / orientations`
/// for every scale in `scales`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaborBankConfig {
    /// The number of orientations spread over `[0, PI)`.
    pub orientations: u32,
    /// The scale indices.
    pub scales: Vec<i32>,
    /// The Gaussian envelope width shared by all filters.
    pub sigma: f64,
    /// The spatial frequency ratio shared by all filters.
    pub frequency: f64,
}

impl Default for GaborBankConfig {
    fn default() -> Self {
        Self {
            orientations: 8,
            scales: (0..5).collect(),
            sigma: DEFAULT_SIGMA,
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl GaborBankConfig {
    /// Parse a configuration from JSON. Missing fields take their default value.
    ///
    /// ```
    /// use gabor_filter::GaborBankConfig;
    ///
    /// let config = GaborBankConfig::from_json(r#"{ "orientations": 4, "scales": [0, 1] }"#).unwrap();
    /// assert_eq!(config.orientations, 4);
    /// assert_eq!(config.scales, vec![0, 1]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, GaborError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty printed JSON.
    pub fn to_json(&self) -> Result<String, GaborError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The parameters of every filter, scale major.
    pub fn params(&self) -> Result<Vec<GaborParams>, GaborError> {
        if self.orientations == 0 {
            return Err(GaborError::InvalidParameter {
                name: "orientations",
                value: 0.0,
            });
        }
        if self.scales.is_empty() {
            return Err(GaborError::InvalidParameter {
                name: "scales",
                value: 0.0,
            });
        }

        let n = self.orientations as f64;
        Ok(self
            .scales
            .iter()
            .flat_map(|&scale| {
                (0..self.orientations).map(move |mu| (scale, PI * mu as f64 / n))
            })
            .map(|(scale, phi)| {
                GaborParams::new(Orientation::Radians(phi), scale)
                    .with_sigma(self.sigma)
                    .with_frequency(self.frequency)
            })
            .collect())
    }
}

/// A set of Gabor filters over several orientations and scales.
#[derive(Clone, Debug)]
pub struct GaborBank {
    config: GaborBankConfig,
    filters: Vec<GaborFilter>,
}

impl GaborBank {
    /// Build every filter of the bank.
    pub fn new(config: GaborBankConfig) -> Result<Self, GaborError> {
        let filters = config
            .params()?
            .into_iter()
            .map(GaborFilter::new)
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "built gabor bank with {} filters ({} orientations, scales {:?})",
            filters.len(),
            config.orientations,
            config.scales
        );

        Ok(Self { config, filters })
    }

    /// The configuration the bank was built from.
    pub fn config(&self) -> &GaborBankConfig {
        &self.config
    }

    /// The filters, scale major.
    pub fn filters(&self) -> &[GaborFilter] {
        &self.filters
    }

    /// The number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the bank has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every filter to the image, in parallel across filters.
    ///
    /// The responses are returned in the order of [`GaborBank::filters`].
    pub fn respond<T>(
        &self,
        src: &Image<T, 1>,
        response: ResponseType,
        depth: OutputDepth,
    ) -> Result<Vec<ResponseImage>, GaborError>
    where
        T: ImageDtype,
    {
        self.filters
            .par_iter()
            .map(|filter| filter.respond(src, response, depth))
            .collect()
    }
}
