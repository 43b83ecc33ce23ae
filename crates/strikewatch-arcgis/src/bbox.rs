use crate::error::ArcgisError;

/// Longitude/latitude extent used as an envelope filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Builds a box from optional request fields.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::MissingParameter`] naming the first absent field,
    /// or [`ArcgisError::InvalidParameter`] for a non-finite value.
    pub fn from_parts(
        xmin: Option<f64>,
        ymin: Option<f64>,
        xmax: Option<f64>,
        ymax: Option<f64>,
    ) -> Result<Self, ArcgisError> {
        Ok(Self {
            xmin: require("xmin", xmin)?,
            ymin: require("ymin", ymin)?,
            xmax: require("xmax", xmax)?,
            ymax: require("ymax", ymax)?,
        })
    }

    /// `xmin,ymin,xmax,ymax`, the envelope form the query endpoint expects.
    #[must_use]
    pub fn to_envelope_param(&self) -> String {
        format!("{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

fn require(name: &'static str, value: Option<f64>) -> Result<f64, ArcgisError> {
    let value = value.ok_or(ArcgisError::MissingParameter(name))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArcgisError::InvalidParameter {
            name,
            reason: format!("expected a finite number, got {value}"),
        })
    }
}
