//! Transforms through the PROJ library, for CRSs outside the built-in catalogue. Only compiled
//! with the `proj` feature.

use geo::Coord;
use proj::Proj;

use crate::error::{StoreError, StoreResult};

use super::crs_def::Crs;

pub struct ProjTransform {
    proj: Proj,
    target: Crs,
}

impl ProjTransform {
    pub fn new(from: Crs, to: Crs) -> StoreResult<Self> {
        let proj = Proj::new_known_crs(&from.authority(), &to.authority(), None).map_err(|err| {
            log::error!(
                "Could not create PROJ transform from {} to {}: {}",
                from.authority(),
                to.authority(),
                err
            );
            StoreError::UnsupportedTransform { from, to }
        })?;
        Ok(Self { proj, target: to })
    }

    pub fn convert(&self, coord: Coord) -> StoreResult<Coord> {
        let out_of_range = || StoreError::ProjectionRange {
            x: coord.x,
            y: coord.y,
            crs: self.target,
        };
        let (x, y) = self
            .proj
            .convert((coord.x, coord.y))
            .map_err(|_| out_of_range())?;
        if !x.is_finite() || !y.is_finite() {
            return Err(out_of_range());
        }
        Ok(Coord { x, y })
    }
}
