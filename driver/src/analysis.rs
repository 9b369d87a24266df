//! Radial distribution of a sampled trajectory in the x-y plane.

use anyhow::{ensure, Result};
use cgmath::{InnerSpace, Point3, Vector2};

/// One row of the histogram report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramRow {
    /// Lower edge of the bin
    pub radius: f64,
    pub count: u64,
    /// Running total including this bin
    pub cumulative: u64,
}

/// Equal-width histogram of the cylindrical radius r = sqrt(x² + y²).
#[derive(Debug, Clone)]
pub struct RadialHistogram {
    r_min: f64,
    r_max: f64,
    counts: Vec<u64>,
    below: u64,
    above: u64,
}

/// Cylindrical radius of a point about the z axis
pub fn cylindrical_radius(point: &Point3<f64>) -> f64 {
    Vector2::new(point.x, point.y).magnitude()
}

impl RadialHistogram {
    pub fn new(r_min: f64, r_max: f64, bins: usize) -> Result<Self> {
        ensure!(bins > 0, "histogram needs at least one bin");
        ensure!(
            r_min.is_finite() && r_max.is_finite(),
            "histogram range must be finite, got [{r_min}, {r_max}]"
        );
        ensure!(r_min <= r_max, "empty histogram range [{r_min}, {r_max}]");
        Ok(Self {
            r_min,
            r_max,
            counts: vec![0; bins],
            below: 0,
            above: 0,
        })
    }

    /// Build from points, spanning the observed radii when `range` is None
    pub fn from_points(
        points: &[Point3<f64>],
        bins: usize,
        range: Option<(f64, f64)>,
    ) -> Result<Self> {
        let (r_min, r_max) = match range {
            Some(range) => range,
            None => {
                ensure!(!points.is_empty(), "no points to derive a histogram range from");
                points
                    .iter()
                    .map(cylindrical_radius)
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                        (lo.min(r), hi.max(r))
                    })
            }
        };
        let mut histogram = Self::new(r_min, r_max, bins)?;
        for point in points {
            histogram.add(point);
        }
        Ok(histogram)
    }

    pub fn add(&mut self, point: &Point3<f64>) {
        let r = cylindrical_radius(point);
        if r < self.r_min {
            self.below += 1;
            return;
        }
        if r > self.r_max || r.is_nan() {
            self.above += 1;
            return;
        }
        let bins = self.counts.len();
        let width = self.r_max - self.r_min;
        let index = if width > 0.0 {
            (((r - self.r_min) / width * bins as f64).floor() as usize).min(bins - 1)
        } else {
            0
        };
        self.counts[index] += 1;
    }

    pub fn bin_width(&self) -> f64 {
        (self.r_max - self.r_min) / self.counts.len() as f64
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Points that fell outside [r_min, r_max], as (below, above)
    pub fn out_of_range(&self) -> (u64, u64) {
        (self.below, self.above)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn rows(&self) -> Vec<HistogramRow> {
        let width = self.bin_width();
        let mut cumulative = 0;
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                cumulative += count;
                HistogramRow {
                    radius: self.r_min + i as f64 * width,
                    count,
                    cumulative,
                }
            })
            .collect()
    }
}
