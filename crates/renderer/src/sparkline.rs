use fan_config::SparklineConfig;
use std::fmt;

/// Smallest vertical span used for normalisation; keeps near-constant
/// series from dividing by zero.
const MIN_SPAN: f64 = 1e-9;

/// Drawing box for a sparkline, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineDims {
    pub width:   f32,
    pub height:  f32,
    pub padding: f32,
}

impl Default for SparklineDims {
    fn default() -> Self {
        Self::from(&SparklineConfig::default())
    }
}

impl From<&SparklineConfig> for SparklineDims {
    fn from(cfg: &SparklineConfig) -> Self {
        Self {
            width:   cfg.width,
            height:  cfg.height,
            padding: cfg.padding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Polyline through one point per sample.
///
/// `Display` writes it as an SVG path (`M x y L x y …`) with one decimal
/// place; an empty path formats as the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparklinePath {
    points: Vec<Point>,
}

impl SparklinePath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl fmt::Display for SparklinePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            write!(f, "{cmd} {:.1} {:.1}", p.x, p.y)?;
        }
        Ok(())
    }
}

/// Lay `samples` out across `dims`.
///
/// Samples are spaced evenly from the left padding edge to the right one; a
/// single sample sits on the left edge. Values are scaled between the
/// series' own minimum (bottom) and maximum (top). Non-finite samples are
/// left out of the scaling and drawn on the baseline.
pub fn render<I>(samples: I, dims: &SparklineDims) -> SparklinePath
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = samples.into_iter().collect();
    if values.is_empty() {
        return SparklinePath::default();
    }

    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0));
    let span = (max - min).max(MIN_SPAN);

    let pad = f64::from(dims.padding);
    let inner_w = f64::from(dims.width) - pad * 2.0;
    let inner_h = f64::from(dims.height) - pad * 2.0;
    let step = inner_w / (values.len().saturating_sub(1).max(1)) as f64;

    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let t = if v.is_finite() { (v - min) / span } else { 0.0 };
            Point {
                x: (pad + i as f64 * step) as f32,
                y: (pad + (1.0 - t) * inner_h) as f32,
            }
        })
        .collect();

    SparklinePath { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> SparklineDims {
        SparklineDims { width: 260.0, height: 40.0, padding: 4.0 }
    }

    #[test]
    fn empty_input_draws_nothing() {
        let path = render(Vec::new(), &dims());
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn single_sample_sits_on_the_left_edge() {
        let path = render([42.0], &dims());
        assert_eq!(path.points().len(), 1);
        assert_eq!(path.points()[0].x, 4.0);
        assert!(path.to_string().starts_with("M 4.0 "));
    }

    #[test]
    fn constant_series_stays_finite() {
        let path = render([50.0; 10], &dims());
        for p in path.points() {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert_eq!(p.y, 36.0);
        }
        assert!(!path.to_string().contains("NaN"));
        assert!(!path.to_string().contains("inf"));
    }

    #[test]
    fn spans_padding_to_padding() {
        let path = render([10.0, 20.0, 30.0], &dims());
        assert_eq!(path.to_string(), "M 4.0 36.0 L 130.0 20.0 L 256.0 4.0");
    }

    #[test]
    fn higher_values_sit_higher() {
        let path = render([3200.0, 2900.0], &dims());
        let [a, b] = [path.points()[0], path.points()[1]];
        assert!(a.y < b.y);
    }

    #[test]
    fn output_is_deterministic() {
        let samples = [61.5, 63.0, 62.2, 70.1, 68.4];
        assert_eq!(render(samples, &dims()).to_string(), render(samples, &dims()).to_string());
    }

    #[test]
    fn non_finite_samples_land_on_the_baseline() {
        let path = render([f64::NAN, 10.0, f64::INFINITY, 20.0], &dims());
        let ys: Vec<f32> = path.points().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![36.0, 36.0, 36.0, 4.0]);
        assert!(!path.to_string().contains("NaN"));
    }

    #[test]
    fn all_non_finite_is_still_drawable() {
        let path = render([f64::NAN, f64::NAN], &dims());
        assert!(path.points().iter().all(|p| p.y == 36.0));
    }
}
