//! Frequency-band extraction.

use std::collections::BTreeMap;

use crate::domain::{Band, Frequency, ResponseCurve};

/// Native curve samples inside one band, keyed by exact frequency.
pub type FrequencyMagnitudeMap = BTreeMap<Frequency, f64>;

/// Keep the samples with `low < frequency < high`.
///
/// Only frequencies present in the curve appear in the result. If the curve
/// repeats a frequency, the later sample wins.
pub fn extract(curve: &ResponseCurve, low: f64, high: f64) -> FrequencyMagnitudeMap {
    collect_inside(curve, |f| low < f.ghz() && f.ghz() < high)
}

/// `extract` over a band's own edges.
pub fn extract_band(curve: &ResponseCurve, band: &Band) -> FrequencyMagnitudeMap {
    collect_inside(curve, |f| band.contains(f))
}

fn collect_inside(curve: &ResponseCurve, inside: impl Fn(Frequency) -> bool) -> FrequencyMagnitudeMap {
    let mut out = FrequencyMagnitudeMap::new();
    for sample in curve.samples() {
        if inside(sample.frequency) {
            tracing::trace!(frequency = sample.frequency.ghz(), magnitude_db = sample.magnitude_db, "band sample");
            out.insert(sample.frequency, sample.magnitude_db);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandRange, BandRole, Sample};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn curve(points: &[(f64, f64)]) -> ResponseCurve {
        ResponseCurve::new(points.iter().map(|&(f, db)| Sample::new(f, db)).collect()).unwrap()
    }

    #[test]
    fn keeps_only_open_interval() {
        let c = curve(&[(6.25, -1.0), (6.3, -2.0), (6.5, -3.0), (6.75, -4.0), (7.0, -5.0)]);
        let map = extract(&c, 6.25, 6.75);
        let keys: Vec<f64> = map.keys().map(|f| f.ghz()).collect();
        assert_eq!(keys, vec![6.3, 6.5]);
        assert_eq!(map.get(&Frequency::from_ghz(6.5)), Some(&-3.0));
    }

    #[test]
    fn empty_window_is_not_an_error() {
        let c = curve(&[(1.0, -1.0), (2.0, -2.0)]);
        assert!(extract(&c, 5.4, 5.7).is_empty());
    }

    #[test]
    fn later_duplicate_sample_wins() {
        let c = curve(&[(6.5, -3.0), (6.5, -9.0)]);
        let map = extract(&c, 6.0, 7.0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Frequency::from_ghz(6.5)), Some(&-9.0));
    }

    #[test]
    fn band_extraction_excludes_edges() {
        let band = Band::new(BandRole::StopLeft, BandRange::new(5.4, 5.7)).unwrap();
        let c = curve(&[(5.4, -1.0), (5.5, -50.0), (5.7, -2.0)]);
        let keys: Vec<f64> = extract_band(&c, &band).keys().map(|f| f.ghz()).collect();
        assert_eq!(keys, vec![5.5]);
    }

    #[test]
    fn random_curves_never_leak_band_edges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(1..64);
            let mut points: Vec<(f64, f64)> = (0..n)
                .map(|_| (rng.gen_range(5.0..8.0), rng.gen_range(-80.0..0.0)))
                .collect();
            // Make sure the edges themselves show up in some curves.
            if rng.gen_bool(0.5) {
                points.push((6.25, -1.0));
                points.push((6.75, -1.0));
            }
            let c = curve(&points);
            for (k, _) in extract(&c, 6.25, 6.75) {
                assert!(k.ghz() > 6.25 && k.ghz() < 6.75, "leaked {k}");
            }
        }
    }
}
