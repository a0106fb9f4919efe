use core::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::Position;

/// Distance estimate used to order the open set. All three variants are admissible for the
/// 4-neighbourhood with unit step cost; only [Manhattan](Heuristic::Manhattan) is tight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// |Δrow| + |Δcol|.
    #[default]
    Manhattan,
    /// sqrt(Δrow² + Δcol²). Correct but prunes less than Manhattan on a 4-grid.
    Euclidean,
    /// max(|Δrow|, |Δcol|). Only tight when diagonal moves exist, which they don't here, so
    /// it under-guides the search.
    Chebyshev,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Chebyshev,
    ];

    /// Estimated remaining cost from `a` to `b` in grid steps. Never negative.
    pub fn distance(&self, a: &Position, b: &Position) -> f64 {
        let (d_row, d_col) = a.abs_delta(b);
        let (d_row, d_col) = (d_row as f64, d_col as f64);
        match self {
            Heuristic::Manhattan => d_row + d_col,
            Heuristic::Euclidean => d_row.hypot(d_col),
            Heuristic::Chebyshev => d_row.max(d_col),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownHeuristic(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(Heuristic::Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Heuristic::Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Heuristic::Chebyshev.distance(&a, &b), 4.0);
    }

    #[test]
    fn symmetric_and_zero_on_equal_points() {
        let a = Position::new(2, 7);
        let b = Position::new(5, 1);
        for h in Heuristic::ALL {
            assert_eq!(h.distance(&a, &a), 0.0);
            assert_eq!(h.distance(&a, &b), h.distance(&b, &a));
        }
    }

    /// On a 4-grid the true distance without obstacles is Manhattan, so no estimate may exceed it.
    #[test]
    fn never_exceeds_manhattan() {
        let origin = Position::new(0, 0);
        for row in 0..6 {
            for col in 0..6 {
                let p = Position::new(row, col);
                let bound = Heuristic::Manhattan.distance(&origin, &p);
                for h in Heuristic::ALL {
                    assert!(h.distance(&origin, &p) <= bound);
                }
            }
        }
    }

    #[test]
    fn parse_tokens() {
        assert_eq!("manhattan".parse::<Heuristic>(), Ok(Heuristic::Manhattan));
        assert_eq!("Euclidean".parse::<Heuristic>(), Ok(Heuristic::Euclidean));
        assert_eq!(" CHEBYSHEV ".parse::<Heuristic>(), Ok(Heuristic::Chebyshev));
        assert_eq!(
            "octile".parse::<Heuristic>(),
            Err(Error::UnknownHeuristic("octile".to_owned()))
        );
        for h in Heuristic::ALL {
            assert_eq!(h.to_string().parse::<Heuristic>(), Ok(h));
        }
    }
}
