//! Local pivot detection over a symmetric window, plus forward fill.
//!
//! Row i is a pivot when it is an extremum against every neighbor in
//! [i-window, i+window]. A neighbor outside the series counts as a failed
//! comparison, not a skipped one, so rows closer than `window` to either end
//! are never pivots. Ties qualify: every row equal to the extremum is marked.

/// Which extremum a pivot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotKind {
    /// Local minimum (`value <= neighbor`), read from lows.
    Support,
    /// Local maximum (`value >= neighbor`), read from highs.
    Resistance,
}

impl PivotKind {
    fn holds(&self, value: f64, neighbor: f64) -> bool {
        match self {
            PivotKind::Support => value <= neighbor,
            PivotKind::Resistance => value >= neighbor,
        }
    }
}

/// Neighbor at signed `offset` from `index`, or `None` outside the series.
fn neighbor(values: &[f64], index: usize, offset: isize) -> Option<f64> {
    let j = index.checked_add_signed(offset)?;
    values.get(j).copied()
}

/// Mark pivots: `Some(values[i])` on pivot rows, `None` elsewhere.
pub fn detect_pivots(values: &[f64], window: usize, kind: PivotKind) -> Vec<Option<f64>> {
    let w = window as isize;
    (0..values.len())
        .map(|i| {
            let value = values[i];
            let is_pivot = (-w..=w).filter(|&off| off != 0).all(|off| {
                neighbor(values, i, off).is_some_and(|other| kind.holds(value, other))
            });
            is_pivot.then_some(value)
        })
        .collect()
}

/// Carry the most recent set value forward over unset rows.
/// Rows before the first set value stay unset.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}
