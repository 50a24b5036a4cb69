//! Provisional pixel claims made while walking a channel.

use crate::types::{Point, Segment};

use super::status::{CellStatus, StatusGrid};

/// One contiguous run of claimed pixels plus its running endpoints.
///
/// The set itself is plain data; the status-grid side effects of claiming
/// and releasing live in [`ChannelClaims`], which owns the grid borrow for
/// the whole scan.
#[derive(Default)]
pub struct PointSet {
    points: Vec<(u16, u16)>,
    endpoints: Option<(Point, Point)>,
}

impl PointSet {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grow the run to the channel position `(x, y)`; the first call pins
    /// both endpoints, later calls advance only the far end.
    fn extend(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        match &mut self.endpoints {
            None => self.endpoints = Some((p, p)),
            Some((_, b)) => *b = p,
        }
    }

    pub fn segment(&self) -> Segment {
        let (a, b) = self.endpoints.unwrap_or((Point::zeros(), Point::zeros()));
        Segment { a, b }
    }

    pub fn length_squared(&self) -> f64 {
        self.segment().length_squared()
    }

    /// Retire every claimed cell as `Done` and keep only the points whose
    /// votes are still counted (those claimed out of `Voted`); freshly
    /// pending points never voted, so they are dropped from the returned
    /// list with a swap from the tail.
    fn commit(mut self, grid: &mut StatusGrid) -> Vec<(u16, u16)> {
        let mut i = 0;
        while i < self.points.len() {
            let (x, y) = self.points[i];
            let (x, y) = (x as usize, y as usize);
            match grid.get(x, y) {
                CellStatus::MarkedPending => {
                    grid.set(x, y, CellStatus::Done);
                    self.points.swap_remove(i);
                }
                CellStatus::MarkedVoted => {
                    grid.set(x, y, CellStatus::Done);
                    i += 1;
                }
                other => {
                    debug_assert!(false, "claimed cell in foreign state {other:?}");
                    self.points.swap_remove(i);
                }
            }
        }
        self.points
    }

    fn release(&self, grid: &mut StatusGrid) {
        for &(x, y) in &self.points {
            let (x, y) = (x as usize, y as usize);
            match grid.get(x, y) {
                CellStatus::MarkedPending => grid.set(x, y, CellStatus::Pending),
                CellStatus::MarkedVoted => grid.set(x, y, CellStatus::Voted),
                _ => {}
            }
        }
    }
}

/// Scoped owner of all claims made during one channel scan.
///
/// Claims from every run stay marked until the scan finishes so that no
/// two runs of the same channel can grab the same pixel. On drop, any
/// still-marked cell reverts to its pre-claim state; committing the
/// winning run first removes it from the guard's care.
pub struct ChannelClaims<'g> {
    grid: &'g mut StatusGrid,
    sets: Vec<PointSet>,
}

impl<'g> ChannelClaims<'g> {
    pub fn new(grid: &'g mut StatusGrid) -> Self {
        Self {
            grid,
            sets: vec![PointSet::default()],
        }
    }

    /// Try to claim the pixel at `(x, y)` for the current run.
    pub fn add(&mut self, x: i64, y: i64) -> bool {
        if !self.grid.in_bounds(x, y) {
            return false;
        }
        let (xu, yu) = (x as usize, y as usize);
        let marked = match self.grid.get(xu, yu) {
            CellStatus::Pending => CellStatus::MarkedPending,
            CellStatus::Voted => CellStatus::MarkedVoted,
            _ => return false,
        };
        self.grid.set(xu, yu, marked);
        self.current().points.push((x as u16, y as u16));
        true
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        self.current().extend(x, y);
    }

    pub fn current_is_empty(&self) -> bool {
        self.sets.last().expect("claims always hold a run").is_empty()
    }

    /// Close the current run and open a fresh one.
    pub fn finish_run(&mut self) {
        self.sets.push(PointSet::default());
    }

    fn current(&mut self) -> &mut PointSet {
        self.sets.last_mut().expect("claims always hold a run")
    }

    /// Commit the longest run (first wins on ties) and report its segment
    /// together with the committed points whose votes must be withdrawn.
    /// Every losing run is released as the guard drops.
    pub fn commit_longest(mut self) -> Option<(Segment, Vec<(u16, u16)>)> {
        if self.current_is_empty() {
            self.sets.pop();
        }
        if self.sets.is_empty() {
            return None;
        }

        let mut best = 0;
        for (i, set) in self.sets.iter().enumerate().skip(1) {
            if set.length_squared() > self.sets[best].length_squared() {
                best = i;
            }
        }

        let winner = self.sets.swap_remove(best);
        let segment = winner.segment();
        let voted = winner.commit(self.grid);
        Some((segment, voted))
    }
}

impl Drop for ChannelClaims<'_> {
    fn drop(&mut self) {
        for set in &self.sets {
            set.release(self.grid);
        }
    }
}
