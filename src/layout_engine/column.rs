use serde::{Deserialize, Serialize};

use crate::common::collections::HashMap;
use crate::model::WindowId;

/// Weight every client and column gets by default.
pub const FULL_SHARE: i32 = 100;

/// Smallest weight a resize may leave any window with.
pub const MIN_SHARE: i32 = 10;

/// A vertical stack of windows with per-window height weights.
///
/// Heights are relative shares. Whenever a window is inserted with some
/// height, the difference to [`FULL_SHARE`] is spread across every window
/// in the column (see [`Column::update_height`]).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Column {
    windows: Vec<WindowId>,
    heights: HashMap<WindowId, i32>,
    current: usize,
    pub split: bool,
    insert_position: i32,
    pub width: i32,
}

/// Splits `delta` into `n` truncated shares, the rounding remainder going to
/// the first share. The shares always sum to `delta`.
pub(crate) fn spread(delta: i32, n: usize) -> Vec<i32> {
    if n == 0 {
        return Vec::new();
    }
    let share = delta / n as i32;
    let mut growth = vec![share; n];
    growth[0] += delta - share * n as i32;
    growth
}

impl Column {
    pub fn new(split: bool, insert_position: i32) -> Self {
        Self {
            windows: Vec::new(),
            heights: HashMap::default(),
            current: 0,
            split,
            insert_position,
            width: FULL_SHARE,
        }
    }

    pub fn len(&self) -> usize { self.windows.len() }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    pub fn contains(&self, wid: WindowId) -> bool { self.heights.contains_key(&wid) }

    pub fn iter(&self) -> impl Iterator<Item = WindowId> + '_ { self.windows.iter().copied() }

    pub fn windows(&self) -> &[WindowId] { &self.windows }

    pub fn index_of(&self, wid: WindowId) -> Option<usize> {
        self.windows.iter().position(|&w| w == wid)
    }

    pub fn height_of(&self, wid: WindowId) -> Option<i32> { self.heights.get(&wid).copied() }

    /// Heights in stack order.
    pub fn heights(&self) -> Vec<i32> {
        self.windows.iter().map(|w| self.heights[w]).collect()
    }

    pub fn total_height(&self) -> i32 { self.heights.values().sum() }

    pub fn current_index(&self) -> Option<usize> {
        (self.current < self.windows.len()).then_some(self.current)
    }

    pub fn current_window(&self) -> Option<WindowId> { self.windows.get(self.current).copied() }

    /// Makes `wid` the locally focused window. Returns false if it is not here.
    pub fn focus(&mut self, wid: WindowId) -> bool {
        match self.index_of(wid) {
            Some(idx) => {
                self.current = idx;
                true
            }
            None => false,
        }
    }

    pub fn focus_first(&self) -> Option<WindowId> { self.windows.first().copied() }

    pub fn focus_last(&self) -> Option<WindowId> { self.windows.last().copied() }

    pub fn focus_next(&self, wid: WindowId) -> Option<WindowId> {
        let idx = self.index_of(wid)?;
        self.windows.get(idx + 1).copied()
    }

    pub fn focus_previous(&self, wid: WindowId) -> Option<WindowId> {
        let idx = self.index_of(wid)?;
        idx.checked_sub(1).map(|prev| self.windows[prev])
    }

    pub fn toggle_split(&mut self) { self.split = !self.split; }

    /// Sets the weight of `wid` and spreads `FULL_SHARE - height` over every
    /// window in the column, `wid` included.
    ///
    /// A height of exactly [`FULL_SHARE`] changes nothing else, so `n`
    /// default-height insertions leave the column summing to `100 * n`.
    pub fn update_height(&mut self, wid: WindowId, height: i32) {
        self.heights.insert(wid, height);
        let delta = FULL_SHARE - height;
        if delta != 0 {
            self.grow_all(delta);
        }
    }

    fn grow_all(&mut self, delta: i32) {
        let growth = spread(delta, self.windows.len());
        for (wid, g) in self.windows.iter().zip(growth) {
            if let Some(h) = self.heights.get_mut(wid) {
                *h += g;
            }
        }
    }

    /// Inserts relative to the current window (by the configured insert
    /// position) and makes the new window current.
    pub fn add(&mut self, wid: WindowId, height: i32) {
        let pos = (self.current as i64 + self.insert_position as i64).max(0) as usize;
        if pos < self.windows.len() {
            self.windows.insert(pos, wid);
            self.current = pos;
        } else {
            self.windows.push(wid);
            self.current = self.windows.len() - 1;
        }
        self.update_height(wid, height);
    }

    pub fn add_to_tail(&mut self, wid: WindowId, make_current: bool, height: i32) {
        self.windows.push(wid);
        if make_current {
            self.current = self.windows.len() - 1;
        }
        self.update_height(wid, height);
    }

    /// Inserts at an explicit index, clamped to the column length.
    pub fn place_at(&mut self, wid: WindowId, height: i32, index: usize, make_current: bool) {
        let index = index.min(self.windows.len());
        self.windows.insert(index, wid);
        if make_current {
            self.current = index;
        } else if index <= self.current && self.windows.len() > 1 {
            self.current += 1;
        }
        self.update_height(wid, height);
    }

    /// Removes `wid`, handing its freed share `FULL_SHARE - height` back to
    /// the remaining windows.
    pub fn remove(&mut self, wid: WindowId) -> bool {
        let Some(idx) = self.index_of(wid) else {
            return false;
        };
        self.windows.remove(idx);
        let height = self.heights.remove(&wid).unwrap_or(FULL_SHARE);

        if self.windows.is_empty() {
            self.current = 0;
        } else if idx <= self.current {
            self.current = self.current.saturating_sub(1);
        }

        let delta = FULL_SHARE - height;
        if delta != 0 {
            self.grow_all(delta);
        }
        true
    }

    /// Exchanges two windows of this column. Each slot keeps its weight, so
    /// the windows trade sizes along with positions. `a` becomes current.
    pub fn swap_local(&mut self, a: WindowId, b: WindowId) -> bool {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        let (ha, hb) = (self.heights[&a], self.heights[&b]);
        self.heights.insert(a, hb);
        self.heights.insert(b, ha);
        self.windows.swap(ia, ib);
        self.current = ib;
        true
    }

    /// Grows `wid` by `amount`, taking the same total from the other windows
    /// so the column sum is unchanged. Refused if any window would end up
    /// below [`MIN_SHARE`].
    pub fn resize(&mut self, wid: WindowId, amount: i32) -> bool {
        if amount == 0 || self.windows.len() < 2 || !self.contains(wid) {
            return false;
        }
        let others: Vec<WindowId> = self.iter().filter(|&w| w != wid).collect();
        let shrink = spread(-amount, others.len());
        let fits = self.heights[&wid] + amount >= MIN_SHARE
            && others.iter().zip(&shrink).all(|(w, g)| self.heights[w] + g >= MIN_SHARE);
        if !fits {
            return false;
        }

        for (w, g) in others.iter().zip(shrink) {
            if let Some(h) = self.heights.get_mut(w) {
                *h += g;
            }
        }
        if let Some(h) = self.heights.get_mut(&wid) {
            *h += amount;
        }
        true
    }

    /// Puts `new` into `old`'s slot, inheriting the slot's weight.
    /// Returns the weight, or `None` if `old` is not in this column.
    pub fn replace(&mut self, old: WindowId, new: WindowId) -> Option<i32> {
        let idx = self.index_of(old)?;
        let height = self.heights.remove(&old)?;
        self.windows[idx] = new;
        self.heights.insert(new, height);
        Some(height)
    }

    pub fn normalize(&mut self) {
        for h in self.heights.values_mut() {
            *h = FULL_SHARE;
        }
        self.width = FULL_SHARE;
    }

    /// A column holding `weights` in order, bypassing redistribution.
    #[cfg(test)]
    pub(crate) fn with_weights(weights: &[(WindowId, i32)]) -> Self {
        let mut column = Column::new(true, 0);
        for &(wid, height) in weights {
            column.windows.push(wid);
            column.heights.insert(wid, height);
        }
        column
    }
}
