use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::column::{Column, FULL_SHARE, spread};
use super::{Direction, LayoutHost, NoopHost};
use crate::common::config::OmniSettings;
use crate::model::WindowId;

/// Weight moved by one grow or shrink step.
const RESIZE_STEP: i32 = 10;

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    Next,
    Previous,

    SwapUp,
    SwapDown,
    SwapLeft,
    SwapRight,
    SwapToLargest,
    SwapWindows(WindowId, WindowId),

    ShuffleLeft,
    ShuffleRight,

    ResizeWindowGrow,
    ResizeWindowShrink,
    ResizeWindowBy {
        amount: i32,
    },

    ToggleSplit,
    ToggleAutotile,
    ToggleAutomove,
    IncMaxStack,
    DecMaxStack,

    Normalize,
    Reset,
}

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEvent {
    WindowAdded(WindowId),
    WindowRemoved(WindowId),
    WindowFocused(WindowId),
    Command(LayoutCommand),
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    pub focus_window: Option<WindowId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub windows: Vec<WindowId>,
    pub heights: Vec<i32>,
    pub current: Option<usize>,
    pub split: bool,
    pub width: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    pub name: String,
    pub current: usize,
    pub columns: Vec<ColumnInfo>,
    pub settings: OmniSettings,
}

/// Column layout that places windows automatically.
///
/// Column 0 acts as the master column; new windows go to stack columns that
/// hold up to `max_stack` windows each. With `automove`, removals pull
/// windows leftward so that stacks stay full.
#[derive(Debug)]
pub struct OmniLayout<H: LayoutHost = NoopHost> {
    columns: Vec<Column>,
    current: usize,
    settings: OmniSettings,
    host: H,
}

impl OmniLayout<NoopHost> {
    pub fn detached(settings: OmniSettings) -> Self { Self::new(settings, NoopHost) }
}

impl<H: LayoutHost> OmniLayout<H> {
    pub fn new(settings: OmniSettings, host: H) -> Self {
        let first = Column::new(settings.split, settings.insert_position);
        Self {
            columns: vec![first],
            current: 0,
            settings,
            host,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_columns(
        settings: OmniSettings,
        host: H,
        columns: Vec<Column>,
        current: usize,
    ) -> Self {
        assert!(!columns.is_empty() && current < columns.len());
        Self { columns, current, settings, host }
    }

    /// A fresh, empty layout with the same settings, e.g. for another
    /// workspace.
    pub fn clone_layout<H2: LayoutHost>(&self, host: H2) -> OmniLayout<H2> {
        OmniLayout::new(self.settings.clone(), host)
    }

    pub fn settings(&self) -> &OmniSettings { &self.settings }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn columns(&self) -> &[Column] { &self.columns }

    pub fn column(&self, index: usize) -> Option<&Column> { self.columns.get(index) }

    pub fn current_column_index(&self) -> usize { self.current }

    pub fn current_column(&self) -> &Column { &self.columns[self.current] }

    pub fn current_window(&self) -> Option<WindowId> {
        self.columns[self.current].current_window()
    }

    pub fn set_column_width(&mut self, index: usize, width: i32) {
        if let Some(column) = self.columns.get_mut(index) {
            column.width = width;
        }
    }

    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.columns.iter().flat_map(|c| c.iter())
    }

    pub fn contains(&self, wid: WindowId) -> bool { self.locate(wid).is_some() }

    /// Index of the column holding `wid`.
    pub fn locate(&self, wid: WindowId) -> Option<usize> {
        self.columns.iter().position(|c| c.contains(wid))
    }

    fn add_column(&mut self, prepend: bool) -> usize {
        let column = Column::new(self.settings.split, self.settings.insert_position);
        if prepend {
            self.columns.insert(0, column);
            self.current += 1;
            0
        } else {
            self.columns.push(column);
            self.columns.len() - 1
        }
    }

    /// Destroys the column at `index`, spreading its width delta over the
    /// remaining columns. The only column is never removed.
    fn remove_column(&mut self, index: usize) -> bool {
        if self.columns.len() == 1 {
            warn!("Refusing to remove the only column");
            return false;
        }
        if index >= self.columns.len() {
            return false;
        }

        let removed = self.columns.remove(index);
        if index <= self.current {
            self.current = self.current.saturating_sub(1);
        }

        let delta = removed.width - FULL_SHARE;
        if delta != 0 {
            let growth = spread(delta, self.columns.len());
            for (column, g) in self.columns.iter_mut().zip(growth) {
                column.width += g;
            }
        }

        trace!(index, "Removed column");
        self.host.column_removed(index);
        true
    }

    pub fn add(&mut self, wid: WindowId, make_current: bool) {
        if self.contains(wid) {
            warn!(?wid, "Window is already in the layout; ignoring");
            return;
        }

        let current_len = self.columns[self.current].len();
        let room_for_column = current_len > 0 && self.columns.len() < self.settings.column_cap();
        let stack_full = self.settings.autotile
            && self.columns.len() > 1
            && self.columns.last().is_some_and(|c| c.len() >= self.settings.max_stack);

        let target = if room_for_column || stack_full {
            self.add_column(false)
        } else if self.settings.fair {
            let least = self
                .columns
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.len())
                .map(|(idx, c)| (idx, c.len()));
            match least {
                Some((idx, len)) if len < current_len => idx,
                _ => self.current,
            }
        } else if self.settings.autotile {
            self.columns.len() - 1
        } else {
            self.current
        };

        self.current = target;
        let column = &mut self.columns[target];
        if self.settings.autotile {
            column.add_to_tail(wid, make_current, FULL_SHARE);
        } else {
            column.add(wid, FULL_SHARE);
        }
        debug!(?wid, column = target, "Added window");
    }

    /// Removes `wid` and rebalances. Returns the window that should receive
    /// focus next.
    pub fn remove(&mut self, wid: WindowId) -> Option<WindowId> {
        let Some(idx) = self.locate(wid) else {
            debug!(?wid, "Removing unknown window; ignoring");
            return self.current_window();
        };

        self.columns[idx].remove(wid);
        let mut removed = None;
        if self.columns[idx].is_empty() && self.remove_column(idx) {
            removed = Some(idx);
        }

        if self.settings.automove && self.settings.autotile {
            self.adjust_clients(self.current, removed);
        }

        debug!(?wid, ?removed, "Removed window");
        self.current_window()
    }

    /// Pulls windows leftward into stack columns that dropped below
    /// `max_stack`, or re-creates the master column when column 0 was
    /// destroyed.
    fn adjust_clients(&mut self, ccidx: usize, removed: Option<usize>) {
        let max_stack = self.settings.max_stack;
        let collen = self.columns.len();
        let Some(current) = self.columns.get(ccidx) else {
            return;
        };

        let pull = current.len() < max_stack && ccidx + 1 != collen && ccidx != 0;
        if pull {
            for idx in ccidx..collen - 1 {
                if self.columns[idx].len() >= max_stack {
                    continue;
                }
                let Some(wid) = self.columns[idx + 1].focus_first() else {
                    continue;
                };
                self.columns[idx + 1].remove(wid);
                self.columns[idx].add_to_tail(wid, false, FULL_SHARE);
                trace!(?wid, from = idx + 1, to = idx, "Pulled window");
            }
        } else if removed == Some(0) {
            if let Some(top) = self.columns[self.current].focus_first() {
                self.columns[self.current].remove(top);
                let master = self.add_column(true);
                self.columns[master].add_to_tail(top, true, FULL_SHARE);
                self.current = 0;
                trace!(?top, "Promoted window to master column");
                if collen > 1 && self.columns[1].len() < max_stack {
                    self.adjust_clients(1, None);
                }
            }
        }

        // Promotion can drain a stack column the pull pass never visits.
        while self.columns.len() > 1 {
            let Some(idx) = self.columns.iter().rposition(Column::is_empty) else {
                break;
            };
            self.remove_column(idx);
        }
    }

    /// The host reports that `wid` gained input focus.
    pub fn focus(&mut self, wid: WindowId) -> bool {
        let Some(idx) = self.locate(wid) else {
            return false;
        };
        self.columns[idx].focus(wid);
        self.current = idx;
        true
    }

    /// The window after `wid` in stack order, continuing into the first window
    /// of the next column.
    pub fn focus_next(&self, wid: WindowId) -> Option<WindowId> {
        let col_idx = match self.locate(wid) {
            Some(idx) => {
                if let Some(next) = self.columns[idx].focus_next(wid) {
                    return Some(next);
                }
                idx
            }
            None => self.current,
        };
        if self.columns.len() < 2 {
            return None;
        }
        self.columns[Direction::Right.step(col_idx, self.columns.len())].focus_first()
    }

    /// The window before `wid` in stack order, continuing into the last window
    /// of the previous column.
    pub fn focus_previous(&self, wid: WindowId) -> Option<WindowId> {
        let col_idx = match self.locate(wid) {
            Some(idx) => {
                if let Some(prev) = self.columns[idx].focus_previous(wid) {
                    return Some(prev);
                }
                idx
            }
            None => self.current,
        };
        if self.columns.len() < 2 {
            return None;
        }
        self.columns[Direction::Left.step(col_idx, self.columns.len())].focus_last()
    }

    /// Exchanges two windows' positions and sizes, possibly across columns.
    /// Unknown windows make this a no-op.
    pub fn swap(&mut self, a: WindowId, b: WindowId) -> bool {
        if a == b {
            return false;
        }
        let (Some(col_a), Some(col_b)) = (self.locate(a), self.locate(b)) else {
            debug!(?a, ?b, "Swap with a window outside the layout; ignoring");
            return false;
        };

        if col_a == col_b {
            self.columns[col_a].swap_local(a, b);
        } else {
            self.columns[col_a].replace(a, b);
            self.columns[col_b].replace(b, a);
            self.columns[col_a].focus(b);
        }
        // The current column is whichever one `a` landed in.
        self.focus(a);

        debug!(?a, ?b, "Swapped windows");
        self.host.layout_all();
        self.host.focus_window(a);
        true
    }

    /// The window with the highest rating `column width / column length +
    /// height`. Ties go to the first window in column order.
    pub fn get_largest(&self) -> Option<WindowId> {
        let mut best: Option<(WindowId, f64)> = None;
        for column in self.columns.iter().filter(|c| !c.is_empty()) {
            let base = f64::from(column.width) / column.len() as f64;
            for wid in column.iter() {
                let rating = base + f64::from(column.height_of(wid).unwrap_or(0));
                if best.is_none_or(|(_, top)| rating > top) {
                    best = Some((wid, rating));
                }
            }
        }
        best.map(|(wid, _)| wid)
    }

    fn swap_with(&mut self, target: Option<WindowId>) -> bool {
        match (self.current_window(), target) {
            (Some(win), Some(target)) if win != target => self.swap(win, target),
            _ => false,
        }
    }

    pub fn swap_down(&mut self) -> bool {
        let target = self.current_window().and_then(|win| self.focus_next(win));
        self.swap_with(target)
    }

    pub fn swap_up(&mut self) -> bool {
        let target = self.current_window().and_then(|win| self.focus_previous(win));
        self.swap_with(target)
    }

    /// Swaps the current window with the top window of the neighbouring
    /// column, wrapping around.
    pub fn swap_horizontal(&mut self, direction: Direction) -> bool {
        if self.columns.len() < 2 || !direction.is_horizontal() {
            return false;
        }
        let idx = direction.step(self.current, self.columns.len());
        let target = self.columns[idx].focus_first();
        self.swap_with(target)
    }

    pub fn swap_to_largest(&mut self) -> bool {
        let target = self.get_largest();
        self.swap_with(target)
    }

    /// Moves the current window into the neighbouring column, keeping its
    /// weight. At the edge a new column is opened unless the window is
    /// already alone.
    pub fn shuffle(&mut self, direction: Direction) -> bool {
        let src = self.current;
        let Some(wid) = self.columns[src].current_window() else {
            return false;
        };
        let height = self.columns[src].height_of(wid).unwrap_or(FULL_SHARE);
        let at_edge = match direction {
            Direction::Left => src == 0,
            Direction::Right => src + 1 == self.columns.len(),
            Direction::Up | Direction::Down => return false,
        };

        if !at_edge {
            let dst = if direction == Direction::Left { src - 1 } else { src + 1 };
            self.columns[src].remove(wid);
            let index = self.columns[dst].current_index().unwrap_or(0);
            self.columns[dst].place_at(wid, height, index, true);
            self.current = dst;
            if self.columns[src].is_empty() {
                self.remove_column(src);
            }
        } else if self.columns[src].len() > 1 {
            self.columns[src].remove(wid);
            let dst = self.add_column(direction == Direction::Left);
            self.columns[dst].place_at(wid, height, 0, true);
            self.current = dst;
        } else {
            return false;
        }

        debug!(?wid, ?direction, column = self.current, "Shuffled window");
        self.host.layout_all();
        true
    }

    /// Grows the current window by `amount` weight units at the expense of
    /// its column neighbours. Negative amounts shrink it.
    pub fn resize_selection_by(&mut self, amount: i32) -> bool {
        let Some(wid) = self.current_window() else {
            return false;
        };
        if !self.columns[self.current].resize(wid, amount) {
            debug!(?wid, amount, "Resize refused");
            return false;
        }
        trace!(?wid, heights = ?self.columns[self.current].heights(), "Resized window");
        self.host.layout_all();
        true
    }

    pub fn toggle_split(&mut self) {
        self.columns[self.current].toggle_split();
        self.host.layout_all();
    }

    pub fn toggle_autotile(&mut self) {
        self.settings.autotile = !self.settings.autotile;
        debug!(autotile = self.settings.autotile);
    }

    pub fn toggle_automove(&mut self) {
        self.settings.automove = !self.settings.automove;
        debug!(automove = self.settings.automove);
    }

    pub fn inc_max_stack(&mut self) {
        self.settings.max_stack += 1;
        debug!(max_stack = self.settings.max_stack);
    }

    pub fn dec_max_stack(&mut self) {
        if self.settings.max_stack <= 1 {
            debug!("max_stack is already 1");
            return;
        }
        self.settings.max_stack -= 1;
        debug!(max_stack = self.settings.max_stack);
    }

    pub fn normalize(&mut self) {
        for column in &mut self.columns {
            column.normalize();
        }
        self.host.layout_all();
    }

    /// Replays every window through the placement policy, starting from a
    /// single empty column.
    pub fn reset(&mut self) {
        let windows: Vec<WindowId> = self.windows().collect();
        for idx in (1..self.columns.len()).rev() {
            self.remove_column(idx);
        }
        self.columns[0] = Column::new(self.settings.split, self.settings.insert_position);
        self.current = 0;

        if windows.is_empty() {
            return;
        }
        for &wid in &windows {
            self.add(wid, true);
        }
        let column = &mut self.columns[self.current];
        if let Some(first) = column.focus_first() {
            column.focus(first);
        }
        debug!(windows = windows.len(), columns = self.columns.len(), "Reset layout");
        self.normalize();
    }

    fn focus_step(&mut self, forward: bool) -> Option<WindowId> {
        let win = self.current_window()?;
        let target = if forward { self.focus_next(win) } else { self.focus_previous(win) }?;
        self.focus(target);
        self.host.focus_window(target);
        Some(target)
    }

    pub fn handle_command(&mut self, command: LayoutCommand) -> EventResponse {
        debug!(?command);
        let focus_window = match command {
            LayoutCommand::Next => self.focus_step(true),
            LayoutCommand::Previous => self.focus_step(false),
            LayoutCommand::SwapUp => {
                self.swap_up();
                None
            }
            LayoutCommand::SwapDown => {
                self.swap_down();
                None
            }
            LayoutCommand::SwapLeft => {
                self.swap_horizontal(Direction::Left);
                None
            }
            LayoutCommand::SwapRight => {
                self.swap_horizontal(Direction::Right);
                None
            }
            LayoutCommand::SwapToLargest => {
                self.swap_to_largest();
                None
            }
            LayoutCommand::SwapWindows(a, b) => {
                self.swap(a, b);
                None
            }
            LayoutCommand::ShuffleLeft => {
                self.shuffle(Direction::Left);
                None
            }
            LayoutCommand::ShuffleRight => {
                self.shuffle(Direction::Right);
                None
            }
            LayoutCommand::ResizeWindowGrow => {
                self.resize_selection_by(RESIZE_STEP);
                None
            }
            LayoutCommand::ResizeWindowShrink => {
                self.resize_selection_by(-RESIZE_STEP);
                None
            }
            LayoutCommand::ResizeWindowBy { amount } => {
                self.resize_selection_by(amount);
                None
            }
            LayoutCommand::ToggleSplit => {
                self.toggle_split();
                None
            }
            LayoutCommand::ToggleAutotile => {
                self.toggle_autotile();
                None
            }
            LayoutCommand::ToggleAutomove => {
                self.toggle_automove();
                None
            }
            LayoutCommand::IncMaxStack => {
                self.inc_max_stack();
                None
            }
            LayoutCommand::DecMaxStack => {
                self.dec_max_stack();
                None
            }
            LayoutCommand::Normalize => {
                self.normalize();
                None
            }
            LayoutCommand::Reset => {
                self.reset();
                self.current_window()
            }
        };
        EventResponse { focus_window }
    }

    pub fn handle_event(&mut self, event: LayoutEvent) -> EventResponse {
        debug!(?event);
        match event {
            LayoutEvent::WindowAdded(wid) => {
                self.add(wid, true);
                EventResponse::default()
            }
            LayoutEvent::WindowRemoved(wid) => EventResponse { focus_window: self.remove(wid) },
            LayoutEvent::WindowFocused(wid) => {
                self.focus(wid);
                EventResponse::default()
            }
            LayoutEvent::Command(command) => self.handle_command(command),
        }
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            name: "omni".to_string(),
            current: self.current,
            columns: self
                .columns
                .iter()
                .map(|c| ColumnInfo {
                    windows: c.windows().to_vec(),
                    heights: c.heights(),
                    current: c.current_index(),
                    split: c.split,
                    width: c.width,
                })
                .collect(),
            settings: self.settings.clone(),
        }
    }

    pub fn draw_tree(&self) -> String {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let status = if idx == self.current { "☒ " } else { "☐ " };
                let desc = format!(
                    "{status}column {idx} width={} split={}",
                    column.width, column.split
                );
                let windows = column
                    .iter()
                    .map(|wid| {
                        let status =
                            if column.current_window() == Some(wid) { "☒ " } else { "☐ " };
                        let height = column.height_of(wid).unwrap_or_default();
                        ascii_tree::Tree::Leaf(vec![format!("{status}{wid} h={height}")])
                    })
                    .collect();
                ascii_tree::Tree::Node(desc, windows)
            })
            .collect();
        let tree = ascii_tree::Tree::Node("omni".to_string(), columns);
        let mut out = String::new();
        if let Err(e) = ascii_tree::write_tree(&mut out, &tree) {
            warn!("Failed to render layout tree: {e}");
        }
        out
    }
}
