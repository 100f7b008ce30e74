//! Run length encoded character types.
//!
//! Runs live in an arena and are linked by index into circular lists, each
//! terminated by its own sentinel node. Runs are never freed; unlinked nodes
//! stay in the arena until the paragraph is done.

use crate::{
    char_type::{level_to_dir, LEVEL_SENTINEL},
    BracketType, CharType, Level,
};

pub(crate) type RunId = usize;

/// Terminates isolate sweeps in [`RunArena::adjacent_run`].
pub(crate) const ISOLATE_SENTINEL: RunId = 0;

#[derive(Clone, Debug)]
pub(crate) struct Run {
    pub pos: usize,
    pub len: usize,
    pub ty: CharType,
    pub bracket: BracketType,
    pub level: Level,
    pub iso_level: Level,
    pub prev: RunId,
    pub next: RunId,
    // links through the runs of the same isolating sequence
    pub prev_isolate: Option<RunId>,
    pub next_isolate: Option<RunId>,
}

impl Run {
    fn new(ty: CharType, pos: usize, len: usize) -> Self {
        Self {
            pos,
            len,
            ty,
            bracket: BracketType::NONE,
            level: 0,
            iso_level: 0,
            prev: ISOLATE_SENTINEL,
            next: ISOLATE_SENTINEL,
            prev_isolate: None,
            next_isolate: None,
        }
    }
}

pub(crate) struct RunArena {
    runs: Vec<Run>,
}

impl std::ops::Index<RunId> for RunArena {
    type Output = Run;

    fn index(&self, id: RunId) -> &Run {
        &self.runs[id]
    }
}

impl std::ops::IndexMut<RunId> for RunArena {
    fn index_mut(&mut self, id: RunId) -> &mut Run {
        &mut self.runs[id]
    }
}

impl RunArena {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut sentinel = Run::new(CharType::SENTINEL, 0, 0);
        sentinel.level = LEVEL_SENTINEL;
        sentinel.iso_level = LEVEL_SENTINEL;
        let mut runs = Vec::with_capacity(capacity + 4);
        runs.push(sentinel);
        Self { runs }
    }

    /// Allocates an unlinked run.
    pub fn alloc(&mut self, run: Run) -> RunId {
        self.runs.push(run);
        self.runs.len() - 1
    }

    /// Allocates an unlinked run of the given type and extent.
    pub fn new_run(&mut self, ty: CharType, pos: usize, len: usize) -> RunId {
        self.alloc(Run::new(ty, pos, len))
    }

    /// Creates an empty list, returning its sentinel.
    pub fn new_list(&mut self) -> RunId {
        let id = self.new_run(CharType::SENTINEL, 0, 0);
        let run = &mut self[id];
        run.level = LEVEL_SENTINEL;
        run.prev = id;
        run.next = id;
        id
    }

    pub fn is_sentinel(&self, id: RunId) -> bool {
        self[id].ty.is_sentinel()
    }

    /// Iterates the runs of a list, front to back.
    ///
    /// The list must not be modified during iteration.
    pub fn iter(&self, list: RunId) -> impl Iterator<Item = RunId> + '_ {
        let mut cur = self[list].next;
        std::iter::from_fn(move || {
            if self.is_sentinel(cur) {
                return None;
            }
            let id = cur;
            cur = self[cur].next;
            Some(id)
        })
    }

    /// Builds a list with one run per sequence of equal types.
    ///
    /// Brackets and isolate controls always get runs of their own.
    pub fn encode(&mut self, types: &[CharType], brackets: &[BracketType]) -> RunId {
        let list = self.new_list();
        let mut last = list;
        for (i, ty) in types.iter().copied().enumerate() {
            let bracket = brackets.get(i).copied().unwrap_or(BracketType::NONE);
            if ty != self[last].ty
                || !bracket.is_none()
                || !self[last].bracket.is_none()
                || ty.is_isolate()
            {
                let run = self.new_run(ty, i, 0);
                self[run].bracket = bracket;
                self[run].prev = last;
                if last != list {
                    self[last].len = i - self[last].pos;
                }
                self[last].next = run;
                last = run;
            }
        }
        if last != list {
            self[last].len = types.len() - self[last].pos;
        }
        self[last].next = list;
        self[list].prev = last;
        list
    }

    /// Unlinks a run from its list.
    pub fn unlink(&mut self, x: RunId) {
        let (prev, next) = (self[x].prev, self[x].next);
        self[prev].next = next;
        self[next].prev = prev;
    }

    /// Links an unlinked run before `list`, that is, at the end of the list.
    pub fn insert_before(&mut self, list: RunId, x: RunId) {
        let prev = self[list].prev;
        self[x].prev = prev;
        self[prev].next = x;
        self[x].next = list;
        self[list].prev = x;
    }

    /// Moves a linked run before `list`.
    pub fn move_before(&mut self, list: RunId, x: RunId) {
        self.unlink(x);
        self.insert_before(list, x);
    }

    /// Merges a run into its predecessor and returns the predecessor.
    pub fn merge_with_prev(&mut self, second: RunId) -> RunId {
        let first = self[second].prev;
        let next = self[second].next;
        self[first].next = next;
        self[next].prev = first;
        self[first].len += self[second].len;
        let (prev_isolate, next_isolate) = (self[second].prev_isolate, self[second].next_isolate);
        if let Some(next_isolate) = next_isolate {
            self[next_isolate].prev_isolate = prev_isolate;
        } else if self[next].prev_isolate == Some(second) {
            self[next].prev_isolate = prev_isolate;
        }
        if let Some(prev_isolate) = prev_isolate {
            self[prev_isolate].next_isolate = next_isolate;
        }
        self[first].next_isolate = next_isolate;
        first
    }

    /// Merges adjacent runs of equal type and level, except brackets.
    pub fn compact(&mut self, list: RunId) {
        self.compact_with(list, |a, b| a == b);
    }

    /// Like [`compact`](Self::compact) but also merges adjacent neutrals of
    /// different types.
    pub fn compact_neutrals(&mut self, list: RunId) {
        self.compact_with(list, |a, b| a == b || (a.is_neutral() && b.is_neutral()));
    }

    fn compact_with(&mut self, list: RunId, same_type: impl Fn(CharType, CharType) -> bool) {
        let mut pp = self[list].next;
        while !self.is_sentinel(pp) {
            let prev = self[pp].prev;
            if !self.is_sentinel(prev)
                && self[prev].level == self[pp].level
                && same_type(self[prev].ty, self[pp].ty)
                && self[pp].bracket.is_none()
                && self[prev].bracket.is_none()
            {
                pp = self.merge_with_prev(pp);
            }
            pp = self[pp].next;
        }
    }

    /// The type of the previous run, or the start of run type if the
    /// previous run has another level.
    pub fn prev_type_or_sor(&self, id: RunId) -> CharType {
        let prev = self[id].prev;
        if self[prev].level == self[id].level {
            self[prev].ty
        } else {
            level_to_dir(self[prev].level.max(self[id].level))
        }
    }

    /// Finds the neighbor of a run within its isolating run sequence.
    ///
    /// Runs of deeper isolate levels are skipped, as are PDIs when sweeping
    /// forward and non strong runs when `skip_neutral` is set. Returns
    /// [`ISOLATE_SENTINEL`] at the end of the sequence.
    pub fn adjacent_run(&self, id: RunId, forward: bool, skip_neutral: bool) -> RunId {
        let step = |id: RunId| {
            if forward {
                self[id].next_isolate
            } else {
                self[id].prev_isolate
            }
        };
        let iso_level = self[id].iso_level;
        let mut ppp = step(id);
        while let Some(cur) = ppp {
            let ty = self[cur].ty;
            if ty.is_sentinel() {
                return cur;
            }
            if self[cur].iso_level > iso_level
                || (forward && ty == CharType::PDI)
                || (skip_neutral && !ty.is_strong())
            {
                ppp = step(cur);
                continue;
            }
            return cur;
        }
        ISOLATE_SENTINEL
    }

    /// Overrides the runs of `base` with the runs of `over`.
    ///
    /// Runs of `over` are moved into `base`, splitting or trimming the base
    /// runs they overlap. The first run of `base` must not start after the
    /// first run of `over` and the last run of `base` must not end before
    /// the last run of `over`. With `preserve_length`, base runs are grown
    /// by the inserted length instead, which reinserts runs that were
    /// removed from `base` earlier.
    pub fn shadow(&mut self, base: RunId, over: RunId, preserve_length: bool) {
        let mut p = base;
        let mut pos = 0;
        let mut q = self[over].next;
        while !self.is_sentinel(q) {
            if self[q].len == 0 || self[q].pos < pos {
                q = self[q].next;
                continue;
            }
            pos = self[q].pos;
            while !self.is_sentinel(self[p].next) && self[self[p].next].pos <= pos {
                p = self[p].next;
            }
            // p is the run that q is inserted into
            let pos2 = pos + self[q].len;
            let mut r = p;
            while !self.is_sentinel(self[r].next) && self[self[r].next].pos < pos2 {
                r = self[r].next;
            }
            // p is the list sentinel when q starts before every base run
            let p_is_sentinel = self.is_sentinel(p);
            if preserve_length && !self.is_sentinel(r) {
                self[r].len += self[q].len;
            }
            // r is the last run that q overlaps
            let p_end = self[p].pos + self[p].len;
            if p == r {
                // split p in up to three parts, q replaces the middle one
                if !p_is_sentinel && p_end > pos2 {
                    let third = Run {
                        pos: pos2,
                        len: p_end - pos2,
                        prev_isolate: None,
                        next_isolate: None,
                        bracket: BracketType::NONE,
                        ..self[p].clone()
                    };
                    let third = self.alloc(third);
                    let next = self[p].next;
                    self[next].prev = third;
                    self[third].next = next;
                    r = third;
                } else {
                    r = self[r].next;
                }
                if !p_is_sentinel && p_end >= pos {
                    if self[p].pos < pos {
                        self[p].len = pos - self[p].pos;
                    } else {
                        p = self[p].prev;
                    }
                }
            } else {
                if !p_is_sentinel && p_end >= pos {
                    if self[p].pos < pos {
                        self[p].len = pos - self[p].pos;
                    } else {
                        p = self[p].prev;
                    }
                }
                let r_end = self[r].pos + self[r].len;
                if r_end > pos2 {
                    self[r].len = r_end - pos2;
                    self[r].pos = pos2;
                } else {
                    r = self[r].next;
                }
            }
            // the runs between p and r are dropped by relinking
            let t = q;
            q = self[q].prev;
            self.unlink(t);
            self[p].next = t;
            self[t].prev = p;
            self[t].next = r;
            self[r].prev = t;
            q = self[q].next;
        }
    }

    /// Expands the levels of a list into one level per character.
    pub fn levels(&self, list: RunId, len: usize) -> Vec<Level> {
        let mut levels = vec![0; len];
        let mut pos = 0;
        for id in self.iter(list) {
            let run = &self[id];
            let end = (pos + run.len).min(len);
            if let Some(slots) = levels.get_mut(pos..end) {
                slots.fill(run.level);
            }
            pos = end;
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents(arena: &RunArena, list: RunId) -> Vec<(usize, usize, CharType)> {
        arena
            .iter(list)
            .map(|id| (arena[id].pos, arena[id].len, arena[id].ty))
            .collect()
    }

    #[test]
    fn encode_runs() {
        use CharType as T;
        let types = [T::LTR, T::LTR, T::ON, T::ON, T::RTL, T::LRI, T::LRI, T::PDI];
        let mut brackets = vec![BracketType::NONE; types.len()];
        brackets[3] = crate::bracket('(');
        let mut arena = RunArena::with_capacity(types.len());
        let list = arena.encode(&types, &brackets);
        assert_eq!(
            extents(&arena, list),
            [
                (0, 2, T::LTR),
                (2, 1, T::ON),
                (3, 1, T::ON),
                (4, 1, T::RTL),
                (5, 1, T::LRI),
                (6, 1, T::LRI),
                (7, 1, T::PDI),
            ]
        );
    }

    #[test]
    fn empty_list() {
        let mut arena = RunArena::with_capacity(0);
        let list = arena.encode(&[], &[]);
        assert_eq!(arena.iter(list).count(), 0);
        assert!(arena.levels(list, 0).is_empty());
    }

    #[test]
    fn compact_merges_equal_neighbors() {
        use CharType as T;
        let types = [T::WS, T::ON, T::ON, T::LTR];
        let mut arena = RunArena::with_capacity(types.len());
        let list = arena.encode(&types, &[]);
        arena.compact(list);
        assert_eq!(
            extents(&arena, list),
            [(0, 1, T::WS), (1, 2, T::ON), (3, 1, T::LTR)]
        );
        arena.compact_neutrals(list);
        assert_eq!(extents(&arena, list), [(0, 3, T::WS), (3, 1, T::LTR)]);
    }

    #[test]
    fn shadow_splits_runs() {
        use CharType as T;
        let mut arena = RunArena::with_capacity(4);
        let base = arena.encode(&[T::LTR; 6], &[]);
        let over = arena.new_list();
        let run = arena.new_run(T::RTL, 2, 2);
        arena.insert_before(over, run);
        arena.shadow(base, over, false);
        assert_eq!(
            extents(&arena, base),
            [(0, 2, T::LTR), (2, 2, T::RTL), (4, 2, T::LTR)]
        );
        assert_eq!(arena.iter(over).count(), 0);
    }

    #[test]
    fn shadow_reinserts_removed_runs() {
        use CharType as T;
        let types = [T::LTR, T::LTR, T::PDF, T::LTR, T::LTR];
        let mut arena = RunArena::with_capacity(types.len());
        let base = arena.encode(&types, &[]);
        let removed = arena.new_list();
        let pdf = arena.iter(base).nth(1).unwrap();
        arena.move_before(removed, pdf);
        arena.compact(base);
        assert_eq!(extents(&arena, base), [(0, 4, T::LTR)]);
        arena.shadow(base, removed, true);
        assert_eq!(
            extents(&arena, base),
            [(0, 2, T::LTR), (2, 1, T::PDF), (3, 2, T::LTR)]
        );
    }

    #[test]
    fn shadow_reinserts_leading_runs() {
        use CharType as T;
        let types = [T::BN, T::LRE, T::LTR, T::LTR];
        let mut arena = RunArena::with_capacity(types.len());
        let base = arena.encode(&types, &[]);
        let removed = arena.new_list();
        for id in arena.iter(base).take(2).collect::<Vec<_>>() {
            arena.move_before(removed, id);
        }
        arena.shadow(base, removed, true);
        assert_eq!(
            extents(&arena, base),
            [(0, 1, T::BN), (1, 1, T::LRE), (2, 2, T::LTR)]
        );
        // the list is still closed by its sentinel
        assert_eq!(arena[arena[base].prev].ty, T::LTR);
        assert_eq!(arena.iter(removed).count(), 0);
    }

    #[test]
    fn shadow_into_empty_list() {
        use CharType as T;
        let mut arena = RunArena::with_capacity(1);
        let base = arena.encode(&[T::BN], &[]);
        let removed = arena.new_list();
        let bn = arena[base].next;
        arena.move_before(removed, bn);
        assert_eq!(arena.iter(base).count(), 0);
        arena.shadow(base, removed, true);
        assert_eq!(extents(&arena, base), [(0, 1, T::BN)]);
    }
}
