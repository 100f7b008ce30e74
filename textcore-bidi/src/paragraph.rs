//! Resolving the embedding levels of a paragraph.
//!
//! See <https://www.unicode.org/reports/tr9/>

use smallvec::SmallVec;

use crate::{
    char_type::{
        dir_to_level, level_rtl, level_to_dir, LEVEL_SENTINEL, MAX_EXPLICIT_LEVEL,
        MAX_RESOLVED_LEVELS,
    },
    run::{RunArena, RunId},
    BracketType, CharType, Level, ParType,
};

/// Isolate levels whose bracket stacks are stored inline.
const LOCAL_BRACKET_SIZE: usize = 16;

/// The maximum number of nested bracket pairs per isolate level.
const MAX_NESTED_BRACKET_PAIRS: usize = 63;

type BracketStack = SmallVec<[RunId; 64]>;

#[derive(Clone, Copy)]
struct StatusEntry {
    level: Level,
    iso_level: Level,
    isolate: bool,
    // only LTR, RTL and ON
    override_dir: CharType,
}

/// The directional status stack of rules X1 to X8.
///
/// An embedding whose level would exceed [`MAX_EXPLICIT_LEVEL`] is not
/// pushed; `over_pushed` counts them so that their PDFs are ignored. When
/// the level is exactly `MAX_EXPLICIT_LEVEL - 1`, an RLx is still valid
/// while an LRx is not, so the rejected codes can form two intervals;
/// `first_interval` counts the codes of the first one.
struct StatusStack {
    entries: Vec<StatusEntry>,
    level: Level,
    override_dir: CharType,
    over_pushed: usize,
    first_interval: usize,
}

impl StatusStack {
    fn new(base_level: Level) -> Self {
        Self {
            entries: Vec::with_capacity(MAX_RESOLVED_LEVELS),
            level: base_level,
            override_dir: CharType::ON,
            over_pushed: 0,
            first_interval: 0,
        }
    }

    fn push(
        &mut self,
        isolate_overflow: usize,
        isolate: bool,
        iso_level: Level,
        new_level: Level,
        new_override: CharType,
    ) {
        if self.over_pushed == 0 && isolate_overflow == 0 && new_level <= MAX_EXPLICIT_LEVEL {
            if self.level == MAX_EXPLICIT_LEVEL - 1 {
                self.first_interval = self.over_pushed;
            }
            self.entries.push(StatusEntry {
                level: self.level,
                iso_level,
                isolate,
                override_dir: self.override_dir,
            });
            self.level = new_level;
            self.override_dir = new_override;
        } else if isolate_overflow == 0 {
            self.over_pushed += 1;
        }
    }

    /// Pops the last valid code, returning its isolate status and isolate
    /// level.
    fn pop(&mut self) -> Option<(bool, Level)> {
        if self.entries.is_empty() {
            return None;
        }
        if self.over_pushed > self.first_interval {
            self.over_pushed -= 1;
            return None;
        }
        if self.over_pushed == self.first_interval {
            self.first_interval = 0;
        }
        let entry = self.entries.pop()?;
        self.level = entry.level;
        self.override_dir = entry.override_dir;
        Some((entry.isolate, entry.iso_level))
    }

    fn top_is_isolate(&self) -> bool {
        self.entries.last().is_some_and(|entry| entry.isolate)
    }
}

/// Returns the embedding levels of a single paragraph.
///
/// `types` are the bidi types of the characters, as returned by
/// [`get_bidi_types`](crate::get_bidi_types); `brackets` is either empty or
/// holds one [`BracketType`] per character.
///
/// If `base_dir` is not strong it is replaced by the direction of the first
/// strong letter, if any; it keeps its weak direction otherwise.
///
/// This implements rules P2 to I2 and parts 1 to 3 of rule L1. The codes
/// removed by rule X9 get the level of the preceding character. Returns the
/// levels and the highest level plus one, which is at least 1.
pub fn get_par_embedding_levels(
    types: &[CharType],
    brackets: &[BracketType],
    base_dir: &mut ParType,
) -> (Vec<Level>, Level) {
    if types.is_empty() {
        return (Vec::new(), 1);
    }
    let mut arena = RunArena::with_capacity(types.len());
    let main = arena.encode(types, brackets);

    // P2, P3
    let mut base_level = dir_to_level(*base_dir);
    if !base_dir.is_strong() {
        let mut valid_isolate_count = 0usize;
        for pp in arena.iter(main) {
            let ty = arena[pp].ty;
            if ty == CharType::PDI {
                valid_isolate_count = valid_isolate_count.saturating_sub(1);
            } else if ty.is_isolate() {
                valid_isolate_count += 1;
            } else if valid_isolate_count == 0 && ty.is_letter() {
                base_level = dir_to_level(ty);
                *base_dir = level_to_dir(base_level);
                break;
            }
        }
    }
    let base_dir = level_to_dir(base_level);

    let explicits = arena.new_list();
    resolve_explicit(&mut arena, main, explicits, base_level);
    link_isolates(&mut arena, main);
    arena.compact(main);

    let max_iso_level = resolve_weak(&mut arena, main, base_dir);
    arena.compact_neutrals(main);

    resolve_brackets(&mut arena, main, max_iso_level);
    for pp in arena.iter(main).collect::<Vec<_>>() {
        arena[pp].bracket = BracketType::NONE;
    }
    arena.compact_neutrals(main);

    resolve_neutral(&mut arena, main);
    arena.compact(main);

    // I1, I2
    let mut max_level = base_level;
    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let run = &mut arena[pp];
        if run.ty.is_number() {
            run.level = (run.level + 2) & !1;
        } else {
            run.level += level_rtl(run.level) ^ dir_to_level(run.ty);
        }
        max_level = max_level.max(run.level);
        pp = run.next;
    }
    arena.compact(main);

    // reinsert the codes removed by X9, with the level of the preceding run
    if !arena.is_sentinel(arena[explicits].next) {
        arena.shadow(main, explicits, true);
        let first = arena[main].next;
        if !arena.is_sentinel(first) && arena[first].level == LEVEL_SENTINEL {
            arena[first].level = base_level;
        }
        let mut p = arena[main].next;
        while !arena.is_sentinel(p) {
            if arena[p].level == LEVEL_SENTINEL {
                arena[p].level = arena[arena[p].prev].level;
            }
            p = arena[p].next;
        }
    }

    // L1 parts 1 to 3: separators and the whitespace before them take the
    // paragraph level
    let reset = arena.new_list();
    let mut q = reset;
    let mut in_reset = true;
    let mut end = types.len();
    for j in (0..=types.len()).rev() {
        // one virtual ON before the start closes the last span
        let ty = match j {
            0 => CharType::ON,
            _ => types[j - 1],
        };
        if !in_reset && ty.is_separator() {
            in_reset = true;
            end = j;
        } else if in_reset && !(ty.is_explicit_or_separator_or_bn_or_ws() || ty.is_isolate()) {
            in_reset = false;
            let run = arena.new_run(base_dir, j, end - j);
            arena[run].level = base_level;
            arena.insert_before(q, run);
            q = run;
        }
    }
    arena.shadow(main, reset, false);

    (arena.levels(main, types.len()), max_level + 1)
}

/// Rules X1 to X8, then X9 moves explicit codes and BNs to `explicits`.
fn resolve_explicit(arena: &mut RunArena, main: RunId, explicits: RunId, base_level: Level) {
    let mut stack = StatusStack::new(base_level);
    let mut valid_isolate_count = 0usize;
    let mut isolate_overflow = 0usize;
    let mut iso_level: Level = 0;

    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let next = arena[pp].next;
        let ty = arena[pp].ty;
        let len = arena[pp].len;
        arena[pp].iso_level = iso_level;

        if ty.is_explicit_or_bn() {
            if ty.is_strong() {
                // X2 to X5: LRE, RLE, LRO, RLO
                let new_override = ty.explicit_to_override_dir();
                for _ in 0..len {
                    let dir = dir_to_level(ty) as i16;
                    // 128 does not fit a level, and is rejected like 126
                    let new_level = ((stack.level as i16 + dir + 2) & !1) - dir;
                    let new_level = Level::try_from(new_level).unwrap_or(Level::MAX);
                    stack.push(isolate_overflow, false, iso_level, new_level, new_override);
                }
            } else if ty == CharType::PDF {
                // X7
                for _ in 0..len {
                    if stack.top_is_isolate() {
                        break;
                    }
                    if let Some((_, level)) = stack.pop() {
                        iso_level = level;
                    }
                }
            }
            // X9
            arena[pp].level = LEVEL_SENTINEL;
            arena.move_before(explicits, pp);
        } else if ty == CharType::PDI {
            // X6a
            for _ in 0..len {
                if isolate_overflow > 0 {
                    isolate_overflow -= 1;
                    arena[pp].level = stack.level;
                } else if valid_isolate_count > 0 {
                    // embeddings are implicitly terminated by the PDI
                    while !stack.entries.is_empty() && !stack.top_is_isolate() {
                        if let Some((_, level)) = stack.pop() {
                            iso_level = level;
                        }
                    }
                    stack.over_pushed = 0;
                    if let Some((_, level)) = stack.pop() {
                        iso_level = level;
                    }
                    iso_level -= 1;
                    valid_isolate_count -= 1;
                    arena[pp].level = stack.level;
                    arena[pp].iso_level = iso_level;
                } else {
                    // unmatched PDIs are neutral
                    arena[pp].ty = CharType::ON;
                    arena[pp].level = stack.level;
                }
            }
        } else if ty.is_isolate() {
            // X5a to X5c
            let level = stack.level;
            let rtl = match ty {
                CharType::LRI => false,
                CharType::RLI => true,
                _ => first_strong_is_rtl(arena, next),
            };
            let new_level = if rtl {
                level + 1 + level % 2
            } else {
                level + 2 - level % 2
            };
            arena[pp].level = level;
            arena[pp].iso_level = iso_level;
            if iso_level < MAX_EXPLICIT_LEVEL - 1 {
                iso_level += 1;
            }
            if !stack.override_dir.is_neutral() {
                arena[pp].ty = stack.override_dir;
            }
            if new_level <= MAX_EXPLICIT_LEVEL {
                valid_isolate_count += 1;
                stack.push(isolate_overflow, true, iso_level, new_level, CharType::ON);
                stack.level = new_level;
            } else {
                isolate_overflow += 1;
            }
        } else if ty == CharType::BS {
            // X8: the paragraph ends here
            break;
        } else {
            // X6
            arena[pp].level = stack.level;
            if !stack.override_dir.is_neutral() {
                arena[pp].ty = stack.override_dir;
            }
        }
        pp = next;
    }
}

/// The direction of an FSI: its first strong letter up to the matching PDI.
fn first_strong_is_rtl(arena: &RunArena, start: RunId) -> bool {
    let mut isolate_count = 0isize;
    let mut pp = start;
    while !arena.is_sentinel(pp) {
        let ty = arena[pp].ty;
        if ty == CharType::PDI {
            isolate_count -= 1;
            if isolate_count < 0 {
                break;
            }
        } else if ty.is_isolate() {
            isolate_count += 1;
        } else if isolate_count == 0 && ty.is_letter() {
            return ty.is_rtl();
        }
        pp = arena[pp].next;
    }
    false
}

/// Links the runs of each isolating run sequence.
fn link_isolates(arena: &mut RunArena, main: RunId) {
    let mut run_per_iso_level: [Option<RunId>; MAX_RESOLVED_LEVELS] = [None; MAX_RESOLVED_LEVELS];
    let mut prev_iso_level = 0usize;
    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let iso_level = arena[pp].iso_level.max(0) as usize;
        // forget deeper levels when leaving them
        if iso_level < prev_iso_level {
            for slot in &mut run_per_iso_level[iso_level + 1..=prev_iso_level] {
                *slot = None;
            }
        }
        prev_iso_level = iso_level;
        if let Some(prev) = run_per_iso_level[iso_level] {
            arena[prev].next_isolate = Some(pp);
            arena[pp].prev_isolate = Some(prev);
        }
        run_per_iso_level[iso_level] = Some(pp);
        pp = arena[pp].next;
    }
}

/// The types on either side of a run: its isolate neighbors when they share
/// its level, the start or end of run direction otherwise.
fn neighbor_types(arena: &RunArena, pp: RunId) -> (RunId, CharType, RunId, CharType) {
    let level = arena[pp].level;
    let prev = arena.adjacent_run(pp, false, false);
    let next = arena.adjacent_run(pp, true, false);
    let side_type = |id: RunId| {
        if arena[id].level == level {
            arena[id].ty
        } else {
            level_to_dir(arena[id].level.max(level))
        }
    };
    (prev, side_type(prev), next, side_type(next))
}

/// Rules W1 to W7. Returns the highest isolate level.
fn resolve_weak(arena: &mut RunArena, main: RunId, base_dir: CharType) -> Level {
    let mut max_iso_level: Level = 0;
    let mut last_strong = [base_dir; MAX_RESOLVED_LEVELS];

    // W1, W2
    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let (ppp_prev, prev_type, ppp_next, next_type) = neighbor_types(arena, pp);
        let ty = arena[pp].ty;
        let iso = arena[pp].iso_level.max(0) as usize;
        max_iso_level = max_iso_level.max(arena[pp].iso_level);
        if prev_type.is_strong() {
            last_strong[iso] = prev_type;
        }

        if ty == CharType::NSM {
            // NSMs after an isolate initiator or PDI are ON
            if arena[arena[pp].prev].ty.is_isolate() {
                arena[pp].ty = CharType::ON;
            }
            if arena[ppp_prev].level == arena[pp].level {
                if ppp_prev == arena[pp].prev {
                    pp = arena.merge_with_prev(pp);
                }
            } else {
                arena[pp].ty = prev_type;
            }
            let next = arena[pp].next;
            if prev_type == next_type && arena[pp].level == arena[next].level && ppp_next == next
            {
                pp = arena.merge_with_prev(next);
            }
            pp = arena[pp].next;
            continue;
        }

        if ty == CharType::EN && last_strong[iso] == CharType::AL {
            arena[pp].ty = CharType::AN;
            if next_type == CharType::NSM {
                arena[ppp_next].ty = CharType::AN;
            }
        }
        pp = arena[pp].next;
    }

    // W3 to W7
    last_strong[0] = base_dir;
    // W5 can keep W4 from applying to the next run
    let mut w4 = true;
    // the original type of the previous run, kept across W7 changing EN to L
    let mut prev_type_orig = CharType::ON;

    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let (_, prev_type, _, next_type) = neighbor_types(arena, pp);
        let mut ty = arena[pp].ty;
        let iso = arena[pp].iso_level.max(0) as usize;
        if prev_type.is_strong() {
            last_strong[iso] = prev_type;
        }

        // W3
        if ty == CharType::AL {
            arena[pp].ty = CharType::RTL;
            w4 = true;
            prev_type_orig = CharType::ON;
            pp = arena[pp].next;
            continue;
        }

        // W4
        if w4
            && arena[pp].len == 1
            && ty.is_es_or_cs()
            && prev_type_orig.is_number()
            && prev_type_orig == next_type
            && (prev_type_orig == CharType::EN || ty == CharType::CS)
        {
            arena[pp].ty = prev_type;
            ty = prev_type;
        }
        w4 = true;

        // W5
        if ty == CharType::ET && (prev_type_orig == CharType::EN || next_type == CharType::EN) {
            arena[pp].ty = CharType::EN;
            w4 = false;
            ty = CharType::EN;
        }

        // W6
        if ty.is_number_separator_or_terminator() {
            arena[pp].ty = CharType::ON;
        }

        // W7
        let next = arena[pp].next;
        if ty == CharType::EN && last_strong[iso] == CharType::LTR {
            arena[pp].ty = CharType::LTR;
            prev_type_orig = if arena[pp].level == arena[next].level {
                CharType::EN
            } else {
                CharType::ON
            };
        } else {
            prev_type_orig = arena.prev_type_or_sor(next);
        }
        pp = next;
    }
    max_iso_level
}

/// Rule BD16 pairs brackets, then N0 resolves each pair.
fn resolve_brackets(arena: &mut RunArena, main: RunId, max_iso_level: Level) {
    let num_iso_levels = max_iso_level.max(0) as usize + 1;
    let mut stacks: SmallVec<[BracketStack; LOCAL_BRACKET_SIZE]> =
        (0..num_iso_levels).map(|_| BracketStack::new()).collect();
    let mut overflowed: SmallVec<[bool; LOCAL_BRACKET_SIZE]> =
        SmallVec::from_elem(false, num_iso_levels);
    let mut pairs: Vec<(RunId, RunId)> = Vec::new();
    let mut last_level = arena[main].level;
    let mut last_iso_level = 0usize;

    for pp in arena.iter(main) {
        let run = &arena[pp];
        let iso = (run.iso_level.max(0) as usize).min(num_iso_levels - 1);
        // a sequence ends at a level change unless the isolate level rose
        if run.level != last_level && last_iso_level == iso {
            stacks[last_iso_level].clear();
        }
        if !run.bracket.is_none() && run.ty == CharType::ON && !overflowed[iso] {
            if run.bracket.is_open() {
                if stacks[iso].len() == MAX_NESTED_BRACKET_PAIRS {
                    log::debug!("bracket nesting overflow at isolate level {iso}");
                    overflowed[iso] = true;
                    stacks[iso].clear();
                } else {
                    stacks[iso].push(pp);
                }
            } else {
                let id = run.bracket.id();
                if let Some(ix) = stacks[iso]
                    .iter()
                    .rposition(|open| arena[*open].bracket.id() == id)
                {
                    pairs.push((stacks[iso][ix], pp));
                    stacks[iso].truncate(ix);
                }
            }
        }
        last_level = run.level;
        last_iso_level = iso;
    }
    pairs.sort_by_key(|(open, _)| arena[*open].pos);

    // the level a strong run would resolve to in I1/I2
    let strong_level = |arena: &RunArena, id: RunId| {
        let ty = an_en_as_rtl(arena[id].ty);
        let level = arena[id].level;
        (ty, level + (level_rtl(level) ^ dir_to_level(ty)))
    };

    for (open, close) in pairs {
        let embedding_level = arena[open].level;
        let iso_level = arena[open].iso_level;

        // N0 b: a strong type matching the embedding direction
        let mut resolved = None;
        let mut ppn = open;
        while ppn != close && !arena.is_sentinel(ppn) {
            let (ty, level) = strong_level(arena, ppn);
            if ty.is_strong() && level == embedding_level {
                resolved = Some(level_to_dir(level));
                break;
            }
            ppn = arena[ppn].next;
        }

        // N0 c: an opposite strong type inside takes the direction of the
        // preceding strong context
        if resolved.is_none() {
            let mut prec_strong_level = embedding_level;
            let mut ppn = arena[open].prev;
            while !arena.is_sentinel(ppn) {
                let (ty, level) = strong_level(arena, ppn);
                if ty.is_strong() && arena[ppn].iso_level == iso_level {
                    prec_strong_level = level;
                    break;
                }
                ppn = arena[ppn].prev;
            }
            let mut ppn = open;
            while ppn != close && !arena.is_sentinel(ppn) {
                let (ty, _) = strong_level(arena, ppn);
                if ty.is_strong() && arena[ppn].iso_level == iso_level {
                    resolved = Some(level_to_dir(prec_strong_level));
                    break;
                }
                ppn = arena[ppn].next;
            }
        }

        if let Some(dir) = resolved {
            arena[open].ty = dir;
            arena[close].ty = dir;
        }
    }
}

/// Within bracket pairs EN and AN are treated as R.
fn an_en_as_rtl(ty: CharType) -> CharType {
    if ty == CharType::AN || ty == CharType::EN {
        CharType::RTL
    } else {
        ty
    }
}

/// Rules N1 and N2.
fn resolve_neutral(arena: &mut RunArena, main: RunId) {
    let mut pp = arena[main].next;
    while !arena.is_sentinel(pp) {
        let level = arena[pp].level;
        let prev = arena.adjacent_run(pp, false, false);
        let next = arena.adjacent_run(pp, true, false);
        let side_type = |id: RunId| {
            if arena[id].level == level {
                arena[id].ty.number_to_rtl()
            } else {
                level_to_dir(arena[id].level.max(level))
            }
        };
        let (prev_type, next_type) = (side_type(prev), side_type(next));
        if arena[pp].ty.number_to_rtl().is_neutral() {
            arena[pp].ty = if prev_type == next_type {
                prev_type
            } else {
                level_to_dir(level)
            };
        }
        pp = arena[pp].next;
    }
}
