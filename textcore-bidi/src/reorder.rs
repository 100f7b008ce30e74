//! Line reordering and removal of bidi marks.

use crate::{
    char_type::{dir_to_level, level_rtl},
    CharType, Level, Options, ParType, CHAR_LRM, CHAR_RLM,
};

/// Reorders a line of a paragraph for display.
///
/// The line covers `len` characters starting at `off`; all slices are
/// indexed by paragraph position. `levels` are the paragraph levels from
/// [`get_par_embedding_levels`](crate::get_par_embedding_levels) and are
/// updated by part 4 of rule L1, which resets trailing whitespace to the
/// paragraph level.
///
/// With [`Options::REORDER_NSM`], non spacing marks at right to left levels
/// are kept after their base character (rule L3). Rule L2 then reverses
/// every maximal sequence of characters at or above each level, from the
/// highest level down to 1, in both `visual` and `map`.
///
/// Returns the highest level of the line plus one.
#[allow(clippy::too_many_arguments)]
pub fn reorder_line(
    flags: Options,
    types: &[CharType],
    len: usize,
    off: usize,
    base_dir: ParType,
    levels: &mut [Level],
    mut visual: Option<&mut [char]>,
    mut map: Option<&mut [usize]>,
) -> Level {
    let end = (off + len).min(types.len()).min(levels.len());
    if off >= end {
        return 1;
    }
    let mut reverse = |start: usize, end: usize| {
        if let Some(visual) = visual.as_deref_mut().and_then(|v| v.get_mut(start..end)) {
            visual.reverse();
        }
        if let Some(map) = map.as_deref_mut().and_then(|m| m.get_mut(start..end)) {
            map.reverse();
        }
    };

    // L1 part 4
    let base_level = dir_to_level(base_dir);
    for i in (off..end).rev() {
        if !types[i].is_explicit_or_bn_or_ws() {
            break;
        }
        levels[i] = base_level;
    }

    // L3
    if flags.contains(Options::REORDER_NSM) {
        let mut i = end;
        while i > off {
            i -= 1;
            if level_rtl(levels[i]) == 0 || types[i] != CharType::NSM {
                continue;
            }
            let seq_end = i;
            let level = levels[i];
            let mut start = i;
            while start > off
                && types[start - 1].is_explicit_or_bn_or_nsm()
                && levels[start - 1] == level
            {
                start -= 1;
            }
            // the base character moves with its marks
            if start > off && levels[start - 1] == level {
                start -= 1;
            }
            reverse(start, seq_end + 1);
            i = start;
        }
    }

    let max_level = levels[off..end].iter().copied().max().unwrap_or(0);

    // L2
    for level in (1..=max_level).rev() {
        let mut i = end;
        while i > off {
            i -= 1;
            if levels[i] >= level {
                let seq_end = i;
                while i > off && levels[i - 1] >= level {
                    i -= 1;
                }
                reverse(i, seq_end + 1);
            }
        }
    }
    max_level + 1
}

/// Removes explicit formatting codes, isolate controls, boundary neutrals
/// and the LRM and RLM marks from `text`.
///
/// This is rule X9, extended to the marks. The optional position maps and
/// levels are compacted along with the text. If `text` is in logical order
/// `to_map` maps visual to logical positions and `from_map` logical to
/// visual; for visual text the other way around. Entries of `to_map` that
/// pointed at removed characters become `None`.
pub fn remove_bidi_marks(
    text: &mut Vec<char>,
    to_map: Option<&mut [Option<usize>]>,
    from_map: Option<&mut Vec<usize>>,
    mut levels: Option<&mut Vec<Level>>,
) {
    let mut private_from_map: Vec<usize>;
    let from_map = match (from_map, to_map.is_some()) {
        (Some(from_map), _) => Some(from_map),
        (None, true) => {
            private_from_map = vec![0; text.len()];
            if let Some(to_map) = to_map.as_deref() {
                for (i, to) in to_map.iter().enumerate() {
                    if let Some(slot) = to.and_then(|to| private_from_map.get_mut(to)) {
                        *slot = i;
                    }
                }
            }
            Some(&mut private_from_map)
        }
        (None, false) => None,
    };
    let mut from_map = from_map;

    let mut j = 0;
    for i in 0..text.len() {
        let ch = text[i];
        let ty = crate::bidi_type(ch);
        if ty.is_explicit_or_bn() || ty.is_isolate() || ch == CHAR_LRM || ch == CHAR_RLM {
            continue;
        }
        text[j] = ch;
        if let Some(levels) = levels.as_deref_mut() {
            if let Some(level) = levels.get(i).copied() {
                if let Some(slot) = levels.get_mut(j) {
                    *slot = level;
                }
            }
        }
        if let Some(from_map) = from_map.as_deref_mut() {
            if let Some(from) = from_map.get(i).copied() {
                if let Some(slot) = from_map.get_mut(j) {
                    *slot = from;
                }
            }
        }
        j += 1;
    }
    text.truncate(j);
    if let Some(levels) = levels {
        levels.truncate(j);
    }
    if let Some(from_map) = from_map {
        from_map.truncate(j);
        if let Some(to_map) = to_map {
            to_map.fill(None);
            for (i, from) in from_map.iter().enumerate() {
                if let Some(slot) = to_map.get_mut(*from) {
                    *slot = Some(i);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get_bidi_types, get_par_embedding_levels};
    use pretty_assertions::assert_eq;

    use CharType as T;

    fn reorder(types: &[CharType], base_dir: ParType, flags: Options) -> (Vec<usize>, Vec<Level>) {
        let mut base_dir = base_dir;
        let (mut levels, _) = get_par_embedding_levels(types, &[], &mut base_dir);
        let mut map: Vec<usize> = (0..types.len()).collect();
        reorder_line(
            flags,
            types,
            types.len(),
            0,
            base_dir,
            &mut levels,
            None,
            Some(&mut map),
        );
        (map, levels)
    }

    #[test]
    fn visual_order() {
        let (map, levels) = reorder(&[T::LTR, T::LTR, T::RTL, T::RTL, T::LTR], T::ON, Options::DEFAULT);
        assert_eq!(levels, [0, 0, 1, 1, 0]);
        assert_eq!(map, [0, 1, 3, 2, 4]);
    }

    #[test]
    fn nested_levels() {
        // R EN EN R in an LTR paragraph: the numbers keep their order inside
        // the reversed run
        let (map, levels) = reorder(&[T::RTL, T::EN, T::EN, T::RTL], T::LTR, Options::DEFAULT);
        assert_eq!(levels, [1, 2, 2, 1]);
        assert_eq!(map, [3, 1, 2, 0]);
    }

    #[test]
    fn trailing_whitespace_takes_base_level() {
        let types = [T::LTR, T::WS, T::WS];
        let mut levels = vec![2, 2, 2];
        let max = reorder_line(Options::DEFAULT, &types, 3, 0, T::RTL, &mut levels, None, None);
        assert_eq!(levels, [2, 1, 1]);
        assert_eq!(max, 3);
    }

    #[test]
    fn marks_follow_their_base() {
        let types = [T::RTL, T::NSM, T::RTL];
        let mut text = vec!['a', 'm', 'b'];
        let mut levels = vec![1, 1, 1];
        reorder_line(
            Options::REORDER_NSM,
            &types,
            3,
            0,
            T::RTL,
            &mut levels,
            Some(&mut text),
            None,
        );
        assert_eq!(text, ['b', 'a', 'm']);
        let mut text = vec!['a', 'm', 'b'];
        reorder_line(Options::empty(), &types, 3, 0, T::RTL, &mut levels, Some(&mut text), None);
        assert_eq!(text, ['b', 'm', 'a']);
    }

    #[test]
    fn partial_line() {
        let types = [T::RTL, T::RTL, T::RTL, T::RTL];
        let mut levels = vec![1; 4];
        let mut map: Vec<usize> = (0..4).collect();
        reorder_line(Options::DEFAULT, &types, 2, 2, T::RTL, &mut levels, None, Some(&mut map));
        assert_eq!(map, [0, 1, 3, 2]);
    }

    #[test]
    fn reordering_twice_is_identity() {
        let types = [T::LTR, T::RTL, T::EN, T::RTL, T::LTR, T::AL];
        let mut base_dir = T::ON;
        let (mut levels, _) = get_par_embedding_levels(&types, &[], &mut base_dir);
        let original_levels = levels.clone();
        let mut map: Vec<usize> = (0..types.len()).collect();
        for _ in 0..2 {
            reorder_line(
                Options::empty(),
                &types,
                types.len(),
                0,
                base_dir,
                &mut levels,
                None,
                Some(&mut map),
            );
        }
        assert_eq!(map, (0..types.len()).collect::<Vec<_>>());
        assert_eq!(levels, original_levels);
    }

    #[test]
    fn strips_marks() {
        let mut text: Vec<char> = "a\u{200F}b\u{202B}c\u{202C}\u{2067}d\u{2069}".chars().collect();
        let len = text.len();
        let mut levels: Vec<Level> = (0..len as i8).collect();
        let mut to_map: Vec<Option<usize>> = (0..len).map(Some).collect();
        remove_bidi_marks(&mut text, Some(&mut to_map), None, Some(&mut levels));
        assert_eq!(text, ['a', 'b', 'c', 'd']);
        assert_eq!(levels, [0, 2, 4, 7]);
        assert_eq!(
            to_map,
            [Some(0), None, Some(1), None, Some(2), None, None, Some(3), None]
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let mut text: Vec<char> = "\u{200E}x\u{FEFF}\u{202A}y".chars().collect();
        let mut from_map: Vec<usize> = (0..text.len()).collect();
        remove_bidi_marks(&mut text, None, Some(&mut from_map), None);
        let once = (text.clone(), from_map.clone());
        remove_bidi_marks(&mut text, None, Some(&mut from_map), None);
        assert_eq!((text, from_map), once);
        assert_eq!(once.0, ['x', 'y']);
        assert_eq!(once.1, [1, 4]);
    }

    #[test]
    fn types_from_text() {
        let types = get_bidi_types(&['\u{200F}', ' ']);
        assert_eq!(types, [T::RTL, T::WS]);
    }
}
