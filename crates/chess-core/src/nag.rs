//! Numeric Annotation Glyph algebra.
//!
//! Two families are managed: move-quality glyphs (codes 0..=6) and
//! position-evaluation glyphs (10..=21). Setting a glyph from one family
//! replaces any other glyph of that family and leaves unrelated codes alone.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveQuality {
    /// Explicitly neutral (code 0).
    Correct,
    Good,
    Mistake,
    VeryGood,
    Blunder,
    Speculative,
    Inaccuracy,
}

impl MoveQuality {
    pub fn code(self) -> u8 {
        match self {
            MoveQuality::Correct => 0,
            MoveQuality::Good => 1,
            MoveQuality::Mistake => 2,
            MoveQuality::VeryGood => 3,
            MoveQuality::Blunder => 4,
            MoveQuality::Speculative => 5,
            MoveQuality::Inaccuracy => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Increase => 1,
            Direction::Decrease => -1,
        }
    }
}

const MOVE_QUALITY_CODES: std::ops::RangeInclusive<u8> = 0..=6;

/// Worst to best. `None` is the unannotated middle.
const MOVE_SCALE: [Option<u8>; 7] = [Some(4), Some(2), Some(6), None, Some(5), Some(1), Some(3)];

/// Black crushing to White crushing, drawish in the middle.
const POSITION_SCALE: [u8; 11] = [21, 19, 17, 15, 11, 10, 13, 14, 16, 18, 20];

const WHITE_SLIGHT: u8 = 14;
const BLACK_SLIGHT: u8 = 15;

fn is_position_code(code: u8) -> bool {
    POSITION_SCALE.contains(&code)
}

fn replace_family(nags: &[u8], in_family: impl Fn(u8) -> bool, code: Option<u8>) -> Vec<u8> {
    let mut out: Vec<u8> = nags.iter().copied().filter(|n| !in_family(*n)).collect();
    out.extend(code);
    out.sort_unstable();
    out.dedup();
    out
}

/// Sets the move-quality glyph, replacing any previous one.
pub fn annotate_move(nags: &[u8], quality: MoveQuality) -> Vec<u8> {
    replace_family(nags, |n| MOVE_QUALITY_CODES.contains(&n), Some(quality.code()))
}

/// Steps the move-quality glyph one place along the blunder..brilliant scale.
/// Saturates at both ends; landing on the middle removes the glyph.
pub fn step_move_quality(nags: &[u8], direction: Direction) -> Vec<u8> {
    let current = nags
        .iter()
        .copied()
        .find(|n| MOVE_QUALITY_CODES.contains(n) && *n != 0);
    let index = MOVE_SCALE
        .iter()
        .position(|c| *c == current)
        .unwrap_or(3) as isize;
    let target = (index + direction.delta()).clamp(0, MOVE_SCALE.len() as isize - 1);
    replace_family(
        nags,
        |n| MOVE_QUALITY_CODES.contains(&n),
        MOVE_SCALE[target as usize],
    )
}

pub fn position_glyph(nags: &[u8]) -> Option<u8> {
    nags.iter().copied().find(|n| is_position_code(*n))
}

/// Steps the position glyph one place toward White or Black. Without a
/// current glyph, the first step lands on the slight advantage for that side.
pub fn step_position(nags: &[u8], direction: Direction) -> Vec<u8> {
    let target = match position_glyph(nags) {
        None => match direction {
            Direction::Increase => WHITE_SLIGHT,
            Direction::Decrease => BLACK_SLIGHT,
        },
        Some(code) => {
            let index = POSITION_SCALE
                .iter()
                .position(|c| *c == code)
                .unwrap_or(POSITION_SCALE.len() / 2) as isize;
            let stepped =
                (index + direction.delta()).clamp(0, POSITION_SCALE.len() as isize - 1);
            POSITION_SCALE[stepped as usize]
        }
    };
    replace_family(nags, is_position_code, Some(target))
}

/// Conventional symbol for a glyph, for display.
pub fn nag_symbol(code: u8) -> Option<&'static str> {
    Some(match code {
        1 => "!",
        2 => "?",
        3 => "!!",
        4 => "??",
        5 => "!?",
        6 => "?!",
        7 => "□",
        10 => "=",
        13 => "∞",
        14 => "⩲",
        15 => "⩱",
        16 => "±",
        17 => "∓",
        18 => "+-",
        19 => "-+",
        20 => "+--",
        21 => "--+",
        22 | 23 => "⨀",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_QUALITIES: [MoveQuality; 7] = [
        MoveQuality::Correct,
        MoveQuality::Good,
        MoveQuality::Mistake,
        MoveQuality::VeryGood,
        MoveQuality::Blunder,
        MoveQuality::Speculative,
        MoveQuality::Inaccuracy,
    ];

    #[test]
    fn test_annotate_keeps_one_quality_glyph() {
        let existing = vec![2, 14, 140];
        for q in ALL_QUALITIES {
            let nags = annotate_move(&existing, q);
            let family: Vec<u8> = nags.iter().copied().filter(|n| *n <= 6).collect();
            assert_eq!(family, vec![q.code()], "quality {:?}", q);
            assert!(nags.contains(&14));
            assert!(nags.contains(&140));
            assert!(nags.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_move_quality_steps() {
        assert_eq!(step_move_quality(&[], Direction::Increase), vec![5]);
        assert_eq!(step_move_quality(&[5], Direction::Increase), vec![1]);
        assert_eq!(step_move_quality(&[1], Direction::Increase), vec![3]);
        assert_eq!(step_move_quality(&[3], Direction::Increase), vec![3]);
        assert_eq!(step_move_quality(&[6], Direction::Increase), Vec::<u8>::new());
        assert_eq!(step_move_quality(&[0, 16], Direction::Decrease), vec![6, 16]);
        assert_eq!(step_move_quality(&[4], Direction::Decrease), vec![4]);
    }

    #[test]
    fn test_position_step_inverse_away_from_extremes() {
        let last = POSITION_SCALE.len() - 1;
        for (i, code) in POSITION_SCALE.iter().enumerate() {
            let nags = vec![1, *code];
            if i < last {
                let up = step_position(&nags, Direction::Increase);
                assert_eq!(step_position(&up, Direction::Decrease), nags);
            }
            if i > 0 {
                let down = step_position(&nags, Direction::Decrease);
                assert_eq!(step_position(&down, Direction::Increase), nags);
            }
        }
    }

    #[test]
    fn test_position_step_saturates() {
        assert_eq!(step_position(&[20], Direction::Increase), vec![20]);
        assert_eq!(step_position(&[21], Direction::Decrease), vec![21]);
    }

    #[test]
    fn test_position_step_from_nothing() {
        assert_eq!(step_position(&[3], Direction::Increase), vec![3, 14]);
        assert_eq!(step_position(&[], Direction::Decrease), vec![15]);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(nag_symbol(4), Some("??"));
        assert_eq!(nag_symbol(200), None);
    }
}
