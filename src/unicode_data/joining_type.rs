//! Arabic-family joining-type classification.
//!
//! No crate in this engine's dependency stack exposes the Unicode
//! `Joining_Type` property, so it is hand-rolled here, scoped to the
//! joining scripts the hyphenator actually needs to reason about (Arabic,
//! Syriac, N'Ko, Mandaic, Manichaean, and friends), grounded on the
//! constants `examples/original_source/libs/minikin/ffi/IcuBridge.cpp`
//! bridges from ICU. This is not a full property table: codepoints outside
//! the ranges below report `NonJoining`, which is the correct default for
//! every script this engine treats as non-cursive.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoiningType {
    NonJoining,
    DualJoining,
    RightJoining,
    LeftJoining,
    JoinCausing,
    Transparent,
}

/// `(low, high, type)` inclusive ranges, ordered by `low` for binary search.
/// Transparent entries are combining marks that don't interrupt joining
/// (Arabic/Syriac diacritics); join-causing is ZWJ and Arabic tatweel;
/// the rest are letters classified dual/right/left per the Arabic joining
/// group tables.
const RANGES: &[(u32, u32, JoiningType)] = &[
    (0x0600, 0x0605, JoiningType::NonJoining),
    (0x0610, 0x061A, JoiningType::Transparent),
    (0x0621, 0x0621, JoiningType::RightJoining), // HAMZA
    (0x0622, 0x0625, JoiningType::RightJoining), // ALEF WITH MADDA..HAMZA ABOVE ALEF
    (0x0626, 0x0626, JoiningType::DualJoining),  // YEH WITH HAMZA ABOVE
    (0x0627, 0x0627, JoiningType::RightJoining), // ALEF
    (0x0628, 0x0628, JoiningType::DualJoining),  // BEH
    (0x0629, 0x0629, JoiningType::RightJoining), // TEH MARBUTA
    (0x062A, 0x062B, JoiningType::DualJoining),  // TEH, THEH
    (0x062C, 0x062E, JoiningType::DualJoining),  // JEEM, HAH, KHAH
    (0x062F, 0x0630, JoiningType::RightJoining), // DAL, THAL
    (0x0631, 0x0632, JoiningType::RightJoining), // REH, ZAIN
    (0x0633, 0x063A, JoiningType::DualJoining),  // SEEN..GHAIN
    (0x0640, 0x0640, JoiningType::JoinCausing),  // TATWEEL
    (0x0641, 0x0647, JoiningType::DualJoining),  // FEH..HEH
    (0x0648, 0x0648, JoiningType::RightJoining), // WAW
    (0x0649, 0x064A, JoiningType::DualJoining),  // ALEF MAKSURA, YEH
    (0x064B, 0x0655, JoiningType::Transparent),  // combining marks
    (0x0656, 0x065F, JoiningType::Transparent),
    (0x0670, 0x0670, JoiningType::Transparent),
    (0x0671, 0x0673, JoiningType::RightJoining),
    (0x0675, 0x0677, JoiningType::RightJoining),
    (0x0678, 0x0687, JoiningType::DualJoining),
    (0x0688, 0x0699, JoiningType::RightJoining),
    (0x069A, 0x06BF, JoiningType::DualJoining),
    (0x06C0, 0x06C0, JoiningType::RightJoining),
    (0x06C1, 0x06CB, JoiningType::DualJoining),
    (0x06CC, 0x06CC, JoiningType::DualJoining),
    (0x06CD, 0x06CE, JoiningType::RightJoining),
    (0x06CF, 0x06CF, JoiningType::RightJoining),
    (0x06D0, 0x06D1, JoiningType::DualJoining),
    (0x06D2, 0x06D3, JoiningType::RightJoining),
    (0x06D5, 0x06D5, JoiningType::RightJoining),
    (0x06D6, 0x06DC, JoiningType::Transparent),
    (0x06DF, 0x06E4, JoiningType::Transparent),
    (0x06E7, 0x06E8, JoiningType::Transparent),
    (0x06EA, 0x06ED, JoiningType::Transparent),
    (0x06EE, 0x06EF, JoiningType::RightJoining),
    (0x06FA, 0x06FC, JoiningType::DualJoining),
    (0x06FF, 0x06FF, JoiningType::DualJoining),
    (0x0700, 0x070D, JoiningType::NonJoining), // Syriac punctuation
    (0x0710, 0x0710, JoiningType::RightJoining),
    (0x0711, 0x0711, JoiningType::Transparent),
    (0x0712, 0x0713, JoiningType::DualJoining),
    (0x0714, 0x0714, JoiningType::RightJoining),
    (0x0715, 0x0716, JoiningType::RightJoining),
    (0x0717, 0x0717, JoiningType::RightJoining),
    (0x0718, 0x0719, JoiningType::RightJoining),
    (0x071A, 0x071A, JoiningType::DualJoining),
    (0x071B, 0x071C, JoiningType::DualJoining),
    (0x071D, 0x071D, JoiningType::DualJoining),
    (0x071E, 0x071E, JoiningType::RightJoining),
    (0x071F, 0x0722, JoiningType::DualJoining),
    (0x0723, 0x0723, JoiningType::RightJoining),
    (0x0724, 0x0727, JoiningType::DualJoining),
    (0x0728, 0x0728, JoiningType::RightJoining),
    (0x0729, 0x0729, JoiningType::DualJoining),
    (0x072A, 0x072A, JoiningType::RightJoining),
    (0x072B, 0x072B, JoiningType::DualJoining),
    (0x072C, 0x072C, JoiningType::RightJoining),
    (0x072D, 0x072E, JoiningType::DualJoining),
    (0x072F, 0x072F, JoiningType::RightJoining),
    (0x0730, 0x074A, JoiningType::Transparent), // Syriac marks
    (0x0780, 0x0782, JoiningType::DualJoining), // Thaana (non-cursive, but harmless default)
    (0x07A6, 0x07B0, JoiningType::Transparent),
    (0x07CA, 0x07EA, JoiningType::DualJoining), // Nko letters
    (0x07EB, 0x07F3, JoiningType::Transparent), // Nko marks
    (0x07FA, 0x07FA, JoiningType::JoinCausing), // Nko lajanyalan
    (0x0840, 0x0858, JoiningType::DualJoining), // Mandaic
    (0x0859, 0x085B, JoiningType::Transparent),
    (0x08A0, 0x08B4, JoiningType::DualJoining), // Extended Arabic
    (0x200C, 0x200C, JoiningType::NonJoining),  // ZWNJ
    (0x200D, 0x200D, JoiningType::JoinCausing), // ZWJ
    (0xA840, 0xA871, JoiningType::DualJoining), // Phags-pa
    (0x10AC0, 0x10AE4, JoiningType::DualJoining), // Manichaean
    (0x10AE5, 0x10AE6, JoiningType::Transparent),
    (0x10B80, 0x10BA9, JoiningType::RightJoining), // Psalter Pahlavi
];

/// Classify `cp`'s joining type. Binary search over [`RANGES`].
pub fn joining_type(cp: u32) -> JoiningType {
    match RANGES.binary_search_by(|&(low, high, _)| {
        if cp < low {
            std::cmp::Ordering::Greater
        } else if cp > high {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Equal
        }
    }) {
        Ok(idx) => RANGES[idx].2,
        Err(_) => JoiningType::NonJoining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beh_is_dual_joining() {
        assert_eq!(joining_type(0x0628), JoiningType::DualJoining);
    }

    #[test]
    fn alef_is_right_joining() {
        assert_eq!(joining_type(0x0627), JoiningType::RightJoining);
    }

    #[test]
    fn latin_is_non_joining() {
        assert_eq!(joining_type('A' as u32), JoiningType::NonJoining);
    }

    #[test]
    fn zwj_is_join_causing() {
        assert_eq!(joining_type(0x200D), JoiningType::JoinCausing);
    }
}
