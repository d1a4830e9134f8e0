//! Formative similarity via decomposed-syllable edit distance
//!
//! A Hangul syllable block packs up to three jamo (leading consonant, vowel,
//! optional trailing consonant) into one code point. Comparing words at the
//! jamo level makes near-misses like 사과/사괴 score high even though the
//! syllables differ. Non-Korean characters pass through as atomic symbols.

/// First Hangul syllable block (가)
const SYLLABLE_BASE: u32 = 0xAC00;
/// Last Hangul syllable block (힣)
const SYLLABLE_LAST: u32 = 0xD7A3;
/// Vowel-position combinations per leading consonant (21 * 28)
const PER_CHOSEONG: u32 = 588;
/// Trailing-consonant slots per vowel (27 + the empty slot)
const PER_JUNGSEONG: u32 = 28;

/// Leading consonants, indexed by syllable arithmetic
const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Vowels, indexed by syllable arithmetic
const JUNGSEONG: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ',
    'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Trailing consonants; index 0 is the empty slot and emits nothing
const JONGSEONG: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ',
    'ㅁ', 'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// Decompose text into a jamo symbol sequence.
///
/// Each Hangul syllable contributes two or three symbols; anything outside
/// the syllable range contributes itself.
pub fn decompose(text: &str) -> Vec<char> {
    let mut symbols = Vec::with_capacity(text.chars().count() * 3);

    for c in text.chars() {
        let code = c as u32;
        if (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
            let index = code - SYLLABLE_BASE;
            let lead = (index / PER_CHOSEONG) as usize;
            let vowel = ((index % PER_CHOSEONG) / PER_JUNGSEONG) as usize;
            let tail = (index % PER_JUNGSEONG) as usize;

            symbols.push(CHOSEONG[lead]);
            symbols.push(JUNGSEONG[vowel]);
            if tail > 0 {
                symbols.push(JONGSEONG[tail - 1]);
            }
        } else {
            symbols.push(c);
        }
    }

    symbols
}

/// Levenshtein edit distance over two symbol sequences (unit costs).
fn levenshtein(s1: &[char], s2: &[char]) -> usize {
    if s1.len() < s2.len() {
        return levenshtein(s2, s1);
    }
    if s2.is_empty() {
        return s1.len();
    }

    let mut previous_row: Vec<usize> = (0..=s2.len()).collect();
    let mut current_row = vec![0usize; s2.len() + 1];

    for (i, c1) in s1.iter().enumerate() {
        current_row[0] = i + 1;
        for (j, c2) in s2.iter().enumerate() {
            let insertions = previous_row[j + 1] + 1;
            let deletions = current_row[j] + 1;
            let substitutions = previous_row[j] + usize::from(c1 != c2);
            current_row[j + 1] = insertions.min(deletions).min(substitutions);
        }
        std::mem::swap(&mut previous_row, &mut current_row);
    }

    previous_row[s2.len()]
}

/// Formative similarity between two words, in [0, 1].
///
/// `1 - distance / max(len_a, len_b, 1)` over the decomposed sequences.
/// Two empty decompositions compare as identical (1.0).
pub fn score(a: &str, b: &str) -> f32 {
    let seq_a = decompose(a);
    let seq_b = decompose(b);

    let distance = levenshtein(&seq_a, &seq_b);
    let max_len = seq_a.len().max(seq_b.len()).max(1);

    let similarity = 1.0 - distance as f32 / max_len as f32;
    similarity.clamp(0.0, 1.0)
}
