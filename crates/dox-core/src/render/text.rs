//! Text measurement, line wrapping and string encoding for the standard
//! Helvetica faces.

/// Glyph widths (1/1000 em) of Helvetica for ASCII 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Glyph widths (1/1000 em) of Helvetica-Bold for ASCII 32..=126.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Width used for anything outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Font face used on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    /// Resource name inside the page's font dictionary.
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// PDF standard 14 base font.
    #[must_use]
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    fn glyph_width(self, c: char) -> u16 {
        let table = match self {
            Self::Regular => &HELVETICA,
            Self::Bold => &HELVETICA_BOLD,
        };
        let code = c as u32;
        if (32..=126).contains(&code) {
            table[(code - 32) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }
}

/// Rendered width of `text` in points.
#[must_use]
pub fn text_width(text: &str, face: Face, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(face.glyph_width(c))).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap of one paragraph to `max_width` points.
///
/// Words wider than a full line are broken between characters. An empty
/// paragraph yields a single empty line so blank lines survive.
#[must_use]
pub fn wrap(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, face, size) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = break_word(word, face, size, max_width);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && text_width(&piece, face, size) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    pieces.push(piece);
    pieces
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
#[must_use]
pub fn fit_to_width(text: &str, face: Face, size: f32, max_width: f32) -> String {
    if text_width(text, face, size) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width(&candidate, face, size) <= max_width {
            return candidate;
        }
    }
    String::from("...")
}

/// Encode text for a WinAnsiEncoding simple font.
///
/// Latin-1 maps straight through, the typographic punctuation that
/// WinAnsi places in 0x80..0x9F is translated, and anything else becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_tables_cover_printable_ascii() {
        assert_eq!(HELVETICA.len(), 95);
        assert_eq!(HELVETICA_BOLD.len(), 95);
        assert!((text_width(" ", Face::Regular, 10.0) - 2.78).abs() < 1e-4);
        assert!(text_width("W", Face::Bold, 12.0) > text_width("i", Face::Bold, 12.0));
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        let lines = wrap("Umpires report early.", Face::Regular, 11.0, 500.0);
        assert_eq!(lines, vec!["Umpires report early."]);
    }

    #[test]
    fn test_wrap_breaks_on_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let lines = wrap(text, Face::Regular, 11.0, 80.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Face::Regular, 11.0) <= 80.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_breaks_oversized_word() {
        let word = "x".repeat(200);
        let lines = wrap(&word, Face::Regular, 11.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_paragraph_is_one_blank_line() {
        assert_eq!(wrap("", Face::Regular, 11.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_fit_to_width_truncates() {
        let long = "A very long running header that will not fit in the space";
        let fitted = fit_to_width(long, Face::Regular, 9.0, 60.0);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, Face::Regular, 9.0) <= 60.0);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("A – B"), vec![b'A', b' ', 0x96, b' ', b'B']);
        assert_eq!(encode_win_ansi("é"), vec![0xe9]);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }
}
