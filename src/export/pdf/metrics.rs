//! Text measurement for the built-in Helvetica faces.
//!
//! Built-in PDF fonts ship without metrics in printpdf, so widths come from
//! the Helvetica AFM table (units of 1/1000 em). Accented Latin letters use
//! the width of their base letter.

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Helvetica-Bold runs roughly this much wider than the regular face.
const BOLD_FACTOR: f32 = 1.06;

/// AFM widths for ASCII 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

fn base_letter(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'ê' | 'è' => 'e',
        'É' | 'Ê' | 'È' => 'E',
        'í' | 'ì' | 'î' => 'i',
        'Í' | 'Ì' | 'Î' => 'I',
        'ó' | 'ô' | 'õ' | 'ò' | 'ö' => 'o',
        'Ó' | 'Ô' | 'Õ' | 'Ò' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

fn char_units(c: char) -> u16 {
    let c = base_letter(c);
    match c as u32 {
        0x20..=0x7E => HELVETICA_WIDTHS[(c as u32 - 0x20) as usize],
        _ => 556,
    }
}

/// Rendered width of `text` at `size_pt`, in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c) as u32).sum();
    let width = units as f32 / 1000.0 * size_pt * PT_TO_MM;
    if bold { width * BOLD_FACTOR } else { width }
}

/// Font size in millimetres.
pub fn pt_to_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM
}

/// Break `text` into lines no wider than `max_width_mm`.
///
/// Words wrap on whitespace; a word wider than the line is split between
/// characters. Explicit newlines are kept. Always returns at least one line.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, size_pt, bold) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() { word.to_string() } else { format!("{} {}", current, word) };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Split an over-long word; every line keeps at least one character.
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_table_covers_printable_ascii() {
        assert_eq!(char_units(' '), 278);
        assert_eq!(char_units('0'), 556);
        assert_eq!(char_units('W'), 944);
        assert_eq!(char_units('i'), 222);
        assert_eq!(char_units('~'), 584);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        assert_eq!(text_width_mm("ção", 10.0, false), text_width_mm("cao", 10.0, false));
        assert!(text_width_mm("Gestão", 9.0, true) > text_width_mm("Gestão", 9.0, false));
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width_mm("Sistema de Gestão Diabetes", 7.0, false);
        let large = text_width_mm("Sistema de Gestão Diabetes", 14.0, false);
        assert!((large - 2.0 * small).abs() < 0.001);
        // 1000 units at 72 pt is one inch.
        assert!((text_width_mm("\u{2603}", 72.0, false) - 25.4 * 0.556).abs() < 0.001);
    }

    #[test]
    fn test_wrap_on_words_and_long_words() {
        let lines = wrap_text("Tomar antes das refeições principais", 20.0, 8.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 8.0, false) <= 20.0, "{:?}", line);
        }
        assert_eq!(lines.join(" "), "Tomar antes das refeições principais");

        let long = wrap_text("Hidroclorotiazida", 8.0, 8.0, false);
        assert!(long.len() > 1);
        assert_eq!(long.concat(), "Hidroclorotiazida");
    }

    #[test]
    fn test_wrap_keeps_newlines_and_empty_text() {
        assert_eq!(wrap_text("linha 1\nlinha 2", 100.0, 8.0, false), vec!["linha 1", "linha 2"]);
        assert_eq!(wrap_text("", 10.0, 8.0, false), vec![""]);
    }
}
