use crate::error::FontError;
use crate::font::TextMeasure;
use crate::units::Pt;

/// A measured word
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub width: Pt,
}

/// One wrapped line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
    /// Measured width of the words joined by single spaces
    pub width: Pt,
    /// Whether this line ends a hard line (and so is never stretched when justified)
    pub ends_paragraph: bool,
}

impl Line {
    /// The words joined by single spaces
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of the word widths, without any spacing
    pub fn words_width(&self) -> Pt {
        self.words.iter().map(|w| w.width).sum()
    }
}

/// Greedily wraps text into lines no wider than `max_width`.
///
/// Every `\n` starts a new hard line, and each hard line is wrapped on its own.
/// Whitespace inside a hard line is collapsed to single spaces. Words are kept
/// whole unless a single word is wider than `max_width`, in which case it is
/// split at the last character that still fits (at least one character per line).
pub fn wrap_text<F: TextMeasure>(
    font: &F,
    size: Pt,
    text: &str,
    max_width: Pt,
) -> Result<Vec<Line>, FontError> {
    let mut lines: Vec<Line> = Vec::new();

    for hard_line in text.split('\n') {
        let first_line = lines.len();
        let mut current: Vec<Word> = Vec::new();
        let mut current_width = Pt(0.);

        for raw in hard_line.split_whitespace() {
            for piece in split_long_word(font, size, raw, max_width)? {
                if current.is_empty() {
                    current_width = piece.width;
                    current.push(piece);
                    continue;
                }

                let candidate = format!("{} {}", join_words(&current), piece.text);
                let candidate_width = font.width_of_text(&candidate, size)?;
                if candidate_width <= max_width {
                    current.push(piece);
                    current_width = candidate_width;
                } else {
                    lines.push(Line {
                        words: std::mem::take(&mut current),
                        width: current_width,
                        ends_paragraph: false,
                    });
                    current_width = piece.width;
                    current.push(piece);
                }
            }
        }

        if !current.is_empty() || lines.len() == first_line {
            lines.push(Line {
                words: current,
                width: current_width,
                ends_paragraph: false,
            });
        }
        if let Some(last) = lines.last_mut() {
            last.ends_paragraph = true;
        }
    }

    Ok(lines)
}

fn join_words(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Measure a word, splitting it into pieces that each fit `max_width`
fn split_long_word<F: TextMeasure>(
    font: &F,
    size: Pt,
    word: &str,
    max_width: Pt,
) -> Result<Vec<Word>, FontError> {
    let width = font.width_of_text(word, size)?;
    if width <= max_width {
        return Ok(vec![Word {
            text: word.to_string(),
            width,
        }]);
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = Pt(0.);
    for ch in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(ch);
        let candidate_width = font.width_of_text(&candidate, size)?;
        if candidate_width > max_width && !piece.is_empty() {
            pieces.push(Word {
                text: std::mem::take(&mut piece),
                width: piece_width,
            });
            piece.push(ch);
            piece_width = font.width_of_text(&piece, size)?;
        } else {
            piece = candidate;
            piece_width = candidate_width;
        }
    }
    if !piece.is_empty() {
        pieces.push(Word {
            text: piece,
            width: piece_width,
        });
    }
    Ok(pieces)
}

/// Horizontal offsets of each word so that the line spans exactly `max_width`.
///
/// The free space `max_width - Σ word widths` is spread evenly over the gaps
/// between words. A single word cannot be spread and sits at offset 0.
pub fn justify_offsets(line: &Line, max_width: Pt) -> Vec<Pt> {
    if line.words.len() < 2 {
        return vec![Pt(0.); line.words.len()];
    }

    let gap = (max_width - line.words_width()) / (line.words.len() - 1) as f32;
    let mut x = Pt(0.);
    line.words
        .iter()
        .map(|word| {
            let offset = x;
            x += word.width + gap;
            offset
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is half the font size wide
    #[derive(Debug)]
    pub(crate) struct Mono;

    impl TextMeasure for Mono {
        fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError> {
            Ok(size * 0.5 * text.chars().count() as f32)
        }
    }

    /// Narrow letters and wide capitals, to catch code that assumes fixed widths
    #[derive(Debug)]
    pub(crate) struct Proportional;

    impl TextMeasure for Proportional {
        fn width_of_text(&self, text: &str, size: Pt) -> Result<Pt, FontError> {
            Ok(text
                .chars()
                .map(|ch| match ch {
                    'i' | 'l' | '.' | ',' | ' ' => size * 0.25,
                    'm' | 'w' => size * 0.8,
                    c if c.is_uppercase() => size * 0.7,
                    _ => size * 0.5,
                })
                .sum())
        }
    }

    fn normalized(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn lines_never_exceed_the_width() {
        let text = lipsum::lipsum(300);
        for max in [40.0, 90.0, 155.5, 300.0] {
            let lines = wrap_text(&Proportional, Pt(10.0), &text, Pt(max)).unwrap();
            for line in lines.iter() {
                let measured = Proportional.width_of_text(&line.text(), Pt(10.0)).unwrap();
                assert!(measured <= Pt(max), "{:?} is {measured} wide, max {max}", line.text());
                assert_eq!(measured, line.width);
            }
        }
    }

    #[test]
    fn wrapping_preserves_the_text() {
        let text = lipsum::lipsum(200);
        let lines = wrap_text(&Proportional, Pt(11.0), &text, Pt(180.0)).unwrap();
        let rejoined = lines.iter().map(Line::text).collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, normalized(&text));
        assert!(lines.len() > 5);
        assert!(lines.last().unwrap().ends_paragraph);
        assert!(lines.iter().rev().skip(1).all(|l| !l.ends_paragraph));
    }

    #[test]
    fn wrapping_is_greedy() {
        // every line is 10 wide per char at size 20
        let lines = wrap_text(&Mono, Pt(20.0), "aa bb cc dd", Pt(50.0)).unwrap();
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn hard_breaks_start_new_lines() {
        let lines = wrap_text(&Mono, Pt(10.0), "Großer Gott\n\nwir loben dich", Pt(500.0)).unwrap();
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["Großer Gott", "", "wir loben dich"]);
        assert!(lines.iter().all(|l| l.ends_paragraph));
    }

    #[test]
    fn long_words_are_split() {
        let lines = wrap_text(&Mono, Pt(10.0), "Donaudampfschifffahrt", Pt(30.0)).unwrap();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= Pt(30.0)));
        let rejoined: String = lines.iter().map(Line::text).collect();
        assert_eq!(rejoined, "Donaudampfschifffahrt");
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let text = lipsum::lipsum(120);
        let max = Pt(210.0);
        let lines = wrap_text(&Proportional, Pt(9.0), &text, max).unwrap();
        for line in lines.iter().filter(|l| !l.ends_paragraph && l.words.len() > 1) {
            let offsets = justify_offsets(line, max);
            let last = line.words.last().unwrap();
            let right_edge = *offsets.last().unwrap() + last.width;
            assert!((right_edge - max).abs() < Pt(1e-3), "line ends at {right_edge}");

            let gaps: Pt = offsets
                .windows(2)
                .zip(line.words.iter())
                .map(|(pair, word)| pair[1] - pair[0] - word.width)
                .sum();
            assert!((line.words_width() + gaps - max).abs() < Pt(1e-3));
        }
    }

    #[test]
    fn single_words_are_not_spread() {
        let line = wrap_text(&Mono, Pt(10.0), "Amen", Pt(100.0)).unwrap().remove(0);
        assert_eq!(justify_offsets(&line, Pt(100.0)), vec![Pt(0.0)]);
    }
}
