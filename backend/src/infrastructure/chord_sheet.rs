use songbook_core::domain::{tokenize, TokenKind};

/// Renders chord-annotated lyrics as a chord sheet: each line that carries
/// chords is preceded by a line with the chord names aligned above the text.
///
/// Chords that would collide with the previous one push the lyric text to the
/// right so that at least one space separates them.
pub fn render(lyrics: &str) -> String {
  lyrics.split('\n').map(render_line).collect::<Vec<_>>().join("\n")
}

fn render_line(line: &str) -> String {
  let line = line.strip_suffix('\r').unwrap_or(line);
  let mut chords = String::new();
  let mut text = String::new();

  for token in tokenize(line) {
    match token.kind {
      TokenKind::Text => text.push_str(token.value),
      TokenKind::Chord => {
        let name = token.chord_name().unwrap_or_default();
        let chords_width = chords.chars().count();
        let min_col = if chords.is_empty() { 0 } else { chords_width + 1 };

        let mut col = text.chars().count();
        if col < min_col {
          pad_to(&mut text, min_col);
          col = min_col;
        }
        pad_to(&mut chords, col);
        chords.push_str(name);
      }
    }
  }

  let text = text.trim_end();
  match (chords.is_empty(), text.is_empty()) {
    (true, _) => text.to_string(),
    (false, true) => chords,
    (false, false) => format!("{chords}\n{text}"),
  }
}

fn pad_to(s: &mut String, width: usize) {
  let current = s.chars().count();
  if current < width {
    s.extend(std::iter::repeat(' ').take(width - current));
  }
}
