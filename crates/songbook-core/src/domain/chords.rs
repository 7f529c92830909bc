use serde::Serialize;

/// Tipo de fragmento dentro de una letra anotada con acordes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  /// Un acorde entre corchetes, p. ej. `[Am7]`.
  Chord,
  /// Texto de la letra entre acordes.
  Text,
}

/// Fragmento de letra. `value` apunta a la letra original, con los corchetes
/// incluidos en los acordes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
  pub kind: TokenKind,
  pub value: &'a str,
}

impl<'a> Token<'a> {
  pub fn is_chord(&self) -> bool {
    self.kind == TokenKind::Chord
  }

  /// Nombre del acorde sin corchetes; `None` para fragmentos de texto.
  pub fn chord_name(&self) -> Option<&'a str> {
    match self.kind {
      TokenKind::Chord => Some(&self.value[1..self.value.len() - 1]),
      TokenKind::Text => None,
    }
  }
}

/// Parte una letra en acordes y texto, conservando el orden.
///
/// Un acorde es un `[` seguido de al menos un carácter distinto de `]` y del
/// primer `]` que aparezca; no hay anidamiento ni escapes. `[]` no es un
/// acorde y queda como texto. Nunca se emiten fragmentos vacíos, y la
/// concatenación de todos los `value` reproduce la entrada byte a byte.
pub fn tokenize(lyrics: &str) -> Vec<Token<'_>> {
  let mut tokens = Vec::new();
  let mut text_start = 0;
  let mut cursor = 0;

  while let Some(offset) = lyrics[cursor..].find('[') {
    let open = cursor + offset;

    // Sin `]` posterior ya no puede haber más acordes.
    let Some(close_offset) = lyrics[open + 1..].find(']') else {
      break;
    };
    let close = open + 1 + close_offset;

    if close == open + 1 {
      cursor = open + 1;
      continue;
    }

    if open > text_start {
      tokens.push(Token { kind: TokenKind::Text, value: &lyrics[text_start..open] });
    }
    tokens.push(Token { kind: TokenKind::Chord, value: &lyrics[open..=close] });

    text_start = close + 1;
    cursor = text_start;
  }

  if text_start < lyrics.len() {
    tokens.push(Token { kind: TokenKind::Text, value: &lyrics[text_start..] });
  }

  tokens
}
