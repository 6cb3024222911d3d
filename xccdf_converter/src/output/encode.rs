use super::OutputError;
use encoding_rs::{EncoderResult, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};

/// Target byte encoding for rendered JSON
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputEncoding {
    /// Any encoding `encoding_rs` can encode into
    Whatwg(&'static Encoding),
    Utf16Le { bom: bool },
    Utf16Be,
}

impl OutputEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            OutputEncoding::Whatwg(encoding) => encoding.name(),
            OutputEncoding::Utf16Le { .. } => UTF_16LE.name(),
            OutputEncoding::Utf16Be => UTF_16BE.name(),
        }
    }
}

/// Resolve an encoding label; bare `utf-16` means little-endian with a BOM
pub fn resolve_encoding(label: &str) -> Result<OutputEncoding, OutputError> {
    let trimmed = label.trim();
    if trimmed.eq_ignore_ascii_case("utf-16") || trimmed.eq_ignore_ascii_case("utf16") {
        return Ok(OutputEncoding::Utf16Le { bom: true });
    }

    let unsupported = || OutputError::UnsupportedEncoding {
        label: label.to_string(),
    };
    let encoding = Encoding::for_label(trimmed.as_bytes()).ok_or_else(unsupported)?;

    if encoding == UTF_16LE {
        Ok(OutputEncoding::Utf16Le { bom: false })
    } else if encoding == UTF_16BE {
        Ok(OutputEncoding::Utf16Be)
    } else if encoding == REPLACEMENT || encoding.output_encoding() != encoding {
        Err(unsupported())
    } else {
        Ok(OutputEncoding::Whatwg(encoding))
    }
}

/// Encode text with the encoding named by `label`
pub fn encode_text(text: &str, label: &str) -> Result<Vec<u8>, OutputError> {
    match resolve_encoding(label)? {
        OutputEncoding::Whatwg(encoding) if encoding == UTF_8 => Ok(text.as_bytes().to_vec()),
        OutputEncoding::Whatwg(encoding) => encode_whatwg(text, encoding),
        OutputEncoding::Utf16Le { bom } => {
            let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
            if bom {
                bytes.extend_from_slice(&[0xFF, 0xFE]);
            }
            bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            Ok(bytes)
        }
        OutputEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
    }
}

fn encode_whatwg(mut text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, OutputError> {
    if Encoding::ascii_valid_up_to(text.as_bytes()) == text.len() && encoding.is_ascii_compatible() {
        return Ok(text.as_bytes().to_vec());
    }

    let mut encoder = encoding.new_encoder();
    let mut output = Vec::with_capacity(text.len());
    loop {
        if let Some(needed) = encoder.max_buffer_length_from_utf8_without_replacement(text.len()) {
            output.reserve(needed);
        }
        match encoder.encode_from_utf8_to_vec_without_replacement(text, &mut output, true) {
            (EncoderResult::InputEmpty, _) => return Ok(output),
            (EncoderResult::OutputFull, consumed) => text = &text[consumed..],
            (EncoderResult::Unmappable(character), _) => {
                return Err(OutputError::UnmappableCharacter {
                    character,
                    encoding: encoding.name().to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_utf8_is_identity() {
        assert_eq!(encode_text("h\u{e9}", "UTF-8").unwrap(), "h\u{e9}".as_bytes());
    }

    #[test]
    fn test_latin1_label() {
        assert_eq!(encode_text("caf\u{e9}", "latin1").unwrap(), b"caf\xe9");
        assert_eq!(resolve_encoding("latin1").unwrap().name(), "windows-1252");
    }

    #[test]
    fn test_unmappable_character() {
        assert_matches!(
            encode_text("\u{4e2d}", "windows-1252"),
            Err(OutputError::UnmappableCharacter { character: '\u{4e2d}', .. })
        );
    }

    #[test]
    fn test_unknown_and_decode_only_labels() {
        assert_matches!(
            resolve_encoding("klingon"),
            Err(OutputError::UnsupportedEncoding { .. })
        );
        assert_matches!(
            resolve_encoding("iso-2022-kr"),
            Err(OutputError::UnsupportedEncoding { .. })
        );
    }

    #[test]
    fn test_utf16_variants() {
        assert_eq!(encode_text("A", "utf-16le").unwrap(), vec![0x41, 0x00]);
        assert_eq!(encode_text("A", "utf-16be").unwrap(), vec![0x00, 0x41]);
        assert_eq!(encode_text("A", "utf-16").unwrap(), vec![0xFF, 0xFE, 0x41, 0x00]);
    }

    #[test]
    fn test_shift_jis() {
        assert_eq!(encode_text("\u{3042}", "shift_jis").unwrap(), vec![0x82, 0xA0]);
    }
}
