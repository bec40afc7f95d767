// SPDX-License-Identifier: Apache-2.0 OR MIT
// Charset conversion for consoles that do not consume UTF-8

use encoding_rs::Encoding;
use std::borrow::Cow;

/// Converts flushed lines from the process text encoding (UTF-8) to the
/// console's charset.
///
/// Pure 7-bit text needs no conversion and takes a borrow-only fast
/// path. Any conversion failure falls back to the original bytes: some
/// output always beats a dropped line.
pub struct Transcoder {
    encoding: &'static Encoding,
}

impl Transcoder {
    /// Detect the console charset from the locale environment
    /// (`LC_ALL`, `LC_CTYPE`, `LANG`, in that order).
    ///
    /// Returns None when the console consumes UTF-8 directly and no
    /// conversion is ever needed.
    pub fn from_locale() -> Option<Transcoder> {
        let locale = locale_var("LC_ALL")
            .or_else(|| locale_var("LC_CTYPE"))
            .or_else(|| locale_var("LANG"))?;
        // "en_US.ISO-8859-1@euro" -> "ISO-8859-1"
        let codeset = locale.split('.').nth(1)?.split('@').next()?;
        Transcoder::for_label(codeset)
    }

    /// Build a transcoder for an explicit charset label
    pub fn for_label(label: &str) -> Option<Transcoder> {
        let encoding = Encoding::for_label(label.as_bytes())?;
        if encoding == encoding_rs::UTF_8 {
            return None;
        }
        Some(Transcoder { encoding })
    }

    /// Name of the target charset
    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }

    /// Convert one line to the console charset.
    ///
    /// Returns the input unchanged when it is 7-bit clean or when any
    /// character cannot be represented in the target charset.
    pub fn transcode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        if text.is_ascii() {
            return Cow::Borrowed(text.as_bytes());
        }
        let (converted, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Cow::Borrowed(text.as_bytes());
        }
        converted
    }
}

fn locale_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_console_needs_no_transcoder() {
        assert!(Transcoder::for_label("utf-8").is_none());
        assert!(Transcoder::for_label("UTF-8").is_none());
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(Transcoder::for_label("no-such-charset").is_none());
    }

    #[test]
    fn test_ascii_fast_path_borrows() {
        let transcoder = Transcoder::for_label("windows-1252").unwrap();
        let result = transcoder.transcode("plain ascii line");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, b"plain ascii line");
    }

    #[test]
    fn test_latin1_conversion() {
        let transcoder = Transcoder::for_label("windows-1252").unwrap();
        let result = transcoder.transcode("caf\u{e9}");
        assert_eq!(&*result, b"caf\xe9");
    }

    #[test]
    fn test_unrepresentable_falls_back_to_original() {
        let transcoder = Transcoder::for_label("windows-1252").unwrap();
        let input = "snowman \u{2603}";
        let result = transcoder.transcode(input);
        assert_eq!(&*result, input.as_bytes());
    }

    #[test]
    fn test_charset_name() {
        let transcoder = Transcoder::for_label("iso-8859-1").unwrap();
        assert_eq!(transcoder.charset(), "windows-1252");
    }
}
