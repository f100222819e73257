//! Writes translator events to the terminal.

use std::io::{self, Write};
use tl_core::TranslateEvent;
use tl_types::{TextKind, Usage};

use crate::spinner::Spinner;

/// Streams translation text to `out` and diagnostics to `diag`.
///
/// The first write error is kept and reported by [`Renderer::finish`];
/// later events are then ignored.
pub struct Renderer<O: Write, D: Write> {
    out: O,
    diag: D,
    verbose: bool,
    text: String,
    spinner: Option<Spinner>,
    line_open: bool,
    usage: Usage,
    error: Option<io::Error>,
}

impl<O: Write, D: Write> Renderer<O, D> {
    pub fn new(out: O, diag: D, verbose: bool) -> Self {
        Self {
            out,
            diag,
            verbose,
            text: String::new(),
            spinner: None,
            line_open: false,
            usage: Usage::default(),
            error: None,
        }
    }

    /// Prepare for the next text.
    pub fn begin(&mut self, text: &str, spinner: Option<Spinner>) {
        self.text = text.to_string();
        self.spinner = spinner;
        self.line_open = false;
    }

    pub fn handle(&mut self, event: TranslateEvent) {
        if self.error.is_some() {
            return;
        }
        let result = match event {
            TranslateEvent::Classified { kind } => self.classified(kind),
            TranslateEvent::TextDelta(delta) => {
                self.stop_spinner();
                self.line_open = !delta.ends_with('\n');
                self.out
                    .write_all(delta.as_bytes())
                    .and_then(|()| self.out.flush())
            }
            TranslateEvent::Usage(usage) => {
                self.usage.add(&usage);
                Ok(())
            }
            TranslateEvent::Done => {
                self.stop_spinner();
                self.line_open = false;
                writeln!(self.out).and_then(|()| self.out.flush())
            }
        };
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    /// End the current text: clear the spinner, close an unfinished line
    /// and surface any write error.
    pub fn finish(&mut self) -> io::Result<()> {
        self.stop_spinner();
        if let Some(e) = self.error.take() {
            self.line_open = false;
            return Err(e);
        }
        if self.line_open {
            self.line_open = false;
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Token usage across every text rendered so far.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    fn classified(&mut self, kind: TextKind) -> io::Result<()> {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(&format!("翻译中 ({kind})..."));
        }
        if !self.verbose {
            return Ok(());
        }
        let banner = analysis_banner(&self.text, kind);
        let diag = &mut self.diag;
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| diag.write_all(banner.as_bytes())),
            None => diag.write_all(banner.as_bytes()),
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }
}

/// The `--verbose` summary printed once a text has been classified.
pub fn analysis_banner(text: &str, kind: TextKind) -> String {
    format!("=== 文本分析 ===\n输入: {text:?}\n类型: {kind}\n==============\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(verbose: bool) -> Renderer<Vec<u8>, Vec<u8>> {
        Renderer::new(Vec::new(), Vec::new(), verbose)
    }

    fn usage(total: u64) -> Usage {
        Usage {
            prompt_tokens: total / 2,
            completion_tokens: total - total / 2,
            total_tokens: total,
        }
    }

    #[test]
    fn deltas_then_newline() {
        let mut r = renderer(false);
        r.begin("apple", None);
        r.handle(TranslateEvent::Classified {
            kind: TextKind::Word,
        });
        r.handle(TranslateEvent::TextDelta("苹果".into()));
        r.handle(TranslateEvent::TextDelta("  /ˈæp.əl/".into()));
        r.handle(TranslateEvent::Done);
        r.finish().unwrap();

        assert_eq!(String::from_utf8(r.out.clone()).unwrap(), "苹果  /ˈæp.əl/\n");
        assert!(r.diag.is_empty(), "quiet mode prints no banner");
    }

    #[test]
    fn verbose_banner_goes_to_diag() {
        let mut r = renderer(true);
        r.begin("break the ice", None);
        r.handle(TranslateEvent::Classified {
            kind: TextKind::Phrase,
        });

        assert_eq!(
            String::from_utf8(r.diag.clone()).unwrap(),
            "=== 文本分析 ===\n输入: \"break the ice\"\n类型: PHRASE\n==============\n"
        );
        assert!(r.out.is_empty());
    }

    #[test]
    fn interrupted_text_gets_closing_newline() {
        let mut r = renderer(false);
        r.begin("apple", None);
        r.handle(TranslateEvent::TextDelta("苹果".into()));
        r.finish().unwrap();
        r.finish().unwrap();

        assert_eq!(String::from_utf8(r.out.clone()).unwrap(), "苹果\n");
    }

    #[test]
    fn usage_accumulates_across_texts() {
        let mut r = renderer(false);
        r.begin("one", None);
        r.handle(TranslateEvent::Usage(usage(10)));
        r.handle(TranslateEvent::Done);
        r.begin("two", None);
        r.handle(TranslateEvent::Usage(usage(5)));
        r.handle(TranslateEvent::Done);

        assert_eq!(r.usage().total_tokens, 15);
        assert_eq!(String::from_utf8(r.out.clone()).unwrap(), "\n\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn first_write_error_is_reported() {
        let mut r = Renderer::new(BrokenPipe, Vec::new(), false);
        r.begin("apple", None);
        r.handle(TranslateEvent::TextDelta("苹果".into()));
        r.handle(TranslateEvent::Done);

        let err = r.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        r.finish().unwrap();
    }

    #[tokio::test]
    async fn first_delta_stops_spinner() {
        let mut r = renderer(false);
        r.begin("apple", Some(Spinner::start("分析中...")));
        r.handle(TranslateEvent::Classified {
            kind: TextKind::Word,
        });
        assert!(r.spinner.is_some());
        r.handle(TranslateEvent::TextDelta("苹果".into()));
        assert!(r.spinner.is_none());
        r.finish().unwrap();
    }
}
