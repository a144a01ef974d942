#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::ErrorCode;
use bind_ir::Span;

fn sample() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2004)
        .with_message("no member `nme` on `Person`")
        .with_label(Span::new(7, 10), "unknown member")
        .with_secondary_label(Span::new(0, 6), "receiver has type `Person`")
        .with_note("members are looked up by property convention")
        .with_suggestion("did you mean `name`?")
}

#[test]
fn test_plain_rendering() {
    let source = "person.nme + 1";
    let mut out = Vec::new();
    {
        let mut emitter = TerminalEmitter::new(&mut out, source, ColorMode::Never, false);
        emitter.emit(&sample());
        emitter.flush();
    }
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("error[E2004]: no member `nme` on `Person`\n"));
    assert!(text.contains("--> 1:8: unknown member"));
    assert!(text.contains("1 | person.nme + 1"));
    assert!(text.contains("  |        ^^^"));
    assert!(text.contains("::: 1:1: receiver has type `Person`"));
    assert!(text.contains("  | ------"));
    assert!(text.contains("= note: members are looked up"));
    assert!(text.contains("= help: did you mean `name`?"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn test_colored_rendering() {
    let mut out = Vec::new();
    {
        let mut emitter = TerminalEmitter::new(&mut out, "person.nme", ColorMode::Auto, true);
        emitter.emit_all(&[sample()]);
    }
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\x1b[1;31merror\x1b[0m"));
}
