//! Representation of the program text as read, and the clean-up applied to
//! each line before it is classified.
use super::rx::WHITESPACE;
use super::types::LineNumber;

/// Everything from this marker to the end of the line is a comment.
pub(crate) const COMMENT_MARKER: &str = "//";

/// Remove the comment (if any) from `line`, and all whitespace
/// wherever it occurs.  Blank and comment-only lines normalise to the
/// empty string.
#[must_use]
pub fn normalise(line: &str) -> String {
    let code: &str = match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    };
    WHITESPACE.replace_all(code, "").into_owned()
}

/// One line of the program, as it appears in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'s> {
    pub number: LineNumber,
    pub text: &'s str,
}

#[derive(Debug)]
pub struct Source<'s> {
    body: &'s str,
}

impl<'s> Source<'s> {
    #[must_use]
    pub fn new(body: &'s str) -> Source<'s> {
        Source { body }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.body
    }

    /// The lines of the program, numbered from 1.
    pub fn lines(&self) -> impl Iterator<Item = SourceLine<'s>> + 's {
        let body: &'s str = self.body;
        body.lines()
            .enumerate()
            .map(|(n, text)| SourceLine { number: n + 1, text })
    }
}

#[test]
fn test_normalise() {
    assert_eq!(normalise("  D = D + 1  "), "D=D+1");
    assert_eq!(normalise("@i // the loop counter"), "@i");
    assert_eq!(normalise("\t0 ; JMP\r"), "0;JMP");
    assert_eq!(normalise("// comment only"), "");
    assert_eq!(normalise("   "), "");
    assert_eq!(normalise(""), "");
    // Only the first comment marker matters.
    assert_eq!(normalise("M=1 // i = 1 // again"), "M=1");
    // A single slash does not start a comment.
    assert_eq!(normalise("D=D/A"), "D=D/A");
}

#[test]
fn test_lines_are_numbered_from_one() {
    let source = Source::new("@1\n\n// x\r\nD=A\n");
    let lines: Vec<(usize, &str)> = source.lines().map(|l| (l.number, l.text)).collect();
    assert_eq!(lines, vec![(1, "@1"), (2, ""), (3, "// x"), (4, "D=A")]);
}
