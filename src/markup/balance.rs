//! Cross-line tag balancing.
//!
//! yWriter markup lets a formatting tag opened on one line run on into the
//! following lines; ODT spans cannot cross paragraph boundaries. Balancing
//! rewrites every line so each recognized tag is opened and closed on the
//! same line, inserting synthetic brackets where formatting continues.
//!
//! Per tag, with an `is_open` flag carried from line to line:
//!
//! 1. If the tag is open and the line does not begin with its opening
//!    bracket, the opening bracket is prefixed. The flag is cleared.
//! 2. While the line has more opening than closing brackets, a closing
//!    bracket is appended and the flag is set.
//! 3. While the line has more closing than opening brackets, an opening
//!    bracket is prefixed.
//! 4. Adjacent `[x][/x]` pairs are removed.
//!
//! Tags are processed in a fixed order: declared languages, then `i`, then
//! `b`. A block quotation marker (`> `) stays in front of any prefixed
//! bracket.
//!
//! Every step either leaves the line unchanged or moves its bracket counts
//! closer together, so balancing terminates. A balanced line is left alone,
//! so balancing twice gives the same result as balancing once.

use memchr::memmem;
use smallvec::{SmallVec, smallvec};
use std::ops::Range;

/// Marker of a block quotation line
pub const QUOTE_MARKER: &str = "> ";

/// One recognized bracket tag pair, e.g. `[i]`/`[/i]` or `[lang=fr]`/`[/lang=fr]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTag {
    /// Tag name as written inside the brackets
    pub name: String,
    pub opening: String,
    pub closing: String,
}

impl BracketTag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            opening: format!("[{}]", name),
            closing: format!("[/{}]", name),
            name,
        }
    }

    /// Language tag for a declared language code.
    pub fn language(code: &str) -> Self {
        Self::new(format!("lang={}", code))
    }
}

/// Recognized tags in balancing order.
pub fn recognized_tags<S: AsRef<str>>(languages: &[S]) -> Vec<BracketTag> {
    languages
        .iter()
        .map(|code| BracketTag::language(code.as_ref()))
        .chain([BracketTag::new("i"), BracketTag::new("b")])
        .collect()
}

/// Continuation state of one tag on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagState {
    /// Index into the recognized tag list
    pub tag: usize,
    /// The tag was carried over from the previous line
    pub open_at_start: bool,
    /// The tag continues onto the next line
    pub open_at_end: bool,
}

/// A balanced logical line and the tags it carries across its boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRun {
    pub text: String,
    /// Tags continuing into or out of this line; unaffected tags are omitted
    pub carried: SmallVec<[TagState; 2]>,
}

impl MarkupRun {
    /// Whether this run is a block quotation line
    pub fn is_quotation(&self) -> bool {
        self.text.starts_with(QUOTE_MARKER)
    }
}

/// Start and end markers of an inline comment
pub const COMMENT_START: &str = "/*";
pub const COMMENT_END: &str = "*/";

/// Byte ranges of the paired `/* ... */` comments in a line, markers
/// included. An unpaired start marker is not a comment.
pub fn comment_ranges(line: &str) -> SmallVec<[Range<usize>; 2]> {
    let mut ranges = SmallVec::new();
    let mut cursor = 0;
    while let Some(start) = memmem::find(&line.as_bytes()[cursor..], COMMENT_START.as_bytes()) {
        let body = cursor + start + COMMENT_START.len();
        let Some(len) = memmem::find(&line.as_bytes()[body..], COMMENT_END.as_bytes()) else {
            break;
        };
        let end = body + len + COMMENT_END.len();
        ranges.push(cursor + start..end);
        cursor = end;
    }
    ranges
}

/// Segments of `line` outside comments, in order.
fn markup_segments(line: &str) -> impl Iterator<Item = &str> {
    let ranges = comment_ranges(line);
    let mut starts: SmallVec<[usize; 3]> = smallvec![0];
    let mut ends: SmallVec<[usize; 3]> = SmallVec::new();
    for range in &ranges {
        ends.push(range.start);
        starts.push(range.end);
    }
    ends.push(line.len());
    starts.into_iter().zip(ends).map(move |(start, end)| &line[start..end])
}

/// Occurrences of `needle` outside comments.
fn count(line: &str, needle: &str) -> usize {
    markup_segments(line)
        .map(|segment| memmem::find_iter(segment.as_bytes(), needle.as_bytes()).count())
        .sum()
}

/// Remove every `pattern` outside comments. Returns whether anything changed.
fn remove_outside_comments(line: &mut String, pattern: &str) -> bool {
    if count(line, pattern) == 0 {
        return false;
    }
    let ranges = comment_ranges(line);
    let mut rebuilt = String::with_capacity(line.len());
    let mut cursor = 0;
    for range in ranges {
        rebuilt.push_str(&line[cursor..range.start].replace(pattern, ""));
        rebuilt.push_str(&line[range.clone()]);
        cursor = range.end;
    }
    rebuilt.push_str(&line[cursor..].replace(pattern, ""));
    *line = rebuilt;
    true
}

/// Byte offset where prefixed brackets go: after a quote marker, if any.
fn insertion_point(line: &str) -> usize {
    if line.starts_with(QUOTE_MARKER) {
        QUOTE_MARKER.len()
    } else {
        0
    }
}

/// Remove adjacent open+close pairs until none is left.
fn collapse_empty_pairs(line: &mut String, tags: &[BracketTag]) {
    loop {
        let mut changed = false;
        for tag in tags {
            let pair = format!("{}{}", tag.opening, tag.closing);
            changed |= remove_outside_comments(line, &pair);
        }
        if !changed {
            break;
        }
    }
}

/// Balance one tag on one line, returning the new `is_open` flag.
///
/// Brackets inside `/* ... */` comments are comment text and are not
/// counted.
fn balance_tag(line: &mut String, tag: &BracketTag, was_open: bool) -> bool {
    let mut is_open = false;
    let at = insertion_point(line);

    if was_open && !line[at..].starts_with(&tag.opening) {
        line.insert_str(at, &tag.opening);
    }

    let mut opens = count(line, &tag.opening);
    let mut closes = count(line, &tag.closing);
    while opens > closes {
        line.push_str(&tag.closing);
        closes += 1;
        is_open = true;
    }
    while closes > opens {
        line.insert_str(at, &tag.opening);
        opens += 1;
    }

    let pair = format!("{}{}", tag.opening, tag.closing);
    while remove_outside_comments(line, &pair) {}
    is_open
}

/// Balance `text` line by line for the given tags.
///
/// Line endings are normalized to `\n`; one run is returned per line.
pub fn balance_lines(text: &str, tags: &[BracketTag]) -> Vec<MarkupRun> {
    let mut is_open = vec![false; tags.len()];
    let mut runs = Vec::new();

    for source in text.split('\n') {
        let mut line = source.strip_suffix('\r').unwrap_or(source).to_string();
        let mut carried = SmallVec::new();

        for (index, tag) in tags.iter().enumerate() {
            let was_open = is_open[index];
            is_open[index] = balance_tag(&mut line, tag, was_open);
            if was_open || is_open[index] {
                carried.push(TagState {
                    tag: index,
                    open_at_start: was_open,
                    open_at_end: is_open[index],
                });
            }
        }
        // Removing one tag's empty pair can expose another's
        collapse_empty_pairs(&mut line, tags);

        runs.push(MarkupRun { text: line, carried });
    }
    runs
}

/// Balance `text` and join the lines back together.
pub fn balance(text: &str, tags: &[BracketTag]) -> String {
    balance_lines(text, tags)
        .into_iter()
        .map(|run| run.text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn default_tags() -> Vec<BracketTag> {
        recognized_tags(&["fr"])
    }

    #[test]
    fn test_tag_order() {
        let names: Vec<_> = recognized_tags(&["de-CH", "fr"])
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["lang=de-CH", "lang=fr", "i", "b"]);
    }

    #[test]
    fn test_bold_continues_across_lines() {
        let runs = balance_lines("plain [b]bold\ncontinues[/b] plain", &default_tags());
        assert_eq!(runs[0].text, "plain [b]bold[/b]");
        assert_eq!(runs[1].text, "[b]continues[/b] plain");

        assert_eq!(runs[0].carried.len(), 1);
        assert_eq!(runs[0].carried[0].tag, 2);
        assert!(runs[0].carried[0].open_at_end);
        assert!(!runs[0].carried[0].open_at_start);
        assert!(runs[1].carried[0].open_at_start);
        assert!(!runs[1].carried[0].open_at_end);
    }

    #[test]
    fn test_formatting_spans_several_lines() {
        let out = balance("[i]one\ntwo\nthree[/i]", &default_tags());
        assert_eq!(out, "[i]one[/i]\n[i]two[/i]\n[i]three[/i]");
    }

    #[test]
    fn test_close_without_open_gets_opening() {
        assert_eq!(balance("text[/i] more", &default_tags()), "[i]text[/i] more");
    }

    #[test]
    fn test_line_already_reopening_is_not_prefixed_twice() {
        let out = balance("[i]one\n[i]two[/i]", &default_tags());
        assert_eq!(out, "[i]one[/i]\n[i]two[/i]");
    }

    #[test]
    fn test_blank_line_carries_formatting() {
        let runs = balance_lines("[i]one\n\ntwo[/i]", &default_tags());
        assert_eq!(runs[0].text, "[i]one[/i]");
        assert_eq!(runs[1].text, "");
        assert_eq!(runs[2].text, "[i]two[/i]");
    }

    #[test]
    fn test_empty_pairs_collapse_across_tags() {
        assert_eq!(balance("a[i][b][/b][/i]b", &default_tags()), "ab");
        assert_eq!(balance("[i][i][/i][/i]", &default_tags()), "");
    }

    #[test]
    fn test_language_tags() {
        let out = balance("Er sagte [lang=fr]bonjour\net au revoir[/lang=fr].", &default_tags());
        assert_eq!(out, "Er sagte [lang=fr]bonjour[/lang=fr]\n[lang=fr]et au revoir[/lang=fr].");
    }

    #[test]
    fn test_undeclared_language_is_ignored() {
        let out = balance("[lang=es]hola\nadios", &default_tags());
        assert_eq!(out, "[lang=es]hola\nadios");
    }

    #[test]
    fn test_quote_marker_stays_first() {
        let runs = balance_lines("[i]said\n> quoted[/i]", &default_tags());
        assert_eq!(runs[1].text, "> [i]quoted[/i]");
        assert!(runs[1].is_quotation());
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(balance("[b]a\r\nb[/b]", &default_tags()), "[b]a[/b]\n[b]b[/b]");
    }

    #[test]
    fn test_tags_inside_comments_are_not_counted() {
        let runs = balance_lines("Note /* fix [b] here */ done\nnext line", &default_tags());
        assert_eq!(runs[0].text, "Note /* fix [b] here */ done");
        assert_eq!(runs[1].text, "next line");
        assert!(runs.iter().all(|run| run.carried.is_empty()));
    }

    #[test]
    fn test_comment_does_not_hide_real_tags() {
        let out = balance("[i]a /* [/i] */ b\nc[/i]", &default_tags());
        assert_eq!(out, "[i]a /* [/i] */ b[/i]\n[i]c[/i]");
        assert_eq!(balance("x /* [i][/i] */", &default_tags()), "x /* [i][/i] */");
    }

    #[test]
    fn test_comment_ranges() {
        let line = "a /* b */ c /* d";
        let ranges = comment_ranges(line);
        assert_eq!(ranges.len(), 1);
        assert_eq!(&line[ranges[0].clone()], "/* b */");
        assert!(comment_ranges("no comment */ here").is_empty());
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let text = "Nothing to see here.\n\nStill nothing [x] of note.";
        assert_eq!(balance(text, &default_tags()), text);
    }

    fn markup_strategy() -> impl Strategy<Value = String> {
        let token = prop_oneof![
            Just("a"),
            Just(" "),
            Just("[i]"),
            Just("[/i]"),
            Just("[b]"),
            Just("[/b]"),
            Just("[lang=fr]"),
            Just("[/lang=fr]"),
            Just("> "),
            Just("\n"),
        ];
        prop::collection::vec(token, 0..40).prop_map(|tokens| tokens.concat())
    }

    proptest! {
        #[test]
        fn balancing_is_idempotent(text in markup_strategy()) {
            let tags = default_tags();
            let once = balance(&text, &tags);
            prop_assert_eq!(balance(&once, &tags), once);
        }

        #[test]
        fn every_line_is_balanced(text in markup_strategy()) {
            let tags = default_tags();
            for run in balance_lines(&text, &tags) {
                for tag in &tags {
                    prop_assert_eq!(count(&run.text, &tag.opening), count(&run.text, &tag.closing));
                }
            }
        }

        #[test]
        fn line_count_is_preserved(text in markup_strategy()) {
            prop_assert_eq!(balance_lines(&text, &default_tags()).len(), text.split('\n').count());
        }
    }
}
