// Block-level end-to-end checks against rendered HTML

use skald_core::convert;

#[test]
fn test_atx_heading_renders() {
    assert_eq!(convert("# Hello\n"), "<h1>Hello</h1>\n");
    assert_eq!(convert("###### deep\n"), "<h6>deep</h6>\n");
}

#[test]
fn test_empty_atx_heading() {
    assert_eq!(convert("#\n"), "<h1></h1>\n");
}

#[test]
fn test_three_spaces_is_block_four_is_code() {
    assert_eq!(convert("   # heading\n"), "<h1>heading</h1>\n");
    assert_eq!(
        convert("    # literal\n"),
        "<pre><code># literal\n</code></pre>\n"
    );
}

#[test]
fn test_setext_heading() {
    assert_eq!(convert("Foo\n===\n"), "<h1>Foo</h1>\n");
    assert_eq!(convert("Foo\nbar\n---\n"), "<h2>Foo\nbar</h2>\n");
}

#[test]
fn test_thematic_break() {
    assert_eq!(convert("***\n"), "<hr />\n");
    assert_eq!(convert("- - -\n"), "<hr />\n");
}

#[test]
fn test_fenced_code_with_language() {
    assert_eq!(
        convert("```rust\nfn main() {}\n```\n"),
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn test_fenced_code_closes_at_eof() {
    assert_eq!(
        convert("```\ndangling\n"),
        "<pre><code>dangling\n</code></pre>\n"
    );
}

#[test]
fn test_fenced_code_content_is_escaped_not_parsed() {
    assert_eq!(
        convert("```\n*<em>*\n```\n"),
        "<pre><code>*&lt;em&gt;*\n</code></pre>\n"
    );
}

#[test]
fn test_indented_code_merges_blank_lines() {
    assert_eq!(
        convert("    one\n\n    two\n"),
        "<pre><code>one\n\ntwo\n</code></pre>\n"
    );
}

#[test]
fn test_quote_with_nested_list_and_fence() {
    let input = "> 1. Item 1\n>    ```\n>       indented\n>    ```\n";
    assert_eq!(
        convert(input),
        "<blockquote>\n<ol>\n<li>\nItem 1<pre><code>   indented\n</code></pre>\n</li>\n</ol>\n</blockquote>\n"
    );
}

#[test]
fn test_quote_lazy_continuation() {
    // CommonMark example 233
    assert_eq!(
        convert("> bar\nbaz\n"),
        "<blockquote>\n<p>bar\nbaz</p>\n</blockquote>\n"
    );
}

#[test]
fn test_lazy_underline_breaks_out_of_quote() {
    // CommonMark example 93
    assert_eq!(
        convert("> Foo\n---\n"),
        "<blockquote>\n<p>Foo</p>\n</blockquote>\n<hr />\n"
    );
}

#[test]
fn test_html_block_passthrough() {
    let input = "<div>\n*not emphasis*\n</div>\n";
    assert_eq!(convert(input), "<div>\n*not emphasis*\n</div>\n");
}

#[test]
fn test_html_comment_block() {
    assert_eq!(convert("<!-- note -->\n"), "<!-- note -->\n");
}

#[test]
fn test_html_block_ends_at_blank_line() {
    let input = "<div>\ninside\n\noutside\n";
    assert_eq!(convert(input), "<div>\ninside\n<p>outside</p>\n");
}

#[test]
fn test_paragraph_continuation_does_not_open_code() {
    // CommonMark example 113: indented lines continue the paragraph
    assert_eq!(convert("foo\n    bar\n"), "<p>foo\nbar</p>\n");
}

#[test]
fn test_crlf_input_parses_identically() {
    assert_eq!(
        skald_core::parse("a\r\nb\r\n"),
        skald_core::parse("a\nb\n")
    );
}

#[test]
fn test_trivial_text_round_trip() {
    // plain ascii without metacharacters passes through escaped only
    let text = "just words and numbers 123";
    assert_eq!(
        convert(&format!("{text}\n")),
        format!("<p>{text}</p>\n")
    );
}
