#![allow(missing_docs)]

use graphdump::DumpWriter;
use std::fmt::Write as _;

const NOTICE_5: &str = "\n... output truncated after 5 characters";

#[test]
fn test_budget_truncates_once() {
    let mut writer = DumpWriter::new().max_length(Some(5));
    writer.write_text("hello world");
    writer.write_text("more text");
    writer.newline();

    assert!(writer.is_truncated());
    assert_eq!(writer.written(), 5);
    assert_eq!(writer.into_string(), format!("hello{NOTICE_5}"));
}

#[test]
fn test_exact_budget_is_not_truncated() {
    let mut writer = DumpWriter::new().max_length(Some(5));
    writer.write_text("hello");

    assert!(!writer.is_truncated());
    assert_eq!(writer.as_str(), "hello");
}

#[test]
fn test_indentation_is_lazy() {
    let mut writer = DumpWriter::new();
    writer.write_text("a");
    writer.indent();
    writer.newline();
    writer.newline();
    writer.write_text("b");
    writer.indent();
    writer.newline();
    writer.write_text("c");

    assert_eq!(writer.level(), 2);
    assert_eq!(writer.into_string(), "a\n\n  b\n    c");
}

#[test]
fn test_unindent_saturates() {
    let mut writer = DumpWriter::new();
    writer.unindent();
    writer.unindent();
    writer.newline();
    writer.write_text("x");

    assert_eq!(writer.level(), 0);
    assert_eq!(writer.into_string(), "\nx");
}

#[test]
fn test_custom_indent_unit() {
    let mut writer = DumpWriter::new().indent_unit("\t");
    writer.indent();
    writer.newline();
    writer.write_text("x");

    assert_eq!(writer.into_string(), "\n\tx");
}

#[test]
fn test_indentation_counts_against_budget() {
    let mut writer = DumpWriter::new().max_length(Some(4));
    writer.indent();
    writer.newline();
    writer.write_text("abc");

    // newline + two indent characters + 'a'
    assert_eq!(writer.into_string(), "\n  a\n... output truncated after 4 characters");
}

#[test]
fn test_reset_allows_reuse_of_buffer() {
    let mut buffer = String::new();
    {
        let mut writer = DumpWriter::with_buffer(&mut buffer).max_length(Some(3));
        writer.write_text("abcdef");
        assert!(writer.is_truncated());

        writer.reset();
        assert!(!writer.is_truncated());
        assert_eq!(writer.written(), 0);
        writer.write_text("xy");
    }
    assert_eq!(
        buffer,
        "abc\n... output truncated after 3 characters".to_string() + "xy"
    );
}

#[test]
fn test_close_is_idempotent() {
    let mut writer = DumpWriter::new();
    writer.write_text("kept");
    writer.close();
    writer.close();
    writer.write_text("dropped");

    assert!(writer.is_closed());
    assert_eq!(writer.into_string(), "kept");
}

#[test]
fn test_wrapped_buffer_is_appended() {
    let mut buffer = String::from(">");
    {
        let mut writer = DumpWriter::with_buffer(&mut buffer);
        writer.write_text("a");
        writer.close();
    }
    assert_eq!(buffer, ">a");
}

#[test]
fn test_fmt_write_goes_through_budget() -> std::fmt::Result {
    let mut writer = DumpWriter::new().max_length(Some(5));
    write!(writer, "{}-{}-{}", 10, 20, 30)?;

    assert_eq!(writer.into_string(), format!("10-20{NOTICE_5}"));
    Ok(())
}
