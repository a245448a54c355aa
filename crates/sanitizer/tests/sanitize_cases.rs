//! End-to-end sanitization cases: the security properties the surrounding
//! system depends on, plus an idempotence sweep.

use sanitizer::{Sanitizer, sanitize};

#[test]
fn script_tag_is_removed_but_its_text_survives() {
    assert_eq!(sanitize("<script>alert(1)</script>"), "alert(1)");
}

#[test]
fn event_handler_attributes_are_stripped() {
    assert_eq!(
        sanitize(r#"<img src="x.png" onerror="alert(1)">"#),
        r#"<img src="x.png" />"#
    );
}

#[test]
fn javascript_scheme_is_coerced_and_colon_escaped() {
    assert_eq!(
        sanitize("<a href='javascript:alert(1)'>x</a>"),
        r#"<a href="http&#58;//javascript&#58;alert(1)" target="_blank">x</a>"#
    );
}

#[test]
fn approved_schemes_pass_coercion_untouched() {
    assert_eq!(
        sanitize(r#"<a href="https://example.com/a?b=c">x</a>"#),
        r#"<a href="https&#58;//example.com/a?b=c" target="_blank">x</a>"#
    );
}

#[test]
fn unterminated_tag_is_auto_closed() {
    assert_eq!(sanitize("<b>bold"), "<b>bold</b>");
}

#[test]
fn dangling_close_tag_produces_nothing() {
    assert_eq!(sanitize("</b>"), "");
}

#[test]
fn style_expression_is_neutralized_in_place() {
    assert_eq!(
        sanitize(r#"<div style="width:expression(alert(1))">x</div>"#),
        r#"<div style="width&#58;_(alert(1))">x</div>"#
    );
}

#[test]
fn invalid_target_is_deleted_without_default() {
    assert_eq!(
        sanitize(r#"<a href="http://x" target="_parent">"#),
        r#"<a href="http&#58;//x"></a>"#
    );
}

#[test]
fn nested_wrappers_drop_while_content_flows() {
    assert_eq!(
        sanitize("<form><fieldset><b>keep</b></fieldset></form>"),
        "<b>keep</b>"
    );
}

#[test]
fn crafted_close_tags_cannot_break_nesting() {
    assert_eq!(
        sanitize("<div><b>x</i></em></b></div>"),
        "<div><b>x</b></div>"
    );
}

#[test]
fn mixed_profile_markup_round_trip() {
    // The original program's demo input, end to end.
    let raw = concat!(
        r#"<p><img src=1 onerror=alert(/xss/)></p>"#,
        r#"<div class="left"><a href='javascript:prompt(1)'><br />hehe</a></div>"#,
        r#"<p id="test" onmouseover="alert(1)">&gt;M<svg>"#,
        r#"<a href="https://www.baidu.com" target="self" >MM</a></p>"#,
    );
    let expected = concat!(
        r#"<p><img src="1" /></p>"#,
        r#"<div class="left"><a href="http&#58;//javascript&#58;prompt(1)" target="_blank">"#,
        r#"<br />hehe</a></div>"#,
        r#"<p>&gt;M<a href="https&#58;//www.baidu.com">MM</a></p>"#,
    );
    assert_eq!(sanitize(raw), expected);
}

#[test]
fn bare_disallowed_tag_with_junk_attributes_vanishes() {
    assert_eq!(sanitize("<html code>"), "");
}

#[test]
fn sanitize_is_idempotent_over_hostile_inputs() {
    let cases = [
        "",
        "plain text",
        "it's a <test> & so: on",
        "<script>alert(1)</script>",
        r#"<img src="x.png" onerror="alert(1)">"#,
        "<a href='javascript:alert(1)'>x</a>",
        "<b>bold",
        "</b>",
        r#"<div style="width:expression(alert(1))">x</div>"#,
        "<!-- comment --><p>text</p>",
        "<!-- unterminated",
        "<b class=\"x",
        "&amp; &bogus; &#39; &#x27; &#1234567;",
        "&",
        "1 < 2 << 3",
        "¡Hola <b>café</b> 😊",
        r#"<a href="&#106;avascript:alert(1)">x</a>"#,
        "<div><p><b>deep",
        "<b/>self-closed",
        r#"<table border="1"><tr><td style='a/*b*/c'>cell</td></tr></table>"#,
    ];
    let sanitizer = Sanitizer::new();
    for case in cases {
        let once = sanitizer.sanitize(case);
        let twice = sanitizer.sanitize(&once);
        assert_eq!(once, twice, "expected idempotence for input: {case:?}");
    }
}

// An anchor whose invalid `target` is deleted is the one output that is not
// a fixed point: the next pass re-adds the default `target="_blank"`, and
// from there on the output is stable.
#[test]
fn deleted_target_converges_on_second_pass() {
    let sanitizer = Sanitizer::new();
    let once = sanitizer.sanitize(r#"<a href="http://x" target="_parent">"#);
    assert_eq!(once, r#"<a href="http&#58;//x"></a>"#);
    let twice = sanitizer.sanitize(&once);
    assert_eq!(twice, r#"<a href="http&#58;//x" target="_blank"></a>"#);
    assert_eq!(sanitizer.sanitize(&twice), twice);
}

#[test]
fn one_sanitizer_serves_concurrent_callers() {
    let sanitizer = std::sync::Arc::new(Sanitizer::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sanitizer = sanitizer.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(sanitizer.sanitize("<b>bold"), "<b>bold</b>");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
}
