use commented_properties::{CommentedProperties, Error, EscapeError, LineEnding, PropertiesOptions};

fn load(input: &str) -> CommentedProperties {
    input.parse().unwrap()
}

fn lf() -> CommentedProperties {
    CommentedProperties::with_options(PropertiesOptions::new().with_line_ending(LineEnding::Lf))
}

/// Loads `input` into a `\n`-terminated strict document and saves it again.
fn convert(input: &str) -> String {
    let mut props = lf();
    props.load_str(input).unwrap();
    props.to_string()
}

fn saved_line(key: &str, value: &str) -> String {
    let mut props = lf();
    props.set(key, value, &[]);
    props.to_string().trim_end_matches('\n').to_string()
}

#[test]
fn test_parse_plain_and_spaced() {
    for input in [
        "test=123",
        "test = 123",
        "test : 123",
        "test \t 123",
        "test:123",
        "test 123",
        "test =123",
        "test= 123",
        " test=123",
        "test=\t123",
    ] {
        assert_eq!(load(input).get("test"), Some("123"), "input {:?}", input);
    }
}

#[test]
fn test_parse_comments_before_entry() {
    for input in [
        "#Test\ntest=123",
        "!Test\ntest=123",
        " #Test\ntest=123",
        "   #Test\ntest=123",
        "\t#Test\ntest=123",
        "\t !Test\ntest=123",
    ] {
        let props = load(input);
        assert_eq!(props.get("test"), Some("123"), "input {:?}", input);
        assert_eq!(props.get_comments("test").unwrap(), ["Test"]);
    }
}

#[test]
fn test_parse_escapes() {
    assert_eq!(load("te\\=st=123").get("te=st"), Some("123"));
    assert_eq!(load("te\\\\st=123").get("te\\st"), Some("123"));
    assert_eq!(load("te\\tst=123").get("te\tst"), Some("123"));
    assert_eq!(load("test=12\\t3").get("test"), Some("12\t3"));
    assert_eq!(load("test=12\\\\3").get("test"), Some("12\\3"));
    assert_eq!(load("test=abc\\=def").get("test"), Some("abc=def"));
    assert_eq!(load("\\ test=123").get(" test"), Some("123"));
    assert_eq!(load("test\\ =123").get("test "), Some("123"));
    assert_eq!(load("test=\\t123").get("test"), Some("\t123"));
    assert_eq!(load("\\uD83D\\uDE02=123").get("😂"), Some("123"));
    assert_eq!(load("test=\\uD83D\\uDE02").get("test"), Some("😂"));
}

#[test]
fn test_parse_value_edges() {
    assert_eq!(load("test=abc=def").get("test"), Some("abc=def"));
    assert_eq!(load("test=123 ").get("test"), Some("123 "));
    assert_eq!(load("test=123\r").get("test"), Some("123"));
    assert_eq!(load("test=123\\\n456").get("test"), Some("123456"));
    assert_eq!(load("test=123\\\r\n456").get("test"), Some("123456"));
    for input in ["test =:123", "test: = 123", "test:= 123", "test:=123"] {
        assert_eq!(load(input).get("test"), Some("123"), "input {:?}", input);
    }
}

#[test]
fn test_legacy_compatibility() {
    let input = [
        "test1=123\\",
        "456",
        "test2=|$()%$*",
        "test3=\\uD83D\\uDE02",
        "test4",
        "test5: 123",
        "test6 = 123",
        "test7 = 123    ",
        "test8 = 123    #123",
        "# Comment 1",
        "test9 = 123    !123",
        "! Comment 2",
        "",
        "test10 = 123    #123",
        "",
        "",
        "! test = 123",
        "# test : 123",
        "   ! test = 123",
        "   # test : 123",
        " ! test = 123",
        " # test : 123",
        "                           #",
        "test123#123",
        "test11",
        "test12 = 123\\",
        "test13 = 123",
    ]
    .join("\n");
    let props = load(&input);

    let expected = [
        ("test1", "123456"),
        ("test2", "|$()%$*"),
        ("test3", "😂"),
        ("test4", ""),
        ("test5", "123"),
        ("test6", "123"),
        ("test7", "123    "),
        ("test8", "123    #123"),
        ("test9", "123    !123"),
        ("test10", "123    #123"),
        ("test123#123", ""),
        ("test11", ""),
        ("test12", "123test13 = 123"),
    ];
    assert_eq!(props.iter().collect::<Vec<_>>(), expected);
    assert_eq!(props.get_comments("test9").unwrap(), ["Comment 1"]);
    assert_eq!(props.get_comments("test10").unwrap(), ["Comment 2"]);
    assert_eq!(props.get_comments("test123#123").unwrap().len(), 7);
    assert!(props.header_comments().is_empty());
}

#[test]
fn test_convert_separators() {
    for input in [
        "test=123",
        "test = 123",
        "test:123",
        "test : 123",
        "test 123",
        "test   123",
        "test\t123",
        "test \t 123",
    ] {
        assert_eq!(convert(input), "test=123\n", "input {:?}", input);
    }
    assert_eq!(convert("test=1=23"), "test=1\\=23\n");
}

#[test]
fn test_convert_comments() {
    let cases = [
        ("# Title\n\n# Test\ntest=123", "# Title\n\n# Test\ntest=123\n"),
        (
            "# Title\n# Title 2\n\n# Test\n\ntest=123",
            "# Title\n# Title 2\n\n# Test\ntest=123\n",
        ),
        ("#Test\ntest=123", "# Test\ntest=123\n"),
        ("#  Test\ntest=123", "# Test\ntest=123\n"),
        ("#  \t\t  Test\ntest=123", "# Test\ntest=123\n"),
        ("! Title\n\n! Test\ntest=123", "# Title\n\n# Test\ntest=123\n"),
        ("!  \t\t  Test\ntest=123", "# Test\ntest=123\n"),
        ("test=123 # Test", "test=123 \\# Test\n"),
    ];
    for (input, expected) in cases {
        assert_eq!(convert(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_convert_separator_then_comment_marker() {
    assert_eq!(convert("=#Test\ntest=123"), "=\\#Test\ntest=123\n");
    assert_eq!(convert("\\ =#Test\ntest=123"), "\\ =\\#Test\ntest=123\n");
}

#[test]
fn test_escape_keys_and_values() {
    let cases = [
        ("test", "123", "test=123"),
        ("test", "\\\\t", "test=\\\\\\\\t"),
        ("te st", "123", "te\\ st=123"),
        (" test", "123", "\\ test=123"),
        ("test ", "123", "test\\ =123"),
        ("test", " 123", "test=\\ 123"),
        ("test", "1 23", "test=1 23"),
        ("test", "123 ", "test=123 "),
        ("te=st", "123", "te\\=st=123"),
        ("=test", "123", "\\=test=123"),
        ("test=", "123", "test\\==123"),
        ("test", "1=23", "test=1\\=23"),
        ("test", "=123", "test=\\=123"),
        ("test", "123=", "test=123\\="),
        ("te\\st", "123", "te\\\\st=123"),
        ("test", "123\\", "test=123\\\\"),
        ("te\tst", "123", "te\\tst=123"),
        ("\ttest", "123", "\\ttest=123"),
        ("test", "a\nb", "test=a\\nb"),
        ("test", "a\rb", "test=a\\nb"),
        ("test", "😂", "test=\\uD83D\\uDE02"),
        ("°", "§", "\\u00B0=\\u00A7"),
    ];
    for (key, value, expected) in cases {
        assert_eq!(saved_line(key, value), expected, "key {:?} value {:?}", key, value);
    }
}

#[test]
fn test_lenient_escaping() {
    let mut props =
        CommentedProperties::with_options(PropertiesOptions::lenient().with_line_ending(LineEnding::Lf));
    props.set("url", "http://localhost:8080/?a=b", &[]);
    props.set("lead", "=x", &[]);
    props.set("k:e=y", "v", &[]);
    assert_eq!(
        props.to_string(),
        "url=http://localhost:8080/?a=b\nlead=\\=x\nk\\:e\\=y=v\n"
    );
    let reloaded = load(&props.to_string());
    assert_eq!(reloaded.get("url"), Some("http://localhost:8080/?a=b"));
    assert_eq!(reloaded.get("lead"), Some("=x"));
    assert_eq!(reloaded.get("k:e=y"), Some("v"));
}

#[test]
fn test_comment_layout() {
    let mut props = lf();
    props.set_header_comments(["Header 1\nHeader 2", "Header 3"]);
    props.set("test", "123", &["Description 1\nDescription 2", "Description 3"]);
    assert_eq!(
        props.to_string(),
        "# Header 1\n# Header 2\n# Header 3\n\n# Description 1\n# Description 2\n# Description 3\ntest=123\n"
    );

    let mut bare = lf();
    bare.set("test", "123", &[]);
    assert_eq!(bare.to_string(), "test=123\n");
}

#[test]
fn test_comment_ending_in_backslash_keeps_next_entry() {
    let mut props = lf();
    props.set("path", "1", &["windows dir C:\\"]);
    props.set("next", "2", &[]);
    assert_eq!(props.to_string(), "# windows dir C:\\\npath=1\nnext=2\n");

    let reloaded = load(&props.to_string());
    assert_eq!(reloaded.keys().collect::<Vec<_>>(), ["path", "next"]);
    assert_eq!(reloaded.get("path"), Some("1"));
    assert_eq!(reloaded.get_comments("path").unwrap(), ["windows dir C:\\"]);
    assert!(reloaded.get_comments("next").unwrap().is_empty());

    let header = load("! ends here \\\n\nkey=value");
    assert_eq!(header.header_comments(), ["ends here \\"]);
    assert_eq!(header.get("key"), Some("value"));
}

#[test]
fn test_form_feed_in_keys_and_values() {
    let mut props = lf();
    props.set("a\x0Cb", "1", &[]);
    props.set("c", "\x0Cd\x0Ce", &[]);
    assert_eq!(props.to_string(), "a\\\x0Cb=1\nc=\\\x0Cd\x0Ce\n");

    let reloaded = load(&props.to_string());
    assert_eq!(reloaded.get("a\x0Cb"), Some("1"));
    assert_eq!(reloaded.get("c"), Some("\x0Cd\x0Ce"));
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn test_crlf_output() {
    let mut props =
        CommentedProperties::with_options(PropertiesOptions::new().with_line_ending(LineEnding::CrLf));
    props.set_header_comments(["H"]);
    props.set("a", "1", &["c"]);
    assert_eq!(props.to_string(), "# H\r\n\r\n# c\r\na=1\r\n");
    let reloaded = load(&props.to_string());
    assert_eq!(reloaded.header_comments(), ["H"]);
    assert_eq!(reloaded.get_comments("a").unwrap(), ["c"]);
}

#[test]
fn test_invalid_unicode_escapes() {
    for (input, source) in [
        ("test=\\u123", EscapeError::Truncated(3)),
        ("test=\\u123Z", EscapeError::InvalidHexDigit('Z')),
    ] {
        match input.parse::<CommentedProperties>() {
            Err(Error::MalformedEscape { line, col, source: actual }) => {
                assert_eq!(line, 1);
                assert_eq!(col, 6);
                assert_eq!(actual, source);
            }
            other => panic!("expected MalformedEscape for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let mut props = load("# H\n\nkeep=me");
    assert!(props.load_str("a=1\nb=\\u12").is_err());
    assert_eq!(props.get("keep"), Some("me"));
    assert_eq!(props.header_comments(), ["H"]);
    assert!(!props.contains_key("a"));
}

#[test]
fn test_nonexistent_entry() {
    let props = CommentedProperties::new();
    assert_eq!(props.get("test"), None);
    assert_eq!(props.get_comments("test"), None);
}

#[test]
fn test_all_printable_characters_round_trip() {
    let text: String = (0u32..4096)
        .filter_map(char::from_u32)
        .filter(|c| !c.is_control())
        .collect();

    for (key, value) in [("test", text.as_str()), (text.as_str(), "test"), (text.as_str(), text.as_str())] {
        let mut props = CommentedProperties::new();
        props.set(key, value, &[]);
        let reloaded = load(&props.to_string());
        assert_eq!(reloaded.get(key), Some(value));
        assert_eq!(reloaded.len(), 1);
    }
}

#[test]
fn test_save_load_save_is_stable() {
    let mut props = lf();
    props.set_header_comments(["Generated", ""]);
    props.set("name", " padded", &["Display name"]);
    props.set("path", "C:\\temp\\x", &[]);
    props.set("emoji", "😂 #1", &["", "two lines\nof comment"]);

    let first = props.to_string();
    let mut reloaded = lf();
    reloaded.load_str(&first).unwrap();
    assert_eq!(reloaded.to_string(), first);
    assert_eq!(reloaded, props);
}

#[test]
fn test_map_compliance() {
    let mut props = CommentedProperties::new();
    assert!(props.is_empty());
    props.set("test", "123", &[]);
    props.set("test1", "123", &["c"]);
    assert_eq!(props.len(), 2);
    assert!(props.contains_key("test"));
    assert!(!props.contains_key("test2"));
    assert!(props.contains_value("123"));
    assert!(!props.contains_value("456"));

    assert_eq!(props.insert("test1", "456").as_deref(), Some("123"));
    assert_eq!(props.get_comments("test1").unwrap().len(), 0);
    assert_eq!(props.keys().collect::<Vec<_>>(), ["test", "test1"]);
    assert_eq!(props.values().collect::<Vec<_>>(), ["123", "456"]);

    assert_eq!(props.remove("test").as_deref(), Some("123"));
    assert_eq!(props.remove("test"), None);
    props.clear();
    assert!(props.is_empty());

    let collected: CommentedProperties = vec![("a", "1"), ("b", "2")].into_iter().collect();
    assert_eq!(collected.keys().collect::<Vec<_>>(), ["a", "b"]);
}
