use integ_tests::valid;

valid!(overview, {
    "title": "global title",
    "group1": { "a": 1, "b": 2 },
    "group2": { "c": [3, 4] }
});

valid!(server, {
    "name": "edge-proxy",
    "started": "2013-02-24T17:26:21Z",
    "server": {
        "http": {
            "port": 8080,
            "ratio": 0.75,
            "hosts": ["alpha", "beta"],
            "tls": false
        },
        "admin": { "port": 9090 },
        "grid": [[1, 2], [3]]
    },
    "reserved": {}
});

valid!(empty_document, "", {});

valid!(comments_and_blank_lines, "\n# top\n\na = 1 # trailing\n\n# between\nb = -2\n", {
    "a": 1,
    "b": -2
});

valid!(crlf_line_endings, "a = 1\r\n[g]\r\nb = true\r\n", {
    "a": 1,
    "g": { "b": true }
});

valid!(dotted_keys_stay_literal, "a.b = 1\n[a]\nc = 2", {
    "a.b": 1,
    "a": { "c": 2 }
});

valid!(flat_duplicates_keep_the_last, "x = 1\nx = 2", { "x": 2 });

valid!(escapes, r#"s = "q\"uote\\ tab\t hex\x41""#, {
    "s": "q\"uote\\ tab\t hexA"
});

valid!(nested_groups_merge, "[a.b]\nx = 1\n[a.c]\ny = 2\n[a]\nz = 3", {
    "a": {
        "b": { "x": 1 },
        "c": { "y": 2 },
        "z": 3
    }
});

valid!(arrays_span_lines, "k = [\n  1, # one\n  2,\n]", { "k": [1, 2] });

valid!(group_names_with_spaces, "  [key group] # note\nx = 1", {
    "key group": { "x": 1 }
});

valid!(padded_group_segments, "[ server . key group ] # x\nport = 1", {
    "server": { "key group": { "port": 1 } }
});

valid!(comment_closes_the_input, "x = 1\n#port=80", { "x": 1 });
